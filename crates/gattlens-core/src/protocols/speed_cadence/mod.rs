//! Cycling and Running Speed and Cadence decoding.
//!
//! CSC measurements carry cumulative counters and 1/1024 s event times; the
//! speed and cadence themselves are derived from two consecutive samples
//! (see `aggregate::csc`). RSC measurements carry instantaneous values.

pub mod layout;
pub mod parser;

pub use parser::{
    CrankRevolutions, CscMeasurement, RscMeasurement, SensorLocation, WheelRevolutions,
    parse_csc_measurement, parse_rsc_measurement, parse_sensor_location,
};
