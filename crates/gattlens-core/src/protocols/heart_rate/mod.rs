//! Heart Rate service decoding.
//!
//! The measurement flags select an 8- or 16-bit heart rate, a sensor contact
//! tri-state, an optional energy expended counter and a trailing run of RR
//! intervals that fills the rest of the payload. Body Sensor Location is a
//! single closed code.

pub mod layout;
pub mod parser;

pub use parser::{
    BodySensorLocation, HeartRateMeasurement, SensorContact, parse_body_sensor_location,
    parse_heart_rate_measurement,
};
