//! Blood Pressure service decoding.
//!
//! Blood Pressure Measurement and Intermediate Cuff Pressure share one wire
//! layout: a flags byte selecting the pressure unit and the optional
//! timestamp, pulse rate, user id and measurement status fields, followed by
//! three SFLOAT pressures. The status word decomposes into independent
//! conditions plus a pulse-rate range tri-state.

pub mod layout;
pub mod parser;

pub use parser::{
    BloodPressureMeasurement, IntermediateCuffPressure, MeasurementStatus, PressureUnit,
    PulseRateRange, parse_blood_pressure_measurement, parse_intermediate_cuff_pressure,
};
