//! Health Thermometer service decoding.
//!
//! Temperature Measurement and Intermediate Temperature share one layout: a
//! FLOAT value whose unit is selected by flag bit 0, then an optional
//! timestamp and an optional temperature type.

pub mod layout;
pub mod parser;

pub use parser::{
    TemperatureMeasurement, TemperatureType, TemperatureUnit, parse_temperature_measurement,
    parse_temperature_type,
};
