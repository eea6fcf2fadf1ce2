//! Glucose service decoding.
//!
//! Glucose Measurement and Glucose Measurement Context records are usually
//! delivered in bulk through the Record Access Control Point. Both carry a
//! sequence number so a context can be matched to its measurement. Every
//! enumerated field (type, sample location, carbohydrate, meal, tester,
//! health, medication) is a closed code set.

pub mod codes;
pub mod context;
pub mod layout;
pub mod parser;

pub use codes::{
    CarbohydrateId, GlucoseType, Health, Meal, MedicationId, SampleLocation, Tester,
};
pub use context::{
    Carbohydrate, Exercise, GlucoseMeasurementContext, Medication, MedicationUnit,
    parse_glucose_measurement_context,
};
pub use parser::{
    ConcentrationUnit, GlucoseMeasurement, GlucoseSample, SensorStatus,
    parse_glucose_measurement,
};
