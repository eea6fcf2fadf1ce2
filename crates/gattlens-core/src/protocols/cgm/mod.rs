//! Continuous Glucose Monitoring service decoding.
//!
//! A single CGM Measurement notification may pack several records, each
//! prefixed by its own size byte. Records are also retrievable through the
//! Record Access Control Point; the time offset (minutes since session start)
//! doubles as the RACP filter key.
//!
//! The Specific Ops Control Point responses covered here are the calibration
//! value response (whose status byte decomposes into rejected, out-of-range
//! and pending flags), the communication interval response and the generic
//! response code.

pub mod layout;
pub mod ops;
pub mod parser;

pub use ops::{CalibrationStatus, CgmCalibration, OpsResponse, OpsResponseCode, parse_ops_response};
pub use parser::{
    CgmMeasurement, CgmSensorStatus, CgmStatus, parse_cgm_measurements, parse_cgm_status,
};
