//! Per-device, per-service views built from decode results.
//!
//! A `ServiceAggregate` only changes through `apply`, `apply_metadata` and
//! `reset`. The `DeviceRegistry` owns one aggregate per service and one RACP
//! coordinator per stored-record service for every device it has seen.

mod csc;
mod registry;
mod service;

pub use csc::{CscMetrics, CscTracker};
pub use registry::{DeviceRegistry, DeviceSnapshot};
pub use service::{ServiceAggregate, ServiceMetadata, ServiceSnapshot, UnitPreference};
