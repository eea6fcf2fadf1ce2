use serde::Serialize;

use crate::protocols::blood_pressure::{BloodPressureMeasurement, IntermediateCuffPressure};
use crate::protocols::cgm::{CgmMeasurement, CgmStatus, OpsResponse};
use crate::protocols::direction::{Azimuth, DistanceMeasurement, Elevation};
use crate::protocols::glucose::{GlucoseMeasurement, GlucoseMeasurementContext};
use crate::protocols::heart_rate::{BodySensorLocation, HeartRateMeasurement};
use crate::protocols::proximity::AlertLevel;
use crate::protocols::racp::RacpResponse;
use crate::protocols::speed_cadence::{CscMeasurement, RscMeasurement, SensorLocation};
use crate::protocols::thermometer::{TemperatureMeasurement, TemperatureType};
use crate::protocols::throughput::ThroughputMetrics;

/// A decoded measurement appended to a service aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    HeartRate(HeartRateMeasurement),
    BloodPressure(BloodPressureMeasurement),
    IntermediateCuffPressure(IntermediateCuffPressure),
    Glucose(GlucoseMeasurement),
    GlucoseContext(GlucoseMeasurementContext),
    Cgm(CgmMeasurement),
    Temperature(TemperatureMeasurement),
    IntermediateTemperature(TemperatureMeasurement),
    CyclingSpeedCadence(CscMeasurement),
    RunningSpeedCadence(RscMeasurement),
    Azimuth(Azimuth),
    Elevation(Elevation),
    Distance(DistanceMeasurement),
    Throughput(ThroughputMetrics),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// A scalar fact about a service, replacing any previous value of its kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MetadataUpdate {
    BatteryLevel(u8),
    BodySensorLocation(BodySensorLocation),
    SensorLocation(SensorLocation),
    TemperatureType(TemperatureType),
    TxPowerLevel(i8),
    AlertLevel(AlertLevel),
    Connection(ConnectionState),
    CgmStatus(CgmStatus),
    OpsResponse(OpsResponse),
}

/// Output of one decoder call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Decoded {
    Records(Vec<Record>),
    Metadata(MetadataUpdate),
    /// Record Access Control Point indication, routed to the session.
    Control(RacpResponse),
}

impl Decoded {
    pub(crate) fn record(record: Record) -> Self {
        Decoded::Records(vec![record])
    }
}
