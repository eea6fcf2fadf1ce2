use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// GATT service a characteristic belongs to; one aggregate exists per kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    HeartRate,
    BloodPressure,
    Glucose,
    ContinuousGlucose,
    HealthThermometer,
    Proximity,
    CyclingSpeedCadence,
    RunningSpeedCadence,
    DirectionFinding,
    Throughput,
    Battery,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 11] = [
        ServiceKind::HeartRate,
        ServiceKind::BloodPressure,
        ServiceKind::Glucose,
        ServiceKind::ContinuousGlucose,
        ServiceKind::HealthThermometer,
        ServiceKind::Proximity,
        ServiceKind::CyclingSpeedCadence,
        ServiceKind::RunningSpeedCadence,
        ServiceKind::DirectionFinding,
        ServiceKind::Throughput,
        ServiceKind::Battery,
    ];

    /// The control point used for stored-record retrieval, when the service
    /// has one.
    pub fn racp_characteristic(self) -> Option<CharacteristicId> {
        match self {
            ServiceKind::Glucose => Some(CharacteristicId::GlucoseRacp),
            ServiceKind::ContinuousGlucose => Some(CharacteristicId::CgmRacp),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::HeartRate => "heart-rate",
            ServiceKind::BloodPressure => "blood-pressure",
            ServiceKind::Glucose => "glucose",
            ServiceKind::ContinuousGlucose => "cgm",
            ServiceKind::HealthThermometer => "health-thermometer",
            ServiceKind::Proximity => "proximity",
            ServiceKind::CyclingSpeedCadence => "cycling-speed-cadence",
            ServiceKind::RunningSpeedCadence => "running-speed-cadence",
            ServiceKind::DirectionFinding => "direction-finding",
            ServiceKind::Throughput => "throughput",
            ServiceKind::Battery => "battery",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServiceKind {
    type Err = CharacteristicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CharacteristicParseError::UnknownService(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacteristicParseError {
    #[error("unknown characteristic: {0}")]
    UnknownCharacteristic(String),
    #[error("assigned number {0:#06x} is shared by several services; use its name")]
    Ambiguous(u16),
    #[error("unknown service: {0}")]
    UnknownService(String),
}

macro_rules! characteristics {
    ($($variant:ident => $name:literal, $number:expr, $service:ident;)+) => {
        /// Every characteristic the decoder registry knows about.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(rename_all = "kebab-case")]
        pub enum CharacteristicId {
            $($variant,)+
        }

        impl CharacteristicId {
            pub const ALL: &'static [CharacteristicId] = &[$(CharacteristicId::$variant,)+];

            /// Kebab-case name used in transcripts and on the command line.
            pub fn name(self) -> &'static str {
                match self {
                    $(CharacteristicId::$variant => $name,)+
                }
            }

            /// 16-bit SIG assigned number; vendor characteristics have none.
            pub fn assigned_number(self) -> Option<u16> {
                match self {
                    $(CharacteristicId::$variant => $number,)+
                }
            }

            pub fn service(self) -> ServiceKind {
                match self {
                    $(CharacteristicId::$variant => ServiceKind::$service,)+
                }
            }
        }
    };
}

characteristics! {
    HeartRateMeasurement => "heart-rate-measurement", Some(0x2a37), HeartRate;
    BodySensorLocation => "body-sensor-location", Some(0x2a38), HeartRate;
    BloodPressureMeasurement => "blood-pressure-measurement", Some(0x2a35), BloodPressure;
    IntermediateCuffPressure => "intermediate-cuff-pressure", Some(0x2a36), BloodPressure;
    GlucoseMeasurement => "glucose-measurement", Some(0x2a18), Glucose;
    GlucoseMeasurementContext => "glucose-measurement-context", Some(0x2a34), Glucose;
    GlucoseRacp => "glucose-racp", Some(0x2a52), Glucose;
    CgmMeasurement => "cgm-measurement", Some(0x2aa7), ContinuousGlucose;
    CgmStatus => "cgm-status", Some(0x2aa9), ContinuousGlucose;
    CgmSpecificOpsControlPoint => "cgm-specific-ops-control-point", Some(0x2aac), ContinuousGlucose;
    CgmRacp => "cgm-racp", Some(0x2a52), ContinuousGlucose;
    TemperatureMeasurement => "temperature-measurement", Some(0x2a1c), HealthThermometer;
    TemperatureType => "temperature-type", Some(0x2a1d), HealthThermometer;
    IntermediateTemperature => "intermediate-temperature", Some(0x2a1e), HealthThermometer;
    AlertLevel => "alert-level", Some(0x2a06), Proximity;
    TxPowerLevel => "tx-power-level", Some(0x2a07), Proximity;
    CscMeasurement => "csc-measurement", Some(0x2a5b), CyclingSpeedCadence;
    CscSensorLocation => "csc-sensor-location", Some(0x2a5d), CyclingSpeedCadence;
    RscMeasurement => "rsc-measurement", Some(0x2a53), RunningSpeedCadence;
    RscSensorLocation => "rsc-sensor-location", Some(0x2a5d), RunningSpeedCadence;
    DirectionAzimuth => "direction-azimuth", None, DirectionFinding;
    DirectionElevation => "direction-elevation", None, DirectionFinding;
    DirectionDistance => "direction-distance", None, DirectionFinding;
    Throughput => "throughput", None, Throughput;
    BatteryLevel => "battery-level", Some(0x2a19), Battery;
}

impl CharacteristicId {
    /// Characteristics whose notifications carry the stored records a RACP
    /// session counts.
    pub fn is_record_stream(self) -> bool {
        matches!(
            self,
            CharacteristicId::GlucoseMeasurement | CharacteristicId::CgmMeasurement
        )
    }
}

impl fmt::Display for CharacteristicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacteristicId {
    type Err = CharacteristicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let number = u16::from_str_radix(hex, 16)
                .map_err(|_| CharacteristicParseError::UnknownCharacteristic(s.to_string()))?;
            let mut matches = CharacteristicId::ALL
                .iter()
                .filter(|id| id.assigned_number() == Some(number));
            return match (matches.next(), matches.next()) {
                (Some(id), None) => Ok(*id),
                (Some(_), Some(_)) => Err(CharacteristicParseError::Ambiguous(number)),
                _ => Err(CharacteristicParseError::UnknownCharacteristic(s.to_string())),
            };
        }
        CharacteristicId::ALL
            .iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| CharacteristicParseError::UnknownCharacteristic(s.to_string()))
    }
}
