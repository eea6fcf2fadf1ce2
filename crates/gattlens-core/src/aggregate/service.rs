use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use super::csc::{CscMetrics, CscTracker};
use crate::gatt::{ConnectionState, Decoded, MetadataUpdate, Record, ServiceKind};
use crate::protocols::blood_pressure::PressureUnit;
use crate::protocols::cgm::{CgmStatus, OpsResponse};
use crate::protocols::common::DecodeError;
use crate::protocols::glucose::ConcentrationUnit;
use crate::protocols::heart_rate::BodySensorLocation;
use crate::protocols::proximity::AlertLevel;
use crate::protocols::speed_cadence::SensorLocation;
use crate::protocols::thermometer::{TemperatureType, TemperatureUnit};

/// Display unit implied by the most recent record that carried one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitPreference {
    MgPerDl,
    MmolPerL,
    Mmhg,
    Kpa,
    Celsius,
    Fahrenheit,
}

impl UnitPreference {
    fn of(record: &Record) -> Option<Self> {
        let pressure = |unit: PressureUnit| match unit {
            PressureUnit::Mmhg => UnitPreference::Mmhg,
            PressureUnit::Kpa => UnitPreference::Kpa,
        };
        let temperature = |unit: TemperatureUnit| match unit {
            TemperatureUnit::Celsius => UnitPreference::Celsius,
            TemperatureUnit::Fahrenheit => UnitPreference::Fahrenheit,
        };
        match record {
            Record::Glucose(measurement) => {
                measurement.sample.as_ref().map(|sample| match sample.unit {
                    ConcentrationUnit::KgPerL => UnitPreference::MgPerDl,
                    ConcentrationUnit::MolPerL => UnitPreference::MmolPerL,
                })
            }
            Record::Cgm(_) => Some(UnitPreference::MgPerDl),
            Record::BloodPressure(measurement) => Some(pressure(measurement.unit)),
            Record::IntermediateCuffPressure(measurement) => Some(pressure(measurement.unit)),
            Record::Temperature(measurement) | Record::IntermediateTemperature(measurement) => {
                Some(temperature(measurement.unit))
            }
            _ => None,
        }
    }
}

/// Scalar facts about one service of one device.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ServiceMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_sensor_location: Option<BodySensorLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_location: Option<SensorLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_type: Option<TemperatureType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power_level: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_level: Option<AlertLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgm_status: Option<CgmStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ops_response: Option<OpsResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_preference: Option<UnitPreference>,
}

/// Cloned view of an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceSnapshot {
    pub service: ServiceKind,
    pub records: Vec<Record>,
    pub metadata: ServiceMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csc: Option<CscMetrics>,
    pub dropped_payloads: u64,
}

/// Accumulated records and metadata for one device/service pair.
///
/// State changes only through `apply`, `apply_metadata` and `reset`.
/// Record subscribers get every applied record; metadata subscribers share
/// a bounded broadcast channel and may miss the oldest updates.
#[derive(Debug)]
pub struct ServiceAggregate {
    service: ServiceKind,
    records: Vec<Record>,
    metadata: ServiceMetadata,
    csc: Option<CscTracker>,
    dropped_payloads: u64,
    record_subscribers: Vec<mpsc::UnboundedSender<Record>>,
    metadata_tx: broadcast::Sender<MetadataUpdate>,
}

impl ServiceAggregate {
    pub fn new(service: ServiceKind, wheel_circumference_mm: u32, metadata_capacity: usize) -> Self {
        let (metadata_tx, _) = broadcast::channel(metadata_capacity.max(1));
        Self {
            service,
            records: Vec::new(),
            metadata: ServiceMetadata::default(),
            csc: (service == ServiceKind::CyclingSpeedCadence)
                .then(|| CscTracker::new(wheel_circumference_mm)),
            dropped_payloads: 0,
            record_subscribers: Vec::new(),
            metadata_tx,
        }
    }

    pub fn service(&self) -> ServiceKind {
        self.service
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn metadata(&self) -> &ServiceMetadata {
        &self.metadata
    }

    pub fn dropped_payloads(&self) -> u64 {
        self.dropped_payloads
    }

    /// Fold one decode result into the aggregate and return how many records
    /// were appended. A failed decode is logged and counted; nothing else
    /// changes.
    pub fn apply(&mut self, result: Result<Decoded, DecodeError>) -> usize {
        match result {
            Ok(Decoded::Records(records)) => {
                let count = records.len();
                for record in records {
                    self.push_record(record);
                }
                count
            }
            Ok(Decoded::Metadata(update)) => {
                self.apply_metadata(update);
                0
            }
            Ok(Decoded::Control(response)) => {
                debug!(service = %self.service, response = ?response, "control indication not aggregated");
                0
            }
            Err(err) => {
                warn!(service = %self.service, error = %err, "dropping undecodable payload");
                self.dropped_payloads += 1;
                0
            }
        }
    }

    pub fn apply_metadata(&mut self, update: MetadataUpdate) {
        let metadata = &mut self.metadata;
        match &update {
            MetadataUpdate::BatteryLevel(level) => metadata.battery_level = Some(*level),
            MetadataUpdate::BodySensorLocation(location) => {
                metadata.body_sensor_location = Some(*location)
            }
            MetadataUpdate::SensorLocation(location) => metadata.sensor_location = Some(*location),
            MetadataUpdate::TemperatureType(kind) => metadata.temperature_type = Some(*kind),
            MetadataUpdate::TxPowerLevel(dbm) => metadata.tx_power_level = Some(*dbm),
            MetadataUpdate::AlertLevel(level) => metadata.alert_level = Some(*level),
            MetadataUpdate::Connection(state) => metadata.connection = Some(*state),
            MetadataUpdate::CgmStatus(status) => metadata.cgm_status = Some(status.clone()),
            MetadataUpdate::OpsResponse(response) => {
                metadata.last_ops_response = Some(response.clone())
            }
        }
        // no receivers is not an error
        let _ = self.metadata_tx.send(update);
    }

    /// Clear records, metadata and derived metrics. Subscriptions survive.
    pub fn reset(&mut self) {
        self.records.clear();
        self.metadata = ServiceMetadata::default();
        self.dropped_payloads = 0;
        if let Some(csc) = self.csc.as_mut() {
            csc.reset();
        }
    }

    pub fn snapshot(&self) -> ServiceSnapshot {
        ServiceSnapshot {
            service: self.service,
            records: self.records.clone(),
            metadata: self.metadata.clone(),
            csc: self.csc.as_ref().map(CscTracker::metrics),
            dropped_payloads: self.dropped_payloads,
        }
    }

    pub fn subscribe_records(&mut self) -> mpsc::UnboundedReceiver<Record> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.record_subscribers.push(tx);
        rx
    }

    pub fn subscribe_metadata(&self) -> broadcast::Receiver<MetadataUpdate> {
        self.metadata_tx.subscribe()
    }

    fn push_record(&mut self, record: Record) {
        if let Some(unit) = UnitPreference::of(&record) {
            self.metadata.unit_preference = Some(unit);
        }
        if let (Some(csc), Record::CyclingSpeedCadence(measurement)) = (self.csc.as_mut(), &record) {
            csc.update(measurement);
        }
        self.record_subscribers
            .retain(|subscriber| subscriber.send(record.clone()).is_ok());
        self.records.push(record);
    }
}
