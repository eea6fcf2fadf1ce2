use std::collections::BTreeMap;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, warn};

use super::service::{ServiceAggregate, ServiceSnapshot};
use crate::gatt::{CharacteristicId, ConnectionState, Decoded, MetadataUpdate, Record, ServiceKind, decode};
use crate::protocols::racp::RacpRequest;
use crate::replay::ReplayConfig;
use crate::session::{RacpCoordinator, RacpError, RacpOutcome, RacpState, SessionSummary};
use crate::source::{DeviceId, Transport};

/// Cloned view of one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    pub device: DeviceId,
    pub connected: bool,
    /// Services in stable order.
    pub services: Vec<ServiceSnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub racp_sessions: Vec<SessionSummary>,
}

#[derive(Debug)]
struct DeviceEntry {
    connected: bool,
    aggregates: BTreeMap<ServiceKind, ServiceAggregate>,
    coordinators: BTreeMap<ServiceKind, RacpCoordinator>,
}

impl DeviceEntry {
    fn new() -> Self {
        Self {
            connected: false,
            aggregates: BTreeMap::new(),
            coordinators: BTreeMap::new(),
        }
    }

    fn aggregate(&mut self, service: ServiceKind, config: &ReplayConfig) -> &mut ServiceAggregate {
        let connected = self.connected;
        self.aggregates.entry(service).or_insert_with(|| {
            let mut aggregate = ServiceAggregate::new(
                service,
                config.wheel_circumference_mm,
                config.metadata_capacity,
            );
            if connected {
                aggregate.apply_metadata(MetadataUpdate::Connection(ConnectionState::Connected));
            }
            aggregate
        })
    }

    fn coordinator(&mut self, service: ServiceKind) -> &mut RacpCoordinator {
        self.coordinators
            .entry(service)
            .or_insert_with(|| RacpCoordinator::new(service))
    }

    fn snapshot(&self, device: &DeviceId) -> DeviceSnapshot {
        DeviceSnapshot {
            device: device.clone(),
            connected: self.connected,
            services: self.aggregates.values().map(ServiceAggregate::snapshot).collect(),
            racp_sessions: self
                .coordinators
                .values()
                .flat_map(|racp| racp.history().iter().cloned())
                .collect(),
        }
    }
}

/// Per-device state keyed by device id.
///
/// Aggregates and coordinators are created on first use of a service.
/// Disconnect force-completes open sessions, then resets every aggregate;
/// the returned snapshot is the last view of that connection.
#[derive(Debug)]
pub struct DeviceRegistry {
    config: ReplayConfig,
    devices: BTreeMap<DeviceId, DeviceEntry>,
}

impl DeviceRegistry {
    pub fn new(config: ReplayConfig) -> Self {
        Self {
            config,
            devices: BTreeMap::new(),
        }
    }

    pub fn is_connected(&self, device: &DeviceId) -> bool {
        self.devices.get(device).is_some_and(|entry| entry.connected)
    }

    pub fn connect(&mut self, device: &DeviceId) {
        let entry = self.devices.entry(device.clone()).or_insert_with(DeviceEntry::new);
        if entry.connected {
            debug!(device = %device, "already connected");
            return;
        }
        entry.connected = true;
        for aggregate in entry.aggregates.values_mut() {
            aggregate.apply_metadata(MetadataUpdate::Connection(ConnectionState::Connected));
        }
        debug!(device = %device, "connected");
    }

    /// Returns the snapshot taken just before the reset, or `None` when the
    /// device was not connected.
    pub fn disconnect(&mut self, device: &DeviceId) -> Option<DeviceSnapshot> {
        let entry = self.devices.get_mut(device).filter(|entry| entry.connected)?;
        for racp in entry.coordinators.values_mut() {
            racp.on_disconnect();
        }
        entry.connected = false;
        for aggregate in entry.aggregates.values_mut() {
            aggregate.apply_metadata(MetadataUpdate::Connection(ConnectionState::Disconnected));
        }
        let snapshot = entry.snapshot(device);
        for aggregate in entry.aggregates.values_mut() {
            aggregate.reset();
        }
        for racp in entry.coordinators.values_mut() {
            racp.reset();
        }
        debug!(device = %device, "disconnected");
        Some(snapshot)
    }

    /// Decode a payload and route it to the owning aggregate or session.
    pub fn handle_payload(&mut self, device: &DeviceId, characteristic: CharacteristicId, data: &[u8]) {
        let Some(entry) = self.devices.get_mut(device).filter(|entry| entry.connected) else {
            warn!(device = %device, characteristic = %characteristic, "payload from unconnected device dropped");
            return;
        };
        let service = characteristic.service();
        match decode(characteristic, data) {
            Ok(Decoded::Control(response)) => {
                if let Some(outcome) = entry.coordinator(service).handle_response(response) {
                    debug!(device = %device, service = %service, outcome = ?outcome, "racp session finished");
                }
            }
            result => {
                let decoded = result.is_ok();
                let applied = entry.aggregate(service, &self.config).apply(result);
                if characteristic.is_record_stream() {
                    let racp = entry.coordinator(service);
                    if decoded {
                        racp.on_records_received(applied);
                    } else {
                        racp.on_record_dropped();
                    }
                }
            }
        }
    }

    /// Start a stored-record request and write its command.
    ///
    /// A failed write force-completes the session; the returned receiver
    /// then already holds `LinkLost`.
    pub fn request<T: Transport>(
        &mut self,
        device: &DeviceId,
        service: ServiceKind,
        request: RacpRequest,
        transport: &mut T,
    ) -> Result<oneshot::Receiver<RacpOutcome>, RacpError> {
        let characteristic = service
            .racp_characteristic()
            .ok_or(RacpError::Unsupported { service })?;
        let entry = self
            .devices
            .get_mut(device)
            .filter(|entry| entry.connected)
            .ok_or_else(|| RacpError::NotConnected(device.clone()))?;
        let racp = entry.coordinator(service);
        let pending = racp.request(request)?;
        if let Err(err) = transport.write_command(device, characteristic, &pending.command) {
            warn!(device = %device, service = %service, error = %err, "racp command write failed");
            racp.on_write_failed();
        }
        Ok(pending.outcome)
    }

    /// Abort the active stored-record session.
    pub fn cancel<T: Transport>(
        &mut self,
        device: &DeviceId,
        service: ServiceKind,
        transport: &mut T,
    ) -> Result<oneshot::Receiver<RacpOutcome>, RacpError> {
        let active = self
            .devices
            .get(device)
            .and_then(|entry| entry.coordinators.get(&service))
            .is_some_and(RacpCoordinator::is_active);
        if !active {
            return Err(RacpError::NoActiveSession { service });
        }
        self.request(device, service, RacpRequest::Abort, transport)
    }

    pub fn racp_state(&self, device: &DeviceId, service: ServiceKind) -> Option<RacpState> {
        self.devices
            .get(device)?
            .coordinators
            .get(&service)
            .map(RacpCoordinator::state)
    }

    pub fn subscribe_records(
        &mut self,
        device: &DeviceId,
        service: ServiceKind,
    ) -> Option<mpsc::UnboundedReceiver<Record>> {
        let entry = self.devices.get_mut(device)?;
        Some(entry.aggregate(service, &self.config).subscribe_records())
    }

    pub fn subscribe_metadata(
        &mut self,
        device: &DeviceId,
        service: ServiceKind,
    ) -> Option<broadcast::Receiver<MetadataUpdate>> {
        let entry = self.devices.get_mut(device)?;
        Some(entry.aggregate(service, &self.config).subscribe_metadata())
    }

    pub fn snapshot(&self, device: &DeviceId) -> Option<DeviceSnapshot> {
        self.devices.get(device).map(|entry| entry.snapshot(device))
    }

    /// Every known device, ordered by id.
    pub fn snapshot_all(&self) -> Vec<DeviceSnapshot> {
        self.devices
            .iter()
            .map(|(device, entry)| entry.snapshot(device))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::DeviceRegistry;
    use crate::gatt::{CharacteristicId, ConnectionState, ServiceKind};
    use crate::protocols::racp::{RacpRequest, RecordFilter};
    use crate::replay::ReplayConfig;
    use crate::session::{Completion, RacpError, RacpOutcome, RacpState};
    use crate::source::{DeviceId, Transport, TransportError};

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(CharacteristicId, Vec<u8>)>,
        fail: bool,
    }

    impl Transport for Recorder {
        fn write_command(
            &mut self,
            device: &DeviceId,
            characteristic: CharacteristicId,
            command: &[u8],
        ) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::NotConnected(device.clone()));
            }
            self.writes.push((characteristic, command.to_vec()));
            Ok(())
        }
    }

    fn connected(device: &DeviceId) -> DeviceRegistry {
        let mut registry = DeviceRegistry::new(ReplayConfig::default());
        registry.connect(device);
        registry
    }

    #[test]
    fn payloads_from_unconnected_devices_are_dropped() {
        let device = DeviceId::new("hrm");
        let mut registry = DeviceRegistry::new(ReplayConfig::default());
        registry.handle_payload(&device, CharacteristicId::HeartRateMeasurement, &[0x00, 0x48]);
        assert!(registry.snapshot(&device).is_none());
    }

    #[test]
    fn request_writes_command_to_racp_characteristic() {
        let device = DeviceId::new("meter");
        let mut registry = connected(&device);
        let mut transport = Recorder::default();
        registry
            .request(&device, ServiceKind::Glucose, RacpRequest::Report(RecordFilter::All), &mut transport)
            .unwrap();
        assert_eq!(
            transport.writes,
            vec![(CharacteristicId::GlucoseRacp, vec![0x01, 0x01])]
        );
        assert_eq!(
            registry.racp_state(&device, ServiceKind::Glucose),
            Some(RacpState::RequestSent)
        );
    }

    #[test]
    fn request_rejects_services_without_racp() {
        let device = DeviceId::new("hrm");
        let mut registry = connected(&device);
        let err = registry
            .request(&device, ServiceKind::HeartRate, RacpRequest::Abort, &mut Recorder::default())
            .unwrap_err();
        assert_eq!(
            err,
            RacpError::Unsupported {
                service: ServiceKind::HeartRate
            }
        );
    }

    #[test]
    fn failed_write_completes_with_link_lost() {
        let device = DeviceId::new("meter");
        let mut registry = connected(&device);
        let mut transport = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut outcome = registry
            .request(&device, ServiceKind::Glucose, RacpRequest::Report(RecordFilter::All), &mut transport)
            .unwrap();
        assert_eq!(
            outcome.try_recv().unwrap(),
            RacpOutcome::Completed(Completion::LinkLost { received: 0 })
        );
    }

    #[test]
    fn cancel_without_session_fails() {
        let device = DeviceId::new("meter");
        let mut registry = connected(&device);
        let err = registry
            .cancel(&device, ServiceKind::Glucose, &mut Recorder::default())
            .unwrap_err();
        assert_eq!(
            err,
            RacpError::NoActiveSession {
                service: ServiceKind::Glucose
            }
        );
    }

    #[test]
    fn disconnect_snapshots_then_resets() {
        let device = DeviceId::new("hrm");
        let mut registry = connected(&device);
        registry.handle_payload(&device, CharacteristicId::HeartRateMeasurement, &[0x00, 0x48]);
        registry.handle_payload(&device, CharacteristicId::BatteryLevel, &[0x5a]);

        let last = registry.disconnect(&device).unwrap();
        assert!(!last.connected);
        assert_eq!(last.services.len(), 2);
        assert_eq!(last.services[0].service, ServiceKind::HeartRate);
        assert_eq!(last.services[0].records.len(), 1);
        assert_eq!(
            last.services[0].metadata.connection,
            Some(ConnectionState::Disconnected)
        );
        assert_eq!(last.services[1].metadata.battery_level, Some(90));

        let after = registry.snapshot(&device).unwrap();
        assert!(after.services.iter().all(|service| service.records.is_empty()));
        assert!(registry.disconnect(&device).is_none());
    }
}
