use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::aggregate::DeviceRegistry;
use crate::gatt::CharacteristicId;
use crate::protocols::racp::RacpRequest;
use crate::session::RacpError;
use crate::source::{
    DeviceId, EventSource, SourceError, TranscriptFileSource, Transport, TransportError,
    TransportEvent,
};
use crate::{CommandRecord, DeviceReport, RejectedRequest, Report, make_report};

mod config;

pub use config::ReplayConfig;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Stands in for the link during replay: every write succeeds and is kept.
#[derive(Debug, Default)]
struct RecordingTransport {
    written: Vec<(DeviceId, CommandRecord)>,
}

impl Transport for RecordingTransport {
    fn write_command(
        &mut self,
        device: &DeviceId,
        characteristic: CharacteristicId,
        command: &[u8],
    ) -> Result<(), TransportError> {
        debug!(device = %device, characteristic = %characteristic, len = command.len(), "command written");
        self.written.push((
            device.clone(),
            CommandRecord {
                characteristic,
                data: encode_hex(command),
            },
        ));
        Ok(())
    }
}

pub fn replay_transcript_file(path: &Path, config: &ReplayConfig) -> Result<Report, ReplayError> {
    let source = TranscriptFileSource::open(path)?;
    replay_source(path, source, config)
}

/// Drive every event of `source` through a fresh `DeviceRegistry`.
///
/// Each disconnect closes one connection entry in the report; devices still
/// connected when the source ends contribute their live state. Rejected
/// requests are reported, not fatal.
pub fn replay_source<S: EventSource>(
    path: &Path,
    mut source: S,
    config: &ReplayConfig,
) -> Result<Report, ReplayError> {
    let mut registry = DeviceRegistry::new(config.clone());
    let mut transport = RecordingTransport::default();
    let mut devices: BTreeMap<DeviceId, DeviceReport> = BTreeMap::new();
    let mut events_total = 0u64;

    while let Some(event) = source.next_event()? {
        events_total += 1;
        match event {
            TransportEvent::Connected { device } => registry.connect(&device),
            TransportEvent::Payload {
                device,
                characteristic,
                data,
            } => registry.handle_payload(&device, characteristic, &data),
            TransportEvent::Request {
                device,
                service,
                request,
            } => {
                if let Err(err) = registry.request(&device, service, request, &mut transport) {
                    reject(&mut devices, device, request, err);
                }
            }
            TransportEvent::Abort { device, service } => {
                if let Err(err) = registry.cancel(&device, service, &mut transport) {
                    reject(&mut devices, device, RacpRequest::Abort, err);
                }
            }
            TransportEvent::Disconnected { device } => match registry.disconnect(&device) {
                Some(snapshot) => device_report(&mut devices, device)
                    .connections
                    .push(snapshot.into()),
                None => warn!(device = %device, "disconnect without connection"),
            },
        }
    }

    for snapshot in registry.snapshot_all() {
        if snapshot.connected {
            let device = snapshot.device.clone();
            device_report(&mut devices, device).connections.push(snapshot.into());
        }
    }
    for (device, command) in transport.written {
        device_report(&mut devices, device).commands.push(command);
    }

    let mut report = make_report(&path.display().to_string(), path.metadata()?.len());
    report.events_total = events_total;
    report.devices = devices.into_values().collect();
    Ok(report)
}

fn device_report(devices: &mut BTreeMap<DeviceId, DeviceReport>, device: DeviceId) -> &mut DeviceReport {
    devices
        .entry(device.clone())
        .or_insert_with(|| DeviceReport::new(device))
}

fn reject(
    devices: &mut BTreeMap<DeviceId, DeviceReport>,
    device: DeviceId,
    request: RacpRequest,
    err: RacpError,
) {
    warn!(device = %device, request = ?request, error = %err, "request rejected");
    device_report(devices, device).rejected_requests.push(RejectedRequest {
        request,
        reason: err.to_string(),
    });
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
