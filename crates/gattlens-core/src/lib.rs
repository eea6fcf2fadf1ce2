//! gattlens core library: BLE GATT payload decoding and stored-record
//! retrieval.
//!
//! Raw characteristic payloads flow through profile decoders
//! (layout/parser per profile, shared `ByteCursor` underneath) into typed
//! records. A `DeviceRegistry` folds those records and metadata into
//! per-device, per-service aggregates and runs one Record Access Control
//! Point session per stored-record service. All I/O is isolated behind the
//! `EventSource` and `Transport` traits; decoders are pure functions.
//!
//! Invariants:
//! - A decoder either returns fully populated records or an error; a failed
//!   decode never changes aggregated state.
//! - At most one stored-record session per device and service is in flight.
//! - Report output is deterministic: devices by id, services by kind.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use gattlens_core::{ReplayConfig, replay_transcript_file};
//!
//! let report = replay_transcript_file(Path::new("session.txt"), &ReplayConfig::default())?;
//! println!("devices: {}", report.devices.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::Serialize;

pub mod aggregate;
pub mod gatt;
pub mod protocols;
mod replay;
pub mod session;
mod source;

pub use aggregate::DeviceSnapshot;
pub use gatt::CharacteristicId;
pub use protocols::common::DecodeError;
pub use protocols::racp::RacpRequest;
pub use replay::{ReplayConfig, ReplayError, replay_source, replay_transcript_file};
pub use source::{
    DeviceId, EventSource, SourceError, TranscriptFileSource, TranscriptSource, Transport,
    TransportError, TransportEvent, decode_hex,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Replay report with deterministic ordering.
///
/// # Examples
/// ```
/// use gattlens_core::make_report;
///
/// let report = make_report("session.txt", 512);
/// assert_eq!(report.report_version, gattlens_core::REPORT_VERSION);
/// assert!(report.devices.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    pub input: InputInfo,
    /// Transport events read from the input.
    pub events_total: u64,
    /// Per-device results ordered by device id.
    pub devices: Vec<DeviceReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input metadata embedded in reports.
///
/// # Examples
/// ```
/// use gattlens_core::InputInfo;
///
/// let input = InputInfo {
///     path: "session.txt".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputInfo {
    /// Input path as provided to the replay.
    pub path: String,
    pub bytes: u64,
}

/// Everything observed for one device across the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceReport {
    pub device: DeviceId,
    /// One entry per connection, in order. The last entry is live state when
    /// the device was still connected at the end of the input.
    pub connections: Vec<ConnectionReport>,
    /// Control-point commands written, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected_requests: Vec<RejectedRequest>,
}

impl DeviceReport {
    pub fn new(device: DeviceId) -> Self {
        Self {
            device,
            connections: Vec::new(),
            commands: Vec::new(),
            rejected_requests: Vec::new(),
        }
    }
}

/// Aggregated state of a single connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionReport {
    pub connected: bool,
    pub services: Vec<aggregate::ServiceSnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub racp_sessions: Vec<session::SessionSummary>,
}

impl From<DeviceSnapshot> for ConnectionReport {
    fn from(snapshot: DeviceSnapshot) -> Self {
        Self {
            connected: snapshot.connected,
            services: snapshot.services,
            racp_sessions: snapshot.racp_sessions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRecord {
    pub characteristic: CharacteristicId,
    /// Lowercase hex without separators.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRequest {
    pub request: RacpRequest,
    pub reason: String,
}

/// Build a report with base fields filled and no devices.
pub fn make_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "gattlens".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        events_total: 0,
        devices: Vec::new(),
    }
}
