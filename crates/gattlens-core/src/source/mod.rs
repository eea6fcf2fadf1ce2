//! Transport boundary.
//!
//! The BLE link itself is outside this crate. Incoming traffic arrives as
//! [`TransportEvent`]s pulled from an [`EventSource`]; outgoing control-point
//! commands leave through a [`Transport`]. The transcript source replays a
//! recorded session from a text file.

mod transcript;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gatt::{CharacteristicId, ServiceKind};
use crate::protocols::racp::RacpRequest;

pub use transcript::reader::decode_hex;
pub use transcript::{TranscriptFileSource, TranscriptSource};

/// Opaque peripheral identifier (typically its address).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        DeviceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Connected {
        device: DeviceId,
    },
    /// Notification or indication payload.
    Payload {
        device: DeviceId,
        characteristic: CharacteristicId,
        data: Vec<u8>,
    },
    /// Host-issued stored-record request.
    Request {
        device: DeviceId,
        service: ServiceKind,
        request: RacpRequest,
    },
    /// Host-issued abort of the active stored-record session.
    Abort {
        device: DeviceId,
        service: ServiceKind,
    },
    Disconnected {
        device: DeviceId,
    },
}

impl TransportEvent {
    pub fn device(&self) -> &DeviceId {
        match self {
            TransportEvent::Connected { device }
            | TransportEvent::Payload { device, .. }
            | TransportEvent::Request { device, .. }
            | TransportEvent::Abort { device, .. }
            | TransportEvent::Disconnected { device } => device,
        }
    }
}

pub trait EventSource {
    fn next_event(&mut self) -> Result<Option<TransportEvent>, SourceError>;
}

/// Outgoing half of the link.
pub trait Transport {
    fn write_command(
        &mut self,
        device: &DeviceId,
        characteristic: CharacteristicId,
        command: &[u8],
    ) -> Result<(), TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("device {0} is not connected")]
    NotConnected(DeviceId),
    #[error("write to {characteristic} rejected: {reason}")]
    Rejected {
        characteristic: CharacteristicId,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("transcript line {line}: {message}")]
    Transcript { line: usize, message: String },
}

impl From<transcript::error::TranscriptError> for SourceError {
    fn from(value: transcript::error::TranscriptError) -> Self {
        match value {
            transcript::error::TranscriptError::Io(err) => SourceError::Io(err),
            transcript::error::TranscriptError::Syntax { line, message } => {
                SourceError::Transcript { line, message }
            }
        }
    }
}
