use thiserror::Error;

use crate::gatt::ServiceKind;
use crate::source::{DeviceId, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RacpError {
    #[error("{service} already has a stored-record session in progress")]
    SessionBusy { service: ServiceKind },
    #[error("{service} has no stored-record session to abort")]
    NoActiveSession { service: ServiceKind },
    #[error("{service} does not expose a record access control point")]
    Unsupported { service: ServiceKind },
    #[error("device {0} is not connected")]
    NotConnected(DeviceId),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
