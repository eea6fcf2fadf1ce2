use thiserror::Error;

/// Errors returned by characteristic decoding.
///
/// Every decoder returns one of these instead of a partially populated
/// record. The aggregation layer logs and drops them.
///
/// # Examples
/// ```
/// use gattlens_core::DecodeError;
///
/// let err = DecodeError::TruncatedPayload { needed: 4, actual: 2 };
/// assert!(err.to_string().contains("payload too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TruncatedPayload { needed: usize, actual: usize },
    #[error("read past end of payload: {width} bytes at offset {offset}, {remaining} remaining")]
    OutOfBounds {
        offset: usize,
        width: usize,
        remaining: usize,
    },
    #[error("unrecognized {field} code: {code:#04x}")]
    UnrecognizedCode { field: &'static str, code: u32 },
    #[error("invalid payload length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error(
        "invalid date-time: {year:04}-{month:02}-{day:02} {hours:02}:{minutes:02}:{seconds:02}"
    )]
    InvalidDateTime {
        year: u16,
        month: u8,
        day: u8,
        hours: u8,
        minutes: u8,
        seconds: u8,
    },
}

impl DecodeError {
    pub(crate) fn unrecognized(field: &'static str, code: impl Into<u32>) -> Self {
        DecodeError::UnrecognizedCode {
            field,
            code: code.into(),
        }
    }
}
