//! Vendor throughput test characteristic.
//!
//! Exactly three little-endian u32 counters; any other length is rejected.

use serde::Serialize;

use crate::protocols::common::{ByteCursor, DecodeError};

pub const THROUGHPUT_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThroughputMetrics {
    pub gatt_writes: u32,
    pub total_bytes: u32,
    pub bits_per_second: u32,
}

pub fn parse_throughput(payload: &[u8]) -> Result<ThroughputMetrics, DecodeError> {
    if payload.len() != THROUGHPUT_LEN {
        return Err(DecodeError::InvalidLength {
            expected: THROUGHPUT_LEN,
            actual: payload.len(),
        });
    }
    let mut cursor = ByteCursor::new(payload);
    Ok(ThroughputMetrics {
        gatt_writes: cursor.read_u32_le()?,
        total_bytes: cursor.read_u32_le()?,
        bits_per_second: cursor.read_u32_le()?,
    })
}
