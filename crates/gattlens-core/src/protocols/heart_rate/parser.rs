use serde::Serialize;

use super::layout;
use crate::protocols::common::{ByteCursor, DecodeError, bit, wire_codes};

/// Sensor contact state carried in flag bits 1–2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorContact {
    Unsupported,
    NotDetected,
    Detected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeartRateMeasurement {
    /// Beats per minute.
    pub heart_rate: u16,
    /// `true` only when contact is both supported and detected.
    pub sensor_contact: bool,
    pub contact_status: SensorContact,
    /// Cumulative energy expended in kilojoules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_expended: Option<u16>,
    /// Raw RR intervals in 1/1024 s.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rr_intervals: Vec<u16>,
}

impl HeartRateMeasurement {
    pub fn rr_intervals_ms(&self) -> Vec<f32> {
        self.rr_intervals
            .iter()
            .map(|rr| f32::from(*rr) * 1000.0 / layout::RR_INTERVAL_RESOLUTION)
            .collect()
    }
}

pub fn parse_heart_rate_measurement(payload: &[u8]) -> Result<HeartRateMeasurement, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::MIN_LEN)?;

    let flags = cursor.read_u8()?;
    let wide_value = bit(flags, layout::FLAG_VALUE_FORMAT_U16);
    let has_energy = bit(flags, layout::FLAG_ENERGY_EXPENDED);
    let has_rr = bit(flags, layout::FLAG_RR_INTERVALS);
    let contact_status = match (
        bit(flags, layout::FLAG_CONTACT_SUPPORTED),
        bit(flags, layout::FLAG_CONTACT_DETECTED),
    ) {
        (true, true) => SensorContact::Detected,
        (true, false) => SensorContact::NotDetected,
        (false, _) => SensorContact::Unsupported,
    };

    let value_len = if wide_value { 2 } else { 1 };
    let energy_len = if has_energy {
        layout::ENERGY_EXPENDED_LEN
    } else {
        0
    };
    cursor.require(value_len + energy_len)?;

    let heart_rate = if wide_value {
        cursor.read_u16_le()?
    } else {
        u16::from(cursor.read_u8()?)
    };
    let energy_expended = if has_energy {
        Some(cursor.read_u16_le()?)
    } else {
        None
    };

    let mut rr_intervals = Vec::new();
    if has_rr {
        let remaining = cursor.remaining();
        if remaining % layout::RR_INTERVAL_LEN != 0 {
            return Err(DecodeError::TruncatedPayload {
                needed: payload.len() + 1,
                actual: payload.len(),
            });
        }
        rr_intervals.reserve(remaining / layout::RR_INTERVAL_LEN);
        while cursor.remaining() > 0 {
            rr_intervals.push(cursor.read_u16_le()?);
        }
    }

    Ok(HeartRateMeasurement {
        heart_rate,
        sensor_contact: contact_status == SensorContact::Detected,
        contact_status,
        energy_expended,
        rr_intervals,
    })
}

wire_codes! {
    BodySensorLocation, "body sensor location" {
        Other = 0,
        Chest = 1,
        Wrist = 2,
        Finger = 3,
        Hand = 4,
        EarLobe = 5,
        Foot = 6,
    }
}

pub fn parse_body_sensor_location(payload: &[u8]) -> Result<BodySensorLocation, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(1)?;
    BodySensorLocation::from_code(cursor.read_u8()?)
}
