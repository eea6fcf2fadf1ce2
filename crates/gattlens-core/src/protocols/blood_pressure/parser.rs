use serde::Serialize;
use time::PrimitiveDateTime;

use super::layout;
use crate::protocols::common::{ByteCursor, DecodeError, bit, wire_codes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureUnit {
    Mmhg,
    Kpa,
}

wire_codes! {
    PulseRateRange, "pulse rate range" {
        InRange = 0,
        AboveUpperLimit = 1,
        BelowLowerLimit = 2,
    }
}

/// Conditions reported by the measurement status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeasurementStatus {
    pub body_movement_detected: bool,
    pub cuff_too_loose: bool,
    pub irregular_pulse_detected: bool,
    pub pulse_rate_range: PulseRateRange,
    pub improper_measurement_position: bool,
}

impl MeasurementStatus {
    pub fn from_bits(bits: u16) -> Result<Self, DecodeError> {
        let range = (bits >> layout::STATUS_PULSE_RANGE_SHIFT) & layout::STATUS_PULSE_RANGE_MASK;
        Ok(Self {
            body_movement_detected: bit(bits, layout::STATUS_BODY_MOVEMENT),
            cuff_too_loose: bit(bits, layout::STATUS_CUFF_TOO_LOOSE),
            irregular_pulse_detected: bit(bits, layout::STATUS_IRREGULAR_PULSE),
            pulse_rate_range: PulseRateRange::from_code(range as u8)?,
            improper_measurement_position: bit(bits, layout::STATUS_IMPROPER_POSITION),
        })
    }

    pub fn pulse_rate_in_range(&self) -> bool {
        self.pulse_rate_range == PulseRateRange::InRange
    }

    pub fn pulse_rate_exceeds_upper_limit(&self) -> bool {
        self.pulse_rate_range == PulseRateRange::AboveUpperLimit
    }

    pub fn pulse_rate_below_lower_limit(&self) -> bool {
        self.pulse_rate_range == PulseRateRange::BelowLowerLimit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BloodPressureMeasurement {
    pub systolic: f32,
    pub diastolic: f32,
    pub mean_arterial_pressure: f32,
    pub unit: PressureUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<PrimitiveDateTime>,
    /// Beats per minute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MeasurementStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntermediateCuffPressure {
    pub cuff_pressure: f32,
    pub unit: PressureUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<PrimitiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MeasurementStatus>,
}

pub fn parse_blood_pressure_measurement(
    payload: &[u8],
) -> Result<BloodPressureMeasurement, DecodeError> {
    let fields = parse_fields(payload)?;
    Ok(BloodPressureMeasurement {
        systolic: fields.values[0],
        diastolic: fields.values[1],
        mean_arterial_pressure: fields.values[2],
        unit: fields.unit,
        timestamp: fields.timestamp,
        pulse_rate: fields.pulse_rate,
        user_id: fields.user_id,
        status: fields.status,
    })
}

/// The diastolic and mean arterial slots are unused on this
/// characteristic and are skipped.
pub fn parse_intermediate_cuff_pressure(
    payload: &[u8],
) -> Result<IntermediateCuffPressure, DecodeError> {
    let fields = parse_fields(payload)?;
    Ok(IntermediateCuffPressure {
        cuff_pressure: fields.values[0],
        unit: fields.unit,
        timestamp: fields.timestamp,
        pulse_rate: fields.pulse_rate,
        user_id: fields.user_id,
        status: fields.status,
    })
}

struct PressureFields {
    values: [f32; 3],
    unit: PressureUnit,
    timestamp: Option<PrimitiveDateTime>,
    pulse_rate: Option<f32>,
    user_id: Option<u8>,
    status: Option<MeasurementStatus>,
}

fn parse_fields(payload: &[u8]) -> Result<PressureFields, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::MIN_LEN)?;

    let flags = cursor.read_u8()?;
    let unit = if bit(flags, layout::FLAG_UNIT_KPA) {
        PressureUnit::Kpa
    } else {
        PressureUnit::Mmhg
    };
    let has_timestamp = bit(flags, layout::FLAG_TIMESTAMP);
    let has_pulse = bit(flags, layout::FLAG_PULSE_RATE);
    let has_user = bit(flags, layout::FLAG_USER_ID);
    let has_status = bit(flags, layout::FLAG_MEASUREMENT_STATUS);

    let mut needed = layout::MIN_LEN - layout::FLAGS_LEN;
    if has_timestamp {
        needed += layout::TIMESTAMP_LEN;
    }
    if has_pulse {
        needed += layout::PULSE_RATE_LEN;
    }
    if has_user {
        needed += layout::USER_ID_LEN;
    }
    if has_status {
        needed += layout::STATUS_LEN;
    }
    cursor.require(needed)?;

    let values = [
        cursor.read_sfloat()?,
        cursor.read_sfloat()?,
        cursor.read_sfloat()?,
    ];
    let timestamp = if has_timestamp {
        cursor.read_date_time()?
    } else {
        None
    };
    let pulse_rate = if has_pulse {
        Some(cursor.read_sfloat()?)
    } else {
        None
    };
    let user_id = if has_user {
        Some(cursor.read_u8()?).filter(|id| *id != layout::USER_ID_UNKNOWN)
    } else {
        None
    };
    let status = if has_status {
        Some(MeasurementStatus::from_bits(cursor.read_u16_le()?)?)
    } else {
        None
    };

    Ok(PressureFields {
        values,
        unit,
        timestamp,
        pulse_rate,
        user_id,
        status,
    })
}
