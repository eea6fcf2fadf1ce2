use serde::Serialize;
use time::PrimitiveDateTime;

use super::codes::{GlucoseType, SampleLocation};
use super::layout;
use crate::protocols::common::{ByteCursor, DecodeError, bit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationUnit {
    KgPerL,
    MolPerL,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlucoseSample {
    pub concentration: f32,
    pub unit: ConcentrationUnit,
    pub glucose_type: GlucoseType,
    pub sample_location: SampleLocation,
}

impl GlucoseSample {
    pub fn mg_per_dl(&self) -> Option<f32> {
        match self.unit {
            ConcentrationUnit::KgPerL => Some(self.concentration * 100_000.0),
            ConcentrationUnit::MolPerL => None,
        }
    }

    pub fn mmol_per_l(&self) -> Option<f32> {
        match self.unit {
            ConcentrationUnit::MolPerL => Some(self.concentration * 1000.0),
            ConcentrationUnit::KgPerL => None,
        }
    }
}

/// Sensor status annunciation bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SensorStatus {
    pub device_battery_low: bool,
    pub sensor_malfunction: bool,
    pub sample_size_insufficient: bool,
    pub strip_insertion_error: bool,
    pub strip_type_incorrect: bool,
    pub result_too_high: bool,
    pub result_too_low: bool,
    pub temperature_too_high: bool,
    pub temperature_too_low: bool,
    pub read_interrupted: bool,
    pub general_device_fault: bool,
    pub time_fault: bool,
}

impl SensorStatus {
    pub fn from_bits(bits: u16) -> Self {
        Self {
            device_battery_low: bit(bits, 0),
            sensor_malfunction: bit(bits, 1),
            sample_size_insufficient: bit(bits, 2),
            strip_insertion_error: bit(bits, 3),
            strip_type_incorrect: bit(bits, 4),
            result_too_high: bit(bits, 5),
            result_too_low: bit(bits, 6),
            temperature_too_high: bit(bits, 7),
            temperature_too_low: bit(bits, 8),
            read_interrupted: bit(bits, 9),
            general_device_fault: bit(bits, 10),
            time_fault: bit(bits, 11),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlucoseMeasurement {
    pub sequence_number: u16,
    /// Absent when the device clock is not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_time: Option<PrimitiveDateTime>,
    /// Minutes relative to `base_time`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_offset: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<GlucoseSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_status: Option<SensorStatus>,
    pub context_follows: bool,
}

impl GlucoseMeasurement {
    /// Base time with the time offset applied.
    pub fn effective_time(&self) -> Option<PrimitiveDateTime> {
        let offset = time::Duration::minutes(i64::from(self.time_offset.unwrap_or(0)));
        self.base_time.map(|base| base.saturating_add(offset))
    }
}

pub fn parse_glucose_measurement(payload: &[u8]) -> Result<GlucoseMeasurement, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::MEASUREMENT_MIN_LEN)?;

    let flags = cursor.read_u8()?;
    let has_offset = bit(flags, layout::FLAG_TIME_OFFSET);
    let has_sample = bit(flags, layout::FLAG_CONCENTRATION);
    let has_status = bit(flags, layout::FLAG_SENSOR_STATUS);
    let unit = if bit(flags, layout::FLAG_UNIT_MOL_PER_L) {
        ConcentrationUnit::MolPerL
    } else {
        ConcentrationUnit::KgPerL
    };

    let mut needed = layout::MEASUREMENT_MIN_LEN - layout::FLAGS_LEN;
    if has_offset {
        needed += layout::TIME_OFFSET_LEN;
    }
    if has_sample {
        needed += layout::CONCENTRATION_LEN;
    }
    if has_status {
        needed += layout::SENSOR_STATUS_LEN;
    }
    cursor.require(needed)?;

    let sequence_number = cursor.read_u16_le()?;
    let base_time = cursor.read_date_time()?;
    let time_offset = if has_offset {
        Some(cursor.read_i16_le()?)
    } else {
        None
    };
    let sample = if has_sample {
        let concentration = cursor.read_sfloat()?;
        let type_location = cursor.read_u8()?;
        Some(GlucoseSample {
            concentration,
            unit,
            glucose_type: GlucoseType::from_code(type_location & 0x0f)?,
            sample_location: SampleLocation::from_code(type_location >> 4)?,
        })
    } else {
        None
    };
    let sensor_status = if has_status {
        Some(SensorStatus::from_bits(cursor.read_u16_le()?))
    } else {
        None
    };

    Ok(GlucoseMeasurement {
        sequence_number,
        base_time,
        time_offset,
        sample,
        sensor_status,
        context_follows: bit(flags, layout::FLAG_CONTEXT_FOLLOWS),
    })
}
