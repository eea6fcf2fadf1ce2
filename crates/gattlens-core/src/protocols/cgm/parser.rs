use serde::Serialize;

use super::layout;
use crate::protocols::common::{ByteCursor, DecodeError, SFLOAT_LEN, bit};

/// Raw sensor status annunciation octets.
///
/// Octets that were not transmitted are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CgmSensorStatus {
    pub warning: u8,
    pub cal_temp: u8,
    pub status: u8,
}

impl CgmSensorStatus {
    pub fn session_stopped(&self) -> bool {
        bit(self.status, 0)
    }

    pub fn device_battery_low(&self) -> bool {
        bit(self.status, 1)
    }

    pub fn sensor_malfunction(&self) -> bool {
        bit(self.status, 3)
    }

    pub fn time_sync_required(&self) -> bool {
        bit(self.cal_temp, 0)
    }

    pub fn calibration_required(&self) -> bool {
        bit(self.cal_temp, 3)
    }

    pub fn below_patient_low(&self) -> bool {
        bit(self.warning, 0)
    }

    pub fn above_patient_high(&self) -> bool {
        bit(self.warning, 1)
    }

    pub fn below_hypo_level(&self) -> bool {
        bit(self.warning, 2)
    }

    pub fn above_hyper_level(&self) -> bool {
        bit(self.warning, 3)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CgmMeasurement {
    /// mg/dL.
    pub glucose_concentration: f32,
    /// Minutes since the session started.
    pub time_offset: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_status: Option<CgmSensorStatus>,
    /// mg/dL/min.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<f32>,
    /// Percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,
    pub crc_present: bool,
}

/// Decode every record packed into one CGM Measurement notification.
///
/// A malformed record fails the whole notification.
pub fn parse_cgm_measurements(payload: &[u8]) -> Result<Vec<CgmMeasurement>, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::RECORD_MIN_LEN)?;

    let mut records = Vec::new();
    while cursor.remaining() > 0 {
        let size = usize::from(cursor.peek_flags()?);
        cursor.require(size.max(layout::RECORD_MIN_LEN))?;
        let record = cursor.read_bytes(size.max(layout::RECORD_MIN_LEN))?;
        records.push(parse_record(record)?);
    }
    Ok(records)
}

fn parse_record(record: &[u8]) -> Result<CgmMeasurement, DecodeError> {
    let mut cursor = ByteCursor::new(record);
    let size = usize::from(cursor.read_u8()?);
    let flags = cursor.read_u8()?;
    let has_trend = bit(flags, layout::FLAG_TREND);
    let has_quality = bit(flags, layout::FLAG_QUALITY);
    let has_warning = bit(flags, layout::FLAG_WARNING_OCTET);
    let has_cal_temp = bit(flags, layout::FLAG_CAL_TEMP_OCTET);
    let has_status = bit(flags, layout::FLAG_STATUS_OCTET);

    let expected = layout::RECORD_MIN_LEN
        + [has_warning, has_cal_temp, has_status]
            .iter()
            .filter(|present| **present)
            .count()
        + if has_trend { SFLOAT_LEN } else { 0 }
        + if has_quality { SFLOAT_LEN } else { 0 };
    if size < expected {
        return Err(DecodeError::TruncatedPayload {
            needed: expected,
            actual: size,
        });
    }
    let crc_present = match size - expected {
        0 => false,
        layout::E2E_CRC_LEN => true,
        _ => {
            return Err(DecodeError::InvalidLength {
                expected,
                actual: size,
            });
        }
    };

    let glucose_concentration = cursor.read_sfloat()?;
    let time_offset = cursor.read_u16_le()?;
    let sensor_status = if has_warning || has_cal_temp || has_status {
        let mut status = CgmSensorStatus::default();
        if has_warning {
            status.warning = cursor.read_u8()?;
        }
        if has_cal_temp {
            status.cal_temp = cursor.read_u8()?;
        }
        if has_status {
            status.status = cursor.read_u8()?;
        }
        Some(status)
    } else {
        None
    };
    let trend = if has_trend {
        Some(cursor.read_sfloat()?)
    } else {
        None
    };
    let quality = if has_quality {
        Some(cursor.read_sfloat()?)
    } else {
        None
    };

    Ok(CgmMeasurement {
        glucose_concentration,
        time_offset,
        sensor_status,
        trend,
        quality,
        crc_present,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CgmStatus {
    pub time_offset: u16,
    pub sensor_status: CgmSensorStatus,
}

pub fn parse_cgm_status(payload: &[u8]) -> Result<CgmStatus, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::STATUS_LEN)?;
    let time_offset = cursor.read_u16_le()?;
    let status = cursor.read_u8()?;
    let cal_temp = cursor.read_u8()?;
    let warning = cursor.read_u8()?;
    Ok(CgmStatus {
        time_offset,
        sensor_status: CgmSensorStatus {
            warning,
            cal_temp,
            status,
        },
    })
}
