use serde::Serialize;

use super::layout;
use crate::protocols::common::{ByteCursor, DecodeError, bit, wire_codes};

wire_codes! {
    /// Mounting position shared by the CSC and RSC services.
    SensorLocation, "sensor location" {
        Other = 0,
        TopOfShoe = 1,
        InShoe = 2,
        Hip = 3,
        FrontWheel = 4,
        LeftCrank = 5,
        RightCrank = 6,
        LeftPedal = 7,
        RightPedal = 8,
        FrontHub = 9,
        RearDropout = 10,
        Chainstay = 11,
        RearWheel = 12,
        RearHub = 13,
        Chest = 14,
        Spider = 15,
        ChainRing = 16,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WheelRevolutions {
    pub cumulative: u32,
    /// 1/1024 s, wraps at 64 s.
    pub last_event_time: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrankRevolutions {
    pub cumulative: u16,
    /// 1/1024 s, wraps at 64 s.
    pub last_event_time: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CscMeasurement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheel: Option<WheelRevolutions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crank: Option<CrankRevolutions>,
}

pub fn parse_csc_measurement(payload: &[u8]) -> Result<CscMeasurement, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::FLAGS_LEN)?;

    let flags = cursor.read_u8()?;
    let has_wheel = bit(flags, layout::CSC_FLAG_WHEEL);
    let has_crank = bit(flags, layout::CSC_FLAG_CRANK);
    let mut needed = 0;
    if has_wheel {
        needed += layout::CSC_WHEEL_LEN;
    }
    if has_crank {
        needed += layout::CSC_CRANK_LEN;
    }
    cursor.require(needed)?;

    let wheel = if has_wheel {
        Some(WheelRevolutions {
            cumulative: cursor.read_u32_le()?,
            last_event_time: cursor.read_u16_le()?,
        })
    } else {
        None
    };
    let crank = if has_crank {
        Some(CrankRevolutions {
            cumulative: cursor.read_u16_le()?,
            last_event_time: cursor.read_u16_le()?,
        })
    } else {
        None
    };
    Ok(CscMeasurement { wheel, crank })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RscMeasurement {
    /// Metres per second.
    pub speed: f32,
    /// Steps per minute.
    pub cadence: u8,
    /// Centimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stride_length: Option<u16>,
    /// Decimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<u32>,
    pub running: bool,
}

pub fn parse_rsc_measurement(payload: &[u8]) -> Result<RscMeasurement, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::RSC_MIN_LEN)?;

    let flags = cursor.read_u8()?;
    let has_stride = bit(flags, layout::RSC_FLAG_STRIDE);
    let has_distance = bit(flags, layout::RSC_FLAG_DISTANCE);
    let mut needed = layout::RSC_MIN_LEN - layout::FLAGS_LEN;
    if has_stride {
        needed += layout::RSC_STRIDE_LEN;
    }
    if has_distance {
        needed += layout::RSC_DISTANCE_LEN;
    }
    cursor.require(needed)?;

    let speed = f32::from(cursor.read_u16_le()?) / layout::RSC_SPEED_RESOLUTION;
    let cadence = cursor.read_u8()?;
    let stride_length = if has_stride {
        Some(cursor.read_u16_le()?)
    } else {
        None
    };
    let total_distance = if has_distance {
        Some(cursor.read_u32_le()?)
    } else {
        None
    };
    Ok(RscMeasurement {
        speed,
        cadence,
        stride_length,
        total_distance,
        running: bit(flags, layout::RSC_FLAG_RUNNING),
    })
}

pub fn parse_sensor_location(payload: &[u8]) -> Result<SensorLocation, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::SENSOR_LOCATION_LEN)?;
    SensorLocation::from_code(cursor.read_u8()?)
}
