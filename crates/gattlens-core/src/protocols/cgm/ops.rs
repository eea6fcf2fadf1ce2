use serde::Serialize;

use super::layout;
use crate::protocols::common::{ByteCursor, DecodeError, bit, wire_codes};
use crate::protocols::glucose::{GlucoseType, SampleLocation};

wire_codes! {
    OpsResponseCode, "ops response code" {
        Success = 1,
        OpCodeNotSupported = 2,
        InvalidOperand = 3,
        ProcedureNotCompleted = 4,
        ParameterOutOfRange = 5,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CalibrationStatus {
    pub rejected: bool,
    pub out_of_range: bool,
    pub pending: bool,
}

impl CalibrationStatus {
    pub fn from_bits(bits: u8) -> Self {
        Self {
            rejected: bit(bits, layout::CALIBRATION_REJECTED),
            out_of_range: bit(bits, layout::CALIBRATION_OUT_OF_RANGE),
            pending: bit(bits, layout::CALIBRATION_PENDING),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CgmCalibration {
    /// mg/dL.
    pub glucose_concentration: f32,
    /// Minutes since the session started.
    pub calibration_time: u16,
    pub glucose_type: GlucoseType,
    pub sample_location: SampleLocation,
    pub next_calibration_time: u16,
    pub record_number: u16,
    pub status: CalibrationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpsResponse {
    Calibration(CgmCalibration),
    CommunicationInterval { minutes: u8 },
    ResponseCode { request_opcode: u8, code: OpsResponseCode },
}

/// Decode an indication from the CGM Specific Ops Control Point.
pub fn parse_ops_response(payload: &[u8]) -> Result<OpsResponse, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    let opcode = cursor.peek_flags()?;
    match opcode {
        layout::OPS_OPCODE_CALIBRATION_VALUE_RESPONSE => {
            cursor.require(layout::CALIBRATION_RESPONSE_LEN)?;
            cursor.read_u8()?;
            let glucose_concentration = cursor.read_sfloat()?;
            let calibration_time = cursor.read_u16_le()?;
            let type_location = cursor.read_u8()?;
            let glucose_type = GlucoseType::from_code(type_location & 0x0f)?;
            let sample_location = SampleLocation::from_code(type_location >> 4)?;
            let next_calibration_time = cursor.read_u16_le()?;
            let record_number = cursor.read_u16_le()?;
            let status = CalibrationStatus::from_bits(cursor.read_u8()?);
            Ok(OpsResponse::Calibration(CgmCalibration {
                glucose_concentration,
                calibration_time,
                glucose_type,
                sample_location,
                next_calibration_time,
                record_number,
                status,
            }))
        }
        layout::OPS_OPCODE_COMMUNICATION_INTERVAL_RESPONSE => {
            cursor.require(layout::COMMUNICATION_INTERVAL_RESPONSE_LEN)?;
            cursor.read_u8()?;
            Ok(OpsResponse::CommunicationInterval {
                minutes: cursor.read_u8()?,
            })
        }
        layout::OPS_OPCODE_RESPONSE_CODE => {
            cursor.require(layout::RESPONSE_CODE_LEN)?;
            cursor.read_u8()?;
            let request_opcode = cursor.read_u8()?;
            let code = OpsResponseCode::from_code(cursor.read_u8()?)?;
            Ok(OpsResponse::ResponseCode {
                request_opcode,
                code,
            })
        }
        other => Err(DecodeError::unrecognized("ops opcode", other)),
    }
}
