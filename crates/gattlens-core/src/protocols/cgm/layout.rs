use crate::protocols::common::SFLOAT_LEN;

/// Size, flags, glucose concentration and time offset.
pub const RECORD_MIN_LEN: usize = 1 + 1 + SFLOAT_LEN + 2;
pub const E2E_CRC_LEN: usize = 2;

pub const FLAG_TREND: u32 = 0;
pub const FLAG_QUALITY: u32 = 1;
pub const FLAG_WARNING_OCTET: u32 = 5;
pub const FLAG_CAL_TEMP_OCTET: u32 = 6;
pub const FLAG_STATUS_OCTET: u32 = 7;

/// Time offset plus the three status octets.
pub const STATUS_LEN: usize = 2 + 3;

pub const OPS_OPCODE_COMMUNICATION_INTERVAL_RESPONSE: u8 = 0x03;
pub const OPS_OPCODE_CALIBRATION_VALUE_RESPONSE: u8 = 0x06;
pub const OPS_OPCODE_RESPONSE_CODE: u8 = 0x1c;

pub const CALIBRATION_RESPONSE_LEN: usize = 1 + SFLOAT_LEN + 2 + 1 + 2 + 2 + 1;
pub const COMMUNICATION_INTERVAL_RESPONSE_LEN: usize = 1 + 1;
pub const RESPONSE_CODE_LEN: usize = 3;

pub const CALIBRATION_REJECTED: u32 = 0;
pub const CALIBRATION_OUT_OF_RANGE: u32 = 1;
pub const CALIBRATION_PENDING: u32 = 2;
