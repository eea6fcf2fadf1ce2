use crate::protocols::common::{DATE_TIME_LEN, SFLOAT_LEN};

pub const FLAGS_LEN: usize = 1;
/// Flags plus the three mandatory pressure values.
pub const MIN_LEN: usize = FLAGS_LEN + 3 * SFLOAT_LEN;

pub const FLAG_UNIT_KPA: u32 = 0;
pub const FLAG_TIMESTAMP: u32 = 1;
pub const FLAG_PULSE_RATE: u32 = 2;
pub const FLAG_USER_ID: u32 = 3;
pub const FLAG_MEASUREMENT_STATUS: u32 = 4;

pub const TIMESTAMP_LEN: usize = DATE_TIME_LEN;
pub const PULSE_RATE_LEN: usize = SFLOAT_LEN;
pub const USER_ID_LEN: usize = 1;
pub const STATUS_LEN: usize = 2;

pub const STATUS_BODY_MOVEMENT: u32 = 0;
pub const STATUS_CUFF_TOO_LOOSE: u32 = 1;
pub const STATUS_IRREGULAR_PULSE: u32 = 2;
pub const STATUS_PULSE_RANGE_SHIFT: u16 = 3;
pub const STATUS_PULSE_RANGE_MASK: u16 = 0b11;
pub const STATUS_IMPROPER_POSITION: u32 = 5;

/// User id 0xFF means "unknown user".
pub const USER_ID_UNKNOWN: u8 = 0xff;
