use crate::protocols::common::{DATE_TIME_LEN, SFLOAT_LEN};

pub const FLAGS_LEN: usize = 1;
pub const SEQUENCE_LEN: usize = 2;

/// Flags, sequence number and base time.
pub const MEASUREMENT_MIN_LEN: usize = FLAGS_LEN + SEQUENCE_LEN + DATE_TIME_LEN;

pub const FLAG_TIME_OFFSET: u32 = 0;
pub const FLAG_CONCENTRATION: u32 = 1;
pub const FLAG_UNIT_MOL_PER_L: u32 = 2;
pub const FLAG_SENSOR_STATUS: u32 = 3;
pub const FLAG_CONTEXT_FOLLOWS: u32 = 4;

pub const TIME_OFFSET_LEN: usize = 2;
pub const CONCENTRATION_LEN: usize = SFLOAT_LEN + 1;
pub const SENSOR_STATUS_LEN: usize = 2;

/// Flags and sequence number.
pub const CONTEXT_MIN_LEN: usize = FLAGS_LEN + SEQUENCE_LEN;

pub const CONTEXT_FLAG_CARBOHYDRATE: u32 = 0;
pub const CONTEXT_FLAG_MEAL: u32 = 1;
pub const CONTEXT_FLAG_TESTER_HEALTH: u32 = 2;
pub const CONTEXT_FLAG_EXERCISE: u32 = 3;
pub const CONTEXT_FLAG_MEDICATION: u32 = 4;
pub const CONTEXT_FLAG_MEDICATION_LITERS: u32 = 5;
pub const CONTEXT_FLAG_HBA1C: u32 = 6;
pub const CONTEXT_FLAG_EXTENDED: u32 = 7;

pub const EXTENDED_FLAGS_LEN: usize = 1;
pub const CARBOHYDRATE_LEN: usize = 1 + SFLOAT_LEN;
pub const MEAL_LEN: usize = 1;
pub const TESTER_HEALTH_LEN: usize = 1;
pub const EXERCISE_LEN: usize = 3;
pub const MEDICATION_LEN: usize = 1 + SFLOAT_LEN;
pub const HBA1C_LEN: usize = SFLOAT_LEN;

/// Exercise duration 0xFFFF means "overrun".
pub const EXERCISE_DURATION_OVERRUN: u16 = 0xffff;
