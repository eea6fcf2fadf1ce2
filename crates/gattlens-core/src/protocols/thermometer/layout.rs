use crate::protocols::common::{DATE_TIME_LEN, FLOAT_LEN};

pub const FLAGS_LEN: usize = 1;
pub const MIN_LEN: usize = FLAGS_LEN + FLOAT_LEN;

pub const FLAG_FAHRENHEIT: u32 = 0;
pub const FLAG_TIMESTAMP: u32 = 1;
pub const FLAG_TEMPERATURE_TYPE: u32 = 2;

pub const TIMESTAMP_LEN: usize = DATE_TIME_LEN;
pub const TEMPERATURE_TYPE_LEN: usize = 1;
