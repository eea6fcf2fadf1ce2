pub const FLAGS_LEN: usize = 1;

pub const CSC_FLAG_WHEEL: u32 = 0;
pub const CSC_FLAG_CRANK: u32 = 1;
pub const CSC_WHEEL_LEN: usize = 4 + 2;
pub const CSC_CRANK_LEN: usize = 2 + 2;

pub const RSC_FLAG_STRIDE: u32 = 0;
pub const RSC_FLAG_DISTANCE: u32 = 1;
pub const RSC_FLAG_RUNNING: u32 = 2;
/// Flags, speed and cadence.
pub const RSC_MIN_LEN: usize = FLAGS_LEN + 2 + 1;
pub const RSC_STRIDE_LEN: usize = 2;
pub const RSC_DISTANCE_LEN: usize = 4;

/// Event times tick at 1/1024 s.
pub const EVENT_TIME_RESOLUTION: f64 = 1024.0;
/// RSC speed is transmitted in 1/256 m/s.
pub const RSC_SPEED_RESOLUTION: f32 = 256.0;

pub const SENSOR_LOCATION_LEN: usize = 1;
