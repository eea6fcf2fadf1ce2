pub const FLAGS_LEN: usize = 1;
pub const MIN_LEN: usize = FLAGS_LEN + 1;

pub const FLAG_VALUE_FORMAT_U16: u32 = 0;
pub const FLAG_CONTACT_DETECTED: u32 = 1;
pub const FLAG_CONTACT_SUPPORTED: u32 = 2;
pub const FLAG_ENERGY_EXPENDED: u32 = 3;
pub const FLAG_RR_INTERVALS: u32 = 4;

pub const ENERGY_EXPENDED_LEN: usize = 2;
pub const RR_INTERVAL_LEN: usize = 2;
/// RR intervals are transmitted in 1/1024 s.
pub const RR_INTERVAL_RESOLUTION: f32 = 1024.0;
