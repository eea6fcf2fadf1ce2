pub const FLAGS_LEN: usize = 1;
pub const QUALITY_LEN: usize = 1;
pub const ADDRESS_LEN: usize = 6;
pub const ADDRESS_TYPE_LEN: usize = 1;
/// Flags, quality, address and address type.
pub const HEADER_LEN: usize = FLAGS_LEN + QUALITY_LEN + ADDRESS_LEN + ADDRESS_TYPE_LEN;

pub const AZIMUTH_LEN: usize = HEADER_LEN + 2;
pub const ELEVATION_LEN: usize = HEADER_LEN + 1;
pub const DISTANCE_LEN: usize = HEADER_LEN + 2;

pub const FLAG_DISTANCE_MCPD: u32 = 0;
