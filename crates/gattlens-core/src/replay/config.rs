use serde::{Deserialize, Serialize};

pub const DEFAULT_WHEEL_CIRCUMFERENCE_MM: u32 = 2340;
pub const DEFAULT_METADATA_CAPACITY: usize = 16;

/// Replay and aggregation settings. Every field has a default, so an empty
/// JSON object is a valid configuration.
///
/// # Examples
/// ```
/// use gattlens_core::ReplayConfig;
///
/// let config: ReplayConfig = serde_json::from_str(r#"{"wheel_circumference_mm": 2100}"#)?;
/// assert_eq!(config.wheel_circumference_mm, 2100);
/// assert_eq!(config.metadata_capacity, 16);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    /// Used to derive cycling speed and distance.
    pub wheel_circumference_mm: u32,
    /// Capacity of each metadata broadcast channel; slow subscribers lose
    /// the oldest updates beyond it.
    pub metadata_capacity: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            wheel_circumference_mm: DEFAULT_WHEEL_CIRCUMFERENCE_MM,
            metadata_capacity: DEFAULT_METADATA_CAPACITY,
        }
    }
}
