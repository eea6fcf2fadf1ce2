//! Battery Level.

use crate::protocols::common::{ByteCursor, DecodeError};

const BATTERY_LEVEL_LEN: usize = 1;
const MAX_PERCENT: u8 = 100;

/// Remaining charge in percent.
pub fn parse_battery_level(payload: &[u8]) -> Result<u8, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(BATTERY_LEVEL_LEN)?;
    let level = cursor.read_u8()?;
    if level > MAX_PERCENT {
        return Err(DecodeError::unrecognized("battery level", level));
    }
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::parse_battery_level;

    #[test]
    fn parse_percent() {
        assert_eq!(parse_battery_level(&[0x00]).unwrap(), 0);
        assert_eq!(parse_battery_level(&[0x64]).unwrap(), 100);
    }

    #[test]
    fn above_hundred_fails() {
        let err = parse_battery_level(&[0x65]).unwrap_err();
        assert!(err.to_string().contains("unrecognized battery level"));
    }

    #[test]
    fn empty_payload_fails() {
        let err = parse_battery_level(&[]).unwrap_err();
        assert!(err.to_string().contains("payload too short"));
    }
}
