//! Immediate Alert / Link Loss alert level and Tx Power Level.

use crate::protocols::common::{ByteCursor, DecodeError, wire_codes};

const ALERT_LEVEL_LEN: usize = 1;
const TX_POWER_LEN: usize = 1;

wire_codes! {
    /// Alert level written to (or read from) the Alert Level characteristic.
    ///
    /// The wire calls level 1 "mild"; it is presented as `Medium`.
    AlertLevel, "alert level" {
        None = 0,
        Medium = 1,
        High = 2,
    }
}

pub fn parse_alert_level(payload: &[u8]) -> Result<AlertLevel, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(ALERT_LEVEL_LEN)?;
    AlertLevel::from_code(cursor.read_u8()?)
}

pub fn encode_alert_level(level: AlertLevel) -> [u8; ALERT_LEVEL_LEN] {
    [level.code()]
}

/// Transmit power in dBm.
pub fn parse_tx_power_level(payload: &[u8]) -> Result<i8, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(TX_POWER_LEN)?;
    cursor.read_i8()
}

#[cfg(test)]
mod tests {
    use super::{AlertLevel, encode_alert_level, parse_alert_level, parse_tx_power_level};
    use crate::protocols::common::DecodeError;

    #[test]
    fn alert_level_round_trips() {
        for level in [AlertLevel::None, AlertLevel::Medium, AlertLevel::High] {
            assert_eq!(parse_alert_level(&encode_alert_level(level)).unwrap(), level);
        }
    }

    #[test]
    fn mild_is_medium() {
        assert_eq!(parse_alert_level(&[0x01]).unwrap(), AlertLevel::Medium);
        assert_eq!(encode_alert_level(AlertLevel::High), [0x02]);
    }

    #[test]
    fn unknown_alert_level_fails() {
        let err = parse_alert_level(&[0x03]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnrecognizedCode {
                field: "alert level",
                code: 3
            }
        ));
        assert!(parse_alert_level(&[]).is_err());
    }

    #[test]
    fn tx_power_is_signed() {
        assert_eq!(parse_tx_power_level(&[0xf4]).unwrap(), -12);
        assert_eq!(parse_tx_power_level(&[0x04]).unwrap(), 4);
    }
}
