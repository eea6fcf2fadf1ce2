use serde::Serialize;
use time::PrimitiveDateTime;

use super::layout;
use crate::protocols::common::{ByteCursor, DecodeError, bit, wire_codes};

wire_codes! {
    TemperatureType, "temperature type" {
        Armpit = 1,
        Body = 2,
        Ear = 3,
        Finger = 4,
        GastroIntestinalTract = 5,
        Mouth = 6,
        Rectum = 7,
        Toe = 8,
        Tympanum = 9,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureMeasurement {
    pub value: f32,
    pub unit: TemperatureUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<PrimitiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_type: Option<TemperatureType>,
}

impl TemperatureMeasurement {
    pub fn celsius(&self) -> f32 {
        match self.unit {
            TemperatureUnit::Celsius => self.value,
            TemperatureUnit::Fahrenheit => (self.value - 32.0) * 5.0 / 9.0,
        }
    }
}

pub fn parse_temperature_measurement(
    payload: &[u8],
) -> Result<TemperatureMeasurement, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::MIN_LEN)?;

    let flags = cursor.read_u8()?;
    let has_timestamp = bit(flags, layout::FLAG_TIMESTAMP);
    let has_type = bit(flags, layout::FLAG_TEMPERATURE_TYPE);
    let mut needed = layout::MIN_LEN - layout::FLAGS_LEN;
    if has_timestamp {
        needed += layout::TIMESTAMP_LEN;
    }
    if has_type {
        needed += layout::TEMPERATURE_TYPE_LEN;
    }
    cursor.require(needed)?;

    let value = cursor.read_float()?;
    let timestamp = if has_timestamp {
        cursor.read_date_time()?
    } else {
        None
    };
    let temperature_type = if has_type {
        Some(TemperatureType::from_code(cursor.read_u8()?)?)
    } else {
        None
    };

    Ok(TemperatureMeasurement {
        value,
        unit: if bit(flags, layout::FLAG_FAHRENHEIT) {
            TemperatureUnit::Fahrenheit
        } else {
            TemperatureUnit::Celsius
        },
        timestamp,
        temperature_type,
    })
}

pub fn parse_temperature_type(payload: &[u8]) -> Result<TemperatureType, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::TEMPERATURE_TYPE_LEN)?;
    TemperatureType::from_code(cursor.read_u8()?)
}

#[cfg(test)]
mod tests {
    use super::{TemperatureType, TemperatureUnit, parse_temperature_measurement, parse_temperature_type};
    use crate::protocols::common::DecodeError;
    use time::macros::datetime;

    #[test]
    fn parse_celsius_value_only() {
        // 3650 * 10^-2
        let payload = [0x00, 0x42, 0x0e, 0x00, 0xfe];
        let parsed = parse_temperature_measurement(&payload).unwrap();
        assert_eq!(parsed.unit, TemperatureUnit::Celsius);
        assert!((parsed.value - 36.5).abs() < 1e-4);
        assert!(parsed.timestamp.is_none());
        assert!(parsed.temperature_type.is_none());
    }

    #[test]
    fn parse_fahrenheit_with_timestamp_and_type() {
        let payload = [
            0x07, // fahrenheit, timestamp, type
            0xd5, 0x03, 0x00, 0xff, // 981 * 10^-1
            0xe8, 0x07, 0x01, 0x02, 0x08, 0x00, 0x00, // 2024-01-02 08:00:00
            0x06, // mouth
        ];
        let parsed = parse_temperature_measurement(&payload).unwrap();
        assert_eq!(parsed.unit, TemperatureUnit::Fahrenheit);
        assert!((parsed.value - 98.1).abs() < 1e-4);
        assert!((parsed.celsius() - 36.722).abs() < 0.01);
        assert_eq!(parsed.timestamp, Some(datetime!(2024-01-02 08:00:00)));
        assert_eq!(parsed.temperature_type, Some(TemperatureType::Mouth));
    }

    #[test]
    fn unset_clock_timestamp_is_absent() {
        let payload = [0x02, 0x42, 0x0e, 0x00, 0xfe, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let parsed = parse_temperature_measurement(&payload).unwrap();
        assert!((parsed.value - 36.5).abs() < 1e-4);
        assert_eq!(parsed.timestamp, None);
    }

    #[test]
    fn flagged_type_must_be_present() {
        let err = parse_temperature_measurement(&[0x04, 0x42, 0x0e, 0x00, 0xfe]).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedPayload { needed: 6, actual: 5 });
    }

    #[test]
    fn parse_type_characteristic() {
        assert_eq!(parse_temperature_type(&[0x09]).unwrap(), TemperatureType::Tympanum);
        let err = parse_temperature_type(&[0x0a]).unwrap_err();
        assert!(err.to_string().contains("unrecognized temperature type"));
        assert!(parse_temperature_type(&[]).is_err());
    }
}
