use time::{Date, Month, PrimitiveDateTime, Time};

use super::error::DecodeError;
use super::reader::ByteCursor;

/// Wire length of the Date Time characteristic structure.
pub const DATE_TIME_LEN: usize = 7;

impl ByteCursor<'_> {
    /// Read a Date Time structure: u16 year, then month, day, hours,
    /// minutes and seconds as single bytes.
    ///
    /// A zero year, month or day means "not known" and reads as `None`.
    pub fn read_date_time(&mut self) -> Result<Option<PrimitiveDateTime>, DecodeError> {
        self.require(DATE_TIME_LEN)?;
        let year = self.read_u16_le()?;
        let month = self.read_u8()?;
        let day = self.read_u8()?;
        let hours = self.read_u8()?;
        let minutes = self.read_u8()?;
        let seconds = self.read_u8()?;

        if year == 0 || month == 0 || day == 0 {
            return Ok(None);
        }

        let invalid = DecodeError::InvalidDateTime {
            year,
            month,
            day,
            hours,
            minutes,
            seconds,
        };
        let month = Month::try_from(month).map_err(|_| invalid.clone())?;
        let date =
            Date::from_calendar_date(i32::from(year), month, day).map_err(|_| invalid.clone())?;
        let time = Time::from_hms(hours, minutes, seconds).map_err(|_| invalid)?;
        Ok(Some(PrimitiveDateTime::new(date, time)))
    }
}

pub fn encode_date_time(value: PrimitiveDateTime) -> [u8; DATE_TIME_LEN] {
    let year = (value.year().clamp(0, i32::from(u16::MAX)) as u16).to_le_bytes();
    [
        year[0],
        year[1],
        u8::from(value.month()),
        value.day(),
        value.hour(),
        value.minute(),
        value.second(),
    ]
}
