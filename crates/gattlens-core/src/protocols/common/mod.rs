//! Shared codec building blocks: the byte cursor, decode errors and the
//! numeric and date-time wire formats used by several profiles.

mod codes;
pub mod datetime;
pub mod error;
pub mod numeric;
pub mod reader;

pub use datetime::{DATE_TIME_LEN, encode_date_time};
pub use error::DecodeError;
pub use numeric::{FLOAT_LEN, SFLOAT_LEN};
pub use reader::{ByteCursor, ByteOrder, Width};

pub(crate) use reader::bit;
pub(crate) use codes::wire_codes;
