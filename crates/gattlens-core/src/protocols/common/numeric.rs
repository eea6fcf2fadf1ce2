//! IEEE-11073 medical device floating point formats.
//!
//! SFLOAT packs a 4-bit exponent and a 12-bit mantissa into 16 bits; FLOAT
//! packs an 8-bit exponent and a 24-bit mantissa into 32 bits. Both reserve
//! a handful of mantissa values (with a zero exponent) for NaN, NRes and
//! the infinities. NRes and the reserved value decode to NaN.

use super::error::DecodeError;
use super::reader::ByteCursor;

const SFLOAT_NAN: i32 = 0x07ff;
const SFLOAT_NRES: i32 = 0x0800;
const SFLOAT_POSITIVE_INFINITY: i32 = 0x07fe;
const SFLOAT_NEGATIVE_INFINITY: i32 = 0x0802;
const SFLOAT_RESERVED: i32 = 0x0801;

const FLOAT_NAN: i32 = 0x007f_ffff;
const FLOAT_NRES: i32 = 0x0080_0000;
const FLOAT_POSITIVE_INFINITY: i32 = 0x007f_fffe;
const FLOAT_NEGATIVE_INFINITY: i32 = 0x0080_0002;
const FLOAT_RESERVED: i32 = 0x0080_0001;

pub const SFLOAT_LEN: usize = 2;
pub const FLOAT_LEN: usize = 4;

pub fn sfloat_from_raw(raw: u16) -> f32 {
    let mantissa_bits = i32::from(raw & 0x0fff);
    match mantissa_bits {
        SFLOAT_NAN | SFLOAT_NRES | SFLOAT_RESERVED => return f32::NAN,
        SFLOAT_POSITIVE_INFINITY => return f32::INFINITY,
        SFLOAT_NEGATIVE_INFINITY => return f32::NEG_INFINITY,
        _ => {}
    }
    let mantissa = sign_extend(mantissa_bits as u32, 12);
    let exponent = sign_extend(u32::from(raw >> 12), 4);
    scale(mantissa, exponent)
}

pub fn float_from_raw(raw: u32) -> f32 {
    let mantissa_bits = (raw & 0x00ff_ffff) as i32;
    match mantissa_bits {
        FLOAT_NAN | FLOAT_NRES | FLOAT_RESERVED => return f32::NAN,
        FLOAT_POSITIVE_INFINITY => return f32::INFINITY,
        FLOAT_NEGATIVE_INFINITY => return f32::NEG_INFINITY,
        _ => {}
    }
    let mantissa = sign_extend(mantissa_bits as u32, 24);
    let exponent = (raw >> 24) as u8 as i8 as i32;
    scale(mantissa, exponent)
}

fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

fn scale(mantissa: i32, exponent: i32) -> f32 {
    (f64::from(mantissa) * 10f64.powi(exponent)) as f32
}

impl ByteCursor<'_> {
    pub fn read_sfloat(&mut self) -> Result<f32, DecodeError> {
        Ok(sfloat_from_raw(self.read_u16_le()?))
    }

    pub fn read_float(&mut self) -> Result<f32, DecodeError> {
        Ok(float_from_raw(self.read_u32_le()?))
    }
}
