use super::error::DecodeError;

/// Byte order for multi-byte reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Width of a generic integer read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    One,
    Two,
    Three,
    Four,
}

impl Width {
    pub fn bytes(self) -> usize {
        match self {
            Width::One => 1,
            Width::Two => 2,
            Width::Three => 3,
            Width::Four => 4,
        }
    }
}

/// Sequential, bounds-checked reader over a characteristic payload.
///
/// Every read advances the offset by the width it consumed. A read that
/// would run past the end fails with [`DecodeError::OutOfBounds`] and leaves
/// the offset untouched, so decoders validate the full layout with
/// [`ByteCursor::require`] before committing to it.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    payload: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload, offset: 0 }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.payload.len() - self.offset
    }

    /// Fail with `TruncatedPayload` unless `needed` more bytes are available.
    pub fn require(&self, needed: usize) -> Result<(), DecodeError> {
        if self.remaining() < needed {
            return Err(DecodeError::TruncatedPayload {
                needed: self.offset + needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    /// Return the byte at the current offset without consuming it.
    pub fn peek_flags(&self) -> Result<u8, DecodeError> {
        self.payload
            .get(self.offset)
            .copied()
            .ok_or_else(|| self.out_of_bounds(1))
    }

    pub fn read_uint(&mut self, width: Width, order: ByteOrder) -> Result<u32, DecodeError> {
        let bytes = self.read_bytes(width.bytes())?;
        let value = match order {
            ByteOrder::Little => bytes
                .iter()
                .rev()
                .fold(0u32, |acc, b| (acc << 8) | u32::from(*b)),
            ByteOrder::Big => bytes.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b)),
        };
        Ok(value)
    }

    /// Read a two's-complement integer of exactly `width` bytes.
    pub fn read_int(&mut self, width: Width, order: ByteOrder) -> Result<i32, DecodeError> {
        let raw = self.read_uint(width, order)?;
        let shift = 32 - 8 * width.bytes() as u32;
        Ok(((raw << shift) as i32) >> shift)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let value = self.peek_flags()?;
        self.offset += 1;
        Ok(value)
    }

    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16_le(&mut self) -> Result<u16, DecodeError> {
        Ok(self.read_uint(Width::Two, ByteOrder::Little)? as u16)
    }

    pub fn read_i16_le(&mut self) -> Result<i16, DecodeError> {
        Ok(self.read_int(Width::Two, ByteOrder::Little)? as i16)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        self.read_uint(Width::Four, ByteOrder::Little)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or_else(|| self.out_of_bounds(len))?;
        let bytes = self
            .payload
            .get(self.offset..end)
            .ok_or_else(|| self.out_of_bounds(len))?;
        self.offset = end;
        Ok(bytes)
    }

    /// Read `N` bytes and return them in reverse wire order.
    pub fn read_reversed<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        for (dst, src) in out.iter_mut().zip(bytes.iter().rev()) {
            *dst = *src;
        }
        Ok(out)
    }

    /// Consume and return everything after the current offset.
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = &self.payload[self.offset..];
        self.offset = self.payload.len();
        rest
    }

    fn out_of_bounds(&self, width: usize) -> DecodeError {
        DecodeError::OutOfBounds {
            offset: self.offset,
            width,
            remaining: self.remaining(),
        }
    }
}

pub(crate) fn bit(flags: impl Into<u32>, index: u32) -> bool {
    (flags.into() >> index) & 1 == 1
}
