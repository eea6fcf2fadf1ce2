use std::fmt;

use serde::Serialize;

use super::layout;
use crate::protocols::common::{ByteCursor, DecodeError, bit, wire_codes};

wire_codes! {
    QualityIndicator, "quality indicator" {
        Good = 0,
        Poor = 1,
    }
}

wire_codes! {
    AddressType, "address type" {
        Public = 0,
        Random = 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMethod {
    Rtt,
    Mcpd,
}

/// Peer address in canonical (most significant byte first) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerAddress(pub [u8; layout::ADDRESS_LEN]);

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, byte) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl Serialize for PeerAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy)]
struct Header {
    flags: u8,
    quality: QualityIndicator,
    address: PeerAddress,
    address_type: AddressType,
}

fn read_header(cursor: &mut ByteCursor<'_>, total_len: usize) -> Result<Header, DecodeError> {
    cursor.require(total_len)?;
    let flags = cursor.read_u8()?;
    let quality = QualityIndicator::from_code(cursor.read_u8()?)?;
    let address = PeerAddress(cursor.read_reversed::<{ layout::ADDRESS_LEN }>()?);
    let address_type = AddressType::from_code(cursor.read_u8()?)?;
    Ok(Header {
        flags,
        quality,
        address,
        address_type,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Azimuth {
    pub quality: QualityIndicator,
    pub address: PeerAddress,
    pub address_type: AddressType,
    /// Degrees.
    pub azimuth: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elevation {
    pub quality: QualityIndicator,
    pub address: PeerAddress,
    pub address_type: AddressType,
    /// Degrees.
    pub elevation: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistanceMeasurement {
    pub quality: QualityIndicator,
    pub address: PeerAddress,
    pub address_type: AddressType,
    pub method: DistanceMethod,
    /// Decimetres.
    pub distance: u16,
}

pub fn parse_azimuth(payload: &[u8]) -> Result<Azimuth, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    let header = read_header(&mut cursor, layout::AZIMUTH_LEN)?;
    Ok(Azimuth {
        quality: header.quality,
        address: header.address,
        address_type: header.address_type,
        azimuth: cursor.read_u16_le()?,
    })
}

pub fn parse_elevation(payload: &[u8]) -> Result<Elevation, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    let header = read_header(&mut cursor, layout::ELEVATION_LEN)?;
    Ok(Elevation {
        quality: header.quality,
        address: header.address,
        address_type: header.address_type,
        elevation: cursor.read_i8()?,
    })
}

pub fn parse_distance(payload: &[u8]) -> Result<DistanceMeasurement, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    let header = read_header(&mut cursor, layout::DISTANCE_LEN)?;
    let method = if bit(header.flags, layout::FLAG_DISTANCE_MCPD) {
        DistanceMethod::Mcpd
    } else {
        DistanceMethod::Rtt
    };
    Ok(DistanceMeasurement {
        quality: header.quality,
        address: header.address,
        address_type: header.address_type,
        method,
        distance: cursor.read_u16_le()?,
    })
}
