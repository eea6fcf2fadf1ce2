//! Vendor direction-finding characteristics (azimuth, elevation, distance).
//!
//! All three share a fixed header: flags, quality indicator, the peer
//! address in reversed byte order and its address type. The measurement
//! value follows. The full length is checked before any field is read.

pub mod layout;
pub mod parser;

pub use parser::{
    AddressType, Azimuth, DistanceMeasurement, DistanceMethod, Elevation, PeerAddress,
    QualityIndicator, parse_azimuth, parse_distance, parse_elevation,
};
