//! Characteristic registry: ids, service kinds and decoder selection.
//!
//! Decoders are plain function pointers chosen by characteristic id. Each
//! returns either measurement records, a metadata update or a control-point
//! indication so the aggregation layer can route the result without knowing
//! the profile.

mod characteristic;
mod record;
mod registry;

pub use characteristic::{CharacteristicId, CharacteristicParseError, ServiceKind};
pub use record::{ConnectionState, Decoded, MetadataUpdate, Record};
pub use registry::{Decoder, decode, decoder_for};
