//! Characteristic decoding modules.
//!
//! Each profile follows a layered structure:
//! - `layout`: flag bit positions and field lengths (source of truth)
//! - `parser`: domain-level decoding through `common::ByteCursor` (no direct
//!   byte indexing)
//! - `codes`: closed wire-code enumerations, where the profile has several
//!
//! Single-field characteristics live in one flat module. Every decoder is a
//! pure `fn(&[u8]) -> Result<_, DecodeError>`: it checks the mandatory
//! prefix, resolves the flags, re-checks the exact length the flags demand
//! and only then reads fields. Sessions and aggregation layers handle state.

pub mod battery;
pub mod blood_pressure;
pub mod cgm;
pub mod common;
pub mod direction;
pub mod glucose;
pub mod heart_rate;
pub mod proximity;
pub mod racp;
pub mod speed_cadence;
pub mod thermometer;
pub mod throughput;
