//! Line-oriented transcript source.
//!
//! One event per line: `<device> <keyword> [fields...]`. Blank lines and
//! `#` comments are skipped. The source yields events lazily and stops at
//! the first malformed line, reporting its 1-based number.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{TranscriptFileSource, TranscriptSource};
