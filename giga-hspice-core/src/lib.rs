//! This library is the foundation for the `giga-hspice-in` and
//! `giga-hspice-out` crates. It holds the shared data model, error type and
//! helpers for decoding HSPICE waveform files (`.tr0`, `.ac0`, `.sw0`) and
//! writing SPICE3 binary rawfiles. It can be built either with serialization
//! support, or in a slightly more lightweight manner without it (see
//! features).
#![allow(clippy::derive_partial_eq_without_eq)]
extern crate fnv;
extern crate num;
#[macro_use]
extern crate num_derive;

#[cfg(any(feature = "to_json", feature = "serde"))]
extern crate serde;
#[cfg(feature = "to_json")]
extern crate serde_json;

pub mod bitconverter;
pub mod enums;
pub mod errors;
pub mod logging;
pub mod settings;
pub mod waveform;

pub use errors::{ErrorKind, WaveError};

pub use enums::*;
pub use settings::WaveSettings;
pub use waveform::*;

pub use num::complex::Complex64;

/// Length of the fixed header preamble of the 9007/9601 post versions.
pub const POST9601_PREAMBLE_LEN: usize = 128;
/// Length of the fixed header preamble of the 2001 post version.
pub const POST2001_PREAMBLE_LEN: usize = 136;
/// Width of the title field in the preamble.
pub const TITLE_LEN: usize = 64;
/// Width of the date field in the preamble.
pub const DATE_LEN: usize = 24;
/// Width of the analysis tag field in the preamble.
pub const ANALYSIS_TAG_LEN: usize = 16;
/// The ASCII marker that terminates the logical header.
pub const HEADER_TERMINATOR: &[u8; 4] = b"$&%#";
/// Hard ceiling on a plausible block payload length.
pub const MAX_BLOCK_LEN: u32 = 16 * 1024 * 1024;
/// The value written to the scale column to terminate a segment. The
/// comparison value for a concrete file comes from
/// [`enums::Dialect::sentinel`], which accounts for element width.
pub const SCALE_SENTINEL: f64 = 1.0e30;
/// Default minimum point count of a streamed chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
