//! This module contains the [`WaveSettings`] structure which can be used to
//! customise decoding.
//!
//! NB: The defaults are right for well-formed files; the overrides exist for
//! the occasional tool that writes its container with the wrong byte order
//! marker or with unusually large blocks.
use crate::errors::*;
use crate::{DEFAULT_CHUNK_SIZE, MAX_BLOCK_LEN};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings for reading a waveform file, shared by the whole-file and the
/// streaming entries.
///
/// The setters guard the values where not everything representable is valid,
/// so using them is generally safer than building the structure by hand.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct WaveSettings {
    /// Skip byte-order detection and force little (or big) endian.
    pub(crate) override_to_le: Option<bool>,
    /// Minimum number of points per streamed chunk.
    pub(crate) chunk_size: usize,
    /// Streaming allow-list of variable names. The scale is always kept.
    pub(crate) signals: Option<Vec<String>>,
    /// Upper bound on a plausible block payload length.
    pub(crate) max_block_len: u32,
}

impl Default for WaveSettings {
    /// The default instance: byte order detected from the file, chunks of
    /// 10000 points, no signal filtering.
    fn default() -> Self {
        WaveSettings {
            override_to_le: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            signals: None,
            max_block_len: MAX_BLOCK_LEN,
        }
    }
}

impl WaveSettings {
    /// Force the byte order instead of detecting it from the first block.
    /// `None` restores detection.
    pub fn set_override_to_le(&mut self, le: Option<bool>) -> &mut Self {
        self.override_to_le = le;
        self
    }

    pub fn get_override_to_le(&self) -> Option<bool> {
        self.override_to_le
    }

    /// Set the minimum point count of a streamed chunk. Zero is clamped to
    /// one (a chunk cannot be empty).
    /// ```
    /// use giga_hspice_core::WaveSettings;
    ///
    /// let mut settings = WaveSettings::default();
    /// settings.set_chunk_size(0);
    /// assert_eq!(settings.get_chunk_size(), 1);
    /// ```
    pub fn set_chunk_size(&mut self, chunk_size: usize) -> &mut Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn get_chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Restrict streaming to the named variables. The scale column is kept
    /// regardless. `None` streams everything.
    pub fn set_signals(&mut self, signals: Option<Vec<String>>) -> &mut Self {
        self.signals = signals;
        self
    }

    pub fn get_signals(&self) -> Option<&[String]> {
        self.signals.as_deref()
    }

    /// Change the bound above which a block length is considered corrupt.
    pub fn set_max_block_len(&mut self, len: u32) -> Result<&mut Self, WaveError> {
        if len == 0 {
            return Err(WaveError::BadBlockLength { l: len });
        }
        self.max_block_len = len;
        Ok(self)
    }

    pub fn get_max_block_len(&self) -> u32 {
        self.max_block_len
    }
}
