// Copyright (C) 2024 by GiGa infosystems
//! This submodule peels the container's physical envelope. Logical content
//! is stored as a repeating sequence of blocks of the form
//! `LEN32 . payload . LEN32`, where the two 32-bit lengths must agree. The
//! framer exposes the concatenation of all payloads as one logical byte
//! stream; logical reads may straddle any number of blocks.
use crate::byte_source::{ByteSource, Fill};

use giga_hspice_core::errors::WaveError;

use log::debug;
use std::io::Read;

pub(crate) struct BlockFramer<R> {
    source: ByteSource<R>,
    /// Payload of the block currently being handed out.
    block: Vec<u8>,
    pos: usize,
    /// Bytes over-read while probing the first block's byte order; they are
    /// served before the source is touched again.
    stash: Vec<u8>,
    stash_pos: usize,
    le: bool,
    /// Still true while the byte order has not been decided.
    undecided: bool,
    max_block_len: u32,
    eof: bool,
}

impl<R: Read> BlockFramer<R> {
    /// Wrap a byte source. With `override_to_le` set, byte-order detection
    /// is skipped and the given order used throughout.
    pub(crate) fn new(
        source: ByteSource<R>,
        override_to_le: Option<bool>,
        max_block_len: u32,
    ) -> Self {
        BlockFramer {
            source,
            block: Vec::new(),
            pos: 0,
            stash: Vec::new(),
            stash_pos: 0,
            le: override_to_le.unwrap_or(false),
            undecided: override_to_le.is_none(),
            max_block_len,
            eof: false,
        }
    }

    /// The byte order in effect. Meaningful once the first block is framed.
    pub(crate) fn is_le(&self) -> bool {
        self.le
    }

    /// Discard the rest of the current block; the next logical read starts
    /// at the following block boundary.
    pub(crate) fn skip_rest_of_block(&mut self) {
        self.pos = self.block.len();
    }

    /// Fill `buf` from the stash first, then the source. `Fill::Eof` only
    /// when no byte at all was available.
    fn pull(&mut self, buf: &mut [u8]) -> Result<Fill, WaveError> {
        let mut got = 0;
        while got < buf.len() && self.stash_pos < self.stash.len() {
            buf[got] = self.stash[self.stash_pos];
            got += 1;
            self.stash_pos += 1;
        }
        if got == buf.len() {
            return Ok(Fill::Full);
        }
        match self.source.read_exact_or_eof(&mut buf[got..])? {
            Fill::Full => Ok(Fill::Full),
            Fill::Eof if got == 0 => Ok(Fill::Eof),
            Fill::Eof => Err(WaveError::UnexpectedEof {
                need: buf.len(),
                got,
            }),
        }
    }

    /// Pull the next block into the buffer. `false` on clean end-of-file.
    fn next_block(&mut self) -> Result<bool, WaveError> {
        if self.eof {
            return Ok(false);
        }
        let mut len_bytes = [0u8; 4];
        match self.pull(&mut len_bytes)? {
            Fill::Eof => {
                self.eof = true;
                return Ok(false);
            }
            Fill::Full => {}
        }
        if self.undecided {
            return self.first_block(len_bytes);
        }
        let lead = read_u32(len_bytes, self.le);
        self.load_block(lead)
    }

    /// Read the payload and trailer of a block whose leading length is
    /// already known, and validate the trailer.
    fn load_block(&mut self, lead: u32) -> Result<bool, WaveError> {
        if lead == 0 || lead > self.max_block_len {
            return Err(WaveError::BadBlockLength { l: lead });
        }
        self.block.resize(lead as usize, 0);
        self.pos = 0;
        let mut payload = std::mem::take(&mut self.block);
        let filled = self.pull(&mut payload).map_err(truncated);
        self.block = payload;
        match filled? {
            Fill::Full => {}
            Fill::Eof => {
                return Err(WaveError::TruncatedBlock {
                    need: lead as usize,
                    got: 0,
                })
            }
        }
        let mut trail_bytes = [0u8; 4];
        match self.pull(&mut trail_bytes).map_err(truncated)? {
            Fill::Full => {}
            Fill::Eof => {
                return Err(WaveError::TruncatedBlock { need: 4, got: 0 });
            }
        }
        let trail = read_u32(trail_bytes, self.le);
        if trail != lead {
            return Err(WaveError::BlockLengthMismatch { lead, trail });
        }
        Ok(true)
    }

    /// Frame the first block and decide the byte order from its length
    /// prefix. When the prefix is plausible both ways, the trailing length
    /// settles it; big endian is checked first, being the historical
    /// default.
    fn first_block(&mut self, len_bytes: [u8; 4]) -> Result<bool, WaveError> {
        self.undecided = false;
        let be = u32::from_be_bytes(len_bytes);
        let le = u32::from_le_bytes(len_bytes);
        let be_plausible = be > 0 && be <= self.max_block_len;
        let le_plausible = le > 0 && le <= self.max_block_len;
        match (be_plausible, le_plausible) {
            (false, false) => Err(WaveError::BadBlockLength { l: be }),
            (true, false) => {
                self.le = false;
                debug!("container byte order: big endian");
                self.load_block(be)
            }
            (false, true) => {
                self.le = true;
                debug!("container byte order: little endian");
                self.load_block(le)
            }
            (true, true) => {
                let need = be.max(le) as usize + 4;
                let mut buf = vec![0u8; need];
                let got = self.source.read_up_to(&mut buf)?;
                buf.truncate(got);
                if candidate_matches(&buf, be as usize, false) {
                    debug!(
                        "length prefix plausible both ways ({} be / {} le), big-endian trailer lines up",
                        be, le
                    );
                    self.le = false;
                    self.adopt(buf, be as usize)
                } else if candidate_matches(&buf, le as usize, true) {
                    debug!(
                        "length prefix plausible both ways ({} be / {} le), little-endian trailer lines up",
                        be, le
                    );
                    self.le = true;
                    self.adopt(buf, le as usize)
                } else if buf.len() >= be as usize + 4 {
                    Err(WaveError::BlockLengthMismatch {
                        lead: be,
                        trail: trailer_of(&buf, be as usize, false),
                    })
                } else if buf.len() >= le as usize + 4 {
                    Err(WaveError::BlockLengthMismatch {
                        lead: le,
                        trail: trailer_of(&buf, le as usize, true),
                    })
                } else {
                    Err(WaveError::TruncatedBlock {
                        need: be.min(le) as usize + 4,
                        got: buf.len(),
                    })
                }
            }
        }
    }

    /// Accept `buf[..l]` as the first block's payload and keep whatever was
    /// over-read for later blocks.
    fn adopt(&mut self, mut buf: Vec<u8>, l: usize) -> Result<bool, WaveError> {
        let rest = buf.split_off(l + 4);
        buf.truncate(l);
        self.block = buf;
        self.pos = 0;
        self.stash = rest;
        self.stash_pos = 0;
        Ok(true)
    }

    /// Fill `buf` from the logical stream, straddling blocks as needed.
    /// Returns the number of bytes delivered; fewer than `buf.len()` only at
    /// clean end-of-file between blocks.
    pub(crate) fn read_logical(&mut self, buf: &mut [u8]) -> Result<usize, WaveError> {
        let mut got = 0;
        while got < buf.len() {
            if self.pos == self.block.len() && !self.next_block()? {
                break;
            }
            let n = (self.block.len() - self.pos).min(buf.len() - got);
            buf[got..got + n].copy_from_slice(&self.block[self.pos..self.pos + n]);
            self.pos += n;
            got += n;
        }
        Ok(got)
    }

    /// Fill `buf` entirely or fail; a short logical read here means the
    /// record being read is cut off.
    pub(crate) fn read_logical_exact(&mut self, buf: &mut [u8]) -> Result<(), WaveError> {
        let got = self.read_logical(buf)?;
        if got < buf.len() {
            return Err(WaveError::UnexpectedEof {
                need: buf.len(),
                got,
            });
        }
        Ok(())
    }

    /// One byte of the logical stream; `None` at clean end-of-file.
    pub(crate) fn read_logical_byte(&mut self) -> Result<Option<u8>, WaveError> {
        if self.pos == self.block.len() && !self.next_block()? {
            return Ok(None);
        }
        let b = self.block[self.pos];
        self.pos += 1;
        Ok(Some(b))
    }
}

fn read_u32(bytes: [u8; 4], le: bool) -> u32 {
    if le {
        u32::from_le_bytes(bytes)
    } else {
        u32::from_be_bytes(bytes)
    }
}

/// Whether `buf` holds a whole candidate block of length `l` whose trailer
/// agrees under the given byte order.
fn candidate_matches(buf: &[u8], l: usize, le: bool) -> bool {
    buf.len() >= l + 4 && trailer_of(buf, l, le) == l as u32
}

fn trailer_of(buf: &[u8], l: usize, le: bool) -> u32 {
    let mut tb = [0u8; 4];
    tb.copy_from_slice(&buf[l..l + 4]);
    read_u32(tb, le)
}

/// End-of-file inside a block is a framing problem, not a plain short read.
fn truncated(e: WaveError) -> WaveError {
    match e {
        WaveError::UnexpectedEof { need, got } => WaveError::TruncatedBlock { need, got },
        other => other,
    }
}
