//! This submodule wraps a reader with a "read exactly N bytes" contract
//! where end-of-file is distinct from a short read.
use giga_hspice_core::errors::WaveError;

use std::io::Read;

/// What a read that is allowed to see end-of-file produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fill {
    Full,
    Eof,
}

/// A thin wrapper over any reader. Callers are expected to hand in a
/// buffered reader when the underlying source is a file.
pub(crate) struct ByteSource<R> {
    inner: R,
}

impl<R: Read> ByteSource<R> {
    pub(crate) fn new(inner: R) -> Self {
        ByteSource { inner }
    }

    /// Fill `buf` completely. A clean end-of-file before the first byte
    /// gives `Fill::Eof`; end-of-file after the first byte is an error.
    pub(crate) fn read_exact_or_eof(&mut self, buf: &mut [u8]) -> Result<Fill, WaveError> {
        let mut got = 0;
        while got < buf.len() {
            match self.inner.read(&mut buf[got..]) {
                Ok(0) if got == 0 => return Ok(Fill::Eof),
                Ok(0) => {
                    return Err(WaveError::UnexpectedEof {
                        need: buf.len(),
                        got,
                    })
                }
                Ok(n) => got += n,
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(WaveError::StdIoError(e)),
            }
        }
        Ok(Fill::Full)
    }

    /// Fill as much of `buf` as the source still holds. Short counts are
    /// fine; only a genuine read failure is an error.
    pub(crate) fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize, WaveError> {
        let mut got = 0;
        while got < buf.len() {
            match self.inner.read(&mut buf[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(WaveError::StdIoError(e)),
            }
        }
        Ok(got)
    }
}
