// Copyright (C) 2024 by GiGa infosystems
//! This submodule deals with turning raw sample bytes into numbers once the
//! dialect and byte order of a file are known, plus a couple of helpers for
//! the fixed-width ASCII header fields.
use crate::enums::Dialect;
use crate::errors::*;

use std::array::TryFromSliceError;
use std::convert::TryInto;

pub type BitConverter = fn(&[u8]) -> Result<f64, TryFromSliceError>;

/// This function chooses the converter for the binary sample data.
///
/// The converter should be chosen once per file; the dialect determines the
/// element width and `le` whether the bytes are little endian. Both element
/// widths come out as `f64` so the rest of the pipeline only deals in one
/// scalar type.
/// ```
/// # use giga_hspice_core::bitconverter::converter_chooser;
/// # use giga_hspice_core::enums::Dialect;
/// let convert = converter_chooser(Dialect::Post2001, false);
///
/// let bytes = 42.0f64.to_be_bytes();
/// assert_eq!(convert(&bytes[..]).unwrap(), 42.);
/// ```
pub fn converter_chooser(dialect: Dialect, le: bool) -> BitConverter {
    match dialect {
        Dialect::Post9601 if le => {
            fn x(input: &[u8]) -> Result<f64, TryFromSliceError> {
                Ok(f32::from_le_bytes(input.try_into()?) as f64)
            }
            x
        }
        Dialect::Post9601 => {
            fn x(input: &[u8]) -> Result<f64, TryFromSliceError> {
                Ok(f32::from_be_bytes(input.try_into()?) as f64)
            }
            x
        }
        Dialect::Post2001 if le => {
            fn x(input: &[u8]) -> Result<f64, TryFromSliceError> {
                Ok(f64::from_le_bytes(input.try_into()?))
            }
            x
        }
        Dialect::Post2001 => {
            fn x(input: &[u8]) -> Result<f64, TryFromSliceError> {
                Ok(f64::from_be_bytes(input.try_into()?))
            }
            x
        }
    }
}

/// A helper to read a fixed-width ASCII header field into a trimmed string.
///
/// Padding spaces and NUL bytes on either side are dropped.
/// ```
/// # use giga_hspice_core::bitconverter::ascii_field_to_string;
/// assert_eq!(ascii_field_to_string(b"  tran  "), "tran");
/// assert_eq!(ascii_field_to_string(b"a name\0\0"), "a name");
/// ```
pub fn ascii_field_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c == ' ' || c == '\0')
        .to_string()
}

/// Parse a right-justified, space-padded ASCII integer field.
/// ```
/// # use giga_hspice_core::bitconverter::ascii_field_to_usize;
/// assert_eq!(ascii_field_to_usize(b"   4", "nauto").unwrap(), 4);
/// assert!(ascii_field_to_usize(b"four", "nauto").is_err());
/// ```
pub fn ascii_field_to_usize(bytes: &[u8], field: &'static str) -> Result<usize, WaveError> {
    let s = ascii_field_to_string(bytes);
    s.parse::<usize>().map_err(|e| WaveError::BadHeaderField {
        field,
        msg: format!("'{}': {}", s, e),
    })
}
