// Copyright (C) 2024 by GiGa infosystems
//! This contains the code for writing the sample matrix to the file.
//!
//! The matrix is row-major little-endian `f64`, one full point per row. For
//! a complex (AC) payload every data value takes a real/imaginary pair of
//! doubles; the scale value stays a single real double.
use giga_hspice_core::errors::WaveError;
use giga_hspice_core::{Column, DataTable, WaveformResult};

use std::io::Write;
use tinyvec::TinyVec;

/// Row buffer; stays inline for rows of up to eight real columns.
pub(crate) type RowBytes = TinyVec<[u8; 64]>;

/// Assemble the bytes of one matrix row.
///
/// NB: The row index must be below `table.num_points()`; tables guarantee
/// equal column lengths on construction.
pub(crate) fn row_bytes(table: &DataTable, row: usize) -> RowBytes {
    let mut bytes: RowBytes = RowBytes::default();
    for column in table.columns() {
        match column {
            Column::Real(v) => bytes.extend_from_slice(&v[row].to_le_bytes()),
            Column::Complex(v) => {
                bytes.extend_from_slice(&v[row].re.to_le_bytes());
                bytes.extend_from_slice(&v[row].im.to_le_bytes());
            }
        }
    }
    bytes
}

/// Write every table's rows in file order. Returns the payload byte count.
pub fn write_matrix<W: Write>(
    out: &mut W,
    result: &WaveformResult,
) -> Result<usize, WaveError> {
    let mut written = 0usize;
    for table in result.tables() {
        for row in 0..table.num_points() {
            let bytes = row_bytes(table, row);
            out.write_all(&bytes).map_err(WaveError::OutputFile)?;
            written += bytes.len();
        }
    }
    Ok(written)
}
