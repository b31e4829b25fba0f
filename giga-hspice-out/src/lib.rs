// Copyright (C) 2024 by GiGa infosystems
//! This is a simplified library for writing SPICE3/ngspice binary rawfiles
//! from rust. A rawfile starts with a short LF-terminated ASCII header,
//! closed by a `Binary:` line, and carries the sample matrix as contiguous
//! little-endian doubles in row-major order.
//!
//! The usual entry is [`convert_to_raw`], which decodes an HSPICE waveform
//! file with `giga_hspice_in` and emits it as a rawfile. Already-decoded
//! [`WaveformResult`]s can be written directly with [`write_rawfile`].
//!
//! This library does not read rawfiles, and does not write HSPICE files.
extern crate giga_hspice_core;
extern crate giga_hspice_in;
extern crate log;
extern crate tinyvec;
#[cfg(test)]
extern crate tempfile;

#[cfg(test)]
mod integration_tests;
pub mod write_data;
pub mod write_headers;

pub use giga_hspice_core::errors::*;
pub use giga_hspice_core::{
    AnalysisKind, Column, Complex64, DataTable, VarKind, Variable, WaveformResult,
};

use log::{error, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a decoded waveform as a SPICE3 binary rawfile.
///
/// Swept results are written as the concatenation of their segments, with
/// `No. Points` giving the total. The output is created (or truncated) at
/// `path`.
///
/// ```no_run
/// let result = giga_hspice_in::read_waveform("PinToPinSim.tr0").unwrap();
/// giga_hspice_out::write_rawfile(&result, "PinToPinSim.raw").unwrap();
/// ```
pub fn write_rawfile<P: AsRef<Path>>(
    result: &WaveformResult,
    path: P,
) -> Result<(), WaveError> {
    let file = File::create(path.as_ref()).map_err(WaveError::OutputFile)?;
    let mut out = BufWriter::new(file);
    let header = write_headers::rawfile_header(result);
    out.write_all(header.as_bytes())
        .map_err(WaveError::OutputFile)?;
    let payload = write_data::write_matrix(&mut out, result)?;
    out.flush().map_err(WaveError::OutputFile)?;
    info!(
        "wrote rawfile '{}': {} header byte(s), {} payload byte(s)",
        path.as_ref().display(),
        header.len(),
        payload
    );
    Ok(())
}

/// Convert an HSPICE waveform file into a SPICE3 binary rawfile.
///
/// Returns `true` on success. All failures come back as `false`, with the
/// diagnostic detail on the `log` facade (see
/// `giga_hspice_core::logging::init_logging`).
///
/// ```no_run
/// assert!(giga_hspice_out::convert_to_raw("PinToPinSim.tr0", "PinToPinSim.raw"));
/// ```
pub fn convert_to_raw<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> bool {
    let result = match giga_hspice_in::read_waveform(input.as_ref()) {
        Ok(result) => result,
        Err(e) => {
            error!("could not decode '{}': {}", input.as_ref().display(), e);
            return false;
        }
    };
    match write_rawfile(&result, output.as_ref()) {
        Ok(()) => true,
        Err(e) => {
            error!(
                "could not write rawfile '{}': {}",
                output.as_ref().display(),
                e
            );
            false
        }
    }
}
