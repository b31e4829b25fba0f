//! This is a simplified library for reading HSPICE waveform files into rust.
//! It decodes the binary result files the simulator writes for transient
//! (`.tr0`), AC (`.ac0`) and DC-sweep (`.sw0`) analyses, in both the 9601
//! (32-bit) and 2001 (64-bit) post versions and either byte order, into a
//! [`WaveformResult`] of named sample vectors.
//!
//! Decoding is a single forward pass over the file. For files too large to
//! hold in memory, [`decode_stream`] offers the same pipeline as a lazy
//! sequence of bounded chunks.
//!
//! This library does not write HSPICE files. For turning decoded waveforms
//! into SPICE3 binary rawfiles, see `giga_hspice_out`.
extern crate giga_hspice_core;
extern crate log;

mod block_framer;
mod byte_source;
mod read_data;
mod read_header;
pub mod stream;

pub use giga_hspice_core::enums;
pub use giga_hspice_core::errors::*;
pub use giga_hspice_core::{
    AnalysisKind, Column, Complex64, DataTable, Dialect, VarKind, Variable, WaveSettings,
    WaveformResult,
};
pub use read_header::WaveHeader;
pub use stream::{WaveformChunk, WaveformStream};

use block_framer::BlockFramer;
use byte_source::ByteSource;
use log::{error, info};
use read_data::{read_tables, SampleDecoder};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Decode a whole waveform file with default settings.
///
/// ```no_run
/// let result = giga_hspice_in::read_waveform("PinToPinSim.tr0").unwrap();
/// assert_eq!(result.analysis.as_str(), "transient");
/// let time = result.get("TIME").unwrap();
/// assert_eq!(time.len(), result.len());
/// ```
pub fn read_waveform<P: AsRef<Path>>(path: P) -> Result<WaveformResult, WaveError> {
    read_waveform_with_settings(path, &WaveSettings::default())
}

/// Decode a whole waveform file with the given [`WaveSettings`].
pub fn read_waveform_with_settings<P: AsRef<Path>>(
    path: P,
    settings: &WaveSettings,
) -> Result<WaveformResult, WaveError> {
    let file = File::open(path.as_ref())?;
    read_waveform_from(BufReader::new(file), settings)
}

/// Decode a whole waveform from any byte source.
///
/// The reader is consumed in one forward pass; it does not need to support
/// seeking. File-based callers should prefer [`read_waveform`], which adds
/// buffering.
pub fn read_waveform_from<R: Read>(
    reader: R,
    settings: &WaveSettings,
) -> Result<WaveformResult, WaveError> {
    let source = ByteSource::new(reader);
    let mut framer = BlockFramer::new(
        source,
        settings.get_override_to_le(),
        settings.get_max_block_len(),
    );
    let header = read_header::read_header(&mut framer)?;
    let decoder = SampleDecoder::new(framer, &header);
    let (tables, sweep_values) = read_tables(decoder, &header)?;
    let sweep = match (header.sweep_param, sweep_values) {
        (Some(param), Some(values)) => Some((param, values)),
        _ => None,
    };
    let result = WaveformResult::new(
        header.title,
        header.date,
        header.analysis,
        header.variables,
        tables,
        sweep,
    )?;
    info!(
        "decoded {} point(s) over {} variable(s) in {} table(s)",
        result.len(),
        result.num_vars(),
        result.tables().len()
    );
    Ok(result)
}

/// Decode a whole waveform file, collapsing every failure to `None`.
///
/// Diagnostics go through the `log` facade (see
/// `giga_hspice_core::logging::init_logging`); the return value only says
/// whether the decode worked.
///
/// ```no_run
/// if let Some(result) = giga_hspice_in::decode("PinToPinSim.tr0") {
///     println!("{} points of '{}'", result.len(), result.title);
/// }
/// ```
pub fn decode<P: AsRef<Path>>(path: P) -> Option<WaveformResult> {
    match read_waveform(path.as_ref()) {
        Ok(result) => Some(result),
        Err(e) => {
            error!(
                "could not decode '{}': {}",
                path.as_ref().display(),
                e
            );
            None
        }
    }
}

/// Open a lazy chunked decode of a waveform file.
///
/// Chunks hold at least `chunk_size` points (the last one may hold fewer).
/// With `signals` set, only the named variables are copied out; the scale
/// column is always included. A file that cannot be opened or decoded yields
/// its error as the only item of the sequence.
///
/// ```no_run
/// let chunks = giga_hspice_in::decode_stream("big_sim.tr0", 10_000, None);
/// for chunk in chunks {
///     let chunk = chunk.unwrap();
///     println!("chunk {}: {} points", chunk.chunk_index, chunk.num_points());
/// }
/// ```
pub fn decode_stream<P: AsRef<Path>>(
    path: P,
    chunk_size: usize,
    signals: Option<Vec<String>>,
) -> WaveformStream {
    let mut settings = WaveSettings::default();
    settings.set_chunk_size(chunk_size).set_signals(signals);
    match WaveformStream::open(path.as_ref(), &settings) {
        Ok(stream) => stream,
        Err(e) => {
            error!(
                "could not open '{}' for streaming: {}",
                path.as_ref().display(),
                e
            );
            WaveformStream::failed(e)
        }
    }
}
