//! This submodule offers the decode pipeline as a lazy producer of bounded
//! sub-tables, for files too large to materialise at once.
//!
//! The consumer's iteration cadence is the only schedule: each call to
//! `next` performs just enough reading to fill one chunk, and dropping the
//! stream releases the underlying file wherever it stands.
use crate::block_framer::BlockFramer;
use crate::byte_source::ByteSource;
use crate::read_data::{SampleDecoder, SampleEvent, SegmentBuilder};
use crate::read_header::{read_header, WaveHeader};

use giga_hspice_core::errors::WaveError;
use giga_hspice_core::{Column, WaveSettings};

use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One streamed sub-table.
///
/// Chunks cover contiguous, non-overlapping point ranges in file order;
/// concatenating the columns of all chunks reproduces the whole-file decode.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformChunk {
    /// Monotonically increasing index, starting at 0.
    pub chunk_index: usize,
    /// Inclusive scale-column range covered by this chunk.
    pub scale_range: (f64, f64),
    /// The projected columns in declared order, scale first.
    pub data: Vec<(String, Column)>,
}

impl WaveformChunk {
    /// Get a column by variable name; exact case wins over a folded match.
    pub fn get(&self, name: &str) -> Option<&Column> {
        if let Some((_, c)) = self.data.iter().find(|(n, _)| n == name) {
            return Some(c);
        }
        self.data
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, c)| c)
    }

    /// The number of points in the chunk.
    pub fn num_points(&self) -> usize {
        self.data.first().map(|(_, c)| c.len()).unwrap_or(0)
    }
}

struct StreamState<R> {
    decoder: SampleDecoder<R>,
    header: WaveHeader,
    /// Logical column indices retained after projection; index 0 always.
    keep: Vec<usize>,
    chunk_size: usize,
    builder: SegmentBuilder,
    point: Vec<f64>,
}

impl<R: Read> StreamState<R> {
    fn fresh_builder(&self) -> SegmentBuilder {
        SegmentBuilder::new(
            self.header.analysis,
            self.header.num_vars(),
            self.header.disk_point_width(),
        )
    }

    fn take_builder(&mut self) -> SegmentBuilder {
        let fresh = self.fresh_builder();
        std::mem::replace(&mut self.builder, fresh)
    }
}

/// A lazy chunked decode of one waveform file.
///
/// The iterator yields `Ok` chunks until the stream is exhausted; after the
/// first `Err` it is fused and yields nothing further.
pub struct WaveformStream<R: Read = BufReader<File>> {
    inner: Option<StreamState<R>>,
    /// An open failure to surface once, before the stream fuses.
    fail: Option<WaveError>,
    next_index: usize,
}

impl WaveformStream<BufReader<File>> {
    /// Open a stream over a file.
    /// ```no_run
    /// use giga_hspice_core::WaveSettings;
    /// use giga_hspice_in::WaveformStream;
    ///
    /// let mut settings = WaveSettings::default();
    /// settings.set_chunk_size(4096);
    /// let stream = WaveformStream::open("big_sim.tr0", &settings).unwrap();
    /// for chunk in stream {
    ///     let chunk = chunk.unwrap();
    ///     println!("chunk {} covers {:?}", chunk.chunk_index, chunk.scale_range);
    /// }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P, settings: &WaveSettings) -> Result<Self, WaveError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), settings)
    }
}

impl<R: Read> WaveformStream<R> {
    /// Build a stream over any byte source.
    pub fn from_reader(reader: R, settings: &WaveSettings) -> Result<Self, WaveError> {
        let source = ByteSource::new(reader);
        let mut framer = BlockFramer::new(
            source,
            settings.get_override_to_le(),
            settings.get_max_block_len(),
        );
        let header = read_header(&mut framer)?;
        let keep = keep_indices(&header, settings.get_signals());
        let decoder = SampleDecoder::new(framer, &header);
        let builder = SegmentBuilder::new(
            header.analysis,
            header.num_vars(),
            header.disk_point_width(),
        );
        let point = Vec::with_capacity(header.disk_point_width());
        Ok(WaveformStream {
            inner: Some(StreamState {
                decoder,
                header,
                keep,
                chunk_size: settings.get_chunk_size().max(1),
                builder,
                point,
            }),
            fail: None,
            next_index: 0,
        })
    }

    /// Wrap a failed open so the error becomes the stream's only item.
    pub(crate) fn failed(e: WaveError) -> Self {
        WaveformStream {
            inner: None,
            fail: Some(e),
            next_index: 0,
        }
    }
}

enum Step {
    Continue,
    EmitFull,
    Fail(WaveError),
    Finish,
}

impl<R: Read> Iterator for WaveformStream<R> {
    type Item = Result<WaveformChunk, WaveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(e) = self.fail.take() {
            return Some(Err(e));
        }
        loop {
            let step = {
                let state = self.inner.as_mut()?;
                match state.decoder.next_event(&mut state.point) {
                    Err(e) => Step::Fail(e),
                    // Sweep segments concatenate in a stream; any peeled
                    // sweep scalar is dropped here.
                    Ok(SampleEvent::NewSegment { .. }) => Step::Continue,
                    Ok(SampleEvent::Finished) => Step::Finish,
                    Ok(SampleEvent::Point) => match state.builder.push_point(&state.point) {
                        Err(e) => Step::Fail(e),
                        Ok(()) if state.builder.num_points() >= state.chunk_size => Step::EmitFull,
                        Ok(()) => Step::Continue,
                    },
                }
            };
            match step {
                Step::Continue => {}
                Step::Fail(e) => {
                    self.inner = None;
                    return Some(Err(e));
                }
                Step::EmitFull => {
                    let index = self.next_index;
                    self.next_index += 1;
                    let state = self.inner.as_mut()?;
                    let full = state.take_builder();
                    let out = make_chunk(full, &state.header, &state.keep, index);
                    if out.is_err() {
                        self.inner = None;
                    }
                    return Some(out);
                }
                Step::Finish => {
                    let state = self.inner.take()?;
                    if state.builder.num_points() == 0 {
                        return None;
                    }
                    let index = self.next_index;
                    self.next_index += 1;
                    let StreamState {
                        builder,
                        header,
                        keep,
                        ..
                    } = state;
                    return Some(make_chunk(builder, &header, &keep, index));
                }
            }
        }
    }
}

/// Resolve the allow-list into logical column indices. The scale column is
/// always kept; projection happens at copy time, never at decode time.
fn keep_indices(header: &WaveHeader, signals: Option<&[String]>) -> Vec<usize> {
    match signals {
        None => (0..header.num_vars()).collect(),
        Some(list) => {
            let mut keep = vec![0];
            for (i, v) in header.variables.iter().enumerate().skip(1) {
                if list.iter().any(|s| s == &v.name || s.eq_ignore_ascii_case(&v.name)) {
                    keep.push(i);
                }
            }
            keep
        }
    }
}

fn make_chunk(
    builder: SegmentBuilder,
    header: &WaveHeader,
    keep: &[usize],
    index: usize,
) -> Result<WaveformChunk, WaveError> {
    let table = builder.finish()?;
    let scale_range = match table.column(0).and_then(Column::as_real) {
        Some(s) if !s.is_empty() => (s[0], s[s.len() - 1]),
        _ => (0.0, 0.0),
    };
    let points = table.num_points();
    let mut data = Vec::with_capacity(keep.len());
    for (i, column) in table.into_columns().into_iter().enumerate() {
        if !keep.contains(&i) {
            continue;
        }
        if let Some(var) = header.variables.get(i) {
            data.push((var.name.clone(), column));
        }
    }
    debug!("chunk {} with {} point(s)", index, points);
    Ok(WaveformChunk {
        chunk_index: index,
        scale_range,
        data,
    })
}
