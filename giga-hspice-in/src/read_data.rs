// Copyright (C) 2024 by GiGa infosystems
//! This submodule decodes the sample region: scalar-by-scalar point
//! assembly, sentinel handling, sweep segmentation and the complex repack
//! for AC tables.
use crate::block_framer::BlockFramer;
use crate::read_header::WaveHeader;

use giga_hspice_core::bitconverter::{converter_chooser, BitConverter};
use giga_hspice_core::enums::AnalysisKind;
use giga_hspice_core::errors::WaveError;
use giga_hspice_core::{Column, Complex64, DataTable};

use log::{debug, trace};
use std::io::Read;

/// What one step of the decoder produced.
pub(crate) enum SampleEvent {
    /// A full point is in the scratch buffer.
    Point,
    /// A segment begins. Carries the peeled sweep value when the inline
    /// sweep layout is in use.
    NewSegment { sweep_value: Option<f64> },
    /// The stream is exhausted.
    Finished,
}

/// Forward-only decoder over the sample region. The byte order, element
/// width and sentinel are fixed once, at construction.
pub(crate) struct SampleDecoder<R> {
    framer: BlockFramer<R>,
    convert: BitConverter,
    element_len: usize,
    sentinel: f64,
    width: usize,
    peel_sweep: bool,
    /// One scalar of lookahead, consumed while probing past a sentinel.
    pending: Option<f64>,
    started: bool,
    finished: bool,
    buf: [u8; 8],
}

impl<R: Read> SampleDecoder<R> {
    /// Take over the framer once the header has been decoded.
    pub(crate) fn new(framer: BlockFramer<R>, header: &WaveHeader) -> Self {
        let le = framer.is_le();
        SampleDecoder {
            convert: converter_chooser(header.dialect, le),
            element_len: header.dialect.element_len(),
            sentinel: header.dialect.sentinel(),
            width: header.disk_point_width(),
            peel_sweep: header.sweep_param.is_some() && header.sweep_tail.is_none(),
            framer,
            pending: None,
            started: false,
            finished: false,
            buf: [0u8; 8],
        }
    }

    /// The next raw scalar; `None` at end-of-stream. A logical remainder
    /// shorter than one element is trailing padding and counts as
    /// end-of-stream too.
    fn next_scalar(&mut self) -> Result<Option<f64>, WaveError> {
        if let Some(v) = self.pending.take() {
            return Ok(Some(v));
        }
        let buf = &mut self.buf[..self.element_len];
        let got = self.framer.read_logical(buf)?;
        if got == 0 {
            return Ok(None);
        }
        if got < self.element_len {
            trace!("dropping {} trailing padding byte(s)", got);
            return Ok(None);
        }
        Ok(Some((self.convert)(buf)?))
    }

    /// A scalar that must exist: the stream may not end inside a point.
    fn must_scalar(&mut self) -> Result<f64, WaveError> {
        self.next_scalar()?.ok_or(WaveError::UnexpectedEof {
            need: self.element_len,
            got: 0,
        })
    }

    /// Drive the decode forward by one event. After a `Point` the scratch
    /// buffer holds the on-disk width worth of scalars.
    pub(crate) fn next_event(&mut self, point: &mut Vec<f64>) -> Result<SampleEvent, WaveError> {
        if self.finished {
            return Ok(SampleEvent::Finished);
        }
        if !self.started {
            self.started = true;
            let sweep_value = if self.peel_sweep {
                Some(self.must_scalar()?)
            } else {
                None
            };
            return Ok(SampleEvent::NewSegment { sweep_value });
        }
        let scale = match self.next_scalar()? {
            None => {
                debug!("stream ended without a terminating sentinel");
                self.finished = true;
                return Ok(SampleEvent::Finished);
            }
            Some(s) => s,
        };
        // The sentinel only counts in the scale column; a data value that
        // happens to match passes through untouched below.
        if scale == self.sentinel {
            return self.after_sentinel();
        }
        point.clear();
        point.push(scale);
        for _ in 1..self.width {
            point.push(self.must_scalar()?);
        }
        Ok(SampleEvent::Point)
    }

    /// One sentinel ends the segment; a second sentinel or end-of-file ends
    /// the stream. Anything else opens the next segment.
    fn after_sentinel(&mut self) -> Result<SampleEvent, WaveError> {
        match self.next_scalar()? {
            None => {
                self.finished = true;
                Ok(SampleEvent::Finished)
            }
            Some(v) if v == self.sentinel => {
                self.finished = true;
                Ok(SampleEvent::Finished)
            }
            Some(v) => {
                if self.peel_sweep {
                    Ok(SampleEvent::NewSegment {
                        sweep_value: Some(v),
                    })
                } else {
                    self.pending = Some(v);
                    Ok(SampleEvent::NewSegment { sweep_value: None })
                }
            }
        }
    }
}

/// Column-major accumulator for the points of one segment.
pub(crate) struct SegmentBuilder {
    analysis: AnalysisKind,
    num_vars: usize,
    columns: Vec<Vec<f64>>,
}

impl SegmentBuilder {
    pub(crate) fn new(analysis: AnalysisKind, num_vars: usize, width: usize) -> Self {
        SegmentBuilder {
            analysis,
            num_vars,
            columns: vec![Vec::new(); width],
        }
    }

    pub(crate) fn push_point(&mut self, point: &[f64]) -> Result<(), WaveError> {
        if point.len() != self.columns.len() {
            return Err(WaveError::PointWidthMismatch {
                expected: self.columns.len(),
                got: point.len(),
            });
        }
        for (column, v) in self.columns.iter_mut().zip(point) {
            column.push(*v);
        }
        Ok(())
    }

    pub(crate) fn num_points(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Turn the raw columns into a table. For AC analyses adjacent column
    /// pairs become one complex column each; the scale stays real.
    pub(crate) fn finish(self) -> Result<DataTable, WaveError> {
        let SegmentBuilder {
            analysis,
            num_vars,
            columns,
        } = self;
        if analysis != AnalysisKind::Ac {
            return DataTable::new(columns.into_iter().map(Column::Real).collect());
        }
        let expected = 1 + 2 * num_vars.saturating_sub(1);
        if columns.len() != expected {
            return Err(WaveError::PointWidthMismatch {
                expected,
                got: columns.len(),
            });
        }
        let mut out = Vec::with_capacity(num_vars);
        let mut iter = columns.into_iter();
        match iter.next() {
            Some(scale) => out.push(Column::Real(scale)),
            None => return DataTable::new(out),
        }
        loop {
            match (iter.next(), iter.next()) {
                (Some(re), Some(im)) => {
                    let paired = re
                        .into_iter()
                        .zip(im)
                        .map(|(r, i)| Complex64::new(r, i))
                        .collect();
                    out.push(Column::Complex(paired));
                }
                (None, _) => break,
                (Some(_), None) => {
                    return Err(WaveError::PointWidthMismatch {
                        expected,
                        got: out.len() * 2,
                    })
                }
            }
        }
        DataTable::new(out)
    }
}

/// Drain the decoder into one table per segment, resolving the sweep-value
/// vector from whichever layout the file uses.
pub(crate) fn read_tables<R: Read>(
    mut decoder: SampleDecoder<R>,
    header: &WaveHeader,
) -> Result<(Vec<DataTable>, Option<Vec<f64>>), WaveError> {
    let width = header.disk_point_width();
    let num_vars = header.num_vars();
    let swept = header.sweep_param.is_some();

    let mut tables: Vec<DataTable> = Vec::new();
    let mut inline_values: Vec<f64> = Vec::new();
    let mut current = SegmentBuilder::new(header.analysis, num_vars, width);
    let mut segments = 0usize;
    let mut point: Vec<f64> = Vec::with_capacity(width);
    loop {
        match decoder.next_event(&mut point)? {
            SampleEvent::NewSegment { sweep_value } => {
                if segments > 0 {
                    let done = std::mem::replace(
                        &mut current,
                        SegmentBuilder::new(header.analysis, num_vars, width),
                    );
                    trace!("segment {} closed with {} point(s)", segments, done.num_points());
                    tables.push(done.finish()?);
                }
                segments += 1;
                if !swept && segments > 1 {
                    return Err(WaveError::StraySegment);
                }
                if let Some(v) = sweep_value {
                    inline_values.push(v);
                }
            }
            SampleEvent::Point => current.push_point(&point)?,
            SampleEvent::Finished => break,
        }
    }
    if segments > 0 {
        trace!("segment {} closed with {} point(s)", segments, current.num_points());
        tables.push(current.finish()?);
    }
    debug!("sample region held {} segment(s)", tables.len());

    let sweep_values = match (&header.sweep_tail, swept) {
        (Some(tail), _) => {
            if tail.len() != tables.len() {
                return Err(WaveError::SweepCountMismatch {
                    segments: tables.len(),
                    values: tail.len(),
                });
            }
            Some(tail.clone())
        }
        (None, true) => {
            if inline_values.len() != tables.len() {
                return Err(WaveError::SweepCountMismatch {
                    segments: tables.len(),
                    values: inline_values.len(),
                });
            }
            Some(inline_values)
        }
        (None, false) => None,
    };
    Ok((tables, sweep_values))
}
