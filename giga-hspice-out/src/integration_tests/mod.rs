// Copyright (C) 2024 by GiGa infosystems
//! This module uses `giga_hspice_in` and `giga_hspice_out` together to make
//! conversion roundtrip tests and observe whether the crates work in a
//! compatible manner. It carries a small generator for container fixtures
//! and a throwaway parser for the rawfiles the crate writes.
use giga_hspice_core::{
    AnalysisKind, Column, Complex64, DataTable, VarKind, Variable, WaveformResult,
};

mod raw_roundtrip;

/// A rawfile split back into its ASCII header and binary payload.
pub(crate) struct ParsedRaw {
    pub(crate) header: String,
    pub(crate) payload: Vec<u8>,
}

impl ParsedRaw {
    pub(crate) fn parse(bytes: &[u8]) -> Self {
        let marker = b"Binary:\n";
        let pos = bytes
            .windows(marker.len())
            .position(|w| w == marker)
            .expect("rawfile should carry a Binary: marker");
        let end = pos + marker.len();
        ParsedRaw {
            header: String::from_utf8(bytes[..end].to_vec()).expect("ASCII header"),
            payload: bytes[end..].to_vec(),
        }
    }

    /// The value of a `Key: value` header line.
    pub(crate) fn field(&self, key: &str) -> Option<&str> {
        let prefix = format!("{}: ", key);
        self.header
            .lines()
            .find_map(|l| l.strip_prefix(&prefix))
            .map(str::trim)
    }

    /// The lines of the `Variables:` table.
    pub(crate) fn variable_lines(&self) -> Vec<&str> {
        self.header
            .lines()
            .filter(|l| l.starts_with('\t'))
            .collect()
    }

    /// The payload as little-endian doubles.
    pub(crate) fn doubles(&self) -> Vec<f64> {
        assert_eq!(self.payload.len() % 8, 0, "payload must be whole doubles");
        self.payload
            .chunks_exact(8)
            .map(|c| {
                let mut b = [0u8; 8];
                b.copy_from_slice(c);
                f64::from_le_bytes(b)
            })
            .collect()
    }
}

pub(crate) fn transient_result() -> WaveformResult {
    let variables = vec![
        Variable::new("TIME", VarKind::Time),
        Variable::new("v(out)", VarKind::Voltage),
        Variable::new("i(vdd)", VarKind::Current),
    ];
    let table = DataTable::new(vec![
        Column::Real(vec![0.0, 1.0e-9, 2.0e-9, 3.0e-9]),
        Column::Real(vec![0.0, 0.6, 1.1, 1.2]),
        Column::Real(vec![1.0e-3, 0.8e-3, 0.2e-3, 0.1e-3]),
    ])
    .expect("columns agree");
    WaveformResult::new(
        "step response".to_string(),
        "Mon Jul 14 10:00:00 2025".to_string(),
        AnalysisKind::Transient,
        variables,
        vec![table],
        None,
    )
    .expect("valid result")
}

pub(crate) fn ac_result() -> WaveformResult {
    let variables = vec![
        Variable::new("HERTZ", VarKind::Frequency),
        Variable::new("v(out)", VarKind::Voltage),
    ];
    let table = DataTable::new(vec![
        Column::Real(vec![1.0, 10.0, 100.0]),
        Column::Complex(vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(0.5, -0.5),
            Complex64::new(0.1, -0.2),
        ]),
    ])
    .expect("columns agree");
    WaveformResult::new(
        "bode".to_string(),
        "Mon Jul 14 10:00:00 2025".to_string(),
        AnalysisKind::Ac,
        variables,
        vec![table],
        None,
    )
    .expect("valid result")
}

pub(crate) fn swept_result() -> WaveformResult {
    let variables = vec![
        Variable::new("vin", VarKind::Voltage),
        Variable::new("v(out)", VarKind::Voltage),
    ];
    let segment = |offset: f64| {
        DataTable::new(vec![
            Column::Real(vec![0.0, 0.5, 1.0]),
            Column::Real(vec![offset, offset + 0.4, offset + 0.9]),
        ])
        .expect("columns agree")
    };
    WaveformResult::new(
        "transfer".to_string(),
        "Mon Jul 14 10:00:00 2025".to_string(),
        AnalysisKind::Dc,
        variables,
        vec![segment(0.0), segment(1.0)],
        Some((Variable::new("temp", VarKind::Notype), vec![25.0, 75.0])),
    )
    .expect("valid result")
}

/// A generator for minimal 9601, big-endian container fixtures, to feed the
/// conversion entry with real input files.
pub(crate) struct InputFixture {
    pub(crate) tag: &'static str,
    pub(crate) vars: Vec<(&'static str, u8)>,
    /// Points per segment, in on-disk width.
    pub(crate) segments: Vec<Vec<Vec<f64>>>,
    /// Inline sweep values, one per segment.
    pub(crate) sweep: Option<(&'static str, Vec<f64>)>,
}

impl InputFixture {
    pub(crate) fn transient() -> Self {
        InputFixture {
            tag: "transient",
            vars: vec![("TIME", 2), ("v(out)", 3)],
            segments: vec![(0..10)
                .map(|i| vec![i as f64 * 1.0e-9, 0.125 * i as f64])
                .collect()],
            sweep: None,
        }
    }

    pub(crate) fn ac() -> Self {
        InputFixture {
            tag: "ac",
            vars: vec![("HERTZ", 1), ("v(out)", 3)],
            segments: vec![(0..5)
                .map(|i| vec![10f64.powi(i), 0.5, -0.25])
                .collect()],
            sweep: None,
        }
    }

    pub(crate) fn dc() -> Self {
        InputFixture {
            tag: "dc sweep",
            vars: vec![("vin", 3), ("v(out)", 3)],
            segments: vec![
                (0..4).map(|i| vec![0.5 * i as f64, 0.4 * i as f64]).collect(),
                (0..4).map(|i| vec![0.5 * i as f64, 0.3 * i as f64]).collect(),
            ],
            sweep: Some(("temp", vec![25.0, 75.0])),
        }
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        const BLOCK_LEN: usize = 256;
        let nsweeps = self.sweep.is_some() as usize;
        let mut text = format!("{:>4}{:>4}{:>4}    9601    ", self.vars.len(), 0, nsweeps);
        text.push_str(&format!("{:<64}", "conversion fixture"));
        text.push_str(&format!("{:<24}", "Mon Jul 14 10:00:00 2025"));
        text.push_str(&format!("{:<16}", self.tag));
        for &(_, code) in &self.vars {
            text.push((b'0' + code) as char);
        }
        if self.sweep.is_some() {
            text.push('0');
        }
        for &(name, _) in &self.vars {
            text.push(' ');
            text.push_str(name);
        }
        if let Some((name, _)) = &self.sweep {
            text.push(' ');
            text.push_str(name);
        }
        text.push_str(" $&%#");

        let mut logical = text.into_bytes();
        let rem = logical.len() % BLOCK_LEN;
        if rem != 0 {
            logical.extend(std::iter::repeat(b' ').take(BLOCK_LEN - rem));
        }
        fn push(out: &mut Vec<u8>, v: f64) {
            out.extend_from_slice(&(v as f32).to_be_bytes());
        }
        let mut samples = Vec::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if let Some((_, values)) = &self.sweep {
                push(&mut samples, values[i]);
            }
            for point in segment {
                for &v in point {
                    push(&mut samples, v);
                }
            }
            push(&mut samples, 1.0e30);
        }
        push(&mut samples, 1.0e30);
        logical.extend(samples);

        let mut out = Vec::new();
        for chunk in logical.chunks(BLOCK_LEN) {
            let l = (chunk.len() as u32).to_be_bytes();
            out.extend_from_slice(&l);
            out.extend_from_slice(chunk);
            out.extend_from_slice(&l);
        }
        out
    }
}
