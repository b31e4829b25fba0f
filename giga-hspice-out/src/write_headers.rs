// Copyright (C) 2024 by GiGa infosystems
//! This submodule renders the ASCII half of a rawfile: everything up to and
//! including the `Binary:` marker line.
use giga_hspice_core::{AnalysisKind, WaveformResult};

/// Total point count across every sweep segment. Swept inputs are emitted
/// as the concatenation of their segments.
pub fn total_points(result: &WaveformResult) -> usize {
    result.tables().iter().map(|t| t.num_points()).sum()
}

/// Whether the payload is written as complex pairs.
pub(crate) fn is_complex(result: &WaveformResult) -> bool {
    result.analysis == AnalysisKind::Ac
}

/// Render the rawfile header. Lines are LF-terminated ASCII; fields inside
/// the `Variables:` table are tab separated.
pub fn rawfile_header(result: &WaveformResult) -> String {
    let flags = if is_complex(result) { "complex" } else { "real" };
    let mut header = String::new();
    header.push_str(&format!("Title: {}\n", result.title));
    header.push_str(&format!("Date: {}\n", result.date));
    header.push_str(&format!("Plotname: {}\n", result.analysis.plotname()));
    header.push_str(&format!("Flags: {}\n", flags));
    header.push_str(&format!("No. Variables: {}\n", result.num_vars()));
    header.push_str(&format!("No. Points: {}\n", total_points(result)));
    header.push_str("Variables:\n");
    for (i, v) in result.variables().iter().enumerate() {
        header.push_str(&format!(
            "\t{}\t{}\t{}\n",
            i,
            v.name,
            v.var_type.spice3_token()
        ));
    }
    header.push_str("Binary:\n");
    header
}
