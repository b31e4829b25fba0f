//! This submodule reconstructs the logical header: the fixed ASCII preamble,
//! the type-code region, the variable names and the optional sweep-value
//! tail, up to and including the `$&%#` terminator.
use crate::block_framer::BlockFramer;

use giga_hspice_core::bitconverter::{ascii_field_to_string, ascii_field_to_usize};
use giga_hspice_core::enums::{AnalysisKind, Dialect, VarKind};
use giga_hspice_core::errors::WaveError;
use giga_hspice_core::{
    Variable, ANALYSIS_TAG_LEN, DATE_LEN, HEADER_TERMINATOR, POST2001_PREAMBLE_LEN,
    POST9601_PREAMBLE_LEN, TITLE_LEN,
};

use log::{debug, info};
use std::io::Read;

/// Variable names longer than this mean the name region is corrupt.
const MAX_NAME_LEN: usize = 256;
/// Bytes of the preamble needed to locate the post-version marker.
const MARKER_PROBE_LEN: usize = 32;

/// Everything the fixed part of the file declares about its content.
#[derive(Debug, Clone)]
pub struct WaveHeader {
    pub title: String,
    pub date: String,
    pub analysis: AnalysisKind,
    pub dialect: Dialect,
    /// The variable catalogue, scale first. The sweep parameter is kept
    /// separate.
    pub variables: Vec<Variable>,
    pub sweep_param: Option<Variable>,
    /// Sweep values carried in the header tail, when that layout is used.
    /// `None` means the values travel inline, one per segment.
    pub sweep_tail: Option<Vec<f64>>,
}

impl WaveHeader {
    /// Number of logical variables, scale included.
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// Width of one on-disk point in scalars. AC data variables occupy two
    /// physical columns each.
    pub fn disk_point_width(&self) -> usize {
        match self.analysis {
            AnalysisKind::Ac => 1 + 2 * (self.num_vars().saturating_sub(1)),
            _ => self.num_vars(),
        }
    }
}

/// Decode the logical header and leave the framer positioned on the block
/// boundary where the sample region begins.
pub(crate) fn read_header<R: Read>(framer: &mut BlockFramer<R>) -> Result<WaveHeader, WaveError> {
    let mut probe = [0u8; MARKER_PROBE_LEN];
    framer.read_logical_exact(&mut probe)?;

    // The 9007/9601 layout keeps the marker at 16..20 with 4-char count
    // fields before it; the 2001 layout widens the counts to 8 chars and
    // moves the marker to 24..32.
    let narrow_marker = &probe[16..20];
    let (dialect, nauto, nprobes, nsweeps, preamble_len) =
        if narrow_marker == &b"9601"[..] || narrow_marker == &b"9007"[..] {
            (
                Dialect::Post9601,
                ascii_field_to_usize(&probe[0..4], "nauto")?,
                ascii_field_to_usize(&probe[4..8], "nprobes")?,
                ascii_field_to_usize(&probe[8..12], "nsweeps")?,
                POST9601_PREAMBLE_LEN,
            )
        } else {
            let wide_marker = ascii_field_to_string(&probe[24..32]);
            if wide_marker != "2001" {
                return Err(WaveError::UnknownPostVersion {
                    found: if wide_marker.is_empty() {
                        ascii_field_to_string(narrow_marker)
                    } else {
                        wide_marker
                    },
                });
            }
            (
                Dialect::Post2001,
                ascii_field_to_usize(&probe[0..8], "nauto")?,
                ascii_field_to_usize(&probe[8..16], "nprobes")?,
                ascii_field_to_usize(&probe[16..24], "nsweeps")?,
                POST2001_PREAMBLE_LEN,
            )
        };

    let mut preamble = probe.to_vec();
    preamble.resize(preamble_len, 0);
    framer.read_logical_exact(&mut preamble[MARKER_PROBE_LEN..])?;

    let title_at = preamble_len - ANALYSIS_TAG_LEN - DATE_LEN - TITLE_LEN;
    let date_at = title_at + TITLE_LEN;
    let tag_at = date_at + DATE_LEN;
    let title = ascii_field_to_string(&preamble[title_at..date_at]);
    let date = ascii_field_to_string(&preamble[date_at..tag_at]);
    let tag = ascii_field_to_string(&preamble[tag_at..preamble_len]);

    if nsweeps > 1 {
        return Err(WaveError::BadHeaderField {
            field: "nsweeps",
            msg: format!("at most one sweep parameter is supported, found {}", nsweeps),
        });
    }
    let num_vars = nauto + nprobes;
    if num_vars == 0 {
        return Err(WaveError::BadHeaderField {
            field: "nauto",
            msg: "variable count is zero".to_string(),
        });
    }
    debug!(
        "post {} header: {} variable(s), {} probe(s), {} sweep(s)",
        dialect, nauto, nprobes, nsweeps
    );

    // Type-code region: one digit per variable, sweep parameter last.
    let mut codes = vec![0u8; num_vars + nsweeps];
    framer.read_logical_exact(&mut codes)?;
    let kinds = codes
        .iter()
        .map(|&d| VarKind::from_ascii_digit(d))
        .collect::<Result<Vec<_>, _>>()?;

    // Name region: one whitespace-separated token per type code. Padded and
    // unpadded name layouts both come down to tokenising.
    let mut names = Vec::with_capacity(num_vars + nsweeps);
    for _ in 0..num_vars + nsweeps {
        match read_token(framer)? {
            None => return Err(WaveError::MissingHeaderTerminator),
            Some(ref t) if t.as_bytes() == &HEADER_TERMINATOR[..] => {
                return Err(WaveError::BadHeaderField {
                    field: "names",
                    msg: format!(
                        "found {} name(s), but the catalogue declares {}",
                        names.len(),
                        num_vars + nsweeps
                    ),
                });
            }
            Some(t) => names.push(t),
        }
    }

    // Header tail: either nothing, or the sweep-value vector in ASCII.
    let mut tail: Vec<f64> = Vec::new();
    loop {
        match read_token(framer)? {
            None => return Err(WaveError::MissingHeaderTerminator),
            Some(ref t) if t.as_bytes() == &HEADER_TERMINATOR[..] => break,
            Some(t) => {
                if nsweeps == 0 {
                    return Err(WaveError::BadHeaderField {
                        field: "header tail",
                        msg: format!("unexpected token '{}' before the terminator", t),
                    });
                }
                let v = t.parse::<f64>().map_err(|e| WaveError::BadHeaderField {
                    field: "sweep values",
                    msg: format!("'{}': {}", t, e),
                })?;
                tail.push(v);
            }
        }
    }
    // The sample region starts on the next block boundary; what is left of
    // the terminator's block is padding.
    framer.skip_rest_of_block();

    let mut pairs: Vec<Variable> = names
        .into_iter()
        .zip(kinds)
        .map(|(name, kind)| Variable::new(name, kind))
        .collect();
    let sweep_param = if nsweeps == 1 { pairs.pop() } else { None };
    let variables = pairs;

    let scale_kind = variables[0].var_type;
    let analysis = AnalysisKind::from_tag(&tag, scale_kind)?;

    info!(
        "'{}' ({}): {} analysis, {} variable(s), scale '{}'",
        title,
        date,
        analysis,
        variables.len(),
        variables[0].name
    );
    if let Some(ref sweep) = sweep_param {
        debug!(
            "sweep parameter '{}', values {}",
            sweep.name,
            if tail.is_empty() {
                "inline".to_string()
            } else {
                format!("in header tail ({})", tail.len())
            }
        );
    }

    Ok(WaveHeader {
        title,
        date,
        analysis,
        dialect,
        variables,
        sweep_param,
        sweep_tail: if tail.is_empty() { None } else { Some(tail) },
    })
}

/// Read one whitespace-separated token from the logical stream. `None` at
/// clean end-of-file.
fn read_token<R: Read>(framer: &mut BlockFramer<R>) -> Result<Option<String>, WaveError> {
    let first = loop {
        match framer.read_logical_byte()? {
            None => return Ok(None),
            Some(b) if b.is_ascii_whitespace() || b == 0 => continue,
            Some(b) => break b,
        }
    };
    let mut token = vec![first];
    loop {
        match framer.read_logical_byte()? {
            None => break,
            Some(b) if b.is_ascii_whitespace() || b == 0 => break,
            Some(b) => {
                token.push(b);
                if token.len() > MAX_NAME_LEN {
                    return Err(WaveError::BadHeaderField {
                        field: "names",
                        msg: format!("token exceeds {} bytes", MAX_NAME_LEN),
                    });
                }
            }
        }
    }
    Ok(Some(String::from_utf8(token)?))
}
