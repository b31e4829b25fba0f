//! This contains the enums that describe what the header of a waveform file
//! declares: the kind of each variable, the analysis genre and the container
//! generation ("post version").
//!
//! The variable kinds are carried as single ASCII digits in the type-code
//! region of the header, which lends itself well to being represented by an
//! enum with fixed numerical values. Codes the catalogue does not name are
//! collapsed into an untyped variant rather than rejected, because simulators
//! disagree about the rarer codes and the data is readable either way.
use num::FromPrimitive;
#[cfg(any(feature = "to_json", feature = "serde"))]
use serde::{Deserialize, Serialize};

use crate::errors::*;

/// The kind of a simulation variable, from its type-code digit.
///
/// The first code of the region describes the scale (the independent axis);
/// the remaining codes describe the data variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[repr(C)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub enum VarKind {
    Frequency = 1,
    Time = 2,
    Voltage = 3,
    Current = 4,
    /// Any code the catalogue does not name.
    Notype,
}

impl VarKind {
    /// NB: Unknown codes give `Notype` rather than an error; the data behind
    /// them is still perfectly readable.
    pub fn new(source: u8) -> Self {
        Self::from_u8(source).unwrap_or(Self::Notype)
    }

    /// Parse a kind straight from a byte of the ASCII type-code region.
    ///
    /// A byte that is not an ASCII digit fails; the region is corrupt.
    /// ```
    /// use giga_hspice_core::enums::VarKind;
    ///
    /// assert_eq!(VarKind::from_ascii_digit(b'2').unwrap(), VarKind::Time);
    /// assert_eq!(VarKind::from_ascii_digit(b'7').unwrap(), VarKind::Notype);
    /// assert!(VarKind::from_ascii_digit(b'x').is_err());
    /// ```
    pub fn from_ascii_digit(digit: u8) -> Result<Self, WaveError> {
        if !digit.is_ascii_digit() {
            return Err(WaveError::BadTypeCode { code: digit });
        }
        Ok(Self::new(digit - b'0'))
    }

    /// The lowercase token used by the `Variables:` table of a SPICE3
    /// rawfile.
    pub fn spice3_token(self) -> &'static str {
        match self {
            Self::Frequency => "frequency",
            Self::Time => "time",
            Self::Voltage => "voltage",
            Self::Current => "current",
            Self::Notype => "notype",
        }
    }
}

impl std::fmt::Display for VarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{}", self.spice3_token())
    }
}

/// The analysis genre of a decoded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub enum AnalysisKind {
    Transient,
    Ac,
    Dc,
}

impl AnalysisKind {
    /// Determine the analysis from the header tag, falling back to the
    /// scale's kind when the tag field is blank.
    ///
    /// The tag is matched case-insensitively. `tran` wins over `dc`, which
    /// wins over `ac`, so that tags such as "DC transfer characteristic" do
    /// not trip over the `ac` in "characteristic".
    pub fn from_tag(tag: &str, scale: VarKind) -> Result<Self, WaveError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(Self::from_scale(scale));
        }
        let lowered = tag.to_ascii_lowercase();
        if lowered.contains("tran") {
            Ok(Self::Transient)
        } else if lowered.contains("dc") || lowered.contains("sw") {
            Ok(Self::Dc)
        } else if lowered.contains("ac") {
            Ok(Self::Ac)
        } else {
            Err(WaveError::BadHeaderField {
                field: "analysis",
                msg: format!("unrecognised tag '{}'", tag),
            })
        }
    }

    /// The analysis a scale of this kind implies: time sweeps are transient,
    /// frequency sweeps are AC, anything else is a DC transfer sweep.
    pub fn from_scale(scale: VarKind) -> Self {
        match scale {
            VarKind::Time => Self::Transient,
            VarKind::Frequency => Self::Ac,
            _ => Self::Dc,
        }
    }

    /// The short lowercase name of the analysis.
    /// ```
    /// use giga_hspice_core::enums::AnalysisKind;
    ///
    /// assert_eq!(AnalysisKind::Transient.as_str(), "transient");
    /// assert_eq!(AnalysisKind::Ac.as_str(), "ac");
    /// assert_eq!(AnalysisKind::Dc.as_str(), "dc");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Ac => "ac",
            Self::Dc => "dc",
        }
    }

    /// The `Plotname:` line a SPICE3 rawfile uses for this analysis.
    pub fn plotname(self) -> &'static str {
        match self {
            Self::Transient => "Transient Analysis",
            Self::Ac => "AC Analysis",
            Self::Dc => "DC transfer characteristic",
        }
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

/// A generation of the container format, named after its `.option post`
/// marker.
///
/// The generation decides the sample element width and with it the exact
/// bit pattern of the scale sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub enum Dialect {
    /// Markers `9007` and `9601`: 32-bit IEEE-754 samples.
    Post9601,
    /// Marker `2001`: 64-bit IEEE-754 samples.
    Post2001,
}

impl Dialect {
    /// Resolve a marker token to its generation.
    /// ```
    /// use giga_hspice_core::enums::Dialect;
    ///
    /// assert_eq!(Dialect::from_marker("9007").unwrap(), Dialect::Post9601);
    /// assert_eq!(Dialect::from_marker("9601").unwrap(), Dialect::Post9601);
    /// assert_eq!(Dialect::from_marker("2001").unwrap(), Dialect::Post2001);
    /// assert!(Dialect::from_marker("1999").is_err());
    /// ```
    pub fn from_marker(marker: &str) -> Result<Self, WaveError> {
        match marker {
            "9007" | "9601" => Ok(Self::Post9601),
            "2001" => Ok(Self::Post2001),
            other => Err(WaveError::UnknownPostVersion {
                found: other.to_string(),
            }),
        }
    }

    /// The byte length of one sample element.
    pub fn element_len(self) -> usize {
        match self {
            Self::Post9601 => 4,
            Self::Post2001 => 8,
        }
    }

    /// The scale value that terminates a segment, as it comes out of this
    /// generation's element width.
    ///
    /// NB: For the 32-bit generation the sentinel must be compared after
    /// widening, which shifts it off the exact `1.0e30`.
    pub fn sentinel(self) -> f64 {
        match self {
            Self::Post9601 => f64::from(1.0e30f32),
            Self::Post2001 => crate::SCALE_SENTINEL,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            Self::Post9601 => write!(f, "9601"),
            Self::Post2001 => write!(f, "2001"),
        }
    }
}
