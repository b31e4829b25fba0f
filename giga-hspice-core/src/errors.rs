/// Basic Error types.
#[derive(Debug)]
pub enum WaveError {
    /// TryFromSliceError from the std library.
    TryFromSlice(std::array::TryFromSliceError),
    /// FromUtf8Error from the std library.
    TryFromUtf8(std::string::FromUtf8Error),
    /// IoError from the std library.
    StdIoError(std::io::Error),
    /// The source ended in the middle of a record.
    UnexpectedEof { need: usize, got: usize },
    /// The two lengths framing a block disagree.
    BlockLengthMismatch { lead: u32, trail: u32 },
    /// A block length that cannot be real (zero, or absurdly large).
    BadBlockLength { l: u32 },
    /// The source ended inside a block.
    TruncatedBlock { need: usize, got: usize },
    /// The header carries no known post-version marker.
    UnknownPostVersion { found: String },
    /// A byte in the type-code region is not an ASCII digit.
    BadTypeCode { code: u8 },
    /// A malformed fixed-width header field.
    BadHeaderField { field: &'static str, msg: String },
    /// The header terminator never appeared.
    MissingHeaderTerminator,
    /// A point is wider or narrower than the variable catalogue allows.
    PointWidthMismatch { expected: usize, got: usize },
    /// Columns of one table disagree in length.
    ColumnLengthMismatch { a: usize, b: usize },
    /// A column holds the wrong value kind for its analysis.
    BadColumnKind { table: usize, column: usize },
    /// Sweep segments and sweep values disagree in number.
    SweepCountMismatch { segments: usize, values: usize },
    /// Data continues past the terminating sentinel of an unswept stream.
    StraySegment,
    /// The rawfile could not be created or written.
    OutputFile(std::io::Error),
    #[cfg(feature = "to_json")]
    /// Serialisation/Deserialisation error.
    SerdeError(serde_json::Error),
}

/// The five failure families reported at the public boundary.
///
/// Individual [`WaveError`] variants carry the detail; the kind is what a
/// caller branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An underlying read failed or the source ended mid-record.
    Io,
    /// The physical block envelope is broken.
    Framing,
    /// The logical header or its fields cannot be parsed.
    Format,
    /// Decoded content contradicts what the header declared.
    Consistency,
    /// The output file could not be created or written.
    Output,
}

impl WaveError {
    /// Collapse the variant into its [`ErrorKind`].
    /// ```
    /// use giga_hspice_core::errors::{ErrorKind, WaveError};
    ///
    /// let e = WaveError::BlockLengthMismatch { lead: 512, trail: 4 };
    /// assert_eq!(e.kind(), ErrorKind::Framing);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        use self::WaveError::*;
        match self {
            StdIoError(_) | UnexpectedEof { .. } => ErrorKind::Io,
            BlockLengthMismatch { .. } | BadBlockLength { .. } | TruncatedBlock { .. } => {
                ErrorKind::Framing
            }
            TryFromSlice(_) | TryFromUtf8(_) | UnknownPostVersion { .. } | BadTypeCode { .. }
            | BadHeaderField { .. } | MissingHeaderTerminator => ErrorKind::Format,
            PointWidthMismatch { .. } | ColumnLengthMismatch { .. } | BadColumnKind { .. }
            | SweepCountMismatch { .. } | StraySegment => ErrorKind::Consistency,
            OutputFile(_) => ErrorKind::Output,
            #[cfg(feature = "to_json")]
            SerdeError(_) => ErrorKind::Format,
        }
    }
}

impl From<std::array::TryFromSliceError> for WaveError {
    fn from(e: std::array::TryFromSliceError) -> Self {
        Self::TryFromSlice(e)
    }
}

impl From<std::string::FromUtf8Error> for WaveError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::TryFromUtf8(e)
    }
}

impl From<std::io::Error> for WaveError {
    fn from(e: std::io::Error) -> Self {
        Self::StdIoError(e)
    }
}

impl std::fmt::Display for WaveError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use self::WaveError::*;
        match self {
            #[cfg(feature = "to_json")]
            SerdeError(x) => write!(fmt, "{}", x),
            StdIoError(x) => write!(fmt, "{}", x),
            TryFromSlice(x) => write!(fmt, "{}", x),
            TryFromUtf8(x) => write!(fmt, "{}", x),
            UnexpectedEof { need, got } => write!(fmt, "Source ended mid-record ({} of {} bytes read)", got, need),
            BlockLengthMismatch { lead, trail } => write!(fmt, "Block trailer length ({}) does not match its leading length ({})", trail, lead),
            BadBlockLength { l } => write!(fmt, "Block length {} is not plausible for this container", l),
            TruncatedBlock { need, got } => write!(fmt, "Source ended inside a block ({} of {} bytes read)", got, need),
            UnknownPostVersion { found } => write!(fmt, "No known post version in header (found '{}')", found),
            BadTypeCode { code } => write!(fmt, "Type-code region holds a non-digit byte: 0x{:02x}", code),
            BadHeaderField { field, msg } => write!(fmt, "Invalid header field '{}': {}", field, msg),
            MissingHeaderTerminator => write!(fmt, "Header terminator '$&%#' not found"),
            PointWidthMismatch { expected, got } => write!(fmt, "Point width is {}, but the variable catalogue needs {}", got, expected),
            ColumnLengthMismatch { a, b } => write!(fmt, "Columns of one table have different lengths ({} and {})", a, b),
            BadColumnKind { table, column } => write!(fmt, "Table {}, column {} does not hold the value kind its analysis requires", table, column),
            SweepCountMismatch { segments, values } => write!(fmt, "Found {} sweep segment(s), but {} sweep value(s)", segments, values),
            StraySegment => write!(fmt, "Data continues past the terminating sentinel, but no sweep parameter was declared"),
            OutputFile(e) => write!(fmt, "Could not write rawfile: {}", e),
        }
    }
}

impl From<WaveError> for String {
    fn from(e: WaveError) -> String {
        e.to_string()
    }
}

impl std::error::Error for WaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use self::WaveError::*;
        match self {
            #[cfg(feature = "to_json")]
            SerdeError(x) => x.source(),
            StdIoError(x) | OutputFile(x) => x.source(),
            TryFromSlice(x) => x.source(),
            TryFromUtf8(x) => x.source(),
            _ => None,
        }
    }
}
