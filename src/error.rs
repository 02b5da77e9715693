use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Malformed input text or container.  Fatal before any windowing happens.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("row {row}, column {column}: '{token}' is not a number")]
    NotNumeric {
        row: usize,
        column: usize,
        token: String,
    },

    #[error("row {row}: malformed complex value near '{token}' (expected '<re> + i<im>')")]
    MalformedComplex { row: usize, token: String },

    #[error("row {row}, column {column}: magnitude {value} is not finite")]
    NonFinite { row: usize, column: usize, value: f64 },

    #[error("row {row} has {found} values but row 0 has {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Invalid user-supplied settings.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("sample frequency must be positive, got {0}")]
    SampleFrequency(f64),

    #[error("{axis} tick count must be between 1 and {extent}, got {count}")]
    TickCount {
        axis: &'static str,
        count: usize,
        extent: usize,
    },

    #[error("pixel extent must be at least 2, got {0}")]
    PixelExtent(usize),

    #[error("'{0}' is neither a number nor 'max'")]
    Bound(String),

    #[error("{name} must be a finite, non-negative value, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// A window that resolves to nothing.
#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("input matrix has no rows")]
    Empty,

    #[error("input rows need at least 2 frequency bins, got {0}")]
    TooFewBins(usize),

    #[error("{axis} slice [{start}, {end}) is empty")]
    EmptySlice {
        axis: &'static str,
        start: usize,
        end: usize,
    },
}

/// Two-point scaling over a degenerate range.
#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("need at least 2 values to scale, got {0}")]
    TooShort(usize),

    #[error("first and last values are both {0}; cannot scale a zero-width range")]
    ZeroWidth(f64),
}

/// Crate-level error aggregating every stage.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("scale error: {0}")]
    Scale(#[from] ScaleError),
}

pub type Result<T> = std::result::Result<T, Error>;
