use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::axis::domain::DomainConverter;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// RawMatrix – the parsed text dump, one row per time frame
// ---------------------------------------------------------------------------

/// Magnitudes as written by the FFT tool: row = time frame, column = bin.
/// Every row has the same length; the loader guarantees it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatrix {
    rows: Vec<Vec<f64>>,
}

impl RawMatrix {
    /// Wrap rows that have already been checked for uniform width.
    pub(crate) fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        RawMatrix { rows }
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of time frames.
    pub fn n_time(&self) -> usize {
        self.rows.len()
    }

    /// Number of frequency bins per frame (0 for an empty matrix).
    pub fn n_freq(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SampleDomain – static parameters for unit conversion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleDomain {
    pub converter: DomainConverter,
    pub n_time: usize,
    pub n_freq: usize,
}

impl SampleDomain {
    pub fn new(converter: DomainConverter, matrix: &RawMatrix) -> Self {
        SampleDomain {
            converter,
            n_time: matrix.n_time(),
            n_freq: matrix.n_freq(),
        }
    }
}

// ---------------------------------------------------------------------------
// Bound – a physical upper limit or the "max" sentinel
// ---------------------------------------------------------------------------

/// Upper bound of a selection.  `Max` means "the natural extent of the data".
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(try_from = "RawBound")]
pub enum Bound {
    #[default]
    Max,
    Value(f64),
}

impl Bound {
    /// Resolve the sentinel against the natural maximum.
    pub fn or_max(self, natural: f64) -> f64 {
        match self {
            Bound::Max => natural,
            Bound::Value(v) => v,
        }
    }
}

impl FromStr for Bound {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("max") {
            return Ok(Bound::Max);
        }
        s.parse::<f64>()
            .map(Bound::Value)
            .map_err(|_| ConfigError::Bound(s.to_string()))
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Max => write!(f, "max"),
            Bound::Value(v) => write!(f, "{v}"),
        }
    }
}

/// Config files may spell a bound as a number or as the string `"max"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBound {
    Number(f64),
    Text(String),
}

impl TryFrom<RawBound> for Bound {
    type Error = ConfigError;

    fn try_from(raw: RawBound) -> Result<Self, Self::Error> {
        match raw {
            RawBound::Number(v) => Ok(Bound::Value(v)),
            RawBound::Text(s) => s.parse(),
        }
    }
}

// ---------------------------------------------------------------------------
// SelectionWindow – the physical region to display
// ---------------------------------------------------------------------------

/// Time bounds in seconds, frequency bounds in Hertz.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionWindow {
    pub t_min: f64,
    pub t_max: Bound,
    pub f_min: f64,
    pub f_max: Bound,
}

impl SelectionWindow {
    /// Everything: `t1=0, t2=max, f1=0, f2=max`.
    pub fn full() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// DisplayMatrix – frequency rows, time columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayMatrix {
    rows: Vec<Vec<f64>>,
}

impl DisplayMatrix {
    pub(crate) fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        DisplayMatrix { rows }
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of frequency bins shown.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of time frames shown.
    pub fn n_cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }
}

/// Output of window selection: the matrix plus the dimensions the tick
/// labeller needs to recover the physical maxima.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub matrix: DisplayMatrix,
    /// `n_time * n_freq` of the raw input.
    pub time_samples: usize,
    /// Frequency bins after positive-half truncation.
    pub fft_size: usize,
}
