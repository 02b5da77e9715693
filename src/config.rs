use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;

use crate::axis::domain::DomainConverter;
use crate::axis::ticks::check_tick_count;
use crate::data::loader::TokenFormat;
use crate::data::model::{Bound, SelectionWindow};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// View configuration
// ---------------------------------------------------------------------------

/// Everything one run needs, independent of where it came from (defaults,
/// a JSON file, command-line flags).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Spectrogram dump to read.
    pub input: PathBuf,

    /// Sample frequency in Hz.
    pub fs: f64,

    /// Begin / end time in seconds.
    pub t1: f64,
    pub t2: Bound,

    /// Begin / end frequency in Hz.
    pub f1: f64,
    pub f2: Bound,

    /// Interpolation hint handed to the renderer untouched.
    #[serde(alias = "i")]
    pub interpolation: String,

    /// Number of time / frequency ticks.
    pub nt: usize,
    pub nf: usize,

    /// Plot extent in pixels.  Only the ratio matters to a renderer, but
    /// tick spacing is computed on this grid.
    pub width: usize,
    pub height: usize,

    /// Cells are `<re> + i<im>` pairs rather than magnitudes.
    pub complex: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("spectrogram.txt"),
            fs: 1.0,
            t1: 0.0,
            t2: Bound::Max,
            f1: 0.0,
            f2: Bound::Max,
            interpolation: "nearest".to_string(),
            nt: 5,
            nf: 5,
            width: 200,
            height: 100,
            complex: false,
        }
    }
}

impl ViewConfig {
    /// Read a JSON config; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Check every setting before any data is touched and hand back the unit
    /// converter for the validated sample frequency.
    pub fn validate(&self) -> Result<DomainConverter, ConfigError> {
        let converter = DomainConverter::new(self.fs)?;

        for (name, value) in [("t1", self.t1), ("f1", self.f1)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        for (name, bound) in [("t2", self.t2), ("f2", self.f2)] {
            if let Bound::Value(value) = bound {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::Negative { name, value });
                }
            }
        }

        for extent in [self.width, self.height] {
            if extent < 2 {
                return Err(ConfigError::PixelExtent(extent));
            }
        }
        check_tick_count("time", self.nt, self.width)?;
        check_tick_count("frequency", self.nf, self.height)?;

        Ok(converter)
    }

    pub fn window(&self) -> SelectionWindow {
        SelectionWindow {
            t_min: self.t1,
            t_max: self.t2,
            f_min: self.f1,
            f_max: self.f2,
        }
    }

    pub fn token_format(&self) -> TokenFormat {
        if self.complex {
            TokenFormat::Complex
        } else {
            TokenFormat::Magnitude
        }
    }

    /// Echo the effective settings.
    pub fn log_summary(&self) {
        info!("Sampling freq: {}", self.fs);
        info!("t bottom: {}", self.t1);
        info!("t high: {}", self.t2);
        info!("f bottom: {}", self.f1);
        info!("f high: {}", self.f2);
        info!("Interpolation: {}", self.interpolation);
        info!("Time ticks: {}", self.nt);
        info!("Freq ticks: {}", self.nf);
    }
}
