use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::config::ViewConfig;
use crate::data::model::Bound;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rusty-spectrogram",
    version,
    about = "Spectrogram. The Y axis corresponds to frequency and the magnitude of each \
             frequency within a given time frame is the brightness of the pixel at that \
             frequency.",
    long_about = "Reads an FFT tool's spectrogram dump (one time frame per line), cuts out \
                  the requested time/frequency window, orients it frequency-by-time and \
                  writes the matrix plus axis tick labels for a renderer."
)]
pub struct Args {
    /// Spectrogram dump (.txt, .csv, .json or .parquet). Default: spectrogram.txt
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// JSON file with any of the options below; flags given here win.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sample frequency in Hz (default: 1)
    #[arg(long, aliases = ["sample-freq"])]
    pub fs: Option<f64>,

    /// Begin time in seconds (default: 0)
    #[arg(long)]
    pub t1: Option<f64>,

    /// End time in seconds or "max" (default: max)
    #[arg(long)]
    pub t2: Option<Bound>,

    /// Begin frequency in Hz (default: 0)
    #[arg(long)]
    pub f1: Option<f64>,

    /// End frequency in Hz or "max" (default: max)
    #[arg(long)]
    pub f2: Option<Bound>,

    /// Interpolation passed through to the renderer (default: nearest)
    #[arg(short = 'i', long)]
    pub interpolation: Option<String>,

    /// Number of ticks in time (default: 5, at most the plot width)
    #[arg(long)]
    pub nt: Option<usize>,

    /// Number of ticks in frequency (default: 5, at most the plot height)
    #[arg(long)]
    pub nf: Option<usize>,

    /// Plot width in pixels (default: 200)
    #[arg(long)]
    pub width: Option<usize>,

    /// Plot height in pixels (default: 100)
    #[arg(long)]
    pub height: Option<usize>,

    /// Cells are "<re> + i<im>" pairs; their magnitude is plotted.
    #[arg(long, overrides_with = "no_complex")]
    pub complex: bool,

    /// Cells are plain magnitudes (undoes "complex" from a config file).
    #[arg(long, overrides_with = "complex")]
    pub no_complex: bool,

    /// Where to write the result. Default: stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output layout
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Matrix, tick sets and render hints
    Json,
    /// Display matrix only, one frequency bin per record
    Csv,
}

/// Destination of the render payload.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputOptions {
    pub path: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Args {
    /// Layer the flags over the config file (if any) over the defaults.
    pub fn into_config(self) -> Result<(ViewConfig, OutputOptions)> {
        let mut config = match &self.config {
            Some(path) => ViewConfig::from_json_file(path)?,
            None => ViewConfig::default(),
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(fs) = self.fs {
            config.fs = fs;
        }
        if let Some(t1) = self.t1 {
            config.t1 = t1;
        }
        if let Some(t2) = self.t2 {
            config.t2 = t2;
        }
        if let Some(f1) = self.f1 {
            config.f1 = f1;
        }
        if let Some(f2) = self.f2 {
            config.f2 = f2;
        }
        if let Some(interpolation) = self.interpolation {
            config.interpolation = interpolation;
        }
        if let Some(nt) = self.nt {
            config.nt = nt;
        }
        if let Some(nf) = self.nf {
            config.nf = nf;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.complex {
            config.complex = true;
        } else if self.no_complex {
            config.complex = false;
        }

        let output = OutputOptions {
            path: self.output,
            format: self.format,
        };
        Ok((config, output))
    }
}
