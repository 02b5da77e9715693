use anyhow::Context;
use log::info;
use serde::Serialize;

use crate::axis::domain::DomainConverter;
use crate::axis::ticks::{TickSet, labels};
use crate::config::ViewConfig;
use crate::data::loader::load_file;
use crate::data::model::{DisplayMatrix, RawMatrix, SampleDomain};
use crate::data::window::select;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Render payload – everything a renderer needs, nothing it has to compute
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPayload {
    pub width: usize,
    pub height: usize,
    pub interpolation: String,
    /// Displayed time span `[t1, t2]` in seconds.
    pub time_range: [f64; 2],
    /// Displayed frequency span `[f1, f2]` in Hz.
    pub freq_range: [f64; 2],
    pub matrix: DisplayMatrix,
    pub time_ticks: TickSet,
    pub freq_ticks: TickSet,
}

/// Validate, load and transform.  Configuration errors surface before the
/// input file is opened.
pub fn run(config: &ViewConfig) -> anyhow::Result<RenderPayload> {
    let converter = config.validate().context("invalid configuration")?;
    config.log_summary();

    let raw = load_file(&config.input, config.token_format())?;
    let payload = build(&raw, config, converter)
        .with_context(|| format!("processing {}", config.input.display()))?;

    let (bins, frames) = payload.matrix.shape();
    info!("Display matrix: {bins} frequency bins x {frames} time frames");
    Ok(payload)
}

/// Cut the window out of `raw` and label both axes.
pub fn build(
    raw: &RawMatrix,
    config: &ViewConfig,
    converter: DomainConverter,
) -> Result<RenderPayload> {
    let domain = SampleDomain::new(converter, raw);
    let selection = select(raw, &config.window(), &domain)?;

    let t_max = converter.sample_to_time(selection.time_samples as f64);
    let t_high = config.t2.or_max(t_max);
    let fft_size = selection.fft_size;
    let f_max = converter.sample_to_freq(fft_size as f64, fft_size) / 2.0;
    let f_high = config.f2.or_max(f_max);

    let time_ticks = labels("time", config.width, 0.0, t_max, config.t1, t_high, config.nt)?;
    let freq_ticks = labels(
        "frequency",
        config.height,
        0.0,
        f_max,
        config.f1,
        f_high,
        config.nf,
    )?;

    Ok(RenderPayload {
        width: config.width,
        height: config.height,
        interpolation: config.interpolation.clone(),
        time_range: [config.t1, t_high],
        freq_range: [config.f1, f_high],
        matrix: selection.matrix,
        time_ticks,
        freq_ticks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{TokenFormat, parse_rows};
    use crate::data::model::Bound;
    use crate::error::{ConfigError, Error};

    fn four_by_six() -> RawMatrix {
        parse_rows(
            [
                "0 1 2 3 4 5",
                "10 11 12 13 14 15",
                "20 21 22 23 24 25",
                "30 31 32 33 34 35",
            ],
            TokenFormat::Magnitude,
        )
        .unwrap()
    }

    #[test]
    fn four_frames_six_bins_at_two_hertz() {
        let raw = four_by_six();
        let config = ViewConfig {
            fs: 2.0,
            nt: 2,
            ..ViewConfig::default()
        };
        let converter = config.validate().unwrap();
        let payload = build(&raw, &config, converter).unwrap();

        // Truncated to 3 bins, reversed, transposed to 3 x 4.
        assert_eq!(payload.matrix.shape(), (3, 4));
        assert_eq!(payload.matrix.rows()[0], vec![2.0, 12.0, 22.0, 32.0]);
        assert_eq!(payload.matrix.rows()[1], vec![1.0, 11.0, 21.0, 31.0]);
        assert_eq!(payload.matrix.rows()[2], vec![0.0, 10.0, 20.0, 30.0]);

        // t_max = 24 samples / 2 Hz.
        let t_max = 12.0;
        assert_eq!(payload.time_range, [0.0, t_max]);
        let pixels: Vec<usize> = payload.time_ticks.iter().map(|t| t.pixel).collect();
        assert_eq!(pixels, vec![0, 100]);
        assert_eq!(payload.time_ticks[0].value, 0.0);
        let mid = payload.time_ticks[1].value;
        assert!((mid - t_max * 100.0 / 199.0).abs() < 1e-9);
        assert!((mid - t_max / 2.0).abs() < 0.1);

        // Frequency axis tops out at fs / 2.
        assert_eq!(payload.freq_range, [0.0, 1.0]);
        assert_eq!(payload.freq_ticks.len(), 5);
        assert_eq!(payload.freq_ticks[0].label, "0.0");
    }

    #[test]
    fn requested_window_drives_the_labels() {
        let raw = four_by_six();
        let config = ViewConfig {
            fs: 2.0,
            t1: 3.0,
            t2: Bound::Value(9.0),
            f1: 0.0,
            f2: Bound::Value(0.6),
            ..ViewConfig::default()
        };
        let converter = config.validate().unwrap();
        let payload = build(&raw, &config, converter).unwrap();

        // time samples [6, 18) / 3 -> frames [2, 4); bins [0, floor(1.8)) = [0, 1)
        assert_eq!(payload.matrix.shape(), (1, 2));
        assert_eq!(payload.matrix.rows()[0], vec![22.0, 32.0]);

        assert_eq!(payload.time_ticks[0].value, 3.0);
        assert_eq!(payload.freq_ticks[0].value, 0.0);
        assert_eq!(payload.time_range, [3.0, 9.0]);
        assert_eq!(payload.freq_range, [0.0, 0.6]);
    }

    #[test]
    fn selection_errors_propagate() {
        let raw = four_by_six();
        let config = ViewConfig {
            t1: 50.0,
            ..ViewConfig::default()
        };
        let converter = config.validate().unwrap();
        assert!(matches!(
            build(&raw, &config, converter),
            Err(Error::Selection(_))
        ));
    }

    #[test]
    fn config_is_checked_before_the_file_is_read() {
        let config = ViewConfig {
            nt: 500,
            input: "/definitely/not/here.txt".into(),
            ..ViewConfig::default()
        };
        let err = run(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::TickCount { count: 500, .. })
        ));
    }
}
