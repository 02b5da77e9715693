use serde::Serialize;

use super::scale::scale;
use crate::error::{ConfigError, Result};

// ---------------------------------------------------------------------------
// Tick – one labelled position on an axis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    /// Pixel offset from the axis origin.
    pub pixel: usize,
    /// Physical value (seconds or Hertz).
    pub value: f64,
    /// `value` rendered the way the axis shows it.
    pub label: String,
}

pub type TickSet = Vec<Tick>;

/// Axis label format: width 3, one decimal.
pub fn format_label(value: f64) -> String {
    format!("{value:3.1}")
}

// ---------------------------------------------------------------------------
// Tick generation
// ---------------------------------------------------------------------------

/// Build the tick set for one axis spanning `pixel_extent` pixels.
///
/// Every pixel `0..pixel_extent` is first mapped onto the natural physical
/// range `[physical_min, physical_max]`, then onto the range the caller asked
/// to display, `[requested_min, requested_max]`.  Only every `step`-th pixel,
/// `step = pixel_extent / tick_count`, is kept.
///
/// `axis` only names the axis in error messages.
pub fn labels(
    axis: &'static str,
    pixel_extent: usize,
    physical_min: f64,
    physical_max: f64,
    requested_min: f64,
    requested_max: f64,
    tick_count: usize,
) -> Result<TickSet> {
    if pixel_extent < 2 {
        return Err(ConfigError::PixelExtent(pixel_extent).into());
    }
    check_tick_count(axis, tick_count, pixel_extent)?;

    let step = pixel_extent / tick_count;
    let pixels: Vec<f64> = (0..pixel_extent).map(|p| p as f64).collect();
    let natural = scale(&pixels, physical_min, physical_max)?;
    let requested = scale(&natural, requested_min, requested_max)?;

    Ok(requested
        .into_iter()
        .enumerate()
        .step_by(step)
        .map(|(pixel, value)| Tick {
            pixel,
            value,
            label: format_label(value),
        })
        .collect())
}

/// `1 <= tick_count <= pixel_extent`.
pub fn check_tick_count(
    axis: &'static str,
    tick_count: usize,
    pixel_extent: usize,
) -> std::result::Result<(), ConfigError> {
    if tick_count == 0 || tick_count > pixel_extent {
        return Err(ConfigError::TickCount {
            axis,
            count: tick_count,
            extent: pixel_extent,
        });
    }
    Ok(())
}
