use std::ops::Range;

use log::debug;

use super::model::{Bound, DisplayMatrix, RawMatrix, SampleDomain, Selection, SelectionWindow};
use crate::error::{Result, SelectionError};

// ---------------------------------------------------------------------------
// Window selection
// ---------------------------------------------------------------------------

/// Cut the requested window out of `matrix` and orient it for display.
///
/// Pipeline (order matters):
/// 1. keep the first half of every frame (non-negative frequencies)
/// 2. reverse each frame so bin 0 becomes the last column
/// 3. slice time frames
/// 4. transpose: rows become frequency bins, columns time frames
/// 5. slice frequency rows
///
/// The returned `time_samples` is `n_time * n_freq` of the raw input and
/// `fft_size` the truncated bin count; the tick labeller recovers the
/// physical maxima from them.
pub fn select(
    matrix: &RawMatrix,
    window: &SelectionWindow,
    domain: &SampleDomain,
) -> Result<Selection> {
    if matrix.is_empty() {
        return Err(SelectionError::Empty.into());
    }
    let n_time = matrix.n_time();
    let n_freq = matrix.n_freq();
    if n_freq < 2 {
        return Err(SelectionError::TooFewBins(n_freq).into());
    }
    let time_samples = n_time * n_freq;

    let half = positive_half(matrix.rows());
    let reversed = reverse_frequency(half);
    let fft_size = n_freq / 2;

    let time_range = time_rows(window, domain, fft_size)?;
    let sliced = match time_range {
        Some(range) => reversed[range].to_vec(),
        None => reversed,
    };

    let transposed = transpose(&sliced);

    let freq_range = freq_rows(window, domain, n_freq, fft_size)?;
    let rows = match freq_range {
        Some(range) => transposed[range].to_vec(),
        None => transposed,
    };

    let matrix = DisplayMatrix::from_rows(rows);
    debug!(
        "selected {} bins x {} frames (time_samples={time_samples}, fft_size={fft_size})",
        matrix.n_rows(),
        matrix.n_cols()
    );

    Ok(Selection {
        matrix,
        time_samples,
        fft_size,
    })
}

/// First `n / 2` columns of every row.
pub fn positive_half(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    rows.iter().map(|r| r[..r.len() / 2].to_vec()).collect()
}

/// Reverse the column order of every row.
pub fn reverse_frequency(mut rows: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    for row in &mut rows {
        row.reverse();
    }
    rows
}

/// Swap rows and columns of a rectangular matrix.
pub fn transpose(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = rows.first().map_or(0, Vec::len);
    (0..width)
        .map(|col| rows.iter().map(|row| row[col]).collect())
        .collect()
}

/// Row range of the time slice, or `None` when the full range is selected.
///
/// `t2 = max` resolves to the raw element count (`n_time * n_freq`), and the
/// sample bounds are turned into frame indices by dividing by the truncated
/// width.
fn time_rows(
    window: &SelectionWindow,
    domain: &SampleDomain,
    fft_size: usize,
) -> Result<Option<Range<usize>>> {
    let dc = &domain.converter;
    let n_time = domain.n_time;
    let t_max = match window.t_max {
        Bound::Max => n_time * domain.n_freq,
        Bound::Value(t) => to_index(dc.time_to_sample(t)),
    };
    let t_min = to_index(dc.time_to_sample(window.t_min));

    if t_min == 0 && t_max == n_time {
        return Ok(None);
    }
    let range = clamp_range("time", t_min / fft_size, t_max / fft_size, n_time)?;
    debug!("time samples [{t_min}, {t_max}) -> frames {range:?}");
    Ok(Some(range))
}

/// Row range of the frequency slice (on the transposed matrix), or `None`
/// when the full range is selected.
fn freq_rows(
    window: &SelectionWindow,
    domain: &SampleDomain,
    n_freq: usize,
    fft_size: usize,
) -> Result<Option<Range<usize>>> {
    let dc = &domain.converter;
    let f_max = match window.f_max {
        Bound::Max => fft_size,
        Bound::Value(f) => to_index(dc.freq_to_sample(f, n_freq)),
    };
    let f_min = to_index(dc.freq_to_sample(window.f_min, n_freq));

    if f_min == 0 && f_max == fft_size {
        return Ok(None);
    }
    let range = clamp_range("frequency", f_min, f_max, fft_size)?;
    debug!("frequency bins {range:?}");
    Ok(Some(range))
}

/// Truncate a non-negative physical sample position to an index.
fn to_index(sample: f64) -> usize {
    if sample.is_finite() && sample > 0.0 {
        sample.floor() as usize
    } else {
        0
    }
}

/// `[start, end.min(len))`, rejecting empty results.
fn clamp_range(
    axis: &'static str,
    start: usize,
    end: usize,
    len: usize,
) -> Result<Range<usize>> {
    let end = end.min(len);
    if start >= end {
        return Err(SelectionError::EmptySlice { axis, start, end }.into());
    }
    Ok(start..end)
}
