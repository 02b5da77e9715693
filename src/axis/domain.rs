use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Sample index <-> physical unit conversions
// ---------------------------------------------------------------------------

/// Converts between sample indices and seconds / Hertz for a fixed sampling
/// rate.  Construction rejects non-positive rates, so every method is total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainConverter {
    sample_freq: f64,
}

impl DomainConverter {
    pub fn new(sample_freq: f64) -> Result<Self, ConfigError> {
        if !sample_freq.is_finite() || sample_freq <= 0.0 {
            return Err(ConfigError::SampleFrequency(sample_freq));
        }
        Ok(Self { sample_freq })
    }

    /// `s = t * fs`
    pub fn time_to_sample(&self, time: f64) -> f64 {
        time * self.sample_freq
    }

    /// `t = s / fs`
    pub fn sample_to_time(&self, sample: f64) -> f64 {
        sample / self.sample_freq
    }

    /// `s = f * N / fs`, where `n` is the transform size.
    pub fn freq_to_sample(&self, freq: f64, n: usize) -> f64 {
        freq * n as f64 / self.sample_freq
    }

    /// `f = s * fs / N`
    pub fn sample_to_freq(&self, sample: f64, n: usize) -> f64 {
        sample * self.sample_freq / n as f64
    }
}
