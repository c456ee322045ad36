// Bands module - reduce FFT bins to per-band RMS energy
//
// Each band is a half-open frequency interval [low, high). A bin k (1..=n/2)
// with center frequency k·sample_rate/n belongs to the band containing that
// frequency. The band value is sqrt(mean(|X_k|²)) over its bins: by Parseval's
// theorem the summed squared bin magnitudes are a valid energy estimate for the
// matching slice of the time-domain signal.
//
// Bin ranges are resolved once when the layout is built, so a band that would
// hold no bins is rejected up front instead of producing NaN every frame.

use std::ops::Range;

use super::fft::FrequencyBins;
use crate::error::SpectralError;

/// Octave band boundaries (Hz) used by the visualizer: nine bands, 20 Hz - 10.2 kHz
pub const DEFAULT_BAND_BOUNDARIES_HZ: [f32; 10] = [
    20.0, 40.0, 80.0, 160.0, 320.0, 640.0, 1280.0, 2560.0, 5120.0, 10200.0,
];

/// Amplitude correction applied to bin magnitudes for a Hann-windowed signal
pub const DEFAULT_AMPLITUDE_CORRECTION: f32 = 2.0;

/// Maps FFT bins onto a fixed set of frequency bands
#[derive(Debug, Clone)]
pub struct BandAggregator {
    boundaries_hz: Vec<f32>,
    bin_ranges: Vec<Range<usize>>,
    fft_size: usize,
    sample_rate: u32,
    amplitude_correction: f32,
}

impl BandAggregator {
    /// Resolve band boundaries into bin ranges
    ///
    /// # Arguments
    /// * `boundaries_hz` - Strictly increasing band edges; bands = edges - 1
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `fft_size` - Transform length n (power of two, at least 2)
    ///
    /// # Errors
    /// `InvalidTransformLength`, `InvalidSampleRate`, `InvalidBandLayout`, or
    /// `DegenerateBand` for the first band that would contain no bins.
    pub fn new(
        boundaries_hz: &[f32],
        sample_rate: u32,
        fft_size: usize,
    ) -> Result<Self, SpectralError> {
        if fft_size < 2 || !fft_size.is_power_of_two() {
            return Err(SpectralError::InvalidTransformLength { len: fft_size });
        }
        if sample_rate == 0 {
            return Err(SpectralError::InvalidSampleRate { sample_rate });
        }
        validate_boundaries(boundaries_hz)?;

        let nyquist_bin = fft_size / 2;
        let bin_width = sample_rate as f64 / fft_size as f64;
        // First bin (1-based) whose center frequency reaches `hz`
        let first_bin_at = |hz: f32| -> usize {
            (1..=nyquist_bin)
                .find(|&k| bin_center_hz(k, sample_rate, fft_size) >= hz as f64)
                .unwrap_or(nyquist_bin + 1)
        };

        let mut bin_ranges = Vec::with_capacity(boundaries_hz.len() - 1);
        for (band, edges) in boundaries_hz.windows(2).enumerate() {
            let range = first_bin_at(edges[0])..first_bin_at(edges[1]);
            if range.is_empty() {
                return Err(SpectralError::DegenerateBand {
                    band,
                    low_hz: edges[0],
                    high_hz: edges[1],
                });
            }
            bin_ranges.push(range);
        }

        log::debug!(
            "[BandAggregator] {} bands over {} bins ({:.2} Hz/bin)",
            bin_ranges.len(),
            nyquist_bin,
            bin_width
        );

        Ok(Self {
            boundaries_hz: boundaries_hz.to_vec(),
            bin_ranges,
            fft_size,
            sample_rate,
            amplitude_correction: 1.0,
        })
    }

    /// Scale every bin magnitude by `correction` before squaring
    pub fn with_amplitude_correction(mut self, correction: f32) -> Self {
        self.amplitude_correction = correction;
        self
    }

    pub fn band_count(&self) -> usize {
        self.bin_ranges.len()
    }

    pub fn boundaries_hz(&self) -> &[f32] {
        &self.boundaries_hz
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn amplitude_correction(&self) -> f32 {
        self.amplitude_correction
    }

    /// Bin indices (1-based, Nyquist = n/2) covered by `band`
    pub fn bin_range(&self, band: usize) -> Option<Range<usize>> {
        self.bin_ranges.get(band).cloned()
    }

    /// Center frequency of bin `k` in Hz
    pub fn bin_frequency(&self, k: usize) -> f32 {
        bin_center_hz(k, self.sample_rate, self.fft_size) as f32
    }

    /// Band whose `[low, high)` interval contains `hz`
    pub fn band_for_frequency(&self, hz: f32) -> Option<usize> {
        self.boundaries_hz
            .windows(2)
            .position(|edges| hz >= edges[0] && hz < edges[1])
    }

    /// Compute per-band RMS amplitude into `output`
    ///
    /// # Errors
    /// `BufferLengthMismatch` if the spectrum length differs from the layout's
    /// transform length or `output` does not hold one slot per band.
    pub fn aggregate(&self, bins: &FrequencyBins, output: &mut [f32]) -> Result<(), SpectralError> {
        if bins.fft_size() != self.fft_size {
            return Err(SpectralError::BufferLengthMismatch {
                expected: self.fft_size,
                actual: bins.fft_size(),
            });
        }
        if output.len() != self.bin_ranges.len() {
            return Err(SpectralError::BufferLengthMismatch {
                expected: self.bin_ranges.len(),
                actual: output.len(),
            });
        }

        let gain = self.amplitude_correction * self.amplitude_correction;
        for (slot, range) in output.iter_mut().zip(&self.bin_ranges) {
            let energy: f32 = range.clone().map(|k| bins.power(k)).sum();
            let mean_square = gain * energy / range.len() as f32;
            *slot = mean_square.sqrt();
        }
        Ok(())
    }

    /// Allocating variant of [`aggregate`](Self::aggregate)
    pub fn aggregate_vec(&self, bins: &FrequencyBins) -> Result<Vec<f32>, SpectralError> {
        let mut output = vec![0.0; self.band_count()];
        self.aggregate(bins, &mut output)?;
        Ok(output)
    }
}

fn bin_center_hz(k: usize, sample_rate: u32, fft_size: usize) -> f64 {
    k as f64 * sample_rate as f64 / fft_size as f64
}

fn validate_boundaries(boundaries_hz: &[f32]) -> Result<(), SpectralError> {
    if boundaries_hz.len() < 2 {
        return Err(SpectralError::InvalidBandLayout {
            reason: format!(
                "need at least 2 boundaries, got {}",
                boundaries_hz.len()
            ),
        });
    }
    if let Some(bad) = boundaries_hz.iter().find(|hz| !hz.is_finite() || **hz < 0.0) {
        return Err(SpectralError::InvalidBandLayout {
            reason: format!("boundary {} is not a finite, non-negative frequency", bad),
        });
    }
    if let Some(edges) = boundaries_hz.windows(2).find(|edges| edges[1] <= edges[0]) {
        return Err(SpectralError::InvalidBandLayout {
            reason: format!(
                "boundaries must be strictly increasing ({} then {})",
                edges[0], edges[1]
            ),
        });
    }
    Ok(())
}
