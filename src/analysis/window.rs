// Window module - Hann tapering with energy compensation
//
// The Hann window suppresses spectral leakage at the cost of signal energy.
// Multiplying by sqrt(8/3) restores the RMS level so band loudness stays
// comparable to an unwindowed signal.
//
// References:
// - Brandt, A. (2011). Noise and Vibration Analysis, ch. 9 (window correction factors)

use std::f32::consts::PI;

/// Energy correction factor for the Hann window: sqrt(8/3)
pub const HANN_ENERGY_CORRECTION: f32 = 1.632_993_2;

/// Hann window coefficient for `index` in a window of `size` samples
///
/// `0.5 * (1 - cos(2π·i / (N - 1)))`; zero at both edges, one at the center.
pub fn hann_window(index: usize, size: usize) -> f32 {
    if size < 2 {
        return 1.0;
    }
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Pre-computed Hann window including the energy correction
#[derive(Debug, Clone)]
pub struct HannWindow {
    coefficients: Vec<f32>,
}

impl HannWindow {
    /// Build the window for `size` samples
    pub fn new(size: usize) -> Self {
        let coefficients = (0..size)
            .map(|i| hann_window(i, size) * HANN_ENERGY_CORRECTION)
            .collect();
        Self { coefficients }
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Corrected coefficients (hann(i) * sqrt(8/3))
    pub fn coefficients(&self) -> &[f32] {
        &self.coefficients
    }

    /// Write `input[i] * coefficient[i]` into `output`
    ///
    /// Only the common prefix of the three slices is written.
    pub fn apply_into(&self, input: &[f32], output: &mut [f32]) {
        for ((out, &sample), &coefficient) in output
            .iter_mut()
            .zip(input.iter())
            .zip(self.coefficients.iter())
        {
            *out = sample * coefficient;
        }
    }

    /// Return a new windowed copy of `input`
    pub fn apply(&self, input: &[f32]) -> Vec<f32> {
        let mut output = vec![0.0; input.len().min(self.len())];
        self.apply_into(input, &mut output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let size = 1024;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_energy_correction_constant() {
        assert!((HANN_ENERGY_CORRECTION - (8.0f32 / 3.0).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_energy_correction_restores_power() {
        // Mean of hann² is 3/8, so corrected window has unit mean power
        let window = HannWindow::new(4096);
        let mean_power: f32 = window.coefficients().iter().map(|c| c * c).sum::<f32>()
            / window.len() as f32;
        assert!(
            (mean_power - 1.0).abs() < 0.01,
            "expected unit mean power, got {}",
            mean_power
        );
    }

    #[test]
    fn test_apply_is_deterministic() {
        let window = HannWindow::new(64);
        let input: Vec<f32> = (0..64).map(|i| (i as f32 * 0.3).sin()).collect();

        let first = window.apply(&input);
        let second = window.apply(&input);
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_apply_scales_each_sample() {
        let window = HannWindow::new(8);
        let input = vec![2.0; 8];
        let output = window.apply(&input);
        for (i, value) in output.iter().enumerate() {
            let expected = 2.0 * hann_window(i, 8) * HANN_ENERGY_CORRECTION;
            assert!((value - expected).abs() < 1e-6);
        }
    }
}
