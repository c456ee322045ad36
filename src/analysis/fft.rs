// FFT module - radix-2 Fourier transforms over flat f32 buffers
//
// Two entry points:
// - complex_transform: in-place Cooley-Tukey FFT over interleaved (re, im) pairs
// - real_transform: FFT of real samples via the half-length complex transform
//
// Kernel convention: the forward direction uses exp(+2πi·jk/n) and the inverse
// uses exp(-2πi·jk/n), both unnormalized. Magnitudes are identical to the
// exp(-) convention; imaginary parts are mirrored.
//
// Packed real spectrum layout (length n):
//   [0]          DC component (real)
//   [1]          Nyquist component (real)
//   [2k], [2k+1] real / imaginary part of bin k, for k = 1..n/2-1
//
// References:
// - Press, W. H. et al. (2007). Numerical Recipes, 3rd ed., §12.2-12.3

use std::f64::consts::PI;

use crate::error::SpectralError;

/// Direction of a transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformDirection {
    Forward,
    /// Unnormalized; scale by 1/n (complex) or 2/n (real) to recover the input
    Inverse,
}

impl TransformDirection {
    /// Sign applied to the twiddle angle (+1 forward, -1 inverse)
    pub fn sign(self) -> f64 {
        match self {
            TransformDirection::Forward => 1.0,
            TransformDirection::Inverse => -1.0,
        }
    }
}

/// In-place radix-2 FFT over `n` interleaved complex values (`2n` floats)
///
/// Performs the bit-reversal permutation followed by log2(n) Danielson-Lanczos
/// butterfly passes. Twiddle factors advance through a trigonometric recurrence,
/// so sin/cos are evaluated twice per pass rather than once per butterfly.
///
/// # Arguments
/// * `data` - Interleaved complex buffer, `data[2i]` = re, `data[2i + 1]` = im
/// * `n` - Number of complex values (power of two)
/// * `direction` - Forward or (unnormalized) inverse
///
/// # Errors
/// `InvalidTransformLength` if `n` is zero or not a power of two,
/// `BufferLengthMismatch` if `data.len() != 2 * n`. The buffer is untouched on error.
pub fn complex_transform(
    data: &mut [f32],
    n: usize,
    direction: TransformDirection,
) -> Result<(), SpectralError> {
    if n == 0 || !n.is_power_of_two() {
        return Err(SpectralError::InvalidTransformLength { len: n });
    }
    if data.len() != 2 * n {
        return Err(SpectralError::BufferLengthMismatch {
            expected: 2 * n,
            actual: data.len(),
        });
    }

    bit_reverse(data, n);
    butterflies(data, n, direction);
    Ok(())
}

/// Swap complex element i with its bit-reversed partner
fn bit_reverse(data: &mut [f32], n: usize) {
    let mut j = 0usize;
    for i in 0..n {
        if i < j {
            data.swap(2 * i, 2 * j);
            data.swap(2 * i + 1, 2 * j + 1);
        }
        let mut m = n >> 1;
        while m >= 1 && j >= m {
            j -= m;
            m >>= 1;
        }
        j += m;
    }
}

fn butterflies(data: &mut [f32], n: usize, direction: TransformDirection) {
    let nn = 2 * n;
    let mut mmax = 2usize;

    while nn > mmax {
        let istep = mmax << 1;
        let theta = direction.sign() * (2.0 * PI / mmax as f64);
        let wtemp = (0.5 * theta).sin();
        let wpr = (-2.0 * wtemp * wtemp) as f32;
        let wpi = theta.sin() as f32;
        let mut wr = 1.0f32;
        let mut wi = 0.0f32;

        for m in (0..mmax).step_by(2) {
            for i in (m..nn).step_by(istep) {
                let j = i + mmax;
                let tempr = wr * data[j] - wi * data[j + 1];
                let tempi = wr * data[j + 1] + wi * data[j];
                data[j] = data[i] - tempr;
                data[j + 1] = data[i + 1] - tempi;
                data[i] += tempr;
                data[i + 1] += tempi;
            }
            let w = wr;
            wr = w * wpr - wi * wpi + wr;
            wi = wi * wpr + w * wpi + wi;
        }
        mmax = istep;
    }
}

/// FFT of `n` real samples, producing the packed spectrum in place
///
/// Forward: the samples are treated as n/2 complex pairs, transformed with
/// `complex_transform`, then unpacked into true spectral bins. Inverse: the
/// packed spectrum is re-folded, then run through the inverse complex
/// transform; the result equals the original signal times n/2.
///
/// # Arguments
/// * `data` - `n` real samples (forward) or a packed spectrum (inverse)
/// * `n` - Number of real values (power of two, at least 2)
/// * `direction` - Forward or (unnormalized) inverse
///
/// # Errors
/// `InvalidTransformLength` if `n < 2` or not a power of two,
/// `BufferLengthMismatch` if `data.len() != n`. The buffer is untouched on error.
pub fn real_transform(
    data: &mut [f32],
    n: usize,
    direction: TransformDirection,
) -> Result<(), SpectralError> {
    if n < 2 || !n.is_power_of_two() {
        return Err(SpectralError::InvalidTransformLength { len: n });
    }
    if data.len() != n {
        return Err(SpectralError::BufferLengthMismatch {
            expected: n,
            actual: data.len(),
        });
    }

    let half = n >> 1;
    let c1 = 0.5f32;
    let mut theta = PI / half as f64;
    let c2 = match direction {
        TransformDirection::Forward => {
            complex_transform(data, half, TransformDirection::Forward)?;
            -0.5f32
        }
        TransformDirection::Inverse => {
            theta = -theta;
            0.5f32
        }
    };

    let wtemp = (0.5 * theta).sin();
    let wpr = (-2.0 * wtemp * wtemp) as f32;
    let wpi = theta.sin() as f32;
    let mut wr = 1.0 + wpr;
    let mut wi = wpi;

    // Bin k pairs with bin n/2 - k; bin n/4 is its own partner and stays put.
    for i in 1..(n >> 2) {
        let i1 = i + i;
        let i2 = i1 + 1;
        let i3 = n - i1;
        let i4 = i3 + 1;

        let h1r = c1 * (data[i1] + data[i3]);
        let h1i = c1 * (data[i2] - data[i4]);
        let h2r = -c2 * (data[i2] + data[i4]);
        let h2i = c2 * (data[i1] - data[i3]);

        data[i1] = h1r + wr * h2r - wi * h2i;
        data[i2] = h1i + wr * h2i + wi * h2r;
        data[i3] = h1r - wr * h2r + wi * h2i;
        data[i4] = -h1i + wr * h2i + wi * h2r;

        let w = wr;
        wr = w * wpr - wi * wpi + wr;
        wi = wi * wpr + w * wpi + wi;
    }

    let h1r = data[0];
    match direction {
        TransformDirection::Forward => {
            data[0] = h1r + data[1];
            data[1] = h1r - data[1];
        }
        TransformDirection::Inverse => {
            data[0] = c1 * (h1r + data[1]);
            data[1] = c1 * (h1r - data[1]);
            complex_transform(data, half, TransformDirection::Inverse)?;
        }
    }

    Ok(())
}

/// Read-only view over a packed real spectrum
///
/// Bins are indexed 0..=n/2: bin 0 is DC, bin n/2 is Nyquist, both purely real.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyBins<'a> {
    data: &'a [f32],
}

impl<'a> FrequencyBins<'a> {
    /// Wrap a packed spectrum produced by `real_transform`
    ///
    /// `data` must hold a power-of-two length of at least 2; bin accessors
    /// index into it without further checks. Use [`FrequencyBins::try_new`]
    /// for buffers of unknown origin.
    pub fn new(data: &'a [f32]) -> Self {
        debug_assert!(
            data.len() >= 2 && data.len().is_power_of_two(),
            "packed spectrum length {} is not a power of two >= 2",
            data.len()
        );
        Self { data }
    }

    /// Checked variant of [`FrequencyBins::new`]
    ///
    /// # Errors
    /// `InvalidTransformLength` if `data.len()` is below 2 or not a power of two.
    pub fn try_new(data: &'a [f32]) -> Result<Self, SpectralError> {
        if data.len() < 2 || !data.len().is_power_of_two() {
            return Err(SpectralError::InvalidTransformLength { len: data.len() });
        }
        Ok(Self { data })
    }

    /// Transform length n
    pub fn fft_size(&self) -> usize {
        self.data.len()
    }

    /// Index of the Nyquist bin (n/2)
    pub fn nyquist_bin(&self) -> usize {
        self.data.len() / 2
    }

    pub fn dc(&self) -> f32 {
        self.data[0]
    }

    pub fn nyquist(&self) -> f32 {
        self.data[1]
    }

    /// Real part of bin `k` (0..=n/2)
    pub fn bin_real(&self, k: usize) -> f32 {
        let nyquist = self.nyquist_bin();
        assert!(k <= nyquist, "bin {} out of range 0..={}", k, nyquist);
        if k == 0 {
            self.data[0]
        } else if k == nyquist {
            self.data[1]
        } else {
            self.data[2 * k]
        }
    }

    /// Imaginary part of bin `k` (0..=n/2); zero for DC and Nyquist
    pub fn bin_imag(&self, k: usize) -> f32 {
        let nyquist = self.nyquist_bin();
        assert!(k <= nyquist, "bin {} out of range 0..={}", k, nyquist);
        if k == 0 || k == nyquist {
            0.0
        } else {
            self.data[2 * k + 1]
        }
    }

    /// Squared magnitude re² + im² of bin `k`
    pub fn power(&self, k: usize) -> f32 {
        let re = self.bin_real(k);
        let im = self.bin_imag(k);
        re * re + im * im
    }

    pub fn magnitude(&self, k: usize) -> f32 {
        self.power(k).sqrt()
    }

    /// One-sided spectral energy
    ///
    /// Interior bins count once, DC and Nyquist count half, so for a real
    /// signal x of length n this equals (n/2)·Σx² (Parseval).
    pub fn total_energy(&self) -> f32 {
        let nyquist = self.nyquist_bin();
        let interior: f32 = (1..nyquist).map(|k| self.power(k)).sum();
        interior + 0.5 * (self.power(0) + self.power(nyquist))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use rustfft::{num_complex::Complex, FftPlanner};

    fn random_signal(len: usize, seed: u64) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
    }

    #[test]
    fn test_frequency_bins_checked_construction() {
        assert_eq!(
            FrequencyBins::try_new(&[]).err(),
            Some(SpectralError::InvalidTransformLength { len: 0 })
        );
        assert_eq!(
            FrequencyBins::try_new(&[1.0; 6]).err(),
            Some(SpectralError::InvalidTransformLength { len: 6 })
        );

        let packed = [4.0, -2.0, 3.0, 4.0];
        let bins = FrequencyBins::try_new(&packed).unwrap();
        assert_eq!(bins.nyquist_bin(), 2);
        assert_eq!(bins.dc(), 4.0);
        assert_eq!(bins.nyquist(), -2.0);
        assert_eq!(bins.magnitude(1), 5.0);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_frequency_bins_rejects_empty_slice_in_debug() {
        let _ = FrequencyBins::new(&[]);
    }

    fn assert_close(actual: f32, expected: f32, tolerance: f32, what: &str) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "{}: expected {}, got {} (tolerance {})",
            what,
            expected,
            actual,
            tolerance
        );
    }

    #[test]
    fn test_complex_transform_matches_reference() {
        let n = 256;
        let signal = random_signal(2 * n, 7);

        let mut ours = signal.clone();
        complex_transform(&mut ours, n, TransformDirection::Forward).unwrap();

        // exp(+2πi) kernel corresponds to rustfft's (unnormalized) inverse plan
        let mut reference: Vec<Complex<f32>> = signal
            .chunks(2)
            .map(|pair| Complex::new(pair[0], pair[1]))
            .collect();
        FftPlanner::<f32>::new()
            .plan_fft_inverse(n)
            .process(&mut reference);

        for (k, expected) in reference.iter().enumerate() {
            assert_close(ours[2 * k], expected.re, 1e-3, "re");
            assert_close(ours[2 * k + 1], expected.im, 1e-3, "im");
        }
    }

    #[test]
    fn test_complex_round_trip() {
        let n = 64;
        let signal = random_signal(2 * n, 11);
        let mut data = signal.clone();

        complex_transform(&mut data, n, TransformDirection::Forward).unwrap();
        complex_transform(&mut data, n, TransformDirection::Inverse).unwrap();

        for (restored, original) in data.iter().zip(&signal) {
            assert_close(restored / n as f32, *original, 1e-4, "round trip");
        }
    }

    #[test]
    fn test_complex_single_point_is_identity() {
        let mut data = vec![0.25, -0.5];
        complex_transform(&mut data, 1, TransformDirection::Forward).unwrap();
        assert_eq!(data, vec![0.25, -0.5]);
    }

    #[test]
    fn test_complex_rejects_bad_lengths() {
        let mut data = vec![1.0; 6];
        assert_eq!(
            complex_transform(&mut data, 3, TransformDirection::Forward),
            Err(SpectralError::InvalidTransformLength { len: 3 })
        );
        assert_eq!(
            complex_transform(&mut data, 0, TransformDirection::Forward),
            Err(SpectralError::InvalidTransformLength { len: 0 })
        );
        assert_eq!(
            complex_transform(&mut data, 4, TransformDirection::Forward),
            Err(SpectralError::BufferLengthMismatch {
                expected: 8,
                actual: 6
            })
        );
        assert!(data.iter().all(|&v| v == 1.0), "buffer must be untouched");
    }

    #[test]
    fn test_real_transform_matches_reference() {
        let n = 512;
        let signal = random_signal(n, 3);

        let mut packed = signal.clone();
        real_transform(&mut packed, n, TransformDirection::Forward).unwrap();
        let bins = FrequencyBins::new(&packed);

        let mut reference: Vec<Complex<f32>> =
            signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        FftPlanner::<f32>::new()
            .plan_fft_inverse(n)
            .process(&mut reference);

        for k in 0..=n / 2 {
            assert_close(bins.bin_real(k), reference[k].re, 2e-3, "re");
            assert_close(bins.bin_imag(k), reference[k].im, 2e-3, "im");
        }
    }

    #[test]
    fn test_real_round_trip() {
        let n = 1024;
        let signal = random_signal(n, 42);
        let mut data = signal.clone();

        real_transform(&mut data, n, TransformDirection::Forward).unwrap();
        real_transform(&mut data, n, TransformDirection::Inverse).unwrap();

        let scale = 2.0 / n as f32;
        for (i, (restored, original)) in data.iter().zip(&signal).enumerate() {
            assert_close(restored * scale, *original, 1e-4, &format!("sample {}", i));
        }
    }

    #[test]
    fn test_real_transform_parseval() {
        let n = 4096;
        let signal = random_signal(n, 99);
        let time_energy: f32 = signal.iter().map(|x| x * x).sum();

        let mut data = signal.clone();
        real_transform(&mut data, n, TransformDirection::Forward).unwrap();
        let freq_energy = FrequencyBins::new(&data).total_energy();

        let expected = (n / 2) as f32 * time_energy;
        let relative = (freq_energy - expected).abs() / expected;
        assert!(
            relative < 1e-3,
            "Parseval mismatch: freq {} vs (n/2)·time {} (relative {})",
            freq_energy,
            expected,
            relative
        );
    }

    #[test]
    fn test_real_transform_dc_only() {
        let n = 256;
        let c = 0.75f32;
        let mut data = vec![c; n];
        real_transform(&mut data, n, TransformDirection::Forward).unwrap();
        let bins = FrequencyBins::new(&data);

        assert_close(bins.dc(), n as f32 * c, 1e-3, "DC");
        for k in 1..=n / 2 {
            assert!(
                bins.magnitude(k) < 1e-2,
                "bin {} should be empty, magnitude {}",
                k,
                bins.magnitude(k)
            );
        }
    }

    #[test]
    fn test_real_transform_two_points() {
        let mut data = vec![3.0, 1.0];
        real_transform(&mut data, 2, TransformDirection::Forward).unwrap();
        assert_eq!(data, vec![4.0, 2.0]);
    }

    #[test]
    fn test_real_transform_rejects_invalid_length() {
        let mut data = vec![0.5; 12];
        assert_eq!(
            real_transform(&mut data, 12, TransformDirection::Forward),
            Err(SpectralError::InvalidTransformLength { len: 12 })
        );
        assert_eq!(
            real_transform(&mut data[..1], 1, TransformDirection::Forward),
            Err(SpectralError::InvalidTransformLength { len: 1 })
        );
        assert_eq!(
            real_transform(&mut data, 16, TransformDirection::Inverse),
            Err(SpectralError::BufferLengthMismatch {
                expected: 16,
                actual: 12
            })
        );
        assert!(data.iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_bin_accessors_follow_packed_layout() {
        let data = vec![10.0, 20.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let bins = FrequencyBins::new(&data);

        assert_eq!(bins.nyquist_bin(), 4);
        assert_eq!(bins.bin_real(0), 10.0);
        assert_eq!(bins.bin_imag(0), 0.0);
        assert_eq!(bins.bin_real(4), 20.0);
        assert_eq!(bins.bin_imag(4), 0.0);
        assert_eq!(bins.bin_real(1), 1.0);
        assert_eq!(bins.bin_imag(1), 2.0);
        assert_eq!(bins.bin_real(3), 5.0);
        assert_eq!(bins.bin_imag(3), 6.0);
        assert_eq!(bins.power(2), 25.0);
    }
}
