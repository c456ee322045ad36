// Loudness smoother - per-band RMS to smoothed decibels
//
// dB = 20·log10(rms / full_scale) when rms exceeds the floor, otherwise 0.
// The smoothed level then moves toward the target by dt × smoothing_factor of
// the remaining distance, clamped so a single update never overshoots.

use crate::error::SpectralError;

/// RMS values at or below this floor map to 0 dB
pub const DEFAULT_LEVEL_FLOOR: f32 = 1e-5;

/// Exponential smoothing rate (per second)
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 90.0;

/// Default sample depth used to derive the full-scale reference
pub const DEFAULT_BIT_DEPTH: u32 = 32;

/// Full-scale calibration constant for a given sample depth
///
/// `20·log10(2^bits · sqrt(3/2))`: the dB level of a full-scale sine at that
/// depth, used as the divisor for every band RMS.
pub fn full_scale_for_bit_depth(bits: u32) -> f32 {
    let peak = 2f64.powi(bits as i32) * (3.0f64 / 2.0).sqrt();
    (20.0 * peak.log10()) as f32
}

/// Convert an RMS value to dB relative to `full_scale`
///
/// Returns 0.0 when `rms` does not exceed `floor`.
pub fn rms_to_db(rms: f32, full_scale: f32, floor: f32) -> f32 {
    if rms > floor {
        20.0 * (rms / full_scale).log10()
    } else {
        0.0
    }
}

/// Persistent per-band loudness state
#[derive(Debug, Clone)]
pub struct LoudnessSmoother {
    levels: Vec<f32>,
    smoothing_factor: f32,
    full_scale: f32,
    floor: f32,
}

impl LoudnessSmoother {
    /// Create a smoother with all levels at 0 dB
    ///
    /// # Arguments
    /// * `band_count` - Number of bands tracked
    /// * `smoothing_factor` - Blend rate per second (finite, >= 0)
    /// * `full_scale` - Divisor applied to RMS before the log (finite, > 0)
    pub fn new(
        band_count: usize,
        smoothing_factor: f32,
        full_scale: f32,
    ) -> Result<Self, SpectralError> {
        if !smoothing_factor.is_finite() || smoothing_factor < 0.0 {
            return Err(SpectralError::InvalidSmoothingFactor {
                factor: smoothing_factor,
            });
        }
        if !full_scale.is_finite() || full_scale <= 0.0 {
            return Err(SpectralError::InvalidFullScale { full_scale });
        }
        Ok(Self {
            levels: vec![0.0; band_count],
            smoothing_factor,
            full_scale,
            floor: DEFAULT_LEVEL_FLOOR,
        })
    }

    /// Override the RMS floor below which a band reads 0 dB
    pub fn with_floor(mut self, floor: f32) -> Self {
        self.floor = floor;
        self
    }

    /// Blend the new RMS frame into the smoothed levels
    ///
    /// # Arguments
    /// * `rms` - One RMS value per band
    /// * `dt` - Seconds since the previous update
    ///
    /// # Returns
    /// The updated levels, or `BufferLengthMismatch` if `rms` has the wrong
    /// number of bands (levels are left unchanged).
    pub fn update(&mut self, rms: &[f32], dt: f32) -> Result<&[f32], SpectralError> {
        if rms.len() != self.levels.len() {
            return Err(SpectralError::BufferLengthMismatch {
                expected: self.levels.len(),
                actual: rms.len(),
            });
        }

        let alpha = self.blend_coefficient(dt);
        for (level, &value) in self.levels.iter_mut().zip(rms) {
            let target = rms_to_db(value, self.full_scale, self.floor);
            *level += (target - *level) * alpha;
        }
        Ok(&self.levels)
    }

    fn blend_coefficient(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0.0;
        }
        (dt * self.smoothing_factor).clamp(0.0, 1.0)
    }

    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    pub fn band_count(&self) -> usize {
        self.levels.len()
    }

    pub fn smoothing_factor(&self) -> f32 {
        self.smoothing_factor
    }

    pub fn full_scale(&self) -> f32 {
        self.full_scale
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Return every level to 0 dB
    pub fn reset(&mut self) {
        self.levels.fill(0.0);
    }
}
