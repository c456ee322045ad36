// Spectral pipeline error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Spectral error code constants
///
/// Error code range: 3001-3007
pub struct SpectralErrorCodes {}

impl SpectralErrorCodes {
    /// Transform length is zero, one, or not a power of two
    pub const INVALID_TRANSFORM_LENGTH: i32 = 3001;

    /// Slice handed to a transform does not match the declared length
    pub const BUFFER_LENGTH_MISMATCH: i32 = 3002;

    /// A configured band contains no FFT bins
    pub const DEGENERATE_BAND: i32 = 3003;

    /// Band boundaries are malformed (too few, unsorted, non-finite)
    pub const INVALID_BAND_LAYOUT: i32 = 3004;

    /// Sample rate is zero
    pub const INVALID_SAMPLE_RATE: i32 = 3005;

    /// Smoothing factor is negative or non-finite
    pub const INVALID_SMOOTHING_FACTOR: i32 = 3006;

    /// Full-scale reference level is not a finite positive number
    pub const INVALID_FULL_SCALE: i32 = 3007;
}

/// Log a spectral error with structured context
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_spectral_error(err: &SpectralError, context: &str) {
    error!(
        "Spectral error in {}: code={}, component=SpectrumAnalyzer, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Spectral pipeline errors
///
/// These errors cover the transform, band layout and loudness configuration.
/// All of them are detected before any numeric work is done, so a failing
/// call never leaves a half-transformed buffer behind.
///
/// Error code range: 3001-3007
#[derive(Debug, Clone, PartialEq)]
pub enum SpectralError {
    /// Transform length must be a power of two (and at least 2 for real input)
    InvalidTransformLength { len: usize },

    /// Buffer slice length does not match the transform length
    BufferLengthMismatch { expected: usize, actual: usize },

    /// Band `[low_hz, high_hz)` contains no FFT bins at this resolution
    DegenerateBand {
        band: usize,
        low_hz: f32,
        high_hz: f32,
    },

    /// Band boundaries cannot describe any band
    InvalidBandLayout { reason: String },

    /// Sample rate must be greater than 0
    InvalidSampleRate { sample_rate: u32 },

    /// Smoothing factor must be finite and non-negative
    InvalidSmoothingFactor { factor: f32 },

    /// Full-scale reference must be finite and greater than 0
    InvalidFullScale { full_scale: f32 },
}

impl ErrorCode for SpectralError {
    fn code(&self) -> i32 {
        match self {
            SpectralError::InvalidTransformLength { .. } => {
                SpectralErrorCodes::INVALID_TRANSFORM_LENGTH
            }
            SpectralError::BufferLengthMismatch { .. } => SpectralErrorCodes::BUFFER_LENGTH_MISMATCH,
            SpectralError::DegenerateBand { .. } => SpectralErrorCodes::DEGENERATE_BAND,
            SpectralError::InvalidBandLayout { .. } => SpectralErrorCodes::INVALID_BAND_LAYOUT,
            SpectralError::InvalidSampleRate { .. } => SpectralErrorCodes::INVALID_SAMPLE_RATE,
            SpectralError::InvalidSmoothingFactor { .. } => {
                SpectralErrorCodes::INVALID_SMOOTHING_FACTOR
            }
            SpectralError::InvalidFullScale { .. } => SpectralErrorCodes::INVALID_FULL_SCALE,
        }
    }

    fn message(&self) -> String {
        match self {
            SpectralError::InvalidTransformLength { len } => {
                format!("Transform length must be a power of two >= 2 (got {})", len)
            }
            SpectralError::BufferLengthMismatch { expected, actual } => {
                format!(
                    "Buffer length mismatch: expected {} values, got {}",
                    expected, actual
                )
            }
            SpectralError::DegenerateBand {
                band,
                low_hz,
                high_hz,
            } => {
                format!(
                    "Band {} [{:.1} Hz, {:.1} Hz) contains no FFT bins",
                    band, low_hz, high_hz
                )
            }
            SpectralError::InvalidBandLayout { reason } => {
                format!("Invalid band layout: {}", reason)
            }
            SpectralError::InvalidSampleRate { sample_rate } => {
                format!("Sample rate must be greater than 0 (got {})", sample_rate)
            }
            SpectralError::InvalidSmoothingFactor { factor } => {
                format!(
                    "Smoothing factor must be finite and non-negative (got {})",
                    factor
                )
            }
            SpectralError::InvalidFullScale { full_scale } => {
                format!("Full-scale reference must be finite and positive (got {})", full_scale)
            }
        }
    }
}

impl fmt::Display for SpectralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SpectralError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SpectralError {}
