// Palette quantizer error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Palette error code constants
///
/// Error code range: 4001-4007
pub struct PaletteErrorCodes {}

impl PaletteErrorCodes {
    /// No color points were supplied
    pub const DEGENERATE_COLOR_INPUT: i32 = 4001;

    /// Cluster count must be greater than 0
    pub const INVALID_CLUSTER_COUNT: i32 = 4002;

    /// A Lloyd iteration left a cluster without points (recoverable)
    pub const EMPTY_CLUSTER: i32 = 4003;

    /// RGBA byte buffer does not match the declared dimensions
    pub const PIXEL_BUFFER_MISMATCH: i32 = 4004;

    /// Iteration cap must be greater than 0
    pub const INVALID_ITERATION_CAP: i32 = 4005;

    /// Requested first seed index is outside the point set
    pub const SEED_OUT_OF_RANGE: i32 = 4006;

    /// Image resample size must be greater than 0
    pub const INVALID_SAMPLE_SIZE: i32 = 4007;
}

/// Log a palette error with structured context
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_palette_error(err: &PaletteError, context: &str) {
    error!(
        "Palette error in {}: code={}, component=ColorQuantizer, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Palette quantizer errors
///
/// `EmptyCluster` is never returned from `quantize`; the quantizer holds the
/// centroid, counts the event and logs it. It lives here so the event has a
/// stable code alongside the fatal-to-the-call variants.
///
/// Error code range: 4001-4007
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// Zero points supplied to the quantizer
    DegenerateColorInput,

    /// Cluster count is zero
    InvalidClusterCount { k: usize },

    /// Cluster received zero points during an iteration
    EmptyCluster { cluster: usize, iteration: usize },

    /// RGBA buffer length does not equal width * height * 4
    PixelBufferMismatch { expected: usize, actual: usize },

    /// Iteration cap is zero
    InvalidIterationCap { max_iterations: usize },

    /// First seed index is not a valid point index
    SeedOutOfRange { index: usize, len: usize },

    /// Resampled image would have no pixels
    InvalidSampleSize { size: u32 },
}

impl ErrorCode for PaletteError {
    fn code(&self) -> i32 {
        match self {
            PaletteError::DegenerateColorInput => PaletteErrorCodes::DEGENERATE_COLOR_INPUT,
            PaletteError::InvalidClusterCount { .. } => PaletteErrorCodes::INVALID_CLUSTER_COUNT,
            PaletteError::EmptyCluster { .. } => PaletteErrorCodes::EMPTY_CLUSTER,
            PaletteError::PixelBufferMismatch { .. } => PaletteErrorCodes::PIXEL_BUFFER_MISMATCH,
            PaletteError::InvalidIterationCap { .. } => PaletteErrorCodes::INVALID_ITERATION_CAP,
            PaletteError::SeedOutOfRange { .. } => PaletteErrorCodes::SEED_OUT_OF_RANGE,
            PaletteError::InvalidSampleSize { .. } => PaletteErrorCodes::INVALID_SAMPLE_SIZE,
        }
    }

    fn message(&self) -> String {
        match self {
            PaletteError::DegenerateColorInput => {
                "Cannot quantize an empty color point set".to_string()
            }
            PaletteError::InvalidClusterCount { k } => {
                format!("Cluster count must be greater than 0 (got {})", k)
            }
            PaletteError::EmptyCluster { cluster, iteration } => {
                format!(
                    "Cluster {} received no points in iteration {}; centroid held",
                    cluster, iteration
                )
            }
            PaletteError::PixelBufferMismatch { expected, actual } => {
                format!(
                    "Pixel buffer holds {} bytes, expected {} for the given dimensions",
                    actual, expected
                )
            }
            PaletteError::InvalidIterationCap { max_iterations } => {
                format!(
                    "Iteration cap must be greater than 0 (got {})",
                    max_iterations
                )
            }
            PaletteError::SeedOutOfRange { index, len } => {
                format!("Seed index {} out of range for {} points", index, len)
            }
            PaletteError::InvalidSampleSize { size } => {
                format!("Sample size must be greater than 0 (got {})", size)
            }
        }
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PaletteError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for PaletteError {}
