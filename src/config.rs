//! Configuration management for the spectrum and palette pipelines
//!
//! Configuration is loaded from JSON files so band layouts, smoothing and
//! clustering parameters can be tuned without recompilation. Every section
//! has defaults matching the visualizer's stock behavior, and any field
//! omitted from the file falls back to its default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::analysis::bands::{
    BandAggregator, DEFAULT_AMPLITUDE_CORRECTION, DEFAULT_BAND_BOUNDARIES_HZ,
};
use crate::analysis::smoother::{
    full_scale_for_bit_depth, LoudnessSmoother, DEFAULT_BIT_DEPTH, DEFAULT_LEVEL_FLOOR,
    DEFAULT_SMOOTHING_FACTOR,
};
use crate::audio::buffer_pool::{DEFAULT_BUFFER_COUNT, DEFAULT_BUFFER_SIZE};
use crate::error::{PaletteError, SpectralError};

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub spectrum: SpectrumConfig,
    pub palette: PaletteConfig,
    pub audio: AudioConfig,
}

/// Spectral analyzer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Transform length N (power of two); also the history length
    pub fft_size: usize,
    /// Sample rate of the incoming stream in Hz
    pub sample_rate: u32,
    /// Strictly increasing band edges in Hz
    pub band_boundaries_hz: Vec<f32>,
    /// Exponential smoothing rate per second
    pub smoothing_factor: f32,
    /// Sample depth used to derive the full-scale reference
    pub bit_depth: u32,
    /// Explicit full-scale reference; replaces the bit-depth derivation
    pub full_scale_override: Option<f32>,
    /// Scale applied to every bin magnitude before band aggregation
    pub amplitude_correction: f32,
    /// RMS at or below this level reads as 0 dB
    pub level_floor: f32,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            fft_size: 4096,
            sample_rate: 44_100,
            band_boundaries_hz: DEFAULT_BAND_BOUNDARIES_HZ.to_vec(),
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            bit_depth: DEFAULT_BIT_DEPTH,
            full_scale_override: None,
            amplitude_correction: DEFAULT_AMPLITUDE_CORRECTION,
            level_floor: DEFAULT_LEVEL_FLOOR,
        }
    }
}

impl SpectrumConfig {
    /// Full-scale reference in effect
    pub fn full_scale(&self) -> f32 {
        self.full_scale_override
            .unwrap_or_else(|| full_scale_for_bit_depth(self.bit_depth))
    }

    /// Number of bands described by the boundaries
    pub fn band_count(&self) -> usize {
        self.band_boundaries_hz.len().saturating_sub(1)
    }

    /// Check every parameter the analyzer would reject
    pub fn validate(&self) -> Result<(), SpectralError> {
        let aggregator =
            BandAggregator::new(&self.band_boundaries_hz, self.sample_rate, self.fft_size)?;
        LoudnessSmoother::new(
            aggregator.band_count(),
            self.smoothing_factor,
            self.full_scale(),
        )?;
        Ok(())
    }
}

/// Dominant-color quantizer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Number of colors extracted (k)
    pub cluster_count: usize,
    /// Lloyd iteration cap
    pub max_iterations: usize,
    /// Seed for choosing the first centroid; random when absent
    pub seed: Option<u64>,
    /// Images are resized to sample_size × sample_size before clustering
    pub sample_size: u32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            cluster_count: 4,
            max_iterations: 50,
            seed: None,
            sample_size: 200,
        }
    }
}

impl PaletteConfig {
    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.cluster_count == 0 {
            return Err(PaletteError::InvalidClusterCount { k: 0 });
        }
        if self.max_iterations == 0 {
            return Err(PaletteError::InvalidIterationCap { max_iterations: 0 });
        }
        if self.sample_size == 0 {
            return Err(PaletteError::InvalidSampleSize { size: 0 });
        }
        Ok(())
    }
}

/// Sample handoff configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Number of recycled buffers shared by the producer and consumer
    pub buffer_pool_size: usize,
    /// Capacity of each buffer in mono samples
    pub buffer_size: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            buffer_pool_size: DEFAULT_BUFFER_COUNT,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// A section of the configuration failed validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Spectrum(SpectralError),
    Palette(PaletteError),
    Audio { reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Spectrum(err) => write!(f, "invalid spectrum config: {}", err),
            ConfigError::Palette(err) => write!(f, "invalid palette config: {}", err),
            ConfigError::Audio { reason } => write!(f, "invalid audio config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Spectrum(err) => Some(err),
            ConfigError::Palette(err) => Some(err),
            ConfigError::Audio { .. } => None,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file is missing or
    /// its JSON is invalid (a warning is logged either way).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spectrum.validate().map_err(ConfigError::Spectrum)?;
        self.palette.validate().map_err(ConfigError::Palette)?;
        if self.audio.buffer_pool_size == 0 || self.audio.buffer_size == 0 {
            return Err(ConfigError::Audio {
                reason: format!(
                    "buffer_pool_size and buffer_size must be > 0 (got {} and {})",
                    self.audio.buffer_pool_size, self.audio.buffer_size
                ),
            });
        }
        Ok(())
    }
}
