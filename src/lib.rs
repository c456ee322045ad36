// SonicSpectra Core - spectral loudness and dominant-color engines
// FFT band analysis for live audio plus k-means palettes for cover art

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod debug;
pub mod error;
pub mod fixtures;
pub mod palette;

// Re-exports for convenience
pub use analysis::{SpectrumAnalyzer, SpectrumFrame};
pub use audio::{sample_handoff, SampleFeed, SampleTap};
pub use config::{AppConfig, AudioConfig, PaletteConfig, SpectrumConfig};
pub use error::{ErrorCode, PaletteError, SpectralError};
pub use palette::{ColorPoints, ColorQuantizer, Palette, QuantizeOutcome, Rgb, Rgba, Theme};
