// Error types for the sonic spectra core
//
// This module defines custom error types for the spectral pipeline and the
// palette quantizer, providing structured error handling with stable error
// codes that hosting applications can match on.

mod palette;
mod spectral;

pub use palette::{log_palette_error, PaletteError, PaletteErrorCodes};
pub use spectral::{log_spectral_error, SpectralError, SpectralErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the library boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
