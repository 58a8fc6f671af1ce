//! Error types for the spectral-eq crate.

use std::fmt;

/// Errors that can occur while designing or applying an equalizer, or while
/// running the file drivers around it.
#[derive(Debug, Clone, PartialEq)]
pub enum EqError {
    /// FFT size must be non-zero.
    InvalidFftSize(usize),
    /// Hop length must satisfy `1 <= hop <= fft_size`.
    InvalidHop { hop: usize, fft_size: usize },
    /// Overlap percentage must lie in `[0, 100]`.
    InvalidOverlap(f64),
    /// Sample rate must be positive and finite.
    InvalidSampleRate(f64),
    /// A band edge or gain is not a finite number.
    InvalidBand(String),
    /// Mask length does not match `fft_size / 2 + 1`.
    MaskLengthMismatch { expected: usize, actual: usize },
    /// Mask was designed for a different FFT size.
    MaskFftSizeMismatch { expected: usize, actual: usize },
    /// Input contains NaN or infinite samples.
    NonFiniteInput,
    /// Invalid audio or configuration file contents.
    InvalidFormat(String),
    /// I/O error.
    IoError(String),
    /// An external tool exited unsuccessfully.
    ToolFailed(String),
    /// An external tool could not be launched.
    ToolNotFound(String),
}

impl fmt::Display for EqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EqError::InvalidFftSize(n) => {
                write!(f, "invalid FFT size: {}. Must be greater than 0", n)
            }
            EqError::InvalidHop { hop, fft_size } => write!(
                f,
                "invalid hop length: {} (must be between 1 and FFT size {})",
                hop, fft_size
            ),
            EqError::InvalidOverlap(p) => {
                write!(f, "invalid overlap: {}%. Must be between 0 and 100", p)
            }
            EqError::InvalidSampleRate(sr) => {
                write!(f, "invalid sample rate: {}. Must be positive and finite", sr)
            }
            EqError::InvalidBand(msg) => write!(f, "invalid band: {}", msg),
            EqError::MaskLengthMismatch { expected, actual } => write!(
                f,
                "mask length mismatch: expected {} bins, got {}",
                expected, actual
            ),
            EqError::MaskFftSizeMismatch { expected, actual } => write!(
                f,
                "mask designed for FFT size {}, filter uses {}",
                actual, expected
            ),
            EqError::NonFiniteInput => write!(f, "input contains NaN or infinite samples"),
            EqError::InvalidFormat(msg) => write!(f, "invalid format: {}", msg),
            EqError::IoError(msg) => write!(f, "I/O error: {}", msg),
            EqError::ToolFailed(msg) => write!(f, "external tool failed: {}", msg),
            EqError::ToolNotFound(msg) => write!(f, "external tool not found: {}", msg),
        }
    }
}

impl std::error::Error for EqError {}

impl From<std::io::Error> for EqError {
    fn from(err: std::io::Error) -> Self {
        EqError::IoError(err.to_string())
    }
}
