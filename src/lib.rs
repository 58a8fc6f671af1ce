#![forbid(unsafe_code)]
//! Frequency-domain band equalizer for recorded audio.
//!
//! `spectral_eq` builds a per-bin gain mask from a list of frequency bands and
//! applies it with block-based STFT analysis/synthesis and overlap-add
//! reconstruction. Each block is windowed, transformed, scaled bin by bin,
//! transformed back, and summed into place; the sum is divided by the summed
//! window weight so that a unity mask gives back the input.
//!
//! # Quick Start
//!
//! ```
//! use spectral_eq::{BandSpec, EqParams};
//!
//! // 1 second of 1 kHz sine at 8 kHz
//! let input: Vec<f32> = (0..8000)
//!     .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 8000.0).sin())
//!     .collect();
//!
//! let params = EqParams::new(8000)
//!     .with_fft_size(1024)
//!     .with_overlap(75.0)
//!     .with_bands(vec![BandSpec::new(0.0, 500.0, -40.0)]);
//!
//! let output = spectral_eq::equalize(&input, &params).unwrap();
//! assert_eq!(output.len(), input.len());
//! ```
//!
//! # Lower-level API
//!
//! The mask designer and the filter engine can be used directly:
//!
//! ```
//! use spectral_eq::{design_mask, Band, OverlapAddFilter, WindowType};
//!
//! let mask = design_mask(512, 16000.0, &[Band::new(0.0, 300.0, 0.5)]);
//! let mut filter = OverlapAddFilter::new(512, 128, WindowType::Hann).unwrap();
//! let output = filter.process(&[0.25; 2000], &mask).unwrap();
//! assert_eq!(output.len(), 2000);
//! ```

pub mod augment;
pub mod config;
pub mod core;
pub mod eq;
pub mod error;
pub mod io;
pub mod markup;

use std::path::Path;

pub use config::EqConfig;
pub use crate::core::types::{AudioBuffer, Sample};
pub use crate::core::window::WindowType;
pub use eq::{design_mask, Band, BandSpec, EqParams, FrequencyMask, GainScale, OverlapAddFilter};
pub use error::EqError;
pub use io::wav::WavFormat;

use crate::core::types::{clip, ensure_finite, normalize_peak};

/// Equalizes a mono signal.
///
/// Runs the whole pipeline: validate parameters, optionally scale the input to
/// unit peak, design the mask, filter with overlap-add, and clip the result
/// to `[-1.0, 1.0]`. The output has the same length as the input.
///
/// # Errors
///
/// Returns a configuration error from [`EqParams::validate`] or
/// [`EqError::NonFiniteInput`] before any processing starts.
pub fn equalize(input: &[Sample], params: &EqParams) -> Result<Vec<Sample>, EqError> {
    params.validate()?;
    ensure_finite(input)?;
    if input.is_empty() {
        return Ok(vec![]);
    }

    let mut signal = input.to_vec();
    if params.normalize {
        normalize_peak(&mut signal);
    }

    let mask = params.design_mask();
    let mut filter =
        OverlapAddFilter::new(params.fft_size, params.effective_hop_size(), params.window_type)?;
    log::info!("equalizing {} samples ({})", signal.len(), params);

    let mut output = filter.process(&signal, &mask)?;
    clip(&mut output);
    Ok(output)
}

/// Equalizes an [`AudioBuffer`], returning a mono buffer.
///
/// Multi-channel input is averaged to mono first. The sample rate is taken
/// from the buffer, overriding whatever is set in `params`.
pub fn equalize_buffer(buffer: &AudioBuffer, params: &EqParams) -> Result<AudioBuffer, EqError> {
    let mono = buffer.to_mono();
    let effective_params = params.clone().with_sample_rate(buffer.sample_rate);
    let output = equalize(&mono.data, &effective_params)?;
    Ok(AudioBuffer::from_mono(output, buffer.sample_rate))
}

/// Reads a WAV file, equalizes it with `config`, and writes the result.
///
/// Returns the written (mono) buffer.
pub fn equalize_wav_file(
    input: &Path,
    output: &Path,
    config: &EqConfig,
    format: WavFormat,
) -> Result<AudioBuffer, EqError> {
    let buffer = io::wav::read_wav_file(input)?;
    log::info!(
        "read {}: {} frames, {} Hz, {} channel(s)",
        input.display(),
        buffer.num_frames(),
        buffer.sample_rate,
        buffer.channels
    );
    let params = config.to_params(buffer.sample_rate)?;
    let processed = equalize_buffer(&buffer, &params)?;
    io::wav::write_wav_file(output, &processed, format)?;
    Ok(processed)
}
