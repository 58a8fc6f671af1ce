//! Frequency-response mask design.

use crate::core::fft::{bin_frequency, num_bins};
use crate::eq::band::Band;

/// Per-bin linear gains for the non-negative bins of an `fft_size`-point
/// real transform, from 0 Hz up to Nyquist.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyMask {
    fft_size: usize,
    gains: Vec<f64>,
}

impl FrequencyMask {
    /// Unity-gain mask: every bin passes unchanged.
    pub fn identity(fft_size: usize) -> Self {
        Self {
            fft_size,
            gains: vec![1.0; num_bins(fft_size)],
        }
    }

    /// Wraps caller-computed gains. The length is checked against
    /// `fft_size` when the mask is applied, not here.
    pub fn from_gains(fft_size: usize, gains: Vec<f64>) -> Self {
        Self { fft_size, gains }
    }

    #[inline]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    #[inline]
    pub fn gains(&self) -> &[f64] {
        &self.gains
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.gains.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gains.is_empty()
    }
}

/// Builds a mask of `fft_size / 2 + 1` gains from an ordered band list.
///
/// Every bin starts at 1.0. Bands are applied in order and each one
/// overwrites the bins whose center frequency falls inside it, so a later
/// band wins wherever two bands overlap. Gains are taken as given.
pub fn design_mask(fft_size: usize, sample_rate: f64, bands: &[Band]) -> FrequencyMask {
    let mut mask = FrequencyMask::identity(fft_size);
    for band in bands {
        for (bin, gain) in mask.gains.iter_mut().enumerate() {
            if band.contains(bin_frequency(bin, fft_size, sample_rate)) {
                *gain = band.gain;
            }
        }
    }
    mask
}
