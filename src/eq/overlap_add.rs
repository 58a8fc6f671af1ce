//! Overlap-add filtering engine.
//!
//! Slides a window across the signal with a fixed hop, filters each windowed
//! block in the frequency domain with a [`FrequencyMask`], and sums the
//! inverse-transformed blocks back into place. Dividing by the summed window
//! weight at every position removes the taper again, so with a unity mask the
//! input is reproduced.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use crate::core::fft::{num_bins, COMPLEX_ZERO, WINDOW_SUM_EPSILON};
use crate::core::types::{ensure_finite, Sample};
use crate::core::window::{apply_window, generate_window, WindowType};
use crate::eq::mask::FrequencyMask;
use crate::error::EqError;

/// Block-based STFT filter. Holds the window, cached FFT plans, and a reusable
/// block buffer; the accumulators live only for one [`process`] call.
///
/// [`process`]: OverlapAddFilter::process
pub struct OverlapAddFilter {
    fft_size: usize,
    hop: usize,
    window: Vec<f64>,
    fft_forward: Arc<dyn Fft<f64>>,
    fft_inverse: Arc<dyn Fft<f64>>,
    /// Reusable FFT buffer.
    fft_buffer: Vec<Complex<f64>>,
    /// Real-valued block before windowing.
    frame: Vec<f64>,
}

impl OverlapAddFilter {
    /// Creates a filter for blocks of `fft_size` samples advanced by `hop`.
    ///
    /// # Errors
    ///
    /// Returns [`EqError::InvalidFftSize`] if `fft_size` is 0 and
    /// [`EqError::InvalidHop`] unless `1 <= hop <= fft_size`.
    pub fn new(fft_size: usize, hop: usize, window_type: WindowType) -> Result<Self, EqError> {
        validate_geometry(fft_size, hop)?;
        let mut planner = FftPlanner::new();
        Ok(Self {
            fft_size,
            hop,
            window: generate_window(window_type, fft_size),
            fft_forward: planner.plan_fft_forward(fft_size),
            fft_inverse: planner.plan_fft_inverse(fft_size),
            fft_buffer: vec![COMPLEX_ZERO; fft_size],
            frame: vec![0.0; fft_size],
        })
    }

    /// Returns the FFT size.
    #[inline]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Returns the hop length.
    #[inline]
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Number of blocks a signal of `len` samples is split into.
    #[inline]
    pub fn num_blocks(&self, len: usize) -> usize {
        len.div_ceil(self.hop)
    }

    /// Filters `input` with `mask`, returning a signal of the same length.
    ///
    /// # Errors
    ///
    /// Returns [`EqError::MaskLengthMismatch`] if the mask does not have
    /// `fft_size / 2 + 1` bins, [`EqError::MaskFftSizeMismatch`] if it was
    /// designed for another FFT size, and [`EqError::NonFiniteInput`] if any
    /// input sample is NaN or infinite. All are checked before any block runs.
    pub fn process(&mut self, input: &[Sample], mask: &FrequencyMask) -> Result<Vec<Sample>, EqError> {
        let expected = num_bins(self.fft_size);
        if mask.len() != expected {
            return Err(EqError::MaskLengthMismatch {
                expected,
                actual: mask.len(),
            });
        }
        // 1024 and 1025 share a bin count but not a bin spacing
        if mask.fft_size() != self.fft_size {
            return Err(EqError::MaskFftSizeMismatch {
                expected: self.fft_size,
                actual: mask.fft_size(),
            });
        }
        ensure_finite(input)?;
        if input.is_empty() {
            return Ok(vec![]);
        }

        let n = self.fft_size;
        let len = input.len();
        let norm = 1.0 / n as f64;
        let gains = mask.gains();

        let mut output = vec![0.0f64; len + n];
        let mut window_sum = vec![0.0f64; len + n];

        let mut start = 0;
        while start < len {
            let available = (len - start).min(n);
            let block = &input[start..start + available];

            // Analysis: zero-pad the tail of the last blocks, then window
            for (i, slot) in self.frame.iter_mut().enumerate() {
                *slot = block.get(i).map_or(0.0, |&s| s as f64);
            }
            apply_window(&mut self.frame, &self.window);
            for (slot, &x) in self.fft_buffer.iter_mut().zip(self.frame.iter()) {
                *slot = Complex::new(x, 0.0);
            }

            self.fft_forward.process(&mut self.fft_buffer);
            apply_mask(&mut self.fft_buffer, gains);
            self.fft_inverse.process(&mut self.fft_buffer);

            let out_block = &mut output[start..start + n];
            let sum_block = &mut window_sum[start..start + n];
            for i in 0..n {
                out_block[i] += self.fft_buffer[i].re * norm;
                sum_block[i] += self.window[i];
            }

            start += self.hop;
        }

        log::debug!(
            "overlap-add: {} samples, {} blocks (fft_size={}, hop={})",
            len,
            self.num_blocks(len),
            self.fft_size(),
            self.hop()
        );

        output.truncate(len);
        window_sum.truncate(len);

        Ok(output
            .iter()
            .zip(window_sum.iter())
            .map(|(&acc, &weight)| {
                if weight > WINDOW_SUM_EPSILON {
                    (acc / weight) as Sample
                } else {
                    acc as Sample
                }
            })
            .collect())
    }
}

/// Checks `fft_size > 0` and `1 <= hop <= fft_size`.
pub(crate) fn validate_geometry(fft_size: usize, hop: usize) -> Result<(), EqError> {
    if fft_size == 0 {
        return Err(EqError::InvalidFftSize(fft_size));
    }
    if hop == 0 || hop > fft_size {
        return Err(EqError::InvalidHop { hop, fft_size });
    }
    Ok(())
}

/// Scales a full complex spectrum by a real mask over its non-negative bins.
///
/// Bin `k` and its conjugate partner `N - k` get the same gain, which keeps
/// the spectrum Hermitian so the inverse transform stays real.
#[inline]
fn apply_mask(spectrum: &mut [Complex<f64>], gains: &[f64]) {
    let n = spectrum.len();
    let half = n / 2;
    for (k, value) in spectrum.iter_mut().enumerate() {
        let bin = if k <= half { k } else { n - k };
        *value *= gains[bin];
    }
}

/// One-shot convenience wrapper around [`OverlapAddFilter`].
pub fn apply_overlap_add(
    input: &[Sample],
    mask: &FrequencyMask,
    fft_size: usize,
    hop: usize,
    window_type: WindowType,
) -> Result<Vec<Sample>, EqError> {
    OverlapAddFilter::new(fft_size, hop, window_type)?.process(input, mask)
}
