//! FFT-related constants and helpers shared across the crate.

use rustfft::num_complex::Complex;

/// Zero-valued complex number, used for FFT buffer initialization.
pub const COMPLEX_ZERO: Complex<f64> = Complex::new(0.0, 0.0);

/// Window-sum floor for overlap-add normalization. Positions whose
/// accumulated window weight is at or below this value are left
/// un-normalized.
pub const WINDOW_SUM_EPSILON: f64 = 1e-12;

/// Number of non-negative frequency bins of a real `fft_size`-point transform.
#[inline]
pub fn num_bins(fft_size: usize) -> usize {
    fft_size / 2 + 1
}

/// Center frequency in Hz of `bin` for an `fft_size`-point transform.
#[inline]
pub fn bin_frequency(bin: usize, fft_size: usize, sample_rate: f64) -> f64 {
    bin as f64 * sample_rate / fft_size as f64
}
