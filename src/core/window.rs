//! Window functions for block analysis.
//!
//! All windows are generated in their periodic (DFT-even) form: the length-N
//! window is the first N points of a symmetric window of length N + 1. This is
//! the form that sums to a constant under overlap-add at the usual hops, and
//! it is what the equalizer uses for analysis.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Blackman-Harris window coefficients (4-term).
const BH_A0: f64 = 0.35875;
const BH_A1: f64 = 0.48829;
const BH_A2: f64 = 0.14128;
const BH_A3: f64 = 0.01168;

/// Window function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowType {
    #[default]
    Hann,
    BlackmanHarris,
    Kaiser(u32), // beta parameter scaled by 100 (e.g., 800 = 8.0)
}

/// Generates a window function of the specified type and size.
pub fn generate_window(window_type: WindowType, size: usize) -> Vec<f64> {
    match window_type {
        WindowType::Hann => hann_window(size),
        WindowType::BlackmanHarris => blackman_harris_window(size),
        WindowType::Kaiser(beta_100) => kaiser_window(size, beta_100 as f64 / 100.0),
    }
}

/// Returns `Some(trivial_window)` for degenerate sizes (0 or 1), or `None`
/// to indicate the caller should compute the full window.
#[inline]
fn trivial_window(size: usize) -> Option<Vec<f64>> {
    match size {
        0 => Some(vec![]),
        1 => Some(vec![1.0]),
        _ => None,
    }
}

/// Generates a periodic Hann window.
#[inline]
pub(crate) fn hann_window(size: usize) -> Vec<f64> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / n).cos()))
        .collect()
}

/// Generates a periodic Blackman-Harris window.
#[inline]
fn blackman_harris_window(size: usize) -> Vec<f64> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = i as f64 / n;
            BH_A0 - BH_A1 * (2.0 * PI * x).cos() + BH_A2 * (4.0 * PI * x).cos()
                - BH_A3 * (6.0 * PI * x).cos()
        })
        .collect()
}

/// Generates a periodic Kaiser window using the zeroth-order modified Bessel
/// function.
#[inline]
fn kaiser_window(size: usize, beta: f64) -> Vec<f64> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    let denom = bessel_i0(beta);
    (0..size)
        .map(|i| {
            let x = 2.0 * i as f64 / n - 1.0;
            let arg = beta * (1.0 - x * x).max(0.0).sqrt();
            bessel_i0(arg) / denom
        })
        .collect()
}

/// Maximum number of series terms for Bessel I0 convergence.
const BESSEL_MAX_TERMS: usize = 30;
/// Relative convergence threshold for Bessel I0 series.
const BESSEL_CONVERGENCE: f64 = 1e-15;

/// Zeroth-order modified Bessel function of the first kind.
/// Computed via series expansion.
#[inline]
fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let x_half = x / 2.0;
    for k in 1..BESSEL_MAX_TERMS {
        term *= (x_half / k as f64) * (x_half / k as f64);
        sum += term;
        if term < BESSEL_CONVERGENCE * sum {
            break;
        }
    }
    sum
}

/// Multiplies `data` by `window` elementwise, in place.
#[inline]
pub fn apply_window(data: &mut [f64], window: &[f64]) {
    for (sample, &w) in data.iter_mut().zip(window.iter()) {
        *sample *= w;
    }
}
