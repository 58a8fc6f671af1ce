#![allow(dead_code)]

use std::f32::consts::PI;

pub fn gen_sine(freq_hz: f32, sr: u32, n: usize, amp: f32) -> Vec<f32> {
    (0..n)
        .map(|i| amp * (2.0 * PI * freq_hz * i as f32 / sr as f32).sin())
        .collect()
}

pub fn gen_two_tone(
    freq_a: f32,
    amp_a: f32,
    freq_b: f32,
    amp_b: f32,
    sr: u32,
    n: usize,
) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sr as f32;
            amp_a * (2.0 * PI * freq_a * t).sin() + amp_b * (2.0 * PI * freq_b * t).sin()
        })
        .collect()
}

/// Deterministic white noise in [-amp, amp] from a 64-bit LCG.
pub fn gen_noise(n: usize, amp: f32, seed: u64) -> Vec<f32> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            (amp as f64 * (2.0 * unit - 1.0)) as f32
        })
        .collect()
}

pub fn energy(signal: &[f32]) -> f64 {
    signal.iter().map(|&s| (s as f64) * (s as f64)).sum()
}

/// Amplitude of the `freq_hz` component, estimated by a single DFT bin.
pub fn tone_amplitude(signal: &[f32], sr: u32, freq_hz: f32) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let mut re = 0.0f64;
    let mut im = 0.0f64;
    for (i, &s) in signal.iter().enumerate() {
        let angle = 2.0 * std::f64::consts::PI * freq_hz as f64 * i as f64 / sr as f64;
        re += s as f64 * angle.cos();
        im -= s as f64 * angle.sin();
    }
    2.0 * (re * re + im * im).sqrt() / signal.len() as f64
}

/// Largest absolute difference, skipping the first `skip` samples.
pub fn max_abs_error(a: &[f32], b: &[f32], skip: usize) -> f32 {
    a.iter()
        .zip(b.iter())
        .skip(skip)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("spectral_eq_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
