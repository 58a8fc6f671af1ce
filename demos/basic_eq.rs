//! Basic equalizer example.
//!
//! Generates a two-tone signal, cuts the low tone with a single band, and
//! reports how much of each tone survives.
//!
//! Run with: cargo run --example basic_eq

use std::f32::consts::PI;

use spectral_eq::{BandSpec, EqParams};

fn tone_level(signal: &[f32], sample_rate: u32, freq: f32) -> f64 {
    let (mut re, mut im) = (0.0f64, 0.0f64);
    for (i, &s) in signal.iter().enumerate() {
        let angle = 2.0 * PI * freq * i as f32 / sample_rate as f32;
        re += s as f64 * angle.cos() as f64;
        im -= s as f64 * angle.sin() as f64;
    }
    2.0 * (re * re + im * im).sqrt() / signal.len() as f64
}

fn main() {
    let sample_rate = 16000u32;
    let input: Vec<f32> = (0..sample_rate as usize)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            0.5 * (2.0 * PI * 250.0 * t).sin() + 0.5 * (2.0 * PI * 2000.0 * t).sin()
        })
        .collect();

    let params = EqParams::new(sample_rate)
        .with_fft_size(2048)
        .with_overlap(75.0)
        .with_normalize(false)
        .with_bands(vec![BandSpec::new(0.0, 500.0, -20.0)]);

    println!("Parameters: {}", params);

    let output = spectral_eq::equalize(&input, &params).expect("equalize failed");

    for freq in [250.0, 2000.0] {
        println!(
            "{:>6.0} Hz: {:.3} -> {:.3}",
            freq,
            tone_level(&input, sample_rate, freq),
            tone_level(&output, sample_rate, freq)
        );
    }
}
