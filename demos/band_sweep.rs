//! Prints the mask a band list produces, one line per band edge region.
//!
//! Run with: cargo run --example band_sweep

use spectral_eq::{design_mask, EqParams, GainScale};

fn main() {
    for scale in [GainScale::Amplitude, GainScale::Power] {
        let params = EqParams::new(44100).with_fft_size(1024).with_gain_scale(scale);
        let mask = design_mask(
            params.fft_size,
            params.sample_rate as f64,
            &params.linear_bands(),
        );
        println!("{:?} scale, {} bins", scale, mask.len());
        let bin_hz = params.sample_rate as f64 / params.fft_size as f64;
        let mut prev = f64::NAN;
        for (bin, &gain) in mask.gains().iter().enumerate() {
            if gain != prev {
                println!("  from {:>8.1} Hz: x{:.3}", bin as f64 * bin_hz, gain);
                prev = gain;
            }
        }
    }
}
