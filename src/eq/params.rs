use std::fmt;

use crate::core::window::WindowType;
use crate::eq::band::{default_band_specs, Band, BandSpec, GainScale};
use crate::eq::mask::{design_mask, FrequencyMask};
use crate::eq::overlap_add::validate_geometry;
use crate::error::EqError;

/// Default FFT size.
pub const DEFAULT_FFT_SIZE: usize = 2048;
/// Default block overlap in percent.
pub const DEFAULT_OVERLAP_PERCENT: f64 = 75.0;

/// Parameters controlling one equalizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct EqParams {
    /// Sample rate in Hz (default: 44100).
    pub sample_rate: u32,
    /// FFT size (default: 2048).
    pub fft_size: usize,
    /// Block overlap in percent (default: 75). Ignored when `hop_size` is set.
    pub overlap_percent: f64,
    /// Explicit hop length in samples.
    pub hop_size: Option<usize>,
    /// Analysis window (default: Hann).
    pub window_type: WindowType,
    /// How band gains in dB are turned into linear factors.
    pub gain_scale: GainScale,
    /// Ordered band list; later bands override earlier ones.
    pub bands: Vec<BandSpec>,
    /// Scale the input to unit peak before filtering (default: true).
    pub normalize: bool,
}

impl Default for EqParams {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            fft_size: DEFAULT_FFT_SIZE,
            overlap_percent: DEFAULT_OVERLAP_PERCENT,
            hop_size: None,
            window_type: WindowType::Hann,
            gain_scale: GainScale::Amplitude,
            bands: default_band_specs(),
            normalize: true,
        }
    }
}

impl EqParams {
    /// Default parameters at the given sample rate.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the FFT size.
    pub fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    /// Set the overlap percentage and clear any explicit hop.
    pub fn with_overlap(mut self, overlap_percent: f64) -> Self {
        self.overlap_percent = overlap_percent;
        self.hop_size = None;
        self
    }

    /// Set an explicit hop length.
    pub fn with_hop_size(mut self, hop_size: usize) -> Self {
        self.hop_size = Some(hop_size);
        self
    }

    /// Set the analysis window.
    pub fn with_window_type(mut self, window_type: WindowType) -> Self {
        self.window_type = window_type;
        self
    }

    /// Set the decibel convention.
    pub fn with_gain_scale(mut self, gain_scale: GainScale) -> Self {
        self.gain_scale = gain_scale;
        self
    }

    /// Replace the band list.
    pub fn with_bands(mut self, bands: Vec<BandSpec>) -> Self {
        self.bands = bands;
        self
    }

    /// Append one band after the existing ones.
    pub fn with_band(mut self, start_hz: f64, end_hz: f64, gain_db: f64) -> Self {
        self.bands.push(BandSpec::new(start_hz, end_hz, gain_db));
        self
    }

    /// Enable or disable peak normalization of the input.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Get the effective hop length.
    pub fn effective_hop_size(&self) -> usize {
        self.hop_size
            .unwrap_or_else(|| hop_from_overlap(self.fft_size, self.overlap_percent))
    }

    /// Bands with gains resolved to linear factors.
    pub fn linear_bands(&self) -> Vec<Band> {
        self.bands
            .iter()
            .map(|b| b.to_band(self.gain_scale))
            .collect()
    }

    /// Builds the frequency mask these parameters describe.
    pub fn design_mask(&self) -> FrequencyMask {
        design_mask(self.fft_size, self.sample_rate as f64, &self.linear_bands())
    }

    /// Validate all parameters.
    pub fn validate(&self) -> Result<(), EqError> {
        if self.sample_rate == 0 {
            return Err(EqError::InvalidSampleRate(self.sample_rate as f64));
        }
        if self.hop_size.is_none()
            && !(self.overlap_percent.is_finite()
                && (0.0..=100.0).contains(&self.overlap_percent))
        {
            return Err(EqError::InvalidOverlap(self.overlap_percent));
        }
        validate_geometry(self.fft_size, self.effective_hop_size())?;
        for band in &self.bands {
            band.validate()?;
        }
        Ok(())
    }
}

impl fmt::Display for EqParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, fft_size={}, hop={}, window={:?}, scale={:?}, {} band(s)",
            self.sample_rate,
            self.fft_size,
            self.effective_hop_size(),
            self.window_type,
            self.gain_scale,
            self.bands.len()
        )
    }
}

/// Hop length for a given overlap: `floor(fft_size * (1 - overlap / 100))`,
/// never less than 1.
pub fn hop_from_overlap(fft_size: usize, overlap_percent: f64) -> usize {
    let hop = (fft_size as f64 * (1.0 - overlap_percent / 100.0)).floor();
    if hop.is_finite() && hop >= 1.0 {
        hop as usize
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = EqParams::new(8000);
        assert_eq!(params.sample_rate, 8000);
        assert_eq!(params.fft_size, 2048);
        assert_eq!(params.effective_hop_size(), 512);
        assert_eq!(params.bands.len(), 5);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_hop_from_overlap() {
        assert_eq!(hop_from_overlap(2048, 75.0), 512);
        assert_eq!(hop_from_overlap(2048, 50.0), 1024);
        assert_eq!(hop_from_overlap(2048, 0.0), 2048);
        assert_eq!(hop_from_overlap(1000, 25.0), 750);
        assert_eq!(hop_from_overlap(100, 12.5), 87);
    }

    #[test]
    fn test_full_overlap_clamps_hop_to_one() {
        assert_eq!(hop_from_overlap(2048, 100.0), 1);
        assert_eq!(hop_from_overlap(1024, 99.99), 1);
        let params = EqParams::new(8000).with_overlap(100.0);
        assert_eq!(params.effective_hop_size(), 1);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_explicit_hop_overrides_overlap() {
        let params = EqParams::new(8000).with_overlap(50.0).with_hop_size(100);
        assert_eq!(params.effective_hop_size(), 100);
        let params = params.with_overlap(50.0);
        assert_eq!(params.effective_hop_size(), 1024);
    }

    #[test]
    fn test_validate_errors() {
        assert!(matches!(
            EqParams::new(0).validate(),
            Err(EqError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            EqParams::new(8000).with_fft_size(0).validate(),
            Err(EqError::InvalidFftSize(0))
        ));
        assert!(matches!(
            EqParams::new(8000).with_overlap(120.0).validate(),
            Err(EqError::InvalidOverlap(_))
        ));
        assert!(matches!(
            EqParams::new(8000).with_overlap(-5.0).validate(),
            Err(EqError::InvalidOverlap(_))
        ));
        assert!(matches!(
            EqParams::new(8000).with_hop_size(0).validate(),
            Err(EqError::InvalidHop { .. })
        ));
        assert!(matches!(
            EqParams::new(8000).with_hop_size(4096).validate(),
            Err(EqError::InvalidHop { .. })
        ));
        assert!(matches!(
            EqParams::new(8000).with_band(0.0, f64::NAN, 3.0).validate(),
            Err(EqError::InvalidBand(_))
        ));
    }

    #[test]
    fn test_linear_bands_follow_scale() {
        let params = EqParams::new(8000)
            .with_bands(vec![BandSpec::new(0.0, 100.0, 10.0)])
            .with_gain_scale(GainScale::Power);
        assert!((params.linear_bands()[0].gain - 10.0).abs() < 1e-9);
        let params = params.with_gain_scale(GainScale::Amplitude);
        assert!((params.linear_bands()[0].gain - 10f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_design_mask_uses_fft_size() {
        let params = EqParams::new(8000).with_fft_size(512).with_bands(vec![]);
        let mask = params.design_mask();
        assert_eq!(mask.len(), 257);
        assert!(mask.gains().iter().all(|&g| g == 1.0));
    }

    #[test]
    fn test_display() {
        let s = EqParams::new(48000).to_string();
        assert!(s.contains("48000"));
        assert!(s.contains("fft_size=2048"));
        assert!(s.contains("hop=512"));
    }
}
