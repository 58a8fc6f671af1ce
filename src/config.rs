//! JSON equalizer configuration files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::window::WindowType;
use crate::eq::band::{default_band_specs, BandSpec, GainScale};
use crate::eq::params::{EqParams, DEFAULT_FFT_SIZE, DEFAULT_OVERLAP_PERCENT};
use crate::error::EqError;

/// Serializable description of an equalizer run. The sample rate is not part
/// of it; it comes from the audio being processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqConfig {
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default = "default_overlap_percent")]
    pub overlap_percent: f64,
    /// Explicit hop length; takes precedence over `overlap_percent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hop_size: Option<usize>,
    #[serde(default)]
    pub window: WindowType,
    #[serde(default)]
    pub gain_scale: GainScale,
    #[serde(default = "default_normalize")]
    pub normalize: bool,
    #[serde(default = "default_band_specs")]
    pub bands: Vec<BandSpec>,
}

fn default_fft_size() -> usize {
    DEFAULT_FFT_SIZE
}

fn default_overlap_percent() -> f64 {
    DEFAULT_OVERLAP_PERCENT
}

fn default_normalize() -> bool {
    true
}

impl Default for EqConfig {
    fn default() -> Self {
        Self::from(&EqParams::default())
    }
}

impl EqConfig {
    /// Builds validated run parameters for audio at `sample_rate`.
    pub fn to_params(&self, sample_rate: u32) -> Result<EqParams, EqError> {
        let mut params = EqParams::new(sample_rate)
            .with_fft_size(self.fft_size)
            .with_overlap(self.overlap_percent)
            .with_window_type(self.window)
            .with_gain_scale(self.gain_scale)
            .with_normalize(self.normalize)
            .with_bands(self.bands.clone());
        if let Some(hop) = self.hop_size {
            params = params.with_hop_size(hop);
        }
        params.validate()?;
        Ok(params)
    }
}

impl From<&EqParams> for EqConfig {
    fn from(params: &EqParams) -> Self {
        Self {
            fft_size: params.fft_size,
            overlap_percent: params.overlap_percent,
            hop_size: params.hop_size,
            window: params.window_type,
            gain_scale: params.gain_scale,
            normalize: params.normalize,
            bands: params.bands.clone(),
        }
    }
}

/// Parses a configuration from JSON text.
pub fn parse_config_json(json: &str) -> Result<EqConfig, EqError> {
    serde_json::from_str(json)
        .map_err(|e| EqError::InvalidFormat(format!("failed to parse equalizer config: {}", e)))
}

/// Writes a configuration as pretty-printed JSON.
pub fn write_config_json(path: &Path, config: &EqConfig) -> Result<(), EqError> {
    let json = serde_json::to_string_pretty(config).map_err(|e| {
        EqError::InvalidFormat(format!("failed to serialize equalizer config: {}", e))
    })?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads a configuration from a JSON file.
pub fn read_config_json(path: &Path) -> Result<EqConfig, EqError> {
    let data = std::fs::read_to_string(path)?;
    parse_config_json(&data).map_err(|e| match e {
        EqError::InvalidFormat(msg) => {
            EqError::InvalidFormat(format!("{} ({})", msg, path.display()))
        }
        other => other,
    })
}
