//! Frequency bands and decibel conversion.

use serde::{Deserialize, Serialize};

use crate::error::EqError;

/// Decibel convention used to turn a band's dB gain into a linear factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GainScale {
    /// Amplitude ratio: `10^(dB / 20)`. +6 dB roughly doubles amplitude.
    #[default]
    Amplitude,
    /// Power ratio: `10^(dB / 10)`. +3 dB roughly doubles amplitude.
    Power,
}

impl GainScale {
    /// Converts a gain in dB to a linear factor under this convention.
    #[inline]
    pub fn to_linear(self, gain_db: f64) -> f64 {
        match self {
            GainScale::Amplitude => 10f64.powf(gain_db / 20.0),
            GainScale::Power => 10f64.powf(gain_db / 10.0),
        }
    }
}

/// A closed frequency interval paired with a linear gain.
///
/// Bands with `start_hz > end_hz` or lying outside `[0, nyquist]` are legal
/// and simply select no bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub start_hz: f64,
    pub end_hz: f64,
    /// Linear gain factor (1.0 = unchanged).
    pub gain: f64,
}

impl Band {
    pub fn new(start_hz: f64, end_hz: f64, gain: f64) -> Self {
        Self {
            start_hz,
            end_hz,
            gain,
        }
    }

    /// Returns true if `freq_hz` lies inside the band, edges included.
    #[inline]
    pub fn contains(&self, freq_hz: f64) -> bool {
        freq_hz >= self.start_hz && freq_hz <= self.end_hz
    }
}

/// A band whose gain is expressed in decibels, as written in configuration
/// files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSpec {
    pub start_hz: f64,
    pub end_hz: f64,
    pub gain_db: f64,
}

impl BandSpec {
    pub fn new(start_hz: f64, end_hz: f64, gain_db: f64) -> Self {
        Self {
            start_hz,
            end_hz,
            gain_db,
        }
    }

    /// Resolves the dB gain to a linear [`Band`].
    pub fn to_band(&self, scale: GainScale) -> Band {
        Band::new(self.start_hz, self.end_hz, scale.to_linear(self.gain_db))
    }

    /// Checks that every field is a finite number.
    pub fn validate(&self) -> Result<(), EqError> {
        if !self.start_hz.is_finite() || !self.end_hz.is_finite() || !self.gain_db.is_finite() {
            return Err(EqError::InvalidBand(format!(
                "{}..{} Hz at {} dB has a non-finite field",
                self.start_hz, self.end_hz, self.gain_db
            )));
        }
        Ok(())
    }

    /// Parses `start:end:gain_db`, e.g. `"20:200:-6"`.
    pub fn parse(s: &str) -> Result<Self, EqError> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(EqError::InvalidBand(format!(
                "'{}' (expected start:end:gain_db)",
                s
            )));
        }
        let field = |idx: usize, name: &str| -> Result<f64, EqError> {
            parts[idx].trim().parse::<f64>().map_err(|_| {
                EqError::InvalidBand(format!("'{}' has an invalid {}: '{}'", s, name, parts[idx]))
            })
        };
        let spec = BandSpec::new(field(0, "start")?, field(1, "end")?, field(2, "gain")?);
        spec.validate()?;
        Ok(spec)
    }
}

/// Five-band layout the equalizer uses when no bands are given:
/// sub-bass cut, low-mid lift, mid lift, high-mid cut, air lift.
pub fn default_band_specs() -> Vec<BandSpec> {
    vec![
        BandSpec::new(20.0, 200.0, -6.0),
        BandSpec::new(200.0, 800.0, 3.0),
        BandSpec::new(800.0, 2000.0, 6.0),
        BandSpec::new(2000.0, 6000.0, -6.0),
        BandSpec::new(6000.0, 20000.0, 8.0),
    ]
}
