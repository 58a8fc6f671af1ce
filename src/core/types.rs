use crate::error::EqError;

/// A single audio sample (32-bit float, nominal range -1.0 to 1.0).
pub type Sample = f32;

/// Buffer holding audio samples in interleaved format.
///
/// For mono audio, samples are stored sequentially: `[s0, s1, s2, ...]`
/// For multi-channel audio, frames are interleaved: `[L0, R0, L1, R1, ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Raw interleaved sample data.
    pub data: Vec<Sample>,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a new audio buffer.
    ///
    /// # Errors
    /// Returns `EqError::InvalidFormat` if `channels` is 0 or the data length
    /// is not a whole number of frames, and `EqError::InvalidSampleRate` if
    /// `sample_rate` is 0.
    pub fn new(data: Vec<Sample>, channels: u16, sample_rate: u32) -> Result<Self, EqError> {
        if channels == 0 {
            return Err(EqError::InvalidFormat(
                "channel count must be at least 1".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(EqError::InvalidSampleRate(0.0));
        }
        if data.len() % channels as usize != 0 {
            return Err(EqError::InvalidFormat(format!(
                "{} samples is not a whole number of {}-channel frames",
                data.len(),
                channels
            )));
        }
        Ok(Self {
            data,
            channels,
            sample_rate,
        })
    }

    /// Create a mono buffer. Never fails for a non-zero sample rate.
    pub fn from_mono(data: Vec<Sample>, sample_rate: u32) -> Self {
        Self {
            data,
            channels: 1,
            sample_rate,
        }
    }

    /// Number of frames in the buffer (total samples / channels).
    pub fn num_frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.data.len() / self.channels as usize
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Returns true if the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Collapses all channels to one by averaging each frame.
    pub fn to_mono(&self) -> AudioBuffer {
        AudioBuffer::from_mono(downmix(&self.data, self.channels as usize), self.sample_rate)
    }
}

/// Averages interleaved frames across channels.
#[inline]
pub fn downmix(samples: &[Sample], num_channels: usize) -> Vec<Sample> {
    if num_channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(num_channels)
        .map(|frame| {
            let sum: f64 = frame.iter().map(|&s| s as f64).sum();
            (sum / num_channels as f64) as Sample
        })
        .collect()
}

/// Largest absolute sample value, or 0.0 for an empty signal.
#[inline]
pub fn peak(samples: &[Sample]) -> Sample {
    samples.iter().fold(0.0, |acc, &s| acc.max(s.abs()))
}

/// Scales the signal so its peak absolute value is 1.0.
///
/// Silent signals are left untouched.
pub fn normalize_peak(samples: &mut [Sample]) {
    let p = peak(samples);
    if p <= 0.0 {
        return;
    }
    let gain = 1.0 / p;
    for s in samples.iter_mut() {
        *s *= gain;
    }
}

/// Saturates every sample to `[-1.0, 1.0]`.
#[inline]
pub fn clip(samples: &mut [Sample]) {
    for s in samples.iter_mut() {
        *s = s.clamp(-1.0, 1.0);
    }
}

/// Rejects signals containing NaN or infinite samples.
#[inline]
pub fn ensure_finite(samples: &[Sample]) -> Result<(), EqError> {
    if samples.iter().any(|s| !s.is_finite()) {
        return Err(EqError::NonFiniteInput);
    }
    Ok(())
}
