//! Minimal RIFF/WAVE codec.
//!
//! Reads PCM (8/16/24/32-bit) and IEEE float (32-bit) files with any channel
//! count, including `WAVE_FORMAT_EXTENSIBLE` headers. Writes 16-bit PCM,
//! 24-bit PCM, or 32-bit float.
//!
//! Integer samples are mapped to `f32` by dividing by the format's negative
//! full-scale magnitude (e.g. 32768 for 16-bit). On write, samples are clipped
//! to `[-1.0, 1.0]`, scaled by the positive full-scale value (e.g. 32767),
//! rounded half away from zero, and saturated to the integer range.

use std::path::Path;

use crate::core::types::{AudioBuffer, Sample};
use crate::error::EqError;

/// WAV audio format codes.
const WAV_FORMAT_PCM: u16 = 1;
const WAV_FORMAT_IEEE_FLOAT: u16 = 3;
const WAV_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

const PCM16_SCALE: f32 = 32767.0;
const PCM24_SCALE: f32 = 8_388_607.0;

/// Reads a WAV file from a byte slice.
pub fn read_wav(data: &[u8]) -> Result<AudioBuffer, EqError> {
    if data.len() < 44 {
        return Err(EqError::InvalidFormat("WAV file too short".to_string()));
    }
    if &data[0..4] != b"RIFF" {
        return Err(EqError::InvalidFormat("Missing RIFF header".to_string()));
    }
    if &data[8..12] != b"WAVE" {
        return Err(EqError::InvalidFormat(
            "Missing WAVE identifier".to_string(),
        ));
    }

    let mut cursor = 12;
    let mut format_code: u16 = 0;
    let mut num_channels: u16 = 0;
    let mut sample_rate: u32 = 0;
    let mut bits_per_sample: u16 = 0;
    let mut audio_data: Option<&[u8]> = None;

    while cursor + 8 <= data.len() {
        let chunk_id = &data[cursor..cursor + 4];
        let chunk_size = read_u32_le(data, cursor + 4) as usize;
        cursor += 8;
        let chunk_end = cursor.saturating_add(chunk_size).min(data.len());

        if chunk_id == b"fmt " {
            if cursor + 16 > data.len() || chunk_size < 16 {
                return Err(EqError::InvalidFormat("fmt chunk too short".to_string()));
            }
            format_code = read_u16_le(data, cursor);
            num_channels = read_u16_le(data, cursor + 2);
            sample_rate = read_u32_le(data, cursor + 4);
            // skip byte rate (4 bytes) and block align (2 bytes)
            bits_per_sample = read_u16_le(data, cursor + 14);
            // Extensible headers carry the real format code in the sub-format GUID
            if format_code == WAV_FORMAT_EXTENSIBLE && chunk_size >= 26 && cursor + 26 <= data.len()
            {
                format_code = read_u16_le(data, cursor + 24);
            }
        } else if chunk_id == b"data" {
            // Truncated files: use whatever data is available
            audio_data = Some(&data[cursor..chunk_end]);
        }

        cursor = cursor.saturating_add(chunk_size);
        // WAV chunks are word-aligned
        if chunk_size % 2 != 0 {
            cursor = cursor.saturating_add(1);
        }
    }

    if sample_rate == 0 {
        return Err(EqError::InvalidFormat("No fmt chunk found".to_string()));
    }
    if num_channels == 0 {
        return Err(EqError::InvalidFormat(
            "fmt chunk declares zero channels".to_string(),
        ));
    }
    let audio_data =
        audio_data.ok_or_else(|| EqError::InvalidFormat("No data chunk found".to_string()))?;

    let mut samples = decode_samples(audio_data, format_code, bits_per_sample)?;
    // Drop a trailing partial frame
    let whole = samples.len() - samples.len() % num_channels as usize;
    samples.truncate(whole);

    AudioBuffer::new(samples, num_channels, sample_rate)
}

/// Converts raw little-endian sample bytes to `f32`.
fn decode_samples(bytes: &[u8], format_code: u16, bits: u16) -> Result<Vec<Sample>, EqError> {
    let samples = match (format_code, bits) {
        (WAV_FORMAT_PCM, 8) => bytes
            .iter()
            .map(|&b| (b as f32 - 128.0) / 128.0)
            .collect(),
        (WAV_FORMAT_PCM, 16) => bytes
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]) as f32 / 32768.0)
            .collect(),
        (WAV_FORMAT_PCM, 24) => bytes
            .chunks_exact(3)
            .map(|c| {
                // Place the 3 bytes in the top of an i32 and shift back to sign-extend
                let raw = i32::from_le_bytes([0, c[0], c[1], c[2]]) >> 8;
                raw as f32 / 8_388_608.0
            })
            .collect(),
        (WAV_FORMAT_PCM, 32) => bytes
            .chunks_exact(4)
            .map(|c| (i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64 / 2_147_483_648.0) as f32)
            .collect(),
        (WAV_FORMAT_IEEE_FLOAT, 32) => bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
        (fmt, bits) => {
            return Err(EqError::InvalidFormat(format!(
                "Unsupported WAV format: code={}, bits={}",
                fmt, bits
            )))
        }
    };
    Ok(samples)
}

/// Reads a WAV file from disk.
pub fn read_wav_file(path: impl AsRef<Path>) -> Result<AudioBuffer, EqError> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| EqError::IoError(format!("{}: {}", path.display(), e)))?;
    read_wav(&data)
}

/// Clips to `[-1, 1]`, scales by `full_scale`, rounds half away from zero,
/// and saturates to `[-full_scale - 1, full_scale]`.
#[inline]
pub fn quantize(sample: Sample, full_scale: f32) -> i32 {
    let clamped = if sample.is_nan() {
        0.0
    } else {
        sample.clamp(-1.0, 1.0)
    };
    let scaled = (clamped as f64 * full_scale as f64).round();
    scaled.clamp(-(full_scale as f64) - 1.0, full_scale as f64) as i32
}

/// Builds the 44-byte canonical header for `data_size` bytes of samples.
fn wav_header(buffer: &AudioBuffer, format_code: u16, bits_per_sample: u16, data_size: u32) -> Vec<u8> {
    let num_channels = buffer.channels;
    let bytes_per_sample = bits_per_sample / 8;
    let byte_rate = buffer.sample_rate * num_channels as u32 * bytes_per_sample as u32;
    let block_align = num_channels * bytes_per_sample;
    let file_size = 36 + data_size;

    let mut out = Vec::with_capacity(file_size as usize + 8);

    // RIFF header
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&format_code.to_le_bytes());
    out.extend_from_slice(&num_channels.to_le_bytes());
    out.extend_from_slice(&buffer.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    out
}

/// Encodes an audio buffer as 16-bit PCM WAV bytes.
pub fn write_wav_16bit(buffer: &AudioBuffer) -> Vec<u8> {
    let mut out = wav_header(buffer, WAV_FORMAT_PCM, 16, (buffer.data.len() * 2) as u32);
    for &sample in &buffer.data {
        let raw = quantize(sample, PCM16_SCALE) as i16;
        out.extend_from_slice(&raw.to_le_bytes());
    }
    out
}

/// Encodes an audio buffer as 24-bit PCM WAV bytes.
pub fn write_wav_24bit(buffer: &AudioBuffer) -> Vec<u8> {
    let mut out = wav_header(buffer, WAV_FORMAT_PCM, 24, (buffer.data.len() * 3) as u32);
    for &sample in &buffer.data {
        let bytes = quantize(sample, PCM24_SCALE).to_le_bytes();
        out.extend_from_slice(&bytes[..3]);
    }
    out
}

/// Encodes an audio buffer as 32-bit float WAV bytes. Samples are written
/// unclipped.
pub fn write_wav_float(buffer: &AudioBuffer) -> Vec<u8> {
    let mut out = wav_header(
        buffer,
        WAV_FORMAT_IEEE_FLOAT,
        32,
        (buffer.data.len() * 4) as u32,
    );
    for &sample in &buffer.data {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    out
}

/// Storage sample format for written files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavFormat {
    #[default]
    Pcm16,
    Pcm24,
    Float32,
}

/// Encodes an audio buffer in the given storage format.
pub fn encode_wav(buffer: &AudioBuffer, format: WavFormat) -> Vec<u8> {
    match format {
        WavFormat::Pcm16 => write_wav_16bit(buffer),
        WavFormat::Pcm24 => write_wav_24bit(buffer),
        WavFormat::Float32 => write_wav_float(buffer),
    }
}

/// Writes a WAV file to disk in the given storage format.
pub fn write_wav_file(
    path: impl AsRef<Path>,
    buffer: &AudioBuffer,
    format: WavFormat,
) -> Result<(), EqError> {
    let path = path.as_ref();
    std::fs::write(path, encode_wav(buffer, format))
        .map_err(|e| EqError::IoError(format!("{}: {}", path.display(), e)))
}

#[inline]
fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

#[inline]
fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_rounding_and_saturation() {
        assert_eq!(quantize(0.0, PCM16_SCALE), 0);
        assert_eq!(quantize(1.0, PCM16_SCALE), 32767);
        assert_eq!(quantize(-1.0, PCM16_SCALE), -32767);
        assert_eq!(quantize(2.5, PCM16_SCALE), 32767);
        assert_eq!(quantize(-7.0, PCM16_SCALE), -32767);
        // 0.5 * 32767 = 16383.5 rounds away from zero
        assert_eq!(quantize(0.5, PCM16_SCALE), 16384);
        assert_eq!(quantize(-0.5, PCM16_SCALE), -16384);
        assert_eq!(quantize(f32::NAN, PCM16_SCALE), 0);
    }

    #[test]
    fn test_wav_roundtrip_16bit() {
        let original = AudioBuffer::from_mono(vec![0.0, 0.5, -0.5, 1.0, -1.0], 44100);
        let decoded = read_wav(&write_wav_16bit(&original)).unwrap();
        assert_eq!(decoded.sample_rate, 44100);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.data.len(), 5);
        for (i, (&d, &o)) in decoded.data.iter().zip(original.data.iter()).enumerate() {
            assert!((d - o).abs() < 0.001, "sample {}: {} vs {}", i, d, o);
        }
    }

    #[test]
    fn test_wav_roundtrip_24bit_negative_values() {
        let original = AudioBuffer::from_mono(vec![-0.75, -1.0e-6, 0.25], 48000);
        let decoded = read_wav(&write_wav_24bit(&original)).unwrap();
        for (&d, &o) in decoded.data.iter().zip(original.data.iter()) {
            assert!((d - o).abs() < 1e-6, "{} vs {}", d, o);
        }
    }

    #[test]
    fn test_wav_float_multichannel() {
        let original = AudioBuffer::new(vec![0.1, -0.2, 0.3, -0.4, 0.5, -0.6], 3, 48000).unwrap();
        let decoded = read_wav(&write_wav_float(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_wav_invalid_data() {
        assert!(read_wav(&[]).is_err());
        assert!(read_wav(b"NOT_RIFF_HEADER_AT_ALL______________________").is_err());
    }

    #[test]
    fn test_wav_8bit_pcm() {
        let buffer = AudioBuffer::from_mono(vec![0.0; 4], 8000);
        let mut wav = write_wav_16bit(&buffer);
        // Rewrite as 8-bit: bits field, then data bytes 0, 128, 255, 64
        wav[34..36].copy_from_slice(&8u16.to_le_bytes());
        wav.truncate(44);
        wav[40..44].copy_from_slice(&4u32.to_le_bytes());
        wav.extend_from_slice(&[0, 128, 255, 64]);
        let decoded = read_wav(&wav).unwrap();
        assert_eq!(decoded.data, vec![-1.0, 0.0, 127.0 / 128.0, -0.5]);
    }
}
