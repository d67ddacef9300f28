//! Audio test fixture generator
//!
//! Writes small WAV files with hound for the pipeline and HTTP tests.

use std::path::{Path, PathBuf};

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Tone frequency; `None` writes silence
    pub frequency_hz: Option<f32>,
    pub amplitude: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 2.0,
            sample_rate: 22050,
            channels: 1,
            frequency_hz: Some(440.0),
            amplitude: 0.5,
        }
    }
}

impl AudioConfig {
    pub fn silence(duration_seconds: f64) -> Self {
        Self {
            duration_seconds,
            frequency_hz: None,
            ..Default::default()
        }
    }

    pub fn tone(frequency_hz: f32, duration_seconds: f64) -> Self {
        Self {
            duration_seconds,
            frequency_hz: Some(frequency_hz),
            ..Default::default()
        }
    }
}

/// Generate a 16-bit PCM WAV file
pub fn generate_test_wav(path: &Path, config: &AudioConfig) -> anyhow::Result<PathBuf> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    let total_samples = (config.duration_seconds * config.sample_rate as f64) as usize;

    for i in 0..total_samples {
        let sample = match config.frequency_hz {
            Some(freq) => {
                let t = i as f32 / config.sample_rate as f32;
                (config.amplitude * (2.0 * std::f32::consts::PI * freq * t).sin() * i16::MAX as f32)
                    as i16
            }
            None => 0,
        };

        for _ in 0..config.channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(path.to_path_buf())
}

/// Raw bytes of a generated WAV, for multipart uploads
pub fn test_wav_bytes(config: &AudioConfig) -> anyhow::Result<Vec<u8>> {
    let dir = tempfile::tempdir()?;
    let path = generate_test_wav(&dir.path().join("fixture.wav"), config)?;
    Ok(std::fs::read(path)?)
}
