//! Audio loading helpers

pub mod audio_decoder;
pub mod resampler;

pub use audio_decoder::{decode_audio_file, DecodedAudio};
pub use resampler::resample;

use crate::error::BgmResult;
use crate::models::Waveform;
use std::path::Path;

/// Decode `path` and bring it to `target_rate`, mono
pub fn load_waveform(path: &Path, target_rate: u32) -> BgmResult<Waveform> {
    let decoded = decode_audio_file(path)?;
    tracing::info!(
        path = %path.display(),
        source_rate = decoded.sample_rate,
        channels = decoded.channels,
        duration_seconds = format!("{:.2}", decoded.duration_seconds()),
        "Loaded audio"
    );

    let samples = resample(&decoded.samples, decoded.sample_rate, target_rate)?;
    Ok(Waveform::new(samples, target_rate))
}
