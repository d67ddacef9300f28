//! Audio decoding
//!
//! Decodes an audio file to mono f32 PCM with symphonia. WAV is the
//! expected input, but anything symphonia can probe is accepted.

use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

use crate::error::{BgmError, BgmResult};

/// Decoded audio result
#[derive(Debug)]
pub struct DecodedAudio {
    /// Mono audio samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Source channel count
    pub channels: usize,
}

impl DecodedAudio {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode an audio file to mono f32 PCM samples
///
/// Probes the container, picks the first track with a real codec, decodes
/// every packet of that track and averages channels down to mono.
///
/// # Errors
/// `BgmError::AudioLoad` for a missing file, an unsupported or corrupt
/// container, or a packet that fails to decode.
pub fn decode_audio_file(file_path: &Path) -> BgmResult<DecodedAudio> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let load_err = |what: &str, e: &dyn std::fmt::Display| {
        BgmError::AudioLoad(format!("{} {}: {}", what, file_path.display(), e))
    };

    let file = std::fs::File::open(file_path)
        .map_err(|e| load_err("Failed to open audio file", &e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| load_err("Failed to probe audio file", &e))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| load_err("No audio track found in", &"no decodable track"))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| load_err("Sample rate unknown for", &"missing codec parameter"))?;
    let channel_count = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(1);

    tracing::debug!(
        path = %file_path.display(),
        sample_rate = sample_rate,
        channels = channel_count,
        "Audio file info"
    );

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| load_err("Failed to create decoder for", &e))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(load_err("Error reading packet from", &e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| load_err("Failed to decode packet in", &e))?;

        all_samples.extend(convert_to_mono_f32(&decoded));
    }

    tracing::debug!(
        path = %file_path.display(),
        total_samples = all_samples.len(),
        "Audio decoding complete"
    );

    Ok(DecodedAudio {
        samples: all_samples,
        sample_rate,
        channels: channel_count,
    })
}

/// Convert a decoded buffer of any sample format to mono f32
fn convert_to_mono_f32(decoded: &AudioBufferRef) -> Vec<f32> {
    match decoded {
        AudioBufferRef::U8(buf) => mix_down(buf),
        AudioBufferRef::U16(buf) => mix_down(buf),
        AudioBufferRef::U24(buf) => mix_down(buf),
        AudioBufferRef::U32(buf) => mix_down(buf),
        AudioBufferRef::S8(buf) => mix_down(buf),
        AudioBufferRef::S16(buf) => mix_down(buf),
        AudioBufferRef::S24(buf) => mix_down(buf),
        AudioBufferRef::S32(buf) => mix_down(buf),
        AudioBufferRef::F32(buf) => mix_down(buf),
        AudioBufferRef::F64(buf) => mix_down(buf),
    }
}

/// Average all channels of a planar buffer into one f32 channel
fn mix_down<S>(buf: &AudioBuffer<S>) -> Vec<f32>
where
    S: Sample,
    f32: FromSample<S>,
{
    let num_channels = buf.spec().channels.count();
    let num_frames = buf.frames();
    let mut mono = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        let mut sum = 0.0f32;
        for ch in 0..num_channels {
            sum += f32::from_sample(buf.chan(ch)[frame_idx]);
        }
        mono.push(sum / num_channels as f32);
    }

    mono
}
