//! Pitch and tempo statistics of a waveform
//!
//! Given a waveform, produce `(tempo, pitch trace, average pitch)`. Unvoiced
//! frames are dropped rather than kept as rests, so the trace length is
//! generally shorter than the frame count. There is no error path here;
//! unreadable audio already failed in the loader.

use super::pitch_tracker::PitchTracker;
use super::spectrum::Spectrogram;
use super::tempo_estimator::TempoEstimator;
use crate::models::{AudioFeatures, Waveform};

/// Sample rate every recording is analysed at
pub const ANALYSIS_SAMPLE_RATE: u32 = 22050;

/// Combines the pitch tracker and the tempo estimator over one spectrogram
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    pub pitch: PitchTracker,
    pub tempo: TempoEstimator,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&self, waveform: &Waveform) -> AudioFeatures {
        if waveform.is_empty() {
            tracing::warn!("Waveform has no samples, reporting zero tempo and pitch");
            return AudioFeatures::new(0.0, Vec::new());
        }

        let spec = Spectrogram::compute(&waveform.samples, waveform.sample_rate);

        let tempo_bpm = self.tempo.estimate(&spec);
        let pitches = self.pitch.track(&spec);
        let features = AudioFeatures::new(tempo_bpm, pitches);

        tracing::info!(
            duration_seconds = format!("{:.2}", waveform.duration_seconds()),
            frames = spec.num_frames(),
            voiced_frames = features.pitches.len(),
            tempo_bpm = format!("{:.2}", features.tempo_bpm),
            average_pitch_hz = format!("{:.2}", features.average_pitch_hz),
            "Extracted audio features"
        );

        features
    }
}
