//! Extracted pitch and tempo statistics

use serde::Serialize;

/// Coarse statistics of the analysed recording
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioFeatures {
    /// Tempo estimate in BPM (0.0 when no onsets were found)
    pub tempo_bpm: f64,
    /// Dominant pitch per voiced frame, Hz, all > 0
    ///
    /// Unvoiced frames are dropped, so the length is not the frame count.
    pub pitches: Vec<f32>,
    /// Arithmetic mean of `pitches`, 0.0 when empty
    pub average_pitch_hz: f64,
}

impl AudioFeatures {
    /// Build features from a tempo and a pitch trace, deriving the average
    pub fn new(tempo_bpm: f64, pitches: Vec<f32>) -> Self {
        let average_pitch_hz = average_pitch(&pitches);
        Self {
            tempo_bpm,
            pitches,
            average_pitch_hz,
        }
    }
}

/// Arithmetic mean of the pitch trace, or 0.0 for an empty trace
pub fn average_pitch(pitches: &[f32]) -> f64 {
    if pitches.is_empty() {
        return 0.0;
    }
    let sum: f64 = pitches.iter().map(|&p| p as f64).sum();
    sum / pitches.len() as f64
}
