//! Per-frame pitch tracking by spectral peak picking
//!
//! For each STFT frame, bins inside `[fmin, fmax)` that are local maxima
//! and exceed `threshold * frame_max` are candidate pitches. Each candidate
//! is refined by parabolic interpolation over its neighbours. The frame's
//! value is the highest refined candidate frequency; frames without a
//! candidate are dropped from the trace.

use super::spectrum::Spectrogram;

/// Pitch tracker parameters
#[derive(Debug, Clone, Copy)]
pub struct PitchTracker {
    /// Lowest frequency considered (Hz, inclusive)
    pub fmin: f32,
    /// Highest frequency considered (Hz, exclusive)
    pub fmax: f32,
    /// Fraction of the frame's peak magnitude a bin must exceed
    pub threshold: f32,
}

impl Default for PitchTracker {
    fn default() -> Self {
        Self {
            fmin: 150.0,
            fmax: 4000.0,
            threshold: 0.1,
        }
    }
}

impl PitchTracker {
    /// Pitch trace over all frames, keeping only values > 0
    pub fn track(&self, spec: &Spectrogram) -> Vec<f32> {
        spec.frames
            .iter()
            .map(|frame| self.frame_pitch(frame, spec))
            .filter(|&p| p > 0.0)
            .collect()
    }

    /// Highest interpolated peak frequency in one frame, 0.0 if none
    pub fn frame_pitch(&self, frame: &[f32], spec: &Spectrogram) -> f32 {
        let num_bins = frame.len();
        if num_bins < 3 {
            return 0.0;
        }

        let frame_max = frame.iter().copied().fold(0.0f32, f32::max);
        let ref_value = self.threshold * frame_max;

        // Bins at or below the reference are zeroed before peak picking
        let gated = |k: usize| -> f32 {
            let m = frame[k];
            if m > ref_value {
                m
            } else {
                0.0
            }
        };

        let mut best = 0.0f32;
        for k in 1..num_bins - 1 {
            let freq = spec.bin_frequency(k);
            if freq < self.fmin || freq >= self.fmax {
                continue;
            }

            let here = gated(k);
            if here <= 0.0 || here <= gated(k - 1) || here < gated(k + 1) {
                continue;
            }

            let shift = parabolic_shift(frame[k - 1], frame[k], frame[k + 1]);
            let pitch = (k as f32 + shift) * spec.sample_rate as f32 / spec.n_fft as f32;
            if pitch > best {
                best = pitch;
            }
        }

        best
    }
}

/// Offset (in bins) of the vertex of the parabola through three points
fn parabolic_shift(left: f32, center: f32, right: f32) -> f32 {
    let avg = 0.5 * (right - left);
    let curvature = 2.0 * center - right - left;
    if curvature.abs() < f32::MIN_POSITIVE {
        return 0.0;
    }
    avg / curvature
}
