//! Global tempo estimation
//!
//! 1. Onset strength: per frame, the mean over bins of the positive part of
//!    the log-power increase since the previous frame.
//! 2. Autocorrelation of the onset envelope up to an 8 second lag.
//! 3. Each candidate lag is scored `ln(1 + 1e6 * ac) + log_prior(bpm)`,
//!    where the prior is log-normal around 120 BPM with a one-octave
//!    standard deviation. The best lag inside the BPM range wins.

use super::spectrum::Spectrogram;

/// Floor applied to power before taking the log
const POWER_FLOOR: f32 = 1e-10;

/// Dynamic range kept below the loudest bin (dB)
const TOP_DB: f32 = 80.0;

/// Tempo estimator parameters
#[derive(Debug, Clone, Copy)]
pub struct TempoEstimator {
    /// Center of the tempo prior (BPM)
    pub start_bpm: f64,
    /// Prior standard deviation in octaves
    pub std_octaves: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
    /// Longest lag examined, seconds
    pub max_lag_seconds: f64,
}

impl Default for TempoEstimator {
    fn default() -> Self {
        Self {
            start_bpm: 120.0,
            std_octaves: 1.0,
            min_bpm: 30.0,
            max_bpm: 300.0,
            max_lag_seconds: 8.0,
        }
    }
}

impl TempoEstimator {
    /// Estimated tempo in BPM; 0.0 when the recording has no onsets
    pub fn estimate(&self, spec: &Spectrogram) -> f64 {
        let envelope = onset_strength(spec);
        self.estimate_from_envelope(&envelope, spec.sample_rate, spec.hop_length)
    }

    pub fn estimate_from_envelope(&self, envelope: &[f32], sample_rate: u32, hop_length: usize) -> f64 {
        let peak = envelope.iter().copied().fold(0.0f32, f32::max);
        if envelope.len() < 2 || peak <= 0.0 {
            tracing::debug!("Onset envelope is silent, tempo 0");
            return 0.0;
        }

        let frame_rate = sample_rate as f64 / hop_length as f64;
        let max_lag = ((self.max_lag_seconds * frame_rate).round() as usize).min(envelope.len() - 1);
        let ac = autocorrelation(envelope, max_lag);
        let ac0 = ac[0];
        if ac0 <= 0.0 {
            return 0.0;
        }

        let mut best: Option<(f64, f64)> = None;
        for (lag, &value) in ac.iter().enumerate().skip(1) {
            let bpm = 60.0 * frame_rate / lag as f64;
            if bpm < self.min_bpm || bpm > self.max_bpm {
                continue;
            }
            let score = (1e6 * (value / ac0)).max(0.0).ln_1p() + self.log_prior(bpm);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((bpm, score));
            }
        }

        let tempo = best.map(|(bpm, _)| bpm).unwrap_or(0.0);
        tracing::debug!(tempo_bpm = tempo, lags = max_lag, "Tempo estimated");
        tempo
    }

    fn log_prior(&self, bpm: f64) -> f64 {
        let z = (bpm.log2() - self.start_bpm.log2()) / self.std_octaves;
        -0.5 * z * z
    }
}

/// Onset strength envelope, one value per spectrogram frame
pub fn onset_strength(spec: &Spectrogram) -> Vec<f32> {
    if spec.frames.is_empty() {
        return Vec::new();
    }

    let mut log_power: Vec<Vec<f32>> = spec
        .frames
        .iter()
        .map(|frame| {
            frame
                .iter()
                .map(|&m| 10.0 * (m * m).max(POWER_FLOOR).log10())
                .collect()
        })
        .collect();

    let loudest = log_power
        .iter()
        .flat_map(|f| f.iter().copied())
        .fold(f32::NEG_INFINITY, f32::max);
    let floor = loudest - TOP_DB;
    for frame in &mut log_power {
        for v in frame.iter_mut() {
            *v = v.max(floor);
        }
    }

    let mut envelope = Vec::with_capacity(log_power.len());
    envelope.push(0.0);
    for pair in log_power.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let rise: f32 = cur
            .iter()
            .zip(prev)
            .map(|(&c, &p)| (c - p).max(0.0))
            .sum();
        envelope.push(rise / cur.len() as f32);
    }
    envelope
}

/// Raw autocorrelation for lags `0..=max_lag`
fn autocorrelation(signal: &[f32], max_lag: usize) -> Vec<f64> {
    (0..=max_lag)
        .map(|lag| {
            signal
                .iter()
                .zip(&signal[lag..])
                .map(|(&a, &b)| a as f64 * b as f64)
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::spectrum::HOP_LENGTH;

    /// Short 1 kHz bursts every `period` samples
    fn click_track(sr: u32, seconds: f32, period: usize) -> Vec<f32> {
        let n = (sr as f32 * seconds) as usize;
        let burst = 256;
        (0..n)
            .map(|i| {
                if i % period < burst {
                    (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / sr as f32).sin()
                } else {
                    0.0
                }
            })
            .collect()
    }

    #[test]
    fn test_click_track_tempo() {
        let sr = 22050;
        // 21 hops per beat: 60 * 22050 / (512 * 21) ≈ 123.05 BPM
        let period = 21 * HOP_LENGTH;
        let spec = Spectrogram::compute(&click_track(sr, 12.0, period), sr);

        let tempo = TempoEstimator::default().estimate(&spec);
        let expected = 60.0 * sr as f64 / (HOP_LENGTH as f64 * 21.0);
        assert!((tempo - expected).abs() < 1.0, "tempo {}", tempo);
    }

    #[test]
    fn test_silence_tempo_is_zero() {
        let sr = 22050;
        let spec = Spectrogram::compute(&vec![0.0; sr as usize * 2], sr);
        assert_eq!(TempoEstimator::default().estimate(&spec), 0.0);
    }

    #[test]
    fn test_empty_envelope_tempo_is_zero() {
        assert_eq!(TempoEstimator::default().estimate_from_envelope(&[], 22050, 512), 0.0);
    }

    #[test]
    fn test_onset_strength_length_matches_frames() {
        let sr = 22050;
        let spec = Spectrogram::compute(&click_track(sr, 2.0, 11025), sr);
        let env = onset_strength(&spec);
        assert_eq!(env.len(), spec.num_frames());
        assert!(env.iter().all(|&v| v >= 0.0));
        assert_eq!(env[0], 0.0);
    }

    #[test]
    fn test_prior_peaks_at_start_bpm() {
        let est = TempoEstimator::default();
        assert_eq!(est.log_prior(120.0), 0.0);
        assert!(est.log_prior(60.0) < est.log_prior(110.0));
    }
}
