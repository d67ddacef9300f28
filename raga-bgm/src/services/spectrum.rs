//! Short-time Fourier transform
//!
//! Magnitude spectrogram shared by the pitch tracker and the tempo
//! estimator. Frames are centered: the signal is zero-padded by half a
//! window on both sides, so frame `t` is centered on sample `t * hop`.

use rustfft::{num_complex::Complex, FftPlanner};

/// FFT window length in samples
pub const N_FFT: usize = 2048;

/// Hop between successive frames in samples
pub const HOP_LENGTH: usize = 512;

/// Magnitude spectrogram, frame-major
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// `frames[t][k]` is |X(t, k)| for bins `k` in `0..=n_fft/2`
    pub frames: Vec<Vec<f32>>,
    pub n_fft: usize,
    pub hop_length: usize,
    pub sample_rate: u32,
}

impl Spectrogram {
    /// Compute the spectrogram with the default window and hop
    pub fn compute(samples: &[f32], sample_rate: u32) -> Self {
        Self::with_params(samples, sample_rate, N_FFT, HOP_LENGTH)
    }

    pub fn with_params(samples: &[f32], sample_rate: u32, n_fft: usize, hop_length: usize) -> Self {
        Self {
            frames: stft_magnitude(samples, n_fft, hop_length),
            n_fft,
            hop_length,
            sample_rate,
        }
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Center frequency of bin `k` in Hz
    pub fn bin_frequency(&self, k: usize) -> f32 {
        k as f32 * self.sample_rate as f32 / self.n_fft as f32
    }
}

/// Periodic Hann window
pub fn hann_window(len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * n as f32 / len as f32).cos())
        .collect()
}

/// Centered magnitude STFT
///
/// Empty input yields no frames.
pub fn stft_magnitude(samples: &[f32], n_fft: usize, hop_length: usize) -> Vec<Vec<f32>> {
    if samples.is_empty() || n_fft == 0 || hop_length == 0 {
        return Vec::new();
    }

    let pad = n_fft / 2;
    let mut padded = vec![0.0f32; samples.len() + 2 * pad];
    padded[pad..pad + samples.len()].copy_from_slice(samples);

    let num_frames = 1 + (padded.len() - n_fft) / hop_length;
    let window = hann_window(n_fft);
    let num_bins = n_fft / 2 + 1;

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);
    let mut buffer = vec![Complex::new(0.0f32, 0.0f32); n_fft];

    let mut frames = Vec::with_capacity(num_frames);
    for t in 0..num_frames {
        let start = t * hop_length;
        let segment = &padded[start..start + n_fft];
        for ((slot, &x), &w) in buffer.iter_mut().zip(segment).zip(&window) {
            *slot = Complex::new(x * w, 0.0);
        }
        fft.process(&mut buffer);
        frames.push(buffer[..num_bins].iter().map(|c| c.norm()).collect());
    }

    frames
}
