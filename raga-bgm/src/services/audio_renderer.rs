//! Render the note sequence to audio and write it as WAV
//!
//! Each note is a plain sine at its equal-tempered frequency, scaled by
//! velocity / 127 and summed into one buffer that spans the last note's end.
//! The mix is then peak-normalized to 1.0.

use crate::error::{BgmError, BgmResult};
use crate::models::NoteEvent;
use std::f64::consts::PI;
use std::path::Path;

/// Synthesize `notes` at `sample_rate`
///
/// Zero notes produce zero samples.
pub fn render_notes(notes: &[NoteEvent], sample_rate: u32) -> Vec<f32> {
    let end_time = notes.iter().map(|n| n.end).fold(0.0f64, f64::max);
    let total = (end_time * sample_rate as f64).ceil() as usize;
    let mut buffer = vec![0.0f64; total];

    for note in notes {
        let start = (note.start * sample_rate as f64).round() as usize;
        let end = ((note.end * sample_rate as f64).round() as usize).min(total);
        let freq = note.frequency_hz();
        let gain = note.velocity as f64 / 127.0;

        for (offset, sample) in buffer[start.min(end)..end].iter_mut().enumerate() {
            let t = offset as f64 / sample_rate as f64;
            *sample += gain * (2.0 * PI * freq * t).sin();
        }
    }

    let peak = buffer.iter().fold(0.0f64, |acc, &s| acc.max(s.abs()));
    if peak > 0.0 {
        for sample in &mut buffer {
            *sample /= peak;
        }
    }

    buffer.into_iter().map(|s| s as f32).collect()
}

/// Write mono samples as 16-bit PCM WAV, replacing any existing file
pub fn write_wav(samples: &[f32], sample_rate: u32, path: &Path) -> BgmResult<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let render_err = |e: hound::Error| BgmError::Render(format!("{}: {}", path.display(), e));

    let mut writer = hound::WavWriter::create(path, spec).map_err(render_err)?;
    for &s in samples {
        let value = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value).map_err(render_err)?;
    }
    writer.finalize().map_err(render_err)?;

    tracing::info!(
        path = %path.display(),
        samples = samples.len(),
        sample_rate = sample_rate,
        "WAV written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::note_synthesizer::synthesize_notes;

    #[test]
    fn test_empty_render() {
        assert!(render_notes(&[], 22050).is_empty());
    }

    #[test]
    fn test_render_length_and_peak() {
        let sr = 22050;
        let notes = synthesize_notes(&[220.0, 440.0, 880.0]);
        let audio = render_notes(&notes, sr);

        assert_eq!(audio.len(), (3.0 * sr as f64).ceil() as usize);
        let peak = audio.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_write_empty_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silent.wav");

        write_wav(&[], 22050, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 22050);
        assert_eq!(reader.len(), 0);
    }

    #[test]
    fn test_write_wav_round_trip_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples = render_notes(&synthesize_notes(&[300.0]), 8000);

        write_wav(&samples, 8000, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len() as usize, samples.len());
    }

    #[test]
    fn test_write_wav_bad_path_is_render_error() {
        let err = write_wav(&[0.0], 8000, Path::new("/nonexistent/dir/out.wav")).unwrap_err();
        assert!(matches!(err, BgmError::Render(_)));
    }
}
