//! End-to-end pipeline tests against a local Gemini stub

mod helpers;

use std::sync::Arc;

use helpers::audio_generator::{generate_test_wav, AudioConfig};
use helpers::stub_gemini;
use midly::{MidiMessage, Smf, TrackEventKind};
use raga_bgm::models::{Artifacts, CompositionRequest};
use raga_bgm::services::{GeminiClient, Pipeline};
use raga_bgm::BgmError;

async fn pipeline_with_stub(ok: bool) -> Pipeline {
    let base_url = if ok {
        stub_gemini::spawn_ok().await
    } else {
        stub_gemini::spawn_failing().await
    };
    let client = GeminiClient::new(stub_gemini::config_for(&base_url)).unwrap();
    Pipeline::new(Arc::new(client))
}

fn count_note_ons(bytes: &[u8]) -> usize {
    let smf = Smf::parse(bytes).unwrap();
    smf.tracks
        .iter()
        .flatten()
        .filter(|e| {
            matches!(
                e.kind,
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { .. },
                    ..
                }
            )
        })
        .count()
}

#[tokio::test]
async fn test_tone_produces_one_note_per_pitch() {
    let dir = tempfile::tempdir().unwrap();
    let input = generate_test_wav(&dir.path().join("tone.wav"), &AudioConfig::tone(440.0, 1.0)).unwrap();
    let artifacts = Artifacts::in_dir(dir.path(), true);
    let pipeline = pipeline_with_stub(true).await;

    let report = pipeline
        .run(&input, &CompositionRequest::new("Yaman", "Peaceful"), &artifacts)
        .await
        .unwrap();

    assert_eq!(report.suggestion, stub_gemini::STUB_SUGGESTION);
    assert!(report.prompt.contains("based on the raga Yaman with a Peaceful mood"));
    assert!(!report.features.pitches.is_empty());
    assert_eq!(report.notes.len(), report.features.pitches.len());

    let mut sorted = report.features.pitches.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let median = sorted[sorted.len() / 2];
    assert!((median - 440.0).abs() < 5.0, "median pitch {}", median);

    for (note, &hz) in report.notes.iter().zip(&report.features.pitches) {
        assert_eq!(note.pitch as u32, (hz.floor() as u32) % 128);
        assert_eq!(note.velocity, 100);
    }
    for pair in report.notes.windows(2) {
        assert!((pair[0].end - pair[1].start).abs() < 1e-9);
    }

    let midi = std::fs::read(&artifacts.midi_path).unwrap();
    assert_eq!(count_note_ons(&midi), report.notes.len());

    let wav = hound::WavReader::open(&artifacts.wav_path).unwrap();
    assert_eq!(wav.spec().sample_rate, 22050);
    assert!(wav.len() > 0);
    assert!(artifacts.plot_path.unwrap().exists());
}

#[tokio::test]
async fn test_silence_exports_empty_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = generate_test_wav(&dir.path().join("silence.wav"), &AudioConfig::silence(1.0)).unwrap();
    let artifacts = Artifacts::in_dir(dir.path(), false);
    let pipeline = pipeline_with_stub(true).await;

    let report = pipeline
        .run(&input, &CompositionRequest::new("Bhairav", "Sad"), &artifacts)
        .await
        .unwrap();

    assert!(report.features.pitches.is_empty());
    assert_eq!(report.features.average_pitch_hz, 0.0);
    assert_eq!(report.features.tempo_bpm, 0.0);
    assert!(report.notes.is_empty());
    assert!(report.prompt.contains("average pitch of 0.00 Hz"));

    let midi = std::fs::read(&artifacts.midi_path).unwrap();
    assert_eq!(count_note_ons(&midi), 0);
    let wav = hound::WavReader::open(&artifacts.wav_path).unwrap();
    assert_eq!(wav.len(), 0);
}

#[tokio::test]
async fn test_stereo_input_is_mixed_down() {
    let dir = tempfile::tempdir().unwrap();
    let config = AudioConfig {
        channels: 2,
        sample_rate: 44100,
        ..AudioConfig::tone(330.0, 1.0)
    };
    let input = generate_test_wav(&dir.path().join("stereo.wav"), &config).unwrap();
    let artifacts = Artifacts::in_dir(dir.path(), false);
    let pipeline = pipeline_with_stub(true).await;

    let report = pipeline
        .run(&input, &CompositionRequest::new("Yaman", "Joyful"), &artifacts)
        .await
        .unwrap();

    assert_eq!(report.sample_rate, 22050);
    assert!(!report.notes.is_empty());
}

#[tokio::test]
async fn test_upstream_failure_writes_no_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = generate_test_wav(&dir.path().join("tone.wav"), &AudioConfig::tone(440.0, 0.5)).unwrap();
    let out = dir.path().join("out");
    std::fs::create_dir(&out).unwrap();
    let artifacts = Artifacts::in_dir(&out, true);
    let pipeline = pipeline_with_stub(false).await;

    let err = pipeline
        .run(&input, &CompositionRequest::new("Yaman", "Peaceful"), &artifacts)
        .await
        .unwrap_err();

    assert!(matches!(err, BgmError::Suggestion(_)));
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
}

#[tokio::test]
async fn test_corrupt_input_is_audio_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.wav");
    std::fs::write(&input, b"definitely not audio").unwrap();
    let artifacts = Artifacts::in_dir(dir.path(), false);
    let pipeline = pipeline_with_stub(true).await;

    let err = pipeline
        .run(&input, &CompositionRequest::new("Yaman", "Peaceful"), &artifacts)
        .await
        .unwrap_err();

    assert!(matches!(err, BgmError::AudioLoad(_)));
    assert!(!artifacts.midi_path.exists());
}
