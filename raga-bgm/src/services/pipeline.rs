//! End-to-end run: load → extract → prompt → suggest → synthesize → export
//!
//! Strictly sequential, one pass. The suggestion step runs before note
//! synthesis, so a failed remote call aborts the run before any artifact
//! is written. The suggestion text itself never reaches the synthesizer.
//! CPU-heavy stages run on the blocking pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{BgmError, BgmResult};
use crate::models::{Artifacts, AudioFeatures, CompositionRequest, NoteEvent, PipelineReport};
use crate::services::audio_renderer::{render_notes, write_wav};
use crate::services::feature_extractor::{FeatureExtractor, ANALYSIS_SAMPLE_RATE};
use crate::services::gemini_client::SuggestionSource;
use crate::services::midi_exporter::write_midi;
use crate::services::note_synthesizer::synthesize_notes;
use crate::services::pitch_plot::write_pitch_plot;
use crate::services::prompt_builder::build_prompt;
use crate::utils::load_waveform;

/// Pipeline with its suggestion source
#[derive(Clone)]
pub struct Pipeline {
    extractor: FeatureExtractor,
    source: Arc<dyn SuggestionSource>,
    sample_rate: u32,
}

impl Pipeline {
    pub fn new(source: Arc<dyn SuggestionSource>) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            source,
            sample_rate: ANALYSIS_SAMPLE_RATE,
        }
    }

    /// Run every stage for one input file
    pub async fn run(
        &self,
        input: &Path,
        request: &CompositionRequest,
        artifacts: &Artifacts,
    ) -> BgmResult<PipelineReport> {
        tracing::info!(
            input = %input.display(),
            raga = %request.raga,
            mood = %request.mood,
            "Starting BGM pipeline"
        );

        let features = {
            let input: PathBuf = input.to_path_buf();
            let extractor = self.extractor;
            let sample_rate = self.sample_rate;
            run_blocking(move || analyze(&extractor, &input, sample_rate)).await?
        };

        let prompt = build_prompt(&features, request);
        let suggestion = self.source.suggest(&prompt).await?;

        let notes = {
            let pitches = features.pitches.clone();
            let artifacts = artifacts.clone();
            let sample_rate = self.sample_rate;
            run_blocking(move || export(&pitches, sample_rate, &artifacts)).await?
        };

        tracing::info!(
            notes = notes.len(),
            midi = %artifacts.midi_path.display(),
            wav = %artifacts.wav_path.display(),
            "BGM pipeline complete"
        );

        Ok(PipelineReport {
            request: request.clone(),
            features,
            prompt,
            suggestion,
            notes,
            artifacts: artifacts.clone(),
            sample_rate: self.sample_rate,
        })
    }
}

/// Load and analyse one file
pub fn analyze(
    extractor: &FeatureExtractor,
    input: &Path,
    sample_rate: u32,
) -> BgmResult<AudioFeatures> {
    let waveform = load_waveform(input, sample_rate)?;
    Ok(extractor.extract(&waveform))
}

/// Synthesize notes from the trace and write every artifact
///
/// Files are overwritten in place; a failure part way leaves whatever was
/// already written.
pub fn export(pitches: &[f32], sample_rate: u32, artifacts: &Artifacts) -> BgmResult<Vec<NoteEvent>> {
    let notes = synthesize_notes(pitches);

    write_midi(&notes, &artifacts.midi_path)?;

    let audio = render_notes(&notes, sample_rate);
    write_wav(&audio, sample_rate, &artifacts.wav_path)?;

    if let Some(plot_path) = &artifacts.plot_path {
        write_pitch_plot(pitches, plot_path)?;
    }

    Ok(notes)
}

async fn run_blocking<T, F>(f: F) -> BgmResult<T>
where
    F: FnOnce() -> BgmResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BgmError::Common(raga_common::Error::Internal(format!("Worker task failed: {}", e))))?
}
