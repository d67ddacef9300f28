//! What a pipeline run produced

use super::{AudioFeatures, CompositionRequest, NoteEvent};
use serde::Serialize;
use std::path::PathBuf;

/// Output file locations of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifacts {
    pub midi_path: PathBuf,
    pub wav_path: PathBuf,
    /// Pitch contour plot, when one was requested
    pub plot_path: Option<PathBuf>,
}

impl Artifacts {
    /// Fixed artifact filenames inside `dir`
    pub fn in_dir(dir: &std::path::Path, with_plot: bool) -> Self {
        Self {
            midi_path: dir.join(crate::DEFAULT_MIDI_FILE),
            wav_path: dir.join(crate::DEFAULT_WAV_FILE),
            plot_path: with_plot.then(|| dir.join(crate::DEFAULT_PLOT_FILE)),
        }
    }
}

/// Everything a front end needs to present one run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub request: CompositionRequest,
    pub features: AudioFeatures,
    pub prompt: String,
    /// Opaque AI text, display only
    pub suggestion: String,
    pub notes: Vec<NoteEvent>,
    pub artifacts: Artifacts,
    /// Sample rate the analysis and rendering ran at
    pub sample_rate: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_artifacts_in_dir() {
        let artifacts = Artifacts::in_dir(Path::new("/tmp/run"), true);
        assert_eq!(artifacts.midi_path, Path::new("/tmp/run/generated_bgm.mid"));
        assert_eq!(artifacts.wav_path, Path::new("/tmp/run/generated_bgm.wav"));
        assert_eq!(
            artifacts.plot_path.as_deref(),
            Some(Path::new("/tmp/run/pitch_contour.svg"))
        );
    }

    #[test]
    fn test_artifacts_without_plot() {
        let artifacts = Artifacts::in_dir(Path::new("out"), false);
        assert!(artifacts.plot_path.is_none());
    }
}
