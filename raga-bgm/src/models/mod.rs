//! Data model for one pipeline run

pub mod composition;
pub mod features;
pub mod note;
pub mod report;
pub mod waveform;

pub use composition::{CompositionRequest, Mood, DEFAULT_RAGA};
pub use features::AudioFeatures;
pub use note::NoteEvent;
pub use report::{Artifacts, PipelineReport};
pub use waveform::Waveform;
