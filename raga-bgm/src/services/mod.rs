//! Pipeline stages
//!
//! Each stage is a small module; [`pipeline`] sequences them.

pub mod audio_renderer;
pub mod feature_extractor;
pub mod gemini_client;
pub mod midi_exporter;
pub mod note_synthesizer;
pub mod pipeline;
pub mod pitch_plot;
pub mod pitch_tracker;
pub mod prompt_builder;
pub mod spectrum;
pub mod tempo_estimator;

pub use feature_extractor::{FeatureExtractor, ANALYSIS_SAMPLE_RATE};
pub use gemini_client::{GeminiClient, GeminiConfig, GeminiError, SuggestionSource};
pub use pipeline::Pipeline;
