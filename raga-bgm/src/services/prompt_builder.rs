//! Natural-language request for the text-generation service

use crate::models::{AudioFeatures, CompositionRequest};

/// Format the extracted statistics and the user's choices into a prompt
pub fn build_prompt(features: &AudioFeatures, request: &CompositionRequest) -> String {
    format!(
        "\nI am analyzing an Indian classical music piece with an average pitch of {:.2} Hz and a tempo of {:.2} BPM.\n\
         The user wants to generate a new background music (BGM) based on the raga {} with a {} mood.\n\
         Suggest a melody structure, note sequences, and rhythmic pattern for a new composition.\n",
        features.average_pitch_hz, features.tempo_bpm, request.raga, request.mood
    )
}
