//! User-supplied composition parameters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raga default offered by both front ends
pub const DEFAULT_RAGA: &str = "Yaman";

/// What the user asked for: a raga label and a mood
///
/// Both are free text as far as the pipeline is concerned; they only
/// end up inside the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionRequest {
    pub raga: String,
    pub mood: String,
}

impl CompositionRequest {
    pub fn new(raga: impl Into<String>, mood: impl Into<String>) -> Self {
        Self {
            raga: raga.into(),
            mood: mood.into(),
        }
    }
}

/// Moods offered by the web form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Peaceful,
    Energetic,
    Sad,
    Meditative,
    Joyful,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Peaceful,
        Mood::Energetic,
        Mood::Sad,
        Mood::Meditative,
        Mood::Joyful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Peaceful => "Peaceful",
            Mood::Energetic => "Energetic",
            Mood::Sad => "Sad",
            Mood::Meditative => "Meditative",
            Mood::Joyful => "Joyful",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Mood::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown mood: {}", trimmed))
    }
}
