//! Synthesized note events

use serde::Serialize;

/// One MIDI note of the generated melody
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoteEvent {
    /// MIDI note number, 0..=127
    pub pitch: u8,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// MIDI velocity
    pub velocity: u8,
}

impl NoteEvent {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Equal-tempered frequency of the note (A4 = 440 Hz)
    pub fn frequency_hz(&self) -> f64 {
        440.0 * 2f64.powf((self.pitch as f64 - 69.0) / 12.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_a4() {
        let note = NoteEvent {
            pitch: 69,
            start: 0.0,
            end: 1.0,
            velocity: 100,
        };
        assert!((note.frequency_hz() - 440.0).abs() < 1e-9);
        assert_eq!(note.duration(), 1.0);
    }

    #[test]
    fn test_frequency_octave_below() {
        let note = NoteEvent {
            pitch: 57,
            start: 0.0,
            end: 0.5,
            velocity: 100,
        };
        assert!((note.frequency_hz() - 220.0).abs() < 1e-9);
    }
}
