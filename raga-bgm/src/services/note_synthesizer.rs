//! Pitch trace to note sequence
//!
//! Deterministic, one note per pitch value:
//! - `pitch[i] = floor(hz[i]) mod 128`
//! - durations linearly spaced from 0.5 s to 1.5 s (inclusive endpoints)
//! - notes packed back to back from t = 0, no rests, no overlap
//! - constant velocity
//!
//! The AI suggestion plays no part here.

use crate::models::NoteEvent;

/// Velocity of every generated note
pub const NOTE_VELOCITY: u8 = 100;

/// Duration of the first note (seconds)
pub const MIN_NOTE_SECONDS: f64 = 0.5;

/// Duration of the last note (seconds)
pub const MAX_NOTE_SECONDS: f64 = 1.5;

/// `n` evenly spaced values from `start` to `stop` inclusive
///
/// `n == 1` yields `[start]`; `n == 0` yields nothing.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// MIDI note number for a frequency value, folded into 0..=127
pub fn pitch_to_midi(hz: f32) -> u8 {
    (hz.floor() as i64).rem_euclid(128) as u8
}

/// Map a pitch trace to back-to-back notes
pub fn synthesize_notes(pitches: &[f32]) -> Vec<NoteEvent> {
    let durations = linspace(MIN_NOTE_SECONDS, MAX_NOTE_SECONDS, pitches.len());

    let mut start = 0.0f64;
    let notes: Vec<NoteEvent> = pitches
        .iter()
        .zip(&durations)
        .map(|(&hz, &duration)| {
            let end = start + duration;
            let note = NoteEvent {
                pitch: pitch_to_midi(hz),
                start,
                end,
                velocity: NOTE_VELOCITY,
            };
            start = end;
            note
        })
        .collect();

    tracing::debug!(
        notes = notes.len(),
        total_seconds = notes.last().map(|n| n.end).unwrap_or(0.0),
        "Synthesized note sequence"
    );

    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_note_scenario() {
        let notes = synthesize_notes(&[220.0, 440.0, 880.0]);

        let durations: Vec<f64> = notes.iter().map(|n| n.duration()).collect();
        let starts: Vec<f64> = notes.iter().map(|n| n.start).collect();
        let pitches: Vec<u8> = notes.iter().map(|n| n.pitch).collect();

        assert_eq!(durations, vec![0.5, 1.0, 1.5]);
        assert_eq!(starts, vec![0.0, 0.5, 1.5]);
        assert_eq!(pitches, vec![92, 56, 112]);
        assert!(notes.iter().all(|n| n.velocity == 100));
    }

    #[test]
    fn test_empty_trace_yields_no_notes() {
        assert!(synthesize_notes(&[]).is_empty());
    }

    #[test]
    fn test_single_note_is_half_second() {
        let notes = synthesize_notes(&[300.7]);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].start, 0.0);
        assert_eq!(notes[0].end, 0.5);
        assert_eq!(notes[0].pitch, (300 % 128) as u8);
    }

    #[test]
    fn test_packing_is_contiguous() {
        let pitches: Vec<f32> = (0..50).map(|i| 150.0 + i as f32 * 37.3).collect();
        let notes = synthesize_notes(&pitches);

        assert_eq!(notes.len(), pitches.len());
        assert_eq!(notes[0].start, 0.0);
        for pair in notes.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(pair[1].start >= pair[0].start);
        }
    }

    #[test]
    fn test_durations_monotonic_with_endpoints() {
        let d = linspace(MIN_NOTE_SECONDS, MAX_NOTE_SECONDS, 17);
        assert_eq!(d.first().copied(), Some(0.5));
        assert_eq!(d.last().copied(), Some(1.5));
        assert!(d.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_pitch_folding() {
        for hz in [150.2f32, 255.9, 1000.0, 3999.99, 127.0, 128.0] {
            let midi = pitch_to_midi(hz);
            assert!(midi <= 127);
            assert_eq!(midi as i64, (hz.floor() as i64) % 128);
        }
    }
}
