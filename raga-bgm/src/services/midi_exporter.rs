// Standard MIDI File output for the generated melody.
//
// SMF format 1: track 0 carries the tempo, track 1 is the single piano
// instrument (program 0, channel 0). Seconds map to ticks at a fixed
// 120 BPM with 220 ticks per quarter note, i.e. 440 ticks per second.
//
// Uses the `midly` crate for MIDI writing.

use crate::error::{BgmError, BgmResult};
use crate::models::NoteEvent;
use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 220;

/// Fixed output tempo.
pub const TEMPO_BPM: u32 = 120;

/// General MIDI program 0: acoustic grand piano.
pub const PIANO_PROGRAM: u8 = 0;

const CHANNEL: u8 = 0;

/// Convert seconds to ticks at the fixed tempo.
pub fn seconds_to_ticks(seconds: f64) -> u32 {
    let ticks_per_second = TICKS_PER_QUARTER as f64 * TEMPO_BPM as f64 / 60.0;
    (seconds * ticks_per_second).round().max(0.0) as u32
}

/// Serialize notes to MIDI and write to `path`, replacing any existing file.
///
/// An empty note list still produces a valid file with an empty
/// instrument track.
pub fn write_midi(notes: &[NoteEvent], path: &Path) -> BgmResult<()> {
    let bytes = midi_bytes(notes)?;
    std::fs::write(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        notes = notes.len(),
        bytes = bytes.len(),
        "MIDI written"
    );
    Ok(())
}

/// Serialize notes to an in-memory SMF byte buffer.
pub fn midi_bytes(notes: &[NoteEvent]) -> BgmResult<Vec<u8>> {
    let smf = notes_to_smf(notes);
    let mut buf = Vec::new();
    smf.write_std(&mut buf)
        .map_err(|e| BgmError::Midi(e.to_string()))?;
    Ok(buf)
}

/// Build the two-track SMF for a note list.
pub fn notes_to_smf(notes: &[NoteEvent]) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let tempo_microseconds = 60_000_000 / TEMPO_BPM;
    let tempo_track: Track<'static> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ];
    smf.tracks.push(tempo_track);
    smf.tracks.push(instrument_track(notes));

    smf
}

fn instrument_track(notes: &[NoteEvent]) -> Track<'static> {
    let channel = u4::new(CHANNEL);

    // (tick, is_note_on, key, velocity); offs sort before ons at equal ticks
    let mut timed: Vec<(u32, bool, u8, u8)> = Vec::with_capacity(notes.len() * 2);
    for note in notes {
        timed.push((seconds_to_ticks(note.start), true, note.pitch, note.velocity));
        timed.push((seconds_to_ticks(note.end), false, note.pitch, 0));
    }
    timed.sort_by_key(|&(tick, is_on, _, _)| (tick, is_on));

    let mut track: Track<'static> = Vec::with_capacity(timed.len() + 2);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(PIANO_PROGRAM),
            },
        },
    });

    let mut last_tick = 0u32;
    for (tick, is_on, key, vel) in timed {
        let message = if is_on {
            MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(vel),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(vel),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}
