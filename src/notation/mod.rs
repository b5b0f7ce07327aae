// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The theory engine: validated construction of the music entities and the
//! music-theoretic facts derived from them.
//!
//! The factory functions of this module are the only public way to build notes,
//! chords and measures, so every invariant is checked in one place.

pub mod enharmonic;
pub mod naming;
pub mod text;


use snafu::Snafu;

use crate::chord::{PlacedChord, CHORD_DURATION_SEPARATOR};
use crate::duration::{Duration, Subdivision, TempoUnit, TimeSignature};
use crate::note::{Note, NoteContent, Velocity, NOTE_END_OF_TRACK, NOTE_REST};
use crate::pitch::{Chroma, Octave, Pitch, SENTINEL_OCTAVE};
use crate::song::Measure;
use crate::tonality::Tonality;

pub use enharmonic::{
    chroma_enharmonic, get_alpha_scale, get_tonality_chromas, get_tonality_shifted_chromas,
    intervals_to_structure, pick_containing_enharmonics, shift_left, shift_right,
    CHROMA_ENHARMONICS, CHROMA_SHIFT_TIMES,
};
pub use naming::{
    all_tonalities, chord_to_syllabic, chroma_to_syllabic, get_chord_intl_name,
    note_to_syllabic, tonality_syllabic_name, ChordQuality,
};
pub use text::{parse_measures, parse_text_chord, parse_text_measure, parse_text_note};

/// Note value of the chords closing a track.
pub const NOTE_END_OF_TRACK_DURATION: u32 = 8;
/// Number of sentinel chords closing a generated track.
pub const NB_END_OF_TRACK_CHORDS: usize = 3;
/// Note value used when nothing else is specified, a quarter note.
pub const DEFAULT_CHORD_DURATION: u32 = 4;

#[derive(Debug, PartialEq, Snafu)]
pub enum NotationError {
    #[snafu(display("Unknown chroma {:?}", value))]
    UnknownChroma { value: String },
    #[snafu(display("Octave 0 is reserved for rests and end of track notes"))]
    ReservedOctave,
    #[snafu(display("Octave {} is out of range", value))]
    OctaveOutOfRange { value: u8 },
    #[snafu(display("Sentinel notes live in octave 0, not {}", value))]
    SentinelOctave { value: u8 },
    #[snafu(display("Duration value {} does not map to a known subdivision", value))]
    UnmappedSubdivision { value: u32 },
    #[snafu(display("Unknown tempo unit {:?}", value))]
    UnknownTempoUnit { value: String },
    #[snafu(display("Unknown note range {:?}", value))]
    UnknownNoteRange { value: String },
    #[snafu(display("Invalid time signature {}/{}", numerator, denominator))]
    InvalidTimeSignature { numerator: u32, denominator: u32 },
    #[snafu(display("Velocity {} is not within [0, 1]", value))]
    InvalidVelocity { value: f64 },
    #[snafu(display("The placed chord {} has no notes", index))]
    EmptyChord { index: usize },
    #[snafu(display("A rest or end of track note must be the only note of its chord"))]
    SentinelNotAlone,
    #[snafu(display("The note index {} is used twice in the same chord", index))]
    DuplicateNoteIndex { index: usize },
    #[snafu(display("The note {:?} is not of a chroma and octave pattern", text))]
    MalformedNote { text: String },
    #[snafu(display("The chord duration {:?} is not numeric", text))]
    NonNumericDuration { text: String },
    #[snafu(display("The note {} could not be found in the tonality {}", chroma, tonality))]
    NoteNotInTonality { chroma: String, tonality: String },
    #[snafu(display("The tonality {} has no spelling for the letter {}", tonality, letter))]
    UnspellableTonality { tonality: String, letter: char },
    #[snafu(display("The placed chord {} has {} pitched notes, at least 2 are needed to name it", index, nb_notes))]
    ChordTooNarrow { index: usize, nb_notes: usize },
    #[snafu(display("The placed chords of measure {} have not been initialised", measure))]
    UninitializedChords { measure: usize },
    #[snafu(display("A duration of value {} cannot be split in two", value))]
    UnsplittableDuration { value: u32 },
}

/// Create a note from its text chroma, which may also be one of the `rest` or `end` tokens.
///
/// ```
/// use tonal_gen::notation::create_note;
///
/// let note = create_note(0, "F#", 4).unwrap();
/// assert_eq!(note.render(), "F#4");
/// assert!(create_note(0, "rest", 0).unwrap().is_rest());
/// assert!(create_note(0, "H", 4).is_err());
/// ```
pub fn create_note(index: usize, chroma: &str, octave: u8) -> Result<Note, NotationError> {
    match chroma {
        NOTE_REST => create_sentinel_note(index, NoteContent::Rest, octave),
        NOTE_END_OF_TRACK => create_sentinel_note(index, NoteContent::EndOfTrack, octave),
        _ => create_pitched_note(index, chroma.parse()?, octave),
    }
}

pub fn create_pitched_note(index: usize, chroma: Chroma, octave: u8) -> Result<Note, NotationError> {
    let pitch = Pitch::new(chroma, Octave::pitched(octave)?);
    Ok(Note::new(index, NoteContent::Pitched(pitch)))
}

pub fn create_rest_note(index: usize) -> Note {
    Note::new(index, NoteContent::Rest)
}

pub fn create_end_of_track_note(index: usize) -> Note {
    Note::new(index, NoteContent::EndOfTrack)
}

fn create_sentinel_note(index: usize, content: NoteContent, octave: u8) -> Result<Note, NotationError> {
    if octave != SENTINEL_OCTAVE {
        return Err(NotationError::SentinelOctave { value: octave });
    }
    Ok(Note::new(index, content))
}

pub fn create_duration(value: u32, unit: TempoUnit) -> Result<Duration, NotationError> {
    Duration::new(value, unit)
}

pub fn create_time_signature(numerator: u32, denominator: u32) -> Result<TimeSignature, NotationError> {
    TimeSignature::new(numerator, denominator)
}

/// Create a chord, checking the duration, the velocity and the notes.
///
/// A chord needs at least one note, a sentinel note must be alone in its
/// chord, and note indices may not repeat.
pub fn create_placed_chord(
    index: usize,
    duration: u32,
    unit: TempoUnit,
    velocity: f64,
    tonality: Tonality,
    notes: Vec<Note>,
) -> Result<PlacedChord, NotationError> {
    let duration = create_duration(duration, unit)?;
    let velocity = Velocity::try_from_f64(velocity)?;
    if notes.is_empty() {
        return Err(NotationError::EmptyChord { index });
    }
    let mut placed_chord = PlacedChord::new(index, duration, velocity, tonality, Vec::new());
    for note in notes {
        placed_chord.add_note(note)?;
    }
    Ok(placed_chord)
}

/// A copy of the chord placed right after it.
pub fn create_same_chord(placed_chord: &PlacedChord) -> PlacedChord {
    let mut same = PlacedChord::new(
        placed_chord.index() + 1,
        placed_chord.duration(),
        placed_chord.velocity(),
        placed_chord.tonality(),
        placed_chord.notes_sorted_by_index(),
    );
    same.set_dotted_all(placed_chord.dotted_all());
    same
}

/// Create a measure whose chord list is still to be initialised.
pub fn create_measure(
    index: usize,
    tempo_bpm: u32,
    numerator: u32,
    denominator: u32,
) -> Result<Measure, NotationError> {
    let time_signature = create_time_signature(numerator, denominator)?;
    Ok(Measure::new(index, tempo_bpm, time_signature))
}

pub fn default_chord_duration() -> Duration {
    Duration::from_subdivision(Subdivision::Quarter)
}

pub fn default_time_signature() -> TimeSignature {
    TimeSignature::default()
}

pub fn is_end_of_track_note(note: &Note) -> bool {
    note.is_end_of_track()
}

pub fn is_end_of_track_placed_chord(placed_chord: &PlacedChord) -> bool {
    placed_chord.is_end_of_track()
}

/// Whether every chord is an end of track sentinel; an empty list has nothing else.
pub fn is_only_end_of_track_chords(placed_chords: &[PlacedChord]) -> bool {
    placed_chords.iter().all(is_end_of_track_placed_chord)
}

/// The sentinel chord marking the end of a track.
pub fn create_end_of_track_placed_chord(index: usize) -> PlacedChord {
    PlacedChord::new(
        index,
        Duration::from_subdivision(Subdivision::Eighth),
        Velocity::MIN,
        Tonality::default(),
        vec![create_end_of_track_note(0)],
    )
}

/// Close a non-empty chord sequence with end of track chords.
///
/// Several of them are added instead of just one, as a lone trailing event
/// may not be played by an unreliable synthesizer.
pub fn add_end_of_track_notes(placed_chords: &mut Vec<PlacedChord>) {
    if placed_chords.is_empty() {
        return;
    }
    for _ in 0..NB_END_OF_TRACK_CHORDS {
        let index = placed_chords.len();
        placed_chords.push(create_end_of_track_placed_chord(index));
    }
}

/// The end of track chord in the text notation, `end0/8`.
pub fn build_end_of_track_text() -> String {
    format!(
        "{}{}{}{}",
        NOTE_END_OF_TRACK, SENTINEL_OCTAVE, CHORD_DURATION_SEPARATOR, NOTE_END_OF_TRACK_DURATION
    )
}

pub fn note_is_not_rest(note: &Note) -> bool {
    text_note_is_not_rest(&note.render())
}

/// A chord without notes is not considered playable either.
pub fn placed_chord_is_not_rest(placed_chord: &PlacedChord) -> bool {
    placed_chord.first_note().map_or(false, |note| note_is_not_rest(&note))
}

pub fn text_note_is_not_rest(text_note: &str) -> bool {
    !text_note.contains(NOTE_REST)
}
