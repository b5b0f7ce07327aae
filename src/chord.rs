// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Chords placed in a measure: simultaneous notes sharing a duration.

use serde::Serialize;

use crate::duration::{Duration, TimeSignature};
use crate::notation::NotationError;
use crate::note::{Note, Velocity};
use crate::rational::Rational;
use crate::tonality::Tonality;

/// Separates the notes of a chord in the text notation.
pub const NOTE_SEPARATOR: char = '|';
/// Separates the notes of a chord from its duration in the text notation.
pub const CHORD_DURATION_SEPARATOR: char = '/';
/// Marks a dotted chord in the text notation.
pub const CHORD_DURATION_DOTTED: char = '.';

/// Opaque reference to the drawing of a chord, owned by the rendering collaborator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct StaveNoteHandle(pub u64);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedChord {
    index: usize,
    duration: Duration,
    velocity: Velocity,
    tonality: Tonality,
    notes: Vec<Note>,
    dotted_all: bool,
    #[serde(skip)]
    stave_note: Option<StaveNoteHandle>,
}

impl PlacedChord {
    /// Builds a chord from notes whose invariants have already been checked.
    pub(crate) fn new(
        index: usize,
        duration: Duration,
        velocity: Velocity,
        tonality: Tonality,
        notes: Vec<Note>,
    ) -> PlacedChord {
        PlacedChord {
            index,
            duration,
            velocity,
            tonality,
            notes,
            dotted_all: false,
            stave_note: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn tonality(&self) -> Tonality {
        self.tonality
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }

    pub fn dotted_all(&self) -> bool {
        self.dotted_all
    }

    pub fn set_dotted_all(&mut self, dotted: bool) {
        self.dotted_all = dotted;
    }

    pub fn stave_note(&self) -> Option<StaveNoteHandle> {
        self.stave_note
    }

    /// Called by the rendering collaborator once the chord has been drawn.
    pub fn set_stave_note(&mut self, handle: StaveNoteHandle) {
        self.stave_note = Some(handle);
    }

    /// Adds a note, refusing an index already taken in the chord.
    ///
    /// A sentinel note must stay the only note of its chord.
    pub fn add_note(&mut self, note: Note) -> Result<(), NotationError> {
        if self.notes.iter().any(|n| n.index() == note.index()) {
            return Err(NotationError::DuplicateNoteIndex { index: note.index() });
        }
        if self.has_notes() && (note.is_sentinel() || self.notes.iter().any(Note::is_sentinel)) {
            return Err(NotationError::SentinelNotAlone);
        }
        self.notes.push(note);
        Ok(())
    }

    pub fn notes_sorted_by_index(&self) -> Vec<Note> {
        let mut notes = self.notes.clone();
        notes.sort_by_key(|note| note.index());
        notes
    }

    /// Notes from the lowest to the highest sounding one. Sentinels come first.
    pub fn notes_sorted_by_pitch(&self) -> Vec<Note> {
        let mut notes = self.notes.clone();
        notes.sort_by_key(|note| (note.midi(), note.index()));
        notes
    }

    /// The note with the lowest index, the root of an unreversed chord.
    pub fn first_note(&self) -> Option<Note> {
        self.notes.iter().min_by_key(|note| note.index()).copied()
    }

    pub fn render_first_note_chroma(&self) -> String {
        self.first_note()
            .map(|note| note.render_chroma())
            .unwrap_or_default()
    }

    /// Whether the chord is a sentinel marking the end of its track.
    pub fn is_end_of_track(&self) -> bool {
        self.first_note().map_or(false, |note| note.is_end_of_track())
    }

    pub fn is_rest(&self) -> bool {
        self.first_note().map_or(false, |note| note.is_rest())
    }

    /// Number of beats the chord takes, dots included.
    pub fn beats(&self, time_signature: TimeSignature, tempo_bpm: u32) -> Rational {
        let beats = self.duration.beats(time_signature, tempo_bpm);
        if self.dotted_all {
            beats * 3 / 2
        } else {
            beats
        }
    }

    /// The chord in the text notation, e.g. `C4|E4|G4/4`.
    pub fn render_text(&self) -> String {
        let notes: Vec<String> = self
            .notes_sorted_by_index()
            .iter()
            .map(|note| note.render())
            .collect();
        let mut text = format!(
            "{}{}{}",
            notes.join(&NOTE_SEPARATOR.to_string()),
            CHORD_DURATION_SEPARATOR,
            self.duration.render_value()
        );
        if self.dotted_all {
            text.push(CHORD_DURATION_DOTTED);
        }
        text
    }

    /// Splits the chord into two chords of half its duration.
    ///
    /// The second chord takes the index following the first one.
    pub fn split(&self) -> Result<(PlacedChord, PlacedChord), NotationError> {
        let duration = self
            .duration
            .halved()
            .ok_or(NotationError::UnsplittableDuration {
                value: self.duration.render_value(),
            })?;
        let mut first = self.clone();
        first.duration = duration;
        first.stave_note = None;
        let mut second = first.clone();
        second.index = self.index + 1;
        Ok((first, second))
    }
}
