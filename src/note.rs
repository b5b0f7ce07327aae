// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of what a note is.

use std::fmt;

use serde::Serialize;

use crate::notation::NotationError;
use crate::pitch::{Chroma, Octave, Pitch, SENTINEL_OCTAVE};

/// Text token standing for a rest in place of a chroma.
pub const NOTE_REST: &str = "rest";
/// Text token standing for the end of a track in place of a chroma.
pub const NOTE_END_OF_TRACK: &str = "end";

/// What a note slot holds: a real pitch or one of the sentinel markers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum NoteContent {
    Pitched(Pitch),
    /// Silence for the duration of the chord.
    Rest,
    /// Marks the end of a track for the playback collaborator.
    EndOfTrack,
}

/// A note within a chord. The index orders simultaneous notes; insertion order does not.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct Note {
    index: usize,
    content: NoteContent,
}

impl Note {
    pub(crate) fn new(index: usize, content: NoteContent) -> Note {
        Note { index, content }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn content(&self) -> NoteContent {
        self.content
    }

    pub fn pitch(&self) -> Option<Pitch> {
        match self.content {
            NoteContent::Pitched(pitch) => Some(pitch),
            _ => None,
        }
    }

    pub fn chroma(&self) -> Option<Chroma> {
        self.pitch().map(|pitch| pitch.chroma())
    }

    /// The octave of the note, sentinels living in octave 0.
    pub fn octave(&self) -> Octave {
        self.pitch().map_or(Octave::SENTINEL, |pitch| pitch.octave())
    }

    pub fn is_rest(&self) -> bool {
        self.content == NoteContent::Rest
    }

    pub fn is_end_of_track(&self) -> bool {
        self.content == NoteContent::EndOfTrack
    }

    pub fn is_sentinel(&self) -> bool {
        self.pitch().is_none()
    }

    /// The chroma part of the note as written in the text notation.
    pub fn render_chroma(&self) -> String {
        match self.content {
            NoteContent::Pitched(pitch) => pitch.chroma().to_string(),
            NoteContent::Rest => NOTE_REST.to_string(),
            NoteContent::EndOfTrack => NOTE_END_OF_TRACK.to_string(),
        }
    }

    /// The note as written in the text notation, e.g. `C#4`, `rest` or `end0`.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// MIDI key number, `None` for sentinels.
    pub fn midi(&self) -> Option<i32> {
        self.pitch().map(|pitch| pitch.midi())
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.content {
            NoteContent::Pitched(pitch) => write!(f, "{}", pitch),
            NoteContent::Rest => write!(f, "{}", NOTE_REST),
            NoteContent::EndOfTrack => write!(f, "{}{}", NOTE_END_OF_TRACK, SENTINEL_OCTAVE),
        }
    }
}

/// The velocity of a voice indicates how hard/fast the key was pressed down.
/// A normalized float between 0.0 and 1.0 inclusive.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize)]
pub struct Velocity(f64);

impl Velocity {
    pub const MAX: Velocity = Velocity(1.0);
    pub const MIN: Velocity = Velocity(0.0);

    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Convert a floating point value in the interval [0, 1] to a velocity.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonal_gen::note::*;
    ///
    /// assert_eq!(Velocity::try_from_f64(1.0).unwrap(), Velocity::MAX);
    /// assert!(Velocity::try_from_f64(1.5).is_err());
    /// ```
    pub fn try_from_f64(velocity: f64) -> Result<Velocity, NotationError> {
        if velocity.is_nan() || velocity < 0.0 || velocity > 1.0 {
            return Err(NotationError::InvalidVelocity { value: velocity });
        }
        Ok(Velocity(velocity))
    }

    /// Convert a MIDI velocity in 0..=127.
    pub fn from_midi(velocity: u8) -> Result<Velocity, NotationError> {
        if velocity > 127 {
            return Err(NotationError::InvalidVelocity {
                value: velocity as f64,
            });
        }
        Ok(Velocity(velocity as f64 / 127.0))
    }

    pub fn to_midi(self) -> u8 {
        (self.0 * 127.0).round() as u8
    }
}
