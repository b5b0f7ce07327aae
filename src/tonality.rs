// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Scale types and the tonalities anchored on them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::notation::NotationError;
use crate::pitch::{Chroma, Letter};

/// A range is an ordered sequence of intervals, from a lower note to an higher note.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum NoteRange {
    Major,
    MinorNatural,
    MinorHarmonic,
    MinorMelodic,
    Blues,
}

impl NoteRange {
    /// Half-tones between consecutive degrees of the range, summing to an octave.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            NoteRange::Major => &[2, 2, 1, 2, 2, 2, 1],
            NoteRange::MinorNatural => &[2, 1, 2, 2, 1, 2, 2],
            NoteRange::MinorHarmonic => &[2, 1, 2, 2, 1, 3, 1],
            NoteRange::MinorMelodic => &[2, 1, 2, 2, 2, 2, 1],
            NoteRange::Blues => &[3, 2, 1, 1, 3, 2],
        }
    }

    pub fn is_minor(self) -> bool {
        matches!(
            self,
            NoteRange::MinorNatural | NoteRange::MinorHarmonic | NoteRange::MinorMelodic
        )
    }

    /// Number of degrees in the range.
    pub fn nb_degrees(self) -> usize {
        self.intervals().len()
    }
}

impl FromStr for NoteRange {
    type Err = NotationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "major" => Ok(NoteRange::Major),
            "minor" | "minor-natural" => Ok(NoteRange::MinorNatural),
            "minor-harmonic" => Ok(NoteRange::MinorHarmonic),
            "minor-melodic" => Ok(NoteRange::MinorMelodic),
            "blues" => Ok(NoteRange::Blues),
            _ => Err(NotationError::UnknownNoteRange {
                value: text.to_string(),
            }),
        }
    }
}

/// A scale type anchored at a first chroma, e.g. D harmonic minor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Tonality {
    pub range: NoteRange,
    pub first_chroma: Chroma,
}

impl Tonality {
    pub fn new(range: NoteRange, first_chroma: Chroma) -> Tonality {
        Tonality {
            range,
            first_chroma,
        }
    }
}

impl Default for Tonality {
    fn default() -> Self {
        Tonality::new(NoteRange::Major, Chroma::natural(Letter::C))
    }
}

impl fmt::Display for Tonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.first_chroma, self.range)
    }
}
