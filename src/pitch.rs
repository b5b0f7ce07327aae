// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Pitch classes and registers: the atoms every note is built from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::notation::NotationError;

/// The octave reserved for sentinel notes, which carry no real pitch.
pub const SENTINEL_OCTAVE: u8 = 0;
/// Lowest octave a pitched note may be placed in.
pub const MIN_OCTAVE: u8 = 1;
/// Highest octave a pitched note may be placed in.
pub const MAX_OCTAVE: u8 = 9;

/// The name of a note in standard notation, in alphabetical scale order starting at C.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

/// The seven letters in the order of the C major scale.
pub const CHROMAS_ALPHABETICAL: [Letter; 7] = [
    Letter::C,
    Letter::D,
    Letter::E,
    Letter::F,
    Letter::G,
    Letter::A,
    Letter::B,
];

impl Letter {
    /// Position of the letter in [`CHROMAS_ALPHABETICAL`].
    pub fn position(self) -> usize {
        self as usize
    }

    /// Half-tones above C of the natural note.
    pub fn semitone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn from_char(ch: char) -> Option<Letter> {
        match ch {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// Any offset applied to a note in standard notation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Accidental {
    /// The note is left unchanged.
    Natural,
    /// The note is a half-tone higher then indicated by its letter.
    Sharp,
    /// The note is a half-tone lower then indicated by its letter.
    Flat,
}

impl Accidental {
    pub fn offset(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        }
    }
}

/// A pitch class label such as `C`, `C#` or `Db`.
///
/// Every letter with at most one accidental is part of the vocabulary, which is
/// exactly the union of the sharp and the flat spelling cycles, including the
/// rarer `E#`, `Fb`, `B#` and `Cb`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Chroma {
    letter: Letter,
    accidental: Accidental,
}

impl Chroma {
    pub const fn new(letter: Letter, accidental: Accidental) -> Chroma {
        Chroma { letter, accidental }
    }

    pub const fn natural(letter: Letter) -> Chroma {
        Chroma::new(letter, Accidental::Natural)
    }

    pub fn letter(self) -> Letter {
        self.letter
    }

    pub fn accidental(self) -> Accidental {
        self.accidental
    }

    /// The pitch class of the chroma, from 0 (C) to 11 (B).
    ///
    /// ```
    /// use tonal_gen::pitch::*;
    ///
    /// let c_sharp: Chroma = "C#".parse().unwrap();
    /// let d_flat: Chroma = "Db".parse().unwrap();
    /// assert_eq!(c_sharp.semitone(), d_flat.semitone());
    /// assert_eq!("B#".parse::<Chroma>().unwrap().semitone(), 0);
    /// assert_eq!("Cb".parse::<Chroma>().unwrap().semitone(), 11);
    /// ```
    pub fn semitone(self) -> u8 {
        (self.letter.semitone() + self.accidental.offset()).rem_euclid(12) as u8
    }

    /// Whether two spellings sound identical.
    pub fn is_enharmonic_with(self, other: Chroma) -> bool {
        self.semitone() == other.semitone()
    }

    /// The chroma without its accidental.
    pub fn without_accidental(self) -> Chroma {
        Chroma::natural(self.letter)
    }
}

impl fmt::Display for Chroma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.as_char(), self.accidental.symbol())
    }
}

impl FromStr for Chroma {
    type Err = NotationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let unknown = || NotationError::UnknownChroma {
            value: text.to_string(),
        };
        let mut chars = text.chars();
        let letter = chars.next().and_then(Letter::from_char).ok_or_else(unknown)?;
        let accidental = match chars.as_str() {
            "" => Accidental::Natural,
            "#" | "♯" => Accidental::Sharp,
            "b" | "♭" => Accidental::Flat,
            _ => return Err(unknown()),
        };
        Ok(Chroma::new(letter, accidental))
    }
}

impl Serialize for Chroma {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Chroma {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// The register of a note.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct Octave(u8);

impl Octave {
    /// The octave carried by sentinel notes.
    pub const SENTINEL: Octave = Octave(SENTINEL_OCTAVE);

    /// Octave of a pitched note. Octave 0 is reserved for sentinels.
    pub fn pitched(value: u8) -> Result<Octave, NotationError> {
        if value == SENTINEL_OCTAVE {
            Err(NotationError::ReservedOctave)
        } else if value > MAX_OCTAVE {
            Err(NotationError::OctaveOutOfRange { value })
        } else {
            Ok(Octave(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// A chroma placed in a register.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct Pitch {
    chroma: Chroma,
    octave: Octave,
}

impl Pitch {
    pub fn new(chroma: Chroma, octave: Octave) -> Pitch {
        Pitch { chroma, octave }
    }

    pub fn chroma(&self) -> Chroma {
        self.chroma
    }

    pub fn octave(&self) -> Octave {
        self.octave
    }

    /// MIDI key number of the pitch, C4 being 60.
    ///
    /// Spellings crossing the octave boundary keep their written octave, so
    /// `B#4` sounds like `C5` and `Cb4` like `B3`.
    ///
    /// ```
    /// use tonal_gen::pitch::*;
    ///
    /// let a4 = Pitch::new("A".parse().unwrap(), Octave::pitched(4).unwrap());
    /// assert_eq!(a4.midi(), 69);
    /// let b_sharp = Pitch::new("B#".parse().unwrap(), Octave::pitched(4).unwrap());
    /// assert_eq!(b_sharp.midi(), 72);
    /// ```
    pub fn midi(&self) -> i32 {
        let base = (self.octave.0 as i32 + 1) * 12;
        base + self.chroma.letter.semitone() + self.chroma.accidental.offset()
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.chroma, self.octave.0)
    }
}
