// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! A compact textual format for writing down measures of chords.
//!
//! Measures are separated by `,`, chords by spaces and the notes of a chord by
//! `|`. A chord ends with its duration after a `/`, e.g. `C4|E4|G4/4`, and a
//! trailing `.` makes it dotted. `rest` and `end` stand in for a chroma.

use log::debug;

use crate::chord::{PlacedChord, CHORD_DURATION_DOTTED, CHORD_DURATION_SEPARATOR, NOTE_SEPARATOR};
use crate::duration::TempoUnit;
use crate::note::{Note, NOTE_END_OF_TRACK, NOTE_REST};
use crate::pitch::SENTINEL_OCTAVE;
use crate::song::{Measure, MEASURE_SEPARATOR};
use crate::tonality::Tonality;

use super::{create_measure, create_note, create_placed_chord, NotationError};

/// Parse measures separated by commas. Blank measures are skipped.
///
/// ```
/// use tonal_gen::notation::parse_measures;
///
/// let measures = parse_measures("C4|E4|G4/2 G4/2, C4/1", 60, 4, 4, 0.5).unwrap();
/// assert_eq!(measures.len(), 2);
/// assert_eq!(measures[1].index(), 1);
/// assert_eq!(measures[0].is_full(), Ok(true));
/// ```
pub fn parse_measures(
    text: &str,
    tempo_bpm: u32,
    numerator: u32,
    denominator: u32,
    velocity: f64,
) -> Result<Vec<Measure>, NotationError> {
    let measures = text
        .split(MEASURE_SEPARATOR)
        .filter(|measure| !measure.trim().is_empty())
        .enumerate()
        .map(|(index, measure)| {
            parse_text_measure(index, measure, tempo_bpm, numerator, denominator, velocity)
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Parsed {} measures", measures.len());
    Ok(measures)
}

/// Parse the space separated chords of one measure.
pub fn parse_text_measure(
    index: usize,
    text: &str,
    tempo_bpm: u32,
    numerator: u32,
    denominator: u32,
    velocity: f64,
) -> Result<Measure, NotationError> {
    let mut measure = create_measure(index, tempo_bpm, numerator, denominator)?;
    measure.init_chords();
    for (chord_index, chord) in text.split_whitespace().enumerate() {
        measure.push_chord(parse_text_chord(chord_index, chord, velocity)?)?;
    }
    Ok(measure)
}

/// Parse a chord such as `C4|E4|G4/4` or `rest/2.`.
///
/// The chord is placed in the default tonality as the text carries none.
pub fn parse_text_chord(index: usize, text: &str, velocity: f64) -> Result<PlacedChord, NotationError> {
    let non_numeric = || NotationError::NonNumericDuration {
        text: text.to_string(),
    };
    let separator = text.rfind(CHORD_DURATION_SEPARATOR).ok_or_else(non_numeric)?;
    let (notes, duration) = (&text[..separator], &text[separator + 1..]);
    let (duration, dotted) = match duration.strip_suffix(CHORD_DURATION_DOTTED) {
        Some(duration) => (duration, true),
        None => (duration, false),
    };
    let duration: u32 = duration.parse().map_err(|_| non_numeric())?;
    let notes = notes
        .split(NOTE_SEPARATOR)
        .enumerate()
        .map(|(note_index, note)| parse_text_note(note_index, note))
        .collect::<Result<Vec<_>, _>>()?;
    let mut placed_chord = create_placed_chord(
        index,
        duration,
        TempoUnit::Duple,
        velocity,
        Tonality::default(),
        notes,
    )?;
    placed_chord.set_dotted_all(dotted);
    Ok(placed_chord)
}

/// Parse a note made of a chroma followed by its octave, e.g. `Bb3`.
pub fn parse_text_note(index: usize, text: &str) -> Result<Note, NotationError> {
    let malformed = || NotationError::MalformedNote {
        text: text.to_string(),
    };
    let mut scan = Scan::new(text);
    let chroma = scan.take_while(|ch| ch.is_alphabetic() || matches!(ch, '#' | '♯' | '♭'));
    let octave = scan.take_while(|ch| ch.is_ascii_digit());
    if chroma.is_empty() || !scan.is_eof() {
        return Err(malformed());
    }
    if octave.is_empty() {
        return match chroma {
            NOTE_REST | NOTE_END_OF_TRACK => create_note(index, chroma, SENTINEL_OCTAVE),
            _ => Err(malformed()),
        };
    }
    let octave: u8 = octave.parse().map_err(|_| malformed())?;
    create_note(index, chroma, octave)
}

struct Scan<'a> {
    input: &'a str,
    stream: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Scan<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            stream: input.char_indices().peekable(),
        }
    }

    fn is_eof(&mut self) -> bool {
        self.current().is_none()
    }

    fn current(&mut self) -> Option<(usize, char)> {
        self.stream.peek().cloned()
    }

    fn position(&mut self) -> usize {
        self.current().map_or(self.input.len(), |(pos, _)| pos)
    }

    /// Consume characters as long as they match and return them.
    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.position();
        while let Some((_, ch)) = self.current() {
            if accept(ch) {
                self.stream.next();
            } else {
                break;
            }
        }
        let end = self.position();
        &self.input[start..end]
    }
}
