// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Chord and tonality names, in international and in syllabic notation.

use std::fmt;

use crate::chord::PlacedChord;
use crate::note::{Note, NoteContent, NOTE_END_OF_TRACK, NOTE_REST};
use crate::pitch::{Accidental, Chroma, Letter};
use crate::tonality::{NoteRange, Tonality};

use super::enharmonic::{get_tonality_chromas, intervals_to_structure};
use super::NotationError;

/// Half-tones of a major third. Anything below it makes a minor chord.
const MAJOR_THIRD: usize = 4;
/// Half-tones of a diminished fifth.
const DIMINISHED_FIFTH: usize = 6;
/// Degrees from a chord root to its fifth.
const FIFTH_DEGREES: usize = 4;

/// The quality of a chord, as deduced from its third and its fifth.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
}

impl ChordQuality {
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
        }
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Position of the chroma among the degrees of the tonality.
///
/// A spelling of the tonality is preferred, an enharmonic one is accepted.
fn tonality_position(chromas: &[Chroma], chroma: Chroma, tonality: Tonality) -> Result<usize, NotationError> {
    chromas
        .iter()
        .position(|&c| c == chroma)
        .or_else(|| chromas.iter().position(|c| c.is_enharmonic_with(chroma)))
        .ok_or_else(|| NotationError::NoteNotInTonality {
            chroma: chroma.to_string(),
            tonality: tonality.to_string(),
        })
}

/// The root and quality of a chord, judged on the interval between its first two notes.
fn chord_root_and_quality(placed_chord: &PlacedChord) -> Result<(Chroma, ChordQuality), NotationError> {
    let chromas: Vec<Chroma> = placed_chord
        .notes_sorted_by_index()
        .iter()
        .filter_map(Note::chroma)
        .collect();
    if chromas.len() < 2 {
        return Err(NotationError::ChordTooNarrow {
            index: placed_chord.index(),
            nb_notes: chromas.len(),
        });
    }
    let tonality = placed_chord.tonality();
    let tonality_chromas = get_tonality_chromas(tonality.range, tonality.first_chroma)?;
    let structure = intervals_to_structure(tonality.range.intervals());
    let span = |from: usize, to: usize| (structure[to] + 12 - structure[from]) % 12;
    let root = tonality_position(&tonality_chromas, chromas[0], tonality)?;
    let second = tonality_position(&tonality_chromas, chromas[1], tonality)?;
    // without a written fifth, the one of the tonality
    let fifth = match chromas.get(2) {
        Some(&chroma) => tonality_position(&tonality_chromas, chroma, tonality)?,
        None => (root + FIFTH_DEGREES) % tonality_chromas.len(),
    };
    let quality = if span(root, second) >= MAJOR_THIRD {
        ChordQuality::Major
    } else if span(root, fifth) == DIMINISHED_FIFTH {
        ChordQuality::Diminished
    } else {
        ChordQuality::Minor
    };
    Ok((chromas[0], quality))
}

/// The international name of a chord, e.g. `C`, `Am` or `Bdim`.
///
/// ```
/// use tonal_gen::notation::{create_note, create_placed_chord, get_chord_intl_name};
/// use tonal_gen::duration::TempoUnit;
/// use tonal_gen::tonality::Tonality;
///
/// let notes = vec![create_note(0, "D", 4).unwrap(), create_note(1, "F", 4).unwrap()];
/// let chord = create_placed_chord(0, 4, TempoUnit::Duple, 0.5, Tonality::default(), notes).unwrap();
/// assert_eq!(get_chord_intl_name(&chord).unwrap(), "Dm");
/// ```
pub fn get_chord_intl_name(placed_chord: &PlacedChord) -> Result<String, NotationError> {
    let (root, quality) = chord_root_and_quality(placed_chord)?;
    Ok(format!("{}{}", root, quality))
}

fn letter_syllable(letter: Letter) -> &'static str {
    match letter {
        Letter::C => "do",
        Letter::D => "ré",
        Letter::E => "mi",
        Letter::F => "fa",
        Letter::G => "sol",
        Letter::A => "la",
        Letter::B => "si",
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The syllabic name of a chroma, e.g. `do#` or `sib`.
pub fn chroma_to_syllabic(chroma: Chroma) -> String {
    let accidental = match chroma.accidental() {
        Accidental::Natural => "",
        Accidental::Sharp => "#",
        Accidental::Flat => "b",
    };
    format!("{}{}", letter_syllable(chroma.letter()), accidental)
}

/// The syllabic name of a note's chroma, sentinels keeping their token.
pub fn note_to_syllabic(note: &Note) -> String {
    match note.content() {
        NoteContent::Pitched(pitch) => chroma_to_syllabic(pitch.chroma()),
        NoteContent::Rest => NOTE_REST.to_string(),
        NoteContent::EndOfTrack => NOTE_END_OF_TRACK.to_string(),
    }
}

/// The chord name in both notations, e.g. `Am Lam`.
pub fn chord_to_syllabic(placed_chord: &PlacedChord) -> Result<String, NotationError> {
    let (root, quality) = chord_root_and_quality(placed_chord)?;
    Ok(format!(
        "{}{} {}{}",
        root,
        quality,
        capitalize(&chroma_to_syllabic(root)),
        quality
    ))
}

/// The syllabic name of a tonality, minor ones carrying an `m`.
///
/// ```
/// use tonal_gen::notation::tonality_syllabic_name;
/// use tonal_gen::tonality::{NoteRange, Tonality};
///
/// let f_sharp_minor = Tonality::new(NoteRange::MinorNatural, "F#".parse().unwrap());
/// assert_eq!(tonality_syllabic_name(f_sharp_minor), "Fa#m");
/// ```
pub fn tonality_syllabic_name(tonality: Tonality) -> String {
    let suffix = if tonality.range.is_minor() {
        ChordQuality::Minor.suffix()
    } else {
        ChordQuality::Major.suffix()
    };
    format!("{}{}", capitalize(&chroma_to_syllabic(tonality.first_chroma)), suffix)
}

const MAJOR_KEYS: [&str; 15] = [
    "C", "G", "D", "A", "E", "B", "F#", "C#", "F", "Bb", "Eb", "Ab", "Db", "Gb", "Cb",
];
const MINOR_KEYS: [&str; 15] = [
    "A", "E", "B", "F#", "C#", "G#", "D#", "A#", "D", "G", "C", "F", "Bb", "Eb", "Ab",
];

/// The thirty tonalities of the circle of fifths, major ones first.
pub fn all_tonalities() -> Vec<Tonality> {
    let majors = MAJOR_KEYS.iter().map(|key| (NoteRange::Major, key));
    let minors = MINOR_KEYS.iter().map(|key| (NoteRange::MinorNatural, key));
    majors
        .chain(minors)
        .filter_map(|(range, key)| key.parse().ok().map(|chroma| Tonality::new(range, chroma)))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::duration::TempoUnit;
    use crate::notation::{create_note, create_placed_chord, create_rest_note};

    fn chord(tonality: Tonality, notes: &[&str]) -> PlacedChord {
        let notes = notes
            .iter()
            .enumerate()
            .map(|(index, chroma)| create_note(index, chroma, 4).unwrap())
            .collect();
        create_placed_chord(0, 4, TempoUnit::Duple, 1.0, tonality, notes).unwrap()
    }

    #[test]
    fn c_major_degrees() {
        let c_major = Tonality::default();
        let triads = [
            (["C", "E", "G"], "C"),
            (["D", "F", "A"], "Dm"),
            (["E", "G", "B"], "Em"),
            (["F", "A", "C"], "F"),
            (["G", "B", "D"], "G"),
            (["A", "C", "E"], "Am"),
            (["B", "D", "F"], "Bdim"),
        ];
        for (notes, name) in triads.iter() {
            assert_eq!(get_chord_intl_name(&chord(c_major, notes)).unwrap(), *name);
        }
    }

    #[test]
    fn minor_tonality_degrees() {
        let a_harmonic = Tonality::new(NoteRange::MinorHarmonic, "A".parse().unwrap());
        assert_eq!(get_chord_intl_name(&chord(a_harmonic, &["A", "C"])).unwrap(), "Am");
        assert_eq!(get_chord_intl_name(&chord(a_harmonic, &["E", "G#"])).unwrap(), "E");
        assert_eq!(get_chord_intl_name(&chord(a_harmonic, &["G#", "B"])).unwrap(), "G#dim");
    }

    #[test]
    fn diminished_chords_span_a_tritone() {
        let a_minor = Tonality::new(NoteRange::MinorNatural, "A".parse().unwrap());
        assert_eq!(get_chord_intl_name(&chord(a_minor, &["B", "D", "F"])).unwrap(), "Bdim");
        assert_eq!(get_chord_intl_name(&chord(a_minor, &["B", "D"])).unwrap(), "Bdim");
        assert_eq!(get_chord_intl_name(&chord(a_minor, &["G", "B", "D"])).unwrap(), "G");
        assert_eq!(get_chord_intl_name(&chord(a_minor, &["D", "F", "A"])).unwrap(), "Dm");
        let a_harmonic = Tonality::new(NoteRange::MinorHarmonic, "A".parse().unwrap());
        assert_eq!(get_chord_intl_name(&chord(a_harmonic, &["B", "D", "F"])).unwrap(), "Bdim");
        // a written perfect fifth wins over the tonality
        let c_major = Tonality::default();
        assert_eq!(get_chord_intl_name(&chord(c_major, &["D", "F", "A"])).unwrap(), "Dm");
        assert_eq!(chord_to_syllabic(&chord(a_minor, &["B", "D", "F"])).unwrap(), "Bdim Sidim");
    }

    #[test]
    fn naming_errors() {
        let c_major = Tonality::default();
        assert_eq!(
            get_chord_intl_name(&chord(c_major, &["C"])),
            Err(NotationError::ChordTooNarrow { index: 0, nb_notes: 1 })
        );
        assert_eq!(
            get_chord_intl_name(&chord(c_major, &["C", "Eb"])),
            Err(NotationError::NoteNotInTonality {
                chroma: "Eb".to_string(),
                tonality: "C Major".to_string()
            })
        );
        let rest = create_placed_chord(0, 4, TempoUnit::Duple, 1.0, c_major, vec![create_rest_note(0)]).unwrap();
        assert!(get_chord_intl_name(&rest).is_err());
    }

    #[test]
    fn enharmonic_notes_are_found() {
        let c_major = Tonality::default();
        assert_eq!(get_chord_intl_name(&chord(c_major, &["B#", "E"])).unwrap(), "B#");
    }

    #[test]
    fn syllabic_names() {
        let c_major = Tonality::default();
        assert_eq!(chord_to_syllabic(&chord(c_major, &["A", "C", "E"])).unwrap(), "Am Lam");
        assert_eq!(chord_to_syllabic(&chord(c_major, &["B", "D"])).unwrap(), "Bdim Sidim");
        assert_eq!(chroma_to_syllabic("Eb".parse().unwrap()), "mib");
        assert_eq!(note_to_syllabic(&create_rest_note(0)), "rest");
        assert_eq!(tonality_syllabic_name(Tonality::default()), "Do");
    }

    #[test]
    fn thirty_tonalities() {
        let tonalities = all_tonalities();
        assert_eq!(tonalities.len(), 30);
        assert_eq!(tonalities.iter().filter(|t| t.range.is_minor()).count(), 15);
        assert_eq!(tonalities[0], Tonality::default());
    }
}
