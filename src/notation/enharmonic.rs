// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Spelling of the chromatic scale and of the tonalities built on it.

use crate::pitch::{Accidental, Chroma, Letter, CHROMAS_ALPHABETICAL};
use crate::tonality::{NoteRange, Tonality};

use super::NotationError;

/// Steps a tonality is rotated by to get the next row of a chord, i.e. a third.
pub const CHROMA_SHIFT_TIMES: usize = 2;

const fn natural(letter: Letter) -> Chroma {
    Chroma::new(letter, Accidental::Natural)
}

const fn sharp(letter: Letter) -> Chroma {
    Chroma::new(letter, Accidental::Sharp)
}

const fn flat(letter: Letter) -> Chroma {
    Chroma::new(letter, Accidental::Flat)
}

/// The twelve half-tones from C, each as a pair of its sharp side and flat side spellings.
///
/// Every chroma of the vocabulary appears in exactly one pair.
pub const CHROMA_ENHARMONICS: [(Chroma, Chroma); 12] = [
    (natural(Letter::C), sharp(Letter::B)),
    (sharp(Letter::C), flat(Letter::D)),
    (natural(Letter::D), natural(Letter::D)),
    (sharp(Letter::D), flat(Letter::E)),
    (natural(Letter::E), flat(Letter::F)),
    (natural(Letter::F), sharp(Letter::E)),
    (sharp(Letter::F), flat(Letter::G)),
    (natural(Letter::G), natural(Letter::G)),
    (sharp(Letter::G), flat(Letter::A)),
    (natural(Letter::A), natural(Letter::A)),
    (sharp(Letter::A), flat(Letter::B)),
    (natural(Letter::B), flat(Letter::C)),
];

/// The other spelling of the same half-tone.
///
/// ```
/// use tonal_gen::notation::chroma_enharmonic;
///
/// let other = chroma_enharmonic("C#".parse().unwrap()).unwrap();
/// assert_eq!(other.to_string(), "Db");
/// let other = chroma_enharmonic("Fb".parse().unwrap()).unwrap();
/// assert_eq!(other.to_string(), "E");
/// ```
pub fn chroma_enharmonic(chroma: Chroma) -> Result<Chroma, NotationError> {
    CHROMA_ENHARMONICS
        .iter()
        .find_map(|&(sharp_side, flat_side)| {
            if sharp_side == chroma {
                Some(flat_side)
            } else if flat_side == chroma {
                Some(sharp_side)
            } else {
                None
            }
        })
        .ok_or_else(|| NotationError::UnknownChroma {
            value: chroma.to_string(),
        })
}

/// The chromatic cycle of twelve pairs starting at the given chroma.
///
/// The first spelling of each pair is taken from the side of the cycle the
/// start chroma belongs to, the second one is its enharmonic.
pub fn pick_containing_enharmonics(start: Chroma) -> Result<Vec<(Chroma, Chroma)>, NotationError> {
    let unknown = || NotationError::UnknownChroma {
        value: start.to_string(),
    };
    let (position, from_flat_side) = CHROMA_ENHARMONICS
        .iter()
        .enumerate()
        .find_map(|(position, &(sharp_side, flat_side))| {
            if sharp_side == start {
                Some((position, false))
            } else if flat_side == start {
                Some((position, true))
            } else {
                None
            }
        })
        .ok_or_else(unknown)?;
    let cycle = CHROMA_ENHARMONICS
        .iter()
        .cycle()
        .skip(position)
        .take(CHROMA_ENHARMONICS.len())
        .map(|&(sharp_side, flat_side)| {
            if from_flat_side {
                (flat_side, sharp_side)
            } else {
                (sharp_side, flat_side)
            }
        })
        .collect();
    Ok(cycle)
}

/// Letters in alphabetical order starting at the letter of `start`.
pub fn get_alpha_scale(start: Chroma, length: usize) -> Vec<Letter> {
    CHROMAS_ALPHABETICAL
        .iter()
        .cycle()
        .skip(start.letter().position())
        .take(length)
        .copied()
        .collect()
}

/// Positions of the degrees in the chromatic scale, from the intervals between them.
///
/// ```
/// use tonal_gen::notation::intervals_to_structure;
///
/// assert_eq!(intervals_to_structure(&[2, 2, 1, 2, 2, 2, 1]), vec![0, 2, 4, 5, 7, 9, 11]);
/// ```
pub fn intervals_to_structure(intervals: &[u8]) -> Vec<usize> {
    intervals
        .iter()
        .scan(0, |position, &interval| {
            let current = *position;
            *position += interval as usize;
            Some(current)
        })
        .collect()
}

/// The chromas of a tonality, one per consecutive letter.
///
/// Each degree takes whichever spelling of its half-tone carries the next
/// letter of the alphabetical scale, so no letter is used twice. Ranges of
/// other than seven degrees cannot follow the letters and keep the spellings
/// of the side of the first chroma.
///
/// ```
/// use tonal_gen::notation::get_tonality_chromas;
/// use tonal_gen::tonality::NoteRange;
///
/// let chromas = get_tonality_chromas(NoteRange::Major, "F".parse().unwrap()).unwrap();
/// let names: Vec<String> = chromas.iter().map(|c| c.to_string()).collect();
/// assert_eq!(names, vec!["F", "G", "A", "Bb", "C", "D", "E"]);
/// ```
pub fn get_tonality_chromas(range: NoteRange, first_chroma: Chroma) -> Result<Vec<Chroma>, NotationError> {
    let cycle = pick_containing_enharmonics(first_chroma)?;
    let structure = intervals_to_structure(range.intervals());
    if structure.len() != CHROMAS_ALPHABETICAL.len() {
        return Ok(structure.iter().map(|&position| cycle[position].0).collect());
    }
    let letters = get_alpha_scale(first_chroma, structure.len());
    structure
        .iter()
        .zip(letters)
        .map(|(&position, letter)| {
            let (spelling, enharmonic) = cycle[position];
            if spelling.letter() == letter {
                Ok(spelling)
            } else if enharmonic.letter() == letter {
                Ok(enharmonic)
            } else {
                Err(NotationError::UnspellableTonality {
                    tonality: Tonality::new(range, first_chroma).to_string(),
                    letter: letter.as_char(),
                })
            }
        })
        .collect()
}

/// The tonality and its successive rotations by a third, one row per chord note.
///
/// Row `k` holds, at each degree, the `k`-th note of the chord rooted there.
pub fn get_tonality_shifted_chromas<T: Clone>(chromas: &[T], width: usize) -> Vec<Vec<T>> {
    let mut rows: Vec<Vec<T>> = Vec::with_capacity(width);
    for _ in 0..width {
        let shifted = match rows.last() {
            None => chromas.to_vec(),
            Some(previous) => shift_left(previous, CHROMA_SHIFT_TIMES),
        };
        rows.push(shifted);
    }
    rows
}

/// Rotates the items towards the start, the first ones wrapping around to the end.
pub fn shift_left<T: Clone>(items: &[T], times: usize) -> Vec<T> {
    let mut shifted = items.to_vec();
    if !shifted.is_empty() {
        let len = shifted.len();
        shifted.rotate_left(times % len);
    }
    shifted
}

/// Rotates the items towards the end, the last ones wrapping around to the start.
pub fn shift_right<T: Clone>(items: &[T], times: usize) -> Vec<T> {
    let mut shifted = items.to_vec();
    if !shifted.is_empty() {
        let len = shifted.len();
        shifted.rotate_right(times % len);
    }
    shifted
}

#[cfg(test)]
mod test {
    use super::*;

    fn names(chromas: &[Chroma]) -> Vec<String> {
        chromas.iter().map(|c| c.to_string()).collect()
    }

    fn scale(range: NoteRange, first: &str) -> Vec<String> {
        names(&get_tonality_chromas(range, first.parse().unwrap()).unwrap())
    }

    #[test]
    fn each_spelling_appears_once() {
        let mut all: Vec<Chroma> = Vec::new();
        for &(sharp_side, flat_side) in CHROMA_ENHARMONICS.iter() {
            assert!(sharp_side.is_enharmonic_with(flat_side));
            all.push(sharp_side);
            if flat_side != sharp_side {
                all.push(flat_side);
            }
        }
        assert_eq!(all.len(), 21);
        for (i, chroma) in all.iter().enumerate() {
            assert!(!all[i + 1..].contains(chroma), "{} appears twice", chroma);
        }
    }

    #[test]
    fn containing_cycle_starts_at_query() {
        let cycle = pick_containing_enharmonics("Db".parse().unwrap()).unwrap();
        assert_eq!(cycle.len(), 12);
        assert_eq!(cycle[0].0.to_string(), "Db");
        assert_eq!(cycle[0].1.to_string(), "C#");
        assert_eq!(cycle[11].0.to_string(), "B#");
        let cycle = pick_containing_enharmonics("E".parse().unwrap()).unwrap();
        assert_eq!(cycle[1].0.to_string(), "F");
    }

    #[test]
    fn major_scales() {
        assert_eq!(scale(NoteRange::Major, "C"), vec!["C", "D", "E", "F", "G", "A", "B"]);
        assert_eq!(scale(NoteRange::Major, "D"), vec!["D", "E", "F#", "G", "A", "B", "C#"]);
        assert_eq!(scale(NoteRange::Major, "Eb"), vec!["Eb", "F", "G", "Ab", "Bb", "C", "D"]);
        assert_eq!(scale(NoteRange::Major, "C#"), vec!["C#", "D#", "E#", "F#", "G#", "A#", "B#"]);
        assert_eq!(scale(NoteRange::Major, "Cb"), vec!["Cb", "Db", "Eb", "Fb", "Gb", "Ab", "Bb"]);
    }

    #[test]
    fn minor_scales() {
        assert_eq!(scale(NoteRange::MinorNatural, "A"), vec!["A", "B", "C", "D", "E", "F", "G"]);
        assert_eq!(scale(NoteRange::MinorNatural, "D"), vec!["D", "E", "F", "G", "A", "Bb", "C"]);
        assert_eq!(scale(NoteRange::MinorNatural, "G"), vec!["G", "A", "Bb", "C", "D", "Eb", "F"]);
        assert_eq!(scale(NoteRange::MinorHarmonic, "A"), vec!["A", "B", "C", "D", "E", "F", "G#"]);
    }

    #[test]
    fn blues_keeps_the_side_of_its_first_chroma() {
        assert_eq!(scale(NoteRange::Blues, "A"), vec!["A", "C", "D", "D#", "E", "G"]);
        assert_eq!(scale(NoteRange::Blues, "Eb"), vec!["Eb", "Gb", "Ab", "A", "Bb", "Db"]);
    }

    #[test]
    fn unspellable_degree() {
        // the leading tone of A# harmonic minor would need a double sharp
        assert_eq!(
            get_tonality_chromas(NoteRange::MinorHarmonic, "A#".parse().unwrap()),
            Err(NotationError::UnspellableTonality {
                tonality: "A# MinorHarmonic".to_string(),
                letter: 'G'
            })
        );
    }

    #[test]
    fn sharp_and_flat_spellings_share_a_pair() {
        for start in &["C#", "Db"] {
            let cycle = pick_containing_enharmonics(start.parse().unwrap()).unwrap();
            assert_eq!(cycle.len(), 12);
            assert_eq!(cycle[0].0.to_string(), *start);
            for spelling in &["C#", "Db"] {
                let chroma: Chroma = spelling.parse().unwrap();
                let found = cycle
                    .iter()
                    .filter(|&&(first, second)| first == chroma || second == chroma)
                    .count();
                assert_eq!(found, 1, "{} in the cycle of {}", spelling, start);
            }
        }
    }

    #[test]
    fn every_common_key_is_spelled_with_each_letter_once() {
        for tonality in crate::notation::all_tonalities() {
            let chromas = get_tonality_chromas(tonality.range, tonality.first_chroma).unwrap();
            assert_eq!(chromas[0], tonality.first_chroma);
            let mut letters: Vec<Letter> = chromas.iter().map(|c| c.letter()).collect();
            letters.sort();
            letters.dedup();
            assert_eq!(letters.len(), 7, "{}", tonality);
        }
    }

    #[test]
    fn shifted_rows_move_by_thirds() {
        let chromas = get_tonality_chromas(NoteRange::Major, "C".parse().unwrap()).unwrap();
        let rows = get_tonality_shifted_chromas(&chromas, 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(names(&rows[0]), vec!["C", "D", "E", "F", "G", "A", "B"]);
        assert_eq!(names(&rows[1]), vec!["E", "F", "G", "A", "B", "C", "D"]);
        assert_eq!(names(&rows[2]), vec!["G", "A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn shifted_rows_for_every_width() {
        let tonalities = [
            (NoteRange::Major, "D"),
            (NoteRange::Major, "Bb"),
            (NoteRange::MinorHarmonic, "F#"),
            (NoteRange::Blues, "A"),
        ];
        for &(range, first) in tonalities.iter() {
            let chromas = get_tonality_chromas(range, first.parse().unwrap()).unwrap();
            let len = chromas.len();
            for width in 1..=7 {
                let rows = get_tonality_shifted_chromas(&chromas, width);
                assert_eq!(rows.len(), width, "{} {:?} width {}", first, range, width);
                assert_eq!(rows[0], chromas);
                for (row_index, row) in rows.iter().enumerate() {
                    let expected: Vec<Chroma> = (0..len)
                        .map(|i| chromas[(i + row_index * CHROMA_SHIFT_TIMES) % len])
                        .collect();
                    assert_eq!(row, &expected, "{} {:?} row {}", first, range, row_index);
                }
            }
        }

        // six blues degrees, the fourth row wraps back to the first
        let blues = get_tonality_chromas(NoteRange::Blues, "A".parse().unwrap()).unwrap();
        let rows = get_tonality_shifted_chromas(&blues, 7);
        assert_eq!(rows[3], rows[0]);
        assert_eq!(names(&rows[4]), vec!["D", "D#", "E", "G", "A", "C"]);
        let b_flat = get_tonality_chromas(NoteRange::Major, "Bb".parse().unwrap()).unwrap();
        let bb_rows = get_tonality_shifted_chromas(&b_flat, 2);
        assert_eq!(names(&bb_rows[1]), vec!["D", "Eb", "F", "G", "A", "Bb", "C"]);
    }

    #[test]
    fn shifts_are_pure_and_inverse() {
        let items = vec![1, 2, 3, 4, 5];
        let left = shift_left(&items, 2);
        assert_eq!(left, vec![3, 4, 5, 1, 2]);
        assert_eq!(shift_right(&left, 2), items);
        assert_eq!(shift_left(&items, 7), left);
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert!(shift_left::<u8>(&[], 3).is_empty());
    }
}
