// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The random walk over the degrees of a tonality producing the harmony chords.

use log::{debug, trace};
use snafu::ResultExt;

use crate::notation::{get_tonality_chromas, get_tonality_shifted_chromas, shift_right};
use crate::pitch::Chroma;

use super::random::{weighted_choice, RandomSource};
use super::settings::{DissimilarChordPolicy, RandomMethod};
use super::{render_labels, Generator, GeneratorError, NotationFailed};

/// How well a degree of the tonality is followed by another one, rows and columns from the first degree.
pub const BONUS_TABLE: [[u32; 7]; 7] = [
    [30, 0, 15, 5, 5, 10, 0],
    [0, 30, 0, 10, 0, 5, 10],
    [15, 0, 30, 0, 10, 0, 0],
    [5, 10, 0, 30, 0, 15, 0],
    [5, 0, 10, 0, 30, 0, 10],
    [10, 5, 0, 15, 0, 30, 0],
    [0, 10, 0, 0, 10, 0, 30],
];

/// Whether the chord shares at least `min` of its first `width` notes with the previous chord.
///
/// ```
/// use tonal_gen::generator::is_similar_to_previous;
/// use tonal_gen::pitch::Chroma;
///
/// let chroma = |text: &str| -> Chroma { text.parse().unwrap() };
/// let c_major = [chroma("C"), chroma("E"), chroma("G")];
/// let f_major = [chroma("C"), chroma("F"), chroma("A")];
/// assert!(!is_similar_to_previous(&c_major, &f_major, 3, 2));
/// ```
pub fn is_similar_to_previous(previous: &[Chroma], chord: &[Chroma], width: usize, min: usize) -> bool {
    let nb_same_notes = chord
        .iter()
        .take(width)
        .filter(|note| previous.contains(note))
        .count();
    nb_same_notes >= min
}

impl<R: RandomSource> Generator<R> {
    /// Draw the chord progression of the harmony, each chord as the chromas from its root up.
    ///
    /// Accepted chords are added twice. The progression holds exactly the
    /// requested number of chords.
    pub fn generate_harmony_chords(&mut self) -> Result<Vec<Vec<Chroma>>, GeneratorError> {
        let tonality = self.settings.tonality;
        let chromas = get_tonality_chromas(tonality.range, tonality.first_chroma).context(NotationFailed)?;
        let shifted_chromas = get_tonality_shifted_chromas(&chromas, self.settings.chord_width);
        let requested = self.settings.nb_chords;
        let max_attempts = self.settings.stall_limit.saturating_mul(requested);

        let mut chords: Vec<Vec<Chroma>> = Vec::with_capacity(requested);
        let mut previous_chord: Vec<Chroma> = Vec::new();
        let mut previous_root = 0;
        let mut attempts = 0;
        while chords.len() < requested {
            if attempts >= max_attempts {
                return Err(GeneratorError::GenerationStalled {
                    generated: chords.len(),
                    requested,
                    attempts,
                });
            }
            attempts += 1;

            let root = if chords.is_empty() {
                0
            } else {
                self.pick_root(previous_root, chromas.len())?
            };
            let chord: Vec<Chroma> = shifted_chromas.iter().map(|row| row[root]).collect();

            let is_similar = is_similar_to_previous(
                &previous_chord,
                &chord,
                self.settings.chord_width,
                self.settings.similar_note_min,
            );
            if chords.is_empty() || is_similar {
                debug!("chord {} on degree {}", render_labels(&chord), root);
                previous_root = root;
                previous_chord = chord.clone();
                chords.push(chord.clone());
                if chords.len() < requested {
                    chords.push(chord);
                }
            } else if self.settings.reverse_dissimilar_chord {
                let added = self.dissimilar_chord(&previous_chord, chord);
                trace!("dissimilar chord replaced by {}", render_labels(&added));
                chords.push(added);
            } else {
                trace!("chord {} rejected on degree {}", render_labels(&chord), root);
            }
        }
        Ok(chords)
    }

    fn dissimilar_chord(&self, previous_chord: &[Chroma], candidate: Vec<Chroma>) -> Vec<Chroma> {
        match self.settings.dissimilar_chord_policy {
            DissimilarChordPolicy::KeepCandidate => candidate,
            DissimilarChordPolicy::ReversePrevious => shift_right(previous_chord, 1),
        }
    }

    /// Draw the degree of the next chord root with the configured method.
    pub fn pick_root(&mut self, current: usize, nb_degrees: usize) -> Result<usize, GeneratorError> {
        let root = match self.settings.random_method {
            RandomMethod::Base => self.pick_root_base(current, nb_degrees)?,
            RandomMethod::HarmonyBase => self.pick_root_from_bonus_table(current, nb_degrees)?,
        };
        trace!("root {} picked after {}", root, current);
        Ok(root)
    }

    /// Any other degree, uniformly.
    pub fn pick_root_base(&mut self, current: usize, nb_degrees: usize) -> Result<usize, GeneratorError> {
        self.random
            .random_integer_in_range_excluding(0, nb_degrees.saturating_sub(1), &[current])
    }

    /// A degree weighted by its bonus after the current one.
    ///
    /// Degrees under the minimum bonus are left out, unless that minimum is zero.
    pub fn pick_root_from_bonus_table(
        &mut self,
        current: usize,
        nb_degrees: usize,
    ) -> Result<usize, GeneratorError> {
        let min_bonus = self.settings.min_bonus;
        let randomness = self.settings.bonus_randomness;
        let bonuses = BONUS_TABLE.get(current).ok_or(GeneratorError::EmptyWeightedPool)?;
        let candidates: Vec<(usize, u32)> = bonuses
            .iter()
            .copied()
            .enumerate()
            .take(nb_degrees)
            .filter(|&(_, bonus)| min_bonus == 0 || bonus >= min_bonus)
            .map(|(degree, bonus)| (degree, bonus.saturating_add(randomness)))
            .collect();
        weighted_choice(&candidates, &mut self.random)
    }
}
