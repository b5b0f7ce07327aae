// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! A melody drawn over the harmony chords.

use log::{debug, trace};
use snafu::ResultExt;

use crate::chord::PlacedChord;
use crate::notation::{add_end_of_track_notes, get_tonality_chromas, NotationError};
use crate::pitch::Chroma;
use crate::tonality::Tonality;

use super::random::RandomSource;
use super::settings::RandomMethod;
use super::{Generator, GeneratorError, NotationFailed, VELOCITY_LOUDER};

/// The melody over one harmony chord: a first note, then the note it moves to.
///
/// When both notes are the same the first note is held.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MelodyStep {
    pub first: Chroma,
    pub second: Chroma,
    /// Whether the second note lies outside of the harmony chord.
    pub passing: bool,
}

impl MelodyStep {
    pub fn held(chroma: Chroma) -> MelodyStep {
        MelodyStep {
            first: chroma,
            second: chroma,
            passing: false,
        }
    }

    pub fn is_held(&self) -> bool {
        self.first == self.second
    }
}

/// The closest degrees below and above the note that are not part of the chord.
///
/// ```
/// use tonal_gen::generator::passing_notes;
/// use tonal_gen::pitch::Chroma;
/// use tonal_gen::tonality::Tonality;
///
/// let chroma = |text: &str| -> Chroma { text.parse().unwrap() };
/// let chord = [chroma("C"), chroma("E"), chroma("G")];
/// let found = passing_notes(chroma("E"), &chord, Tonality::default()).unwrap();
/// assert_eq!(found, vec![chroma("D"), chroma("F")]);
/// ```
pub fn passing_notes(note: Chroma, chord: &[Chroma], tonality: Tonality) -> Result<Vec<Chroma>, NotationError> {
    let chromas = get_tonality_chromas(tonality.range, tonality.first_chroma)?;
    let position = chromas
        .iter()
        .position(|&chroma| chroma == note)
        .ok_or_else(|| NotationError::NoteNotInTonality {
            chroma: note.to_string(),
            tonality: tonality.to_string(),
        })?;
    let len = chromas.len();
    let outside = |chroma: &Chroma| !chord.contains(chroma);
    let below = (1..len)
        .map(|offset| chromas[(position + len - offset) % len])
        .find(outside);
    let above = (1..len).map(|offset| chromas[(position + offset) % len]).find(outside);

    let mut found: Vec<Chroma> = below.into_iter().collect();
    if let Some(above) = above {
        if !found.contains(&above) {
            found.push(above);
        }
    }
    Ok(found)
}

impl<R: RandomSource> Generator<R> {
    /// One melody step per harmony chord.
    pub fn generate_melody_steps(
        &mut self,
        harmony_chords: &[Vec<Chroma>],
    ) -> Result<Vec<MelodyStep>, GeneratorError> {
        harmony_chords
            .iter()
            .map(|chord| self.melody_step(chord))
            .collect()
    }

    fn melody_step(&mut self, chord: &[Chroma]) -> Result<MelodyStep, GeneratorError> {
        let root = *chord.first().ok_or(GeneratorError::EmptyHarmonyChord)?;
        if self.settings.random_method == RandomMethod::Base {
            return Ok(MelodyStep::held(root));
        }

        let last = chord.len() - 1;
        let first = chord[self.random.random_integer_in_range(0, last)];
        if self.random.probability(self.settings.inpassing_probability) {
            let candidates = passing_notes(first, chord, self.settings.tonality).context(NotationFailed)?;
            if !candidates.is_empty() {
                let second = candidates[self.random.random_integer_in_range(0, candidates.len() - 1)];
                trace!("passing from {} to {}", first, second);
                return Ok(MelodyStep {
                    first,
                    second,
                    passing: true,
                });
            }
        }
        let second = chord[self.random.random_integer_in_range(0, last)];
        Ok(MelodyStep {
            first,
            second,
            passing: false,
        })
    }

    /// The placed chords of the melody track, end of track chords included.
    ///
    /// With split steps, a step moving to another note becomes two chords of
    /// half the duration. Otherwise only the first note of a step is played.
    pub fn create_melody_chords(&self, steps: &[MelodyStep]) -> Result<Vec<PlacedChord>, GeneratorError> {
        let mut placed_chords = Vec::with_capacity(steps.len());
        for step in steps {
            let index = placed_chords.len();
            if self.settings.split_melody_steps && !step.is_held() {
                let (first, _) = self
                    .create_placed_chord(index, VELOCITY_LOUDER, &[step.first])?
                    .split()
                    .context(NotationFailed)?;
                let (second, _) = self
                    .create_placed_chord(index + 1, VELOCITY_LOUDER, &[step.second])?
                    .split()
                    .context(NotationFailed)?;
                placed_chords.push(first);
                placed_chords.push(second);
            } else {
                if !step.is_held() {
                    debug!(
                        "{} after {} dropped, melody steps are not split",
                        step.second, step.first
                    );
                }
                placed_chords.push(self.create_placed_chord(index, VELOCITY_LOUDER, &[step.first])?);
            }
        }
        add_end_of_track_notes(&mut placed_chords);
        Ok(placed_chords)
    }
}
