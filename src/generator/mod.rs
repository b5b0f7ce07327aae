// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Procedural composition of a complete soundtrack from a handful of settings.
//!
//! The harmony is a random walk over the degrees of a tonality, chords being
//! built by stacking thirds. The melody is drawn from the harmony, and both are
//! packed into measures and tracks.

mod harmony;
mod melody;
pub mod random;
mod settings;

use std::mem;

use log::{debug, info};
use snafu::{ResultExt, Snafu};

use crate::chord::{PlacedChord, NOTE_SEPARATOR};
use crate::duration::TempoUnit;
use crate::notation::{
    add_end_of_track_notes, create_measure, create_pitched_note, create_placed_chord,
    NotationError,
};
use crate::pitch::Chroma;
use crate::song::{Measure, Soundtrack, TrackRole};

pub use harmony::{is_similar_to_previous, BONUS_TABLE};
pub use melody::{passing_notes, MelodyStep};
pub use random::{weighted_choice, RandomSource, SeededRandom, ThreadRandom};
pub use settings::{DissimilarChordPolicy, GeneratorSettings, RandomMethod, MAX_BONUS_RANDOMNESS};

/// Velocity of the melody track.
pub const VELOCITY_LOUDER: f64 = 1.0;
/// Velocity of the accompanying tracks.
pub const VELOCITY_SOFTER: f64 = 0.1;
/// Generated soundtracks are named with this prefix and a random suffix.
pub const SOUNDTRACK_NAME_PREFIX: &str = "Soundtrack";
const SOUNDTRACK_NAME_SUFFIX_LENGTH: usize = 4;
const SOUNDTRACK_ID_LENGTH: usize = 8;

#[derive(Debug, PartialEq, Snafu)]
pub enum GeneratorError {
    #[snafu(display("{}", source))]
    NotationFailed { source: NotationError },
    #[snafu(display("The random method {:?} does not exist", name))]
    UnknownRandomMethod { name: String },
    #[snafu(display("The dissimilar chord policy {:?} does not exist", name))]
    UnknownDissimilarChordPolicy { name: String },
    #[snafu(display("Invalid generator settings: {}", reason))]
    InvalidSettings { reason: String },
    #[snafu(display("The bonus randomness {} exceeds the maximum of {}", value, max))]
    BonusRandomnessTooLarge { value: u32, max: u32 },
    #[snafu(display("There is nothing to pick from, all weights are zero"))]
    EmptyWeightedPool,
    #[snafu(display("No value between {} and {} may be picked", min, max))]
    EmptyRandomRange { min: usize, max: usize },
    #[snafu(display("A harmony chord has no notes"))]
    EmptyHarmonyChord,
    #[snafu(display(
        "Only {} of {} chords were generated after {} candidates",
        generated,
        requested,
        attempts
    ))]
    GenerationStalled {
        generated: usize,
        requested: usize,
        attempts: usize,
    },
}

/// Chord labels as in the text notation, e.g. `C|E|G`.
pub(crate) fn render_labels(chord: &[Chroma]) -> String {
    let labels: Vec<String> = chord.iter().map(|chroma| chroma.to_string()).collect();
    labels.join(&NOTE_SEPARATOR.to_string())
}

/// Composes soundtracks, drawing from the given source of randomness.
pub struct Generator<R> {
    settings: GeneratorSettings,
    random: R,
}

impl<R: RandomSource> Generator<R> {
    /// Create a generator, refusing settings that cannot produce a soundtrack.
    pub fn new(settings: GeneratorSettings, random: R) -> Result<Self, GeneratorError> {
        settings.validate()?;
        Ok(Generator { settings, random })
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate a new soundtrack: a melody track and the accompanying tracks enabled in the settings.
    pub fn generate_soundtrack(&mut self) -> Result<Soundtrack, GeneratorError> {
        let name = format!(
            "{}_{}",
            SOUNDTRACK_NAME_PREFIX,
            self.random.random_string(SOUNDTRACK_NAME_SUFFIX_LENGTH)
        );
        let id = self.random.random_string(SOUNDTRACK_ID_LENGTH);
        let mut soundtrack = Soundtrack::new(id, name);

        let harmony_chords = self.generate_harmony_chords()?;
        let melody_steps = self.generate_melody_steps(&harmony_chords)?;

        let melody = self.create_measures(self.create_melody_chords(&melody_steps)?)?;
        soundtrack.add_track(melody).name = TrackRole::Melody.to_string();

        let accompaniment = [
            (TrackRole::Harmony, self.settings.generate_harmony),
            (TrackRole::Drums, self.settings.generate_drums),
            (TrackRole::Bass, self.settings.generate_bass),
        ];
        for &(role, enabled) in accompaniment.iter() {
            if !enabled {
                continue;
            }
            let placed_chords = self.create_placed_chords(VELOCITY_SOFTER, &harmony_chords)?;
            let track = soundtrack.add_track(self.create_measures(placed_chords)?);
            track.name = role.to_string();
            track.display_chord_names = true;
        }

        info!(
            "generated {} with {} tracks over {} chords",
            soundtrack.name(),
            soundtrack.tracks().len(),
            self.settings.nb_chords
        );
        Ok(soundtrack)
    }

    /// A chord of the given chromas, at the octave, duration and tonality of the settings.
    fn create_placed_chord(
        &self,
        index: usize,
        velocity: f64,
        chromas: &[Chroma],
    ) -> Result<PlacedChord, GeneratorError> {
        let notes = chromas
            .iter()
            .enumerate()
            .map(|(note_index, &chroma)| create_pitched_note(note_index, chroma, self.settings.note_octave))
            .collect::<Result<Vec<_>, _>>()
            .context(NotationFailed)?;
        create_placed_chord(
            index,
            self.settings.chord_duration,
            TempoUnit::Duple,
            velocity,
            self.settings.tonality,
            notes,
        )
        .context(NotationFailed)
    }

    /// Placed chords for chord labels, followed by the end of track chords.
    pub fn create_placed_chords(
        &self,
        velocity: f64,
        chords: &[Vec<Chroma>],
    ) -> Result<Vec<PlacedChord>, GeneratorError> {
        let mut placed_chords = chords
            .iter()
            .enumerate()
            .map(|(index, chord)| self.create_placed_chord(index, velocity, chord))
            .collect::<Result<Vec<_>, _>>()?;
        add_end_of_track_notes(&mut placed_chords);
        Ok(placed_chords)
    }

    /// Pack chords into measures, starting a new measure once the current one is full.
    ///
    /// Chords are renumbered from zero in each measure.
    pub fn create_measures(&self, placed_chords: Vec<PlacedChord>) -> Result<Vec<Measure>, GeneratorError> {
        let new_measure = |index: usize| -> Result<Measure, GeneratorError> {
            let mut measure = create_measure(
                index,
                self.settings.tempo_bpm,
                self.settings.time_signature_numerator,
                self.settings.time_signature_denominator,
            )
            .context(NotationFailed)?;
            measure.init_chords();
            Ok(measure)
        };

        let mut measures = Vec::new();
        let mut measure = new_measure(0)?;
        for mut placed_chord in placed_chords {
            if measure.is_full().context(NotationFailed)? {
                let next = new_measure(measure.index() + 1)?;
                measures.push(mem::replace(&mut measure, next));
            }
            placed_chord.set_index(measure.placed_chords().context(NotationFailed)?.len());
            measure.push_chord(placed_chord).context(NotationFailed)?;
        }
        if !measure.placed_chords().context(NotationFailed)?.is_empty() {
            measures.push(measure);
        }
        debug!("packed into {} measures", measures.len());
        Ok(measures)
    }
}

#[cfg(test)]
mod test {
    use super::random::scripted::ScriptedRandom;
    use super::*;
    use crate::notation::{get_tonality_chromas, is_only_end_of_track_chords, get_chord_intl_name};
    use crate::tonality::{NoteRange, Tonality};
    use expect_test::expect;

    fn settings(nb_chords: usize, method: RandomMethod) -> GeneratorSettings {
        GeneratorSettings {
            nb_chords,
            random_method: method,
            ..GeneratorSettings::default()
        }
    }

    #[test]
    fn c_major_tonality() {
        let chromas = get_tonality_chromas(NoteRange::Major, "C".parse().unwrap()).unwrap();
        assert_eq!(render_labels(&chromas), "C|D|E|F|G|A|B");
    }

    #[test]
    fn scripted_soundtrack() {
        let random = ScriptedRandom::new(&[4]);
        let mut generator = Generator::new(settings(4, RandomMethod::Base), random).unwrap();
        let soundtrack = generator.generate_soundtrack().unwrap();
        assert_eq!(soundtrack.name(), "Soundtrack_abcd");
        assert_eq!(soundtrack.id(), "abcdefgh");
        expect![[r#"
            [Melody]
            C5/4 C5/4 A5/4 A5/4, end0/8 end0/8 end0/8
            [Harmony]
            C5|E5|G5/4 C5|E5|G5/4 A5|C5|E5/4 A5|C5|E5/4, end0/8 end0/8 end0/8
        "#]]
        .assert_eq(&soundtrack.render_text().unwrap());

        let harmony = &soundtrack.tracks()[1];
        assert!(harmony.display_chord_names);
        assert!(!soundtrack.tracks()[0].display_chord_names);
        let names: Vec<String> = harmony.measures()[0]
            .placed_chords()
            .unwrap()
            .iter()
            .map(|chord| get_chord_intl_name(chord).unwrap())
            .collect();
        assert_eq!(names, vec!["C", "C", "Am", "Am"]);
    }

    #[test]
    fn melody_holds_the_requested_chords() {
        for &(seed, method) in &[(1, RandomMethod::Base), (2, RandomMethod::HarmonyBase), (3, RandomMethod::HarmonyBase)] {
            let mut generator = Generator::new(settings(60, method), SeededRandom::from_seed(seed)).unwrap();
            let soundtrack = generator.generate_soundtrack().unwrap();
            let melody = &soundtrack.tracks()[0];
            assert_eq!(melody.name, "Melody");
            assert_eq!(melody.nb_placed_chords(), Ok(60 + 3));
            let last = melody.measures().last().unwrap().placed_chords().unwrap();
            assert!(is_only_end_of_track_chords(&last[last.len() - 3..]));
        }
    }

    #[test]
    fn accompanying_tracks_follow_settings() {
        let mut settings = settings(8, RandomMethod::HarmonyBase);
        settings.generate_harmony = false;
        settings.generate_drums = true;
        settings.generate_bass = true;
        let mut generator = Generator::new(settings, SeededRandom::from_seed(5)).unwrap();
        let soundtrack = generator.generate_soundtrack().unwrap();
        let names: Vec<&str> = soundtrack.tracks().iter().map(|track| track.name.as_str()).collect();
        assert_eq!(names, vec!["Melody", "Drums", "Bass"]);
        assert_eq!(
            soundtrack.tracks()[1].render_text(),
            soundtrack.tracks()[2].render_text()
        );
        let velocity = soundtrack.tracks()[1].measures()[0].placed_chords().unwrap()[0].velocity();
        assert_eq!(velocity.as_f64(), VELOCITY_SOFTER);
    }

    #[test]
    fn measures_roll_over_when_full() {
        let generator = Generator::new(settings(6, RandomMethod::Base), ScriptedRandom::new(&[])).unwrap();
        let chords = vec![vec!["C".parse::<Chroma>().unwrap()]; 6];
        let placed_chords = generator.create_placed_chords(VELOCITY_LOUDER, &chords).unwrap();
        assert_eq!(placed_chords.len(), 9);
        let measures = generator.create_measures(placed_chords).unwrap();
        let sizes: Vec<usize> = measures.iter().map(|m| m.placed_chords().unwrap().len()).collect();
        assert_eq!(sizes, vec![4, 5]);
        let indices: Vec<usize> = measures.iter().map(|m| m.index()).collect();
        assert_eq!(indices, vec![0, 1]);
        let second: Vec<usize> = measures[1].placed_chords().unwrap().iter().map(PlacedChord::index).collect();
        assert_eq!(second, vec![0, 1, 2, 3, 4]);
        assert_eq!(measures[0].is_full(), Ok(true));
    }

    #[test]
    fn no_chords_no_measures() {
        let generator = Generator::new(settings(6, RandomMethod::Base), ScriptedRandom::new(&[])).unwrap();
        assert_eq!(generator.create_measures(Vec::new()), Ok(Vec::new()));
        assert_eq!(generator.create_placed_chords(VELOCITY_LOUDER, &[]), Ok(Vec::new()));
    }

    #[test]
    fn minor_tonality_soundtrack() {
        let mut settings = settings(16, RandomMethod::HarmonyBase);
        settings.tonality = Tonality::new(NoteRange::MinorNatural, "D".parse().unwrap());
        settings.split_melody_steps = true;
        let mut generator = Generator::new(settings, SeededRandom::from_seed(9)).unwrap();
        let soundtrack = generator.generate_soundtrack().unwrap();
        let harmony = &soundtrack.tracks()[1];
        assert_eq!(harmony.nb_placed_chords(), Ok(16 + 3));
        let text = harmony.render_text().unwrap();
        assert!(!text.contains('#'), "{}", text);
        assert!(text.starts_with("D5|F5|A5/4"), "{}", text);
    }

    #[test]
    fn soundtrack_ids_are_drawn() {
        let mut generator = Generator::new(settings(4, RandomMethod::Base), SeededRandom::from_seed(12)).unwrap();
        let first = generator.generate_soundtrack().unwrap();
        let second = generator.generate_soundtrack().unwrap();
        assert_eq!(first.id().len(), 8);
        assert_ne!(first.id(), first.name());
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn invalid_settings_are_refused() {
        let result = Generator::new(settings(0, RandomMethod::Base), ScriptedRandom::new(&[]));
        assert!(matches!(result, Err(GeneratorError::InvalidSettings { .. })));

        let mut noisy = settings(4, RandomMethod::HarmonyBase);
        noisy.bonus_randomness = 1_000_000_000;
        let result = Generator::new(noisy, SeededRandom::from_seed(1));
        assert!(matches!(result, Err(GeneratorError::BonusRandomnessTooLarge { .. })));
    }

    #[test]
    fn largest_bonus_randomness_generates() {
        let mut settings = settings(12, RandomMethod::HarmonyBase);
        settings.bonus_randomness = MAX_BONUS_RANDOMNESS;
        let mut generator = Generator::new(settings, SeededRandom::from_seed(1)).unwrap();
        let soundtrack = generator.generate_soundtrack().unwrap();
        assert_eq!(soundtrack.tracks()[0].nb_placed_chords(), Ok(12 + 3));
    }
}
