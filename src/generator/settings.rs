// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Parameters of a generation run.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::duration::TempoUnit;
use crate::notation::{create_duration, create_time_signature};
use crate::pitch::Octave;
use crate::tonality::Tonality;

use super::{GeneratorError, NotationFailed};

/// How chord roots and melody notes are drawn.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RandomMethod {
    /// Roots drawn uniformly, the melody following the chord roots.
    Base,
    /// Roots drawn from the bonus table, the melody wandering within the chords.
    HarmonyBase,
}

impl FromStr for RandomMethod {
    type Err = GeneratorError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "base" => Ok(RandomMethod::Base),
            "harmony-base" | "bonus-table" => Ok(RandomMethod::HarmonyBase),
            _ => Err(GeneratorError::UnknownRandomMethod {
                name: name.to_string(),
            }),
        }
    }
}

/// What happens to a candidate chord sharing too few notes with the previous one,
/// when dissimilar chords are not simply skipped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DissimilarChordPolicy {
    /// The candidate is added as it is.
    KeepCandidate,
    /// The previous chord is added again, its notes rotated by one.
    ReversePrevious,
}

impl FromStr for DissimilarChordPolicy {
    type Err = GeneratorError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "keep-candidate" => Ok(DissimilarChordPolicy::KeepCandidate),
            "reverse-previous" => Ok(DissimilarChordPolicy::ReversePrevious),
            _ => Err(GeneratorError::UnknownDissimilarChordPolicy {
                name: name.to_string(),
            }),
        }
    }
}

/// Upper bound of the randomness added to the bonuses, ten times the largest bonus.
pub const MAX_BONUS_RANDOMNESS: u32 = 300;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Number of notes in a harmony chord.
    pub chord_width: usize,
    /// Number of chords in the generated tracks, sentinels excluded.
    pub nb_chords: usize,
    pub tempo_bpm: u32,
    pub time_signature_numerator: u32,
    pub time_signature_denominator: u32,
    pub note_octave: u8,
    /// Note value of every generated chord, 4 being a quarter note.
    pub chord_duration: u32,
    pub random_method: RandomMethod,
    /// Notes a chord must share with the previous one to follow it.
    pub similar_note_min: usize,
    /// Whether a dissimilar candidate is handled by the policy instead of being skipped.
    pub reverse_dissimilar_chord: bool,
    pub dissimilar_chord_policy: DissimilarChordPolicy,
    /// Percentage of melody steps moving to a passing note.
    pub inpassing_probability: u32,
    /// Bonus below which a degree is never picked as the next root, unless zero.
    pub min_bonus: u32,
    /// Added to every eligible bonus, flattening the draw.
    pub bonus_randomness: u32,
    pub tonality: Tonality,
    pub generate_harmony: bool,
    pub generate_drums: bool,
    pub generate_bass: bool,
    /// Whether a melody step is played as two chords of half the duration.
    /// When off, the second note of each step is not played.
    pub split_melody_steps: bool,
    /// Candidate chords allowed per requested chord before giving up.
    pub stall_limit: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            chord_width: 3,
            nb_chords: 60,
            tempo_bpm: 60,
            time_signature_numerator: 4,
            time_signature_denominator: 4,
            note_octave: 5,
            chord_duration: 4,
            random_method: RandomMethod::HarmonyBase,
            similar_note_min: 2,
            reverse_dissimilar_chord: false,
            dissimilar_chord_policy: DissimilarChordPolicy::KeepCandidate,
            inpassing_probability: 50,
            min_bonus: 3,
            bonus_randomness: 0,
            tonality: Tonality::default(),
            generate_harmony: true,
            generate_drums: false,
            generate_bass: false,
            split_melody_steps: false,
            stall_limit: 1000,
        }
    }
}

impl GeneratorSettings {
    /// Check the settings before any chord is generated.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let nb_degrees = self.tonality.range.nb_degrees();
        if self.chord_width == 0 || self.chord_width > nb_degrees {
            return Err(GeneratorError::InvalidSettings {
                reason: format!(
                    "the chord width {} is not within 1 and {}",
                    self.chord_width, nb_degrees
                ),
            });
        }
        if self.nb_chords == 0 {
            return Err(GeneratorError::InvalidSettings {
                reason: "at least one chord must be generated".to_string(),
            });
        }
        if self.inpassing_probability > 100 {
            return Err(GeneratorError::InvalidSettings {
                reason: format!("{} is not a percentage", self.inpassing_probability),
            });
        }
        if self.bonus_randomness > MAX_BONUS_RANDOMNESS {
            return Err(GeneratorError::BonusRandomnessTooLarge {
                value: self.bonus_randomness,
                max: MAX_BONUS_RANDOMNESS,
            });
        }
        if self.stall_limit == 0 {
            return Err(GeneratorError::InvalidSettings {
                reason: "the stall limit must allow at least one attempt".to_string(),
            });
        }
        create_time_signature(self.time_signature_numerator, self.time_signature_denominator)
            .context(NotationFailed)?;
        create_duration(self.chord_duration, TempoUnit::Duple).context(NotationFailed)?;
        Octave::pitched(self.note_octave).context(NotationFailed)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::notation::NotationError;
    use crate::tonality::NoteRange;

    #[test]
    fn defaults_are_valid() {
        let settings = GeneratorSettings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.nb_chords, 60);
        assert_eq!(settings.random_method, RandomMethod::HarmonyBase);
    }

    #[test]
    fn invalid_settings() {
        let mut settings = GeneratorSettings::default();
        settings.chord_width = 0;
        assert!(settings.validate().is_err());
        settings.chord_width = 7;
        settings.tonality = Tonality::new(NoteRange::Blues, "C".parse().unwrap());
        assert!(settings.validate().is_err());
        settings.chord_width = 3;
        settings.chord_duration = 3;
        assert_eq!(
            settings.validate(),
            Err(GeneratorError::NotationFailed {
                source: NotationError::UnmappedSubdivision { value: 3 }
            })
        );
    }

    #[test]
    fn bonus_randomness_is_bounded() {
        let mut settings = GeneratorSettings::default();
        settings.bonus_randomness = MAX_BONUS_RANDOMNESS;
        assert_eq!(settings.validate(), Ok(()));
        settings.bonus_randomness = 1_000_000_000;
        assert_eq!(
            settings.validate(),
            Err(GeneratorError::BonusRandomnessTooLarge {
                value: 1_000_000_000,
                max: MAX_BONUS_RANDOMNESS
            })
        );
    }

    #[test]
    fn method_names() {
        assert_eq!("bonus-table".parse(), Ok(RandomMethod::HarmonyBase));
        assert_eq!(
            "markov".parse::<RandomMethod>(),
            Err(GeneratorError::UnknownRandomMethod {
                name: "markov".to_string()
            })
        );
        assert_eq!(
            "reverse-previous".parse(),
            Ok(DissimilarChordPolicy::ReversePrevious)
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: GeneratorSettings = serde_json::from_str(
            r#"{
                "nb_chords": 8,
                "random_method": "base",
                "tonality": { "range": "MinorNatural", "first_chroma": "D" }
            }"#,
        )
        .unwrap();
        assert_eq!(settings.nb_chords, 8);
        assert_eq!(settings.random_method, RandomMethod::Base);
        assert_eq!(settings.tonality.first_chroma.to_string(), "D");
        assert_eq!(settings.chord_width, 3);
        assert!(settings.generate_harmony);
    }
}
