// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Note lengths and time signatures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::notation::NotationError;
use crate::rational::Rational;

/// Ticks per quarter note, as in the usual MIDI resolution.
pub const TICKS_PER_QUARTER: i64 = 480;

/// Note values, named after the fraction of a whole note they take.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Subdivision {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
}

impl Subdivision {
    /// Map a note value such as `4` for a quarter note to its subdivision.
    ///
    /// ```
    /// use tonal_gen::duration::Subdivision;
    ///
    /// assert_eq!(Subdivision::from_value(8), Some(Subdivision::Eighth));
    /// assert_eq!(Subdivision::from_value(3), None);
    /// ```
    pub fn from_value(value: u32) -> Option<Subdivision> {
        match value {
            1 => Some(Subdivision::Whole),
            2 => Some(Subdivision::Half),
            4 => Some(Subdivision::Quarter),
            8 => Some(Subdivision::Eighth),
            16 => Some(Subdivision::Sixteenth),
            32 => Some(Subdivision::ThirtySecond),
            64 => Some(Subdivision::SixtyFourth),
            _ => None,
        }
    }

    pub fn value(self) -> u32 {
        match self {
            Subdivision::Whole => 1,
            Subdivision::Half => 2,
            Subdivision::Quarter => 4,
            Subdivision::Eighth => 8,
            Subdivision::Sixteenth => 16,
            Subdivision::ThirtySecond => 32,
            Subdivision::SixtyFourth => 64,
        }
    }

    /// The subdivision lasting half as long, if there is one.
    pub fn half(self) -> Option<Subdivision> {
        Subdivision::from_value(self.value() * 2)
    }
}

/// How the numeric value of a duration is to be read.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TempoUnit {
    /// A note value relative to the whole note.
    Duple,
    /// A note value played as part of a triplet.
    Triplet,
    /// MIDI ticks.
    Tick,
    /// Wall clock seconds.
    Second,
    /// Whole measures.
    Measure,
    /// Beats at the tempo of the measure.
    Bpm,
}

impl TempoUnit {
    /// Whether the unit only makes sense with a value mapping to a [`Subdivision`].
    pub fn demands_subdivision(self) -> bool {
        matches!(self, TempoUnit::Duple | TempoUnit::Triplet)
    }

    /// Suffix used when handing a duration to the playback collaborator.
    pub fn suffix(self) -> &'static str {
        match self {
            TempoUnit::Duple => "n",
            TempoUnit::Triplet => "t",
            TempoUnit::Tick => "i",
            TempoUnit::Second => "s",
            TempoUnit::Measure => "m",
            TempoUnit::Bpm => "hz",
        }
    }
}

impl FromStr for TempoUnit {
    type Err = NotationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "n" | "duple" => Ok(TempoUnit::Duple),
            "t" | "triplet" => Ok(TempoUnit::Triplet),
            "i" | "tick" => Ok(TempoUnit::Tick),
            "s" | "second" => Ok(TempoUnit::Second),
            "m" | "measure" => Ok(TempoUnit::Measure),
            "hz" | "bpm" => Ok(TempoUnit::Bpm),
            _ => Err(NotationError::UnknownTempoUnit {
                value: text.to_string(),
            }),
        }
    }
}

/// The numeric part of a duration.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum DurationValue {
    Subdivision(Subdivision),
    Raw(u32),
}

/// How long a chord is held.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct Duration {
    value: DurationValue,
    unit: TempoUnit,
}

impl Duration {
    /// Build a duration, checking that the value is meaningful for the unit.
    pub fn new(value: u32, unit: TempoUnit) -> Result<Duration, NotationError> {
        let value = if unit.demands_subdivision() {
            let subdivision = Subdivision::from_value(value)
                .ok_or(NotationError::UnmappedSubdivision { value })?;
            DurationValue::Subdivision(subdivision)
        } else if value == 0 {
            return Err(NotationError::UnmappedSubdivision { value });
        } else {
            DurationValue::Raw(value)
        };
        Ok(Duration { value, unit })
    }

    pub fn from_subdivision(subdivision: Subdivision) -> Duration {
        Duration {
            value: DurationValue::Subdivision(subdivision),
            unit: TempoUnit::Duple,
        }
    }

    pub fn value(&self) -> DurationValue {
        self.value
    }

    pub fn unit(&self) -> TempoUnit {
        self.unit
    }

    pub fn render_value(&self) -> u32 {
        match self.value {
            DurationValue::Subdivision(subdivision) => subdivision.value(),
            DurationValue::Raw(raw) => raw,
        }
    }

    /// The duration as understood by the playback collaborator, e.g. `4n`.
    pub fn render_with_unit(&self) -> String {
        format!("{}{}", self.render_value(), self.unit.suffix())
    }

    /// The same kind of duration lasting half as long.
    pub fn halved(&self) -> Option<Duration> {
        let value = match self.value {
            DurationValue::Subdivision(subdivision) => {
                DurationValue::Subdivision(subdivision.half()?)
            }
            DurationValue::Raw(raw) if raw % 2 == 0 => DurationValue::Raw(raw / 2),
            DurationValue::Raw(_) => return None,
        };
        Some(Duration {
            value,
            unit: self.unit,
        })
    }

    /// Number of beats the duration takes in a measure of the given signature and tempo.
    ///
    /// ```
    /// use tonal_gen::duration::*;
    /// use tonal_gen::rational::Rational;
    ///
    /// let four_four = TimeSignature::new(4, 4).unwrap();
    /// let eighth = Duration::new(8, TempoUnit::Duple).unwrap();
    /// assert_eq!(eighth.beats(four_four, 60), Rational::new(1, 2));
    /// let triplet = Duration::new(8, TempoUnit::Triplet).unwrap();
    /// assert_eq!(triplet.beats(four_four, 60), Rational::new(1, 3));
    /// ```
    pub fn beats(&self, time_signature: TimeSignature, tempo_bpm: u32) -> Rational {
        let beat_unit = time_signature.denominator() as i64;
        let value = self.render_value() as i64;
        match self.unit {
            TempoUnit::Duple => Rational::new(beat_unit, value),
            TempoUnit::Triplet => Rational::new(beat_unit, value) * 2 / 3,
            TempoUnit::Tick => Rational::new(value * beat_unit, TICKS_PER_QUARTER * 4),
            TempoUnit::Second => Rational::new(value * tempo_bpm as i64, 60),
            TempoUnit::Measure => Rational::from_int(value * time_signature.numerator() as i64),
            TempoUnit::Bpm => Rational::from_int(value),
        }
    }

    /// Wall clock length of the duration.
    pub fn seconds(&self, time_signature: TimeSignature, tempo_bpm: u32) -> f64 {
        self.beats(time_signature, tempo_bpm).to_f64() * 60.0 / tempo_bpm as f64
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_with_unit())
    }
}

/// Number of beats per measure over the note value of one beat.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct TimeSignature {
    numerator: u32,
    denominator: u32,
}

impl TimeSignature {
    pub fn new(numerator: u32, denominator: u32) -> Result<TimeSignature, NotationError> {
        if numerator == 0 || denominator == 0 {
            return Err(NotationError::InvalidTimeSignature {
                numerator,
                denominator,
            });
        }
        Ok(TimeSignature {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    pub fn nb_beats(&self) -> Rational {
        Rational::from_int(self.numerator as i64)
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature {
            numerator: 4,
            denominator: 4,
        }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unmapped_subdivision() {
        assert_eq!(
            Duration::new(6, TempoUnit::Duple),
            Err(NotationError::UnmappedSubdivision { value: 6 })
        );
        assert_eq!(Duration::new(6, TempoUnit::Tick).unwrap().render_value(), 6);
        assert!(Duration::new(0, TempoUnit::Second).is_err());
    }

    #[test]
    fn beats_per_unit() {
        let three_eight = TimeSignature::new(3, 8).unwrap();
        let quarter = Duration::new(4, TempoUnit::Duple).unwrap();
        assert_eq!(quarter.beats(three_eight, 120), Rational::from_int(2));
        let measure = Duration::new(2, TempoUnit::Measure).unwrap();
        assert_eq!(measure.beats(three_eight, 120), Rational::from_int(6));
        let ticks = Duration::new(480, TempoUnit::Tick).unwrap();
        assert_eq!(ticks.beats(TimeSignature::default(), 120), Rational::one());
        let second = Duration::new(1, TempoUnit::Second).unwrap();
        assert_eq!(second.beats(TimeSignature::default(), 120), Rational::from_int(2));
    }

    #[test]
    fn seconds_at_tempo() {
        let half = Duration::new(2, TempoUnit::Duple).unwrap();
        assert!((half.seconds(TimeSignature::default(), 120) - 1.0).abs() < 1e-9);
        assert_eq!(half.render_with_unit(), "2n");
    }

    #[test]
    fn halving() {
        let quarter = Duration::new(4, TempoUnit::Duple).unwrap();
        assert_eq!(quarter.halved().unwrap().render_value(), 8);
        let shortest = Duration::new(64, TempoUnit::Duple).unwrap();
        assert_eq!(shortest.halved(), None);
    }

    #[test]
    fn invalid_time_signature() {
        assert_eq!(
            TimeSignature::new(0, 4),
            Err(NotationError::InvalidTimeSignature {
                numerator: 0,
                denominator: 4
            })
        );
    }
}
