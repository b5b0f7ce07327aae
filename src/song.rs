// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! High-level description of a soundtrack that can be handed to rendering and playback.

use std::fmt;

use serde::Serialize;

use crate::chord::PlacedChord;
use crate::duration::TimeSignature;
use crate::notation::NotationError;
use crate::rational::Rational;

/// Separates measures in the text notation.
pub const MEASURE_SEPARATOR: char = ',';
/// Separates chords within a measure in the text notation.
pub const CHORD_SEPARATOR: char = ' ';

/// A bar of music: chords played one after the other under a time signature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Measure {
    index: usize,
    /// The speed of the measure in beats per minute.
    tempo_bpm: u32,
    time_signature: TimeSignature,
    /// `None` until the chord list has been initialised.
    placed_chords: Option<Vec<PlacedChord>>,
}

impl Measure {
    pub(crate) fn new(index: usize, tempo_bpm: u32, time_signature: TimeSignature) -> Measure {
        Measure {
            index,
            tempo_bpm,
            time_signature,
            placed_chords: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tempo_bpm(&self) -> u32 {
        self.tempo_bpm
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    /// Starts an empty chord list, keeping any chords already there.
    pub fn init_chords(&mut self) {
        self.placed_chords.get_or_insert_with(Vec::new);
    }

    pub fn with_chords(mut self, placed_chords: Vec<PlacedChord>) -> Measure {
        self.placed_chords = Some(placed_chords);
        self
    }

    pub fn has_chords(&self) -> bool {
        self.placed_chords.is_some()
    }

    pub fn placed_chords(&self) -> Result<&[PlacedChord], NotationError> {
        self.placed_chords
            .as_deref()
            .ok_or(NotationError::UninitializedChords { measure: self.index })
    }

    pub fn push_chord(&mut self, placed_chord: PlacedChord) -> Result<(), NotationError> {
        let index = self.index;
        self.placed_chords
            .as_mut()
            .ok_or(NotationError::UninitializedChords { measure: index })?
            .push(placed_chord);
        Ok(())
    }

    /// Number of beats the time signature allows in the measure.
    pub fn nb_beats(&self) -> Rational {
        self.time_signature.nb_beats()
    }

    /// Number of beats taken by the chords placed so far.
    pub fn placed_chords_nb_beats(&self) -> Result<Rational, NotationError> {
        Ok(self
            .placed_chords()?
            .iter()
            .map(|chord| chord.beats(self.time_signature, self.tempo_bpm))
            .sum())
    }

    /// Whether the placed chords reach or exceed the beats of the measure.
    pub fn is_full(&self) -> Result<bool, NotationError> {
        Ok(self.placed_chords_nb_beats()? >= self.nb_beats())
    }

    /// The measure in the text notation, chords separated by spaces.
    pub fn render_text(&self) -> Result<String, NotationError> {
        let chords: Vec<String> = self
            .placed_chords()?
            .iter()
            .map(PlacedChord::render_text)
            .collect();
        Ok(chords.join(&CHORD_SEPARATOR.to_string()))
    }
}

/// The musical role a generated track plays.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TrackRole {
    Melody,
    Harmony,
    Drums,
    Bass,
}

impl TrackRole {
    pub fn name(self) -> &'static str {
        match self {
            TrackRole::Melody => "Melody",
            TrackRole::Harmony => "Harmony",
            TrackRole::Drums => "Drums",
            TrackRole::Bass => "Bass",
        }
    }
}

impl fmt::Display for TrackRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A sequence of measures played by one voice or instrument.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Track {
    pub name: String,
    measures: Vec<Measure>,
    /// Whether the rendering collaborator should print chord names above the stave.
    pub display_chord_names: bool,
}

impl Track {
    pub fn new(name: impl Into<String>, measures: Vec<Measure>) -> Track {
        Track {
            name: name.into(),
            measures,
            display_chord_names: false,
        }
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    pub fn has_measures(&self) -> bool {
        !self.measures.is_empty()
    }

    pub fn add_measure(&mut self, measure: Measure) {
        self.measures.push(measure);
    }

    /// The measures in index order, whatever order they were added in.
    pub fn sorted_measures(&self) -> Vec<&Measure> {
        let mut measures: Vec<&Measure> = self.measures.iter().collect();
        measures.sort_by_key(|measure| measure.index());
        measures
    }

    /// Total number of chords over all the measures of the track.
    pub fn nb_placed_chords(&self) -> Result<usize, NotationError> {
        let mut total = 0;
        for measure in &self.measures {
            total += measure.placed_chords()?.len();
        }
        Ok(total)
    }

    /// The track in the text notation, measures separated by commas.
    pub fn render_text(&self) -> Result<String, NotationError> {
        let measures = self
            .sorted_measures()
            .into_iter()
            .map(Measure::render_text)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(measures.join(&format!("{} ", MEASURE_SEPARATOR)))
    }
}

/// Opaque reference to the sheet drawn by the rendering collaborator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SheetHandle(pub u64);

/// Opaque reference to the synthesizer driven by the playback collaborator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SynthHandle(pub u64);

/// A description of a complete soundtrack, its tracks playing simultaneously.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Soundtrack {
    id: String,
    name: String,
    tracks: Vec<Track>,
    copyright: String,
    lyrics: String,
    #[serde(skip)]
    sheet: Option<SheetHandle>,
    #[serde(skip)]
    synth: Option<SynthHandle>,
}

impl Soundtrack {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Soundtrack {
        Soundtrack {
            id: id.into(),
            name: name.into(),
            tracks: Vec::new(),
            copyright: String::new(),
            lyrics: String::new(),
            sheet: None,
            synth: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Adds a track built from the given measures and hands it back for naming.
    pub fn add_track(&mut self, measures: Vec<Measure>) -> &mut Track {
        let name = format!("Track {}", self.tracks.len() + 1);
        self.tracks.push(Track::new(name, measures));
        let last = self.tracks.len() - 1;
        &mut self.tracks[last]
    }

    pub fn copyright(&self) -> &str {
        &self.copyright
    }

    pub fn set_copyright(&mut self, copyright: impl Into<String>) {
        self.copyright = copyright.into();
    }

    pub fn lyrics(&self) -> &str {
        &self.lyrics
    }

    pub fn set_lyrics(&mut self, lyrics: impl Into<String>) {
        self.lyrics = lyrics.into();
    }

    pub fn sheet(&self) -> Option<SheetHandle> {
        self.sheet
    }

    pub fn set_sheet_handle(&mut self, handle: SheetHandle) {
        self.sheet = Some(handle);
    }

    pub fn synth(&self) -> Option<SynthHandle> {
        self.synth
    }

    pub fn set_synth_handle(&mut self, handle: SynthHandle) {
        self.synth = Some(handle);
    }

    /// All tracks in the text notation, one block per track headed by its name.
    pub fn render_text(&self) -> Result<String, NotationError> {
        let mut text = String::new();
        for track in &self.tracks {
            text.push_str(&format!("[{}]\n{}\n", track.name, track.render_text()?));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn uninitialized_chords() {
        let mut measure = Measure::new(3, 60, TimeSignature::default());
        assert_eq!(
            measure.placed_chords(),
            Err(NotationError::UninitializedChords { measure: 3 })
        );
        assert!(measure.placed_chords_nb_beats().is_err());
        measure.init_chords();
        assert_eq!(measure.placed_chords_nb_beats(), Ok(Rational::zero()));
        assert_eq!(measure.is_full(), Ok(false));
    }

    #[test]
    fn sorted_measures_follow_index() {
        let mut track = Track::new("t", Vec::new());
        for index in &[2, 0, 1] {
            track.add_measure(Measure::new(*index, 60, TimeSignature::default()).with_chords(Vec::new()));
        }
        let indices: Vec<usize> = track.sorted_measures().iter().map(|m| m.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(track.nb_placed_chords(), Ok(0));
    }

    #[test]
    fn soundtrack_setters() {
        let mut soundtrack = Soundtrack::new("id", "first");
        assert!(!soundtrack.has_tracks());
        soundtrack.set_name("second");
        soundtrack.add_track(Vec::new()).name = "Melody".to_string();
        soundtrack.set_synth_handle(SynthHandle(7));
        assert_eq!(soundtrack.name(), "second");
        assert_eq!(soundtrack.tracks()[0].name, "Melody");
        assert_eq!(soundtrack.synth(), Some(SynthHandle(7)));
        let json = serde_json::to_string(&soundtrack).unwrap();
        assert!(!json.contains("synth"));
    }
}
