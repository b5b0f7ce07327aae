// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `soundgen` - generates chord progressions and melodies, and names the chords of written ones.

use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use simple_logger;
use structopt::StructOpt;

use tonal_gen::generator::{
    Generator, GeneratorSettings, RandomMethod, RandomSource, SeededRandom, ThreadRandom,
};
use tonal_gen::notation::{self, NotationError};
use tonal_gen::pitch::Chroma;
use tonal_gen::song::Soundtrack;
use tonal_gen::tonality::{NoteRange, Tonality};

#[derive(Debug, StructOpt)]
#[structopt(name = "soundgen", about = "Generating chord progressions and melodies")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Generate a soundtrack and print it in the text notation.
    Generate(GenerateOpt),
    /// Parse measures written in the text notation and name their chords.
    Parse(ParseOpt),
}

#[derive(Debug, StructOpt)]
struct GenerateOpt {
    /// JSON file with the generator settings. Missing fields take their defaults.
    #[structopt(short, long, parse(from_os_str))]
    settings: Option<PathBuf>,

    /// Seed of the random generator. A fresh seed is drawn if not given.
    #[structopt(long)]
    seed: Option<u64>,

    /// Number of chords to generate.
    #[structopt(long)]
    chords: Option<usize>,

    /// Number of notes in a harmony chord.
    #[structopt(long)]
    width: Option<usize>,

    #[structopt(long)]
    tempo: Option<u32>,

    #[structopt(long)]
    octave: Option<u8>,

    /// Either `base` or `harmony-base`.
    #[structopt(long)]
    method: Option<RandomMethod>,

    /// One of `major`, `minor`, `minor-harmonic`, `minor-melodic` or `blues`.
    #[structopt(long)]
    range: Option<NoteRange>,

    /// First chroma of the tonality, e.g. `F#`.
    #[structopt(long)]
    tonic: Option<Chroma>,

    #[structopt(long)]
    no_harmony: bool,

    #[structopt(long)]
    drums: bool,

    #[structopt(long)]
    bass: bool,

    /// Also write the soundtrack as JSON to this file.
    #[structopt(long, parse(from_os_str))]
    json: Option<PathBuf>,
}

#[derive(Debug, StructOpt)]
struct ParseOpt {
    /// File holding the measures, separated by commas.
    #[structopt(parse(from_os_str))]
    source: PathBuf,

    #[structopt(long, default_value = "60")]
    tempo: u32,
}

fn invalid_data<E: std::error::Error + Send + Sync + 'static>(error: E) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, error)
}

fn load_settings(opt: &GenerateOpt) -> io::Result<GeneratorSettings> {
    let mut settings = match &opt.settings {
        Some(path) => {
            let source = std::fs::read_to_string(path)?;
            serde_json::from_str(&source).map_err(invalid_data)?
        }
        None => GeneratorSettings::default(),
    };
    if let Some(chords) = opt.chords {
        settings.nb_chords = chords;
    }
    if let Some(width) = opt.width {
        settings.chord_width = width;
    }
    if let Some(tempo) = opt.tempo {
        settings.tempo_bpm = tempo;
    }
    if let Some(octave) = opt.octave {
        settings.note_octave = octave;
    }
    if let Some(method) = opt.method {
        settings.random_method = method;
    }
    let range = opt.range.unwrap_or(settings.tonality.range);
    let first_chroma = opt.tonic.unwrap_or(settings.tonality.first_chroma);
    settings.tonality = Tonality::new(range, first_chroma);
    settings.generate_harmony &= !opt.no_harmony;
    settings.generate_drums |= opt.drums;
    settings.generate_bass |= opt.bass;
    Ok(settings)
}

fn generate_with<R: RandomSource>(settings: GeneratorSettings, random: R) -> io::Result<Soundtrack> {
    let mut generator = Generator::new(settings, random).map_err(invalid_data)?;
    generator.generate_soundtrack().map_err(invalid_data)
}

fn generate(opt: GenerateOpt) -> io::Result<()> {
    let settings = load_settings(&opt)?;
    debug!("{:?}", settings);
    let soundtrack = match opt.seed {
        Some(seed) => generate_with(settings, SeededRandom::from_seed(seed))?,
        None => generate_with(settings, ThreadRandom::new())?,
    };
    info!("Generated {}", soundtrack.name());

    print!("{}", soundtrack.render_text().map_err(invalid_data)?);
    if let Some(path) = opt.json.as_deref() {
        write_json(&soundtrack, path)?;
    }
    Ok(())
}

fn write_json(soundtrack: &Soundtrack, path: &Path) -> io::Result<()> {
    let f = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(f, soundtrack).map_err(invalid_data)?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn parse(opt: ParseOpt) -> io::Result<()> {
    let source = std::fs::read_to_string(&opt.source)?;
    let signature = notation::default_time_signature();
    let measures = notation::parse_measures(
        &source,
        opt.tempo,
        signature.numerator(),
        signature.denominator(),
        0.5,
    )
    .map_err(invalid_data)?;

    for measure in &measures {
        for placed_chord in measure.placed_chords().map_err(invalid_data)? {
            let name = match notation::chord_to_syllabic(placed_chord) {
                Ok(name) => name,
                Err(err @ NotationError::ChordTooNarrow { .. })
                | Err(err @ NotationError::NoteNotInTonality { .. }) => {
                    debug!("{}: {}", placed_chord.render_text(), err);
                    "-".to_string()
                }
                Err(err) => return Err(invalid_data(err)),
            };
            println!("{}\t{}\t{}", measure.index(), placed_chord.render_text(), name);
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level).map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

    match opt.command {
        Command::Generate(opt) => generate(opt),
        Command::Parse(opt) => parse(opt),
    }
}
