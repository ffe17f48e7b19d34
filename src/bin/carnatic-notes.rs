// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `carnatic-notes` - listen to the notes of the Carnatic scale, then get quizzed on them.

use std::io;

use log::info;
use structopt::StructOpt;

use carnatic_notes::cli;
use carnatic_notes::player::{SilentScheduler, SoxScheduler, ToneScheduler};
use carnatic_notes::quiz::QuizEngine;
use carnatic_notes::rng::Rng;
use carnatic_notes::scale::Scale;
use carnatic_notes::trainer::Trainer;

#[derive(Debug, StructOpt)]
#[structopt(name = "carnatic-notes", about = "Learning the Carnatic scale by ear")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// Seed for choosing quiz notes. Chosen from the clock if not given.
    #[structopt(long)]
    seed: Option<u64>,

    /// Do not play any sound.
    #[structopt(long)]
    mute: bool,

    /// Volume of the tones, between 0 (exclusive) and 1.
    #[structopt(short = "g", long = "gain", default_value = "1.0")]
    gain: f64,
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let scheduler: Box<dyn ToneScheduler> = if opt.mute {
        info!("muted, no tones will be played");
        Box::new(SilentScheduler)
    } else {
        let sox = SoxScheduler::new(opt.gain)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        Box::new(sox)
    };

    let rng = match opt.seed {
        Some(seed) => Rng::new(seed),
        None => Rng::from_clock(),
    };

    let mut trainer = Trainer::new(Scale::carnatic(), QuizEngine::new(rng), scheduler);
    let stdin = io::stdin();
    let stdout = io::stdout();
    cli::run(&mut trainer, stdin.lock(), stdout.lock())
}
