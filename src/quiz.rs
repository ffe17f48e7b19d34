// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Picking quiz questions and judging answers.

use crate::rng::Rng;
use crate::scale::{Note, Scale};

/// Outcome of a guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect { correct_name: String },
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// Chooses the notes that are asked for.
#[derive(Clone, Debug)]
pub struct QuizEngine {
    rng: Rng,
}

impl QuizEngine {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }

    /// An engine that asks the same questions for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Rng::new(seed))
    }

    /// Pick any note of the scale with equal probability, independent of earlier picks.
    pub fn pick_next(&mut self, scale: &Scale) -> Note {
        let index = self.rng.below(scale.len());
        scale
            .get(index)
            .cloned()
            .expect("index is below the scale length")
    }
}

/// Compare a guessed name against the answer. Names must match exactly, including case.
/// Without a question there is nothing to judge, and no verdict.
///
/// # Examples
///
/// ```
/// use carnatic_notes::quiz::*;
/// use carnatic_notes::scale::Note;
///
/// let ga = Note::new("Ga", 329.63);
/// assert_eq!(evaluate("Ga", Some(&ga)), Some(Verdict::Correct));
/// assert_eq!(
///     evaluate("Ma", Some(&ga)),
///     Some(Verdict::Incorrect { correct_name: "Ga".into() })
/// );
/// assert_eq!(evaluate("Ga", None), None);
/// ```
pub fn evaluate(guess: &str, answer: Option<&Note>) -> Option<Verdict> {
    let answer = answer?;
    if guess == answer.name() {
        Some(Verdict::Correct)
    } else {
        Some(Verdict::Incorrect {
            correct_name: answer.name().to_string(),
        })
    }
}
