// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of the notes that are taught.

use std::collections::HashSet;

use snafu::{ensure, Snafu};

/// Number of notes in a scale: seven tones plus the repeated upper Sa.
pub const SCALE_LEN: usize = 8;

/// The built-in table, ascending from middle C.
const CARNATIC: [(&str, f64); SCALE_LEN] = [
    ("Sa", 261.63),
    ("Ri", 293.66),
    ("Ga", 329.63),
    ("Ma", 349.23),
    ("Pa", 392.0),
    ("Da", 440.0),
    ("Ni", 493.88),
    ("Sa (high)", 523.25),
];

/// A named pitch.
///
/// # Examples
///
/// ```
/// use carnatic_notes::scale::Note;
///
/// let pa = Note::new("Pa", 392.0);
/// assert_eq!(pa.name(), "Pa");
/// assert_eq!(pa.frequency(), 392.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    name: String,
    frequency: f64,
}

impl Note {
    /// Create a note. The frequency is only checked once the note becomes part of a [`Scale`].
    pub fn new(name: impl Into<String>, frequency: f64) -> Self {
        Self {
            name: name.into(),
            frequency,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }
}

#[derive(Debug, PartialEq, Snafu)]
pub enum ScaleError {
    #[snafu(display("A scale needs exactly {} notes, got {}", SCALE_LEN, count))]
    WrongLength { count: usize },
    #[snafu(display("Note {:?} has invalid frequency {} Hz", name, frequency))]
    InvalidFrequency { name: String, frequency: f64 },
    #[snafu(display("Note name {:?} is used more than once", name))]
    DuplicateName { name: String },
    #[snafu(display("Note {:?} is not higher than the note before it", name))]
    NotAscending { name: String },
}

/// An ordered, immutable octave of notes.
#[derive(Clone, Debug, PartialEq)]
pub struct Scale {
    notes: Vec<Note>,
}

impl Scale {
    /// Build a scale, checking that it has the right size, only positive finite frequencies,
    /// unique names and ascending pitch.
    ///
    /// # Examples
    ///
    /// ```
    /// use carnatic_notes::scale::*;
    ///
    /// let mut notes: Vec<Note> = Scale::carnatic().iter().cloned().collect();
    /// notes[3] = Note::new("Ma", 0.0);
    /// assert!(matches!(Scale::new(notes), Err(ScaleError::InvalidFrequency { .. })));
    /// ```
    pub fn new(notes: Vec<Note>) -> Result<Self, ScaleError> {
        ensure!(
            notes.len() == SCALE_LEN,
            WrongLength { count: notes.len() }
        );

        let mut seen = HashSet::new();
        let mut previous: Option<f64> = None;
        for note in notes.iter() {
            ensure!(
                note.frequency.is_finite() && note.frequency > 0.0,
                InvalidFrequency {
                    name: note.name.clone(),
                    frequency: note.frequency,
                }
            );
            ensure!(
                seen.insert(note.name.as_str()),
                DuplicateName {
                    name: note.name.clone()
                }
            );
            if let Some(previous) = previous {
                ensure!(
                    note.frequency > previous,
                    NotAscending {
                        name: note.name.clone()
                    }
                );
            }
            previous = Some(note.frequency);
        }

        Ok(Self { notes })
    }

    /// The Carnatic scale starting at middle C.
    pub fn carnatic() -> Self {
        let notes = CARNATIC
            .iter()
            .map(|&(name, frequency)| Note::new(name, frequency))
            .collect();
        Self::new(notes).expect("built-in scale table is valid")
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.notes.iter().map(Note::name)
    }

    /// Look up a note by its exact, case-sensitive name.
    pub fn find(&self, name: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.name == name)
    }
}
