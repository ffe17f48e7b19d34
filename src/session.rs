// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The screens of the trainer and how user actions move between them.
//!
//! A [`Session`] only changes state. Sounds it wants played are returned
//! as [`Effect`]s, so the whole flow can be exercised without any audio.

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, info};
use snafu::{ensure, Snafu};

use crate::quiz::{self, QuizEngine, Verdict};
use crate::scale::{Note, Scale};

/// The note currently asked for, and the verdict once it was guessed.
#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    note: Note,
    verdict: Option<Verdict>,
}

impl Question {
    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn is_answered(&self) -> bool {
        self.verdict.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Welcome,
    Practice,
    Quiz(Question),
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Welcome => ScreenKind::Welcome,
            Screen::Practice => ScreenKind::Practice,
            Screen::Quiz(_) => ScreenKind::Quiz,
        }
    }
}

/// A screen without its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenKind {
    Welcome,
    Practice,
    Quiz,
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ScreenKind::Welcome => "welcome",
            ScreenKind::Practice => "practice",
            ScreenKind::Quiz => "quiz",
        };
        f.write_str(name)
    }
}

/// Everything a user can do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    PlayNote(String),
    AdvanceToQuiz,
    Guess(String),
    ReplayCurrent,
    NextNote,
    BackToPractice,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Start => ActionKind::Start,
            Action::PlayNote(_) => ActionKind::PlayNote,
            Action::AdvanceToQuiz => ActionKind::AdvanceToQuiz,
            Action::Guess(_) => ActionKind::Guess,
            Action::ReplayCurrent => ActionKind::ReplayCurrent,
            Action::NextNote => ActionKind::NextNote,
            Action::BackToPractice => ActionKind::BackToPractice,
        }
    }
}

/// An action without its argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Start,
    PlayNote,
    AdvanceToQuiz,
    Guess,
    ReplayCurrent,
    NextNote,
    BackToPractice,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ActionKind::Start => "Starting",
            ActionKind::PlayNote => "Playing a note",
            ActionKind::AdvanceToQuiz => "Going to the quiz",
            ActionKind::Guess => "Guessing",
            ActionKind::ReplayCurrent => "Replaying the note",
            ActionKind::NextNote => "Asking for the next note",
            ActionKind::BackToPractice => "Going back to practice",
        };
        f.write_str(name)
    }
}

/// Something the session wants to happen outside of itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    PlayTone(Note),
}

/// Why an action was ignored. The session is left untouched in all of these cases.
#[derive(Debug, PartialEq, Snafu)]
pub enum Rejection {
    #[snafu(display("{} is not possible on the {} screen", action, screen))]
    NotAvailable {
        action: ActionKind,
        screen: ScreenKind,
    },
    #[snafu(display("There is no note called {:?}", name))]
    UnknownNote { name: String },
    #[snafu(display("Play every note first, still missing: {}", missing.join(", ")))]
    NotAllAuditioned { missing: Vec<String> },
    #[snafu(display("This note was already guessed, ask for the next one"))]
    GuessWhileAnswered,
    #[snafu(display("Guess the current note before moving on"))]
    NextNoteWithoutResult,
}

/// State of one run of the trainer, from the welcome screen onwards.
#[derive(Clone, Debug)]
pub struct Session {
    scale: Scale,
    screen: Screen,
    /// Names of the notes played on the practice screen so far.
    auditioned: BTreeSet<String>,
}

impl Session {
    pub fn new(scale: Scale) -> Self {
        Self {
            scale,
            screen: Screen::Welcome,
            auditioned: BTreeSet::new(),
        }
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn has_auditioned(&self, name: &str) -> bool {
        self.auditioned.contains(name)
    }

    pub fn auditioned(&self) -> impl Iterator<Item = &str> {
        self.auditioned.iter().map(String::as_str)
    }

    /// Names of the notes that still have to be played before the quiz opens, in scale order.
    pub fn missing(&self) -> Vec<String> {
        self.scale
            .names()
            .filter(|name| !self.has_auditioned(name))
            .map(str::to_string)
            .collect()
    }

    pub fn all_auditioned(&self) -> bool {
        self.scale.names().all(|name| self.has_auditioned(name))
    }

    pub fn question(&self) -> Option<&Question> {
        match &self.screen {
            Screen::Quiz(question) => Some(question),
            _ => None,
        }
    }

    /// Apply a user action.
    /// On success, returns the effects to carry out. On rejection, nothing changed.
    pub fn update(
        &mut self,
        action: Action,
        quiz: &mut QuizEngine,
    ) -> Result<Vec<Effect>, Rejection> {
        debug!("{:?} on the {} screen", action, self.screen.kind());
        let screen = self.screen.kind();
        let kind = action.kind();
        let unavailable = || NotAvailable {
            action: kind,
            screen,
        };

        match action {
            Action::Start => {
                ensure!(screen == ScreenKind::Welcome, unavailable());
                self.show(Screen::Practice);
                Ok(vec![])
            }
            Action::PlayNote(name) => {
                ensure!(screen == ScreenKind::Practice, unavailable());
                let note = self.note_named(&name)?;
                self.auditioned.insert(name);
                Ok(vec![Effect::PlayTone(note)])
            }
            Action::AdvanceToQuiz => {
                ensure!(screen == ScreenKind::Practice, unavailable());
                let missing = self.missing();
                ensure!(missing.is_empty(), NotAllAuditioned { missing });
                Ok(self.ask_next(quiz))
            }
            Action::Guess(name) => {
                let question = match &mut self.screen {
                    Screen::Quiz(question) => question,
                    _ => return unavailable().fail(),
                };
                ensure!(!question.is_answered(), GuessWhileAnswered);
                ensure!(
                    self.scale.find(&name).is_some(),
                    UnknownNote { name: name.clone() }
                );
                let verdict = quiz::evaluate(&name, Some(&question.note));
                info!("guessed {:?} for {:?}: {:?}", name, question.note.name(), verdict);
                question.verdict = verdict;
                Ok(vec![])
            }
            Action::ReplayCurrent => match &self.screen {
                Screen::Quiz(question) => Ok(vec![Effect::PlayTone(question.note.clone())]),
                _ => unavailable().fail(),
            },
            Action::NextNote => {
                let answered = match &self.screen {
                    Screen::Quiz(question) => question.is_answered(),
                    _ => return unavailable().fail(),
                };
                ensure!(answered, NextNoteWithoutResult);
                Ok(self.ask_next(quiz))
            }
            Action::BackToPractice => {
                ensure!(screen == ScreenKind::Quiz, unavailable());
                self.show(Screen::Practice);
                Ok(vec![])
            }
        }
    }

    fn note_named(&self, name: &str) -> Result<Note, Rejection> {
        match self.scale.find(name) {
            Some(note) => Ok(note.clone()),
            None => UnknownNote { name }.fail(),
        }
    }

    /// Entering the quiz, or moving on to the next question, always poses exactly one new question.
    fn ask_next(&mut self, quiz: &mut QuizEngine) -> Vec<Effect> {
        let note = quiz.pick_next(&self.scale);
        debug!("asking for {:?}", note.name());
        self.show(Screen::Quiz(Question {
            note: note.clone(),
            verdict: None,
        }));
        vec![Effect::PlayTone(note)]
    }

    fn show(&mut self, screen: Screen) {
        if screen.kind() != self.screen.kind() {
            info!("showing the {} screen", screen.kind());
        }
        self.screen = screen;
    }
}
