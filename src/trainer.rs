// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Ties the session to the quiz engine and to the speakers.

use log::warn;

use crate::player::ToneScheduler;
use crate::quiz::QuizEngine;
use crate::scale::Scale;
use crate::session::{Action, Effect, Rejection, Session};
use crate::view::View;

pub struct Trainer {
    session: Session,
    quiz: QuizEngine,
    scheduler: Box<dyn ToneScheduler>,
}

impl Trainer {
    pub fn new(scale: Scale, quiz: QuizEngine, scheduler: Box<dyn ToneScheduler>) -> Self {
        Self {
            session: Session::new(scale),
            quiz,
            scheduler,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> View<'_> {
        View::of(&self.session)
    }

    /// Apply a user action and play the tones it asks for.
    ///
    /// Tones are best effort: a tone that cannot be played is logged,
    /// and the session moves on as if it had sounded.
    pub fn dispatch(&mut self, action: Action) -> Result<(), Rejection> {
        let effects = self.session.update(action, &mut self.quiz)?;
        for effect in effects {
            match effect {
                Effect::PlayTone(note) => {
                    if let Err(err) = self.scheduler.play(note.frequency()) {
                        warn!("{} stays silent: {}", note.name(), err);
                    }
                }
            }
        }
        Ok(())
    }
}
