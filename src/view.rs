// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! What each screen shows, independent of how it is drawn.

use crate::quiz::Verdict;
use crate::session::{ActionKind, Screen, Session};

/// A note button on the practice screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Key<'a> {
    pub name: &'a str,
    pub auditioned: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum View<'a> {
    Welcome,
    Practice {
        keys: Vec<Key<'a>>,
        all_auditioned: bool,
    },
    /// The quiz never shows the answer, only the verdict once there is one.
    Quiz {
        options: Vec<&'a str>,
        verdict: Option<&'a Verdict>,
    },
}

impl<'a> View<'a> {
    pub fn of(session: &'a Session) -> Self {
        let scale = session.scale();
        match session.screen() {
            Screen::Welcome => View::Welcome,
            Screen::Practice => View::Practice {
                keys: scale
                    .names()
                    .map(|name| Key {
                        name,
                        auditioned: session.has_auditioned(name),
                    })
                    .collect(),
                all_auditioned: session.all_auditioned(),
            },
            Screen::Quiz(question) => View::Quiz {
                options: scale.names().collect(),
                verdict: question.verdict(),
            },
        }
    }

    /// The actions that make sense to offer right now.
    pub fn available_actions(&self) -> Vec<ActionKind> {
        match self {
            View::Welcome => vec![ActionKind::Start],
            View::Practice { all_auditioned, .. } => {
                let mut actions = vec![ActionKind::PlayNote];
                if *all_auditioned {
                    actions.push(ActionKind::AdvanceToQuiz);
                }
                actions
            }
            View::Quiz { verdict, .. } => {
                let mut actions = vec![ActionKind::ReplayCurrent];
                if verdict.is_some() {
                    actions.push(ActionKind::NextNote);
                } else {
                    actions.push(ActionKind::Guess);
                }
                actions.push(ActionKind::BackToPractice);
                actions
            }
        }
    }
}
