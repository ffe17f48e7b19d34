// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! A terminal front end: typed commands in, plain text screens out.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use log::debug;
use snafu::{ensure, Snafu};

use crate::quiz::Verdict;
use crate::scale::Scale;
use crate::session::{Action, ActionKind};
use crate::trainer::Trainer;
use crate::view::View;

pub const HELP: &str = "\
Commands:
  start           leave the welcome screen
  play <note>     play a note, by name or number (1-8)
  quiz            start the quiz once every note was played
  guess <note>    guess the note that was played
  replay          play the quiz note again
  next            play the next quiz note
  back            go back to practice
  help            show this list
  quit            leave
";

#[derive(Debug, PartialEq, Snafu)]
pub enum CommandError {
    #[snafu(display("Unknown command {:?}, type `help` for a list of commands", command))]
    UnknownCommand { command: String },
    #[snafu(display("`{}` needs the name or number of a note", command))]
    MissingNote { command: String },
    #[snafu(display("`{}` does not take an argument", command))]
    UnexpectedArgument { command: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    Help,
    Quit,
}

/// Parse one line of input. Empty lines yield no command.
///
/// Notes can be given by their exact name, or by their position in the scale.
pub fn parse_command(line: &str, scale: &Scale) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, argument) = match line.find(char::is_whitespace) {
        Some(split) => (&line[..split], line[split..].trim()),
        None => (line, ""),
    };
    let command = word.to_ascii_lowercase();

    let note = || -> Result<String, CommandError> {
        ensure!(
            !argument.is_empty(),
            MissingNote {
                command: command.clone()
            }
        );
        let by_number = argument
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| scale.get(index));
        Ok(match by_number {
            Some(note) => note.name().to_string(),
            None => argument.to_string(),
        })
    };
    let bare = |parsed: Command| -> Result<Command, CommandError> {
        ensure!(
            argument.is_empty(),
            UnexpectedArgument {
                command: command.clone()
            }
        );
        Ok(parsed)
    };

    let parsed = match command.as_str() {
        "start" | "s" => bare(Command::Act(Action::Start))?,
        "play" | "p" => Command::Act(Action::PlayNote(note()?)),
        "quiz" => bare(Command::Act(Action::AdvanceToQuiz))?,
        "guess" | "g" => Command::Act(Action::Guess(note()?)),
        "replay" | "r" => bare(Command::Act(Action::ReplayCurrent))?,
        "next" | "n" => bare(Command::Act(Action::NextNote))?,
        "back" | "b" => bare(Command::Act(Action::BackToPractice))?,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => {
            return UnknownCommand {
                command: word.to_string(),
            }
            .fail()
        }
    };
    Ok(Some(parsed))
}

fn usage(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Start => "start",
        ActionKind::PlayNote => "play <note>",
        ActionKind::AdvanceToQuiz => "quiz",
        ActionKind::Guess => "guess <note>",
        ActionKind::ReplayCurrent => "replay",
        ActionKind::NextNote => "next",
        ActionKind::BackToPractice => "back",
    }
}

/// Draw a screen as text.
pub fn render(view: &View) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = render_into(view, &mut out);
    out
}

fn render_into(view: &View, out: &mut String) -> std::fmt::Result {
    match view {
        View::Welcome => {
            writeln!(out, "Welcome to Carnatic Notes Player")?;
            writeln!(out, "Click below to hear each note")?;
        }
        View::Practice {
            keys,
            all_auditioned,
        } => {
            writeln!(out, "Carnatic Scale")?;
            writeln!(out, "Learn the notes on a scale!")?;
            writeln!(out)?;
            for (index, key) in keys.iter().enumerate() {
                let played = if key.auditioned { " (played)" } else { "" };
                writeln!(out, "  {}. {}{}", index + 1, key.name, played)?;
            }
            if *all_auditioned {
                writeln!(out)?;
                writeln!(out, "Every note played, time for the quiz!")?;
            }
        }
        View::Quiz { options, verdict } => {
            writeln!(out, "Guess the Note")?;
            writeln!(out, "Listen carefully and pick the note you heard.")?;
            writeln!(out)?;
            for (index, name) in options.iter().enumerate() {
                writeln!(out, "  {}. {}", index + 1, name)?;
            }
            match verdict {
                Some(Verdict::Correct) => {
                    writeln!(out)?;
                    writeln!(out, "Correct!")?;
                }
                Some(Verdict::Incorrect { correct_name }) => {
                    writeln!(out)?;
                    writeln!(out, "Incorrect! The right answer was {}.", correct_name)?;
                }
                None => {}
            }
        }
    }

    let commands: Vec<&str> = view
        .available_actions()
        .into_iter()
        .map(usage)
        .chain(vec!["help", "quit"])
        .collect();
    writeln!(out)?;
    writeln!(out, "Commands: {}", commands.join(", "))
}

/// Read commands line by line and show the resulting screens, until the input ends or `quit`.
pub fn run(trainer: &mut Trainer, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    write!(output, "{}> ", render(&trainer.view()))?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line, trainer.session().scale()) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => write!(output, "{}", HELP)?,
            Ok(Some(Command::Act(action))) => match trainer.dispatch(action) {
                Ok(()) => write!(output, "{}", render(&trainer.view()))?,
                Err(rejection) => {
                    debug!("rejected: {:?}", rejection);
                    writeln!(output, "{}", rejection)?
                }
            },
            Err(err) => writeln!(output, "{}", err)?,
        }
        write!(output, "> ")?;
        output.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Key;
    use expect_test::{expect, Expect};

    fn check(view: View, output: Expect) {
        output.assert_eq(&render(&view));
    }

    fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        parse_command(line, &Scale::carnatic())
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse("  "), Ok(None));
        assert_eq!(parse("start"), Ok(Some(Command::Act(Action::Start))));
        assert_eq!(parse("QUIZ"), Ok(Some(Command::Act(Action::AdvanceToQuiz))));
        assert_eq!(parse("q"), Ok(Some(Command::Quit)));
        assert_eq!(parse("help"), Ok(Some(Command::Help)));
        assert_eq!(
            parse("play Sa (high)"),
            Ok(Some(Command::Act(Action::PlayNote("Sa (high)".into()))))
        );
        assert_eq!(
            parse("guess   Ga "),
            Ok(Some(Command::Act(Action::Guess("Ga".into()))))
        );
    }

    #[test]
    fn notes_by_number() {
        assert_eq!(
            parse("play 1"),
            Ok(Some(Command::Act(Action::PlayNote("Sa".into()))))
        );
        assert_eq!(
            parse("g 8"),
            Ok(Some(Command::Act(Action::Guess("Sa (high)".into()))))
        );
        // out of range numbers are passed on as names
        assert_eq!(
            parse("play 0"),
            Ok(Some(Command::Act(Action::PlayNote("0".into()))))
        );
    }

    #[test]
    fn reports_bad_commands() {
        assert_eq!(
            parse("sing Sa"),
            Err(CommandError::UnknownCommand {
                command: "sing".into()
            })
        );
        assert_eq!(
            parse("play"),
            Err(CommandError::MissingNote {
                command: "play".into()
            })
        );
        assert_eq!(
            parse("next please"),
            Err(CommandError::UnexpectedArgument {
                command: "next".into()
            })
        );
    }

    #[test]
    fn render_welcome() {
        check(
            View::Welcome,
            expect![[r#"
                Welcome to Carnatic Notes Player
                Click below to hear each note

                Commands: start, help, quit
            "#]],
        );
    }

    #[test]
    fn render_practice() {
        let scale = Scale::carnatic();
        let keys = scale
            .names()
            .map(|name| Key {
                name,
                auditioned: name.starts_with('S'),
            })
            .collect();
        check(
            View::Practice {
                keys,
                all_auditioned: false,
            },
            expect![[r#"
                Carnatic Scale
                Learn the notes on a scale!

                  1. Sa (played)
                  2. Ri
                  3. Ga
                  4. Ma
                  5. Pa
                  6. Da
                  7. Ni
                  8. Sa (high) (played)

                Commands: play <note>, help, quit
            "#]],
        );
    }

    #[test]
    fn render_quiz_result() {
        let scale = Scale::carnatic();
        let verdict = Verdict::Incorrect {
            correct_name: "Ga".into(),
        };
        check(
            View::Quiz {
                options: scale.names().collect(),
                verdict: Some(&verdict),
            },
            expect![[r#"
                Guess the Note
                Listen carefully and pick the note you heard.

                  1. Sa
                  2. Ri
                  3. Ga
                  4. Ma
                  5. Pa
                  6. Da
                  7. Ni
                  8. Sa (high)

                Incorrect! The right answer was Ga.

                Commands: replay, next, back, help, quit
            "#]],
        );
    }
}
