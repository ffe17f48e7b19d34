// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Playing single fading tones.
//!
//! The rest of the application only talks to a [`ToneScheduler`]. A scheduler
//! accepts a tone and returns right away; the tone then plays on its own
//! until it has faded out.

use std::io;
use std::path::PathBuf;
use std::thread;

use log::{debug, error, info};
use snafu::{ensure, ResultExt, Snafu};

use crate::audio::{self, sox::SoxSink, AudioContext, AudioSink};
use crate::oscillator::WaveShape;
use crate::wave::AudioBuffer;

pub const SAMPLE_RATE: i32 = 44100;

/// How long a tone lasts by default, in seconds.
pub const TONE_SECONDS: f64 = 1.0;

/// Gain the envelope fades to. Exponential ramps cannot reach zero.
pub const FADE_FLOOR: f64 = 0.00001;

/// Tones at or above this frequency cannot be represented at [`SAMPLE_RATE`].
pub const NYQUIST_FREQUENCY: f64 = SAMPLE_RATE as f64 / 2.0;

// 10 ms buffer at 44100 Hz
const BUFFER_SIZE: usize = 441;

#[derive(Debug, Snafu)]
pub enum ToneError {
    #[snafu(display("Cannot play a tone at {} Hz", frequency))]
    InvalidFrequency { frequency: f64 },
    #[snafu(display("Cannot play a tone for {} seconds", duration))]
    InvalidDuration { duration: f64 },
    #[snafu(display("Invalid output level {}, expected a value in (0, 1]", level))]
    InvalidLevel { level: f64 },
    #[snafu(display("Could not schedule the fade out: {}", source))]
    Envelope { source: audio::ScheduleError },
    #[snafu(display("No audio output available: {}", source))]
    AudioUnavailable { source: io::Error },
}

/// A validated request for a single tone.
///
/// # Examples
///
/// ```
/// use carnatic_notes::player::ToneSpec;
///
/// assert!(ToneSpec::new(440.0, 1.0).is_ok());
/// assert!(ToneSpec::new(0.0, 1.0).is_err());
/// assert!(ToneSpec::new(-261.63, 1.0).is_err());
/// assert!(ToneSpec::new(440.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    frequency: f64,
    duration: f64,
}

impl ToneSpec {
    pub fn new(frequency: f64, duration: f64) -> Result<Self, ToneError> {
        ensure!(
            frequency.is_finite() && frequency > 0.0 && frequency < NYQUIST_FREQUENCY,
            InvalidFrequency { frequency }
        );
        ensure!(
            duration.is_finite() && duration > 0.0,
            InvalidDuration { duration }
        );
        Ok(Self {
            frequency,
            duration,
        })
    }

    /// A tone of the default length.
    pub fn note(frequency: f64) -> Result<Self, ToneError> {
        Self::new(frequency, TONE_SECONDS)
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

/// Accepts tones and plays them in the background.
///
/// Tones are independent of each other: submitting a tone while another is
/// still sounding lets both play, nothing is queued or cancelled.
pub trait ToneScheduler {
    fn submit(&self, tone: ToneSpec) -> Result<(), ToneError>;

    /// Play a tone of the default length.
    fn play(&self, frequency: f64) -> Result<(), ToneError> {
        self.submit(ToneSpec::note(frequency)?)
    }
}

/// Build the voice for a tone: a sine that starts now, and fades out
/// exponentially from `level` to [`FADE_FLOOR`] until it stops.
pub fn tone_voice(
    ctx: &AudioContext,
    tone: ToneSpec,
    level: f64,
) -> Result<audio::Voice, ToneError> {
    let start = ctx.now();
    let stop = ctx.after(tone.duration);

    let mut source = ctx.create_tone_source(WaveShape::Sine, tone.frequency);
    let mut gain = ctx.create_gain_envelope();
    gain.set_level(level);
    gain.exponential_ramp_to(FADE_FLOOR, start, stop)
        .context(Envelope)?;

    source.start(start);
    source.stop(stop);
    Ok(ctx.connect(source, gain))
}

/// Render a whole tone into the sink, returning once the tone stopped.
pub fn render_tone(
    sample_rate: i32,
    tone: ToneSpec,
    level: f64,
    sink: &mut dyn AudioSink,
) -> Result<(), ToneError> {
    let mut ctx = AudioContext::new(sample_rate as f64);
    let mut voice = tone_voice(&ctx, tone, level)?;
    let stop = voice.stop_time().unwrap_or_else(|| ctx.now());

    let mut buffer = AudioBuffer::new(BUFFER_SIZE);
    while ctx.now() < stop {
        let remaining = stop - ctx.now();
        if remaining < buffer.len() {
            buffer = AudioBuffer::new(remaining);
        }
        ctx.render(&mut voice, &mut buffer, sink)
            .context(AudioUnavailable)?;
    }
    Ok(())
}

fn check_level(level: f64) -> Result<f64, ToneError> {
    ensure!(level > 0.0 && level <= 1.0, InvalidLevel { level });
    Ok(level)
}

/// Plays tones through a separate sox `play` process per tone.
pub struct SoxScheduler {
    player: PathBuf,
    sample_rate: i32,
    level: f64,
}

impl SoxScheduler {
    pub fn new(level: f64) -> Result<Self, ToneError> {
        Self::with_player(audio::sox::default_player(), level)
    }

    pub fn with_player(player: impl Into<PathBuf>, level: f64) -> Result<Self, ToneError> {
        Ok(Self {
            player: player.into(),
            sample_rate: SAMPLE_RATE,
            level: check_level(level)?,
        })
    }
}

impl ToneScheduler for SoxScheduler {
    fn submit(&self, tone: ToneSpec) -> Result<(), ToneError> {
        // Acquire the output up front so that a missing audio device is reported to the caller.
        let mut sink =
            SoxSink::new(&self.player, self.sample_rate).context(AudioUnavailable)?;

        let sample_rate = self.sample_rate;
        let level = self.level;
        info!(
            "playing {:.2} Hz for {:.2} seconds",
            tone.frequency, tone.duration
        );
        thread::spawn(move || {
            if let Err(err) = render_tone(sample_rate, tone, level, &mut sink) {
                error!("Failed to play {:.2} Hz: {}", tone.frequency, err);
            }
            // dropping the sink closes the stream and reaps the sox process
        });
        Ok(())
    }
}

/// Accepts every valid tone and plays nothing.
#[derive(Debug, Default)]
pub struct SilentScheduler;

impl ToneScheduler for SilentScheduler {
    fn submit(&self, tone: ToneSpec) -> Result<(), ToneError> {
        debug!("muted tone at {:.2} Hz", tone.frequency);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::Stereo;
    use std::cell::Cell;

    fn rendered(frequency: f64, level: f64) -> Vec<Stereo<f64>> {
        let mut out: Vec<Stereo<f64>> = Vec::new();
        render_tone(
            SAMPLE_RATE,
            ToneSpec::note(frequency).unwrap(),
            level,
            &mut out,
        )
        .unwrap();
        out
    }

    fn peak(samples: &[Stereo<f64>]) -> f64 {
        samples.iter().map(|s| s.left.abs()).fold(0.0, f64::max)
    }

    #[test]
    fn tone_lasts_one_second() {
        let out = rendered(261.63, 1.0);
        assert_eq!(out.len(), SAMPLE_RATE as usize);
    }

    #[test]
    fn tone_fades_out() {
        let out = rendered(440.0, 1.0);
        let tenth = out.len() / 10;
        let head = peak(&out[..tenth]);
        let tail = peak(&out[out.len() - tenth..]);
        assert!(head > 0.5, "head peak {}", head);
        assert!(tail < 0.01, "tail peak {}", tail);
        assert!(tail > 0.0);
    }

    #[test]
    fn tone_respects_level() {
        let out = rendered(392.0, 0.25);
        assert!(peak(&out) <= 0.25);
        assert!(out.iter().all(|s| s.left == s.right));
    }

    #[test]
    fn invalid_tones_are_rejected() {
        assert!(matches!(
            ToneSpec::new(0.0, 1.0),
            Err(ToneError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            ToneSpec::new(f64::INFINITY, 1.0),
            Err(ToneError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            ToneSpec::new(25_000.0, 1.0),
            Err(ToneError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            ToneSpec::new(NYQUIST_FREQUENCY, 1.0),
            Err(ToneError::InvalidFrequency { .. })
        ));
        assert!(ToneSpec::new(20_000.0, 1.0).is_ok());
        assert!(matches!(
            ToneSpec::new(440.0, 0.0),
            Err(ToneError::InvalidDuration { .. })
        ));
    }

    /// Counts writes, and notes when it is dropped.
    struct Guard<'a> {
        writes: usize,
        released: &'a Cell<bool>,
    }

    impl AudioSink for Guard<'_> {
        fn write(&mut self, _buffer: &AudioBuffer) -> io::Result<()> {
            self.writes += 1;
            Ok(())
        }
    }

    impl Drop for Guard<'_> {
        fn drop(&mut self) {
            self.released.set(true);
        }
    }

    #[test]
    fn sink_released_when_fade_cannot_be_scheduled() {
        let released = Cell::new(false);
        let mut guard = Guard {
            writes: 0,
            released: &released,
        };
        let result = render_tone(SAMPLE_RATE, ToneSpec::note(440.0).unwrap(), 0.0, &mut guard);
        assert!(matches!(result, Err(ToneError::Envelope { .. })));
        assert_eq!(guard.writes, 0);
        drop(guard);
        assert!(released.get());
    }

    #[test]
    fn silent_scheduler_still_validates() {
        assert!(SilentScheduler.play(523.25).is_ok());
        assert!(matches!(
            SilentScheduler.play(-1.0),
            Err(ToneError::InvalidFrequency { .. })
        ));
    }

    #[test]
    fn missing_player_means_no_audio() {
        let scheduler = SoxScheduler::with_player("/nonexistent/bin/play", 1.0).unwrap();
        assert!(matches!(
            scheduler.play(440.0),
            Err(ToneError::AudioUnavailable { .. })
        ));
    }

    #[test]
    fn output_level_is_checked() {
        assert!(matches!(
            SoxScheduler::with_player("play", 0.0),
            Err(ToneError::InvalidLevel { .. })
        ));
        assert!(matches!(
            SoxScheduler::with_player("play", 1.5),
            Err(ToneError::InvalidLevel { .. })
        ));
    }
}
