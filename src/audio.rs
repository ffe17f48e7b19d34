// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! A tiny audio context: a sample clock, tone sources, gain envelopes,
//! and the chain `source -> gain -> destination` they are connected into.

use std::io;

use log::trace;
use snafu::{ensure, Snafu};

use crate::envelope::{EvalRamp, ExponentialRamp};
use crate::oscillator::{Oscillator, WaveShape};
use crate::wave::{AudioBuffer, Sample, Stereo};

pub mod sox;

/// Something that consumes rendered audio, e.g. a speaker.
pub trait AudioSink {
    fn write(&mut self, buffer: &AudioBuffer) -> io::Result<()>;
}

/// Collecting samples in memory, mostly useful for inspecting rendered audio.
impl AudioSink for Vec<Stereo<f64>> {
    fn write(&mut self, buffer: &AudioBuffer) -> io::Result<()> {
        self.extend_from_slice(buffer.samples());
        Ok(())
    }
}

#[derive(Debug, PartialEq, Snafu)]
pub enum ScheduleError {
    #[snafu(display("Cannot ramp to gain level {}, it must be positive", level))]
    InvalidLevel { level: f64 },
    #[snafu(display("Cannot schedule at sample {}, the clock is already at {}", at, now))]
    InThePast { at: Sample, now: Sample },
}

/// The clock and factory of all audio objects of one tone.
#[derive(Debug)]
pub struct AudioContext {
    sample_rate: f64,
    current_sample: Sample,
}

impl AudioContext {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            current_sample: 0,
        }
    }

    /// The sample that will be rendered next.
    pub fn now(&self) -> Sample {
        self.current_sample
    }

    /// The current time in seconds.
    pub fn now_seconds(&self) -> f64 {
        self.current_sample as f64 / self.sample_rate
    }

    /// Sample time that lies `seconds` after the current time.
    pub fn after(&self, seconds: f64) -> Sample {
        self.current_sample + (seconds * self.sample_rate).round() as Sample
    }

    pub fn create_tone_source(&self, shape: WaveShape, frequency: f64) -> ToneSource {
        ToneSource {
            oscillator: Oscillator::new(shape, self.sample_rate, frequency),
            start: None,
            stop: None,
        }
    }

    pub fn create_gain_envelope(&self) -> GainEnvelope {
        GainEnvelope {
            level: 1.0,
            ramp: None,
        }
    }

    /// Connect the source through the gain envelope into a renderable voice.
    pub fn connect(&self, source: ToneSource, gain: GainEnvelope) -> Voice {
        let ramp = gain.ramp.map(|(start, ramp)| (start, ramp.instantiate()));
        Voice {
            source,
            level: gain.level,
            ramp,
        }
    }

    /// Render the next buffer of the voice into the destination and advance the clock.
    pub fn render(
        &mut self,
        voice: &mut Voice,
        buffer: &mut AudioBuffer,
        destination: &mut dyn AudioSink,
    ) -> io::Result<()> {
        buffer.fill_zero();
        voice.fill_buffer(self.current_sample, buffer.samples_mut());
        trace!(
            "rendered samples {}..{}",
            self.current_sample,
            self.current_sample + buffer.len()
        );
        self.current_sample += buffer.len();
        destination.write(buffer)
    }
}

/// A periodic wave that sounds between its start and stop times.
#[derive(Debug)]
pub struct ToneSource {
    oscillator: Oscillator,
    start: Option<Sample>,
    stop: Option<Sample>,
}

impl ToneSource {
    pub fn start(&mut self, at: Sample) {
        self.start = Some(at);
    }

    pub fn stop(&mut self, at: Sample) {
        self.stop = Some(at);
    }

    fn sounding(&self, at: Sample) -> bool {
        match (self.start, self.stop) {
            (Some(start), Some(stop)) => start <= at && at < stop,
            (Some(start), None) => start <= at,
            (None, _) => false,
        }
    }
}

/// Gain applied to a source, holding a level until an optional ramp takes over.
#[derive(Debug)]
pub struct GainEnvelope {
    level: f64,
    ramp: Option<(Sample, ExponentialRamp)>,
}

impl GainEnvelope {
    pub fn set_level(&mut self, level: f64) {
        self.level = level;
    }

    /// Ramp exponentially from the current level at `from` down (or up) to `level` at `to`.
    pub fn exponential_ramp_to(
        &mut self,
        level: f64,
        from: Sample,
        to: Sample,
    ) -> Result<(), ScheduleError> {
        ensure!(to >= from, InThePast { at: to, now: from });
        match ExponentialRamp::new(self.level, level, to - from) {
            Some(ramp) => {
                self.ramp = Some((from, ramp));
                Ok(())
            }
            None => InvalidLevel { level }.fail(),
        }
    }
}

/// A source connected through its gain envelope, ready to be rendered.
#[derive(Debug)]
pub struct Voice {
    source: ToneSource,
    level: f64,
    ramp: Option<(Sample, EvalRamp)>,
}

impl Voice {
    /// Sample after which the voice is silent for good, if it was scheduled to stop.
    pub fn stop_time(&self) -> Option<Sample> {
        self.source.stop
    }

    /// Add the voice's output for the samples starting at `start` to the buffer.
    pub fn fill_buffer(&mut self, start: Sample, buffer: &mut [Stereo<f64>]) {
        for (offset, out) in buffer.iter_mut().enumerate() {
            let at = start + offset;
            let gain = match self.ramp.as_mut() {
                Some((ramp_start, ramp)) if at >= *ramp_start => ramp.step(),
                _ => self.level,
            };
            if self.source.sounding(at) {
                *out += Stereo::mono(self.source.oscillator.next_sample() * gain);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_sounds_between_start_and_stop() {
        let mut ctx = AudioContext::new(8.0);
        let mut source = ctx.create_tone_source(WaveShape::Rectangle, 1.0);
        source.start(ctx.after(0.25));
        source.stop(ctx.after(0.75));
        let mut voice = ctx.connect(source, ctx.create_gain_envelope());

        let mut out: Vec<Stereo<f64>> = Vec::new();
        let mut buffer = AudioBuffer::new(4);
        ctx.render(&mut voice, &mut buffer, &mut out).unwrap();
        ctx.render(&mut voice, &mut buffer, &mut out).unwrap();
        assert_eq!(ctx.now(), 8);
        assert_eq!(ctx.now_seconds(), 1.0);

        let left: Vec<f64> = out.iter().map(|s| s.left).collect();
        assert_eq!(left, vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn gain_envelope_scales_output() {
        let ctx = AudioContext::new(4.0);
        let mut source = ctx.create_tone_source(WaveShape::Rectangle, 0.5);
        source.start(0);
        let mut gain = ctx.create_gain_envelope();
        gain.set_level(0.5);
        let mut voice = ctx.connect(source, gain);

        let mut buffer = vec![Stereo::mono(0.0); 4];
        voice.fill_buffer(0, &mut buffer);
        assert!(buffer.iter().all(|s| s.left == 0.5 && s.right == 0.5));
    }

    #[test]
    fn ramp_starts_at_scheduled_sample() {
        let ctx = AudioContext::new(4.0);
        let mut source = ctx.create_tone_source(WaveShape::Rectangle, 0.5);
        source.start(0);
        let mut gain = ctx.create_gain_envelope();
        gain.exponential_ramp_to(0.25, 2, 4).unwrap();
        let mut voice = ctx.connect(source, gain);

        let mut buffer = vec![Stereo::mono(0.0); 6];
        voice.fill_buffer(0, &mut buffer);
        let left: Vec<f64> = buffer.iter().map(|s| s.left).collect();
        assert_eq!(left[..3], [1.0, 1.0, 1.0]);
        assert!((left[3] - 0.5).abs() < 1e-12);
        assert_eq!(left[4..], [-0.25, -0.25]);
    }

    #[test]
    fn invalid_ramps_are_rejected() {
        let ctx = AudioContext::new(4.0);
        let mut gain = ctx.create_gain_envelope();
        assert_eq!(
            gain.exponential_ramp_to(0.0, 0, 4),
            Err(ScheduleError::InvalidLevel { level: 0.0 })
        );
        assert_eq!(
            gain.exponential_ramp_to(0.1, 4, 2),
            Err(ScheduleError::InThePast { at: 2, now: 4 })
        );
    }
}
