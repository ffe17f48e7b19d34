// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

/// Position within one period of a wave, normalized to `[0, 1)`.
///
/// # Examples
///
/// ```
/// use carnatic_notes::oscillator::Phase;
///
/// assert_eq!(Phase::new(1.25).offset(), 0.25);
/// assert_eq!(Phase::new(-0.25).offset(), 0.75);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Phase(f64);

impl Phase {
    pub const ZERO: Phase = Phase(0.0);

    pub fn new(offset: f64) -> Phase {
        let wrapped = offset.rem_euclid(1.0);
        // rem_euclid may round up to exactly 1.0 for tiny negative inputs
        if wrapped >= 1.0 {
            Phase(0.0)
        } else {
            Phase(wrapped)
        }
    }

    pub fn offset(self) -> f64 {
        self.0
    }

    pub fn step(self, amount: f64) -> Phase {
        Phase::new(self.0 + amount)
    }

    pub fn step_frequency(self, frequency: f64, sample_rate: f64) -> Phase {
        self.step(frequency / sample_rate)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaveShape {
    Sine,
    Rectangle,
}

impl WaveShape {
    /// Sample the wave at the given phase, producing a value in `[-1, 1]`.
    pub fn eval(self, phase: Phase) -> f64 {
        let offset = phase.offset();
        use std::f64::consts::PI;
        match self {
            WaveShape::Sine => (offset * 2.0 * PI).sin(),
            WaveShape::Rectangle => {
                if offset < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// An oscillator sampling a wave of some shape at a fixed sample rate.
#[derive(Debug)]
pub struct Oscillator {
    shape: WaveShape,
    sample_rate: f64,
    frequency: f64,
    phase: Phase,
}

impl Oscillator {
    pub fn new(shape: WaveShape, sample_rate: f64, frequency: f64) -> Self {
        Self {
            shape,
            sample_rate,
            frequency,
            phase: Phase::ZERO,
        }
    }

    pub fn next_sample(&mut self) -> f64 {
        let result = self.shape.eval(self.phase);
        self.phase = self.phase.step_frequency(self.frequency, self.sample_rate);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sine_quarter_steps() {
        // four samples per period
        let mut osc = Oscillator::new(WaveShape::Sine, 4.0, 1.0);
        let samples: Vec<f64> = (0..5).map(|_| osc.next_sample()).collect();
        let expected = [0.0, 1.0, 0.0, -1.0, 0.0];
        for (got, want) in samples.iter().zip(expected.iter()) {
            assert!(close(*got, *want), "{} != {}", got, want);
        }
    }

    #[test]
    fn shapes_stay_in_range() {
        let shapes = [WaveShape::Sine, WaveShape::Rectangle];
        for shape in shapes.iter() {
            let mut osc = Oscillator::new(*shape, 44100.0, 329.63);
            for _ in 0..44100 {
                let s = osc.next_sample();
                assert!(s >= -1.0 && s <= 1.0, "{:?} produced {}", shape, s);
            }
        }
    }

    #[test]
    fn phase_wraps() {
        assert_eq!(Phase::new(3.5).offset(), 0.5);
        assert_eq!(Phase::new(0.5).step(0.75).offset(), 0.25);
        assert_eq!(Phase::new(-1e-20).offset(), 0.0);
    }
}
