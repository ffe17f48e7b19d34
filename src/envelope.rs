// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

/// An exponential gain ramp.
/// The gain starts at `from` and is multiplied by a constant factor every sample,
/// so that it arrives at `to` after `samples` samples, where it is then held.
///
/// Both levels must be strictly positive: an exponential curve never reaches zero,
/// which is why tones fade towards a tiny floor instead of silence.
///
/// # Example
///
/// ```
/// use carnatic_notes::envelope::*;
/// let ramp = ExponentialRamp::new(1.0, 0.0625, 4).unwrap();
/// let mut eval = ramp.instantiate();
/// let gains: Vec<f64> = (0..6).map(|_| eval.step()).collect();
/// let expected = [1.0, 0.5, 0.25, 0.125, 0.0625, 0.0625];
/// for (g, e) in gains.iter().zip(expected.iter()) {
///     assert!((g - e).abs() < 1e-12);
/// }
/// assert!(eval.finished());
///
/// assert!(ExponentialRamp::new(1.0, 0.0, 4).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialRamp {
    from: f64,
    to: f64,
    samples: usize,
}

impl ExponentialRamp {
    pub fn new(from: f64, to: f64, samples: usize) -> Option<Self> {
        let valid = |level: f64| level.is_finite() && level > 0.0;
        if !valid(from) || !valid(to) {
            return None;
        }
        Some(Self { from, to, samples })
    }

    /// Gain at the given sample of the ramp, in closed form.
    pub fn gain_at(&self, sample: usize) -> f64 {
        if sample >= self.samples {
            self.to
        } else {
            let progress = sample as f64 / self.samples as f64;
            self.from * (self.to / self.from).powf(progress)
        }
    }

    pub fn instantiate(&self) -> EvalRamp {
        let factor = if self.samples == 0 {
            1.0
        } else {
            (self.to / self.from).powf(1.0 / self.samples as f64)
        };
        EvalRamp {
            ramp: *self,
            factor,
            current_gain: if self.samples == 0 { self.to } else { self.from },
            current_sample: 0,
        }
    }
}

/// Sample-by-sample evaluator for an [`ExponentialRamp`].
#[derive(Debug, Clone)]
pub struct EvalRamp {
    ramp: ExponentialRamp,
    factor: f64,
    current_gain: f64,
    current_sample: usize,
}

impl EvalRamp {
    /// Called for every sample, returning the envelope gain at that sample.
    pub fn step(&mut self) -> f64 {
        let gain = self.current_gain;
        if self.current_sample < self.ramp.samples {
            self.current_sample += 1;
            // land exactly on the target to avoid accumulated rounding
            self.current_gain = if self.current_sample == self.ramp.samples {
                self.ramp.to
            } else {
                self.current_gain * self.factor
            };
        }
        gain
    }

    /// All subsequent `step` calls return the target level.
    pub fn finished(&self) -> bool {
        self.current_sample >= self.ramp.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterative_matches_closed_form() {
        let ramp = ExponentialRamp::new(1.0, 0.00001, 44100).unwrap();
        let mut eval = ramp.instantiate();
        for sample in 0..44200 {
            let expected = ramp.gain_at(sample);
            let got = eval.step();
            assert!(
                (got - expected).abs() <= expected * 1e-9,
                "sample {}: {} vs {}",
                sample,
                got,
                expected
            );
        }
    }

    #[test]
    fn decays_monotonically_and_stays_positive() {
        let mut eval = ExponentialRamp::new(0.8, 0.00001, 1000)
            .unwrap()
            .instantiate();
        let mut last = f64::INFINITY;
        while !eval.finished() {
            let g = eval.step();
            assert!(g > 0.0);
            assert!(g < last);
            last = g;
        }
        assert_eq!(eval.step(), 0.00001);
    }

    #[test]
    fn zero_length_ramp_jumps_to_target() {
        let mut eval = ExponentialRamp::new(1.0, 0.5, 0).unwrap().instantiate();
        assert!(eval.finished());
        assert_eq!(eval.step(), 0.5);
    }

    #[test]
    fn rejects_non_positive_levels() {
        assert!(ExponentialRamp::new(0.0, 0.1, 10).is_none());
        assert!(ExponentialRamp::new(1.0, -0.1, 10).is_none());
        assert!(ExponentialRamp::new(f64::NAN, 0.1, 10).is_none());
    }
}
