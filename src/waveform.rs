//! Synthetic signal source.

use std::f32::consts::TAU;

/// Continuous-phase sine oscillator.
///
/// The phase is carried across calls so that consecutive frames join without
/// discontinuity, also when the sample rate changes between them.
#[derive(Debug, Clone, PartialEq)]
pub struct SineOscillator {
    frequency_hz: f32,
    phase: f32,
}

impl SineOscillator {
    /// Creates an oscillator at phase zero.
    pub fn new(frequency_hz: f32) -> Self {
        Self { frequency_hz, phase: 0.0 }
    }

    /// Tone frequency.
    pub fn frequency_hz(&self) -> f32 {
        self.frequency_hz
    }

    /// Current phase in `[0, 2π)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Returns the next sample in `[-1, 1]` and advances the phase.
    pub fn next_sample(&mut self, rate_hz: u32) -> f32 {
        let value = self.phase.sin();
        self.phase += TAU * self.frequency_hz / rate_hz as f32;
        if self.phase >= TAU {
            self.phase = self.phase.rem_euclid(TAU);
        }
        value
    }

    /// Infinite sequence of samples at the given rate.
    pub fn samples(&mut self, rate_hz: u32) -> impl Iterator<Item = f32> + '_ {
        std::iter::repeat_with(move || self.next_sample(rate_hz))
    }

    /// Restarts at phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
