//! Distribution of samples over USB frames.

use crate::TICKS_PER_SECOND;

/// Number of samples belonging to the next tick.
///
/// The remainder of `rate_hz / 1000` is carried in `frac`, which always stays
/// below 1000. Over any 1000 ticks starting at `frac == 0` exactly `rate_hz`
/// samples are produced. An out-of-range `frac` is reduced modulo 1000 first.
pub fn samples_for_tick(rate_hz: u32, frac: &mut u16) -> u32 {
    *frac %= TICKS_PER_SECOND as u16;
    let mut count = rate_hz / TICKS_PER_SECOND;
    *frac += (rate_hz % TICKS_PER_SECOND) as u16;
    if u32::from(*frac) >= TICKS_PER_SECOND {
        count += 1;
        *frac -= TICKS_PER_SECOND as u16;
    }
    count
}

/// Tracks the fractional accumulator across ticks.
///
/// The accumulator restarts from zero whenever the rate differs from the one
/// used in the previous tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameScheduler {
    frac: u16,
    last_rate_hz: u32,
}

impl FrameScheduler {
    /// Creates a scheduler with an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples for the next tick at `rate_hz`.
    pub fn next_tick(&mut self, rate_hz: u32) -> usize {
        if rate_hz != self.last_rate_hz {
            tracing::debug!("sample rate changed from {} Hz to {rate_hz} Hz", self.last_rate_hz);
            self.frac = 0;
            self.last_rate_hz = rate_hz;
        }
        samples_for_tick(rate_hz, &mut self.frac) as usize
    }

    /// Fractional remainder carried into the next tick.
    pub fn fraction(&self) -> u16 {
        self.frac
    }

    /// Empties the accumulator.
    pub fn reset(&mut self) {
        self.frac = 0;
    }
}
