//! Microphone configuration.

use crate::{
    entity::VolumeRange,
    error::ConfigError,
    MAX_SAMPLE_RATE_HZ,
};

/// Maximum number of sample rates advertised by the clock source.
pub const MAX_SUPPORTED_RATES: usize = 8;

/// How a host SET of the sample rate is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RatePolicy {
    /// Only rates advertised in the RANGE response are accepted.
    #[default]
    Supported,
    /// Any rate the frame buffer can hold is accepted.
    Any,
}

/// Microphone configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MicConfig {
    /// Advertised sample rates in Hz.
    pub supported_rates: Vec<u32>,
    /// Sample rate before the host selects one.
    pub initial_rate_hz: u32,
    /// Validation of host-selected rates.
    pub rate_policy: RatePolicy,
    /// Volume range of the feature unit.
    pub volume_range: VolumeRange,
    /// Volume before the host sets one, in 1/256 dB.
    pub initial_volume: i16,
    /// Mute state before the host sets one.
    pub initial_muted: bool,
    /// Frequency of the generated tone.
    pub tone_hz: f32,
    /// Headroom factor applied before volume.
    pub amplitude: f32,
    /// Restart oscillator and rate accumulator when the endpoint closes.
    pub reset_on_close: bool,
}

impl Default for MicConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MicConfig {
    /// Mono microphone at 44.1 or 96 kHz, -6 dB, 440 Hz tone.
    pub fn new() -> Self {
        Self {
            supported_rates: vec![44_100, 96_000],
            initial_rate_hz: 44_100,
            rate_policy: RatePolicy::Supported,
            volume_range: VolumeRange::DEFAULT,
            initial_volume: -6 * 256,
            initial_muted: false,
            tone_hz: 440.0,
            amplitude: 0.5,
            reset_on_close: false,
        }
    }

    /// Sets the advertised sample rates.
    #[must_use]
    pub fn with_supported_rates(mut self, rates: impl IntoIterator<Item = u32>) -> Self {
        self.supported_rates = rates.into_iter().collect();
        self
    }

    /// Sets the initial sample rate.
    #[must_use]
    pub fn with_initial_rate(mut self, rate_hz: u32) -> Self {
        self.initial_rate_hz = rate_hz;
        self
    }

    /// Sets the sample rate policy.
    #[must_use]
    pub fn with_rate_policy(mut self, policy: RatePolicy) -> Self {
        self.rate_policy = policy;
        self
    }

    /// Sets the volume range.
    #[must_use]
    pub fn with_volume_range(mut self, range: VolumeRange) -> Self {
        self.volume_range = range;
        self
    }

    /// Sets the initial volume in 1/256 dB.
    #[must_use]
    pub fn with_initial_volume(mut self, volume: i16) -> Self {
        self.initial_volume = volume;
        self
    }

    /// Sets the initial mute state.
    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.initial_muted = muted;
        self
    }

    /// Sets the tone frequency in Hz.
    #[must_use]
    pub fn with_tone(mut self, tone_hz: f32) -> Self {
        self.tone_hz = tone_hz;
        self
    }

    /// Sets the headroom amplitude.
    #[must_use]
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Restart the waveform and rate accumulator whenever the endpoint closes.
    #[must_use]
    pub fn with_reset_on_close(mut self, reset: bool) -> Self {
        self.reset_on_close = reset;
        self
    }

    /// Checks the configuration for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supported_rates.is_empty() || self.supported_rates.len() > MAX_SUPPORTED_RATES {
            return Err(ConfigError::RateCount(self.supported_rates.len()));
        }
        if let Some(&rate) = self.supported_rates.iter().find(|&&rate| rate == 0 || rate > MAX_SAMPLE_RATE_HZ) {
            return Err(ConfigError::RateOutOfBounds(rate));
        }
        if self.initial_rate_hz == 0 || self.initial_rate_hz > MAX_SAMPLE_RATE_HZ {
            return Err(ConfigError::RateOutOfBounds(self.initial_rate_hz));
        }
        if self.rate_policy == RatePolicy::Supported && !self.supported_rates.contains(&self.initial_rate_hz) {
            return Err(ConfigError::InitialRate(self.initial_rate_hz));
        }

        let range = self.volume_range;
        if range.min > range.max || range.res <= 0 {
            return Err(ConfigError::VolumeRange(range));
        }
        if !range.contains(self.initial_volume) {
            return Err(ConfigError::InitialVolume(self.initial_volume));
        }

        if !(self.tone_hz.is_finite() && self.tone_hz > 0.0) {
            return Err(ConfigError::Tone(self.tone_hz));
        }
        if !(0.0..=1.0).contains(&self.amplitude) {
            return Err(ConfigError::Amplitude(self.amplitude));
        }

        Ok(())
    }
}
