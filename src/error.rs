//! Error types.

use crate::entity::VolumeRange;

/// Reason a control request was refused.
///
/// Every variant results in the control transfer being stalled. None of them
/// changes device state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// No entity with this id.
    #[error("unknown entity 0x{0:02X}")]
    UnknownEntity(u8),
    /// The entity has no such control or does not support the request for it.
    #[error("unsupported request 0x{request:02X} for selector 0x{selector:02X} of entity 0x{entity:02X}")]
    Unsupported {
        /// Entity id.
        entity: u8,
        /// Control selector.
        selector: u8,
        /// Request code.
        request: u8,
    },
    /// The channel number does not exist on the entity.
    #[error("invalid channel {0}")]
    InvalidChannel(u8),
    /// The data stage does not match the fixed payload layout.
    #[error("payload length {actual} does not match expected {expected}")]
    Length {
        /// Layout size.
        expected: usize,
        /// Received size.
        actual: usize,
    },
    /// The sample rate is rejected by the rate policy.
    #[error("unsupported sample rate {0} Hz")]
    UnsupportedRate(u32),
    /// The alternate setting does not exist.
    #[error("unknown alternate setting {0}")]
    UnknownAltSetting(u8),
}

/// Invalid microphone configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Empty or too long list of supported rates.
    #[error("invalid number of supported sample rates: {0}")]
    RateCount(usize),
    /// A rate is zero or exceeds the frame buffer capacity.
    #[error("sample rate {0} Hz out of bounds")]
    RateOutOfBounds(u32),
    /// The initial rate is not among the supported rates.
    #[error("initial sample rate {0} Hz is not supported")]
    InitialRate(u32),
    /// Minimum above maximum or non-positive resolution.
    #[error("invalid volume range {0:?}")]
    VolumeRange(VolumeRange),
    /// The initial volume lies outside the range.
    #[error("initial volume {0} outside volume range")]
    InitialVolume(i16),
    /// Tone frequency is not positive.
    #[error("invalid tone frequency {0} Hz")]
    Tone(f32),
    /// Amplitude outside 0..=1.
    #[error("invalid amplitude {0}")]
    Amplitude(f32),
}
