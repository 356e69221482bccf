//! Audio entities addressed by control requests.

use std::{
    fmt,
    sync::atomic::{AtomicBool, AtomicI16, AtomicU32, AtomicU8, Ordering},
};

use crate::{config::RatePolicy, error::ControlError, packer::SampleFormat, MicConfig, MAX_SAMPLE_RATE_HZ};

/// Entity identifiers of the microphone topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityId {
    /// Internal variable clock.
    ClockSource = 0x10,
    /// Mute and volume controls.
    FeatureUnit = 0x20,
    /// Microphone input terminal.
    InputTerminal = 0x30,
    /// USB streaming output terminal.
    OutputTerminal = 0x40,
}

impl EntityId {
    /// Looks up an entity by its numeric id.
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0x10 => Some(Self::ClockSource),
            0x20 => Some(Self::FeatureUnit),
            0x30 => Some(Self::InputTerminal),
            0x40 => Some(Self::OutputTerminal),
            _ => None,
        }
    }

    /// Numeric entity id.
    pub const fn id(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::ClockSource => "CLK_SRC",
            Self::FeatureUnit => "FU (Mute/Vol)",
            Self::InputTerminal => "IT (Mic)",
            Self::OutputTerminal => "OT (USB)",
        };
        write!(f, "0x{:02X}({name})", self.id())
    }
}

/// Streaming alternate setting of the AudioStreaming interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum AltSetting {
    /// Zero-bandwidth setting, no payload.
    #[default]
    Stopped = 0,
    /// 16-bit PCM.
    Bits16 = 1,
    /// 24-bit PCM.
    Bits24 = 2,
}

impl AltSetting {
    /// Sample format streamed in this setting.
    pub const fn format(self) -> Option<SampleFormat> {
        match self {
            Self::Stopped => None,
            Self::Bits16 => Some(SampleFormat::S16Le),
            Self::Bits24 => Some(SampleFormat::S24Le),
        }
    }
}

impl TryFrom<u8> for AltSetting {
    type Error = ControlError;

    fn try_from(alt: u8) -> Result<Self, ControlError> {
        match alt {
            0 => Ok(Self::Stopped),
            1 => Ok(Self::Bits16),
            2 => Ok(Self::Bits24),
            other => Err(ControlError::UnknownAltSetting(other)),
        }
    }
}

/// Clock source with a host-selectable sample rate.
#[derive(Debug)]
pub struct ClockSource {
    rate_hz: AtomicU32,
    supported: Vec<u32>,
    policy: RatePolicy,
}

impl ClockSource {
    /// Current sample rate in Hz.
    pub fn rate_hz(&self) -> u32 {
        self.rate_hz.load(Ordering::Relaxed)
    }

    /// Sample rates advertised in the RANGE response.
    pub fn supported_rates(&self) -> &[u32] {
        &self.supported
    }

    /// The clock is synthesized internally and therefore always valid.
    pub fn is_valid(&self) -> bool {
        true
    }

    /// Stores a new sample rate according to the rate policy.
    pub fn set_rate_hz(&self, rate_hz: u32) -> Result<(), ControlError> {
        let accepted = match self.policy {
            RatePolicy::Supported => self.supported.contains(&rate_hz),
            RatePolicy::Any => (1..=MAX_SAMPLE_RATE_HZ).contains(&rate_hz),
        };
        if !accepted {
            return Err(ControlError::UnsupportedRate(rate_hz));
        }

        self.rate_hz.store(rate_hz, Ordering::Relaxed);
        Ok(())
    }
}

/// Volume range in 1/256 dB units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VolumeRange {
    /// Lowest volume.
    pub min: i16,
    /// Highest volume.
    pub max: i16,
    /// Step size.
    pub res: i16,
}

impl VolumeRange {
    /// -60 dB to 0 dB in 1 dB steps.
    pub const DEFAULT: Self = Self { min: -60 * 256, max: 0, res: 256 };

    /// Limits a requested volume to the range.
    pub fn clamp(&self, volume: i16) -> i16 {
        volume.max(self.min).min(self.max)
    }

    /// Whether the volume lies within the range.
    pub fn contains(&self, volume: i16) -> bool {
        (self.min..=self.max).contains(&volume)
    }
}

impl Default for VolumeRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Feature unit providing mute and volume.
#[derive(Debug)]
pub struct FeatureUnit {
    muted: AtomicBool,
    volume: AtomicI16,
    range: VolumeRange,
}

impl FeatureUnit {
    /// Whether the output is muted.
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    /// Sets the mute state.
    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    /// Current volume in 1/256 dB.
    pub fn volume(&self) -> i16 {
        self.volume.load(Ordering::Relaxed)
    }

    /// Clamps and stores the volume, returning the stored value.
    pub fn set_volume(&self, volume: i16) -> i16 {
        let volume = self.range.clamp(volume);
        self.volume.store(volume, Ordering::Relaxed);
        volume
    }

    /// Volume range.
    pub fn range(&self) -> VolumeRange {
        self.range
    }
}

/// Input terminal channel cluster.
///
/// The terminal is a single mono microphone. Its cluster is fixed so the
/// advertised channel count always matches the one sample per slot that is
/// streamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputTerminal {
    channel_count: u8,
    channel_config: u32,
    name_index: u8,
}

impl InputTerminal {
    /// One channel without predefined spatial location or name.
    pub const MONO: Self = Self { channel_count: 1, channel_config: 0, name_index: 0 };

    /// Number of logical channels.
    pub const fn channel_count(&self) -> u8 {
        self.channel_count
    }

    /// Spatial location bitmap, zero for non-predefined.
    pub const fn channel_config(&self) -> u32 {
        self.channel_config
    }

    /// String index of the first channel name.
    pub const fn name_index(&self) -> u8 {
        self.name_index
    }
}

/// All entities of the audio function.
///
/// Scalars shared between the control and the tick context are atomics
/// written only by the control context.
#[derive(Debug)]
pub struct Entities {
    /// Clock source.
    pub clock: ClockSource,
    /// Feature unit.
    pub feature: FeatureUnit,
    /// Input terminal.
    pub terminal: InputTerminal,
    alt: AtomicU8,
}

impl Entities {
    pub(crate) fn new(config: &MicConfig) -> Self {
        Self {
            clock: ClockSource {
                rate_hz: AtomicU32::new(config.initial_rate_hz),
                supported: config.supported_rates.clone(),
                policy: config.rate_policy,
            },
            feature: FeatureUnit {
                muted: AtomicBool::new(config.initial_muted),
                volume: AtomicI16::new(config.initial_volume),
                range: config.volume_range,
            },
            terminal: InputTerminal::MONO,
            alt: AtomicU8::new(AltSetting::Stopped as u8),
        }
    }

    /// Active alternate setting.
    pub fn alt_setting(&self) -> AltSetting {
        AltSetting::try_from(self.alt.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub(crate) fn set_alt_setting(&self, alt: AltSetting) {
        self.alt.store(alt as u8, Ordering::Relaxed);
    }
}
