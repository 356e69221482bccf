//! USB Audio Class 2.0 microphone function.
//!
//! The crate answers the class-specific control requests of a mono UAC2
//! microphone (sample rate, clock validity, mute, volume and connector
//! queries) and produces the isochronous IN payload once per 1 ms frame.
//!
//! The core is independent of any USB stack: the stack delivers control
//! requests to [`Microphone::on_get`] and [`Microphone::on_set`], alternate
//! setting changes to [`Microphone::on_set_interface`] and
//! [`Microphone::on_close_endpoint`], and calls [`Microphone::on_produce_tick`]
//! once per transfer interval. Frames leave through a [`Transport`].
//!
//! With the crate feature `device` the [`device`] module provides a Linux USB
//! gadget function driving the core.

mod config;
mod entity;
mod error;
mod packer;
mod request;
mod router;
mod scheduler;
mod stream;
mod transport;
mod waveform;

#[cfg(feature = "device")]
pub mod device;

pub use config::{MicConfig, RatePolicy};
pub use entity::{AltSetting, ClockSource, Entities, EntityId, FeatureUnit, InputTerminal, VolumeRange};
pub use error::{ConfigError, ControlError};
pub use packer::{pack_frame, Gain, SampleFormat};
pub use request::{ControlRequest, ControlSelector, RequestKind};
pub use scheduler::{samples_for_tick, FrameScheduler};
pub use stream::{FrameProducer, Microphone};
pub use transport::{FrameQueue, Transport};
pub use waveform::SineOscillator;

/// Audio interface class code.
pub const AUDIO: u8 = 0x01;
/// AudioControl interface subclass.
pub const AUDIOCONTROL: u8 = 0x01;
/// AudioStreaming interface subclass.
pub const AUDIOSTREAMING: u8 = 0x02;
/// Interface protocol of UAC 2.0.
pub const IP_VERSION_02_00: u8 = 0x20;

/// Class-specific request: current value.
pub const CUR: u8 = 0x01;
/// Class-specific request: parameter block of sub-ranges.
pub const RANGE: u8 = 0x02;

/// Clock source control: sampling frequency.
pub const CS_SAM_FREQ_CONTROL: u8 = 0x01;
/// Clock source control: clock validity.
pub const CS_CLOCK_VALID_CONTROL: u8 = 0x02;
/// Feature unit control: mute.
pub const FU_MUTE_CONTROL: u8 = 0x01;
/// Feature unit control: volume.
pub const FU_VOLUME_CONTROL: u8 = 0x02;
/// Terminal control: connector.
pub const TE_CONNECTOR_CONTROL: u8 = 0x02;

/// Interface number of the AudioControl interface.
pub const ITF_NUM_AUDIO_CONTROL: u8 = 0;
/// Interface number of the AudioStreaming interface.
pub const ITF_NUM_AUDIO_STREAMING: u8 = 1;

/// USB frames per second at full speed.
pub const TICKS_PER_SECOND: u32 = 1_000;

/// Highest sample rate the frame buffer is dimensioned for.
pub const MAX_SAMPLE_RATE_HZ: u32 = 192_000;

/// Upper bound of samples produced in a single tick.
pub const MAX_SAMPLES_PER_TICK: usize = (MAX_SAMPLE_RATE_HZ / TICKS_PER_SECOND) as usize + 1;

/// Upper bound of bytes produced in a single tick.
pub const MAX_FRAME_BYTES: usize = MAX_SAMPLES_PER_TICK * 3;

/// USB interface class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Class {
    /// Class code.
    pub class: u8,
    /// Subclass code.
    pub sub_class: u8,
    /// Protocol code.
    pub protocol: u8,
}

impl Class {
    /// UAC2 AudioControl interface class.
    pub const AUDIO_CONTROL: Self = Self::new(AUDIO, AUDIOCONTROL, IP_VERSION_02_00);

    /// UAC2 AudioStreaming interface class.
    pub const AUDIO_STREAMING: Self = Self::new(AUDIO, AUDIOSTREAMING, IP_VERSION_02_00);

    /// Creates a new USB device or interface class.
    pub const fn new(class: u8, sub_class: u8, protocol: u8) -> Self {
        Self { class, sub_class, protocol }
    }
}

#[cfg(feature = "device")]
impl From<Class> for usb_gadget::Class {
    fn from(Class { class, sub_class, protocol }: Class) -> Self {
        usb_gadget::Class { class, sub_class, protocol }
    }
}
