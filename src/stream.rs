//! Streaming context of the microphone function.

use bytes::Bytes;
use std::{fmt, sync::Arc};

use crate::{
    config::MicConfig,
    entity::{AltSetting, Entities},
    error::{ConfigError, ControlError},
    packer::{pack_frame, Gain},
    request::ControlRequest,
    router,
    scheduler::FrameScheduler,
    transport::Transport,
    waveform::SineOscillator,
    MAX_FRAME_BYTES, MAX_SAMPLES_PER_TICK,
};

/// Produces the isochronous payload of each tick.
///
/// Owns all state touched only from the tick context. Producing a frame
/// performs no allocation and takes no lock.
pub struct FrameProducer {
    scheduler: FrameScheduler,
    oscillator: SineOscillator,
    amplitude: f32,
    buf: [u8; MAX_FRAME_BYTES],
}

impl fmt::Debug for FrameProducer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FrameProducer")
            .field("scheduler", &self.scheduler)
            .field("oscillator", &self.oscillator)
            .field("amplitude", &self.amplitude)
            .finish()
    }
}

impl FrameProducer {
    /// Creates a producer for a tone of `tone_hz` at `amplitude` before volume.
    pub fn new(tone_hz: f32, amplitude: f32) -> Self {
        Self {
            scheduler: FrameScheduler::new(),
            oscillator: SineOscillator::new(tone_hz),
            amplitude,
            buf: [0; MAX_FRAME_BYTES],
        }
    }

    /// Builds the next frame from the current entity state.
    ///
    /// The frame is empty while streaming is stopped.
    pub fn produce(&mut self, entities: &Entities) -> &[u8] {
        let Some(format) = entities.alt_setting().format() else {
            return &[];
        };

        let rate_hz = entities.clock.rate_hz();
        let count = self.scheduler.next_tick(rate_hz).min(MAX_SAMPLES_PER_TICK);
        let gain = Gain::new(self.amplitude, entities.feature.volume(), entities.feature.is_muted());

        let len = count * format.bytes_per_sample();
        let written = pack_frame(format, gain, self.oscillator.samples(rate_hz), &mut self.buf[..len]);
        &self.buf[..written]
    }

    /// Fractional sample accumulator.
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Tone generator.
    pub fn oscillator(&self) -> &SineOscillator {
        &self.oscillator
    }

    /// Restarts waveform and accumulator.
    pub fn reset(&mut self) {
        self.scheduler.reset();
        self.oscillator.reset();
    }
}

/// UAC2 microphone function.
///
/// This is the single context object the USB stack drives: control requests,
/// alternate setting changes and the per-tick frame production all go
/// through it. The entity model is shared and may be observed or adjusted
/// from elsewhere through [`entities`](Self::entities).
pub struct Microphone<T> {
    entities: Arc<Entities>,
    producer: FrameProducer,
    transport: T,
    reset_on_close: bool,
}

impl<T> fmt::Debug for Microphone<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Microphone").field("entities", &self.entities).field("producer", &self.producer).finish()
    }
}

impl<T: Transport> Microphone<T> {
    /// Creates the microphone, writing frames into `transport`.
    pub fn new(config: MicConfig, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            entities: Arc::new(Entities::new(&config)),
            producer: FrameProducer::new(config.tone_hz, config.amplitude),
            transport,
            reset_on_close: config.reset_on_close,
        })
    }

    /// Shared entity model.
    pub fn entities(&self) -> &Arc<Entities> {
        &self.entities
    }

    /// Frame producer.
    pub fn producer(&self) -> &FrameProducer {
        &self.producer
    }

    /// Transport receiving the frames.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Active alternate setting.
    pub fn alt_setting(&self) -> AltSetting {
        self.entities.alt_setting()
    }

    /// Answers a GET request with at most `max_len` bytes.
    ///
    /// An error means the transfer must be stalled.
    pub fn on_get(&self, req: &ControlRequest, max_len: usize) -> Result<Bytes, ControlError> {
        tracing::debug!("[GET] {req}");
        router::handle_get(&self.entities, req, max_len).inspect_err(|err| tracing::warn!("GET {req} rejected: {err}"))
    }

    /// Checks whether a SET request would be accepted, before its data stage
    /// is received.
    ///
    /// Returns the expected payload length.
    pub fn check_set(&self, req: &ControlRequest) -> Result<usize, ControlError> {
        router::check_set(&self.entities, req).map(|(_, len)| len)
    }

    /// Applies a SET request with its data stage.
    ///
    /// An error means the transfer must be stalled. Nothing is changed then.
    pub fn on_set(&self, req: &ControlRequest, data: &[u8]) -> Result<(), ControlError> {
        tracing::debug!("[SET] {req}");
        router::handle_set(&self.entities, req, data).inspect_err(|err| tracing::warn!("SET {req} rejected: {err}"))
    }

    /// Host selected an alternate setting of the AudioStreaming interface.
    ///
    /// Queued frames of the previous format are discarded.
    pub fn on_set_interface(&mut self, alt: u8) -> Result<AltSetting, ControlError> {
        let alt = AltSetting::try_from(alt).inspect_err(|err| tracing::warn!("set interface rejected: {err}"))?;
        tracing::debug!("set interface alt={alt:?}");

        self.entities.set_alt_setting(alt);
        self.transport.clear();
        Ok(alt)
    }

    /// Stack closes the streaming endpoint ahead of an alternate setting change.
    pub fn on_close_endpoint(&mut self) {
        tracing::debug!("close endpoint");
        self.transport.clear();
        if self.reset_on_close {
            self.producer.reset();
        }
    }

    /// Produces and writes the frame of this tick.
    ///
    /// Returns the number of bytes written. Nothing is written while stopped.
    pub fn on_produce_tick(&mut self) -> usize {
        let frame = self.producer.produce(&self.entities);
        if frame.is_empty() {
            return 0;
        }
        self.transport.write(frame)
    }
}
