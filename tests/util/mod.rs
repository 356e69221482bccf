#![allow(dead_code)]

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use uac2_mic::{ControlRequest, EntityId, FrameQueue, MicConfig, Microphone, SampleFormat, Transport, CUR, RANGE};

pub fn init_log() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        tracing_subscriber::registry().with(fmt::layer()).with(EnvFilter::from_default_env()).init();
        tracing_log::LogTracer::init().unwrap();
    });
}

/// Transport remembering every write and every clear.
#[derive(Debug, Default)]
pub struct Recorder {
    pub frames: Vec<Vec<u8>>,
    pub pending: Vec<Vec<u8>>,
    pub writes: usize,
    pub clears: usize,
}

impl Recorder {
    /// Simulates the endpoint transmitting everything pending.
    pub fn transmit(&mut self) {
        self.frames.append(&mut self.pending);
    }
}

impl Transport for Recorder {
    fn write(&mut self, frame: &[u8]) -> usize {
        self.writes += 1;
        self.pending.push(frame.to_vec());
        frame.len()
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.pending.clear();
    }
}

pub fn microphone(config: MicConfig) -> Microphone<Recorder> {
    init_log();
    Microphone::new(config, Recorder::default()).expect("invalid config")
}

pub fn queued_microphone(config: MicConfig) -> Microphone<FrameQueue> {
    init_log();
    Microphone::new(config, FrameQueue::default()).expect("invalid config")
}

pub fn cur(entity: EntityId, selector: u8) -> ControlRequest {
    ControlRequest::new(entity, selector, CUR)
}

pub fn range(entity: EntityId, selector: u8) -> ControlRequest {
    ControlRequest::new(entity, selector, RANGE)
}

/// Decodes a packed frame into integer samples.
pub fn decode(format: SampleFormat, frame: &[u8]) -> Vec<i32> {
    frame
        .chunks_exact(format.bytes_per_sample())
        .map(|b| match format {
            SampleFormat::S16Le => i32::from(i16::from_le_bytes([b[0], b[1]])),
            SampleFormat::S24Le => i32::from_le_bytes([0, b[0], b[1], b[2]]) >> 8,
        })
        .collect()
}
