//! Isochronous IN transport.

use bytes::Bytes;
use std::collections::VecDeque;

/// Sink for produced audio frames.
pub trait Transport {
    /// Queues one frame for transmission to the host.
    ///
    /// Returns the number of bytes accepted.
    fn write(&mut self, frame: &[u8]) -> usize;

    /// Discards all queued bytes that have not been transmitted yet.
    fn clear(&mut self);
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, frame: &[u8]) -> usize {
        (**self).write(frame)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

/// Bounded software FIFO of frames waiting for the endpoint.
///
/// Frames are kept whole: a frame that does not fit is dropped entirely.
#[derive(Debug, Clone)]
pub struct FrameQueue {
    frames: VecDeque<Bytes>,
    queued: usize,
    capacity: usize,
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl FrameQueue {
    /// Ten maximum-size 24-bit frames at 96 kHz.
    pub const DEFAULT_CAPACITY: usize = 10 * 288;

    /// Creates a queue holding at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self { frames: VecDeque::new(), queued: 0, capacity }
    }

    /// Bytes currently queued.
    pub fn queued(&self) -> usize {
        self.queued
    }

    /// Number of frames currently queued.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame is queued.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Oldest queued frame.
    pub fn front(&self) -> Option<&Bytes> {
        self.frames.front()
    }

    /// Removes and returns the oldest queued frame.
    pub fn pop(&mut self) -> Option<Bytes> {
        let frame = self.frames.pop_front()?;
        self.queued -= frame.len();
        Some(frame)
    }
}

impl Transport for FrameQueue {
    fn write(&mut self, frame: &[u8]) -> usize {
        if self.queued + frame.len() > self.capacity {
            tracing::trace!("frame queue full, dropping {} bytes", frame.len());
            return 0;
        }

        self.queued += frame.len();
        self.frames.push_back(Bytes::copy_from_slice(frame));
        frame.len()
    }

    fn clear(&mut self) {
        if !self.frames.is_empty() {
            tracing::debug!("discarding {} queued bytes", self.queued);
        }
        self.frames.clear();
        self.queued = 0;
    }
}
