//! PCM sample packing.

/// PCM format of the streamed samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// Signed 16-bit little endian.
    S16Le,
    /// Signed 24-bit little endian, three bytes per sample.
    S24Le,
}

impl SampleFormat {
    /// Size of one packed sample.
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::S16Le => 2,
            Self::S24Le => 3,
        }
    }

    /// Bit resolution.
    pub const fn bits(self) -> u8 {
        match self {
            Self::S16Le => 16,
            Self::S24Le => 24,
        }
    }

    /// Integer value of a full-scale sample.
    pub const fn full_scale(self) -> i32 {
        match self {
            Self::S16Le => i16::MAX as i32,
            Self::S24Le => 0x7f_ffff,
        }
    }

    /// Quantizes a sample in `[-1, 1]` to the nearest integer step.
    pub fn quantize(self, value: f32) -> i32 {
        (value.clamp(-1.0, 1.0) * self.full_scale() as f32).round() as i32
    }

    /// Packs one sample into `out`, which must hold [`bytes_per_sample`](Self::bytes_per_sample) bytes.
    pub fn pack(self, value: f32, out: &mut [u8]) {
        let v = self.quantize(value);
        match self {
            Self::S16Le => out.copy_from_slice(&(v as i16).to_le_bytes()),
            Self::S24Le => out.copy_from_slice(&(v & 0xff_ffff).to_le_bytes()[..3]),
        }
    }
}

/// Linear gain derived from the feature unit state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gain(f32);

impl Gain {
    /// Silence.
    pub const MUTE: Self = Self(0.0);

    /// Gain of `amplitude` attenuated by `volume` in 1/256 dB, or silence when muted.
    pub fn new(amplitude: f32, volume: i16, muted: bool) -> Self {
        if muted {
            return Self::MUTE;
        }
        Self(amplitude * Self::db_to_linear(volume))
    }

    /// Converts 1/256 dB to a linear factor.
    pub fn db_to_linear(volume: i16) -> f32 {
        10f32.powf(f32::from(volume) / 256.0 / 20.0)
    }

    /// Linear factor.
    pub fn factor(self) -> f32 {
        self.0
    }

    /// Applies the gain to a sample.
    pub fn apply(self, sample: f32) -> f32 {
        sample * self.0
    }
}

/// Scales and packs samples into `out` until either runs out.
///
/// Returns the number of bytes written.
pub fn pack_frame(format: SampleFormat, gain: Gain, samples: impl IntoIterator<Item = f32>, out: &mut [u8]) -> usize {
    let mut written = 0;
    for (chunk, sample) in out.chunks_exact_mut(format.bytes_per_sample()).zip(samples) {
        format.pack(gain.apply(sample), chunk);
        written += chunk.len();
    }
    written
}
