//! Signal shape of a PCM stream.

use std::fmt;
use std::time::Duration;

use crate::channel::ChannelLayout;
use crate::sample::SampleEncoding;

/// Sample rate and channel layout of a PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalSpec {
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub rate: u32,
    /// Enabled channels.
    pub channels: ChannelLayout,
}

impl SignalSpec {
    /// Creates a new signal spec.
    pub const fn new(rate: u32, channels: ChannelLayout) -> Self {
        Self { rate, channels }
    }

    /// Creates a mono spec with the given sample rate.
    pub const fn mono(rate: u32) -> Self {
        Self::new(rate, ChannelLayout::MONO)
    }

    /// Creates a stereo spec with the given sample rate.
    pub const fn stereo(rate: u32) -> Self {
        Self::new(rate, ChannelLayout::STEREO)
    }

    /// Returns the number of channels.
    #[inline]
    pub const fn channel_count(&self) -> usize {
        self.channels.count()
    }

    /// Returns a copy with a different sample rate.
    pub const fn with_rate(self, rate: u32) -> Self {
        Self::new(rate, self.channels)
    }

    /// Returns the number of bytes in one interleaved sample set.
    #[inline]
    pub fn frame_size(&self, encoding: SampleEncoding) -> usize {
        self.channel_count() * encoding.byte_width()
    }

    /// Returns the number of samples per channel covering the duration.
    ///
    /// Returns `None` if the count does not fit in `usize`.
    pub fn samples_in_duration(&self, duration: Duration) -> Option<usize> {
        usize::try_from(self.rate as u128 * duration.as_nanos() / 1_000_000_000).ok()
    }

    /// Returns the number of bytes covering the duration.
    ///
    /// Returns `None` if the byte count does not fit in `usize`.
    pub fn bytes_in_duration(
        &self,
        duration: Duration,
        encoding: SampleEncoding,
    ) -> Option<usize> {
        self.samples_in_duration(duration)?.checked_mul(self.frame_size(encoding))
    }

    /// Returns the number of samples per channel held in `bytes` bytes.
    pub fn samples(&self, bytes: usize, encoding: SampleEncoding) -> usize {
        match self.frame_size(encoding) {
            0 => 0,
            frame_size => bytes / frame_size,
        }
    }

    /// Returns the playback duration of `bytes` bytes.
    pub fn duration(&self, bytes: usize, encoding: SampleEncoding) -> Duration {
        if self.rate == 0 {
            return Duration::ZERO;
        }
        let samples = self.samples(bytes, encoding) as u128;
        Duration::from_nanos((samples * 1_000_000_000 / self.rate as u128) as u64)
    }
}

// Common spec presets
impl SignalSpec {
    /// 16kHz mono
    pub const MONO_16K: SignalSpec = SignalSpec::mono(16000);
    /// 48kHz mono
    pub const MONO_48K: SignalSpec = SignalSpec::mono(48000);
    /// 44.1kHz stereo (CD quality)
    pub const STEREO_44K: SignalSpec = SignalSpec::stereo(44100);
    /// 48kHz stereo
    pub const STEREO_48K: SignalSpec = SignalSpec::stereo(48000);
}

impl fmt::Display for SignalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz {}", self.rate, self.channels)
    }
}
