use std::f64::consts::PI;

use tracing::trace;

use super::AudioSource;
use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};
use crate::sample::SampleEncoding;
use crate::spec::SignalSpec;

/// Endless sine generator.
///
/// Every frame holds `rate * channel_count` f32 samples, where sample `n` of
/// the stream is `sin(frequency * PI * n / rate)`. The series runs over the
/// interleaved positions, so channels do not share a phase.
#[derive(Debug, Clone)]
pub struct Sine {
    spec: SignalSpec,
    frequency: f64,
    phase_reset: bool,
    /// Phase of the next sample in radians, kept in `[0, 2*PI)`.
    phase: f64,
}

impl Sine {
    /// Creates a generator for `spec`.
    ///
    /// Fails with [`Error::SpecMismatch`] if the layout has no channels or the
    /// rate is zero, since no frame could be produced for either.
    pub fn new(spec: SignalSpec, frequency: f64) -> Result<Self> {
        if spec.channel_count() == 0 {
            return Err(Error::spec_mismatch("channels", "at least one", 0));
        }
        if spec.rate == 0 {
            return Err(Error::spec_mismatch("rate", "non-zero", 0));
        }
        Ok(Self {
            spec,
            frequency,
            phase_reset: false,
            phase: 0.0,
        })
    }

    /// Restarts every frame at phase zero instead of continuing the wave.
    pub fn with_phase_reset(mut self, phase_reset: bool) -> Self {
        self.phase_reset = phase_reset;
        self
    }

    /// Returns the frequency parameter.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    fn step(&self) -> f64 {
        self.frequency * PI / self.spec.rate as f64
    }
}

impl AudioSource for Sine {
    fn spec(&self) -> SignalSpec {
        self.spec
    }

    fn encoding(&self) -> SampleEncoding {
        SampleEncoding::F32
    }

    fn next_frame(&mut self) -> Result<Option<AudioBuffer>> {
        let count = self.spec.rate as usize * self.spec.channel_count();
        let step = self.step();
        let start = if self.phase_reset { 0.0 } else { self.phase };

        let samples: Vec<f32> = (0..count)
            .map(|i| (start + step * i as f64).sin() as f32)
            .collect();

        if !self.phase_reset {
            self.phase = (start + step * count as f64).rem_euclid(2.0 * PI);
        }
        trace!(samples = count, phase = self.phase, "sine: frame");

        AudioBuffer::from_samples(&samples, self.spec).map(Some)
    }

    fn is_infallible(&self) -> bool {
        true
    }
}
