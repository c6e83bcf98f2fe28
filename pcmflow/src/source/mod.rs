//! Pull-based audio sources.
//!
//! An [`AudioSource`] yields interleaved PCM one [`AudioBuffer`] at a time.
//! Generators such as [`Sine`] produce frames; decorators such as
//! [`Reencoder`] and [`Resampler`] wrap another source and transform what it
//! yields. Every call to [`AudioSource::next_frame`] is a synchronous pull
//! through the whole chain.
//!
//! # Lifecycle
//!
//! A source is ready until `next_frame` returns `Ok(None)`. From then on it is
//! exhausted and keeps returning `Ok(None)`.
//!
//! # Example
//!
//! ```rust
//! use pcmflow::source::{AudioSource, Reencoder, Sine};
//! use pcmflow::{SampleEncoding, SignalSpec};
//!
//! let sine = Sine::new(SignalSpec::MONO_16K, 440.0).unwrap();
//! let mut chain = Reencoder::new(sine, SampleEncoding::I16);
//!
//! let frame = chain.next_frame().unwrap().unwrap();
//! assert_eq!(frame.encoding(), SampleEncoding::I16);
//! assert_eq!(frame.len(), 16000 * 2);
//! ```

mod buffered;
mod reencoder;
mod resampler;
mod sine;

pub use buffered::BufferedSource;
pub use reencoder::Reencoder;
pub use resampler::Resampler;
pub use sine::Sine;

use crate::buffer::AudioBuffer;
use crate::error::Result;
use crate::sample::SampleEncoding;
use crate::spec::SignalSpec;

/// A lazy producer of PCM frames.
pub trait AudioSource: Send {
    /// Returns the shape of every frame this source yields.
    fn spec(&self) -> SignalSpec;

    /// Returns the sample encoding of every frame this source yields.
    fn encoding(&self) -> SampleEncoding;

    /// Total samples per channel over the whole stream, if known.
    fn total_samples(&self) -> Option<usize> {
        None
    }

    /// Samples per channel yielded so far, if known.
    fn current_sample(&self) -> Option<usize> {
        None
    }

    /// Pulls the next frame; `Ok(None)` marks the end of the stream.
    fn next_frame(&mut self) -> Result<Option<AudioBuffer>>;

    /// Returns true if the source can never end or fail.
    fn is_infallible(&self) -> bool {
        false
    }
}

impl<S: AudioSource + ?Sized> AudioSource for Box<S> {
    fn spec(&self) -> SignalSpec {
        (**self).spec()
    }

    fn encoding(&self) -> SampleEncoding {
        (**self).encoding()
    }

    fn total_samples(&self) -> Option<usize> {
        (**self).total_samples()
    }

    fn current_sample(&self) -> Option<usize> {
        (**self).current_sample()
    }

    fn next_frame(&mut self) -> Result<Option<AudioBuffer>> {
        (**self).next_frame()
    }

    fn is_infallible(&self) -> bool {
        (**self).is_infallible()
    }
}
