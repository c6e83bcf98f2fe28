use tracing::trace;

use super::AudioSource;
use crate::buffer::AudioBuffer;
use crate::error::Result;
use crate::sample::SampleEncoding;
use crate::spec::SignalSpec;

/// Changes the sample encoding of every frame of the inner source.
///
/// Frames already in the target encoding are passed through untouched.
pub struct Reencoder<S> {
    inner: S,
    encoding: SampleEncoding,
}

impl<S: AudioSource> Reencoder<S> {
    pub fn new(inner: S, encoding: SampleEncoding) -> Self {
        Self { inner, encoding }
    }

    /// Returns a reference to the wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Consumes the decorator and returns the wrapped source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: AudioSource> AudioSource for Reencoder<S> {
    fn spec(&self) -> SignalSpec {
        self.inner.spec()
    }

    fn encoding(&self) -> SampleEncoding {
        self.encoding
    }

    fn total_samples(&self) -> Option<usize> {
        self.inner.total_samples()
    }

    fn current_sample(&self) -> Option<usize> {
        self.inner.current_sample()
    }

    fn next_frame(&mut self) -> Result<Option<AudioBuffer>> {
        let Some(frame) = self.inner.next_frame()? else {
            return Ok(None);
        };
        if frame.encoding() == self.encoding {
            trace!(encoding = %self.encoding, "reencoder: pass through");
            return Ok(Some(frame));
        }
        trace!(
            from = %frame.encoding(),
            to = %self.encoding,
            bytes = frame.len(),
            "reencoder: convert"
        );
        frame.convert(self.encoding).map(Some)
    }

    fn is_infallible(&self) -> bool {
        self.inner.is_infallible()
    }
}
