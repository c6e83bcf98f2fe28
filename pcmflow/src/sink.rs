//! Consumers of finished PCM.
//!
//! A sink accepts only buffers that exactly match its configuration. Nothing
//! here converts: put a [`Reencoder`](crate::source::Reencoder) or
//! [`Resampler`](crate::source::Resampler) in front of the sink instead.

use std::io;

use tracing::debug;

use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};
use crate::sample::SampleEncoding;
use crate::source::AudioSource;
use crate::spec::SignalSpec;

/// A consumer of audio buffers, such as an output device.
pub trait AudioSink {
    /// Returns the spec the sink was opened with.
    fn spec(&self) -> SignalSpec;

    /// Returns the encoding the sink was opened with.
    fn encoding(&self) -> SampleEncoding;

    /// Writes one buffer.
    fn write(&mut self, buffer: &AudioBuffer) -> Result<()>;

    /// Flushes anything buffered by the sink.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Checks that `buffer` can be written to `sink` as is.
///
/// Fails with [`Error::SpecMismatch`] naming the first field that differs:
/// `encoding`, `channels` or `rate`.
pub fn check_compatible<K: AudioSink + ?Sized>(sink: &K, buffer: &AudioBuffer) -> Result<()> {
    if buffer.encoding() != sink.encoding() {
        return Err(Error::spec_mismatch("encoding", sink.encoding(), buffer.encoding()));
    }
    let (want, got) = (sink.spec(), buffer.spec());
    if got.channel_count() != want.channel_count() {
        return Err(Error::spec_mismatch(
            "channels",
            want.channel_count(),
            got.channel_count(),
        ));
    }
    if got.rate != want.rate {
        return Err(Error::spec_mismatch("rate", want.rate, got.rate));
    }
    Ok(())
}

/// A sink that writes raw interleaved bytes to an [`io::Write`].
pub struct WriterSink<W: io::Write> {
    writer: W,
    spec: SignalSpec,
    encoding: SampleEncoding,
    written: u64,
}

impl<W: io::Write> WriterSink<W> {
    pub fn new(writer: W, spec: SignalSpec, encoding: SampleEncoding) -> Self {
        Self {
            writer,
            spec,
            encoding,
            written: 0,
        }
    }

    /// Returns the number of bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consumes the sink and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> AudioSink for WriterSink<W> {
    fn spec(&self) -> SignalSpec {
        self.spec
    }

    fn encoding(&self) -> SampleEncoding {
        self.encoding
    }

    fn write(&mut self, buffer: &AudioBuffer) -> Result<()> {
        check_compatible(self, buffer)?;
        self.writer.write_all(buffer.bytes())?;
        self.written += buffer.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Pulls frames from `source` into `sink`.
///
/// Stops after `max_frames` frames, or when the source ends if `None`.
/// Returns the number of frames written; the sink is flushed on success.
pub fn pump<S, K>(source: &mut S, sink: &mut K, max_frames: Option<usize>) -> Result<usize>
where
    S: AudioSource + ?Sized,
    K: AudioSink + ?Sized,
{
    if max_frames.is_none() && source.is_infallible() {
        return Err(Error::Config(
            "pumping an endless source needs a frame limit".to_string(),
        ));
    }

    let mut frames = 0;
    while max_frames.is_none_or(|max| frames < max) {
        let Some(frame) = source.next_frame()? else {
            break;
        };
        sink.write(&frame)?;
        frames += 1;
    }
    sink.flush()?;
    debug!(frames, "pump: done");
    Ok(frames)
}
