//! Audio buffer type.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::sample::{
    check_width, convert_bytes, decode_samples, encode_samples, Sample, SampleEncoding, U24,
};
use crate::spec::SignalSpec;

/// One packet of interleaved PCM.
///
/// The byte length is always a whole number of sample sets, that is a multiple
/// of `channel_count * byte_width`. Buffers are never mutated after
/// construction; transformations produce a new buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    data: Vec<u8>,
    spec: SignalSpec,
    encoding: SampleEncoding,
}

impl AudioBuffer {
    /// Wraps raw interleaved bytes.
    ///
    /// Fails with [`Error::SizeMismatch`] if the length is not a whole number
    /// of sample sets.
    pub fn new(data: Vec<u8>, spec: SignalSpec, encoding: SampleEncoding) -> Result<Self> {
        check_width(data.len(), spec.frame_size(encoding))?;
        Ok(Self {
            data,
            spec,
            encoding,
        })
    }

    /// Creates a buffer of digital silence covering `duration`.
    ///
    /// Holds `floor(rate * duration)` samples per channel. Fails with
    /// [`Error::AllocationFailure`] if the storage cannot be obtained,
    /// including when the byte count does not fit in `usize`.
    pub fn silence(duration: Duration, spec: SignalSpec, encoding: SampleEncoding) -> Result<Self> {
        // An unrepresentable length fails the reservation as a capacity overflow.
        let len = spec.bytes_in_duration(duration, encoding).unwrap_or(usize::MAX);
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        match encoding {
            SampleEncoding::U8 => fill(&mut data, len, <u8 as Sample>::SILENCE),
            SampleEncoding::U16 => fill(&mut data, len, <u16 as Sample>::SILENCE),
            SampleEncoding::U24 => fill(&mut data, len, <U24 as Sample>::SILENCE),
            SampleEncoding::U32 => fill(&mut data, len, <u32 as Sample>::SILENCE),
            // Zero bytes for the signed and float encodings.
            _ => data.resize(len, 0),
        }
        Self::new(data, spec, encoding)
    }

    /// Serializes typed samples into a buffer.
    pub fn from_samples<T: Sample>(samples: &[T], spec: SignalSpec) -> Result<Self> {
        Self::new(encode_samples(samples)?, spec, T::ENCODING)
    }

    /// Returns the signal spec.
    pub fn spec(&self) -> SignalSpec {
        self.spec
    }

    /// Returns the sample encoding.
    pub fn encoding(&self) -> SampleEncoding {
        self.encoding
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the raw interleaved bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer and returns the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns the number of samples per channel.
    pub fn samples(&self) -> usize {
        self.spec.samples(self.data.len(), self.encoding)
    }

    /// Returns the playback duration.
    pub fn duration(&self) -> Duration {
        self.spec.duration(self.data.len(), self.encoding)
    }

    /// Decodes the interleaved samples as `T`.
    ///
    /// Fails with [`Error::SpecMismatch`] if `T` is not the buffer's encoding.
    pub fn to_samples<T: Sample>(&self) -> Result<Vec<T>> {
        if T::ENCODING != self.encoding {
            return Err(Error::spec_mismatch("encoding", self.encoding, T::ENCODING));
        }
        decode_samples(&self.data)
    }

    /// Converts the buffer to another encoding, keeping its spec.
    pub fn convert(self, encoding: SampleEncoding) -> Result<Self> {
        if encoding == self.encoding {
            return Ok(self);
        }
        let data = convert_bytes(&self.data, self.encoding, encoding)?;
        Self::new(data, self.spec, encoding)
    }

    /// Returns a copy tagged with another spec.
    ///
    /// The channel count must stay the same.
    pub(crate) fn with_spec(self, spec: SignalSpec) -> Self {
        debug_assert_eq!(spec.channel_count(), self.spec.channel_count());
        Self { spec, ..self }
    }
}

fn fill<T: Sample>(data: &mut Vec<u8>, len: usize, value: T) {
    while data.len() < len {
        value.write_le(data);
    }
}
