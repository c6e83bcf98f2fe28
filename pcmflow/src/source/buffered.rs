use std::collections::VecDeque;

use super::AudioSource;
use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};
use crate::sample::SampleEncoding;
use crate::spec::SignalSpec;

/// Replays a fixed list of frames.
///
/// Unlike the generators, its length is known up front, so both
/// [`AudioSource::total_samples`] and [`AudioSource::current_sample`] are
/// reported.
#[derive(Debug)]
pub struct BufferedSource {
    spec: SignalSpec,
    encoding: SampleEncoding,
    frames: VecDeque<AudioBuffer>,
    total: usize,
    current: usize,
}

impl BufferedSource {
    /// Fails with [`Error::SpecMismatch`] if a frame disagrees with `spec`
    /// or `encoding`.
    pub fn new(
        spec: SignalSpec,
        encoding: SampleEncoding,
        frames: impl IntoIterator<Item = AudioBuffer>,
    ) -> Result<Self> {
        let frames: VecDeque<AudioBuffer> = frames.into_iter().collect();
        for frame in &frames {
            if frame.encoding() != encoding {
                return Err(Error::spec_mismatch("encoding", encoding, frame.encoding()));
            }
            if frame.spec() != spec {
                return Err(Error::spec_mismatch("spec", spec, frame.spec()));
            }
        }
        let total = frames.iter().map(AudioBuffer::samples).sum();
        Ok(Self {
            spec,
            encoding,
            frames,
            total,
            current: 0,
        })
    }

    /// Builds a source that yields `buffer` as a single frame.
    pub fn from_buffer(buffer: AudioBuffer) -> Self {
        Self {
            spec: buffer.spec(),
            encoding: buffer.encoding(),
            total: buffer.samples(),
            frames: VecDeque::from([buffer]),
            current: 0,
        }
    }

    /// Returns the number of frames not yet yielded.
    pub fn remaining_frames(&self) -> usize {
        self.frames.len()
    }
}

impl AudioSource for BufferedSource {
    fn spec(&self) -> SignalSpec {
        self.spec
    }

    fn encoding(&self) -> SampleEncoding {
        self.encoding
    }

    fn total_samples(&self) -> Option<usize> {
        Some(self.total)
    }

    fn current_sample(&self) -> Option<usize> {
        Some(self.current)
    }

    fn next_frame(&mut self) -> Result<Option<AudioBuffer>> {
        let frame = self.frames.pop_front();
        if let Some(frame) = &frame {
            self.current += frame.samples();
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order() {
        let spec = SignalSpec::MONO_16K;
        let frames = vec![
            AudioBuffer::from_samples(&[1i16, 2, 3], spec).unwrap(),
            AudioBuffer::from_samples(&[4i16], spec).unwrap(),
        ];
        let mut src = BufferedSource::new(spec, SampleEncoding::I16, frames).unwrap();
        assert_eq!(src.total_samples(), Some(4));
        assert_eq!(src.remaining_frames(), 2);

        let a = src.next_frame().unwrap().unwrap();
        assert_eq!(a.to_samples::<i16>().unwrap(), vec![1, 2, 3]);
        assert_eq!(src.current_sample(), Some(3));

        let b = src.next_frame().unwrap().unwrap();
        assert_eq!(b.to_samples::<i16>().unwrap(), vec![4]);
        assert_eq!(src.current_sample(), Some(4));

        assert!(src.next_frame().unwrap().is_none());
        assert!(src.next_frame().unwrap().is_none());
        assert_eq!(src.current_sample(), Some(4));
    }

    #[test]
    fn test_rejects_foreign_frames() {
        let spec = SignalSpec::MONO_16K;
        let frame = AudioBuffer::from_samples(&[0.5f32], spec).unwrap();
        let err = BufferedSource::new(spec, SampleEncoding::I16, vec![frame]).unwrap_err();
        assert!(matches!(err, Error::SpecMismatch { field: "encoding", .. }));

        let frame = AudioBuffer::from_samples(&[0i16], SignalSpec::MONO_48K).unwrap();
        let err = BufferedSource::new(spec, SampleEncoding::I16, vec![frame]).unwrap_err();
        assert!(matches!(err, Error::SpecMismatch { field: "spec", .. }));
    }

    #[test]
    fn test_from_buffer() {
        let buf = AudioBuffer::from_samples(&[0u8; 6], SignalSpec::STEREO_44K).unwrap();
        let mut src = BufferedSource::from_buffer(buf);
        assert_eq!(src.spec(), SignalSpec::STEREO_44K);
        assert_eq!(src.encoding(), SampleEncoding::U8);
        assert_eq!(src.total_samples(), Some(3));
        assert_eq!(src.next_frame().unwrap().unwrap().samples(), 3);
        assert!(src.next_frame().unwrap().is_none());
    }
}
