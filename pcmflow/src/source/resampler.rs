use rubato::{FftFixedInOut, Resampler as RubatoResampler, Sample as RubatoSample};
use tracing::{debug, trace};

use super::AudioSource;
use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};
use crate::sample::{Sample, SampleEncoding};
use crate::spec::SignalSpec;

/// Frames per processing block handed to rubato.
const CHUNK_SIZE: usize = 1024;

/// Changes the sample rate of the inner source.
///
/// Rate conversion is done by rubato's FFT resampler; frames come out in the
/// inner source's encoding. The resampler delay is dropped from the head of
/// the stream and the tail is flushed with silence once the inner source
/// ends, so a finite stream of `n` samples per channel comes out as exactly
/// `floor(n * target_rate / inner_rate)` samples per channel.
///
/// Sources in `I32`, `U32` or `F64` are processed in f64. Every other
/// encoding fits in an f32 mantissa and is processed in f32.
///
/// Equal rates skip rubato entirely; frames pass through with only their spec
/// rewritten.
pub struct Resampler<S> {
    inner: S,
    spec: SignalSpec,
    inner_rate: u32,
    backend: Option<Backend>,
}

impl<S: AudioSource> Resampler<S> {
    /// Wraps `inner`, taking the rate of `spec`.
    ///
    /// Fails with [`Error::SpecMismatch`] if the channel counts differ or
    /// either rate is zero.
    pub fn new(inner: S, spec: SignalSpec) -> Result<Self> {
        let inner_spec = inner.spec();
        if inner_spec.channel_count() != spec.channel_count() {
            return Err(Error::spec_mismatch(
                "channels",
                inner_spec.channel_count(),
                spec.channel_count(),
            ));
        }
        if inner_spec.rate == 0 {
            return Err(Error::spec_mismatch("rate", "non-zero", inner_spec.rate));
        }
        if spec.rate == 0 {
            return Err(Error::spec_mismatch("rate", "non-zero", spec.rate));
        }

        let backend = if inner_spec.rate == spec.rate {
            None
        } else {
            Some(Backend::new(
                inner.encoding(),
                inner_spec.rate,
                spec.rate,
                spec.channel_count(),
            )?)
        };
        debug!(
            from = inner_spec.rate,
            to = spec.rate,
            channels = spec.channel_count(),
            working = ?backend.as_ref().map(Backend::encoding),
            "resampler: created"
        );

        Ok(Self {
            inner,
            spec,
            inner_rate: inner_spec.rate,
            backend,
        })
    }

    /// Returns a reference to the wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn project(&self, count: usize) -> usize {
        project(count, self.inner_rate, self.spec.rate)
    }
}

impl<S: AudioSource> AudioSource for Resampler<S> {
    fn spec(&self) -> SignalSpec {
        self.spec
    }

    fn encoding(&self) -> SampleEncoding {
        self.inner.encoding()
    }

    fn total_samples(&self) -> Option<usize> {
        self.inner.total_samples().map(|n| self.project(n))
    }

    fn current_sample(&self) -> Option<usize> {
        self.inner.current_sample().map(|n| self.project(n))
    }

    fn next_frame(&mut self) -> Result<Option<AudioBuffer>> {
        match &mut self.backend {
            None => Ok(self.inner.next_frame()?.map(|f| f.with_spec(self.spec))),
            Some(Backend::Single(engine)) => engine.next_frame(&mut self.inner, self.spec),
            Some(Backend::Double(engine)) => engine.next_frame(&mut self.inner, self.spec),
        }
    }

    fn is_infallible(&self) -> bool {
        self.inner.is_infallible()
    }
}

/// `count * to / from`, rounded down.
fn project(count: usize, from: u32, to: u32) -> usize {
    (count as u128 * to as u128 / from as u128) as usize
}

/// Engine picked by the precision the inner encoding needs.
enum Backend {
    Single(Engine<f32>),
    Double(Engine<f64>),
}

impl Backend {
    fn new(encoding: SampleEncoding, from: u32, to: u32, channels: usize) -> Result<Self> {
        match encoding {
            SampleEncoding::I32 | SampleEncoding::U32 | SampleEncoding::F64 => {
                Ok(Backend::Double(Engine::new(from, to, channels)?))
            }
            _ => Ok(Backend::Single(Engine::new(from, to, channels)?)),
        }
    }

    fn encoding(&self) -> SampleEncoding {
        match self {
            Backend::Single(_) => SampleEncoding::F32,
            Backend::Double(_) => SampleEncoding::F64,
        }
    }
}

/// Rubato state plus per-channel input not yet consumed.
struct Engine<T> {
    fft: FftFixedInOut<T>,
    channels: usize,
    from: u32,
    to: u32,
    pending: Vec<Vec<T>>,
    output: Vec<Vec<T>>,
    /// Output frames still to drop from the head.
    delay: usize,
    /// Samples per channel pulled from the inner source.
    received: usize,
    /// Samples per channel yielded.
    emitted: usize,
    finished: bool,
}

impl<T: Sample + RubatoSample> Engine<T> {
    fn new(from: u32, to: u32, channels: usize) -> Result<Self> {
        let fft = FftFixedInOut::<T>::new(from as usize, to as usize, CHUNK_SIZE, channels)?;
        let delay = fft.output_delay();
        let output = vec![vec![T::SILENCE; fft.output_frames_max()]; channels];
        Ok(Self {
            fft,
            channels,
            from,
            to,
            pending: vec![Vec::new(); channels],
            output,
            delay,
            received: 0,
            emitted: 0,
            finished: false,
        })
    }

    /// Pulls from `inner` until at least one output frame is ready or the
    /// stream has been flushed.
    fn next_frame<S: AudioSource>(
        &mut self,
        inner: &mut S,
        spec: SignalSpec,
    ) -> Result<Option<AudioBuffer>> {
        if self.finished {
            return Ok(None);
        }

        let channels = self.channels;
        let mut ready = Vec::new();
        while ready.is_empty() && !self.finished {
            match inner.next_frame()? {
                Some(frame) => {
                    self.received += frame.samples();
                    let samples = frame.convert(T::ENCODING)?.to_samples::<T>()?;
                    self.push(&samples);
                    while self.has_chunk() {
                        self.process(&mut ready)?;
                    }
                }
                None => {
                    let target = project(self.received, self.from, self.to);
                    while self.emitted + ready.len() / channels < target {
                        self.process(&mut ready)?;
                    }
                    ready.truncate(target.saturating_sub(self.emitted) * channels);
                    self.finished = true;
                    debug!(received = self.received, total = target, "resampler: flushed");
                }
            }
        }

        if ready.is_empty() {
            return Ok(None);
        }
        self.emitted += ready.len() / channels;
        trace!(samples = ready.len() / channels, emitted = self.emitted, "resampler: frame");

        let frame = AudioBuffer::from_samples(&ready, spec)?;
        frame.convert(inner.encoding()).map(Some)
    }

    /// Appends interleaved samples to the per-channel queues.
    fn push(&mut self, interleaved: &[T]) {
        for (i, &s) in interleaved.iter().enumerate() {
            self.pending[i % self.channels].push(s);
        }
    }

    fn has_chunk(&self) -> bool {
        self.pending[0].len() >= self.fft.input_frames_next()
    }

    /// Runs one block, padding short input with silence, and appends the
    /// interleaved output. Returns the number of frames appended.
    fn process(&mut self, ready: &mut Vec<T>) -> Result<usize> {
        let needed = self.fft.input_frames_next();
        for ch in &mut self.pending {
            if ch.len() < needed {
                ch.resize(needed, T::SILENCE);
            }
        }

        let input: Vec<&[T]> = self.pending.iter().map(|ch| &ch[..needed]).collect();
        let (used, written) = self.fft.process_into_buffer(&input, &mut self.output, None)?;
        for ch in &mut self.pending {
            ch.drain(..used);
        }

        let skip = self.delay.min(written);
        self.delay -= skip;
        ready.try_reserve((written - skip) * self.channels)?;
        for frame in skip..written {
            for ch in &self.output {
                ready.push(ch[frame]);
            }
        }
        Ok(written - skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelLayout;
    use crate::source::{BufferedSource, Sine};

    fn ramp(spec: SignalSpec, frames: usize, len: usize) -> BufferedSource {
        let channels = spec.channel_count();
        let buffers = (0..frames).map(|f| {
            let samples: Vec<i16> = (0..len * channels)
                .map(|i| ((f * len * channels + i) % 2000) as i16 - 1000)
                .collect();
            AudioBuffer::from_samples(&samples, spec).unwrap()
        });
        BufferedSource::new(spec, SampleEncoding::I16, buffers).unwrap()
    }

    fn drain<S: AudioSource>(src: &mut S) -> Vec<AudioBuffer> {
        let mut out = Vec::new();
        while let Some(frame) = src.next_frame().unwrap() {
            out.push(frame);
        }
        out
    }

    #[test]
    fn test_total_matches_projection() {
        let inner = ramp(SignalSpec::MONO_16K, 2, 1000);
        let mut rs = Resampler::new(inner, SignalSpec::mono(44100)).unwrap();
        assert_eq!(rs.total_samples(), Some(5512));
        assert_eq!(rs.current_sample(), Some(0));

        let frames = drain(&mut rs);
        let total: usize = frames.iter().map(AudioBuffer::samples).sum();
        assert_eq!(total, 5512);
        for frame in &frames {
            assert_eq!(frame.spec(), SignalSpec::mono(44100));
            assert_eq!(frame.encoding(), SampleEncoding::I16);
        }
        assert_eq!(rs.current_sample(), Some(5512));
        assert!(rs.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_downsample_stereo() {
        let inner = ramp(SignalSpec::STEREO_48K, 3, 4800);
        let mut rs = Resampler::new(inner, SignalSpec::STEREO_44K).unwrap();
        let total: usize = drain(&mut rs).iter().map(AudioBuffer::samples).sum();
        assert_eq!(total, 3 * 4800 * 44100 / 48000);
    }

    #[test]
    fn test_equal_rates_pass_through() {
        let spec = SignalSpec::STEREO_48K;
        let target = SignalSpec::new(48000, ChannelLayout::from_bits(0b11_0000));
        let expected = drain(&mut ramp(spec, 2, 10));

        let mut rs = Resampler::new(ramp(spec, 2, 10), target).unwrap();
        let frames = drain(&mut rs);
        assert_eq!(frames.len(), expected.len());
        for (got, want) in frames.iter().zip(&expected) {
            assert_eq!(got.bytes(), want.bytes());
            assert_eq!(got.spec(), target);
        }
    }

    #[test]
    fn test_rejects_channel_mismatch() {
        let err = Resampler::new(ramp(SignalSpec::MONO_16K, 1, 10), SignalSpec::STEREO_48K)
            .err()
            .unwrap();
        assert!(matches!(err, Error::SpecMismatch { field: "channels", .. }));
    }

    #[test]
    fn test_rejects_zero_rate() {
        let err = Resampler::new(ramp(SignalSpec::MONO_16K, 1, 10), SignalSpec::mono(0))
            .err()
            .unwrap();
        assert!(matches!(err, Error::SpecMismatch { field: "rate", .. }));
    }

    #[test]
    fn test_empty_inner() {
        let inner = BufferedSource::new(SignalSpec::MONO_16K, SampleEncoding::F32, vec![]).unwrap();
        let mut rs = Resampler::new(inner, SignalSpec::MONO_48K).unwrap();
        assert_eq!(rs.total_samples(), Some(0));
        assert!(rs.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_sine_upsampled_keeps_shape() {
        // 440 Hz tone at 16 kHz, converted to 48 kHz.
        let sine = Sine::new(SignalSpec::MONO_16K, 880.0).unwrap();
        let mut rs = Resampler::new(sine, SignalSpec::MONO_48K).unwrap();
        assert!(rs.is_infallible());
        assert_eq!(rs.total_samples(), None);

        let frame = rs.next_frame().unwrap().unwrap();
        assert_eq!(frame.encoding(), SampleEncoding::F32);
        let values = frame.to_samples::<f32>().unwrap();
        assert!(values.len() > 20_000);

        let step = 880.0 * std::f64::consts::PI / 48000.0;
        for (n, v) in values.iter().enumerate().skip(4096).take(8192) {
            let want = (step * n as f64).sin() as f32;
            assert!((v - want).abs() < 0.15, "sample {}: got {}, want {}", n, v, want);
        }
    }

    #[test]
    fn test_working_precision_follows_encoding() {
        let rs = Resampler::new(ramp(SignalSpec::MONO_16K, 1, 10), SignalSpec::MONO_48K).unwrap();
        assert!(matches!(rs.backend, Some(Backend::Single(_))));

        for encoding in [SampleEncoding::I32, SampleEncoding::U32, SampleEncoding::F64] {
            let inner = BufferedSource::new(SignalSpec::MONO_16K, encoding, vec![]).unwrap();
            let rs = Resampler::new(inner, SignalSpec::MONO_48K).unwrap();
            assert!(matches!(rs.backend, Some(Backend::Double(_))), "{}", encoding);
        }
    }

    #[test]
    fn test_i32_keeps_low_bits() {
        // Needs more mantissa than f32 has.
        const LEVEL: i32 = 0x1234_5677;
        let spec = SignalSpec::MONO_16K;
        let buffers = (0..8).map(|_| AudioBuffer::from_samples(&[LEVEL; 1000], spec).unwrap());
        let inner = BufferedSource::new(spec, SampleEncoding::I32, buffers).unwrap();
        let mut rs = Resampler::new(inner, SignalSpec::mono(32000)).unwrap();

        let values: Vec<i32> = drain(&mut rs)
            .iter()
            .flat_map(|f| f.to_samples::<i32>().unwrap())
            .collect();
        assert_eq!(values.len(), 16000);
        for (n, &v) in values.iter().enumerate().skip(4096).take(8000) {
            assert!((v - LEVEL).abs() <= 1, "sample {}: got {:#x}", n, v);
        }
    }
}
