//! Linear PCM conversion and pull-based audio source chains.
//!
//! This crate provides:
//!
//! - `sample`: the ten sample encodings and the bit-exact conversion matrix
//! - `channel` / `spec`: channel layouts and the (rate, layout) stream shape
//! - `buffer`: [`AudioBuffer`], one packet of interleaved PCM
//! - `source`: the [`AudioSource`] trait with the sine generator and the
//!   re-encoding and resampling decorators
//! - `sink`: the output boundary, which accepts only exactly matching buffers
//! - `config`: YAML description of a source chain
//!
//! # Example
//!
//! ```rust
//! use pcmflow::source::{AudioSource, Reencoder, Resampler, Sine};
//! use pcmflow::sink::{pump, WriterSink};
//! use pcmflow::{SampleEncoding, SignalSpec};
//!
//! // 48kHz stereo sine, converted to 44.1kHz 16-bit
//! let sine = Sine::new(SignalSpec::STEREO_48K, 880.0).unwrap();
//! let resampled = Resampler::new(sine, SignalSpec::STEREO_44K).unwrap();
//! let mut chain = Reencoder::new(resampled, SampleEncoding::I16);
//!
//! let mut sink = WriterSink::new(Vec::new(), SignalSpec::STEREO_44K, SampleEncoding::I16);
//! pump(&mut chain, &mut sink, Some(2)).unwrap();
//! assert!(sink.bytes_written() > 0);
//! ```

pub mod buffer;
pub mod channel;
pub mod config;
pub mod error;
pub mod sample;
pub mod sink;
pub mod source;
pub mod spec;

pub use buffer::AudioBuffer;
pub use channel::{ChannelFlag, ChannelLayout, LayoutPreset};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use sample::{Sample, SampleEncoding, I24, U24};
pub use sink::AudioSink;
pub use source::AudioSource;
pub use spec::SignalSpec;
