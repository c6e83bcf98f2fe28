//! Sample encodings and the conversion matrix between them.
//!
//! # Key Types
//!
//! - [`SampleEncoding`]: runtime tag for one of the ten supported encodings
//! - [`Sample`]: implemented by the ten concrete storage types
//! - [`ConvertSample`]: scalar conversion between any two storage types
//! - [`I24`] / [`U24`]: 24-bit integers with modulo-2^24 arithmetic
//!
//! # Example
//!
//! ```rust
//! use pcmflow::sample::{convert_bytes, convert_sample, SampleEncoding};
//!
//! assert_eq!(convert_sample::<i16, u8>(i16::MAX), u8::MAX);
//!
//! let pcm = 0x4000i16.to_le_bytes();
//! let floats = convert_bytes(&pcm, SampleEncoding::I16, SampleEncoding::F32).unwrap();
//! assert_eq!(f32::from_le_bytes(floats[..4].try_into().unwrap()), 0.5);
//! ```

mod convert;
mod int24;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use convert::*;
pub use int24::{I24, U24};

/// Runtime tag for a linear PCM sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SampleEncoding {
    U8 = 0,
    U16 = 1,
    U24 = 2,
    U32 = 3,
    I8 = 4,
    I16 = 5,
    I24 = 6,
    I32 = 7,
    F32 = 8,
    F64 = 9,
}

impl SampleEncoding {
    /// All encodings, in tag order.
    pub const ALL: [SampleEncoding; 10] = [
        SampleEncoding::U8,
        SampleEncoding::U16,
        SampleEncoding::U24,
        SampleEncoding::U32,
        SampleEncoding::I8,
        SampleEncoding::I16,
        SampleEncoding::I24,
        SampleEncoding::I32,
        SampleEncoding::F32,
        SampleEncoding::F64,
    ];

    /// Returns the number of bytes one sample occupies.
    pub const fn byte_width(self) -> usize {
        match self {
            SampleEncoding::U8 | SampleEncoding::I8 => 1,
            SampleEncoding::U16 | SampleEncoding::I16 => 2,
            SampleEncoding::U24 | SampleEncoding::I24 => 3,
            SampleEncoding::U32 | SampleEncoding::I32 | SampleEncoding::F32 => 4,
            SampleEncoding::F64 => 8,
        }
    }

    /// Returns true for the two floating-point encodings.
    pub const fn is_float(self) -> bool {
        matches!(self, SampleEncoding::F32 | SampleEncoding::F64)
    }

    /// Returns true for the unsigned integer encodings.
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            SampleEncoding::U8 | SampleEncoding::U16 | SampleEncoding::U24 | SampleEncoding::U32
        )
    }

    /// Returns the lowercase name used in configuration.
    pub const fn name(self) -> &'static str {
        match self {
            SampleEncoding::U8 => "u8",
            SampleEncoding::U16 => "u16",
            SampleEncoding::U24 => "u24",
            SampleEncoding::U32 => "u32",
            SampleEncoding::I8 => "i8",
            SampleEncoding::I16 => "i16",
            SampleEncoding::I24 => "i24",
            SampleEncoding::I32 => "i32",
            SampleEncoding::F32 => "f32",
            SampleEncoding::F64 => "f64",
        }
    }
}

impl fmt::Display for SampleEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for SampleEncoding {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        SampleEncoding::ALL
            .get(tag as usize)
            .copied()
            .ok_or_else(|| Error::UnsupportedEncoding(format!("tag {}", tag)))
    }
}

impl FromStr for SampleEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SampleEncoding::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedEncoding(s.to_string()))
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A concrete sample storage type.
///
/// Implemented for `u8`, `u16`, [`U24`], `u32`, `i8`, `i16`, [`I24`], `i32`,
/// `f32` and `f64`. Samples are serialized little-endian; 24-bit samples take
/// exactly three bytes.
pub trait Sample: Copy + PartialEq + fmt::Debug + Send + Sync + 'static + sealed::Sealed {
    /// The runtime tag of this type.
    const ENCODING: SampleEncoding;
    /// Digital silence.
    const SILENCE: Self;

    /// Number of bytes per sample.
    const WIDTH: usize = Self::ENCODING.byte_width();

    /// Reads one sample from exactly `WIDTH` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` is not `WIDTH`. Use [`decode_samples`] to read
    /// unchecked input.
    fn read_le(bytes: &[u8]) -> Self;

    /// Appends the little-endian bytes of this sample.
    fn write_le(self, out: &mut Vec<u8>);
}

macro_rules! impl_sample {
    ($($t:ty => $enc:ident, $silence:expr, $n:literal;)*) => {
        $(
            impl sealed::Sealed for $t {}

            impl Sample for $t {
                const ENCODING: SampleEncoding = SampleEncoding::$enc;
                const SILENCE: Self = $silence;

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; $n];
                    raw.copy_from_slice(bytes);
                    <$t>::from_le_bytes(raw)
                }

                #[inline]
                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_sample! {
    u8 => U8, 0x80, 1;
    u16 => U16, 0x8000, 2;
    U24 => U24, U24::MID, 3;
    u32 => U32, 0x8000_0000, 4;
    i8 => I8, 0, 1;
    i16 => I16, 0, 2;
    I24 => I24, I24::ZERO, 3;
    i32 => I32, 0, 4;
    f32 => F32, 0.0, 4;
    f64 => F64, 0.0, 8;
}

/// Serializes samples to little-endian bytes.
pub fn encode_samples<T: Sample>(samples: &[T]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve_exact(samples.len() * T::WIDTH)?;
    for &s in samples {
        s.write_le(&mut out);
    }
    Ok(out)
}

/// Parses little-endian bytes into samples.
///
/// Fails with [`Error::SizeMismatch`] if `bytes` does not hold a whole number
/// of samples.
pub fn decode_samples<T: Sample>(bytes: &[u8]) -> Result<Vec<T>> {
    check_width(bytes.len(), T::WIDTH)?;
    let mut out = Vec::new();
    out.try_reserve_exact(bytes.len() / T::WIDTH)?;
    out.extend(bytes.chunks_exact(T::WIDTH).map(T::read_le));
    Ok(out)
}

pub(crate) fn check_width(len: usize, frame_size: usize) -> Result<()> {
    if frame_size == 0 || len % frame_size != 0 {
        return Err(Error::SizeMismatch { len, frame_size });
    }
    Ok(())
}
