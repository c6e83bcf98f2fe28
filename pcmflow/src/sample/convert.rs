//! The sample conversion matrix.
//!
//! Integer encodings convert between each other as bit-pattern moves, not
//! rescales: every integer sample is viewed as a signed value left-aligned in
//! 32 bits (unsigned samples are first rebiased by their midpoint with
//! wraparound), and the target takes the top bits of that view. This is the
//! same as widening by a left shift with zero fill and narrowing by an
//! arithmetic right shift.
//!
//! Integers map to floats as `signed / 2^(bits-1)`, so the most negative code
//! is exactly -1.0 and the most positive one stays below 1.0. Floats map back
//! by clamping to [-1, 1], scaling, clamping to the target range and
//! truncating toward zero.

use super::{decode_samples, Sample, SampleEncoding, I24, U24};
use crate::error::Result;

/// Scalar conversion from `Self` to `D`.
pub trait ConvertSample<D: Sample>: Sample {
    fn convert(self) -> D;
}

/// Converts one sample from `S` to `D`.
#[inline]
pub fn convert_sample<S: ConvertSample<D>, D: Sample>(sample: S) -> D {
    sample.convert()
}

/// A sample type that converts to every supported encoding.
pub trait ConvertToAny:
    ConvertSample<u8>
    + ConvertSample<u16>
    + ConvertSample<U24>
    + ConvertSample<u32>
    + ConvertSample<i8>
    + ConvertSample<i16>
    + ConvertSample<I24>
    + ConvertSample<i32>
    + ConvertSample<f32>
    + ConvertSample<f64>
{
}

impl<T> ConvertToAny for T where
    T: ConvertSample<u8>
        + ConvertSample<u16>
        + ConvertSample<U24>
        + ConvertSample<u32>
        + ConvertSample<i8>
        + ConvertSample<i16>
        + ConvertSample<I24>
        + ConvertSample<i32>
        + ConvertSample<f32>
        + ConvertSample<f64>
{
}

/// Integer sample seen as a signed value occupying the top bits of an `i32`.
trait Aligned: Sample {
    fn to_aligned(self) -> i32;
    fn from_aligned(v: i32) -> Self;
}

impl Aligned for i8 {
    #[inline]
    fn to_aligned(self) -> i32 {
        (self as i32) << 24
    }
    #[inline]
    fn from_aligned(v: i32) -> Self {
        (v >> 24) as i8
    }
}

impl Aligned for i16 {
    #[inline]
    fn to_aligned(self) -> i32 {
        (self as i32) << 16
    }
    #[inline]
    fn from_aligned(v: i32) -> Self {
        (v >> 16) as i16
    }
}

impl Aligned for I24 {
    #[inline]
    fn to_aligned(self) -> i32 {
        self.get() << 8
    }
    #[inline]
    fn from_aligned(v: i32) -> Self {
        I24::wrapping_from_i32(v >> 8)
    }
}

impl Aligned for i32 {
    #[inline]
    fn to_aligned(self) -> i32 {
        self
    }
    #[inline]
    fn from_aligned(v: i32) -> Self {
        v
    }
}

// Flipping the top bit is the same as adding the midpoint modulo 2^bits.

impl Aligned for u8 {
    #[inline]
    fn to_aligned(self) -> i32 {
        ((self ^ 0x80) as i8 as i32) << 24
    }
    #[inline]
    fn from_aligned(v: i32) -> Self {
        ((v >> 24) as u8) ^ 0x80
    }
}

impl Aligned for u16 {
    #[inline]
    fn to_aligned(self) -> i32 {
        ((self ^ 0x8000) as i16 as i32) << 16
    }
    #[inline]
    fn from_aligned(v: i32) -> Self {
        ((v >> 16) as u16) ^ 0x8000
    }
}

impl Aligned for U24 {
    #[inline]
    fn to_aligned(self) -> i32 {
        ((self.get() ^ U24::MID.get()) << 8) as i32
    }
    #[inline]
    fn from_aligned(v: i32) -> Self {
        U24::wrapping_from_u32(((v as u32) >> 8) ^ U24::MID.get())
    }
}

impl Aligned for u32 {
    #[inline]
    fn to_aligned(self) -> i32 {
        (self ^ 0x8000_0000) as i32
    }
    #[inline]
    fn from_aligned(v: i32) -> Self {
        (v as u32) ^ 0x8000_0000
    }
}

/// Left-aligned signed value divided by 2^31; exact in f64.
#[inline]
fn unit_from_aligned(v: i32) -> f64 {
    v as f64 / 2_147_483_648.0
}

// NaN is treated as digital zero.
#[inline]
fn unit_clamp_f32(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(-1.0, 1.0) }
}

#[inline]
fn unit_clamp_f64(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(-1.0, 1.0) }
}

/// Integer sample built from a float in [-1, 1].
trait FromUnit: Sample {
    fn from_unit_f32(x: f32) -> Self;
    fn from_unit_f64(x: f64) -> Self;
}

// `$calc` is the precision used for f32 input. Float-to-int `as` casts
// saturate, which covers the 2^31 edge of the 32-bit targets.
macro_rules! impl_from_unit_signed {
    ($(
        $t:ty, $calc:ty, half = $half:expr, min = $min:expr, max = $max:expr,
        |$v:ident| $build:expr;
    )*) => {
        $(
            impl FromUnit for $t {
                #[inline]
                fn from_unit_f32(x: f32) -> Self {
                    let c = unit_clamp_f32(x) as $calc;
                    let $v = (c * $half as $calc).clamp($min as $calc, $max as $calc);
                    $build
                }

                #[inline]
                fn from_unit_f64(x: f64) -> Self {
                    let c = unit_clamp_f64(x);
                    let $v = (c * $half as f64).clamp($min as f64, $max as f64);
                    $build
                }
            }
        )*
    };
}

macro_rules! impl_from_unit_unsigned {
    ($(
        $t:ty, $calc:ty, mid = $mid:expr, max = $max:expr,
        |$v:ident| $build:expr;
    )*) => {
        $(
            impl FromUnit for $t {
                #[inline]
                fn from_unit_f32(x: f32) -> Self {
                    let c = unit_clamp_f32(x);
                    let $v = ((c + 1.0) as $calc * $mid as $calc).clamp(0.0, $max as $calc);
                    $build
                }

                #[inline]
                fn from_unit_f64(x: f64) -> Self {
                    let c = unit_clamp_f64(x);
                    let $v = ((c + 1.0) * $mid as f64).clamp(0.0, $max as f64);
                    $build
                }
            }
        )*
    };
}

impl_from_unit_signed! {
    i8, f32, half = 128.0, min = -128.0, max = 127.0, |v| v as i8;
    i16, f32, half = 32_768.0, min = -32_768.0, max = 32_767.0, |v| v as i16;
    I24, f32, half = 8_388_608.0, min = -8_388_608.0, max = 8_388_607.0,
        |v| I24::wrapping_from_i32(v as i32);
    i32, f64, half = 2_147_483_648.0, min = -2_147_483_648.0, max = 2_147_483_647.0,
        |v| v as i32;
}

impl_from_unit_unsigned! {
    u8, f32, mid = 128.0, max = 255.0, |v| v as u8;
    u16, f32, mid = 32_768.0, max = 65_535.0, |v| v as u16;
    U24, f32, mid = 8_388_608.0, max = 16_777_215.0, |v| U24::wrapping_from_u32(v as u32);
    u32, f64, mid = 2_147_483_648.0, max = 4_294_967_295.0, |v| v as u32;
}

macro_rules! impl_int_matrix {
    (@row $s:ty; $($d:ty),*) => {
        $(
            impl ConvertSample<$d> for $s {
                #[inline]
                fn convert(self) -> $d {
                    <$d as Aligned>::from_aligned(self.to_aligned())
                }
            }
        )*
    };
    ($($s:ty),*) => {
        $(
            impl_int_matrix!(@row $s; u8, u16, U24, u32, i8, i16, I24, i32);

            impl ConvertSample<f32> for $s {
                #[inline]
                fn convert(self) -> f32 {
                    unit_from_aligned(self.to_aligned()) as f32
                }
            }

            impl ConvertSample<f64> for $s {
                #[inline]
                fn convert(self) -> f64 {
                    unit_from_aligned(self.to_aligned())
                }
            }
        )*
    };
}

macro_rules! impl_float_to_int {
    ($($d:ty),*) => {
        $(
            impl ConvertSample<$d> for f32 {
                #[inline]
                fn convert(self) -> $d {
                    <$d as FromUnit>::from_unit_f32(self)
                }
            }

            impl ConvertSample<$d> for f64 {
                #[inline]
                fn convert(self) -> $d {
                    <$d as FromUnit>::from_unit_f64(self)
                }
            }
        )*
    };
}

impl_int_matrix!(u8, u16, U24, u32, i8, i16, I24, i32);
impl_float_to_int!(u8, u16, U24, u32, i8, i16, I24, i32);

impl ConvertSample<f32> for f32 {
    #[inline]
    fn convert(self) -> f32 {
        self
    }
}

impl ConvertSample<f64> for f32 {
    #[inline]
    fn convert(self) -> f64 {
        self as f64
    }
}

impl ConvertSample<f32> for f64 {
    #[inline]
    fn convert(self) -> f32 {
        self as f32
    }
}

impl ConvertSample<f64> for f64 {
    #[inline]
    fn convert(self) -> f64 {
        self
    }
}

/// Converts every sample of `src`, preserving order.
pub fn convert_slice<S: ConvertSample<D>, D: Sample>(src: &[S]) -> Result<Vec<D>> {
    let mut out = Vec::new();
    out.try_reserve_exact(src.len())?;
    out.extend(src.iter().map(|&s| s.convert()));
    Ok(out)
}

fn encode_converted<S: ConvertSample<D>, D: Sample>(src: &[S]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve_exact(src.len() * D::WIDTH)?;
    for &s in src {
        s.convert().write_le(&mut out);
    }
    Ok(out)
}

/// Converts typed samples to the serialized form of a runtime encoding.
///
/// The output holds exactly `src.len() * to.byte_width()` bytes.
pub fn convert_samples_to<S: ConvertToAny>(src: &[S], to: SampleEncoding) -> Result<Vec<u8>> {
    match to {
        SampleEncoding::U8 => encode_converted::<S, u8>(src),
        SampleEncoding::U16 => encode_converted::<S, u16>(src),
        SampleEncoding::U24 => encode_converted::<S, U24>(src),
        SampleEncoding::U32 => encode_converted::<S, u32>(src),
        SampleEncoding::I8 => encode_converted::<S, i8>(src),
        SampleEncoding::I16 => encode_converted::<S, i16>(src),
        SampleEncoding::I24 => encode_converted::<S, I24>(src),
        SampleEncoding::I32 => encode_converted::<S, i32>(src),
        SampleEncoding::F32 => encode_converted::<S, f32>(src),
        SampleEncoding::F64 => encode_converted::<S, f64>(src),
    }
}

fn transcode<S: ConvertToAny>(bytes: &[u8], to: SampleEncoding) -> Result<Vec<u8>> {
    let src = decode_samples::<S>(bytes)?;
    convert_samples_to(&src, to)
}

/// Converts serialized samples between two runtime encodings.
///
/// Fails with [`crate::Error::SizeMismatch`] if `bytes` does not hold a whole
/// number of `from` samples. Identical encodings copy the input.
pub fn convert_bytes(bytes: &[u8], from: SampleEncoding, to: SampleEncoding) -> Result<Vec<u8>> {
    match from {
        SampleEncoding::U8 => transcode::<u8>(bytes, to),
        SampleEncoding::U16 => transcode::<u16>(bytes, to),
        SampleEncoding::U24 => transcode::<U24>(bytes, to),
        SampleEncoding::U32 => transcode::<u32>(bytes, to),
        SampleEncoding::I8 => transcode::<i8>(bytes, to),
        SampleEncoding::I16 => transcode::<i16>(bytes, to),
        SampleEncoding::I24 => transcode::<I24>(bytes, to),
        SampleEncoding::I32 => transcode::<i32>(bytes, to),
        SampleEncoding::F32 => transcode::<f32>(bytes, to),
        SampleEncoding::F64 => transcode::<f64>(bytes, to),
    }
}
