//! 24-bit integer samples.
//!
//! Both types keep their value in the low 24 bits of a 32-bit cell. Every
//! arithmetic operation wraps modulo 2^24; conversion to the wider type
//! sign-extends ([`I24`]) or zero-extends ([`U24`]).

use std::fmt;
use std::ops::{Shl, Shr};

const MASK: u32 = 0x00FF_FFFF;

/// Signed 24-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct I24(i32);

impl I24 {
    pub const BITS: u32 = 24;
    pub const MIN: I24 = I24(-0x80_0000);
    pub const MAX: I24 = I24(0x7F_FFFF);
    pub const ZERO: I24 = I24(0);

    /// Returns `None` if `value` is outside the 24-bit signed range.
    #[inline]
    pub const fn new(value: i32) -> Option<Self> {
        if value < Self::MIN.0 || value > Self::MAX.0 {
            None
        } else {
            Some(I24(value))
        }
    }

    /// Truncates `value` to its low 24 bits and sign-extends bit 23.
    #[inline]
    pub const fn wrapping_from_i32(value: i32) -> Self {
        I24((value << 8) >> 8)
    }

    /// Builds a value from raw 24-bit two's-complement bits; higher bits are ignored.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self::wrapping_from_i32(bits as i32)
    }

    /// Returns the sign-extended value.
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Returns the raw 24-bit two's-complement pattern.
    #[inline]
    pub const fn to_bits(self) -> u32 {
        self.0 as u32 & MASK
    }

    #[inline]
    pub const fn wrapping_add(self, rhs: I24) -> Self {
        Self::wrapping_from_i32(self.0.wrapping_add(rhs.0))
    }

    #[inline]
    pub const fn wrapping_sub(self, rhs: I24) -> Self {
        Self::wrapping_from_i32(self.0.wrapping_sub(rhs.0))
    }

    #[inline]
    pub const fn from_le_bytes(bytes: [u8; 3]) -> Self {
        Self::from_bits(bytes[0] as u32 | (bytes[1] as u32) << 8 | (bytes[2] as u32) << 16)
    }

    #[inline]
    pub const fn to_le_bytes(self) -> [u8; 3] {
        let bits = self.to_bits();
        [bits as u8, (bits >> 8) as u8, (bits >> 16) as u8]
    }
}

impl Shl<u32> for I24 {
    type Output = I24;

    /// Shifts the bit pattern left; bits above bit 23 are discarded.
    fn shl(self, rhs: u32) -> I24 {
        I24::wrapping_from_i32(self.0.checked_shl(rhs).unwrap_or(0))
    }
}

impl Shr<u32> for I24 {
    type Output = I24;

    /// Arithmetic shift; the sign propagates.
    fn shr(self, rhs: u32) -> I24 {
        I24(self.0 >> rhs.min(31))
    }
}

impl From<i8> for I24 {
    fn from(value: i8) -> Self {
        I24(value as i32)
    }
}

impl From<i16> for I24 {
    fn from(value: i16) -> Self {
        I24(value as i32)
    }
}

impl From<I24> for i32 {
    fn from(value: I24) -> Self {
        value.0
    }
}

impl fmt::Display for I24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unsigned 24-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct U24(u32);

impl U24 {
    pub const BITS: u32 = 24;
    pub const MIN: U24 = U24(0);
    pub const MAX: U24 = U24(MASK);
    /// Digital zero.
    pub const MID: U24 = U24(0x80_0000);

    /// Keeps the low 24 bits of `value`.
    #[inline]
    pub const fn wrapping_from_u32(value: u32) -> Self {
        U24(value & MASK)
    }

    /// Returns the zero-extended value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn wrapping_add(self, rhs: U24) -> Self {
        Self::wrapping_from_u32(self.0.wrapping_add(rhs.0))
    }

    #[inline]
    pub const fn wrapping_sub(self, rhs: U24) -> Self {
        Self::wrapping_from_u32(self.0.wrapping_sub(rhs.0))
    }

    #[inline]
    pub const fn from_le_bytes(bytes: [u8; 3]) -> Self {
        U24(bytes[0] as u32 | (bytes[1] as u32) << 8 | (bytes[2] as u32) << 16)
    }

    #[inline]
    pub const fn to_le_bytes(self) -> [u8; 3] {
        [self.0 as u8, (self.0 >> 8) as u8, (self.0 >> 16) as u8]
    }
}

impl Shl<u32> for U24 {
    type Output = U24;

    fn shl(self, rhs: u32) -> U24 {
        U24::wrapping_from_u32(self.0.checked_shl(rhs).unwrap_or(0))
    }
}

impl Shr<u32> for U24 {
    type Output = U24;

    fn shr(self, rhs: u32) -> U24 {
        U24(self.0.checked_shr(rhs).unwrap_or(0))
    }
}

impl From<u8> for U24 {
    fn from(value: u8) -> Self {
        U24(value as u32)
    }
}

impl From<u16> for U24 {
    fn from(value: u16) -> Self {
        U24(value as u32)
    }
}

impl From<U24> for u32 {
    fn from(value: U24) -> Self {
        value.0
    }
}

impl fmt::Display for U24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
