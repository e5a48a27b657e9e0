//! Host storage words for fixed-point numbers.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

use typenum::{Bit, B0, B1};

mod sealed {
    pub trait Sealed {}
}

/// A host integer usable as fixed-point storage.
///
/// All arithmetic in this crate is evaluated exactly in an `i128` work
/// integer; a `Word` only needs to move its bits in and out of that
/// interchange type. Significant bit counts are capped at 63 so that no
/// intermediate product or pre-shifted dividend can exceed 127 bits.
pub trait Word:
    sealed::Sealed
    + Copy
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + fmt::Debug
    + fmt::Display
    + fmt::Binary
    + fmt::Octal
    + fmt::LowerHex
    + fmt::UpperHex
    + Not<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + 'static
{
    /// Type-level signedness, consumed by the promotion algebra.
    type Sign: Bit;

    /// Total number of bits, including sign.
    const BITS: u32;
    /// Whether this word is a signed two's-complement integer.
    const SIGNED: bool;
    /// Number of significant (non-sign) bits.
    const DIGITS: u32 = Self::BITS - Self::SIGNED as u32;

    /// Widen to the exact work integer.
    fn wide(self) -> i128;

    /// Truncate from the work integer.
    ///
    /// The caller guarantees the value fits.
    fn from_wide(bits: i128) -> Self;
}

macro_rules! impl_word {
    ($($t:ty => $sign:ty),*) => {$(
        impl sealed::Sealed for $t {}

        impl Word for $t {
            type Sign = $sign;

            const BITS: u32 = <$t>::BITS;
            const SIGNED: bool = <$t>::MIN != 0;

            #[inline(always)]
            fn wide(self) -> i128 {
                self as i128
            }

            #[inline(always)]
            fn from_wide(bits: i128) -> Self {
                debug_assert!(
                    bits >= <$t>::MIN as i128 && bits <= <$t>::MAX as i128,
                    "stored integer does not fit the storage word"
                );
                bits as $t
            }
        }
    )*};
}

impl_word!(i8 => B1, i16 => B1, i32 => B1, i64 => B1);
impl_word!(u8 => B0, u16 => B0, u32 => B0, u64 => B0);
