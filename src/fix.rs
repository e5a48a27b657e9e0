//! The fixed-point carrier type and its descriptor surface.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use num_traits::float::FloatConst;
use typenum::{Integer, Sum, Unsigned, Z0};

use crate::policy::{FixedError, OverflowPolicy, Raise, UnderflowPolicy};
use crate::promote::StoreBits;
use crate::word::Word;

/// Binary fixed-point number.
///
/// Generics:
/// * `T`: storage word
/// * `N`: integer bits, excluding sign
/// * `F`: fractional bits
/// * `E`: external scaling exponent; the represented real is
///   `stored * 2^-(F+E)`
/// * `Op`, `Up`: overflow and underflow policies
///
/// The stored integer is restricted to `N + F` significant bits, which must
/// fit the storage word and the 63-bit host cap. Prefer the [`Q`] and
/// [`UQ`] aliases, which pick the storage word from `N + F`.
#[repr(transparent)]
pub struct Fix<T, N, F, E, Op, Up> {
    bits: T,
    _fmt: PhantomData<(N, F, E, Op, Up)>,
}

/// Signed Q-format with `N` integer and `F` fractional bits, stored in the
/// smallest signed host word with at least `N + F + 1` bits.
pub type Q<N, F, E = Z0, Op = Raise, Up = Raise> =
    Fix<<Sum<N, F> as StoreBits>::Signed, N, F, E, Op, Up>;

/// Unsigned counterpart of [`Q`].
pub type UQ<N, F, E = Z0, Op = Raise, Up = Raise> =
    Fix<<Sum<N, F> as StoreBits>::Unsigned, N, F, E, Op, Up>;

impl<T: Clone, N, F, E, Op, Up> Clone for Fix<T, N, F, E, Op, Up> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            bits: self.bits.clone(),
            _fmt: PhantomData,
        }
    }
}

impl<T: Copy, N, F, E, Op, Up> Copy for Fix<T, N, F, E, Op, Up> {}

impl<T: PartialEq, N, F, E, Op, Up> PartialEq for Fix<T, N, F, E, Op, Up> {
    #[inline]
    fn eq(&self, rhs: &Self) -> bool {
        self.bits == rhs.bits
    }
}

impl<T: Eq, N, F, E, Op, Up> Eq for Fix<T, N, F, E, Op, Up> {}

impl<T: PartialOrd, N, F, E, Op, Up> PartialOrd for Fix<T, N, F, E, Op, Up> {
    #[inline]
    fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
        self.bits.partial_cmp(&rhs.bits)
    }
}

impl<T: Ord, N, F, E, Op, Up> Ord for Fix<T, N, F, E, Op, Up> {
    #[inline]
    fn cmp(&self, rhs: &Self) -> Ordering {
        self.bits.cmp(&rhs.bits)
    }
}

impl<T: Hash, N, F, E, Op, Up> Hash for Fix<T, N, F, E, Op, Up> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state)
    }
}

impl<T, N, F, E, Op, Up> Default for Fix<T, N, F, E, Op, Up>
where
    T: Word,
    N: Unsigned,
    F: Unsigned,
    E: Integer,
{
    fn default() -> Self {
        Self::from_bits(T::from_wide(0))
    }
}

/// `2^k` without a float runtime.
pub(crate) const fn pow2(k: i32) -> f64 {
    if k < -1022 {
        0.0
    } else if k > 1023 {
        f64::INFINITY
    } else {
        f64::from_bits(((k + 1023) as u64) << 52)
    }
}

/// Round to nearest, halves away from zero. Saturates at the `i128` range.
pub(crate) const fn round_half_away(x: f64) -> i128 {
    if x >= 0.0 {
        (x + 0.5) as i128
    } else {
        (x - 0.5) as i128
    }
}

/// Move `bits` between scale exponents; positive `shift` is a left shift.
///
/// Right shifts truncate toward zero; a non-zero value truncated to zero
/// resolves through `Up`. Left shifts that leave the work integer saturate,
/// to be caught by the destination bounds check.
pub(crate) fn rescale<Up: UnderflowPolicy>(bits: i128, shift: i32) -> i128 {
    if bits == 0 {
        return 0;
    }
    if shift >= 0 {
        let headroom = bits.unsigned_abs().leading_zeros() as i32 - 1;
        if shift > headroom {
            return if bits > 0 { i128::MAX } else { i128::MIN };
        }
        bits << shift
    } else {
        let q = if shift < -126 {
            0
        } else {
            bits / (1i128 << -shift)
        };
        if q == 0 {
            Up::resolve(bits.signum())
        } else {
            q
        }
    }
}

/// Descriptor constants and observers; these need no policy.
impl<T, N, F, E, Op, Up> Fix<T, N, F, E, Op, Up>
where
    T: Word,
    N: Unsigned,
    F: Unsigned,
    E: Integer,
{
    const LAYOUT_OK: () = assert!(
        N::U32 + F::U32 >= 1 && N::U32 + F::U32 <= T::DIGITS && N::U32 + F::U32 <= 63,
        "format does not fit its storage word"
    );

    /// Integer bits, excluding sign.
    pub const INT_BITS: u32 = N::U32;
    /// Fractional bits.
    pub const FRAC_BITS: u32 = F::U32;
    /// Total significant bits.
    pub const SIGNIFICANT_BITS: u32 = N::U32 + F::U32;
    /// External scaling exponent.
    pub const EXP: i32 = E::I32;
    /// Exponent of the total scale: the value is `stored * 2^-TOTAL_SCALE`.
    pub const TOTAL_SCALE: i32 = F::I32 + E::I32;
    /// Whether the storage word is signed.
    pub const IS_SIGNED: bool = T::SIGNED;

    /// Scale factor `2^F` relating the stored integer to the value.
    pub const SCALE: i128 = 1 << F::U32;
    /// Largest stored integer of this format.
    pub const LARGEST_STORED: i128 = (1 << (N::U32 + F::U32)) - 1;
    /// Least stored integer of this format.
    pub const LEAST_STORED: i128 = if T::SIGNED {
        -(1 << (N::U32 + F::U32))
    } else {
        0
    };
    /// Mask of the fractional bits of the stored integer.
    pub const FRACTION_MASK: i128 = (1 << F::U32) - 1;
    /// Mask of the integer bits of the stored integer.
    pub const INTEGER_MASK: i128 = Self::LARGEST_STORED & !Self::FRACTION_MASK;

    // numeric_limits facts: finite, inexact, binary, modulo on `Ignore`.
    pub const IS_BOUNDED: bool = true;
    pub const IS_EXACT: bool = false;
    pub const IS_INTEGER: bool = false;
    pub const IS_MODULO: bool = true;
    pub const HAS_INFINITY: bool = false;
    pub const HAS_NAN: bool = false;
    pub const HAS_DENORM: bool = false;
    pub const RADIX: u32 = 2;
    pub const DIGITS: u32 = N::U32 + F::U32;
    pub const DIGITS10: u32 =
        ((N::U32 + F::U32) as f64 * core::f64::consts::LOG10_2 + 0.5) as u32;
    pub const MAX_EXPONENT: i32 = N::I32;
    pub const MAX_EXPONENT10: i32 = (N::I32 as f64 * core::f64::consts::LOG10_2) as i32;
    pub const MIN_EXPONENT: i32 = F::I32;
    pub const MIN_EXPONENT10: i32 = (F::I32 as f64 * core::f64::consts::LOG10_2) as i32;

    /// Reinterpret a storage word as a fixed-point number, unchecked.
    #[inline]
    pub(crate) fn from_bits(bits: T) -> Self {
        let () = Self::LAYOUT_OK;
        Self {
            bits,
            _fmt: PhantomData,
        }
    }

    /// The stored integer.
    #[inline]
    pub fn value(self) -> T {
        self.bits
    }

    /// Smallest positive step of this format, `2^-F`.
    pub fn precision() -> f64 {
        pow2(-F::I32)
    }

    /// The external pre-scaling factor `2^-E`.
    pub fn scaling_factor() -> f64 {
        pow2(-E::I32)
    }

    /// Dynamic range of the stored integer in dB.
    #[cfg(feature = "std")]
    pub fn dynamic_range_db() -> f64 {
        20.0 * (Self::LARGEST_STORED as f64).log10()
    }

    /// Convert lossy to `f64`.
    #[inline]
    pub fn as_f64(self) -> f64 {
        self.bits.wide() as f64 * pow2(-Self::TOTAL_SCALE)
    }

    /// Convert lossy to `f32`.
    #[inline]
    pub fn as_f32(self) -> f32 {
        self.as_f64() as f32
    }
}

/// Construction; everything funnels through the format's policies.
impl<T, N, F, E, Op, Up> Fix<T, N, F, E, Op, Up>
where
    T: Word,
    N: Unsigned,
    F: Unsigned,
    E: Integer,
    Op: OverflowPolicy,
    Up: UnderflowPolicy,
{
    /// Bound-check a work integer into this format, resolving overflow
    /// through `Op`.
    #[inline]
    pub(crate) fn make(bits: i128) -> Self {
        let bits = if bits < Self::LEAST_STORED || bits > Self::LARGEST_STORED {
            Op::resolve(bits, Self::LEAST_STORED, Self::LARGEST_STORED)
        } else {
            bits
        };
        Self::from_bits(T::from_wide(bits))
    }

    /// Rescale a work integer carrying scale exponent `scale` into this
    /// format, resolving underflow through `Up` and overflow through `Op`.
    #[inline]
    pub(crate) fn rescale_into(bits: i128, scale: i32) -> Self {
        Self::make(rescale::<Up>(bits, Self::TOTAL_SCALE - scale))
    }

    /// Wrap a pre-computed stored integer, without rescaling.
    ///
    /// Fires the overflow policy if the integer is outside the stored
    /// bounds of the format (possible when the format does not use all
    /// bits of its storage word).
    #[inline]
    pub fn wrap(bits: T) -> Self {
        Self::make(bits.wide())
    }

    /// Quantize a real number, rounding to nearest with halves away from
    /// zero.
    pub fn from_num(v: f64) -> Self {
        Self::make(round_half_away(v * pow2(Self::TOTAL_SCALE)))
    }

    /// Checked variant of [`from_num`](Self::from_num), independent of the
    /// overflow policy.
    pub fn try_from_num(v: f64) -> Result<Self, FixedError> {
        let bits = round_half_away(v * pow2(Self::TOTAL_SCALE));
        if bits < Self::LEAST_STORED || bits > Self::LARGEST_STORED {
            Err(FixedError::Overflow)
        } else {
            Ok(Self::from_bits(T::from_wide(bits)))
        }
    }

    /// Shift an integer into place.
    pub fn from_int(i: i64) -> Self {
        Self::rescale_into(i as i128, 0)
    }

    /// Normalize a fixed-point number of any other format into this one.
    ///
    /// Left shifts fire the overflow policy when significant bits are
    /// lost; right shifts truncate toward zero and fire the underflow
    /// policy when a non-zero input becomes zero.
    pub fn from_fixed<X: FixedPoint>(x: X) -> Self {
        Self::rescale_into(x.wide(), X::TOTAL_SCALE)
    }

    /// Additive identity.
    pub fn zero() -> Self {
        Self::from_bits(T::from_wide(0))
    }

    /// Multiplicative identity (requires `N >= 1`).
    pub fn one() -> Self {
        Self::make(Self::SCALE)
    }

    /// Largest representable number.
    pub fn largest() -> Self {
        Self::from_bits(T::from_wide(Self::LARGEST_STORED))
    }

    /// Least representable number.
    pub fn least() -> Self {
        Self::from_bits(T::from_wide(Self::LEAST_STORED))
    }

    /// Distance between adjacent representable numbers, `wrap(1)`.
    pub fn epsilon() -> Self {
        Self::from_bits(T::from_wide(1))
    }

    /// Largest quantization error of round-to-nearest, half a step.
    pub fn round_error() -> f64 {
        0.5
    }

    /// `2*pi`. Inherent because the trait-provided [`FloatConst::TAU`] is
    /// gated on `Add<Output = Self>`, which promoting operators do not
    /// provide.
    #[allow(non_snake_case)]
    pub fn TAU() -> Self {
        Self::from_num(core::f64::consts::TAU)
    }

    /// `log10(2)`, inherent for the same reason as [`Self::TAU`].
    #[allow(non_snake_case)]
    pub fn LOG10_2() -> Self {
        Self::from_num(core::f64::consts::LOG10_2)
    }

    /// `2*sqrt(2)`, beside the [`FloatConst`] set.
    #[allow(non_snake_case)]
    pub fn TWO_SQRT_2() -> Self {
        Self::from_num(2.0 * core::f64::consts::SQRT_2)
    }
}

/// Value-level view of any fixed-point format, used by the arithmetic core
/// and the CORDIC engine.
pub trait FixedPoint: Copy {
    type Word: Word;
    type Op: OverflowPolicy;
    type Up: UnderflowPolicy;

    const INT_BITS: u32;
    const FRAC_BITS: u32;
    const EXP: i32;
    /// The value is `stored * 2^-TOTAL_SCALE`.
    const TOTAL_SCALE: i32;
    const IS_SIGNED: bool;
    const LEAST_STORED: i128;
    const LARGEST_STORED: i128;

    /// The stored integer, widened to the work integer.
    fn wide(self) -> i128;
    /// Bound-check a work integer into this format.
    fn new_wide(bits: i128) -> Self;
    /// Rescale a work integer with scale exponent `scale` into this format.
    fn rescale_from(bits: i128, scale: i32) -> Self;
    /// Resolve a division by zero through the overflow policy.
    fn div_zero(sign: i128) -> Self;
    /// Convert lossy to `f64`.
    fn to_f64(self) -> f64;
}

impl<T, N, F, E, Op, Up> FixedPoint for Fix<T, N, F, E, Op, Up>
where
    T: Word,
    N: Unsigned,
    F: Unsigned,
    E: Integer,
    Op: OverflowPolicy,
    Up: UnderflowPolicy,
{
    type Word = T;
    type Op = Op;
    type Up = Up;

    const INT_BITS: u32 = N::U32;
    const FRAC_BITS: u32 = F::U32;
    const EXP: i32 = E::I32;
    const TOTAL_SCALE: i32 = F::I32 + E::I32;
    const IS_SIGNED: bool = T::SIGNED;
    const LEAST_STORED: i128 = if T::SIGNED {
        -(1 << (N::U32 + F::U32))
    } else {
        0
    };
    const LARGEST_STORED: i128 = (1 << (N::U32 + F::U32)) - 1;

    #[inline]
    fn wide(self) -> i128 {
        self.bits.wide()
    }

    #[inline]
    fn new_wide(bits: i128) -> Self {
        Self::make(bits)
    }

    #[inline]
    fn rescale_from(bits: i128, scale: i32) -> Self {
        Self::rescale_into(bits, scale)
    }

    #[inline]
    fn div_zero(sign: i128) -> Self {
        Self::from_bits(T::from_wide(Op::divide_by_zero(
            sign,
            Self::LEAST_STORED,
            Self::LARGEST_STORED,
        )))
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self.as_f64()
    }
}

/// The widely used constants, as values of the format.
///
/// A constant that does not fit the format resolves through the overflow
/// policy like any other quantization.
#[allow(non_snake_case)]
impl<T, N, F, E, Op, Up> FloatConst for Fix<T, N, F, E, Op, Up>
where
    T: Word,
    N: Unsigned,
    F: Unsigned,
    E: Integer,
    Op: OverflowPolicy,
    Up: UnderflowPolicy,
{
    fn E() -> Self {
        Self::from_num(core::f64::consts::E)
    }
    fn FRAC_1_PI() -> Self {
        Self::from_num(core::f64::consts::FRAC_1_PI)
    }
    fn FRAC_1_SQRT_2() -> Self {
        Self::from_num(core::f64::consts::FRAC_1_SQRT_2)
    }
    fn FRAC_2_PI() -> Self {
        Self::from_num(core::f64::consts::FRAC_2_PI)
    }
    fn FRAC_2_SQRT_PI() -> Self {
        Self::from_num(core::f64::consts::FRAC_2_SQRT_PI)
    }
    fn FRAC_PI_2() -> Self {
        Self::from_num(core::f64::consts::FRAC_PI_2)
    }
    fn FRAC_PI_3() -> Self {
        Self::from_num(core::f64::consts::FRAC_PI_3)
    }
    fn FRAC_PI_4() -> Self {
        Self::from_num(core::f64::consts::FRAC_PI_4)
    }
    fn FRAC_PI_6() -> Self {
        Self::from_num(core::f64::consts::FRAC_PI_6)
    }
    fn FRAC_PI_8() -> Self {
        Self::from_num(core::f64::consts::FRAC_PI_8)
    }
    fn LN_10() -> Self {
        Self::from_num(core::f64::consts::LN_10)
    }
    fn LN_2() -> Self {
        Self::from_num(core::f64::consts::LN_2)
    }
    fn LOG10_E() -> Self {
        Self::from_num(core::f64::consts::LOG10_E)
    }
    fn LOG2_E() -> Self {
        Self::from_num(core::f64::consts::LOG2_E)
    }
    fn PI() -> Self {
        Self::from_num(core::f64::consts::PI)
    }
    fn SQRT_2() -> Self {
        Self::from_num(core::f64::consts::SQRT_2)
    }
}

macro_rules! impl_float_fmt {
    ($($tr:path),*) => {$(
        impl<T, N, F, E, Op, Up> $tr for Fix<T, N, F, E, Op, Up>
        where
            T: Word,
            N: Unsigned,
            F: Unsigned,
            E: Integer,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                <f64 as $tr>::fmt(&self.as_f64(), f)
            }
        }
    )*};
}
impl_float_fmt!(fmt::Display, fmt::LowerExp, fmt::UpperExp);

macro_rules! impl_bits_fmt {
    ($($tr:path),*) => {$(
        impl<T: $tr, N, F, E, Op, Up> $tr for Fix<T, N, F, E, Op, Up> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.bits.fmt(f)
            }
        }
    )*};
}
impl_bits_fmt!(
    fmt::Debug,
    fmt::Binary,
    fmt::Octal,
    fmt::LowerHex,
    fmt::UpperHex
);

#[cfg(feature = "serde")]
impl<T: serde::Serialize, N, F, E, Op, Up> serde::Serialize for Fix<T, N, F, E, Op, Up> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>, N, F, E, Op, Up> serde::Deserialize<'de>
    for Fix<T, N, F, E, Op, Up>
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(|bits| Self {
            bits,
            _fmt: PhantomData,
        })
    }
}
