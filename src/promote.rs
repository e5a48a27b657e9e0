//! Compile-time type-promotion algebra.
//!
//! Given the formats of two operands, these traits compute the format of
//! the sum, product, and quotient, and the format of each elementary
//! function of one argument. A promoted format is *expandable* when a host
//! word can hold its significant bits, in which case storage widens and
//! the operation is exact (or maximally precise); otherwise it is *closed*
//! and the result keeps the left operand's format, with a range-preserving
//! shift applied during evaluation.
//!
//! Everything here is resolved before a value exists; the operators in
//! [`crate::ops`] merely consult `Output` and emit straight-line integer
//! code.

use core::ops::{Add, BitOr, Shr, Sub};

use typenum::{
    Add1, Diff, False, IsLessOrEqual, LeEq, Log2, Logarithm2, Max, Maximum, Min, Minimum, Or,
    Shright, Sub1, Sum, True, B0, B1, U1, U63,
};

use crate::fix::Fix;
use crate::word::Word;

/// Smallest host words able to carry a number of significant bits; the
/// `boost::int_t<bits>::least` analogue. Not implemented above 63 bits:
/// wider results are closed.
pub trait StoreBits {
    type Signed: Word;
    type Unsigned: Word;
}

macro_rules! store_bits {
    ($($b:ident => $s:ty | $u:ty;)*) => {$(
        impl StoreBits for typenum::$b {
            type Signed = $s;
            type Unsigned = $u;
        }
    )*};
}

store_bits! {
    U1 => i8 | u8;
    U2 => i8 | u8;
    U3 => i8 | u8;
    U4 => i8 | u8;
    U5 => i8 | u8;
    U6 => i8 | u8;
    U7 => i8 | u8;
    U8 => i16 | u8;
    U9 => i16 | u16;
    U10 => i16 | u16;
    U11 => i16 | u16;
    U12 => i16 | u16;
    U13 => i16 | u16;
    U14 => i16 | u16;
    U15 => i16 | u16;
    U16 => i32 | u16;
    U17 => i32 | u32;
    U18 => i32 | u32;
    U19 => i32 | u32;
    U20 => i32 | u32;
    U21 => i32 | u32;
    U22 => i32 | u32;
    U23 => i32 | u32;
    U24 => i32 | u32;
    U25 => i32 | u32;
    U26 => i32 | u32;
    U27 => i32 | u32;
    U28 => i32 | u32;
    U29 => i32 | u32;
    U30 => i32 | u32;
    U31 => i32 | u32;
    U32 => i64 | u32;
    U33 => i64 | u64;
    U34 => i64 | u64;
    U35 => i64 | u64;
    U36 => i64 | u64;
    U37 => i64 | u64;
    U38 => i64 | u64;
    U39 => i64 | u64;
    U40 => i64 | u64;
    U41 => i64 | u64;
    U42 => i64 | u64;
    U43 => i64 | u64;
    U44 => i64 | u64;
    U45 => i64 | u64;
    U46 => i64 | u64;
    U47 => i64 | u64;
    U48 => i64 | u64;
    U49 => i64 | u64;
    U50 => i64 | u64;
    U51 => i64 | u64;
    U52 => i64 | u64;
    U53 => i64 | u64;
    U54 => i64 | u64;
    U55 => i64 | u64;
    U56 => i64 | u64;
    U57 => i64 | u64;
    U58 => i64 | u64;
    U59 => i64 | u64;
    U60 => i64 | u64;
    U61 => i64 | u64;
    U62 => i64 | u64;
    U63 => i64 | u64;
}

/// Select the signed or unsigned word of a [`StoreBits`] entry by a
/// type-level signedness bit. A result is signed if either operand is.
pub trait PickWord<S> {
    type Word: Word;
}

impl<B: StoreBits> PickWord<B1> for B {
    type Word = B::Signed;
}

impl<B: StoreBits> PickWord<B0> for B {
    type Word = B::Unsigned;
}

/// Same format reachable in signed and unsigned storage.
pub trait Siblings {
    type ToSigned;
    type ToUnsigned;
}

impl<T, N, F, E, Op, Up> Siblings for Fix<T, N, F, E, Op, Up>
where
    N: Add<F>,
    Sum<N, F>: StoreBits,
{
    type ToSigned = Fix<<Sum<N, F> as StoreBits>::Signed, N, F, E, Op, Up>;
    type ToUnsigned = Fix<<Sum<N, F> as StoreBits>::Unsigned, N, F, E, Op, Up>;
}

/// Result format of a sum or difference: one more integer bit than the
/// wider operand, the finer fraction, the smaller prescale exponent.
/// Policies follow the left operand.
pub trait SumPromotion<Rhs> {
    type Output;
}

/// [`SumPromotion`] keyed by whether the promoted width fits a host word.
pub trait SumRule<L, R> {
    type Output;
}

impl<T1, N1, F1, E1, Op, Up, T2, N2, F2, E2, Op2, Up2>
    SumRule<Fix<T1, N1, F1, E1, Op, Up>, Fix<T2, N2, F2, E2, Op2, Up2>> for True
where
    T1: Word,
    T2: Word,
    N1: Max<N2>,
    F1: Max<F2>,
    E1: Min<E2>,
    Maximum<N1, N2>: Add<B1>,
    Add1<Maximum<N1, N2>>: Add<Maximum<F1, F2>>,
    T1::Sign: BitOr<T2::Sign>,
    Sum<Add1<Maximum<N1, N2>>, Maximum<F1, F2>>: PickWord<Or<T1::Sign, T2::Sign>>,
{
    type Output = Fix<
        <Sum<Add1<Maximum<N1, N2>>, Maximum<F1, F2>> as PickWord<Or<T1::Sign, T2::Sign>>>::Word,
        Add1<Maximum<N1, N2>>,
        Maximum<F1, F2>,
        Minimum<E1, E2>,
        Op,
        Up,
    >;
}

impl<L, R> SumRule<L, R> for False {
    type Output = L;
}

impl<T1, N1, F1, E1, Op, Up, T2, N2, F2, E2, Op2, Up2>
    SumPromotion<Fix<T2, N2, F2, E2, Op2, Up2>> for Fix<T1, N1, F1, E1, Op, Up>
where
    N1: Max<N2>,
    F1: Max<F2>,
    Maximum<N1, N2>: Add<B1>,
    Add1<Maximum<N1, N2>>: Add<Maximum<F1, F2>>,
    Sum<Add1<Maximum<N1, N2>>, Maximum<F1, F2>>: IsLessOrEqual<U63>,
    LeEq<Sum<Add1<Maximum<N1, N2>>, Maximum<F1, F2>>, U63>:
        SumRule<Fix<T1, N1, F1, E1, Op, Up>, Fix<T2, N2, F2, E2, Op2, Up2>>,
{
    type Output = <LeEq<Sum<Add1<Maximum<N1, N2>>, Maximum<F1, F2>>, U63> as SumRule<
        Fix<T1, N1, F1, E1, Op, Up>,
        Fix<T2, N2, F2, E2, Op2, Up2>,
    >>::Output;
}

/// Result format of a product: integer bits, fractional bits, and
/// prescale exponents add, making the expandable product exact.
pub trait ProdPromotion<Rhs> {
    type Output;
}

/// [`ProdPromotion`] keyed by whether the promoted width fits a host word.
pub trait ProdRule<L, R> {
    type Output;
}

impl<T1, N1, F1, E1, Op, Up, T2, N2, F2, E2, Op2, Up2>
    ProdRule<Fix<T1, N1, F1, E1, Op, Up>, Fix<T2, N2, F2, E2, Op2, Up2>> for True
where
    T1: Word,
    T2: Word,
    N1: Add<N2>,
    F1: Add<F2>,
    E1: Add<E2>,
    Sum<N1, N2>: Add<Sum<F1, F2>>,
    T1::Sign: BitOr<T2::Sign>,
    Sum<Sum<N1, N2>, Sum<F1, F2>>: PickWord<Or<T1::Sign, T2::Sign>>,
{
    type Output = Fix<
        <Sum<Sum<N1, N2>, Sum<F1, F2>> as PickWord<Or<T1::Sign, T2::Sign>>>::Word,
        Sum<N1, N2>,
        Sum<F1, F2>,
        Sum<E1, E2>,
        Op,
        Up,
    >;
}

impl<L, R> ProdRule<L, R> for False {
    type Output = L;
}

impl<T1, N1, F1, E1, Op, Up, T2, N2, F2, E2, Op2, Up2>
    ProdPromotion<Fix<T2, N2, F2, E2, Op2, Up2>> for Fix<T1, N1, F1, E1, Op, Up>
where
    N1: Add<N2>,
    F1: Add<F2>,
    Sum<N1, N2>: Add<Sum<F1, F2>>,
    Sum<Sum<N1, N2>, Sum<F1, F2>>: IsLessOrEqual<U63>,
    LeEq<Sum<Sum<N1, N2>, Sum<F1, F2>>, U63>:
        ProdRule<Fix<T1, N1, F1, E1, Op, Up>, Fix<T2, N2, F2, E2, Op2, Up2>>,
{
    type Output = <LeEq<Sum<Sum<N1, N2>, Sum<F1, F2>>, U63> as ProdRule<
        Fix<T1, N1, F1, E1, Op, Up>,
        Fix<T2, N2, F2, E2, Op2, Up2>,
    >>::Output;
}

/// Result format of a quotient: total widths add, split so the numerator
/// keeps its fraction and gains the denominator's integer range.
pub trait QuotPromotion<Rhs> {
    type Output;
}

/// [`QuotPromotion`] keyed by whether the promoted width fits a host word.
pub trait QuotRule<L, R> {
    type Output;
}

impl<T1, N1, F1, E1, Op, Up, T2, N2, F2, E2, Op2, Up2>
    QuotRule<Fix<T1, N1, F1, E1, Op, Up>, Fix<T2, N2, F2, E2, Op2, Up2>> for True
where
    T1: Word,
    T2: Word,
    N1: Add<F2>,
    F1: Add<N2>,
    E1: Sub<E2>,
    Sum<N1, F2>: Add<Sum<F1, N2>>,
    T1::Sign: BitOr<T2::Sign>,
    Sum<Sum<N1, F2>, Sum<F1, N2>>: PickWord<Or<T1::Sign, T2::Sign>>,
{
    type Output = Fix<
        <Sum<Sum<N1, F2>, Sum<F1, N2>> as PickWord<Or<T1::Sign, T2::Sign>>>::Word,
        Sum<N1, F2>,
        Sum<F1, N2>,
        Diff<E1, E2>,
        Op,
        Up,
    >;
}

impl<L, R> QuotRule<L, R> for False {
    type Output = L;
}

impl<T1, N1, F1, E1, Op, Up, T2, N2, F2, E2, Op2, Up2>
    QuotPromotion<Fix<T2, N2, F2, E2, Op2, Up2>> for Fix<T1, N1, F1, E1, Op, Up>
where
    N1: Add<F2>,
    F1: Add<N2>,
    Sum<N1, F2>: Add<Sum<F1, N2>>,
    Sum<Sum<N1, F2>, Sum<F1, N2>>: IsLessOrEqual<U63>,
    LeEq<Sum<Sum<N1, F2>, Sum<F1, N2>>, U63>:
        QuotRule<Fix<T1, N1, F1, E1, Op, Up>, Fix<T2, N2, F2, E2, Op2, Up2>>,
{
    type Output = <LeEq<Sum<Sum<N1, F2>, Sum<F1, N2>>, U63> as QuotRule<
        Fix<T1, N1, F1, E1, Op, Up>,
        Fix<T2, N2, F2, E2, Op2, Up2>,
    >>::Output;
}

/// `ceil(log2(X))` for `X >= 2`.
type CeilLog2<X> = Add1<Log2<Sub1<X>>>;

/// Result format of the logarithms and the functions reduced to them:
/// grows by the carry room of a sum of `n + f` terms, always signed.
pub trait LogPromotion {
    type Output;
}

impl<T, N, F, E, Op, Up> LogPromotion for Fix<T, N, F, E, Op, Up>
where
    T: Word,
    N: Add<F> + Add<CeilLog2<Sum<N, F>>>,
    Sum<N, F>: Sub<B1>,
    Sub1<Sum<N, F>>: Logarithm2,
    Log2<Sub1<Sum<N, F>>>: Add<B1>,
    Sum<N, CeilLog2<Sum<N, F>>>: Add<F>,
    Sum<Sum<N, CeilLog2<Sum<N, F>>>, F>: StoreBits,
{
    type Output = Fix<
        <Sum<Sum<N, CeilLog2<Sum<N, F>>>, F> as StoreBits>::Signed,
        Sum<N, CeilLog2<Sum<N, F>>>,
        F,
        E,
        Op,
        Up,
    >;
}

/// Result format of `exp`: the same growth as [`LogPromotion`], unsigned.
pub trait ExpPromotion {
    type Output;
}

impl<T, N, F, E, Op, Up> ExpPromotion for Fix<T, N, F, E, Op, Up>
where
    T: Word,
    N: Add<F> + Add<CeilLog2<Sum<N, F>>>,
    Sum<N, F>: Sub<B1>,
    Sub1<Sum<N, F>>: Logarithm2,
    Log2<Sub1<Sum<N, F>>>: Add<B1>,
    Sum<N, CeilLog2<Sum<N, F>>>: Add<F>,
    Sum<Sum<N, CeilLog2<Sum<N, F>>>, F>: StoreBits,
{
    type Output = Fix<
        <Sum<Sum<N, CeilLog2<Sum<N, F>>>, F> as StoreBits>::Unsigned,
        Sum<N, CeilLog2<Sum<N, F>>>,
        F,
        E,
        Op,
        Up,
    >;
}

/// Result format of `sqrt`: half the integer range plus a rounding bit,
/// keeping the argument's storage signedness.
pub trait SqrtPromotion {
    type Output;
}

impl<T, N, F, E, Op, Up> SqrtPromotion for Fix<T, N, F, E, Op, Up>
where
    T: Word,
    N: Add<B1>,
    Add1<N>: Shr<U1>,
    Shright<Add1<N>, U1>: Add<B1>,
    Add1<Shright<Add1<N>, U1>>: Add<F>,
    Sum<Add1<Shright<Add1<N>, U1>>, F>: PickWord<T::Sign>,
{
    type Output = Fix<
        <Sum<Add1<Shright<Add1<N>, U1>>, F> as PickWord<T::Sign>>::Word,
        Add1<Shright<Add1<N>, U1>>,
        F,
        E,
        Op,
        Up,
    >;
}

#[cfg(test)]
mod test {
    use typenum::{U10, U20, U30, U33, U4, U5};

    use super::*;
    use crate::fix::{FixedPoint, Q, UQ};

    fn format_of<X: FixedPoint>() -> (u32, u32, i32, bool) {
        (X::INT_BITS, X::FRAC_BITS, X::EXP, X::IS_SIGNED)
    }

    #[test]
    fn sum_formats() {
        type S = <Q<U10, U20> as SumPromotion<Q<U10, U20>>>::Output;
        assert_eq!(format_of::<S>(), (11, 20, 0, true));
        assert_eq!(core::mem::size_of::<S>(), 4);

        // Mixed signedness promotes to signed.
        type M = <UQ<U4, U4> as SumPromotion<Q<U5, U10>>>::Output;
        assert_eq!(format_of::<M>(), (6, 10, 0, true));

        // No 64-significant-bit host word: closed, left format kept.
        type C = <Q<U33, U30> as SumPromotion<Q<U33, U30>>>::Output;
        assert_eq!(format_of::<C>(), (33, 30, 0, true));
    }

    #[test]
    fn prod_formats() {
        type P = <Q<U10, U20> as ProdPromotion<Q<U5, U5>>>::Output;
        assert_eq!(format_of::<P>(), (15, 25, 0, true));
        assert_eq!(core::mem::size_of::<P>(), 8);

        type C = <Q<U20, U20> as ProdPromotion<Q<U20, U20>>>::Output;
        assert_eq!(format_of::<C>(), (20, 20, 0, true));

        type U = <UQ<U4, U4> as ProdPromotion<UQ<U4, U4>>>::Output;
        assert_eq!(format_of::<U>(), (8, 8, 0, false));
    }

    #[test]
    fn quot_formats() {
        type D = <Q<U10, U20> as QuotPromotion<Q<U10, U20>>>::Output;
        assert_eq!(format_of::<D>(), (30, 30, 0, true));

        type C = <Q<U30, U33> as QuotPromotion<Q<U30, U33>>>::Output;
        assert_eq!(format_of::<C>(), (30, 33, 0, true));
    }

    #[test]
    fn elementary_formats() {
        // 30 significant bits carry ceil(log2(30)) = 5 extra integer bits.
        type L = <Q<U10, U20> as LogPromotion>::Output;
        assert_eq!(format_of::<L>(), (15, 20, 0, true));

        type X = <Q<U10, U20> as ExpPromotion>::Output;
        assert_eq!(format_of::<X>(), (15, 20, 0, false));

        type R = <Q<U10, U20> as SqrtPromotion>::Output;
        assert_eq!(format_of::<R>(), (6, 20, 0, true));

        type RU = <UQ<U10, U20> as SqrtPromotion>::Output;
        assert_eq!(format_of::<RU>(), (6, 20, 0, false));
    }

    #[test]
    fn siblings() {
        type S = <UQ<U10, U20> as Siblings>::ToSigned;
        assert_eq!(format_of::<S>(), (10, 20, 0, true));
    }
}
