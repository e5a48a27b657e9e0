//! Arithmetic on fixed-point numbers.
//!
//! Binary operators accept any pair of formats; the result format comes
//! from [`crate::promote`] and the policies from the left operand. All
//! evaluation is exact in the `i128` work integer.
//!
//! Addition and subtraction convert the right operand into the left
//! operand's frame and detect overflow against the *left* format's range,
//! so `x + y` fails exactly when the sum leaves the range the left operand
//! can express, independent of the headroom of the promoted storage.

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::fix::{rescale, Fix, FixedPoint};
use crate::policy::OverflowPolicy;
use crate::promote::{ProdPromotion, QuotPromotion, SumPromotion};

/// Right operand brought into the left operand's frame, truncating toward
/// zero and resolving underflow through the left format's policy.
#[inline]
fn into_frame<L: FixedPoint, R: FixedPoint>(rhs: R) -> i128 {
    rescale::<L::Up>(rhs.wide(), L::TOTAL_SCALE - R::TOTAL_SCALE)
}

/// Resolve a left-frame result against the left format's range.
#[inline]
fn in_own_range<L: FixedPoint>(bits: i128) -> i128 {
    if bits < L::LEAST_STORED || bits > L::LARGEST_STORED {
        <L::Op as OverflowPolicy>::resolve(bits, L::LEAST_STORED, L::LARGEST_STORED)
    } else {
        bits
    }
}

macro_rules! impl_sum_op {
    ($tr:ident, $m:ident, $promo:ident, $combine:ident) => {
        impl<T1, N1, F1, E1, Op, Up, T2, N2, F2, E2, Op2, Up2> $tr<Fix<T2, N2, F2, E2, Op2, Up2>>
            for Fix<T1, N1, F1, E1, Op, Up>
        where
            Self: FixedPoint + $promo<Fix<T2, N2, F2, E2, Op2, Up2>>,
            Fix<T2, N2, F2, E2, Op2, Up2>: FixedPoint,
            <Self as $promo<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output: FixedPoint,
        {
            type Output = <Self as $promo<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output;

            #[inline]
            fn $m(
                self,
                rhs: Fix<T2, N2, F2, E2, Op2, Up2>,
            ) -> <Self as $promo<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output {
                let r = self.wide().$combine(into_frame::<Self, _>(rhs));
                <<Self as $promo<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output as FixedPoint>::rescale_from(
                    in_own_range::<Self>(r),
                    <Self as FixedPoint>::TOTAL_SCALE,
                )
            }
        }
    };
}

impl_sum_op!(Add, add, SumPromotion, saturating_add);
impl_sum_op!(Sub, sub, SumPromotion, saturating_sub);

impl<T1, N1, F1, E1, Op, Up, T2, N2, F2, E2, Op2, Up2> Mul<Fix<T2, N2, F2, E2, Op2, Up2>>
    for Fix<T1, N1, F1, E1, Op, Up>
where
    Self: FixedPoint + ProdPromotion<Fix<T2, N2, F2, E2, Op2, Up2>>,
    Fix<T2, N2, F2, E2, Op2, Up2>: FixedPoint,
    <Self as ProdPromotion<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output: FixedPoint,
{
    type Output = <Self as ProdPromotion<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output;

    /// Full product of the stored integers; a closed result is
    /// right-shifted back into the left operand's format.
    #[inline]
    fn mul(
        self,
        rhs: Fix<T2, N2, F2, E2, Op2, Up2>,
    ) -> <Self as ProdPromotion<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output {
        let p = self.wide() * rhs.wide();
        <<Self as ProdPromotion<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output as FixedPoint>::rescale_from(
            p,
            <Self as FixedPoint>::TOTAL_SCALE
                + <Fix<T2, N2, F2, E2, Op2, Up2> as FixedPoint>::TOTAL_SCALE,
        )
    }
}

impl<T1, N1, F1, E1, Op, Up, T2, N2, F2, E2, Op2, Up2> Div<Fix<T2, N2, F2, E2, Op2, Up2>>
    for Fix<T1, N1, F1, E1, Op, Up>
where
    Self: FixedPoint + QuotPromotion<Fix<T2, N2, F2, E2, Op2, Up2>>,
    Fix<T2, N2, F2, E2, Op2, Up2>: FixedPoint,
    <Self as QuotPromotion<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output: FixedPoint,
{
    type Output = <Self as QuotPromotion<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output;

    /// Numerator pre-shifted by the denominator's significant width, then
    /// an integer division.
    #[inline]
    fn div(
        self,
        rhs: Fix<T2, N2, F2, E2, Op2, Up2>,
    ) -> <Self as QuotPromotion<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output {
        let d = rhs.wide();
        let sh = <Fix<T2, N2, F2, E2, Op2, Up2> as FixedPoint>::INT_BITS
            + <Fix<T2, N2, F2, E2, Op2, Up2> as FixedPoint>::FRAC_BITS;
        if d == 0 {
            return <<Self as QuotPromotion<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output as FixedPoint>::div_zero(
                self.wide().signum(),
            );
        }
        let q = (self.wide() << sh) / d;
        <<Self as QuotPromotion<Fix<T2, N2, F2, E2, Op2, Up2>>>::Output as FixedPoint>::rescale_from(
            q,
            <Self as FixedPoint>::TOTAL_SCALE
                - <Fix<T2, N2, F2, E2, Op2, Up2> as FixedPoint>::TOTAL_SCALE
                + sh as i32,
        )
    }
}

impl<T1, N1, F1, E1, Op, Up> Neg for Fix<T1, N1, F1, E1, Op, Up>
where
    Self: FixedPoint,
{
    type Output = Self;

    /// Same format; the signed minimum (and any non-zero unsigned value)
    /// resolves through the overflow policy.
    #[inline]
    fn neg(self) -> Self {
        Self::new_wide(-self.wide())
    }
}

macro_rules! impl_assign_op {
    ($tr:ident, $m:ident, $combine:ident) => {
        impl<T1, N1, F1, E1, Op, Up, R> $tr<R> for Fix<T1, N1, F1, E1, Op, Up>
        where
            Self: FixedPoint,
            R: FixedPoint,
        {
            #[inline]
            fn $m(&mut self, rhs: R) {
                let r = self.wide().$combine(into_frame::<Self, _>(rhs));
                *self = Self::new_wide(r);
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, saturating_add);
impl_assign_op!(SubAssign, sub_assign, saturating_sub);

impl<T1, N1, F1, E1, Op, Up, R> MulAssign<R> for Fix<T1, N1, F1, E1, Op, Up>
where
    Self: FixedPoint,
    R: FixedPoint,
{
    #[inline]
    fn mul_assign(&mut self, rhs: R) {
        let p = self.wide() * rhs.wide();
        *self = Self::rescale_from(p, <Self as FixedPoint>::TOTAL_SCALE + R::TOTAL_SCALE);
    }
}

impl<T1, N1, F1, E1, Op, Up, R> DivAssign<R> for Fix<T1, N1, F1, E1, Op, Up>
where
    Self: FixedPoint,
    R: FixedPoint,
{
    #[inline]
    fn div_assign(&mut self, rhs: R) {
        let d = rhs.wide();
        let sh = R::INT_BITS + R::FRAC_BITS;
        *self = if d == 0 {
            Self::div_zero(self.wide().signum())
        } else {
            Self::rescale_from(
                (self.wide() << sh) / d,
                <Self as FixedPoint>::TOTAL_SCALE - R::TOTAL_SCALE + sh as i32,
            )
        };
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;
    use typenum::{U10, U20, U28, U4, U5, U59, Z0};

    use crate::fix::{FixedPoint, Q, UQ};
    use crate::policy::{Ignore, Raise, Saturate};

    type Q10_20 = Q<U10, U20>;

    #[test]
    fn sum_exact() {
        let x = Q10_20::from_num(1.5);
        let y = Q10_20::from_num(0.25);
        let s = x + y;
        assert_eq!(s.value(), 1835008);
        assert_eq!(s.as_f64(), 1.75);
        assert_eq!((x - y).as_f64(), 1.25);
    }

    #[test]
    fn additive_identity() {
        let x = Q10_20::from_num(-3.75);
        assert_eq!((x + Q10_20::zero()).as_f64(), -3.75);
        assert_eq!((x - x).as_f64(), 0.0);
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn sum_overflow_raises() {
        // The exact sum 32.0 leaves the left operand's Q5.10 range.
        type Q5_10 = Q<U5, U10>;
        let x = Q5_10::from_num(15.5);
        let y = Q5_10::from_num(16.5);
        let _ = x + y;
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn unsigned_carry_raises() {
        type U4_28 = UQ<U4, U28>;
        let x = U4_28::largest();
        let _ = x + U4_28::epsilon();
    }

    #[test]
    fn sum_saturates() {
        type Q5_10 = Q<U5, U10, Z0, Saturate, Raise>;
        let x = Q5_10::from_num(15.5);
        let y = Q5_10::from_num(16.5);
        assert_eq!((x + y).as_f64(), Q5_10::largest().as_f64());
        assert_eq!(((-y) + (-y)).as_f64(), Q5_10::least().as_f64());
    }

    #[test]
    fn sum_wraps() {
        type Q5_10 = Q<U5, U10, Z0, Ignore, Ignore>;
        let x = Q5_10::from_num(15.5);
        let y = Q5_10::from_num(16.5);
        // 32.0 wraps to -32.0 in the 16-significant-bit span.
        assert_eq!((x + y).as_f64(), -32.0);
    }

    #[test]
    fn mixed_format_sum() {
        let x = Q::<U10, U20>::from_num(2.5);
        let y = Q::<U5, U10>::from_num(0.25);
        let s = x + y;
        assert_eq!(s.as_f64(), 2.75);
        // Right operand precision beyond the left frame truncates.
        let fine = Q::<U10, U20>::epsilon();
        let c = Q::<U5, U10, Z0, Raise, Ignore>::from_num(1.0) + fine;
        assert_eq!(c.as_f64(), 1.0);
    }

    #[test]
    fn product_exact() {
        let x = Q10_20::from_num(1.5);
        let y = Q10_20::from_num(0.25);
        let p = x * y;
        assert_eq!(p.value() as i128, x.value() as i128 * y.value() as i128);
        assert_eq!(p.as_f64(), 0.375);
    }

    #[test]
    fn multiplicative_identity() {
        // Expandable: exact in the promoted format.
        let x = Q10_20::from_num(-7.125);
        assert_eq!((x * Q10_20::one()).as_f64(), -7.125);

        // Closed: the product keeps the left format and its precision.
        type W = Q<U20, U20>;
        let y = W::from_num(1234.000244140625);
        let p = y * W::one();
        assert_eq!(p, y);
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn product_overflow_raises() {
        // The promoted product of the signed minima is one past the range.
        type S = Q<U4, U4>;
        let x = S::least();
        let _ = x * x;
    }

    #[test]
    fn quotient() {
        let a = Q10_20::from_num(3.0);
        let b = Q10_20::from_num(7.0);
        let q = a / b;
        assert!((q.as_f64() - 3.0 / 7.0).abs() < 1e-9);
        // S7: a / b * b returns to a within the coarse epsilon.
        let r = q * b;
        assert!((r.as_f64() - 3.0).abs() < 1.0 / (1 << 20) as f64);
    }

    #[test]
    fn division_by_zero() {
        // Saturate: sign-directed clamp of the quotient format, Q30.30.
        type S = Q<U10, U20, Z0, Saturate, Raise>;
        let q = S::from_num(1.0) / S::zero();
        assert_eq!(q.wide(), (1 << 60) - 1);
        let q = S::from_num(-1.0) / S::zero();
        assert_eq!(q.wide(), -(1 << 60));
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn division_by_zero_raises() {
        let _ = Q10_20::from_num(1.0) / Q10_20::zero();
    }

    #[test]
    fn negation() {
        let x = Q10_20::from_num(1.25);
        assert_eq!((-x).as_f64(), -1.25);
        assert_eq!((-(-x)).as_f64(), 1.25);
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn negate_signed_minimum() {
        let _ = -Q10_20::least();
    }

    #[test]
    fn negate_saturating() {
        type S = Q<U10, U20, Z0, Saturate, Raise>;
        assert_eq!(-S::least(), S::largest());
    }

    #[test]
    fn assign_ops() {
        let mut x = Q10_20::from_num(1.5);
        x += Q10_20::from_num(0.25);
        assert_eq!(x.as_f64(), 1.75);
        x -= Q::<U5, U10>::from_num(0.75);
        assert_eq!(x.as_f64(), 1.0);
        x *= Q10_20::from_num(3.5);
        assert_eq!(x.as_f64(), 3.5);
        x /= Q10_20::from_num(2.0);
        assert_eq!(x.as_f64(), 1.75);
    }

    #[test]
    fn distributivity() {
        let a = Q10_20::from_num(1.375);
        let b = Q10_20::from_num(-2.0625);
        let c = Q10_20::from_num(3.5);
        let lhs = (a + b) * c;
        let rhs = a * c + b * c;
        assert!((lhs.as_f64() - rhs.as_f64()).abs() <= 2.0 / (1 << 20) as f64);
    }

    #[test]
    fn closed_operations_preserve_range() {
        // 63 significant bits: every promotion is closed.
        type W = Q<U59, U4, Z0, Saturate, Raise>;
        let x = W::from_num(1e9);
        let y = W::from_num(0.5);
        assert_eq!((x * y).as_f64(), 5e8);
        assert_eq!((x / y).as_f64(), 2e9);
        assert_eq!((x + x).as_f64(), 2e9);
    }

    #[quickcheck]
    fn check_sum_exact(a: i32, b: i32) -> bool {
        let x = Q10_20::wrap(a >> 3);
        let y = Q10_20::wrap(b >> 3);
        let s = x + y;
        s.wide() == x.wide() + y.wide() && s.as_f64() == x.as_f64() + y.as_f64()
    }

    #[quickcheck]
    fn check_product_exact(a: i32, b: i32) -> bool {
        let x = Q10_20::wrap(a >> 2);
        let y = Q10_20::wrap(b >> 2);
        (x * y).wide() == x.wide() * y.wide()
    }

    #[quickcheck]
    fn check_sub_is_add_neg(a: i32, b: i32) -> bool {
        let x = Q10_20::wrap(a >> 3);
        let y = Q10_20::wrap(b >> 3);
        (x - y).wide() == (x + (-y)).wide()
    }
}
