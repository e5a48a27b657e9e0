//! Square root by hyperbolic vectoring.

use typenum::{Integer, Unsigned};

use super::{depth, from_work, sqrt_work, to_work};
use crate::fix::{Fix, FixedPoint};
use crate::policy::{FixedError, OverflowPolicy, UnderflowPolicy};
use crate::promote::SqrtPromotion;
use crate::word::Word;

impl<T, N, F, E, Op, Up> Fix<T, N, F, E, Op, Up>
where
    T: Word,
    N: Unsigned,
    F: Unsigned,
    E: Integer,
    Op: OverflowPolicy,
    Up: UnderflowPolicy,
{
    /// Square root in the sqrt-promoted format; panics for `x < 0`.
    ///
    /// The argument is normalized to `4^k m` with `m` in `[1/2, 2)` and
    /// vectored over `(m + 1/4, m - 1/4)`, which yields `K sqrt(m)`.
    pub fn sqrt(self) -> <Self as SqrtPromotion>::Output
    where
        Self: SqrtPromotion,
        <Self as SqrtPromotion>::Output: FixedPoint,
    {
        if self.wide() < 0 {
            panic!("{}", FixedError::Domain("sqrt of a negative argument"));
        }
        from_work(sqrt_work(to_work(self), depth(F::U32)))
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;
    use typenum::{U10, U20, U4};

    use crate::fix::{Q, UQ};

    type Q10_20 = Q<U10, U20>;

    #[test]
    fn sqrt_of_two() {
        let x = Q10_20::from_num(2.0);
        assert!((x.sqrt().as_f64() - core::f64::consts::SQRT_2).abs() <= 1.0 / (1 << 19) as f64);
    }

    #[test]
    fn references() {
        for v in [0.0f64, 1.0 / (1 << 20) as f64, 0.0625, 0.9, 1.0, 16.0, 1023.0] {
            let q = Q10_20::from_num(v);
            assert!(
                (q.sqrt().as_f64() - v.sqrt()).abs() <= 2.0 / (1 << 20) as f64,
                "sqrt {v}"
            );
        }
    }

    #[test]
    fn unsigned_formats() {
        let q = UQ::<U4, U20>::from_num(9.0);
        assert!((q.sqrt().as_f64() - 3.0).abs() <= 1.0 / (1 << 19) as f64);
    }

    #[test]
    fn monotone() {
        let mut last = -1.0;
        for i in 0..500 {
            let s = Q10_20::wrap(i << 12).sqrt().as_f64();
            assert!(s >= last);
            last = s;
        }
    }

    #[test]
    #[should_panic(expected = "domain")]
    fn negative_argument() {
        let _ = Q10_20::from_num(-1.0).sqrt();
    }

    #[quickcheck]
    fn check_sqrt(bits: u32) -> bool {
        let q = Q10_20::wrap((bits >> 2) as i32);
        (q.sqrt().as_f64() - q.as_f64().sqrt()).abs() <= 2.0 / (1 << 20) as f64
    }
}
