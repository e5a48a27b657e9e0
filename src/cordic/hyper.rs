//! Hyperbolic functions and their inverses.

use typenum::{Integer, Unsigned};

use super::{depth, div_work, exp_work, from_work, log_work, sqrt_work, to_work, ONE_W};
use crate::fix::{Fix, FixedPoint};
use crate::policy::{FixedError, OverflowPolicy, UnderflowPolicy};
use crate::promote::LogPromotion;
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
    /// `(exp(x), exp(-x))` work registers at this format's depth.
    fn exp_pair(self) -> (i128, i128) {
        let iters = depth(F::U32);
        let x = to_work(self);
        (exp_work(x, iters), exp_work(-x, iters))
    }

    /// Hyperbolic sine, `(e^x - e^-x)/2`, log-promoted.
    pub fn sinh(self) -> <Self as LogPromotion>::Output
    where
        Self: LogPromotion,
        <Self as LogPromotion>::Output: FixedPoint,
    {
        let (ep, en) = self.exp_pair();
        from_work(ep.saturating_sub(en) >> 1)
    }

    /// Hyperbolic cosine, `(e^x + e^-x)/2`, log-promoted.
    pub fn cosh(self) -> <Self as LogPromotion>::Output
    where
        Self: LogPromotion,
        <Self as LogPromotion>::Output: FixedPoint,
    {
        let (ep, en) = self.exp_pair();
        from_work(ep.saturating_add(en) >> 1)
    }

    /// Hyperbolic tangent, `sinh/cosh`, log-promoted.
    pub fn tanh(self) -> <Self as LogPromotion>::Output
    where
        Self: LogPromotion,
        <Self as LogPromotion>::Output: FixedPoint,
    {
        let (ep, en) = self.exp_pair();
        from_work(div_work(ep.saturating_sub(en), ep.saturating_add(en)))
    }

    /// Inverse hyperbolic sine, `log(x + sqrt(x^2 + 1))`, log-promoted.
    pub fn asinh(self) -> <Self as LogPromotion>::Output
    where
        Self: LogPromotion,
        <Self as LogPromotion>::Output: FixedPoint,
    {
        let iters = depth(F::U32);
        let v = to_work(self);
        let a = v.unsigned_abs() as i128;
        let w = if a <= ONE_W {
            log_work(a + sqrt_work(ONE_W + ((a * a) >> 63), iters), iters)
        } else {
            // log(a (1 + sqrt(1 + 1/a^2))) keeps the squares in range.
            let u = div_work(ONE_W, a);
            let s = sqrt_work(ONE_W + ((u * u) >> 63), iters);
            log_work(a, iters) + log_work(ONE_W + s, iters)
        };
        from_work(if v < 0 { -w } else { w })
    }

    /// Inverse hyperbolic cosine, `log(x + sqrt(x^2 - 1))`, log-promoted.
    /// Panics for `x < 1`.
    pub fn acosh(self) -> <Self as LogPromotion>::Output
    where
        Self: LogPromotion,
        <Self as LogPromotion>::Output: FixedPoint,
    {
        let iters = depth(F::U32);
        let v = to_work(self);
        if v < ONE_W {
            panic!("{}", FixedError::Domain("acosh of x < 1"));
        }
        let u = div_work(ONE_W, v);
        let s = sqrt_work(ONE_W - ((u * u) >> 63), iters);
        from_work(log_work(v, iters) + log_work(ONE_W + s, iters))
    }

    /// Inverse hyperbolic tangent,
    /// `(log(1 + x) - log(1 - x))/2`, log-promoted. Panics for `|x| >= 1`.
    pub fn atanh(self) -> <Self as LogPromotion>::Output
    where
        Self: LogPromotion,
        <Self as LogPromotion>::Output: FixedPoint,
    {
        let iters = depth(F::U32);
        let v = to_work(self);
        let a = v.unsigned_abs() as i128;
        if a >= ONE_W {
            panic!("{}", FixedError::Domain("atanh of |x| >= 1"));
        }
        let w = (log_work(ONE_W + a, iters) - log_work(ONE_W - a, iters)) >> 1;
        from_work(if v < 0 { -w } else { w })
    }
}
