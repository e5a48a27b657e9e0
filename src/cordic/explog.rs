//! Exponential and logarithms.

use typenum::{Integer, Unsigned};

use super::{
    depth, exp_work, from_work, log_parts, mul_work, to_work, LN_2_W, LOG10_2_W, LOG10_E_W,
    LOG2_E_W,
};
use crate::fix::{Fix, FixedPoint};
use crate::policy::{FixedError, OverflowPolicy, UnderflowPolicy};
use crate::promote::{ExpPromotion, LogPromotion};
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
    /// `e^x` in the exp-promoted, unsigned format.
    pub fn exp(self) -> <Self as ExpPromotion>::Output
    where
        Self: ExpPromotion,
        <Self as ExpPromotion>::Output: FixedPoint,
    {
        from_work(exp_work(to_work(self), depth(F::U32)))
    }

    /// Split into `x = 2^k m` and run the hyperbolic vectoring kernel;
    /// panics on non-positive arguments.
    fn log_parts_checked(self) -> (i128, i128) {
        if self.wide() <= 0 {
            panic!("{}", FixedError::Domain("log of a non-positive argument"));
        }
        // A value below the work precision still maps to the smallest
        // work register step.
        let v = to_work(self).max(1);
        log_parts(v, depth(F::U32))
    }

    /// Natural logarithm in the log-promoted format; panics for `x <= 0`.
    pub fn log(self) -> <Self as LogPromotion>::Output
    where
        Self: LogPromotion,
        <Self as LogPromotion>::Output: FixedPoint,
    {
        let (k, lm) = self.log_parts_checked();
        from_work(k * LN_2_W + lm)
    }

    /// Base-2 logarithm in the log-promoted format; panics for `x <= 0`.
    pub fn log2(self) -> <Self as LogPromotion>::Output
    where
        Self: LogPromotion,
        <Self as LogPromotion>::Output: FixedPoint,
    {
        let (k, lm) = self.log_parts_checked();
        from_work((k << 63) + mul_work(lm, LOG2_E_W))
    }

    /// Base-10 logarithm in the log-promoted format; panics for `x <= 0`.
    pub fn log10(self) -> <Self as LogPromotion>::Output
    where
        Self: LogPromotion,
        <Self as LogPromotion>::Output: FixedPoint,
    {
        let (k, lm) = self.log_parts_checked();
        from_work(k * LOG10_2_W + mul_work(lm, LOG10_E_W))
    }
}
