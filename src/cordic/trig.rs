//! Circular functions and their inverses.

use typenum::{Integer, Unsigned};

use super::{
    depth, div_work, from_work, kernel, sqrt_work, to_work, CIRCULAR, CIRCULAR_GAIN_INV, ONE_W,
    PI_2_W, PI_W, ROTATE, TAU_W, VECTOR,
};
use crate::fix::{Fix, FixedPoint};
use crate::policy::{FixedError, OverflowPolicy, UnderflowPolicy};
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
    /// Reduce the angle into `[-pi/2, pi/2]` around `x = pi - (theta mod
    /// 2pi)` and rotate; returns `(sin, cos)` work registers.
    ///
    /// The pi-centred reduction makes the correction unconditional for the
    /// cosine: `sin = sign * y`, `cos = -sign * x`.
    fn cos_sin_work(self) -> (i128, i128) {
        let iters = depth(F::U32);
        let x = PI_W - to_work(self).rem_euclid(TAU_W);
        let (arg, sign) = if x < -PI_2_W {
            (x + PI_W, -1)
        } else if x > PI_2_W {
            (x - PI_W, -1)
        } else {
            (x, 1)
        };
        let g = CIRCULAR_GAIN_INV[iters as usize] << 1;
        let (c, s, _z) = kernel::<ROTATE, CIRCULAR>(g, 0, arg, iters);
        (sign * s, -sign * c)
    }

    /// Sine, in the argument's format.
    pub fn sin(self) -> Self {
        from_work(self.cos_sin_work().0)
    }

    /// Cosine, in the argument's format.
    pub fn cos(self) -> Self {
        from_work(self.cos_sin_work().1)
    }

    /// Tangent, `sin/cos` in the work registers, in the argument's format.
    pub fn tan(self) -> Self {
        let (s, c) = self.cos_sin_work();
        from_work(div_work(s, c))
    }

    /// Arctangent, in the argument's format.
    ///
    /// Arguments beyond unit magnitude go through
    /// `atan(x) = ±pi/2 - atan(1/x)`, keeping the vectoring kernel inside
    /// its convergence range.
    pub fn atan(self) -> Self {
        let iters = depth(F::U32);
        let v = to_work(self);
        if v.abs() <= ONE_W {
            let (_x, _y, z) = kernel::<VECTOR, CIRCULAR>(ONE_W, v, 0, iters);
            from_work(z)
        } else {
            let (_x, _y, z) = kernel::<VECTOR, CIRCULAR>(ONE_W, div_work(ONE_W, v), 0, iters);
            from_work(if v > 0 { PI_2_W - z } else { -PI_2_W - z })
        }
    }

    fn asin_work(self) -> i128 {
        let iters = depth(F::U32);
        let v = to_work(self);
        if v.abs() > ONE_W {
            panic!("{}", FixedError::Domain("asin of |x| > 1"));
        }
        // asin v = atan2(v, sqrt(1 - v^2)) by circular vectoring.
        let c = sqrt_work(ONE_W - ((v * v) >> 63), iters);
        let (_x, _y, z) = kernel::<VECTOR, CIRCULAR>(c, v, 0, iters);
        z
    }

    /// Arcsine, in the argument's format. Panics outside `[-1, 1]`.
    pub fn asin(self) -> Self {
        from_work(self.asin_work())
    }

    /// Arccosine, in the argument's format. Panics outside `[-1, 1]`.
    pub fn acos(self) -> Self {
        from_work(PI_2_W - self.asin_work())
    }
}
