//! CORDIC evaluation of the elementary functions.
//!
//! All kernels run on `i128` work registers holding Q63 values; the
//! microrotation tables and per-iteration-count scale constants are
//! generated by `build.rs`. A format with `f` fractional bits runs `f + 2`
//! iterations (two guard rotations keep the last-iteration residual and
//! the output rounding below the format's step), so precision tracks the
//! argument format.

mod explog;
mod hyper;
mod sqrt;
mod trig;

include!(concat!(env!("OUT_DIR"), "/cordic_tables.rs"));

/// Fractional bits of the work registers.
pub(crate) const W: u32 = 63;
/// 1.0 in a work register.
pub(crate) const ONE_W: i128 = 1 << W;

pub(crate) const ROTATE: bool = false;
pub(crate) const VECTOR: bool = true;
pub(crate) const CIRCULAR: bool = false;
pub(crate) const HYPERBOLIC: bool = true;

use crate::fix::{rescale, FixedPoint};
use crate::policy::Ignore;

/// Iteration count for a format with `f` fractional bits.
#[inline]
pub(crate) fn depth(f: u32) -> u32 {
    (f + 2).min(W)
}

/// Generic CORDIC microrotation loop.
///
/// Rotation mode (`VECTORING = false`) drives `z` to zero; vectoring mode
/// drives `y` to zero. Hyperbolic shifts start at 1 and iterations
/// 4, 13, 40, ... run twice for convergence, matching the schedule used to
/// generate `HYPERBOLIC_GAIN_INV`.
#[inline]
pub(crate) fn kernel<const VECTORING: bool, const COORD: bool>(
    mut x: i128,
    mut y: i128,
    mut z: i128,
    iters: u32,
) -> (i128, i128, i128) {
    let angles: &[i128; 63] = if COORD == HYPERBOLIC {
        &ARCTANH
    } else {
        &ARCTAN
    };
    let mut rep = 4;
    for j in 0..iters as usize {
        let (i, a) = if COORD == HYPERBOLIC {
            (j + 1, angles[j])
        } else {
            (j, angles[j])
        };
        let repeat = if COORD == HYPERBOLIC && i == rep {
            rep = 3 * i + 1;
            2
        } else {
            1
        };
        for _ in 0..repeat {
            // "sigma"
            let lower = if VECTORING { y <= 0 } else { z >= 0 };
            let (dx, dy) = (y >> i, x >> i);
            if lower {
                if COORD == HYPERBOLIC {
                    x += dx;
                } else {
                    x -= dx;
                }
                y += dy;
                z -= a;
            } else {
                if COORD == HYPERBOLIC {
                    x -= dx;
                } else {
                    x += dx;
                }
                y -= dy;
                z += a;
            }
        }
    }
    (x, y, z)
}

/// Argument brought from its format into a work register.
#[inline]
pub(crate) fn to_work<X: FixedPoint>(x: X) -> i128 {
    rescale::<Ignore>(x.wide(), W as i32 - X::TOTAL_SCALE)
}

/// Work register rounded into a destination format, nearest, half away
/// from zero. Out-of-range results resolve through the destination's
/// overflow policy. A result that rounds to zero is zero; function
/// evaluation is not a normalisation, so no underflow fires.
#[inline]
pub(crate) fn from_work<X: FixedPoint>(w: i128) -> X {
    let sh = W as i32 - X::TOTAL_SCALE;
    let bits = if sh > 0 {
        if sh > 126 {
            0
        } else {
            let half = 1i128 << (sh - 1);
            let w = if w >= 0 {
                w.saturating_add(half)
            } else {
                w.saturating_sub(half)
            };
            w / (1i128 << sh)
        }
    } else if w == 0 || sh == 0 {
        w
    } else {
        let headroom = w.unsigned_abs().leading_zeros() as i32 - 1;
        if -sh > headroom {
            if w > 0 {
                i128::MAX
            } else {
                i128::MIN
            }
        } else {
            w << -sh
        }
    };
    X::new_wide(bits)
}

/// Q63 quotient of two work registers, saturating on a vanishing
/// denominator.
pub(crate) fn div_work(num: i128, den: i128) -> i128 {
    if den == 0 {
        return if num >= 0 { i128::MAX } else { i128::MIN };
    }
    let nb = 128 - num.unsigned_abs().leading_zeros() as i32;
    let db = 128 - den.unsigned_abs().leading_zeros() as i32;
    let s = (nb - 64).max(db - 63).max(0);
    let (num, den) = (num >> s, den >> s);
    if den == 0 {
        return if num >= 0 { i128::MAX } else { i128::MIN };
    }
    (num << 63) / den
}

/// Q63 product; callers keep `|a * b|` below `2^127`.
#[inline]
pub(crate) fn mul_work(a: i128, b: i128) -> i128 {
    (a * b) >> 63
}

/// `exp` of a work value, saturating far outside the register range.
pub(crate) fn exp_work(x: i128, iters: u32) -> i128 {
    // x = k ln2 + r with |r| <= ln2/2; exp(x) = 2^k (cosh r + sinh r).
    let k = (x + LN_2_W / 2).div_euclid(LN_2_W);
    if k > 63 {
        return i128::MAX;
    }
    if k < -127 {
        return 0;
    }
    let r = x - k * LN_2_W;
    let g = HYPERBOLIC_GAIN_INV[iters as usize] << 1;
    let (c, s, _z) = kernel::<ROTATE, HYPERBOLIC>(g, 0, r, iters);
    let e = c + s;
    if k >= 0 {
        e << k
    } else {
        e >> -k
    }
}

/// Split a positive work value `x = 2^k m`, `m` in `[1, 2)`, and return
/// `(k, ln m)`.
pub(crate) fn log_parts(x: i128, iters: u32) -> (i128, i128) {
    debug_assert!(x > 0);
    let bits = 128 - x.leading_zeros() as i32;
    let k = bits - 64;
    let m = if k >= 0 { x >> k } else { x << -k };
    // ln m = 2 atanh((m - 1) / (m + 1)) by hyperbolic vectoring.
    let (_x, _y, z) = kernel::<VECTOR, HYPERBOLIC>(m + ONE_W, m - ONE_W, 0, iters);
    (k as i128, z << 1)
}

/// Natural log of a positive work value.
pub(crate) fn log_work(x: i128, iters: u32) -> i128 {
    let (k, lm) = log_parts(x, iters);
    k * LN_2_W + lm
}

/// Square root of a non-negative work value.
pub(crate) fn sqrt_work(x: i128, iters: u32) -> i128 {
    if x == 0 {
        return 0;
    }
    // x = 2^t m with even t, m in [1/2, 2); the vectoring pair
    // (m + 1/4, m - 1/4) stays inside the hyperbolic convergence range.
    let bits = 128 - x.leading_zeros() as i32;
    let mut t = bits - 64;
    if t & 1 != 0 {
        t += 1;
    }
    let m = if t >= 0 { x >> t } else { x << -t };
    let (xr, _y, _z) = kernel::<VECTOR, HYPERBOLIC>(m + (ONE_W >> 2), m - (ONE_W >> 2), 0, iters);
    let s = (xr * HYPERBOLIC_GAIN_INV[iters as usize]) >> 62;
    let k = t / 2;
    if k >= 0 {
        s << k
    } else {
        s >> -k
    }
}
