//! Overflow and underflow policies.
//!
//! A policy is selected per fixed-point format and resolved statically;
//! expressions mixing formats with different policies use the left
//! operand's. Domain violations of the elementary functions are not
//! policy-mediated and always panic with the error value.

use thiserror::Error;

/// Arithmetic failure reported by the `Raise` policies and the fallible
/// constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FixedError {
    /// A stored integer fell outside the representable range of the
    /// destination format.
    #[error("fixed-point overflow: stored integer outside the destination range")]
    Overflow,
    /// A non-zero value was rescaled to zero.
    #[error("fixed-point underflow: non-zero value rescaled to zero")]
    Underflow,
    /// The denominator stored integer was zero.
    #[error("fixed-point division by zero")]
    DivisionByZero,
    /// An argument outside the mathematical domain of an elementary function.
    #[error("fixed-point domain error: {0}")]
    Domain(&'static str),
}

/// Response to a stored integer leaving `[lo, hi]`.
pub trait OverflowPolicy: 'static {
    /// Map an out-of-range stored integer back into `[lo, hi]`, or fail.
    fn resolve(bits: i128, lo: i128, hi: i128) -> i128;

    /// Resolve a division by zero; `sign` is the numerator's sign.
    fn divide_by_zero(sign: i128, lo: i128, hi: i128) -> i128;
}

/// Response to a non-zero value rescaling to zero; returns the replacement
/// stored integer. `sign` is the sign of the lost value.
pub trait UnderflowPolicy: 'static {
    fn resolve(sign: i128) -> i128;
}

/// Silently wrap (overflow) or truncate to zero (underflow).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ignore;

/// Clamp to the nearest representable bound.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Saturate;

/// Panic with the [`FixedError`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Raise;

impl OverflowPolicy for Ignore {
    #[inline]
    fn resolve(bits: i128, lo: i128, hi: i128) -> i128 {
        // The span is a power of two; modular reduction keeps the low bits.
        let span = hi - lo + 1;
        lo + (bits - lo).rem_euclid(span)
    }

    #[inline]
    fn divide_by_zero(_sign: i128, _lo: i128, _hi: i128) -> i128 {
        0
    }
}

impl OverflowPolicy for Saturate {
    #[inline]
    fn resolve(bits: i128, lo: i128, hi: i128) -> i128 {
        bits.clamp(lo, hi)
    }

    #[inline]
    fn divide_by_zero(sign: i128, lo: i128, hi: i128) -> i128 {
        if sign < 0 {
            lo
        } else {
            hi
        }
    }
}

impl OverflowPolicy for Raise {
    #[inline]
    fn resolve(_bits: i128, _lo: i128, _hi: i128) -> i128 {
        panic!("{}", FixedError::Overflow)
    }

    #[inline]
    fn divide_by_zero(_sign: i128, _lo: i128, _hi: i128) -> i128 {
        panic!("{}", FixedError::DivisionByZero)
    }
}

impl UnderflowPolicy for Ignore {
    #[inline]
    fn resolve(_sign: i128) -> i128 {
        0
    }
}

impl UnderflowPolicy for Saturate {
    #[inline]
    fn resolve(sign: i128) -> i128 {
        sign.signum()
    }
}

impl UnderflowPolicy for Raise {
    #[inline]
    fn resolve(_sign: i128) -> i128 {
        panic!("{}", FixedError::Underflow)
    }
}
