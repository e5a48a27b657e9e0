//! End-to-end checks of the public surface: the scenario table of the
//! arithmetic core and the cross-operation invariants.

use num_traits::float::FloatConst;
use qfix::typenum::{U10, U20, U24, U28, U4, U5, U8, Z0};
use qfix::{FixedError, Q, Saturate, UQ};

type Q10_20 = Q<U10, U20>;
type Q8_24 = Q<U8, U24>;

#[test]
fn s1_exact_sum() {
    let x = Q10_20::from_num(1.5);
    let y = Q10_20::from_num(0.25);
    let s = x + y;
    assert_eq!(s.as_f64(), 1.75);
    assert_eq!(s.value(), 1835008);
}

#[test]
#[should_panic(expected = "overflow")]
fn s2_sum_overflow() {
    let x = Q::<U5, U10>::from_num(15.5);
    let y = Q::<U5, U10>::from_num(16.5);
    let _ = x + y;
}

#[test]
fn s3_sin() {
    let x = Q8_24::from_num(core::f64::consts::FRAC_PI_6);
    assert!((x.sin().as_f64() - 0.5).abs() <= 1.0 / (1 << 23) as f64);
}

#[test]
fn s4_log_of_e() {
    let e = Q8_24::E();
    assert!((e.log().as_f64() - 1.0).abs() <= 1.0 / (1 << 22) as f64);
}

#[test]
fn s5_sqrt_of_two() {
    let x = Q10_20::from_num(2.0);
    assert!((x.sqrt().as_f64() - 1.41421356).abs() <= 1.0 / (1 << 19) as f64);
}

#[test]
#[should_panic(expected = "overflow")]
fn s6_unsigned_carry() {
    let x = UQ::<U4, U28>::largest();
    let _ = x + UQ::<U4, U28>::epsilon();
}

#[test]
fn s7_division_roundtrip() {
    let a = Q10_20::from_num(3.0);
    let b = Q10_20::from_num(7.0);
    let r = (a / b) * b;
    assert!((r.as_f64() - 3.0).abs() <= 1.0 / (1 << 20) as f64);
}

#[test]
fn round_trip_across_range() {
    // from_num(as_f64(q)) reproduces every sampled stored integer.
    let mut bits = Q10_20::LEAST_STORED;
    while bits <= Q10_20::LARGEST_STORED {
        let q = Q10_20::wrap(bits as i32);
        assert_eq!(Q10_20::from_num(q.as_f64()), q);
        bits += 0x10_0301;
    }
}

#[test]
fn wrap_value_roundtrip() {
    for bits in [-(1 << 30), -1234567, 0, 1, 98765, (1 << 30) - 1] {
        assert_eq!(Q10_20::wrap(bits).value() as i128, bits as i128);
    }
}

#[test]
fn anti_symmetry() {
    for v in [-511.75, -1.0, 0.0, 0.015625, 1023.5] {
        let q = Q10_20::from_num(v);
        assert_eq!((-(-q)).as_f64(), v);
    }
    type S = Q<U10, U20, Z0, Saturate, Saturate>;
    assert_eq!(-S::least(), S::largest());
}

#[test]
fn overflow_fires_one_ulp_out() {
    // Each operation has a pair whose exact result is one step outside
    // the destination range.
    use std::panic::{catch_unwind, AssertUnwindSafe};
    type S = Q<U4, U4>;

    let add = catch_unwind(AssertUnwindSafe(|| S::largest() + S::epsilon()));
    assert!(add.is_err());
    let sub = catch_unwind(AssertUnwindSafe(|| S::least() - S::epsilon()));
    assert!(sub.is_err());
    let mul = catch_unwind(AssertUnwindSafe(|| S::least() * S::least()));
    assert!(mul.is_err());
    let div = catch_unwind(AssertUnwindSafe(|| S::least() / (-S::epsilon())));
    assert!(div.is_err());
    let neg = catch_unwind(AssertUnwindSafe(|| -S::least()));
    assert!(neg.is_err());
}

#[test]
fn checked_constructor() {
    assert_eq!(Q::<U4, U4>::try_from_num(20.0), Err(FixedError::Overflow));
    assert!(Q::<U4, U4>::try_from_num(-3.5).is_ok());
}

#[test]
fn constants_surface() {
    assert!((Q8_24::PI().as_f64() - core::f64::consts::PI).abs() < 1e-6);
    assert!((Q8_24::TAU().as_f64() - core::f64::consts::TAU).abs() < 1e-6);
    assert!((Q8_24::LN_2().as_f64() - core::f64::consts::LN_2).abs() < 1e-6);
    assert!((Q8_24::LOG10_2().as_f64() - core::f64::consts::LOG10_2).abs() < 1e-6);
    assert!(
        (Q8_24::TWO_SQRT_2().as_f64() - 2.0 * core::f64::consts::SQRT_2).abs() < 1e-6
    );
    assert!((Q8_24::FRAC_1_SQRT_2().as_f64() - core::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
}

#[test]
fn limits_surface() {
    assert!(Q10_20::IS_BOUNDED);
    assert!(!Q10_20::IS_EXACT);
    assert!(Q10_20::IS_MODULO);
    assert!(!Q10_20::HAS_INFINITY);
    assert_eq!(Q10_20::RADIX, 2);
    assert_eq!(Q10_20::DIGITS, 30);
    assert_eq!(Q10_20::DIGITS10, 9);
    assert_eq!(Q10_20::MAX_EXPONENT, 10);
    assert_eq!(Q10_20::MIN_EXPONENT, 20);
    assert_eq!(Q10_20::round_error(), 0.5);
    assert_eq!(Q10_20::precision(), 1.0 / (1 << 20) as f64);
    assert!(Q10_20::dynamic_range_db() > 180.0);
}

#[test]
fn tan_cos_sin_consistency() {
    for v in [-1.2f64, -0.4, 0.0, 0.3, 1.0] {
        let q = Q8_24::from_num(v);
        let lhs = q.tan().as_f64() * q.cos().as_f64();
        assert!((lhs - q.sin().as_f64()).abs() <= 8.0 / (1 << 23) as f64, "{v}");
    }
}

#[test]
fn log_exp_inverse() {
    for v in [0.125f64, 1.0, 2.5, 4.0] {
        let q = Q8_24::from_num(v);
        assert!((q.log().exp().as_f64() - v).abs() <= 8.0 / (1 << 22) as f64, "{v}");
    }
}
