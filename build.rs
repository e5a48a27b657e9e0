use std::env;
use std::f64::consts::{LOG10_2, LOG10_E, LOG2_E, PI};
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

fn q63(x: f64) -> i128 {
    (x * 63f64.exp2()).round() as i128
}

fn q62(x: f64) -> i128 {
    (x * 62f64.exp2()).round() as i128
}

// Work registers of the CORDIC kernels hold Q63 values in an i128.
fn write_cordic_tables() {
    const DEPTH: i32 = 63;

    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("cordic_tables.rs");
    let mut file = File::create(dest_path).unwrap();

    // Microrotation angles, atan(2^-i) for i = 0.., as Q63.
    writeln!(
        file,
        "pub(crate) const ARCTAN: [i128; {DEPTH}] = {:?};",
        (0..DEPTH)
            .map(|i| q63(0.5f64.powi(i).atan()))
            .collect::<Vec<i128>>()
    )
    .unwrap();

    // Hyperbolic angles, atanh(2^-i) for i = 1.., as Q63.
    writeln!(
        file,
        "pub(crate) const ARCTANH: [i128; {DEPTH}] = {:?};",
        (0..DEPTH)
            .map(|i| q63(0.5f64.powi(i + 1).atanh()))
            .collect::<Vec<i128>>()
    )
    .unwrap();

    // Reciprocal circular scale 1/K(n) = prod 1/sqrt(1 + 2^-2i) for n
    // iterations, as Q62. Entry 0 is the empty product.
    let mut k = 1.0f64;
    let mut kinv = vec![q62(1.0)];
    for i in 0..DEPTH {
        k *= (1.0 + 0.25f64.powi(i)).sqrt();
        kinv.push(q62(1.0 / k));
    }
    writeln!(
        file,
        "pub(crate) const CIRCULAR_GAIN_INV: [i128; {}] = {:?};",
        DEPTH + 1,
        kinv
    )
    .unwrap();
    writeln!(
        file,
        "/// Gain of the full-depth circular CORDIC rotation.\npub const CORDIC_CIRCULAR_GAIN: f64 = {};",
        k
    )
    .unwrap();

    // Reciprocal hyperbolic scale 1/K(n) = prod 1/sqrt(1 - 2^-2i) over the
    // shift sequence 1, 2, 3, 4, 4, 5, ..., 13, 13, ... with iterations
    // 4, 13, 40, ... performed twice, as Q62.
    let mut g = 1.0f64;
    let mut ginv = vec![q62(1.0)];
    let mut rep = 4;
    for i in 1..=DEPTH {
        let r = if i == rep {
            rep = 3 * i + 1;
            2
        } else {
            1
        };
        for _ in 0..r {
            g *= (1.0 - 0.25f64.powi(i)).sqrt();
        }
        ginv.push(q62(1.0 / g));
    }
    writeln!(
        file,
        "pub(crate) const HYPERBOLIC_GAIN_INV: [i128; {}] = {:?};",
        DEPTH + 1,
        ginv
    )
    .unwrap();
    writeln!(
        file,
        "/// Gain of the full-depth hyperbolic CORDIC rotation.\npub const CORDIC_HYPERBOLIC_GAIN: f64 = {};",
        g
    )
    .unwrap();

    // Work-precision constants for range reduction and base changes.
    for (name, value) in [
        ("PI_W", PI),
        ("TAU_W", 2.0 * PI),
        ("PI_2_W", PI / 2.0),
        ("LN_2_W", 2f64.ln()),
        ("LOG2_E_W", LOG2_E),
        ("LOG10_E_W", LOG10_E),
        ("LOG10_2_W", LOG10_2),
    ] {
        writeln!(file, "pub(crate) const {}: i128 = {};", name, q63(value)).unwrap();
    }
}

fn main() {
    write_cordic_tables();
    println!("cargo:rerun-if-changed=build.rs");
}
