#![cfg_attr(not(any(test, doctest, feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

mod cordic;
pub use cordic::{CORDIC_CIRCULAR_GAIN, CORDIC_HYPERBOLIC_GAIN};
mod fix;
pub use fix::*;
mod ops;
mod policy;
pub use policy::*;
mod promote;
pub use promote::*;
mod word;
pub use word::*;

// Formats are spelled in type-level integers; re-exported so downstream
// code does not need to name the crate.
pub use typenum;
