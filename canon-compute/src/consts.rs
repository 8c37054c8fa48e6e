//! Approximate values of the named constants. Each static evaluates lazily to a [`Float`] at
//! [`PRECISION`](crate::primitive::PRECISION) bits.

use once_cell::sync::Lazy;
use rug::Float;
use super::primitive::float;

/// Euler's number.
pub static E: Lazy<Float> = Lazy::new(|| float(1).exp());

pub static PI: Lazy<Float> = Lazy::new(|| float(-1).acos());
