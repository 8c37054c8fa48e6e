//! Canonicalization of symbolic sums and products.
//!
//! The entry points live in [`symbolic`]; see its documentation for the expression model and the
//! canonical form that expressions are rewritten into.

pub mod consts;
pub mod error;
pub mod primitive;
pub mod symbolic;
