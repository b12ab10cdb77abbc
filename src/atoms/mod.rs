//! Atom functions for building expressions.
//!
//! Atoms are the building blocks of optimization problems. They include:
//!
//! - **Affine atoms**: Operations that preserve linearity (add, scalar mul, sum)
//! - **Nonlinear atoms**: Operations with specific curvature (`pos`, `square`)

pub mod affine;
pub mod nonlinear;

pub use affine::{sum, weighted_sum};
pub use nonlinear::{hinge, pos, square};
