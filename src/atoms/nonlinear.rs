//! Nonlinear atoms for convex optimization.
//!
//! These atoms have specific curvature properties and require DCP
//! composition rules to be applied correctly.

use std::sync::Arc;

use crate::expr::Expr;

/// Positive part: max(x, 0).
///
/// Properties:
/// - Curvature: Convex
/// - Sign: Non-negative
/// - Monotonicity: Increasing
pub fn pos(x: &Expr) -> Expr {
    Expr::Pos(Arc::new(x.clone()))
}

/// Square: x^2.
///
/// Properties:
/// - Curvature: Convex for affine x, or for convex non-negative x
/// - Sign: Non-negative
/// - Monotonicity: Increasing for x >= 0, decreasing for x <= 0
pub fn square(x: &Expr) -> Expr {
    Expr::Square(Arc::new(x.clone()))
}

/// Hinge penalty: `max(x, 0)`, optionally squared.
pub fn hinge(x: &Expr, squared: bool) -> Expr {
    let clamped = pos(x);
    if squared {
        square(&clamped)
    } else {
        clamped
    }
}
