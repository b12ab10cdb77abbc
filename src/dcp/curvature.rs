//! Curvature tracking for DCP (Disciplined Convex Programming).
//!
//! This module implements the curvature rules that determine whether an
//! expression is convex, concave, affine, or unknown.

use std::sync::Arc;

use crate::expr::Expr;

/// Curvature of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curvature {
    /// Constant value (most restrictive).
    Constant,
    /// Affine function (both convex and concave).
    Affine,
    /// Convex function.
    Convex,
    /// Concave function.
    Concave,
    /// Unknown curvature (not DCP-compliant).
    Unknown,
}

impl Curvature {
    /// Check if the curvature is convex (constant, affine, or convex).
    pub fn is_convex(self) -> bool {
        matches!(self, Curvature::Constant | Curvature::Affine | Curvature::Convex)
    }

    /// Check if the curvature is concave (constant, affine, or concave).
    pub fn is_concave(self) -> bool {
        matches!(self, Curvature::Constant | Curvature::Affine | Curvature::Concave)
    }

    /// Check if the curvature is affine (constant or affine).
    pub fn is_affine(self) -> bool {
        matches!(self, Curvature::Constant | Curvature::Affine)
    }

    /// Check if this is a constant.
    pub fn is_constant(self) -> bool {
        matches!(self, Curvature::Constant)
    }

    /// Negate the curvature (convex <-> concave).
    pub fn negate(self) -> Self {
        match self {
            Curvature::Convex => Curvature::Concave,
            Curvature::Concave => Curvature::Convex,
            other => other,
        }
    }
}

/// Combine curvatures for addition: a + b.
pub fn add_curvature(a: Curvature, b: Curvature) -> Curvature {
    use Curvature::*;
    match (a, b) {
        (Unknown, _) | (_, Unknown) => Unknown,
        (Constant, x) | (x, Constant) => x,
        (Affine, x) | (x, Affine) => x,
        (Convex, Convex) => Convex,
        (Concave, Concave) => Concave,
        (Convex, Concave) | (Concave, Convex) => Unknown,
    }
}

/// Combine curvatures for scalar multiplication: scalar * expr.
///
/// If scalar > 0: preserves curvature
/// If scalar < 0: negates curvature
/// If scalar == 0: constant
pub fn scalar_mul_curvature(scalar: f64, expr_curv: Curvature) -> Curvature {
    if scalar == 0.0 {
        Curvature::Constant
    } else if scalar > 0.0 {
        expr_curv
    } else {
        expr_curv.negate()
    }
}

impl Expr {
    /// Get the curvature of this expression.
    pub fn curvature(&self) -> Curvature {
        match self {
            Expr::Variable(_) => Curvature::Affine,
            Expr::Constant(_) => Curvature::Constant,

            Expr::Add(a, b) => add_curvature(a.curvature(), b.curvature()),
            Expr::Neg(a) => a.curvature().negate(),
            Expr::Mul(a, b) => mul_curvature(a, b),
            Expr::Sum(exprs) => combine_all_curvatures(exprs),

            Expr::Pos(x) => {
                // max(x, 0) is convex and nondecreasing, so convex(x) suffices
                let cx = x.curvature();
                if cx.is_constant() {
                    Curvature::Constant
                } else if cx.is_convex() {
                    Curvature::Convex
                } else {
                    Curvature::Unknown
                }
            }
            Expr::Square(x) => square_curvature(x),
        }
    }

    /// Check if this expression is convex.
    pub fn is_convex(&self) -> bool {
        self.curvature().is_convex()
    }

    /// Check if this expression is concave.
    pub fn is_concave(&self) -> bool {
        self.curvature().is_concave()
    }

    /// Check if this expression is affine.
    pub fn is_affine(&self) -> bool {
        self.curvature().is_affine()
    }
}

/// x^2 is convex, nondecreasing on x >= 0 and nonincreasing on x <= 0.
fn square_curvature(x: &Expr) -> Curvature {
    let cx = x.curvature();
    if cx.is_constant() {
        return Curvature::Constant;
    }
    if cx.is_affine() {
        return Curvature::Convex;
    }
    let sx = x.sign();
    if (cx.is_convex() && sx.is_nonneg()) || (cx.is_concave() && sx.is_nonpos()) {
        Curvature::Convex
    } else {
        Curvature::Unknown
    }
}

/// Handle multiplication curvature.
fn mul_curvature(a: &Expr, b: &Expr) -> Curvature {
    let ac = a.curvature();
    let bc = b.curvature();

    if ac.is_constant() && bc.is_constant() {
        return Curvature::Constant;
    }

    if let Some(scalar) = a.constant_value() {
        return scalar_mul_curvature(scalar, bc);
    }
    if let Some(scalar) = b.constant_value() {
        return scalar_mul_curvature(scalar, ac);
    }

    // Product of two non-constant expressions is not DCP
    Curvature::Unknown
}

/// Combine curvatures for n-ary sums.
fn combine_all_curvatures(exprs: &[Arc<Expr>]) -> Curvature {
    exprs
        .iter()
        .fold(Curvature::Constant, |acc, e| add_curvature(acc, e.curvature()))
}
