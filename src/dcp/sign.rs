//! Sign tracking for DCP (Disciplined Convex Programming).
//!
//! This module tracks whether expressions are non-negative, non-positive,
//! or have unknown sign. Sign information feeds the composition rule for
//! `square`.

use std::sync::Arc;

use crate::expr::Expr;

/// Sign of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Expression is always >= 0.
    Nonnegative,
    /// Expression is always <= 0.
    Nonpositive,
    /// Expression is always == 0.
    Zero,
    /// Sign is unknown.
    Unknown,
}

impl Sign {
    /// Check if the sign is non-negative (>= 0).
    pub fn is_nonneg(self) -> bool {
        matches!(self, Sign::Nonnegative | Sign::Zero)
    }

    /// Check if the sign is non-positive (<= 0).
    pub fn is_nonpos(self) -> bool {
        matches!(self, Sign::Nonpositive | Sign::Zero)
    }

    /// Check if the sign is zero.
    pub fn is_zero(self) -> bool {
        matches!(self, Sign::Zero)
    }

    /// Negate the sign.
    pub fn negate(self) -> Self {
        match self {
            Sign::Nonnegative => Sign::Nonpositive,
            Sign::Nonpositive => Sign::Nonnegative,
            Sign::Zero => Sign::Zero,
            Sign::Unknown => Sign::Unknown,
        }
    }

    /// Sign of a scalar value.
    pub fn of_value(v: f64) -> Self {
        if v == 0.0 {
            Sign::Zero
        } else if v > 0.0 {
            Sign::Nonnegative
        } else if v < 0.0 {
            Sign::Nonpositive
        } else {
            Sign::Unknown
        }
    }
}

/// Combine signs for addition: a + b.
pub fn add_sign(a: Sign, b: Sign) -> Sign {
    use Sign::*;
    match (a, b) {
        (Zero, x) | (x, Zero) => x,
        (Nonnegative, Nonnegative) => Nonnegative,
        (Nonpositive, Nonpositive) => Nonpositive,
        (Nonnegative, Nonpositive) | (Nonpositive, Nonnegative) => Unknown,
        (Unknown, _) | (_, Unknown) => Unknown,
    }
}

/// Combine signs for multiplication: a * b.
pub fn mul_sign(a: Sign, b: Sign) -> Sign {
    use Sign::*;
    match (a, b) {
        (Zero, _) | (_, Zero) => Zero,
        (Nonnegative, Nonnegative) | (Nonpositive, Nonpositive) => Nonnegative,
        (Nonnegative, Nonpositive) | (Nonpositive, Nonnegative) => Nonpositive,
        (Unknown, _) | (_, Unknown) => Unknown,
    }
}

impl Expr {
    /// Get the sign of this expression.
    pub fn sign(&self) -> Sign {
        match self {
            Expr::Variable(v) => {
                if v.nonneg {
                    Sign::Nonnegative
                } else {
                    Sign::Unknown
                }
            }
            Expr::Constant(c) => Sign::of_value(*c),

            Expr::Add(a, b) => add_sign(a.sign(), b.sign()),
            Expr::Neg(a) => a.sign().negate(),
            Expr::Mul(a, b) => mul_sign(a.sign(), b.sign()),
            Expr::Sum(exprs) => combine_signs(exprs),

            Expr::Pos(_) | Expr::Square(_) => Sign::Nonnegative,
        }
    }

    /// Check if this expression is non-negative.
    pub fn is_nonneg(&self) -> bool {
        self.sign().is_nonneg()
    }

    /// Check if this expression is non-positive.
    pub fn is_nonpos(&self) -> bool {
        self.sign().is_nonpos()
    }
}

fn combine_signs(exprs: &[Arc<Expr>]) -> Sign {
    exprs
        .iter()
        .fold(Sign::Zero, |acc, e| add_sign(acc, e.sign()))
}
