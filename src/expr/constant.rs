//! Constant expression creation.

use super::expression::Expr;

/// Create a constant expression from a scalar.
pub fn constant(value: f64) -> Expr {
    Expr::Constant(value)
}

/// The constant zero.
pub fn zero() -> Expr {
    Expr::Constant(0.0)
}

/// Extension trait for creating constants from various types.
pub trait IntoConstant {
    fn into_constant(self) -> Expr;
}

impl IntoConstant for f64 {
    fn into_constant(self) -> Expr {
        constant(self)
    }
}

impl IntoConstant for i32 {
    fn into_constant(self) -> Expr {
        constant(self as f64)
    }
}
