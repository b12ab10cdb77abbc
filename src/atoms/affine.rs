//! Affine atoms and operator overloading.
//!
//! Affine atoms are both convex and concave. They include:
//! - Addition, subtraction, negation
//! - Multiplication and division by a scalar
//! - N-ary sums and weighted sums

use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use crate::expr::{constant, Expr};

// ============================================================================
// Operator overloading for Expr
// ============================================================================

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Arc::new(self))
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Arc::new(self.clone()))
    }
}

/// Implements a binary operator for every owned/borrowed combination of `Expr`.
macro_rules! impl_expr_binop {
    ($trait:ident, $method:ident, |$a:ident, $b:ident| $body:expr) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                let ($a, $b) = (Arc::new(self), Arc::new(rhs));
                $body
            }
        }

        impl $trait for &Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                let ($a, $b) = (Arc::new(self.clone()), Arc::new(rhs.clone()));
                $body
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                let ($a, $b) = (Arc::new(self), Arc::new(rhs.clone()));
                $body
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                let ($a, $b) = (Arc::new(self.clone()), Arc::new(rhs));
                $body
            }
        }
    };
}

impl_expr_binop!(Add, add, |a, b| Expr::Add(a, b));
impl_expr_binop!(Sub, sub, |a, b| Expr::Add(a, Arc::new(Expr::Neg(b))));
impl_expr_binop!(Mul, mul, |a, b| Expr::Mul(a, b));

// Scalar offsets
impl Add<f64> for Expr {
    type Output = Expr;

    fn add(self, rhs: f64) -> Expr {
        Expr::Add(Arc::new(self), Arc::new(constant(rhs)))
    }
}

impl Add<f64> for &Expr {
    type Output = Expr;

    fn add(self, rhs: f64) -> Expr {
        Expr::Add(Arc::new(self.clone()), Arc::new(constant(rhs)))
    }
}

impl Sub<f64> for Expr {
    type Output = Expr;

    fn sub(self, rhs: f64) -> Expr {
        Expr::Add(Arc::new(self), Arc::new(constant(-rhs)))
    }
}

impl Sub<f64> for &Expr {
    type Output = Expr;

    fn sub(self, rhs: f64) -> Expr {
        Expr::Add(Arc::new(self.clone()), Arc::new(constant(-rhs)))
    }
}

// Scalar multiplication
impl Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Expr {
        Expr::Mul(Arc::new(constant(rhs)), Arc::new(self))
    }
}

impl Mul<f64> for &Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Expr {
        Expr::Mul(Arc::new(constant(rhs)), Arc::new(self.clone()))
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Arc::new(constant(self)), Arc::new(rhs))
    }
}

impl Mul<&Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: &Expr) -> Expr {
        Expr::Mul(Arc::new(constant(self)), Arc::new(rhs.clone()))
    }
}

// Division by scalar
impl Div<f64> for Expr {
    type Output = Expr;

    fn div(self, rhs: f64) -> Expr {
        Expr::Mul(Arc::new(constant(1.0 / rhs)), Arc::new(self))
    }
}

impl Div<f64> for &Expr {
    type Output = Expr;

    fn div(self, rhs: f64) -> Expr {
        Expr::Mul(Arc::new(constant(1.0 / rhs)), Arc::new(self.clone()))
    }
}

// ============================================================================
// Affine atom functions
// ============================================================================

/// Sum of expressions as a single n-ary node.
///
/// An empty sum is the constant zero; a single-element sum is returned as is.
pub fn sum(exprs: impl IntoIterator<Item = Expr>) -> Expr {
    let mut terms: Vec<Arc<Expr>> = exprs.into_iter().map(Arc::new).collect();
    match terms.len() {
        0 => constant(0.0),
        1 => Arc::unwrap_or_clone(terms.remove(0)),
        _ => Expr::Sum(terms),
    }
}

/// Affine combination: `offset + sum_i(coeffs[i] * exprs[i])`.
///
/// Terms are kept in the given order.
pub fn weighted_sum<'a>(
    offset: f64,
    terms: impl IntoIterator<Item = (f64, &'a Expr)>,
) -> Expr {
    let mut parts = vec![Arc::new(constant(offset))];
    parts.extend(
        terms
            .into_iter()
            .map(|(coeff, expr)| Arc::new(coeff * expr)),
    );
    Expr::Sum(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::variable;

    #[test]
    fn test_sub_is_add_neg() {
        let x = variable();
        let y = variable();
        let d = &x - &y;
        assert!(matches!(d, Expr::Add(_, ref b) if matches!(**b, Expr::Neg(_))));
        assert!(d.is_affine());
    }

    #[test]
    fn test_scalar_mul_and_div() {
        let x = variable();
        let e = &x * 3.0;
        assert!(e.is_affine());
        let e = x / 4.0;
        assert!(matches!(e, Expr::Mul(ref c, _) if c.constant_value() == Some(0.25)));
    }

    #[test]
    fn test_sum_edge_cases() {
        assert_eq!(sum(Vec::new()).constant_value(), Some(0.0));
        let x = variable();
        assert!(sum(vec![x.clone()]).is_variable());
        assert!(matches!(sum(vec![x.clone(), x]), Expr::Sum(ref v) if v.len() == 2));
    }

    #[test]
    fn test_weighted_sum_is_affine() {
        let a = variable();
        let b = variable();
        let e = weighted_sum(1.0, [(2.0, &a), (3.0, &b)]);
        assert!(e.is_affine());
        assert_eq!(e.variables().len(), 2);
    }
}
