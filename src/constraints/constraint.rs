//! Constraint types for optimization problems.
//!
//! Constraints map to cone constraints in the solver:
//! - Zero: expr == 0 (zero cone / equality)
//! - NonNeg: expr >= 0 (nonnegative orthant)

use std::sync::Arc;

use crate::expr::{constant, Expr, ExprId};

/// A constraint in an optimization problem.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Equality constraint: expr == 0.
    Zero(Arc<Expr>),

    /// Inequality constraint: expr >= 0.
    NonNeg(Arc<Expr>),
}

impl Constraint {
    /// Create an equality constraint: lhs == rhs.
    pub fn eq(lhs: Expr, rhs: Expr) -> Self {
        Constraint::Zero(Arc::new(difference(lhs, rhs)))
    }

    /// Create an inequality constraint: lhs <= rhs.
    pub fn leq(lhs: Expr, rhs: Expr) -> Self {
        Constraint::NonNeg(Arc::new(difference(rhs, lhs)))
    }

    /// Create an inequality constraint: lhs >= rhs.
    pub fn geq(lhs: Expr, rhs: Expr) -> Self {
        Constraint::NonNeg(Arc::new(difference(lhs, rhs)))
    }

    /// Check if this constraint is DCP-compliant.
    ///
    /// - Zero: expression must be affine
    /// - NonNeg: expression must be concave (concave >= 0)
    pub fn is_dcp(&self) -> bool {
        match self {
            Constraint::Zero(expr) => expr.is_affine(),
            Constraint::NonNeg(expr) => expr.is_concave(),
        }
    }

    /// The constrained expression.
    pub fn expr(&self) -> &Expr {
        match self {
            Constraint::Zero(e) | Constraint::NonNeg(e) => e.as_ref(),
        }
    }

    /// Get all variable IDs in this constraint.
    pub fn variables(&self) -> Vec<ExprId> {
        self.expr().variables()
    }
}

/// `a - b`, folding away a literal zero on the right.
fn difference(a: Expr, b: Expr) -> Expr {
    if b.constant_value() == Some(0.0) {
        a
    } else {
        Expr::Add(Arc::new(a), Arc::new(Expr::Neg(Arc::new(b))))
    }
}

/// Extension trait for creating constraints from expressions.
pub trait ConstraintExt {
    /// Create equality constraint: self == rhs.
    fn equals(&self, rhs: &Expr) -> Constraint;

    /// Create inequality constraint: self <= rhs.
    fn leq(&self, rhs: &Expr) -> Constraint;

    /// Create inequality constraint: self >= rhs.
    fn geq(&self, rhs: &Expr) -> Constraint;

    /// Create inequality constraint: self <= value.
    fn le(&self, value: f64) -> Constraint;

    /// Create inequality constraint: self >= value.
    fn ge(&self, value: f64) -> Constraint;
}

impl ConstraintExt for Expr {
    fn equals(&self, rhs: &Expr) -> Constraint {
        Constraint::eq(self.clone(), rhs.clone())
    }

    fn leq(&self, rhs: &Expr) -> Constraint {
        Constraint::leq(self.clone(), rhs.clone())
    }

    fn geq(&self, rhs: &Expr) -> Constraint {
        Constraint::geq(self.clone(), rhs.clone())
    }

    fn le(&self, value: f64) -> Constraint {
        Constraint::leq(self.clone(), constant(value))
    }

    fn ge(&self, value: f64) -> Constraint {
        Constraint::geq(self.clone(), constant(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::pos;
    use crate::expr::variable;

    #[test]
    fn test_equality_constraint() {
        let x = variable();
        let constr = x.equals(&constant(1.0));
        assert!(constr.is_dcp());
        assert!(matches!(constr, Constraint::Zero(_)));
    }

    #[test]
    fn test_inequality_constraint() {
        let x = variable();
        let constr = x.ge(0.0);
        assert!(constr.is_dcp());
        // x >= 0 keeps x itself as the nonnegative expression
        match constr {
            Constraint::NonNeg(e) => assert!(e.is_variable()),
            other => panic!("Expected NonNeg, got {other:?}"),
        }
    }

    #[test]
    fn test_upper_bound_constraint() {
        let x = variable();
        let constr = x.le(1.0);
        assert!(constr.is_dcp());
        assert_eq!(constr.variables(), vec![x.variable_id().unwrap()]);
    }

    #[test]
    fn test_non_dcp_constraint() {
        // pos(x) >= 1 is convex >= constant, not DCP
        let x = variable();
        assert!(!pos(&x).ge(1.0).is_dcp());
        // pos(x) <= 1 is fine
        assert!(pos(&x).le(1.0).is_dcp());
    }
}
