//! Linear and quadratic expression representations for canonicalization.
//!
//! After canonicalization, expressions are represented in standard form:
//! - Linear: sum_i(a_i * x_i) + b
//! - Quadratic: sum_ij(p_ij * x_i * x_j) + linear + r

use std::collections::BTreeMap;

use crate::expr::ExprId;

/// A scalar linear expression in standard form: sum_i(a_i * x_i) + b
///
/// Coefficients are kept in an ordered map so that stuffing is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    /// Coefficient for each variable.
    pub coeffs: BTreeMap<ExprId, f64>,
    /// Constant term (offset).
    pub constant: f64,
}

impl LinExpr {
    /// The zero expression.
    pub fn zeros() -> Self {
        LinExpr::default()
    }

    /// Create a linear expression for a single variable (unit coefficient).
    pub fn variable(var_id: ExprId) -> Self {
        let mut coeffs = BTreeMap::new();
        coeffs.insert(var_id, 1.0);
        LinExpr {
            coeffs,
            constant: 0.0,
        }
    }

    /// Create a scalar constant.
    pub fn scalar(value: f64) -> Self {
        LinExpr {
            coeffs: BTreeMap::new(),
            constant: value,
        }
    }

    /// Check if this is a constant (no variables).
    pub fn is_constant(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// If this expression is exactly one variable with unit coefficient and
    /// no offset, return that variable.
    pub fn as_single_variable(&self) -> Option<ExprId> {
        if self.constant != 0.0 || self.coeffs.len() != 1 {
            return None;
        }
        self.coeffs
            .iter()
            .next()
            .filter(|(_, &c)| c == 1.0)
            .map(|(&id, _)| id)
    }

    /// Add `coeff * x_id` in place.
    pub fn add_term(&mut self, var_id: ExprId, coeff: f64) {
        *self.coeffs.entry(var_id).or_insert(0.0) += coeff;
    }

    /// Add another linear expression in place.
    pub fn add_assign(&mut self, other: &LinExpr) {
        for (&var_id, &coeff) in &other.coeffs {
            self.add_term(var_id, coeff);
        }
        self.constant += other.constant;
    }

    /// Add two linear expressions.
    pub fn add(&self, other: &LinExpr) -> LinExpr {
        let mut result = self.clone();
        result.add_assign(other);
        result
    }

    /// Negate a linear expression.
    pub fn neg(&self) -> LinExpr {
        self.scale(-1.0)
    }

    /// Scale by a scalar.
    pub fn scale(&self, scalar: f64) -> LinExpr {
        LinExpr {
            coeffs: self.coeffs.iter().map(|(&k, &v)| (k, v * scalar)).collect(),
            constant: self.constant * scalar,
        }
    }

    /// Get all variable IDs in this expression.
    pub fn variables(&self) -> Vec<ExprId> {
        self.coeffs.keys().copied().collect()
    }
}

/// A scalar quadratic expression: sum_ij(p_ij * x_i * x_j) + q' x + r
///
/// Used for quadratic objectives in QP problems. Keys are stored with
/// `i <= j`; an off-diagonal entry is the full coefficient of `x_i * x_j`.
#[derive(Debug, Clone, Default)]
pub struct QuadExpr {
    /// Quadratic coefficients keyed by ordered variable pair.
    pub quad_coeffs: BTreeMap<(ExprId, ExprId), f64>,
    /// Linear term: q' x (its constant is always zero).
    pub linear: LinExpr,
    /// Constant term: r
    pub constant: f64,
}

impl QuadExpr {
    /// Create a quadratic expression from a linear expression.
    pub fn from_linear(linear: LinExpr) -> Self {
        QuadExpr {
            quad_coeffs: BTreeMap::new(),
            linear: LinExpr {
                coeffs: linear.coeffs,
                constant: 0.0,
            },
            constant: linear.constant,
        }
    }

    /// Create a pure square term: coeff * x^2.
    pub fn square(var_id: ExprId, coeff: f64) -> Self {
        let mut quad_coeffs = BTreeMap::new();
        quad_coeffs.insert((var_id, var_id), coeff);
        QuadExpr {
            quad_coeffs,
            linear: LinExpr::zeros(),
            constant: 0.0,
        }
    }

    /// Check if this is purely linear (no quadratic terms).
    pub fn is_linear(&self) -> bool {
        self.quad_coeffs.is_empty()
    }

    /// Add another quadratic expression in place.
    pub fn add_assign(&mut self, other: &QuadExpr) {
        for (&key, &coeff) in &other.quad_coeffs {
            *self.quad_coeffs.entry(key).or_insert(0.0) += coeff;
        }
        self.linear.add_assign(&other.linear);
        self.constant += other.constant;
    }

    /// Add two quadratic expressions.
    pub fn add(&self, other: &QuadExpr) -> QuadExpr {
        let mut result = self.clone();
        result.add_assign(other);
        result
    }

    /// Scale by a scalar.
    pub fn scale(&self, scalar: f64) -> QuadExpr {
        QuadExpr {
            quad_coeffs: self
                .quad_coeffs
                .iter()
                .map(|(&k, &v)| (k, v * scalar))
                .collect(),
            linear: self.linear.scale(scalar),
            constant: self.constant * scalar,
        }
    }

    /// Get all variable IDs in this expression.
    pub fn variables(&self) -> Vec<ExprId> {
        let mut vars = self.linear.variables();
        for &(v1, v2) in self.quad_coeffs.keys() {
            vars.push(v1);
            vars.push(v2);
        }
        vars.sort();
        vars.dedup();
        vars
    }
}
