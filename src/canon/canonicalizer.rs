//! Expression canonicalization.
//!
//! Canonicalization transforms arbitrary DCP expressions into standard form:
//! - Affine expressions become LinExpr
//! - Squares in additive objective position become QuadExpr (native QP)
//! - Nonlinear atoms elsewhere are reformulated as affine + cone constraints

use super::lin_expr::{LinExpr, QuadExpr};
use crate::error::{ReasonerError, Result};
use crate::expr::{Expr, ExprId};

/// A cone constraint in standard form.
#[derive(Debug, Clone)]
pub enum ConeConstraint {
    /// Zero cone: a = 0 (equality).
    Zero { a: LinExpr },
    /// Nonnegative cone: a >= 0.
    NonNeg { a: LinExpr },
    /// Second-order cone: ||x||_2 <= t.
    /// Represented as [t; x] in K_soc.
    SOC {
        /// The scalar t expression.
        t: LinExpr,
        /// The entries of the x vector.
        x: Vec<LinExpr>,
    },
}

impl ConeConstraint {
    /// Number of rows this constraint occupies in the stacked system.
    pub fn dim(&self) -> usize {
        match self {
            ConeConstraint::Zero { .. } | ConeConstraint::NonNeg { .. } => 1,
            ConeConstraint::SOC { x, .. } => 1 + x.len(),
        }
    }
}

/// Result of canonicalizing an expression.
#[derive(Debug)]
pub struct CanonResult {
    /// The canonicalized expression (affine or quadratic).
    pub expr: CanonExpr,
    /// Additional cone constraints introduced during canonicalization.
    pub constraints: Vec<ConeConstraint>,
    /// Auxiliary variables introduced during canonicalization.
    pub aux_vars: Vec<ExprId>,
}

/// The type of canonicalized expression.
#[derive(Debug)]
pub enum CanonExpr {
    /// Linear expression.
    Linear(LinExpr),
    /// Quadratic expression (for objectives only).
    Quadratic(QuadExpr),
}

impl CanonExpr {
    /// Get as linear expression.
    pub fn into_linear(self) -> Result<LinExpr> {
        match self {
            CanonExpr::Linear(l) => Ok(l),
            CanonExpr::Quadratic(_) => Err(ReasonerError::NotDcp(
                "quadratic term outside of the objective".to_string(),
            )),
        }
    }

    /// Get as quadratic expression, converting linear if needed.
    pub fn into_quadratic(self) -> QuadExpr {
        match self {
            CanonExpr::Linear(l) => QuadExpr::from_linear(l),
            CanonExpr::Quadratic(q) => q,
        }
    }

    fn add(self, other: CanonExpr) -> CanonExpr {
        match (self, other) {
            (CanonExpr::Linear(mut a), CanonExpr::Linear(b)) => {
                a.add_assign(&b);
                CanonExpr::Linear(a)
            }
            (a, b) => {
                let mut q = a.into_quadratic();
                q.add_assign(&b.into_quadratic());
                CanonExpr::Quadratic(q)
            }
        }
    }

    fn scale(self, scalar: f64) -> CanonExpr {
        match self {
            CanonExpr::Linear(l) => CanonExpr::Linear(l.scale(scalar)),
            CanonExpr::Quadratic(q) => CanonExpr::Quadratic(q.scale(scalar)),
        }
    }
}

/// Canonicalize an expression.
///
/// This converts the expression tree into affine form plus cone constraints.
/// For objectives, squares reached through sums and nonnegative scaling are
/// kept as quadratic terms for the solver's native QP support.
pub fn canonicalize(expr: &Expr, for_objective: bool) -> Result<CanonResult> {
    let mut ctx = CanonContext::new();
    let canon_expr = ctx.canonicalize_expr(expr, for_objective)?;
    Ok(CanonResult {
        expr: canon_expr,
        constraints: ctx.constraints,
        aux_vars: ctx.aux_vars,
    })
}

/// Context for canonicalization, tracking auxiliary variables and constraints.
struct CanonContext {
    constraints: Vec<ConeConstraint>,
    aux_vars: Vec<ExprId>,
}

impl CanonContext {
    fn new() -> Self {
        CanonContext {
            constraints: Vec::new(),
            aux_vars: Vec::new(),
        }
    }

    /// Create a new auxiliary variable. Auxiliaries only exist in canonical
    /// form, so they get an id but no `Expr`.
    fn new_aux_var(&mut self) -> (ExprId, LinExpr) {
        let var_id = ExprId::new();
        self.aux_vars.push(var_id);
        (var_id, LinExpr::variable(var_id))
    }

    /// Create a new non-negative auxiliary variable.
    fn new_nonneg_aux_var(&mut self) -> (ExprId, LinExpr) {
        let var_id = ExprId::new();
        self.aux_vars.push(var_id);
        let lin_var = LinExpr::variable(var_id);
        self.constraints
            .push(ConeConstraint::NonNeg { a: lin_var.clone() });
        (var_id, lin_var)
    }

    /// `quad_ok` is true while we are in additive, nonnegatively scaled
    /// position of an objective.
    fn canonicalize_expr(&mut self, expr: &Expr, quad_ok: bool) -> Result<CanonExpr> {
        match expr {
            Expr::Variable(v) => Ok(CanonExpr::Linear(LinExpr::variable(v.id))),
            Expr::Constant(c) => Ok(CanonExpr::Linear(LinExpr::scalar(*c))),

            Expr::Add(a, b) => {
                let ca = self.canonicalize_expr(a, quad_ok)?;
                let cb = self.canonicalize_expr(b, quad_ok)?;
                Ok(ca.add(cb))
            }
            Expr::Sum(exprs) => {
                let mut acc = CanonExpr::Linear(LinExpr::zeros());
                for e in exprs {
                    let ce = self.canonicalize_expr(e, quad_ok)?;
                    acc = acc.add(ce);
                }
                Ok(acc)
            }
            Expr::Neg(a) => {
                let ca = self.canonicalize_linear(a)?;
                Ok(CanonExpr::Linear(ca.neg()))
            }
            Expr::Mul(a, b) => self.canonicalize_mul(a, b, quad_ok),

            Expr::Pos(x) => self.canonicalize_pos(x),
            Expr::Square(x) => self.canonicalize_square(x, quad_ok),
        }
    }

    fn canonicalize_linear(&mut self, expr: &Expr) -> Result<LinExpr> {
        self.canonicalize_expr(expr, false)?.into_linear()
    }

    fn canonicalize_mul(&mut self, a: &Expr, b: &Expr, quad_ok: bool) -> Result<CanonExpr> {
        let (scalar, other) = match (a.constant_value(), b.constant_value()) {
            (Some(c), _) => (c, b),
            (None, Some(c)) => (c, a),
            (None, None) => {
                return Err(ReasonerError::NotDcp(
                    "product of two non-constant expressions".to_string(),
                ))
            }
        };
        let inner = self.canonicalize_expr(other, quad_ok && scalar >= 0.0)?;
        Ok(inner.scale(scalar))
    }

    /// pos(x) -> t with t >= 0, t >= x.
    fn canonicalize_pos(&mut self, x: &Expr) -> Result<CanonExpr> {
        let cx = self.canonicalize_linear(x)?;
        let (_, t) = self.new_nonneg_aux_var();
        self.constraints.push(ConeConstraint::NonNeg {
            a: t.add(&cx.neg()),
        });
        Ok(CanonExpr::Linear(t))
    }

    /// square(x) -> x^2 as a quadratic term in objective position, or an
    /// epigraph variable t with ||(2x, t - 1)|| <= t + 1 (i.e. x^2 <= t).
    fn canonicalize_square(&mut self, x: &Expr, quad_ok: bool) -> Result<CanonExpr> {
        let cx = self.canonicalize_linear(x)?;

        if quad_ok {
            let var_id = match cx.as_single_variable() {
                Some(id) => id,
                None => {
                    let (u_id, u) = self.new_aux_var();
                    self.constraints.push(ConeConstraint::Zero {
                        a: u.add(&cx.neg()),
                    });
                    u_id
                }
            };
            return Ok(CanonExpr::Quadratic(QuadExpr::square(var_id, 1.0)));
        }

        let (_, t) = self.new_nonneg_aux_var();
        self.constraints.push(ConeConstraint::SOC {
            t: t.add(&LinExpr::scalar(1.0)),
            x: vec![cx.scale(2.0), t.add(&LinExpr::scalar(-1.0))],
        });
        Ok(CanonExpr::Linear(t))
    }
}
