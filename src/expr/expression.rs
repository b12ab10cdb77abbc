//! Core expression types for cvx-reasoner.
//!
//! The `Expr` enum represents every scalar expression the modeling layer can
//! express. Expressions form an immutable DAG using `Arc` for sharing, so a
//! decision variable can appear in many terms without being copied.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Unique identifier for expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u64);

impl ExprId {
    /// Generate a new unique ID.
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        ExprId(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ExprId {
    fn default() -> Self {
        Self::new()
    }
}

/// Data for a variable expression.
#[derive(Debug, Clone)]
pub struct VariableData {
    /// Unique identifier.
    pub id: ExprId,
    /// Optional name for display.
    pub name: Option<String>,
    /// Variable is known to be non-negative.
    pub nonneg: bool,
}

/// The core expression type.
///
/// All expressions are scalar. Vector-valued sums are written with the n-ary
/// [`Expr::Sum`] node, which keeps trees shallow for problems with many
/// thousands of terms.
#[derive(Debug, Clone)]
pub enum Expr {
    // ========== Leaf nodes ==========
    /// A decision variable.
    Variable(VariableData),
    /// A constant value.
    Constant(f64),

    // ========== Affine atoms ==========
    /// Addition: a + b
    Add(Arc<Expr>, Arc<Expr>),
    /// Negation: -a
    Neg(Arc<Expr>),
    /// Multiplication: a * b (one side must be constant to stay DCP)
    Mul(Arc<Expr>, Arc<Expr>),
    /// N-ary summation: a_1 + a_2 + ... + a_n
    Sum(Vec<Arc<Expr>>),

    // ========== Nonlinear atoms ==========
    /// Positive part: max(x, 0).
    Pos(Arc<Expr>),
    /// Square: x^2.
    Square(Arc<Expr>),
}

impl Expr {
    /// Get the unique ID if this is a variable.
    pub fn variable_id(&self) -> Option<ExprId> {
        match self {
            Expr::Variable(v) => Some(v.id),
            _ => None,
        }
    }

    /// Check if this expression is a constant.
    pub fn is_constant(&self) -> bool {
        matches!(self, Expr::Constant(_))
    }

    /// Check if this expression is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Expr::Variable(_))
    }

    /// Get the constant value if this is a constant expression.
    pub fn constant_value(&self) -> Option<f64> {
        match self {
            Expr::Constant(c) => Some(*c),
            _ => None,
        }
    }

    /// Collect all variables in this expression.
    pub fn variables(&self) -> Vec<ExprId> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<ExprId>) {
        match self {
            Expr::Variable(v) => vars.push(v.id),
            Expr::Constant(_) => {}
            Expr::Add(a, b) | Expr::Mul(a, b) => {
                a.collect_variables(vars);
                b.collect_variables(vars);
            }
            Expr::Neg(a) | Expr::Pos(a) | Expr::Square(a) => a.collect_variables(vars),
            Expr::Sum(exprs) => {
                for e in exprs {
                    e.collect_variables(vars);
                }
            }
        }
    }

    /// Evaluate the expression at fixed variable values.
    ///
    /// Returns `None` if a variable in the expression has no value.
    pub fn evaluate(&self, values: &HashMap<ExprId, f64>) -> Option<f64> {
        match self {
            Expr::Variable(v) => values.get(&v.id).copied(),
            Expr::Constant(c) => Some(*c),
            Expr::Add(a, b) => Some(a.evaluate(values)? + b.evaluate(values)?),
            Expr::Neg(a) => Some(-a.evaluate(values)?),
            Expr::Mul(a, b) => Some(a.evaluate(values)? * b.evaluate(values)?),
            Expr::Sum(exprs) => exprs
                .iter()
                .try_fold(0.0, |acc, e| Some(acc + e.evaluate(values)?)),
            Expr::Pos(a) => Some(a.evaluate(values)?.max(0.0)),
            Expr::Square(a) => {
                let v = a.evaluate(values)?;
                Some(v * v)
            }
        }
    }
}

// Convenient From implementations for automatic conversion
impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Constant(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Constant(value as f64)
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}
