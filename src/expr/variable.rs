//! Variable creation with builder pattern.

use super::expression::{Expr, ExprId, VariableData};

/// Builder for creating variables with various attributes.
#[derive(Default)]
pub struct VariableBuilder {
    name: Option<String>,
    nonneg: bool,
}

impl VariableBuilder {
    /// Create a new scalar variable builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name of the variable.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the variable as non-negative for sign analysis.
    ///
    /// This only affects DCP sign tracking. The bound itself must still be
    /// added as a constraint.
    pub fn nonneg(mut self) -> Self {
        self.nonneg = true;
        self
    }

    /// Build the variable expression.
    pub fn build(self) -> Expr {
        Expr::Variable(VariableData {
            id: ExprId::new(),
            name: self.name,
            nonneg: self.nonneg,
        })
    }
}

/// Create an unnamed scalar variable.
pub fn variable() -> Expr {
    VariableBuilder::new().build()
}

/// Create a named scalar variable.
pub fn named_variable(name: impl Into<String>) -> Expr {
    VariableBuilder::new().name(name).build()
}

/// Extension trait for variable-like operations on Expr.
pub trait VariableExt {
    /// Give a name to this expression (if it's a variable).
    fn named(self, name: impl Into<String>) -> Expr;

    /// Get the variable's name, if it is a named variable.
    fn var_name(&self) -> Option<&str>;
}

impl VariableExt for Expr {
    fn named(self, name: impl Into<String>) -> Expr {
        match self {
            Expr::Variable(mut v) => {
                v.name = Some(name.into());
                Expr::Variable(v)
            }
            other => other,
        }
    }

    fn var_name(&self) -> Option<&str> {
        match self {
            Expr::Variable(v) => v.name.as_deref(),
            _ => None,
        }
    }
}
