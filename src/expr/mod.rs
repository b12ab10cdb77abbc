//! Expression types and creation utilities.
//!
//! This module provides the core expression types for building optimization problems:
//! - `Expr` - The main expression enum representing all expressions
//! - Variable creation via `variable()` and `VariableBuilder`
//! - Constant creation via `constant()`

pub mod constant;
pub mod expression;
pub mod variable;

// Re-export main types
pub use constant::{constant, zero, IntoConstant};
pub use expression::{Expr, ExprId, VariableData};
pub use variable::{named_variable, variable, VariableBuilder, VariableExt};
