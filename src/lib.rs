//! # cvx-reasoner
//!
//! Solves weighted hinge-loss problems described in JSON.
//!
//! A problem has decision variables in `[0, 1]`, linear constraints
//! `term <= 0`, and an objective made of weighted hinge penalties
//! `weight * max(term, 0)`, optionally squared. The crate builds a convex
//! model from the document with a small disciplined convex programming (DCP)
//! core, solves it with Clarabel, and writes the variable values back as JSON.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cvx_reasoner::prelude::*;
//!
//! let problem = HingeProblem::load("problem.json")?;
//! let (values, summary) = Reasoner::default().solve(&problem)?;
//! values.write("out/solution.json")?;
//! ```
//!
//! The modeling core can also be used directly:
//!
//! ```ignore
//! use cvx_reasoner::prelude::*;
//!
//! let x = variable();
//! let solution = Problem::minimize(hinge(&(&x - 0.5), true))
//!     .subject_to([x.ge(0.0), x.le(1.0)])
//!     .solve()?;
//! ```
//!
//! ## DCP Rules
//!
//! - The objective must be **convex**
//! - **Equality constraints** require **affine** expressions
//! - **Inequality constraints** (`>= 0`) require a **concave** expression
//!
//! ## Architecture
//!
//! - **Expression trees** built using the `Expr` enum with `Arc` sharing
//! - **DCP verification** via curvature and sign tracking
//! - **Canonicalization** transforms to affine + cone constraints
//! - **Native QP** for squared hinges in the objective
//! - **Clarabel solver** for the resulting LP, QP or SOCP

pub mod atoms;
pub mod canon;
pub mod cli;
pub mod config;
pub mod constraints;
pub mod dcp;
pub mod error;
pub mod expr;
pub mod logging;
pub mod model;
pub mod problem;
pub mod reasoner;
pub mod solver;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use cvx_reasoner::prelude::*;
/// ```
pub mod prelude {
    // Expression types
    pub use crate::expr::{
        constant, named_variable, variable, zero, Expr, ExprId, IntoConstant, VariableBuilder,
        VariableExt,
    };

    // Atoms
    pub use crate::atoms::{hinge, pos, square, sum, weighted_sum};

    // Constraints
    pub use crate::constraints::{Constraint, ConstraintExt};

    // DCP
    pub use crate::dcp::{Curvature, Sign};

    // Problem
    pub use crate::problem::{Problem, ProblemBuilder};

    // Solver
    pub use crate::solver::{Settings, Solution, SolveStatus};

    // Hinge-loss problems
    pub use crate::model::{DecisionVariables, HingeProblem, SolvedValues, Term, VariableName};
    pub use crate::reasoner::{Reasoner, RunSummary};

    // Errors
    pub use crate::error::{ReasonerError, Result};
}

// Re-export main types at crate root
pub use error::{ReasonerError, Result};
pub use problem::Problem;
pub use solver::{Solution, SolveStatus};
