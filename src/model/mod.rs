//! The JSON hinge-loss problem format and its translation into a convex
//! model.
//!
//! - [`HingeProblem`] is the input document
//! - [`builder`] turns it into variables, constraints and an objective
//! - [`SolvedValues`] is the output document

pub mod builder;
pub mod problem;
pub mod solution;
pub mod term;

pub use builder::{
    build_constraints, build_local_objective, build_objective, init_variables, DecisionVariables,
};
pub use problem::HingeProblem;
pub use solution::SolvedValues;
pub use term::{Term, VariableName};
