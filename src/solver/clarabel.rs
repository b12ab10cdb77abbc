//! Clarabel solver integration.
//!
//! This module provides the interface to the Clarabel conic solver.

use std::collections::HashMap;

use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use nalgebra::DVector;

use super::stuffing::{ConeDims, StuffedProblem, VariableMap};
use crate::error::{ReasonerError, Result};
use crate::expr::{Expr, ExprId};

/// Solution status from the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// Solved to reduced accuracy.
    OptimalInaccurate,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Maximum iterations reached.
    MaxIterations,
    /// Time limit reached.
    MaxTime,
    /// Numerical difficulties.
    NumericalError,
    /// Unknown status.
    Unknown,
}

impl SolveStatus {
    /// Whether the primal solution can be used.
    pub fn is_solved(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::OptimalInaccurate)
    }
}

impl From<SolverStatus> for SolveStatus {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Solved => SolveStatus::Optimal,
            SolverStatus::AlmostSolved => SolveStatus::OptimalInaccurate,
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                SolveStatus::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                SolveStatus::Unbounded
            }
            SolverStatus::MaxIterations => SolveStatus::MaxIterations,
            SolverStatus::MaxTime => SolveStatus::MaxTime,
            SolverStatus::NumericalError | SolverStatus::InsufficientProgress => {
                SolveStatus::NumericalError
            }
            _ => SolveStatus::Unknown,
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::OptimalInaccurate => "optimal_inaccurate",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::MaxIterations => "max_iterations",
            SolveStatus::MaxTime => "max_time",
            SolveStatus::NumericalError => "numerical_error",
            SolveStatus::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Solver settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Print solver output.
    pub verbose: bool,
    /// Maximum iterations.
    pub max_iter: u32,
    /// Time limit in seconds.
    pub time_limit: f64,
    /// Absolute tolerance.
    pub tol_gap_abs: f64,
    /// Relative tolerance.
    pub tol_gap_rel: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            verbose: false,
            max_iter: 200,
            time_limit: f64::INFINITY,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
        }
    }
}

/// Solution from the solver.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status.
    pub status: SolveStatus,
    /// Optimal value (if solved).
    pub value: Option<f64>,
    /// Primal variable values (if solved).
    pub primal: Option<HashMap<ExprId, f64>>,
    /// Solve time in seconds.
    pub solve_time: f64,
    /// Number of iterations.
    pub iterations: u32,
}

impl Solution {
    /// Get the value of a variable.
    pub fn get_value(&self, var_id: ExprId) -> Option<f64> {
        self.primal.as_ref().and_then(|p| p.get(&var_id).copied())
    }

    /// Get the value for a variable expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is not a variable or the variable
    /// is not in the solution.
    pub fn try_value(&self, var: &Expr) -> Result<f64> {
        let var_id = var.variable_id().ok_or_else(|| {
            ReasonerError::InvalidProblem("Expression is not a variable".into())
        })?;
        self.get_value(var_id)
            .ok_or_else(|| ReasonerError::InvalidProblem("Variable not in solution".into()))
    }
}

/// Solve the stuffed problem using Clarabel.
pub fn solve(problem: &StuffedProblem, settings: &Settings) -> Result<Solution> {
    let p = to_clarabel_csc(&problem.p);
    let a = to_clarabel_csc(&problem.a);
    let cones = to_clarabel_cones(&problem.cone_dims);

    let clarabel_settings = DefaultSettingsBuilder::default()
        .verbose(settings.verbose)
        .max_iter(settings.max_iter)
        .time_limit(settings.time_limit)
        .tol_gap_abs(settings.tol_gap_abs)
        .tol_gap_rel(settings.tol_gap_rel)
        .build()
        .map_err(|e| ReasonerError::Solver(format!("invalid settings: {e}")))?;

    let mut solver = DefaultSolver::new(&p, &problem.q, &a, &problem.b, &cones, clarabel_settings)
        .map_err(|e| ReasonerError::Solver(format!("invalid problem data: {e}")))?;
    solver.solve();

    let status: SolveStatus = solver.solution.status.into();
    let solve_time = solver.solution.solve_time;
    let iterations = solver.info.iterations;

    if !status.is_solved() {
        return Ok(Solution {
            status,
            value: None,
            primal: None,
            solve_time,
            iterations,
        });
    }

    let x = DVector::from_column_slice(&solver.solution.x);
    let value = compute_objective(&x, &problem.p, &problem.q) + problem.objective_offset;

    Ok(Solution {
        status,
        value: Some(value),
        primal: Some(unpack_primal(&x, &problem.var_map)),
        solve_time,
        iterations,
    })
}

/// Convert nalgebra CSC to Clarabel CSC.
fn to_clarabel_csc(m: &nalgebra_sparse::CscMatrix<f64>) -> ClarabelCsc<f64> {
    ClarabelCsc::new(
        m.nrows(),
        m.ncols(),
        m.col_offsets().to_vec(),
        m.row_indices().to_vec(),
        m.values().to_vec(),
    )
}

/// Convert cone dimensions to Clarabel cones.
fn to_clarabel_cones(dims: &ConeDims) -> Vec<SupportedConeT<f64>> {
    let mut cones = Vec::with_capacity(2 + dims.soc.len());

    if dims.zero > 0 {
        cones.push(SupportedConeT::ZeroConeT(dims.zero));
    }

    if dims.nonneg > 0 {
        cones.push(SupportedConeT::NonnegativeConeT(dims.nonneg));
    }

    for &soc_dim in &dims.soc {
        cones.push(SupportedConeT::SecondOrderConeT(soc_dim));
    }

    cones
}

/// Unpack primal solution into variable values.
fn unpack_primal(x: &DVector<f64>, var_map: &VariableMap) -> HashMap<ExprId, f64> {
    var_map
        .id_to_col
        .iter()
        .map(|(&var_id, &col)| (var_id, x[col]))
        .collect()
}

/// Compute objective value: (1/2) x' P x + q' x.
fn compute_objective(x: &DVector<f64>, p: &nalgebra_sparse::CscMatrix<f64>, q: &[f64]) -> f64 {
    let linear = DVector::from_column_slice(q).dot(x);

    let mut quadratic = 0.0;
    for (row, col, val) in p.triplet_iter() {
        if row == col {
            quadratic += 0.5 * *val * x[row] * x[col];
        } else {
            // Upper triangle only, so each off-diagonal pair appears once.
            quadratic += *val * x[row] * x[col];
        }
    }

    linear + quadratic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::csc_from_triplets;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.verbose);
        assert_eq!(settings.max_iter, 200);
        assert!(settings.time_limit.is_infinite());
    }

    #[test]
    fn test_to_clarabel_cones() {
        let dims = ConeDims {
            zero: 2,
            nonneg: 3,
            soc: vec![4],
        };
        let cones = to_clarabel_cones(&dims);
        assert_eq!(cones.len(), 3);
        assert!(to_clarabel_cones(&ConeDims::default()).is_empty());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(SolveStatus::from(SolverStatus::Solved), SolveStatus::Optimal);
        assert_eq!(
            SolveStatus::from(SolverStatus::AlmostSolved),
            SolveStatus::OptimalInaccurate
        );
        assert_eq!(
            SolveStatus::from(SolverStatus::AlmostPrimalInfeasible),
            SolveStatus::Infeasible
        );
        assert_eq!(
            SolveStatus::from(SolverStatus::DualInfeasible),
            SolveStatus::Unbounded
        );
        assert!(SolveStatus::OptimalInaccurate.is_solved());
        assert!(!SolveStatus::MaxTime.is_solved());
    }

    #[test]
    fn test_compute_objective() {
        // P = [[2, 1], [0, 4]] (upper), q = [1, -1], x = [1, 2]
        // 0.5 * (2*1 + 4*4) + 1*1*2 + (1 - 2) = 9 + 2 - 1
        let p = csc_from_triplets(2, 2, vec![0, 0, 1], vec![0, 1, 1], vec![2.0, 1.0, 4.0]);
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let value = compute_objective(&x, &p, &[1.0, -1.0]);
        assert!((value - 10.0).abs() < 1e-12);
    }
}
