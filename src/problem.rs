//! Problem definition and solving API.
//!
//! A `Problem` is a convex objective to minimize plus a set of constraints.
//!
//! Use the builder pattern to construct problems:
//! ```ignore
//! let solution = Problem::minimize(objective)
//!     .subject_to([constraint1, constraint2])
//!     .solve()?;
//! ```

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::canon::{canonicalize, ConeConstraint, LinExpr};
use crate::constraints::Constraint;
use crate::error::{ReasonerError, Result};
use crate::expr::{Expr, ExprId};
use crate::solver::{solve, stuff_problem, Settings, Solution, SolveStatus};

/// Slack allowed when checking constant constraints without the solver.
const CONSTANT_FEASIBILITY_TOL: f64 = 1e-9;

/// An optimization problem.
#[derive(Debug, Clone)]
pub struct Problem {
    /// The expression to minimize.
    pub objective: Expr,
    /// The constraints.
    pub constraints: Vec<Constraint>,
}

impl Problem {
    /// Create a minimization problem.
    pub fn minimize(expr: Expr) -> ProblemBuilder {
        ProblemBuilder {
            objective: expr,
            constraints: Vec::new(),
        }
    }

    /// Check if this problem is DCP-compliant.
    ///
    /// A problem is DCP if the objective is convex and all constraints are DCP.
    pub fn is_dcp(&self) -> bool {
        self.objective.is_convex() && self.constraints.iter().all(|c| c.is_dcp())
    }

    /// Get all variable IDs in this problem, in creation order.
    pub fn variables(&self) -> Vec<ExprId> {
        let mut vars = self.objective.variables();
        for c in &self.constraints {
            vars.extend(c.variables());
        }
        vars.sort();
        vars.dedup();
        vars
    }

    /// Solve the problem with default settings.
    pub fn solve(&self) -> Result<Solution> {
        self.solve_with(Settings::default())
    }

    /// Solve the problem with custom settings.
    pub fn solve_with(&self, settings: Settings) -> Result<Solution> {
        if !self.is_dcp() {
            return Err(ReasonerError::NotDcp(self.dcp_violation_message()));
        }

        let obj_canon = canonicalize(&self.objective, true)?;
        let obj_quad = obj_canon.expr.into_quadratic();

        let mut all_vars = self.variables();
        all_vars.extend(obj_canon.aux_vars);

        let mut cone_constraints: Vec<ConeConstraint> = obj_canon.constraints;
        for constraint in &self.constraints {
            let (canon, aux_vars) = canonicalize_constraint(constraint)?;
            cone_constraints.extend(canon);
            all_vars.extend(aux_vars);
        }

        debug!(
            variables = all_vars.len(),
            cone_constraints = cone_constraints.len(),
            quadratic_terms = obj_quad.quad_coeffs.len(),
            "canonicalized problem"
        );

        if all_vars.is_empty() {
            return solve_constant(obj_quad.constant, &cone_constraints);
        }

        let stuffed = stuff_problem(&obj_quad, &cone_constraints, &all_vars)?;
        let solution = solve(&stuffed, &settings)?;
        debug!(
            status = %solution.status,
            iterations = solution.iterations,
            solve_time = solution.solve_time,
            "solver finished"
        );

        match solution.status {
            SolveStatus::Optimal => Ok(solution),
            SolveStatus::OptimalInaccurate => {
                warn!("solver reached reduced accuracy only; using the inaccurate solution");
                Ok(solution)
            }
            SolveStatus::Infeasible => Err(ReasonerError::Infeasible),
            SolveStatus::Unbounded => Err(ReasonerError::Unbounded),
            SolveStatus::MaxIterations => {
                Err(ReasonerError::Solver("Maximum iterations reached".into()))
            }
            SolveStatus::MaxTime => Err(ReasonerError::Solver("Time limit reached".into())),
            SolveStatus::NumericalError => Err(ReasonerError::Numerical(
                "Solver encountered numerical difficulties".into(),
            )),
            SolveStatus::Unknown => Err(ReasonerError::Solver("Unknown solver status".into())),
        }
    }

    /// Get a message describing why the problem is not DCP.
    fn dcp_violation_message(&self) -> String {
        let mut violations = Vec::new();

        if !self.objective.is_convex() {
            violations.push(format!(
                "Objective has curvature {:?} but must be convex for minimization",
                self.objective.curvature()
            ));
        }

        for (i, c) in self.constraints.iter().enumerate() {
            if !c.is_dcp() {
                violations.push(format!("Constraint {} is not DCP", i));
            }
        }

        if violations.is_empty() {
            "Unknown DCP violation".into()
        } else {
            violations.join("; ")
        }
    }
}

/// Builder for constructing problems.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    objective: Expr,
    constraints: Vec<Constraint>,
}

impl ProblemBuilder {
    /// Add constraints to the problem.
    pub fn subject_to(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Add a single constraint.
    pub fn constraint(mut self, c: Constraint) -> Self {
        self.constraints.push(c);
        self
    }

    /// Build the problem.
    pub fn build(self) -> Problem {
        Problem {
            objective: self.objective,
            constraints: self.constraints,
        }
    }

    /// Build and solve the problem with default settings.
    pub fn solve(self) -> Result<Solution> {
        self.build().solve()
    }

    /// Build and solve the problem with custom settings.
    pub fn solve_with(self, settings: Settings) -> Result<Solution> {
        self.build().solve_with(settings)
    }
}

/// Canonicalize a user constraint into cone constraints and the auxiliary
/// variables they introduce.
fn canonicalize_constraint(constraint: &Constraint) -> Result<(Vec<ConeConstraint>, Vec<ExprId>)> {
    let canon = canonicalize(constraint.expr(), false)?;
    let lin = canon.expr.into_linear()?;
    let head = match constraint {
        Constraint::Zero(_) => ConeConstraint::Zero { a: lin },
        Constraint::NonNeg(_) => ConeConstraint::NonNeg { a: lin },
    };
    let mut result = Vec::with_capacity(1 + canon.constraints.len());
    result.push(head);
    result.extend(canon.constraints);
    Ok((result, canon.aux_vars))
}

/// Resolve a problem without any variables: every constraint is a constant.
fn solve_constant(objective: f64, constraints: &[ConeConstraint]) -> Result<Solution> {
    let is_const = |a: &LinExpr| a.is_constant();
    let feasible = constraints.iter().all(|c| match c {
        ConeConstraint::Zero { a } => is_const(a) && a.constant.abs() <= CONSTANT_FEASIBILITY_TOL,
        ConeConstraint::NonNeg { a } => is_const(a) && a.constant >= -CONSTANT_FEASIBILITY_TOL,
        ConeConstraint::SOC { t, x } => {
            is_const(t)
                && x.iter().all(is_const)
                && x.iter().map(|e| e.constant * e.constant).sum::<f64>().sqrt()
                    <= t.constant + CONSTANT_FEASIBILITY_TOL
        }
    });
    if !feasible {
        return Err(ReasonerError::Infeasible);
    }
    Ok(Solution {
        status: SolveStatus::Optimal,
        value: Some(objective),
        primal: Some(HashMap::new()),
        solve_time: 0.0,
        iterations: 0,
    })
}
