//! Matrix stuffing: converts canonicalized expressions to solver format.
//!
//! This module builds the matrices (P, q, A, b) and cone specifications
//! required by Clarabel from the canonicalized problem.

use std::collections::HashMap;

use nalgebra_sparse::CscMatrix;

use crate::canon::{ConeConstraint, LinExpr, QuadExpr};
use crate::error::{ReasonerError, Result};
use crate::expr::ExprId;
use crate::sparse::csc_from_triplets;

/// Cone dimensions for Clarabel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConeDims {
    /// Number of zero cone (equality) constraints.
    pub zero: usize,
    /// Number of nonnegative cone constraints.
    pub nonneg: usize,
    /// Second-order cone dimensions (each entry is the cone dimension).
    pub soc: Vec<usize>,
}

impl ConeDims {
    /// Total number of constraint rows.
    pub fn total(&self) -> usize {
        self.zero + self.nonneg + self.soc.iter().sum::<usize>()
    }
}

/// Mapping from variable IDs to column indices in the optimization variable.
#[derive(Debug, Clone)]
pub struct VariableMap {
    /// Map from variable ID to its column.
    pub id_to_col: HashMap<ExprId, usize>,
    /// Total number of optimization variables.
    pub total_vars: usize,
}

impl VariableMap {
    /// Assign consecutive columns in the order given. Repeated ids keep
    /// their first column.
    pub fn from_vars(vars: &[ExprId]) -> Self {
        let mut id_to_col = HashMap::with_capacity(vars.len());
        for var_id in vars {
            let next = id_to_col.len();
            id_to_col.entry(*var_id).or_insert(next);
        }
        let total_vars = id_to_col.len();
        VariableMap {
            id_to_col,
            total_vars,
        }
    }

    /// Get the column for a variable.
    pub fn get(&self, var_id: ExprId) -> Option<usize> {
        self.id_to_col.get(&var_id).copied()
    }

    fn col(&self, var_id: ExprId) -> Result<usize> {
        self.get(var_id).ok_or_else(|| {
            ReasonerError::InvalidProblem(format!(
                "expression references unregistered variable {}",
                var_id.raw()
            ))
        })
    }
}

/// Stuffed problem ready for Clarabel.
#[derive(Debug)]
pub struct StuffedProblem {
    /// Quadratic cost matrix P (n x n, upper triangle).
    pub p: CscMatrix<f64>,
    /// Linear cost vector q (n).
    pub q: Vec<f64>,
    /// Constraint matrix A (m x n).
    pub a: CscMatrix<f64>,
    /// Constraint vector b (m).
    pub b: Vec<f64>,
    /// Cone dimensions.
    pub cone_dims: ConeDims,
    /// Variable mapping for solution recovery.
    pub var_map: VariableMap,
    /// Constant offset in objective.
    pub objective_offset: f64,
}

/// Build the stuffed problem from canonicalized components.
pub fn stuff_problem(
    objective: &QuadExpr,
    constraints: &[ConeConstraint],
    variables: &[ExprId],
) -> Result<StuffedProblem> {
    let var_map = VariableMap::from_vars(variables);

    let (p, q) = stuff_objective(objective, &var_map)?;
    let (a, b, cone_dims) = stuff_constraints(constraints, &var_map)?;

    Ok(StuffedProblem {
        p,
        q,
        a,
        b,
        cone_dims,
        var_map,
        objective_offset: objective.constant,
    })
}

/// Stuff the objective into P and q.
///
/// Clarabel minimizes (1/2) x' P x + q' x, so a diagonal coefficient c
/// becomes 2c in P. Off-diagonal coefficients are full coefficients of
/// x_i x_j and land unscaled in the upper triangle.
fn stuff_objective(
    objective: &QuadExpr,
    var_map: &VariableMap,
) -> Result<(CscMatrix<f64>, Vec<f64>)> {
    let n = var_map.total_vars;

    let mut q = vec![0.0; n];
    for (&var_id, &coeff) in &objective.linear.coeffs {
        q[var_map.col(var_id)?] += coeff;
    }

    let mut p_rows = Vec::with_capacity(objective.quad_coeffs.len());
    let mut p_cols = Vec::with_capacity(objective.quad_coeffs.len());
    let mut p_vals = Vec::with_capacity(objective.quad_coeffs.len());

    for (&(var_i, var_j), &coeff) in &objective.quad_coeffs {
        let (ci, cj) = (var_map.col(var_i)?, var_map.col(var_j)?);
        let (row, col) = if ci <= cj { (ci, cj) } else { (cj, ci) };
        p_rows.push(row);
        p_cols.push(col);
        p_vals.push(if row == col { 2.0 * coeff } else { coeff });
    }

    let p = csc_from_triplets(n, n, p_rows, p_cols, p_vals);
    Ok((p, q))
}

/// Stuff constraints into A, b, and cone dims.
///
/// Rows are ordered zero cone, nonnegative cone, then one block per SOC,
/// matching the cone list handed to Clarabel.
fn stuff_constraints(
    constraints: &[ConeConstraint],
    var_map: &VariableMap,
) -> Result<(CscMatrix<f64>, Vec<f64>, ConeDims)> {
    let n = var_map.total_vars;

    let mut zeros: Vec<&LinExpr> = Vec::new();
    let mut nonnegs: Vec<&LinExpr> = Vec::new();
    let mut socs: Vec<(&LinExpr, &[LinExpr])> = Vec::new();

    for c in constraints {
        match c {
            ConeConstraint::Zero { a } => zeros.push(a),
            ConeConstraint::NonNeg { a } => nonnegs.push(a),
            ConeConstraint::SOC { t, x } => socs.push((t, x.as_slice())),
        }
    }

    let cone_dims = ConeDims {
        zero: zeros.len(),
        nonneg: nonnegs.len(),
        soc: socs.iter().map(|(_, x)| 1 + x.len()).collect(),
    };
    let total_rows = cone_dims.total();

    let mut rows = RowWriter {
        var_map,
        a_rows: Vec::new(),
        a_cols: Vec::new(),
        a_vals: Vec::new(),
        b: Vec::with_capacity(total_rows),
    };

    // Zero cone: Ax + s = b with s = 0, and we want expr = 0, so A = coeffs
    // and b = -constant.
    for expr in zeros {
        rows.push(expr, false)?;
    }

    // Nonnegative cone: s = b - Ax >= 0 must equal expr, so A = -coeffs and
    // b = constant.
    for expr in nonnegs {
        rows.push(expr, true)?;
    }

    // SOC: s = [t; x] in K_soc, each row negated like the nonnegative cone.
    for (t, x) in socs {
        rows.push(t, true)?;
        for entry in x {
            rows.push(entry, true)?;
        }
    }

    let a = csc_from_triplets(total_rows, n, rows.a_rows, rows.a_cols, rows.a_vals);
    Ok((a, rows.b, cone_dims))
}

/// Accumulates A triplets and b entries one row at a time.
struct RowWriter<'a> {
    var_map: &'a VariableMap,
    a_rows: Vec<usize>,
    a_cols: Vec<usize>,
    a_vals: Vec<f64>,
    b: Vec<f64>,
}

impl RowWriter<'_> {
    fn push(&mut self, expr: &LinExpr, negate: bool) -> Result<()> {
        let row = self.b.len();
        let sign = if negate { -1.0 } else { 1.0 };
        for (&var_id, &coeff) in &expr.coeffs {
            self.a_rows.push(row);
            self.a_cols.push(self.var_map.col(var_id)?);
            self.a_vals.push(coeff * sign);
        }
        self.b.push(-expr.constant * sign);
        Ok(())
    }
}
