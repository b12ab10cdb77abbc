//! Builds modeling-layer variables, constraints and objective from a
//! [`HingeProblem`].

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::problem::HingeProblem;
use super::term::{Term, VariableName};
use crate::atoms::{hinge, sum, weighted_sum};
use crate::constraints::{Constraint, ConstraintExt};
use crate::error::{ReasonerError, Result};
use crate::expr::{named_variable, Expr};

/// The decision variables of a problem, keyed by name in declaration order.
#[derive(Debug, Clone, Default)]
pub struct DecisionVariables {
    vars: IndexMap<VariableName, Expr>,
}

impl DecisionVariables {
    pub fn get(&self, name: &VariableName) -> Option<&Expr> {
        self.vars.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VariableName, &Expr)> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Create one free scalar variable per declared name.
///
/// A repeated name keeps its first position and is only created once.
pub fn init_variables(problem: &HingeProblem) -> DecisionVariables {
    let mut vars = IndexMap::with_capacity(problem.variables.len());
    for name in &problem.variables {
        if vars.contains_key(name) {
            warn!(variable = %name, "duplicate variable declaration ignored");
            continue;
        }
        vars.insert(name.clone(), named_variable(name.as_str()));
    }
    DecisionVariables { vars }
}

/// `constant + sum_i(coefficients[i] * variables[i])` as a single sum node.
pub fn build_local_objective(term: &Term, variables: &DecisionVariables) -> Result<Expr> {
    if term.variables.len() != term.coefficients.len() {
        return Err(ReasonerError::LengthMismatch {
            term: term.to_string(),
            variables: term.variables.len(),
            coefficients: term.coefficients.len(),
        });
    }

    let terms = term
        .entries()
        .map(|(coeff, name)| {
            variables
                .get(name)
                .map(|var| (coeff, var))
                .ok_or_else(|| ReasonerError::UnknownVariable {
                    term: term.to_string(),
                    name: name.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(weighted_sum(term.constant, terms))
}

/// Box constraints `0 <= v <= 1` for every variable, followed by
/// `term <= 0` for every problem constraint.
pub fn build_constraints(
    problem: &HingeProblem,
    variables: &DecisionVariables,
) -> Result<Vec<Constraint>> {
    let mut constraints = Vec::with_capacity(2 * variables.len() + problem.constraints.len());

    for (_, var) in variables.iter() {
        constraints.push(var.ge(0.0));
        constraints.push(var.le(1.0));
    }

    for term in &problem.constraints {
        debug!(constraint = %term, "adding constraint");
        constraints.push(build_local_objective(term, variables)?.le(0.0));
    }

    Ok(constraints)
}

/// `sum_k(weight_k * hinge(term_k))`, where the hinge is squared for
/// summands flagged `squared`. An empty objective is the constant zero.
pub fn build_objective(problem: &HingeProblem, variables: &DecisionVariables) -> Result<Expr> {
    let summands = problem
        .objective_summands
        .iter()
        .enumerate()
        .map(|(index, term)| {
            let weight = term.weight.ok_or(ReasonerError::MissingWeight { index })?;
            debug!(summand = %term, "adding objective summand");
            let local = build_local_objective(term, variables)?;
            Ok(weight * hinge(&local, term.squared))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(sum(summands))
}
