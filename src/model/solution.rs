//! Solved variable values and the solution file writer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::builder::DecisionVariables;
use super::term::VariableName;
use crate::error::{ReasonerError, Result};
use crate::solver::Solution;

/// Solved value of every decision variable, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolvedValues {
    solution: IndexMap<VariableName, f64>,
}

impl SolvedValues {
    /// Read the value of each decision variable out of a solver solution.
    pub fn resolve(variables: &DecisionVariables, solution: &Solution) -> Result<Self> {
        let solution = variables
            .iter()
            .map(|(name, var)| {
                let value = solution.try_value(var).map_err(|_| {
                    ReasonerError::InvalidProblem(format!(
                        "solver returned no value for variable '{name}'"
                    ))
                })?;
                Ok((name.clone(), value))
            })
            .collect::<Result<IndexMap<_, _>>>()?;
        Ok(SolvedValues { solution })
    }

    pub fn get(&self, name: &VariableName) -> Option<f64> {
        self.solution.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VariableName, f64)> {
        self.solution.iter().map(|(k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.solution.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solution.is_empty()
    }

    /// Write `{"solution": {name: value, ...}}` to `path`, creating parent
    /// directories and replacing any existing file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ReasonerError::io(parent, e))?;
        }

        let file = File::create(path).map_err(|e| ReasonerError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush().map_err(|e| ReasonerError::io(path, e))?;
        Ok(())
    }
}
