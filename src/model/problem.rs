//! The JSON problem document and its loader.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::term::{Term, VariableName};
use crate::error::{ReasonerError, Result};

/// A weighted hinge-loss problem as read from disk.
///
/// ```json
/// {"variables": ["x", "y"],
///  "constraints": [{"constant": -1, "variables": ["x", "y"], "coefficients": [1, 1]}],
///  "objectiveSummands": [{"constant": 0.5, "variables": ["x"], "coefficients": [-1],
///                         "weight": 2, "squared": true}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HingeProblem {
    pub variables: Vec<VariableName>,
    /// Each term is read as `term <= 0`.
    #[serde(default)]
    pub constraints: Vec<Term>,
    #[serde(default)]
    pub objective_summands: Vec<Term>,
}

impl HingeProblem {
    /// Read and validate a problem file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReasonerError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => ReasonerError::io(path, e),
        })?;
        let problem: HingeProblem = serde_json::from_reader(BufReader::new(file))?;
        problem.validate()?;
        Ok(problem)
    }

    /// Parse and validate a problem from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let problem: HingeProblem = serde_json::from_str(json)?;
        problem.validate()?;
        Ok(problem)
    }

    /// Check that every term is well formed and only references declared
    /// variables, and that every objective summand has a finite weight.
    pub fn validate(&self) -> Result<()> {
        let declared: HashSet<&VariableName> = self.variables.iter().collect();

        for term in &self.constraints {
            validate_term(term, &declared)?;
        }

        for (index, term) in self.objective_summands.iter().enumerate() {
            validate_term(term, &declared)?;
            match term.weight {
                None => return Err(ReasonerError::MissingWeight { index }),
                Some(w) if !w.is_finite() => {
                    return Err(ReasonerError::InvalidProblem(format!(
                        "objective summand {index} has non-finite weight {w}"
                    )))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

fn validate_term(term: &Term, declared: &HashSet<&VariableName>) -> Result<()> {
    if term.variables.len() != term.coefficients.len() {
        return Err(ReasonerError::LengthMismatch {
            term: term.to_string(),
            variables: term.variables.len(),
            coefficients: term.coefficients.len(),
        });
    }

    if let Some(name) = term.variables.iter().find(|v| !declared.contains(v)) {
        return Err(ReasonerError::UnknownVariable {
            term: term.to_string(),
            name: name.to_string(),
        });
    }

    if !term.constant.is_finite() || term.coefficients.iter().any(|c| !c.is_finite()) {
        return Err(ReasonerError::InvalidProblem(format!(
            "term {term} has a non-finite constant or coefficient"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r#"{
        "variables": ["x", 2],
        "constraints": [
            {"constant": -1.0, "variables": ["x", 2], "coefficients": [1.0, 1.0], "weight": -1, "squared": false}
        ],
        "objectiveSummands": [
            {"constant": 0.5, "variables": ["x"], "coefficients": [-1.0], "weight": 2.0, "squared": true}
        ]
    }"#;

    #[test]
    fn test_from_json_str() {
        let problem = HingeProblem::from_json_str(SIMPLE).unwrap();
        assert_eq!(problem.variables, vec!["x".into(), VariableName::from(2)]);
        assert_eq!(problem.constraints.len(), 1);
        assert_eq!(problem.objective_summands[0].weight, Some(2.0));
        assert!(problem.objective_summands[0].squared);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let problem = HingeProblem::from_json_str(r#"{"variables": ["a"]}"#).unwrap();
        assert!(problem.constraints.is_empty());
        assert!(problem.objective_summands.is_empty());
    }

    #[test]
    fn test_unknown_variable() {
        let json = r#"{"variables": ["x"], "constraints": [
            {"constant": 0, "variables": ["y"], "coefficients": [1]}]}"#;
        match HingeProblem::from_json_str(json).unwrap_err() {
            ReasonerError::UnknownVariable { name, .. } => assert_eq!(name, "y"),
            other => panic!("Expected UnknownVariable, got {other:?}"),
        }
    }

    #[test]
    fn test_length_mismatch() {
        let json = r#"{"variables": ["x"], "objectiveSummands": [
            {"constant": 0, "variables": ["x"], "coefficients": [1, 2], "weight": 1}]}"#;
        assert!(matches!(
            HingeProblem::from_json_str(json).unwrap_err(),
            ReasonerError::LengthMismatch {
                variables: 1,
                coefficients: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_weight() {
        let json = r#"{"variables": ["x"], "objectiveSummands": [
            {"constant": 0, "variables": ["x"], "coefficients": [1], "weight": 1},
            {"constant": 0, "variables": ["x"], "coefficients": [1]}]}"#;
        assert!(matches!(
            HingeProblem::from_json_str(json).unwrap_err(),
            ReasonerError::MissingWeight { index: 1 }
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            HingeProblem::from_json_str("{\"variables\": [").unwrap_err(),
            ReasonerError::Json(_)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = HingeProblem::load("/nonexistent/dir/problem.json").unwrap_err();
        match err {
            ReasonerError::FileNotFound { path } => {
                assert_eq!(path, Path::new("/nonexistent/dir/problem.json"))
            }
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
    }
}
