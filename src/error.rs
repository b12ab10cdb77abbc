//! Error types for cvx-reasoner.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for modeling, solving and problem I/O.
#[derive(Debug, Error)]
pub enum ReasonerError {
    /// Problem is not DCP-compliant.
    #[error("Problem is not DCP: {0}")]
    NotDcp(String),

    /// Solver error.
    #[error("Solver error: {0}")]
    Solver(String),

    /// The constraints admit no feasible point.
    #[error("Problem is infeasible")]
    Infeasible,

    /// The objective is unbounded below on the feasible set.
    #[error("Problem is unbounded")]
    Unbounded,

    /// Numerical error.
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Invalid problem specification.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// A term references a variable that was never declared.
    #[error("term {term} references undeclared variable '{name}'")]
    UnknownVariable { term: String, name: String },

    /// A term's variable and coefficient lists differ in length.
    #[error("term {term} has {variables} variables but {coefficients} coefficients")]
    LengthMismatch {
        term: String,
        variables: usize,
        coefficients: usize,
    },

    /// An objective summand was given without a weight.
    #[error("objective summand {index} has no weight")]
    MissingWeight { index: usize },

    /// The input file does not exist.
    #[error("input path does not exist: [{}]", path.display())]
    FileNotFound { path: PathBuf },

    /// Filesystem failure while reading or writing.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON input or unserializable output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReasonerError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReasonerError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for cvx-reasoner operations.
pub type Result<T> = std::result::Result<T, ReasonerError>;

/// Configuration errors from environment settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
