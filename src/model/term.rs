//! Linear terms and variable names as they appear in problem files.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Name of a decision variable.
///
/// Problem files may name variables with strings or with integer ids; both
/// are normalized to their string form, which is also the key written to the
/// solution file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VariableName(String);

impl VariableName {
    pub fn new(name: impl Into<String>) -> Self {
        VariableName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariableName {
    fn from(name: &str) -> Self {
        VariableName(name.to_string())
    }
}

impl From<i64> for VariableName {
    fn from(id: i64) -> Self {
        VariableName(id.to_string())
    }
}

impl<'de> Deserialize<'de> for VariableName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => VariableName(s),
            Raw::Signed(i) => VariableName(i.to_string()),
            Raw::Unsigned(u) => VariableName(u.to_string()),
        })
    }
}

/// A linear expression over named variables:
/// `constant + sum_i(coefficients[i] * variables[i])`.
///
/// Objective summands also carry a `weight` and a `squared` flag. Constraints
/// ignore both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub constant: f64,
    pub variables: Vec<VariableName>,
    pub coefficients: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub squared: bool,
}

impl Term {
    /// Pairs of (coefficient, variable name) in file order.
    pub fn entries(&self) -> impl Iterator<Item = (f64, &VariableName)> {
        self.coefficients.iter().copied().zip(self.variables.iter())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(weight) = self.weight {
            write!(f, "{weight} * ( ")?;
        }

        write!(f, "({}", self.constant)?;
        for (coeff, name) in self.entries() {
            if coeff < 0.0 {
                write!(f, " - {} * {name}", -coeff)?;
            } else {
                write!(f, " + {coeff} * {name}")?;
            }
        }
        f.write_str(")")?;

        if self.squared {
            f.write_str(" ^2")?;
        }
        if self.weight.is_some() {
            f.write_str(" )")?;
        }
        Ok(())
    }
}
