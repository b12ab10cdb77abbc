//! Runtime configuration from environment variables.

use std::str::FromStr;

use crate::error::ConfigError;
use crate::solver::Settings;

pub const ENV_LOG: &str = "CVX_REASONER_LOG";
pub const ENV_VERBOSE: &str = "CVX_REASONER_VERBOSE";
pub const ENV_MAX_ITER: &str = "CVX_REASONER_MAX_ITER";
pub const ENV_TIME_LIMIT: &str = "CVX_REASONER_TIME_LIMIT";
pub const ENV_TOL_GAP_ABS: &str = "CVX_REASONER_TOL_GAP_ABS";
pub const ENV_TOL_GAP_REL: &str = "CVX_REASONER_TOL_GAP_REL";

/// Logging and solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasonerConfig {
    /// Tracing filter directive. `RUST_LOG` takes precedence at init.
    pub log_filter: String,
    pub settings: Settings,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            settings: Settings::default(),
        }
    }
}

impl ReasonerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(filter) = get(ENV_LOG) {
            config.log_filter = filter;
        }
        if let Some(raw) = get(ENV_VERBOSE) {
            config.settings.verbose = parse_bool(ENV_VERBOSE, &raw)?;
        }
        if let Some(raw) = get(ENV_MAX_ITER) {
            config.settings.max_iter = parse_number(ENV_MAX_ITER, &raw)?;
        }
        if let Some(raw) = get(ENV_TIME_LIMIT) {
            config.settings.time_limit = parse_positive(ENV_TIME_LIMIT, &raw, true)?;
        }
        if let Some(raw) = get(ENV_TOL_GAP_ABS) {
            config.settings.tol_gap_abs = parse_positive(ENV_TOL_GAP_ABS, &raw, false)?;
        }
        if let Some(raw) = get(ENV_TOL_GAP_REL) {
            config.settings.tol_gap_rel = parse_positive(ENV_TOL_GAP_REL, &raw, false)?;
        }

        Ok(config)
    }
}

fn parse_bool(field: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a boolean, got '{raw}'"),
        }),
    }
}

fn parse_number<T>(field: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| ConfigError::InvalidValue {
        field,
        reason: format!("'{raw}': {e}"),
    })
}

fn parse_positive(field: &'static str, raw: &str, allow_inf: bool) -> Result<f64, ConfigError> {
    let value: f64 = parse_number(field, raw)?;
    let in_range = value > 0.0 && (value.is_finite() || (allow_inf && value == f64::INFINITY));
    if !in_range {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be positive, got '{raw}'"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ReasonerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ReasonerConfig::default());
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.settings.max_iter, 200);
    }

    #[test]
    fn test_overrides() {
        let config = ReasonerConfig::from_lookup(lookup(&[
            (ENV_LOG, "debug"),
            (ENV_VERBOSE, "TRUE"),
            (ENV_MAX_ITER, "500"),
            (ENV_TIME_LIMIT, "12.5"),
            (ENV_TOL_GAP_ABS, "1e-6"),
            (ENV_TOL_GAP_REL, " 1e-5 "),
        ]))
        .unwrap();
        assert_eq!(config.log_filter, "debug");
        assert!(config.settings.verbose);
        assert_eq!(config.settings.max_iter, 500);
        assert_eq!(config.settings.time_limit, 12.5);
        assert_eq!(config.settings.tol_gap_abs, 1e-6);
        assert_eq!(config.settings.tol_gap_rel, 1e-5);
    }

    #[test]
    fn test_infinite_time_limit() {
        let config = ReasonerConfig::from_lookup(lookup(&[(ENV_TIME_LIMIT, "inf")])).unwrap();
        assert!(config.settings.time_limit.is_infinite());
    }

    #[test]
    fn test_empty_value_keeps_default() {
        let config = ReasonerConfig::from_lookup(lookup(&[(ENV_MAX_ITER, "  ")])).unwrap();
        assert_eq!(config.settings.max_iter, 200);
    }

    #[test]
    fn test_invalid_values() {
        let cases = [
            (ENV_VERBOSE, "maybe"),
            (ENV_MAX_ITER, "-3"),
            (ENV_TIME_LIMIT, "0"),
            (ENV_TOL_GAP_ABS, "inf"),
            (ENV_TOL_GAP_REL, "abc"),
        ];
        for (key, value) in cases {
            match ReasonerConfig::from_lookup(lookup(&[(key, value)])) {
                Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, key),
                other => panic!("Expected InvalidValue for {key}={value}, got {other:?}"),
            }
        }
    }
}
