//! Command-line argument handling.
//!
//! The binary takes exactly two positional paths. Anything else, or any
//! argument that reads as "help", prints usage and exits with status 1.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::{ReasonerError, Result};

const DEFAULT_PROGRAM: &str = "cvx_reasoner";

/// Solve a weighted hinge-loss problem read from JSON.
#[derive(Parser, Debug, PartialEq)]
#[command(name = "cvx_reasoner", disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Path to a JSON file describing the optimization problem.
    pub input: PathBuf,
    /// Path where the solution will be written.
    pub output: PathBuf,
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
pub enum Invocation {
    /// Print usage and exit 1.
    Usage { program: String },
    Run(Cli),
}

/// `help`, `--help`, `-HELP `, ... all count.
pub fn is_help_arg(arg: &str) -> bool {
    arg.trim().to_lowercase().replace('-', "") == "help"
}

/// Interpret a full argument list, program name first.
pub fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let program = args
        .first()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_PROGRAM.to_string());

    if args
        .iter()
        .skip(1)
        .any(|arg| is_help_arg(&arg.to_string_lossy()))
    {
        return Invocation::Usage { program };
    }

    match Cli::try_parse_from(&args) {
        Ok(cli) => Invocation::Run(cli),
        Err(_) => Invocation::Usage { program },
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "USAGE: {program} <input path> <output path>\n\
         \x20  input path  - the path to a JSON file describing the optimization problem.\n\
         \x20  output path - the path where the solution will be written.\n"
    )
}

impl Cli {
    /// Make both paths absolute and check that the input exists.
    ///
    /// Nothing is created on disk here, so a missing input never leaves an
    /// output directory behind.
    pub fn resolve(&self) -> Result<(PathBuf, PathBuf)> {
        let input = absolute(&self.input)?;
        let output = absolute(&self.output)?;
        if !input.is_file() {
            return Err(ReasonerError::FileNotFound { path: input });
        }
        Ok((input, output))
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| ReasonerError::io(path, e))
}
