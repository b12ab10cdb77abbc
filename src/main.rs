use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;

use cvx_reasoner::cli::{self, Invocation};
use cvx_reasoner::config::ReasonerConfig;
use cvx_reasoner::logging;
use cvx_reasoner::reasoner::Reasoner;

fn main() -> Result<ExitCode> {
    let cli = match cli::parse_args(std::env::args_os()) {
        Invocation::Run(cli) => cli,
        Invocation::Usage { program } => {
            print!("{}", cli::usage(&program));
            return Ok(ExitCode::from(1));
        }
    };

    let config = ReasonerConfig::from_env().context("invalid configuration")?;
    logging::init(&config.log_filter);

    let (input, output) = cli.resolve()?;
    let summary = Reasoner::new(config.settings)
        .run(&input, &output)
        .with_context(|| format!("failed to solve problem from {}", input.display()))?;

    info!(
        status = %summary.status,
        objective = summary.objective,
        "Wrote solution for {} variables to {}",
        summary.variables,
        output.display()
    );
    Ok(ExitCode::SUCCESS)
}
