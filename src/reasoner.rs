//! The read, build, solve, write pipeline.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::model::{
    build_constraints, build_objective, init_variables, HingeProblem, SolvedValues,
};
use crate::problem::Problem;
use crate::solver::{Settings, SolveStatus};

/// What a run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Distinct decision variables.
    pub variables: usize,
    /// Problem constraints, not counting the box constraints.
    pub constraints: usize,
    pub summands: usize,
    /// Objective value at the solution.
    pub objective: Option<f64>,
    pub status: SolveStatus,
}

/// Solves hinge-loss problems with fixed solver settings.
#[derive(Debug, Clone, Default)]
pub struct Reasoner {
    settings: Settings,
}

impl Reasoner {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Read `input`, solve it and write the solution to `output`.
    pub fn run(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<RunSummary> {
        info!("Reading problem");
        let start = Instant::now();
        let problem = HingeProblem::load(input)?;
        info!("Problem reading complete in {} ms", start.elapsed().as_millis());

        let (values, summary) = self.solve(&problem)?;

        info!("Writing results");
        let start = Instant::now();
        values.write(output)?;
        info!("Result writing complete in {} ms", start.elapsed().as_millis());

        Ok(summary)
    }

    /// Build the convex model for `problem` and solve it.
    pub fn solve(&self, problem: &HingeProblem) -> Result<(SolvedValues, RunSummary)> {
        info!("Initializing problem");
        let start = Instant::now();
        let variables = init_variables(problem);
        let constraints = build_constraints(problem, &variables)?;
        let objective = build_objective(problem, &variables)?;
        let model = Problem::minimize(objective).subject_to(constraints).build();
        debug!(
            variables = variables.len(),
            constraints = problem.constraints.len(),
            summands = problem.objective_summands.len(),
            "model built"
        );
        info!("Problem initialization complete in {} ms", start.elapsed().as_millis());

        info!("Beginning optimization");
        let start = Instant::now();
        let solution = model.solve_with(self.settings.clone())?;
        info!("Optimization complete in {} ms", start.elapsed().as_millis());

        let values = SolvedValues::resolve(&variables, &solution)?;
        let objective = solution
            .primal
            .as_ref()
            .and_then(|primal| model.objective.evaluate(primal))
            .or(solution.value);

        let summary = RunSummary {
            variables: variables.len(),
            constraints: problem.constraints.len(),
            summands: problem.objective_summands.len(),
            objective,
            status: solution.status,
        };
        Ok((values, summary))
    }
}
