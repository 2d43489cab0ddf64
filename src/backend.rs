use good_lp::solvers::{ResolutionError, SolutionStatus};
use good_lp::variable;
use good_lp::{
    Expression, ProblemVariables, Solution, SolverModel, Variable, constraint, default_solver,
};
use log::{debug, info, warn};
use std::time::Instant;

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::model::{AssignmentModel, Comparison, LinearConstraint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    /// Solved and proven optimal.
    Optimal,
    /// A satisfying assignment was found but optimality is not proven.
    Feasible,
    /// Proven that no satisfying assignment exists.
    Infeasible,
    /// The budget ran out without an answer either way.
    Unknown,
}

/// What a backend hands back: a status and, when solved, one value per candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOutcome {
    pub status: BackendStatus,
    pub values: Vec<bool>,
}

impl BackendOutcome {
    pub fn without_solution(status: BackendStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
        }
    }
}

/// A 0/1 linear feasibility solver.
///
/// Implementations must be usable from any thread; a fresh solver instance is
/// created for every `search` call.
pub trait SearchBackend {
    fn search(&self, model: &AssignmentModel<'_>) -> Result<BackendOutcome, SolveError>;
}

/// Solves the assignment model with the HiGHS MILP solver through `good_lp`.
#[derive(Debug, Clone, Default)]
pub struct HighsBackend {
    config: SolverConfig,
}

impl HighsBackend {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl SearchBackend for HighsBackend {
    fn search(&self, model: &AssignmentModel<'_>) -> Result<BackendOutcome, SolveError> {
        let start_time = Instant::now();
        let threads = highs_int("threads", self.config.threads)?;
        let random_seed = highs_int("random_seed", self.config.random_seed)?;

        let mut problem = ProblemVariables::new();
        // x_i = 1 if candidate i is scheduled
        let vars: Vec<Variable> =
            problem.add_vector(variable().binary(), model.candidates().len());

        // no soft objective: any feasible schedule is optimal
        let mut highs = problem
            .minimise(Expression::from(0.0))
            .using(default_solver)
            .set_option("threads", threads)
            .set_option("random_seed", random_seed)
            .set_option("time_limit", self.config.time_limit_secs)
            .set_option("log_to_console", self.config.log_to_console);

        for linear in model.constraints() {
            highs.add_constraint(to_good_lp(linear, &vars));
        }
        debug!(
            "HiGHS model has {} binary variables and {} constraints.",
            vars.len(),
            model.constraints().len()
        );

        info!("Starting HiGHS solver...");
        let outcome = match highs.solve() {
            Ok(solution) => BackendOutcome {
                status: classify(Ok(solution.status()))?,
                values: vars.iter().map(|v| solution.value(*v) > 0.9).collect(),
            },
            Err(e) => BackendOutcome::without_solution(classify(Err(e))?),
        };
        info!(
            "HiGHS finished with {:?} in {:.2?}",
            outcome.status,
            start_time.elapsed()
        );
        Ok(outcome)
    }
}

fn highs_int(option: &str, value: u32) -> Result<i32, SolveError> {
    i32::try_from(value).map_err(|_| {
        SolveError::Backend(format!("HiGHS option {option} out of range: {value}"))
    })
}

/// Maps a HiGHS result onto a backend status.
///
/// Only a proof of infeasibility is `Infeasible`, and only a search that ran out
/// of budget with no incumbent is `Unknown`. Everything else that fails is a
/// backend error.
fn classify(
    result: Result<SolutionStatus, ResolutionError>,
) -> Result<BackendStatus, SolveError> {
    match result {
        Ok(SolutionStatus::Optimal) => Ok(BackendStatus::Optimal),
        // stopped at a time or gap limit with an incumbent
        Ok(_) => Ok(BackendStatus::Feasible),
        Err(ResolutionError::Infeasible) => Ok(BackendStatus::Infeasible),
        Err(ResolutionError::Other("NoSolutionFound")) => {
            warn!("HiGHS hit its limit before finding a schedule or a proof");
            Ok(BackendStatus::Unknown)
        }
        Err(e) => Err(SolveError::Backend(format!("HiGHS failed: {e}"))),
    }
}

fn to_good_lp(linear: &LinearConstraint, vars: &[Variable]) -> good_lp::constraint::Constraint {
    let sum: Expression = linear.terms.iter().map(|&i| vars[i]).sum();
    let bound = f64::from(linear.bound);
    match linear.comparison {
        Comparison::Equal => constraint!(sum == bound),
        Comparison::AtMost => constraint!(sum <= bound),
    }
}
