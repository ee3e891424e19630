//! Encode-then-solve pipeline.
//!
//! `decide` validates its arguments, builds the whole formula, hands it
//! to one solver in a single call and turns the model into a checked
//! witness trace.

use std::str::FromStr;
use std::time::Instant;

use coffeecan_ir::game::default_bound;
use coffeecan_smt::backends::smtlib_printer::query_to_smt2_script;
use coffeecan_smt::bmc::{run_bmc_at_bound, BmcResult, SolveProfile};
use coffeecan_smt::encoder::variables::DEFAULT_NAMESPACE;
use coffeecan_smt::encoder::{encode, CoffeeEncoding, EncodeError, Instance, SweepStrategy};
use coffeecan_smt::solver::SmtSolver;
use thiserror::Error;
use tracing::{info, warn};

use crate::counterexample::{extract_trace, validate_trace, WitnessError};
use crate::result::{DecideResult, RunSummary, Verdict};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Solver failure: {0}")]
    SolverFailure(String),
}

impl From<EncodeError> for PipelineError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::InvalidArgument(msg) => PipelineError::InvalidArgument(msg),
        }
    }
}

impl From<WitnessError> for PipelineError {
    fn from(err: WitnessError) -> Self {
        PipelineError::SolverFailure(format!("model is not a valid witness: {err}"))
    }
}

/// Which solver backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverChoice {
    #[default]
    Z3,
    Cvc5,
}

impl SolverChoice {
    pub fn name(self) -> &'static str {
        match self {
            SolverChoice::Z3 => "z3",
            SolverChoice::Cvc5 => "cvc5",
        }
    }
}

impl FromStr for SolverChoice {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "z3" => Ok(SolverChoice::Z3),
            "cvc5" => Ok(SolverChoice::Cvc5),
            other => Err(PipelineError::InvalidArgument(format!(
                "unknown solver `{other}` (expected `z3` or `cvc5`)"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub solver: SolverChoice,
    /// Exact step bound; `None` means `x + y - 1`.
    pub bound: Option<i64>,
    /// Solver timeout in seconds, `0` disables it.
    pub timeout_secs: u64,
    pub namespace: String,
    pub sweep: SweepStrategy,
    /// Write the SMT-LIB2 query here before solving.
    pub dump_smt: Option<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            solver: SolverChoice::Z3,
            bound: None,
            timeout_secs: 300,
            namespace: DEFAULT_NAMESPACE.to_string(),
            sweep: SweepStrategy::Reachable,
            dump_smt: None,
        }
    }
}

/// Decide whether `(x, y)` ends with a single white bean, using the default options.
pub fn decide(x: i64, y: i64) -> Result<DecideResult, PipelineError> {
    decide_with_options(x, y, &PipelineOptions::default())
}

pub fn decide_with_options(
    x: i64,
    y: i64,
    options: &PipelineOptions,
) -> Result<DecideResult, PipelineError> {
    let instance = build_instance(x, y, options.bound)?;
    info!(
        x,
        y,
        bound = instance.bound,
        solver = options.solver.name(),
        "Deciding coffee-can instance"
    );

    let started = Instant::now();
    let encoding = encode(instance, &options.namespace, options.sweep)?;
    let encode_ms = started.elapsed().as_millis();

    if let Some(path) = &options.dump_smt {
        dump_smt_to_file(&encoding, path);
    }

    let (outcome, profile) = solve(&encoding, options)?;
    let verdict = match outcome {
        BmcResult::Witness { model, .. } => {
            let trace = extract_trace(&encoding, &model)?;
            validate_trace(&encoding, &trace)?;
            Verdict::Reachable { trace }
        }
        BmcResult::NoWitness { .. } => Verdict::Unreachable,
        BmcResult::Unknown { reason, .. } => {
            return Err(PipelineError::SolverFailure(format!(
                "solver returned unknown: {reason}"
            )));
        }
    };
    info!(
        verdict = verdict.kind(),
        encode_ms,
        declare_assert_ms = profile.declare_assert_ms,
        solve_ms = profile.solve_ms,
        "Decision complete"
    );

    Ok(DecideResult {
        x: instance.initial.black,
        y: instance.initial.white,
        bound: instance.bound,
        solver: options.solver.name(),
        verdict,
        summary: RunSummary::from_stats(&encoding.stats, encode_ms, &profile),
    })
}

fn build_instance(x: i64, y: i64, bound: Option<i64>) -> Result<Instance, PipelineError> {
    match bound {
        Some(n) => Ok(Instance::new(x, y, n)?),
        None => {
            let validated = Instance::new(x, y, 0)?;
            Ok(Instance {
                bound: default_bound(validated.initial),
                ..validated
            })
        }
    }
}

fn solve(
    encoding: &CoffeeEncoding,
    options: &PipelineOptions,
) -> Result<(BmcResult, SolveProfile), PipelineError> {
    match options.solver {
        SolverChoice::Z3 => {
            use coffeecan_smt::backends::z3_backend::Z3Solver;
            let mut solver = Z3Solver::with_timeout_secs(options.timeout_secs);
            run_with_solver(&mut solver, encoding)
        }
        SolverChoice::Cvc5 => {
            use coffeecan_smt::backends::cvc5_backend::Cvc5Solver;
            let mut solver = Cvc5Solver::with_timeout_secs(options.timeout_secs)
                .map_err(|e| PipelineError::SolverFailure(e.to_string()))?;
            run_with_solver(&mut solver, encoding)
        }
    }
}

fn run_with_solver<S: SmtSolver>(
    solver: &mut S,
    encoding: &CoffeeEncoding,
) -> Result<(BmcResult, SolveProfile), PipelineError> {
    run_bmc_at_bound(solver, encoding).map_err(|e| PipelineError::SolverFailure(e.to_string()))
}

/// Write the query as a standalone SMT-LIB2 script. Failure only warns.
pub fn dump_smt_to_file(encoding: &CoffeeEncoding, path: &str) {
    let smt = query_to_smt2_script(&encoding.declarations(), &encoding.formula);
    if let Err(e) = std::fs::write(path, smt) {
        warn!("could not write SMT dump to {path}: {e}");
    } else {
        info!("SMT dump written to {path}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_choice_parses_names() {
        for choice in [SolverChoice::Z3, SolverChoice::Cvc5] {
            assert_eq!(choice.name().parse::<SolverChoice>().unwrap(), choice);
        }
        assert!(matches!(
            "yices".parse::<SolverChoice>(),
            Err(PipelineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn default_bound_is_total_minus_one() {
        let instance = build_instance(10, 11, None).unwrap();
        assert_eq!(instance.bound, 20);
        let instance = build_instance(1, 0, None).unwrap();
        assert_eq!(instance.bound, 0);
    }

    #[test]
    fn explicit_bound_wins() {
        assert_eq!(build_instance(10, 11, Some(3)).unwrap().bound, 3);
    }

    #[test]
    fn invalid_arguments_are_rejected_before_solving() {
        for (x, y, n) in [(0, 0, None), (-1, 2, None), (1, 1, Some(-1))] {
            assert!(matches!(
                build_instance(x, y, n),
                Err(PipelineError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn witness_errors_become_solver_failures() {
        let err: PipelineError = WitnessError::IllegalMove { step: 2 }.into();
        assert!(matches!(err, PipelineError::SolverFailure(msg) if msg.contains("steps 2 and 3")));
    }

    #[test]
    fn dump_writes_query_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.smt2");
        let instance = Instance::new(1, 1, 1).unwrap();
        let encoding = encode(instance, "cc", SweepStrategy::Reachable).unwrap();
        dump_smt_to_file(&encoding, path.to_str().unwrap());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("(declare-const cc_black_1_0 Bool)"));
        assert!(written.contains("(check-sat)"));
    }
}
