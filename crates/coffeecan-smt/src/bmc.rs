use std::time::Instant;

use tracing::{info, warn};

use crate::encoder::CoffeeEncoding;
use crate::solver::{Model, SatResult, SmtSolver};

/// Result of one bounded check.
#[derive(Debug)]
pub enum BmcResult {
    /// The formula is satisfiable; `model` assigns every proposition.
    Witness { bound: usize, model: Model },
    /// No run of `bound` steps ends in the goal state.
    NoWitness { bound: usize },
    /// Solver returned unknown.
    Unknown { bound: usize, reason: String },
}

/// Solver-side timing for one check.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveProfile {
    pub declare_assert_ms: u128,
    pub solve_ms: u128,
}

/// Hand `encoding` to `solver` as a single query.
///
/// The solver is reset first, every proposition is declared, the formula
/// is asserted once and the model is read back for every proposition.
pub fn run_bmc_at_bound<S: SmtSolver>(
    solver: &mut S,
    encoding: &CoffeeEncoding,
) -> Result<(BmcResult, SolveProfile), S::Error> {
    let bound = encoding.instance.bound;
    info!(bound, "BMC: checking exact bound");

    solver.reset()?;
    let started = Instant::now();
    for (name, sort) in encoding.declarations() {
        solver.declare_var(&name, &sort)?;
    }
    solver.assert(&encoding.formula)?;
    let mut profile = SolveProfile {
        declare_assert_ms: started.elapsed().as_millis(),
        ..SolveProfile::default()
    };

    let var_refs: Vec<&str> = encoding.registry.names().collect();
    let started = Instant::now();
    let (result, model) = solver.check_sat_with_model(&var_refs)?;
    profile.solve_ms = started.elapsed().as_millis();

    let outcome = match result {
        SatResult::Sat => {
            info!(bound, "BMC: witness found");
            match model {
                Some(model) => BmcResult::Witness { bound, model },
                None => {
                    warn!(bound, "BMC: solver returned SAT without a model");
                    BmcResult::Unknown {
                        bound,
                        reason: "Solver returned SAT without a model".into(),
                    }
                }
            }
        }
        SatResult::Unsat => {
            info!(bound, "BMC: no witness within bound");
            BmcResult::NoWitness { bound }
        }
        SatResult::Unknown(reason) => {
            info!(bound, %reason, "BMC: unknown result");
            BmcResult::Unknown { bound, reason }
        }
    };
    Ok((outcome, profile))
}
