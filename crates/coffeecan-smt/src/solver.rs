use std::collections::HashMap;

use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

/// Result of a satisfiability check.
#[derive(Debug, Clone, PartialEq)]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown(String),
}

/// Truth values read back from a SAT result.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub values: HashMap<String, bool>,
}

impl Model {
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    /// `true` only for propositions the model assigns `true`.
    pub fn is_true(&self, name: &str) -> bool {
        self.get_bool(name) == Some(true)
    }
}

/// Abstract solver interface. This is the only seam between the encoder
/// and a concrete engine.
pub trait SmtSolver {
    type Error: std::error::Error;

    /// Declare a new variable.
    fn declare_var(&mut self, name: &str, sort: &SmtSort) -> Result<(), Self::Error>;

    /// Assert a constraint.
    fn assert(&mut self, term: &SmtTerm) -> Result<(), Self::Error>;

    /// Check satisfiability.
    fn check_sat(&mut self) -> Result<SatResult, Self::Error>;

    /// Check satisfiability and read back `var_names` if SAT.
    fn check_sat_with_model(
        &mut self,
        var_names: &[&str],
    ) -> Result<(SatResult, Option<Model>), Self::Error>;

    /// Reset the solver state.
    fn reset(&mut self) -> Result<(), Self::Error>;
}
