use std::collections::HashMap;

use thiserror::Error;
use z3::SatResult as Z3SatResult;

use crate::solver::{Model, SatResult, SmtSolver};
use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

#[derive(Debug, Error)]
pub enum Z3Error {
    #[error("Z3 error: {0}")]
    Internal(String),
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
}

pub struct Z3Solver {
    solver: z3::Solver,
    bool_vars: HashMap<String, z3::ast::Bool>,
    params: Option<z3::Params>,
}

impl Z3Solver {
    pub fn new() -> Self {
        Self {
            solver: z3::Solver::new(),
            bool_vars: HashMap::new(),
            params: None,
        }
    }

    /// Solver whose checks give up after `timeout_secs` (0 disables).
    pub fn with_timeout_secs(timeout_secs: u64) -> Self {
        if timeout_secs == 0 {
            return Self::new();
        }
        let solver = z3::Solver::new();
        let mut params = z3::Params::new();
        let timeout_ms = u32::try_from(timeout_secs.saturating_mul(1000)).unwrap_or(u32::MAX);
        params.set_u32("timeout", timeout_ms);
        solver.set_params(&params);
        Self {
            solver,
            bool_vars: HashMap::new(),
            params: Some(params),
        }
    }

    fn translate_term(&self, term: &SmtTerm) -> Result<z3::ast::Bool, Z3Error> {
        match term {
            SmtTerm::Var(name) => self
                .bool_vars
                .get(name)
                .cloned()
                .ok_or_else(|| Z3Error::UnknownVariable(name.clone())),
            SmtTerm::BoolLit(b) => Ok(z3::ast::Bool::from_bool(*b)),
            SmtTerm::And(terms) => {
                let bools = terms
                    .iter()
                    .map(|t| self.translate_term(t))
                    .collect::<Result<Vec<_>, _>>()?;
                let refs: Vec<&z3::ast::Bool> = bools.iter().collect();
                Ok(z3::ast::Bool::and(&refs))
            }
            SmtTerm::Or(terms) => {
                let bools = terms
                    .iter()
                    .map(|t| self.translate_term(t))
                    .collect::<Result<Vec<_>, _>>()?;
                let refs: Vec<&z3::ast::Bool> = bools.iter().collect();
                Ok(z3::ast::Bool::or(&refs))
            }
            SmtTerm::Not(inner) => Ok(self.translate_term(inner)?.not()),
            SmtTerm::Implies(lhs, rhs) => {
                let l = self.translate_term(lhs)?;
                let r = self.translate_term(rhs)?;
                Ok(l.implies(&r))
            }
        }
    }

    fn map_result(result: Z3SatResult) -> SatResult {
        match result {
            Z3SatResult::Sat => SatResult::Sat,
            Z3SatResult::Unsat => SatResult::Unsat,
            Z3SatResult::Unknown => SatResult::Unknown("Z3 returned unknown".into()),
        }
    }
}

impl Default for Z3Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl SmtSolver for Z3Solver {
    type Error = Z3Error;

    fn declare_var(&mut self, name: &str, sort: &SmtSort) -> Result<(), Z3Error> {
        match sort {
            SmtSort::Bool => {
                let v = z3::ast::Bool::new_const(name);
                self.bool_vars.insert(name.to_string(), v);
            }
        }
        Ok(())
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), Z3Error> {
        let z3_term = self.translate_term(term)?;
        self.solver.assert(&z3_term);
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, Z3Error> {
        Ok(Self::map_result(self.solver.check()))
    }

    fn check_sat_with_model(
        &mut self,
        var_names: &[&str],
    ) -> Result<(SatResult, Option<Model>), Z3Error> {
        match self.solver.check() {
            Z3SatResult::Sat => {
                let z3_model = self
                    .solver
                    .get_model()
                    .ok_or_else(|| Z3Error::Internal("SAT but no model available".into()))?;
                let mut values = HashMap::new();
                for &name in var_names {
                    let v = self
                        .bool_vars
                        .get(name)
                        .ok_or_else(|| Z3Error::UnknownVariable(name.to_string()))?;
                    if let Some(b) = z3_model
                        .eval::<z3::ast::Bool>(v, true)
                        .and_then(|val| val.as_bool())
                    {
                        values.insert(name.to_string(), b);
                    }
                }
                Ok((SatResult::Sat, Some(Model { values })))
            }
            other => Ok((Self::map_result(other), None)),
        }
    }

    fn reset(&mut self) -> Result<(), Z3Error> {
        self.solver.reset();
        // Z3 may drop per-solver parameters on reset; reapply timeout if configured.
        if let Some(params) = &self.params {
            self.solver.set_params(params);
        }
        self.bool_vars.clear();
        Ok(())
    }
}
