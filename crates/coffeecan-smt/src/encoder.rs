//! Bounded-model-checking encoding of the coffee-can game.
//!
//! The formula for `(x, y)` and bound `n` is the conjunction of:
//! - the initial state `(x, y)` at step 0,
//! - the final state `(0, 1)` at step `n`,
//! - the transition relation over every configuration the sweep reaches,
//! - exactly one value per kind at every step in `[0, n]`.

pub mod transitions;
pub mod uniqueness;
pub mod variables;

use coffeecan_ir::game::{Configuration, Kind};
use thiserror::Error;
use tracing::debug;

use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

pub use transitions::{all_transitions, next_step, SweepStats, SweepStrategy};
pub use uniqueness::{unique_val, unique_vals, UniquenessStats};
pub use variables::{Bean, BeanKey, PropositionRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A validated game instance: start configuration and step bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instance {
    pub initial: Configuration,
    pub bound: usize,
}

impl Instance {
    /// Checks `x, y >= 0`, `x + y >= 1` and `n >= 0` before anything is built.
    pub fn new(x: i64, y: i64, n: i64) -> Result<Self, EncodeError> {
        let black = u32::try_from(x)
            .map_err(|_| EncodeError::InvalidArgument(format!("x = {x} is not a bean count")))?;
        let white = u32::try_from(y)
            .map_err(|_| EncodeError::InvalidArgument(format!("y = {y} is not a bean count")))?;
        let initial = Configuration::new(black, white);
        if black.checked_add(white).is_none() {
            return Err(EncodeError::InvalidArgument(format!(
                "x + y = {} overflows the count domain",
                x + y
            )));
        }
        if initial.total() < 1 {
            return Err(EncodeError::InvalidArgument(format!(
                "x + y = {} is < 1",
                initial.total()
            )));
        }
        let bound = usize::try_from(n)
            .map_err(|_| EncodeError::InvalidArgument(format!("n = {n} is < 0")))?;
        Ok(Self { initial, bound })
    }

    /// Largest count value a proposition ranges over.
    pub fn domain(&self) -> u32 {
        self.initial.total()
    }
}

/// Size of one encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingStats {
    pub propositions: usize,
    pub transitions: usize,
    pub expanded_per_step: Vec<usize>,
    pub exclusion_clauses: usize,
    pub coverage_clauses: usize,
    pub term_size: usize,
}

/// The assembled formula together with the registry that names it.
pub struct CoffeeEncoding {
    pub instance: Instance,
    pub formula: SmtTerm,
    pub registry: PropositionRegistry,
    pub stats: EncodingStats,
}

impl CoffeeEncoding {
    /// Variable declarations: every proposition, sort `Bool`.
    pub fn declarations(&self) -> Vec<(String, SmtSort)> {
        self.registry.declarations()
    }
}

/// Conjunction of `bean(kind, value, step)` for each `(kind, value)` pair.
pub fn state_predicate(
    registry: &mut PropositionRegistry,
    counts: &[(Kind, u32)],
    step: usize,
) -> SmtTerm {
    SmtTerm::and(
        counts
            .iter()
            .map(|&(kind, value)| registry.var(kind, value, step))
            .collect(),
    )
}

/// The can holds `(x, y)` at step 0.
pub fn init(registry: &mut PropositionRegistry, x: u32, y: u32) -> SmtTerm {
    state_predicate(registry, &[(Kind::Black, x), (Kind::White, y)], 0)
}

/// The can holds `(x, y)` at step `n`.
pub fn final_state(registry: &mut PropositionRegistry, x: u32, y: u32, n: usize) -> SmtTerm {
    state_predicate(registry, &[(Kind::Black, x), (Kind::White, y)], n)
}

/// Build the reachability formula for `(x, y)` within `n` steps.
///
/// Fails with [`EncodeError::InvalidArgument`] before registering anything
/// when `x + y < 1` or `n < 0`.
pub fn build_formula(
    registry: &mut PropositionRegistry,
    x: i64,
    y: i64,
    n: i64,
) -> Result<SmtTerm, EncodeError> {
    let instance = Instance::new(x, y, n)?;
    let (formula, _) = assemble(registry, instance, SweepStrategy::Reachable);
    Ok(formula)
}

/// Encode `instance` into a fresh registry under `namespace`.
pub fn encode(
    instance: Instance,
    namespace: &str,
    strategy: SweepStrategy,
) -> Result<CoffeeEncoding, EncodeError> {
    let mut registry = PropositionRegistry::new(namespace)?;
    let (formula, mut stats) = assemble(&mut registry, instance, strategy);
    stats.propositions = registry.len();
    stats.term_size = formula.size();
    debug!(
        namespace = registry.namespace(),
        propositions = stats.propositions,
        transitions = stats.transitions,
        exclusions = stats.exclusion_clauses,
        term_size = stats.term_size,
        "encoder: formula constructed"
    );
    Ok(CoffeeEncoding {
        instance,
        formula,
        registry,
        stats,
    })
}

fn assemble(
    registry: &mut PropositionRegistry,
    instance: Instance,
    strategy: SweepStrategy,
) -> (SmtTerm, EncodingStats) {
    let Instance { initial, bound } = instance;
    let domain = instance.domain();
    let goal = Configuration::WHITE_LAST;

    let init_term = init(registry, initial.black, initial.white);
    let final_term = final_state(registry, goal.black, goal.white, bound);
    let (transitions, sweep) = all_transitions(registry, initial, domain, bound, strategy);
    let (unique, uniqueness) = unique_vals(registry, domain, bound);

    let stats = EncodingStats {
        propositions: registry.len(),
        transitions: sweep.implications,
        expanded_per_step: sweep.expanded_per_step,
        exclusion_clauses: uniqueness.exclusions,
        coverage_clauses: uniqueness.coverage,
        term_size: 0,
    };
    let formula = SmtTerm::and(vec![init_term, final_term, transitions, unique]);
    (formula, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffeecan_ir::game::simulate;

    fn satisfied_by_run(encoding: &CoffeeEncoding, run: &[Configuration]) -> bool {
        let registry = &encoding.registry;
        let truths: Vec<&str> = run
            .iter()
            .enumerate()
            .flat_map(|(step, c)| {
                [(Kind::Black, c.black), (Kind::White, c.white)]
                    .into_iter()
                    .filter_map(move |(kind, value)| registry.lookup(kind, value, step))
            })
            .map(|bean| registry.name(bean))
            .collect();
        encoding
            .formula
            .eval(&|name: &str| truths.contains(&name))
    }

    #[test]
    fn instance_rejects_empty_can() {
        let err = Instance::new(0, 0, 3).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidArgument(msg) if msg.contains("< 1")));
    }

    #[test]
    fn instance_rejects_negative_inputs() {
        assert!(Instance::new(-1, 3, 2).is_err());
        assert!(Instance::new(1, -3, 2).is_err());
        assert!(Instance::new(1, 1, -1).is_err());
        assert!(Instance::new(i64::from(u32::MAX), 1, 0).is_err());
    }

    #[test]
    fn build_formula_fails_before_registering() {
        let mut reg = PropositionRegistry::default();
        assert!(build_formula(&mut reg, 0, 0, 0).is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn state_predicates_fix_both_counts() {
        let mut reg = PropositionRegistry::default();
        assert_eq!(
            init(&mut reg, 10, 10),
            SmtTerm::and(vec![
                SmtTerm::var("cc_black_10_0"),
                SmtTerm::var("cc_white_10_0"),
            ])
        );
        assert_eq!(
            final_state(&mut reg, 0, 1, 19),
            SmtTerm::and(vec![
                SmtTerm::var("cc_black_0_19"),
                SmtTerm::var("cc_white_1_19"),
            ])
        );
    }

    #[test]
    fn formula_has_four_conjuncts() {
        let mut reg = PropositionRegistry::default();
        let formula = build_formula(&mut reg, 2, 1, 2).unwrap();
        match formula {
            SmtTerm::And(parts) => assert_eq!(parts.len(), 4),
            other => panic!("expected conjunction, got {other:?}"),
        }
    }

    #[test]
    fn stats_describe_the_encoding() {
        let instance = Instance::new(2, 1, 2).unwrap();
        let encoding = encode(instance, "cc", SweepStrategy::Reachable).unwrap();
        assert_eq!(encoding.stats.expanded_per_step, vec![1, 1, 1]);
        assert_eq!(encoding.stats.transitions, 3);
        // domain 3: 2 kinds * C(4, 2) pairs * 3 steps
        assert_eq!(encoding.stats.exclusion_clauses, 36);
        assert_eq!(encoding.stats.coverage_clauses, 6);
        assert_eq!(encoding.stats.propositions, encoding.registry.len());
        assert_eq!(encoding.declarations().len(), encoding.registry.len());
    }

    #[test]
    fn white_last_run_satisfies_formula() {
        let instance = Instance::new(2, 1, 2).unwrap();
        let run = simulate(instance.initial, 3);
        assert_eq!(run[2], Configuration::WHITE_LAST);
        for strategy in [SweepStrategy::Reachable, SweepStrategy::Exhaustive] {
            let encoding = encode(instance, "cc", strategy).unwrap();
            assert!(satisfied_by_run(&encoding, &run));
        }
    }

    #[test]
    fn black_last_run_violates_formula() {
        let instance = Instance::new(2, 2, 3).unwrap();
        let run = simulate(instance.initial, 4);
        assert_eq!(run[3], Configuration::new(1, 0));
        let encoding = encode(instance, "cc", SweepStrategy::Reachable).unwrap();
        assert!(!satisfied_by_run(&encoding, &run));
    }

    #[test]
    fn encoding_rejects_bad_namespace() {
        let instance = Instance::new(1, 1, 1).unwrap();
        assert!(encode(instance, "not a symbol", SweepStrategy::Reachable).is_err());
    }
}
