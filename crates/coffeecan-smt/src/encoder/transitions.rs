//! Transition relation and the reachability sweep that drives it.

use std::collections::BTreeSet;

use coffeecan_ir::game::{successors, Configuration, Kind};
use tracing::trace;

use super::variables::PropositionRegistry;
use crate::terms::SmtTerm;

/// Which configurations get transition formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepStrategy {
    /// Only configurations reachable from the initial one.
    #[default]
    Reachable,
    /// Every configuration in `[0, domain]^2` at every step.
    Exhaustive,
}

/// Transition formulas produced by a sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub implications: usize,
    /// Configurations expanded at each step, step 0 first.
    pub expanded_per_step: Vec<usize>,
}

/// Transition out of `config` at step `step`:
/// `(black_x_n & white_y_n) => OR(next configurations at n + 1)`.
///
/// Also returns the next configurations. No rule fires in `(0, 0)`, so the
/// disjunction there is empty and the implication forbids the state.
pub fn next_step(
    registry: &mut PropositionRegistry,
    config: Configuration,
    step: usize,
) -> (SmtTerm, Vec<Configuration>) {
    let black0 = registry.var(Kind::Black, config.black, step);
    let white0 = registry.var(Kind::White, config.white, step);

    let mut next_confs = Vec::new();
    let mut next_points = Vec::new();
    for (_rule, next) in successors(config) {
        next_confs.push(SmtTerm::and(
            Kind::ALL
                .into_iter()
                .map(|kind| registry.var(kind, next.count(kind), step + 1))
                .collect(),
        ));
        next_points.push(next);
    }

    let implication = SmtTerm::and(vec![black0, white0]).implies(SmtTerm::or(next_confs));
    (implication, next_points)
}

/// Conjunction of the transitions for steps `0..=bound`, starting at
/// `initial` and expanding only what `strategy` selects.
///
/// Configurations outside `[0, domain]` are skipped.
pub fn all_transitions(
    registry: &mut PropositionRegistry,
    initial: Configuration,
    domain: u32,
    bound: usize,
    strategy: SweepStrategy,
) -> (SmtTerm, SweepStats) {
    match strategy {
        SweepStrategy::Reachable => reachable_sweep(registry, initial, domain, bound),
        SweepStrategy::Exhaustive => exhaustive_sweep(registry, domain, bound),
    }
}

fn reachable_sweep(
    registry: &mut PropositionRegistry,
    initial: Configuration,
    domain: u32,
    bound: usize,
) -> (SmtTerm, SweepStats) {
    let mut transitions = Vec::new();
    let mut stats = SweepStats::default();
    let mut frontier = BTreeSet::from([initial]);
    let mut step = 0;

    while !frontier.is_empty() && step <= bound {
        let mut next_frontier = BTreeSet::new();
        let mut expanded = 0;
        for config in frontier.into_iter().filter(|c| c.within(domain)) {
            let (implication, next_points) = next_step(registry, config, step);
            transitions.push(implication);
            next_frontier.extend(next_points);
            expanded += 1;
        }
        trace!(step, expanded, "sweep: expanded step");
        stats.expanded_per_step.push(expanded);
        frontier = next_frontier;
        step += 1;
    }

    stats.implications = transitions.len();
    (SmtTerm::and(transitions), stats)
}

fn exhaustive_sweep(
    registry: &mut PropositionRegistry,
    domain: u32,
    bound: usize,
) -> (SmtTerm, SweepStats) {
    let mut transitions = Vec::new();
    let mut stats = SweepStats::default();
    for step in 0..=bound {
        let mut expanded = 0;
        for black in 0..=domain {
            for white in 0..=domain {
                let (implication, _) = next_step(registry, Configuration::new(black, white), step);
                transitions.push(implication);
                expanded += 1;
            }
        }
        stats.expanded_per_step.push(expanded);
    }
    stats.implications = transitions.len();
    (SmtTerm::and(transitions), stats)
}
