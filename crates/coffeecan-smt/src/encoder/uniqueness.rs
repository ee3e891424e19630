//! One value per kind and step.

use coffeecan_ir::game::Kind;

use super::variables::PropositionRegistry;
use crate::terms::SmtTerm;

/// Clauses emitted by [`unique_vals`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniquenessStats {
    pub exclusions: usize,
    pub coverage: usize,
}

/// At step `step`, each kind's count is exactly one value of `[0, domain]`.
///
/// For every `v < v'` emits `bean(k, v, step) => !bean(k, v', step)`, then
/// one disjunction over the whole range per kind.
pub fn unique_val(
    registry: &mut PropositionRegistry,
    domain: u32,
    step: usize,
    stats: &mut UniquenessStats,
) -> SmtTerm {
    let mut clauses = Vec::new();
    for kind in Kind::ALL {
        for v in 0..=domain {
            for v1 in (v + 1)..=domain {
                let lhs = registry.var(kind, v, step);
                let rhs = registry.var(kind, v1, step);
                clauses.push(lhs.implies(rhs.not()));
                stats.exclusions += 1;
            }
        }
    }
    for kind in Kind::ALL {
        let any_value = (0..=domain).map(|v| registry.var(kind, v, step)).collect();
        clauses.push(SmtTerm::or(any_value));
        stats.coverage += 1;
    }
    SmtTerm::and(clauses)
}

/// [`unique_val`] for every step in `[0, bound]`.
pub fn unique_vals(
    registry: &mut PropositionRegistry,
    domain: u32,
    bound: usize,
) -> (SmtTerm, UniquenessStats) {
    let mut stats = UniquenessStats::default();
    let steps = (0..=bound)
        .map(|step| unique_val(registry, domain, step, &mut stats))
        .collect();
    (SmtTerm::and(steps), stats)
}
