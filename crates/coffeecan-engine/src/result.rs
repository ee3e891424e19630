use std::fmt;

use coffeecan_ir::trace::Trace;
use coffeecan_smt::bmc::SolveProfile;
use coffeecan_smt::encoder::EncodingStats;
use serde::Serialize;

/// Outcome of one `decide` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Verdict {
    /// `(0, 1)` is reached at the bound; the trace is the witness.
    Reachable { trace: Trace },
    /// No run of exactly `bound` steps ends in `(0, 1)`.
    Unreachable,
}

impl Verdict {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Verdict::Reachable { .. })
    }

    pub fn trace(&self) -> Option<&Trace> {
        match self {
            Verdict::Reachable { trace } => Some(trace),
            Verdict::Unreachable => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Verdict::Reachable { .. } => "reachable",
            Verdict::Unreachable => "unreachable",
        }
    }
}

/// Encoding size and timings reported alongside the verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub propositions: usize,
    pub transitions: usize,
    pub exclusion_clauses: usize,
    pub coverage_clauses: usize,
    pub term_size: usize,
    pub encode_ms: u128,
    /// Time spent declaring propositions and asserting the formula.
    pub declare_assert_ms: u128,
    pub solve_ms: u128,
}

impl RunSummary {
    pub fn from_stats(stats: &EncodingStats, encode_ms: u128, profile: &SolveProfile) -> Self {
        Self {
            propositions: stats.propositions,
            transitions: stats.transitions,
            exclusion_clauses: stats.exclusion_clauses,
            coverage_clauses: stats.coverage_clauses,
            term_size: stats.term_size,
            encode_ms,
            declare_assert_ms: profile.declare_assert_ms,
            solve_ms: profile.solve_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecideResult {
    pub x: u32,
    pub y: u32,
    pub bound: usize,
    pub solver: &'static str,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub summary: RunSummary,
}

impl DecideResult {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }))
    }
}

impl fmt::Display for DecideResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.verdict {
            Verdict::Reachable { trace } => {
                writeln!(f, "Last bean can be white")?;
                writeln!(
                    f,
                    "  ({}, {}) reaches (0, 1) in {} steps",
                    self.x, self.y, self.bound
                )?;
                write!(f, "{trace}")
            }
            Verdict::Unreachable => {
                writeln!(f, "Last bean cannot be white")?;
                writeln!(
                    f,
                    "  ({}, {}) does not reach (0, 1) in {} steps",
                    self.x, self.y, self.bound
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffeecan_ir::game::{simulate, Configuration};

    fn result(verdict: Verdict) -> DecideResult {
        DecideResult {
            x: 1,
            y: 1,
            bound: 1,
            solver: "z3",
            verdict,
            summary: RunSummary::default(),
        }
    }

    #[test]
    fn reachable_json_carries_trace() {
        let trace = Trace::new(simulate(Configuration::new(1, 1), 1));
        let json = result(Verdict::Reachable { trace }).to_json();
        assert_eq!(json["result"], "reachable");
        assert_eq!(json["bound"], 1);
        assert_eq!(json["trace"]["configurations"][1]["white"], 1);
        assert_eq!(json["summary"]["propositions"], 0);
    }

    #[test]
    fn summary_carries_solver_profile() {
        let stats = EncodingStats {
            propositions: 12,
            transitions: 3,
            ..EncodingStats::default()
        };
        let profile = SolveProfile {
            declare_assert_ms: 4,
            solve_ms: 9,
        };
        let summary = RunSummary::from_stats(&stats, 2, &profile);
        assert_eq!(summary.propositions, 12);
        assert_eq!(summary.encode_ms, 2);
        assert_eq!(summary.declare_assert_ms, 4);
        assert_eq!(summary.solve_ms, 9);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["declare_assert_ms"], 4);
    }

    #[test]
    fn unreachable_json_has_no_trace() {
        let json = result(Verdict::Unreachable).to_json();
        assert_eq!(json["result"], "unreachable");
        assert!(json.get("trace").is_none());
    }

    #[test]
    fn text_headline_matches_verdict() {
        let trace = Trace::new(simulate(Configuration::new(1, 1), 1));
        let text = result(Verdict::Reachable { trace }).to_string();
        assert!(text.starts_with("Last bean can be white"));
        assert!(text.contains("Step 1: (1, 1) -> (0, 1)"));
        let text = result(Verdict::Unreachable).to_string();
        assert!(text.starts_with("Last bean cannot be white"));
    }
}
