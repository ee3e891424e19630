//! Coffee-can game: bean kinds, configurations and the move rules.
//!
//! A can holds black (primary) and white (secondary) beans. Each move
//! removes beans according to the first rule in [`MoveRule::PRIORITY`]
//! that applies to the current configuration. The settled states
//! `(1, 0)` and `(0, 1)` have no legal move and stay put.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Bean colour. `Black` is the primary kind, `White` the secondary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Black,
    White,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Black, Kind::White];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Black => "black",
            Kind::White => "white",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bean kind `{0}` (expected `black` or `white`)")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "black" => Ok(Kind::Black),
            "white" => Ok(Kind::White),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Bean counts at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Configuration {
    pub black: u32,
    pub white: u32,
}

impl Configuration {
    /// The only configuration where the last bean is white.
    pub const WHITE_LAST: Configuration = Configuration { black: 0, white: 1 };

    pub const fn new(black: u32, white: u32) -> Self {
        Self { black, white }
    }

    pub fn count(self, kind: Kind) -> u32 {
        match kind {
            Kind::Black => self.black,
            Kind::White => self.white,
        }
    }

    pub fn total(self) -> u32 {
        self.black + self.white
    }

    /// `true` for `(1, 0)` and `(0, 1)`.
    pub fn is_settled(self) -> bool {
        matches!((self.black, self.white), (1, 0) | (0, 1))
    }

    /// Both counts lie in `[0, domain]`.
    pub fn within(self, domain: u32) -> bool {
        self.black <= domain && self.white <= domain
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.black, self.white)
    }
}

/// One move of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveRule {
    /// Two whites out, one black in.
    TradeWhitePair,
    /// Two blacks out one black back, or one of each out with the white
    /// returned: either way one black fewer.
    DropBlack,
    /// Nothing left to draw; the configuration repeats.
    Settle,
}

impl MoveRule {
    /// Evaluation order. The first rule that applies is the move.
    pub const PRIORITY: [MoveRule; 3] = [
        MoveRule::TradeWhitePair,
        MoveRule::DropBlack,
        MoveRule::Settle,
    ];

    /// Guard of the rule. Guards already exclude configurations claimed by
    /// an earlier rule, so at most one holds for any configuration.
    pub fn applies(self, c: Configuration) -> bool {
        match self {
            MoveRule::TradeWhitePair => c.white >= 2,
            MoveRule::DropBlack => {
                c.white < 2 && (c.black >= 2 || (c.black >= 1 && c.white >= 1))
            }
            MoveRule::Settle => c.is_settled(),
        }
    }

    /// Configuration after the move. Callers check [`MoveRule::applies`] first.
    pub fn apply(self, c: Configuration) -> Configuration {
        match self {
            MoveRule::TradeWhitePair => Configuration::new(c.black + 1, c.white - 2),
            MoveRule::DropBlack => Configuration::new(c.black - 1, c.white),
            MoveRule::Settle => c,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MoveRule::TradeWhitePair => "trade-white-pair",
            MoveRule::DropBlack => "drop-black",
            MoveRule::Settle => "settle",
        }
    }
}

/// The rule that fires in `c`, if any. `(0, 0)` has none.
pub fn select_rule(c: Configuration) -> Option<MoveRule> {
    MoveRule::PRIORITY.into_iter().find(|rule| rule.applies(c))
}

/// Every configuration the game permits right after `c`.
///
/// The rules are exclusive, so this holds at most one element; it is a
/// list so encoders can treat it as a disjunction.
pub fn successors(c: Configuration) -> Vec<(MoveRule, Configuration)> {
    select_rule(c)
        .map(|rule| (rule, rule.apply(c)))
        .into_iter()
        .collect()
}

/// Step bound sufficient to reach a settled state from `initial`:
/// every non-settling move removes exactly one bean.
pub fn default_bound(initial: Configuration) -> usize {
    (initial.total() as usize).saturating_sub(1)
}

/// Play the game from `initial` for `steps` moves.
///
/// Stops early at `(0, 0)`. Used to cross-check solver witnesses.
pub fn simulate(initial: Configuration, steps: usize) -> Vec<Configuration> {
    let mut out = Vec::with_capacity(steps + 1);
    out.push(initial);
    let mut current = initial;
    for _ in 0..steps {
        let Some(rule) = select_rule(current) else {
            break;
        };
        current = rule.apply(current);
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn kind_round_trips_through_its_tag() {
        for kind in Kind::ALL {
            assert_eq!(kind.as_str().parse::<Kind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind_tag_is_rejected() {
        let err = "grey".parse::<Kind>().unwrap_err();
        assert_eq!(err, UnknownKind("grey".into()));
        assert!(err.to_string().contains("grey"));
    }

    #[test]
    fn rule_precedence_follows_priority_order() {
        assert_eq!(
            select_rule(Configuration::new(3, 2)),
            Some(MoveRule::TradeWhitePair)
        );
        assert_eq!(
            select_rule(Configuration::new(1, 1)),
            Some(MoveRule::DropBlack)
        );
        assert_eq!(
            select_rule(Configuration::new(2, 0)),
            Some(MoveRule::DropBlack)
        );
        assert_eq!(select_rule(Configuration::new(1, 0)), Some(MoveRule::Settle));
        assert_eq!(select_rule(Configuration::new(0, 1)), Some(MoveRule::Settle));
    }

    #[test]
    fn count_reads_each_kind() {
        let c = Configuration::new(4, 7);
        assert_eq!(c.count(Kind::Black), 4);
        assert_eq!(c.count(Kind::White), 7);
        assert_eq!(Kind::ALL.map(|kind| c.count(kind)).iter().sum::<u32>(), c.total());
    }

    #[test]
    fn empty_can_has_no_move() {
        assert_eq!(select_rule(Configuration::new(0, 0)), None);
        assert!(successors(Configuration::new(0, 0)).is_empty());
    }

    #[test]
    fn settled_states_are_fixed_points() {
        for c in [Configuration::new(1, 0), Configuration::WHITE_LAST] {
            assert_eq!(successors(c), vec![(MoveRule::Settle, c)]);
        }
    }

    #[test]
    fn default_bound_is_total_minus_one() {
        assert_eq!(default_bound(Configuration::new(10, 10)), 19);
        assert_eq!(default_bound(Configuration::new(1, 0)), 0);
        assert_eq!(default_bound(Configuration::new(0, 0)), 0);
    }

    #[test]
    fn simulation_ends_settled_after_default_bound() {
        let initial = Configuration::new(10, 11);
        let trace = simulate(initial, 25);
        assert_eq!(trace.len(), 26);
        assert_eq!(trace[default_bound(initial)], Configuration::WHITE_LAST);
        assert_eq!(trace[25], Configuration::WHITE_LAST);
        assert_eq!(trace[19], Configuration::new(1, 1));

        let trace = simulate(Configuration::new(10, 10), 19);
        assert_eq!(trace.last().copied(), Some(Configuration::new(1, 0)));
    }

    #[test]
    fn configuration_serializes_as_named_counts() {
        let json = serde_json::to_string(&Configuration::new(2, 3)).unwrap();
        assert_eq!(json, r#"{"black":2,"white":3}"#);
    }

    proptest! {
        #[test]
        fn at_most_one_rule_applies(black in 0u32..40, white in 0u32..40) {
            let c = Configuration::new(black, white);
            let firing: Vec<_> = MoveRule::PRIORITY
                .into_iter()
                .filter(|r| r.applies(c))
                .collect();
            prop_assert!(firing.len() <= 1);
            prop_assert_eq!(successors(c).len(), usize::from(c.total() >= 1));
        }

        #[test]
        fn total_never_increases(black in 0u32..40, white in 0u32..40) {
            let c = Configuration::new(black, white);
            for (rule, next) in successors(c) {
                match rule {
                    MoveRule::Settle => prop_assert_eq!(next.total(), 1),
                    _ => prop_assert_eq!(next.total() + 1, c.total()),
                }
            }
        }

        #[test]
        fn white_parity_is_invariant(black in 0u32..40, white in 0u32..40, steps in 0usize..80) {
            let trace = simulate(Configuration::new(black, white), steps);
            for c in trace {
                prop_assert_eq!(c.white % 2, white % 2);
            }
        }

        #[test]
        fn successors_stay_in_domain(black in 0u32..40, white in 0u32..40) {
            let c = Configuration::new(black, white);
            for (_, next) in successors(c) {
                prop_assert!(next.within(c.total()));
            }
        }
    }
}
