use std::fmt;

use serde::Serialize;

use crate::game::{select_rule, Configuration, MoveRule};

/// Witness trace: one configuration per step, step 0 first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    pub configurations: Vec<Configuration>,
}

impl Trace {
    pub fn new(configurations: Vec<Configuration>) -> Self {
        Self { configurations }
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    pub fn first(&self) -> Option<Configuration> {
        self.configurations.first().copied()
    }

    pub fn last(&self) -> Option<Configuration> {
        self.configurations.last().copied()
    }

    /// Rule taken between consecutive steps, `None` where no rule explains
    /// the step.
    pub fn moves(&self) -> Vec<Option<MoveRule>> {
        self.configurations
            .windows(2)
            .map(|pair| select_rule(pair[0]).filter(|rule| rule.apply(pair[0]) == pair[1]))
            .collect()
    }

    /// Every step follows the game rules.
    pub fn is_legal(&self) -> bool {
        self.moves().iter().all(Option::is_some)
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Witness trace:")?;
        let Some(initial) = self.first() else {
            return writeln!(f, "  (empty)");
        };
        writeln!(f, "  Step 0: {initial}")?;
        for (idx, (pair, rule)) in self
            .configurations
            .windows(2)
            .zip(self.moves())
            .enumerate()
        {
            let label = rule.map_or("??", MoveRule::name);
            writeln!(f, "  Step {}: {} -> {} [{label}]", idx + 1, pair[0], pair[1])?;
        }
        Ok(())
    }
}
