//! Proposition registry: the `bean(kind, value, step)` namer.
//!
//! Naming convention: `{namespace}_{kind}_{value}_{step}`, e.g.
//! `cc_black_10_3`. The separators keep names injective.

use std::collections::HashMap;

use coffeecan_ir::game::Kind;

use super::EncodeError;
use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

pub const DEFAULT_NAMESPACE: &str = "cc";

/// Identity of a count proposition: "at `step`, the `kind` count is `value`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BeanKey {
    pub kind: Kind,
    pub value: u32,
    pub step: usize,
}

/// Handle to a registered proposition. Equal keys give equal handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bean(u32);

impl Bean {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owns every proposition of one encoding run.
///
/// Registries are never shared between runs, so two formulas built from
/// different registries cannot alias propositions unless they also share
/// a namespace and are handed to the same solver.
#[derive(Debug, Clone)]
pub struct PropositionRegistry {
    namespace: String,
    index: HashMap<BeanKey, Bean>,
    keys: Vec<BeanKey>,
    names: Vec<String>,
}

impl PropositionRegistry {
    /// Registry whose names start with `namespace`, which must be a plain
    /// SMT-LIB symbol (ASCII letters, digits, `_`, not starting with a digit).
    pub fn new(namespace: &str) -> Result<Self, EncodeError> {
        let valid = namespace
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(EncodeError::InvalidArgument(format!(
                "namespace `{namespace}` is not a plain SMT-LIB symbol"
            )));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            index: HashMap::new(),
            keys: Vec::new(),
            names: Vec::new(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The proposition for `(kind, value, step)`, registering it on first use.
    pub fn bean(&mut self, kind: Kind, value: u32, step: usize) -> Bean {
        let key = BeanKey { kind, value, step };
        if let Some(bean) = self.index.get(&key) {
            return *bean;
        }
        let bean = Bean(self.keys.len() as u32);
        self.names.push(bean_name(&self.namespace, &key));
        self.keys.push(key);
        self.index.insert(key, bean);
        bean
    }

    /// [`Self::bean`] for a textual kind tag (`black` / `white`).
    pub fn bean_tagged(&mut self, tag: &str, value: u32, step: usize) -> Result<Bean, EncodeError> {
        let kind = tag
            .parse::<Kind>()
            .map_err(|e| EncodeError::InvalidArgument(e.to_string()))?;
        Ok(self.bean(kind, value, step))
    }

    /// Term referring to the proposition for `(kind, value, step)`.
    pub fn var(&mut self, kind: Kind, value: u32, step: usize) -> SmtTerm {
        let bean = self.bean(kind, value, step);
        self.term(bean)
    }

    pub fn term(&self, bean: Bean) -> SmtTerm {
        SmtTerm::var(self.name(bean))
    }

    pub fn name(&self, bean: Bean) -> &str {
        &self.names[bean.index()]
    }

    pub fn key(&self, bean: Bean) -> BeanKey {
        self.keys[bean.index()]
    }

    /// Look up without registering.
    pub fn lookup(&self, kind: Kind, value: u32, step: usize) -> Option<Bean> {
        self.index.get(&BeanKey { kind, value, step }).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Declarations for every registered proposition, in registration order.
    pub fn declarations(&self) -> Vec<(String, SmtSort)> {
        self.names
            .iter()
            .map(|name| (name.clone(), SmtSort::Bool))
            .collect()
    }
}

impl Default for PropositionRegistry {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            index: HashMap::new(),
            keys: Vec::new(),
            names: Vec::new(),
        }
    }
}

pub(crate) fn bean_name(namespace: &str, key: &BeanKey) -> String {
    format!("{namespace}_{}_{}_{}", key.kind, key.value, key.step)
}
