/// Propositional term, solver-agnostic.
///
/// Terms are immutable values; builders return fresh trees and never
/// rewrite a term they already handed out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SmtTerm {
    /// Proposition reference by name.
    Var(String),
    /// Boolean literal.
    BoolLit(bool),

    And(Vec<SmtTerm>),
    Or(Vec<SmtTerm>),
    Not(Box<SmtTerm>),
    Implies(Box<SmtTerm>, Box<SmtTerm>),
}

#[allow(clippy::should_implement_trait)]
impl SmtTerm {
    pub fn var(name: impl Into<String>) -> Self {
        SmtTerm::Var(name.into())
    }

    pub fn bool(b: bool) -> Self {
        SmtTerm::BoolLit(b)
    }

    pub fn and(terms: Vec<SmtTerm>) -> Self {
        SmtTerm::And(terms)
    }

    pub fn or(terms: Vec<SmtTerm>) -> Self {
        SmtTerm::Or(terms)
    }

    pub fn not(self) -> Self {
        SmtTerm::Not(Box::new(self))
    }

    pub fn implies(self, other: SmtTerm) -> Self {
        SmtTerm::Implies(Box::new(self), Box::new(other))
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            SmtTerm::Var(_) | SmtTerm::BoolLit(_) => 1,
            SmtTerm::And(terms) | SmtTerm::Or(terms) => {
                1 + terms.iter().map(SmtTerm::size).sum::<usize>()
            }
            SmtTerm::Not(inner) => 1 + inner.size(),
            SmtTerm::Implies(lhs, rhs) => 1 + lhs.size() + rhs.size(),
        }
    }

    /// Evaluate under `assignment`; unassigned propositions are `false`.
    pub fn eval(&self, assignment: &impl Fn(&str) -> bool) -> bool {
        match self {
            SmtTerm::Var(name) => assignment(name),
            SmtTerm::BoolLit(b) => *b,
            SmtTerm::And(terms) => terms.iter().all(|t| t.eval(assignment)),
            SmtTerm::Or(terms) => terms.iter().any(|t| t.eval(assignment)),
            SmtTerm::Not(inner) => !inner.eval(assignment),
            SmtTerm::Implies(lhs, rhs) => !lhs.eval(assignment) || rhs.eval(assignment),
        }
    }
}
