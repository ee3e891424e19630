use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

/// Print an SmtTerm as SMT-LIB2 format.
pub fn to_smtlib(term: &SmtTerm) -> String {
    match term {
        SmtTerm::Var(name) => name.clone(),
        SmtTerm::BoolLit(b) => {
            if *b {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        SmtTerm::And(terms) => {
            if terms.is_empty() {
                "true".to_string()
            } else if terms.len() == 1 {
                to_smtlib(&terms[0])
            } else {
                let inner: Vec<String> = terms.iter().map(to_smtlib).collect();
                format!("(and {})", inner.join(" "))
            }
        }
        SmtTerm::Or(terms) => {
            if terms.is_empty() {
                "false".to_string()
            } else if terms.len() == 1 {
                to_smtlib(&terms[0])
            } else {
                let inner: Vec<String> = terms.iter().map(to_smtlib).collect();
                format!("(or {})", inner.join(" "))
            }
        }
        SmtTerm::Not(inner) => format!("(not {})", to_smtlib(inner)),
        SmtTerm::Implies(lhs, rhs) => {
            format!("(=> {} {})", to_smtlib(lhs), to_smtlib(rhs))
        }
    }
}

/// Print a sort as SMT-LIB2 format.
pub fn sort_to_smtlib(sort: &SmtSort) -> &'static str {
    match sort {
        SmtSort::Bool => "Bool",
    }
}

/// Logic announced to text-based solvers and in script dumps.
pub const LOGIC: &str = "QF_UF";

/// Render declarations and one assertion as a standalone SMT-LIB script.
pub fn query_to_smt2_script(declarations: &[(String, SmtSort)], assertion: &SmtTerm) -> String {
    let mut smt = String::new();
    smt.push_str(&format!("(set-logic {LOGIC})\n"));
    for (name, sort) in declarations {
        smt.push_str(&format!(
            "(declare-const {} {})\n",
            name,
            sort_to_smtlib(sort)
        ));
    }
    smt.push_str(&format!("(assert {})\n", to_smtlib(assertion)));
    smt.push_str("(check-sat)\n");
    smt
}
