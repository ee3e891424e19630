//! cvc5 backend.
//!
//! Each encoding is solved by a single query, so the backend buffers the
//! declarations and the assertion into one SMT-LIB2 script and runs cvc5
//! once per check. The script ends with a single `get-value` over every
//! requested proposition and the whole reply is parsed as s-expressions.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::backends::smtlib_printer::{sort_to_smtlib, to_smtlib, LOGIC};
use crate::solver::{Model, SatResult, SmtSolver};
use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

#[derive(Debug, Error)]
pub enum Cvc5Error {
    #[error("cvc5 I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cvc5 not found: {0}")]
    NotFound(String),
    #[error("cvc5 error: {0}")]
    SolverError(String),
    #[error("malformed cvc5 reply: {0}")]
    Reply(String),
}

/// cvc5 run as a batch subprocess over one SMT-LIB2 script per check.
pub struct Cvc5Solver {
    command: String,
    timeout_ms: Option<u64>,
    script: String,
    declared: HashSet<String>,
}

impl Cvc5Solver {
    pub fn new() -> Result<Self, Cvc5Error> {
        Self::with_command_and_timeout("cvc5", None)
    }

    pub fn with_timeout_secs(timeout_secs: u64) -> Result<Self, Cvc5Error> {
        let timeout_ms = (timeout_secs > 0).then(|| timeout_secs.saturating_mul(1000));
        Self::with_command_and_timeout("cvc5", timeout_ms)
    }

    /// Checks that `cmd --version` runs before accepting any query.
    pub fn with_command_and_timeout(cmd: &str, timeout_ms: Option<u64>) -> Result<Self, Cvc5Error> {
        let status = Command::new(cmd)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Cvc5Error::NotFound(format!("{cmd}: {e}")))?;
        if !status.success() {
            return Err(Cvc5Error::NotFound(format!(
                "{cmd} --version exited with {status}"
            )));
        }
        Ok(Self {
            command: cmd.to_string(),
            timeout_ms,
            script: format!("(set-logic {LOGIC})\n"),
            declared: HashSet::new(),
        })
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--lang".to_string(),
            "smt2".to_string(),
            "--produce-models".to_string(),
        ];
        if let Some(ms) = self.timeout_ms {
            args.push(format!("--tlimit={ms}"));
        }
        args
    }

    /// Run the buffered script followed by `tail` and return cvc5's stdout.
    fn run(&self, tail: &str) -> Result<String, Cvc5Error> {
        debug!(
            bytes = self.script.len() + tail.len(),
            declared = self.declared.len(),
            "cvc5: running batch query"
        );
        let mut child = Command::new(&self.command)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Cvc5Error::NotFound(format!("{}: {e}", self.command)))?;
        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| Cvc5Error::SolverError("failed to capture cvc5 stdin".into()))?;
            stdin.write_all(self.script.as_bytes())?;
            stdin.write_all(tail.as_bytes())?;
        }
        let output = child.wait_with_output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.trim().is_empty() {
            return Err(Cvc5Error::SolverError(format!(
                "no output ({}). stderr: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(stdout)
    }
}

impl SmtSolver for Cvc5Solver {
    type Error = Cvc5Error;

    fn declare_var(&mut self, name: &str, sort: &SmtSort) -> Result<(), Cvc5Error> {
        if self.declared.insert(name.to_string()) {
            self.script.push_str(&format!(
                "(declare-const {name} {})\n",
                sort_to_smtlib(sort)
            ));
        }
        Ok(())
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), Cvc5Error> {
        self.script.push_str(&format!("(assert {})\n", to_smtlib(term)));
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, Cvc5Error> {
        let reply = parse_sexps(&self.run("(check-sat)\n(exit)\n")?)?;
        sat_status(&reply)
    }

    fn check_sat_with_model(
        &mut self,
        var_names: &[&str],
    ) -> Result<(SatResult, Option<Model>), Cvc5Error> {
        if let Some(name) = var_names.iter().find(|n| !self.declared.contains(**n)) {
            return Err(Cvc5Error::SolverError(format!("`{name}` is not declared")));
        }
        let tail = if var_names.is_empty() {
            "(check-sat)\n(exit)\n".to_string()
        } else {
            format!("(check-sat)\n(get-value ({}))\n(exit)\n", var_names.join(" "))
        };
        let reply = parse_sexps(&self.run(&tail)?)?;
        let result = sat_status(&reply)?;
        if result != SatResult::Sat {
            return Ok((result, None));
        }
        let values = match reply.get(1) {
            Some(bindings) => parse_bindings(bindings)?,
            None if var_names.is_empty() => HashMap::new(),
            None => return Err(Cvc5Error::Reply("sat without a get-value reply".into())),
        };
        Ok((SatResult::Sat, Some(Model { values })))
    }

    fn reset(&mut self) -> Result<(), Cvc5Error> {
        self.script = format!("(set-logic {LOGIC})\n");
        self.declared.clear();
        Ok(())
    }
}

/// One s-expression of a cvc5 reply.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Sexp {
    Atom(String),
    List(Vec<Sexp>),
}

/// Parse every top-level s-expression in `input`.
///
/// Handles `|quoted symbols|` and `"string literals"` as single atoms.
fn parse_sexps(input: &str) -> Result<Vec<Sexp>, Cvc5Error> {
    let mut stack: Vec<Vec<Sexp>> = vec![Vec::new()];
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '(' => stack.push(Vec::new()),
            ')' => {
                let list = stack
                    .pop()
                    .filter(|_| !stack.is_empty())
                    .ok_or_else(|| Cvc5Error::Reply("unbalanced `)`".into()))?;
                if let Some(parent) = stack.last_mut() {
                    parent.push(Sexp::List(list));
                }
            }
            c if c.is_whitespace() => {}
            '"' | '|' => {
                let mut atom = String::from(c);
                loop {
                    match chars.next() {
                        Some(d) if d == c => {
                            atom.push(d);
                            // `""` escapes a quote inside a string literal
                            if c == '"' && chars.peek() == Some(&'"') {
                                atom.extend(chars.next());
                                continue;
                            }
                            break;
                        }
                        Some(d) => atom.push(d),
                        None => return Err(Cvc5Error::Reply(format!("unterminated {c}"))),
                    }
                }
                push_atom(&mut stack, atom);
            }
            c => {
                let mut atom = String::from(c);
                while let Some(&d) = chars.peek() {
                    if d.is_whitespace() || d == '(' || d == ')' {
                        break;
                    }
                    atom.push(d);
                    chars.next();
                }
                push_atom(&mut stack, atom);
            }
        }
    }
    match stack.pop() {
        Some(top) if stack.is_empty() => Ok(top),
        _ => Err(Cvc5Error::Reply("unbalanced `(`".into())),
    }
}

fn push_atom(stack: &mut [Vec<Sexp>], atom: String) {
    if let Some(top) = stack.last_mut() {
        top.push(Sexp::Atom(atom));
    }
}

fn error_message(sexp: &Sexp) -> Option<String> {
    match sexp {
        Sexp::List(items) => match items.as_slice() {
            [Sexp::Atom(head), Sexp::Atom(msg)] if head == "error" => {
                Some(msg.trim_matches('"').to_string())
            }
            _ => None,
        },
        Sexp::Atom(_) => None,
    }
}

/// The verdict is the first reply; an `(error ...)` there is fatal.
fn sat_status(reply: &[Sexp]) -> Result<SatResult, Cvc5Error> {
    match reply.first() {
        Some(Sexp::Atom(a)) if a == "sat" => Ok(SatResult::Sat),
        Some(Sexp::Atom(a)) if a == "unsat" => Ok(SatResult::Unsat),
        Some(Sexp::Atom(a)) if a == "unknown" => {
            Ok(SatResult::Unknown("cvc5 returned unknown".into()))
        }
        Some(other) => Err(match error_message(other) {
            Some(msg) => Cvc5Error::SolverError(msg),
            None => Cvc5Error::Reply(format!("unexpected check-sat reply {other:?}")),
        }),
        None => Err(Cvc5Error::Reply("empty reply".into())),
    }
}

/// Read `((name value) ...)` into a map of Boolean assignments.
fn parse_bindings(sexp: &Sexp) -> Result<HashMap<String, bool>, Cvc5Error> {
    if let Some(msg) = error_message(sexp) {
        return Err(Cvc5Error::SolverError(msg));
    }
    let Sexp::List(pairs) = sexp else {
        return Err(Cvc5Error::Reply(format!("expected binding list, got {sexp:?}")));
    };
    pairs
        .iter()
        .map(|pair| match pair {
            Sexp::List(items) => match items.as_slice() {
                [Sexp::Atom(name), Sexp::Atom(value)] => {
                    let value = match value.as_str() {
                        "true" => true,
                        "false" => false,
                        other => {
                            return Err(Cvc5Error::Reply(format!(
                                "`{name}` bound to non-Boolean `{other}`"
                            )))
                        }
                    };
                    Ok((name.trim_matches('|').to_string(), value))
                }
                _ => Err(Cvc5Error::Reply(format!("malformed binding {pair:?}"))),
            },
            Sexp::Atom(a) => Err(Cvc5Error::Reply(format!("malformed binding `{a}`"))),
        })
        .collect()
}
