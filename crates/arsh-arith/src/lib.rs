//! arsh-arith: POSIX shell arithmetic expansion.
//!
//! Evaluates `$(( expression ))` integer expressions with a table-driven
//! shunting-yard machine:
//!
//! - **Grammar table**: every operator's symbol, precedence, associativity,
//!   and arity in one static table
//! - **Tokenizer**: single pass, longest-match, unary/postfix disambiguation
//! - **Dual stack machine**: bounded operator and operand stacks
//! - **Operand resolver**: lazy variable resolution with auto-vivification
//!   and write-back through the narrow [`VarStore`] interface
//!
//! Supported operators, tightest to loosest: grouping `( )`, postfix and
//! prefix `++` `--`, unary `+ - ! ~`, `**` (right-assoc), `* / %`, `+ -`,
//! `<< >>`, `< <= > >=`, `== !=`, `&`, `^`, `|`, `&&`, `||`, and the
//! right-associative assignment family `= += -= *= /= %= <<= >>= &= ^= |=`.
//!
//! Deliberate scope limits: integers only (no floats), no ternary `?:`, no
//! comma operator, and `&&`/`||` never short-circuit (both sides are always
//! resolved). The non-POSIX `base#digits` literal form is available behind
//! the `base-literals` feature, which is in the default set.
//!
//! ```
//! use arsh_arith::evaluate;
//! use std::collections::HashMap;
//!
//! let mut vars: HashMap<String, String> = HashMap::new();
//! assert_eq!(evaluate("$((3+4*2))", &mut vars).unwrap(), "11");
//!
//! vars.insert("x".into(), "5".into());
//! assert_eq!(evaluate("x += 3", &mut vars).unwrap(), "8");
//! assert_eq!(vars["x"], "8");
//! ```

mod context;
mod error;
pub mod grammar;
mod eval;
mod machine;
mod resolve;
mod token;

pub use arsh_vars::VarStore;
pub use context::{Operand, STACK_CAPACITY};
pub use error::ArithError;

use tracing::debug;

/// Evaluate an arithmetic expression to its canonical decimal string.
///
/// The expression may be bare (`3+4`) or wrapped in the expansion marker
/// (`$((3+4))`). Identifiers resolve against `vars`, so passing a
/// function-local scope evaluates in that scope. Reading an unset variable
/// creates it with value `"0"`; assignment and increment operators write
/// back through the same handle.
pub fn evaluate(expr: &str, vars: &mut dyn VarStore) -> Result<String, ArithError> {
    debug!(expr, "evaluating arithmetic expression");
    let body = strip_wrapper(expr)?;
    let value = machine::run(body, vars)?;
    Ok(value.to_string())
}

/// Evaluate an expression under the `(( ))` truth convention: any nonzero
/// result is true (exit status 0), zero is false (exit status 1).
pub fn evaluate_truth(expr: &str, vars: &mut dyn VarStore) -> Result<bool, ArithError> {
    let body = strip_wrapper(expr)?;
    Ok(machine::run(body, vars)? != 0)
}

/// Strip a `$(( ... ))` wrapper if present.
///
/// An opening marker without its closing `))` is [`ArithError::MalformedWrapper`].
fn strip_wrapper(expr: &str) -> Result<&str, ArithError> {
    let trimmed = expr.trim();
    match trimmed.strip_prefix("$((") {
        Some(rest) => rest
            .strip_suffix("))")
            .ok_or(ArithError::MalformedWrapper),
        None => Ok(trimmed),
    }
}

/// Stateful evaluation front end that records the last failure message.
///
/// `evaluate` already reports errors per call; this wrapper exists for
/// callers structured around a "did the last evaluation fail?" probe, like
/// a `declare -i` assignment path that formats the message later. The
/// accessor is one-shot: reading the message clears it.
#[derive(Debug, Default)]
pub struct Evaluator {
    last_error: Option<String>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate an expression, recording the failure message on error.
    pub fn eval(&mut self, expr: &str, vars: &mut dyn VarStore) -> Result<String, ArithError> {
        match evaluate(expr, vars) {
            Ok(result) => {
                self.last_error = None;
                Ok(result)
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Take the last error message, clearing it.
    pub fn last_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Reset error state before the next evaluation.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}
