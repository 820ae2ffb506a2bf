//! Arithmetic evaluation errors.

use thiserror::Error;

use crate::context::STACK_CAPACITY;

/// Errors produced by arithmetic evaluation.
///
/// Every variant is recoverable: the engine tears down its per-call state
/// and returns, and the caller decides the user-visible consequence (nonzero
/// exit status, fallback value, or termination under strict shell modes).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithError {
    /// Unknown token, illegal operator placement, or mismatched parentheses.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// More pending operators or operands than the fixed stacks can hold.
    #[error("expression too complex (stack capacity {STACK_CAPACITY} exceeded)")]
    StackOverflow,

    /// An operator found fewer operands than its arity requires.
    #[error("internal error: operand stack underflow")]
    StackUnderflow,

    /// Division or modulo by zero.
    #[error("division by 0")]
    DivisionByZero,

    /// Exponentiation with a negative right operand.
    #[error("exponent less than 0")]
    NegativeExponent,

    /// A `$((` opener without its matching `))` closer.
    #[error("unterminated arithmetic expansion: missing `))`")]
    MalformedWrapper,
}
