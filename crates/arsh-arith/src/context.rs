//! Per-call evaluation context: the two bounded stacks.
//!
//! One context exists per call to the engine; it is created on entry,
//! drained during reduction, and dropped on every exit path. The stacks are
//! fixed-capacity so pathological input (deeply nested parentheses, absurd
//! operator chains) fails deterministically instead of growing unbounded.

use crate::error::ArithError;
use crate::grammar::OpDesc;

/// Capacity of the operator and operand stacks.
pub const STACK_CAPACITY: usize = 64;

/// A value on the operand stack.
///
/// Identifiers stay unresolved until an operator consumes them, retaining
/// the name so the assignment family can write back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Literal(i64),
    Var(String),
}

/// The dual stack machine's storage.
#[derive(Debug)]
pub(crate) struct EvalContext {
    ops: Vec<&'static OpDesc>,
    operands: Vec<Operand>,
}

impl EvalContext {
    pub(crate) fn new() -> Self {
        Self {
            ops: Vec::with_capacity(STACK_CAPACITY),
            operands: Vec::with_capacity(STACK_CAPACITY),
        }
    }

    pub(crate) fn push_op(&mut self, desc: &'static OpDesc) -> Result<(), ArithError> {
        if self.ops.len() == STACK_CAPACITY {
            return Err(ArithError::StackOverflow);
        }
        self.ops.push(desc);
        Ok(())
    }

    pub(crate) fn pop_op(&mut self) -> Option<&'static OpDesc> {
        self.ops.pop()
    }

    pub(crate) fn peek_op(&self) -> Option<&'static OpDesc> {
        self.ops.last().copied()
    }

    pub(crate) fn push_operand(&mut self, operand: Operand) -> Result<(), ArithError> {
        if self.operands.len() == STACK_CAPACITY {
            return Err(ArithError::StackOverflow);
        }
        self.operands.push(operand);
        Ok(())
    }

    pub(crate) fn pop_operand(&mut self) -> Result<Operand, ArithError> {
        self.operands.pop().ok_or(ArithError::StackUnderflow)
    }

    pub(crate) fn operand_count(&self) -> usize {
        self.operands.len()
    }
}
