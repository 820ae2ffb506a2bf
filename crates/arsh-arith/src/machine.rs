//! The shunting-yard dual stack machine.
//!
//! Operators wait on one stack while operands accumulate on the other.
//! Each incoming operator first reduces everything on the stack that binds
//! at least as tightly (strictly tighter for right-associative operators),
//! then pushes itself. `(` is a barrier that only its matching `)` removes.
//! At end of input the operator stack drains; exactly one operand must
//! remain. Closing a group resolves its result to a plain value, so a
//! parenthesized variable is no longer assignable.
//!
//! Logical `&&`/`||` are reduced like any other binary operator: both sides
//! are fully resolved before application, so `0 && 1/0` still divides by
//! zero. That is the documented contract of this engine, not an oversight.

use arsh_vars::VarStore;
use tracing::trace;

use crate::context::{EvalContext, Operand};
use crate::error::ArithError;
use crate::eval;
use crate::grammar::{self, Arity, Assoc, Op, OpDesc};
use crate::resolve;
use crate::token::{Token, Tokenizer};

/// Evaluate a bare expression (no `$((` wrapper) to an integer.
pub(crate) fn run(expr: &str, vars: &mut dyn VarStore) -> Result<i64, ArithError> {
    let mut ctx = EvalContext::new();
    let mut tokens = Tokenizer::new(expr);
    // True whenever the grammar wants an operand (or a prefix operator)
    // next; used to reject illegal operator placement early.
    let mut expect_operand = true;

    while let Some(token) = tokens.next_token()? {
        match token {
            Token::Literal(value) => {
                if !expect_operand {
                    return Err(operator_expected(&value.to_string()));
                }
                ctx.push_operand(Operand::Literal(value))?;
                expect_operand = false;
            }
            Token::Var(name) => {
                if !expect_operand {
                    return Err(operator_expected(&name));
                }
                ctx.push_operand(Operand::Var(name))?;
                expect_operand = false;
            }
            Token::Op(desc) => match desc.op {
                Op::OpenParen => {
                    if !expect_operand {
                        return Err(operator_expected(desc.symbol));
                    }
                    ctx.push_op(desc)?;
                }
                Op::CloseParen => {
                    if expect_operand {
                        return Err(operand_expected(desc.symbol));
                    }
                    loop {
                        match ctx.peek_op() {
                            None => {
                                return Err(ArithError::Syntax(
                                    "unbalanced parenthesis: unexpected `)`".to_string(),
                                ))
                            }
                            Some(top) if top.op == Op::OpenParen => {
                                ctx.pop_op();
                                // A closed group yields a value, not an
                                // lvalue, so `(x) = 5` fails downstream
                                let group = ctx.pop_operand()?;
                                ctx.push_operand(Operand::Literal(resolve::resolve(
                                    vars, &group,
                                )))?;
                                break;
                            }
                            Some(_) => reduce(&mut ctx, vars)?,
                        }
                    }
                }
                op => {
                    let postfix = matches!(op, Op::PostIncr | Op::PostDecr);
                    if desc.arity == Arity::Unary && !postfix {
                        if !expect_operand {
                            return Err(operator_expected(desc.symbol));
                        }
                    } else if expect_operand {
                        return Err(operand_expected(desc.symbol));
                    }
                    while let Some(top) = ctx.peek_op() {
                        if top.op == Op::OpenParen {
                            break;
                        }
                        let reduce_now = match desc.assoc {
                            Assoc::Left => top.prec <= desc.prec,
                            Assoc::Right => top.prec < desc.prec,
                        };
                        if !reduce_now {
                            break;
                        }
                        reduce(&mut ctx, vars)?;
                    }
                    ctx.push_op(desc)?;
                    expect_operand = !postfix;
                }
            },
        }
    }

    if expect_operand {
        // Empty input or a trailing operator
        return Err(ArithError::Syntax("operand expected".to_string()));
    }
    while let Some(top) = ctx.peek_op() {
        if top.op == Op::OpenParen {
            return Err(ArithError::Syntax(
                "unbalanced parenthesis: missing `)`".to_string(),
            ));
        }
        reduce(&mut ctx, vars)?;
    }

    let result = ctx.pop_operand()?;
    if ctx.operand_count() != 0 {
        return Err(ArithError::Syntax("malformed expression".to_string()));
    }
    Ok(resolve::resolve(vars, &result))
}

/// One pop-and-reduce step: pop an operator, pop its operands, resolve
/// them, apply the evaluation rule, push the result back as a literal.
fn reduce(ctx: &mut EvalContext, vars: &mut dyn VarStore) -> Result<(), ArithError> {
    let desc = ctx.pop_op().ok_or(ArithError::StackUnderflow)?;
    trace!(op = desc.symbol, "reduce");
    let result = match desc.arity {
        Arity::Unary => {
            let operand = ctx.pop_operand()?;
            match desc.op {
                Op::PreIncr | Op::PreDecr | Op::PostIncr | Op::PostDecr => {
                    apply_incr_decr(vars, desc, operand)?
                }
                _ => eval::apply_unary(desc.op, resolve::resolve(vars, &operand)),
            }
        }
        Arity::Binary => {
            // Second-popped is the left operand
            let right = ctx.pop_operand()?;
            let left = ctx.pop_operand()?;
            if grammar::is_assignment(desc.op) {
                let Operand::Var(name) = left else {
                    return Err(ArithError::Syntax(
                        "attempted assignment to non-variable".to_string(),
                    ));
                };
                let rhs = resolve::resolve(vars, &right);
                let value = match grammar::compound_base(desc.op) {
                    None => rhs,
                    Some(base) => {
                        let current = resolve::resolve_name(vars, &name);
                        eval::apply_binary(base, current, rhs)?
                    }
                };
                resolve::write_back(vars, &name, value);
                value
            } else {
                let left = resolve::resolve(vars, &left);
                let right = resolve::resolve(vars, &right);
                eval::apply_binary(desc.op, left, right)?
            }
        }
    };
    ctx.push_operand(Operand::Literal(result))
}

/// `++`/`--` in all four positions. Prefix forms on a literal degrade to
/// double unary `+`/`-` the way bash reads `++5`; postfix forms demand a
/// variable.
fn apply_incr_decr(
    vars: &mut dyn VarStore,
    desc: &'static OpDesc,
    operand: Operand,
) -> Result<i64, ArithError> {
    let delta: i64 = match desc.op {
        Op::PreIncr | Op::PostIncr => 1,
        _ => -1,
    };
    match operand {
        Operand::Var(name) => {
            let current = resolve::resolve_name(vars, &name);
            let next = current.wrapping_add(delta);
            resolve::write_back(vars, &name, next);
            Ok(match desc.op {
                Op::PreIncr | Op::PreDecr => next,
                _ => current,
            })
        }
        Operand::Literal(value) => match desc.op {
            Op::PreIncr | Op::PreDecr => Ok(value),
            _ => Err(ArithError::Syntax(format!(
                "'{}' requires a variable operand",
                desc.symbol
            ))),
        },
    }
}

fn operand_expected(token: &str) -> ArithError {
    ArithError::Syntax(format!("operand expected (error token is \"{token}\")"))
}

fn operator_expected(token: &str) -> ArithError {
    ArithError::Syntax(format!("operator expected (error token is \"{token}\")"))
}
