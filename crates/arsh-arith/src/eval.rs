//! Operator evaluation rules.
//!
//! Arithmetic wraps on overflow (two's complement, as bash's intmax_t math
//! does) and shift counts are masked to 0-63. Division and modulo by zero
//! and negative exponents are domain errors. Logical `&&`/`||` here are
//! plain functions of two already-resolved operands; the machine never
//! short-circuits them.

use crate::error::ArithError;
use crate::grammar::Op;

/// Apply a binary operator to resolved operands.
pub(crate) fn apply_binary(op: Op, left: i64, right: i64) -> Result<i64, ArithError> {
    let result = match op {
        Op::Add => left.wrapping_add(right),
        Op::Sub => left.wrapping_sub(right),
        Op::Mul => left.wrapping_mul(right),
        Op::Div => {
            if right == 0 {
                return Err(ArithError::DivisionByZero);
            }
            left.wrapping_div(right)
        }
        Op::Mod => {
            if right == 0 {
                return Err(ArithError::DivisionByZero);
            }
            left.wrapping_rem(right)
        }
        Op::Pow => return pow(left, right),
        Op::Shl => left.wrapping_shl((right & 63) as u32),
        Op::Shr => left.wrapping_shr((right & 63) as u32),
        Op::Lt => (left < right) as i64,
        Op::Le => (left <= right) as i64,
        Op::Gt => (left > right) as i64,
        Op::Ge => (left >= right) as i64,
        Op::Eq => (left == right) as i64,
        Op::Ne => (left != right) as i64,
        Op::BitAnd => left & right,
        Op::BitXor => left ^ right,
        Op::BitOr => left | right,
        Op::AndAnd => (left != 0 && right != 0) as i64,
        Op::OrOr => (left != 0 || right != 0) as i64,
        _ => unreachable!("{op:?} is not a binary evaluation rule"),
    };
    Ok(result)
}

/// Apply a unary operator. Increment/decrement are handled by the machine
/// because they touch the store.
pub(crate) fn apply_unary(op: Op, value: i64) -> i64 {
    match op {
        Op::UnaryPlus => value,
        Op::UnaryMinus => value.wrapping_neg(),
        Op::LogicalNot => (value == 0) as i64,
        Op::BitNot => !value,
        _ => unreachable!("{op:?} is not a unary evaluation rule"),
    }
}

/// Exact integer exponentiation by repeated (wrapping) multiplication.
/// A negative exponent is a domain error; there is no float fallback.
fn pow(base: i64, exp: i64) -> Result<i64, ArithError> {
    if exp < 0 {
        return Err(ArithError::NegativeExponent);
    }
    let mut acc: i64 = 1;
    let mut base = base;
    let mut exp = exp as u64;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_binary_rules() {
        assert_eq!(apply_binary(Op::Add, 5, 3).unwrap(), 8);
        assert_eq!(apply_binary(Op::Sub, 5, 3).unwrap(), 2);
        assert_eq!(apply_binary(Op::Mul, 5, 3).unwrap(), 15);
        assert_eq!(apply_binary(Op::Div, 7, 2).unwrap(), 3);
        assert_eq!(apply_binary(Op::Mod, 17, 5).unwrap(), 2);
    }

    #[test]
    fn division_and_modulo_by_zero() {
        assert_eq!(apply_binary(Op::Div, 10, 0), Err(ArithError::DivisionByZero));
        assert_eq!(apply_binary(Op::Mod, 10, 0), Err(ArithError::DivisionByZero));
    }

    #[test]
    fn comparisons_yield_zero_or_one() {
        assert_eq!(apply_binary(Op::Lt, 3, 5).unwrap(), 1);
        assert_eq!(apply_binary(Op::Lt, 5, 3).unwrap(), 0);
        assert_eq!(apply_binary(Op::Ge, 5, 5).unwrap(), 1);
        assert_eq!(apply_binary(Op::Eq, 5, 5).unwrap(), 1);
        assert_eq!(apply_binary(Op::Ne, 5, 5).unwrap(), 0);
    }

    #[test]
    fn bitwise_and_shift_rules() {
        assert_eq!(apply_binary(Op::BitAnd, 0b1010, 0b1100).unwrap(), 0b1000);
        assert_eq!(apply_binary(Op::BitOr, 0b1010, 0b1100).unwrap(), 0b1110);
        assert_eq!(apply_binary(Op::BitXor, 0b1010, 0b1100).unwrap(), 0b0110);
        assert_eq!(apply_binary(Op::Shl, 5, 2).unwrap(), 20);
        assert_eq!(apply_binary(Op::Shr, 20, 2).unwrap(), 5);
    }

    #[test]
    fn shift_counts_are_masked_to_word_size() {
        assert_eq!(apply_binary(Op::Shl, 1, 64).unwrap(), 1);
        assert_eq!(apply_binary(Op::Shl, 1, 65).unwrap(), 2);
        // -1 & 63 == 63
        assert_eq!(apply_binary(Op::Shl, 1, -1).unwrap(), i64::MIN);
        assert_eq!(apply_binary(Op::Shr, 1024, 66).unwrap(), 256);
    }

    #[test]
    fn logical_rules_are_total_functions() {
        assert_eq!(apply_binary(Op::AndAnd, 2, 3).unwrap(), 1);
        assert_eq!(apply_binary(Op::AndAnd, 0, 3).unwrap(), 0);
        assert_eq!(apply_binary(Op::OrOr, 0, 0).unwrap(), 0);
        assert_eq!(apply_binary(Op::OrOr, 0, -1).unwrap(), 1);
    }

    #[test]
    fn unary_rules() {
        assert_eq!(apply_unary(Op::UnaryMinus, 5), -5);
        assert_eq!(apply_unary(Op::UnaryPlus, -5), -5);
        assert_eq!(apply_unary(Op::LogicalNot, 0), 1);
        assert_eq!(apply_unary(Op::LogicalNot, 7), 0);
        assert_eq!(apply_unary(Op::BitNot, 0), -1);
    }

    #[test]
    fn exponentiation_is_exact() {
        assert_eq!(apply_binary(Op::Pow, 2, 10).unwrap(), 1024);
        assert_eq!(apply_binary(Op::Pow, 3, 0).unwrap(), 1);
        assert_eq!(apply_binary(Op::Pow, 0, 0).unwrap(), 1);
        assert_eq!(apply_binary(Op::Pow, -2, 3).unwrap(), -8);
    }

    #[test]
    fn negative_exponent_is_a_domain_error() {
        assert_eq!(apply_binary(Op::Pow, 2, -1), Err(ArithError::NegativeExponent));
    }

    #[test]
    fn overflow_wraps() {
        assert_eq!(apply_binary(Op::Add, i64::MAX, 1).unwrap(), i64::MIN);
        assert_eq!(apply_binary(Op::Mul, i64::MAX, 2).unwrap(), -2);
        assert_eq!(apply_unary(Op::UnaryMinus, i64::MIN), i64::MIN);
        assert_eq!(apply_binary(Op::Div, i64::MIN, -1).unwrap(), i64::MIN);
    }

    #[test]
    fn huge_exponents_terminate() {
        // Any even power of two past the word size wraps to zero
        assert_eq!(apply_binary(Op::Pow, 2, i64::MAX - 1).unwrap(), 0);
    }
}
