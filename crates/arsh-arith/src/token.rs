//! Single-pass tokenizer for arithmetic expressions.
//!
//! At each position the scanner tries, in order: a longest-match against the
//! operator table, a digit-led numeric literal, then a letter/underscore-led
//! identifier. The previous significant token disambiguates unary `+`/`-`
//! from their binary forms and postfix `++`/`--` from prefix.
//!
//! Literal bases: `0x`/`0X` prefixes hexadecimal, a leading zero before
//! another digit means octal, everything else is decimal. With the
//! `base-literals` feature, `base#digits` (base 2-64) is also accepted;
//! digits past 9 are letters, then `@` (62) and `_` (63), with letter case
//! insignificant in bases up to 36.

use crate::error::ArithError;
use crate::grammar::{self, Op, OpDesc};

/// A significant token in an arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Op(&'static OpDesc),
    Literal(i64),
    Var(String),
}

/// What the previous significant token was, for disambiguation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    /// Start of expression.
    Start,
    /// Numeric literal or identifier (also a postfix op, which ends one).
    Operand,
    /// A closing parenthesis.
    CloseParen,
    /// Any other operator, `(` included.
    Operator,
}

pub(crate) struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    prev: Prev,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            prev: Prev::Start,
        }
    }

    /// Scan the next token, or `None` at end of input.
    pub(crate) fn next_token(&mut self) -> Result<Option<Token>, ArithError> {
        self.skip_whitespace();
        let rest = &self.src[self.pos..];
        let Some(first) = rest.chars().next() else {
            return Ok(None);
        };

        if let Some(desc) = grammar::match_operator(rest) {
            self.pos += desc.symbol.len();
            let desc = self.disambiguate(desc);
            self.prev = match desc.op {
                Op::CloseParen => Prev::CloseParen,
                Op::PostIncr | Op::PostDecr => Prev::Operand,
                _ => Prev::Operator,
            };
            return Ok(Some(Token::Op(desc)));
        }

        if first.is_ascii_digit() {
            let text = self.scan_while(is_literal_char);
            self.prev = Prev::Operand;
            return parse_literal(text).map(|v| Some(Token::Literal(v)));
        }

        if first.is_ascii_alphabetic() || first == '_' {
            let name = self.scan_while(|c| c.is_ascii_alphanumeric() || c == '_');
            self.prev = Prev::Operand;
            return Ok(Some(Token::Var(name.to_string())));
        }

        match first {
            '?' | ':' | ',' => Err(ArithError::Syntax(format!(
                "the '{first}' operator is not supported"
            ))),
            _ => Err(ArithError::Syntax(format!(
                "unexpected character '{first}' in expression"
            ))),
        }
    }

    /// Swap in the unary or postfix variant of an ambiguous operator based
    /// on the previous significant token. `+`/`-` are unary unless they
    /// follow an operand or `)`; `++`/`--` are postfix only directly after
    /// an operand.
    fn disambiguate(&self, desc: &'static OpDesc) -> &'static OpDesc {
        match desc.op {
            Op::Add | Op::Sub if matches!(self.prev, Prev::Start | Prev::Operator) => {
                grammar::unary_variant(desc.op).unwrap_or(desc)
            }
            Op::PreIncr | Op::PreDecr if self.prev == Prev::Operand => {
                grammar::postfix_variant(desc.op).unwrap_or(desc)
            }
            _ => desc,
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.src[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn scan_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        for (offset, c) in self.src[start..].char_indices() {
            if !pred(c) {
                self.pos = start + offset;
                return &self.src[start..self.pos];
            }
        }
        self.pos = self.src.len();
        &self.src[start..]
    }
}

fn is_literal_char(c: char) -> bool {
    if c.is_ascii_alphanumeric() {
        return true;
    }
    if cfg!(feature = "base-literals") {
        matches!(c, '#' | '@' | '_')
    } else {
        false
    }
}

fn parse_literal(text: &str) -> Result<i64, ArithError> {
    #[cfg(feature = "base-literals")]
    if let Some((base, digits)) = text.split_once('#') {
        return parse_base_literal(text, base, digits);
    }

    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        // Parse through u64 so full-width values like 0xffffffffffffffff wrap
        return u64::from_str_radix(hex, 16)
            .map(|v| v as i64)
            .map_err(|_| invalid_number(text));
    }
    if text.len() > 1 && text.starts_with('0') {
        return u64::from_str_radix(&text[1..], 8)
            .map(|v| v as i64)
            .map_err(|_| too_great_for_base(text));
    }
    text.parse().map_err(|_| invalid_number(text))
}

#[cfg(feature = "base-literals")]
fn parse_base_literal(text: &str, base: &str, digits: &str) -> Result<i64, ArithError> {
    let base: i64 = base.parse().map_err(|_| invalid_number(text))?;
    if !(2..=64).contains(&base) {
        return Err(ArithError::Syntax(format!(
            "invalid arithmetic base (error token is \"{text}\")"
        )));
    }
    if digits.is_empty() {
        return Err(invalid_number(text));
    }
    let mut value: i64 = 0;
    for c in digits.chars() {
        let d = match c {
            '0'..='9' => c as i64 - '0' as i64,
            'a'..='z' => c as i64 - 'a' as i64 + 10,
            // In bases up to 36, letter case is insignificant
            'A'..='Z' if base <= 36 => c as i64 - 'A' as i64 + 10,
            'A'..='Z' => c as i64 - 'A' as i64 + 36,
            '@' => 62,
            '_' => 63,
            _ => return Err(too_great_for_base(text)),
        };
        if d >= base {
            return Err(too_great_for_base(text));
        }
        value = value.wrapping_mul(base).wrapping_add(d);
    }
    Ok(value)
}

fn invalid_number(text: &str) -> ArithError {
    ArithError::Syntax(format!("invalid number (error token is \"{text}\")"))
}

fn too_great_for_base(text: &str) -> ArithError {
    ArithError::Syntax(format!("value too great for base (error token is \"{text}\")"))
}
