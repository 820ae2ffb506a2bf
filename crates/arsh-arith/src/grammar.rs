//! Operator grammar table.
//!
//! Static description of every operator the engine understands: symbol,
//! precedence rank, associativity, and arity. The tokenizer longest-matches
//! against this table and the stack machine compares ranks to decide when to
//! reduce. Lower rank binds tighter; grouping parentheses sit at rank 0 and
//! the assignment family is the loosest at rank 14.

/// Grouping rule for consecutive operators of equal precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// Number of operands an operator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

/// Every operator in the grammar, including positional variants the
/// tokenizer selects by context (unary vs. binary `+`/`-`, prefix vs.
/// postfix `++`/`--`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    OpenParen,
    CloseParen,
    PostIncr,
    PostDecr,
    PreIncr,
    PreDecr,
    UnaryPlus,
    UnaryMinus,
    LogicalNot,
    BitNot,
    Pow,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    AndAnd,
    OrOr,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    XorAssign,
    OrAssign,
}

/// One row of the grammar table.
#[derive(Debug, PartialEq, Eq)]
pub struct OpDesc {
    pub symbol: &'static str,
    pub op: Op,
    /// Precedence rank; lower binds tighter.
    pub prec: u8,
    pub assoc: Assoc,
    pub arity: Arity,
}

const fn desc(symbol: &'static str, op: Op, prec: u8, assoc: Assoc, arity: Arity) -> OpDesc {
    OpDesc {
        symbol,
        op,
        prec,
        assoc,
        arity,
    }
}

/// The operator table, ordered for longest-match scanning: any symbol that
/// is a prefix of another must come after it (`<=` before `<`, `<<=` before
/// both). `+`/`-` and `++`/`--` appear in their binary/prefix forms; the
/// tokenizer swaps in the variants below when context says otherwise.
pub(crate) const OPERATORS: &[OpDesc] = &[
    desc("<<=", Op::ShlAssign, 14, Assoc::Right, Arity::Binary),
    desc(">>=", Op::ShrAssign, 14, Assoc::Right, Arity::Binary),
    desc("**", Op::Pow, 3, Assoc::Right, Arity::Binary),
    desc("<<", Op::Shl, 6, Assoc::Left, Arity::Binary),
    desc(">>", Op::Shr, 6, Assoc::Left, Arity::Binary),
    desc("<=", Op::Le, 7, Assoc::Left, Arity::Binary),
    desc(">=", Op::Ge, 7, Assoc::Left, Arity::Binary),
    desc("==", Op::Eq, 8, Assoc::Left, Arity::Binary),
    desc("!=", Op::Ne, 8, Assoc::Left, Arity::Binary),
    desc("&&", Op::AndAnd, 12, Assoc::Left, Arity::Binary),
    desc("||", Op::OrOr, 13, Assoc::Left, Arity::Binary),
    desc("++", Op::PreIncr, 2, Assoc::Right, Arity::Unary),
    desc("--", Op::PreDecr, 2, Assoc::Right, Arity::Unary),
    desc("+=", Op::AddAssign, 14, Assoc::Right, Arity::Binary),
    desc("-=", Op::SubAssign, 14, Assoc::Right, Arity::Binary),
    desc("*=", Op::MulAssign, 14, Assoc::Right, Arity::Binary),
    desc("/=", Op::DivAssign, 14, Assoc::Right, Arity::Binary),
    desc("%=", Op::ModAssign, 14, Assoc::Right, Arity::Binary),
    desc("&=", Op::AndAssign, 14, Assoc::Right, Arity::Binary),
    desc("^=", Op::XorAssign, 14, Assoc::Right, Arity::Binary),
    desc("|=", Op::OrAssign, 14, Assoc::Right, Arity::Binary),
    desc("(", Op::OpenParen, 0, Assoc::Left, Arity::Unary),
    desc(")", Op::CloseParen, 0, Assoc::Left, Arity::Unary),
    desc("!", Op::LogicalNot, 2, Assoc::Right, Arity::Unary),
    desc("~", Op::BitNot, 2, Assoc::Right, Arity::Unary),
    desc("*", Op::Mul, 4, Assoc::Left, Arity::Binary),
    desc("/", Op::Div, 4, Assoc::Left, Arity::Binary),
    desc("%", Op::Mod, 4, Assoc::Left, Arity::Binary),
    desc("+", Op::Add, 5, Assoc::Left, Arity::Binary),
    desc("-", Op::Sub, 5, Assoc::Left, Arity::Binary),
    desc("<", Op::Lt, 7, Assoc::Left, Arity::Binary),
    desc(">", Op::Gt, 7, Assoc::Left, Arity::Binary),
    desc("&", Op::BitAnd, 9, Assoc::Left, Arity::Binary),
    desc("^", Op::BitXor, 10, Assoc::Left, Arity::Binary),
    desc("|", Op::BitOr, 11, Assoc::Left, Arity::Binary),
    desc("=", Op::Assign, 14, Assoc::Right, Arity::Binary),
];

const UNARY_PLUS: OpDesc = desc("+", Op::UnaryPlus, 2, Assoc::Right, Arity::Unary);
const UNARY_MINUS: OpDesc = desc("-", Op::UnaryMinus, 2, Assoc::Right, Arity::Unary);
const POST_INCR: OpDesc = desc("++", Op::PostIncr, 1, Assoc::Left, Arity::Unary);
const POST_DECR: OpDesc = desc("--", Op::PostDecr, 1, Assoc::Left, Arity::Unary);

/// Longest operator match at the start of `rest`, if any.
pub(crate) fn match_operator(rest: &str) -> Option<&'static OpDesc> {
    OPERATORS.iter().find(|d| rest.starts_with(d.symbol))
}

/// The prefix/unary variant of a binary `+` or `-` descriptor.
pub(crate) fn unary_variant(op: Op) -> Option<&'static OpDesc> {
    match op {
        Op::Add => Some(&UNARY_PLUS),
        Op::Sub => Some(&UNARY_MINUS),
        _ => None,
    }
}

/// The postfix variant of a prefix `++` or `--` descriptor.
pub(crate) fn postfix_variant(op: Op) -> Option<&'static OpDesc> {
    match op {
        Op::PreIncr => Some(&POST_INCR),
        Op::PreDecr => Some(&POST_DECR),
        _ => None,
    }
}

/// True for the whole assignment family, `=` included.
pub(crate) fn is_assignment(op: Op) -> bool {
    compound_base(op).is_some() || op == Op::Assign
}

/// The binary operator a compound assignment applies before writing back
/// (`+=` applies `+`). Plain `=` has no base operator.
pub(crate) fn compound_base(op: Op) -> Option<Op> {
    match op {
        Op::AddAssign => Some(Op::Add),
        Op::SubAssign => Some(Op::Sub),
        Op::MulAssign => Some(Op::Mul),
        Op::DivAssign => Some(Op::Div),
        Op::ModAssign => Some(Op::Mod),
        Op::ShlAssign => Some(Op::Shl),
        Op::ShrAssign => Some(Op::Shr),
        Op::AndAssign => Some(Op::BitAnd),
        Op::XorAssign => Some(Op::BitXor),
        Op::OrAssign => Some(Op::BitOr),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_ordered_for_longest_match() {
        for (i, earlier) in OPERATORS.iter().enumerate() {
            for later in &OPERATORS[i + 1..] {
                assert!(
                    !later.symbol.starts_with(earlier.symbol),
                    "{:?} would shadow {:?}",
                    earlier.symbol,
                    later.symbol
                );
            }
        }
    }

    #[test]
    fn longest_match_wins() {
        assert_eq!(match_operator("<<= 1").unwrap().op, Op::ShlAssign);
        assert_eq!(match_operator("<< 1").unwrap().op, Op::Shl);
        assert_eq!(match_operator("<= 1").unwrap().op, Op::Le);
        assert_eq!(match_operator("< 1").unwrap().op, Op::Lt);
        assert_eq!(match_operator("**2").unwrap().op, Op::Pow);
        assert_eq!(match_operator("*2").unwrap().op, Op::Mul);
        assert_eq!(match_operator("++x").unwrap().op, Op::PreIncr);
    }

    #[test]
    fn no_match_for_unknown_characters() {
        assert!(match_operator("?").is_none());
        assert!(match_operator(",").is_none());
        assert!(match_operator("abc").is_none());
    }

    #[test]
    fn exponent_is_right_associative() {
        let pow = match_operator("**").unwrap();
        assert_eq!(pow.assoc, Assoc::Right);
    }

    #[test]
    fn assignment_family_is_right_associative_and_loosest() {
        for d in OPERATORS {
            if is_assignment(d.op) {
                assert_eq!(d.assoc, Assoc::Right, "{}", d.symbol);
                assert_eq!(d.prec, 14, "{}", d.symbol);
            }
        }
    }

    #[test]
    fn compound_base_covers_family() {
        assert_eq!(compound_base(Op::AddAssign), Some(Op::Add));
        assert_eq!(compound_base(Op::ShrAssign), Some(Op::Shr));
        assert_eq!(compound_base(Op::Assign), None);
        assert!(is_assignment(Op::Assign));
        assert!(!is_assignment(Op::Eq));
    }
}
