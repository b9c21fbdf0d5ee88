//! Conditional-compilation data model.
//!
//! A conditional block is the parse-time representation of an
//! `if`/`elif`/`else` chain over version guards. It never survives into
//! the [`Unit`](crate::Unit): the resolver picks the winning branch while
//! the enclosing scope is still being parsed and splices its declarations
//! in place of the block.

use crate::{Decl, Name, Span, Version};
use std::cmp::Ordering;
use std::fmt;

/// Comparison operator of a version guard.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CmpOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    /// Apply the operator to an already-computed ordering.
    pub fn evaluate(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::Le => "<=",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        };
        f.write_str(text)
    }
}

/// One version guard: `left op right`.
///
/// The left operand is a symbolic dotted name; the right operand is a
/// version tuple (a bare integer literal compares as a one-element tuple).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Condition {
    pub left: Name,
    pub op: CmpOp,
    pub right: Version,
    pub span: Span,
}

/// An `if`/`elif`/`else` chain. At most one branch — the last — has no
/// condition.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConditionalBlock {
    pub branches: Vec<CondBranch>,
}

/// One branch of a conditional block.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CondBranch {
    /// `None` for the trailing `else` branch.
    pub condition: Option<Condition>,
    pub body: Vec<Decl>,
    pub span: Span,
}
