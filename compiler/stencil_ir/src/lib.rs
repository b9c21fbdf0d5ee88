//! Stencil IR — data definitions for the stub parser.
//!
//! This crate contains the core data structures shared across the
//! workspace:
//! - Spans for source locations (line/column pairs)
//! - Names for interned identifiers, plus the interner
//! - Tokens and the pull-based `TokenSource` lexer contract
//! - Version tuples for conditional compilation
//! - The declaration AST (`Unit`, `ClassDef`, `FuncDef`, ...)
//! - Type expressions and the conditional-block model
//!
//! Everything here is pure data: construction performs only structural
//! checks. Grammar-level and builder-level validation live in
//! `stencil_parse`.

mod cond;
mod decl;
mod interner;
mod name;
mod span;
mod token;
mod ty;
mod version;

pub use cond::{CmpOp, CondBranch, Condition, ConditionalBlock};
pub use decl::{
    AliasDef, ClassDef, ClassKeyword, ConstantDef, Decl, Decorator, DefaultValue, FromItem,
    FuncBody, FuncDef, ImportDef, ModuleImport, Mutation, Param, ParamKind, StarKind, TypeVarDef,
    Unit,
};
pub use interner::StringInterner;
pub use name::Name;
pub use span::{Pos, Span, Spanned};
pub use token::{Token, TokenBuffer, TokenKind, TokenSource};
pub use ty::{NamedTupleField, TypeExpr, TypeExprKind};
pub use version::Version;
