//! Type expressions.
//!
//! The restricted expression subset legal in stub annotations: dotted
//! names, subscripted generics, left-associative `or` unions, the
//! anything/nothing sentinels, the ellipsis placeholder, and inline
//! named-tuple literals.

use crate::{Name, Span, Spanned};

/// A type expression with its source span.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeExprKind {
    /// A dotted name: `int`, `collections.OrderedDict`.
    Named(Name),
    /// A subscripted generic: `list[int]`, `dict[str, int]`.
    Generic { base: Name, args: Vec<TypeExpr> },
    /// A two-arm union. Chains are left-nested and never flattened:
    /// `a or b or c` is `Union(Union(a, b), c)`.
    Union {
        left: Box<TypeExpr>,
        right: Box<TypeExpr>,
    },
    /// The unconstrained sentinel (`?`).
    Anything,
    /// The uninhabited bottom sentinel (`nothing`).
    Nothing,
    /// The ellipsis placeholder, valid as a type argument.
    Ellipsis,
    /// An inline named-tuple literal with ordered, typed fields.
    NamedTuple {
        name: Name,
        fields: Vec<NamedTupleField>,
    },
}

impl TypeExpr {
    #[inline]
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        TypeExpr { kind, span }
    }

    pub fn named(name: Name, span: Span) -> Self {
        TypeExpr::new(TypeExprKind::Named(name), span)
    }

    pub fn anything(span: Span) -> Self {
        TypeExpr::new(TypeExprKind::Anything, span)
    }

    /// True for the unconstrained sentinel.
    pub fn is_anything(&self) -> bool {
        matches!(self.kind, TypeExprKind::Anything)
    }
}

impl Spanned for TypeExpr {
    fn span(&self) -> Span {
        self.span
    }
}

/// One `(name, type)` field of a named-tuple literal.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct NamedTupleField {
    pub name: Name,
    pub ty: TypeExpr,
    pub span: Span,
}
