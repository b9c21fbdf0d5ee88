//! Declaration AST.
//!
//! A parsed stub file is a [`Unit`]: an ordered sequence of declarations.
//! Source order is preserved throughout — same-named functions and
//! constants stay adjacent and ordered, and merging them into overload
//! sets is a downstream concern.
//!
//! Ownership is a strict tree: children are moved into their parent on
//! construction and no node is ever shared between two parents.

use crate::{Name, Span, Spanned, TypeExpr};

/// A parsed stub file.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Unit {
    pub decls: Vec<Decl>,
    pub span: Span,
}

/// A declaration, at module scope or inside a class body.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Decl {
    Class(ClassDef),
    Func(FuncDef),
    Constant(ConstantDef),
    Import(ImportDef),
    Alias(AliasDef),
    TypeVar(TypeVarDef),
}

impl Decl {
    /// The declared name, where one exists (imports declare several).
    pub fn name(&self) -> Option<Name> {
        match self {
            Decl::Class(c) => Some(c.name),
            Decl::Func(f) => Some(f.name),
            Decl::Constant(c) => Some(c.name),
            Decl::Alias(a) => Some(a.name),
            Decl::TypeVar(t) => Some(t.name),
            Decl::Import(_) => None,
        }
    }
}

impl Spanned for Decl {
    fn span(&self) -> Span {
        match self {
            Decl::Class(c) => c.span,
            Decl::Func(f) => f.span,
            Decl::Constant(c) => c.span,
            Decl::Import(i) => i.span(),
            Decl::Alias(a) => a.span,
            Decl::TypeVar(t) => t.span,
        }
    }
}

/// A class declaration.
///
/// The class name is registered with the parse context before the body is
/// parsed, so body annotations may refer to the class itself.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassDef {
    pub name: Name,
    /// Positional parent types, in source order.
    pub parents: Vec<TypeExpr>,
    /// `name = type` entries from the class header (e.g. a metaclass).
    pub keywords: Vec<ClassKeyword>,
    /// Body declarations; conditionals are resolved before the class
    /// node completes, so only surviving declarations appear here.
    pub body: Vec<Decl>,
    pub span: Span,
}

/// A `name = type` entry in a class header.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassKeyword {
    pub name: Name,
    pub value: TypeExpr,
    pub span: Span,
}

/// A function declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FuncDef {
    pub name: Name,
    pub decorators: Vec<Decorator>,
    pub params: Vec<Param>,
    /// Return type; the Anything sentinel when omitted.
    pub ret: TypeExpr,
    /// Types named in a `raises` clause, in source order.
    pub raises: Vec<TypeExpr>,
    pub body: FuncBody,
    /// `name := type` body statements, re-typing a parameter on exit.
    pub mutations: Vec<Mutation>,
    pub span: Span,
}

/// A decorator: `@` followed by a dotted name.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Decorator {
    pub name: Name,
    pub span: Span,
}

/// What stood in for the function's body.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FuncBody {
    /// `...`, an indented docstring, or no body at all.
    Ellipsis,
    /// `pass`.
    Pass,
    /// The externally-implemented-code marker.
    Extern,
}

/// A `name := type` statement in a function body.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Mutation {
    pub name: Name,
    pub ty: TypeExpr,
    pub span: Span,
}

/// A single entry of a parameter list.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub kind: ParamKind,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParamKind {
    Named {
        name: Name,
        ty: Option<TypeExpr>,
        default: Option<DefaultValue>,
        star: StarKind,
    },
    /// A lone `*` separating positional from named-only parameters,
    /// retained as a marker.
    StarMarker,
    /// `...` — the rest of the signature is unspecified. Always last.
    EllipsisMarker,
}

impl Param {
    /// The binding name, if this entry has one.
    pub fn name(&self) -> Option<Name> {
        match &self.kind {
            ParamKind::Named { name, .. } => Some(*name),
            ParamKind::StarMarker | ParamKind::EllipsisMarker => None,
        }
    }

    pub fn star(&self) -> StarKind {
        match &self.kind {
            ParamKind::Named { star, .. } => *star,
            ParamKind::StarMarker => StarKind::Star,
            ParamKind::EllipsisMarker => StarKind::None,
        }
    }
}

/// Star marker on a named parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum StarKind {
    #[default]
    None,
    /// `*args`
    Star,
    /// `**kwargs`
    DoubleStar,
}

/// Default value of a parameter. The value itself only matters as a
/// marker; downstream consumers care that a default exists.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DefaultValue {
    Name(Name),
    Int(i64),
    /// Float bits, for `Eq`/`Hash`.
    Float(u64),
    Ellipsis,
}

/// A typed module-level or class-level constant.
///
/// Repeated constants with the same name at the same scope are legal and
/// preserved in source order.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConstantDef {
    pub name: Name,
    /// Explicit annotation, or the inferred type of the value form.
    pub ty: TypeExpr,
    pub span: Span,
}

/// A `name = type` alias at module scope.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AliasDef {
    pub name: Name,
    pub ty: TypeExpr,
    pub span: Span,
}

/// An import declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ImportDef {
    /// `import a.b, c as d`
    Plain { items: Vec<ModuleImport>, span: Span },
    /// `from a.b import x, y as z` / `from a.b import *`
    From {
        module: Name,
        items: Vec<FromItem>,
        span: Span,
    },
}

impl Spanned for ImportDef {
    fn span(&self) -> Span {
        match self {
            ImportDef::Plain { span, .. } | ImportDef::From { span, .. } => *span,
        }
    }
}

/// One `module (as alias)?` item of a plain import.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ModuleImport {
    pub module: Name,
    pub alias: Option<Name>,
    pub span: Span,
}

/// One `name (as alias)?` item of a from-import. The wildcard import is
/// the interned name `*`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FromItem {
    pub name: Name,
    pub alias: Option<Name>,
    pub span: Span,
}

/// A type-variable declaration: `T = TypeVar('T', constraint, ...)`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeVarDef {
    pub name: Name,
    pub constraints: Vec<TypeExpr>,
    pub span: Span,
}
