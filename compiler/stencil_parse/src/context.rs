//! Builder/Context: one operation per construction need.
//!
//! The grammar engine calls a builder operation each time a production
//! completes; the operation combines already-built child values into a
//! node, or rejects otherwise-grammatical input with a construction error
//! (E2xxx). Construction failures travel the same `ParseError` channel as
//! grammar failures, so the engine cannot tell them apart at the call
//! site.
//!
//! The context also owns the forward-class-name registry — request-scoped
//! state created fresh per parse — and the conditional frame stack that
//! tracks, per branch, which registrations must be rolled back when the
//! branch loses.

use crate::resolve;
use crate::ParseError;
use std::ops::Range;
use stencil_diagnostic::ErrorCode;
use stencil_ir::{
    AliasDef, ClassDef, ClassKeyword, CmpOp, CondBranch, Condition, ConditionalBlock,
    ConstantDef, Decl, Decorator, FromItem, FuncBody, FuncDef, ImportDef, ModuleImport,
    Mutation, Name, NamedTupleField, Param, ParamKind, Span, Spanned, StarKind, StringInterner,
    TypeExpr, TypeExprKind, TypeVarDef, Unit, Version,
};

/// Names the grammar compares against, interned once per parse.
pub(crate) struct KnownNames {
    /// The one condition operand the resolver understands.
    pub version_info: Name,
    /// Inferred type of an integer constant value.
    pub int: Name,
    /// Inferred type of a float constant value.
    pub float: Name,
    /// Base name of the `[T1, T2]` tuple sugar.
    pub tuple: Name,
    /// `NamedTuple` used as a from-import item.
    pub named_tuple: Name,
    /// `TypeVar` used as a from-import item.
    pub type_var: Name,
    /// The wildcard from-import item.
    pub star: Name,
}

impl KnownNames {
    fn new(interner: &StringInterner) -> Self {
        KnownNames {
            version_info: interner.intern("sys.version_info"),
            int: interner.intern("int"),
            float: interner.intern("float"),
            tuple: interner.intern("tuple"),
            named_tuple: interner.intern("NamedTuple"),
            type_var: interner.intern("TypeVar"),
            star: interner.intern("*"),
        }
    }
}

/// The branch currently being parsed inside a conditional frame.
struct OpenBranch {
    /// `None` for the trailing `else` branch.
    condition: Option<Condition>,
    /// Registry length when the branch opened; everything registered at
    /// or past this index belongs to the branch.
    mark: usize,
}

/// One `if`/`elif`/`else` chain in progress.
struct CondFrame {
    branches: Vec<CondBranch>,
    /// Registry range of each closed branch, parallel to `branches`.
    reg_ranges: Vec<Range<usize>>,
    open: OpenBranch,
    /// Registry length when the frame was pushed.
    frame_mark: usize,
}

/// Build context for a single parse.
pub(crate) struct Context<'a> {
    interner: &'a StringInterner,
    target: Version,
    pub(crate) known: KnownNames,
    /// Forward-declared class names, in registration order.
    registry: Vec<(Name, Span)>,
    frames: Vec<CondFrame>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(interner: &'a StringInterner, target: Version) -> Self {
        Context {
            interner,
            target,
            known: KnownNames::new(interner),
            registry: Vec::new(),
            frames: Vec::new(),
        }
    }

    // ── Forward-class-name registry ──────────────────────────────────

    /// Register a class name before its body is parsed, so the body may
    /// reference the class by name.
    pub(crate) fn register_class_name(&mut self, name: Name, span: Span) {
        self.registry.push((name, span));
    }

    /// True if `name` has been registered and not rolled back.
    pub(crate) fn is_class_registered(&self, name: Name) -> bool {
        self.registry.iter().any(|(n, _)| *n == name)
    }

    // ── Conditional blocks ───────────────────────────────────────────

    /// Open a conditional frame with its first guarded branch.
    pub(crate) fn if_begin(&mut self, condition: Condition) {
        let mark = self.registry.len();
        self.frames.push(CondFrame {
            branches: Vec::new(),
            reg_ranges: Vec::new(),
            open: OpenBranch {
                condition: Some(condition),
                mark,
            },
            frame_mark: mark,
        });
    }

    /// Close the open branch with its parsed body and open an `elif`
    /// branch.
    pub(crate) fn if_elif(&mut self, condition: Condition, body: Vec<Decl>) {
        self.close_open_branch(body);
        let mark = self.registry.len();
        if let Some(frame) = self.frames.last_mut() {
            frame.open = OpenBranch {
                condition: Some(condition),
                mark,
            };
        }
    }

    /// Close the open branch and open the unconditional `else` branch.
    pub(crate) fn if_else(&mut self, body: Vec<Decl>) {
        self.close_open_branch(body);
        let mark = self.registry.len();
        if let Some(frame) = self.frames.last_mut() {
            frame.open = OpenBranch {
                condition: None,
                mark,
            };
        }
    }

    /// Close the last branch, resolve the block against the target
    /// version, and return the winning branch's declarations.
    ///
    /// Registrations made by losing branches are rolled back here, in
    /// full; only the winner's survive into the enclosing scope.
    pub(crate) fn if_end(&mut self, body: Vec<Decl>) -> Vec<Decl> {
        self.close_open_branch(body);
        let Some(frame) = self.frames.pop() else {
            debug_assert!(false, "if_end with no open conditional frame");
            return Vec::new();
        };
        let winner = resolve::select_branch(&frame.branches, &self.target);
        let kept: Vec<(Name, Span)> = winner
            .and_then(|index| frame.reg_ranges.get(index).cloned())
            .map(|range| self.registry[range].to_vec())
            .unwrap_or_default();
        self.registry.truncate(frame.frame_mark);
        self.registry.extend(kept);
        resolve::resolve(
            ConditionalBlock {
                branches: frame.branches,
            },
            &self.target,
        )
    }

    fn close_open_branch(&mut self, body: Vec<Decl>) {
        let end = self.registry.len();
        let Some(frame) = self.frames.last_mut() else {
            debug_assert!(false, "conditional branch closed with no open frame");
            return;
        };
        let open = std::mem::replace(
            &mut frame.open,
            OpenBranch {
                condition: None,
                mark: end,
            },
        );
        let body_span = match (body.first(), body.last()) {
            (Some(first), Some(last)) => Some(first.span().merge(last.span())),
            _ => None,
        };
        let span = match (&open.condition, body_span) {
            (Some(condition), Some(body)) => condition.span.merge(body),
            (Some(condition), None) => condition.span,
            (None, Some(body)) => body,
            (None, None) => Span::DUMMY,
        };
        frame.branches.push(CondBranch {
            condition: open.condition,
            body,
            span,
        });
        frame.reg_ranges.push(open.mark..end);
    }

    /// Build a version guard, validating its operands.
    pub(crate) fn new_condition(
        &self,
        left: Name,
        left_span: Span,
        op: CmpOp,
        components: Vec<i64>,
        right_span: Span,
    ) -> Result<Condition, ParseError> {
        if left != self.known.version_info {
            return Err(ParseError::new(
                ErrorCode::E2004,
                format!(
                    "unsupported condition operand `{}`",
                    self.interner.lookup(left)
                ),
                left_span,
            ));
        }
        if components.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E2005,
                "empty version tuple",
                right_span,
            ));
        }
        let mut parts = Vec::with_capacity(components.len());
        for component in components {
            let Ok(part) = u32::try_from(component) else {
                return Err(ParseError::new(
                    ErrorCode::E2005,
                    "version components must be non-negative integers",
                    right_span,
                ));
            };
            parts.push(part);
        }
        Ok(Condition {
            left,
            op,
            right: Version::new(parts),
            span: left_span.merge(right_span),
        })
    }

    /// Error for a non-integer token in a version tuple.
    pub(crate) fn bad_version_component(&self, span: Span) -> ParseError {
        ParseError::new(
            ErrorCode::E2005,
            "version components must be integers",
            span,
        )
    }

    // ── Node construction ────────────────────────────────────────────

    pub(crate) fn new_unit(&self, decls: Vec<Decl>, span: Span) -> Unit {
        Unit { decls, span }
    }

    pub(crate) fn new_class(
        &self,
        name: Name,
        parents: Vec<TypeExpr>,
        keywords: Vec<ClassKeyword>,
        body: Vec<Decl>,
        span: Span,
    ) -> Decl {
        debug_assert!(
            self.is_class_registered(name),
            "class completed without prior registration"
        );
        Decl::Class(ClassDef {
            name,
            parents,
            keywords,
            body,
            span,
        })
    }

    /// Validate and seal a function declaration.
    pub(crate) fn new_function(&self, func: FuncDef) -> Result<Decl, ParseError> {
        self.validate_params(&func.params)?;
        self.validate_mutations(&func.params, &func.mutations)?;
        Ok(Decl::Func(func))
    }

    /// Build a function whose body is externally-implemented code.
    pub(crate) fn new_extern_function(
        &self,
        decorators: Vec<Decorator>,
        name: Name,
        span: Span,
    ) -> Decl {
        Decl::Func(FuncDef {
            name,
            decorators,
            params: Vec::new(),
            ret: TypeExpr::anything(Span::point(span.end)),
            raises: Vec::new(),
            body: FuncBody::Extern,
            mutations: Vec::new(),
            span,
        })
    }

    fn validate_params(&self, params: &[Param]) -> Result<(), ParseError> {
        let mut star_seen = false;
        let mut double_star_seen = false;
        for (index, param) in params.iter().enumerate() {
            if double_star_seen {
                return Err(ParseError::new(
                    ErrorCode::E2001,
                    "no parameter may follow a `**` parameter",
                    param.span,
                ));
            }
            match &param.kind {
                ParamKind::Named {
                    star: StarKind::Star,
                    ..
                }
                | ParamKind::StarMarker => {
                    if star_seen {
                        return Err(ParseError::new(
                            ErrorCode::E2001,
                            "conflicting star parameters",
                            param.span,
                        ));
                    }
                    star_seen = true;
                }
                ParamKind::Named {
                    star: StarKind::DoubleStar,
                    ..
                } => double_star_seen = true,
                ParamKind::EllipsisMarker => {
                    if index + 1 != params.len() {
                        return Err(ParseError::new(
                            ErrorCode::E2001,
                            "`...` must be the last parameter",
                            param.span,
                        ));
                    }
                }
                ParamKind::Named { .. } => {}
            }
        }
        Ok(())
    }

    fn validate_mutations(
        &self,
        params: &[Param],
        mutations: &[Mutation],
    ) -> Result<(), ParseError> {
        for mutation in mutations {
            let is_param = params.iter().any(|p| p.name() == Some(mutation.name));
            if !is_param {
                return Err(ParseError::new(
                    ErrorCode::E2002,
                    format!(
                        "`{}` is not a parameter of this function",
                        self.interner.lookup(mutation.name)
                    ),
                    mutation.span,
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn new_constant(&self, name: Name, ty: TypeExpr, span: Span) -> Decl {
        Decl::Constant(ConstantDef { name, ty, span })
    }

    pub(crate) fn new_alias(&self, name: Name, ty: TypeExpr, span: Span) -> Decl {
        Decl::Alias(AliasDef { name, ty, span })
    }

    pub(crate) fn new_plain_import(&self, items: Vec<ModuleImport>, span: Span) -> Decl {
        Decl::Import(ImportDef::Plain { items, span })
    }

    pub(crate) fn new_from_import(
        &self,
        module: Name,
        items: Vec<FromItem>,
        span: Span,
    ) -> Decl {
        Decl::Import(ImportDef::From {
            module,
            items,
            span,
        })
    }

    /// Build a type-variable declaration from the arguments of its call.
    ///
    /// The first argument must name the declared variable; the rest are
    /// its constraints.
    pub(crate) fn new_typevar(
        &self,
        name: Name,
        args: Vec<TypeExpr>,
        span: Span,
    ) -> Result<Decl, ParseError> {
        let names_itself = matches!(
            args.first(),
            Some(TypeExpr {
                kind: TypeExprKind::Named(first),
                ..
            }) if *first == name
        );
        if !names_itself {
            let at = args.first().map_or(span, |a| a.span);
            return Err(ParseError::new(
                ErrorCode::E2003,
                format!(
                    "type variable `{}` must name itself as its first argument",
                    self.interner.lookup(name)
                ),
                at,
            ));
        }
        let constraints = args.into_iter().skip(1).collect();
        Ok(Decl::TypeVar(TypeVarDef {
            name,
            constraints,
            span,
        }))
    }

    /// Build a named or generic type.
    pub(crate) fn new_type(
        &self,
        base: Name,
        args: Option<Vec<TypeExpr>>,
        span: Span,
    ) -> TypeExpr {
        match args {
            Some(args) => TypeExpr::new(TypeExprKind::Generic { base, args }, span),
            None => TypeExpr::named(base, span),
        }
    }

    /// Build a two-arm union. Chains stay left-nested; nothing flattens.
    pub(crate) fn new_union_type(
        &self,
        left: TypeExpr,
        right: TypeExpr,
        span: Span,
    ) -> TypeExpr {
        TypeExpr::new(
            TypeExprKind::Union {
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub(crate) fn new_named_tuple(
        &self,
        name: Name,
        fields: Vec<NamedTupleField>,
        span: Span,
    ) -> TypeExpr {
        TypeExpr::new(TypeExprKind::NamedTuple { name, fields }, span)
    }
}
