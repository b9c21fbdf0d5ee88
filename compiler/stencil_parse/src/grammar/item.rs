//! Declaration dispatch and simple declarations.
//!
//! Covers the name-led forms (constants, aliases, type-variable calls),
//! imports, and the per-scope declaration dispatcher that the unit loop,
//! class bodies, and conditional branches all share.

use crate::grammar::DeclScope;
use crate::{ParseError, Parser};
use stencil_diagnostic::ErrorCode;
use stencil_ir::{
    Decl, FromItem, ModuleImport, Name, Span, TokenKind, TokenSource, TypeExpr,
};

impl<S: TokenSource> Parser<'_, S> {
    /// Parse one declaration (or a conditional block's worth of them)
    /// into `out`.
    pub(crate) fn parse_decl_into(
        &mut self,
        scope: DeclScope,
        out: &mut Vec<Decl>,
    ) -> Result<(), ParseError> {
        match self.current_kind() {
            TokenKind::Class if scope == DeclScope::Module => {
                let class = self.parse_class()?;
                out.push(class);
            }
            TokenKind::Def | TokenKind::At => {
                let func = self.parse_func()?;
                out.push(func);
            }
            TokenKind::If => {
                let mut resolved = self.parse_conditional(scope)?;
                out.append(&mut resolved);
            }
            TokenKind::Import | TokenKind::From if scope == DeclScope::Module => {
                let import = self.parse_import()?;
                out.push(import);
            }
            TokenKind::Ident(_) => {
                let decl = self.parse_name_led(scope)?;
                out.push(decl);
            }
            _ => return Err(self.unexpected(ErrorCode::E1004, "a declaration")),
        }
        Ok(())
    }

    /// Parse a declaration that starts with a plain name: a typed or
    /// value-inferred constant, a type alias, or a type-variable call.
    fn parse_name_led(&mut self, scope: DeclScope) -> Result<Decl, ParseError> {
        let (name, name_span) = self.expect_ident()?;
        match self.current_kind() {
            TokenKind::Colon => {
                self.advance();
                let ty = self.parse_type()?;
                // `x: t = ...` — the value placeholder adds nothing.
                if self.check(TokenKind::Assign) {
                    self.advance();
                    self.expect(TokenKind::Ellipsis)?;
                }
                let span = name_span.merge(self.previous_span());
                Ok(self.ctx.new_constant(name, ty, span))
            }
            TokenKind::Assign => {
                self.advance();
                self.parse_assigned_decl(scope, name, name_span)
            }
            _ => Err(self.unexpected(ErrorCode::E1001, "`:` or `=`")),
        }
    }

    /// The right-hand side of `name = ...`: a literal-typed constant, an
    /// ellipsis placeholder (optionally typed by a type comment), a
    /// type-variable call, or — at module scope only — a type alias.
    fn parse_assigned_decl(
        &mut self,
        scope: DeclScope,
        name: Name,
        name_span: Span,
    ) -> Result<Decl, ParseError> {
        match self.current_kind() {
            TokenKind::Int(_) => {
                let token = self.advance();
                let ty = TypeExpr::named(self.ctx.known.int, token.span);
                Ok(self.ctx.new_constant(name, ty, name_span.merge(token.span)))
            }
            TokenKind::Float(_) => {
                let token = self.advance();
                let ty = TypeExpr::named(self.ctx.known.float, token.span);
                Ok(self.ctx.new_constant(name, ty, name_span.merge(token.span)))
            }
            TokenKind::Ellipsis => {
                let token = self.advance();
                let ty = if self.check(TokenKind::TypeComment) {
                    self.advance();
                    self.parse_type()?
                } else {
                    TypeExpr::anything(token.span)
                };
                let span = name_span.merge(self.previous_span());
                Ok(self.ctx.new_constant(name, ty, span))
            }
            TokenKind::TypeVar if scope == DeclScope::Module => {
                self.parse_typevar_call(name, name_span)
            }
            _ if scope == DeclScope::Module => {
                let ty = self.parse_type()?;
                let span = name_span.merge(ty.span);
                Ok(self.ctx.new_alias(name, ty, span))
            }
            _ => Err(self.unexpected(ErrorCode::E1001, "a constant value")),
        }
    }

    /// `name = TypeVar(name, constraint*)`
    fn parse_typevar_call(&mut self, name: Name, name_span: Span) -> Result<Decl, ParseError> {
        self.advance();
        self.expect(TokenKind::LParen)?;
        let args = self.comma_separated(|p| p.parse_type_param())?;
        self.expect(TokenKind::RParen)?;
        let span = name_span.merge(self.previous_span());
        self.ctx.new_typevar(name, args, span)
    }

    /// `import a.b, c as d` or `from a.b import items`.
    fn parse_import(&mut self) -> Result<Decl, ParseError> {
        if self.check(TokenKind::Import) {
            let start = self.advance().span;
            let items = self.comma_separated(|p| {
                let (module, span) = p.parse_dotted_name()?;
                let alias = p.parse_as_alias()?;
                Ok(ModuleImport {
                    module,
                    alias,
                    span: span.merge(p.previous_span()),
                })
            })?;
            let span = start.merge(self.previous_span());
            Ok(self.ctx.new_plain_import(items, span))
        } else {
            let start = self.expect(TokenKind::From)?.span;
            let (module, _) = self.parse_dotted_name()?;
            self.expect(TokenKind::Import)?;
            let items = if self.check(TokenKind::LParen) {
                self.advance();
                let items = self.comma_separated_until(
                    TokenKind::RParen,
                    true,
                    Self::parse_from_item,
                )?;
                if items.is_empty() {
                    return Err(self.unexpected(ErrorCode::E1001, "an import item"));
                }
                self.expect(TokenKind::RParen)?;
                items
            } else {
                self.comma_separated(Self::parse_from_item)?
            };
            let span = start.merge(self.previous_span());
            Ok(self.ctx.new_from_import(module, items, span))
        }
    }

    fn parse_from_item(&mut self) -> Result<FromItem, ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let span = self.advance().span;
                let alias = self.parse_as_alias()?;
                Ok(FromItem {
                    name,
                    alias,
                    span: span.merge(self.previous_span()),
                })
            }
            // The literal names of the two built-in calls may be imported.
            TokenKind::NamedTuple => {
                let span = self.advance().span;
                Ok(FromItem {
                    name: self.ctx.known.named_tuple,
                    alias: None,
                    span,
                })
            }
            TokenKind::TypeVar => {
                let span = self.advance().span;
                Ok(FromItem {
                    name: self.ctx.known.type_var,
                    alias: None,
                    span,
                })
            }
            TokenKind::Star => {
                let span = self.advance().span;
                Ok(FromItem {
                    name: self.ctx.known.star,
                    alias: None,
                    span,
                })
            }
            _ => Err(self.unexpected(ErrorCode::E1001, "an import item")),
        }
    }

    /// `as name`, when present.
    fn parse_as_alias(&mut self) -> Result<Option<Name>, ParseError> {
        if self.check(TokenKind::As) {
            self.advance();
            let (alias, _) = self.expect_ident()?;
            Ok(Some(alias))
        } else {
            Ok(None)
        }
    }
}
