//! Type expression parsing.
//!
//! `or`-unions are left-associative and never flattened; `[a, b]` is
//! sugar for a subscripted `tuple`; `?` and `nothing` are the
//! unconstrained and uninhabited sentinels; `...` is valid only as a
//! type argument. Recursion is guarded against stack overflow.

use crate::stack::ensure_sufficient_stack;
use crate::{ParseError, Parser};
use stencil_diagnostic::ErrorCode;
use stencil_ir::{
    Name, NamedTupleField, Span, TokenKind, TokenSource, TypeExpr, TypeExprKind,
};

impl<S: TokenSource> Parser<'_, S> {
    /// Parse a type expression.
    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        ensure_sufficient_stack(|| {
            let first = self.parse_type_primary()?;
            self.parse_union_rest(first)
        })
    }

    /// Continue a type whose leading dotted name was already consumed.
    ///
    /// Used where the grammar must first look past the name to decide the
    /// production (e.g. `parent` vs `name = type` in a class header).
    pub(crate) fn parse_type_from_name(
        &mut self,
        base: Name,
        base_span: Span,
    ) -> Result<TypeExpr, ParseError> {
        let first = self.parse_type_suffix(base, base_span)?;
        self.parse_union_rest(first)
    }

    /// Fold `or`-chains left to right: `a or b or c` nests as
    /// `((a | b) | c)`.
    fn parse_union_rest(&mut self, first: TypeExpr) -> Result<TypeExpr, ParseError> {
        let mut ty = first;
        while self.check(TokenKind::Or) {
            self.advance();
            let right = self.parse_type_primary()?;
            let span = ty.span.merge(right.span);
            ty = self.ctx.new_union_type(ty, right, span);
        }
        Ok(ty)
    }

    fn parse_type_primary(&mut self) -> Result<TypeExpr, ParseError> {
        match self.current_kind() {
            TokenKind::Ident(_) => {
                let (name, span) = self.parse_dotted_name()?;
                self.parse_type_suffix(name, span)
            }
            TokenKind::Question => {
                let span = self.advance().span;
                Ok(TypeExpr::new(TypeExprKind::Anything, span))
            }
            TokenKind::Nothing => {
                let span = self.advance().span;
                Ok(TypeExpr::new(TypeExprKind::Nothing, span))
            }
            TokenKind::LParen => {
                self.advance();
                let ty = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(ty)
            }
            TokenKind::LBracket => {
                // `[a, b]` — tuple sugar, possibly empty.
                let start = self.advance().span;
                let args = self.comma_separated_until(TokenKind::RBracket, false, |p| {
                    p.parse_type()
                })?;
                self.expect(TokenKind::RBracket)?;
                let span = start.merge(self.previous_span());
                Ok(self.ctx.new_type(self.ctx.known.tuple, Some(args), span))
            }
            TokenKind::NamedTuple => self.parse_named_tuple(),
            _ => Err(self.unexpected(ErrorCode::E1003, "a type")),
        }
    }

    /// Optional subscript after a dotted name: `name[args]`.
    fn parse_type_suffix(
        &mut self,
        base: Name,
        base_span: Span,
    ) -> Result<TypeExpr, ParseError> {
        if self.check(TokenKind::LBracket) {
            self.advance();
            let args = self.comma_separated(|p| p.parse_type_param())?;
            self.expect(TokenKind::RBracket)?;
            let span = base_span.merge(self.previous_span());
            Ok(self.ctx.new_type(base, Some(args), span))
        } else {
            Ok(self.ctx.new_type(base, None, base_span))
        }
    }

    /// A type argument: any type, or the ellipsis placeholder.
    pub(crate) fn parse_type_param(&mut self) -> Result<TypeExpr, ParseError> {
        if self.check(TokenKind::Ellipsis) {
            let span = self.advance().span;
            Ok(TypeExpr::new(TypeExprKind::Ellipsis, span))
        } else {
            self.parse_type()
        }
    }

    /// `NamedTuple(name, [(field, type), ...])`
    fn parse_named_tuple(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.expect(TokenKind::NamedTuple)?.span;
        self.expect(TokenKind::LParen)?;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::Comma)?;
        self.expect(TokenKind::LBracket)?;
        let fields = self.comma_separated_until(
            TokenKind::RBracket,
            true,
            Self::parse_named_tuple_field,
        )?;
        self.expect(TokenKind::RBracket)?;
        self.expect(TokenKind::RParen)?;
        let span = start.merge(self.previous_span());
        Ok(self.ctx.new_named_tuple(name, fields, span))
    }

    fn parse_named_tuple_field(&mut self) -> Result<NamedTupleField, ParseError> {
        let start = self.expect(TokenKind::LParen)?.span;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::Comma)?;
        let ty = self.parse_type()?;
        if self.check(TokenKind::Comma) {
            self.advance();
        }
        self.expect(TokenKind::RParen)?;
        Ok(NamedTupleField {
            name,
            ty,
            span: start.merge(self.previous_span()),
        })
    }
}
