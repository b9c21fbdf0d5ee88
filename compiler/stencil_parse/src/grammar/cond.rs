//! Version-guarded conditional blocks.
//!
//! Valid at module and class scope with one shared condition grammar.
//! The builder's `if_*` operations accumulate the branches; `if_end`
//! resolves the block against the target version and hands back only the
//! winning branch's declarations, which the caller splices into the
//! enclosing scope.

use crate::grammar::DeclScope;
use crate::{ParseError, Parser};
use stencil_diagnostic::ErrorCode;
use stencil_ir::{CmpOp, Condition, Decl, Span, TokenKind, TokenSource};

impl<S: TokenSource> Parser<'_, S> {
    /// `'if' condition ':' block ('elif' condition ':' block)*
    /// ('else' ':' block)?` — resolved on the spot.
    pub(crate) fn parse_conditional(
        &mut self,
        scope: DeclScope,
    ) -> Result<Vec<Decl>, ParseError> {
        self.expect(TokenKind::If)?;
        let condition = self.parse_condition()?;
        self.ctx.if_begin(condition);
        self.expect(TokenKind::Colon)?;
        let mut pending = self.parse_cond_block(scope)?;
        loop {
            if self.check(TokenKind::Elif) {
                self.advance();
                let condition = self.parse_condition()?;
                self.ctx.if_elif(condition, pending);
                self.expect(TokenKind::Colon)?;
                pending = self.parse_cond_block(scope)?;
            } else if self.check(TokenKind::Else) {
                self.advance();
                self.ctx.if_else(pending);
                self.expect(TokenKind::Colon)?;
                let body = self.parse_cond_block(scope)?;
                return Ok(self.ctx.if_end(body));
            } else {
                return Ok(self.ctx.if_end(pending));
            }
        }
    }

    /// An indented run of declarations, in the enclosing scope's grammar.
    fn parse_cond_block(&mut self, scope: DeclScope) -> Result<Vec<Decl>, ParseError> {
        self.expect(TokenKind::Indent)?;
        let mut decls = Vec::new();
        while !self.check(TokenKind::Dedent) {
            self.parse_decl_into(scope, &mut decls)?;
        }
        self.expect(TokenKind::Dedent)?;
        Ok(decls)
    }

    /// `dotted_name cmp_op (version_tuple | integer)`
    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let (left, left_span) = self.parse_dotted_name()?;
        let op = self.parse_cmp_op()?;
        let (components, right_span) = self.parse_version_operand()?;
        self.ctx
            .new_condition(left, left_span, op, components, right_span)
    }

    fn parse_cmp_op(&mut self) -> Result<CmpOp, ParseError> {
        let op = match self.current_kind() {
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::Gt => CmpOp::Gt,
            TokenKind::Le => CmpOp::Le,
            TokenKind::Ge => CmpOp::Ge,
            TokenKind::EqEq => CmpOp::Eq,
            TokenKind::Ne => CmpOp::Ne,
            _ => return Err(self.unexpected(ErrorCode::E1001, "a comparison operator")),
        };
        self.advance();
        Ok(op)
    }

    /// A parenthesized tuple of integers, or one bare integer (which
    /// compares as a one-element tuple).
    fn parse_version_operand(&mut self) -> Result<(Vec<i64>, Span), ParseError> {
        match self.current_kind() {
            TokenKind::Int(value) => {
                let span = self.advance().span;
                Ok((vec![value], span))
            }
            TokenKind::Float(_) => Err(self.ctx.bad_version_component(self.current_span())),
            TokenKind::LParen => {
                let start = self.advance().span;
                let components =
                    self.comma_separated_until(TokenKind::RParen, true, |p| {
                        match p.current_kind() {
                            TokenKind::Int(value) => {
                                p.advance();
                                Ok(value)
                            }
                            TokenKind::Float(_) => {
                                Err(p.ctx.bad_version_component(p.current_span()))
                            }
                            _ => Err(p.unexpected(ErrorCode::E1001, "an integer")),
                        }
                    })?;
                self.expect(TokenKind::RParen)?;
                Ok((components, start.merge(self.previous_span())))
            }
            _ => Err(self.unexpected(ErrorCode::E1001, "a version tuple")),
        }
    }
}
