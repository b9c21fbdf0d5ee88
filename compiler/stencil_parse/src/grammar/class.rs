//! Class declarations.
//!
//! The class name is registered with the context *before* the body is
//! parsed, so annotations inside the body may reference the class itself.
//! Class bodies admit functions, constants, and nested conditionals; the
//! conditionals are resolved before the class node completes.

use crate::grammar::DeclScope;
use crate::{ParseError, Parser};
use stencil_diagnostic::ErrorCode;
use stencil_ir::{ClassKeyword, Decl, TokenKind, TokenSource, TypeExpr};

impl<S: TokenSource> Parser<'_, S> {
    /// `class NAME parents? ':' class_body`
    pub(crate) fn parse_class(&mut self) -> Result<Decl, ParseError> {
        let start = self.expect(TokenKind::Class)?.span;
        let (name, name_span) = self.expect_ident()?;
        self.ctx.register_class_name(name, name_span);

        let mut parents = Vec::new();
        let mut keywords = Vec::new();
        if self.check(TokenKind::LParen) {
            self.advance();
            if !self.check(TokenKind::RParen) {
                loop {
                    self.parse_parent(&mut parents, &mut keywords)?;
                    if !self.check(TokenKind::Comma) {
                        break;
                    }
                    self.advance();
                }
            }
            self.expect(TokenKind::RParen)?;
        }

        self.expect(TokenKind::Colon)?;
        let body = self.parse_class_body()?;
        let span = start.merge(self.previous_span());
        Ok(self.ctx.new_class(name, parents, keywords, body, span))
    }

    /// One entry of the parent list: a parent type, or a `name = type`
    /// keyword entry (e.g. a metaclass selector).
    fn parse_parent(
        &mut self,
        parents: &mut Vec<TypeExpr>,
        keywords: &mut Vec<ClassKeyword>,
    ) -> Result<(), ParseError> {
        if self.check_ident() {
            let (name, name_span) = self.parse_dotted_name()?;
            if self.check(TokenKind::Assign) {
                self.advance();
                let value = self.parse_type()?;
                let span = name_span.merge(value.span);
                keywords.push(ClassKeyword { name, value, span });
            } else {
                let parent = self.parse_type_from_name(name, name_span)?;
                parents.push(parent);
            }
        } else {
            parents.push(self.parse_type()?);
        }
        Ok(())
    }

    /// Class body: an inline `pass`/`...`, or an indented block with an
    /// optional docstring followed by either an empty-body marker or
    /// declarations.
    fn parse_class_body(&mut self) -> Result<Vec<Decl>, ParseError> {
        if self.check_pass_or_ellipsis() {
            self.advance();
            return Ok(Vec::new());
        }
        if !self.check(TokenKind::Indent) {
            return Err(self.unexpected(ErrorCode::E1005, "a class body"));
        }
        self.advance();
        if self.check(TokenKind::TripleQuoted) {
            self.advance();
        }
        let mut body = Vec::new();
        if self.check_pass_or_ellipsis() {
            self.advance();
        } else {
            while !self.check(TokenKind::Dedent) {
                self.parse_decl_into(DeclScope::Class, &mut body)?;
            }
        }
        self.expect(TokenKind::Dedent)?;
        Ok(body)
    }
}
