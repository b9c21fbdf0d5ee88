//! Grammar modules.
//!
//! Each module extends `Parser` with methods for a group of productions:
//!
//! - [`item`]: declaration dispatch, constants, aliases, imports,
//!   type variables
//! - [`class`]: class declarations and class bodies
//! - [`func`]: function declarations, parameter lists, bodies
//! - [`ty`]: type expressions
//! - [`cond`]: version-guarded conditional blocks
//!
//! The parser is recursive descent with exactly one token of lookahead;
//! a production that cannot be extended by the current token fails with a
//! located error and the whole parse aborts.

mod class;
mod cond;
mod func;
mod item;
mod ty;

use crate::{ParseError, Parser};
use stencil_ir::{Name, Span, TokenKind, TokenSource};

/// Where a declaration appears. Class bodies admit a narrower set of
/// declarations than module scope.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum DeclScope {
    Module,
    Class,
}

impl<S: TokenSource> Parser<'_, S> {
    /// Parse a dotted name (`a`, `a.b.c`) into a single interned name.
    pub(crate) fn parse_dotted_name(&mut self) -> Result<(Name, Span), ParseError> {
        let (first, first_span) = self.expect_ident()?;
        if !self.check(TokenKind::Dot) {
            return Ok((first, first_span));
        }
        let mut text = self.interner().lookup(first).to_owned();
        let mut span = first_span;
        while self.check(TokenKind::Dot) {
            self.advance();
            let (segment, segment_span) = self.expect_ident()?;
            text.push('.');
            text.push_str(self.interner().lookup(segment));
            span = span.merge(segment_span);
        }
        Ok((self.interner().intern(&text), span))
    }

    /// True if positioned at `pass` or `...`, the two empty-body markers.
    pub(crate) fn check_pass_or_ellipsis(&self) -> bool {
        self.check(TokenKind::Pass) || self.check(TokenKind::Ellipsis)
    }
}
