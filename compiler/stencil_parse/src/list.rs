//! Ordered-list accumulation helpers.
//!
//! Nearly every production in the grammar collects a comma-separated
//! list: parameters, parents, import items, type arguments, named-tuple
//! fields, raises clauses, version components. These helpers keep the
//! loop shape (and its trailing-comma rules) in one place.

use crate::{ParseError, Parser};
use stencil_ir::{TokenKind, TokenSource};

impl<S: TokenSource> Parser<'_, S> {
    /// Parse `elem (',' elem)*` — one or more elements, no trailing comma.
    pub(crate) fn comma_separated<T>(
        &mut self,
        mut elem: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = vec![elem(self)?];
        while self.check(TokenKind::Comma) {
            self.advance();
            items.push(elem(self)?);
        }
        Ok(items)
    }

    /// Parse `(elem (',' elem)* ','?)?` up to (not including) `terminator`.
    ///
    /// Zero elements are accepted; a trailing comma is accepted when
    /// `allow_trailing` is set.
    pub(crate) fn comma_separated_until<T>(
        &mut self,
        terminator: TokenKind,
        allow_trailing: bool,
        mut elem: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();
        if self.check(terminator) {
            return Ok(items);
        }
        loop {
            items.push(elem(self)?);
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
            if allow_trailing && self.check(terminator) {
                break;
            }
        }
        Ok(items)
    }
}
