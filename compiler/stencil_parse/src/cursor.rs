//! Token cursor over a pull-based lexer.
//!
//! Holds the single lookahead token the grammar is allowed. Provides
//! access, consumption, and expectation methods; every error constructor
//! first surfaces a pending lexical fault verbatim, so whichever grammar
//! path first trips over a `LexError` token reports the tokenizer's own
//! diagnostic rather than a synthesized one.

use crate::ParseError;
use stencil_diagnostic::ErrorCode;
use stencil_ir::{Name, Span, StringInterner, Token, TokenKind, TokenSource};
use tracing::trace;

/// Cursor over a token source.
///
/// Pulls one token at a time; the current token is the lookahead. The
/// source keeps yielding `Eof` once exhausted, so `advance` past the end
/// is harmless and idempotent.
pub struct Cursor<'a, S: TokenSource> {
    source: S,
    interner: &'a StringInterner,
    current: Token,
    prev_span: Span,
}

impl<'a, S: TokenSource> Cursor<'a, S> {
    /// Create a cursor and pull the first token.
    pub fn new(mut source: S, interner: &'a StringInterner) -> Self {
        let current = source.next_token();
        Cursor {
            source,
            interner,
            current,
            prev_span: Span::DUMMY,
        }
    }

    /// Get a reference to the string interner.
    #[inline]
    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Get the current (lookahead) token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Get the current token's kind.
    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.current.span
    }

    /// Get the span of the most recently consumed token.
    ///
    /// Used to close a node's span after its last child, and as the
    /// anchor span for empty productions.
    #[inline]
    pub fn previous_span(&self) -> Span {
        self.prev_span
    }

    /// Check if at end of input.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    /// Check if the current token matches the given kind exactly.
    ///
    /// Only meaningful for payload-free kinds; use [`check_ident`] for
    /// identifiers.
    ///
    /// [`check_ident`]: Cursor::check_ident
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Check if the current token is an identifier.
    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current.kind, TokenKind::Ident(_))
    }

    /// Consume the current token and pull the next one.
    #[inline]
    pub fn advance(&mut self) -> Token {
        let next = if self.current.kind == TokenKind::Eof {
            // The source would keep yielding Eof; don't bother pulling.
            self.current.clone()
        } else {
            self.source.next_token()
        };
        trace!(
            kind = self.current.kind.display_name(),
            span = %self.current.span,
            "advance"
        );
        self.prev_span = self.current.span;
        std::mem::replace(&mut self.current, next)
    }

    /// Expect the current token to be of the given kind, advance and
    /// return it.
    ///
    /// Split into inline happy path + `#[cold]` error path so the
    /// `format!()` allocations don't prevent inlining the fast case.
    #[inline]
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(kind))
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_error(&self, kind: TokenKind) -> ParseError {
        if let Some(err) = self.surfaced_lex_error() {
            return err;
        }
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {}, found {}",
                kind.display_name(),
                self.current.kind.display_name()
            ),
            self.current.span,
        )
        .with_context(format!("expected {}", kind.display_name()))
    }

    /// Expect and consume an identifier, returning its interned name and
    /// span.
    #[inline]
    pub fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        if let TokenKind::Ident(name) = self.current.kind {
            let token = self.advance();
            Ok((name, token.span))
        } else {
            Err(self.make_expect_ident_error())
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_ident_error(&self) -> ParseError {
        if let Some(err) = self.surfaced_lex_error() {
            return err;
        }
        ParseError::new(
            ErrorCode::E1002,
            format!(
                "expected name, found {}",
                self.current.kind.display_name()
            ),
            self.current.span,
        )
    }

    /// Build an "expected X, found Y" error at the current token without
    /// consuming anything.
    #[cold]
    #[inline(never)]
    pub fn unexpected(&self, code: ErrorCode, expected: &str) -> ParseError {
        if let Some(err) = self.surfaced_lex_error() {
            return err;
        }
        ParseError::new(
            code,
            format!(
                "expected {expected}, found {}",
                self.current.kind.display_name()
            ),
            self.current.span,
        )
    }

    /// If the current token is a lexical fault, turn it into the error to
    /// report: the tokenizer's diagnostic text, verbatim.
    fn surfaced_lex_error(&self) -> Option<ParseError> {
        if let TokenKind::LexError(message) = self.current.kind {
            Some(ParseError::new(
                ErrorCode::E0001,
                self.interner.lookup(message),
                self.current.span,
            ))
        } else {
            None
        }
    }
}
