//! Recursive descent parser for stub files.
//!
//! The grammar engine pulls tokens from a [`TokenSource`] with exactly one
//! token of lookahead and drives the grammar of the stub language:
//! declarations only, annotated with a restricted type-expression subset,
//! with version-guarded conditional blocks resolved at parse time.
//!
//! A parse yields exactly one [`Unit`] or exactly one located
//! [`ParseError`]; the first failure aborts the parse with no recovery and
//! no partial result.

mod context;
mod cursor;
mod grammar;
mod list;
pub mod resolve;
mod stack;

pub use cursor::Cursor;

use context::Context;
use grammar::DeclScope;
use stencil_diagnostic::ErrorCode;
use stencil_ir::{
    Name, Span, StringInterner, Token, TokenKind, TokenSource, Unit, Version,
};
use tracing::debug;

/// Parser state.
///
/// Owns the token cursor and the build context; everything parsed so far
/// is exclusively owned here until the finished `Unit` is handed back.
pub struct Parser<'a, S: TokenSource> {
    cursor: Cursor<'a, S>,
    ctx: Context<'a>,
}

impl<'a, S: TokenSource> Parser<'a, S> {
    /// Create a new parser over a token source.
    ///
    /// `target` is the runtime version that conditional blocks are
    /// resolved against.
    pub fn new(source: S, interner: &'a StringInterner, target: Version) -> Self {
        Parser {
            cursor: Cursor::new(source, interner),
            ctx: Context::new(interner, target),
        }
    }

    // Cursor delegation - token navigation goes through the underlying Cursor.

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn check_ident(&self) -> bool {
        self.cursor.check_ident()
    }

    #[inline]
    fn advance(&mut self) -> Token {
        self.cursor.advance()
    }

    #[inline]
    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.cursor.expect(kind)
    }

    #[inline]
    fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        self.cursor.expect_ident()
    }

    #[inline]
    fn unexpected(&self, code: ErrorCode, expected: &str) -> ParseError {
        self.cursor.unexpected(code, expected)
    }

    #[inline]
    fn interner(&self) -> &'a StringInterner {
        self.cursor.interner()
    }

    /// Parse a whole stub file.
    pub fn parse_unit(mut self) -> Result<Unit, ParseError> {
        let start = self.current_span();
        // A triple-quoted module docstring may precede the declarations.
        if self.check(TokenKind::TripleQuoted) {
            self.advance();
        }
        let mut decls = Vec::new();
        while !self.is_at_end() {
            self.parse_decl_into(DeclScope::Module, &mut decls)?;
        }
        let span = start.merge(self.previous_span());
        debug!(decls = decls.len(), "parse complete");
        Ok(self.ctx.new_unit(decls, span))
    }
}

/// Parse error: code, message, and location.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Location of the error.
    pub span: Span,
    /// Optional context for labels.
    pub context: Option<String>,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Add context for better labels.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Convert to a full `Diagnostic` for rich reporting.
    pub fn to_diagnostic(&self) -> stencil_diagnostic::Diagnostic {
        stencil_diagnostic::Diagnostic::error(self.code)
            .with_message(self.message.as_str())
            .with_label(self.span, self.context.as_deref().unwrap_or("here"))
    }
}

/// Parse a token stream into a `Unit`.
///
/// Fail-fast: the first lexical, syntax, or construction failure aborts
/// the parse and is returned as the single located error.
pub fn parse<S: TokenSource>(
    source: S,
    interner: &StringInterner,
    target: Version,
) -> Result<Unit, ParseError> {
    Parser::new(source, interner, target).parse_unit()
}

#[cfg(test)]
mod tests;
