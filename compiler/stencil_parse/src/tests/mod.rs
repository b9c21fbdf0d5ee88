//! Parser integration tests.
//!
//! Sources are lexed by the test-only [`fixture`] tokenizer and parsed
//! through the public entry point.

mod fixture;

use crate::{parse, ParseError};
use stencil_ir::{StringInterner, TokenBuffer, Unit, Version};

/// Lex and parse `source` against `target`.
fn parse_with(
    source: &str,
    target: &[u32],
    interner: &StringInterner,
) -> Result<Unit, ParseError> {
    let tokens = fixture::lex(source, interner);
    parse(TokenBuffer::new(tokens), interner, Version::from(target))
}

/// Parse, panicking with the error on failure.
fn parse_ok(source: &str, target: &[u32], interner: &StringInterner) -> Unit {
    match parse_with(source, target, interner) {
        Ok(unit) => unit,
        Err(err) => panic!("parse failed: {err:?}"),
    }
}

/// Parse, panicking on unexpected success.
fn parse_err(source: &str, target: &[u32], interner: &StringInterner) -> ParseError {
    match parse_with(source, target, interner) {
        Ok(unit) => panic!("parse unexpectedly succeeded: {unit:?}"),
        Err(err) => err,
    }
}
