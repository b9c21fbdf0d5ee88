//! Test-only tokenizer.
//!
//! The production tokenizer is an external collaborator; the suite still
//! reads best against source text, so this minimal line-based tokenizer
//! covers exactly what the tests exercise: indentation blocks, keywords,
//! numbers, quoted names, docstrings, and inline type comments. It is
//! deliberately not exported.

use stencil_ir::{Pos, Span, StringInterner, Token, TokenKind};

/// Tokenize `source`. The trailing `Eof` is supplied by `TokenBuffer`.
pub(crate) fn lex(source: &str, interner: &StringInterner) -> Vec<Token> {
    Lexer {
        interner,
        tokens: Vec::new(),
        indents: vec![0],
        depth: 0,
    }
    .run(source)
}

struct Lexer<'a> {
    interner: &'a StringInterner,
    tokens: Vec<Token>,
    /// Indentation stack, in columns; starts at [0].
    indents: Vec<usize>,
    /// Bracket nesting depth; indentation is ignored inside brackets.
    depth: usize,
}

impl Lexer<'_> {
    fn run(mut self, source: &str) -> Vec<Token> {
        let lines: Vec<&str> = source.lines().collect();
        let mut i = 0;
        let mut last_line = 1;
        while i < lines.len() {
            let line = lines[i];
            let line_no = u32::try_from(i + 1).unwrap_or(u32::MAX);
            let bytes = line.as_bytes();
            let indent = bytes.iter().take_while(|&&b| b == b' ').count();
            let rest = &bytes[indent..];
            if rest.is_empty() || rest[0] == b'\n' || (rest[0] == b'#' && !is_type_comment(rest))
            {
                i += 1;
                continue;
            }
            last_line = line_no;
            if self.depth == 0 {
                self.handle_indent(indent, line_no);
            }
            if let Some(open) = self.scan_line(line_no, bytes, indent) {
                // Inside a triple-quoted string; swallow lines until the
                // closing delimiter.
                i = self.finish_triple(&lines, i, open);
            }
            i += 1;
        }
        // Close any open blocks at end of input.
        let eof_pos = Pos::new(last_line, 1);
        while self.indents.len() > 1 {
            self.indents.pop();
            self.tokens
                .push(Token::new(TokenKind::Dedent, Span::point(eof_pos)));
        }
        self.tokens
    }

    fn handle_indent(&mut self, indent: usize, line_no: u32) {
        let current = *self.indents.last().unwrap_or(&0);
        if indent > current {
            self.indents.push(indent);
            let span = Span::new(
                Pos::new(line_no, 1),
                Pos::new(line_no, u32::try_from(indent).unwrap_or(u32::MAX)),
            );
            self.tokens.push(Token::new(TokenKind::Indent, span));
        } else if indent < current {
            let span = Span::point(Pos::new(line_no, 1));
            while *self.indents.last().unwrap_or(&0) > indent {
                self.indents.pop();
                self.tokens.push(Token::new(TokenKind::Dedent, span));
            }
            if *self.indents.last().unwrap_or(&0) != indent {
                self.push_error(span, "inconsistent indentation");
            }
        }
    }

    /// Scan one line's tokens. Returns the start of an unterminated
    /// triple-quoted string, if the line opened one.
    fn scan_line(&mut self, line_no: u32, bytes: &[u8], start: usize) -> Option<OpenTriple> {
        let mut j = start;
        while j < bytes.len() {
            let b = bytes[j];
            if b == b' ' {
                j += 1;
                continue;
            }
            if b == b'#' {
                if is_type_comment(&bytes[j..]) {
                    let end = j + TYPE_COMMENT.len();
                    self.push(TokenKind::TypeComment, line_no, j, end);
                    j = end;
                    continue;
                }
                break;
            }
            if b == b'"' || b == b'\'' {
                match self.scan_quoted(line_no, bytes, j) {
                    Quoted::Consumed(next) => {
                        j = next;
                        continue;
                    }
                    Quoted::OpenTriple(open) => return Some(open),
                }
            }
            if b.is_ascii_alphabetic() || b == b'_' {
                let end = scan_while(bytes, j, |c| c.is_ascii_alphanumeric() || c == b'_');
                let word = text(bytes, j, end);
                let kind = self.keyword_or_ident(word);
                self.push(kind, line_no, j, end);
                j = end;
                continue;
            }
            if b.is_ascii_digit() || (b == b'-' && digit_follows(bytes, j + 1)) {
                j = self.scan_number(line_no, bytes, j);
                continue;
            }
            j = self.scan_punct(line_no, bytes, j);
        }
        None
    }

    fn keyword_or_ident(&self, word: &str) -> TokenKind {
        match word {
            "class" => TokenKind::Class,
            "def" => TokenKind::Def,
            "if" => TokenKind::If,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "import" => TokenKind::Import,
            "from" => TokenKind::From,
            "as" => TokenKind::As,
            "pass" => TokenKind::Pass,
            "raise" => TokenKind::Raise,
            "raises" => TokenKind::Raises,
            "or" => TokenKind::Or,
            "nothing" => TokenKind::Nothing,
            "NamedTuple" => TokenKind::NamedTuple,
            "TypeVar" => TokenKind::TypeVar,
            "EXTERNCODE" => TokenKind::ExternCode,
            _ => TokenKind::Ident(self.interner.intern(word)),
        }
    }

    fn scan_number(&mut self, line_no: u32, bytes: &[u8], start: usize) -> usize {
        let mut end = start;
        if bytes[end] == b'-' {
            end += 1;
        }
        end = scan_while(bytes, end, |c| c.is_ascii_digit());
        let is_float = end < bytes.len() && bytes[end] == b'.' && digit_follows(bytes, end + 1);
        if is_float {
            end = scan_while(bytes, end + 1, |c| c.is_ascii_digit());
            match text(bytes, start, end).parse::<f64>() {
                Ok(value) => self.push(TokenKind::Float(value.to_bits()), line_no, start, end),
                Err(_) => self.push_error_at(line_no, start, end, "malformed number"),
            }
        } else {
            match text(bytes, start, end).parse::<i64>() {
                Ok(value) => self.push(TokenKind::Int(value), line_no, start, end),
                Err(_) => self.push_error_at(line_no, start, end, "malformed number"),
            }
        }
        end
    }

    fn scan_quoted(&mut self, line_no: u32, bytes: &[u8], start: usize) -> Quoted {
        let quote = bytes[start];
        let triple = bytes[start..].len() >= 3 && bytes[start + 1] == quote && bytes[start + 2] == quote;
        if triple {
            let delim = [quote; 3];
            if let Some(offset) = find(&bytes[start + 3..], &delim) {
                let end = start + 3 + offset + 3;
                self.push(TokenKind::TripleQuoted, line_no, start, end);
                Quoted::Consumed(end)
            } else {
                Quoted::OpenTriple(OpenTriple {
                    start: Pos::new(line_no, u32::try_from(start + 1).unwrap_or(u32::MAX)),
                    delim: quote,
                })
            }
        } else {
            match find_byte(&bytes[start + 1..], quote) {
                Some(offset) => {
                    let end = start + 1 + offset + 1;
                    let content = text(bytes, start + 1, end - 1);
                    self.push(
                        TokenKind::Ident(self.interner.intern(content)),
                        line_no,
                        start,
                        end,
                    );
                    Quoted::Consumed(end)
                }
                None => {
                    self.push_error_at(line_no, start, bytes.len(), "unterminated string literal");
                    Quoted::Consumed(bytes.len())
                }
            }
        }
    }

    /// Consume lines until the triple-quote terminator; returns the index
    /// of the line containing it. The remainder of that line is skipped.
    fn finish_triple(&mut self, lines: &[&str], mut i: usize, open: OpenTriple) -> usize {
        let delim = [open.delim; 3];
        loop {
            i += 1;
            let Some(line) = lines.get(i) else {
                self.tokens.push(Token::new(
                    TokenKind::LexError(self.interner.intern("unterminated docstring")),
                    Span::point(open.start),
                ));
                return i - 1;
            };
            if let Some(offset) = find(line.as_bytes(), &delim) {
                let line_no = u32::try_from(i + 1).unwrap_or(u32::MAX);
                let end = Pos::new(line_no, u32::try_from(offset + 3).unwrap_or(u32::MAX));
                self.tokens
                    .push(Token::new(TokenKind::TripleQuoted, Span::new(open.start, end)));
                return i;
            }
        }
    }

    fn scan_punct(&mut self, line_no: u32, bytes: &[u8], j: usize) -> usize {
        const TWO_BYTE: [(&[u8], TokenKind); 6] = [
            (b"->", TokenKind::Arrow),
            (b":=", TokenKind::ColonEquals),
            (b"==", TokenKind::EqEq),
            (b"!=", TokenKind::Ne),
            (b"<=", TokenKind::Le),
            (b">=", TokenKind::Ge),
        ];
        if bytes[j..].starts_with(b"...") {
            self.push(TokenKind::Ellipsis, line_no, j, j + 3);
            return j + 3;
        }
        for (pattern, kind) in TWO_BYTE {
            if bytes[j..].starts_with(pattern) {
                self.push(kind, line_no, j, j + 2);
                return j + 2;
            }
        }
        let kind = match bytes[j] {
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b'=' => TokenKind::Assign,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b'(' => {
                self.depth += 1;
                TokenKind::LParen
            }
            b')' => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RParen
            }
            b'[' => {
                self.depth += 1;
                TokenKind::LBracket
            }
            b']' => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RBracket
            }
            b'*' => TokenKind::Star,
            b'@' => TokenKind::At,
            b'?' => TokenKind::Question,
            b'.' => TokenKind::Dot,
            other => {
                let message = format!("unrecognized character `{}`", char::from(other));
                self.push_error_at(line_no, j, j + 1, &message);
                return j + 1;
            }
        };
        self.push(kind, line_no, j, j + 1);
        j + 1
    }

    fn push(&mut self, kind: TokenKind, line_no: u32, start: usize, end: usize) {
        let span = Span::new(
            Pos::new(line_no, u32::try_from(start + 1).unwrap_or(u32::MAX)),
            Pos::new(line_no, u32::try_from(end).unwrap_or(u32::MAX)),
        );
        self.tokens.push(Token::new(kind, span));
    }

    fn push_error_at(&mut self, line_no: u32, start: usize, end: usize, message: &str) {
        let span = Span::new(
            Pos::new(line_no, u32::try_from(start + 1).unwrap_or(u32::MAX)),
            Pos::new(line_no, u32::try_from(end).unwrap_or(u32::MAX)),
        );
        self.push_error(span, message);
    }

    fn push_error(&mut self, span: Span, message: &str) {
        self.tokens.push(Token::new(
            TokenKind::LexError(self.interner.intern(message)),
            span,
        ));
    }
}

struct OpenTriple {
    start: Pos,
    delim: u8,
}

enum Quoted {
    Consumed(usize),
    OpenTriple(OpenTriple),
}

const TYPE_COMMENT: &str = "# type:";

fn is_type_comment(rest: &[u8]) -> bool {
    rest.starts_with(TYPE_COMMENT.as_bytes())
}

fn digit_follows(bytes: &[u8], at: usize) -> bool {
    bytes.get(at).is_some_and(u8::is_ascii_digit)
}

fn scan_while(bytes: &[u8], mut j: usize, pred: impl Fn(u8) -> bool) -> usize {
    while j < bytes.len() && pred(bytes[j]) {
        j += 1;
    }
    j
}

fn text(bytes: &[u8], start: usize, end: usize) -> &str {
    std::str::from_utf8(&bytes[start..end]).unwrap_or("")
}

fn find_byte(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
