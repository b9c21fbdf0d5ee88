//! Function declarations.
//!
//! Decorators, parameter lists (including star parameters and the lone
//! `*` separator), the optional return and raises clauses, and the body.
//! A stub body is a marker — `...`, `pass`, a docstring, or the
//! external-code token — possibly with `name := type` parameter
//! mutations; `raise` statements are accepted and discarded.
//!
//! A function's span starts at its `def` keyword. Starting at the
//! decorators would make an error on a heavily-decorated overload point
//! far above the signature it belongs to.

use crate::{ParseError, Parser};
use stencil_diagnostic::ErrorCode;
use stencil_ir::{
    Decl, Decorator, DefaultValue, FuncBody, FuncDef, Mutation, Param, ParamKind, Span,
    StarKind, TokenKind, TokenSource, TypeExpr,
};

impl<S: TokenSource> Parser<'_, S> {
    /// `decorator* 'def' NAME (externcode | '(' params ')' return? raises? body)`
    pub(crate) fn parse_func(&mut self) -> Result<Decl, ParseError> {
        let mut decorators = Vec::new();
        while self.check(TokenKind::At) {
            let at = self.advance().span;
            let (name, name_span) = self.parse_dotted_name()?;
            decorators.push(Decorator {
                name,
                span: at.merge(name_span),
            });
        }

        let start = self.expect(TokenKind::Def)?.span;
        let (name, _) = self.expect_ident()?;

        if self.check(TokenKind::ExternCode) {
            let end = self.advance().span;
            return Ok(self
                .ctx
                .new_extern_function(decorators, name, start.merge(end)));
        }

        self.expect(TokenKind::LParen)?;
        let params =
            self.comma_separated_until(TokenKind::RParen, false, Self::parse_param)?;
        self.expect(TokenKind::RParen)?;

        let ret = if self.check(TokenKind::Arrow) {
            self.advance();
            self.parse_type()?
        } else {
            // Anything when omitted, anchored just past the param list.
            TypeExpr::anything(Span::point(self.previous_span().end))
        };

        let raises = if self.check(TokenKind::Raises) {
            self.advance();
            self.comma_separated(|p| p.parse_type())?
        } else {
            Vec::new()
        };

        let (body, mutations) = self.parse_func_body()?;
        let span = start.merge(self.previous_span());
        self.ctx.new_function(FuncDef {
            name,
            decorators,
            params,
            ret,
            raises,
            body,
            mutations,
            span,
        })
    }

    /// One parameter-list entry.
    fn parse_param(&mut self) -> Result<Param, ParseError> {
        match self.current_kind() {
            TokenKind::Ellipsis => {
                let span = self.advance().span;
                Ok(Param {
                    kind: ParamKind::EllipsisMarker,
                    span,
                })
            }
            TokenKind::Star => {
                let star_span = self.advance().span;
                if self.check(TokenKind::Star) {
                    self.advance();
                    let (name, _) = self.expect_ident()?;
                    let ty = self.parse_param_annotation()?;
                    Ok(Param {
                        kind: ParamKind::Named {
                            name,
                            ty,
                            default: None,
                            star: StarKind::DoubleStar,
                        },
                        span: star_span.merge(self.previous_span()),
                    })
                } else if self.check_ident() {
                    let (name, _) = self.expect_ident()?;
                    let ty = self.parse_param_annotation()?;
                    Ok(Param {
                        kind: ParamKind::Named {
                            name,
                            ty,
                            default: None,
                            star: StarKind::Star,
                        },
                        span: star_span.merge(self.previous_span()),
                    })
                } else {
                    // A lone `*` separating positional from named-only
                    // parameters; kept as a marker.
                    Ok(Param {
                        kind: ParamKind::StarMarker,
                        span: star_span,
                    })
                }
            }
            TokenKind::Ident(_) => {
                let (name, name_span) = self.expect_ident()?;
                let ty = self.parse_param_annotation()?;
                let default = if self.check(TokenKind::Assign) {
                    self.advance();
                    Some(self.parse_param_default()?)
                } else {
                    None
                };
                Ok(Param {
                    kind: ParamKind::Named {
                        name,
                        ty,
                        default,
                        star: StarKind::None,
                    },
                    span: name_span.merge(self.previous_span()),
                })
            }
            _ => Err(self.unexpected(ErrorCode::E1001, "a parameter")),
        }
    }

    fn parse_param_annotation(&mut self) -> Result<Option<TypeExpr>, ParseError> {
        if self.check(TokenKind::Colon) {
            self.advance();
            Ok(Some(self.parse_type()?))
        } else {
            Ok(None)
        }
    }

    fn parse_param_default(&mut self) -> Result<DefaultValue, ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(DefaultValue::Name(name))
            }
            TokenKind::Int(value) => {
                self.advance();
                Ok(DefaultValue::Int(value))
            }
            TokenKind::Float(bits) => {
                self.advance();
                Ok(DefaultValue::Float(bits))
            }
            TokenKind::Ellipsis => {
                self.advance();
                Ok(DefaultValue::Ellipsis)
            }
            _ => Err(self.unexpected(ErrorCode::E1001, "a default value")),
        }
    }

    /// The body: an inline marker, an indented marker or docstring, an
    /// indented run of body statements, or nothing at all (which reads as
    /// the `...` placeholder).
    fn parse_func_body(&mut self) -> Result<(FuncBody, Vec<Mutation>), ParseError> {
        if !self.check(TokenKind::Colon) {
            return Ok((FuncBody::Ellipsis, Vec::new()));
        }
        self.advance();
        match self.current_kind() {
            TokenKind::Pass => {
                self.advance();
                Ok((FuncBody::Pass, Vec::new()))
            }
            TokenKind::Ellipsis => {
                self.advance();
                Ok((FuncBody::Ellipsis, Vec::new()))
            }
            TokenKind::Indent => {
                self.advance();
                let result = match self.current_kind() {
                    TokenKind::TripleQuoted => {
                        self.advance();
                        (FuncBody::Ellipsis, Vec::new())
                    }
                    TokenKind::Pass => {
                        self.advance();
                        (FuncBody::Pass, Vec::new())
                    }
                    TokenKind::Ellipsis => {
                        self.advance();
                        (FuncBody::Ellipsis, Vec::new())
                    }
                    _ => {
                        let mut mutations = Vec::new();
                        while !self.check(TokenKind::Dedent) {
                            self.parse_body_stmt(&mut mutations)?;
                        }
                        (FuncBody::Ellipsis, mutations)
                    }
                };
                self.expect(TokenKind::Dedent)?;
                Ok(result)
            }
            _ => Err(self.unexpected(ErrorCode::E1006, "a function body")),
        }
    }

    /// `name := type` (recorded) or `raise type ('(' ')')?` (discarded).
    fn parse_body_stmt(&mut self, mutations: &mut Vec<Mutation>) -> Result<(), ParseError> {
        match self.current_kind() {
            TokenKind::Raise => {
                self.advance();
                self.parse_type()?;
                if self.check(TokenKind::LParen) {
                    self.advance();
                    self.expect(TokenKind::RParen)?;
                }
                Ok(())
            }
            TokenKind::Ident(_) => {
                let (name, name_span) = self.expect_ident()?;
                self.expect(TokenKind::ColonEquals)?;
                let ty = self.parse_type()?;
                mutations.push(Mutation {
                    name,
                    span: name_span.merge(ty.span),
                    ty,
                });
                Ok(())
            }
            _ => Err(self.unexpected(ErrorCode::E1001, "a body statement")),
        }
    }
}
