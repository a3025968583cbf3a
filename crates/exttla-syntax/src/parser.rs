//! Recursive descent parser for ExtTLA source files.
//!
//! Produces a [`ParseEvent`] stream rather than a syntax tree; module
//! assembly is the job of the builder in `exttla-core`. Comment trivia
//! is collected here and attached to the following declaration in TLA+
//! comment form.

use crate::event::{ArgSpec, ParseEvent};
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};
use thiserror::Error;

/// Parser error.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected token at {span}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("invalid syntax at {span}: {message}")]
    InvalidSyntax { message: String, span: Span },
}

impl ParseError {
    /// Get the source span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::InvalidSyntax { span, .. } => *span,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parser for ExtTLA source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    events: Vec<ParseEvent>,
}

impl Parser {
    /// Create a new parser from source text.
    pub fn new(source: &str) -> Self {
        Self {
            tokens: Lexer::new(source).tokenize(),
            pos: 0,
            events: Vec::new(),
        }
    }

    /// Parse the whole file into a parse-event stream. A file may
    /// declare any number of modules.
    pub fn parse_spec(mut self) -> ParseResult<Vec<ParseEvent>> {
        loop {
            let comment = self.collect_comment();
            if self.peek_kind() == &TokenKind::Eof {
                break;
            }
            self.parse_module(comment)?;
        }
        Ok(self.events)
    }

    fn parse_module(&mut self, comment: String) -> ParseResult<()> {
        self.expect(TokenKind::Module)?;
        let name = self.expect_ident()?;
        self.events.push(ParseEvent::ModuleStart { name, comment });

        if self.peek_kind() == &TokenKind::Extends {
            self.advance();
            let mut bases = vec![self.expect_ident()?];
            while self.peek_kind() == &TokenKind::Comma {
                self.advance();
                bases.push(self.expect_ident()?);
            }
            self.events.push(ParseEvent::Extends { bases });
        }

        self.expect(TokenKind::LBrace)?;
        loop {
            let comment = self.collect_comment();
            if self.peek_kind() == &TokenKind::RBrace {
                self.advance();
                break;
            }
            self.parse_item(comment)?;
        }
        self.events.push(ParseEvent::ModuleEnd);
        Ok(())
    }

    fn parse_item(&mut self, comment: String) -> ParseResult<()> {
        match self.peek_kind() {
            TokenKind::Import => self.parse_import(comment),
            TokenKind::Instance => self.parse_instance(comment),
            TokenKind::Const => self.parse_constants(comment, false),
            TokenKind::Enum => self.parse_enumeration(comment),
            TokenKind::Assume => self.parse_assumption(comment),
            TokenKind::Var => self.parse_variable(comment),
            TokenKind::Operation => self.parse_operation(comment, false),
            TokenKind::Shadow => self.parse_shadow(),
            TokenKind::Invariant => self.parse_invariant(comment),
            TokenKind::Override => {
                self.advance();
                match self.peek_kind() {
                    TokenKind::Const => self.parse_constants(comment, true),
                    TokenKind::Operation => self.parse_operation(comment, true),
                    _ => Err(self.unexpected("const or operation after override")),
                }
            }
            _ => Err(self.unexpected("declaration")),
        }
    }

    fn parse_import(&mut self, comment: String) -> ParseResult<()> {
        self.expect(TokenKind::Import)?;
        let mut comment = comment;
        loop {
            let name = self.expect_ident()?;
            self.events.push(ParseEvent::Import {
                name,
                comment: std::mem::replace(&mut comment, "\n".to_string()),
            });
            if self.peek_kind() == &TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        Ok(())
    }

    fn parse_instance(&mut self, comment: String) -> ParseResult<()> {
        self.expect(TokenKind::Instance)?;
        let name = self.expect_ident()?;
        let mapping = if self.peek_kind() == &TokenKind::With {
            self.advance();
            Some(self.expect_tla_block()?.trim().to_string())
        } else {
            None
        };
        self.events.push(ParseEvent::Instance {
            name,
            mapping,
            comment,
        });
        Ok(())
    }

    fn parse_constants(&mut self, comment: String, is_override: bool) -> ParseResult<()> {
        self.expect(TokenKind::Const)?;
        let mut comment = comment;
        loop {
            let name = self.expect_ident()?;
            let value = if self.peek_kind() == &TokenKind::Assign {
                self.advance();
                Some(self.parse_value()?)
            } else {
                None
            };
            if is_override && value.is_none() {
                return Err(ParseError::InvalidSyntax {
                    message: format!("override constant {} requires a value", name),
                    span: self.prev_span(),
                });
            }
            self.events.push(ParseEvent::Constant {
                name,
                value,
                is_override,
                comment: std::mem::replace(&mut comment, "\n".to_string()),
            });
            if self.peek_kind() == &TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        Ok(())
    }

    fn parse_enumeration(&mut self, comment: String) -> ParseResult<()> {
        self.expect(TokenKind::Enum)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;
        let mut members = vec![self.expect_ident()?];
        while self.peek_kind() == &TokenKind::Comma {
            self.advance();
            members.push(self.expect_ident()?);
        }
        self.expect(TokenKind::RBrace)?;
        self.events.push(ParseEvent::Enumeration {
            name,
            members,
            comment,
        });
        Ok(())
    }

    fn parse_assumption(&mut self, comment: String) -> ParseResult<()> {
        self.expect(TokenKind::Assume)?;
        let expr = self.expect_tla_block()?;
        self.events.push(ParseEvent::Assumption { expr, comment });
        Ok(())
    }

    fn parse_variable(&mut self, comment: String) -> ParseResult<()> {
        self.expect(TokenKind::Var)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.expect(TokenKind::Assign)?;
        let init = self.parse_value()?;
        self.events.push(ParseEvent::Variable {
            name,
            ty,
            init,
            comment,
        });
        Ok(())
    }

    fn parse_operation(&mut self, comment: String, is_override: bool) -> ParseResult<()> {
        self.expect(TokenKind::Operation)?;
        let name = self.expect_ident()?;

        let mut args = Vec::new();
        if self.peek_kind() == &TokenKind::LParen {
            self.advance();
            if self.peek_kind() != &TokenKind::RParen {
                loop {
                    let name = self.expect_ident()?;
                    self.expect(TokenKind::Colon)?;
                    let ty = self.parse_arg_type()?;
                    args.push(ArgSpec { name, ty });
                    if self.peek_kind() == &TokenKind::Comma {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen)?;
        }

        let body = self.expect_tla_block()?;
        self.events.push(ParseEvent::Operation {
            name,
            args,
            body,
            is_override,
            comment,
        });
        Ok(())
    }

    fn parse_shadow(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::Shadow)?;
        let name = self.expect_ident()?;
        self.events.push(ParseEvent::Shadow { name });
        Ok(())
    }

    fn parse_invariant(&mut self, comment: String) -> ParseResult<()> {
        self.expect(TokenKind::Invariant)?;
        let name = self.expect_ident()?;
        let expr = self.expect_tla_block()?;
        self.events.push(ParseEvent::Invariant {
            name,
            expr,
            comment,
        });
        Ok(())
    }

    /// Parse a variable type: a bare identifier (including the `any`
    /// sentinel) or an embedded TLA+ set expression. Identifier types
    /// other than `any` get a leading space so the emitter can render
    /// `v \in<type>` uniformly.
    fn parse_type(&mut self) -> ParseResult<String> {
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                if name == "any" {
                    Ok(name)
                } else {
                    Ok(format!(" {}", name))
                }
            }
            TokenKind::TlaBlock(_) => self.expect_tla_block(),
            _ => Err(self.unexpected("type expression")),
        }
    }

    /// Parse an argument type: a bare identifier or TLA+ fragment,
    /// trimmed for inline emission in `\E arg \in <type>`.
    fn parse_arg_type(&mut self) -> ParseResult<String> {
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            TokenKind::TlaBlock(_) => Ok(self.expect_tla_block()?.trim().to_string()),
            _ => Err(self.unexpected("argument type")),
        }
    }

    /// Parse a constant value or variable initializer: a literal, an
    /// identifier, or a TLA+ fragment, trimmed for inline emission.
    fn parse_value(&mut self) -> ParseResult<String> {
        match self.peek_kind().clone() {
            TokenKind::Number(text) => {
                self.advance();
                Ok(text)
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            TokenKind::StringLit(content) => {
                self.advance();
                Ok(format!("\"{}\"", content))
            }
            TokenKind::TlaBlock(_) => Ok(self.expect_tla_block()?.trim().to_string()),
            _ => Err(self.unexpected("value")),
        }
    }

    /// Consume comment trivia (and stray semicolons) before a
    /// declaration, converting it to TLA+ comment form. Returns `"\n"`
    /// when there is no comment, so every declaration carries at least
    /// the newline separating it from the previous section.
    fn collect_comment(&mut self) -> String {
        let mut out = String::new();
        loop {
            match self.peek_kind() {
                TokenKind::Comment(text) => {
                    out.push_str("\n\\*");
                    out.push_str(text);
                    self.advance();
                }
                TokenKind::BlockComment(text) => {
                    out.push_str("\n(*");
                    out.push_str(text);
                    out.push_str("*)");
                    self.advance();
                }
                TokenKind::Semicolon => {
                    self.advance();
                }
                _ => break,
            }
        }
        if out.is_empty() {
            "\n".to_string()
        } else {
            out.push('\n');
            out
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_tla_block(&mut self) -> ParseResult<String> {
        match self.peek_kind().clone() {
            TokenKind::TlaBlock(raw) => {
                self.advance();
                Ok(normalize_fragment(&raw))
            }
            _ => Err(self.unexpected("TLA+ block")),
        }
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.peek_kind() == &kind {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.peek_kind().to_string(),
            span: self.current_span(),
        }
    }
}

/// Normalize an embedded TLA+ fragment: strip trailing whitespace,
/// undo one level of two-space indentation, and convert comment
/// delimiters to TLA+ form.
fn normalize_fragment(raw: &str) -> String {
    raw.trim_end()
        .replace("\n  ", "\n")
        .replace("/*", "(*")
        .replace("*/", "*)")
        .replace("//", "\\*")
}

/// Parse source text into a parse-event stream.
pub fn parse(source: &str) -> ParseResult<Vec<ParseEvent>> {
    Parser::new(source).parse_spec()
}
