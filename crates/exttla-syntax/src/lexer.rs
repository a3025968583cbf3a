//! Lexer for ExtTLA source text.
//!
//! Converts source text into a stream of tokens. Embedded TLA+
//! fragments (`{\ ... \}`) are captured as single tokens with their
//! interior text; comments are emitted as trivia tokens so the parser
//! can attach them to the following declaration.

use crate::token::{Span, Token, TokenKind};
use std::str::Chars;

/// Lexer for ExtTLA source code.
pub struct Lexer<'a> {
    /// Source text being lexed.
    source: &'a str,
    /// Character iterator.
    chars: Chars<'a>,
    /// Current byte position.
    pos: usize,
    /// Current line number (1-indexed).
    line: u32,
    /// Current column number (1-indexed).
    column: u32,
    /// Start position of current token.
    token_start: usize,
    /// Start line of current token.
    token_start_line: u32,
    /// Start column of current token.
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars(),
            pos: 0,
            line: 1,
            column: 1,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Tokenize the entire source, returning all tokens including EOF.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.mark_token_start();

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        // Single-line comment
        if c == '/' && self.peek_next() == Some('/') {
            return self.lex_comment();
        }

        // Multi-line comment
        if c == '/' && self.peek_next() == Some('*') {
            return self.lex_block_comment();
        }

        // Embedded TLA+ fragment
        if c == '{' && self.peek_next() == Some('\\') {
            return self.lex_tla_block();
        }

        // String literal
        if c == '"' {
            return self.lex_string();
        }

        // Number literal
        if c.is_ascii_digit() {
            return self.lex_number();
        }

        // Identifier or keyword
        if c.is_alphabetic() || c == '_' {
            return self.lex_identifier();
        }

        // Punctuation
        self.lex_punctuation()
    }

    /// Skip whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Mark the start of a new token.
    fn mark_token_start(&mut self) {
        self.token_start = self.pos;
        self.token_start_line = self.line;
        self.token_start_column = self.column;
    }

    /// Peek at the current character without consuming it.
    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Peek at the next character (after current) without consuming.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    /// Advance to the next character, returning it.
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Create a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Span::new(
                self.token_start,
                self.pos,
                self.token_start_line,
                self.token_start_column,
            ),
        )
    }

    /// Get the text of the current token.
    fn token_text(&self) -> &'a str {
        &self.source[self.token_start..self.pos]
    }

    /// Lex a single-line comment.
    fn lex_comment(&mut self) -> Token {
        // Skip //
        self.advance();
        self.advance();

        let content_start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }

        let content = self.source[content_start..self.pos].to_string();
        self.make_token(TokenKind::Comment(content))
    }

    /// Lex a multi-line comment.
    fn lex_block_comment(&mut self) -> Token {
        // Skip /*
        self.advance();
        self.advance();

        let content_start = self.pos;
        let mut depth = 1;

        while depth > 0 {
            match self.peek() {
                None => {
                    return self
                        .make_token(TokenKind::Error("unterminated block comment".to_string()));
                }
                Some('*') if self.peek_next() == Some('/') => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                Some('/') if self.peek_next() == Some('*') => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        let content = self.source[content_start..self.pos - 2].to_string();
        self.make_token(TokenKind::BlockComment(content))
    }

    /// Lex an embedded TLA+ fragment, `{\` up to the matching `\}`.
    fn lex_tla_block(&mut self) -> Token {
        // Skip {\
        self.advance();
        self.advance();

        let content_start = self.pos;
        loop {
            match self.peek() {
                None => {
                    return self
                        .make_token(TokenKind::Error("unterminated TLA+ block".to_string()));
                }
                Some('\\') if self.peek_next() == Some('}') => {
                    let content = self.source[content_start..self.pos].to_string();
                    self.advance();
                    self.advance();
                    return self.make_token(TokenKind::TlaBlock(content));
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Lex a string literal. No escape processing; ExtTLA strings are
    /// passed through to the output verbatim.
    fn lex_string(&mut self) -> Token {
        // Skip opening quote
        self.advance();

        let content_start = self.pos;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return self
                        .make_token(TokenKind::Error("unterminated string literal".to_string()));
                }
                Some('"') => {
                    let content = self.source[content_start..self.pos].to_string();
                    self.advance();
                    return self.make_token(TokenKind::StringLit(content));
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Lex a number literal, kept as raw text.
    fn lex_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        self.make_token(TokenKind::Number(self.token_text().to_string()))
    }

    /// Lex an identifier or keyword.
    fn lex_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = self.token_text();
        if let Some(keyword) = TokenKind::keyword(text) {
            self.make_token(keyword)
        } else {
            self.make_token(TokenKind::Ident(text.to_string()))
        }
    }

    /// Lex a punctuation token.
    fn lex_punctuation(&mut self) -> Token {
        let c = self.advance().unwrap();

        match c {
            '{' => self.make_token(TokenKind::LBrace),
            '}' => self.make_token(TokenKind::RBrace),
            '(' => self.make_token(TokenKind::LParen),
            ')' => self.make_token(TokenKind::RParen),
            ',' => self.make_token(TokenKind::Comma),
            ':' => self.make_token(TokenKind::Colon),
            ';' => self.make_token(TokenKind::Semicolon),
            '=' => self.make_token(TokenKind::Assign),
            _ => self.make_token(TokenKind::Error(format!("unexpected character: {}", c))),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_idents() {
        let toks = kinds("module Foo extends Bar");
        assert_eq!(
            toks,
            vec![
                TokenKind::Module,
                TokenKind::Ident("Foo".to_string()),
                TokenKind::Extends,
                TokenKind::Ident("Bar".to_string()),
            ]
        );
    }

    #[test]
    fn test_tla_block() {
        let toks = kinds(r"var x: {\ Nat \} = {\ 0 \}");
        assert_eq!(
            toks,
            vec![
                TokenKind::Var,
                TokenKind::Ident("x".to_string()),
                TokenKind::Colon,
                TokenKind::TlaBlock(" Nat ".to_string()),
                TokenKind::Assign,
                TokenKind::TlaBlock(" 0 ".to_string()),
            ]
        );
    }

    #[test]
    fn test_tla_block_multiline() {
        let toks = kinds("operation Inc {\\\n  /\\ x' = x + 1\n\\}");
        assert_eq!(
            toks,
            vec![
                TokenKind::Operation,
                TokenKind::Ident("Inc".to_string()),
                TokenKind::TlaBlock("\n  /\\ x' = x + 1\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_tla_block() {
        let toks = kinds(r"{\ x > 0");
        assert!(matches!(toks[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_comments_are_trivia() {
        let toks = kinds("// a counter\nvar /* inline */ x");
        assert_eq!(
            toks,
            vec![
                TokenKind::Comment(" a counter".to_string()),
                TokenKind::Var,
                TokenKind::BlockComment(" inline ".to_string()),
                TokenKind::Ident("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_string_and_number() {
        let toks = kinds(r#"const N = 42, S = "hello""#);
        assert_eq!(
            toks,
            vec![
                TokenKind::Const,
                TokenKind::Ident("N".to_string()),
                TokenKind::Assign,
                TokenKind::Number("42".to_string()),
                TokenKind::Comma,
                TokenKind::Ident("S".to_string()),
                TokenKind::Assign,
                TokenKind::StringLit("hello".to_string()),
            ]
        );
    }

    #[test]
    fn test_spans_track_lines() {
        let tokens = Lexer::new("module\nFoo").tokenize();
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 1);
    }
}
