//! Token types and source span tracking for the ExtTLA lexer.

use std::fmt;

/// A span in the source code, tracking byte offsets and line/column.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, in characters not bytes).
    pub column: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The kind of token.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // === Keywords ===
    /// `module`
    Module,
    /// `extends`
    Extends,
    /// `import`
    Import,
    /// `instance`
    Instance,
    /// `with`
    With,
    /// `const`
    Const,
    /// `enum`
    Enum,
    /// `assume`
    Assume,
    /// `var`
    Var,
    /// `operation`
    Operation,
    /// `override`
    Override,
    /// `shadow`
    Shadow,
    /// `invariant`
    Invariant,

    // === Literals and fragments ===
    /// An identifier.
    Ident(String),
    /// A number literal, kept as raw text for passthrough.
    Number(String),
    /// A string literal, content without quotes.
    StringLit(String),
    /// An embedded TLA+ fragment between `{\` and `\}`, interior text only.
    TlaBlock(String),

    // === Trivia ===
    /// `// ...` line comment, content without the delimiter.
    Comment(String),
    /// `/* ... */` block comment, content without delimiters.
    BlockComment(String),

    // === Punctuation ===
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `=`
    Assign,

    /// Lexer error with a message.
    Error(String),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Look up a keyword from identifier text.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        match text {
            "module" => Some(TokenKind::Module),
            "extends" => Some(TokenKind::Extends),
            "import" => Some(TokenKind::Import),
            "instance" => Some(TokenKind::Instance),
            "with" => Some(TokenKind::With),
            "const" => Some(TokenKind::Const),
            "enum" => Some(TokenKind::Enum),
            "assume" => Some(TokenKind::Assume),
            "var" => Some(TokenKind::Var),
            "operation" => Some(TokenKind::Operation),
            "override" => Some(TokenKind::Override),
            "shadow" => Some(TokenKind::Shadow),
            "invariant" => Some(TokenKind::Invariant),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Module => write!(f, "module"),
            TokenKind::Extends => write!(f, "extends"),
            TokenKind::Import => write!(f, "import"),
            TokenKind::Instance => write!(f, "instance"),
            TokenKind::With => write!(f, "with"),
            TokenKind::Const => write!(f, "const"),
            TokenKind::Enum => write!(f, "enum"),
            TokenKind::Assume => write!(f, "assume"),
            TokenKind::Var => write!(f, "var"),
            TokenKind::Operation => write!(f, "operation"),
            TokenKind::Override => write!(f, "override"),
            TokenKind::Shadow => write!(f, "shadow"),
            TokenKind::Invariant => write!(f, "invariant"),
            TokenKind::Ident(name) => write!(f, "identifier `{}`", name),
            TokenKind::Number(n) => write!(f, "number `{}`", n),
            TokenKind::StringLit(_) => write!(f, "string literal"),
            TokenKind::TlaBlock(_) => write!(f, "TLA+ block"),
            TokenKind::Comment(_) => write!(f, "comment"),
            TokenKind::BlockComment(_) => write!(f, "comment"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Error(msg) => write!(f, "invalid token ({})", msg),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// A token with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
