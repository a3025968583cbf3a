//! Lexer and parser for the ExtTLA dialect.
//!
//! This crate provides:
//! - A lexer for ExtTLA source text
//! - A recursive descent parser producing a parse-event stream
//! - The `ParseEvent` boundary type consumed by `exttla-core`
//!
//! ExtTLA extends TLA+ with module inheritance (`extends`), typed
//! operation arguments, enumerations, and `override` semantics.
//! Embedded TLA+ expressions are opaque fragments delimited by
//! `{\ ... \}` and are passed through to the generated output.

mod event;
mod lexer;
mod parser;
mod token;

pub use event::{ArgSpec, ParseEvent};
pub use lexer::Lexer;
pub use parser::{parse, ParseError, Parser};
pub use token::{Span, Token, TokenKind};
