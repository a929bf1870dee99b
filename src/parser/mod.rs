//! C source parsing: lexer, recursive descent parser, and AST.
//!
//! The entry point is [`parse`], which turns a source string into a
//! [`TranslationUnit`]. Parsing is all-or-nothing; the first error aborts
//! with an [`Error`] carrying a message and source position.

pub mod ast;
pub mod lexer;
pub mod parse;

mod declarations;
mod expressions;
mod statements;

pub use ast::TranslationUnit;
pub use lexer::{Lexer, LexError, Token, TokenKind};
pub use parse::{parse, Error, ParseError, Parser};
