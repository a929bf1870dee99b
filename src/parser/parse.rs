//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing
//! infrastructure: error types, token lookahead, helper methods, and the
//! main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following
//! organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: declaration specifiers, declarators, typedefs
//! - `statements`: statement parsing
//! - `expressions`: expression parsing with precedence climbing
//!
//! Parser methods are split across multiple files using `impl Parser`
//! blocks, allowing each module to extend the Parser with related
//! functionality while maintaining access to the shared parser state.
//!
//! # Typedef-name disambiguation
//!
//! The single piece of context the parser keeps is the set of names
//! declared by `typedef` so far. An identifier can only be classified as a
//! type name or an ordinary identifier by consulting that set; the check
//! is applied in statement position, in parameter lists, and in the
//! cast-expression lookahead. The set is private to one `Parser` value, so
//! concurrent parses of different files never share state.
//!
//! Parsing is all-or-nothing: the first lexical or grammatical error
//! aborts the parse with no recovery and no partial AST.

use super::ast::{Pos, Span, TranslationUnit};
use super::lexer::{Kw, LexError, Lexer, Punct, Token, TokenKind};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use thiserror::Error;

/// Parser error: the token stream does not match any grammar production at
/// the current point.
#[derive(Debug, Clone, Error)]
#[error("parse error at {pos}: {message}")]
pub struct ParseError {
    pub message: String,
    pub pos: Pos,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, pos: Pos) -> Self {
        Self { message: message.into(), pos }
    }
}

/// Any failure of a parse: lexical or grammatical. Both carry a message and
/// a source position and are terminal for the parse in progress.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// The source position the error points at.
    pub fn pos(&self) -> Pos {
        match self {
            Error::Lex(e) => e.pos,
            Error::Parse(e) => e.pos,
        }
    }
}

/// Recursive descent parser for a practical C subset.
pub struct Parser {
    lexer: Lexer,
    lookahead: VecDeque<Token>,
    typenames: FxHashSet<String>,
    /// End offset of the most recently consumed token, for node spans.
    last_end: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: VecDeque::new(),
            typenames: FxHashSet::default(),
            last_end: 0,
        }
    }

    /// Parse the entire translation unit (all external declarations).
    pub fn parse_translation_unit(&mut self) -> Result<TranslationUnit, Error> {
        let mut unit = TranslationUnit::new();

        while !self.at_eof()? {
            let decls = self.parse_external_declaration()?;
            unit.decls.extend(decls);
        }

        unit.span = Span::new(0, self.last_end);
        Ok(unit)
    }

    // ===== Token access =====

    /// Ensure at least `n + 1` tokens of lookahead are buffered.
    fn fill(&mut self, n: usize) -> Result<(), Error> {
        while self.lookahead.len() <= n {
            let tok = self.lexer.next_token()?;
            self.lookahead.push_back(tok);
        }
        Ok(())
    }

    /// Peek at the current token without consuming it.
    pub(crate) fn peek(&mut self) -> Result<&Token, Error> {
        self.peek_nth(0)
    }

    /// Peek `n` tokens ahead (0 = current).
    pub(crate) fn peek_nth(&mut self, n: usize) -> Result<&Token, Error> {
        self.fill(n)?;
        Ok(&self.lookahead[n])
    }

    /// Classification of the current token.
    pub(crate) fn peek_kind(&mut self) -> Result<TokenKind, Error> {
        Ok(self.peek()?.kind)
    }

    /// Consume and return the current token.
    pub(crate) fn bump(&mut self) -> Result<Token, Error> {
        self.fill(0)?;
        let tok = self.lookahead.pop_front().expect("lookahead filled");
        if tok.kind != TokenKind::Eof {
            self.last_end = tok.end_offset();
        }
        Ok(tok)
    }

    pub(crate) fn at_eof(&mut self) -> Result<bool, Error> {
        Ok(self.peek_kind()? == TokenKind::Eof)
    }

    /// Source position of the current token.
    pub(crate) fn pos(&mut self) -> Result<Pos, Error> {
        Ok(self.peek()?.pos)
    }

    /// Span from a start position to the end of the last consumed token.
    pub(crate) fn span_from(&self, start: Pos) -> Span {
        Span::new(start.offset, self.last_end)
    }

    // ===== Matching helpers =====

    pub(crate) fn at_punct(&mut self, p: Punct) -> Result<bool, Error> {
        Ok(self.peek_kind()? == TokenKind::Punct(p))
    }

    pub(crate) fn at_kw(&mut self, kw: Kw) -> Result<bool, Error> {
        Ok(self.peek_kind()? == TokenKind::Keyword(kw))
    }

    /// Consume the current token if it is the given punctuator.
    pub(crate) fn eat_punct(&mut self, p: Punct) -> Result<bool, Error> {
        if self.at_punct(p)? {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume the current token if it is the given keyword.
    pub(crate) fn eat_kw(&mut self, kw: Kw) -> Result<bool, Error> {
        if self.at_kw(kw)? {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume the given punctuator or fail with expected-vs-found.
    pub(crate) fn expect_punct(&mut self, p: Punct, context: &str) -> Result<Token, Error> {
        if self.at_punct(p)? {
            self.bump()
        } else {
            Err(self.expected(&format!("'{}' {}", p.as_str(), context)))
        }
    }

    /// Consume the given keyword or fail with expected-vs-found.
    pub(crate) fn expect_kw(&mut self, kw: Kw, context: &str) -> Result<Token, Error> {
        if self.at_kw(kw)? {
            self.bump()
        } else {
            Err(self.expected(&format!("'{}' {}", kw.as_str(), context)))
        }
    }

    /// Consume an identifier token, returning its name.
    pub(crate) fn expect_ident(&mut self, context: &str) -> Result<(String, Pos), Error> {
        if self.peek_kind()? == TokenKind::Ident {
            let tok = self.bump()?;
            Ok((tok.text, tok.pos))
        } else {
            Err(self.expected(&format!("identifier {}", context)))
        }
    }

    /// Build an "expected X, found Y" error at the current token. Callers
    /// have always peeked before reporting, so the lookahead is populated.
    pub(crate) fn expected(&mut self, what: &str) -> Error {
        match self.lookahead.front() {
            Some(tok) => Error::Parse(ParseError::new(
                format!("expected {}, found {}", what, tok),
                tok.pos,
            )),
            None => Error::Parse(ParseError::new(
                format!("expected {}", what),
                Pos::new(self.last_end, 1, 1),
            )),
        }
    }

    // ===== Typedef-name set =====

    /// Is `name` a registered typedef name?
    pub(crate) fn is_type_name(&self, name: &str) -> bool {
        self.typenames.contains(name)
    }

    /// Register a typedef name. The set only grows during a parse.
    pub(crate) fn register_typedef(&mut self, name: &str) {
        self.typenames.insert(name.to_string());
    }

    /// Would this token start declaration specifiers? Identifiers count
    /// only when registered as typedef names.
    pub(crate) fn token_starts_type(&self, tok: &Token) -> bool {
        match tok.kind {
            TokenKind::Keyword(kw) => matches!(
                kw,
                Kw::Int
                    | Kw::Char
                    | Kw::Void
                    | Kw::Float
                    | Kw::Double
                    | Kw::Long
                    | Kw::Short
                    | Kw::Signed
                    | Kw::Unsigned
                    | Kw::Struct
                    | Kw::Union
                    | Kw::Enum
                    | Kw::Typedef
                    | Kw::Const
                    | Kw::Volatile
                    | Kw::Static
                    | Kw::Extern
            ),
            TokenKind::Ident => self.is_type_name(&tok.text),
            _ => false,
        }
    }

    /// Does the current token start a declaration?
    pub(crate) fn starts_declaration(&mut self) -> Result<bool, Error> {
        self.fill(0)?;
        let tok = &self.lookahead[0];
        Ok(self.token_starts_type(tok))
    }

    /// Does the token `n` ahead start a type name? Used for the cast and
    /// `sizeof` lookahead: `(ident)` is a cast iff `ident` is a known type
    /// name.
    pub(crate) fn nth_starts_type(&mut self, n: usize) -> Result<bool, Error> {
        self.fill(n)?;
        let tok = &self.lookahead[n];
        Ok(self.token_starts_type(tok))
    }
}

/// Parse a complete C source text into a [`TranslationUnit`].
///
/// Convenience wrapper over [`Parser`]; each call uses a fresh typedef-name
/// set, so calls are independent and safely parallel across files.
pub fn parse(source: &str) -> Result<TranslationUnit, Error> {
    Parser::new(source).parse_translation_unit()
}
