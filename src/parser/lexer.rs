//! Lexer (tokenizer) for C source code
//!
//! Converts raw source text into a stream of [`Token`]s consumed by the
//! parser. Tokens are produced one at a time in a single forward pass;
//! `#include` and other preprocessor directives are silently skipped rather
//! than parsed, matching the tool's no-preprocessor policy.

use super::ast::Pos;
use std::fmt;
use thiserror::Error;

/// Keywords of the supported C subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kw {
    Int,
    Char,
    Void,
    Float,
    Double,
    Long,
    Short,
    Signed,
    Unsigned,
    Struct,
    Union,
    Enum,
    Typedef,
    Const,
    Volatile,
    Static,
    Extern,
    If,
    Else,
    While,
    Do,
    For,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,
    Goto,
    Sizeof,
}

impl Kw {
    /// The keyword as it is spelled in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kw::Int => "int",
            Kw::Char => "char",
            Kw::Void => "void",
            Kw::Float => "float",
            Kw::Double => "double",
            Kw::Long => "long",
            Kw::Short => "short",
            Kw::Signed => "signed",
            Kw::Unsigned => "unsigned",
            Kw::Struct => "struct",
            Kw::Union => "union",
            Kw::Enum => "enum",
            Kw::Typedef => "typedef",
            Kw::Const => "const",
            Kw::Volatile => "volatile",
            Kw::Static => "static",
            Kw::Extern => "extern",
            Kw::If => "if",
            Kw::Else => "else",
            Kw::While => "while",
            Kw::Do => "do",
            Kw::For => "for",
            Kw::Switch => "switch",
            Kw::Case => "case",
            Kw::Default => "default",
            Kw::Break => "break",
            Kw::Continue => "continue",
            Kw::Return => "return",
            Kw::Goto => "goto",
            Kw::Sizeof => "sizeof",
        }
    }

    fn from_str(s: &str) -> Option<Kw> {
        let kw = match s {
            "int" => Kw::Int,
            "char" => Kw::Char,
            "void" => Kw::Void,
            "float" => Kw::Float,
            "double" => Kw::Double,
            "long" => Kw::Long,
            "short" => Kw::Short,
            "signed" => Kw::Signed,
            "unsigned" => Kw::Unsigned,
            "struct" => Kw::Struct,
            "union" => Kw::Union,
            "enum" => Kw::Enum,
            "typedef" => Kw::Typedef,
            "const" => Kw::Const,
            "volatile" => Kw::Volatile,
            "static" => Kw::Static,
            "extern" => Kw::Extern,
            "if" => Kw::If,
            "else" => Kw::Else,
            "while" => Kw::While,
            "do" => Kw::Do,
            "for" => Kw::For,
            "switch" => Kw::Switch,
            "case" => Kw::Case,
            "default" => Kw::Default,
            "break" => Kw::Break,
            "continue" => Kw::Continue,
            "return" => Kw::Return,
            "goto" => Kw::Goto,
            "sizeof" => Kw::Sizeof,
            _ => return None,
        };
        Some(kw)
    }
}

/// Punctuators, single and multi-character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    Shl,   // <<
    Shr,   // >>

    // Assignment
    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=
    AmpEq,     // &=
    PipeEq,    // |=
    CaretEq,   // ^=
    ShlEq,     // <<=
    ShrEq,     // >>=

    // Increment/Decrement
    PlusPlus,   // ++
    MinusMinus, // --

    // Member access
    Dot,   // .
    Arrow, // ->

    // Ternary
    Question, // ?
    Colon,    // :

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,
    Ellipsis,  // ...
}

impl Punct {
    pub fn as_str(&self) -> &'static str {
        match self {
            Punct::Plus => "+",
            Punct::Minus => "-",
            Punct::Star => "*",
            Punct::Slash => "/",
            Punct::Percent => "%",
            Punct::EqEq => "==",
            Punct::NotEq => "!=",
            Punct::Lt => "<",
            Punct::Le => "<=",
            Punct::Gt => ">",
            Punct::Ge => ">=",
            Punct::AndAnd => "&&",
            Punct::OrOr => "||",
            Punct::Bang => "!",
            Punct::Amp => "&",
            Punct::Pipe => "|",
            Punct::Caret => "^",
            Punct::Tilde => "~",
            Punct::Shl => "<<",
            Punct::Shr => ">>",
            Punct::Eq => "=",
            Punct::PlusEq => "+=",
            Punct::MinusEq => "-=",
            Punct::StarEq => "*=",
            Punct::SlashEq => "/=",
            Punct::PercentEq => "%=",
            Punct::AmpEq => "&=",
            Punct::PipeEq => "|=",
            Punct::CaretEq => "^=",
            Punct::ShlEq => "<<=",
            Punct::ShrEq => ">>=",
            Punct::PlusPlus => "++",
            Punct::MinusMinus => "--",
            Punct::Dot => ".",
            Punct::Arrow => "->",
            Punct::Question => "?",
            Punct::Colon => ":",
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBrace => "{",
            Punct::RBrace => "}",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::Semicolon => ";",
            Punct::Comma => ",",
            Punct::Ellipsis => "...",
        }
    }
}

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Keyword(Kw),
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    Punct(Punct),
    Eof,
}

/// One lexical token: classification, raw lexeme, and source position.
///
/// `text` is the exact source spelling; string and character literals keep
/// their quotes. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Pos,
}

impl Token {
    /// Character offset one past the end of this token's lexeme.
    pub fn end_offset(&self) -> usize {
        self.pos.offset + self.text.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident => write!(f, "identifier '{}'", self.text),
            TokenKind::Keyword(kw) => write!(f, "'{}'", kw.as_str()),
            TokenKind::IntLiteral => write!(f, "integer literal {}", self.text),
            TokenKind::FloatLiteral => write!(f, "float literal {}", self.text),
            TokenKind::StringLiteral => write!(f, "string literal {}", self.text),
            TokenKind::CharLiteral => write!(f, "char literal {}", self.text),
            TokenKind::Punct(p) => write!(f, "'{}'", p.as_str()),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// Lexer error: malformed lexical token (unterminated literal, invalid byte).
#[derive(Debug, Clone, Error)]
#[error("lex error at {pos}: {message}")]
pub struct LexError {
    pub message: String,
    pub pos: Pos,
}

impl LexError {
    fn new(message: impl Into<String>, pos: Pos) -> Self {
        Self { message: message.into(), pos }
    }
}

/// Lexer for C source code.
///
/// A single forward pass over the input; [`Lexer::next_token`] produces the
/// next token on demand, ending with a [`TokenKind::Eof`] token. The iterator
/// form yields tokens up to and including `Eof`, then `None`.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Produce the next token. After the end of input this keeps returning
    /// the `Eof` token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            self.skip_whitespace_and_comments()?;

            if self.peek() == Some('#') {
                self.skip_preprocessor_directive();
                continue;
            }
            break;
        }

        let pos = self.current_pos();

        if self.is_at_end() {
            self.finished = true;
            return Ok(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                pos,
            });
        }

        let ch = self.peek().unwrap_or('\0');
        match ch {
            '"' => self.string_literal(),
            '\'' => self.char_literal(),
            '0'..='9' => self.number_literal(),
            '.' if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal()
            }
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword()),
            _ => self.punctuator(),
        }
    }

    /// Parse a string literal (raw text keeps the quotes).
    fn string_literal(&mut self) -> Result<Token, LexError> {
        let pos = self.current_pos();
        let start = self.position;
        self.advance(); // opening quote

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError::new("unterminated string literal", pos));
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.escape_sequence()?;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        Ok(self.token_from(TokenKind::StringLiteral, start, pos))
    }

    /// Parse a character literal (raw text keeps the quotes).
    fn char_literal(&mut self) -> Result<Token, LexError> {
        let pos = self.current_pos();
        let start = self.position;
        self.advance(); // opening quote

        match self.peek() {
            None | Some('\n') | Some('\'') => {
                return Err(LexError::new("unterminated character literal", pos));
            }
            Some('\\') => {
                self.advance();
                self.escape_sequence()?;
            }
            Some(_) => {
                self.advance();
            }
        }

        if self.peek() != Some('\'') {
            return Err(LexError::new("unterminated character literal", pos));
        }
        self.advance(); // closing quote

        Ok(self.token_from(TokenKind::CharLiteral, start, pos))
    }

    /// Validate and consume one escape sequence body (the `\` is already
    /// consumed).
    fn escape_sequence(&mut self) -> Result<(), LexError> {
        let pos = self.current_pos();
        let ch = self
            .advance()
            .ok_or_else(|| LexError::new("unexpected end of file in escape sequence", pos))?;

        match ch {
            'n' | 't' | 'r' | '\\' | '\'' | '"' | '0' => Ok(()),
            'x' => {
                for _ in 0..2 {
                    match self.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            self.advance();
                        }
                        _ => {
                            return Err(LexError::new(
                                "incomplete hex escape sequence",
                                self.current_pos(),
                            ));
                        }
                    }
                }
                Ok(())
            }
            _ => Err(LexError::new(format!("unknown escape sequence: \\{}", ch), pos)),
        }
    }

    /// Parse an integer or floating literal, including standard C suffixes.
    fn number_literal(&mut self) -> Result<Token, LexError> {
        let pos = self.current_pos();
        let start = self.position;

        // Hex literals never carry a fractional part in this subset.
        if self.peek() == Some('0')
            && self.peek_ahead(1).is_some_and(|c| c == 'x' || c == 'X')
        {
            self.advance();
            self.advance();
            let mut digits = 0;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
                digits += 1;
            }
            if digits == 0 {
                return Err(LexError::new("malformed hex literal", pos));
            }
            self.int_suffix();
            return Ok(self.token_from(TokenKind::IntLiteral, start, pos));
        }

        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            is_float = true;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(LexError::new("malformed exponent in float literal", pos));
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if is_float {
            if self
                .peek()
                .is_some_and(|c| matches!(c, 'f' | 'F' | 'l' | 'L'))
            {
                self.advance();
            }
            Ok(self.token_from(TokenKind::FloatLiteral, start, pos))
        } else {
            self.int_suffix();
            Ok(self.token_from(TokenKind::IntLiteral, start, pos))
        }
    }

    /// Consume a `u`/`U`/`l`/`L` suffix run after an integer literal.
    fn int_suffix(&mut self) {
        while self
            .peek()
            .is_some_and(|c| matches!(c, 'u' | 'U' | 'l' | 'L'))
        {
            self.advance();
        }
    }

    /// Parse an identifier or keyword (longest run of word characters).
    fn identifier_or_keyword(&mut self) -> Token {
        let pos = self.current_pos();
        let start = self.position;

        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text: String = self.input[start..self.position].iter().collect();
        let kind = match Kw::from_str(&text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident,
        };
        Token { kind, text, pos }
    }

    /// Parse a punctuator, matching multi-character forms greedily
    /// (`<<=` before `<<` before `<`).
    fn punctuator(&mut self) -> Result<Token, LexError> {
        let pos = self.current_pos();
        let start = self.position;
        let ch = self.advance().unwrap_or('\0');

        let punct = match ch {
            '+' => match self.peek() {
                Some('+') => self.take(Punct::PlusPlus),
                Some('=') => self.take(Punct::PlusEq),
                _ => Punct::Plus,
            },
            '-' => match self.peek() {
                Some('-') => self.take(Punct::MinusMinus),
                Some('=') => self.take(Punct::MinusEq),
                Some('>') => self.take(Punct::Arrow),
                _ => Punct::Minus,
            },
            '*' => match self.peek() {
                Some('=') => self.take(Punct::StarEq),
                _ => Punct::Star,
            },
            '/' => match self.peek() {
                Some('=') => self.take(Punct::SlashEq),
                _ => Punct::Slash,
            },
            '%' => match self.peek() {
                Some('=') => self.take(Punct::PercentEq),
                _ => Punct::Percent,
            },
            '=' => match self.peek() {
                Some('=') => self.take(Punct::EqEq),
                _ => Punct::Eq,
            },
            '!' => match self.peek() {
                Some('=') => self.take(Punct::NotEq),
                _ => Punct::Bang,
            },
            '<' => match self.peek() {
                Some('=') => self.take(Punct::Le),
                Some('<') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.take(Punct::ShlEq)
                    } else {
                        Punct::Shl
                    }
                }
                _ => Punct::Lt,
            },
            '>' => match self.peek() {
                Some('=') => self.take(Punct::Ge),
                Some('>') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.take(Punct::ShrEq)
                    } else {
                        Punct::Shr
                    }
                }
                _ => Punct::Gt,
            },
            '&' => match self.peek() {
                Some('&') => self.take(Punct::AndAnd),
                Some('=') => self.take(Punct::AmpEq),
                _ => Punct::Amp,
            },
            '|' => match self.peek() {
                Some('|') => self.take(Punct::OrOr),
                Some('=') => self.take(Punct::PipeEq),
                _ => Punct::Pipe,
            },
            '^' => match self.peek() {
                Some('=') => self.take(Punct::CaretEq),
                _ => Punct::Caret,
            },
            '~' => Punct::Tilde,
            '.' => {
                if self.peek() == Some('.') && self.peek_ahead(1) == Some('.') {
                    self.advance();
                    self.advance();
                    Punct::Ellipsis
                } else {
                    Punct::Dot
                }
            }
            '?' => Punct::Question,
            ':' => Punct::Colon,
            '(' => Punct::LParen,
            ')' => Punct::RParen,
            '{' => Punct::LBrace,
            '}' => Punct::RBrace,
            '[' => Punct::LBracket,
            ']' => Punct::RBracket,
            ';' => Punct::Semicolon,
            ',' => Punct::Comma,
            _ => {
                return Err(LexError::new(
                    format!("unexpected character: '{}'", ch),
                    pos,
                ));
            }
        };

        Ok(self.token_from(TokenKind::Punct(punct), start, pos))
    }

    /// Consume one more character and return the given punctuator.
    fn take(&mut self, p: Punct) -> Punct {
        self.advance();
        p
    }

    fn token_from(&self, kind: TokenKind, start: usize, pos: Pos) -> Token {
        Token {
            kind,
            text: self.input[start..self.position].iter().collect(),
            pos,
        }
    }

    /// Skip whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let pos = self.current_pos();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::new("unterminated block comment", pos))
    }

    /// Skip a preprocessor directive line, honoring trailing-backslash
    /// continuations.
    fn skip_preprocessor_directive(&mut self) {
        let mut prev = '\0';
        while let Some(ch) = self.advance() {
            if ch == '\n' && prev != '\\' {
                break;
            }
            if ch != '\r' {
                prev = ch;
            }
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source position
    fn current_pos(&self) -> Pos {
        Pos::new(self.position, self.line, self.column)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(tok) => Some(Ok(tok)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Decode the contents of a string literal lexeme (quotes included) into its
/// value. Escape sequences have already been validated by the lexer.
pub(crate) fn string_value(raw: &str) -> String {
    let inner: Vec<char> = raw.chars().collect();
    let inner = &inner[1..inner.len().saturating_sub(1)];
    let mut out = String::with_capacity(inner.len());
    let mut i = 0;
    while i < inner.len() {
        if inner[i] == '\\' && i + 1 < inner.len() {
            let (ch, used) = decode_escape(&inner[i + 1..]);
            out.push(ch);
            i += 1 + used;
        } else {
            out.push(inner[i]);
            i += 1;
        }
    }
    out
}

/// Decode a character literal lexeme (quotes included) into its value.
pub(crate) fn char_value(raw: &str) -> char {
    let inner: Vec<char> = raw.chars().collect();
    let inner = &inner[1..inner.len().saturating_sub(1)];
    match inner {
        [] => '\0',
        ['\\', rest @ ..] => decode_escape(rest).0,
        [ch, ..] => *ch,
    }
}

/// Decode one escape-sequence body, returning the character and the number
/// of input characters consumed.
fn decode_escape(body: &[char]) -> (char, usize) {
    match body {
        ['n', ..] => ('\n', 1),
        ['t', ..] => ('\t', 1),
        ['r', ..] => ('\r', 1),
        ['\\', ..] => ('\\', 1),
        ['\'', ..] => ('\'', 1),
        ['"', ..] => ('"', 1),
        ['0', ..] => ('\0', 1),
        ['x', h1, h2, ..] => {
            let hex: String = [*h1, *h2].iter().collect();
            let value = u8::from_str_radix(&hex, 16).unwrap_or(0);
            (value as char, 3)
        }
        [ch, ..] => (*ch, 1),
        [] => ('\0', 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .collect::<Result<Vec<_>, _>>()
            .expect("lexing failed")
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = lex("int main() { return 0; }");

        assert_eq!(tokens[0].kind, TokenKind::Keyword(Kw::Int));
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].text, "main");
        assert_eq!(tokens[2].kind, TokenKind::Punct(Punct::LParen));
        assert_eq!(tokens[3].kind, TokenKind::Punct(Punct::RParen));
        assert_eq!(tokens[4].kind, TokenKind::Punct(Punct::LBrace));
        assert_eq!(tokens[5].kind, TokenKind::Keyword(Kw::Return));
        assert_eq!(tokens[6].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[7].kind, TokenKind::Punct(Punct::Semicolon));
        assert_eq!(tokens[8].kind, TokenKind::Punct(Punct::RBrace));
        assert_eq!(tokens[9].kind, TokenKind::Eof);
    }

    #[test]
    fn test_multichar_punctuators_greedy() {
        let tokens = lex("<<= << <= < ->  ... >>=");

        assert_eq!(tokens[0].kind, TokenKind::Punct(Punct::ShlEq));
        assert_eq!(tokens[1].kind, TokenKind::Punct(Punct::Shl));
        assert_eq!(tokens[2].kind, TokenKind::Punct(Punct::Le));
        assert_eq!(tokens[3].kind, TokenKind::Punct(Punct::Lt));
        assert_eq!(tokens[4].kind, TokenKind::Punct(Punct::Arrow));
        assert_eq!(tokens[5].kind, TokenKind::Punct(Punct::Ellipsis));
        assert_eq!(tokens[6].kind, TokenKind::Punct(Punct::ShrEq));
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = lex("int x; // comment\nint y; /* block\ncomment */ int z;");

        let idents: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Ident)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(idents, ["x", "y", "z"]);
    }

    #[test]
    fn test_number_literals() {
        let tokens = lex("42 0x1F 017 10UL 1.5 .5 1e9 1.5e-3 2.0f");

        assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[1].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[1].text, "0x1F");
        assert_eq!(tokens[2].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[3].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[3].text, "10UL");
        assert_eq!(tokens[4].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[5].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[5].text, ".5");
        assert_eq!(tokens[6].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[7].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[8].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[8].text, "2.0f");
    }

    #[test]
    fn test_string_literal_raw_and_value() {
        let tokens = lex(r#""hello\nworld""#);

        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, r#""hello\nworld""#);
        assert_eq!(string_value(&tokens[0].text), "hello\nworld");
    }

    #[test]
    fn test_char_literal_value() {
        let tokens = lex(r"'a' '\n' '\x41'");

        assert_eq!(char_value(&tokens[0].text), 'a');
        assert_eq!(char_value(&tokens[1].text), '\n');
        assert_eq!(char_value(&tokens[2].text), 'A');
    }

    #[test]
    fn test_unterminated_string_points_at_opening_quote() {
        let mut lexer = Lexer::new("char *s = \"abc;");
        let err = loop {
            match lexer.next_token() {
                Ok(tok) if tok.kind == TokenKind::Eof => panic!("expected a lex error"),
                Ok(_) => continue,
                Err(e) => break e,
            }
        };

        assert!(err.message.contains("unterminated string"));
        assert_eq!(err.pos.offset, 10);
        assert_eq!(err.pos.line, 1);
        assert_eq!(err.pos.column, 11);
    }

    #[test]
    fn test_preprocessor_skip() {
        let tokens = lex("#include <stdio.h>\n#define X \\\n  1\nint x;");

        assert_eq!(tokens[0].kind, TokenKind::Keyword(Kw::Int));
        assert_eq!(tokens[1].text, "x");
    }

    #[test]
    fn test_spans_monotonic_and_disjoint() {
        let tokens = lex("int main(void) { return x + 1; }");

        let mut prev_end = 0;
        for tok in &tokens {
            assert!(tok.pos.offset >= prev_end, "overlapping token spans");
            prev_end = tok.end_offset();
        }
    }

    #[test]
    fn test_unknown_byte() {
        let mut lexer = Lexer::new("int x = @;");
        let err = loop {
            match lexer.next_token() {
                Ok(tok) if tok.kind == TokenKind::Eof => panic!("expected a lex error"),
                Ok(_) => continue,
                Err(e) => break e,
            }
        };
        assert!(err.message.contains("unexpected character"));
    }
}
