//! Expression parsing implementation
//!
//! This module handles C expressions with full operator precedence:
//!
//! ```text
//! expression  ::= assignment ("," assignment)*
//! assignment  ::= conditional (assign-op assignment)?
//! conditional ::= binary ("?" expression ":" conditional)?
//! binary      ::= cast (bin-op cast)*          // precedence climbing
//! cast        ::= "(" type-name ")" cast | unary
//! unary       ::= unary-op cast | "sizeof" operand | postfix
//! postfix     ::= primary ("(" args ")" | "[" index "]" | "." name
//!                 | "->" name | "++" | "--")*
//! primary     ::= literal | identifier | "(" expression ")"
//! ```
//!
//! The binary level is driven by a precedence table instead of one function
//! per level; [`Parser::parse_binary`] climbs it recursively, building
//! left-associative trees.
//!
//! A `(` at cast position is a cast exactly when the token after it starts
//! a type name, which for a bare identifier means consulting the typedef
//! set: `(my_int)y` casts, `(y)*z` multiplies.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{char_value, string_value, Kw, Punct, TokenKind};
use crate::parser::parse::{Error, ParseError, Parser};

impl Parser {
    /// Parse a full expression, including the comma operator.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, Error> {
        let start = self.pos()?;
        let mut lhs = self.parse_assignment()?;
        while self.eat_punct(Punct::Comma)? {
            let rhs = self.parse_assignment()?;
            lhs = Expr::Binary {
                op: BinOp::Comma,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span: self.span_from(start),
            };
        }
        Ok(lhs)
    }

    /// Parse an assignment expression. Assignment is right-associative:
    /// `a = b = c` is `a = (b = c)`.
    pub(crate) fn parse_assignment(&mut self) -> Result<Expr, Error> {
        let start = self.pos()?;
        let lhs = self.parse_conditional()?;

        let op = match self.peek_kind()? {
            TokenKind::Punct(Punct::Eq) => BinOp::Assign,
            TokenKind::Punct(Punct::PlusEq) => BinOp::AddAssign,
            TokenKind::Punct(Punct::MinusEq) => BinOp::SubAssign,
            TokenKind::Punct(Punct::StarEq) => BinOp::MulAssign,
            TokenKind::Punct(Punct::SlashEq) => BinOp::DivAssign,
            TokenKind::Punct(Punct::PercentEq) => BinOp::ModAssign,
            TokenKind::Punct(Punct::ShlEq) => BinOp::ShlAssign,
            TokenKind::Punct(Punct::ShrEq) => BinOp::ShrAssign,
            TokenKind::Punct(Punct::AmpEq) => BinOp::AndAssign,
            TokenKind::Punct(Punct::PipeEq) => BinOp::OrAssign,
            TokenKind::Punct(Punct::CaretEq) => BinOp::XorAssign,
            _ => return Ok(lhs),
        };
        self.bump()?;
        let rhs = self.parse_assignment()?;
        Ok(Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span: self.span_from(start),
        })
    }

    /// Parse a conditional (`?:`) expression. The else arm is itself a
    /// conditional, so `a ? b : c ? d : e` nests to the right.
    pub(crate) fn parse_conditional(&mut self) -> Result<Expr, Error> {
        let start = self.pos()?;
        let cond = self.parse_binary(1)?;
        if !self.eat_punct(Punct::Question)? {
            return Ok(cond);
        }
        let then_expr = self.parse_expression()?;
        self.expect_punct(Punct::Colon, "in conditional expression")?;
        let else_expr = self.parse_conditional()?;
        Ok(Expr::Conditional {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            span: self.span_from(start),
        })
    }

    /// The binary operator the current token denotes, with its precedence
    /// level (higher binds tighter), or `None` at the end of a binary
    /// expression.
    fn peek_binary_op(&mut self) -> Result<Option<(BinOp, u8)>, Error> {
        let TokenKind::Punct(p) = self.peek_kind()? else {
            return Ok(None);
        };
        let entry = match p {
            Punct::OrOr => (BinOp::LogicalOr, 1),
            Punct::AndAnd => (BinOp::LogicalAnd, 2),
            Punct::Pipe => (BinOp::BitOr, 3),
            Punct::Caret => (BinOp::BitXor, 4),
            Punct::Amp => (BinOp::BitAnd, 5),
            Punct::EqEq => (BinOp::Eq, 6),
            Punct::NotEq => (BinOp::Ne, 6),
            Punct::Lt => (BinOp::Lt, 7),
            Punct::Le => (BinOp::Le, 7),
            Punct::Gt => (BinOp::Gt, 7),
            Punct::Ge => (BinOp::Ge, 7),
            Punct::Shl => (BinOp::Shl, 8),
            Punct::Shr => (BinOp::Shr, 8),
            Punct::Plus => (BinOp::Add, 9),
            Punct::Minus => (BinOp::Sub, 9),
            Punct::Star => (BinOp::Mul, 10),
            Punct::Slash => (BinOp::Div, 10),
            Punct::Percent => (BinOp::Mod, 10),
            _ => return Ok(None),
        };
        Ok(Some(entry))
    }

    /// Precedence climbing over the binary operator table. Builds
    /// left-associative trees: the recursive call only accepts operators
    /// that bind strictly tighter.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, Error> {
        let start = self.pos()?;
        let mut lhs = self.parse_cast()?;

        while let Some((op, prec)) = self.peek_binary_op()? {
            if prec < min_prec {
                break;
            }
            self.bump()?;
            let rhs = self.parse_binary(prec + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span: self.span_from(start),
            };
        }

        Ok(lhs)
    }

    /// Parse a cast expression: `(type-name) cast` or a unary expression.
    fn parse_cast(&mut self) -> Result<Expr, Error> {
        let start = self.pos()?;
        if self.at_punct(Punct::LParen)? && self.nth_starts_type(1)? {
            self.bump()?;
            let ty = self.parse_type_name()?;
            self.expect_punct(Punct::RParen, "after cast type")?;
            let operand = self.parse_cast()?;
            return Ok(Expr::Cast {
                ty,
                operand: Box::new(operand),
                span: self.span_from(start),
            });
        }
        self.parse_unary()
    }

    /// Parse a type name for casts and `sizeof`: declaration specifiers
    /// plus an abstract declarator.
    fn parse_type_name(&mut self) -> Result<Type, Error> {
        let start = self.pos()?;
        let specs = self.parse_declaration_specifiers()?;
        if specs.is_typedef {
            return Err(Error::Parse(ParseError::new(
                "typedef is not allowed in a type name",
                start,
            )));
        }
        let declarator = self.parse_declarator()?;
        let (name, ty) = declarator.resolve(specs.ty);
        if name.is_some() {
            return Err(Error::Parse(ParseError::new(
                "a type name cannot declare an identifier",
                start,
            )));
        }
        Ok(ty)
    }

    /// Parse a unary expression: prefix operators, `sizeof`, or a postfix
    /// expression.
    fn parse_unary(&mut self) -> Result<Expr, Error> {
        let start = self.pos()?;

        if self.at_kw(Kw::Sizeof)? {
            self.bump()?;
            // sizeof(type) needs the same lookahead as a cast; anything
            // else is sizeof applied to a unary expression.
            if self.at_punct(Punct::LParen)? && self.nth_starts_type(1)? {
                self.bump()?;
                let ty = self.parse_type_name()?;
                self.expect_punct(Punct::RParen, "after sizeof type")?;
                return Ok(Expr::SizeofType {
                    ty,
                    span: self.span_from(start),
                });
            }
            let operand = self.parse_unary()?;
            return Ok(Expr::SizeofExpr {
                operand: Box::new(operand),
                span: self.span_from(start),
            });
        }

        let op = match self.peek_kind()? {
            TokenKind::Punct(Punct::Minus) => UnOp::Neg,
            TokenKind::Punct(Punct::Bang) => UnOp::Not,
            TokenKind::Punct(Punct::Tilde) => UnOp::BitNot,
            TokenKind::Punct(Punct::PlusPlus) => UnOp::PreInc,
            TokenKind::Punct(Punct::MinusMinus) => UnOp::PreDec,
            TokenKind::Punct(Punct::Star) => UnOp::Deref,
            TokenKind::Punct(Punct::Amp) => UnOp::AddrOf,
            TokenKind::Punct(Punct::Plus) => {
                // Unary plus is a no-op; the operand stands on its own.
                self.bump()?;
                return self.parse_cast();
            }
            _ => return self.parse_postfix(),
        };
        self.bump()?;
        let operand = self.parse_cast()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            span: self.span_from(start),
        })
    }

    /// Parse a postfix expression: a primary followed by any run of call,
    /// index, member access, and increment/decrement suffixes.
    fn parse_postfix(&mut self) -> Result<Expr, Error> {
        let start = self.pos()?;
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek_kind()? {
                TokenKind::Punct(Punct::LParen) => {
                    self.bump()?;
                    let mut args = Vec::new();
                    if !self.at_punct(Punct::RParen)? {
                        loop {
                            args.push(self.parse_assignment()?);
                            if !self.eat_punct(Punct::Comma)? {
                                break;
                            }
                        }
                    }
                    self.expect_punct(Punct::RParen, "after call arguments")?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        span: self.span_from(start),
                    };
                }
                TokenKind::Punct(Punct::LBracket) => {
                    self.bump()?;
                    let index = self.parse_expression()?;
                    self.expect_punct(Punct::RBracket, "after index expression")?;
                    expr = Expr::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                        span: self.span_from(start),
                    };
                }
                TokenKind::Punct(p @ (Punct::Dot | Punct::Arrow)) => {
                    self.bump()?;
                    let (member, _) = self.expect_ident("after member access operator")?;
                    expr = Expr::Member {
                        base: Box::new(expr),
                        member,
                        arrow: p == Punct::Arrow,
                        span: self.span_from(start),
                    };
                }
                TokenKind::Punct(Punct::PlusPlus) => {
                    self.bump()?;
                    expr = Expr::Unary {
                        op: UnOp::PostInc,
                        operand: Box::new(expr),
                        span: self.span_from(start),
                    };
                }
                TokenKind::Punct(Punct::MinusMinus) => {
                    self.bump()?;
                    expr = Expr::Unary {
                        op: UnOp::PostDec,
                        operand: Box::new(expr),
                        span: self.span_from(start),
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Parse a primary expression: a literal, an identifier, or a
    /// parenthesized expression.
    fn parse_primary(&mut self) -> Result<Expr, Error> {
        let start = self.pos()?;
        match self.peek_kind()? {
            TokenKind::IntLiteral => {
                let tok = self.bump()?;
                let value = int_literal_value(&tok.text, tok.pos)?;
                Ok(Expr::IntLiteral {
                    value,
                    span: self.span_from(start),
                })
            }
            TokenKind::FloatLiteral => {
                let tok = self.bump()?;
                let value = float_literal_value(&tok.text, tok.pos)?;
                Ok(Expr::FloatLiteral {
                    value,
                    span: self.span_from(start),
                })
            }
            TokenKind::CharLiteral => {
                let tok = self.bump()?;
                Ok(Expr::CharLiteral {
                    value: char_value(&tok.text),
                    span: self.span_from(start),
                })
            }
            TokenKind::StringLiteral => {
                // Adjacent string literals concatenate.
                let mut value = String::new();
                while self.peek_kind()? == TokenKind::StringLiteral {
                    let tok = self.bump()?;
                    value.push_str(&string_value(&tok.text));
                }
                Ok(Expr::StringLiteral {
                    value,
                    span: self.span_from(start),
                })
            }
            TokenKind::Ident => {
                let tok = self.bump()?;
                Ok(Expr::Identifier {
                    name: tok.text,
                    span: self.span_from(start),
                })
            }
            TokenKind::Punct(Punct::LParen) => {
                self.bump()?;
                let expr = self.parse_expression()?;
                self.expect_punct(Punct::RParen, "after parenthesized expression")?;
                Ok(expr)
            }
            _ => Err(self.expected("an expression")),
        }
    }
}

/// Convert an integer literal lexeme to its value, honoring hex and octal
/// prefixes and ignoring `u`/`l` suffixes.
fn int_literal_value(text: &str, pos: Pos) -> Result<i64, Error> {
    let digits = text.trim_end_matches(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
    let parsed = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8)
    } else {
        digits.parse()
    };
    parsed.map_err(|_| {
        Error::Parse(ParseError::new(
            format!("invalid integer literal: {}", text),
            pos,
        ))
    })
}

/// Convert a float literal lexeme to its value, ignoring an `f`/`l` suffix.
fn float_literal_value(text: &str, pos: Pos) -> Result<f64, Error> {
    let digits = text.trim_end_matches(|c| matches!(c, 'f' | 'F' | 'l' | 'L'));
    digits.parse().map_err(|_| {
        Error::Parse(ParseError::new(
            format!("invalid float literal: {}", text),
            pos,
        ))
    })
}
