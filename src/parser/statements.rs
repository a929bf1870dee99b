//! Statement parsing implementation
//!
//! This module handles all C statements: compound blocks, control flow
//! (`if`/`while`/`do`/`for`/`switch`), jumps (`break`/`continue`/`return`/
//! `goto`), labels, expression statements, block-level declarations, and
//! the empty statement.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Kw, Punct, TokenKind};
use crate::parser::parse::{Error, Parser};

impl Parser {
    /// Parse a `{ ... }` block. Block-level declarations are allowed and
    /// flattened to one [`Stmt::Decl`] per declared name.
    pub(crate) fn parse_compound_statement(&mut self) -> Result<Stmt, Error> {
        let start = self.pos()?;
        self.expect_punct(Punct::LBrace, "to open a block")?;

        let mut body = Vec::new();
        while !self.at_punct(Punct::RBrace)? {
            if self.at_eof()? {
                return Err(self.expected("'}' to close a block"));
            }
            body.extend(self.parse_block_item()?);
        }
        self.expect_punct(Punct::RBrace, "to close a block")?;

        Ok(Stmt::Compound {
            body,
            span: self.span_from(start),
        })
    }

    /// Parse one item of a block: a declaration (possibly several
    /// statements, one per declarator) or a single statement.
    fn parse_block_item(&mut self) -> Result<Vec<Stmt>, Error> {
        if self.at_label()? || !self.starts_declaration()? {
            return Ok(vec![self.parse_statement()?]);
        }
        let start = self.pos()?;
        let decls = self.parse_declaration(false)?;
        let span = self.span_from(start);
        Ok(decls
            .into_iter()
            .map(|decl| Stmt::Decl { decl, span })
            .collect())
    }

    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, Error> {
        let start = self.pos()?;

        // Labels first: a typedef name is still a valid label.
        if self.at_label()? {
            let (name, _) = self.expect_ident("as a label")?;
            self.expect_punct(Punct::Colon, "after label")?;
            return Ok(Stmt::Label {
                name,
                span: self.span_from(start),
            });
        }

        match self.peek_kind()? {
            TokenKind::Punct(Punct::LBrace) => self.parse_compound_statement(),
            TokenKind::Punct(Punct::Semicolon) => {
                self.bump()?;
                Ok(Stmt::Empty {
                    span: self.span_from(start),
                })
            }
            TokenKind::Keyword(Kw::If) => self.parse_if_statement(),
            TokenKind::Keyword(Kw::While) => self.parse_while_statement(),
            TokenKind::Keyword(Kw::Do) => self.parse_do_while_statement(),
            TokenKind::Keyword(Kw::For) => self.parse_for_statement(),
            TokenKind::Keyword(Kw::Switch) => self.parse_switch_statement(),
            TokenKind::Keyword(Kw::Break) => {
                self.bump()?;
                self.expect_punct(Punct::Semicolon, "after 'break'")?;
                Ok(Stmt::Break {
                    span: self.span_from(start),
                })
            }
            TokenKind::Keyword(Kw::Continue) => {
                self.bump()?;
                self.expect_punct(Punct::Semicolon, "after 'continue'")?;
                Ok(Stmt::Continue {
                    span: self.span_from(start),
                })
            }
            TokenKind::Keyword(Kw::Return) => {
                self.bump()?;
                let value = if self.at_punct(Punct::Semicolon)? {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect_punct(Punct::Semicolon, "after return value")?;
                Ok(Stmt::Return {
                    value,
                    span: self.span_from(start),
                })
            }
            TokenKind::Keyword(Kw::Goto) => {
                self.bump()?;
                let (label, _) = self.expect_ident("after 'goto'")?;
                self.expect_punct(Punct::Semicolon, "after goto label")?;
                Ok(Stmt::Goto {
                    label,
                    span: self.span_from(start),
                })
            }
            _ if self.starts_declaration()? => {
                // A declaration where a single statement is required
                // (e.g. an unbraced `if` body).
                let decls = self.parse_declaration(false)?;
                let span = self.span_from(start);
                self.decls_to_stmt(decls, span)
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect_punct(Punct::Semicolon, "after expression")?;
                Ok(Stmt::Expr {
                    expr,
                    span: self.span_from(start),
                })
            }
        }
    }

    /// Is the current position a `name:` label?
    fn at_label(&mut self) -> Result<bool, Error> {
        Ok(self.peek_kind()? == TokenKind::Ident
            && self.peek_nth(1)?.kind == TokenKind::Punct(Punct::Colon))
    }

    /// Wrap declaration results into a single statement. A multi-declarator
    /// declaration in single-statement position becomes a compound holding
    /// one [`Stmt::Decl`] per name.
    fn decls_to_stmt(&mut self, decls: Vec<Decl>, span: Span) -> Result<Stmt, Error> {
        let mut stmts: Vec<Stmt> = decls
            .into_iter()
            .map(|decl| Stmt::Decl { decl, span })
            .collect();
        if stmts.len() == 1 {
            Ok(stmts.pop().expect("one statement"))
        } else {
            Ok(Stmt::Compound { body: stmts, span })
        }
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, Error> {
        let start = self.pos()?;
        self.expect_kw(Kw::If, "")?;
        self.expect_punct(Punct::LParen, "after 'if'")?;
        let cond = self.parse_expression()?;
        self.expect_punct(Punct::RParen, "after if condition")?;
        let then_branch = Box::new(self.parse_statement()?);
        // The else binds to the nearest if, which recursive descent gives
        // us for free.
        let else_branch = if self.eat_kw(Kw::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
            span: self.span_from(start),
        })
    }

    fn parse_while_statement(&mut self) -> Result<Stmt, Error> {
        let start = self.pos()?;
        self.expect_kw(Kw::While, "")?;
        self.expect_punct(Punct::LParen, "after 'while'")?;
        let cond = self.parse_expression()?;
        self.expect_punct(Punct::RParen, "after while condition")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::While {
            cond,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_do_while_statement(&mut self) -> Result<Stmt, Error> {
        let start = self.pos()?;
        self.expect_kw(Kw::Do, "")?;
        let body = Box::new(self.parse_statement()?);
        self.expect_kw(Kw::While, "after do body")?;
        self.expect_punct(Punct::LParen, "after 'while'")?;
        let cond = self.parse_expression()?;
        self.expect_punct(Punct::RParen, "after do-while condition")?;
        self.expect_punct(Punct::Semicolon, "after do-while")?;
        Ok(Stmt::DoWhile {
            body,
            cond,
            span: self.span_from(start),
        })
    }

    fn parse_for_statement(&mut self) -> Result<Stmt, Error> {
        let start = self.pos()?;
        self.expect_kw(Kw::For, "")?;
        self.expect_punct(Punct::LParen, "after 'for'")?;

        // Initializer: empty, a declaration, or an expression statement.
        // Declarations and expression statements both consume their `;`.
        let init = if self.eat_punct(Punct::Semicolon)? {
            None
        } else if self.starts_declaration()? {
            let init_start = self.pos()?;
            let decls = self.parse_declaration(false)?;
            let span = self.span_from(init_start);
            Some(Box::new(self.decls_to_stmt(decls, span)?))
        } else {
            let init_start = self.pos()?;
            let expr = self.parse_expression()?;
            self.expect_punct(Punct::Semicolon, "after for initializer")?;
            Some(Box::new(Stmt::Expr {
                expr,
                span: self.span_from(init_start),
            }))
        };

        let cond = if self.at_punct(Punct::Semicolon)? {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(Punct::Semicolon, "after for condition")?;

        let step = if self.at_punct(Punct::RParen)? {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(Punct::RParen, "after for clauses")?;

        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::For {
            init,
            cond,
            step,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_switch_statement(&mut self) -> Result<Stmt, Error> {
        let start = self.pos()?;
        self.expect_kw(Kw::Switch, "")?;
        self.expect_punct(Punct::LParen, "after 'switch'")?;
        let cond = self.parse_expression()?;
        self.expect_punct(Punct::RParen, "after switch condition")?;
        self.expect_punct(Punct::LBrace, "to open switch body")?;

        let mut cases = Vec::new();
        while !self.at_punct(Punct::RBrace)? {
            let case_start = self.pos()?;
            if self.eat_kw(Kw::Case)? {
                let value = self.parse_conditional()?;
                self.expect_punct(Punct::Colon, "after case value")?;
                let body = self.parse_case_body()?;
                cases.push(SwitchCase::Case {
                    value,
                    body,
                    span: self.span_from(case_start),
                });
            } else if self.eat_kw(Kw::Default)? {
                self.expect_punct(Punct::Colon, "after 'default'")?;
                let body = self.parse_case_body()?;
                cases.push(SwitchCase::Default {
                    body,
                    span: self.span_from(case_start),
                });
            } else {
                return Err(self.expected("'case' or 'default'"));
            }
        }
        self.expect_punct(Punct::RBrace, "to close switch body")?;

        Ok(Stmt::Switch {
            cond,
            cases,
            span: self.span_from(start),
        })
    }

    /// Parse the statements of one case group, up to the next `case`,
    /// `default`, or the end of the switch body.
    fn parse_case_body(&mut self) -> Result<Vec<Stmt>, Error> {
        let mut body = Vec::new();
        loop {
            if self.at_punct(Punct::RBrace)? || self.at_kw(Kw::Case)? || self.at_kw(Kw::Default)? {
                break;
            }
            if self.at_eof()? {
                return Err(self.expected("'}' to close switch body"));
            }
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse;

    fn body_of(source: &str) -> Vec<Stmt> {
        let unit = parse(source).expect("parse failed");
        let Some(Decl::Function { body: Some(body), .. }) = unit.decls.into_iter().next()
        else {
            panic!("expected a function definition");
        };
        let Stmt::Compound { body, .. } = *body else {
            panic!("expected a compound body");
        };
        body
    }

    #[test]
    fn test_if_else_chain() {
        let body = body_of(
            "void f(int x) { if (x > 0) return; else if (x < 0) x = 0; else x = 1; }",
        );
        let Stmt::If { else_branch, .. } = &body[0] else {
            panic!("expected if statement");
        };
        // else-if nests as an if inside the else branch
        assert!(matches!(
            else_branch.as_deref(),
            Some(Stmt::If { else_branch: Some(_), .. })
        ));
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        let body = body_of("void f(int x) { if (x) if (x > 1) x = 2; else x = 3; }");
        let Stmt::If { then_branch, else_branch, .. } = &body[0] else {
            panic!("expected if statement");
        };
        assert!(else_branch.is_none());
        assert!(matches!(
            then_branch.as_ref(),
            Stmt::If { else_branch: Some(_), .. }
        ));
    }

    #[test]
    fn test_while_and_do_while() {
        let body = body_of("void f(void) { while (1) break; do continue; while (0); }");
        assert!(matches!(&body[0], Stmt::While { body, .. }
            if matches!(body.as_ref(), Stmt::Break { .. })));
        assert!(matches!(&body[1], Stmt::DoWhile { body, .. }
            if matches!(body.as_ref(), Stmt::Continue { .. })));
    }

    #[test]
    fn test_for_with_declaration_init() {
        let body = body_of("void f(void) { for (int i = 0; i < 10; i++) ; }");
        let Stmt::For { init, cond, step, body, .. } = &body[0] else {
            panic!("expected for statement");
        };
        assert!(matches!(
            init.as_deref(),
            Some(Stmt::Decl { decl: Decl::Var { .. }, .. })
        ));
        assert!(matches!(cond, Some(Expr::Binary { op: BinOp::Lt, .. })));
        assert!(matches!(
            step,
            Some(Expr::Unary { op: UnOp::PostInc, .. })
        ));
        assert!(matches!(body.as_ref(), Stmt::Empty { .. }));
    }

    #[test]
    fn test_for_with_empty_clauses() {
        let body = body_of("void f(void) { for (;;) break; }");
        let Stmt::For { init, cond, step, .. } = &body[0] else {
            panic!("expected for statement");
        };
        assert!(init.is_none());
        assert!(cond.is_none());
        assert!(step.is_none());
    }

    #[test]
    fn test_switch_cases_and_default() {
        let body = body_of(
            "void f(int x) { switch (x) { case 1: x = 10; break; case 2: default: x = 0; } }",
        );
        let Stmt::Switch { cases, .. } = &body[0] else {
            panic!("expected switch statement");
        };
        assert_eq!(cases.len(), 3);
        let SwitchCase::Case { value, body, .. } = &cases[0] else {
            panic!("expected case group");
        };
        assert!(matches!(value, Expr::IntLiteral { value: 1, .. }));
        assert_eq!(body.len(), 2);
        // fallthrough case with an empty body
        assert!(matches!(&cases[1], SwitchCase::Case { body, .. } if body.is_empty()));
        assert!(matches!(&cases[2], SwitchCase::Default { body, .. } if body.len() == 1));
    }

    #[test]
    fn test_goto_and_label() {
        let body = body_of("void f(void) { again: f(); goto again; }");
        assert!(matches!(&body[0], Stmt::Label { name, .. } if name == "again"));
        assert!(matches!(&body[2], Stmt::Goto { label, .. } if label == "again"));
    }

    #[test]
    fn test_block_declarations_flatten() {
        let body = body_of("void f(void) { int a = 1, b = 2; a = b; }");
        assert_eq!(body.len(), 3);
        assert!(matches!(&body[0], Stmt::Decl { decl: Decl::Var { name, .. }, .. }
            if name == "a"));
        assert!(matches!(&body[1], Stmt::Decl { decl: Decl::Var { name, .. }, .. }
            if name == "b"));
        assert!(matches!(&body[2], Stmt::Expr { .. }));
    }

    #[test]
    fn test_empty_statement() {
        let body = body_of("void f(void) { ;; }");
        assert_eq!(body.len(), 2);
        assert!(matches!(&body[0], Stmt::Empty { .. }));
    }

    #[test]
    fn test_return_without_value() {
        let body = body_of("void f(void) { return; }");
        assert!(matches!(&body[0], Stmt::Return { value: None, .. }));
    }

    #[test]
    fn test_nested_prototype_inside_function_body() {
        // declarations inside a function body nest a Decl back inside a Stmt
        let body = body_of("void f(void) { int g(void); g(); }");
        assert!(matches!(
            &body[0],
            Stmt::Decl { decl: Decl::Function { body: None, .. }, .. }
        ));
        assert!(matches!(&body[1], Stmt::Expr { .. }));
    }

    #[test]
    fn test_nested_function_definition_rejected() {
        let err = parse("void f(void) { int g(void) { return 1; } }").unwrap_err();
        assert!(err.to_string().contains("file scope"));
    }
}
