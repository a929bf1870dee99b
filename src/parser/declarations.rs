//! Declaration parsing implementation
//!
//! This module handles C declarations: declaration specifiers, declarators,
//! struct/union/enum bodies, typedefs, and function definitions.
//!
//! # Grammar
//!
//! ```text
//! declaration  ::= specifiers (";" | init-declarator ("," init-declarator)* ";"
//!                              | declarator compound-stmt)
//! specifiers   ::= ("typedef" | qualifier | base-type-word
//!                   | struct-or-union-spec | enum-spec | typedef-name)+
//! declarator   ::= "*"* direct-declarator
//! direct       ::= (identifier | "(" declarator ")")? ("[" size? "]" | "(" params ")")*
//! ```
//!
//! Declarators are parsed into a [`Declarator`] chain wrapping the declared
//! name, then resolved against the base type outside-in, so the derived
//! type nests the way C's "spiral rule" dictates: `int *a[3]` is an array
//! of pointers, `int (*f)(void)` is a pointer to a function.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Kw, Punct, TokenKind};
use crate::parser::parse::{Error, ParseError, Parser};

/// Parsed declaration specifiers: an optional `typedef` storage class and
/// the base type. `static`/`extern` and qualifiers are accepted and
/// dropped; they carry no information this tool emits.
pub(crate) struct DeclSpecs {
    pub is_typedef: bool,
    pub ty: Type,
}

/// A declarator chain, wrapping the declared name (or nothing, for
/// abstract declarators). Resolved against a base type by [`Declarator::resolve`].
#[derive(Debug)]
pub(crate) enum Declarator {
    /// No name and no modifiers (abstract declarator core).
    Abstract,
    Ident { name: String },
    Pointer { inner: Box<Declarator> },
    Array {
        inner: Box<Declarator>,
        size: Option<Box<Expr>>,
    },
    Function {
        inner: Box<Declarator>,
        params: Vec<ParamDecl>,
        variadic: bool,
    },
}

impl Declarator {
    /// Apply the chain to a base type, producing the declared name (if
    /// any) and the full derived type. The outermost chain node wraps the
    /// base type first, which is exactly C's inside-out declarator
    /// semantics.
    pub(crate) fn resolve(self, base: Type) -> (Option<String>, Type) {
        match self {
            Declarator::Abstract => (None, base),
            Declarator::Ident { name } => (Some(name), base),
            Declarator::Pointer { inner } => inner.resolve(Type::Pointer {
                pointee: Box::new(base),
            }),
            Declarator::Array { inner, size } => inner.resolve(Type::Array {
                element: Box::new(base),
                size,
            }),
            Declarator::Function {
                inner,
                params,
                variadic,
            } => inner.resolve(Type::Function {
                return_type: Box::new(base),
                params,
                variadic,
            }),
        }
    }
}

impl Parser {
    /// Parse one external declaration: a function definition, or a
    /// declaration producing one [`Decl`] per declared name.
    pub(crate) fn parse_external_declaration(&mut self) -> Result<Vec<Decl>, Error> {
        self.parse_declaration(true)
    }

    /// Parse a declaration. `allow_function_def` is true only at the top
    /// level; a `{` after a function declarator elsewhere is an error.
    pub(crate) fn parse_declaration(
        &mut self,
        allow_function_def: bool,
    ) -> Result<Vec<Decl>, Error> {
        let start = self.pos()?;
        let specs = self.parse_declaration_specifiers()?;

        // Tag-only declaration: `struct S { ... };`, `enum E { ... };`
        if self.eat_punct(Punct::Semicolon)? {
            let span = self.span_from(start);
            if specs.is_typedef {
                return Err(Error::Parse(ParseError::new(
                    "typedef requires a declarator",
                    start,
                )));
            }
            let decl = match specs.ty {
                Type::Struct { name, members } => Decl::Struct {
                    name,
                    members: members.unwrap_or_default(),
                    span,
                },
                Type::Union { name, members } => Decl::Union {
                    name,
                    members: members.unwrap_or_default(),
                    span,
                },
                Type::Enum { name, enumerators } => Decl::Enum {
                    name,
                    enumerators: enumerators.unwrap_or_default(),
                    span,
                },
                _ => {
                    return Err(Error::Parse(ParseError::new(
                        "declaration declares nothing",
                        start,
                    )));
                }
            };
            return Ok(vec![decl]);
        }

        let declarator = self.parse_declarator()?;
        let (name, ty) = declarator.resolve(specs.ty.clone());
        let Some(name) = name else {
            return Err(self.expected("a declarator"));
        };

        // Function definition: function declarator directly followed by a
        // body.
        if matches!(ty, Type::Function { .. }) && self.at_punct(Punct::LBrace)? {
            if !allow_function_def {
                return Err(Error::Parse(ParseError::new(
                    "function definitions are only allowed at file scope",
                    start,
                )));
            }
            if specs.is_typedef {
                return Err(Error::Parse(ParseError::new(
                    "typedef cannot define a function",
                    start,
                )));
            }
            let body = self.parse_compound_statement()?;
            return Ok(vec![Decl::Function {
                name,
                ty,
                body: Some(Box::new(body)),
                span: self.span_from(start),
            }]);
        }

        // Init-declarator list: one Decl per declared name.
        let mut decls = Vec::new();
        let mut pending = (name, ty);
        loop {
            let (name, ty) = pending;
            let init = if self.eat_punct(Punct::Eq)? {
                Some(self.parse_initializer()?)
            } else {
                None
            };
            let span = self.span_from(start);

            let decl = if specs.is_typedef {
                if init.is_some() {
                    return Err(Error::Parse(ParseError::new(
                        "typedef cannot have an initializer",
                        start,
                    )));
                }
                // Register before parsing continues so later declarations
                // in this translation unit can use the name as a type.
                self.register_typedef(&name);
                Decl::Typedef { name, ty, span }
            } else if matches!(ty, Type::Function { .. }) {
                if init.is_some() {
                    return Err(Error::Parse(ParseError::new(
                        "a function declaration cannot have an initializer",
                        start,
                    )));
                }
                Decl::Function {
                    name,
                    ty,
                    body: None,
                    span,
                }
            } else {
                Decl::Var { name, ty, init, span }
            };
            decls.push(decl);

            if !self.eat_punct(Punct::Comma)? {
                break;
            }
            let declarator = self.parse_declarator()?;
            let (name, ty) = declarator.resolve(specs.ty.clone());
            let Some(name) = name else {
                return Err(self.expected("a declarator"));
            };
            pending = (name, ty);
        }

        self.expect_punct(Punct::Semicolon, "after declaration")?;
        // Spans were taken before the `;`; widen them to cover it.
        let span = self.span_from(start);
        for decl in &mut decls {
            match decl {
                Decl::Function { span: s, .. }
                | Decl::Var { span: s, .. }
                | Decl::Typedef { span: s, .. }
                | Decl::Struct { span: s, .. }
                | Decl::Union { span: s, .. }
                | Decl::Enum { span: s, .. } => *s = span,
            }
        }
        Ok(decls)
    }

    /// Parse declaration specifiers into a storage class and base type.
    pub(crate) fn parse_declaration_specifiers(&mut self) -> Result<DeclSpecs, Error> {
        let mut is_typedef = false;
        let mut words: Vec<&'static str> = Vec::new();
        let mut tagged: Option<Type> = None;

        loop {
            match self.peek_kind()? {
                TokenKind::Keyword(Kw::Typedef) => {
                    self.bump()?;
                    is_typedef = true;
                }
                TokenKind::Keyword(Kw::Const)
                | TokenKind::Keyword(Kw::Volatile)
                | TokenKind::Keyword(Kw::Static)
                | TokenKind::Keyword(Kw::Extern) => {
                    self.bump()?;
                }
                TokenKind::Keyword(
                    kw @ (Kw::Void
                    | Kw::Int
                    | Kw::Char
                    | Kw::Float
                    | Kw::Double
                    | Kw::Long
                    | Kw::Short
                    | Kw::Signed
                    | Kw::Unsigned),
                ) if tagged.is_none() => {
                    self.bump()?;
                    words.push(kw.as_str());
                }
                TokenKind::Keyword(Kw::Struct) | TokenKind::Keyword(Kw::Union)
                    if words.is_empty() && tagged.is_none() =>
                {
                    tagged = Some(self.parse_record_specifier()?);
                }
                TokenKind::Keyword(Kw::Enum) if words.is_empty() && tagged.is_none() => {
                    tagged = Some(self.parse_enum_specifier()?);
                }
                TokenKind::Ident if words.is_empty() && tagged.is_none() => {
                    let name = self.peek()?.text.clone();
                    if !self.is_type_name(&name) {
                        break;
                    }
                    self.bump()?;
                    tagged = Some(Type::Named { name });
                }
                _ => break,
            }
        }

        if let Some(ty) = tagged {
            return Ok(DeclSpecs { is_typedef, ty });
        }
        if words.is_empty() {
            return Err(self.expected("a type specifier"));
        }
        Ok(DeclSpecs {
            is_typedef,
            ty: Type::Named {
                name: words.join(" "),
            },
        })
    }

    /// Parse a declarator: pointer prefix, then a direct declarator.
    pub(crate) fn parse_declarator(&mut self) -> Result<Declarator, Error> {
        if self.eat_punct(Punct::Star)? {
            // Qualifiers after `*` are accepted and dropped.
            while self.eat_kw(Kw::Const)? || self.eat_kw(Kw::Volatile)? {}
            let inner = self.parse_declarator()?;
            return Ok(Declarator::Pointer {
                inner: Box::new(inner),
            });
        }
        self.parse_direct_declarator()
    }

    /// Parse a direct declarator: the core (identifier, parenthesized
    /// declarator, or nothing) followed by `[size]` / `(params)` suffixes.
    fn parse_direct_declarator(&mut self) -> Result<Declarator, Error> {
        let mut decl = match self.peek_kind()? {
            TokenKind::Ident => {
                let tok = self.bump()?;
                Declarator::Ident { name: tok.text }
            }
            TokenKind::Punct(Punct::LParen) if self.paren_is_grouping()? => {
                self.bump()?;
                let inner = self.parse_declarator()?;
                self.expect_punct(Punct::RParen, "after parenthesized declarator")?;
                inner
            }
            _ => Declarator::Abstract,
        };

        loop {
            if self.eat_punct(Punct::LBracket)? {
                let size = if self.at_punct(Punct::RBracket)? {
                    None
                } else {
                    Some(Box::new(self.parse_conditional()?))
                };
                self.expect_punct(Punct::RBracket, "after array size")?;
                decl = Declarator::Array {
                    inner: Box::new(decl),
                    size,
                };
            } else if self.eat_punct(Punct::LParen)? {
                let (params, variadic) = self.parse_parameter_list()?;
                self.expect_punct(Punct::RParen, "after parameter list")?;
                decl = Declarator::Function {
                    inner: Box::new(decl),
                    params,
                    variadic,
                };
            } else {
                break;
            }
        }

        Ok(decl)
    }

    /// At a `(` in declarator core position: is it a parenthesized
    /// declarator (grouping) rather than a parameter list? It is a
    /// parameter list when the next token starts a type or closes the
    /// parens immediately; this is where the typedef-name set decides
    /// `int (my_int)` (function taking `my_int`) versus `int (x)`
    /// (parenthesized name `x`).
    fn paren_is_grouping(&mut self) -> Result<bool, Error> {
        let starts_params = self.nth_starts_type(1)?
            || self.peek_nth(1)?.kind == TokenKind::Punct(Punct::RParen);
        Ok(!starts_params)
    }

    /// Parse a parameter list (the `(` is already consumed, the `)` is
    /// left for the caller). `()` and `(void)` mean no parameters; a
    /// trailing `...` marks a variadic function.
    fn parse_parameter_list(&mut self) -> Result<(Vec<ParamDecl>, bool), Error> {
        let mut params = Vec::new();
        let mut variadic = false;

        if self.at_punct(Punct::RParen)? {
            return Ok((params, variadic));
        }
        if self.at_kw(Kw::Void)? && self.peek_nth(1)?.kind == TokenKind::Punct(Punct::RParen) {
            self.bump()?;
            return Ok((params, variadic));
        }

        loop {
            if self.eat_punct(Punct::Ellipsis)? {
                variadic = true;
                break;
            }

            let start = self.pos()?;
            let specs = self.parse_declaration_specifiers()?;
            if specs.is_typedef {
                return Err(Error::Parse(ParseError::new(
                    "typedef is not allowed in a parameter list",
                    start,
                )));
            }
            let declarator = self.parse_declarator()?;
            let (name, ty) = declarator.resolve(specs.ty);
            params.push(ParamDecl {
                name,
                ty,
                span: self.span_from(start),
            });

            if !self.eat_punct(Punct::Comma)? {
                break;
            }
        }

        Ok((params, variadic))
    }

    /// Parse a `struct`/`union` specifier: keyword, optional tag, optional
    /// `{ members }`.
    fn parse_record_specifier(&mut self) -> Result<Type, Error> {
        let start = self.pos()?;
        let is_union = self.at_kw(Kw::Union)?;
        self.bump()?; // 'struct' or 'union'

        let name = if self.peek_kind()? == TokenKind::Ident {
            Some(self.bump()?.text)
        } else {
            None
        };

        let members = if self.eat_punct(Punct::LBrace)? {
            let mut members = Vec::new();
            while !self.at_punct(Punct::RBrace)? {
                members.extend(self.parse_member_declaration()?);
            }
            self.expect_punct(Punct::RBrace, "after member declarations")?;
            Some(members)
        } else {
            None
        };

        if name.is_none() && members.is_none() {
            return Err(Error::Parse(ParseError::new(
                if is_union {
                    "expected union tag or body"
                } else {
                    "expected struct tag or body"
                },
                start,
            )));
        }

        Ok(if is_union {
            Type::Union { name, members }
        } else {
            Type::Struct { name, members }
        })
    }

    /// Parse one member declaration line of a struct/union body, which may
    /// declare several members (`int x, y;`) or an anonymous member
    /// (`union { ... };`).
    fn parse_member_declaration(&mut self) -> Result<Vec<MemberDecl>, Error> {
        let start = self.pos()?;
        let specs = self.parse_declaration_specifiers()?;
        if specs.is_typedef {
            return Err(Error::Parse(ParseError::new(
                "typedef is not allowed in a member declaration",
                start,
            )));
        }

        // Anonymous member: specifiers directly followed by `;`.
        if self.eat_punct(Punct::Semicolon)? {
            return Ok(vec![MemberDecl {
                name: None,
                ty: specs.ty,
                span: self.span_from(start),
            }]);
        }

        let mut members = Vec::new();
        loop {
            let declarator = self.parse_declarator()?;
            let (name, ty) = declarator.resolve(specs.ty.clone());
            if name.is_none() {
                return Err(self.expected("a member name"));
            }
            members.push(MemberDecl {
                name,
                ty,
                span: self.span_from(start),
            });
            if !self.eat_punct(Punct::Comma)? {
                break;
            }
        }
        self.expect_punct(Punct::Semicolon, "after member declaration")?;
        let span = self.span_from(start);
        for member in &mut members {
            member.span = span;
        }
        Ok(members)
    }

    /// Parse an `enum` specifier: keyword, optional tag, optional
    /// enumerator body (trailing comma allowed).
    fn parse_enum_specifier(&mut self) -> Result<Type, Error> {
        let start = self.pos()?;
        self.bump()?; // 'enum'

        let name = if self.peek_kind()? == TokenKind::Ident {
            Some(self.bump()?.text)
        } else {
            None
        };

        let enumerators = if self.eat_punct(Punct::LBrace)? {
            let mut enumerators = Vec::new();
            while !self.at_punct(Punct::RBrace)? {
                let (ename, epos) = self.expect_ident("in enum body")?;
                let value = if self.eat_punct(Punct::Eq)? {
                    Some(self.parse_conditional()?)
                } else {
                    None
                };
                enumerators.push(Enumerator {
                    name: ename,
                    value,
                    span: self.span_from(epos),
                });
                if !self.eat_punct(Punct::Comma)? {
                    break;
                }
            }
            self.expect_punct(Punct::RBrace, "after enumerators")?;
            Some(enumerators)
        } else {
            None
        };

        if name.is_none() && enumerators.is_none() {
            return Err(Error::Parse(ParseError::new(
                "expected enum tag or body",
                start,
            )));
        }

        Ok(Type::Enum { name, enumerators })
    }

    /// Parse an initializer: a `{ ... }` initializer list or an
    /// assignment expression.
    fn parse_initializer(&mut self) -> Result<Expr, Error> {
        let start = self.pos()?;
        if self.eat_punct(Punct::LBrace)? {
            let mut elements = Vec::new();
            while !self.at_punct(Punct::RBrace)? {
                elements.push(self.parse_initializer()?);
                if !self.eat_punct(Punct::Comma)? {
                    break;
                }
            }
            self.expect_punct(Punct::RBrace, "after initializer list")?;
            return Ok(Expr::InitList {
                elements,
                span: self.span_from(start),
            });
        }
        self.parse_assignment()
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse;

    fn single_decl(source: &str) -> Decl {
        let unit = parse(source).expect("parse failed");
        assert_eq!(unit.decls.len(), 1, "expected one declaration");
        unit.decls.into_iter().next().unwrap()
    }

    #[test]
    fn test_array_of_pointers() {
        // [] binds tighter than *: array of 3 pointers to int.
        let decl = single_decl("int *a[3];");
        let Decl::Var { name, ty, .. } = decl else {
            panic!("expected variable declaration");
        };
        assert_eq!(name, "a");
        let Type::Array { element, size } = ty else {
            panic!("expected array type, got {:?}", ty);
        };
        assert!(matches!(
            size.as_deref(),
            Some(Expr::IntLiteral { value: 3, .. })
        ));
        let Type::Pointer { pointee } = *element else {
            panic!("expected pointer element");
        };
        assert_eq!(*pointee, Type::Named { name: "int".into() });
    }

    #[test]
    fn test_pointer_to_array() {
        let decl = single_decl("int (*a)[3];");
        let Decl::Var { ty, .. } = decl else {
            panic!("expected variable declaration");
        };
        let Type::Pointer { pointee } = ty else {
            panic!("expected pointer type, got {:?}", ty);
        };
        assert!(matches!(*pointee, Type::Array { .. }));
    }

    #[test]
    fn test_function_pointer() {
        let decl = single_decl("int (*callback)(int, char *);");
        let Decl::Var { name, ty, .. } = decl else {
            panic!("expected variable declaration");
        };
        assert_eq!(name, "callback");
        let Type::Pointer { pointee } = ty else {
            panic!("expected pointer type");
        };
        let Type::Function { params, variadic, .. } = *pointee else {
            panic!("expected function type");
        };
        assert_eq!(params.len(), 2);
        assert!(!variadic);
        assert_eq!(params[0].ty, Type::Named { name: "int".into() });
        assert!(params[0].name.is_none());
    }

    #[test]
    fn test_typedef_registers_name() {
        let unit = parse("typedef int my_int; my_int x;").expect("parse failed");
        assert_eq!(unit.decls.len(), 2);
        assert!(matches!(
            &unit.decls[0],
            Decl::Typedef { name, ty, .. }
                if name == "my_int" && *ty == Type::Named { name: "int".into() }
        ));
        assert!(matches!(
            &unit.decls[1],
            Decl::Var { name, ty, .. }
                if name == "x" && *ty == Type::Named { name: "my_int".into() }
        ));
    }

    #[test]
    fn test_typedef_pointer_chain() {
        let unit = parse("typedef unsigned long long **ull_pp;").expect("parse failed");
        let Decl::Typedef { name, ty, .. } = &unit.decls[0] else {
            panic!("expected typedef");
        };
        assert_eq!(name, "ull_pp");
        let Type::Pointer { pointee } = ty else {
            panic!("expected pointer");
        };
        let Type::Pointer { pointee } = pointee.as_ref() else {
            panic!("expected pointer to pointer");
        };
        assert_eq!(
            **pointee,
            Type::Named { name: "unsigned long long".into() }
        );
    }

    #[test]
    fn test_multiple_declarators() {
        let unit = parse("int a, *b, c[2];").expect("parse failed");
        assert_eq!(unit.decls.len(), 3);
        assert!(matches!(&unit.decls[0], Decl::Var { name, ty, .. }
            if name == "a" && matches!(ty, Type::Named { .. })));
        assert!(matches!(&unit.decls[1], Decl::Var { name, ty, .. }
            if name == "b" && matches!(ty, Type::Pointer { .. })));
        assert!(matches!(&unit.decls[2], Decl::Var { name, ty, .. }
            if name == "c" && matches!(ty, Type::Array { .. })));
    }

    #[test]
    fn test_struct_with_anonymous_member() {
        let decl = single_decl("struct box { int size; union { int i; char c; }; };");
        let Decl::Struct { name, members, .. } = decl else {
            panic!("expected struct declaration");
        };
        assert_eq!(name.as_deref(), Some("box"));
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name.as_deref(), Some("size"));
        assert!(members[1].name.is_none());
        assert!(matches!(members[1].ty, Type::Union { .. }));
    }

    #[test]
    fn test_enum_with_values() {
        let decl = single_decl("enum mode { MODE1 = 1, MODE2 = 2, MODE3, };");
        let Decl::Enum { name, enumerators, .. } = decl else {
            panic!("expected enum declaration");
        };
        assert_eq!(name.as_deref(), Some("mode"));
        assert_eq!(enumerators.len(), 3);
        assert_eq!(enumerators[0].name, "MODE1");
        assert!(matches!(
            enumerators[0].value,
            Some(Expr::IntLiteral { value: 1, .. })
        ));
        assert!(enumerators[2].value.is_none());
    }

    #[test]
    fn test_typedef_struct() {
        let unit =
            parse("typedef struct point { int x; int y; } point_t; point_t origin;")
                .expect("parse failed");
        assert_eq!(unit.decls.len(), 2);
        let Decl::Typedef { name, ty, .. } = &unit.decls[0] else {
            panic!("expected typedef");
        };
        assert_eq!(name, "point_t");
        let Type::Struct { name: tag, members } = ty else {
            panic!("expected struct type");
        };
        assert_eq!(tag.as_deref(), Some("point"));
        assert_eq!(members.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_function_prototype_and_variadic() {
        let unit = parse("int printf(const char *fmt, ...);").expect("parse failed");
        let Decl::Function { name, ty, body, .. } = &unit.decls[0] else {
            panic!("expected function declaration");
        };
        assert_eq!(name, "printf");
        assert!(body.is_none());
        let Type::Function { params, variadic, .. } = ty else {
            panic!("expected function type");
        };
        assert_eq!(params.len(), 1);
        assert!(*variadic);
        assert_eq!(params[0].name.as_deref(), Some("fmt"));
    }

    #[test]
    fn test_function_definition() {
        let decl = single_decl("int add(int a, int b) { return a + b; }");
        let Decl::Function { name, ty, body, .. } = decl else {
            panic!("expected function definition");
        };
        assert_eq!(name, "add");
        assert!(matches!(body.as_deref(), Some(Stmt::Compound { .. })));
        let Type::Function { return_type, params, .. } = ty else {
            panic!("expected function type");
        };
        assert_eq!(*return_type, Type::Named { name: "int".into() });
        assert_eq!(params[1].name.as_deref(), Some("b"));
    }

    #[test]
    fn test_unsized_array_and_initializer() {
        let decl = single_decl("int nums[] = {1, 2, 3};");
        let Decl::Var { ty, init, .. } = decl else {
            panic!("expected variable declaration");
        };
        assert!(matches!(ty, Type::Array { size: None, .. }));
        let Some(Expr::InitList { elements, .. }) = init else {
            panic!("expected initializer list");
        };
        assert_eq!(elements.len(), 3);
    }

    #[test]
    fn test_decl_spans_include_the_semicolon() {
        let unit = parse("int a, *b;").expect("parse failed");
        for decl in &unit.decls {
            let span = decl.span();
            assert_eq!(span.start, 0);
            assert_eq!(span.end, 10, "span must cover the terminating ';'");
        }
    }

    #[test]
    fn test_declaration_order_preserved() {
        let unit = parse("int a; int b;").expect("parse failed");
        assert_eq!(unit.decls.len(), 2);
        assert!(matches!(&unit.decls[0], Decl::Var { name, .. } if name == "a"));
        assert!(matches!(&unit.decls[1], Decl::Var { name, .. } if name == "b"));
    }
}
