//! End-to-end parser tests over complete source snippets.

use cdump::parser::ast::*;
use cdump::parser::{parse, Error};
use pretty_assertions::assert_eq;

#[test]
fn parses_declarations_in_source_order() {
    let unit = parse("int a; int b;").expect("parse failed");
    let names: Vec<&str> = unit
        .decls
        .iter()
        .map(|d| match d {
            Decl::Var { name, .. } => name.as_str(),
            other => panic!("expected variable declaration, got {:?}", other),
        })
        .collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn typedef_name_becomes_a_type_in_later_declarations() {
    let unit = parse("typedef int my_int; my_int x;").expect("parse failed");
    let Decl::Var { ty, .. } = &unit.decls[1] else {
        panic!("expected variable declaration");
    };
    assert_eq!(*ty, Type::Named { name: "my_int".into() });
}

#[test]
fn typedef_names_do_not_leak_between_parses() {
    parse("typedef int my_int;").expect("parse failed");
    // In a fresh parse, my_int is just an identifier again: `my_int x;`
    // has no type specifier and must fail.
    assert!(parse("my_int x;").is_err());
}

#[test]
fn declarator_nesting_follows_c_rules() {
    // int *a[3]: a is an array of 3 pointers to int
    let unit = parse("int *a[3];").expect("parse failed");
    let Decl::Var { ty, .. } = &unit.decls[0] else {
        panic!("expected variable declaration");
    };
    let expected = Type::Array {
        element: Box::new(Type::Pointer {
            pointee: Box::new(Type::Named { name: "int".into() }),
        }),
        size: Some(Box::new(Expr::IntLiteral {
            value: 3,
            span: Span::new(7, 8),
        })),
    };
    assert_eq!(*ty, expected);
}

#[test]
fn cast_requires_a_known_type_name() {
    fn first_stmt_expr(source: &str) -> Expr {
        let unit = parse(source).expect("parse failed");
        for decl in unit.decls {
            if let Decl::Function { body: Some(body), .. } = decl {
                if let Stmt::Compound { body, .. } = *body {
                    for stmt in body {
                        if let Stmt::Expr { expr, .. } = stmt {
                            return expr;
                        }
                    }
                }
            }
        }
        panic!("no expression statement found");
    }

    let cast = first_stmt_expr("typedef int t; void f(int y, int x) { x = (t)y; }");
    let Expr::Binary { rhs, .. } = cast else { panic!() };
    assert!(matches!(*rhs, Expr::Cast { .. }));

    let mult = first_stmt_expr("void f(int y, int z, int x) { x = (y)*z; }");
    let Expr::Binary { rhs, .. } = mult else { panic!() };
    assert!(matches!(*rhs, Expr::Binary { op: BinOp::Mul, .. }));
}

#[test]
fn unterminated_string_reports_opening_quote_position() {
    let err = parse("char *s = \"abc;").unwrap_err();
    let Error::Lex(lex) = err else {
        panic!("expected a lex error");
    };
    assert!(lex.message.contains("unterminated string"));
    assert_eq!(lex.pos.offset, 10);
    assert_eq!(lex.pos.line, 1);
    assert_eq!(lex.pos.column, 11);
}

#[test]
fn errors_are_terminal_and_carry_a_position() {
    let err = parse("int a; int 42; int b;").unwrap_err();
    let Error::Parse(parse_err) = err else {
        panic!("expected a parse error");
    };
    assert_eq!(parse_err.pos.line, 1);
    assert!(parse_err.message.starts_with("expected"));
}

#[test]
fn parse_is_deterministic() {
    let source = "typedef struct n { int v; struct n *next; } node; node *head;";
    let a = parse(source).expect("parse failed");
    let b = parse(source).expect("parse failed");
    assert_eq!(a, b);
}

#[test]
fn comments_and_preprocessor_lines_are_skipped() {
    let source = "\
#include <stdio.h>
#define LIMIT 10

// leading comment
int x; /* trailing
          block comment */
int y;
";
    let unit = parse(source).expect("parse failed");
    assert_eq!(unit.decls.len(), 2);
}

#[test]
fn parses_a_realistic_function() {
    let source = "\
int sum(int *nums, int count) {
    int total = 0;
    for (int i = 0; i < count; i++) {
        total += nums[i];
    }
    return total;
}
";
    let unit = parse(source).expect("parse failed");
    let Decl::Function { name, ty, body, .. } = &unit.decls[0] else {
        panic!("expected function definition");
    };
    assert_eq!(name, "sum");
    let Type::Function { params, .. } = ty else {
        panic!("expected function type");
    };
    assert_eq!(params.len(), 2);
    let Some(Stmt::Compound { body, .. }) = body.as_deref() else {
        panic!("expected compound body");
    };
    assert_eq!(body.len(), 3);
    assert!(matches!(body[1], Stmt::For { .. }));
}

#[test]
fn parses_nested_structs_with_anonymous_members() {
    let source = "\
struct outer {
    int tag;
    union {
        struct { int x; int y; } point;
        char bytes[8];
    };
};
";
    let unit = parse(source).expect("parse failed");
    let Decl::Struct { members, .. } = &unit.decls[0] else {
        panic!("expected struct declaration");
    };
    assert_eq!(members.len(), 2);
    assert!(members[1].name.is_none());
    let Type::Union { members: inner, .. } = &members[1].ty else {
        panic!("expected union member");
    };
    let inner = inner.as_ref().expect("union body");
    assert_eq!(inner[0].name.as_deref(), Some("point"));
    assert!(matches!(inner[0].ty, Type::Struct { name: None, .. }));
}

#[test]
fn parses_self_referential_typedef_struct() {
    let source = "typedef struct node { int value; struct node *next; } node_t;";
    let unit = parse(source).expect("parse failed");
    let Decl::Typedef { name, ty, .. } = &unit.decls[0] else {
        panic!("expected typedef");
    };
    assert_eq!(name, "node_t");
    let Type::Struct { members: Some(members), .. } = ty else {
        panic!("expected struct body");
    };
    let Type::Pointer { pointee } = &members[1].ty else {
        panic!("expected pointer member");
    };
    assert!(matches!(
        pointee.as_ref(),
        Type::Struct { name: Some(tag), members: None } if tag == "node"
    ));
}

#[test]
fn spans_cover_the_declaration_text() {
    let source = "int a;\nint bb;";
    let unit = parse(source).expect("parse failed");
    let chars: Vec<char> = source.chars().collect();
    let spans: Vec<Span> = unit.decls.iter().map(Decl::span).collect();
    let texts: Vec<String> = spans
        .iter()
        .map(|s| chars[s.start..s.end].iter().collect())
        .collect();
    assert_eq!(texts, ["int a;", "int bb;"]);
}

#[test]
fn empty_source_is_an_empty_unit() {
    let unit = parse("").expect("parse failed");
    assert!(unit.decls.is_empty());

    let unit = parse("  /* nothing */\n#define X 1\n").expect("parse failed");
    assert!(unit.decls.is_empty());
}
