//! AST flattening into the generic document tree.
//!
//! Every AST node becomes a mapping whose first entry is `kind` (a
//! snake_case node name), followed by the node's fields in declaration
//! order. Absent optional fields flatten to null; spans are diagnostic
//! metadata and are not emitted.
//!
//! Flattening is a pure function of the AST: it never mutates its input
//! and equal inputs produce equal trees.

use super::DocNode;
use crate::parser::ast::*;

/// Flatten a parsed translation unit into a document tree.
pub fn flatten(unit: &TranslationUnit) -> DocNode {
    node(
        "translation_unit",
        vec![(
            "decls",
            DocNode::Sequence(unit.decls.iter().map(flatten_decl).collect()),
        )],
    )
}

/// Build a mapping with the `kind` entry first.
fn node(kind: &str, fields: Vec<(&str, DocNode)>) -> DocNode {
    let mut entries = Vec::with_capacity(fields.len() + 1);
    entries.push(("kind".to_string(), DocNode::str(kind)));
    for (key, value) in fields {
        entries.push((key.to_string(), value));
    }
    DocNode::Mapping(entries)
}

fn opt(value: Option<DocNode>) -> DocNode {
    value.unwrap_or_else(DocNode::null)
}

fn opt_str(value: &Option<String>) -> DocNode {
    opt(value.as_ref().map(DocNode::str))
}

fn flatten_decl(decl: &Decl) -> DocNode {
    match decl {
        Decl::Function { name, ty, body, .. } => node(
            "function_decl",
            vec![
                ("name", DocNode::str(name)),
                ("type", flatten_type(ty)),
                ("body", opt(body.as_deref().map(flatten_stmt))),
            ],
        ),
        Decl::Var { name, ty, init, .. } => node(
            "var_decl",
            vec![
                ("name", DocNode::str(name)),
                ("type", flatten_type(ty)),
                ("init", opt(init.as_ref().map(flatten_expr))),
            ],
        ),
        Decl::Typedef { name, ty, .. } => node(
            "typedef_decl",
            vec![("name", DocNode::str(name)), ("type", flatten_type(ty))],
        ),
        Decl::Struct { name, members, .. } => node(
            "struct_decl",
            vec![("name", opt_str(name)), ("members", flatten_members(members))],
        ),
        Decl::Union { name, members, .. } => node(
            "union_decl",
            vec![("name", opt_str(name)), ("members", flatten_members(members))],
        ),
        Decl::Enum { name, enumerators, .. } => node(
            "enum_decl",
            vec![
                ("name", opt_str(name)),
                ("enumerators", flatten_enumerators(enumerators)),
            ],
        ),
    }
}

fn flatten_type(ty: &Type) -> DocNode {
    match ty {
        Type::Named { name } => node("named_type", vec![("name", DocNode::str(name))]),
        Type::Struct { name, members } => node(
            "struct_type",
            vec![
                ("name", opt_str(name)),
                ("members", opt(members.as_ref().map(|m| flatten_members(m)))),
            ],
        ),
        Type::Union { name, members } => node(
            "union_type",
            vec![
                ("name", opt_str(name)),
                ("members", opt(members.as_ref().map(|m| flatten_members(m)))),
            ],
        ),
        Type::Enum { name, enumerators } => node(
            "enum_type",
            vec![
                ("name", opt_str(name)),
                (
                    "enumerators",
                    opt(enumerators.as_ref().map(|e| flatten_enumerators(e))),
                ),
            ],
        ),
        Type::Pointer { pointee } => node("pointer_type", vec![("pointee", flatten_type(pointee))]),
        Type::Array { element, size } => node(
            "array_type",
            vec![
                ("element", flatten_type(element)),
                ("size", opt(size.as_deref().map(flatten_expr))),
            ],
        ),
        Type::Function {
            return_type,
            params,
            variadic,
        } => node(
            "function_type",
            vec![
                ("return_type", flatten_type(return_type)),
                (
                    "params",
                    DocNode::Sequence(params.iter().map(flatten_param).collect()),
                ),
                ("variadic", DocNode::boolean(*variadic)),
            ],
        ),
    }
}

fn flatten_members(members: &[MemberDecl]) -> DocNode {
    DocNode::Sequence(members.iter().map(flatten_member).collect())
}

fn flatten_member(member: &MemberDecl) -> DocNode {
    node(
        "member",
        vec![
            ("name", opt_str(&member.name)),
            ("type", flatten_type(&member.ty)),
        ],
    )
}

fn flatten_enumerators(enumerators: &[Enumerator]) -> DocNode {
    DocNode::Sequence(enumerators.iter().map(flatten_enumerator).collect())
}

fn flatten_enumerator(e: &Enumerator) -> DocNode {
    node(
        "enumerator",
        vec![
            ("name", DocNode::str(&e.name)),
            ("value", opt(e.value.as_ref().map(flatten_expr))),
        ],
    )
}

fn flatten_param(param: &ParamDecl) -> DocNode {
    node(
        "param",
        vec![
            ("name", opt_str(&param.name)),
            ("type", flatten_type(&param.ty)),
        ],
    )
}

fn flatten_stmts(stmts: &[Stmt]) -> DocNode {
    DocNode::Sequence(stmts.iter().map(flatten_stmt).collect())
}

fn flatten_stmt(stmt: &Stmt) -> DocNode {
    match stmt {
        Stmt::Compound { body, .. } => node("compound_stmt", vec![("body", flatten_stmts(body))]),
        Stmt::If {
            cond,
            then_branch,
            else_branch,
            ..
        } => node(
            "if_stmt",
            vec![
                ("cond", flatten_expr(cond)),
                ("then", flatten_stmt(then_branch)),
                ("else", opt(else_branch.as_deref().map(flatten_stmt))),
            ],
        ),
        Stmt::While { cond, body, .. } => node(
            "while_stmt",
            vec![("cond", flatten_expr(cond)), ("body", flatten_stmt(body))],
        ),
        Stmt::DoWhile { body, cond, .. } => node(
            "do_while_stmt",
            vec![("body", flatten_stmt(body)), ("cond", flatten_expr(cond))],
        ),
        Stmt::For {
            init,
            cond,
            step,
            body,
            ..
        } => node(
            "for_stmt",
            vec![
                ("init", opt(init.as_deref().map(flatten_stmt))),
                ("cond", opt(cond.as_ref().map(flatten_expr))),
                ("step", opt(step.as_ref().map(flatten_expr))),
                ("body", flatten_stmt(body)),
            ],
        ),
        Stmt::Switch { cond, cases, .. } => node(
            "switch_stmt",
            vec![
                ("cond", flatten_expr(cond)),
                (
                    "cases",
                    DocNode::Sequence(cases.iter().map(flatten_case).collect()),
                ),
            ],
        ),
        Stmt::Break { .. } => node("break_stmt", vec![]),
        Stmt::Continue { .. } => node("continue_stmt", vec![]),
        Stmt::Return { value, .. } => node(
            "return_stmt",
            vec![("value", opt(value.as_ref().map(flatten_expr)))],
        ),
        Stmt::Goto { label, .. } => node("goto_stmt", vec![("label", DocNode::str(label))]),
        Stmt::Label { name, .. } => node("label_stmt", vec![("name", DocNode::str(name))]),
        Stmt::Expr { expr, .. } => node("expr_stmt", vec![("expr", flatten_expr(expr))]),
        Stmt::Decl { decl, .. } => node("decl_stmt", vec![("decl", flatten_decl(decl))]),
        Stmt::Empty { .. } => node("empty_stmt", vec![]),
    }
}

fn flatten_case(case: &SwitchCase) -> DocNode {
    match case {
        SwitchCase::Case { value, body, .. } => node(
            "case",
            vec![("value", flatten_expr(value)), ("body", flatten_stmts(body))],
        ),
        SwitchCase::Default { body, .. } => node("default", vec![("body", flatten_stmts(body))]),
    }
}

fn flatten_expr(expr: &Expr) -> DocNode {
    match expr {
        Expr::IntLiteral { value, .. } => {
            node("int_literal", vec![("value", DocNode::int(*value))])
        }
        Expr::FloatLiteral { value, .. } => {
            node("float_literal", vec![("value", DocNode::float(*value))])
        }
        Expr::CharLiteral { value, .. } => node(
            "char_literal",
            vec![("value", DocNode::str(value.to_string()))],
        ),
        Expr::StringLiteral { value, .. } => {
            node("string_literal", vec![("value", DocNode::str(value))])
        }
        Expr::Identifier { name, .. } => node("identifier", vec![("name", DocNode::str(name))]),
        Expr::Binary { op, lhs, rhs, .. } => node(
            "binary_expr",
            vec![
                ("op", DocNode::str(op.to_string())),
                ("lhs", flatten_expr(lhs)),
                ("rhs", flatten_expr(rhs)),
            ],
        ),
        Expr::Unary { op, operand, .. } => node(
            "unary_expr",
            vec![
                ("op", DocNode::str(op.to_string())),
                (
                    "postfix",
                    DocNode::boolean(matches!(op, UnOp::PostInc | UnOp::PostDec)),
                ),
                ("operand", flatten_expr(operand)),
            ],
        ),
        Expr::Conditional {
            cond,
            then_expr,
            else_expr,
            ..
        } => node(
            "conditional_expr",
            vec![
                ("cond", flatten_expr(cond)),
                ("then", flatten_expr(then_expr)),
                ("else", flatten_expr(else_expr)),
            ],
        ),
        Expr::Call { callee, args, .. } => node(
            "call_expr",
            vec![
                ("callee", flatten_expr(callee)),
                (
                    "args",
                    DocNode::Sequence(args.iter().map(flatten_expr).collect()),
                ),
            ],
        ),
        Expr::Index { base, index, .. } => node(
            "index_expr",
            vec![("base", flatten_expr(base)), ("index", flatten_expr(index))],
        ),
        Expr::Member {
            base,
            member,
            arrow,
            ..
        } => node(
            "member_expr",
            vec![
                ("base", flatten_expr(base)),
                ("member", DocNode::str(member)),
                ("arrow", DocNode::boolean(*arrow)),
            ],
        ),
        Expr::Cast { ty, operand, .. } => node(
            "cast_expr",
            vec![("type", flatten_type(ty)), ("operand", flatten_expr(operand))],
        ),
        Expr::SizeofExpr { operand, .. } => {
            node("sizeof_expr", vec![("operand", flatten_expr(operand))])
        }
        Expr::SizeofType { ty, .. } => node("sizeof_type", vec![("type", flatten_type(ty))]),
        Expr::InitList { elements, .. } => node(
            "init_list",
            vec![(
                "elements",
                DocNode::Sequence(elements.iter().map(flatten_expr).collect()),
            )],
        ),
    }
}
