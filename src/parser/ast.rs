// AST (Abstract Syntax Tree) definitions for the C dumper

use std::fmt;

/// Source position of a token, used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    /// Character offset from the start of the source.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self { offset, line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Half-open source range covered by a node, in character offsets.
///
/// Spans are diagnostic metadata only; the flattener does not emit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Binary operators, including assignment operators and the comma operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    LogicalAnd,
    LogicalOr,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    // Sequencing
    Comma,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::LogicalAnd => "&&",
            BinOp::LogicalOr => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Assign => "=",
            BinOp::AddAssign => "+=",
            BinOp::SubAssign => "-=",
            BinOp::MulAssign => "*=",
            BinOp::DivAssign => "/=",
            BinOp::ModAssign => "%=",
            BinOp::ShlAssign => "<<=",
            BinOp::ShrAssign => ">>=",
            BinOp::AndAssign => "&=",
            BinOp::OrAssign => "|=",
            BinOp::XorAssign => "^=",
            BinOp::Comma => ",",
        };
        f.write_str(sym)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,     // -x
    Not,     // !x
    BitNot,  // ~x
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
    Deref,   // *x
    AddrOf,  // &x
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
            UnOp::BitNot => "~",
            UnOp::PreInc => "++",
            UnOp::PreDec => "--",
            UnOp::PostInc => "++",
            UnOp::PostDec => "--",
            UnOp::Deref => "*",
            UnOp::AddrOf => "&",
        };
        f.write_str(sym)
    }
}

/// Type representation.
///
/// Derived types nest around the base type the way the declarator wraps the
/// declared name, so `int *a[3]` gives `Array(3, Pointer(Named("int")))`.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// `int`, `char`, `unsigned long long`, `double`, `void`, or a typedef
    /// name. Multi-word arithmetic types keep their joined spelling.
    Named { name: String },
    /// `struct tag`, `struct tag { ... }`, or `struct { ... }` used as a
    /// type specifier. `members` is `None` for a bare tag reference.
    Struct {
        name: Option<String>,
        members: Option<Vec<MemberDecl>>,
    },
    Union {
        name: Option<String>,
        members: Option<Vec<MemberDecl>>,
    },
    Enum {
        name: Option<String>,
        enumerators: Option<Vec<Enumerator>>,
    },
    Pointer { pointee: Box<Type> },
    Array {
        element: Box<Type>,
        /// `None` for unsized `[]`.
        size: Option<Box<Expr>>,
    },
    Function {
        return_type: Box<Type>,
        params: Vec<ParamDecl>,
        variadic: bool,
    },
}

/// A struct or union member. Anonymous members (an unnamed nested
/// `union { ... };`, for example) carry `name: None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDecl {
    pub name: Option<String>,
    pub ty: Type,
    pub span: Span,
}

/// One `name [= value]` entry of an enum body.
#[derive(Debug, Clone, PartialEq)]
pub struct Enumerator {
    pub name: String,
    pub value: Option<Expr>,
    pub span: Span,
}

/// A function parameter. Abstract declarators (prototypes like
/// `int f(int, char *)`) carry `name: None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: Option<String>,
    pub ty: Type,
    pub span: Span,
}

/// Top-level and block-level declarations.
///
/// An init-declarator list (`int a, *b;`) produces one `Decl` per declared
/// name, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Function {
        name: String,
        /// Always a [`Type::Function`].
        ty: Type,
        /// `None` for a prototype, `Some` (a [`Stmt::Compound`]) for a
        /// definition. Boxed: statements contain declarations in turn.
        body: Option<Box<Stmt>>,
        span: Span,
    },
    Var {
        name: String,
        ty: Type,
        init: Option<Expr>,
        span: Span,
    },
    Typedef {
        name: String,
        ty: Type,
        span: Span,
    },
    /// A freestanding `struct tag { ... };` or `struct tag;`.
    Struct {
        name: Option<String>,
        members: Vec<MemberDecl>,
        span: Span,
    },
    Union {
        name: Option<String>,
        members: Vec<MemberDecl>,
        span: Span,
    },
    Enum {
        name: Option<String>,
        enumerators: Vec<Enumerator>,
        span: Span,
    },
}

impl Decl {
    /// Get the source span of this declaration.
    pub fn span(&self) -> Span {
        match self {
            Decl::Function { span, .. }
            | Decl::Var { span, .. }
            | Decl::Typedef { span, .. }
            | Decl::Struct { span, .. }
            | Decl::Union { span, .. }
            | Decl::Enum { span, .. } => *span,
        }
    }
}

/// One `case`/`default` group of a switch body.
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchCase {
    Case {
        value: Expr,
        body: Vec<Stmt>,
        span: Span,
    },
    Default { body: Vec<Stmt>, span: Span },
}

/// Statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Compound { body: Vec<Stmt>, span: Span },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        span: Span,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
        span: Span,
    },
    For {
        /// A declaration or expression statement, if present.
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Box<Stmt>,
        span: Span,
    },
    Switch {
        cond: Expr,
        cases: Vec<SwitchCase>,
        span: Span,
    },
    Break { span: Span },
    Continue { span: Span },
    Return { value: Option<Expr>, span: Span },
    Goto { label: String, span: Span },
    Label { name: String, span: Span },
    Expr { expr: Expr, span: Span },
    /// A declaration in statement position (one node per declared name).
    Decl { decl: Decl, span: Span },
    /// A bare `;`.
    Empty { span: Span },
}

impl Stmt {
    /// Get the source span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Compound { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::DoWhile { span, .. }
            | Stmt::For { span, .. }
            | Stmt::Switch { span, .. }
            | Stmt::Break { span }
            | Stmt::Continue { span }
            | Stmt::Return { span, .. }
            | Stmt::Goto { span, .. }
            | Stmt::Label { span, .. }
            | Stmt::Expr { span, .. }
            | Stmt::Decl { span, .. }
            | Stmt::Empty { span } => *span,
        }
    }
}

/// Expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral { value: i64, span: Span },
    FloatLiteral { value: f64, span: Span },
    CharLiteral { value: char, span: Span },
    StringLiteral { value: String, span: Span },
    Identifier { name: String, span: Span },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        span: Span,
    },
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    Member {
        base: Box<Expr>,
        member: String,
        /// `true` for `->`, `false` for `.`.
        arrow: bool,
        span: Span,
    },
    Cast {
        ty: Type,
        operand: Box<Expr>,
        span: Span,
    },
    SizeofExpr { operand: Box<Expr>, span: Span },
    SizeofType { ty: Type, span: Span },
    /// `{ e, e, ... }` initializer.
    InitList { elements: Vec<Expr>, span: Span },
}

impl Expr {
    /// Get the source span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::IntLiteral { span, .. }
            | Expr::FloatLiteral { span, .. }
            | Expr::CharLiteral { span, .. }
            | Expr::StringLiteral { span, .. }
            | Expr::Identifier { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Conditional { span, .. }
            | Expr::Call { span, .. }
            | Expr::Index { span, .. }
            | Expr::Member { span, .. }
            | Expr::Cast { span, .. }
            | Expr::SizeofExpr { span, .. }
            | Expr::SizeofType { span, .. }
            | Expr::InitList { span, .. } => *span,
        }
    }
}

/// Root of the AST: all external declarations of one source file, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    pub decls: Vec<Decl>,
    pub span: Span,
}

impl TranslationUnit {
    pub fn new() -> Self {
        TranslationUnit {
            decls: Vec::new(),
            span: Span::new(0, 0),
        }
    }
}

impl Default for TranslationUnit {
    fn default() -> Self {
        TranslationUnit::new()
    }
}
