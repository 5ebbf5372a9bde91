//! Syntax tree of a Go source file.
//!
//! The tree keeps declarations, statements and expressions. Function signatures and type
//! declarations are recognized by the parser but not modelled, type literals used in
//! expression position keep their kind and source text.

use std::fmt::{Display, Formatter};
use std::ops::Range;

/// Byte range in a source text.
pub type Span = Range<usize>;

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// Kind of type literal found in an expression position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TypeLit {
    Array,
    Map,
    Chan,
    Func,
    Struct,
    Interface,
}

impl TypeLit {
    pub(super) fn of(text: &str) -> Self {
        if text.starts_with('[') {
            TypeLit::Array
        } else if text.starts_with("map") {
            TypeLit::Map
        } else if text.starts_with("chan") {
            TypeLit::Chan
        } else if text.starts_with("func") {
            TypeLit::Func
        } else if text.starts_with("struct") {
            TypeLit::Struct
        } else {
            TypeLit::Interface
        }
    }
}

/// Parenthesized invocation: `fun(args...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// Callee sub-expression.
    pub fun: Box<Expr>,
    pub args: Vec<Expr>,
    /// Last argument is followed by `...`.
    pub ellipsis: bool,
    /// Span of the whole call, from the callee start to the closing parenthesis.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Ident(String),
    Lit(String),
    Composite {
        ty: Option<Box<Expr>>,
        elems: Vec<Expr>,
    },
    KeyValue(Box<Expr>, Box<Expr>),
    FuncLit(Block),
    Paren(Box<Expr>),
    Selector(Box<Expr>, Ident),
    Index(Box<Expr>, Vec<Expr>),
    Slice(Box<Expr>, Vec<Option<Expr>>),
    /// `x.(T)`, or `x.(type)` when the type is absent.
    TypeAssert(Box<Expr>, Option<Box<Expr>>),
    Call(CallExpr),
    Star(Box<Expr>),
    Unary(String, Box<Expr>),
    Binary(String, Box<Expr>, Box<Expr>),
    Type {
        kind: TypeLit,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub(super) fn unary(op: &str, start: usize, operand: Expr) -> Self {
        let span = start..operand.span.end;
        let kind = if op == "*" {
            ExprKind::Star(Box::new(operand))
        } else {
            ExprKind::Unary(op.to_string(), Box::new(operand))
        };
        Self::new(kind, span)
    }

    pub(super) fn binary(op: &str, lhs: Expr, rhs: Expr) -> Self {
        let span = lhs.span.start..rhs.span.end;
        Self::new(
            ExprKind::Binary(op.to_string(), Box::new(lhs), Box::new(rhs)),
            span,
        )
    }

    pub(super) fn key_value(key: Expr, value: Expr) -> Self {
        let span = key.span.start..value.span.end;
        Self::new(ExprKind::KeyValue(Box::new(key), Box::new(value)), span)
    }

    /// Return call node if expression is a call.
    pub fn as_call(&self) -> Option<&CallExpr> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Strip parenthesization and pointer dereference wrappers: `(*T)` -> `T`.
    pub fn strip_wrappers(&self) -> &Expr {
        match &self.kind {
            ExprKind::Paren(inner) | ExprKind::Star(inner) => inner.strip_wrappers(),
            _ => self,
        }
    }

    /// True for an identifier or a chain of selectors ending at an identifier: `a`, `a.b.c`.
    pub fn is_selector_chain(&self) -> bool {
        match &self.kind {
            ExprKind::Ident(_) => true,
            ExprKind::Selector(x, _) => x.is_selector_chain(),
            _ => false,
        }
    }
}

fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Ident(name) => f.write_str(name),
            ExprKind::Lit(text) => f.write_str(text),
            ExprKind::Composite { ty, .. } => match ty {
                Some(ty) => write!(f, "{ty}{{…}}"),
                None => f.write_str("{…}"),
            },
            ExprKind::KeyValue(key, value) => write!(f, "{key}: {value}"),
            ExprKind::FuncLit(_) => f.write_str("(func literal)"),
            ExprKind::Paren(inner) => write!(f, "({inner})"),
            ExprKind::Selector(x, sel) => write!(f, "{x}.{}", sel.name),
            ExprKind::Index(x, items) => {
                write!(f, "{x}[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            ExprKind::Slice(x, parts) => {
                write!(f, "{x}[")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(":")?;
                    }
                    if let Some(part) = part {
                        write!(f, "{part}")?;
                    }
                }
                f.write_str("]")
            }
            ExprKind::TypeAssert(x, ty) => match ty {
                Some(ty) => write!(f, "{x}.({ty})"),
                None => write!(f, "{x}.(type)"),
            },
            ExprKind::Call(call) => {
                write!(f, "{}(", call.fun)?;
                write_list(f, &call.args)?;
                if call.ellipsis {
                    f.write_str("...")?;
                }
                f.write_str(")")
            }
            ExprKind::Star(x) => write!(f, "*{x}"),
            ExprKind::Unary(op, x) => write!(f, "{op}{x}"),
            ExprKind::Binary(op, lhs, rhs) => write!(f, "{lhs} {op} {rhs}"),
            ExprKind::Type { text, .. } => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Clause of a `switch` or `select` statement, `default` clauses have no expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub exprs: Vec<Expr>,
    /// Communication of a `select` clause.
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Assign {
        lhs: Vec<Expr>,
        op: String,
        rhs: Vec<Expr>,
    },
    IncDec(Expr, String),
    Send(Expr, Expr),
    Defer(Expr),
    Go(Expr),
    Return(Vec<Expr>),
    Block(Block),
    If {
        header: Vec<Stmt>,
        then: Block,
        els: Option<Box<Stmt>>,
    },
    For {
        header: Vec<Stmt>,
        body: Block,
    },
    /// `range` clause of a `for` header.
    Range {
        lhs: Vec<Expr>,
        expr: Expr,
    },
    Switch {
        header: Vec<Stmt>,
        clauses: Vec<CaseClause>,
    },
    Select(Vec<CaseClause>),
    Decl(Decl),
    Labeled(Ident, Box<Stmt>),
    Branch(String, Option<Ident>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: Ident,
    pub method: bool,
    /// Functions implemented outside of Go have no body.
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Import,
    Type,
    Var(Vec<ValueSpec>),
    Const(Vec<ValueSpec>),
    Func(FuncDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub package: Ident,
    pub decls: Vec<Decl>,
}
