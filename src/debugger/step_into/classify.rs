use crate::debugger::registry::NameRegistry;
use crate::debugger::source::ast::{Expr, ExprKind};

/// Functions predeclared by the language.
const BUILTINS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

/// Predeclared type aliases that are always conversions.
const PRIMITIVE_CONVERSIONS: &[&str] = &["byte", "rune"];

/// Kind of call expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum CallKind {
    /// `T(x)`, no code is called.
    TypeConversion,
    /// Call of a predeclared function, usually inlined by the compiler.
    BuiltinCall,
    FunctionCall,
}

/// Classify a call by its callee expression.
///
/// # Arguments
///
/// * `fun`: callee expression
/// * `types`: known type names
/// * `qualifier`: package name of a file where call is located
pub fn classify(fun: &Expr, types: &NameRegistry, qualifier: &str) -> CallKind {
    let fun = fun.strip_wrappers();
    match &fun.kind {
        ExprKind::Type { .. } => CallKind::TypeConversion,
        ExprKind::Selector(x, sel) => match &x.kind {
            ExprKind::Ident(pkg) if types.contains(&format!("{pkg}.{}", sel.name)) => {
                CallKind::TypeConversion
            }
            _ => CallKind::FunctionCall,
        },
        ExprKind::Ident(name) => {
            if BUILTINS.contains(&name.as_str()) {
                CallKind::BuiltinCall
            } else if PRIMITIVE_CONVERSIONS.contains(&name.as_str())
                || types.contains(name)
                || types.contains(&format!("{qualifier}.{name}"))
            {
                CallKind::TypeConversion
            } else {
                CallKind::FunctionCall
            }
        }
        _ => CallKind::FunctionCall,
    }
}
