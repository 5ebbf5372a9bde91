use crate::debugger::disasm::CallInstruction;
use crate::debugger::registry::{strip_path, NameRegistry};
use crate::debugger::source::ast::{CallExpr, Expr, ExprKind};
use crate::debugger::step_into::naming::is_closure;

/// Call expression paired with its call instruction.
#[derive(Debug, Clone)]
pub struct Pairing<'a> {
    pub call: &'a CallExpr,
    pub instruction: CallInstruction,
    /// Function name derived from source and confirmed by known function names.
    pub expected: Option<String>,
}

/// Return a function name that a callee expression statically refers to.
fn expected_name(fun: &Expr, functions: &NameRegistry, qualifier: &str) -> Option<String> {
    match &fun.strip_wrappers().kind {
        ExprKind::Ident(name) => {
            if functions.contains(name) {
                return Some(name.clone());
            }
            let qualified = format!("{qualifier}.{name}");
            functions.contains(&qualified).then_some(qualified)
        }
        ExprKind::Selector(x, sel) => match &x.kind {
            ExprKind::Ident(pkg) => {
                let qualified = format!("{pkg}.{}", sel.name);
                functions.contains(&qualified).then_some(qualified)
            }
            _ => None,
        },
        _ => None,
    }
}

fn names_match(expected: &str, destination: &str) -> bool {
    let expected = strip_path(expected);
    let destination = strip_path(destination);
    if expected == destination {
        return true;
    }
    !expected.contains('.')
        && destination
            .split_once('.')
            .map(|(_, name)| name == expected)
            .unwrap_or(false)
}

/// Pair call expressions (in evaluation order) with call instructions index-for-index.
///
/// Return `None` if counts are different, if there is nothing to disambiguate
/// (a single call or no calls at all) or if a call instruction targets a function that
/// is not the one named in source. A mismatch with a closure is tolerated since closures
/// have compiler generated names.
pub fn pair<'a>(
    calls: &[&'a CallExpr],
    instructions: Vec<CallInstruction>,
    functions: &NameRegistry,
    qualifier: &str,
) -> Option<Vec<Pairing<'a>>> {
    if calls.len() != instructions.len() || calls.len() <= 1 {
        log::debug!(
            target: "step-into",
            "calls count mismatch: {} in source, {} in disassembly",
            calls.len(),
            instructions.len()
        );
        return None;
    }

    calls
        .iter()
        .zip(instructions)
        .map(|(&call, instruction)| {
            let expected = expected_name(&call.fun, functions, qualifier);
            if let Some(expected) = expected.as_deref() {
                let destination = instruction.destination_name().unwrap_or_default();
                if !names_match(expected, destination) && !is_closure(destination) {
                    log::debug!(
                        target: "step-into",
                        "call of {expected} does not match instruction at {:#x} ({destination})",
                        instruction.pc
                    );
                    return None;
                }
            }
            Some(Pairing {
                call,
                instruction,
                expected,
            })
        })
        .collect()
}
