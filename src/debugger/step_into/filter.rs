use crate::debugger::disasm::CallInstruction;
use crate::debugger::registry::strip_path;

/// Return true if function is an unexported function of the runtime package.
/// Calls of such functions are inserted by the compiler and have no counterpart in source.
fn is_runtime_internal(function: &str, runtime_package: &str) -> bool {
    strip_path(function)
        .strip_prefix(runtime_package)
        .and_then(|rest| rest.strip_prefix('.'))
        .map(|rest| !rest.starts_with(|c: char| c.is_uppercase()))
        .unwrap_or(false)
}

/// Keep call instructions that correspond to calls written in source.
///
/// # Arguments
///
/// * `instructions`: line instructions
/// * `call_mnemonic`: mnemonic prefix of a call instruction
/// * `runtime_package`: name of a runtime support package
pub fn visible_calls(
    instructions: Vec<CallInstruction>,
    call_mnemonic: &str,
    runtime_package: &str,
) -> Vec<CallInstruction> {
    instructions
        .into_iter()
        .filter(|insn| insn.mnemonic.starts_with(call_mnemonic))
        .filter(|insn| {
            insn.destination_name()
                .map(|name| !is_runtime_internal(name, runtime_package))
                .unwrap_or(true)
        })
        .collect()
}
