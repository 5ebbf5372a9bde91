use crate::debugger::registry::strip_path;
use crate::debugger::step_into::matcher::Pairing;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static CLOSURE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^func[0-9]*$").expect("must compile"));

/// Return true if function name is a compiler generated closure name, like `main.main.func1`.
pub fn is_closure(function: &str) -> bool {
    let name = strip_path(function);
    let last = name.rsplit('.').next().unwrap_or(name);
    CLOSURE_SEGMENT.is_match(last)
}

fn display_name(index: usize, pairing: &Pairing) -> String {
    if let Some(expected) = &pairing.expected {
        return expected.clone();
    }
    if pairing.call.fun.is_selector_chain() {
        return pairing.call.fun.to_string();
    }
    if let Some(function) = pairing.instruction.destination_name() {
        return strip_path(function).to_string();
    }
    format!("call{index}")
}

/// Return a unique display name for each pairing.
/// Repeated names are suffixed with `#<index>` where index is a position in pairing list.
pub fn resolve_names(pairings: &[Pairing]) -> Vec<String> {
    let mut seen = HashSet::new();
    pairings
        .iter()
        .enumerate()
        .map(|(index, pairing)| {
            let name = display_name(index, pairing);
            if seen.insert(name.clone()) {
                name
            } else {
                format!("{name}#{index}")
            }
        })
        .collect()
}
