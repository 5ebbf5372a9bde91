use crate::debugger::source::ast::CallExpr;

/// Reorder calls from pre-order into evaluation order.
///
/// In pre-order an enclosing call precedes calls nested into it, but those nested calls
/// are evaluated first. For every call the contiguous run of following calls that start
/// inside it is reordered recursively and then the call is moved after this run:
/// `[f, g, h]` for `f(g(), h())` becomes `[g, h, f]`.
pub fn evaluation_order(calls: &mut [&CallExpr]) {
    let mut i = 0;
    while i < calls.len() {
        let end = calls[i].span.end;
        let nested = calls[i + 1..]
            .iter()
            .take_while(|call| call.span.start < end)
            .count();
        let block = &mut calls[i..=i + nested];
        evaluation_order(&mut block[1..]);
        block.rotate_left(1);
        i += nested + 1;
    }
}
