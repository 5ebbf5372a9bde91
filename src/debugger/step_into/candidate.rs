use crate::debugger::disasm::CallInstruction;
use crate::debugger::source::ast::Expr;
use std::ops::Range;

/// Call that step-into may target.
#[derive(Debug, Clone)]
pub struct StepIntoCandidate {
    pub(super) name: String,
    pub(super) columns: Range<u64>,
    pub(super) line: u64,
    pub(super) filename: String,
    pub(super) instruction: CallInstruction,
    pub(super) fun: Expr,
}

impl StepIntoCandidate {
    /// Unique (inside a line) candidate name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Callee columns `[start, end)`, 1-based.
    pub fn column_interval(&self) -> (u64, u64) {
        (self.columns.start, self.columns.end)
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Source text of a callee expression.
    pub fn expr_string(&self) -> String {
        self.fun.to_string()
    }

    /// Source text of a callee expression, cut to `width` characters.
    pub fn expr_string_truncated(&self, width: usize) -> String {
        let expr = self.expr_string();
        if expr.chars().count() <= width {
            return expr;
        }
        let mut truncated = expr.chars().take(width).collect::<String>();
        truncated.push_str("...");
        truncated
    }

    /// Call instruction of a candidate.
    pub fn instruction(&self) -> &CallInstruction {
        &self.instruction
    }

    /// Width of callee columns.
    pub fn width(&self) -> u64 {
        self.columns.end.saturating_sub(self.columns.start)
    }

    pub fn contains_column(&self, column: u64) -> bool {
        self.columns.contains(&column)
    }
}
