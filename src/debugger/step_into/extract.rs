use crate::debugger::registry::NameRegistry;
use crate::debugger::source::ast::{
    Block, CallExpr, CaseClause, Decl, Expr, ExprKind, Stmt, ValueSpec,
};
use crate::debugger::source::SourceFile;
use crate::debugger::step_into::classify::{classify, CallKind};

/// Collects function calls that end on a single source line.
struct Extractor<'a, 't> {
    file: &'a SourceFile,
    types: &'t NameRegistry,
    line: u64,
    calls: Vec<&'a CallExpr>,
}

impl<'a, 't> Extractor<'a, 't> {
    fn on_line(&self, call: &CallExpr) -> bool {
        let last = call.span.end.saturating_sub(1);
        self.file.lines().position(last).line == self.line
    }

    fn visit_decl(&mut self, decl: &'a Decl) {
        match decl {
            Decl::Var(specs) | Decl::Const(specs) => self.visit_specs(specs),
            Decl::Func(func) => {
                if let Some(body) = &func.body {
                    self.visit_block(body);
                }
            }
            Decl::Import | Decl::Type => {}
        }
    }

    fn visit_specs(&mut self, specs: &'a [ValueSpec]) {
        specs
            .iter()
            .flat_map(|spec| spec.values.iter())
            .for_each(|value| self.visit_expr(value));
    }

    fn visit_block(&mut self, block: &'a Block) {
        block.stmts.iter().for_each(|stmt| self.visit_stmt(stmt));
    }

    fn visit_clause(&mut self, clause: &'a CaseClause) {
        self.visit_exprs(&clause.exprs);
        if let Some(comm) = &clause.comm {
            self.visit_stmt(comm);
        }
        clause.body.iter().for_each(|stmt| self.visit_stmt(stmt));
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            // deferred and asynchronous calls are not executed by the current step
            Stmt::Defer(_) | Stmt::Go(_) => {}
            Stmt::Expr(x) => self.visit_expr(x),
            Stmt::Assign { lhs, rhs, .. } => {
                self.visit_exprs(lhs);
                self.visit_exprs(rhs);
            }
            Stmt::IncDec(x, _) => self.visit_expr(x),
            Stmt::Send(ch, value) => {
                self.visit_expr(ch);
                self.visit_expr(value);
            }
            Stmt::Return(values) => self.visit_exprs(values),
            Stmt::Block(block) => self.visit_block(block),
            Stmt::If { header, then, els } => {
                header.iter().for_each(|stmt| self.visit_stmt(stmt));
                self.visit_block(then);
                if let Some(els) = els {
                    self.visit_stmt(els);
                }
            }
            Stmt::For { header, body } => {
                header.iter().for_each(|stmt| self.visit_stmt(stmt));
                self.visit_block(body);
            }
            Stmt::Range { lhs, expr } => {
                self.visit_exprs(lhs);
                self.visit_expr(expr);
            }
            Stmt::Switch { header, clauses } => {
                header.iter().for_each(|stmt| self.visit_stmt(stmt));
                clauses.iter().for_each(|clause| self.visit_clause(clause));
            }
            Stmt::Select(clauses) => clauses.iter().for_each(|clause| self.visit_clause(clause)),
            Stmt::Decl(decl) => self.visit_decl(decl),
            Stmt::Labeled(_, stmt) => self.visit_stmt(stmt),
            Stmt::Branch(_, _) => {}
        }
    }

    fn visit_exprs(&mut self, exprs: &'a [Expr]) {
        exprs.iter().for_each(|x| self.visit_expr(x));
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        match &expr.kind {
            ExprKind::Ident(_) | ExprKind::Lit(_) | ExprKind::Type { .. } => {}
            ExprKind::Composite { ty, elems } => {
                if let Some(ty) = ty {
                    self.visit_expr(ty);
                }
                self.visit_exprs(elems);
            }
            ExprKind::KeyValue(key, value) => {
                self.visit_expr(key);
                self.visit_expr(value);
            }
            ExprKind::FuncLit(body) => self.visit_block(body),
            ExprKind::Paren(x) | ExprKind::Star(x) | ExprKind::Unary(_, x) => self.visit_expr(x),
            ExprKind::Selector(x, _) => self.visit_expr(x),
            ExprKind::Index(x, items) => {
                self.visit_expr(x);
                self.visit_exprs(items);
            }
            ExprKind::Slice(x, parts) => {
                self.visit_expr(x);
                parts.iter().flatten().for_each(|part| self.visit_expr(part));
            }
            ExprKind::TypeAssert(x, ty) => {
                self.visit_expr(x);
                if let Some(ty) = ty {
                    self.visit_expr(ty);
                }
            }
            ExprKind::Binary(_, lhs, rhs) => {
                self.visit_expr(lhs);
                self.visit_expr(rhs);
            }
            ExprKind::Call(call) => {
                if self.on_line(call) {
                    match classify(&call.fun, self.types, self.file.package()) {
                        CallKind::FunctionCall => self.calls.push(call),
                        kind => log::debug!(target: "step-into", "skip {kind}: {}", call.fun),
                    }
                }
                self.visit_expr(&call.fun);
                self.visit_exprs(&call.args);
            }
        }
    }
}

/// Return function calls whose closing parenthesis is located on `line`, in pre-order
/// (a call precedes calls nested into its callee and arguments).
///
/// Type conversions and builtin calls are skipped. Calls of `defer` and `go` statements
/// are skipped with all nested calls.
pub fn calls_on_line<'a>(
    file: &'a SourceFile,
    line: u64,
    types: &NameRegistry,
) -> Vec<&'a CallExpr> {
    let mut extractor = Extractor {
        file,
        types,
        line,
        calls: vec![],
    };
    file.syntax()
        .decls
        .iter()
        .for_each(|decl| extractor.visit_decl(decl));
    extractor.calls
}
