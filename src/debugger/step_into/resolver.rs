use crate::config::EngineConfig;
use crate::debugger::disasm::LineDisassembler;
use crate::debugger::registry::NameRegistry;
use crate::debugger::source::SourceProvider;
use crate::debugger::step_into::candidate::StepIntoCandidate;
use crate::debugger::step_into::extract::calls_on_line;
use crate::debugger::step_into::filter::visible_calls;
use crate::debugger::step_into::matcher::pair;
use crate::debugger::step_into::naming::resolve_names;
use crate::debugger::step_into::reorder::evaluation_order;
use crate::{muted_error, weak_error};

#[derive(Debug, Clone, PartialEq, Eq)]
struct QueryKey {
    filename: String,
    line: u64,
    column: u64,
}

impl QueryKey {
    fn matches(&self, filename: &str, line: u64, column: u64) -> bool {
        self.filename == filename && self.line == line && self.column == column
    }
}

/// Last query and its result.
#[derive(Debug)]
struct Query {
    key: QueryKey,
    candidates: Vec<StepIntoCandidate>,
    /// Candidates are computed.
    valid: bool,
    selected: Option<usize>,
}

/// Return index of the first candidate that covers `column` and not executed yet.
/// Candidates must be sorted by width, so the innermost call wins.
fn select(candidates: &[StepIntoCandidate], column: u64, pc: u64) -> Option<usize> {
    candidates
        .iter()
        .position(|c| c.contains_column(column) && c.instruction.pc >= pc)
}

/// Finds out which of the calls on a source line a step-into request targets.
///
/// Resolver correlates calls found in source code with call instructions of a line.
/// Result of the last query is cached, repeated queries with the same
/// (filename, line, column) key don't touch the source provider and the disassembler.
pub struct StepIntoResolver<S: SourceProvider, D: LineDisassembler> {
    source: S,
    disasm: D,
    types: NameRegistry,
    functions: NameRegistry,
    config: EngineConfig,
    query: Option<Query>,
}

impl<S: SourceProvider, D: LineDisassembler> StepIntoResolver<S, D> {
    /// Create a new [`StepIntoResolver`].
    ///
    /// # Arguments
    ///
    /// * `source`: provider of parsed source files
    /// * `disasm`: line disassembler
    /// * `types`: known type names of a debugee program
    /// * `functions`: known function names of a debugee program
    pub fn new(source: S, disasm: D, types: NameRegistry, functions: NameRegistry) -> Self {
        Self {
            source,
            disasm,
            types,
            functions,
            config: EngineConfig::default(),
            query: None,
        }
    }

    pub fn with_config(self, config: EngineConfig) -> Self {
        Self { config, ..self }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Return a candidate targeted by step-into at `column` of a source line.
    ///
    /// # Arguments
    ///
    /// * `pc`: current program counter, calls with lower addresses are already executed
    /// * `filename`: source file name
    /// * `line`: 1-based line number
    /// * `column`: 1-based column number
    pub fn resolve(
        &mut self,
        pc: u64,
        filename: &str,
        line: u64,
        column: u64,
    ) -> Option<&StepIntoCandidate> {
        let fresh = self
            .query
            .as_ref()
            .map(|q| q.key.matches(filename, line, column))
            .unwrap_or(false);

        if !fresh {
            let candidates = self.candidates_for_line(pc, filename, line);
            let valid = candidates.is_some();
            let candidates = candidates.unwrap_or_default();
            let selected = select(&candidates, column, pc);
            self.query = Some(Query {
                key: QueryKey {
                    filename: filename.to_string(),
                    line,
                    column,
                },
                candidates,
                valid,
                selected,
            });
        }

        let query = self.query.as_ref()?;
        query.selected.and_then(|idx| query.candidates.get(idx))
    }

    /// Sorted candidates of the last query.
    pub fn candidates(&self) -> &[StepIntoCandidate] {
        self.query
            .as_ref()
            .map(|q| q.candidates.as_slice())
            .unwrap_or_default()
    }

    /// Return true if the last query selects a candidate.
    pub fn is_valid(&self) -> bool {
        self.query
            .as_ref()
            .map(|q| q.valid && q.selected.is_some())
            .unwrap_or(false)
    }

    /// Drop cached query, next [`StepIntoResolver::resolve`] call recomputes candidates.
    /// Should be called when the debugee program moves.
    pub fn invalidate(&mut self) {
        self.query = None;
    }

    fn candidates_for_line(
        &self,
        pc: u64,
        filename: &str,
        line: u64,
    ) -> Option<Vec<StepIntoCandidate>> {
        let file = muted_error!(self.source.parse(filename), "parse source:")?;

        let mut calls = calls_on_line(&file, line, &self.types);
        if calls.len() <= 1 {
            log::debug!(target: "step-into", "{filename}:{line}: nothing to disambiguate");
            return None;
        }
        evaluation_order(&mut calls);

        let instructions = match self.disasm.disassemble_line(filename, line, pc) {
            Err(e) if e.is_fatal() => weak_error!(Err(e), "disassemble line:"),
            result => muted_error!(result, "disassemble line:"),
        }?;
        let instructions = visible_calls(
            instructions,
            &self.config.call_mnemonic,
            &self.config.runtime_package,
        );

        let pairings = pair(&calls, instructions, &self.functions, file.package())?;
        let names = resolve_names(&pairings);

        let lines = file.lines();
        let mut candidates = pairings
            .into_iter()
            .zip(names)
            .map(|(pairing, name)| {
                let fun = &pairing.call.fun;
                let start = lines.position(fun.span.start).column;
                let end = lines.position(fun.span.end).column;
                StepIntoCandidate {
                    name,
                    columns: start..end,
                    line,
                    filename: filename.to_string(),
                    instruction: pairing.instruction,
                    fun: (**fun).clone(),
                }
            })
            .collect::<Vec<_>>();
        candidates.sort_by_key(|c| c.width());

        log::debug!(
            target: "step-into",
            "{filename}:{line}: {} step-into candidates",
            candidates.len()
        );
        Some(candidates)
    }
}
