use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use stepseer::debugger::disasm::listing::Listing;
use stepseer::debugger::disasm::{CallInstruction, Destination, LineDisassembler};
use stepseer::debugger::source::{SourceFile, SourceProvider};
use stepseer::debugger::{Error, NameRegistry, StepIntoResolver};

/// Counters of collaborator invocations.
#[derive(Clone, Default)]
pub struct CallCounter {
    pub parses: Rc<Cell<usize>>,
    pub disassemblies: Rc<Cell<usize>>,
}

/// In-memory source files.
#[derive(Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
    counter: CallCounter,
}

impl MemorySource {
    pub fn new(counter: CallCounter) -> Self {
        Self {
            files: HashMap::new(),
            counter,
        }
    }

    pub fn with_file(mut self, name: &str, text: &str) -> Self {
        self.files.insert(name.to_string(), text.to_string());
        self
    }
}

impl SourceProvider for MemorySource {
    fn parse(&self, filename: &str) -> Result<SourceFile, Error> {
        self.counter.parses.set(self.counter.parses.get() + 1);
        let text = self
            .files
            .get(filename)
            .ok_or_else(|| Error::SourceNotFound(filename.into()))?;
        SourceFile::parse(filename, text)
    }
}

/// Static listing that counts disassembly requests.
pub struct CountingListing {
    listing: Listing,
    counter: CallCounter,
}

impl CountingListing {
    pub fn new(listing: Listing, counter: CallCounter) -> Self {
        Self { listing, counter }
    }
}

impl LineDisassembler for CountingListing {
    fn disassemble_line(
        &self,
        filename: &str,
        line: u64,
        pc: u64,
    ) -> Result<Vec<CallInstruction>, Error> {
        self.counter
            .disassemblies
            .set(self.counter.disassemblies.get() + 1);
        self.listing.disassemble_line(filename, line, pc)
    }
}

pub fn dest(function: &str) -> Option<Destination> {
    Some(Destination {
        function: function.to_string(),
        file: None,
        line: None,
    })
}

pub fn names<const N: usize>(names: [&str; N]) -> NameRegistry {
    names.into_iter().collect()
}

pub type TestResolver = StepIntoResolver<MemorySource, CountingListing>;

/// Create a resolver over a single `main.go` file.
pub fn resolver(
    source: &str,
    listing: Listing,
    types: NameRegistry,
    functions: NameRegistry,
) -> (TestResolver, CallCounter) {
    let counter = CallCounter::default();
    let source = MemorySource::new(counter.clone()).with_file("main.go", source);
    let disasm = CountingListing::new(listing, counter.clone());
    (
        StepIntoResolver::new(source, disasm, types, functions),
        counter,
    )
}

/// Names of all candidates of the last query.
pub fn candidate_names(resolver: &TestResolver) -> Vec<String> {
    resolver
        .candidates()
        .iter()
        .map(|c| c.name().to_string())
        .collect()
}
