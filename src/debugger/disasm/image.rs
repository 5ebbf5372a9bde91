use crate::debugger::disasm::{CallInstruction, Destination, LineDisassembler};
use crate::debugger::error::Error;
use capstone::prelude::*;
use itertools::Itertools;
use lru::LruCache;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::ops::Range;

const CACHE_SIZE: usize = 256;

/// Disassembler over a code image of x86-64 machine code.
///
/// Code image is a contiguous memory region that starts at a `base` address. Source lines
/// are mapped into address ranges of the image by a line table, call targets are resolved
/// into function names by a symbol table.
pub struct ImageDisassembler {
    cs: Capstone,
    base: u64,
    code: Vec<u8>,
    symbols: BTreeMap<u64, String>,
    lines: HashMap<(String, u64), Vec<Range<u64>>>,
    cache: RefCell<LruCache<(u64, u64), Vec<CallInstruction>>>,
}

impl ImageDisassembler {
    /// Create a new [`ImageDisassembler`].
    ///
    /// # Arguments
    ///
    /// * `base`: address of the first image byte
    /// * `code`: machine code
    pub fn new(base: u64, code: Vec<u8>) -> Result<Self, Error> {
        Ok(Self {
            cs: Capstone::new()
                .x86()
                .mode(arch::x86::ArchMode::Mode64)
                .syntax(arch::x86::ArchSyntax::Att)
                .build()
                .map_err(Error::DisAsmInit)?,
            base,
            code,
            symbols: BTreeMap::new(),
            lines: HashMap::new(),
            cache: RefCell::new(LruCache::new(
                NonZeroUsize::new(CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            )),
        })
    }

    /// Register a function that starts at `addr`.
    pub fn add_symbol(&mut self, name: impl Into<String>, addr: u64) {
        self.symbols.insert(addr, name.into());
    }

    /// Register an address range generated for a source line. A line may own
    /// multiple ranges.
    pub fn add_line(&mut self, file: impl Into<String>, line: u64, range: Range<u64>) {
        self.lines.entry((file.into(), line)).or_default().push(range);
    }

    fn image_range(&self) -> Range<u64> {
        self.base..self.base + self.code.len() as u64
    }

    /// Function that contains `addr`.
    fn symbol(&self, addr: u64) -> Option<&str> {
        if !self.image_range().contains(&addr) {
            return None;
        }
        self.symbols
            .range(..=addr)
            .next_back()
            .map(|(_, name)| name.as_str())
    }

    /// Source place of `addr` by line table.
    fn place(&self, addr: u64) -> Option<(&str, u64)> {
        self.lines
            .iter()
            .filter(|(_, ranges)| ranges.iter().any(|r| r.contains(&addr)))
            .map(|((file, line), _)| (file.as_str(), *line))
            .min()
    }

    /// Resolve destination of a direct call, AT&T syntax operand is an absolute address.
    fn destination(&self, mnemonic: &str, operands: &str) -> Option<Destination> {
        if !mnemonic.starts_with("call") {
            return None;
        }
        let target = u64::from_str_radix(operands.trim().strip_prefix("0x")?, 16).ok()?;
        let function = self.symbol(target)?.to_string();
        let place = self.place(target);
        Some(Destination {
            function,
            file: place.map(|(file, _)| file.to_string()),
            line: place.map(|(_, line)| line),
        })
    }

    fn disasm_range(&self, range: &Range<u64>) -> Result<Vec<CallInstruction>, Error> {
        let image = self.image_range();
        if range.start < image.start || range.end > image.end || range.start > range.end {
            return Err(Error::OutOfImage(range.start, range.end));
        }
        let text = &self.code[(range.start - self.base) as usize..(range.end - self.base) as usize];

        let mut cache = self.cache.borrow_mut();
        let instructions = cache.try_get_or_insert((range.start, range.end), || {
            let instructions = self
                .cs
                .disasm_all(text, range.start)
                .map_err(Error::DisAsm)?
                .iter()
                .map(|i| {
                    let mnemonic = i.mnemonic().unwrap_or_default();
                    let operands = i.op_str().unwrap_or_default();
                    let text = if operands.is_empty() {
                        mnemonic.to_string()
                    } else {
                        format!("{mnemonic} {operands}")
                    };
                    CallInstruction::new(i.address(), text, self.destination(mnemonic, operands))
                })
                .collect::<Vec<_>>();
            Ok::<_, Error>(instructions)
        })?;

        Ok(instructions.clone())
    }
}

impl LineDisassembler for ImageDisassembler {
    fn disassemble_line(
        &self,
        filename: &str,
        line: u64,
        pc: u64,
    ) -> Result<Vec<CallInstruction>, Error> {
        let ranges = self
            .lines
            .get(&(filename.to_string(), line))
            .filter(|ranges| !ranges.is_empty())
            .ok_or_else(|| Error::NoInstructions(filename.to_string(), line))?;

        let instructions = ranges
            .iter()
            .map(|range| self.disasm_range(range))
            .flatten_ok()
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(instructions
            .into_iter()
            .sorted_by_key(|i| i.pc)
            .map(|mut i| {
                i.at_pc = i.pc == pc;
                i
            })
            .collect())
    }
}
