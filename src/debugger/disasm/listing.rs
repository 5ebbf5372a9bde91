use crate::debugger::disasm::{CallInstruction, Destination, LineDisassembler};
use crate::debugger::error::Error;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct ListedInstruction {
    pc: u64,
    text: String,
    #[serde(default)]
    destination: Option<Destination>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingEntry {
    pub file: String,
    pub line: u64,
    #[serde(default, rename = "instruction")]
    instructions: Vec<ListedInstruction>,
}

/// Static disassembly listing of source lines, usually recorded from a debugger session.
///
/// ```toml
/// [[line]]
/// file = "main.go"
/// line = 7
///
/// [[line.instruction]]
/// pc = 0x4553a4
/// text = "call main.g(SB)"
/// destination = { function = "main.g" }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Listing {
    #[serde(default, rename = "line")]
    entries: Vec<ListingEntry>,
}

impl Listing {
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    /// Add instruction to a line listing.
    pub fn push(
        &mut self,
        file: &str,
        line: u64,
        pc: u64,
        text: impl Into<String>,
        destination: Option<Destination>,
    ) {
        let insn = ListedInstruction {
            pc,
            text: text.into(),
            destination,
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.file == file && e.line == line)
        {
            Some(entry) => entry.instructions.push(insn),
            None => self.entries.push(ListingEntry {
                file: file.to_string(),
                line,
                instructions: vec![insn],
            }),
        }
    }

    pub fn entries(&self) -> &[ListingEntry] {
        &self.entries
    }
}

impl LineDisassembler for Listing {
    fn disassemble_line(
        &self,
        filename: &str,
        line: u64,
        pc: u64,
    ) -> Result<Vec<CallInstruction>, Error> {
        let instructions: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.file == filename && e.line == line)
            .flat_map(|e| e.instructions.iter())
            .map(|i| {
                let mut insn = CallInstruction::new(i.pc, i.text.clone(), i.destination.clone());
                insn.at_pc = insn.pc == pc;
                insn
            })
            .collect();

        if instructions.is_empty() {
            return Err(Error::NoInstructions(filename.to_string(), line));
        }
        Ok(instructions)
    }
}
