//! Disassembly of source lines.

pub mod image;
pub mod listing;

use crate::debugger::error::Error;
use serde::Deserialize;

/// Function targeted by a call instruction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Destination {
    /// Fully qualified function name (may contain a path qualifier).
    pub function: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u64>,
}

/// Single disassembled instruction of a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInstruction {
    pub pc: u64,
    /// Raw instruction text.
    pub text: String,
    pub mnemonic: String,
    /// Instruction is located at the current program counter.
    pub at_pc: bool,
    /// Resolved call target, `None` for indirect calls and non-call instructions.
    pub destination: Option<Destination>,
}

impl CallInstruction {
    /// Create an instruction, mnemonic is the first word of instruction text.
    pub fn new(pc: u64, text: impl Into<String>, destination: Option<Destination>) -> Self {
        let text = text.into();
        let mnemonic = text
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            pc,
            text,
            mnemonic,
            at_pc: false,
            destination,
        }
    }

    /// Name of a called function if known.
    pub fn destination_name(&self) -> Option<&str> {
        self.destination.as_ref().map(|d| d.function.as_str())
    }
}

/// Disassembler of a single source line.
pub trait LineDisassembler {
    /// Return instructions generated for a source line in address order.
    ///
    /// # Arguments
    ///
    /// * `filename`: source file name
    /// * `line`: 1-based line number
    /// * `pc`: current program counter, instruction at this address is marked
    fn disassemble_line(
        &self,
        filename: &str,
        line: u64,
        pc: u64,
    ) -> Result<Vec<CallInstruction>, Error>;
}

impl<T: LineDisassembler + ?Sized> LineDisassembler for &T {
    fn disassemble_line(
        &self,
        filename: &str,
        line: u64,
        pc: u64,
    ) -> Result<Vec<CallInstruction>, Error> {
        (**self).disassemble_line(filename, line, pc)
    }
}
