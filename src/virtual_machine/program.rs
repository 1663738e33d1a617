//! Translated SML program: the label table plus the flat instruction list.

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::Instruction;
use crate::virtual_machine::labels::Labels;
use std::fmt;

/// Output of translation and input of the machine.
///
/// Label positions always index into `instructions`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    pub labels: Labels,
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties both the label table and the instruction list.
    pub fn clear(&mut self) {
        self.labels.reset();
        self.instructions.clear();
    }

    /// Appends an instruction, binding its label (if any) to its index.
    ///
    /// A duplicate label leaves the program unchanged.
    pub fn push(&mut self, instruction: Instruction) -> Result<(), VMError> {
        let index = self.instructions.len();
        if !instruction.label().is_empty() {
            self.labels.define(instruction.label(), index)?;
        }
        self.instructions.push(instruction);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Listing: the label table, then one numbered instruction per line.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "labels: {}", self.labels)?;
        for (index, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{index:>4}  {instruction}")?;
        }
        Ok(())
    }
}
