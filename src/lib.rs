//! SML library.
//!
//! Translates SML assembly into an instruction list and runs it on a small
//! register machine.

pub mod utils;
pub mod virtual_machine;

pub use virtual_machine::console::{Capture, Console, Stdout};
pub use virtual_machine::errors::VMError;
pub use virtual_machine::isa::Instruction;
pub use virtual_machine::machine::{Machine, MachineConfig};
pub use virtual_machine::program::Program;
pub use virtual_machine::translator::{TranslationReport, Translator};
