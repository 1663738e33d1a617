//! SML translator and register machine.
//!
//! SML source is translated into a flat instruction list plus a label table,
//! which a small register machine then executes.
//!
//! # Architecture
//!
//! - **Instructions**: a closed set of variants generated from one catalog
//!   ([`isa`]), each carrying its source label and typed operands
//! - **Registry**: mnemonic to factory map consulted by the translator
//!   ([`registry`]); new mnemonics plug in without translator changes
//! - **Registers**: 32 zero-initialized `i64` registers by default
//! - **Labels**: resolved by name when a branch executes, not at translation
//! - **Console**: one line sink for `out` values and diagnostics
//!
//! # Modules
//!
//! - [`console`]: output channel
//! - [`errors`]: translation and execution error type
//! - [`isa`]: instruction catalog, `Instruction`, execution semantics
//! - [`labels`]: label table
//! - [`machine`]: fetch-execute loop
//! - [`operand`]: operand kinds and line scanning
//! - [`program`]: translated program container
//! - [`registers`]: register file
//! - [`registry`]: mnemonic registry
//! - [`translator`]: source translator

pub mod console;
pub mod errors;
pub mod isa;
#[cfg(test)]
mod isa_static_check;
pub mod labels;
pub mod machine;
pub mod operand;
pub mod program;
pub mod registers;
pub mod registry;
pub mod translator;
