//! Mnemonic to instruction factory registry.
//!
//! The translator resolves every mnemonic through an [`InstructionRegistry`]
//! and never names instruction variants itself. [`InstructionRegistry::new`]
//! seeds the registry from the instruction catalog; hosts can add aliases or
//! override mnemonics with [`InstructionRegistry::register`].

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::{Factory, catalog};
use std::collections::HashMap;

/// A registered mnemonic and its factory.
#[derive(Clone, Copy)]
pub struct Entry {
    /// Canonical mnemonic, reported in operand errors.
    pub mnemonic: &'static str,
    pub factory: Factory,
}

#[derive(Clone)]
pub struct InstructionRegistry {
    entries: HashMap<String, Entry>,
}

/// Case normalization applied to mnemonics before lookup.
pub fn normalize(mnemonic: &str) -> String {
    mnemonic.to_ascii_lowercase()
}

impl InstructionRegistry {
    /// Creates a registry holding every catalog instruction.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (mnemonic, factory) in catalog() {
            registry.register(mnemonic, factory);
        }
        registry
    }

    /// Creates a registry with no mnemonics.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers `factory` under `mnemonic`, replacing any previous entry.
    pub fn register(&mut self, mnemonic: &'static str, factory: Factory) {
        self.entries
            .insert(normalize(mnemonic), Entry { mnemonic, factory });
    }

    /// Registers `alias` as another spelling of an existing mnemonic.
    pub fn alias(&mut self, alias: &str, mnemonic: &str) -> Result<(), VMError> {
        let entry = self.lookup(mnemonic)?;
        self.entries.insert(normalize(alias), entry);
        Ok(())
    }

    /// Resolves a source mnemonic (any case) to its entry.
    pub fn lookup(&self, mnemonic: &str) -> Result<Entry, VMError> {
        self.entries
            .get(&normalize(mnemonic))
            .copied()
            .ok_or_else(|| VMError::InvalidInstructionName {
                name: mnemonic.to_string(),
            })
    }

    pub fn contains(&self, mnemonic: &str) -> bool {
        self.entries.contains_key(&normalize(mnemonic))
    }

    /// Registered mnemonics, sorted.
    pub fn mnemonics(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for InstructionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
