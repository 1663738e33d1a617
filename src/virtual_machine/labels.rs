//! Label table mapping label text to instruction indices.
//!
//! Built by the translator while it appends instructions, then handed to the
//! machine. Branches look labels up by name at the moment they execute.

use crate::virtual_machine::errors::VMError;
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Labels {
    /// Definition order, for listings.
    order: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every label.
    pub fn reset(&mut self) {
        self.order.clear();
        self.positions.clear();
    }

    /// Binds `label` to the instruction at `index`.
    pub fn define(&mut self, label: &str, index: usize) -> Result<(), VMError> {
        if self.positions.contains_key(label) {
            return Err(VMError::DuplicateLabel {
                label: label.to_string(),
            });
        }
        self.order.push(label.to_string());
        self.positions.insert(label.to_string(), index);
        Ok(())
    }

    /// Rebinds an existing label, or defines it if absent.
    pub fn rebind(&mut self, label: &str, index: usize) {
        if self.positions.insert(label.to_string(), index).is_none() {
            self.order.push(label.to_string());
        }
    }

    /// Resolves a label to its instruction index.
    pub fn index_of(&self, label: &str) -> Result<usize, VMError> {
        self.positions
            .get(label)
            .copied()
            .ok_or_else(|| VMError::UndefinedLabel {
                label: label.to_string(),
            })
    }

    pub fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates `(label, index)` pairs in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order
            .iter()
            .map(|label| (label.as_str(), self.positions[label]))
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (label, index)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{label}@{index}")?;
        }
        write!(f, ")")
    }
}
