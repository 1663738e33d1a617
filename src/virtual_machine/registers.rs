use crate::virtual_machine::errors::VMError;
use std::fmt;

/// Number of registers in a default SML machine.
pub const DEFAULT_REGISTER_COUNT: usize = 32;

/// Register file holding the machine's integer registers.
///
/// Every register starts at zero. Reads and writes outside the file fail with
/// [`VMError::InvalidRegisterIndex`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registers {
    regs: Vec<i64>,
}

impl Registers {
    /// Creates a zeroed register file with `count` registers.
    pub fn new(count: usize) -> Self {
        Self {
            regs: vec![0; count],
        }
    }

    fn out_of_range(&self, idx: usize) -> VMError {
        VMError::InvalidRegisterIndex {
            index: idx,
            available: self.regs.len(),
        }
    }

    /// Returns the value in register `idx`.
    pub fn get(&self, idx: usize) -> Result<i64, VMError> {
        self.regs
            .get(idx)
            .copied()
            .ok_or_else(|| self.out_of_range(idx))
    }

    /// Stores `value` into register `idx`.
    pub fn set(&mut self, idx: usize, value: i64) -> Result<(), VMError> {
        let err = self.out_of_range(idx);
        let slot = self.regs.get_mut(idx).ok_or(err)?;
        *slot = value;
        Ok(())
    }

    /// Number of registers in the file.
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Resets every register to zero.
    pub fn clear(&mut self) {
        self.regs.fill(0);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTER_COUNT)
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registers")?;
        for (idx, value) in self.regs.iter().enumerate() {
            write!(f, " {idx}={value}")?;
        }
        Ok(())
    }
}
