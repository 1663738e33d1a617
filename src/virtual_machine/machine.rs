//! SML register machine.
//!
//! The machine owns the register file, the label table, the translated
//! instructions and the program counter. [`Machine::run`] fetches the
//! instruction at the program counter, advances the counter, and executes the
//! instruction, which may overwrite the counter. Execution ends when the
//! counter leaves the program.
//!
//! Fault policy:
//! - division by zero is reported on the console and execution continues
//! - an out-of-range register or an undefined branch label stops the run
//!   with the corresponding [`VMError`]

use crate::info;
use crate::virtual_machine::console::Console;
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::Instruction;
use crate::virtual_machine::labels::Labels;
use crate::virtual_machine::program::Program;
use crate::virtual_machine::registers::{DEFAULT_REGISTER_COUNT, Registers};
use std::env;
use std::fmt;
use std::rc::Rc;

/// Environment variable overriding the default register count.
pub const REGISTERS_ENV: &str = "SML_REGISTERS";

/// Machine construction options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    /// Size of the register file.
    pub registers: usize,
    /// Log every executed instruction.
    pub trace: bool,
}

impl MachineConfig {
    pub const fn new() -> Self {
        Self {
            registers: DEFAULT_REGISTER_COUNT,
            trace: false,
        }
    }

    /// Default configuration, with the register count taken from
    /// `SML_REGISTERS` when set.
    pub fn from_env() -> Result<Self, VMError> {
        let mut config = Self::new();
        if let Ok(raw) = env::var(REGISTERS_ENV) {
            config.registers = parse_register_count(&raw)?;
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), VMError> {
        if self.registers == 0 {
            return Err(VMError::InvalidConfig(
                "register count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a register count given on the command line or in the environment.
pub fn parse_register_count(raw: &str) -> Result<usize, VMError> {
    match raw.trim().parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(VMError::InvalidConfig(format!(
            "invalid register count '{raw}'"
        ))),
    }
}

pub struct Machine<C: Console> {
    registers: Registers,
    labels: Labels,
    /// Shared so the running instruction can borrow the machine mutably.
    program: Rc<[Instruction]>,
    pc: usize,
    console: C,
    trace: bool,
}

impl<C: Console> Machine<C> {
    /// Creates a machine ready to execute `program` from index 0.
    pub fn new(config: MachineConfig, program: Program, console: C) -> Result<Self, VMError> {
        config.validate()?;
        Ok(Self {
            registers: Registers::new(config.registers),
            labels: program.labels,
            program: program.instructions.into(),
            pc: 0,
            console,
            trace: config.trace,
        })
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Branch targets are looked up here at execution time, so edits made
    /// through this reference change where later branches land.
    pub fn labels_mut(&mut self) -> &mut Labels {
        &mut self.labels
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.program
    }

    /// Index of the next instruction to execute.
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn set_pc(&mut self, pc: usize) {
        self.pc = pc;
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// True once the program counter is outside the program.
    pub fn is_halted(&self) -> bool {
        self.pc >= self.program.len()
    }

    /// Zeroes the registers and rewinds the program counter.
    pub fn reset(&mut self) {
        self.registers.clear();
        self.pc = 0;
    }

    /// Executes one instruction. Returns `false` when already halted.
    pub fn step(&mut self) -> Result<bool, VMError> {
        let program = Rc::clone(&self.program);
        let Some(instruction) = program.get(self.pc) else {
            return Ok(false);
        };

        if self.trace {
            info!("{:>4}  {}", self.pc, instruction);
        }
        self.pc += 1;
        instruction.execute(self)?;
        Ok(true)
    }

    /// Runs until the program counter leaves the program.
    ///
    /// Returns the number of instructions executed.
    pub fn run(&mut self) -> Result<u64, VMError> {
        let mut executed = 0u64;
        while self.step()? {
            executed += 1;
        }
        Ok(executed)
    }
}

/// Snapshot: registers, labels and the instruction listing.
impl<C: Console> fmt::Display for Machine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.registers)?;
        writeln!(f, "labels: {}", self.labels)?;
        writeln!(f, "pc: {}", self.pc)?;
        for (index, instruction) in self.program.iter().enumerate() {
            writeln!(f, "{index:>4}  {instruction}")?;
        }
        Ok(())
    }
}
