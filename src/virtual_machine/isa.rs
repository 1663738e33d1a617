//! SML instruction set.
//!
//! The [`for_each_instruction!`](crate::for_each_instruction) macro holds the
//! canonical instruction catalog and hands it to a callback macro. This module
//! uses it to generate:
//! - the [`Instruction`] tagged union, one variant per mnemonic, each carrying
//!   its source label and typed operand fields
//! - mnemonic, operand-kind and description helpers
//! - [`catalog`], the mnemonic/factory pairs that seed the
//!   [`InstructionRegistry`](super::registry::InstructionRegistry)
//!
//! Execution semantics live in [`Instruction::execute`].
//!
//! # Operand kinds
//!
//! - `Reg`: register index (`usize`)
//! - `Int`: integer literal (`i64`)
//! - `Label`: label reference (`String`), looked up when the instruction runs

use crate::virtual_machine::console::Console;
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::machine::Machine;
use crate::virtual_machine::operand::{OperandKind, Operands};
use std::fmt;

/// Invokes a callback macro with the complete instruction catalog.
#[macro_export]
macro_rules! for_each_instruction {
    ($callback:ident) => {
        $callback! {
            /// LIN r x ; r = x
            Lin, "lin" => [register: Reg, value: Int],
            /// ADD d a b ; d = a + b
            Add, "add" => [result: Reg, op1: Reg, op2: Reg],
            /// SUB d a b ; d = a - b
            Sub, "sub" => [result: Reg, op1: Reg, op2: Reg],
            /// MUL d a b ; d = a * b
            Mul, "mul" => [result: Reg, op1: Reg, op2: Reg],
            /// DIV d a b ; d = a / b, reported and skipped when b == 0
            Div, "div" => [result: Reg, op1: Reg, op2: Reg],
            /// OUT r ; print r
            Out, "out" => [register: Reg],
            /// BNZ r L ; if r != 0 then pc = index of L
            Bnz, "bnz" => [register: Reg, target: Label],
        }
    };
}

/// Builds an instruction from its label and the operand tokens of its line.
pub type Factory = fn(String, &mut Operands<'_, '_>) -> Result<Instruction, VMError>;

/// Pins a closure to the [`Factory`] signature.
fn factory(f: Factory) -> Factory {
    f
}

#[macro_export]
macro_rules! define_instructions {
    (
        $(
            $(#[$doc:meta])*
            $name:ident, $mnemonic:literal => [
                $( $field:ident : $kind:ident ),* $(,)?
            ]
        ),* $(,)?
    ) => {
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum Instruction {
            $(
                $(#[$doc])*
                $name {
                    /// Source label, empty when the line had none.
                    label: String,
                    $( $field: define_instructions!(@ty $kind), )*
                },
            )*
        }

        impl Instruction {
            /// Returns the assembly mnemonic for this instruction.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Instruction::$name { .. } => $mnemonic, )*
                }
            }

            /// Returns the source label (empty when unlabeled).
            pub fn label(&self) -> &str {
                match self {
                    $( Instruction::$name { label, .. } => label, )*
                }
            }

            /// Returns the operand kinds in source order.
            pub fn operand_kinds(&self) -> &'static [OperandKind] {
                match self {
                    $(
                        Instruction::$name { .. } => &[ $( define_instructions!(@kind $kind) ),* ],
                    )*
                }
            }

            /// Formats the operands as they appear in source.
            fn operand_text(&self) -> Vec<String> {
                match self {
                    $(
                        #[allow(unused_variables)]
                        Instruction::$name { $( $field, )* .. } => vec![ $( $field.to_string() ),* ],
                    )*
                }
            }
        }

        /// Every catalog mnemonic paired with the factory that decodes it.
        pub fn catalog() -> Vec<(&'static str, Factory)> {
            vec![
                $(
                    (
                        $mnemonic,
                        factory(|label, operands| {
                            Ok(Instruction::$name {
                                label,
                                $( $field: define_instructions!(@decode operands, $kind)?, )*
                            })
                        }),
                    ),
                )*
            ]
        }
    };

    // ---------- types ----------
    (@ty Reg)   => { usize };
    (@ty Int)   => { i64 };
    (@ty Label) => { String };

    // ---------- kinds ----------
    (@kind Reg)   => { OperandKind::Register };
    (@kind Int)   => { OperandKind::Integer };
    (@kind Label) => { OperandKind::Label };

    // ---------- decoding ----------
    (@decode $ops:ident, Reg)   => { $ops.register() };
    (@decode $ops:ident, Int)   => { $ops.integer() };
    (@decode $ops:ident, Label) => { $ops.label() };
}

for_each_instruction!(define_instructions);

impl Instruction {
    /// Executes this instruction against `machine`.
    ///
    /// The program counter already points past this instruction; branches
    /// overwrite it. Division by zero is reported on the console and leaves the
    /// destination untouched. Register and label faults are returned.
    pub fn execute<C: Console>(&self, machine: &mut Machine<C>) -> Result<(), VMError> {
        match self {
            Instruction::Lin {
                register, value, ..
            } => machine.registers_mut().set(*register, *value),
            Instruction::Add {
                result, op1, op2, ..
            } => binary(machine, *result, *op1, *op2, i64::wrapping_add),
            Instruction::Sub {
                result, op1, op2, ..
            } => binary(machine, *result, *op1, *op2, i64::wrapping_sub),
            Instruction::Mul {
                result, op1, op2, ..
            } => binary(machine, *result, *op1, *op2, i64::wrapping_mul),
            Instruction::Div {
                result, op1, op2, ..
            } => {
                let dividend = machine.registers().get(*op1)?;
                let divisor = machine.registers().get(*op2)?;
                if divisor == 0 {
                    machine
                        .console_mut()
                        .runtime_error(&VMError::DivisionByZero);
                    return Ok(());
                }
                machine
                    .registers_mut()
                    .set(*result, dividend.wrapping_div(divisor))
            }
            Instruction::Out { register, .. } => {
                let value = machine.registers().get(*register)?;
                machine.console_mut().print_value(value);
                Ok(())
            }
            Instruction::Bnz {
                register, target, ..
            } => {
                if machine.registers().get(*register)? != 0 {
                    let index = machine.labels().index_of(target)?;
                    machine.set_pc(index);
                }
                Ok(())
            }
        }
    }
}

fn binary<C: Console>(
    machine: &mut Machine<C>,
    result: usize,
    op1: usize,
    op2: usize,
    op: fn(i64, i64) -> i64,
) -> Result<(), VMError> {
    let a = machine.registers().get(op1)?;
    let b = machine.registers().get(op2)?;
    machine.registers_mut().set(result, op(a, b))
}

/// Source-like description: `label: mnemonic operands...`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.label().is_empty() {
            write!(f, "{}: ", self.label())?;
        }
        write!(f, "{}", self.mnemonic())?;
        for operand in self.operand_text() {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}
