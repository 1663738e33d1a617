use sml_derive::Error;
use std::io;

/// Errors that can occur during translation or execution.
#[derive(Debug, Error)]
pub enum VMError {
    /// The source could not be opened or read.
    #[error("io error: {0}")]
    Io(String),
    /// No instruction is registered under this mnemonic.
    #[error("Unknown instruction {name}")]
    InvalidInstructionName { name: String },
    /// The line ended before every operand slot was filled.
    #[error("Too few operands for {instruction}")]
    MissingOperand { instruction: &'static str },
    /// Tokens were left on the line after the last operand.
    #[error("Too many operands for {instruction}, unexpected {extra}")]
    TooManyOperands {
        instruction: &'static str,
        extra: String,
    },
    /// An integer literal operand could not be parsed.
    #[error("Expected integer, found {token}")]
    ExpectedInteger { token: String },
    /// A register operand was not a non-negative index.
    #[error("Expected register index, found {token}")]
    ExpectedRegister { token: String },
    /// Label already bound earlier in the same translation.
    #[error("Duplicate label {label}")]
    DuplicateLabel { label: String },
    /// Branch target not present in the label table.
    #[error("undefined label: {label}")]
    UndefinedLabel { label: String },
    /// Register index exceeds the register file size.
    #[error("register index {index} out of bounds ({available} registers)")]
    InvalidRegisterIndex { index: usize, available: usize },
    /// Integer division with a zero divisor.
    #[error("Division by zero")]
    DivisionByZero,
    /// Rejected machine or CLI configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<io::Error> for VMError {
    fn from(err: io::Error) -> Self {
        VMError::Io(err.to_string())
    }
}
