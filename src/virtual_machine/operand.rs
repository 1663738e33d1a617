//! Operand kinds and per-line token scanning.
//!
//! A source line is consumed left to right by a [`LineScanner`]; the label and
//! mnemonic are taken by the translator, and the remaining tokens are decoded
//! on demand by instruction factories through an [`Operands`] cursor.

use crate::virtual_machine::errors::VMError;

/// The type of a single operand slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    /// Zero-based register index.
    Register,
    /// Signed integer literal.
    Integer,
    /// Label reference, resolved when the instruction executes.
    Label,
}

impl OperandKind {
    /// Returns a human-readable type name for listings and errors.
    pub const fn name(&self) -> &'static str {
        match self {
            OperandKind::Register => "Register",
            OperandKind::Integer => "Integer",
            OperandKind::Label => "Label",
        }
    }
}

/// Whitespace (space or tab) separated token scanner over one source line.
///
/// Holds the not yet consumed remainder of the line.
#[derive(Debug, Clone)]
pub struct LineScanner<'a> {
    rest: &'a str,
}

fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t'
}

impl<'a> LineScanner<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            rest: line.trim_end_matches(['\r', '\n']),
        }
    }

    /// Removes and returns the next token, or `None` when the line is exhausted.
    pub fn scan(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start_matches(is_separator);
        if trimmed.is_empty() {
            self.rest = trimmed;
            return None;
        }
        let end = trimmed.find(is_separator).unwrap_or(trimmed.len());
        let (word, rest) = trimmed.split_at(end);
        self.rest = rest;
        Some(word)
    }

    /// Returns the next token without consuming it.
    pub fn peek(&self) -> Option<&'a str> {
        self.clone().scan()
    }

    /// True when no tokens remain.
    pub fn is_exhausted(&self) -> bool {
        self.peek().is_none()
    }
}

/// Parses a register index: a non-negative decimal integer.
pub(crate) fn parse_register(tok: &str) -> Result<usize, VMError> {
    tok.parse::<usize>().map_err(|_| VMError::ExpectedRegister {
        token: tok.to_string(),
    })
}

/// Parses a signed decimal integer literal.
pub(crate) fn parse_integer(tok: &str) -> Result<i64, VMError> {
    tok.parse::<i64>().map_err(|_| VMError::ExpectedInteger {
        token: tok.to_string(),
    })
}

/// Operand cursor handed to instruction factories.
///
/// Each accessor consumes one token. A missing token is reported as
/// [`VMError::MissingOperand`] regardless of the expected kind.
pub struct Operands<'s, 'a> {
    scanner: &'s mut LineScanner<'a>,
    instruction: &'static str,
}

impl<'s, 'a> Operands<'s, 'a> {
    pub fn new(scanner: &'s mut LineScanner<'a>, instruction: &'static str) -> Self {
        Self {
            scanner,
            instruction,
        }
    }

    fn next_token(&mut self) -> Result<&'a str, VMError> {
        self.scanner.scan().ok_or(VMError::MissingOperand {
            instruction: self.instruction,
        })
    }

    /// Decodes the next token as a register index.
    pub fn register(&mut self) -> Result<usize, VMError> {
        parse_register(self.next_token()?)
    }

    /// Decodes the next token as an integer literal.
    pub fn integer(&mut self) -> Result<i64, VMError> {
        parse_integer(self.next_token()?)
    }

    /// Takes the next token verbatim as a label reference.
    pub fn label(&mut self) -> Result<String, VMError> {
        self.next_token().map(str::to_string)
    }

    /// Mnemonic of the instruction being decoded.
    pub fn instruction(&self) -> &'static str {
        self.instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_splits_on_spaces_and_tabs() {
        let mut s = LineScanner::new("  f0 \tlin  20\t6  ");
        assert_eq!(s.scan(), Some("f0"));
        assert_eq!(s.scan(), Some("lin"));
        assert_eq!(s.scan(), Some("20"));
        assert_eq!(s.scan(), Some("6"));
        assert_eq!(s.scan(), None);
        assert!(s.is_exhausted());
    }

    #[test]
    fn scan_empty_line() {
        let mut s = LineScanner::new("");
        assert_eq!(s.scan(), None);
        let mut s = LineScanner::new(" \t \r\n");
        assert_eq!(s.scan(), None);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut s = LineScanner::new("out 3");
        assert_eq!(s.peek(), Some("out"));
        assert_eq!(s.scan(), Some("out"));
        assert_eq!(s.peek(), Some("3"));
    }

    #[test]
    fn parse_register_valid() {
        assert_eq!(parse_register("0").unwrap(), 0);
        assert_eq!(parse_register("31").unwrap(), 31);
    }

    #[test]
    fn parse_register_rejects_negative_and_text() {
        assert!(matches!(parse_register("-1"), Err(VMError::ExpectedRegister { .. })));
        assert!(matches!(parse_register("r1"), Err(VMError::ExpectedRegister { .. })));
    }

    #[test]
    fn parse_integer_accepts_extremes() {
        assert_eq!(parse_integer(&i64::MAX.to_string()).unwrap(), i64::MAX);
        assert_eq!(parse_integer(&i64::MIN.to_string()).unwrap(), i64::MIN);
        assert_eq!(parse_integer("-7").unwrap(), -7);
    }

    #[test]
    fn parse_integer_rejects_garbage() {
        let err = parse_integer("2x").unwrap_err();
        assert!(matches!(err, VMError::ExpectedInteger { ref token } if token == "2x"));
    }

    #[test]
    fn operands_report_missing_token() {
        let mut s = LineScanner::new("4");
        let mut ops = Operands::new(&mut s, "div");
        assert_eq!(ops.register().unwrap(), 4);
        assert!(matches!(
            ops.register(),
            Err(VMError::MissingOperand { instruction: "div" })
        ));
        assert!(matches!(ops.label(), Err(VMError::MissingOperand { .. })));
    }

    #[test]
    fn operand_kind_names() {
        assert_eq!(OperandKind::Register.name(), "Register");
        assert_eq!(OperandKind::Integer.name(), "Integer");
        assert_eq!(OperandKind::Label.name(), "Label");
    }
}
