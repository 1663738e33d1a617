//! Output channel for `out` values and runtime/parse diagnostics.
//!
//! The [`Console`] trait is the single textual sink shared by the translator
//! and the machine. [`Stdout`] prints, [`Capture`] records lines in memory.

use crate::virtual_machine::errors::VMError;
use std::io::{self, Write};

/// Prefix of every translation diagnostic.
pub const PARSE_ERROR_PREFIX: &str = "Parse Error: ";
/// Prefix of every recoverable runtime diagnostic.
pub const RUNTIME_ERROR_PREFIX: &str = "Runtime Error: ";
/// Line reported when `div` meets a zero divisor.
pub const DIVISION_BY_ZERO: &str = "Runtime Error: Division by zero";

/// Line-oriented output sink.
pub trait Console {
    /// Writes one line of output.
    fn print_line(&mut self, line: &str);

    /// Emits the value of an `out` instruction.
    fn print_value(&mut self, value: i64) {
        self.print_line(&value.to_string());
    }

    /// Reports a per-line translation error.
    fn parse_error(&mut self, message: &str, label: &str) {
        self.print_line(&format!("{PARSE_ERROR_PREFIX}{message} on line {label}"));
    }

    /// Reports a recoverable runtime error.
    fn runtime_error(&mut self, error: &VMError) {
        self.print_line(&format!("{RUNTIME_ERROR_PREFIX}{error}"));
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn print_line(&mut self, line: &str) {
        (**self).print_line(line);
    }
}

/// Console writing to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl Console for Stdout {
    fn print_line(&mut self, line: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{line}");
    }
}

/// Console that keeps every line in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Capture {
    pub lines: Vec<String>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines that start with `prefix`.
    pub fn lines_starting_with<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(move |line| line.starts_with(prefix))
    }

    /// Lines that parse as integers, i.e. the values printed by `out`.
    pub fn values(&self) -> Vec<i64> {
        self.lines
            .iter()
            .filter_map(|line| line.parse::<i64>().ok())
            .collect()
    }
}

impl Console for Capture {
    fn print_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
