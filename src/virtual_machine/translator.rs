//! SML source translator.
//!
//! Turns source lines into a [`Program`]. Each line has the shape
//!
//! ```text
//! [label] mnemonic operand*
//! ```
//!
//! with tokens separated by spaces or tabs. The first token is the label,
//! except when it is a registered mnemonic and the second token is not; then
//! the line is unlabeled. Empty lines are skipped.
//!
//! Mnemonics are resolved through an [`InstructionRegistry`], so new
//! instructions never require changes here. A line that fails to parse is
//! reported on the console as `Parse Error: <msg> on line <label>` and
//! contributes no instruction; translation continues with the next line.
//! Only input failures abort a translation.

use crate::virtual_machine::console::Console;
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::Instruction;
use crate::virtual_machine::operand::{LineScanner, Operands};
use crate::virtual_machine::program::Program;
use crate::virtual_machine::registry::InstructionRegistry;
use crate::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Counts produced by a completed translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TranslationReport {
    /// Instructions appended to the program.
    pub instructions: usize,
    /// Lines rejected with a parse error.
    pub parse_errors: usize,
}

/// A rejected line: the error plus the text used to identify the line.
struct LineError {
    error: VMError,
    line_ref: String,
}

pub struct Translator {
    registry: InstructionRegistry,
}

impl Translator {
    /// Creates a translator for the full instruction catalog.
    pub fn new() -> Self {
        Self::with_registry(InstructionRegistry::new())
    }

    pub fn with_registry(registry: InstructionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &InstructionRegistry {
        &self.registry
    }

    /// Mutable registry access, for registering extra mnemonics.
    pub fn registry_mut(&mut self) -> &mut InstructionRegistry {
        &mut self.registry
    }

    /// Translates every line of `reader` into `program`.
    ///
    /// `program` is cleared first. Parse errors are reported on `console`
    /// and counted; a read failure aborts with [`VMError::Io`].
    pub fn translate<R: BufRead, C: Console>(
        &self,
        reader: R,
        program: &mut Program,
        console: &mut C,
    ) -> Result<TranslationReport, VMError> {
        program.clear();
        let mut report = TranslationReport::default();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            match self.translate_line(line_no + 1, &line) {
                Ok(None) => {}
                Ok(Some(instruction)) => {
                    let label = instruction.label().to_string();
                    match program.push(instruction) {
                        Ok(()) => report.instructions += 1,
                        Err(error) => {
                            report.parse_errors += 1;
                            console.parse_error(&error.to_string(), &label);
                        }
                    }
                }
                Err(LineError { error, line_ref }) => {
                    report.parse_errors += 1;
                    console.parse_error(&error.to_string(), &line_ref);
                }
            }
        }

        Ok(report)
    }

    /// Translates SML source held in memory.
    pub fn translate_source<C: Console>(
        &self,
        source: &str,
        program: &mut Program,
        console: &mut C,
    ) -> Result<TranslationReport, VMError> {
        self.translate(source.as_bytes(), program, console)
    }

    /// Translates the SML file at `path`. The file is closed before returning.
    pub fn translate_file<P: AsRef<Path>, C: Console>(
        &self,
        path: P,
        program: &mut Program,
        console: &mut C,
    ) -> Result<TranslationReport, VMError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| VMError::Io(format!("{}: {}", path.display(), e)))?;
        let report = self.translate(BufReader::new(file), program, console)?;
        info!(
            "Translated {}: {} instructions, {} parse errors",
            path.display(),
            report.instructions,
            report.parse_errors
        );
        Ok(report)
    }

    /// Parses one line. `Ok(None)` means the line holds no instruction.
    fn translate_line(&self, line_no: usize, line: &str) -> Result<Option<Instruction>, LineError> {
        let mut scanner = LineScanner::new(line);
        let Some(first) = scanner.scan() else {
            return Ok(None);
        };

        let unlabeled = self.registry.contains(first)
            && scanner.peek().is_none_or(|next| !self.registry.contains(next));
        let (label, mnemonic) = if unlabeled {
            ("", first)
        } else {
            match scanner.scan() {
                Some(mnemonic) => (first, mnemonic),
                None => {
                    warn!("line {line_no}: label {first} has no instruction, ignored");
                    return Ok(None);
                }
            }
        };

        let line_ref = if label.is_empty() {
            line_no.to_string()
        } else {
            label.to_string()
        };
        self.decode(label, mnemonic, &mut scanner)
            .map(Some)
            .map_err(|error| LineError { error, line_ref })
    }

    /// Resolves `mnemonic`, decodes its operands and rejects leftover tokens.
    fn decode(
        &self,
        label: &str,
        mnemonic: &str,
        scanner: &mut LineScanner<'_>,
    ) -> Result<Instruction, VMError> {
        let entry = self.registry.lookup(mnemonic)?;
        let instruction = (entry.factory)(
            label.to_string(),
            &mut Operands::new(scanner, entry.mnemonic),
        )?;

        if let Some(extra) = scanner.scan() {
            return Err(VMError::TooManyOperands {
                instruction: entry.mnemonic,
                extra: extra.to_string(),
            });
        }
        Ok(instruction)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_machine::console::Capture;
    use std::io::{self, Read};

    fn translate(source: &str) -> (Program, TranslationReport, Capture) {
        let mut program = Program::new();
        let mut console = Capture::new();
        let report = Translator::new()
            .translate_source(source, &mut program, &mut console)
            .expect("translation failed");
        (program, report, console)
    }

    #[test]
    fn labeled_bnz_line() {
        let (program, report, console) = translate("start bnz 2 loop");
        assert_eq!(report.instructions, 1);
        assert!(console.lines.is_empty());
        assert_eq!(
            program.instructions[0],
            Instruction::Bnz {
                label: "start".into(),
                register: 2,
                target: "loop".into(),
            }
        );
        let description = program.instructions[0].to_string();
        for part in ["start", "bnz", "2", "loop"] {
            assert!(description.contains(part), "{description}");
        }
        assert_eq!(program.labels.index_of("start").unwrap(), 0);
    }

    #[test]
    fn description_translates_back_to_same_instruction() {
        let (first, _, _) = translate("f1 div 3 1 2");
        let (second, _, _) = translate(&first.instructions[0].to_string().replace(':', ""));
        assert_eq!(first.instructions, second.instructions);
    }

    #[test]
    fn unlabeled_lines() {
        let (program, report, _) = translate("lin 1 5\nout 1\n");
        assert_eq!(report.instructions, 2);
        assert_eq!(program.instructions[1].label(), "");
        assert!(program.labels.is_empty());
    }

    #[test]
    fn label_named_like_a_mnemonic() {
        let (program, _, _) = translate("out out 1");
        assert_eq!(
            program.instructions[0],
            Instruction::Out {
                label: "out".into(),
                register: 1,
            }
        );
    }

    #[test]
    fn mnemonic_case_is_normalized() {
        let (program, report, _) = translate("a Lin 1 5\nb OUT 1");
        assert_eq!(report.instructions, 2);
        assert_eq!(program.instructions[1].mnemonic(), "out");
    }

    #[test]
    fn tabs_and_blank_lines() {
        let (program, report, console) = translate("\n\ta\tlin\t1\t7\n   \n");
        assert_eq!(report, TranslationReport { instructions: 1, parse_errors: 0 });
        assert_eq!(program.len(), 1);
        assert!(console.lines.is_empty());
    }

    #[test]
    fn malformed_integer_skips_only_that_line() {
        let (program, report, console) = translate("a lin 1 5\nb lin 2 five\nc out 1\n");
        assert_eq!(program.len(), 2);
        assert_eq!(program.instructions[0].label(), "a");
        assert_eq!(program.instructions[1].label(), "c");
        assert_eq!(report.parse_errors, 1);
        assert_eq!(
            console.lines,
            vec!["Parse Error: Expected integer, found five on line b"]
        );
        // index of `c` follows the surviving instructions
        assert_eq!(program.labels.index_of("c").unwrap(), 1);
        assert!(!program.labels.contains("b"));
    }

    #[test]
    fn extra_operand_is_rejected() {
        let (program, report, console) = translate("x out 1 2");
        assert!(program.is_empty());
        assert_eq!(report.parse_errors, 1);
        assert_eq!(
            console.lines,
            vec!["Parse Error: Too many operands for out, unexpected 2 on line x"]
        );
    }

    #[test]
    fn missing_operand_is_rejected() {
        let (program, _, console) = translate("x bnz 1");
        assert!(program.is_empty());
        assert_eq!(
            console.lines,
            vec!["Parse Error: Too few operands for bnz on line x"]
        );
    }

    #[test]
    fn unknown_mnemonic_is_rejected() {
        let (program, _, console) = translate("x jmp 1");
        assert!(program.is_empty());
        assert_eq!(
            console.lines,
            vec!["Parse Error: Unknown instruction jmp on line x"]
        );
    }

    #[test]
    fn unlabeled_error_reports_line_number() {
        let (_, _, console) = translate("lin 1 1\nout\n");
        assert_eq!(
            console.lines,
            vec!["Parse Error: Too few operands for out on line 2"]
        );
    }

    #[test]
    fn duplicate_label_is_a_parse_error() {
        let (program, report, console) = translate("a lin 1 1\na out 1\n");
        assert_eq!(program.len(), 1);
        assert_eq!(report.parse_errors, 1);
        assert_eq!(console.lines, vec!["Parse Error: Duplicate label a on line a"]);
    }

    #[test]
    fn label_without_instruction_is_ignored() {
        let (program, report, console) = translate("lonely\nb out 0");
        assert_eq!(program.len(), 1);
        assert_eq!(report.parse_errors, 0);
        assert!(console.lines.is_empty());
    }

    #[test]
    fn extreme_literals_are_accepted() {
        let (program, _, _) = translate(&format!("a lin 0 {}", i64::MAX));
        assert_eq!(
            program.instructions[0],
            Instruction::Lin {
                label: "a".into(),
                register: 0,
                value: i64::MAX,
            }
        );
    }

    #[test]
    fn translation_starts_from_clean_state() {
        let translator = Translator::new();
        let mut program = Program::new();
        let mut console = Capture::new();
        translator
            .translate_source("a out 0\nb out 1", &mut program, &mut console)
            .unwrap();
        translator
            .translate_source("a out 2", &mut program, &mut console)
            .unwrap();
        assert_eq!(program.len(), 1);
        assert!(!program.labels.contains("b"));
    }

    #[test]
    fn registered_mnemonic_needs_no_translator_change() {
        let mut translator = Translator::new();
        translator.registry_mut().register("clr", |label, operands| {
            Ok(Instruction::Lin {
                label,
                register: operands.register()?,
                value: 0,
            })
        });
        let mut program = Program::new();
        translator
            .translate_source("z clr 3", &mut program, &mut Capture::new())
            .unwrap();
        assert_eq!(program.instructions[0].to_string(), "z: lin 3 0");
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn read_failure_aborts_translation() {
        let mut program = Program::new();
        let err = Translator::new()
            .translate(
                io::BufReader::new(FailingReader),
                &mut program,
                &mut Capture::new(),
            )
            .unwrap_err();
        assert!(matches!(err, VMError::Io(ref msg) if msg.contains("disk on fire")));
    }

    #[test]
    fn missing_file_fails() {
        let mut program = Program::new();
        let err = Translator::new()
            .translate_file(
                "/definitely/not/here.sml",
                &mut program,
                &mut Capture::new(),
            )
            .unwrap_err();
        assert!(matches!(err, VMError::Io(_)));
    }

    #[test]
    fn file_source() {
        let path = std::env::temp_dir().join(format!("sml-translator-{}.sml", std::process::id()));
        std::fs::write(&path, "f0 lin 1 6\nf1 out 1\n").unwrap();
        let mut program = Program::new();
        let report = Translator::new()
            .translate_file(&path, &mut program, &mut Capture::new())
            .unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(report.instructions, 2);
    }
}
