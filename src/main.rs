//! SML interpreter CLI.
//!
//! Translates an SML source file and runs it on the register machine.
//!
//! # Usage
//! ```text
//! sml <program.sml> [OPTIONS]
//! ```
//!
//! # Options
//! - `-r, --registers <n>`: Register file size (defaults to `$SML_REGISTERS` or 32)
//! - `-t, --trace`: Log every executed instruction
//! - `-d, --dump`: Print the translated program before running it
//! - `--no-timestamp`: Omit timestamps from log lines

use sml::utils::log::SHOW_TIMESTAMP;
use sml::virtual_machine::machine::{MachineConfig, parse_register_count};
use sml::{Machine, Program, Stdout, Translator, error, info, warn};
use std::env;
use std::path::Path;
use std::process;
use std::sync::atomic::Ordering;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let input_path = &args[1];
    let mut config = MachineConfig::from_env().unwrap_or_else(|e| {
        error!("{e}");
        process::exit(1);
    });
    let mut dump = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            k @ ("--registers" | "-r") => {
                i += 1;
                if i >= args.len() {
                    error!("{k} requires an argument");
                    process::exit(1);
                }
                config.registers = parse_register_count(&args[i]).unwrap_or_else(|e| {
                    error!("{e}");
                    process::exit(1);
                });
            }
            "--trace" | "-t" => config.trace = true,
            "--dump" | "-d" => dump = true,
            "--no-timestamp" => SHOW_TIMESTAMP.store(false, Ordering::Relaxed),
            other => {
                error!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
        i += 1;
    }

    if !Path::new(input_path).exists() {
        error!("Input file does not exist: {}", input_path);
        process::exit(1);
    }

    let mut program = Program::new();
    let mut console = Stdout;
    let report = match Translator::new().translate_file(input_path, &mut program, &mut console) {
        Ok(report) => report,
        Err(e) => {
            error!("Translation failed: {}", e);
            process::exit(1);
        }
    };
    if report.parse_errors > 0 {
        warn!(
            "{} line(s) rejected, running the remaining {} instruction(s)",
            report.parse_errors, report.instructions
        );
    }

    if dump {
        print!("{program}");
    }

    let mut machine = Machine::new(config, program, console).unwrap_or_else(|e| {
        error!("{e}");
        process::exit(1);
    });

    match machine.run() {
        Ok(executed) => info!("Halted after {} instruction(s)", executed),
        Err(e) => {
            error!(
                "Execution stopped at instruction {}: {}",
                machine.pc().saturating_sub(1),
                e
            );
            process::exit(1);
        }
    }
}

const USAGE: &str = "\
SML Interpreter

USAGE:
    {program} <program.sml> [OPTIONS]

ARGS:
    <program.sml>    SML source file to translate and run

OPTIONS:
    -r, --registers <n>   Register file size (defaults to $SML_REGISTERS or 32)
    -t, --trace           Log every executed instruction
    -d, --dump            Print the translated program before running
        --no-timestamp    Omit timestamps from log lines
    -h, --help            Print this help message

EXAMPLES:
    {program} factorial.sml
    {program} factorial.sml --trace --registers 64
";

fn print_usage(program: &str) {
    info!("{}", USAGE.replace("{program}", program));
}
