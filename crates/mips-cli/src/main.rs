//! CLI entry point for the mips-sim binary.

mod loader;

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use mips_core::{run_to_halt, CoreConfig, ProcessorState, RunTermination, TraceEvent, TraceSink};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: mips-sim <program> [options]

Runs a binary listing (one 32-digit binary instruction per line) to halt.

Options:
  -d, --dump           Print registers and data memory after the run
  -t, --trace          Print each retired instruction to stderr
  -m, --max-steps <N>  Stop after N instructions
  -h, --help           Show this help message

Examples:
  mips-sim program.txt
  mips-sim program.txt --dump
  mips-sim program.txt -t -m 10000
";

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    program: PathBuf,
    dump: bool,
    trace: bool,
    max_steps: Option<u64>,
}

#[derive(Debug)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut program: Option<PathBuf> = None;
    let mut dump = false;
    let mut trace = false;
    let mut max_steps: Option<u64> = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--dump" || arg == "-d" {
            dump = true;
            continue;
        }

        if arg == "--trace" || arg == "-t" {
            trace = true;
            continue;
        }

        if arg == "--max-steps" || arg == "-m" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --max-steps".to_string())?;
            let parsed = value
                .to_string_lossy()
                .parse::<u64>()
                .map_err(|_| format!("invalid step count: {}", value.to_string_lossy()))?;
            max_steps = Some(parsed);
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(ParseResult::Run(RunArgs {
        program,
        dump,
        trace,
        max_steps,
    }))
}

struct StderrTrace;

impl TraceSink for StderrTrace {
    fn on_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::InstructionRetired {
                pc,
                word,
                operation,
            } => eprintln!("{pc}  {word}  {}", operation.mnemonic()),
            TraceEvent::FaultRaised { fault } => eprintln!("{fault}"),
        }
    }
}

fn print_dump(state: &ProcessorState) {
    println!("Registers:");
    for (index, value) in state.registers.iter().enumerate() {
        println!("${index:<3}: {:>11} ({value})", value.to_i64());
    }
    println!("HI  : {:>11} ({})", state.hi.to_i64(), state.hi);
    println!("LO  : {:>11} ({})", state.lo.to_i64(), state.lo);
    println!("PC  : {:>11} ({})", state.pc.to_i64(), state.pc);

    println!("Data memory:");
    if state.data_memory.is_empty() {
        println!("(empty)");
    }
    for (addr, value) in state.data_memory.populated() {
        println!("{addr}: 0x{value:02x}");
    }
}

fn run(args: &RunArgs) -> Result<(), i32> {
    let program = match loader::load_program(&args.program) {
        Ok(words) => words,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(1);
        }
    };

    let mut state = ProcessorState::new(&program);
    let config = CoreConfig {
        max_steps: args.max_steps,
    };
    let mut sink = StderrTrace;
    let trace = args.trace.then_some(&mut sink as &mut dyn TraceSink);

    let outcome = run_to_halt(&mut state, &config, trace);

    let result = match outcome.termination {
        RunTermination::Halted => Ok(()),
        RunTermination::StepLimit => {
            eprintln!("stopped after {} instructions (step limit)", outcome.steps);
            Ok(())
        }
        RunTermination::Faulted(fault) => {
            eprintln!("error: {fault}");
            Err(1)
        }
    };

    if args.dump {
        print_dump(&state);
    }

    result
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => match run(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}
