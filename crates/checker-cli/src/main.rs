//! CLI entry point for the Statewalk model checker binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use checker_core::{CheckerConfig, Explorer, InstructionImage, Verdict};

const USAGE_TEXT: &str = "\
Usage: statewalk <command> [options]

Commands:
  check <trace-file> [--max-states <n>]  Explore all reachable states

Options:
  --max-states <n>  Stop after dequeuing n states (default: unlimited)
  -h, --help        Show this help message

The trace file carries one instruction byte per line as two hex digits,
least-significant byte of each instruction first.

Exit codes:
  0  verified: every reachable state is safe and some path terminates
  1  safety or liveness violation found
  2  usage, file, or decode error
  3  inconclusive: the state budget ran out
";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Check(CheckArgs),
}

#[derive(Debug, PartialEq, Eq)]
struct CheckArgs {
    input: PathBuf,
    max_states: usize,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();
    match command_str.as_str() {
        "check" => parse_check_args(args)
            .map(Command::Check)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

#[allow(clippy::while_let_on_iterator)]
fn parse_check_args(mut args: impl Iterator<Item = OsString>) -> Result<CheckArgs, String> {
    let mut input: Option<PathBuf> = None;
    let mut max_states = 0_usize;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--max-states" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --max-states".to_string())?;
            max_states = value
                .to_string_lossy()
                .parse::<usize>()
                .map_err(|_| format!("invalid --max-states value: {}", value.to_string_lossy()))?;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing trace-file path".to_string())?;
    Ok(CheckArgs { input, max_states })
}

fn report(verdict: &Verdict) -> ExitCode {
    match verdict {
        Verdict::Verified { states_explored } => {
            println!("verified: every reachable state is safe and the program terminates");
            println!("states explored: {states_explored}");
            ExitCode::SUCCESS
        }
        Verdict::SafetyFailed {
            violation,
            trace,
            states_explored,
        } => {
            println!("safety violation: {violation}");
            if let Some(failing) = trace.last() {
                println!(
                    "counterexample: {} step(s) from reset, failing at pc {:#x}",
                    trace.len().saturating_sub(1),
                    failing.pc()
                );
            }
            println!("states explored: {states_explored}");
            ExitCode::from(1)
        }
        Verdict::LivenessFailed { states_explored } => {
            println!("liveness violation: no terminating path is reachable");
            println!("states explored: {states_explored}");
            ExitCode::from(1)
        }
        Verdict::BudgetExceeded { states_explored } => {
            println!("inconclusive: state budget exhausted");
            println!("states explored: {states_explored}");
            ExitCode::from(3)
        }
    }
}

fn run_check(args: &CheckArgs) -> Result<Verdict, String> {
    let text = fs::read_to_string(&args.input)
        .map_err(|err| format!("cannot read {}: {err}", args.input.display()))?;
    let image = InstructionImage::from_hex_lines(&text);
    let config = CheckerConfig {
        max_states: args.max_states,
        ..CheckerConfig::default()
    };
    Explorer::new(&image, config)
        .run()
        .map_err(|err| format!("check aborted: {err}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            print!("{USAGE_TEXT}");
            ExitCode::SUCCESS
        }
        Ok(ParseResult::Command(Command::Check(args))) => match run_check(&args) {
            Ok(verdict) => report(&verdict),
            Err(message) => {
                eprintln!("error: {message}");
                ExitCode::from(2)
            }
        },
        Err(message) => {
            eprintln!("error: {message}");
            eprint!("{USAGE_TEXT}");
            ExitCode::from(2)
        }
    }
}
