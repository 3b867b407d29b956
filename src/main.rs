mod debug_report;

use clap::{ArgAction, Parser};
use eliza::{Eliza, ScriptError};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const GREETING: &str = "HOW DO YOU DO. PLEASE TELL ME YOUR PROBLEM";
const FAREWELL: &str = "GOODBYE! TAKE CARE.";

/// Script-driven ELIZA dialogue.
///
/// Exit codes: 0 success, 1 I/O error, 2 invalid arguments or script.
#[derive(Parser, Debug)]
#[command(name = "eliza", version, about)]
struct Cli {
    /// Script file to load.
    script: PathBuf,

    /// Answer a single input and exit instead of starting a conversation.
    #[arg(short, long, value_name = "TEXT")]
    input: Option<String>,

    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Force ANSI color output.
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long)]
    no_color: bool,

    /// Print a report of every turn (keystack, attempts, timing).
    #[arg(long)]
    trace: bool,

    /// Print script statistics and categories after loading.
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let color = if cli.color {
        true
    } else if cli.no_color {
        false
    } else {
        io::stdout().is_terminal()
    };

    let mut eliza = match Eliza::from_file(&cli.script) {
        Ok(eliza) => eliza,
        Err(err) => {
            eprintln!("error: {err}");
            return exit_code(&err);
        }
    };

    if cli.stats {
        debug_report::print_stats(&eliza, color);
    }

    let result = match cli.input.as_deref() {
        Some(input) => answer(&mut eliza, input, cli.trace, color),
        None => converse(&mut eliza, cli.trace, color),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Script(err)) => {
            eprintln!("error: {err}");
            exit_code(&err)
        }
        Err(CliError::Io(err)) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

enum CliError {
    Script(ScriptError),
    Io(io::Error),
}

impl From<ScriptError> for CliError {
    fn from(err: ScriptError) -> Self {
        CliError::Script(err)
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Io(err)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).compact().try_init();
}

fn exit_code(err: &ScriptError) -> ExitCode {
    if err.is_script_error() { ExitCode::from(2) } else { ExitCode::from(1) }
}

fn answer(eliza: &mut Eliza, input: &str, trace: bool, color: bool) -> Result<(), CliError> {
    let details = eliza.get_response_verbose(input)?;
    if trace {
        debug_report::print_turn(&details, color);
    }
    println!("{}", clean_response(&details.response));
    Ok(())
}

fn converse(eliza: &mut Eliza, trace: bool, color: bool) -> Result<(), CliError> {
    println!("{GREETING}");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            break;
        };
        if matches!(line.trim().to_lowercase().as_str(), "bye" | "quit" | "exit") {
            println!("ELIZA: {FAREWELL}");
            break;
        }

        let details = eliza.get_response_verbose(&line)?;
        if trace {
            debug_report::print_turn(&details, color);
        }
        println!("ELIZA: {}", clean_response(&details.response));
    }
    Ok(())
}

/// Scripts escape some punctuation with backslashes; drop them for display.
fn clean_response(response: &str) -> String {
    response.replace('\\', "")
}
