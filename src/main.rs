//! CLI entry point: interactive REPL, piped REPL, or batch file mode.

use clap::Parser;
use rlisp::error::Error;
use rlisp::eval::safe_eval;
use rlisp::tokenizer::{StreamTokenizer, StringTokenizer};
use rlisp::vm::Vm;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};

const HISTORY_FILE: &str = ".rlisp_history";

/// A small Scheme dialect interpreter
#[derive(Parser, Debug)]
#[command(name = "rlisp")]
#[command(version)]
#[command(about = "A small Scheme dialect interpreter")]
struct CliArgs {
    /// Script file to evaluate (omit to start the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Judge-style output: print () for nil results, classify errors
    /// as syntax/runtime/name, stop on syntax errors
    #[arg(long)]
    contest: bool,
}

fn main() {
    let args = CliArgs::parse();

    if let Some(path) = &args.script {
        run_file(path);
    } else if args.contest {
        run_contest_repl();
    } else if io::stdin().is_terminal() {
        run_interactive_repl();
    } else {
        run_stream_repl();
    }
}

fn report(error: &Error) {
    println!("{}: {}", error.kind_name(), error);
}

/// Batch evaluation of a file. Results are not echoed; errors are
/// reported (with a line number for lexer/reader errors) and the
/// process still exits 0, matching the REPL's recoverable-error model.
fn run_file(path: &Path) {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("Cannot read script file {}: {}", path.display(), error);
            std::process::exit(1);
        }
    };

    let mut vm = Vm::new(StreamTokenizer::new(BufReader::new(file)));
    match vm.eval_all() {
        Ok(_) => {}
        Err(error @ (Error::Tokenizer(_) | Error::Parser(_))) => {
            println!(
                "{} at line {}: {}",
                error.kind_name(),
                vm.current_line(),
                error
            );
        }
        Err(error) => report(&error),
    }
}

/// Verbose REPL over a piped standard input: results echo to stdout,
/// nil results print nothing, every error is reported and the loop
/// continues.
fn run_stream_repl() {
    let stdin = io::stdin();
    let mut vm = Vm::new(StreamTokenizer::new(stdin.lock()));

    loop {
        match vm.has_objects(true) {
            Ok(true) => {}
            Ok(false) => break,
            Err(error) => {
                report(&error);
                continue;
            }
        }
        match vm.eval_one() {
            Ok(value) if value.is_nil() => {}
            Ok(value) => println!("{}", value),
            Err(error) => report(&error),
        }
    }
}

/// Contest-judge REPL: nil results print as `()`, errors collapse to
/// three classes, and a syntax error ends the session.
fn run_contest_repl() {
    let stdin = io::stdin();
    let mut vm = Vm::new(StreamTokenizer::new(stdin.lock()));

    loop {
        match vm.has_objects(true) {
            Ok(true) => {}
            Ok(false) => break,
            Err(_) => {
                println!("syntax error");
                return;
            }
        }
        match vm.eval_one() {
            Ok(value) if value.is_nil() => println!("()"),
            Ok(value) => println!("{}", value),
            Err(error) if error.is_syntax() => {
                println!("syntax error");
                return;
            }
            Err(Error::Scope(_)) => println!("name error"),
            Err(_) => println!("runtime error"),
        }
    }
}

enum PendingOutcome {
    Complete,
    Incomplete,
}

/// An entry that stopped at end of input mid-form is not an error yet;
/// the REPL keeps reading continuation lines for it.
fn is_incomplete(error: &Error) -> bool {
    match error {
        Error::Parser(message) | Error::Tokenizer(message) => {
            message.starts_with("Unexpected end of input")
        }
        _ => false,
    }
}

/// Parses the whole pending entry first, then evaluates. Parsing up
/// front means a continuation line never re-runs the finished forms
/// before it.
fn run_pending(vm: &mut Vm<StringTokenizer>, source: &str) -> PendingOutcome {
    vm.feed(source);

    let mut objects = Vec::new();
    loop {
        match vm.has_objects(true) {
            Ok(true) => {}
            Ok(false) => break,
            Err(error) if is_incomplete(&error) => return PendingOutcome::Incomplete,
            Err(error) => {
                report(&error);
                return PendingOutcome::Complete;
            }
        }
        match vm.parse() {
            Ok(object) => objects.push(object),
            Err(error) if is_incomplete(&error) => return PendingOutcome::Incomplete,
            Err(error) => {
                report(&error);
                return PendingOutcome::Complete;
            }
        }
    }

    for object in &objects {
        match safe_eval(object, vm.global()) {
            Ok(value) if value.is_nil() => {}
            Ok(value) => println!("{}", value),
            Err(error) => report(&error),
        }
    }
    PendingOutcome::Complete
}

/// Line-edited REPL with history for a terminal session.
fn run_interactive_repl() {
    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(error) => {
            eprintln!("Failed to initialize REPL: {}", error);
            return;
        }
    };
    let _ = rl.load_history(HISTORY_FILE);

    let mut vm = Vm::default();
    let mut pending = String::new();

    loop {
        let prompt = if pending.is_empty() { "> " } else { "... " };
        match rl.readline(prompt) {
            Ok(line) => {
                pending.push_str(&line);
                pending.push('\n');
                if let PendingOutcome::Complete = run_pending(&mut vm, &pending) {
                    let _ = rl.add_history_entry(pending.trim());
                    pending.clear();
                }
            }
            Err(ReadlineError::Interrupted) => {
                pending.clear();
            }
            Err(ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("Error: {}", error);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
}
