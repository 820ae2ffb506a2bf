//! arsh CLI entry point.
//!
//! Usage:
//!   arsh                  # Interactive REPL
//!   arsh -c <expression>  # Evaluate and exit; exit status follows the
//!                         # (( )) truth convention (nonzero result = 0)

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use arsh_vars::Scope;

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None => {
            arsh_repl::run()?;
            Ok(ExitCode::SUCCESS)
        }

        Some("--help" | "-h") => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }

        Some("--version" | "-V") => {
            println!("arsh {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }

        Some("-c") => {
            let expr = args.get(2).context("-c requires an expression argument")?;
            eval_expression(expr)
        }

        Some(unknown) => {
            eprintln!("Unknown option: {unknown}");
            eprintln!("Run 'arsh --help' for usage.");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Evaluate one expression, print its value, and exit with the `(( ))`
/// truth status: 0 for a nonzero result, 1 for zero, 2 on error.
fn eval_expression(expr: &str) -> Result<ExitCode> {
    let mut scope = Scope::new();
    match arsh_arith::evaluate(expr, &mut scope) {
        Ok(value) => {
            println!("{value}");
            if value == "0" {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Err(err) => {
            eprintln!("arsh: {expr}: {err}");
            Ok(ExitCode::from(2))
        }
    }
}

fn print_help() {
    println!(
        r#"arsh v{} — shell arithmetic evaluator

Usage:
  arsh                  Interactive REPL
  arsh -c <expression>  Evaluate an expression and exit

Options:
  -c <expression>       Evaluate once; exit 0 if the result is nonzero,
                        1 if zero, 2 on error
  -h, --help            Show this help
  -V, --version         Show version

Examples:
  arsh -c '3 + 4 * 2'       # prints 11
  arsh -c '$((2**10))'      # prints 1024
  arsh -c '5 > 3' && echo t # truth convention drives the exit status
"#,
        env!("CARGO_PKG_VERSION")
    );
}
