//! arsh REPL — interactive shell arithmetic.
//!
//! A line-at-a-time front end over the arithmetic engine:
//! - Meta-commands: `/help`, `/quit`, `/vars`, `/set`, `/unset`, `/reset`
//! - Everything else is evaluated as a `$(( ))` expression against one
//!   persistent scope, so assignments carry across lines
//! - Command history via rustyline

use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use arsh_arith::Evaluator;
use arsh_vars::{Scope, VarStore};

/// Result from meta-command handling.
#[derive(Debug)]
enum MetaResult {
    /// Continue with optional output
    Continue(Option<String>),
    /// Exit the REPL (caller should save history and exit)
    Exit,
}

/// REPL state: one scope and one evaluator for the whole session.
pub struct Repl {
    scope: Scope,
    evaluator: Evaluator,
}

impl Repl {
    pub fn new() -> Self {
        Self {
            scope: Scope::new(),
            evaluator: Evaluator::new(),
        }
    }

    /// Process a single line of input.
    ///
    /// Returns Ok(None) for empty input, Ok(Some(output)) for output to
    /// display, or Err to signal the REPL should exit.
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Ok(None);
        }

        if trimmed.starts_with('/') {
            return match self.handle_meta_command(trimmed) {
                MetaResult::Continue(output) => Ok(output),
                MetaResult::Exit => Err(anyhow::anyhow!("__REPL_EXIT__")),
            };
        }

        // Shell-style aliases without the slash
        if matches!(trimmed, "quit" | "exit" | "help") {
            return self.process_line(&format!("/{trimmed}"));
        }

        match self.evaluator.eval(trimmed, &mut self.scope) {
            Ok(value) => Ok(Some(value)),
            Err(err) => Ok(Some(format!("arsh: {err}"))),
        }
    }

    /// Handle a meta-command (starts with /).
    fn handle_meta_command(&mut self, cmd: &str) -> MetaResult {
        let parts: Vec<&str> = cmd.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");

        match command {
            "/quit" | "/q" | "/exit" => MetaResult::Exit,
            "/help" | "/h" | "/?" => MetaResult::Continue(Some(HELP_TEXT.to_string())),
            "/vars" | "/scope" => {
                let vars = self.scope.all();
                if vars.is_empty() {
                    MetaResult::Continue(Some("(no variables set)".to_string()))
                } else {
                    let mut output = String::from("Variables:\n");
                    for (name, value) in vars {
                        output.push_str(&format!("  {name} = {value}\n"));
                    }
                    MetaResult::Continue(Some(output.trim_end().to_string()))
                }
            }
            "/set" => match (parts.get(1), parts.get(2)) {
                (Some(name), Some(value)) => {
                    self.scope.set(name, value);
                    MetaResult::Continue(None)
                }
                _ => MetaResult::Continue(Some("usage: /set NAME VALUE".to_string())),
            },
            "/unset" => match parts.get(1) {
                Some(name) => {
                    self.scope.remove(name);
                    MetaResult::Continue(None)
                }
                None => MetaResult::Continue(Some("usage: /unset NAME".to_string())),
            },
            "/reset" => {
                self.scope.clear();
                self.evaluator.clear_error();
                MetaResult::Continue(Some("Session reset (variables cleared)".to_string()))
            }
            _ => MetaResult::Continue(Some(format!(
                "Unknown command: {command}\nType /help for available commands."
            ))),
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

const HELP_TEXT: &str = r#"arsh — shell arithmetic REPL

Meta Commands (use with or without /):
  help, /help, /?   Show this help
  quit, /quit, /q   Exit the REPL

Slash-only commands:
  /vars, /scope     Show all variables
  /set NAME VALUE   Store a raw (possibly non-numeric) variable
  /unset NAME       Remove a variable
  /reset            Clear all variables

Expressions:
  Anything else is evaluated as $(( )) arithmetic:
    2 + 3 * 4            Precedence-aware integer math
    x = 7                Assignment (persists across lines)
    x += 3, x++, --x     Compound assignment and increments
    0x1f, 017, 2#1010    Hex, octal, and base#digits literals
    5 > 3 && 2 < 1       Comparisons and logical operators (0/1)
"#;

/// Persist line history, creating its parent directory on first save.
fn save_history(rl: &mut Editor<(), DefaultHistory>, history_path: &Option<PathBuf>) {
    let Some(path) = history_path else { return };
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("could not create history directory: {e}");
        }
    }
    if let Err(e) = rl.save_history(path) {
        tracing::warn!("could not save history: {e}");
    }
}

/// Run the interactive REPL until quit or EOF.
pub fn run() -> Result<()> {
    println!("arsh v{}", env!("CARGO_PKG_VERSION"));
    println!("Type /help for commands, /quit to exit.");
    println!();

    let mut rl: Editor<(), DefaultHistory> =
        Editor::new().context("creating line editor")?;

    let history_path = directories::BaseDirs::new()
        .map(|b| b.data_dir().join("arsh").join("history.txt"));
    if let Some(ref path) = history_path {
        match rl.load_history(path) {
            Ok(()) => {}
            // No history yet on a fresh install
            Err(ReadlineError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("could not load history: {e}"),
        }
    }

    let mut repl = Repl::new();

    loop {
        match rl.readline("arsh> ") {
            Ok(line) => {
                if let Err(e) = rl.add_history_entry(line.as_str()) {
                    tracing::warn!("could not record history entry: {e}");
                }

                match repl.process_line(&line) {
                    Ok(Some(output)) => println!("{output}"),
                    Ok(None) => {}
                    Err(e) if e.to_string() == "__REPL_EXIT__" => {
                        save_history(&mut rl, &history_path);
                        return Ok(());
                    }
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    save_history(&mut rl, &history_path);

    Ok(())
}
