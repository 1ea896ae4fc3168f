//! Interactive session
//!
//! A rustyline REPL over the same session manager the one-shot commands use.
//! Operation triggers run on background tasks and report through an mpsc
//! channel; a single applier task owns the manager while the prompt stays
//! responsive, so several operations can be in flight at once.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};

use crate::api::{ApiClient, Operation};
use crate::config::Config;
use crate::error::{JobOptimizerError, Result};
use crate::input::InputManager;
use crate::output::{ConsoleFormatter, OutputFormatter};
use crate::session::{ReconcileOutcome, SessionManager, SessionStore};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        let commands = [
            "job", "resume", "analyze", "match", "optimize", "letter", "show", "status", "clear",
            "help", "quit",
        ];
        Self {
            commands: commands.iter().map(|cmd| cmd.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let head = line.split_whitespace().next().unwrap_or("");
        if !head.is_empty() && self.commands.iter().any(|cmd| cmd == head) {
            Owned(line.replacen(head, &head.bright_cyan().to_string(), 1))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.is_empty() || line.contains(' ') {
            return None;
        }

        self.commands
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq)]
enum ReplCommand {
    /// Set the job description from a file, or paste mode when `None`.
    Job(Option<PathBuf>),
    Resume(PathBuf),
    Run(Operation),
    Show(Option<Operation>),
    Status,
    Clear,
    Help,
    Quit,
}

/// Outcome of one background operation, applied by the applier task.
struct OperationEvent {
    operation: Operation,
    outcome: Result<Value>,
}

fn parse_command(line: &str) -> std::result::Result<Option<ReplCommand>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // The first token picks the command; the untouched remainder keeps
    // spaces so file paths survive.
    let head = trimmed.split_whitespace().next().unwrap_or_default();
    let rest = trimmed[head.len()..].trim();

    let command = match head.to_lowercase().as_str() {
        "job" | "jd" => {
            if rest.is_empty() {
                ReplCommand::Job(None)
            } else {
                ReplCommand::Job(Some(PathBuf::from(rest)))
            }
        }
        "resume" | "cv" => {
            if rest.is_empty() {
                return Err("Usage: resume <FILE>".to_string());
            }
            ReplCommand::Resume(PathBuf::from(rest))
        }
        "show" => {
            if rest.is_empty() {
                ReplCommand::Show(None)
            } else {
                ReplCommand::Show(Some(rest.parse::<Operation>()?))
            }
        }
        "status" => ReplCommand::Status,
        "clear" => ReplCommand::Clear,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => match other.parse::<Operation>() {
            Ok(op) => ReplCommand::Run(op),
            Err(_) => {
                return Err(format!(
                    "Unknown command: {}. Type 'help' for commands.",
                    other
                ))
            }
        },
    };

    Ok(Some(command))
}

/// Paste mode for the job description: collect lines until a lone `.`.
fn read_multiline(rl: &mut Editor<CliHelper, FileHistory>) -> rustyline::Result<String> {
    let mut lines: Vec<String> = Vec::new();
    loop {
        match rl.readline("| ") {
            Ok(line) => {
                if line.trim() == "." {
                    break;
                }
                lines.push(line);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }
    Ok(lines.join("\n"))
}

fn print_help() {
    println!("Commands:");
    println!("  job [FILE]      Set the job description (no file: paste, finish with a lone '.')");
    println!("  resume <FILE>   Load a resume (.txt, .doc, .docx, .pdf)");
    println!("  analyze         Analyze the job description");
    println!("  match           Match the resume against the job description");
    println!("  optimize        Get resume optimization suggestions");
    println!("  letter          Generate a cover letter");
    println!("  show [VIEW]     Print a stored result (analyze, match, optimize, cover-letter)");
    println!("  status          Backend status and session overview");
    println!("  clear           Clear the whole session");
    println!("  help            Show this help");
    println!("  quit            Exit");
}

/// Runs the interactive session until the user quits.
pub async fn run(config: Config) -> Result<()> {
    let use_colors = config.use_colors();
    let formatter = ConsoleFormatter::new(use_colors);
    let client = Arc::new(ApiClient::new(&config.backend.base_url)?);
    let input = InputManager::new();

    let store = SessionStore::new(config.session_path());
    let mut manager = SessionManager::open(store);
    let outcome = manager.reconcile(&client).await?;

    println!("{}", "💼 Job Application Optimizer".bold());
    println!("{}", formatter.format_status_line(outcome.is_online()));
    match outcome {
        ReconcileOutcome::OnlineCleared => {
            println!("Backend is up again; previous session cleared.");
        }
        ReconcileOutcome::Offline if !manager.state().is_empty() => {
            println!("Restored session:");
            print!("{}", formatter.format_session_overview(manager.state()));
        }
        _ => {}
    }
    println!("{}", "Type 'help' for commands, 'quit' to exit.".bright_black());
    println!();

    let manager = Arc::new(Mutex::new(manager));

    // Applier task: the only writer once operations start arriving.
    let (event_tx, mut event_rx) = mpsc::channel::<OperationEvent>(32);
    let applier_manager = Arc::clone(&manager);
    let applier = tokio::spawn(async move {
        let formatter = ConsoleFormatter::new(use_colors);
        while let Some(event) = event_rx.recv().await {
            let mut mgr = applier_manager.lock().await;
            match event.outcome {
                Ok(value) => {
                    if let Err(e) = mgr.complete_operation(event.operation, value.clone()) {
                        eprintln!("{}", format!("Failed to save session: {}", e).red());
                    }
                    match formatter.format_result(event.operation, &value) {
                        Ok(rendered) => println!("{}", rendered),
                        Err(e) => eprintln!("{}", format!("Failed to render result: {}", e).red()),
                    }
                }
                Err(e) => {
                    mgr.abort_operation(event.operation);
                    println!("{}", format!("⚠️  {}", e).red());
                }
            }
        }
    });

    let mut rl: Editor<CliHelper, FileHistory> = Editor::new().map_err(|e| {
        JobOptimizerError::OperationFailed(format!("Failed to initialize the prompt: {}", e))
    })?;
    rl.set_helper(Some(CliHelper::new()));

    loop {
        let readline = rl.readline("> ");

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);

                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(message) => {
                        println!("{}", message.yellow());
                        continue;
                    }
                };

                match command {
                    ReplCommand::Job(source) => {
                        let text = match source {
                            Some(path) => match input.load_job_text(&path).await {
                                Ok(text) => Some(text),
                                Err(e) => {
                                    println!("{}", e.to_string().red());
                                    None
                                }
                            },
                            None => {
                                println!(
                                    "{}",
                                    "Paste the job description, finish with a lone '.' line."
                                        .bright_black()
                                );
                                match read_multiline(&mut rl) {
                                    Ok(text) if !text.trim().is_empty() => Some(text),
                                    Ok(_) => {
                                        println!(
                                            "{}",
                                            "Nothing captured; job description unchanged."
                                                .yellow()
                                        );
                                        None
                                    }
                                    Err(err) => {
                                        eprintln!(
                                            "{}",
                                            format!("Input error: {:?}", err).red()
                                        );
                                        None
                                    }
                                }
                            }
                        };

                        if let Some(text) = text {
                            let chars = text.chars().count();
                            let mut mgr = manager.lock().await;
                            match mgr.set_job_description(text) {
                                Ok(()) => println!(
                                    "{}",
                                    format!("✅ Job description set ({} chars)", chars).green()
                                ),
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        }
                    }
                    ReplCommand::Resume(path) => match input.load_resume(&path).await {
                        Ok(text) => {
                            let chars = text.chars().count();
                            let mut mgr = manager.lock().await;
                            match mgr.set_resume(text) {
                                Ok(()) => println!(
                                    "{}",
                                    format!("✅ Resume loaded ({} chars)", chars).green()
                                ),
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        }
                        Err(e) => println!("{}", e.to_string().red()),
                    },
                    ReplCommand::Run(op) => {
                        let begun = {
                            let mut mgr = manager.lock().await;
                            mgr.begin_operation(op)
                        };
                        match begun {
                            Ok(inputs) => {
                                println!("{}", format!("{}...", op.loading_label()).cyan());
                                let client = Arc::clone(&client);
                                let tx = event_tx.clone();
                                tokio::spawn(async move {
                                    let outcome = client.invoke(op, &inputs).await;
                                    let _ = tx
                                        .send(OperationEvent {
                                            operation: op,
                                            outcome,
                                        })
                                        .await;
                                });
                            }
                            Err(e) => println!("{}", e.to_string().red()),
                        }
                    }
                    ReplCommand::Show(view) => {
                        let mgr = manager.lock().await;
                        let op = view.unwrap_or(mgr.state().active_view);
                        match mgr.state().result_for(op) {
                            Some(value) => match formatter.format_result(op, value) {
                                Ok(rendered) => println!("{}", rendered),
                                Err(e) => eprintln!(
                                    "{}",
                                    format!("Failed to render result: {}", e).red()
                                ),
                            },
                            None => println!(
                                "{}",
                                format!(
                                    "No stored {} result. Run '{}' first.",
                                    op.title(),
                                    op.command_name()
                                )
                                .yellow()
                            ),
                        }
                    }
                    ReplCommand::Status => {
                        let mgr = manager.lock().await;
                        if let Some(online) = mgr.online() {
                            println!("{}", formatter.format_status_line(online));
                        }
                        print!("{}", formatter.format_session_overview(mgr.state()));
                        let in_flight: Vec<&str> = Operation::ALL
                            .iter()
                            .filter(|op| mgr.is_loading(**op))
                            .map(|op| op.command_name())
                            .collect();
                        if !in_flight.is_empty() {
                            println!("In flight: {}", in_flight.join(", "));
                        }
                    }
                    ReplCommand::Clear => {
                        let mut mgr = manager.lock().await;
                        match mgr.clear_all() {
                            Ok(()) => println!("{}", "Session cleared.".green()),
                            Err(e) => println!("{}", e.to_string().red()),
                        }
                    }
                    ReplCommand::Help => print_help(),
                    ReplCommand::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "Interrupted. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Input error: {:?}", err).red());
                break;
            }
        }
    }

    // In-flight requests are abandoned on exit, matching the no-cancellation
    // model: nothing waits on them and nothing is written after this point.
    drop(event_tx);
    applier.abort();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line_parses_to_nothing() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_operation_commands() {
        assert_eq!(
            parse_command("analyze").unwrap(),
            Some(ReplCommand::Run(Operation::Analyze))
        );
        assert_eq!(
            parse_command("match").unwrap(),
            Some(ReplCommand::Run(Operation::Match))
        );
        assert_eq!(
            parse_command("letter").unwrap(),
            Some(ReplCommand::Run(Operation::CoverLetter))
        );
    }

    #[test]
    fn test_paths_keep_their_spaces() {
        assert_eq!(
            parse_command("resume /tmp/my resume.txt").unwrap(),
            Some(ReplCommand::Resume(PathBuf::from("/tmp/my resume.txt")))
        );
        assert_eq!(
            parse_command("job notes/senior role.txt").unwrap(),
            Some(ReplCommand::Job(Some(PathBuf::from(
                "notes/senior role.txt"
            ))))
        );
    }

    #[test]
    fn test_job_without_file_enters_paste_mode() {
        assert_eq!(parse_command("job").unwrap(), Some(ReplCommand::Job(None)));
        assert_eq!(parse_command("jd").unwrap(), Some(ReplCommand::Job(None)));
    }

    #[test]
    fn test_resume_requires_a_file() {
        assert!(parse_command("resume").is_err());
        assert!(parse_command("cv").is_err());
    }

    #[test]
    fn test_show_accepts_an_optional_view() {
        assert_eq!(
            parse_command("show").unwrap(),
            Some(ReplCommand::Show(None))
        );
        assert_eq!(
            parse_command("show match").unwrap(),
            Some(ReplCommand::Show(Some(Operation::Match)))
        );
        assert!(parse_command("show bogus").is_err());
    }

    #[test]
    fn test_quit_aliases() {
        assert_eq!(parse_command("quit").unwrap(), Some(ReplCommand::Quit));
        assert_eq!(parse_command("QUIT").unwrap(), Some(ReplCommand::Quit));
        assert_eq!(parse_command("q").unwrap(), Some(ReplCommand::Quit));
        assert_eq!(parse_command("exit").unwrap(), Some(ReplCommand::Quit));
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let err = parse_command("frobnicate").unwrap_err();
        assert!(err.contains("Unknown command"));
    }
}
