//! Job application optimizer: analyze postings, tune your resume, and draft
//! cover letters against a locally running analysis backend

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use job_optimizer::api::{ApiClient, Operation};
use job_optimizer::cli::{self, Cli, Commands, ConfigAction};
use job_optimizer::config::{Config, OutputFormat};
use job_optimizer::error::{JobOptimizerError, Result};
use job_optimizer::input::InputManager;
use job_optimizer::output::{formatter_for, ConsoleFormatter};
use job_optimizer::repl;
use job_optimizer::session::{ReconcileOutcome, SessionManager, SessionStore};
use log::error;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Session => repl::run(config).await,

        Commands::Analyze {
            job,
            job_text,
            output,
        } => {
            run_operation(
                config,
                Operation::Analyze,
                None,
                job,
                job_text,
                output.as_deref(),
            )
            .await
        }

        Commands::Match {
            resume,
            job,
            job_text,
            output,
        } => {
            run_operation(
                config,
                Operation::Match,
                resume,
                job,
                job_text,
                output.as_deref(),
            )
            .await
        }

        Commands::Optimize {
            resume,
            job,
            job_text,
            output,
        } => {
            run_operation(
                config,
                Operation::Optimize,
                resume,
                job,
                job_text,
                output.as_deref(),
            )
            .await
        }

        Commands::CoverLetter {
            resume,
            job,
            job_text,
            output,
        } => {
            run_operation(
                config,
                Operation::CoverLetter,
                resume,
                job,
                job_text,
                output.as_deref(),
            )
            .await
        }

        Commands::Show { view, output } => show_stored_result(config, view, output.as_deref()),

        Commands::Status => show_status(config).await,

        Commands::Clear => clear_session(config),

        Commands::Config { action } => run_config_command(config, action),
    }
}

/// `--output` wins over the configured format when given.
fn resolve_output_format(config: &Config, output: Option<&str>) -> Result<OutputFormat> {
    match output {
        Some(value) => cli::parse_output_format(value).map_err(JobOptimizerError::InvalidInput),
        None => Ok(config.output.format),
    }
}

/// One-shot path for the four backend operations: probe, load inputs,
/// validate, invoke with a spinner, render.
async fn run_operation(
    config: Config,
    op: Operation,
    resume: Option<PathBuf>,
    job: Option<PathBuf>,
    job_text: Option<String>,
    output: Option<&str>,
) -> Result<()> {
    let format = resolve_output_format(&config, output)?;
    let console = format == OutputFormat::Console;

    let client = ApiClient::new(&config.backend.base_url)?;
    let store = SessionStore::new(config.session_path());
    let mut manager = SessionManager::open(store);

    let outcome = manager.reconcile(&client).await?;
    if console {
        let formatter = ConsoleFormatter::new(config.use_colors());
        println!("{}", formatter.format_status_line(outcome.is_online()));
        if outcome == ReconcileOutcome::OnlineCleared {
            println!("Backend is up again; previous session cleared.");
        }
    }

    let input = InputManager::new();
    if let Some(path) = resume {
        if console {
            println!("📄 Loading resume: {}", path.display());
        }
        let text = input.load_resume(&path).await?;
        manager.set_resume(text)?;
    }
    if let Some(text) = job_text {
        manager.set_job_description(text)?;
    } else if let Some(path) = job {
        if console {
            println!("💼 Loading job description: {}", path.display());
        }
        let text = input.load_job_text(&path).await?;
        manager.set_job_description(text)?;
    }

    let inputs = manager.begin_operation(op)?;

    let spinner = if console { Some(make_spinner(op)?) } else { None };
    let result = client.invoke(op, &inputs).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(value) => {
            manager.complete_operation(op, value.clone())?;
            let formatter = formatter_for(format, config.use_colors());
            println!("{}", formatter.format_result(op, &value)?);
            Ok(())
        }
        Err(e) => {
            manager.abort_operation(op);
            Err(e)
        }
    }
}

fn make_spinner(op: Operation) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .map_err(|e| JobOptimizerError::OperationFailed(format!("Spinner template: {}", e)))?;
    spinner.set_style(style);
    spinner.set_message(format!("{}...", op.loading_label()));
    spinner.enable_steady_tick(Duration::from_millis(120));
    Ok(spinner)
}

/// Prints a stored result without touching the backend.
fn show_stored_result(config: Config, view: Option<Operation>, output: Option<&str>) -> Result<()> {
    let format = resolve_output_format(&config, output)?;
    let store = SessionStore::new(config.session_path());
    let manager = SessionManager::open(store);

    let op = view.unwrap_or(manager.state().active_view);
    match manager.state().result_for(op) {
        Some(value) => {
            let formatter = formatter_for(format, config.use_colors());
            println!("{}", formatter.format_result(op, value)?);
        }
        None => {
            println!(
                "No stored {} result. Run 'job-optimizer {}' first.",
                op.title(),
                op.command_name()
            );
        }
    }
    Ok(())
}

async fn show_status(config: Config) -> Result<()> {
    let client = ApiClient::new(&config.backend.base_url)?;
    let store = SessionStore::new(config.session_path());
    let mut manager = SessionManager::open(store);

    let outcome = manager.reconcile(&client).await?;
    let formatter = ConsoleFormatter::new(config.use_colors());
    println!("{}", formatter.format_status_line(outcome.is_online()));
    println!("Backend: {}", client.base_url());
    if outcome == ReconcileOutcome::OnlineCleared {
        println!("Backend is up again; previous session cleared.");
    }
    print!("{}", formatter.format_session_overview(manager.state()));
    Ok(())
}

fn clear_session(config: Config) -> Result<()> {
    let store = SessionStore::new(config.session_path());
    let mut manager = SessionManager::open(store);
    manager.clear_all()?;
    println!("🗑️  Session cleared.");
    Ok(())
}

fn run_config_command(config: Config, action: Option<ConfigAction>) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            println!("⚙️  Current Configuration\n");
            println!("Backend URL: {}", config.backend.base_url);
            println!("Session file: {}", config.session_path().display());
            println!("Output format: {:?}", config.output.format);
            println!("Color output: {}", config.output.color_output);
        }

        Some(ConfigAction::Path) => {
            println!("{}", config.source_path().display());
        }

        Some(ConfigAction::Reset) => {
            println!("🔄 Resetting configuration to defaults...");
            Config::default().save_to(&config.source_path())?;
            println!("✅ Configuration reset successfully!");
        }
    }
    Ok(())
}
