//! CLI interface for the job application optimizer

use crate::api::types::Operation;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "job-optimizer")]
#[command(about = "Job application optimizer backed by a local analysis server")]
#[command(long_about = "Analyze job descriptions, match and optimize resumes, and generate cover letters through a locally running analysis backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session
    Session,

    /// Analyze a job description
    Analyze {
        /// Path to a job description file
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Job description text given inline (takes precedence over --job)
        #[arg(long)]
        job_text: Option<String>,

        /// Output format: console, json (defaults to the configured format)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Match a resume against a job description
    Match {
        /// Path to a resume file (.txt, .doc, .docx, .pdf); omit to reuse
        /// the resume already in the session
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Path to a job description file
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Job description text given inline (takes precedence over --job)
        #[arg(long)]
        job_text: Option<String>,

        /// Output format: console, json (defaults to the configured format)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Get resume optimization suggestions
    Optimize {
        /// Path to a resume file (.txt, .doc, .docx, .pdf); omit to reuse
        /// the resume already in the session
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Path to a job description file
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Job description text given inline (takes precedence over --job)
        #[arg(long)]
        job_text: Option<String>,

        /// Output format: console, json (defaults to the configured format)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate a cover letter
    CoverLetter {
        /// Path to a resume file (.txt, .doc, .docx, .pdf); omit to reuse
        /// the resume already in the session
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Path to a job description file
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Job description text given inline (takes precedence over --job)
        #[arg(long)]
        job_text: Option<String>,

        /// Output format: console, json (defaults to the configured format)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print a result stored in the saved session
    Show {
        /// Which result to print (defaults to the active view)
        #[arg(value_enum)]
        view: Option<Operation>,

        /// Output format: console, json (defaults to the configured format)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check whether the backend is reachable
    Status,

    /// Clear the saved session
    Clear,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json",
            format
        )),
    }
}
