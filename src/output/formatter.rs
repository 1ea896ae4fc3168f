//! Output formatters for operation results

use crate::api::types::Operation;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::views::{
    AnalysisEnvelope, CoverLetterEnvelope, MatchEnvelope, OptimizeEnvelope, SectionBody,
    SectionStyle, ANALYSIS_SECTIONS,
};
use crate::session::SessionState;
use colored::{Color, Colorize};
use serde_json::Value;

/// Trait for formatting a stored result document
pub trait OutputFormatter {
    fn format_result(&self, op: Operation, value: &Value) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and section headers
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for piping results into other tools
pub struct JsonFormatter {
    pretty: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    /// The backend indicator shown at session start and by `status`.
    pub fn format_status_line(&self, online: bool) -> String {
        if online {
            format!("{} Server Running", self.colorize("●", Color::Green))
        } else {
            format!("{} Server Offline", self.colorize("●", Color::Red))
        }
    }

    /// One line per field so the user can see what a restored session holds.
    pub fn format_session_overview(&self, state: &SessionState) -> String {
        let describe = |text: &str| {
            if text.trim().is_empty() {
                "(empty)".to_string()
            } else {
                format!("{} chars", text.chars().count())
            }
        };

        let mut output = String::new();
        output.push_str(&format!(
            "Job description: {}\n",
            describe(&state.job_description)
        ));
        output.push_str(&format!("Resume: {}\n", describe(&state.resume)));

        let stored = state.stored_views();
        if stored.is_empty() {
            output.push_str("Stored results: (none)\n");
        } else {
            let names: Vec<&str> = stored.iter().map(|op| op.command_name()).collect();
            output.push_str(&format!("Stored results: {}\n", names.join(", ")));
            output.push_str(&format!(
                "Active view: {}\n",
                state.active_view.command_name()
            ));
        }

        output
    }

    fn format_analysis(&self, analysis: &serde_json::Map<String, Value>) -> String {
        let mut output = String::new();

        for section in &ANALYSIS_SECTIONS {
            let Some(raw) = analysis.get(section.key) else {
                continue;
            };
            let body = SectionBody::from_value(raw);

            output.push_str(&self.format_header(section.heading, 2));
            match section.style {
                SectionStyle::Bulleted => {
                    for item in body.items() {
                        output.push_str(&format!("  • {}\n", item));
                    }
                }
                SectionStyle::Paragraph => {
                    output.push_str(&format!("{}\n", body.text()));
                }
                SectionStyle::Keywords => {
                    let badges: Vec<String> = body
                        .keywords()
                        .iter()
                        .map(|kw| self.colorize(&format!("[{}]", kw), Color::Cyan))
                        .collect();
                    output.push_str(&format!("{}\n", badges.join(" ")));
                }
            }
        }

        output
    }

    fn fallback_json(&self, value: &Value) -> Result<String> {
        let mut output = String::new();
        output.push_str(&format!(
            "{}\n",
            self.colorize("Unrecognized response shape; showing raw JSON.", Color::Yellow)
        ));
        output.push_str(&format!("{}\n", serde_json::to_string_pretty(value)?));
        Ok(output)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_result(&self, op: Operation, value: &Value) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header(op.title(), 1));

        match op {
            Operation::Analyze => match AnalysisEnvelope::from_value(value).analysis {
                Some(analysis) => output.push_str(&self.format_analysis(&analysis)),
                None => output.push_str(&self.fallback_json(value)?),
            },
            Operation::Match => {
                if MatchEnvelope::from_value(value).match_result.is_some() {
                    output.push_str(&format!("{}\n", serde_json::to_string_pretty(value)?));
                } else {
                    output.push_str(&self.fallback_json(value)?);
                }
            }
            Operation::Optimize => {
                if OptimizeEnvelope::from_value(value).suggestions.is_some() {
                    output.push_str(&format!("{}\n", serde_json::to_string_pretty(value)?));
                } else {
                    output.push_str(&self.fallback_json(value)?);
                }
            }
            Operation::CoverLetter => match CoverLetterEnvelope::from_value(value).cover_letter {
                Some(letter) => output.push_str(&format!("{}\n", letter)),
                None => output.push_str(&self.fallback_json(value)?),
            },
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_result(&self, _op: Operation, value: &Value) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

/// Picks the formatter for a configured output format.
pub fn formatter_for(format: OutputFormat, use_colors: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleFormatter::new(use_colors)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
