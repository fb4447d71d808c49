use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Structured log events for tool invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ToolEvent {
    ServiceStarted {
        transport: String,
        repo_path: PathBuf,
        templates_dir: PathBuf,
    },
    ToolInvoked {
        invocation_id: String,
        tool: String,
    },
    ToolSucceeded {
        invocation_id: String,
        tool: String,
        duration_ms: u64,
    },
    ToolFailed {
        invocation_id: String,
        tool: String,
        error_kind: String,
        message: String,
        duration_ms: u64,
    },
}

impl ToolEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for prlens tool events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &ToolEvent) {
        // File output is always JSON
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &ToolEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{}", json);
        }
    }

    fn log_pretty(&self, event: &ToolEvent) {
        let mut stderr = std::io::stderr();
        match event {
            ToolEvent::ServiceStarted {
                transport,
                repo_path,
                templates_dir,
            } => {
                let _ = writeln!(
                    stderr,
                    "{} {} {}",
                    "prlens".bold().bright_white(),
                    "serving over".dimmed(),
                    transport.bright_blue()
                );
                let _ = writeln!(
                    stderr,
                    "  {} {}",
                    "Repo:".dimmed(),
                    repo_path.display().to_string().dimmed()
                );
                let _ = writeln!(
                    stderr,
                    "  {} {}",
                    "Templates:".dimmed(),
                    templates_dir.display().to_string().dimmed()
                );
            }
            ToolEvent::ToolInvoked { tool, .. } => {
                let _ = writeln!(stderr, "{} {}", "▶".bright_cyan(), tool.bright_cyan().bold());
            }
            ToolEvent::ToolSucceeded {
                tool, duration_ms, ..
            } => {
                let _ = writeln!(
                    stderr,
                    "  {} {} ({}ms)",
                    "✓".bright_green(),
                    tool,
                    duration_ms
                );
            }
            ToolEvent::ToolFailed {
                tool,
                error_kind,
                message,
                duration_ms,
                ..
            } => {
                let _ = writeln!(
                    stderr,
                    "  {} {} {}: {} ({}ms)",
                    "✗".bright_red(),
                    tool,
                    error_kind.bright_red(),
                    message,
                    duration_ms
                );
            }
        }
    }

    fn log_compact(&self, event: &ToolEvent) {
        let mut stderr = std::io::stderr();
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let msg = match event {
            ToolEvent::ServiceStarted { transport, .. } => {
                format!("[{}] service:start:{}", timestamp, transport)
            }
            ToolEvent::ToolInvoked {
                invocation_id,
                tool,
            } => format!("[{}] tool:start:{} {}", timestamp, tool, short_id(invocation_id)),
            ToolEvent::ToolSucceeded {
                invocation_id,
                tool,
                duration_ms,
            } => format!(
                "[{}] tool:ok:{} {} {}ms",
                timestamp,
                tool,
                short_id(invocation_id),
                duration_ms
            ),
            ToolEvent::ToolFailed {
                invocation_id,
                tool,
                error_kind,
                duration_ms,
                ..
            } => format!(
                "[{}] tool:fail:{} {} {} {}ms",
                timestamp,
                tool,
                short_id(invocation_id),
                error_kind,
                duration_ms
            ),
        };
        let _ = writeln!(stderr, "{}", msg);
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
