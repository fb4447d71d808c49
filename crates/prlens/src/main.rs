mod api;
mod config;
mod stdio;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use prlens_git::RepositoryInspector;
use prlens_logging::{init_tracing, LogFormat, Logger, ToolEvent};
use prlens_tools::{tool_definitions, ToolError, ToolFacade, ToolResponse};

use config::{Overrides, ProjectConfig, Settings};

/// Default port for `prlens serve`
const DEFAULT_PORT: u16 = 3210;

#[derive(Parser, Debug)]
#[command(
    name = "prlens",
    about = "Change analysis and PR template tools for coding agents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository analyzed when a call does not pass repoPath (default: current directory)
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Directory of PR templates (default: ./templates)
    #[arg(long, global = true)]
    templates_dir: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormatChoice>,

    /// Log level or tracing filter directive
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Invoke one tool and print its response
    Call {
        /// Tool name, e.g. analyze_file_changes
        tool: String,

        /// Arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },
    /// Serve tool calls as JSON lines on stdin/stdout
    Stdio,
    /// Serve tool calls over HTTP
    Serve {
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Print the tool definitions
    Tools,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let project_config = ProjectConfig::load(&working_dir)?.unwrap_or_default();
    let settings = Settings::resolve(
        project_config,
        Overrides {
            repo_path: cli.repo.clone(),
            templates_dir: cli.templates_dir.clone(),
            log_format: cli.log_format.map(Into::into),
            log_level: cli.log_level.clone(),
        },
        &working_dir,
    );

    init_tracing(&settings.log_level, settings.log_format);

    if let Commands::Tools = cli.command {
        let json = serde_json::to_string_pretty(&tool_definitions())?;
        println!("{}", json);
        return Ok(());
    }

    let logger = Arc::new(build_logger(&settings)?);
    let facade = build_facade(&settings, logger.clone());

    match cli.command {
        Commands::Call { tool, args } => {
            let response = match parse_call_args(args.as_deref()) {
                Ok(arguments) => facade.invoke(&tool, &arguments),
                Err(err) => ToolResponse::failure(&err),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Stdio => {
            logger.log(&service_started("stdio", &settings));
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            stdio::run(&facade, stdin.lock(), stdout.lock())?;
        }
        Commands::Serve { port, host } => {
            logger.log(&service_started(&format!("http://{}:{}", host, port), &settings));
            let router = api::create_router(facade);
            api::serve(router, &host, port).await?;
        }
        Commands::Tools => {}
    }

    Ok(())
}

fn build_logger(settings: &Settings) -> Result<Logger> {
    match settings.log_file {
        Some(ref path) => Logger::with_file(settings.log_format, path)
            .with_context(|| format!("Failed to open log file {}", path.display())),
        None => Ok(Logger::new(settings.log_format)),
    }
}

fn build_facade(settings: &Settings, logger: Arc<Logger>) -> ToolFacade {
    let inspector = RepositoryInspector::new()
        .with_similarity_threshold(settings.similarity_threshold)
        .with_max_diff_bytes(settings.max_diff_bytes);

    ToolFacade::new(settings.repo_path.clone(), settings.templates_dir.clone())
        .with_inspector(inspector)
        .with_logger(logger)
}

fn parse_call_args(args: Option<&str>) -> Result<Value, ToolError> {
    match args {
        None => Ok(Value::Null),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| ToolError::invalid(format!("--args is not valid JSON: {}", e))),
    }
}

fn service_started(transport: &str, settings: &Settings) -> ToolEvent {
    ToolEvent::ServiceStarted {
        transport: transport.to_string(),
        repo_path: settings.repo_path.clone(),
        templates_dir: settings.templates_dir.clone(),
    }
}
