//! Logging System
//!
//! Structured logging using the `tracing` crate with configurable level,
//! format and destination. The library only emits events; binaries call
//! [`init_logging`] once at startup.

use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (if output is "file")
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Enable colored output (text format only, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,

    /// Set by the binary when command output on stdout is machine-readable;
    /// stdout logging then falls back to stderr.
    #[serde(skip)]
    pub stdout_reserved: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

// Query results go to stdout.
fn default_output() -> String {
    "stderr".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from(".stackstate/stackstate.log")
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: default_log_file(),
            color: default_true(),
            modules: HashMap::new(),
            stdout_reserved: false,
        }
    }
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputDestination {
    Stdout,
    Stderr,
    File,
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (STACKSTATE_LOG, STACKSTATE_LOG_FORMAT, STACKSTATE_LOG_OUTPUT)
/// 2. The supplied configuration
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), QueryError> {
    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let base_subscriber = Registry::default().with(filter);

    let open_log_file = || -> Result<std::fs::File, QueryError> {
        let log_file = config
            .map(|c| c.file.clone())
            .unwrap_or_else(default_log_file);

        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                QueryError::Config(format!("Failed to create log directory: {}", e))
            })?;
        }
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .map_err(|e| {
                QueryError::Config(format!("Failed to open log file {:?}: {}", log_file, e))
            })
    };

    let json = format == "json";
    let installed = match output {
        OutputDestination::File => {
            let file_writer = open_log_file()?;
            if json {
                base_subscriber
                    .with(
                        fmt::layer()
                            .json()
                            .with_target(true)
                            .with_timer(ChronoUtc::rfc_3339())
                            .with_writer(Mutex::new(file_writer)),
                    )
                    .try_init()
            } else {
                base_subscriber
                    .with(
                        fmt::layer()
                            .with_target(true)
                            .with_timer(ChronoUtc::rfc_3339())
                            .with_ansi(false)
                            .with_writer(Mutex::new(file_writer)),
                    )
                    .try_init()
            }
        }
        OutputDestination::Stdout => {
            if json {
                base_subscriber
                    .with(
                        fmt::layer()
                            .json()
                            .with_target(true)
                            .with_timer(ChronoUtc::rfc_3339())
                            .with_writer(std::io::stdout),
                    )
                    .try_init()
            } else {
                base_subscriber
                    .with(
                        fmt::layer()
                            .with_target(true)
                            .with_timer(ChronoUtc::rfc_3339())
                            .with_ansi(use_color)
                            .with_writer(std::io::stdout),
                    )
                    .try_init()
            }
        }
        OutputDestination::Stderr => {
            if json {
                base_subscriber
                    .with(
                        fmt::layer()
                            .json()
                            .with_target(true)
                            .with_timer(ChronoUtc::rfc_3339())
                            .with_writer(std::io::stderr),
                    )
                    .try_init()
            } else {
                base_subscriber
                    .with(
                        fmt::layer()
                            .with_target(true)
                            .with_timer(ChronoUtc::rfc_3339())
                            .with_ansi(use_color)
                            .with_writer(std::io::stderr),
                    )
                    .try_init()
            }
        }
    };
    installed.map_err(|e| QueryError::Config(format!("Failed to install log subscriber: {}", e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, QueryError> {
    if let Ok(filter) = EnvFilter::try_from_env("STACKSTATE_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);
    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            let directive = format!("{}={}", module, module_level);
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e| QueryError::Config(format!("Invalid log directive: {}", e)))?,
            );
        }
    }

    Ok(filter)
}

/// Determine output format from config or environment
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, QueryError> {
    if let Ok(format) = std::env::var("STACKSTATE_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    if format != "json" && format != "text" {
        return Err(QueryError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format.to_string())
}

/// Determine output destination from config or environment
fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestination, QueryError> {
    let destination = match std::env::var("STACKSTATE_LOG_OUTPUT") {
        Ok(output) => parse_output_destination(&output)?,
        Err(_) => parse_output_destination(config.map(|c| c.output.as_str()).unwrap_or("stderr"))?,
    };

    let reserved = config.map(|c| c.stdout_reserved).unwrap_or(false);
    if reserved && destination == OutputDestination::Stdout {
        return Ok(OutputDestination::Stderr);
    }
    Ok(destination)
}

fn parse_output_destination(output: &str) -> Result<OutputDestination, QueryError> {
    match output {
        "stdout" => Ok(OutputDestination::Stdout),
        "stderr" => Ok(OutputDestination::Stderr),
        "file" => Ok(OutputDestination::File),
        _ => Err(QueryError::Config(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr' or 'file')",
            output
        ))),
    }
}
