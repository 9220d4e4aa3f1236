// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug};

use annofix::app_config::{self, Config};
use annofix::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// annofix - annotation file integrity repair
///
/// Fixes duplicate annotation IDs and inconsistent category names in a
/// COCO-style annotations file.
#[derive(Parser, Debug)]
#[command(name = "annofix")]
#[command(version)]
#[command(about = "Fix duplicate annotation IDs and category name inconsistencies")]
#[command(long_about = "annofix repairs a COCO-style annotations file in one pass.

Annotations that reuse an ID already taken by an earlier annotation get a new
ID past the largest one in the file. Categories whose name is a known alias
(e.g. 'Food can') are renamed to the canonical spelling ('Food Can').

EXAMPLES:
    annofix                                        # Fix ./data/annotations.json in place
    annofix --input data/annotations.json --output fixed.json
    annofix --config annofix.json                  # Extra category aliases

CONFIGURATION:
    An optional JSON configuration file can set the default input path, the
    log level and additional category aliases.")]
struct CommandLineOptions {
    /// Input annotations file path [default: ./data/annotations.json]
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output file path (default: overwrite input file)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation, writes to stderr so stdout carries only the report
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through the max level below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    let input = cli
        .input
        .unwrap_or_else(|| controller.default_input().to_path_buf());
    debug!("Input: {:?}, output: {:?}", input, cli.output.as_ref().unwrap_or(&input));

    controller.run(&input, cli.output.as_deref())?;

    Ok(())
}
