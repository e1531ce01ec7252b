// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use log::{error, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};

use doctrans::app_config::{self, Config, DEFAULT_CONFIG_PATH};
use doctrans::app_controller::Controller;
use doctrans::report::{DEFAULT_PROCESSING_REPORT, DEFAULT_VALIDATION_REPORT};

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

/// Options shared by every command that reads the configuration
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Root of the per-language content tree
    #[arg(long)]
    content_root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate every article of a task manifest into its target languages
    Translate {
        /// Task manifest (JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Where to write the processing report
        #[arg(short, long, default_value = DEFAULT_PROCESSING_REPORT)]
        report: PathBuf,

        /// Model name to use for translation
        #[arg(short = 'M', long)]
        model: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Validate the translated outputs of a task manifest against their sources
    Validate {
        /// Task manifest (JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Where to write the validation report
        #[arg(short, long, default_value = DEFAULT_VALIDATION_REPORT)]
        report: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Validate one translated file (or a mirrored directory) against its source
    ValidatePair {
        /// Source article or directory
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Translated article or directory
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Where to write the validation report
        #[arg(short, long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate shell completions for doctrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// doctrans - documentation article translation with AI
///
/// Translates markdown articles listed in a task manifest into many languages
/// and validates that the translations keep the structure of their source.
#[derive(Parser, Debug)]
#[command(name = "doctrans")]
#[command(version)]
#[command(about = "AI-powered documentation translation tool")]
#[command(long_about = "doctrans translates markdown documentation articles with an OpenAI-compatible API and checks the results.

EXAMPLES:
    doctrans translate -m tasks.json                   # Translate a manifest
    doctrans translate -m tasks.json -M gpt-4o         # Use a specific model
    doctrans validate -m tasks.json                    # Validate the outputs of a manifest
    doctrans validate-pair src.md content/fr/src.md    # Validate one pair of files
    doctrans completions bash > doctrans.bash          # Generate bash completions

CONFIGURATION:
    Configuration is stored in doctrans.json by default. If the file doesn't
    exist, a default one is created. TRANSLATION_API_KEY, TRANSLATION_API_ENDPOINT,
    TRANSLATION_MODEL and DEBUG override the file.

EXIT CODES:
    0 - success
    1 - critical errors (translate) or failed validation (validate)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
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
        // The logger accepts everything; log::max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Color code for log level
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    let passed = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "doctrans", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Translate { manifest, report, model, common } => {
            let mut config = load_config(&common)?;
            if let Some(model) = model {
                config.translation.model = model;
            }
            let controller = Controller::with_config(config)?;
            let report = controller.run_translation(&manifest, &report).await?;
            !report.has_critical_errors()
        }
        Commands::Validate { manifest, report, common } => {
            let controller = Controller::with_config(load_config(&common)?)?;
            controller.run_validation(&manifest, &report)?.passed()
        }
        Commands::ValidatePair { source, target, report, common } => {
            let controller = Controller::with_config(load_config(&common)?)?;
            controller.validate_pair(&source, &target, report.as_deref())?.passed()
        }
    };

    if !passed {
        error!("Run finished with errors");
        log::logger().flush();
        std::process::exit(1);
    }

    info!("Done");
    Ok(())
}

/// Load the config file, then apply the environment and CLI overrides
fn load_config(common: &CommonArgs) -> Result<Config> {
    // A CLI log level applies before the config is even read
    if let Some(level) = &common.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(Path::new(&common.config_path))
        .with_context(|| format!("Failed to load configuration from {:?}", common.config_path))?;
    config.apply_process_env();

    if let Some(content_root) = &common.content_root {
        config.pipeline.content_root = content_root.clone();
    }
    if let Some(level) = &common.log_level {
        config.log_level = level.clone().into();
    }

    log::set_max_level(config.effective_log_level().to_level_filter());
    Ok(config)
}
