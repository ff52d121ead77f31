//! Command-line argument parsing for the highlighter
//!
//! Supports:
//! - Highlighting one file with built-in, user or explicit rule files
//! - Overriding the batch size and time budget from config
//! - Summary or JSON span output

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::HighlightConfig;
use crate::scheduler::SchedulerSettings;
use crate::syntax::LanguageId;

/// Incremental syntax highlighter
#[derive(Parser, Debug)]
#[command(
    name = "rebel-highlight",
    version,
    about = "Highlight a file in time-boxed batches"
)]
pub struct CliArgs {
    /// File to highlight
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Language to highlight as (default: detected from the extension)
    #[arg(short, long, value_name = "NAME")]
    pub language: Option<String>,

    /// Max blocks per batch
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Max milliseconds per batch
    #[arg(long, value_name = "MS")]
    pub budget_ms: Option<u64>,

    /// YAML rule file to use instead of the configured rules
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Print spans per line as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Log batch activity to stderr (RUST_LOG still takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    /// Store the effective batch size and budget in the config file
    #[arg(long)]
    pub save_config: bool,
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// Run configuration derived from CLI arguments and the config file
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub path: PathBuf,
    pub language: LanguageId,
    pub rules_file: Option<PathBuf>,
    pub settings: SchedulerSettings,
    pub output: OutputFormat,
    pub save_config: bool,
}

impl CliArgs {
    /// Merge CLI arguments over the loaded config
    pub fn into_config(self, config: &HighlightConfig) -> Result<RunConfig, String> {
        let language = match &self.language {
            Some(name) => {
                LanguageId::from_name(name).ok_or_else(|| format!("Unknown language: {name}"))?
            }
            None => match LanguageId::from_path(&self.path) {
                LanguageId::PlainText => config.default_language,
                detected => detected,
            },
        };

        let batch_size = self.batch_size.unwrap_or(config.batch_size);
        let budget_ms = self.budget_ms.unwrap_or(config.time_budget_ms);

        Ok(RunConfig {
            path: self.path,
            language,
            rules_file: self.rules,
            settings: SchedulerSettings::new(batch_size, Duration::from_millis(budget_ms)),
            output: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Summary
            },
            save_config: self.save_config,
        })
    }
}
