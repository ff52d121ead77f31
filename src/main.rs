//! rebel-highlight - highlight a file in time-boxed batches
//!
//! Plays the part of an editor's idle loop: opens the file, marks every
//! block dirty and calls `run_batch` until nothing is pending.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use rebel_highlight::cli::{CliArgs, OutputFormat, RunConfig};
use rebel_highlight::config::HighlightConfig;
use rebel_highlight::model::Document;
use rebel_highlight::scheduler::SystemClock;
use rebel_highlight::syntax::RuleSet;
use rebel_highlight::HighlightedBuffer;

#[derive(Serialize)]
struct LineDump<'a> {
    line: usize,
    text: &'a str,
    spans: Vec<SpanDump>,
}

#[derive(Serialize)]
struct SpanDump {
    start: usize,
    len: usize,
    style: &'static str,
}

fn load_rules(run: &RunConfig) -> Result<RuleSet> {
    let rules = match &run.rules_file {
        Some(path) => RuleSet::from_file(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?,
        None => RuleSet::load_for(run.language)
            .with_context(|| format!("Failed to load {} rules", run.language))?,
    };

    if rules.language() != run.language {
        tracing::warn!(
            "Rule file is for {} rather than {}, highlighting as {}",
            rules.language(),
            run.language,
            rules.language()
        );
    }
    Ok(rules)
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    rebel_highlight::tracing::init(args.verbose);

    let config = HighlightConfig::load();
    let run = args.into_config(&config).map_err(anyhow::Error::msg)?;

    if run.save_config {
        HighlightConfig {
            batch_size: run.settings.batch_size,
            time_budget_ms: run.settings.time_budget.as_millis() as u64,
            ..config
        }
        .save()
        .map_err(anyhow::Error::msg)?;
    }

    let rules = load_rules(&run)?;

    let mut document = Document::from_file(run.path.clone())
        .with_context(|| format!("Failed to open {}", run.path.display()))?;
    document.language = rules.language();

    let mut buffer = HighlightedBuffer::with_engine(
        document,
        Arc::new(rules),
        run.settings,
        SystemClock,
    );

    let mut batches = 0;
    let mut failed = 0;
    loop {
        let report = buffer.run_batch_report();
        batches += 1;
        failed += report.failed;
        if !report.has_pending() {
            break;
        }
    }

    let document = buffer.document();
    match run.output {
        OutputFormat::Json => {
            let lines: Vec<LineDump> = document
                .blocks()
                .enumerate()
                .map(|(line, (_, block))| LineDump {
                    line,
                    text: block.text(),
                    spans: block
                        .spans()
                        .iter()
                        .map(|span| SpanDump {
                            start: span.start,
                            len: span.len,
                            style: span.style_name(),
                        })
                        .collect(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&lines)?);
        }
        OutputFormat::Summary => {
            let span_count: usize = document.blocks().map(|(_, b)| b.spans().len()).sum();
            println!(
                "{}: {} ({} lines, {} spans) in {} batches of up to {} lines / {:?}",
                run.path.display(),
                buffer.language(),
                document.block_count(),
                span_count,
                batches,
                run.settings.batch_size,
                run.settings.time_budget
            );
            if failed > 0 {
                println!("{failed} lines could not be highlighted and were left unstyled");
            }
        }
    }

    Ok(())
}
