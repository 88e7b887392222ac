//! Filter command: print the ranked keyphrases that pass both thresholds.

use clap::Args;
use keyphrases_core::Config;
use keyphrases_core::Summary;
use keyphrases_core::filter::FilteredPhrase;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{PipelineArgs, run_pipeline};

/// Arguments for the `filter` subcommand.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Show at most N keyphrases
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct FilterOutput {
    summary: Summary,
    keyphrases: Vec<FilteredPhrase>,
}

/// Extract and filter keyphrases, then print them by descending total.
#[instrument(name = "cmd_filter", skip_all)]
pub fn cmd_filter(args: FilterArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(limit = ?args.limit, "executing filter command");
    let engine = run_pipeline(&args.pipeline, config)?;

    let mut keyphrases = engine
        .filtered()
        .map(|view| view.ranked())
        .unwrap_or_default();
    if let Some(limit) = args.limit {
        keyphrases.truncate(limit);
    }
    let output = FilterOutput {
        summary: engine.summary(),
        keyphrases,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let summary = &output.summary;
    println!(
        "{} of {} keyphrases kept across {} documents (total >= {}, documents >= {})",
        summary.filtered.unwrap_or(0).bold(),
        summary.vocabulary,
        summary.documents,
        summary.thresholds.total_freq(),
        summary.thresholds.cross_doc_freq(),
    );
    if output.keyphrases.is_empty() {
        println!("{}", "no keyphrases passed the thresholds".yellow());
        return Ok(());
    }
    println!();
    println!("{:>7}  {:>5}  {}", "TOTAL".dimmed(), "DOCS".dimmed(), "KEYPHRASE".dimmed());
    for entry in &output.keyphrases {
        println!(
            "{:>7}  {:>5}  {}",
            entry.total,
            entry.documents,
            entry.phrase.cyan()
        );
    }
    Ok(())
}
