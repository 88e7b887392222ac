//! Report command: run the full pipeline and write the HTML report.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use keyphrases_core::report::{self, RankedKeyphrase};
use keyphrases_core::{AhoCorasickMatcher, Config, Summary};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{PipelineArgs, run_pipeline};

/// Number of keyphrases listed after writing the report.
const PREVIEW: usize = 10;

/// Arguments for the `report` subcommand.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Where to write the HTML report (default: keyphrases.html)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,

    /// Search for these phrases instead of the filtered keyphrases
    /// (repeatable or comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "PHRASE")]
    pub phrases: Option<Vec<String>>,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    output: &'a Utf8Path,
    summary: Summary,
    keyphrases: Vec<RankedKeyphrase>,
}

fn progress_bar(len: usize, hidden: bool) -> anyhow::Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let style = ProgressStyle::with_template("{spinner} matching [{bar:30}] {pos}/{len} {wide_msg}")
        .context("invalid progress bar template")?
        .progress_chars("=> ");
    Ok(ProgressBar::new(len as u64).with_style(style))
}

/// Extract, filter and match keyphrases, then write the report.
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `quiet` - Global `--quiet` flag; hides the progress bar
/// * `config` - Loaded configuration
#[instrument(name = "cmd_report", skip_all)]
pub fn cmd_report(
    args: ReportArgs,
    global_json: bool,
    quiet: bool,
    config: &Config,
) -> anyhow::Result<()> {
    debug!(output = ?args.output, phrases = ?args.phrases, "executing report command");
    let engine = run_pipeline(&args.pipeline, config)?;

    let bar = progress_bar(engine.corpus().len(), quiet || global_json)?;
    let occurrences = engine
        .match_sentences_with(
            &AhoCorasickMatcher::new(),
            args.phrases.as_deref(),
            |_, file| {
                bar.set_message(file.to_string());
                bar.inc(1);
            },
        )
        .context("failed to match keyphrases to sentences")?;
    bar.finish_and_clear();

    let ranked = report::rank(&occurrences);
    let output = args.output.as_deref().unwrap_or(&config.output);
    report::write_report(output, &ranked, &config.report_options())
        .with_context(|| format!("failed to write report to {output}"))?;

    let result = ReportOutput {
        output,
        summary: engine.summary(),
        keyphrases: ranked.iter().map(|r| RankedKeyphrase::from(*r)).collect(),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} {} keyphrases from {} documents to {}",
        "Wrote".green().bold(),
        result.keyphrases.len(),
        result.summary.documents,
        output.cyan()
    );
    for entry in result.keyphrases.iter().take(PREVIEW) {
        println!("{:>7}  {}", entry.count, entry.phrase);
    }
    if result.keyphrases.len() > PREVIEW {
        println!(
            "{}",
            format!("... and {} more", result.keyphrases.len() - PREVIEW).dimmed()
        );
    }
    Ok(())
}
