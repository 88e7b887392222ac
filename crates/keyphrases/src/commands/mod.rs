//! Command implementations.

use anyhow::Context;
use clap::Args;
use keyphrases_core::{
    Config, Corpus, Keyphrases, PosPattern, PosPhraseExtractor, Settings, Thresholds,
};
use tracing::debug;

pub mod filter;
pub mod info;
pub mod report;

/// Corpus and filtering options shared by `report` and `filter`.
///
/// Each flag overrides the corresponding configuration value.
#[derive(Args, Debug, Default, Clone)]
pub struct PipelineArgs {
    /// Glob pattern selecting the documents (default: *.txt)
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Minimum total occurrences across the corpus
    #[arg(short = 't', long = "total-freq", value_name = "N")]
    pub total_freq: Option<usize>,

    /// Minimum number of documents a keyphrase must occur in
    #[arg(short = 'd', long = "cross-doc-freq", value_name = "N")]
    pub cross_doc_freq: Option<usize>,

    /// Part-of-speech pattern or preset (nouns, adjective-nouns)
    #[arg(long, value_name = "PATTERN")]
    pub pos_pattern: Option<String>,
}

/// Discover the corpus, extract keyphrases and run one filter pass.
pub fn run_pipeline(args: &PipelineArgs, config: &Config) -> anyhow::Result<Keyphrases> {
    let pattern = args.pattern.as_deref().unwrap_or(&config.pattern);
    let thresholds = Thresholds::new(
        args.total_freq.unwrap_or(config.total_freq_thresh),
        args.cross_doc_freq.unwrap_or(config.cross_doc_freq_thresh),
    )?;
    let pos_pattern =
        PosPattern::parse(args.pos_pattern.as_deref().unwrap_or(&config.pos_pattern))?;
    debug!(
        pattern,
        total_freq = thresholds.total_freq(),
        cross_doc_freq = thresholds.cross_doc_freq(),
        pos_pattern = %pos_pattern,
        "running keyphrase pipeline"
    );

    let corpus = Corpus::discover(pattern)?.with_max_input_bytes(config.input_limit());
    let settings = Settings {
        thresholds,
        pos_pattern,
    };
    let mut engine = Keyphrases::new(corpus, settings, &PosPhraseExtractor::new())
        .with_context(|| format!("failed to extract keyphrases from '{pattern}'"))?;
    engine.filter_by_frequency(None, None);
    Ok(engine)
}
