//! Core library for keyphrases.
//!
//! Finds recurring noun phrases in a corpus of text documents, keeps the ones
//! that are frequent overall and spread across documents, locates the
//! sentences they occur in, and renders an HTML report.
//!
//! # Modules
//!
//! - [`corpus`] - File discovery and lazy document access
//! - [`nlp`] - Sentence segmentation, tagging, phrase extraction and matching
//! - [`matrix`] - Document x phrase count matrices
//! - [`filter`] - Cross-document and total frequency thresholds
//! - [`matching`] - Per-keyphrase occurrence records
//! - [`report`] - Ranking and HTML rendering
//! - [`keyphrases`] - The pipeline tying the above together
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use keyphrases_core::{AhoCorasickMatcher, Corpus, Keyphrases, PosPhraseExtractor, Settings};
//! use keyphrases_core::report::{self, ReportOptions};
//!
//! let corpus = Corpus::discover("*.txt")?;
//! let mut engine = Keyphrases::new(corpus, Settings::default(), &PosPhraseExtractor::new())?;
//! engine.filter_by_frequency(Some(2), Some(2));
//!
//! let occurrences = engine.match_sentences(&AhoCorasickMatcher::new(), None)?;
//! let html = report::render_html(&report::rank(&occurrences), &ReportOptions::default());
//! println!("{html}");
//! # Ok::<(), keyphrases_core::KeyphraseError>(())
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod keyphrases;
pub mod lexicon;
pub mod matching;
pub mod matrix;
pub mod nlp;
pub mod report;
pub mod text;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use corpus::Corpus;
pub use error::{
    ConfigError, ConfigResult, CorpusError, CorpusResult, ExtractionError, ExtractionResult,
    KeyphraseError, KeyphraseResult, MatchError, MatchResult, ReportError, ReportResult,
};
pub use filter::{FilteredView, Thresholds};
pub use keyphrases::{Keyphrases, Settings, Summary};
pub use matching::{KeyphraseOccurrences, OccurrenceMap};
pub use matrix::RawExtraction;
pub use nlp::{
    AhoCorasickMatcher, MatchedSpan, PhraseExtractor, PosPattern, PosPhraseExtractor,
    RuleSegmenter, SentenceSegmenter, TokenMatcher,
};
