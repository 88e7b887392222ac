//! Linguistic collaborators behind narrow traits.
//!
//! The frequency filter never touches text; everything that needs language
//! knowledge goes through one of three capabilities:
//!
//! - [`SentenceSegmenter`] - split text into sentence byte ranges
//! - [`PhraseExtractor`] - turn documents into a vocabulary and count matrix
//! - [`TokenMatcher`] - find word-sequence patterns inside a document
//!
//! Rule-based implementations of all three ship with the crate
//! ([`RuleSegmenter`], [`PosPhraseExtractor`], [`AhoCorasickMatcher`]), so the
//! pipeline runs without an external service. Alternative backends only need
//! to implement the traits.

pub mod extractor;
pub mod matcher;
pub mod pattern;
pub mod tagger;

use std::ops::Range;

use serde::Serialize;

use crate::error::{ExtractionResult, MatchResult};
use crate::matrix::RawExtraction;
use crate::text;

pub use extractor::PosPhraseExtractor;
pub use matcher::AhoCorasickMatcher;
pub use pattern::PosPattern;
pub use tagger::Tagger;

/// Splits text into sentences.
pub trait SentenceSegmenter {
    /// Byte ranges of each sentence in `text`, in order and non-overlapping.
    fn segment(&self, text: &str) -> Vec<Range<usize>>;
}

/// Extracts candidate keyphrases and counts them per document.
///
/// Implementations must keep every phrase seen in at least one document
/// (a minimum document frequency of 1): thresholding is the filter's job.
pub trait PhraseExtractor {
    /// Build the vocabulary and `documents x vocabulary` count matrix.
    ///
    /// Row `d` of the matrix corresponds to `texts[d]`.
    fn extract(&self, texts: &[String], pattern: &PosPattern) -> ExtractionResult<RawExtraction>;
}

/// Finds lowercase word sequences in text.
pub trait TokenMatcher {
    /// Every occurrence of every pattern in `text`, ordered by position.
    ///
    /// A pattern is a sequence of lowercase words; it matches a run of
    /// consecutive tokens whose lowercase forms are equal to it.
    fn find_matches(&self, text: &str, patterns: &[Vec<String>]) -> MatchResult<Vec<MatchedSpan>>;
}

/// A pattern occurrence together with the sentence that contains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedSpan {
    /// Source text of the match, original casing and spacing.
    pub text: String,
    /// Text of the covering sentence.
    pub sentence: String,
    /// Byte offset of the match in the document.
    pub start: usize,
    /// Byte offset one past the end of the match.
    pub end: usize,
}

/// Sentence segmentation using the heuristics in [`crate::text`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSegmenter;

impl SentenceSegmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> Vec<Range<usize>> {
        text::sentence_spans(text)
    }
}

/// Split each phrase on whitespace into a lowercase word pattern.
///
/// Empty phrases are dropped and duplicate patterns collapsed, keeping the
/// first occurrence's position.
pub fn phrase_patterns<S: AsRef<str>>(phrases: &[S]) -> Vec<Vec<String>> {
    let mut patterns: Vec<Vec<String>> = Vec::with_capacity(phrases.len());
    for phrase in phrases {
        let words: Vec<String> = phrase
            .as_ref()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if !words.is_empty() && !patterns.contains(&words) {
            patterns.push(words);
        }
    }
    patterns
}
