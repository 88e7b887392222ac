//! Multi-pattern phrase matching with Aho-Corasick.
//!
//! Each sentence is rewritten as its lowercase tokens joined by single
//! spaces. Patterns are joined the same way, so a byte match that starts and
//! ends on token edges is exactly a run of consecutive matching tokens.

use aho_corasick::AhoCorasick;

use super::{MatchedSpan, RuleSegmenter, SentenceSegmenter, TokenMatcher};
use crate::error::{MatchError, MatchResult};
use crate::text;

/// [`TokenMatcher`] that reports every (possibly overlapping) occurrence.
#[derive(Debug, Clone, Default)]
pub struct AhoCorasickMatcher<S = RuleSegmenter> {
    segmenter: S,
}

impl AhoCorasickMatcher {
    /// Matcher using the built-in [`RuleSegmenter`].
    pub const fn new() -> Self {
        Self {
            segmenter: RuleSegmenter,
        }
    }
}

impl<S: SentenceSegmenter> AhoCorasickMatcher<S> {
    /// Use a custom sentence segmenter.
    pub const fn with_segmenter(segmenter: S) -> Self {
        Self { segmenter }
    }
}

impl<S: SentenceSegmenter> TokenMatcher for AhoCorasickMatcher<S> {
    #[tracing::instrument(skip_all, fields(text_len = text.len(), patterns = patterns.len()))]
    fn find_matches(&self, text: &str, patterns: &[Vec<String>]) -> MatchResult<Vec<MatchedSpan>> {
        let needles: Vec<String> = patterns
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.join(" "))
            .collect();
        if needles.is_empty() {
            return Ok(Vec::new());
        }
        let automaton =
            AhoCorasick::new(&needles).map_err(|e| MatchError::Matcher(e.to_string()))?;

        let mut spans = Vec::new();
        for range in self.segmenter.segment(text) {
            let sentence = &text[range.clone()];
            let tokens = text::tokenize(sentence);

            // Byte offsets of each token inside the normalized sentence
            let mut normalized = String::with_capacity(sentence.len());
            let mut starts = Vec::with_capacity(tokens.len());
            let mut ends = Vec::with_capacity(tokens.len());
            for token in &tokens {
                if !normalized.is_empty() {
                    normalized.push(' ');
                }
                starts.push(normalized.len());
                normalized.push_str(&token.text.to_lowercase());
                ends.push(normalized.len());
            }

            for m in automaton.find_overlapping_iter(&normalized) {
                let (Ok(first), Ok(last)) = (starts.binary_search(&m.start()), ends.binary_search(&m.end()))
                else {
                    continue;
                };
                let start = range.start + tokens[first].start;
                let end = range.start + tokens[last].end;
                spans.push(MatchedSpan {
                    text: text[start..end].to_string(),
                    sentence: sentence.to_string(),
                    start,
                    end,
                });
            }
        }

        spans.sort_by_key(|s| (s.start, s.end));
        Ok(spans)
    }
}
