//! Aggregating matched spans into per-keyphrase occurrence records.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{MatchError, MatchResult};
use crate::nlp::{MatchedSpan, TokenMatcher, phrase_patterns};
use crate::text;

/// Occurrence records keyed by lowercase phrase, in discovery order.
pub type OccurrenceMap = IndexMap<String, KeyphraseOccurrences>;

/// Every sighting of one keyphrase across the corpus.
///
/// `spans()[i]` was found in `filenames()[i]`; the two lists always have the
/// same length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyphraseOccurrences {
    key: String,
    spans: Vec<MatchedSpan>,
    filenames: Vec<Utf8PathBuf>,
}

impl KeyphraseOccurrences {
    /// Empty record for `key`, which should already be normalized.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            spans: Vec::new(),
            filenames: Vec::new(),
        }
    }

    /// Record one sighting.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::KeyMismatch`] if the span's normalized text is
    /// not this record's key.
    pub fn add(&mut self, span: MatchedSpan, filename: &Utf8Path) -> MatchResult<()> {
        if text::normalize_phrase(&span.text) != self.key {
            return Err(MatchError::KeyMismatch {
                key: self.key.clone(),
                span: span.text,
            });
        }
        self.spans.push(span);
        self.filenames.push(filename.to_path_buf());
        Ok(())
    }

    /// Lowercase phrase text; also used for display.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Matched spans in the order they were found.
    pub fn spans(&self) -> &[MatchedSpan] {
        &self.spans
    }

    /// Source file of each span.
    pub fn filenames(&self) -> &[Utf8PathBuf] {
        &self.filenames
    }

    /// Number of sightings.
    pub fn count(&self) -> usize {
        self.spans.len()
    }

    /// Covering sentence of each sighting with newlines removed.
    pub fn sentences(&self) -> Vec<String> {
        self.spans
            .iter()
            .map(|s| text::strip_newlines(&s.sentence))
            .collect()
    }
}

/// Find `phrases` in one document and add every sighting to `occurrences`.
///
/// Returns the number of sightings added.
#[tracing::instrument(skip(matcher, text, phrases, occurrences), fields(phrases = phrases.len()))]
pub fn match_document<M, S>(
    matcher: &M,
    filename: &Utf8Path,
    text: &str,
    phrases: &[S],
    occurrences: &mut OccurrenceMap,
) -> MatchResult<usize>
where
    M: TokenMatcher + ?Sized,
    S: AsRef<str>,
{
    let patterns = phrase_patterns(phrases);
    let spans = matcher.find_matches(text, &patterns)?;
    let found = spans.len();
    for span in spans {
        let key = text::normalize_phrase(&span.text);
        tracing::debug!(phrase = %key, file = %filename, sentence = %span.sentence, "matched keyphrase");
        occurrences
            .entry(key)
            .or_insert_with_key(|k| KeyphraseOccurrences::new(k.clone()))
            .add(span, filename)?;
    }
    tracing::debug!(found, "matched phrases in document");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::AhoCorasickMatcher;

    fn span(text: &str, sentence: &str) -> MatchedSpan {
        MatchedSpan {
            text: text.to_string(),
            sentence: sentence.to_string(),
            start: 0,
            end: text.len(),
        }
    }

    #[test]
    fn add_keeps_lists_parallel() {
        let mut record = KeyphraseOccurrences::new("river delta");
        record
            .add(span("River delta", "The River delta."), Utf8Path::new("a.txt"))
            .unwrap();
        record
            .add(span("river\ndelta", "A river\ndelta."), Utf8Path::new("b.txt"))
            .unwrap();
        assert_eq!(record.count(), 2);
        assert_eq!(record.filenames().len(), record.spans().len());
        assert_eq!(record.sentences(), vec!["The River delta.", "A riverdelta."]);
    }

    #[test]
    fn add_rejects_foreign_span() {
        let mut record = KeyphraseOccurrences::new("river");
        let err = record.add(span("delta", "Delta."), Utf8Path::new("a.txt")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid span `delta` to correspond with text `river`"
        );
        assert_eq!(record.count(), 0);
    }

    #[test]
    fn match_document_aggregates_across_documents() {
        let matcher = AhoCorasickMatcher::new();
        let mut occurrences = OccurrenceMap::new();

        let found = match_document(
            &matcher,
            Utf8Path::new("a.txt"),
            "The River floods. Farms need the river.",
            &["river", "farms"],
            &mut occurrences,
        )
        .unwrap();
        assert_eq!(found, 3);
        match_document(
            &matcher,
            Utf8Path::new("b.txt"),
            "A river ran.",
            &["river"],
            &mut occurrences,
        )
        .unwrap();

        let keys: Vec<&str> = occurrences.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["river", "farms"]);
        let river = &occurrences["river"];
        assert_eq!(river.count(), 3);
        assert_eq!(
            river.filenames(),
            [
                Utf8PathBuf::from("a.txt"),
                Utf8PathBuf::from("a.txt"),
                Utf8PathBuf::from("b.txt")
            ]
        );
        assert_eq!(river.spans()[0].text, "River");
    }

    #[test]
    fn unmatched_phrases_create_no_record() {
        let mut occurrences = OccurrenceMap::new();
        match_document(
            &AhoCorasickMatcher::new(),
            Utf8Path::new("a.txt"),
            "Nothing here.",
            &["river"],
            &mut occurrences,
        )
        .unwrap();
        assert!(occurrences.is_empty());
    }
}
