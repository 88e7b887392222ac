//! The keyphrase pipeline: extract once, filter on demand, match sentences.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::config::Config;
use crate::corpus::Corpus;
use crate::error::{
    ConfigResult, ExtractionError, KeyphraseError, KeyphraseResult, MatchError, MatchResult,
};
use crate::filter::{self, FilteredView, Thresholds};
use crate::matching::{self, OccurrenceMap};
use crate::matrix::{self, RawExtraction};
use crate::nlp::{PhraseExtractor, PosPattern, TokenMatcher};

/// Engine defaults: thresholds used when a filter call omits them, and the
/// part-of-speech pattern used for extraction.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Default thresholds.
    pub thresholds: Thresholds,
    /// Candidate phrase shape.
    pub pos_pattern: PosPattern,
}

impl Settings {
    /// Validate thresholds and parse the pattern from `config`.
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Ok(Self {
            thresholds: config.thresholds()?,
            pos_pattern: config.parsed_pos_pattern()?,
        })
    }
}

/// Sizes reported after processing and filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of documents.
    pub documents: usize,
    /// Phrases found before filtering.
    pub vocabulary: usize,
    /// Phrases surviving the last filter pass, if one ran.
    pub filtered: Option<usize>,
    /// Thresholds of the last filter pass, or the defaults.
    pub thresholds: Thresholds,
}

/// Read every document in `corpus` and build its count matrix.
#[tracing::instrument(skip_all, fields(documents = corpus.len()))]
pub fn process(
    corpus: &Corpus,
    extractor: &dyn PhraseExtractor,
    pattern: &PosPattern,
) -> KeyphraseResult<RawExtraction> {
    let texts = corpus.read_all()?;
    Ok(matrix::build_count_matrix(extractor, &texts, pattern)?)
}

/// A processed corpus with its unfiltered extraction and the most recent
/// filtered view.
///
/// The raw extraction never changes after construction. Each call to
/// [`filter_by_frequency`](Self::filter_by_frequency) derives a new view
/// from it and replaces the previous one.
#[derive(Debug)]
pub struct Keyphrases {
    corpus: Corpus,
    settings: Settings,
    raw: RawExtraction,
    filtered: Option<FilteredView>,
}

impl Keyphrases {
    /// Extract candidate phrases from `corpus` with `extractor`.
    pub fn new(
        corpus: Corpus,
        settings: Settings,
        extractor: &dyn PhraseExtractor,
    ) -> KeyphraseResult<Self> {
        let raw = process(&corpus, extractor, &settings.pos_pattern)?;
        Self::from_extraction(corpus, settings, raw)
    }

    /// Use an extraction computed elsewhere.
    ///
    /// # Errors
    ///
    /// Fails if the matrix does not have one row per document.
    pub fn from_extraction(
        corpus: Corpus,
        settings: Settings,
        raw: RawExtraction,
    ) -> KeyphraseResult<Self> {
        if raw.num_documents() != corpus.len() {
            return Err(ExtractionError::ShapeMismatch {
                expected: (corpus.len(), raw.vocabulary().len()),
                actual: raw.shape(),
            }
            .into());
        }
        Ok(Self {
            corpus,
            settings,
            raw,
            filtered: None,
        })
    }

    /// The corpus.
    pub const fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Document paths; row `i` of every matrix belongs to `filenames()[i]`.
    pub fn filenames(&self) -> &[Utf8PathBuf] {
        self.corpus.filenames()
    }

    /// Engine defaults.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The unfiltered extraction.
    pub const fn raw(&self) -> &RawExtraction {
        &self.raw
    }

    /// The view produced by the last filter pass.
    pub const fn filtered(&self) -> Option<&FilteredView> {
        self.filtered.as_ref()
    }

    /// Filter the raw extraction, replacing any previous view.
    ///
    /// Omitted (or zero) thresholds fall back to the configured defaults.
    pub fn filter_by_frequency(
        &mut self,
        total_freq: Option<usize>,
        cross_doc_freq: Option<usize>,
    ) -> &FilteredView {
        let thresholds = self
            .settings
            .thresholds
            .with_overrides(total_freq, cross_doc_freq);
        self.filtered
            .insert(filter::filter_by_frequency(&self.raw, thresholds))
    }

    /// Filtering by embedding similarity is not available.
    pub fn filter_by_semantic_similarity(&mut self) -> KeyphraseResult<&FilteredView> {
        Err(KeyphraseError::Unimplemented("semantic similarity filtering"))
    }

    /// Surviving phrases that occur in document `doc`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotFiltered`] before the first filter pass.
    pub fn phrases_in_document(&self, doc: usize) -> MatchResult<Vec<&str>> {
        self.filtered
            .as_ref()
            .map(|view| view.phrases_in_document(doc))
            .ok_or(MatchError::NotFiltered)
    }

    /// Find every sentence containing a keyphrase.
    ///
    /// With `phrases`, every document is searched for all of them. Without,
    /// each document is searched only for the filtered phrases it contains,
    /// so the result's keys are exactly the filtered vocabulary.
    pub fn match_sentences<M>(
        &self,
        matcher: &M,
        phrases: Option<&[String]>,
    ) -> MatchResult<OccurrenceMap>
    where
        M: TokenMatcher + ?Sized,
    {
        self.match_sentences_with(matcher, phrases, |_, _| {})
    }

    /// [`match_sentences`](Self::match_sentences), calling `on_document`
    /// with each document's index and path once it has been searched.
    #[tracing::instrument(skip_all, fields(documents = self.corpus.len(), explicit = phrases.is_some()))]
    pub fn match_sentences_with<M, F>(
        &self,
        matcher: &M,
        phrases: Option<&[String]>,
        mut on_document: F,
    ) -> MatchResult<OccurrenceMap>
    where
        M: TokenMatcher + ?Sized,
        F: FnMut(usize, &Utf8Path),
    {
        if phrases.is_none() && self.filtered.is_none() {
            return Err(MatchError::NotFiltered);
        }

        let mut occurrences = OccurrenceMap::new();
        for (doc, filename) in self.corpus.filenames().iter().enumerate() {
            let wanted: Vec<&str> = match phrases {
                Some(list) => list.iter().map(String::as_str).collect(),
                None => self.phrases_in_document(doc)?,
            };
            if !wanted.is_empty() {
                let text = self.corpus.read(filename)?;
                matching::match_document(matcher, filename, &text, &wanted, &mut occurrences)?;
            }
            on_document(doc, filename);
        }

        tracing::info!(keyphrases = occurrences.len(), "matched sentences");
        Ok(occurrences)
    }

    /// Document, vocabulary and filtered sizes.
    pub fn summary(&self) -> Summary {
        Summary {
            documents: self.corpus.len(),
            vocabulary: self.raw.vocabulary().len(),
            filtered: self.filtered.as_ref().map(FilteredView::len),
            thresholds: self
                .filtered
                .as_ref()
                .map_or(self.settings.thresholds, FilteredView::thresholds),
        }
    }
}
