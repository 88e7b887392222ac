//! Document x phrase count matrices.
//!
//! [`RawExtraction`] is the unfiltered output of a [`PhraseExtractor`]: the
//! phrase vocabulary and a `documents x vocabulary` count matrix whose
//! columns line up with it. It is immutable once built; filtering derives
//! new views from it and never writes back.

use std::collections::HashMap;

use ndarray::Array2;
use serde::Serialize;

use crate::error::{ExtractionError, ExtractionResult};
use crate::nlp::{PhraseExtractor, PosPattern};

/// Vocabulary plus per-document phrase counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtraction {
    vocabulary: Vec<String>,
    counts: Array2<usize>,
    columns: HashMap<String, usize>,
}

impl RawExtraction {
    /// Pair a vocabulary with its count matrix.
    ///
    /// Fails if the matrix column count differs from the vocabulary length or
    /// if two phrases are equal ignoring case.
    pub fn new(vocabulary: Vec<String>, counts: Array2<usize>) -> ExtractionResult<Self> {
        if counts.ncols() != vocabulary.len() {
            return Err(ExtractionError::ShapeMismatch {
                expected: (counts.nrows(), vocabulary.len()),
                actual: counts.dim(),
            });
        }

        let mut columns = HashMap::with_capacity(vocabulary.len());
        for (i, phrase) in vocabulary.iter().enumerate() {
            if columns.insert(phrase.to_lowercase(), i).is_some() {
                return Err(ExtractionError::DuplicatePhrase(phrase.clone()));
            }
        }

        Ok(Self {
            vocabulary,
            counts,
            columns,
        })
    }

    /// Phrases in column order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// The `documents x vocabulary` count matrix.
    pub const fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    /// Number of documents (matrix rows).
    pub fn num_documents(&self) -> usize {
        self.counts.nrows()
    }

    /// `(documents, vocabulary)`.
    pub fn shape(&self) -> (usize, usize) {
        self.counts.dim()
    }

    /// Column index of `phrase`, ignoring case.
    pub fn column_of(&self, phrase: &str) -> Option<usize> {
        self.columns.get(&phrase.to_lowercase()).copied()
    }

    /// Shape and size figures for logging and JSON output.
    pub fn stats(&self) -> ExtractionStats {
        ExtractionStats {
            documents: self.num_documents(),
            vocabulary: self.vocabulary.len(),
            occurrences: self.counts.sum(),
        }
    }
}

/// Summary of a [`RawExtraction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Number of documents.
    pub documents: usize,
    /// Number of distinct phrases.
    pub vocabulary: usize,
    /// Sum of all counts.
    pub occurrences: usize,
}

/// Run `extractor` over the corpus texts and check the result lines up.
///
/// The extractor is expected to keep every phrase it sees; no document
/// frequency cut-off is applied here.
#[tracing::instrument(skip_all, fields(documents = texts.len(), pattern = %pattern))]
pub fn build_count_matrix(
    extractor: &dyn PhraseExtractor,
    texts: &[String],
    pattern: &PosPattern,
) -> ExtractionResult<RawExtraction> {
    let raw = extractor.extract(texts, pattern)?;
    if raw.num_documents() != texts.len() {
        return Err(ExtractionError::ShapeMismatch {
            expected: (texts.len(), raw.vocabulary.len()),
            actual: raw.shape(),
        });
    }

    let stats = raw.stats();
    tracing::info!(
        documents = stats.documents,
        vocabulary = stats.vocabulary,
        occurrences = stats.occurrences,
        "built phrase count matrix"
    );
    Ok(raw)
}
