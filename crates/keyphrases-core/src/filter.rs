//! Cross-document and total frequency filtering.
//!
//! Two thresholds decide which phrases survive:
//!
//! 1. **Cross-document frequency** - the number of documents a phrase occurs
//!    in at all. Counts above one per document are ignored here, so a phrase
//!    repeated many times in a single document cannot pass on volume alone.
//! 2. **Total frequency** - the phrase's summed count over the corpus. A
//!    phrase that failed the first test has its total zeroed first, so it is
//!    excluded outright rather than partially credited.
//!
//! [`filter_by_frequency`] always reads the unfiltered [`RawExtraction`] and
//! returns a fresh [`FilteredView`]; repeated calls never compound.

use ndarray::{Array1, Array2, Axis, Zip};
use serde::Serialize;

use crate::error::{ConfigError, ConfigResult};
use crate::matrix::RawExtraction;

/// Default for both thresholds.
pub const DEFAULT_THRESHOLD: usize = 2;

/// Validated frequency thresholds, each at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    total_freq: usize,
    cross_doc_freq: usize,
}

impl Thresholds {
    /// Validate a threshold pair.
    pub const fn new(total_freq: usize, cross_doc_freq: usize) -> ConfigResult<Self> {
        if total_freq < 1 {
            return Err(ConfigError::InvalidThreshold {
                name: "total_freq_thresh",
                value: total_freq,
            });
        }
        if cross_doc_freq < 1 {
            return Err(ConfigError::InvalidThreshold {
                name: "cross_doc_freq_thresh",
                value: cross_doc_freq,
            });
        }
        Ok(Self {
            total_freq,
            cross_doc_freq,
        })
    }

    /// Minimum summed count over the corpus.
    pub const fn total_freq(&self) -> usize {
        self.total_freq
    }

    /// Minimum number of documents a phrase must occur in.
    pub const fn cross_doc_freq(&self) -> usize {
        self.cross_doc_freq
    }

    /// Replace either threshold for one call.
    ///
    /// `None` and `Some(0)` both keep the current value, so an override can
    /// never produce an invalid pair.
    #[must_use]
    pub fn with_overrides(self, total_freq: Option<usize>, cross_doc_freq: Option<usize>) -> Self {
        Self {
            total_freq: total_freq.filter(|&t| t > 0).unwrap_or(self.total_freq),
            cross_doc_freq: cross_doc_freq
                .filter(|&t| t > 0)
                .unwrap_or(self.cross_doc_freq),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            total_freq: DEFAULT_THRESHOLD,
            cross_doc_freq: DEFAULT_THRESHOLD,
        }
    }
}

/// Result of one filtering pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView {
    thresholds: Thresholds,
    vocabulary: Vec<String>,
    totals: Array1<usize>,
    coverage: Array1<usize>,
    columns: Vec<usize>,
    per_document: Array2<usize>,
}

/// One surviving phrase with its aggregate figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredPhrase {
    /// The phrase.
    pub phrase: String,
    /// Summed count over the corpus.
    pub total: usize,
    /// Number of documents it occurs in.
    pub documents: usize,
}

impl FilteredView {
    /// Thresholds this view was produced with.
    pub const fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Surviving phrases, in original column order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Corpus totals; `totals()[i]` belongs to `vocabulary()[i]`.
    pub const fn totals(&self) -> &Array1<usize> {
        &self.totals
    }

    /// Document coverage; `coverage()[i]` belongs to `vocabulary()[i]`.
    pub const fn coverage(&self) -> &Array1<usize> {
        &self.coverage
    }

    /// Original column index of each surviving phrase.
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// The full count matrix with every non-surviving column zeroed.
    ///
    /// Same shape as the unfiltered matrix, so original column indices
    /// remain valid.
    pub const fn per_document(&self) -> &Array2<usize> {
        &self.per_document
    }

    /// Number of surviving phrases.
    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Returns `true` if nothing survived.
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Surviving phrases that occur in document `doc`.
    ///
    /// Joins through [`columns`](Self::columns) rather than scanning the
    /// original vocabulary by position. Out-of-range documents have none.
    pub fn phrases_in_document(&self, doc: usize) -> Vec<&str> {
        if doc >= self.per_document.nrows() {
            return Vec::new();
        }
        let row = self.per_document.row(doc);
        self.columns
            .iter()
            .zip(&self.vocabulary)
            .filter(|&(&col, _)| row[col] > 0)
            .map(|(_, phrase)| phrase.as_str())
            .collect()
    }

    /// Surviving phrases with their totals and coverage, in column order.
    pub fn entries(&self) -> Vec<FilteredPhrase> {
        self.vocabulary
            .iter()
            .zip(self.totals.iter().zip(self.coverage.iter()))
            .map(|(phrase, (&total, &documents))| FilteredPhrase {
                phrase: phrase.clone(),
                total,
                documents,
            })
            .collect()
    }

    /// [`entries`](Self::entries) ordered by descending total, ties kept in
    /// column order.
    pub fn ranked(&self) -> Vec<FilteredPhrase> {
        let mut entries = self.entries();
        entries.sort_by(|a, b| b.total.cmp(&a.total));
        entries
    }
}

/// Apply both frequency thresholds to `raw`.
///
/// Never fails: thresholds that exclude everything produce an empty view
/// whose per-document matrix is all zeros.
#[tracing::instrument(skip(raw), fields(shape = ?raw.shape()))]
pub fn filter_by_frequency(raw: &RawExtraction, thresholds: Thresholds) -> FilteredView {
    let counts = raw.counts();

    // Documents each phrase occurs in at least once
    let coverage: Array1<usize> = counts.mapv(|c| usize::from(c > 0)).sum_axis(Axis(0));

    let mut totals = counts.sum_axis(Axis(0));
    Zip::from(&mut totals).and(&coverage).for_each(|total, &docs| {
        if docs < thresholds.cross_doc_freq {
            *total = 0;
        }
    });

    let columns: Vec<usize> = totals
        .iter()
        .enumerate()
        .filter(|&(_, &total)| total >= thresholds.total_freq)
        .map(|(i, _)| i)
        .collect();

    let mut per_document = counts.clone();
    let mut keep = vec![false; raw.vocabulary().len()];
    for &col in &columns {
        keep[col] = true;
    }
    for (mut column, &kept) in per_document.axis_iter_mut(Axis(1)).zip(&keep) {
        if !kept {
            column.fill(0);
        }
    }

    let vocabulary: Vec<String> = columns
        .iter()
        .map(|&col| raw.vocabulary()[col].clone())
        .collect();

    tracing::debug!(
        total_freq = thresholds.total_freq,
        cross_doc_freq = thresholds.cross_doc_freq,
        kept = columns.len(),
        of = raw.vocabulary().len(),
        "filtered keyphrases by frequency"
    );

    FilteredView {
        thresholds,
        vocabulary,
        totals: totals.select(Axis(0), &columns),
        coverage: coverage.select(Axis(0), &columns),
        columns,
        per_document,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    fn raw(words: &[&str], counts: Array2<usize>) -> RawExtraction {
        RawExtraction::new(words.iter().map(|w| (*w).to_string()).collect(), counts).unwrap()
    }

    /// Three documents:
    /// - "river" is everywhere
    /// - "delta" is common but only in one document
    /// - "farm" occurs once in two documents
    /// - "rain" occurs in two documents, five times total
    fn sample() -> RawExtraction {
        raw(
            &["delta", "farm", "rain", "river"],
            array![[40, 1, 0, 2], [0, 0, 2, 3], [0, 1, 3, 1]],
        )
    }

    #[test]
    fn thresholds_below_one_are_rejected() {
        assert!(matches!(
            Thresholds::new(0, 2),
            Err(ConfigError::InvalidThreshold {
                name: "total_freq_thresh",
                value: 0
            })
        ));
        assert!(matches!(
            Thresholds::new(2, 0),
            Err(ConfigError::InvalidThreshold {
                name: "cross_doc_freq_thresh",
                ..
            })
        ));
        assert!(Thresholds::new(1, 1).is_ok());
    }

    #[test]
    fn overrides_ignore_zero_and_none() {
        let base = Thresholds::new(3, 2).unwrap();
        assert_eq!(base.with_overrides(None, None), base);
        assert_eq!(base.with_overrides(Some(0), Some(0)), base);
        let changed = base.with_overrides(Some(7), None);
        assert_eq!((changed.total_freq(), changed.cross_doc_freq()), (7, 2));
    }

    #[test]
    fn single_document_phrase_is_excluded_despite_volume() {
        let view = filter_by_frequency(&sample(), Thresholds::new(2, 2).unwrap());
        assert_eq!(view.vocabulary(), ["farm", "rain", "river"]);
        assert_eq!(view.totals(), &array![2usize, 5, 6]);
        assert_eq!(view.coverage(), &array![2usize, 2, 3]);
        assert_eq!(view.columns(), [1, 2, 3]);
    }

    #[test]
    fn total_threshold_applies_after_cross_doc() {
        let view = filter_by_frequency(&sample(), Thresholds::new(5, 2).unwrap());
        assert_eq!(view.vocabulary(), ["rain", "river"]);
        assert_eq!(view.totals(), &array![5usize, 6]);
    }

    #[test]
    fn cross_doc_of_one_credits_single_document_phrases() {
        let view = filter_by_frequency(&sample(), Thresholds::new(10, 1).unwrap());
        assert_eq!(view.vocabulary(), ["delta"]);
        assert_eq!(view.totals(), &array![40usize]);
    }

    #[test]
    fn per_document_matrix_keeps_shape_and_zeroes_dropped_columns() {
        let source = sample();
        let view = filter_by_frequency(&source, Thresholds::new(5, 2).unwrap());
        assert_eq!(view.per_document().dim(), source.shape());
        assert_eq!(
            view.per_document(),
            &array![[0usize, 0, 0, 2], [0, 0, 2, 3], [0, 0, 3, 1]]
        );
    }

    #[test]
    fn phrases_in_document_uses_surviving_columns() {
        let view = filter_by_frequency(&sample(), Thresholds::new(2, 2).unwrap());
        assert_eq!(view.phrases_in_document(0), vec!["farm", "river"]);
        assert_eq!(view.phrases_in_document(1), vec!["rain", "river"]);
        assert_eq!(view.phrases_in_document(2), vec!["farm", "rain", "river"]);
        assert!(view.phrases_in_document(3).is_empty());
    }

    #[test]
    fn thresholds_excluding_everything_give_empty_view() {
        let source = sample();
        let view = filter_by_frequency(&source, Thresholds::new(1000, 2).unwrap());
        assert!(view.is_empty());
        assert_eq!(view.totals().len(), 0);
        assert_eq!(view.per_document().dim(), source.shape());
        assert_eq!(view.per_document().sum(), 0);
    }

    #[test]
    fn empty_vocabulary_is_fine() {
        let source = raw(&[], Array2::zeros((2, 0)));
        let view = filter_by_frequency(&source, Thresholds::default());
        assert!(view.is_empty());
        assert_eq!(view.per_document().dim(), (2, 0));
    }

    #[test]
    fn ranked_orders_by_total_then_column() {
        let source = raw(&["a", "b", "c"], array![[2, 3, 2], [1, 1, 1]]);
        let view = filter_by_frequency(&source, Thresholds::new(1, 2).unwrap());
        let order: Vec<String> = view.ranked().into_iter().map(|e| e.phrase).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    fn matrix_strategy() -> impl Strategy<Value = Array2<usize>> {
        (1usize..5, 0usize..8).prop_flat_map(|(rows, cols)| {
            proptest::collection::vec(0usize..6, rows * cols).prop_map(move |cells| {
                Array2::from_shape_vec((rows, cols), cells).expect("shape matches length")
            })
        })
    }

    fn raw_from(counts: Array2<usize>) -> RawExtraction {
        let vocabulary = (0..counts.ncols()).map(|i| format!("p{i}")).collect();
        RawExtraction::new(vocabulary, counts).unwrap()
    }

    proptest! {
        #[test]
        fn filtered_arrays_stay_aligned(counts in matrix_strategy(), total in 1usize..12, cross in 1usize..5) {
            let source = raw_from(counts);
            let view = filter_by_frequency(&source, Thresholds::new(total, cross).unwrap());
            prop_assert_eq!(view.totals().len(), view.vocabulary().len());
            prop_assert_eq!(view.coverage().len(), view.vocabulary().len());
            prop_assert_eq!(view.columns().len(), view.vocabulary().len());
            prop_assert!(view.totals().iter().all(|&t| t >= total));
            prop_assert!(view.coverage().iter().all(|&c| c >= cross));
            prop_assert_eq!(view.per_document().dim(), source.shape());
        }

        #[test]
        fn filtering_is_idempotent(counts in matrix_strategy(), total in 1usize..12, cross in 1usize..5) {
            let source = raw_from(counts);
            let thresholds = Thresholds::new(total, cross).unwrap();
            let first = filter_by_frequency(&source, thresholds);
            let second = filter_by_frequency(&source, thresholds);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn single_document_phrases_never_pass_cross_doc_two(counts in matrix_strategy(), total in 1usize..12) {
            let source = raw_from(counts);
            let view = filter_by_frequency(&source, Thresholds::new(total, 2).unwrap());
            for &col in view.columns() {
                let docs = source.counts().column(col).iter().filter(|&&c| c > 0).count();
                prop_assert!(docs >= 2);
            }
        }
    }
}
