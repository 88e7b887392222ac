//! Part-of-speech driven keyphrase extraction and counting.

use std::collections::{BTreeSet, HashMap};

use ndarray::Array2;

use super::{PhraseExtractor, PosPattern, RuleSegmenter, SentenceSegmenter, Tagger};
use crate::error::ExtractionResult;
use crate::matrix::RawExtraction;
use crate::text::{self, Token};

/// Chunk-then-count extractor built on [`Tagger`] and [`PosPattern`].
///
/// Candidate keyphrases are the lowercased chunks the pattern finds in any
/// sentence of any document. The vocabulary is sorted. Counting then looks
/// for each vocabulary phrase as a word n-gram in every sentence, so a
/// phrase is counted wherever its words appear in sequence, not only where
/// the tagger chunked it.
#[derive(Debug, Clone, Default)]
pub struct PosPhraseExtractor<S = RuleSegmenter> {
    segmenter: S,
    tagger: Tagger,
}

impl PosPhraseExtractor {
    /// Extractor using the built-in [`RuleSegmenter`].
    pub const fn new() -> Self {
        Self {
            segmenter: RuleSegmenter,
            tagger: Tagger,
        }
    }
}

impl<S: SentenceSegmenter> PosPhraseExtractor<S> {
    /// Use a custom sentence segmenter.
    pub const fn with_segmenter(segmenter: S) -> Self {
        Self {
            segmenter,
            tagger: Tagger,
        }
    }

    fn sentences<'t>(&self, text: &'t str) -> Vec<Vec<Token<'t>>> {
        self.segmenter
            .segment(text)
            .into_iter()
            .map(|range| {
                let offset = range.start;
                text::tokenize(&text[range])
                    .into_iter()
                    .map(|t| Token {
                        start: t.start + offset,
                        end: t.end + offset,
                        ..t
                    })
                    .collect()
            })
            .collect()
    }

    fn candidates(&self, sentences: &[Vec<Token<'_>>], pattern: &PosPattern) -> Vec<String> {
        let mut found = Vec::new();
        for tokens in sentences {
            let tags = self.tagger.tag(tokens);
            for chunk in pattern.chunks(&tags) {
                found.push(lowercase_join(&tokens[chunk]));
            }
        }
        found
    }
}

impl<S: SentenceSegmenter> PhraseExtractor for PosPhraseExtractor<S> {
    #[tracing::instrument(skip_all, fields(documents = texts.len(), pattern = %pattern))]
    fn extract(&self, texts: &[String], pattern: &PosPattern) -> ExtractionResult<RawExtraction> {
        let documents: Vec<Vec<Vec<Token<'_>>>> =
            texts.iter().map(|t| self.sentences(t)).collect();

        let vocabulary: Vec<String> = documents
            .iter()
            .flat_map(|sentences| self.candidates(sentences, pattern))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();
        let (min_n, max_n) = ngram_range(&vocabulary);

        let mut counts = Array2::<usize>::zeros((texts.len(), vocabulary.len()));
        for (row, sentences) in documents.iter().enumerate() {
            for tokens in sentences {
                let words: Vec<String> = tokens.iter().map(|t| t.text.to_lowercase()).collect();
                for n in min_n..=max_n.min(words.len()) {
                    for window in words.windows(n) {
                        if let Some(&col) = columns.get(window.join(" ").as_str()) {
                            counts[[row, col]] += 1;
                        }
                    }
                }
            }
        }

        tracing::debug!(vocabulary = vocabulary.len(), "extracted candidate keyphrases");
        RawExtraction::new(vocabulary, counts)
    }
}

fn lowercase_join(tokens: &[Token<'_>]) -> String {
    tokens
        .iter()
        .map(|t| t.text.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shortest and longest phrase length in words; `(1, 0)` when empty.
fn ngram_range(vocabulary: &[String]) -> (usize, usize) {
    let lengths = vocabulary.iter().map(|p| p.split(' ').count());
    let min = lengths.clone().min().unwrap_or(1);
    let max = lengths.max().unwrap_or(0);
    (min, max)
}
