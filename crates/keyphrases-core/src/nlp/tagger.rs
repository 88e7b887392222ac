//! Lexicon and suffix based part-of-speech tagging.
//!
//! Emits Penn Treebank tags. Closed-class words come from [`crate::lexicon`];
//! open-class words are guessed from suffixes and the previous tag. This is
//! nowhere near a statistical tagger, but it separates nouns and adjectives
//! from function words well enough for keyphrase chunking.

use crate::lexicon::{ADJECTIVES, ADVERBS, FUNCTION_WORDS, VERB_FORMS};
use crate::text::Token;

/// Adjective-forming suffixes, checked longest first.
const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ical", "istic", "ous", "ful", "ive", "able", "ible", "ial", "ual", "less", "ish",
];

/// Nouns ending in `-ly` that the adverb rule would otherwise catch.
const LY_NOUNS: &[&str] = &["family", "supply", "reply", "assembly", "anomaly", "italy"];

/// Rule-based tagger.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tagger;

impl Tagger {
    /// Tag the tokens of one sentence.
    pub fn tag(&self, tokens: &[Token<'_>]) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let previous = tags.last().copied();
            tags.push(tag_word(token.text, i == 0, previous));
        }
        tags
    }
}

fn tag_word(word: &str, sentence_start: bool, previous: Option<&str>) -> &'static str {
    let lower = word.to_lowercase();
    let lower = lower.as_str();

    if lower.chars().all(|c| c.is_numeric() || c == '-') {
        return "CD";
    }
    if let Some(&tag) = FUNCTION_WORDS.get(lower) {
        return tag;
    }
    if let Some(&tag) = VERB_FORMS.get(lower) {
        return tag;
    }
    if ADVERBS.contains(lower) {
        return "RB";
    }
    if ADJECTIVES.contains(lower) {
        return "JJ";
    }

    if !sentence_start && word.chars().next().is_some_and(char::is_uppercase) {
        return "NNP";
    }

    match previous {
        Some("MD" | "TO") => return "VB",
        Some("PRP") if lower.ends_with('s') => return "VBZ",
        Some("PRP") => return "VBP",
        _ => {}
    }

    let after_determiner = matches!(previous, Some("DT" | "PRP$" | "JJ"));
    let len = lower.chars().count();

    if len > 4 && lower.ends_with("ly") && !LY_NOUNS.contains(&lower) {
        return "RB";
    }
    if len > 5 && lower.ends_with("ing") {
        return if after_determiner { "NN" } else { "VBG" };
    }
    if len > 4 && lower.ends_with("ed") {
        return if after_determiner { "JJ" } else { "VBN" };
    }
    if len > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return "JJ";
    }
    if len > 3 && lower.ends_with('s') && !["ss", "us", "is"].iter().any(|s| lower.ends_with(s))
    {
        return "NNS";
    }
    "NN"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    fn tags(text: &str) -> Vec<&'static str> {
        Tagger.tag(&tokenize(text))
    }

    #[test]
    fn tags_simple_noun_phrase_sentence() {
        assert_eq!(
            tags("The dangerous river floods the farms"),
            vec!["DT", "JJ", "NN", "NNS", "DT", "NNS"]
        );
    }

    #[test]
    fn pronoun_followed_by_verb() {
        assert_eq!(tags("They plant rice"), vec!["PRP", "VBP", "NN"]);
    }

    #[test]
    fn modal_followed_by_base_verb() {
        assert_eq!(tags("Farmers should harvest early"), vec!["NNS", "MD", "VB", "JJ"]);
    }

    #[test]
    fn capitalised_words_inside_sentence_are_proper_nouns() {
        assert_eq!(tags("We visited Nile delta"), vec!["PRP", "VBP", "NNP", "NN"]);
    }

    #[test]
    fn participles_after_determiners_are_adjectives() {
        assert_eq!(tags("the proposed method"), vec!["DT", "JJ", "NN"]);
        assert_eq!(tags("water flooded"), vec!["NN", "VBN"]);
    }

    #[test]
    fn numbers_and_adverbs() {
        assert_eq!(tags("42 quickly"), vec!["CD", "RB"]);
        assert_eq!(tags("family"), vec!["NN"]);
    }
}
