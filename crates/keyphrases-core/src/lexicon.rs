//! Closed-class word lists used by the built-in tagger and sentence segmenter.
//!
//! Open-class words (nouns, adjectives, most verbs) are recognised by suffix
//! heuristics in [`crate::nlp::tagger`]; the sets here cover the function
//! words and frequent irregular forms that suffixes cannot.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Abbreviations whose trailing period does not end a sentence.
pub static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Titles
        "mr", "mrs", "ms", "dr", "prof", "rev", "sr", "jr", "st", "capt", "col", "gen", "lt",
        "sgt", "gov", "sen", "rep", "hon",
        // Latin and reference
        "etc", "vs", "e.g", "i.e", "cf", "al", "viz", "ibid", "fig", "vol", "pp", "ch",
        "eq", "approx", "ca",
        // Dates
        "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
        "a.m", "p.m",
        // Organisations and places
        "inc", "corp", "ltd", "co", "dept", "univ", "ave", "rd", "u.s", "u.k", "e.u",
    ]
    .into_iter()
    .collect()
});

/// Single-tag function words: word -> Penn Treebank tag.
pub static FUNCTION_WORDS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    for w in [
        "the", "a", "an", "this", "that", "these", "those", "each", "every", "some", "any",
        "no", "all", "both", "either", "neither", "another",
    ] {
        map.insert(w, "DT");
    }
    for w in [
        "of", "in", "on", "at", "by", "for", "with", "from", "into", "onto", "about", "over",
        "under", "between", "among", "through", "during", "before", "after", "against",
        "without", "within", "across", "toward", "towards", "upon", "than", "because", "while",
        "although", "though", "whether", "if", "since", "until", "unless", "via", "per", "as",
    ] {
        map.insert(w, "IN");
    }
    for w in ["and", "or", "but", "nor", "yet", "so"] {
        map.insert(w, "CC");
    }
    for w in [
        "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "myself",
        "yourself", "himself", "herself", "itself", "ourselves", "themselves", "one",
    ] {
        map.insert(w, "PRP");
    }
    for w in ["my", "your", "his", "her", "its", "our", "their"] {
        map.insert(w, "PRP$");
    }
    for w in ["who", "whom", "what", "which"] {
        map.insert(w, "WP");
    }
    for w in ["when", "where", "why", "how"] {
        map.insert(w, "WRB");
    }
    for w in [
        "can", "could", "may", "might", "must", "shall", "should", "will", "would",
    ] {
        map.insert(w, "MD");
    }
    map.insert("to", "TO");
    map.insert("there", "EX");
    map.insert("not", "RB");
    map.insert("n't", "RB");

    map
});

/// Common verb forms, including irregulars the suffix rules miss.
pub static VERB_FORMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    for w in ["be", "get", "make", "take", "give", "go", "see", "know", "use"] {
        map.insert(w, "VB");
    }
    for w in ["am", "are", "have", "do"] {
        map.insert(w, "VBP");
    }
    for w in ["is", "has", "does", "gets", "makes", "takes", "gives", "goes", "seems"] {
        map.insert(w, "VBZ");
    }
    for w in [
        "was", "were", "had", "did", "got", "made", "took", "gave", "went", "saw", "knew",
        "said", "became", "began", "came", "found", "thought", "told", "brought", "felt",
        "kept", "left", "meant", "met", "ran", "sat", "stood", "wrote",
    ] {
        map.insert(w, "VBD");
    }
    for w in [
        "been", "done", "gone", "seen", "known", "given", "taken", "written", "shown", "grown",
        "chosen", "driven", "spoken", "broken", "begun", "become",
    ] {
        map.insert(w, "VBN");
    }
    map.insert("being", "VBG");

    map
});

/// Common adjectives without a distinctive suffix.
pub static ADJECTIVES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "new", "old", "good", "bad", "great", "small", "large", "big", "long", "short", "high",
        "low", "young", "early", "late", "important", "different", "same", "main", "major",
        "minor", "few", "many", "much", "more", "most", "less", "other", "several", "certain",
        "clear", "common", "full", "free", "whole", "real", "true", "simple", "strong", "hard",
        "easy", "open", "public", "private", "local", "global", "social", "human", "natural",
        "key", "wide", "deep", "recent", "current", "own", "next", "last", "first",
        "second", "third", "best", "better", "worse", "worst", "fast", "slow", "red", "green",
        "blue", "black", "white",
    ]
    .into_iter()
    .collect()
});

/// Common adverbs that do not end in `-ly`.
pub static ADVERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "also", "very", "often", "always", "never", "sometimes", "still", "just", "even",
        "only", "already", "again", "then", "now", "here", "however", "thus", "therefore",
        "too", "quite", "rather", "soon", "almost", "perhaps", "instead", "together", "yet",
    ]
    .into_iter()
    .collect()
});

/// Check if a word (with or without trailing periods) is a known abbreviation.
pub fn is_abbreviation(word: &str) -> bool {
    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(lower.trim_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations_ignore_case_and_periods() {
        assert!(is_abbreviation("Dr"));
        assert!(is_abbreviation("e.g."));
        assert!(is_abbreviation("ETC"));
        assert!(!is_abbreviation("corpus"));
    }

    #[test]
    fn function_words_have_closed_class_tags() {
        assert_eq!(FUNCTION_WORDS.get("the"), Some(&"DT"));
        assert_eq!(FUNCTION_WORDS.get("of"), Some(&"IN"));
        assert_eq!(FUNCTION_WORDS.get("should"), Some(&"MD"));
        assert!(FUNCTION_WORDS.get("river").is_none());
    }
}
