//! Text processing utilities.
//!
//! Provides sentence boundary detection, word tokenization with byte offsets,
//! and the phrase normalization shared by counting and matching. Counting and
//! matching must agree on what a word is, so both go through [`tokenize`].

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::is_abbreviation;

/// A word: letters/digits, optionally joined by internal `'` or `-`.
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Alphabetic}\p{Nd}]+(?:['\-’][\p{Alphabetic}\p{Nd}]+)*").expect("valid regex")
});

/// Regex for decimal numbers (3.14, 2.5, etc.).
static DECIMAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+$").expect("valid regex"));

/// Regex for URLs and email addresses at the end of the current sentence.
static URL_OR_EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?:https?://|www\.)\S+|\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+)$")
        .expect("valid regex")
});

/// Regex for initials (J.K., U.S.A., etc.).
static INITIALS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Z]\.)+[A-Z]?$").expect("valid regex"));

/// A word token borrowed from its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token text exactly as it appears in the source.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

/// Split text into word tokens, keeping their byte offsets.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| Token {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Lowercase the words of `text` and join them with single spaces.
///
/// Two strings normalize to the same value exactly when they contain the
/// same word sequence, ignoring case, punctuation and whitespace runs.
pub fn normalize_phrase(text: &str) -> String {
    tokenize(text)
        .iter()
        .map(|t| t.text.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove every line break from `text`.
pub fn strip_newlines(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// Byte ranges of the sentences in `text`, trimmed of surrounding whitespace.
///
/// Uses a character scan with context-based boundary detection that knows
/// about abbreviations, initials, decimals, ellipses, URLs and emails.
/// Every non-whitespace character of `text` falls inside exactly one range.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut spans = Vec::new();
    let mut start = 0;

    for (i, &(offset, ch)) in chars.iter().enumerate() {
        if !is_sentence_terminator(ch) {
            continue;
        }
        let end = offset + ch.len_utf8();
        let context = extract_context(&chars, i);
        if is_sentence_boundary(&context, &text[start..end]) {
            push_trimmed(text, start..end, &mut spans);
            start = end;
        }
    }

    push_trimmed(text, start..text.len(), &mut spans);
    spans
}

/// Split text into sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    sentence_spans(text)
        .into_iter()
        .map(|r| text[r].to_string())
        .collect()
}

fn push_trimmed(text: &str, range: Range<usize>, spans: &mut Vec<Range<usize>>) {
    let slice = &text[range.clone()];
    let trimmed_start = slice.len() - slice.trim_start().len();
    let trimmed = slice.trim();
    if !trimmed.is_empty() {
        let start = range.start + trimmed_start;
        spans.push(start..start + trimmed.len());
    }
}

const fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Context around a potential sentence boundary.
struct SentenceContext {
    punctuation: char,
    word_before: String,
    char_after: Option<char>,
    char_after_quote: Option<char>,
    followed_by_terminator: bool,
    is_end_of_text: bool,
}

fn extract_context(chars: &[(usize, char)], pos: usize) -> SentenceContext {
    let followed_by_terminator = chars
        .get(pos + 1)
        .is_some_and(|&(_, c)| is_sentence_terminator(c));

    let mut after = pos + 1;
    while after < chars.len() && chars[after].1.is_whitespace() {
        after += 1;
    }
    let char_after = chars.get(after).map(|&(_, c)| c);
    let char_after_quote = chars.get(after + 1).map(|&(_, c)| c);

    SentenceContext {
        punctuation: chars[pos].1,
        word_before: word_before(chars, pos),
        char_after,
        char_after_quote,
        followed_by_terminator,
        is_end_of_text: chars[pos + 1..].iter().all(|&(_, c)| c.is_whitespace()),
    }
}

fn word_before(chars: &[(usize, char)], pos: usize) -> String {
    let mut word: Vec<char> = chars[..pos]
        .iter()
        .rev()
        .map(|&(_, c)| c)
        .take_while(|c| c.is_alphanumeric() || *c == '.')
        .collect();
    word.reverse();
    word.into_iter().collect()
}

fn is_sentence_boundary(context: &SentenceContext, current: &str) -> bool {
    if context.is_end_of_text {
        return true;
    }

    // Wait for the last mark of "?!" or "..."
    if context.followed_by_terminator {
        return false;
    }

    if context.punctuation == '!' || context.punctuation == '?' {
        return starts_new_sentence(context);
    }

    if is_abbreviation(&context.word_before) || is_initial(&context.word_before) {
        return false;
    }

    if current.ends_with("...") {
        return context.char_after.is_some_and(char::is_uppercase);
    }

    let without_period = &current[..current.len() - 1];
    if URL_OR_EMAIL_PATTERN.is_match(without_period) {
        return false;
    }

    // "3.14": a digit right after the period
    if context.char_after.is_some_and(|c| c.is_ascii_digit())
        && DECIMAL_PATTERN.is_match(&format!("{without_period}.0"))
    {
        return false;
    }

    match context.char_after {
        Some(c) if c.is_lowercase() => false,
        _ => true,
    }
}

fn starts_new_sentence(context: &SentenceContext) -> bool {
    match context.char_after {
        Some(c) if c.is_lowercase() => false,
        Some('"' | '\'' | '“') => !context.char_after_quote.is_some_and(char::is_lowercase),
        _ => true,
    }
}

fn is_initial(word: &str) -> bool {
    let trimmed = word.trim_end_matches('.');
    if trimmed.chars().count() == 1 && trimmed.chars().all(char::is_uppercase) {
        return true;
    }
    INITIALS_PATTERN.is_match(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_sentences() {
        let sentences = split_sentences("This is a sentence. This is another sentence.");
        assert_eq!(sentences, vec!["This is a sentence.", "This is another sentence."]);
    }

    #[test]
    fn abbreviations_not_split() {
        let sentences = split_sentences("Dr. Smith went to the store. He bought milk.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("Dr. Smith"));
    }

    #[test]
    fn decimal_numbers_not_split() {
        let sentences = split_sentences("The price is 3.14 dollars. That's cheap.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("3.14"));
    }

    #[test]
    fn question_and_exclamation() {
        let sentences = split_sentences("Are you serious? I can't believe it! This is amazing.");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn repeated_terminators_stay_together() {
        let sentences = split_sentences("Really?! Yes. Wait... Okay.");
        assert_eq!(sentences, vec!["Really?!", "Yes.", "Wait...", "Okay."]);
    }

    #[test]
    fn initials_not_split() {
        let sentences = split_sentences("J. K. Rowling wrote it. The U.S.A. agreed.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn trailing_text_without_terminator_is_a_sentence() {
        let sentences = split_sentences("First one. and a fragment\n\nwith no end");
        assert_eq!(sentences, vec!["First one. and a fragment\n\nwith no end"]);
    }

    #[test]
    fn spans_cover_all_words() {
        let text = "  Rivers flood.\nFarmers plant rice!  Then they wait.  ";
        let spans = sentence_spans(text);
        assert_eq!(spans.len(), 3);
        assert_eq!(&text[spans[0].clone()], "Rivers flood.");
        for token in tokenize(text) {
            assert!(
                spans.iter().any(|s| s.start <= token.start && token.end <= s.end),
                "token {token:?} not covered"
            );
        }
    }

    #[test]
    fn empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn tokenize_keeps_offsets_and_inner_punctuation() {
        let text = "Rust's well-known borrow checker, v2.";
        let tokens = tokenize(text);
        let words: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(words, vec!["Rust's", "well-known", "borrow", "checker", "v2"]);
        assert_eq!(&text[tokens[2].start..tokens[2].end], "borrow");
    }

    #[test]
    fn normalize_collapses_case_and_whitespace() {
        assert_eq!(normalize_phrase("Climate\n  Change"), "climate change");
        assert_eq!(normalize_phrase("  "), "");
    }

    #[test]
    fn strip_newlines_removes_line_breaks() {
        assert_eq!(strip_newlines("one\r\ntwo\nthree"), "onetwothree");
    }
}
