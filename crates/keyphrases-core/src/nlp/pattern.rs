//! Part-of-speech chunk patterns.
//!
//! A pattern is written as a sequence of angle-bracketed tag regexes with
//! optional quantifiers, e.g. `<J.*>*<N.*>+` for "zero or more adjectives
//! followed by one or more nouns". Patterns compile to a regex over a tag
//! string of the form `<DT><JJ><NN>`, so a tag regex can never match across
//! the brackets of a neighbouring tag.

use std::fmt;
use std::ops::Range;

use regex::Regex;

use crate::error::{ConfigError, ConfigResult};

/// Single nouns.
pub const NOUNS: &str = "<N.*>";

/// Zero or more adjectives followed by one or more nouns.
pub const ADJECTIVE_NOUNS: &str = "<J.*>*<N.*>+";

/// A compiled part-of-speech pattern.
#[derive(Debug, Clone)]
pub struct PosPattern {
    source: String,
    regex: Regex,
}

impl PosPattern {
    /// Parse a tag pattern or one of the presets `nouns` / `adjective-nouns`.
    pub fn parse(pattern: &str) -> ConfigResult<Self> {
        let source = match pattern.trim() {
            "nouns" => NOUNS.to_string(),
            "adjective-nouns" => ADJECTIVE_NOUNS.to_string(),
            other => other.chars().filter(|c| !c.is_whitespace()).collect(),
        };
        let translated = translate(&source).map_err(|reason| ConfigError::InvalidPosPattern {
            pattern: pattern.to_string(),
            reason,
        })?;
        let regex = Regex::new(&translated).map_err(|e| ConfigError::InvalidPosPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { source, regex })
    }

    /// The pattern in tag notation (presets expanded).
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Token ranges of the leftmost, longest, non-overlapping chunks.
    ///
    /// `tags[i]` is the tag of token `i`. Empty matches are skipped.
    pub fn chunks(&self, tags: &[&str]) -> Vec<Range<usize>> {
        let mut tag_string = String::new();
        let mut starts = Vec::with_capacity(tags.len() + 1);
        for tag in tags {
            starts.push(tag_string.len());
            tag_string.push('<');
            tag_string.push_str(tag);
            tag_string.push('>');
        }
        starts.push(tag_string.len());

        self.regex
            .find_iter(&tag_string)
            .filter(|m| !m.is_empty())
            .filter_map(|m| {
                let first = starts.binary_search(&m.start()).ok()?;
                let last = starts.binary_search(&m.end()).ok()?;
                Some(first..last)
            })
            .collect()
    }
}

impl Default for PosPattern {
    fn default() -> Self {
        Self::parse(ADJECTIVE_NOUNS).expect("valid preset pattern")
    }
}

impl fmt::Display for PosPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Rewrite tag notation into a regex over the `<TAG>` string.
fn translate(pattern: &str) -> Result<String, String> {
    if pattern.is_empty() {
        return Err("pattern is empty".to_string());
    }

    let mut out = String::with_capacity(pattern.len() * 2);
    let mut in_tag = false;
    let mut tag_len = 0;
    let mut tags = 0;

    for ch in pattern.chars() {
        match (in_tag, ch) {
            (false, '<') => {
                in_tag = true;
                tag_len = 0;
                out.push_str("(?:<(?:");
            }
            (true, '>') => {
                if tag_len == 0 {
                    return Err("empty tag `<>`".to_string());
                }
                in_tag = false;
                tags += 1;
                out.push_str(")>)");
            }
            (true, '<') => return Err("nested `<`".to_string()),
            (false, '>') => return Err("`>` without matching `<`".to_string()),
            // Keep tag regexes inside their own brackets
            (true, '.') => {
                tag_len += 1;
                out.push_str("[^<>]");
            }
            (true, c) => {
                tag_len += 1;
                out.push(c);
            }
            (false, c @ ('*' | '+' | '?' | '(' | ')' | '|')) => {
                if c == '(' {
                    out.push_str("(?:");
                } else {
                    out.push(c);
                }
            }
            (false, c) => return Err(format!("unexpected `{c}` outside a tag")),
        }
    }

    if in_tag {
        return Err("unclosed `<`".to_string());
    }
    if tags == 0 {
        return Err("pattern contains no tags".to_string());
    }
    Ok(out)
}
