//! Ranking occurrence records and rendering them as an HTML report.

use std::fmt::Write as _;
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::{ReportError, ReportResult};
use crate::matching::{KeyphraseOccurrences, OccurrenceMap};
use crate::text;

/// Default report file name.
pub const DEFAULT_OUTPUT: &str = "keyphrases.html";

/// Default stylesheet link.
pub const DEFAULT_STYLESHEET: &str = "static/style.css";

/// Default CSS class wrapped around highlighted phrases.
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "keyphrase";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Presentation settings for [`render_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Page title and heading.
    pub title: String,
    /// `href` of the linked stylesheet.
    pub stylesheet: String,
    /// CSS class for highlighted phrases.
    pub highlight_class: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Keyphrases".to_string(),
            stylesheet: DEFAULT_STYLESHEET.to_string(),
            highlight_class: DEFAULT_HIGHLIGHT_CLASS.to_string(),
        }
    }
}

/// Records by descending occurrence count; ties keep discovery order.
pub fn rank(occurrences: &OccurrenceMap) -> Vec<&KeyphraseOccurrences> {
    let mut ranked: Vec<&KeyphraseOccurrences> = occurrences.values().collect();
    ranked.sort_by(|a, b| b.count().cmp(&a.count()));
    ranked
}

/// One sentence of a [`RankedKeyphrase`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceEntry {
    /// Sentence text, newlines removed.
    pub sentence: String,
    /// Document it came from.
    pub filename: Utf8PathBuf,
}

/// Serializable view of a ranked record, for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedKeyphrase {
    /// The keyphrase.
    pub phrase: String,
    /// Number of sightings.
    pub count: usize,
    /// Sentences in discovery order.
    pub sentences: Vec<SentenceEntry>,
}

impl From<&KeyphraseOccurrences> for RankedKeyphrase {
    fn from(record: &KeyphraseOccurrences) -> Self {
        Self {
            phrase: record.key().to_string(),
            count: record.count(),
            sentences: record
                .sentences()
                .into_iter()
                .zip(record.filenames())
                .map(|(sentence, filename)| SentenceEntry {
                    sentence,
                    filename: filename.clone(),
                })
                .collect(),
        }
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Regex for `phrase` as whole words, case-insensitive.
///
/// Phrase text is escaped and any whitespace run inside it matches any
/// whitespace run in the sentence.
fn phrase_regex(phrase: &str) -> Option<Regex> {
    let phrase = phrase.trim();
    let first = phrase.chars().next()?;
    let last = phrase.chars().next_back()?;

    let body = WHITESPACE
        .split(phrase)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let lead = if is_word_char(first) { r"\b" } else { "" };
    let trail = if is_word_char(last) { r"\b" } else { "" };

    RegexBuilder::new(&format!("{lead}{body}{trail}"))
        .case_insensitive(true)
        .build()
        .ok()
}

/// HTML-escape `sentence` and wrap every occurrence of `phrase` in a span.
pub fn highlight(sentence: &str, phrase: &str, class: &str) -> String {
    let Some(re) = phrase_regex(phrase) else {
        return escape_html(sentence);
    };

    let class = escape_html(class);
    let mut out = String::with_capacity(sentence.len() + 32);
    let mut last = 0;
    for m in re.find_iter(sentence) {
        out.push_str(&escape_html(&sentence[last..m.start()]));
        let _ = write!(
            out,
            r#"<span class="{class}">{}</span>"#,
            escape_html(m.as_str())
        );
        last = m.end();
    }
    out.push_str(&escape_html(&sentence[last..]));
    out
}

/// Render ranked records as a standalone HTML page.
///
/// Each sentence highlights the text its span actually matched, so
/// punctuation between words and words joined by newline removal are
/// still wrapped. An empty `records` slice renders a table with no rows.
pub fn render_html(records: &[&KeyphraseOccurrences], options: &ReportOptions) -> String {
    let title = escape_html(&options.title);
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"{}\">\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <table class=\"keyphrases\">\n\
         <thead><tr><th>Keyphrase</th><th>Count</th><th>Sentences</th></tr></thead>\n\
         <tbody>\n",
        escape_html(&options.stylesheet)
    );

    for record in records {
        let _ = write!(
            html,
            "<tr>\n<td class=\"phrase\">{}</td>\n<td class=\"count\">{}</td>\n<td>\n<ul>\n",
            escape_html(record.key()),
            record.count()
        );
        for (span, filename) in record.spans().iter().zip(record.filenames()) {
            let sentence = text::strip_newlines(&span.sentence);
            let matched = text::strip_newlines(&span.text);
            let _ = writeln!(
                html,
                "<li>{} <span class=\"source\">{}</span></li>",
                highlight(&sentence, &matched, &options.highlight_class),
                escape_html(filename.as_str())
            );
        }
        html.push_str("</ul>\n</td>\n</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

/// Render `records` and write the page to `path`, creating parent
/// directories. Returns the rendered page.
#[tracing::instrument(skip(records, options), fields(records = records.len()))]
pub fn write_report(
    path: &Utf8Path,
    records: &[&KeyphraseOccurrences],
    options: &ReportOptions,
) -> ReportResult<String> {
    let html = render_html(records, options);
    let write_err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, &html).map_err(write_err)?;
    tracing::info!(bytes = html.len(), "wrote report");
    Ok(html)
}
