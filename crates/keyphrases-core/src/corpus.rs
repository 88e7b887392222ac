//! Corpus discovery and document access.
//!
//! A [`Corpus`] is an ordered list of text files found by a glob pattern.
//! Row `i` of every count matrix belongs to `filenames()[i]`, so the order
//! is fixed at discovery time and never changes for the life of the value.
//!
//! Document text is not held in memory: [`Corpus::iter`] reads each file
//! when it is reached, and iterating again reads from disk again. The
//! sentence split and the concatenated full text are the exception; both are
//! computed on first use and cached on the instance.

use std::fmt;
use std::sync::OnceLock;

use camino::{Utf8Path, Utf8PathBuf};
use globset::{GlobBuilder, GlobMatcher};
use indexmap::IndexMap;
use walkdir::WalkDir;

use crate::error::{CorpusError, CorpusResult};
use crate::nlp::{RuleSegmenter, SentenceSegmenter};
use crate::text;

/// Default file pattern.
pub const DEFAULT_PATTERN: &str = "*.txt";

/// Sentences of every document, keyed by filename in corpus order.
pub type SentenceMap = IndexMap<Utf8PathBuf, Vec<String>>;

/// An ordered set of text documents.
pub struct Corpus {
    pattern: String,
    files: Vec<Utf8PathBuf>,
    max_input_bytes: Option<u64>,
    segmenter: Box<dyn SentenceSegmenter + Send + Sync>,
    sentences: OnceLock<SentenceMap>,
    full_text: OnceLock<String>,
}

impl fmt::Debug for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Corpus")
            .field("pattern", &self.pattern)
            .field("files", &self.files)
            .field("max_input_bytes", &self.max_input_bytes)
            .finish_non_exhaustive()
    }
}

impl Corpus {
    /// Find every file matching `pattern`.
    ///
    /// `*` stays within one directory and `**` crosses directories. A
    /// relative pattern is resolved against the current directory, and the
    /// resulting filenames are relative too. Results are sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::NoFilesFound`] if nothing matches.
    #[tracing::instrument]
    pub fn discover(pattern: &str) -> CorpusResult<Self> {
        let files = discover_files(pattern)?;
        if files.is_empty() {
            return Err(CorpusError::NoFilesFound {
                pattern: pattern.to_string(),
            });
        }
        tracing::info!(documents = files.len(), "discovered corpus");
        Ok(Self::with_files(pattern.to_string(), files))
    }

    /// Build a corpus from an explicit file list, keeping its order.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::NoFilesFound`] if `files` is empty.
    pub fn from_files<I, P>(files: I) -> CorpusResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        let mut files: Vec<Utf8PathBuf> = files.into_iter().map(Into::into).collect();
        let mut seen = std::collections::HashSet::new();
        files.retain(|f| seen.insert(f.clone()));
        if files.is_empty() {
            return Err(CorpusError::NoFilesFound {
                pattern: String::new(),
            });
        }
        Ok(Self::with_files(String::new(), files))
    }

    fn with_files(pattern: String, files: Vec<Utf8PathBuf>) -> Self {
        Self {
            pattern,
            files,
            max_input_bytes: None,
            segmenter: Box::new(RuleSegmenter),
            sentences: OnceLock::new(),
            full_text: OnceLock::new(),
        }
    }

    /// Reject documents larger than `limit` bytes when they are read.
    #[must_use]
    pub const fn with_max_input_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_input_bytes = limit;
        self
    }

    /// Split sentences with `segmenter` instead of the built-in rules.
    #[must_use]
    pub fn with_segmenter<S>(mut self, segmenter: S) -> Self
    where
        S: SentenceSegmenter + Send + Sync + 'static,
    {
        self.segmenter = Box::new(segmenter);
        self.sentences = OnceLock::new();
        self
    }

    /// The pattern this corpus was discovered with; empty for explicit lists.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always `false` for a successfully constructed corpus.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Document paths in corpus order.
    pub fn filenames(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    /// Lazily read each document in order.
    pub fn iter(&self) -> Documents<'_> {
        Documents {
            corpus: self,
            next: 0,
        }
    }

    /// Read every document, stopping at the first failure.
    pub fn read_all(&self) -> CorpusResult<Vec<String>> {
        self.iter().collect()
    }

    /// Read one document, enforcing the size limit.
    pub fn read(&self, path: &Utf8Path) -> CorpusResult<String> {
        let read_err = |source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        };
        if let Some(limit) = self.max_input_bytes {
            let size = std::fs::metadata(path).map_err(read_err)?.len();
            if size > limit {
                return Err(CorpusError::TooLarge {
                    path: path.to_path_buf(),
                    size,
                    limit,
                });
            }
        }
        std::fs::read_to_string(path).map_err(read_err)
    }

    /// Sentences of each document with newlines removed.
    ///
    /// Computed on first call and cached.
    pub fn sentences(&self) -> CorpusResult<&SentenceMap> {
        if let Some(cached) = self.sentences.get() {
            return Ok(cached);
        }
        let mut map = IndexMap::with_capacity(self.files.len());
        for (path, doc) in self.files.iter().zip(self.iter()) {
            let doc = doc?;
            let sentences = self
                .segmenter
                .segment(&doc)
                .into_iter()
                .map(|range| text::strip_newlines(&doc[range]))
                .collect();
            map.insert(path.clone(), sentences);
        }
        tracing::debug!(documents = map.len(), "split corpus into sentences");
        Ok(self.sentences.get_or_init(|| map))
    }

    /// All documents with newlines removed, joined by single spaces.
    ///
    /// Computed on first call and cached.
    pub fn full_text(&self) -> CorpusResult<&str> {
        if let Some(cached) = self.full_text.get() {
            return Ok(cached);
        }
        let joined = self
            .iter()
            .map(|doc| doc.map(|d| text::strip_newlines(&d)))
            .collect::<CorpusResult<Vec<_>>>()?
            .join(" ");
        Ok(self.full_text.get_or_init(|| joined))
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = CorpusResult<String>;
    type IntoIter = Documents<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over document contents, see [`Corpus::iter`].
#[derive(Debug)]
pub struct Documents<'a> {
    corpus: &'a Corpus,
    next: usize,
}

impl Iterator for Documents<'_> {
    type Item = CorpusResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.corpus.files.get(self.next)?;
        self.next += 1;
        Some(self.corpus.read(path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.corpus.files.len() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Documents<'_> {}

fn has_glob_meta(component: &str) -> bool {
    component.contains(['*', '?', '[', '{'])
}

/// Directory to start walking from and how deep to go.
fn walk_root(pattern: &str) -> (Utf8PathBuf, Option<usize>) {
    let parts: Vec<&str> = pattern.split('/').collect();
    // The last component always names files, even without metacharacters
    let literal = parts
        .iter()
        .take_while(|p| !has_glob_meta(p))
        .count()
        .min(parts.len() - 1);

    let base = parts[..literal].join("/");
    let base = match base.as_str() {
        "" if pattern.starts_with('/') => Utf8PathBuf::from("/"),
        "" => Utf8PathBuf::from("."),
        _ => Utf8PathBuf::from(base),
    };
    let rest = &parts[literal..];
    let depth = if rest.contains(&"**") {
        None
    } else {
        Some(rest.len())
    };
    (base, depth)
}

/// Whether the part of `pattern` below `root` names a dot-prefixed
/// component, which lets the walk enter hidden files and directories.
fn matches_hidden(pattern: &str, root: &Utf8Path) -> bool {
    let below = if root == "." {
        pattern
    } else {
        pattern.strip_prefix(root.as_str()).unwrap_or(pattern)
    };
    below.split('/').any(|part| part.starts_with('.'))
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn discover_files(pattern: &str) -> CorpusResult<Vec<Utf8PathBuf>> {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    let invalid = |source| CorpusError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    };
    let matcher: GlobMatcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(invalid)?
        .compile_matcher();

    let (root, depth) = walk_root(pattern);
    tracing::debug!(%root, ?depth, "walking for corpus files");
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(&root).follow_links(true).sort_by_file_name();
    if let Some(depth) = depth {
        walker = walker.max_depth(depth);
    }
    // `*` and `**` skip dotfiles unless the pattern spells the dot out
    let hidden = matches_hidden(pattern, &root);
    let entries = walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || hidden || !is_hidden(e));

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CorpusError::Walk {
            root: root.clone(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = Utf8Path::from_path(entry.path())
            .ok_or_else(|| CorpusError::NonUtf8Path(entry.path().display().to_string()))?;
        let path = if root == "." {
            path.strip_prefix(".").unwrap_or(path)
        } else {
            path
        };
        if matcher.is_match(path) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
