//! Error types for keyphrases-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,

    /// A frequency threshold was below 1.
    #[error("`{name}` must be >= 1 but got {value}")]
    InvalidThreshold {
        /// Name of the offending threshold.
        name: &'static str,
        /// The rejected value.
        value: usize,
    },

    /// A part-of-speech pattern could not be parsed.
    #[error("invalid part-of-speech pattern `{pattern}`: {reason}")]
    InvalidPosPattern {
        /// The pattern as given.
        pattern: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while discovering and reading corpus documents.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// The file pattern is not a valid glob.
    #[error("invalid file pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Underlying glob error.
        source: globset::Error,
    },

    /// No files matched the pattern.
    #[error("failed to find any text documents using pattern '{pattern}'")]
    NoFilesFound {
        /// The pattern as given.
        pattern: String,
    },

    /// Directory traversal failed.
    #[error("failed to walk {root}: {source}")]
    Walk {
        /// Directory the walk started from.
        root: Utf8PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },

    /// A matched path is not valid UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    /// A document could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The document path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A document exceeds the configured size limit.
    #[error("input too large: {path} is {size} bytes (limit: {limit} bytes)")]
    TooLarge {
        /// The document path.
        path: Utf8PathBuf,
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },
}

/// Result type alias using [`CorpusError`].
pub type CorpusResult<T> = Result<T, CorpusError>;

/// Errors raised while building the phrase count matrix.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Matrix dimensions disagree with the corpus or vocabulary.
    #[error("count matrix shape {actual:?} does not match expected {expected:?}")]
    ShapeMismatch {
        /// `(documents, vocabulary)` expected.
        expected: (usize, usize),
        /// Shape actually supplied.
        actual: (usize, usize),
    },

    /// The vocabulary contains the same phrase twice.
    #[error("duplicate phrase in vocabulary: {0}")]
    DuplicatePhrase(String),

    /// Reading a document failed mid-extraction.
    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

/// Result type alias using [`ExtractionError`].
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Errors raised while matching keyphrases back onto sentences.
#[derive(Error, Debug)]
pub enum MatchError {
    /// A span was filed under a record whose key it does not match.
    #[error("invalid span `{span}` to correspond with text `{key}`")]
    KeyMismatch {
        /// Aggregation key of the record.
        key: String,
        /// Text of the offending span.
        span: String,
    },

    /// No filtering pass has run, so there are no phrases to look for.
    #[error("no filtered keyphrases available; run a frequency filter first")]
    NotFiltered,

    /// The token matcher could not be built.
    #[error("failed to build phrase matcher: {0}")]
    Matcher(String),

    /// Reading a document failed mid-match.
    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

/// Result type alias using [`MatchError`].
pub type MatchResult<T> = Result<T, MatchError>;

/// Errors raised while rendering or writing reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The report file could not be written.
    #[error("failed to write report to {path}: {source}")]
    Write {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Result type alias using [`ReportError`].
pub type ReportResult<T> = Result<T, ReportError>;

/// Top-level error for the keyphrase engine.
#[derive(Error, Debug)]
pub enum KeyphraseError {
    /// Configuration or threshold validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Corpus loading failed.
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// Phrase extraction failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Sentence matching failed.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Report rendering failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// The requested feature is not available.
    #[error("{0} is not implemented")]
    Unimplemented(&'static str),
}

/// Result type alias using [`KeyphraseError`].
pub type KeyphraseResult<T> = Result<T, KeyphraseError>;
