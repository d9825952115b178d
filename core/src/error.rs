use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by corpus loading and ranking.
///
/// An empty result set is never an error; these variants cover unreadable
/// input and ranking misconfiguration only.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Corpus size must be at least one document.
    #[error("invalid corpus size {0}: must be at least 1")]
    InvalidCorpusSize(usize),
    /// A term occurs in more documents than the configured corpus holds.
    #[error("term {term:?} has document frequency {df}, larger than corpus size {corpus_size}")]
    DocumentFrequencyExceedsCorpus {
        term: String,
        df: usize,
        corpus_size: usize,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}
