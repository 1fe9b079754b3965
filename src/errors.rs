// File: src/errors.rs
//! Error types for the decode pipeline and the correction dictionary store.

use std::path::PathBuf;

/// Error type handed back by the external collaborators (translator, renderer).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type defaulting to [`DictionaryError`].
pub type Result<T, E = DictionaryError> = std::result::Result<T, E>;

/// Failures of persisted-document I/O or parsing in the dictionary store.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("could not access dictionary file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse dictionary document: {0}")]
    Json(#[from] serde_json::Error),
}

impl DictionaryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures of the decode step.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The session's words were not split from its current source text.
    #[error("source text changed since it was last split")]
    NotSegmented,

    /// The translation collaborator failed; its error is passed through.
    #[error("translator failed: {0}")]
    Translator(#[source] BoxError),

    /// The translation collaborator returned a sequence of the wrong length.
    #[error("translator returned {actual} {stage} for {expected} inputs")]
    Misaligned {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The blocking worker running the decode panicked or was cancelled.
    #[error("decode worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// The document renderer failed; its error is passed through.
#[derive(Debug, thiserror::Error)]
#[error("renderer failed: {0}")]
pub struct RenderError(#[source] pub BoxError);

/// Failures reading or writing a binary session snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("could not encode or decode session snapshot: {0}")]
    Bincode(#[from] bincode::Error),

    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}

/// Failures loading a translation glossary.
#[derive(Debug, thiserror::Error)]
pub enum GlossaryError {
    #[error("could not read glossary '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse glossary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source and target columns of different lengths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("source has {source_len} words but target has {target_len}")]
pub struct AlignmentError {
    pub source_len: usize,
    pub target_len: usize,
}
