use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("invalid theme: {0}")]
    InvalidTheme(String),

    #[error("invalid mode: {0}")]
    InvalidMode(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("transcript file is empty: {path}")]
    EmptyTranscriptFile { path: PathBuf },

    #[error("transcript file is not valid UTF-8: {path}")]
    NonUtf8TranscriptFile { path: PathBuf },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
