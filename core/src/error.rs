use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures surfaced while ingesting a document source.
///
/// Lookups of unknown terms, prefixes or documents are not errors and never
/// produce one of these.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("cannot open document source {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed reading document source {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl IndexError {
    pub fn path(&self) -> &Path {
        match self {
            IndexError::SourceUnreadable { path, .. } | IndexError::Read { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
