//! Document sources for the command line.
//!
//! Neither function tokenizes anything; indexing is the core's job once it has
//! the path or the text.

use anyhow::{Context, Result};
use memsearch_core::DocId;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub id: DocId,
    pub text: String,
}

/// Read `path` and turn every non-empty line into a document, numbering them
/// from `first_id` in file order.
pub fn load_lines(path: &Path, first_id: DocId) -> Result<Vec<LoadedDocument>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading document lines from {}", path.display()))?;
    let docs: Vec<LoadedDocument> = content
        .lines()
        .filter(|line| !line.is_empty())
        .zip(first_id..)
        .map(|(line, id)| LoadedDocument { id, text: line.to_string() })
        .collect();
    tracing::info!(path = %path.display(), docs = docs.len(), first_id, "loaded line documents");
    Ok(docs)
}

/// Expand inputs into a sorted, de-duplicated list of files. Directories are
/// walked recursively; unreadable entries are logged and skipped.
pub fn collect_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input) {
                match entry {
                    Ok(e) if e.file_type().is_file() => files.push(e.into_path()),
                    Ok(_) => {}
                    Err(err) => tracing::warn!(error = %err, "skipping directory entry"),
                }
            }
        } else {
            // missing paths are kept so indexing reports them
            files.push(input.clone());
        }
    }
    files.sort();
    files.dedup();
    files
}
