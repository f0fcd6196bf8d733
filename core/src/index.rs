use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::DEFAULT_FIRST_DOC_ID;
use crate::error::{IndexError, Result};
use crate::tokenizer::tokenize_with_offset;

pub type DocId = u32;
/// Token offset within a document, counted across every line of it.
pub type Position = u32;

/// One term's occurrences in one document. `frequency == positions.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub frequency: u32,
    pub positions: Vec<Position>, // strictly increasing, encounter order
}

impl Posting {
    fn new(doc_id: DocId) -> Self {
        Self { doc_id, frequency: 0, positions: Vec::new() }
    }

    fn record(&mut self, position: Position) {
        self.positions.push(position);
        self.frequency += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub doc_id: DocId,
    /// File path for file sources, the raw text (or a caller label) otherwise.
    pub source: String,
    /// Number of indexed tokens.
    pub length: u32,
}

/// Positional inverted index.
///
/// Append-only: documents are added one at a time and never updated or removed.
/// Ids are handed out sequentially from the configured origin, so every postings
/// list is ordered by ascending document id.
#[derive(Debug)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>,
    docs: HashMap<DocId, DocumentInfo>,
    first_doc_id: DocId,
    next_doc_id: DocId,
}

impl Default for InvertedIndex {
    fn default() -> Self { Self::new() }
}

impl InvertedIndex {
    pub fn new() -> Self { Self::with_first_doc_id(DEFAULT_FIRST_DOC_ID) }

    pub fn with_first_doc_id(first_doc_id: DocId) -> Self {
        Self {
            postings: HashMap::new(),
            docs: HashMap::new(),
            first_doc_id,
            next_doc_id: first_doc_id,
        }
    }

    /// Index a file, reading it line by line.
    ///
    /// The whole file is tokenized before anything is recorded, so a file that
    /// cannot be opened, or that fails part way through, leaves the index
    /// untouched and consumes no id.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<DocId> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            tracing::warn!(path = %path.display(), error = %source, "cannot open document");
            IndexError::SourceUnreadable { path: path.to_path_buf(), source }
        })?;
        let tokens = read_tokens(BufReader::new(file)).map_err(|source| {
            tracing::warn!(path = %path.display(), error = %source, "document read failed");
            IndexError::Read { path: path.to_path_buf(), source }
        })?;
        let doc_id = self.commit(path.display().to_string(), tokens);
        tracing::debug!(doc_id, path = %path.display(), "indexed file");
        Ok(doc_id)
    }

    /// Index an in-memory document; the text itself is kept as its source.
    pub fn add_text(&mut self, text: &str) -> DocId {
        self.add_named_text(text, text)
    }

    /// Index an in-memory document under a caller-chosen source label.
    pub fn add_named_text(&mut self, source: &str, text: &str) -> DocId {
        let mut tokens = Vec::new();
        let mut next: Position = 0;
        for line in text.lines() {
            let line_tokens = tokenize_with_offset(line, next);
            next += line_tokens.len() as Position;
            tokens.extend(line_tokens);
        }
        self.commit(source.to_string(), tokens)
    }

    fn commit(&mut self, source: String, tokens: Vec<(String, Position)>) -> DocId {
        let doc_id = self.next_doc_id;
        self.next_doc_id += 1;
        let length = tokens.len() as u32;

        for (term, position) in tokens {
            let list = self.postings.entry(term).or_default();
            // ids only grow, so this document's posting, if any, is the last one
            match list.last_mut() {
                Some(p) if p.doc_id == doc_id => p.record(position),
                _ => {
                    let mut p = Posting::new(doc_id);
                    p.record(position);
                    list.push(p);
                }
            }
        }

        tracing::debug!(doc_id, tokens = length, "indexed document");
        self.docs.insert(doc_id, DocumentInfo { doc_id, source, length });
        doc_id
    }

    pub fn contains_word(&self, term: &str) -> bool {
        self.postings.get(term).is_some_and(|list| !list.is_empty())
    }

    /// Documents containing `term`, ascending by id.
    pub fn documents(&self, term: &str) -> Vec<DocId> {
        self.postings(term).iter().map(|p| p.doc_id).collect()
    }

    /// Positions of `term` in `doc_id`; empty when either is unknown.
    pub fn positions(&self, term: &str, doc_id: DocId) -> &[Position] {
        self.posting(term, doc_id).map(|p| p.positions.as_slice()).unwrap_or(&[])
    }

    pub fn frequency(&self, term: &str, doc_id: DocId) -> u32 {
        self.posting(term, doc_id).map_or(0, |p| p.frequency)
    }

    /// Read-only view of a term's postings list.
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    fn posting(&self, term: &str, doc_id: DocId) -> Option<&Posting> {
        let list = self.postings.get(term)?;
        list.binary_search_by_key(&doc_id, |p| p.doc_id)
            .ok()
            .map(|i| &list[i])
    }

    pub fn filename(&self, doc_id: DocId) -> Option<&str> {
        self.docs.get(&doc_id).map(|d| d.source.as_str())
    }

    pub fn doc_info(&self, doc_id: DocId) -> Option<&DocumentInfo> {
        self.docs.get(&doc_id)
    }

    /// All documents, ascending by id.
    pub fn doc_infos(&self) -> Vec<&DocumentInfo> {
        let mut infos: Vec<&DocumentInfo> = self.docs.values().collect();
        infos.sort_by_key(|d| d.doc_id);
        infos
    }

    pub fn doc_count(&self) -> usize { self.docs.len() }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> { self.first_doc_id..self.next_doc_id }

    pub fn first_doc_id(&self) -> DocId { self.first_doc_id }

    pub fn term_count(&self) -> usize { self.postings.len() }

    /// Vocabulary in lexicographic order.
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.postings.keys().map(String::as_str).collect();
        terms.sort_unstable();
        terms
    }
}

fn read_tokens<R: BufRead>(mut reader: R) -> std::io::Result<Vec<(String, Position)>> {
    let mut tokens = Vec::new();
    let mut next: Position = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        // Non-ASCII bytes never survive normalization, so lossy decoding is safe.
        let line = String::from_utf8_lossy(&buf);
        let line_tokens = tokenize_with_offset(&line, next);
        next += line_tokens.len() as Position;
        tokens.extend(line_tokens);
    }
    Ok(tokens)
}
