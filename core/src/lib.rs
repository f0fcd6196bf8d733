//! In-memory text retrieval: a positional inverted index with TF-IDF ranking,
//! exact phrase and boolean evaluation, and prefix autocomplete.
//!
//! The index is built once through `add_*` calls and then shared by reference
//! with the query engines, which only ever read it.

pub mod config;
pub mod error;
pub mod index;
pub mod phrase_boolean;
pub mod ranking;
pub mod tokenizer;
pub mod trie;

pub use error::{IndexError, Result};
pub use index::{DocId, DocumentInfo, InvertedIndex, Position, Posting};
pub use phrase_boolean::{BooleanOp, PhraseBooleanEngine};
pub use ranking::{RankingEngine, ScoredDoc};
pub use trie::TrieEngine;
