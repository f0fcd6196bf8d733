//! Defaults shared by the engines and the command line.
//!
//! These are compile-time constants; anything a caller wants to vary is passed
//! explicitly to the relevant constructor or query.

use crate::index::DocId;

/// First id handed out by [`crate::InvertedIndex::new`].
pub const DEFAULT_FIRST_DOC_ID: DocId = 0;

/// First id assigned by the line-per-document loader.
///
/// Differs from [`DEFAULT_FIRST_DOC_ID`] on purpose; callers that mix the two
/// must build the index with [`crate::InvertedIndex::with_first_doc_id`].
pub const LOADER_FIRST_DOC_ID: DocId = 1;

/// Number of ranked results returned when the caller does not ask for a count.
pub const DEFAULT_TOP_K: usize = 5;

/// Upper bound on autocomplete suggestions shown to a user.
pub const MAX_SUGGESTIONS: usize = 10;

/// Operator keywords recognised by the flat boolean query evaluator.
pub const OP_AND: &str = "and";
pub const OP_OR: &str = "or";
pub const OP_NOT: &str = "not";
