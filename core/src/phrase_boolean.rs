//! Exact phrase matching over positional postings, plus set-algebra boolean
//! queries over document sets.
//!
//! Term-list operations look terms up verbatim; pass them through
//! [`crate::tokenizer::tokenize`] first when they come from user input. The
//! `*_query`/`boolean_search` entry points do that themselves.

use std::collections::{BTreeSet, HashSet};

use crate::config::{OP_AND, OP_NOT, OP_OR};
use crate::index::{DocId, InvertedIndex, Position};
use crate::tokenizer::{normalize, tokenize};

/// Operator of the flat boolean query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
    Not,
}

impl BooleanOp {
    /// Recognise an operator keyword, ignoring ASCII case.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case(OP_AND) {
            Some(BooleanOp::And)
        } else if token.eq_ignore_ascii_case(OP_OR) {
            Some(BooleanOp::Or)
        } else if token.eq_ignore_ascii_case(OP_NOT) {
            Some(BooleanOp::Not)
        } else {
            None
        }
    }

    fn apply(self, mut acc: BTreeSet<DocId>, docs: &BTreeSet<DocId>) -> BTreeSet<DocId> {
        match self {
            BooleanOp::And => acc.retain(|d| docs.contains(d)),
            BooleanOp::Or => acc.extend(docs.iter().copied()),
            BooleanOp::Not => acc.retain(|d| !docs.contains(d)),
        }
        acc
    }
}

pub struct PhraseBooleanEngine<'a> {
    index: &'a InvertedIndex,
}

impl<'a> PhraseBooleanEngine<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self { Self { index } }

    /// Documents in which `terms` occur as a contiguous, ordered run.
    pub fn phrase_search<S: AsRef<str>>(&self, terms: &[S]) -> Vec<DocId> {
        let Some((first, rest)) = terms.split_first() else {
            return Vec::new();
        };
        let candidates = self.index.postings(first.as_ref());

        let matches: Vec<DocId> = candidates
            .iter()
            .filter(|posting| {
                let mut frontier = posting.positions.to_vec();
                for term in rest {
                    let next = self.index.positions(term.as_ref(), posting.doc_id);
                    frontier = advance_frontier(&frontier, next);
                    if frontier.is_empty() {
                        return false;
                    }
                }
                true
            })
            .map(|posting| posting.doc_id)
            .collect();

        tracing::debug!(terms = terms.len(), candidates = candidates.len(), matches = matches.len(), "phrase search");
        matches
    }

    /// Tokenize a free-text phrase and match it.
    pub fn phrase_query(&self, phrase: &str) -> Vec<DocId> {
        self.phrase_search(&tokenize(phrase))
    }

    /// Documents containing every term. No terms, no documents.
    pub fn boolean_and<S: AsRef<str>>(&self, terms: &[S]) -> Vec<DocId> {
        let Some((first, rest)) = terms.split_first() else {
            return Vec::new();
        };
        let mut result = self.doc_set(first.as_ref());
        for term in rest {
            if result.is_empty() {
                break;
            }
            result = BooleanOp::And.apply(result, &self.doc_set(term.as_ref()));
        }
        result.into_iter().collect()
    }

    /// Documents containing at least one term.
    pub fn boolean_or<S: AsRef<str>>(&self, terms: &[S]) -> Vec<DocId> {
        terms
            .iter()
            .flat_map(|t| self.index.documents(t.as_ref()))
            .collect::<BTreeSet<DocId>>()
            .into_iter()
            .collect()
    }

    /// Ids in `0..total_docs` whose document does not contain `term`.
    ///
    /// The universe comes from the caller, not from the index.
    pub fn boolean_not(&self, term: &str, total_docs: DocId) -> Vec<DocId> {
        let excluded: HashSet<DocId> = self.index.documents(term).into_iter().collect();
        (0..total_docs)
            .filter(|d| !excluded.contains(d))
            .collect()
    }

    /// Evaluate a flat query such as `apple and banana not mango`.
    ///
    /// Strictly left to right, no precedence and no grouping. An operator
    /// keyword replaces the current operator (initially AND), which stays in
    /// effect until the next keyword. The first term seeds the result; each
    /// later term is combined into it with the current operator.
    pub fn boolean_search(&self, query: &str) -> Vec<DocId> {
        let mut op = BooleanOp::And;
        let mut result: Option<BTreeSet<DocId>> = None;

        for raw in query.split_whitespace() {
            if let Some(next) = BooleanOp::parse(raw) {
                op = next;
                continue;
            }
            let term = normalize(raw);
            if term.is_empty() {
                continue;
            }
            let docs = self.doc_set(&term);
            result = Some(match result {
                None => docs,
                Some(acc) => op.apply(acc, &docs),
            });
        }

        let result: Vec<DocId> = result.map(|s| s.into_iter().collect()).unwrap_or_default();
        tracing::debug!(query, matches = result.len(), "boolean search");
        result
    }

    fn doc_set(&self, term: &str) -> BTreeSet<DocId> {
        self.index.documents(term).into_iter().collect()
    }
}

/// Positions in `next` that directly follow some position in `frontier`.
/// Both inputs are sorted ascending, so a single merge pass suffices.
fn advance_frontier(frontier: &[Position], next: &[Position]) -> Vec<Position> {
    let mut out = Vec::new();
    let mut i = 0;
    for &q in next {
        while i < frontier.len() && frontier[i] + 1 < q {
            i += 1;
        }
        if i == frontier.len() {
            break;
        }
        if frontier[i] + 1 == q {
            out.push(q);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> InvertedIndex {
        let mut idx = InvertedIndex::new();
        idx.add_text("the cat sat on the mat");
        idx.add_text("the dog sat on the log");
        idx.add_text("on the mat the cat sat");
        idx
    }

    #[test]
    fn frontier_merge() {
        assert_eq!(advance_frontier(&[0, 4, 9], &[1, 3, 5, 10]), vec![1, 5, 10]);
        assert!(advance_frontier(&[2], &[0, 1, 2]).is_empty());
        assert!(advance_frontier(&[], &[1]).is_empty());
    }

    #[test]
    fn phrase_requires_adjacency_and_order() {
        let idx = corpus();
        let engine = PhraseBooleanEngine::new(&idx);
        assert_eq!(engine.phrase_search(&["sat", "on"]), vec![0, 1]);
        assert_eq!(engine.phrase_search(&["the", "cat", "sat"]), vec![0, 2]);
        assert_eq!(engine.phrase_search(&["on", "the", "mat"]), vec![0, 2]);
        assert!(engine.phrase_search(&["cat", "the"]).is_empty());
        assert!(engine.phrase_search(&["cat", "on"]).is_empty());
    }

    #[test]
    fn phrase_edge_cases() {
        let idx = corpus();
        let engine = PhraseBooleanEngine::new(&idx);
        assert!(engine.phrase_search::<&str>(&[]).is_empty());
        assert!(engine.phrase_search(&["missing", "cat"]).is_empty());
        assert!(engine.phrase_search(&["cat", "missing"]).is_empty());
        assert_eq!(engine.phrase_search(&["dog"]), vec![1]);
        assert_eq!(engine.phrase_query("The Cat, sat!"), vec![0, 2]);
    }

    #[test]
    fn phrase_with_repeated_term() {
        let mut idx = InvertedIndex::new();
        idx.add_text("no no yes");
        idx.add_text("no yes no");
        let engine = PhraseBooleanEngine::new(&idx);
        assert_eq!(engine.phrase_search(&["no", "no"]), vec![0]);
        assert_eq!(engine.phrase_search(&["no", "no", "yes"]), vec![0]);
    }

    #[test]
    fn and_or_not() {
        let idx = corpus();
        let engine = PhraseBooleanEngine::new(&idx);
        assert!(engine.boolean_and(&["cat", "dog"]).is_empty());
        assert_eq!(engine.boolean_and(&["sat"]), vec![0, 1, 2]);
        assert_eq!(engine.boolean_or(&["dog", "cat"]), vec![0, 1, 2]);
        assert_eq!(engine.boolean_or(&["log", "missing"]), vec![1]);
        assert_eq!(engine.boolean_not("cat", 3), vec![1]);
        assert_eq!(engine.boolean_not("cat", 5), vec![1, 3, 4]);
    }

    #[test]
    fn boolean_degenerate_inputs() {
        let idx = corpus();
        let engine = PhraseBooleanEngine::new(&idx);
        assert!(engine.boolean_and::<&str>(&[]).is_empty());
        assert!(engine.boolean_or::<&str>(&[]).is_empty());
        assert_eq!(engine.boolean_not("missing", 3), vec![0, 1, 2]);
        assert!(engine.boolean_not("cat", 0).is_empty());
    }

    #[test]
    fn not_universe_reaches_high_origin_ids() {
        let mut idx = InvertedIndex::with_first_doc_id(1_000);
        idx.add_text("cat");
        idx.add_text("dog");
        let engine = PhraseBooleanEngine::new(&idx);
        let not = engine.boolean_not("cat", 1_002);
        assert_eq!(not.len(), 1_001);
        assert_eq!(not.last(), Some(&1_001));
        assert!(!not.contains(&1_000));
    }

    #[test]
    fn operator_keywords() {
        assert_eq!(BooleanOp::parse("AND"), Some(BooleanOp::And));
        assert_eq!(BooleanOp::parse("or"), Some(BooleanOp::Or));
        assert_eq!(BooleanOp::parse("Not"), Some(BooleanOp::Not));
        assert_eq!(BooleanOp::parse("nothing"), None);
    }

    #[test]
    fn flat_query_is_left_to_right() {
        let mut idx = InvertedIndex::new();
        idx.add_text("apple banana");
        idx.add_text("apple mango");
        idx.add_text("banana cherry");
        idx.add_text("cherry");
        let engine = PhraseBooleanEngine::new(&idx);

        assert_eq!(engine.boolean_search("apple AND banana"), vec![0]);
        assert_eq!(engine.boolean_search("apple banana"), vec![0]);
        assert_eq!(engine.boolean_search("apple OR cherry"), vec![0, 1, 2, 3]);
        assert_eq!(engine.boolean_search("apple NOT mango"), vec![0]);
        // (apple or cherry) and banana, not apple or (cherry and banana)
        assert_eq!(engine.boolean_search("apple or cherry and banana"), vec![0, 2]);
        // the operator stays in effect for later terms
        assert_eq!(engine.boolean_search("apple or banana cherry"), vec![0, 1, 2, 3]);
        // a later keyword overrides an earlier one
        assert_eq!(engine.boolean_search("apple and or cherry"), vec![0, 1, 2, 3]);
    }

    #[test]
    fn flat_query_degenerate() {
        let idx = corpus();
        let engine = PhraseBooleanEngine::new(&idx);
        assert!(engine.boolean_search("").is_empty());
        assert!(engine.boolean_search("and or not").is_empty());
        assert!(engine.boolean_search("123 !!").is_empty());
        assert_eq!(engine.boolean_search("Cat,"), vec![0, 2]);
    }
}
