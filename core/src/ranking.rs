//! TF-IDF keyword ranking.
//!
//! `score(d) = Σ tf(t, d) · ln(N / df(t))` over the distinct query terms, where
//! `N` is fixed when the engine is built and is not recounted per query.

use crate::index::{DocId, InvertedIndex};
use crate::tokenizer::tokenize;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

pub struct RankingEngine<'a> {
    index: &'a InvertedIndex,
    total_documents: usize,
}

impl<'a> RankingEngine<'a> {
    pub fn new(index: &'a InvertedIndex, total_documents: usize) -> Self {
        Self { index, total_documents }
    }

    /// Capture `N` from the index as it stands now.
    pub fn from_index(index: &'a InvertedIndex) -> Self {
        Self::new(index, index.doc_count())
    }

    pub fn total_documents(&self) -> usize { self.total_documents }

    /// Rank documents for already-normalized query terms.
    ///
    /// Returns at most `top_k` hits, best first; equal scores come out in
    /// ascending document order. Terms absent from the index contribute nothing.
    pub fn keyword_search<S: AsRef<str>>(&self, terms: &[S], top_k: usize) -> Vec<ScoredDoc> {
        if top_k == 0 {
            return Vec::new();
        }
        let n = self.total_documents as f64;
        let mut seen: HashSet<&str> = HashSet::new();
        let mut scores: HashMap<DocId, f64> = HashMap::new();

        for term in terms.iter().map(|t| t.as_ref()) {
            if !seen.insert(term) {
                continue;
            }
            let postings = self.index.postings(term);
            let df = postings.len();
            if df == 0 {
                continue;
            }
            let idf = (n / df as f64).ln();
            for p in postings {
                *scores.entry(p.doc_id).or_insert(0.0) += p.positions.len() as f64 * idf;
            }
        }
        tracing::debug!(terms = seen.len(), candidates = scores.len(), top_k, "keyword search");

        // Min-heap of size k; on equal scores the higher id is evicted first.
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, Reverse<DocId>)>> =
            BinaryHeap::with_capacity(top_k.min(scores.len()) + 1);
        for (doc_id, score) in scores {
            heap.push(Reverse((OrderedFloat(score), Reverse(doc_id))));
            if heap.len() > top_k {
                heap.pop();
            }
        }
        let mut results: Vec<ScoredDoc> = heap
            .into_iter()
            .map(|Reverse((s, Reverse(doc_id)))| ScoredDoc { doc_id, score: s.0 })
            .collect();
        results.sort_unstable_by(|a, b| {
            OrderedFloat(b.score)
                .cmp(&OrderedFloat(a.score))
                .then(a.doc_id.cmp(&b.doc_id))
        });
        results
    }

    /// Tokenize a free-text query and rank it.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<ScoredDoc> {
        self.keyword_search(&tokenize(query), top_k)
    }
}
