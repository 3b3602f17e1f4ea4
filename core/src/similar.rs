//! "More like this" over the corpus, using one record as a pseudo-query.

use crate::bm25::Bm25;
use crate::index::{CorpusIndex, DocIndex};
use crate::record::{Record, SIMILARITY_FIELDS};
use crate::tokenizer::tokenize;
use std::cmp::Ordering;

/// Score of one corpus document against a pseudo-query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateScore {
    /// The document is the query record itself and must never be returned.
    Excluded,
    Scored(f64),
}

impl CandidateScore {
    fn positive(self) -> Option<f64> {
        match self {
            CandidateScore::Scored(s) if s > 0.0 => Some(s),
            _ => None,
        }
    }

    /// Descending order with `Excluded` after every real score.
    fn rank(&self, other: &Self) -> Ordering {
        use CandidateScore::*;
        match (self, other) {
            (Excluded, Excluded) => Ordering::Equal,
            (Excluded, Scored(_)) => Ordering::Greater,
            (Scored(_), Excluded) => Ordering::Less,
            (Scored(a), Scored(b)) => b.total_cmp(a),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    doc: DocIndex,
    score: CandidateScore,
}

/// A record recommended as similar, with its BM25 score (always > 0).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult<'a> {
    pub record: &'a Record,
    pub score: f64,
}

/// Up to `limit` records of `records` most similar to `target`.
///
/// `index` must have been built from `records`. Records sharing the target's
/// id are never returned, nor is anything scoring 0. Exact score ties keep
/// corpus order.
pub fn find_similar<'a>(
    records: &'a [Record],
    index: &CorpusIndex,
    bm25: &Bm25,
    target: &Record,
    limit: usize,
) -> Vec<RankedResult<'a>> {
    let query = tokenize(&target.joined_text(SIMILARITY_FIELDS));
    if query.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<Candidate> = records
        .iter()
        .enumerate()
        .map(|(doc, r)| Candidate {
            doc,
            score: if r.id == target.id {
                CandidateScore::Excluded
            } else {
                CandidateScore::Scored(bm25.score(&query, doc, index))
            },
        })
        .collect();
    candidates.sort_by(|a, b| a.score.rank(&b.score));

    candidates
        .into_iter()
        .take(limit)
        .filter_map(|c| {
            c.score
                .positive()
                .map(|score| RankedResult { record: &records[c.doc], score })
        })
        .collect()
}
