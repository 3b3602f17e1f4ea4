//! BM25 scoring over a [`CorpusIndex`].

use crate::error::ParamError;
use crate::index::{CorpusIndex, DocIndex};
use std::collections::HashMap;

pub const DEFAULT_K1: f64 = 1.5;
pub const DEFAULT_B: f64 = 0.75;

/// Term-frequency saturation (`k1`) and length normalisation (`b`).
///
/// Only constructible with `k1 >= 0` and `0 <= b <= 1`, both finite; outside
/// that range a short document can score below zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    k1: f64,
    b: f64,
}

impl Bm25Params {
    pub fn new(k1: f64, b: f64) -> Result<Self, ParamError> {
        if !k1.is_finite() || k1 < 0.0 {
            return Err(ParamError::K1(k1));
        }
        if !b.is_finite() || !(0.0..=1.0).contains(&b) {
            return Err(ParamError::B(b));
        }
        Ok(Self { k1, b })
    }

    pub fn k1(&self) -> f64 {
        self.k1
    }

    pub fn b(&self) -> f64 {
        self.b
    }
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: DEFAULT_K1, b: DEFAULT_B }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Bm25 {
    params: Bm25Params,
}

impl Bm25 {
    pub fn new(params: Bm25Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> Bm25Params {
        self.params
    }

    /// Score `query` against document `doc` of `index`.
    ///
    /// Query terms are summed one by one, so a repeated query term counts
    /// again. Terms missing from the document or the corpus add nothing, and
    /// the result is never negative. An unknown `doc` scores 0.
    pub fn score(&self, query: &[String], doc: DocIndex, index: &CorpusIndex) -> f64 {
        let (Some(tokens), Some(doc_len)) = (index.doc_tokens(doc), index.doc_len(doc)) else {
            return 0.0;
        };
        if query.is_empty() || tokens.is_empty() {
            return 0.0;
        }

        let mut tf: HashMap<&str, u32> = HashMap::new();
        for t in tokens {
            *tf.entry(t.as_str()).or_insert(0) += 1;
        }

        let Bm25Params { k1, b } = self.params;
        let norm = k1 * (1.0 - b + b * (doc_len as f64 / index.avg_doc_len()));

        let mut score = 0.0;
        for term in query {
            let Some(&freq) = tf.get(term.as_str()) else { continue };
            let idf = index.idf(term).unwrap_or(0.0);
            let freq = freq as f64;
            score += idf * (freq * (k1 + 1.0)) / (freq + norm);
        }
        score
    }
}
