use crate::record::CaseId;
use thiserror::Error;

/// Why a corpus could not be loaded. Nothing can be queried until this is resolved.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corpus must be a JSON array of records, found {0}")]
    NotAnArray(&'static str),

    #[error("record #{index} is malformed: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate case id {0}")]
    DuplicateId(CaseId),
}

/// BM25 tuning values outside the range where scores stay non-negative.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("bm25 k1 must be finite and >= 0, got {0}")]
    K1(f64),

    #[error("bm25 b must be within 0.0..=1.0, got {0}")]
    B(f64),
}
