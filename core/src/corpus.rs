use crate::bm25::{Bm25, Bm25Params};
use crate::error::LoadError;
use crate::filter::{self, Facets, Query};
use crate::index::CorpusIndex;
use crate::load;
use crate::record::{CaseId, Record};
use crate::similar::{self, RankedResult};
use std::collections::HashMap;
use std::path::Path;

/// The loaded case list together with its BM25 index.
///
/// Immutable once built: every query borrows it read-only, so one instance
/// can be shared across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<Record>,
    by_id: HashMap<CaseId, usize>,
    index: CorpusIndex,
    bm25: Bm25,
}

impl Corpus {
    pub fn new(records: Vec<Record>) -> Result<Self, LoadError> {
        Self::with_params(records, Bm25Params::default())
    }

    pub fn with_params(records: Vec<Record>, params: Bm25Params) -> Result<Self, LoadError> {
        let mut by_id = HashMap::with_capacity(records.len());
        for (pos, r) in records.iter().enumerate() {
            if by_id.insert(r.id, pos).is_some() {
                return Err(LoadError::DuplicateId(r.id));
            }
        }
        let index = CorpusIndex::build(&records);
        tracing::info!(num_docs = records.len(), vocabulary = index.vocabulary_len(), "corpus ready");
        Ok(Self { records, by_id, index, bm25: Bm25::new(params) })
    }

    pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
        Self::new(load::records_from_str(s)?)
    }

    pub fn open<P: AsRef<Path>>(path: P, params: Bm25Params) -> Result<Self, LoadError> {
        Self::with_params(load::load_records_file(path)?, params)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn bm25(&self) -> &Bm25 {
        &self.bm25
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: CaseId) -> Option<&Record> {
        self.by_id.get(&id).map(|&pos| &self.records[pos])
    }

    pub fn search(&self, query: &Query) -> Vec<&Record> {
        filter::search(&self.records, query)
    }

    pub fn facets(&self) -> Facets {
        filter::facets(&self.records)
    }

    pub fn find_similar(&self, target: &Record, limit: usize) -> Vec<RankedResult<'_>> {
        similar::find_similar(&self.records, &self.index, &self.bm25, target, limit)
    }

    /// Similar cases for a case of this corpus; `None` when `id` is unknown.
    pub fn find_similar_by_id(&self, id: CaseId, limit: usize) -> Option<Vec<RankedResult<'_>>> {
        let target = self.get(id)?;
        Some(self.find_similar(target, limit))
    }
}
