//! Relevance ranking and retrieval over a fixed corpus of IP court decisions.

pub mod bm25;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod index;
pub mod load;
pub mod record;
pub mod similar;
pub mod tokenizer;
pub mod wareki;

pub use bm25::{Bm25, Bm25Params};
pub use corpus::Corpus;
pub use error::{LoadError, ParamError};
pub use filter::{facets, paginate, search, Facets, Page, Query, SortOrder};
pub use index::{CorpusIndex, DocIndex};
pub use load::ensure_unique_ids;
pub use record::{CaseId, Field, Record, INDEX_FIELDS, SEARCH_FIELDS, SIMILARITY_FIELDS};
pub use similar::{find_similar, CandidateScore, RankedResult};
pub use wareki::{parse_wareki, DecisionDate};
