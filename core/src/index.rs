use crate::record::{Record, INDEX_FIELDS};
use crate::tokenizer::tokenize;
use std::collections::{HashMap, HashSet};

pub type DocIndex = usize;

/// Corpus statistics for BM25, built once over the whole record list.
///
/// Document `i` here always describes record `i` of the slice passed to
/// [`CorpusIndex::build`]; reordering the records means building again.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    doc_tokens: Vec<Vec<String>>,
    doc_lens: Vec<u32>,
    avg_doc_len: f64,
    df: HashMap<String, u32>,
    idf: HashMap<String, f64>,
}

impl CorpusIndex {
    pub fn build(records: &[Record]) -> Self {
        let doc_tokens: Vec<Vec<String>> = records
            .iter()
            .map(|r| tokenize(&r.joined_text(INDEX_FIELDS)))
            .collect();
        let doc_lens: Vec<u32> = doc_tokens.iter().map(|t| t.len() as u32).collect();

        let n = doc_tokens.len();
        let total: u64 = doc_lens.iter().map(|&l| l as u64).sum();
        // A corpus with no tokens at all keeps a unit average so length
        // normalisation never divides by zero.
        let avg_doc_len = if total == 0 { 1.0 } else { total as f64 / n as f64 };

        let mut df: HashMap<String, u32> = HashMap::new();
        for tokens in &doc_tokens {
            let unique: HashSet<&String> = tokens.iter().collect();
            for term in unique {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let n = n as f64;
        let idf = df
            .iter()
            .map(|(term, &d)| {
                let d = d as f64;
                (term.clone(), ((n - d + 0.5) / (d + 0.5) + 1.0).ln())
            })
            .collect();

        tracing::debug!(
            num_docs = doc_tokens.len(),
            vocabulary = df.len(),
            avg_doc_len,
            "built corpus index"
        );
        Self { doc_tokens, doc_lens, avg_doc_len, df, idf }
    }

    pub fn num_docs(&self) -> usize {
        self.doc_tokens.len()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.df.len()
    }

    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }

    pub fn doc_tokens(&self, doc: DocIndex) -> Option<&[String]> {
        self.doc_tokens.get(doc).map(Vec::as_slice)
    }

    pub fn doc_len(&self, doc: DocIndex) -> Option<u32> {
        self.doc_lens.get(doc).copied()
    }

    /// Number of documents containing `term`, zero if unseen.
    pub fn df(&self, term: &str) -> u32 {
        self.df.get(term).copied().unwrap_or(0)
    }

    /// idf weight of `term`; `None` for terms the corpus never contained.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Terms ordered by descending document frequency, ties broken by term.
    pub fn top_terms(&self, n: usize) -> Vec<(&str, u32)> {
        let mut terms: Vec<(&str, u32)> = self.df.iter().map(|(t, &d)| (t.as_str(), d)).collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(n);
        terms
    }
}
