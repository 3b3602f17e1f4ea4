//! Substring search, categorical filters and chronological ordering.

use crate::record::{Field, Record, SEARCH_FIELDS};
use crate::wareki::parse_wareki;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::str::FromStr;

pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "date-desc")]
    DateDesc,
    #[serde(rename = "date-asc")]
    DateAsc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(SortOrder::DateDesc),
            "date-asc" => Ok(SortOrder::DateAsc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// What the user typed and picked. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub text: Option<String>,
    pub right_type: Option<String>,
    pub case_type: Option<String>,
    pub result: Option<String>,
    pub sort: SortOrder,
}

impl Query {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn right_type(mut self, v: impl Into<String>) -> Self {
        self.right_type = Some(v.into());
        self
    }

    pub fn case_type(mut self, v: impl Into<String>) -> Self {
        self.case_type = Some(v.into());
        self
    }

    pub fn result(mut self, v: impl Into<String>) -> Self {
        self.result = Some(v.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

fn set(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

struct Matcher<'q> {
    needle: Option<String>,
    filters: [(Field, Option<&'q str>); 3],
}

impl<'q> Matcher<'q> {
    fn new(query: &'q Query) -> Self {
        let needle = query
            .text
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        Self {
            needle,
            filters: [
                (Field::RightType, set(&query.right_type)),
                (Field::CaseType, set(&query.case_type)),
                (Field::Result, set(&query.result)),
            ],
        }
    }

    fn matches(&self, record: &Record) -> bool {
        if let Some(needle) = &self.needle {
            let hit = SEARCH_FIELDS
                .iter()
                .filter_map(|f| record.field(*f))
                .any(|v| v.to_lowercase().contains(needle.as_str()));
            if !hit {
                return false;
            }
        }
        self.filters
            .iter()
            .all(|(field, want)| want.map_or(true, |w| record.field(*field) == Some(w)))
    }
}

/// Keep the records matching `query` and order them by decision date.
///
/// The sort is stable: records with equal dates keep their corpus order in
/// both directions. Unreadable dates count as the oldest.
pub fn search<'a>(records: &'a [Record], query: &Query) -> Vec<&'a Record> {
    let matcher = Matcher::new(query);
    let mut hits: Vec<&Record> = records.iter().filter(|r| matcher.matches(r)).collect();
    let key = |r: &&Record| parse_wareki(r.field(Field::DecisionDate));
    match query.sort {
        SortOrder::DateAsc => hits.sort_by_cached_key(key),
        SortOrder::DateDesc => hits.sort_by_cached_key(|r| Reverse(key(r))),
    }
    hits
}

/// Distinct values offered by the three categorical filters, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub right_types: Vec<String>,
    pub case_types: Vec<String>,
    pub results: Vec<String>,
}

pub fn facets(records: &[Record]) -> Facets {
    let distinct = |field: Field| -> Vec<String> {
        records
            .iter()
            .filter_map(|r| r.field(field))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    };
    Facets {
        right_types: distinct(Field::RightType),
        case_types: distinct(Field::CaseType),
        results: distinct(Field::Result),
    }
}

/// A 1-based window over an ordered result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Slice out `page` (1-based). Out-of-range pages are empty; `per_page` is
/// clamped to `1..=MAX_PER_PAGE`.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let page = page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);
    let start = ((page - 1).saturating_mul(per_page)).min(total);
    let end = start.saturating_add(per_page).min(total);
    Page { items: &items[start..end], page, per_page, total, total_pages }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(id: i64, right: &str, date: &str) -> Record {
        let mut r = Record::new(id);
        r.right_type = Some(right.into());
        r.decision_date = Some(date.into());
        r
    }

    fn ids(v: &[&Record]) -> Vec<i64> {
        v.iter().map(|r| r.id).collect()
    }

    #[test]
    fn no_query_keeps_everything_sorted_desc() {
        let records = vec![
            case(1, "特許", "平成30年1月1日"),
            case(2, "商標", "令和2年3月4日"),
            case(3, "特許", "昭和60年1月1日"),
        ];
        assert_eq!(ids(&search(&records, &Query::default())), vec![2, 1, 3]);
        let asc = Query::default().sort(SortOrder::DateAsc);
        assert_eq!(ids(&search(&records, &asc)), vec![3, 1, 2]);
    }

    #[test]
    fn text_match_is_case_insensitive_substring() {
        let mut a = Record::new(1);
        a.title = Some("Organic EL Display".into());
        let mut b = Record::new(2);
        b.case_number = Some("令和4年(行ケ)10023号".into());
        let mut c = Record::new(3);
        c.division = Some("display".into());
        let records = vec![a, b, c];

        assert_eq!(ids(&search(&records, &Query::default().text("  el disp "))), vec![1]);
        assert_eq!(ids(&search(&records, &Query::default().text("10023"))), vec![2]);
        // division is not a searched field
        assert!(search(&records, &Query::default().text("display")).iter().all(|r| r.id != 3));
    }

    #[test]
    fn blank_text_and_empty_filters_are_ignored() {
        let records = vec![case(1, "特許", ""), case(2, "商標", "")];
        let q = Query::default().text("   ").right_type("");
        assert_eq!(search(&records, &q).len(), 2);
    }

    #[test]
    fn categorical_filters_are_exact() {
        let mut r = case(1, "特許", "");
        r.case_type = Some("審決取消訴訟".into());
        r.result = Some("請求棄却".into());
        let records = vec![r, case(2, "特許権", "")];
        assert_eq!(ids(&search(&records, &Query::default().right_type("特許"))), vec![1]);
        assert_eq!(ids(&search(&records, &Query::default().result("請求棄却"))), vec![1]);
        assert!(search(&records, &Query::default().case_type("審決")).is_empty());
    }

    #[test]
    fn equal_dates_keep_corpus_order() {
        let records = vec![
            case(1, "特許", "令和1年5月1日"),
            case(2, "特許", "bad"),
            case(3, "特許", "令和1年5月1日"),
            case(4, "特許", ""),
        ];
        assert_eq!(ids(&search(&records, &Query::default())), vec![1, 3, 2, 4]);
        let asc = Query::default().sort(SortOrder::DateAsc);
        assert_eq!(ids(&search(&records, &asc)), vec![2, 4, 1, 3]);
    }

    #[test]
    fn facets_are_distinct_and_sorted() {
        let mut records = vec![case(1, "特許", ""), case(2, "商標", ""), case(3, "特許", "")];
        records[0].result = Some("認容".into());
        records[1].result = Some(String::new());
        let f = facets(&records);
        assert_eq!(f.right_types, vec!["商標".to_string(), "特許".to_string()]);
        assert_eq!(f.results, vec!["認容".to_string()]);
        assert!(f.case_types.is_empty());
    }

    #[test]
    fn sort_order_parses_web_values() {
        assert_eq!("date-asc".parse::<SortOrder>(), Ok(SortOrder::DateAsc));
        assert_eq!("date-desc".parse::<SortOrder>(), Ok(SortOrder::DateDesc));
        assert!("relevance".parse::<SortOrder>().is_err());
    }

    #[test]
    fn paginate_windows_and_clamps() {
        let items: Vec<u32> = (0..45).collect();
        let p = paginate(&items, 3, 20);
        assert_eq!(p.items, &items[40..45]);
        assert_eq!(p.total_pages, 3);

        let p = paginate(&items, 0, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 1);
        assert_eq!(p.items, &[0]);

        let p = paginate(&items, 9, 20);
        assert!(p.items.is_empty());
        assert_eq!(p.total, 45);

        let empty: Vec<u32> = Vec::new();
        assert_eq!(paginate(&empty, 1, DEFAULT_PER_PAGE).total_pages, 0);
    }
}
