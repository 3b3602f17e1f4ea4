use serde::{Deserialize, Serialize};

pub type CaseId = i64;

/// One court decision as exported to `metadata.json`.
///
/// Text attributes are optional; the exporter historically wrote `""` for
/// missing columns, so an empty string is treated the same as `None` by
/// [`Record::field`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: CaseId,
    #[serde(rename = "hatsumei_meisho", default)]
    pub title: Option<String>,
    #[serde(rename = "soten", default)]
    pub claim_point: Option<String>,
    #[serde(rename = "genkoku", default)]
    pub plaintiff: Option<String>,
    #[serde(rename = "hikoku", default)]
    pub defendant: Option<String>,
    #[serde(rename = "jiken_shubetsu", default)]
    pub case_type: Option<String>,
    #[serde(rename = "kenri_shubetsu", default)]
    pub right_type: Option<String>,
    #[serde(rename = "jiken_shurui", default)]
    pub case_kind: Option<String>,
    #[serde(rename = "hanketsu_kekka", default)]
    pub result: Option<String>,
    #[serde(rename = "jiken_bango", default)]
    pub case_number: Option<String>,
    #[serde(rename = "saiban_nengappi", default)]
    pub decision_date: Option<String>,
    #[serde(rename = "bumei", default)]
    pub division: Option<String>,
    #[serde(rename = "pdf_url", default)]
    pub document_url: Option<String>,
}

/// Text attributes that can be selected for indexing, similarity or search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    ClaimPoint,
    Plaintiff,
    Defendant,
    CaseType,
    RightType,
    CaseKind,
    Result,
    CaseNumber,
    DecisionDate,
    Division,
    DocumentUrl,
}

/// Fields concatenated into each document of the corpus index.
pub const INDEX_FIELDS: &[Field] = &[
    Field::Title,
    Field::ClaimPoint,
    Field::Plaintiff,
    Field::Defendant,
    Field::CaseType,
    Field::RightType,
];

/// Fields used to build the pseudo-query for similar cases. Party names are
/// left out so similarity follows the substance of the dispute.
pub const SIMILARITY_FIELDS: &[Field] = &[Field::Title, Field::ClaimPoint, Field::RightType];

/// Fields scanned by the free-text substring filter.
pub const SEARCH_FIELDS: &[Field] = &[
    Field::Title,
    Field::CaseNumber,
    Field::Plaintiff,
    Field::Defendant,
    Field::ClaimPoint,
    Field::RightType,
    Field::CaseType,
];

impl Record {
    /// A record with only an identifier; mostly useful for building fixtures.
    pub fn new(id: CaseId) -> Self {
        Self {
            id,
            title: None,
            claim_point: None,
            plaintiff: None,
            defendant: None,
            case_type: None,
            right_type: None,
            case_kind: None,
            result: None,
            case_number: None,
            decision_date: None,
            division: None,
            document_url: None,
        }
    }

    /// Returns the field's text, or `None` when it is absent or empty.
    pub fn field(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Title => &self.title,
            Field::ClaimPoint => &self.claim_point,
            Field::Plaintiff => &self.plaintiff,
            Field::Defendant => &self.defendant,
            Field::CaseType => &self.case_type,
            Field::RightType => &self.right_type,
            Field::CaseKind => &self.case_kind,
            Field::Result => &self.result,
            Field::CaseNumber => &self.case_number,
            Field::DecisionDate => &self.decision_date,
            Field::Division => &self.division,
            Field::DocumentUrl => &self.document_url,
        };
        value.as_deref().filter(|s| !s.is_empty())
    }

    /// Joins the selected fields with a single space, absent fields contributing
    /// an empty segment.
    pub fn joined_text(&self, fields: &[Field]) -> String {
        fields
            .iter()
            .map(|f| self.field(*f).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Display title: invention name, falling back to the case number.
    pub fn display_title(&self) -> &str {
        self.field(Field::Title)
            .or_else(|| self.field(Field::CaseNumber))
            .unwrap_or("（タイトルなし）")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_read_as_absent() {
        let mut r = Record::new(1);
        r.title = Some(String::new());
        r.claim_point = Some("進歩性".into());
        assert_eq!(r.field(Field::Title), None);
        assert_eq!(r.field(Field::ClaimPoint), Some("進歩性"));
    }

    #[test]
    fn joined_text_keeps_field_order() {
        let mut r = Record::new(1);
        r.title = Some("発光装置".into());
        r.right_type = Some("特許".into());
        assert_eq!(r.joined_text(SIMILARITY_FIELDS), "発光装置  特許");
    }

    #[test]
    fn deserializes_export_field_names() {
        let json = r#"{"id": 7, "hatsumei_meisho": "X", "kenri_shubetsu": "特許", "pdf_url": ""}"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, 7);
        assert_eq!(r.title.as_deref(), Some("X"));
        assert_eq!(r.right_type.as_deref(), Some("特許"));
        assert_eq!(r.field(Field::DocumentUrl), None);
        assert_eq!(r.plaintiff, None);
    }

    #[test]
    fn display_title_falls_back_to_case_number() {
        let mut r = Record::new(1);
        r.case_number = Some("令和2年(行ケ)10001号".into());
        assert_eq!(r.display_title(), "令和2年(行ケ)10001号");
    }
}
