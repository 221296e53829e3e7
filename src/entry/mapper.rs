//! Conversion between [`Entry`] and the glossary REST wire format.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::types::EntryId;

use super::{Entry, Term};

/// Display format for modification dates
const SHORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A glossary entry as sent to and received from the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryEntryDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub src_lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_reference: Option<String>,
    #[serde(default)]
    pub glossary_terms: Vec<GlossaryTermDto>,
    /// Terms across all locales, source included. Server-populated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_count: Option<u32>,
}

/// One term of a wire entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTermDto {
    pub content: String,
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<WireDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
}

/// The server sends dates either as epoch milliseconds or as RFC 3339 text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireDate {
    Millis(i64),
    Text(String),
}

impl WireDate {
    /// Short display form, or `None` for an empty date. Text the parser does
    /// not understand is shown as-is.
    pub fn to_display(&self) -> Option<String> {
        match self {
            WireDate::Millis(ms) => Timestamp::from_millisecond(*ms)
                .ok()
                .map(|ts| ts.strftime(SHORT_DATE_FORMAT).to_string()),
            WireDate::Text(text) if text.trim().is_empty() => None,
            WireDate::Text(text) => Some(
                text.parse::<Timestamp>()
                    .map(|ts| ts.strftime(SHORT_DATE_FORMAT).to_string())
                    .unwrap_or_else(|_| text.clone()),
            ),
        }
    }
}

fn trim_opt(value: &str) -> String {
    value.trim().to_string()
}

/// Build the wire term. Returns `None` when there is no term or its locale
/// is empty, which is what separates "no translation yet" from an empty
/// translation.
fn term_to_dto(term: Option<&Term>, trim_content: bool) -> Option<GlossaryTermDto> {
    let term = term?;
    if term.locale.is_empty() {
        return None;
    }

    let comment = if term.content.is_empty() {
        None
    } else {
        term.comment.as_deref().map(trim_opt)
    };

    Some(GlossaryTermDto {
        content: if trim_content {
            trim_opt(&term.content)
        } else {
            term.content.clone()
        },
        locale: term.locale.clone(),
        comment,
        last_modified_date: None,
        last_modified_by: None,
    })
}

/// Convert an entry into its create/update wire form.
///
/// Source content is sent untrimmed; translation content is trimmed.
pub fn to_dto(entry: &Entry) -> GlossaryEntryDto {
    let glossary_terms = [
        term_to_dto(Some(&entry.source_term), false),
        term_to_dto(entry.target_term.as_ref(), true),
    ]
    .into_iter()
    .flatten()
    .collect();

    GlossaryEntryDto {
        id: entry.id,
        pos: Some(trim_opt(&entry.part_of_speech)),
        description: Some(trim_opt(&entry.description)),
        src_lang: entry.source_term.locale.clone(),
        source_reference: entry.source_term.reference.clone(),
        glossary_terms,
        terms_count: None,
    }
}

fn term_from_dto(dto: &GlossaryTermDto) -> Term {
    Term {
        content: dto.content.clone(),
        locale: dto.locale.clone(),
        comment: dto.comment.clone(),
        reference: None,
        last_modified: dto.last_modified_date.as_ref().and_then(WireDate::to_display),
        last_modified_by: dto.last_modified_by.clone(),
    }
}

fn find_term<'a>(terms: &'a [GlossaryTermDto], locale: &str) -> Option<&'a GlossaryTermDto> {
    terms.iter().find(|t| t.locale == locale)
}

/// Convert a wire entry into an [`Entry`] for the given target locale.
///
/// A missing translation becomes an empty term for `target_locale`, so the
/// editor always has something to type into while a locale is selected.
pub fn from_wire(dto: &GlossaryEntryDto, target_locale: Option<&str>) -> Entry {
    let mut source_term = match find_term(&dto.glossary_terms, &dto.src_lang) {
        Some(term) => term_from_dto(term),
        None => {
            tracing::warn!(
                "glossary entry {:?} has no term for its source locale '{}'",
                dto.id,
                dto.src_lang
            );
            Term {
                comment: None,
                ..Term::empty(&dto.src_lang)
            }
        }
    };
    source_term.reference = dto.source_reference.clone();

    let target_term = target_locale
        .filter(|locale| !locale.is_empty())
        .map(|locale| match find_term(&dto.glossary_terms, locale) {
            Some(term) => {
                let mut term = term_from_dto(term);
                term.comment.get_or_insert_with(String::new);
                term
            }
            None => Term::empty(locale),
        });

    Entry {
        id: dto.id,
        source_term,
        target_term,
        part_of_speech: dto.pos.clone().unwrap_or_default(),
        description: dto.description.clone().unwrap_or_default(),
        terms_count: dto.terms_count.unwrap_or(0).saturating_sub(1),
    }
}

/// A fresh, unsaved entry in `src_locale`
pub fn empty_entry(src_locale: &str) -> Entry {
    Entry {
        source_term: Term::empty(src_locale),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cat_entry() -> Entry {
        Entry {
            id: Some(EntryId::new(7)),
            source_term: Term {
                content: "cat".to_string(),
                locale: "en-US".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_to_dto_without_target_has_one_term() {
        let dto = to_dto(&cat_entry());
        assert_eq!(dto.glossary_terms.len(), 1);
        assert_eq!(dto.glossary_terms[0].content, "cat");
        assert_eq!(dto.src_lang, "en-US");
        assert_eq!(dto.id, Some(EntryId::new(7)));
    }

    #[test]
    fn test_to_dto_trims_translation_but_not_source() {
        let mut entry = cat_entry();
        entry.source_term.content = " cat ".to_string();
        entry.part_of_speech = " noun ".to_string();
        entry.description = "  animal\n".to_string();
        entry.target_term = Some(Term {
            content: " Katze ".to_string(),
            locale: "de".to_string(),
            comment: Some(" feminine ".to_string()),
            ..Default::default()
        });

        let dto = to_dto(&entry);
        assert_eq!(dto.pos.as_deref(), Some("noun"));
        assert_eq!(dto.description.as_deref(), Some("animal"));
        assert_eq!(dto.glossary_terms[0].content, " cat ");
        assert_eq!(dto.glossary_terms[1].content, "Katze");
        assert_eq!(dto.glossary_terms[1].comment.as_deref(), Some("feminine"));
    }

    #[test]
    fn test_to_dto_omits_term_with_empty_locale() {
        let mut entry = cat_entry();
        entry.target_term = Some(Term::empty(""));
        assert_eq!(to_dto(&entry).glossary_terms.len(), 1);
    }

    #[test]
    fn test_to_dto_keeps_empty_translation_and_drops_its_comment() {
        let mut entry = cat_entry();
        entry.target_term = Some(Term {
            comment: Some("note".to_string()),
            ..Term::empty("de")
        });
        let dto = to_dto(&entry);
        assert_eq!(dto.glossary_terms.len(), 2);
        assert_eq!(dto.glossary_terms[1].content, "");
        assert_eq!(dto.glossary_terms[1].comment, None);
    }

    #[test]
    fn test_to_dto_json_shape() {
        let mut entry = cat_entry();
        entry.source_term.reference = Some("ISO 1087".to_string());
        let value = serde_json::to_value(to_dto(&entry)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "pos": "",
                "description": "",
                "srcLang": "en-US",
                "sourceReference": "ISO 1087",
                "glossaryTerms": [{ "content": "cat", "locale": "en-US" }]
            })
        );
    }

    #[test]
    fn test_from_wire_locates_terms_by_locale() {
        let dto: GlossaryEntryDto = serde_json::from_value(json!({
            "id": 3,
            "pos": "noun",
            "description": "a pet",
            "srcLang": "en-US",
            "sourceReference": "dict",
            "termsCount": 3,
            "glossaryTerms": [
                { "content": "Hund", "locale": "de", "lastModifiedDate": "2024-01-05T10:00:00Z" },
                { "content": "dog", "locale": "en-US", "comment": "canine" },
                { "content": "chien", "locale": "fr" }
            ]
        }))
        .unwrap();

        let entry = from_wire(&dto, Some("de"));
        assert_eq!(entry.source_term.content, "dog");
        assert_eq!(entry.source_term.reference.as_deref(), Some("dict"));
        let target = entry.target_term.unwrap();
        assert_eq!(target.content, "Hund");
        assert_eq!(target.comment.as_deref(), Some(""));
        assert_eq!(target.last_modified.as_deref(), Some("2024-01-05"));
        assert_eq!(entry.terms_count, 2);
        assert_eq!(entry.part_of_speech, "noun");
    }

    #[test]
    fn test_from_wire_missing_translation_becomes_empty_term() {
        let dto = to_dto(&cat_entry());
        let entry = from_wire(&dto, Some("ja"));
        let target = entry.target_term.unwrap();
        assert_eq!(target.locale, "ja");
        assert_eq!(target.content, "");
    }

    #[test]
    fn test_from_wire_without_target_locale() {
        let dto = to_dto(&cat_entry());
        assert!(from_wire(&dto, None).target_term.is_none());
        assert!(from_wire(&dto, Some("")).target_term.is_none());
    }

    #[test]
    fn test_from_wire_terms_count_never_negative() {
        let mut dto = to_dto(&cat_entry());
        dto.terms_count = Some(0);
        assert_eq!(from_wire(&dto, None).terms_count, 0);
        dto.terms_count = None;
        assert_eq!(from_wire(&dto, None).terms_count, 0);
    }

    #[test]
    fn test_round_trip_preserves_editable_source_fields() {
        let mut entry = cat_entry();
        entry.part_of_speech = "noun".to_string();
        entry.description = "small domesticated feline".to_string();
        entry.source_term.content = "cat ".to_string();

        let back = from_wire(&to_dto(&entry), None);
        assert_eq!(back.source_term.content, entry.source_term.content);
        assert_eq!(back.part_of_speech, entry.part_of_speech);
        assert_eq!(back.description, entry.description);
    }

    #[test]
    fn test_wire_date_display() {
        assert_eq!(
            WireDate::Millis(1_704_448_800_000).to_display().as_deref(),
            Some("2024-01-05")
        );
        assert_eq!(WireDate::Text(String::new()).to_display(), None);
        assert_eq!(
            WireDate::Text("yesterday".to_string()).to_display().as_deref(),
            Some("yesterday")
        );
    }

    #[test]
    fn test_empty_entry() {
        let entry = empty_entry("en-US");
        assert!(entry.is_new());
        assert_eq!(entry.source_term.locale, "en-US");
        assert!(entry.target_term.is_none());
    }
}
