//! Access to the remote glossary collection.
//!
//! [`GlossaryGateway`] is the seam between the sync layer and the server.
//! [`HttpGateway`] talks to the glossary REST API; tests substitute their own
//! implementation.

pub mod error;
pub mod http;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entry::GlossaryEntryDto;
use crate::error::{Result, TermbaseError};
use crate::query::PageRequest;
use crate::types::EntryId;

pub use error::ApiError;
pub use http::HttpGateway;

/// One page of entries plus the size of the whole filtered collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPage {
    #[serde(default)]
    pub results: Vec<GlossaryEntryDto>,
    #[serde(default)]
    pub total_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleDetails {
    pub locale_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Term count for one locale
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleStats {
    pub locale: LocaleDetails,
    #[serde(default)]
    pub number_of_terms: u64,
}

/// Per-locale term counts of the glossary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryStats {
    #[serde(rename = "srcLocale", default, skip_serializing_if = "Option::is_none")]
    pub src_locale: Option<LocaleStats>,
    #[serde(rename = "transLocale", default)]
    pub trans_locales: Vec<LocaleStats>,
}

impl GlossaryStats {
    /// Number of terms in `locale_id`, source or translation
    pub fn term_count(&self, locale_id: &str) -> Option<u64> {
        self.src_locale
            .iter()
            .chain(self.trans_locales.iter())
            .find(|stats| stats.locale.locale_id == locale_id)
            .map(|stats| stats.number_of_terms)
    }

    /// Locales that can be picked as translation target
    pub fn target_locales(&self) -> impl Iterator<Item = &LocaleDetails> {
        self.trans_locales.iter().map(|stats| &stats.locale)
    }
}

/// A glossary file to upload
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub file_name: String,
    pub contents: Vec<u8>,
    pub src_locale: String,
    pub trans_locale: String,
}

impl ImportRequest {
    pub async fn from_path(path: &Path, src_locale: &str, trans_locale: &str) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                TermbaseError::ImportFailure(format!("'{}' is not a file", path.display()))
            })?
            .to_string();
        let contents = tokio::fs::read(path).await?;
        Ok(Self {
            file_name,
            contents,
            src_locale: src_locale.to_string(),
            trans_locale: trans_locale.to_string(),
        })
    }
}

/// Operations on the remote glossary
pub trait GlossaryGateway: Send + Sync {
    /// Fetch one page of entries
    fn fetch_entries(
        &self,
        request: &PageRequest,
    ) -> impl std::future::Future<Output = Result<EntryPage>> + Send;

    /// Fetch per-locale term counts
    fn fetch_stats(&self) -> impl std::future::Future<Output = Result<GlossaryStats>> + Send;

    /// Create or update entries. Returns the entries as stored.
    fn save_entries(
        &self,
        entries: &[GlossaryEntryDto],
    ) -> impl std::future::Future<Output = Result<Vec<GlossaryEntryDto>>> + Send;

    fn delete_entry(&self, id: EntryId) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Upload a glossary file (po or csv)
    fn import_file(
        &self,
        request: &ImportRequest,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stats_wire_format() {
        let stats: GlossaryStats = serde_json::from_value(json!({
            "srcLocale": {
                "locale": { "localeId": "en-US", "displayName": "English (United States)" },
                "numberOfTerms": 120
            },
            "transLocale": [
                { "locale": { "localeId": "de", "displayName": "German" }, "numberOfTerms": 80 },
                { "locale": { "localeId": "ja" }, "numberOfTerms": 3 }
            ]
        }))
        .unwrap();

        assert_eq!(stats.term_count("en-US"), Some(120));
        assert_eq!(stats.term_count("ja"), Some(3));
        assert_eq!(stats.term_count("fr"), None);
        let targets: Vec<_> = stats.target_locales().map(|l| l.locale_id.as_str()).collect();
        assert_eq!(targets, vec!["de", "ja"]);
    }

    #[test]
    fn test_entry_page_wire_format() {
        let page: EntryPage = serde_json::from_value(json!({
            "results": [{ "id": 1, "srcLang": "en-US", "glossaryTerms": [] }],
            "totalCount": 1042
        }))
        .unwrap();
        assert_eq!(page.total_count, 1042);
        assert_eq!(page.results[0].id, Some(EntryId::new(1)));
    }

    #[tokio::test]
    async fn test_import_request_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("terms.csv");
        std::fs::write(&path, "en-US,de\ncat,Katze\n").unwrap();

        let request = ImportRequest::from_path(&path, "en-US", "de").await.unwrap();
        assert_eq!(request.file_name, "terms.csv");
        assert_eq!(request.contents, b"en-US,de\ncat,Katze\n");
        assert_eq!(request.trans_locale, "de");
    }
}
