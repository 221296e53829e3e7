//! In-memory glossary server for session tests.

use std::sync::{Mutex, MutexGuard};

use termbase::config::Config;
use termbase::entry::{GlossaryEntryDto, GlossaryTermDto};
use termbase::gateway::{LocaleDetails, LocaleStats};
use termbase::{
    EntryId, EntryPage, GlossaryGateway, GlossarySession, GlossaryStats, ImportRequest,
    PageRequest, Result, TermbaseError,
};

#[derive(Default)]
pub struct MockState {
    pub entries: Vec<GlossaryEntryDto>,
    pub next_id: u64,
    pub fetches: Vec<PageRequest>,
    pub saves: Vec<Vec<GlossaryEntryDto>>,
    pub deletes: Vec<EntryId>,
    pub imports: Vec<String>,
    pub stats_calls: usize,
    pub fail_fetch: bool,
    pub fail_save: bool,
    pub fail_stats: bool,
    pub fail_delete: bool,
}

#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

pub fn dto(id: u64, source: &str, translation: Option<(&str, &str)>) -> GlossaryEntryDto {
    let mut terms = vec![GlossaryTermDto {
        content: source.to_string(),
        locale: "en-US".to_string(),
        ..Default::default()
    }];
    if let Some((locale, content)) = translation {
        terms.push(GlossaryTermDto {
            content: content.to_string(),
            locale: locale.to_string(),
            comment: Some(String::new()),
            ..Default::default()
        });
    }
    GlossaryEntryDto {
        id: Some(EntryId::new(id)),
        pos: Some(String::new()),
        description: Some(String::new()),
        src_lang: "en-US".to_string(),
        source_reference: None,
        terms_count: Some(terms.len() as u32),
        glossary_terms: terms,
    }
}

impl MockGateway {
    /// A glossary of `count` entries with ids 1..=count
    pub fn with_entries(count: u64) -> Self {
        let entries = (1..=count)
            .map(|id| dto(id, &format!("term-{id:05}"), None))
            .collect();
        Self {
            state: Mutex::new(MockState {
                entries,
                next_id: count + 1,
                ..Default::default()
            }),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn fetched_pages(&self) -> Vec<u32> {
        self.state().fetches.iter().map(|r| r.page).collect()
    }

    pub fn save_count(&self) -> usize {
        self.state().saves.len()
    }
}

fn source_content(dto: &GlossaryEntryDto) -> &str {
    dto.glossary_terms
        .iter()
        .find(|t| t.locale == dto.src_lang)
        .map(|t| t.content.as_str())
        .unwrap_or("")
}

impl GlossaryGateway for MockGateway {
    async fn fetch_entries(&self, request: &PageRequest) -> Result<EntryPage> {
        let mut state = self.state();
        state.fetches.push(request.clone());
        if state.fail_fetch {
            return Err(TermbaseError::FetchFailure("503 Service Unavailable".into()));
        }

        let matching: Vec<GlossaryEntryDto> = state
            .entries
            .iter()
            .filter(|e| request.filter.is_empty() || source_content(e).contains(&request.filter))
            .cloned()
            .collect();
        let start = (request.page as usize - 1) * request.page_size;
        let results = matching
            .iter()
            .skip(start)
            .take(request.page_size)
            .cloned()
            .collect();
        Ok(EntryPage {
            results,
            total_count: matching.len(),
        })
    }

    async fn fetch_stats(&self) -> Result<GlossaryStats> {
        let mut state = self.state();
        state.stats_calls += 1;
        if state.fail_stats {
            return Err(TermbaseError::FetchFailure("500 Internal Server Error".into()));
        }
        Ok(GlossaryStats {
            src_locale: Some(LocaleStats {
                locale: LocaleDetails {
                    locale_id: "en-US".to_string(),
                    display_name: Some("English (United States)".to_string()),
                },
                number_of_terms: state.entries.len() as u64,
            }),
            trans_locales: Vec::new(),
        })
    }

    async fn save_entries(&self, entries: &[GlossaryEntryDto]) -> Result<Vec<GlossaryEntryDto>> {
        let mut state = self.state();
        state.saves.push(entries.to_vec());
        if state.fail_save {
            return Err(TermbaseError::SaveFailure("409 Conflict".into()));
        }

        let mut saved = Vec::new();
        for entry in entries {
            let mut entry = entry.clone();
            match entry.id {
                Some(id) => {
                    if let Some(slot) = state.entries.iter_mut().find(|e| e.id == Some(id)) {
                        *slot = entry.clone();
                    }
                }
                None => {
                    entry.id = Some(EntryId::new(state.next_id));
                    state.next_id += 1;
                    state.entries.push(entry.clone());
                }
            }
            saved.push(entry);
        }
        Ok(saved)
    }

    async fn delete_entry(&self, id: EntryId) -> Result<()> {
        let mut state = self.state();
        state.deletes.push(id);
        if state.fail_delete {
            return Err(TermbaseError::DeleteFailure(id.to_string(), "404 Not Found".into()));
        }
        state.entries.retain(|e| e.id != Some(id));
        Ok(())
    }

    async fn import_file(&self, request: &ImportRequest) -> Result<()> {
        self.state().imports.push(request.file_name.clone());
        Ok(())
    }
}

/// A session over `gateway` with the default configuration
pub fn session(gateway: MockGateway) -> GlossarySession<MockGateway> {
    GlossarySession::new(gateway, &Config::default())
}
