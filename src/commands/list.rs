use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, load_view, open_session, print_notifications};
use crate::cli::{OutputOptions, QueryArgs};
use crate::config::Config;
use crate::entry::Entry;
use crate::error::{Result, TermbaseError};
use crate::notification::Severity;
use crate::types::page_offset;

/// Longest cell shown before truncation
const MAX_CELL_WIDTH: usize = 40;

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Translation")]
    translation: String,
    #[tabled(rename = "POS")]
    pos: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Locales")]
    terms: u32,
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_CELL_WIDTH {
        let cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        text.to_string()
    }
}

impl From<&Entry> for EntryRow {
    fn from(entry: &Entry) -> Self {
        let translation = entry
            .target_term
            .as_ref()
            .map(|t| t.content.as_str())
            .unwrap_or("");
        Self {
            id: entry.id.map(|id| id.to_string()).unwrap_or_default(),
            source: truncate(&entry.source_term.content),
            translation: truncate(translation),
            pos: entry.part_of_speech.clone(),
            description: truncate(&entry.description),
            terms: entry.terms_count,
        }
    }
}

/// List one page of entries
pub async fn cmd_list(query: &QueryArgs, page: u32, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let mut session = open_session(&config)?;

    let mut url = query.url_state();
    url.page = Some(page.max(1));
    load_view(&mut session, &url).await?;

    let page = page.max(1);
    if !session.query().loaded_pages().contains(&page) {
        let detail = session
            .notifications()
            .iter()
            .rev()
            .find(|n| n.severity == Severity::Error)
            .and_then(|n| n.detail.clone())
            .unwrap_or_else(|| format!("page {page} did not load"));
        return Err(TermbaseError::FetchFailure(detail));
    }
    print_notifications(&mut session);

    let query_state = session.query();
    let start = page_offset(page, query_state.page_size());
    let end = (start + query_state.page_size()).min(query_state.total_count());
    let entries: Vec<&Entry> = (start..end).filter_map(|i| session.entry_at(i)).collect();

    let json_output = json!({
        "page": page,
        "total_count": query_state.total_count(),
        "src_locale": query_state.src_locale(),
        "locale": query_state.target_locale(),
        "entries": entries,
    });

    let mut text = String::new();
    if entries.is_empty() {
        text.push_str("No glossary entries found.");
    } else {
        let rows: Vec<EntryRow> = entries.iter().map(|e| EntryRow::from(*e)).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        text.push_str(&table.to_string());
        text.push_str(&format!(
            "\n{}",
            format!(
                "Entries {}-{} of {} (page {})",
                start + 1,
                start + entries.len(),
                query_state.total_count(),
                page
            )
            .dimmed()
        ));
    }

    CommandOutput::new(json_output).with_text(text).print(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Term;
    use crate::types::EntryId;

    #[test]
    fn test_row_from_entry_without_translation() {
        let entry = Entry {
            id: Some(EntryId::new(9)),
            source_term: Term {
                content: "x".repeat(60),
                locale: "en-US".to_string(),
                ..Default::default()
            },
            part_of_speech: "noun".to_string(),
            ..Default::default()
        };
        let row = EntryRow::from(&entry);
        assert_eq!(row.id, "9");
        assert_eq!(row.translation, "");
        assert_eq!(row.source.chars().count(), MAX_CELL_WIDTH);
        assert!(row.source.ends_with('…'));
    }
}
