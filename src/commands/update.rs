use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, load_view, open_session, print_notifications};
use crate::cli::{OutputOptions, QueryArgs};
use crate::config::Config;
use crate::entry::EntryField;
use crate::error::{Result, TermbaseError};
use crate::gateway::GlossaryGateway;
use crate::session::GlossarySession;
use crate::types::{EntryId, page_offset};

/// Split `field=value`. The value may itself contain `=`.
pub fn parse_assignment(assignment: &str) -> Result<(EntryField, String)> {
    let (field, value) = assignment.split_once('=').ok_or_else(|| {
        TermbaseError::InvalidEntry(format!(
            "expected FIELD=VALUE, got '{assignment}'"
        ))
    })?;
    Ok((field.trim().parse()?, value.to_string()))
}

/// Walk pages until `id` is cached or the listing ends
async fn find_entry<G: GlossaryGateway>(
    session: &mut GlossarySession<G>,
    id: EntryId,
) -> Result<()> {
    let mut page = 1;
    loop {
        if session.query().entry(id).is_some() {
            return Ok(());
        }
        let offset = page_offset(page, session.query().page_size());
        if page > 1 && offset >= session.query().total_count() {
            return Err(TermbaseError::EntryNotLoaded(id.to_string()));
        }
        session.fetch_if_needed(offset).await;
        if !session.query().loaded_pages().contains(&page) {
            return Err(TermbaseError::FetchFailure(format!(
                "page {page} did not load"
            )));
        }
        page += 1;
    }
}

pub async fn cmd_update(
    id: EntryId,
    assignments: &[String],
    query: &QueryArgs,
    output: OutputOptions,
) -> Result<()> {
    let updates = assignments
        .iter()
        .map(|a| parse_assignment(a))
        .collect::<Result<Vec<_>>>()?;

    let config = Config::load()?;
    let mut session = open_session(&config)?;
    load_view(&mut session, &query.url_state()).await?;
    find_entry(&mut session, id).await?;

    session.select_entry(id).await?;
    for (field, value) in updates {
        session.update_field(field, value)?;
    }

    let status = session.status().unwrap_or_default();
    if !status.is_modified() {
        return CommandOutput::new(json!({
            "action": "unchanged",
            "id": id.get(),
        }))
        .with_text(format!("Entry {} unchanged", format!("#{id}").cyan()))
        .print(output);
    }

    let saved = session.save_entry().await?;
    print_notifications(&mut session);

    CommandOutput::new(json!({
        "action": "updated",
        "id": id.get(),
        "source_modified": status.is_src_modified,
        "translation_modified": status.is_trans_modified,
        "entry": saved,
    }))
    .with_text(format!(
        "Updated {} {}",
        format!("#{id}").cyan(),
        saved.source_term.content
    ))
    .print(output)
}
