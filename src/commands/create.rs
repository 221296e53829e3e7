use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_session, print_notifications};
use crate::cli::{OutputOptions, QueryArgs};
use crate::config::Config;
use crate::entry::EntryField;
use crate::error::{Result, TermbaseError};

/// Field values for a new entry
#[derive(Debug, Default)]
pub struct CreateOptions {
    pub source: String,
    pub translation: Option<String>,
    pub comment: Option<String>,
    pub pos: Option<String>,
    pub description: Option<String>,
}

pub async fn cmd_create(
    options: CreateOptions,
    query: &QueryArgs,
    output: OutputOptions,
) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(src) = &query.src_locale {
        config.locale.source = src.clone();
    }
    if query.locale.is_some() {
        config.locale.target = query.locale.clone();
    }
    if (options.translation.is_some() || options.comment.is_some())
        && config.locale.target.is_none()
    {
        return Err(TermbaseError::InvalidEntry(
            "a translation needs a target locale (--locale)".to_string(),
        ));
    }

    let mut session = open_session(&config)?;
    let mut entry = session.new_entry();
    entry.set_field(EntryField::SourceContent, options.source)?;
    let fields = [
        (EntryField::TargetContent, options.translation),
        (EntryField::TargetComment, options.comment),
        (EntryField::PartOfSpeech, options.pos),
        (EntryField::Description, options.description),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            entry.set_field(field, value)?;
        }
    }

    let saved = session.create_entry(entry).await?;
    print_notifications(&mut session);

    let id = saved.id.map(|id| id.get());
    CommandOutput::new(json!({
        "action": "created",
        "id": id,
        "entry": saved,
    }))
    .with_text(format!(
        "Created {} {}",
        id.map(|id| format!("#{id}")).unwrap_or_default().cyan(),
        saved.source_term.content
    ))
    .print(output)
}
