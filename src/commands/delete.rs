use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_session, print_notifications};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::types::EntryId;

pub async fn cmd_delete(id: EntryId, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let mut session = open_session(&config)?;
    session.delete_entry(id).await?;
    print_notifications(&mut session);

    CommandOutput::new(json!({
        "action": "deleted",
        "id": id.get(),
    }))
    .with_text(format!("Deleted {}", format!("#{id}").cyan()))
    .print(output)
}
