use std::path::Path;

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_session, print_notifications};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::{Result, TermbaseError};
use crate::gateway::ImportRequest;

/// File extensions the server knows how to parse
const SUPPORTED_EXTENSIONS: [&str; 2] = ["po", "csv"];

fn check_extension(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(TermbaseError::ImportFailure(format!(
            "'{}' is not a po or csv file",
            path.display()
        ))),
    }
}

pub async fn cmd_import(
    file: &Path,
    trans_locale: &str,
    src_locale: Option<&str>,
    output: OutputOptions,
) -> Result<()> {
    check_extension(file)?;

    let config = Config::load()?;
    let src_locale = src_locale.unwrap_or(&config.locale.source).to_string();
    let request = ImportRequest::from_path(file, &src_locale, trans_locale).await?;

    let mut session = open_session(&config)?;
    session.import_file(&request).await?;
    print_notifications(&mut session);

    CommandOutput::new(json!({
        "action": "imported",
        "file": request.file_name,
        "src_locale": src_locale,
        "trans_locale": trans_locale,
        "bytes": request.contents.len(),
    }))
    .with_text(format!(
        "Imported {} ({} -> {})",
        request.file_name.cyan(),
        src_locale,
        trans_locale
    ))
    .print(output)
}
