mod config;
mod create;
mod delete;
mod import;
mod list;
mod stats;
mod update;

pub use config::{cmd_config_set, cmd_config_show};
pub use create::{CreateOptions, cmd_create};
pub use delete::cmd_delete;
pub use import::cmd_import;
pub use list::cmd_list;
pub use stats::cmd_stats;
pub use update::{cmd_update, parse_assignment};

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::cli::{OutputOptions, QueryArgs};
use crate::config::Config;
use crate::error::Result;
use crate::gateway::{GlossaryGateway, HttpGateway};
use crate::query::UrlState;
use crate::session::GlossarySession;

/// Result of a command in both output formats
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl QueryArgs {
    /// Listing parameters in URL form, as restored by a session
    pub fn url_state(&self) -> UrlState {
        UrlState {
            src_locale: self.src_locale.clone(),
            locale: self.locale.clone(),
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            ..Default::default()
        }
    }
}

/// Open a session against the configured server
fn open_session(config: &Config) -> Result<GlossarySession<HttpGateway>> {
    let gateway = HttpGateway::from_config(config)?;
    Ok(GlossarySession::new(gateway, config))
}

/// Restore listing parameters and load the first view. Remote failures are
/// already queued as notifications and do not abort the command; callers
/// check for the pages they need.
async fn load_view<G: GlossaryGateway>(
    session: &mut GlossarySession<G>,
    url: &UrlState,
) -> Result<()> {
    match session.initial_load(url).await {
        Err(e) if e.is_remote() => {
            tracing::debug!("continuing without glossary stats: {}", e);
            Ok(())
        }
        result => result,
    }
}

/// Print queued notifications to stderr
fn print_notifications<G: GlossaryGateway>(session: &mut GlossarySession<G>) {
    for notification in session.take_notifications() {
        let color = notification.severity.color();
        let label = format!("[{}]", notification.severity);
        match notification.detail {
            Some(detail) => eprintln!(
                "{} {} {}",
                label.color(color),
                notification.message,
                detail.dimmed()
            ),
            None => eprintln!("{} {}", label.color(color), notification.message),
        }
    }
}
