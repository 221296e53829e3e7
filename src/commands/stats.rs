use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::gateway::{GlossaryGateway, GlossaryStats, HttpGateway, LocaleStats};

#[derive(Tabled)]
struct LocaleRow {
    #[tabled(rename = "Locale")]
    locale: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Terms")]
    terms: u64,
}

impl From<&LocaleStats> for LocaleRow {
    fn from(stats: &LocaleStats) -> Self {
        Self {
            locale: stats.locale.locale_id.clone(),
            name: stats.locale.display_name.clone().unwrap_or_default(),
            terms: stats.number_of_terms,
        }
    }
}

fn format_stats(stats: &GlossaryStats) -> String {
    let mut text = String::new();
    match &stats.src_locale {
        Some(src) => text.push_str(&format!(
            "{} {} ({} terms)\n\n",
            "Source:".cyan().bold(),
            src.locale.locale_id,
            src.number_of_terms
        )),
        None => text.push_str(&format!(
            "{} {}\n\n",
            "Source:".cyan().bold(),
            "glossary is empty".dimmed()
        )),
    }

    if stats.trans_locales.is_empty() {
        text.push_str(&format!("{}", "No translations yet.".dimmed()));
    } else {
        let rows: Vec<LocaleRow> = stats.trans_locales.iter().map(LocaleRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        text.push_str(&table.to_string());
    }
    text
}

/// Show per-locale term counts
pub async fn cmd_stats(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let gateway = HttpGateway::from_config(&config)?;
    let stats = gateway.fetch_stats().await?;

    let json_output = json!({
        "src_locale": stats.src_locale.as_ref().map(|s| json!({
            "locale": s.locale.locale_id,
            "name": s.locale.display_name,
            "terms": s.number_of_terms,
        })),
        "trans_locales": stats.trans_locales.iter().map(|s| json!({
            "locale": s.locale.locale_id,
            "name": s.locale.display_name,
            "terms": s.number_of_terms,
        })).collect::<Vec<_>>(),
    });

    CommandOutput::new(json_output)
        .with_text(format_stats(&stats))
        .print(output)
}
