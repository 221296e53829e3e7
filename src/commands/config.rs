//! Configuration commands for managing termbase settings.
//!
//! - `config set`: Set a configuration value
//! - `config show`: Display current configuration

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{Config, ENV_AUTH_TOKEN, ENV_BASE_URL};
use crate::error::{Result, TermbaseError};

/// Keys whose values are never echoed back
const SENSITIVE_KEYS: [&str; 1] = ["auth.token"];

/// Reject underscore-for-dot mistakes such as `server_base_url`
fn validate_config_key(key: &str) -> Result<&str> {
    if !key.contains('.') {
        return Err(TermbaseError::Config(format!(
            "invalid config key '{key}'. Use dot notation, e.g. 'server.base_url'"
        )));
    }
    Ok(key)
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

fn or_unset(value: Option<&str>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "not configured".dimmed().to_string(),
    }
}

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let credentials = config.credentials();
    let base_url = config.base_url().ok().map(|u| u.to_string());

    let json_output = json!({
        "server": {
            "base_url": base_url,
            "api_root": config.server.api_root,
            "timeout": config.server.timeout,
        },
        "auth": {
            "user": credentials.as_ref().map(|c| c.user.clone()),
            "configured": credentials.is_some(),
        },
        "locale": {
            "source": config.locale.source,
            "target": config.locale.target,
        },
        "prefetch": {
            "debounce_ms": config.prefetch.debounce_ms,
            "threshold": config.prefetch.threshold,
        },
        "cache": {
            "max_pages": config.cache.max_pages.map(|n| n.get()),
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text.push_str(&format!("{}:\n", "server".cyan()));
    text.push_str(&format!("  base_url: {}\n", or_unset(base_url.as_deref())));
    text.push_str(&format!("  api_root: {}\n", config.server.api_root));
    text.push_str(&format!("  timeout: {}s\n\n", config.server.timeout));

    // never print the token itself
    text.push_str(&format!("{}:\n", "auth".cyan()));
    match &credentials {
        Some(c) => text.push_str(&format!(
            "  user: {}\n  token: {}\n\n",
            c.user,
            "configured".green()
        )),
        None => text.push_str(&format!("  {}\n\n", "not configured".dimmed())),
    }

    text.push_str(&format!("{}:\n", "locale".cyan()));
    text.push_str(&format!("  source: {}\n", config.locale.source));
    text.push_str(&format!(
        "  target: {}\n\n",
        or_unset(config.locale.target.as_deref())
    ));

    text.push_str(&format!("{}:\n", "prefetch".cyan()));
    text.push_str(&format!("  debounce_ms: {}\n", config.prefetch.debounce_ms));
    text.push_str(&format!("  threshold: {}\n\n", config.prefetch.threshold));

    text.push_str(&format!("{}:\n", "cache".cyan()));
    text.push_str(&format!(
        "  max_pages: {}\n\n",
        config
            .cache
            .max_pages
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unbounded".dimmed().to_string())
    ));

    text.push_str(&format!(
        "{}",
        format!(
            "Config file: {} ({ENV_BASE_URL} and {ENV_AUTH_TOKEN} override it)",
            Config::config_path().display()
        )
        .dimmed()
    ));

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;

    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = if SENSITIVE_KEYS.contains(&key) {
        mask_sensitive_value(value)
    } else {
        value.to_string()
    };

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), shown))
    .print(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_key() {
        assert!(validate_config_key("server.base_url").is_ok());
        assert!(validate_config_key("server_base_url").is_err());
    }

    #[test]
    fn test_mask_sensitive_value() {
        assert_eq!(mask_sensitive_value("abcdefgh"), "ab...gh");
        assert_eq!(mask_sensitive_value("abc"), "****");
    }
}
