use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::EntryId;

#[derive(Parser)]
#[command(name = "termbase")]
#[command(about = "Browse and edit a remote translation glossary")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format shared by all commands
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Listing parameters shared by commands that browse entries
#[derive(clap::Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Source locale (default: from config)
    #[arg(long)]
    pub src_locale: Option<String>,

    /// Translation locale to show alongside the source term
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Only entries matching this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Sort columns, e.g. "src_content,-pos"
    #[arg(short, long, allow_hyphen_values = true)]
    pub sort: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List one page of glossary entries
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        query: QueryArgs,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: u32,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show per-locale term counts
    Stats {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Create a new entry
    Create {
        /// Source term
        source: String,

        /// Translation in --locale
        #[arg(short, long)]
        translation: Option<String>,

        /// Translation comment
        #[arg(long)]
        comment: Option<String>,

        /// Part of speech
        #[arg(long)]
        pos: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Change fields of an existing entry
    Update {
        /// Entry ID
        id: EntryId,

        /// Field assignment, repeatable: src, trans, comment, pos, description
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        assignments: Vec<String>,

        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Delete an entry
    #[command(visible_alias = "rm")]
    Delete {
        /// Entry ID
        id: EntryId,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Import a po or csv glossary file
    Import {
        /// File to upload
        file: PathBuf,

        /// Locale of the translations in the file
        #[arg(short = 't', long)]
        trans_locale: String,

        /// Source locale (default: from config)
        #[arg(long)]
        src_locale: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Set a configuration value
    Set {
        /// Dotted key, e.g. server.base_url
        key: String,
        value: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}
