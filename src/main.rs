use clap::Parser;
use std::process::ExitCode;

use termbase::cli::{Cli, Commands, ConfigAction};
use termbase::commands::{
    CreateOptions, cmd_config_set, cmd_config_show, cmd_create, cmd_delete, cmd_import, cmd_list,
    cmd_stats, cmd_update,
};

/// Log to stderr so `--json` output on stdout stays parseable
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "termbase=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List {
            query,
            page,
            output,
        } => cmd_list(&query, page, output).await,
        Commands::Stats { output } => cmd_stats(output).await,
        Commands::Create {
            source,
            translation,
            comment,
            pos,
            description,
            query,
            output,
        } => {
            cmd_create(
                CreateOptions {
                    source,
                    translation,
                    comment,
                    pos,
                    description,
                },
                &query,
                output,
            )
            .await
        }
        Commands::Update {
            id,
            assignments,
            query,
            output,
        } => cmd_update(id, &assignments, &query, output).await,
        Commands::Delete { id, output } => cmd_delete(id, output).await,
        Commands::Import {
            file,
            trans_locale,
            src_locale,
            output,
        } => cmd_import(&file, &trans_locale, src_locale.as_deref(), output).await,
        Commands::Config { action } => match action {
            ConfigAction::Show { output } => cmd_config_show(output),
            ConfigAction::Set { key, value, output } => cmd_config_set(&key, &value, output),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
