use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use docseek_core::config::ProviderKind;
use docseek_core::error::ErrorPayload;
use docseek_core::{AppConfig, DocSeek, DocseekError};

use crate::cli::{Cli, Commands};


pub(crate) fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if cli.offline {
        config.provider.kind = ProviderKind::Offline;
    }
    run_from_root(&cli.root, config, cli.command)
}

pub(crate) fn run_from_root(root: &Path, config: AppConfig, command: Commands) -> Result<()> {
    let app = DocSeek::open(root, config)
        .with_context(|| format!("failed to open index at {}", root.display()))?;
    let mut stdout = io::stdout().lock();
    execute(&app, command, &mut stdout)
}

fn execute(app: &DocSeek, command: Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Index(args) => {
            let report = app
                .index_folder(&args.folder)
                .with_context(|| format!("failed to index {}", args.folder.display()))?;
            write_json(out, &report)?;
        }
        Commands::Search(args) => {
            let results = app.search(&args.query, args.limit)?;
            write_json(out, &results)?;
        }
        Commands::List(args) => {
            let documents = app.documents(args.limit)?;
            write_json(out, &documents)?;
        }
        Commands::Remove(args) => {
            let removed = app.remove(&args.path)?;
            write_json(
                out,
                &serde_json::json!({
                    "path": args.path,
                    "removed": removed,
                }),
            )?;
        }
        Commands::Prune => {
            let removed = app.prune_missing()?;
            write_json(out, &serde_json::json!({ "removed": removed }))?;
        }
        Commands::Status => {
            write_json(out, &app.status()?)?;
        }
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Maps a failed command to the core error payload. The innermost
/// `DocseekError` supplies the code; the message keeps the whole context chain.
pub(crate) fn error_payload(
    err: &anyhow::Error,
    operation: &str,
    path: Option<String>,
) -> ErrorPayload {
    let mut payload = match err
        .chain()
        .find_map(|cause| cause.downcast_ref::<DocseekError>())
    {
        Some(core) => core.to_payload(operation, path),
        None => DocseekError::Internal(err.to_string()).to_payload(operation, path),
    };
    payload.message = format!("{err:#}");
    payload
}

pub(crate) fn write_error(out: &mut impl Write, payload: &ErrorPayload) -> Result<()> {
    serde_json::to_writer(&mut *out, payload)?;
    writeln!(out)?;
    Ok(())
}
