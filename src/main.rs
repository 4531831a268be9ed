use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use dustbuster::{config, logging, Cleaner, RuntimeOptions};

/// Reclaims disk space from platform temp and cache directories.
#[derive(Parser, Debug)]
#[command(name = "dustbuster", version)]
struct Cli {
    /// Report planned removals without deleting anything.
    #[arg(long)]
    dry_run: bool,

    /// Clean targets concurrently.
    #[arg(long)]
    parallel: bool,

    /// Cap the number of concurrently cleaned targets.
    #[arg(long, value_name = "N")]
    concurrency: Option<NonZeroUsize>,

    /// Additional directory to clean; repeatable.
    #[arg(long = "dir", value_name = "PATH")]
    dirs: Vec<PathBuf>,

    /// Directory to exclude from cleanup; repeatable.
    #[arg(long = "exclude", value_name = "PATH")]
    exclusions: Vec<PathBuf>,

    /// Configuration file, or a directory of configuration files.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Preset to load, by name or path.
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Only remove entries older than this (30m, 12h, 5d; plain numbers
    /// are hours).
    #[arg(long, value_name = "AGE")]
    max_age: Option<String>,

    /// Log an aggregate summary when the run finishes.
    #[arg(long)]
    summary: bool,

    /// Confirm each target interactively, with a size preview.
    #[arg(long)]
    preview: bool,

    /// Append every status line to this file.
    #[arg(long = "log", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Run the privileged deep-clean collaborator after the pass (Windows).
    #[arg(long)]
    deep: bool,

    /// Resolve configuration sources and exit without cleaning.
    #[arg(long)]
    validate: bool,

    /// Print the configuration JSON Schema and exit.
    #[arg(long)]
    config_schema: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.config_schema {
        println!("{}", serde_json::to_string_pretty(&config::config_schema())?);
        return Ok(());
    }

    let mut options = RuntimeOptions::new();

    // Config sources apply first; flags override them below.
    if let Some(path) = &cli.config {
        config::resolve_config(path)?.apply(&mut options);
    }
    if let Some(reference) = &cli.preset {
        config::resolve_named_preset(reference)?.apply(&mut options);
    }
    if cli.validate {
        println!("configuration OK");
        return Ok(());
    }

    if cli.dry_run {
        options.dry_run = true;
    }
    if cli.parallel {
        options.parallel = true;
    }
    if let Some(cap) = cli.concurrency {
        options.set_concurrency(Some(cap.get()));
    }
    for dir in &cli.dirs {
        options.add_dir(dir);
    }
    for dir in &cli.exclusions {
        options.add_exclusion(dir);
    }
    if let Some(age) = &cli.max_age {
        options.max_age = Some(config::parse_duration(age).ok_or_else(|| {
            anyhow::anyhow!("invalid --max-age \"{age}\"; use 30m, 12h, 5d, or a number of hours")
        })?);
    }
    if cli.summary {
        options.summary = true;
    }
    if cli.preview {
        options.interactive_preview = true;
    }
    if let Some(path) = &cli.log_file {
        options.log_file = Some(path.clone());
    }
    if cli.deep {
        options.deep_clean = true;
    }

    logging::init(options.log_file.as_deref())?;

    let mut cleaner = Cleaner::new(options);
    let report = cleaner.run().await;

    if !report.totals.permission_denied.is_empty() {
        tracing::warn!(
            "{} path(s) could not be removed for lack of permissions; re-run with elevated rights",
            report.totals.permission_denied.len()
        );
    }
    Ok(())
}
