//! `cardexport` - vCard exporter
//!
//! Reads contacts or call history from a JSON record file or a SQLite
//! address book and writes them as vCard 2.1/3.0 in the chosen dialect.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod export;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardexport_core::{AddressBook, ExportMode, ExportOptions, MemorySource, Profile, Selection};

use cli::Args;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?.merge(&args);

    let default_filter = if config.debug_mode {
        "cardexport=debug,cardexport_core=debug"
    } else {
        "cardexport=info,cardexport_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut profile = Profile::from_tag(&config.dialect)?;
    if let Some(charset) = &config.charset {
        profile = profile.with_charset(charset)?;
    }

    let source = if let Some(db) = &args.db {
        let path = db.to_str().context("database path is not valid UTF-8")?;
        AddressBook::new(path)
            .await
            .with_context(|| format!("failed to open address book {path}"))?
            .snapshot()
            .await?
    } else if let Some(input) = &args.input {
        MemorySource::load(input)
            .with_context(|| format!("failed to load records from {}", input.display()))?
    } else {
        bail!("either --input or --db is required");
    };

    let mode = if args.call_log {
        ExportMode::CallLog
    } else {
        ExportMode::Contacts
    };
    let selection = Selection {
        ids: (!args.ids.is_empty()).then(|| args.ids.clone()),
        since_millis: args.since,
    };
    let mut options = ExportOptions::builder().strict_errors(config.strict_errors);
    if let Some(limit) = config.max_photo_bytes {
        options = options.max_photo_bytes(limit);
    }
    let options = options.build();

    info!(
        dialect = %profile.kind,
        ?mode,
        output = %config.output_path.display(),
        "Starting export"
    );

    let cancel = Arc::new(AtomicBool::new(false));
    let signal_flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_flag.store(true, Ordering::Relaxed);
        }
    });

    let output = config.output_path.clone();
    let summary = tokio::task::spawn_blocking(move || {
        export::run_export(source, profile, options, mode, &selection, &output, &cancel)
    })
    .await
    .context("export task panicked")??;

    info!(
        selected = summary.selected,
        processed = summary.processed,
        cancelled = summary.cancelled,
        "Export finished"
    );
    Ok(())
}
