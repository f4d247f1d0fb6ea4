//! Design Sync server: refresh/webhook trigger surface and one-shot CLI.
//!
//! Modes:
//!   ds-server                       serve HTTP on `PORT`
//!   ds-server --sync                fetch, write artifacts, exit
//!   ds-server --from-file <path>    same, from a downloaded file JSON
//!   ds-server --download <path>     save the raw file JSON and summarize it

mod routes;

use ds_core::model::{SourceDocument, decode_json};
use ds_core::summary::DocumentSummary;
use ds_sync::{
    BroadcastNotifier, LocalFileSource, LogNotifier, Pipeline, RemoteSource, SourceProvider,
    SyncConfig,
};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

type CliResult = Result<(), Box<dyn Error + Send + Sync>>;

const USAGE: &str = "usage: ds-server [--sync | --from-file <path> | --download <path>]";

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match SyncConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ds-server: invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let args: Vec<String> = std::env::args().collect();
    let result = match args.get(1).map(|s| s.as_str()) {
        None => serve(config).await,
        Some("--sync") => match RemoteSource::new(&config) {
            Ok(source) => sync_once(config, &source).await,
            Err(e) => Err(e.into()),
        },
        Some(flag @ ("--from-file" | "--download")) => {
            let Some(path) = args.get(2) else {
                eprintln!("ds-server {flag}: missing <path>");
                eprintln!("{USAGE}");
                std::process::exit(2);
            };
            if flag == "--download" {
                download(&config, Path::new(path)).await
            } else {
                sync_once(config, &LocalFileSource::new(path)).await
            }
        }
        Some("-h" | "--help") => {
            println!("{USAGE}");
            return;
        }
        Some(other) => {
            eprintln!("ds-server: unknown argument '{other}'");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

// ── `--sync` / `--from-file` ─────────────────────────────────────────────

async fn sync_once(config: SyncConfig, source: &dyn SourceProvider) -> CliResult {
    let pipeline = Pipeline::new(config).with_notifier(Arc::new(LogNotifier));
    let report = pipeline.sync(source).await?;

    if let Some(reason) = &report.outcome.degraded {
        log::warn!(
            "artifacts were generated from MOCK data ({}: {})",
            reason.kind,
            reason.message
        );
    }
    if !report.write.changed() {
        log::info!("tokens unchanged, nothing rewritten");
    }
    Ok(())
}

// ── `--download` ─────────────────────────────────────────────────────────

async fn download(config: &SyncConfig, path: &Path) -> CliResult {
    let source = RemoteSource::new(config)?;
    let raw = source.fetch_raw().await?;

    let pretty = serde_json::to_string_pretty(&raw)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &pretty).await?;
    log::info!("saved file JSON to {}", path.display());

    let document: SourceDocument = decode_json(pretty.as_bytes())?;
    log::info!("{}", DocumentSummary::of(&document));
    Ok(())
}

// ── Server mode ──────────────────────────────────────────────────────────

async fn serve(config: SyncConfig) -> CliResult {
    if !config.has_credentials() {
        log::warn!("no access token or file key configured; every sync will use mock data");
    }
    if config.webhook_secret.is_none() {
        log::warn!("no webhook secret configured; webhook signatures are NOT verified");
    }

    let port = config.port;
    let source = Arc::new(RemoteSource::new(&config)?);
    let notifier = BroadcastNotifier::default();
    let pipeline = Pipeline::new(config).with_notifier(Arc::new(notifier.clone()));
    let app = routes::router(routes::AppState::new(pipeline, source, notifier));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    log::info!("design sync server listening on port {port}");
    log::info!("  manual sync: http://localhost:{port}/sync-tokens");
    log::info!("  webhook:     http://localhost:{port}/figma-webhook");
    log::info!("  events:      http://localhost:{port}/events");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("shutting down");
        })
        .await?;
    Ok(())
}
