use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use guess_the_movie::{
    args::Args,
    catalog::HttpCatalog,
    db::{self, SqliteStore},
    storage::MemoryStore,
    ui::{self, LogBuffer},
};

fn main() -> Result<()> {
    let args = Args::parse();

    std::fs::create_dir_all(&args.log_dir)
        .with_context(|| format!("Failed to create log directory {}", args.log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(&args.log_dir, "guess-the-movie.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    info!(server = %args.server, date = ?args.date, "Starting guess-the-movie");

    let catalog = HttpCatalog::new(&args.server).context("Failed to create HTTP client")?;
    let logs = LogBuffer::new();

    let db_path = match args.db {
        Some(path) => Ok(path),
        None => db::get_db_path(),
    };

    match db_path.and_then(|path| SqliteStore::open(&path)) {
        Ok(store) => ui::run_ui(store, Box::new(catalog), args.date, logs),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "History database unavailable, playing without saving");
            logs.push(format!("History database unavailable, progress won't be saved: {err:#}"));
            ui::run_ui(MemoryStore::new(), Box::new(catalog), args.date, logs)
        }
    }
}
