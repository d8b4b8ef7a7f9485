use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod error;
mod mood;
mod routes;
mod store;
mod version;

use app_state::AppState;
use config::Config;
use store::Store;

// =================== Main ===================
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // init tracing from env MOODSHIFT_LOG or RUST_LOG
    let filter = std::env::var("MOODSHIFT_LOG")
        .unwrap_or_else(|_| std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::parse();
    info!(version = env!("CARGO_PKG_VERSION"), "moodshift starting up");

    let table = config.load_mood_table()?;
    info!(
        moods = table.len(),
        fallback = table.fallback(),
        source = if config.mood_table.is_some() { "file" } else { "builtin" },
        "mood table loaded"
    );
    let music_link = config.music_link()?;

    let store = Store::open(&config.data_dir)
        .with_context(|| format!("failed to open store at {}", config.data_dir.display()))?;
    if config.no_seed {
        info!("catalog seeding skipped");
    } else {
        let report = store.seed_defaults()?;
        info!(
            recommendations = report.recommendations,
            articles = report.articles,
            "catalog seeded"
        );
    }

    let state = AppState::new(table, store, music_link);
    let app = routes::build_router(state.clone()).layer(config.cors_layer());

    let addr = config.listen_addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(listen = %addr, err = ?e, "failed to bind to address");
            std::process::exit(1);
        }
    };
    info!(listen = %addr, "moodshift listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = state.store.flush() {
        error!(err = %e, "failed to flush store on shutdown");
    }
    info!("moodshift stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(err = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                error!(err = %e, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
