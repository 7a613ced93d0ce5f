//! faqdesk binary — thin CLI shell over the [`faqdesk_server`] library crate.

use axum::{routing::get, routing::post, Router};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use faqdesk_core::corpus::FaqCorpus;
use faqdesk_core::search::FaqIndex;
use faqdesk_server::api::*;
use faqdesk_server::feedback::FeedbackLog;
use faqdesk_server::session::SessionStore;
use faqdesk_server::types::AppState;

// ---------------------------------------------------------------------------
// CLI definition (clap derive)
// ---------------------------------------------------------------------------

/// FAQ search server — fuzzy + TF-IDF search, autocomplete, and feedback over HTTP.
#[derive(Parser)]
#[command(name = "faqdesk", version, about, long_about = None)]
struct Cli {
    /// Path to the FAQ corpus file
    #[arg(long, default_value = "faqs.json")]
    faqs: PathBuf,

    /// Path to the feedback log file
    #[arg(long, default_value = "feedback.log")]
    feedback_log: PathBuf,

    /// Path to the web UI dist directory (optional)
    #[arg(long)]
    dist: Option<PathBuf>,

    /// Bind to 0.0.0.0 instead of 127.0.0.1 (localhost)
    #[arg(long)]
    bind_all: bool,
}

// ---------------------------------------------------------------------------
// Graceful shutdown signal
// ---------------------------------------------------------------------------

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received SIGINT, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for Ctrl+C");
        info!("Received Ctrl+C, shutting down...");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("faqdesk_server=info".parse().unwrap())
                .add_directive("faqdesk_core=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Build the FAQ index once at startup
    let corpus = FaqCorpus::load(&cli.faqs).unwrap_or_else(|e| {
        error!(path = %cli.faqs.display(), error = %e, "Could not load FAQ corpus");
        std::process::exit(1);
    });
    let index = FaqIndex::build(&corpus);
    info!(entries = index.len(), "FAQ index ready");

    let feedback = FeedbackLog::open(&cli.feedback_log).unwrap_or_else(|e| {
        error!(path = %cli.feedback_log.display(), error = %e, "Could not open feedback log");
        std::process::exit(1);
    });

    let state = Arc::new(AppState {
        index,
        sessions: SessionStore::new(),
        feedback,
        corpus_path: cli.faqs.clone(),
    });

    // API routes
    let mut app = Router::new()
        .route("/health", get(api_health))
        .route("/search", post(api_search))
        .route("/suggestions", post(api_suggestions))
        .route("/feedback", post(api_feedback));

    // Optional static web UI
    if let Some(dist_dir) = &cli.dist {
        let index_html = dist_dir.join("index.html");
        if index_html.exists() {
            info!(dist = %dist_dir.display(), "Serving web UI");
            app = app.fallback_service(
                ServeDir::new(dist_dir).not_found_service(ServeFile::new(&index_html)),
            );
        } else {
            warn!(dist = %dist_dir.display(), "No index.html in dist directory — skipping web UI");
        }
    }

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(Arc::clone(&state));

    // Bind address: 127.0.0.1 by default, --bind-all for 0.0.0.0
    let bind_addr = if cli.bind_all { "0.0.0.0" } else { "127.0.0.1" };

    let explicit_port: Option<u16> = std::env::var("PORT").ok().and_then(|p| p.parse().ok());

    let listener = if let Some(port) = explicit_port {
        tokio::net::TcpListener::bind(format!("{bind_addr}:{port}")).await.unwrap_or_else(|e| {
            error!(port = port, error = %e, "Could not bind to port");
            eprintln!("  PORT={port} was set explicitly. Choose a different port.");
            std::process::exit(1);
        })
    } else {
        // Auto-scan: try 5000..=5009
        const BASE: u16 = 5000;
        const RANGE: u16 = 10;
        let mut found = None;
        for port in BASE..BASE + RANGE {
            match tokio::net::TcpListener::bind(format!("{bind_addr}:{port}")).await {
                Ok(l) => {
                    found = Some(l);
                    break;
                }
                Err(_) => continue,
            }
        }
        found.unwrap_or_else(|| {
            error!(range_start = BASE, range_end = BASE + RANGE - 1, "No free port found");
            eprintln!("  Try: PORT=<port> faqdesk");
            std::process::exit(1);
        })
    };

    let port = listener.local_addr().expect("listener has a local address").port();

    // Session cleanup: prune sessions idle for 30 minutes, every 5 minutes
    let prune_state = Arc::clone(&state);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            let pruned = prune_state.sessions.prune_idle(std::time::Duration::from_secs(1800));
            if pruned > 0 {
                debug!(pruned, remaining = prune_state.sessions.len(), "Pruned idle sessions");
            }
        }
    });

    info!(port = port, "http://localhost:{port}");
    // Machine-readable line for scripts (not through tracing)
    eprintln!("FAQDESK_PORT={port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}
