//! Backend for a dispatch register kept in Google Sheets, with attachments in Google Drive.
//!
//!
//!
//! # General Flow
//! - Client uploads the attachment first, `POST /api/upload`, and gets back a Drive link
//! - Client asks for the next free numbers, `GET /api/lastDispatchNumbers`, which rescans the sheet
//! - Client composes the dispatch number and submits the entry with the link, `POST /api/addEntry`
//! - Entry is appended to the sheet, then the cached number for its class is moved past it
//!
//!
//!
//! # Dispatch Numbers
//!
//! Letters and everything else are numbered separately. See the `ledger` crate for the formats.
//!
//! The cache lives in [`state::AppState`], one per process. It is never written to disk, the sheet
//! is the source of truth and any rescan brings the cache back in line. If numbers drift, e.g. rows
//! edited by hand, `POST /api/updateLastDispatchNumber` or the `tally` CLI force a value.
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | GET | `/api/lastDispatchNumbers` | |
//! | POST | `/api/updateLastDispatchNumber` | `{ type, newTotal }` |
//! | POST | `/api/addEntry` | `{ dispatchNumber, fileType, date?, subject?, recipient?, fileLink? }` |
//! | POST | `/api/upload` | multipart, `file` and optional `fileName` |
//! | GET | `/api/entries` | |
//! | GET | `/health` | |
//!
//!
//!
//! # Setup
//!
//! Secrets are read from `/run/secrets`, everything else from the environment.
//! ```sh
//! SPREADSHEET_ID=... DRIVE_FOLDER_ID=... RUST_LOG=info cargo run --bin dispatch
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header::CONTENT_TYPE, header::InvalidHeaderValue},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod drive;
pub mod error;
pub mod google;
pub mod routes;
pub mod sheets;
pub mod state;
pub mod utils;

use config::Config;
use routes::{
    add_entry_handler, entries_handler, health_handler, last_dispatch_numbers_handler,
    update_last_dispatch_number_handler, upload_handler,
};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Result<Router, InvalidHeaderValue> {
    let allow_origin = match state.config.cors_origin.as_str() {
        "*" => AllowOrigin::any(),
        origin => AllowOrigin::exact(HeaderValue::from_str(origin)?),
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Ok(Router::new()
        .route("/health", get(health_handler))
        .route("/api/lastDispatchNumbers", get(last_dispatch_numbers_handler))
        .route(
            "/api/updateLastDispatchNumber",
            post(update_last_dispatch_number_handler),
        )
        .route("/api/addEntry", post(add_entry_handler))
        .route("/api/entries", get(entries_handler))
        .route("/api/upload", post(upload_handler))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(cors)
        .with_state(state))
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config)?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let router = app(state)?;

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
