//! Retouch server - HTTP surface for the transform engine.
//!
//! Exposes three routes over a filesystem-backed engine:
//! - `POST /upload_image`: multipart upload gate for source images
//! - `POST /edit_image`: one transform request, JSON in / JSON out
//! - `GET /uploads/:name`: serves stored image bytes for the editor

mod routes;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use retouch_core::{FsStore, TransformEngine};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use routes::AppState;

/// Maximum accepted request body, uploads included.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Parser)]
#[command(name = "retouch-server", about = "Image transform service")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:5000")]
    listen: SocketAddr,

    /// Directory holding uploaded and edited images.
    #[arg(long, default_value = "uploads")]
    storage_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let store = FsStore::new(&args.storage_dir)?;
    let state = AppState {
        engine: Arc::new(TransformEngine::new(store)),
    };

    let app = app(state);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("listening on {}", args.listen);
    axum::serve(listener, app).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/edit_image", post(routes::edit_image))
        .route("/upload_image", post(routes::upload_image))
        .route("/uploads/:name", get(routes::get_upload))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
