//! HTTP server assembly for Agora.
//!
//! Combines the JSON API from `agora-api` with a health route and request
//! tracing, backed by any [`ForumStore`].

use std::{path::PathBuf, sync::Arc};

use agora_core::store::ForumStore;
use agora_store_sqlite::DEFAULT_POOL_SIZE;
use axum::{Router, routing::get};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, layered from defaults, `config.toml` and
/// `AGORA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default = "default_pool_size")]
  pub pool_size:  usize,
}

fn default_pool_size() -> usize { DEFAULT_POOL_SIZE }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: ForumStore + 'static,
{
  Router::new()
    .route("/test", get(health))
    .merge(agora_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "Server API is working" }
