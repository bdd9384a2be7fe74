//! API Handlers
//!
//! HTTP request handlers mapping each verb on `/:key` to a coordinator call.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::cache::{CacheBackend, CacheStore, MemoryCache, RedisCache};
use crate::config::{CacheBackendKind, Config, DurableBackendKind};
use crate::coordinator::{Outcome, StorageCoordinator};
use crate::durable::{DocumentBackend, DurableStore, MemoryDocuments, SqliteDocuments};
use crate::error::Result;
use crate::models::{validate_key, HealthResponse, StatsResponse, WriteRequest};

/// Application state shared across all handlers.
///
/// Holds the single long-lived coordinator; the backends inside it manage
/// their own connection sharing.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<StorageCoordinator>,
}

impl AppState {
    /// Creates a new AppState around `coordinator`.
    pub fn new(coordinator: StorageCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }

    /// Connects the configured backends and builds the coordinator.
    ///
    /// Fails if either backend cannot be reached at startup.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.backend_timeout();

        let cache: Arc<dyn CacheBackend> = match config.cache_backend {
            CacheBackendKind::Redis => Arc::new(RedisCache::connect(&config.cache_url).await?),
            CacheBackendKind::Memory => Arc::new(MemoryCache::new()),
        };

        let documents: Arc<dyn DocumentBackend> = match config.durable_backend {
            DurableBackendKind::Sqlite => Arc::new(
                SqliteDocuments::connect(&config.database_url, config.db_max_connections).await?,
            ),
            DurableBackendKind::Memory => Arc::new(MemoryDocuments::new()),
        };

        let coordinator = StorageCoordinator::new(
            CacheStore::new(cache, timeout),
            DurableStore::new(documents, timeout),
            config.replace_policy,
        );

        Ok(Self::new(coordinator))
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        let status = match self {
            Outcome::Created => StatusCode::CREATED,
            Outcome::AlreadyExists => StatusCode::CONFLICT,
            Outcome::Updated | Outcome::Ok => StatusCode::OK,
            Outcome::NotFound => StatusCode::NOT_FOUND,
        };
        (status, self.message()).into_response()
    }
}

/// Handler for POST /:key
///
/// Creates a record; 409 if the key is taken.
pub async fn create_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Outcome> {
    let req = WriteRequest::from_body(key, &body)?;
    info!("POST /{}", req.key);
    state.coordinator.create(&req.key, &req.value).await
}

/// Handler for PUT /:key
///
/// Replaces an existing record; 404 if there is none.
pub async fn replace_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Outcome> {
    let req = WriteRequest::from_body(key, &body)?;
    info!("PUT /{}", req.key);
    state.coordinator.replace(&req.key, &req.value).await
}

/// Handler for GET /:key
///
/// Returns the stored JSON value as `application/json`.
pub async fn read_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    validate_key(&key)?;
    info!("GET /{}", key);

    let response = match state.coordinator.read(&key).await? {
        Some(value) => Json(value).into_response(),
        None => Outcome::NotFound.into_response(),
    };
    Ok(response)
}

/// Handler for DELETE /:key
///
/// Always 200 unless a backend fails.
pub async fn remove_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Outcome> {
    validate_key(&key)?;
    info!("DELETE /{}", key);
    state.coordinator.remove(&key).await
}

/// Handler for GET /-/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let coordinator = &state.coordinator;
    Json(StatsResponse::new(
        &coordinator.stats(),
        coordinator.cache_backend(),
        coordinator.durable_backend(),
    ))
}

/// Handler for GET /-/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
