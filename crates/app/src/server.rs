//! HTTP surface: chat page, JSON chat endpoint, health and reload.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use medibot_core::{ChatEngine, EnrichmentSource};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

const CHAT_PAGE: &str = include_str!("../assets/index.html");

pub const EMPTY_MESSAGE_REPLY: &str = "Please enter a valid question.";

pub struct AppState<S>
where
    S: EnrichmentSource,
{
    pub engine: Arc<ChatEngine<S>>,
    pub dataset_path: Arc<PathBuf>,
}

impl<S> AppState<S>
where
    S: EnrichmentSource,
{
    pub fn new(engine: Arc<ChatEngine<S>>, dataset_path: PathBuf) -> Self {
        Self {
            engine,
            dataset_path: Arc::new(dataset_path),
        }
    }
}

impl<S> Clone for AppState<S>
where
    S: EnrichmentSource,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            dataset_path: Arc::clone(&self.dataset_path),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub medicines_loaded: usize,
    pub dataset_checksum: Option<String>,
    pub dataset_loaded_at: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub status: String,
    pub medicines_loaded: usize,
    pub dataset_checksum: Option<String>,
}

pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: EnrichmentSource + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home))
        .route("/chat", post(chat::<S>))
        .route("/health", get(health::<S>))
        .route("/reload", post(reload::<S>))
        .with_state(state)
}

pub async fn serve<S>(addr: SocketAddr, state: AppState<S>) -> anyhow::Result<()>
where
    S: EnrichmentSource + Send + Sync + 'static,
{
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "medibot listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("medibot shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(error = %error, "failed to listen for shutdown signal");
    }
}

async fn home() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

async fn chat<S>(State(state): State<AppState<S>>, Json(request): Json<ChatRequest>) -> Json<ChatResponse>
where
    S: EnrichmentSource + Send + Sync + 'static,
{
    let message = request.message.trim();
    if message.is_empty() {
        return Json(ChatResponse {
            response: EMPTY_MESSAGE_REPLY.to_string(),
        });
    }

    Json(ChatResponse {
        response: state.engine.answer(message).await,
    })
}

async fn health<S>(State(state): State<AppState<S>>) -> Json<HealthResponse>
where
    S: EnrichmentSource + Send + Sync + 'static,
{
    let knowledge = state.engine.knowledge();
    let fingerprint = knowledge.fingerprint();

    Json(HealthResponse {
        status: "healthy".to_string(),
        medicines_loaded: knowledge.len(),
        dataset_checksum: fingerprint.map(|print| print.checksum.clone()),
        dataset_loaded_at: fingerprint.map(|print| print.loaded_at.to_rfc3339()),
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn reload<S>(State(state): State<AppState<S>>) -> Response
where
    S: EnrichmentSource + Send + Sync + 'static,
{
    let engine = Arc::clone(&state.engine);
    let path = Arc::clone(&state.dataset_path);

    let outcome = tokio::task::spawn_blocking(move || engine.reload(&path)).await;

    match outcome {
        Ok(Ok(fingerprint)) => Json(ReloadResponse {
            status: "reloaded".to_string(),
            medicines_loaded: state.engine.knowledge().len(),
            dataset_checksum: fingerprint.map(|print| print.checksum),
        })
        .into_response(),
        Ok(Err(reload_error)) => {
            error!(error = %reload_error, "dataset reload failed");
            (StatusCode::UNPROCESSABLE_ENTITY, reload_error.to_string()).into_response()
        }
        Err(join_error) => {
            error!(error = %join_error, "dataset reload task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
