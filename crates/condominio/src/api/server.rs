//! In-memory announcements backend.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{NewAnnouncement, RemoteAnnouncement, ANNOUNCEMENTS_PATH};
use crate::error::Result;

/// Shared state of the backend: the announcement list.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    announcements: Arc<RwLock<Vec<RemoteAnnouncement>>>,
}

impl AppState {
    /// Empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored announcements, oldest first.
    pub async fn snapshot(&self) -> Vec<RemoteAnnouncement> {
        self.announcements.read().await.clone()
    }
}

/// Routes of the backend bound to `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route(
            ANNOUNCEMENTS_PATH,
            get(list_handler).post(create_handler),
        )
        .with_state(state)
}

/// Listen on `addr` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Announcements backend listening on {}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

async fn home_handler() -> &'static str {
    "Backend is running"
}

async fn list_handler(State(state): State<AppState>) -> Json<Vec<RemoteAnnouncement>> {
    Json(state.snapshot().await)
}

/// Store a new announcement.
///
/// `title` and `content` must both be JSON strings. A missing field, a
/// `null` or any other JSON type gets the same 400 as a body that is not
/// JSON at all, since every stored record has to read back as a
/// [`RemoteAnnouncement`]. Empty strings are accepted.
async fn create_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request: Option<NewAnnouncement> = serde_json::from_slice(&body).ok();
    let Some(NewAnnouncement {
        title: Some(title),
        content: Some(content),
    }) = request
    else {
        debug!("Rejected announcement without title or content");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing title or content" })),
        )
            .into_response();
    };

    let announcement = RemoteAnnouncement {
        id: Uuid::new_v4().to_string(),
        title,
        content,
    };
    state.announcements.write().await.push(announcement.clone());
    info!("Stored announcement {}", announcement.id);

    (StatusCode::CREATED, Json(announcement)).into_response()
}
