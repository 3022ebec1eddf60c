//! Plain HTTP surface for chat bots: live game lookups and streamer
//! registration.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::db::Streamer;
use crate::error::AppError;
use crate::live::{LiveService, LookupReply};
use crate::roster::RosterStore;

#[derive(Debug, Clone)]
pub struct AppState {
    pub live: Arc<LiveService>,
    pub store: Arc<dyn RosterStore>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        error!(error = ?err, "🌐 ❌ Request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal error".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, message = %self.message, "🌐 ⚠️ Request rejected");
        (
            self.status,
            Json(serde_json::json!({ "message": self.message })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
struct LookupParams {
    requester: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegisterStreamer {
    name: String,
    streamer_name: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/streamer", post(register_streamer))
        .route("/streamer/{streamer_name}", get(live_game))
        .with_state(state)
}

pub async fn serve(bind: &str, state: AppState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(bind, "🌐 HTTP server listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

#[instrument(skip(state))]
async fn live_game(
    State(state): State<AppState>,
    Path(streamer_name): Path<String>,
    Query(params): Query<LookupParams>,
) -> Result<Response, ApiError> {
    let requester = params.requester.unwrap_or_else(|| streamer_name.clone());
    let reply = state
        .live
        .lookup_streamer(&streamer_name, &requester, &streamer_name)
        .await?;

    let status = match reply {
        LookupReply::UnknownName(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    Ok((status, reply.to_string()).into_response())
}

#[instrument(skip_all)]
async fn register_streamer(
    State(state): State<AppState>,
    Json(body): Json<RegisterStreamer>,
) -> Result<Response, ApiError> {
    let Some(mut player) = state.store.find_player_by_name(&body.name).await? else {
        return Err(ApiError::bad_request("Player not found"));
    };
    if player.streamer.is_some() {
        return Err(ApiError::bad_request("Player already has a streamer"));
    }

    player.streamer = Some(Streamer {
        name: body.name,
        streamer_name: body.streamer_name,
        player_id: player.id,
    });
    let saved = state.store.save_player(&player).await?;

    info!(
        player = %saved.name,
        streamer_name = ?saved.streamer.as_ref().map(|s| &s.streamer_name),
        "🎥 ✅ Streamer registered"
    );
    Ok((StatusCode::CREATED, Json(saved)).into_response())
}
