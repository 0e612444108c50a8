//! REST adapter over a pure-mode trade system.
//!
//! Used by the binary and by integration tests. Each call returns the client
//! messages the system emitted for it (confirms, rejects, executions), so
//! HTTP clients get the same wire payloads a stdio client would read.
//! Uses Extension for state so the router is `Router<()>` and works with
//! `into_make_service()`.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::{Arc, Mutex};

use crate::sinks::InMemorySink;
use crate::system::TradeSystem;

/// Shared app state: one pure-mode system per process; the client sink is an
/// in-memory buffer drained per request.
#[derive(Clone)]
pub struct AppState {
    pub system: Arc<Mutex<TradeSystem>>,
    client_messages: InMemorySink,
}

/// Builds shared app state with a fresh pure-mode system.
pub fn create_app_state() -> AppState {
    let sink = InMemorySink::new();
    AppState {
        system: Arc::new(Mutex::new(TradeSystem::new(Box::new(sink.clone())))),
        client_messages: sink,
    }
}

/// Builds the router with the given state.
pub fn create_router_with_state(state: AppState) -> Router<()> {
    Router::new()
        .route("/health", get(health))
        .route("/orders", post(submit_order))
        .route("/cancels", post(submit_cancel))
        .route("/market-data", post(submit_market_data))
        .layer(Extension(state))
}

/// Builds the router with a new state (convenience for tests). Returns
/// `Router<()>` for `axum::serve`.
pub fn create_router() -> Router<()> {
    create_router_with_state(create_app_state())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Runs one handler under the system lock and replies with the drained
/// client messages.
fn respond_with_messages(
    state: &AppState,
    handle: impl FnOnce(&mut TradeSystem),
) -> Response {
    let mut guard = state.system.lock().expect("lock");
    handle(&mut guard);
    let messages = state.client_messages.drain();
    drop(guard);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "messages": messages })),
    )
        .into_response()
}

async fn submit_order(
    Extension(state): Extension<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    respond_with_messages(&state, |system| system.handle_order(&body))
}

async fn submit_cancel(
    Extension(state): Extension<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    respond_with_messages(&state, |system| system.handle_cancel(&body))
}

async fn submit_market_data(
    Extension(state): Extension<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    respond_with_messages(&state, |system| system.handle_market_data(&body))
}
