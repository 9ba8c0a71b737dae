//! Axum router configuration with middleware.
//!
//! The webhook is mounted at `/webhook` and at `/api/chat`, the path older
//! page subscriptions point at. Middleware: request tracing and a panic
//! catcher that turns a panicking handler into a plain `500`.

use std::any::Any;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::http::error::AppError;
use crate::http::handlers;
use crate::state::AppState;

fn webhook_routes() -> MethodRouter<AppState> {
    get(handlers::webhook::verify)
        .head(handlers::webhook::method_not_allowed)
        .post(handlers::webhook::receive)
        .fallback(handlers::webhook::method_not_allowed)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", webhook_routes())
        .route("/api/chat", webhook_routes())
        .route("/health", get(handlers::health::health_check))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
