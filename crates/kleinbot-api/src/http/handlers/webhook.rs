//! Messenger webhook handlers.
//!
//! `GET` answers the subscription handshake; `POST` receives deliveries.
//! Deliveries are always acknowledged with `200 EVENT_RECEIVED`, even when
//! the body is unparseable or not addressed to a page, so the platform does
//! not retry them.

use axum::body::Bytes;
use axum::extract::{Query, State};
use secrecy::ExposeSecret;
use serde::Deserialize;

use kleinbot_types::messenger::WebhookPayload;

use crate::http::error::AppError;
use crate::state::AppState;

pub const EVENT_RECEIVED: &str = "EVENT_RECEIVED";

const SUBSCRIBE_MODE: &str = "subscribe";

#[derive(Debug, Default, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// GET /webhook - subscription verification.
pub async fn verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<String, AppError> {
    let token_matches = params
        .verify_token
        .as_deref()
        .is_some_and(|token| token == state.verify_token.expose_secret());

    if params.mode.as_deref() == Some(SUBSCRIBE_MODE) && token_matches {
        tracing::info!("webhook subscription verified");
        return Ok(params.challenge.unwrap_or_default());
    }

    tracing::warn!(mode = ?params.mode, "webhook verification failed");
    Err(AppError::VerificationFailed)
}

/// POST /webhook - message delivery.
pub async fn receive(State(state): State<AppState>, body: Bytes) -> &'static str {
    match serde_json::from_slice::<WebhookPayload>(&body) {
        Ok(payload) => {
            let handled = state.conversation.handle_payload(&payload).await;
            tracing::debug!(handled, "webhook delivery processed");
        }
        Err(e) => {
            tracing::debug!(error = %e, bytes = body.len(), "ignoring unparseable webhook body");
        }
    }
    EVENT_RECEIVED
}

/// Any other method on a webhook route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
