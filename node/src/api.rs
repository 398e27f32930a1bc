//! # HTTP API
//!
//! Builds the axum router for the bearer-token protected dashboard.
//! All endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                 | Description                              |
//! |--------|----------------------|------------------------------------------|
//! | GET    | `/health`            | Liveness probe                           |
//! | GET    | `/dashboard/:wallet` | Greets `wallet` if its bearer token holds |
//!
//! The server keeps no sessions. Each dashboard request carries
//! `Authorization: Bearer <token>` and is verified from scratch.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{header::AUTHORIZATION, request::Parts, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use wallet_auth::TokenVerifier;

use crate::metrics::{SharedMetrics, MISSING_CREDENTIALS};

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone. Everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Verifier built from the policy loaded at startup.
    pub verifier: Arc<TokenVerifier>,
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([AUTHORIZATION]);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/dashboard/:wallet",
            get(dashboard_handler).fallback(method_not_allowed_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Body of every dashboard response, success or failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Errors surfaced to HTTP clients.
///
/// Verification failures all map to one variant. The reason is logged and
/// counted, never sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    MissingCredentials,
    InvalidCredentials,
    MethodNotAllowed,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingCredentials | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "Please authenticate to access your dashboard.",
            Self::InvalidCredentials => "Invalid authentication",
            Self::MethodNotAllowed => "Method not allowed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(MessageResponse {
                message: self.message().to_string(),
            }),
        )
            .into_response()
    }
}

// ---------------------------------------------------------------------------
// Bearer extraction
// ---------------------------------------------------------------------------

/// The raw token from `Authorization: Bearer <token>`.
///
/// The header must split on a single space into exactly two parts with a
/// `Bearer` scheme (case-insensitive). Anything else is
/// [`ApiError::MissingCredentials`]; the token itself is not inspected here.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::MissingCredentials)?;

        let mut pieces = header.split(' ');
        match (pieces.next(), pieces.next(), pieces.next()) {
            (Some(scheme), Some(token), None)
                if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
            {
                Ok(Self(token.to_string()))
            }
            _ => Err(ApiError::MissingCredentials),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`: returns 200 if the process is alive.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /dashboard/:wallet`: greets the wallet if the bearer token proves
/// control of it.
async fn dashboard_handler(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    bearer: Result<BearerToken, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let BearerToken(token) = bearer.map_err(|e| {
        tracing::debug!(%wallet, "dashboard request without bearer credentials");
        state.metrics.record_rejected(MISSING_CREDENTIALS);
        e
    })?;

    let timer = state.metrics.verification_latency_seconds.start_timer();
    let result = state.verifier.verify(&wallet, &token);
    timer.observe_duration();

    match result {
        Ok(verified) => {
            state.metrics.record_accepted();
            tracing::info!(
                %wallet,
                expires_at_ms = verified.expires_at_ms,
                "dashboard access granted"
            );
            Ok(Json(MessageResponse {
                message: format!("Hello {wallet}, your bearer token is verified."),
            }))
        }
        Err(e) => {
            state.metrics.record_rejected(e.kind());
            tracing::warn!(%wallet, reason = e.kind(), error = %e, "dashboard access denied");
            Err(ApiError::InvalidCredentials)
        }
    }
}

async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
