use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use faqdesk_core::search::{FaqIndex, SearchHit};

use crate::feedback::FeedbackLog;
use crate::session::SessionStore;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared state behind every handler: the FAQ index built at startup, the
/// session store, and the feedback log.
pub struct AppState {
    pub index: FaqIndex,
    pub sessions: SessionStore,
    pub feedback: FeedbackLog,
    pub corpus_path: PathBuf,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of `POST /search` and `POST /suggestions`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Response body of `POST /search`. History is oldest-first; clients render
/// it reversed.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub history: Vec<String>,
}

/// Feedback verdict. Anything else in the body is rejected at
/// deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Helpful,
    NotHelpful,
}

impl FeedbackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackKind::Helpful => "helpful",
            FeedbackKind::NotHelpful => "not_helpful",
        }
    }
}

/// Body of `POST /feedback`.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub question: String,
    pub feedback: FeedbackKind,
}

/// Response body of `POST /feedback`.
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// API error
// ---------------------------------------------------------------------------

/// Handler error rendered as `{"error": "..."}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

/// JSON body extractor that answers every malformed request with a 400
/// instead of axum's per-cause 415/422 split.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::debug!(%rejection, "Rejected request body");
                Err(ApiError { status: StatusCode::BAD_REQUEST, message: "Invalid request".into() })
            }
        }
    }
}
