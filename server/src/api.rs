use axum::extract::{Json, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::debug;

use faqdesk_core::search::DEFAULT_TOP_K;

use crate::session::session_cookie;
use crate::types::*;

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Successful search: the JSON body plus an optional `Set-Cookie` for a
/// freshly issued session.
pub struct SearchOk {
    pub set_cookie: Option<String>,
    pub body: SearchResponse,
}

impl IntoResponse for SearchOk {
    fn into_response(self) -> Response {
        let mut response = axum::Json(self.body).into_response();
        if let Some(cookie) = self.set_cookie {
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
        }
        response
    }
}

fn cookie_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::COOKIE).and_then(|v| v.to_str().ok())
}

pub async fn api_search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<QueryRequest>,
) -> SearchOk {
    let session = state.sessions.resolve(cookie_header(&headers));
    let results = state.index.search(&body.query, DEFAULT_TOP_K);
    let history = state.sessions.record_query(&session.id, &body.query);
    debug!(
        query = body.query.as_str(),
        results = results.len(),
        session = session.id.as_str(),
        "Search"
    );
    SearchOk {
        set_cookie: session.is_new.then(|| session_cookie(&session.id)),
        body: SearchResponse { results, history },
    }
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

/// Bare JSON array of suggested questions.
pub async fn api_suggestions(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<QueryRequest>,
) -> Json<Vec<String>> {
    Json(state.index.suggest(&body.query))
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

pub async fn api_feedback(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    state
        .feedback
        .record(&body.question, body.feedback)
        .map_err(|e| ApiError::internal(format!("could not record feedback: {e}")))?;
    Ok(Json(FeedbackResponse { message: "Feedback received" }))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

pub async fn api_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "entries": state.index.len(),
        "sessions": state.sessions.len(),
        "corpus": state.corpus_path.display().to_string(),
    }))
}
