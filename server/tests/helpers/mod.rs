//! Test harness: builds an [`AppState`] from the fixture corpus and calls
//! handlers directly, tracking the session cookie between requests the way a
//! browser would.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use faqdesk_core::corpus::FaqCorpus;
use faqdesk_core::search::FaqIndex;
use faqdesk_server::api::{api_feedback, api_search, api_suggestions, SearchOk};
use faqdesk_server::feedback::FeedbackLog;
use faqdesk_server::session::SessionStore;
use faqdesk_server::types::{
    ApiError, ApiJson, AppState, FeedbackKind, FeedbackRequest, FeedbackResponse, QueryRequest,
    SearchResponse,
};

pub struct TestHarness {
    pub state: Arc<AppState>,
    pub cookie: Option<String>,
    _dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let fixture =
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/faqs.json");
        let corpus = FaqCorpus::load(&fixture).expect("fixture corpus loads");
        let index = FaqIndex::build(&corpus);

        let dir = tempfile::tempdir().expect("tempdir");
        let feedback_path = dir.path().join("feedback.log");
        let feedback = FeedbackLog::open(&feedback_path).expect("feedback log opens");

        let state = Arc::new(AppState {
            index,
            sessions: SessionStore::new(),
            feedback,
            corpus_path: fixture,
        });
        Self { state, cookie: None, _dir: dir }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &self.cookie {
            headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        headers
    }

    /// POST /search, remembering a freshly issued session cookie.
    pub async fn search(&mut self, query: &str) -> SearchResponse {
        let SearchOk { set_cookie, body } = api_search(
            State(Arc::clone(&self.state)),
            self.headers(),
            ApiJson(QueryRequest { query: query.to_string() }),
        )
        .await;
        if let Some(cookie) = set_cookie {
            // Keep only the name=value pair, like a browser would
            let pair = cookie.split(';').next().unwrap_or(&cookie).to_string();
            self.cookie = Some(pair);
        }
        body
    }

    pub async fn suggestions(&self, query: &str) -> Vec<String> {
        api_suggestions(
            State(Arc::clone(&self.state)),
            ApiJson(QueryRequest { query: query.to_string() }),
        )
        .await
        .0
    }

    pub async fn feedback(
        &self,
        question: &str,
        kind: FeedbackKind,
    ) -> Result<FeedbackResponse, ApiError> {
        api_feedback(
            State(Arc::clone(&self.state)),
            ApiJson(FeedbackRequest { question: question.to_string(), feedback: kind }),
        )
        .await
        .map(|json| json.0)
    }

    pub fn feedback_log_contents(&self) -> String {
        std::fs::read_to_string(self.state.feedback.path()).unwrap_or_default()
    }
}
