//! Search backend trait and the reqwest HTTP implementation.

use std::future::Future;
use tracing::debug;

use crate::model::{BackendError, FeedbackEvent, SearchReply, SearchRequest};

/// The three server interactions the widget depends on.
///
/// Implementations must be cheap to call concurrently; the widget issues a
/// suggestion request per keystroke with no debouncing.
pub trait SearchBackend {
    /// `POST /search` — full search with per-session history.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<SearchReply, BackendError>> + Send;

    /// `POST /suggestions` — autocomplete candidates for a partial query.
    fn suggest(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<String>, BackendError>> + Send;

    /// `POST /feedback` — fire-and-forget; the response body is ignored.
    fn feedback(
        &self,
        event: &FeedbackEvent,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// HTTP backend against a faqdesk server.
///
/// Carries a cookie store so the server's session cookie persists across
/// searches and history accumulates.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend rooted at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { client, base_url: base_url.into() })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl SearchBackend for HttpBackend {
    async fn search(&self, query: &str) -> Result<SearchReply, BackendError> {
        debug!(query, "POST /search");
        let reply = self
            .client
            .post(self.endpoint("/search"))
            .json(&SearchRequest { query: query.to_string() })
            .send()
            .await?
            .error_for_status()?
            .json::<SearchReply>()
            .await?;
        Ok(reply)
    }

    async fn suggest(&self, query: &str) -> Result<Vec<String>, BackendError> {
        let suggestions = self
            .client
            .post(self.endpoint("/suggestions"))
            .json(&SearchRequest { query: query.to_string() })
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<String>>()
            .await?;
        Ok(suggestions)
    }

    async fn feedback(&self, event: &FeedbackEvent) -> Result<(), BackendError> {
        debug!(question = event.question.as_str(), "POST /feedback");
        self.client
            .post(self.endpoint("/feedback"))
            .json(event)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
