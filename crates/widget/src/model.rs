//! Wire types shared with the faqdesk server and the widget's view model.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Trusted markup boundary
// ---------------------------------------------------------------------------

/// Server-supplied HTML for an answer body.
///
/// Answers are rendered as markup, not text. The server is the trust
/// boundary: whatever it returns is displayed verbatim, and this newtype is
/// the only place that decision lives. Hosts must call [`TrustedMarkup::as_html`]
/// to get the raw string, which keeps the insertion points searchable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustedMarkup(String);

impl TrustedMarkup {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// The raw markup, to be inserted into the host's render tree unescaped.
    pub fn as_html(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of `POST /search` and `POST /suggestions`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// One entry of a `/search` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub question: String,
    pub answer: TrustedMarkup,
}

/// Response body of `POST /search`. `history` arrives oldest-first; the
/// widget reverses it for most-recent-first display.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchReply {
    pub results: Vec<SearchResultItem>,
    #[serde(default)]
    pub history: Vec<String>,
}

/// Feedback verdict on a result card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Helpful,
    NotHelpful,
}

/// Body of `POST /feedback`. Fire-and-forget; the response is ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub question: String,
    pub feedback: Feedback,
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Feedback controls on a rendered card. `Submitted` disables both buttons
/// and shows the one-time acknowledgment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackState {
    Open,
    Submitted,
}

/// A rendered result card. Cards are addressable objects: feedback reads the
/// question from the card itself rather than re-deriving it from rendered
/// text.
#[derive(Clone, Debug)]
pub struct ResultCard {
    pub question: String,
    pub answer: TrustedMarkup,
    pub feedback: FeedbackState,
}

impl ResultCard {
    pub fn feedback_open(&self) -> bool {
        self.feedback == FeedbackState::Open
    }
}

// ---------------------------------------------------------------------------
// Backend errors
// ---------------------------------------------------------------------------

/// A failed backend call: either the request never completed or the response
/// body didn't decode. Search surfaces these as a blocking alert; suggestion
/// and feedback calls swallow them.
#[derive(Debug)]
pub enum BackendError {
    Transport(String),
    Decode(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(e) => write!(f, "request failed: {e}"),
            BackendError::Decode(e) => write!(f, "bad response: {e}"),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}
