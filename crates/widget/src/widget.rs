//! The search widget controller.
//!
//! One instance per page, constructed with an injected backend. The five
//! display regions live here as plain state; hosts render them and forward
//! UI events to the methods below. All mutation happens on the caller's
//! task, so there is no locking discipline beyond `&mut self`.

use tracing::debug;

use crate::backend::SearchBackend;
use crate::model::{
    BackendError, Feedback, FeedbackEvent, FeedbackState, ResultCard, SearchReply,
};

/// Literal rendered in the results region when a search matches nothing.
pub const NO_RESULTS_NOTICE: &str = "No relevant FAQs found.";
/// Blocking alert text for a failed search.
pub const SEARCH_FAILED_ALERT: &str = "An error occurred while fetching results.";
/// One-time acknowledgment shown under a card's disabled feedback controls.
pub const FEEDBACK_ACK: &str = "Thank you for your feedback!";

/// Handle for an in-flight search. Only the ticket from the most recent
/// [`SearchWidget::begin_search`] may still apply its outcome; older tickets
/// are stale and their responses are dropped rather than rendered over newer
/// state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
}

/// The FAQ search widget.
pub struct SearchWidget<B: SearchBackend> {
    backend: B,
    query: String,
    suggestions: Vec<String>,
    cards: Vec<ResultCard>,
    history: Vec<String>,
    loading: bool,
    notice: Option<&'static str>,
    alert: Option<String>,
    seq: u64,
}

impl<B: SearchBackend> SearchWidget<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            query: String::new(),
            suggestions: Vec::new(),
            cards: Vec::new(),
            history: Vec::new(),
            loading: false,
            notice: None,
            alert: None,
            seq: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Region accessors for the host renderer
    // -----------------------------------------------------------------------

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn cards(&self) -> &[ResultCard] {
        &self.cards
    }

    /// Past queries, most recent first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Empty-state text for the results region, if the last search matched
    /// nothing.
    pub fn notice(&self) -> Option<&str> {
        self.notice
    }

    /// Pending blocking alert from a failed search.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Validate the query and prepare the regions for a new search: clears
    /// prior results and suggestions, shows the loading indicator, and
    /// returns a ticket for the response. Returns `None` (and does nothing)
    /// for an empty or whitespace-only query.
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        if self.query.trim().is_empty() {
            return None;
        }
        self.seq += 1;
        self.loading = true;
        self.cards.clear();
        self.suggestions.clear();
        self.notice = None;
        Some(SearchTicket { seq: self.seq })
    }

    /// Apply a search outcome. Stale tickets (a newer search has begun since)
    /// are dropped without touching any region; returns whether the outcome
    /// was applied.
    pub fn finish_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<SearchReply, BackendError>,
    ) -> bool {
        if ticket.seq != self.seq {
            debug!(ticket = ticket.seq, current = self.seq, "Dropping stale search response");
            return false;
        }
        self.loading = false;
        match outcome {
            Ok(reply) => {
                if reply.results.is_empty() {
                    self.notice = Some(NO_RESULTS_NOTICE);
                } else {
                    self.cards = reply
                        .results
                        .into_iter()
                        .map(|r| ResultCard {
                            question: r.question,
                            answer: r.answer,
                            feedback: FeedbackState::Open,
                        })
                        .collect();
                }
                // Server sends history oldest-first; display wants newest-first
                self.history = reply.history;
                self.history.reverse();
            }
            Err(e) => {
                debug!(error = %e, "Search failed");
                self.alert = Some(SEARCH_FAILED_ALERT.to_string());
            }
        }
        true
    }

    /// Run a full search for the current query: [`Self::begin_search`], the
    /// backend call, [`Self::finish_search`].
    pub async fn perform_search(&mut self) {
        let Some(ticket) = self.begin_search() else {
            return;
        };
        let query = self.query.trim().to_string();
        let outcome = self.backend.search(&query).await;
        self.finish_search(ticket, outcome);
    }

    // -----------------------------------------------------------------------
    // Suggestions
    // -----------------------------------------------------------------------

    /// Keystroke handler: store the new input and refresh the suggestion
    /// list. Blank input clears the list without a request; a failed request
    /// leaves the list empty — suggestions are best-effort.
    pub async fn input_changed(&mut self, text: impl Into<String>) {
        self.query = text.into();
        if self.query.trim().is_empty() {
            self.suggestions.clear();
            return;
        }
        match self.backend.suggest(&self.query).await {
            Ok(list) => self.suggestions = list,
            Err(e) => {
                debug!(error = %e, "Suggestion request failed");
                self.suggestions.clear();
            }
        }
    }

    /// Click handler for a rendered suggestion: adopt its text as the query,
    /// clear the list, and search immediately.
    pub async fn select_suggestion(&mut self, index: usize) {
        let Some(text) = self.suggestions.get(index).cloned() else {
            return;
        };
        self.query = text;
        self.suggestions.clear();
        self.perform_search().await;
    }

    /// Click handler for a rendered history entry. Clears suggestions first,
    /// same as suggestion selection — one rule for both entry points.
    pub async fn select_history(&mut self, index: usize) {
        let Some(text) = self.history.get(index).cloned() else {
            return;
        };
        self.query = text;
        self.suggestions.clear();
        self.perform_search().await;
    }

    // -----------------------------------------------------------------------
    // Feedback
    // -----------------------------------------------------------------------

    /// Click handler for a card's Helpful / Not Helpful control. The card
    /// flips to `Submitted` (disabling both controls and showing
    /// [`FEEDBACK_ACK`]) and the event is sent fire-and-forget; errors and
    /// repeat clicks are no-ops.
    pub async fn submit_feedback(&mut self, card_index: usize, feedback: Feedback) {
        let Some(card) = self.cards.get_mut(card_index) else {
            return;
        };
        if !card.feedback_open() {
            return;
        }
        card.feedback = FeedbackState::Submitted;
        let event = FeedbackEvent { question: card.question.clone(), feedback };
        if let Err(e) = self.backend.feedback(&event).await {
            debug!(error = %e, "Feedback dropped");
        }
    }
}
