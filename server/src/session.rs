//! Cookie-keyed session store with per-session search history.
//!
//! Each browser gets a `faqdesk_session` UUID cookie on its first search.
//! History lives server-side, capped at the [`HISTORY_CAP`] most recent
//! queries; a background task prunes sessions idle past a cutoff.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "faqdesk_session";
/// Queries retained per session, most recent last.
pub const HISTORY_CAP: usize = 10;

struct Session {
    history: Vec<String>,
    last_activity: Instant,
}

/// Outcome of resolving a request's session cookie.
pub struct ResolvedSession {
    pub id: String,
    /// Set when the id was freshly issued and a `Set-Cookie` is needed.
    pub is_new: bool,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a session from the request's `Cookie` header value, issuing a
    /// fresh id when the cookie is absent, malformed, or unknown (pruned ids
    /// fall in the last bucket — the client keeps the cookie but the history
    /// is gone).
    pub fn resolve(&self, cookie_header: Option<&str>) -> ResolvedSession {
        if let Some(id) = cookie_header.and_then(extract_session_id) {
            if self.sessions.contains_key(&id) {
                return ResolvedSession { id, is_new: false };
            }
        }
        let id = Uuid::new_v4().to_string();
        self.sessions
            .insert(id.clone(), Session { history: Vec::new(), last_activity: Instant::now() });
        ResolvedSession { id, is_new: true }
    }

    /// Append a query to a session's history and return the capped history,
    /// oldest-first.
    pub fn record_query(&self, id: &str, query: &str) -> Vec<String> {
        let mut entry = self
            .sessions
            .entry(id.to_string())
            .or_insert_with(|| Session { history: Vec::new(), last_activity: Instant::now() });
        entry.history.push(query.to_string());
        if entry.history.len() > HISTORY_CAP {
            let excess = entry.history.len() - HISTORY_CAP;
            entry.history.drain(..excess);
        }
        entry.last_activity = Instant::now();
        entry.history.clone()
    }

    /// Drop sessions idle longer than `max_idle`; returns how many were
    /// pruned.
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        // checked_sub: the monotonic clock may not reach back max_idle yet
        let Some(cutoff) = Instant::now().checked_sub(max_idle) else {
            return 0;
        };
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.last_activity > cutoff);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Pull the session id out of a `Cookie` header value. Only well-formed UUIDs
/// count; anything else is treated as no cookie.
fn extract_session_id(header: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
        .map(|u| u.to_string())
}

/// `Set-Cookie` value for a freshly issued session.
pub fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
