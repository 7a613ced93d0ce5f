//! faqdesk — FAQ search server.
//!
//! Serves three JSON endpoints over an in-memory FAQ index built at startup:
//!
//! - `POST /search` — ranked results plus the caller's session history
//! - `POST /suggestions` — autocomplete candidates per keystroke
//! - `POST /feedback` — append-only helpful / not-helpful log
//!
//! # Modules
//!
//! - [`types`] — application state and API error type
//! - [`session`] — cookie-keyed session store with per-session history
//! - [`feedback`] — append-only JSONL feedback log
//! - [`api`] — HTTP handlers

pub mod api;
pub mod feedback;
pub mod session;
pub mod types;
