//! faqdesk-widget — headless FAQ search widget.
//!
//! A host UI (desktop shell, TUI, web view) owns the rendering; this crate
//! owns the behavior: one [`widget::SearchWidget`] instance per page holding
//! the five display regions (query input, suggestion list, result cards,
//! history list, loading indicator) as plain state, driven by a
//! [`backend::SearchBackend`] for the three server calls.
//!
//! # Modules
//!
//! - [`model`] — wire types, view-model types, and the trusted-markup boundary
//! - [`backend`] — the backend trait and its reqwest HTTP implementation
//! - [`widget`] — the controller itself

pub mod backend;
pub mod model;
pub mod widget;

pub use backend::{HttpBackend, SearchBackend};
pub use widget::SearchWidget;
