//! faqdesk-core — FAQ corpus loading and search.
//!
//! This crate provides the engine behind the faqdesk server and CLI: it loads
//! a categorized FAQ corpus from JSON, runs queries through a normalization
//! pipeline (lowercasing, punctuation stripping, stopword removal, spell
//! correction against the corpus vocabulary), and ranks entries with a
//! combination of fuzzy string matching and TF-IDF cosine similarity.
//!
//! # Modules
//!
//! - [`corpus`] — `faqs.json` loading and the flattened entry list
//! - [`text`] — normalization pipeline, edit distance, spell correction
//! - [`search`] — question index, ranked search, and autocomplete suggestions

pub mod corpus;
pub mod search;
pub mod text;
