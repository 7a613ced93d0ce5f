//! FAQ corpus loading.
//!
//! The corpus file (`faqs.json`) maps category names to lists of
//! question/answer pairs:
//!
//! ```json
//! {
//!   "Billing": [
//!     { "question": "What is your refund policy?", "answer": "..." }
//!   ]
//! }
//! ```
//!
//! Categories only organize the file; search runs over the flattened list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::info;

/// A single question/answer pair. The answer may contain HTML markup that is
/// passed through to clients verbatim.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Error loading or parsing a corpus file.
#[derive(Debug)]
pub enum CorpusError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusError::Io(e) => write!(f, "could not read corpus file: {e}"),
            CorpusError::Parse(e) => write!(f, "could not parse corpus file: {e}"),
        }
    }
}

impl std::error::Error for CorpusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CorpusError::Io(e) => Some(e),
            CorpusError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for CorpusError {
    fn from(e: std::io::Error) -> Self {
        CorpusError::Io(e)
    }
}

impl From<serde_json::Error> for CorpusError {
    fn from(e: serde_json::Error) -> Self {
        CorpusError::Parse(e)
    }
}

/// The flattened FAQ corpus.
#[derive(Debug)]
pub struct FaqCorpus {
    pub entries: Vec<FaqEntry>,
}

impl FaqCorpus {
    /// Load and flatten a categorized `faqs.json` file.
    ///
    /// Categories are flattened in name order so corpus layout on disk does
    /// not affect entry ordering between runs.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let raw = std::fs::read_to_string(path)?;
        let by_category: BTreeMap<String, Vec<FaqEntry>> = serde_json::from_str(&raw)?;

        let categories = by_category.len();
        let entries: Vec<FaqEntry> = by_category.into_values().flatten().collect();
        info!(path = %path.display(), categories, entries = entries.len(), "Loaded FAQ corpus");

        Ok(Self { entries })
    }

    /// Build a corpus directly from entries (used by tests and embedders).
    pub fn from_entries(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }
}
