//! Append-only feedback log.
//!
//! Every helpful / not-helpful click lands as one JSON line:
//! `{"timestamp": "...", "question": "...", "feedback": "helpful"}`.
//! The file is the durable record; aggregation happens offline.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

use crate::types::FeedbackKind;

/// One logged feedback event.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub timestamp: String,
    pub question: String,
    pub feedback: FeedbackKind,
}

/// Feedback log appending JSONL to a file opened at startup.
pub struct FeedbackLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FeedbackLog {
    /// Open (or create) the log file in append mode.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { path: path.to_path_buf(), file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event with a UTC timestamp.
    pub fn record(&self, question: &str, feedback: FeedbackKind) -> std::io::Result<()> {
        let entry = FeedbackEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            question: question.to_string(),
            feedback,
        };
        let line = serde_json::to_string(&entry)?;
        {
            let mut file = self.file.lock().expect("feedback log lock poisoned");
            writeln!(file, "{line}")?;
        }
        info!(question, feedback = feedback.as_str(), "Feedback recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_one_json_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.log");
        let log = FeedbackLog::open(&path).unwrap();

        log.record("What is your refund policy?", FeedbackKind::Helpful).unwrap();
        log.record("How do I track my order?", FeedbackKind::NotHelpful).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: FeedbackEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.question, "What is your refund policy?");
        assert_eq!(first.feedback, FeedbackKind::Helpful);
        assert!(!first.timestamp.is_empty());

        let second: FeedbackEntry = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.feedback, FeedbackKind::NotHelpful);
    }

    #[test]
    fn open_appends_to_an_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.log");
        {
            let log = FeedbackLog::open(&path).unwrap();
            log.record("Q one?", FeedbackKind::Helpful).unwrap();
        }
        {
            let log = FeedbackLog::open(&path).unwrap();
            log.record("Q two?", FeedbackKind::Helpful).unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
