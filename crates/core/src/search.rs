//! Question index with ranked search and autocomplete suggestions.
//!
//! Ranking combines two scorers, both normalized to `[0, 1]`:
//!
//! - a fuzzy ratio over preprocessed question text (edit-distance based, with
//!   token-order and partial-window variants so rearranged or embedded
//!   phrases still match), floor [`FUZZY_FLOOR`];
//! - TF-IDF cosine similarity over corpus tokens, floor [`TFIDF_FLOOR`].
//!
//! Entries matched by both scorers are deduplicated keeping the higher score.
//! A 64-bit character bitmask per entry rejects candidates that share no
//! characters with the query before any edit distance is computed.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::corpus::FaqCorpus;
use crate::text::{edit_distance, preprocess, tokenize, SpellCorrector};

/// Minimum fuzzy ratio for a result to count as a match.
pub const FUZZY_FLOOR: f64 = 0.6;
/// Minimum TF-IDF cosine for a result to count as a match.
pub const TFIDF_FLOOR: f64 = 0.5;
/// Minimum fuzzy ratio for an autocomplete suggestion.
pub const SUGGESTION_FLOOR: f64 = 0.5;
/// Default number of search results.
pub const DEFAULT_TOP_K: usize = 5;
/// Number of autocomplete suggestions returned.
pub const SUGGESTION_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Character bitmask pre-filter
// ---------------------------------------------------------------------------

/// Character bitmask for O(1) rejection: a-z → bits 0-25, 0-9 → bits 26-35.
fn char_bitmask(s: &str) -> u64 {
    let mut mask: u64 = 0;
    for &b in s.as_bytes() {
        let idx = match b {
            b'a'..=b'z' => u32::from(b - b'a'),
            b'A'..=b'Z' => u32::from(b.to_ascii_lowercase() - b'a'),
            b'0'..=b'9' => u32::from(b - b'0') + 26,
            _ => continue,
        };
        mask |= 1u64 << idx;
    }
    mask
}

// ---------------------------------------------------------------------------
// Fuzzy ratio
// ---------------------------------------------------------------------------

fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / max_len as f64
}

fn token_sorted(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Best similarity of `needle` against same-length windows of `haystack`,
/// anchored at word starts. Lets a short query match inside a long question.
fn partial_similarity(needle: &str, haystack: &str) -> f64 {
    if needle.len() >= haystack.len() {
        return similarity(needle, haystack);
    }
    let mut best: f64 = 0.0;
    let starts = std::iter::once(0).chain(
        haystack.match_indices(' ').map(|(i, _)| i + 1),
    );
    for start in starts {
        if start >= haystack.len() {
            break;
        }
        // Nudge the window end to a char boundary
        let mut end = (start + needle.len()).min(haystack.len());
        while !haystack.is_char_boundary(end) {
            end += 1;
        }
        best = best.max(similarity(needle, &haystack[start..end]));
        if best == 1.0 {
            break;
        }
    }
    best
}

/// Normalized fuzzy ratio in `[0, 1]`: the best of whole-string similarity,
/// token-order-insensitive similarity, and partial-window similarity.
pub fn fuzzy_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let whole = similarity(a, b);
    let sorted = similarity(&token_sorted(a), &token_sorted(b));
    let partial = if a.len() < b.len() {
        partial_similarity(a, b)
    } else {
        partial_similarity(b, a)
    };
    whole.max(sorted).max(partial)
}

// ---------------------------------------------------------------------------
// TF-IDF term statistics
// ---------------------------------------------------------------------------

/// Per-term document frequencies for IDF weighting.
struct TermStats {
    total_docs: usize,
    freq: HashMap<String, usize>,
}

impl TermStats {
    fn build(docs: &[Vec<String>]) -> Self {
        let mut freq: HashMap<String, usize> = HashMap::new();
        for tokens in docs {
            let mut seen: Vec<&str> = Vec::new();
            for t in tokens {
                if !seen.contains(&t.as_str()) {
                    seen.push(t);
                    *freq.entry(t.clone()).or_default() += 1;
                }
            }
        }
        Self { total_docs: docs.len(), freq }
    }

    /// IDF with Laplace smoothing: ln((N+1)/(df+1)) + 1, floored at 1.0.
    /// Unknown terms default to df = total_docs.
    fn idf(&self, term: &str) -> f64 {
        let df = self.freq.get(term).copied().unwrap_or(self.total_docs);
        (((self.total_docs as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0).max(1.0)
    }
}

/// L2-normalized TF-IDF weight vector for one document or query.
fn weight_vector(tokens: &[String], stats: &TermStats) -> HashMap<String, f64> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for t in tokens {
        *counts.entry(t.as_str()).or_default() += 1;
    }
    let mut weights: HashMap<String, f64> =
        counts.into_iter().map(|(t, c)| (t.to_string(), c as f64 * stats.idf(t))).collect();
    let norm: f64 = weights.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in weights.values_mut() {
            *w /= norm;
        }
    }
    weights
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    // Both sides are L2-normalized, so the dot product is the cosine
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter_map(|(t, w)| large.get(t).map(|v| w * v)).sum()
}

// ---------------------------------------------------------------------------
// Question index
// ---------------------------------------------------------------------------

struct QuestionEntry {
    question: String,
    answer: String,
    question_lower: String,
    processed: String,
    lower_mask: u64,
    processed_mask: u64,
}

/// A ranked search hit. `score` is in `[0, 1]`.
#[derive(Clone, Debug, Serialize)]
pub struct SearchHit {
    pub question: String,
    pub answer: String,
    pub score: f64,
}

/// Pre-computed search index over an FAQ corpus.
pub struct FaqIndex {
    entries: Vec<QuestionEntry>,
    weights: Vec<HashMap<String, f64>>,
    stats: TermStats,
    corrector: SpellCorrector,
}

impl FaqIndex {
    /// Build the index: preprocess every question, compute bitmasks, TF-IDF
    /// weights, and the spell-correction vocabulary.
    pub fn build(corpus: &FaqCorpus) -> Self {
        let entries: Vec<QuestionEntry> = corpus
            .entries
            .iter()
            .map(|e| {
                let question_lower = e.question.to_lowercase();
                let processed = preprocess(&e.question);
                QuestionEntry {
                    lower_mask: char_bitmask(&question_lower),
                    processed_mask: char_bitmask(&processed),
                    question: e.question.clone(),
                    answer: e.answer.clone(),
                    question_lower,
                    processed,
                }
            })
            .collect();

        let docs: Vec<Vec<String>> = corpus.entries.iter().map(|e| tokenize(&e.question)).collect();
        let stats = TermStats::build(&docs);
        let weights: Vec<HashMap<String, f64>> =
            docs.iter().map(|d| weight_vector(d, &stats)).collect();
        let corrector = SpellCorrector::from_texts(corpus.entries.iter().map(|e| e.question.as_str()));

        debug!(entries = entries.len(), vocab_terms = stats.freq.len(), "Built FAQ index");
        Self { entries, weights, stats, corrector }
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranked search: spell-correct and preprocess the query, score every
    /// entry with both the fuzzy and TF-IDF legs, dedupe keeping the higher
    /// score, and return the top `top_k` in descending score order.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        let corrected = self.corrector.correct(query);
        let processed = preprocess(&corrected);
        if processed.is_empty() {
            return Vec::new();
        }
        let query_mask = char_bitmask(&processed);
        let query_tokens: Vec<String> =
            processed.split_whitespace().map(str::to_string).collect();
        let query_weights = weight_vector(&query_tokens, &self.stats);

        let mut hits: Vec<SearchHit> = self
            .entries
            .par_iter()
            .zip(self.weights.par_iter())
            .filter_map(|(entry, doc_weights)| {
                // A zero mask means no ASCII alphanumerics to compare, so
                // only prune on a definite mismatch
                if query_mask != 0
                    && entry.processed_mask != 0
                    && query_mask & entry.processed_mask == 0
                {
                    return None;
                }
                let fuzzy = fuzzy_ratio(&processed, &entry.processed);
                let tfidf = cosine(&query_weights, doc_weights);
                let score = match (fuzzy > FUZZY_FLOOR, tfidf > TFIDF_FLOOR) {
                    (true, true) => fuzzy.max(tfidf),
                    (true, false) => fuzzy,
                    (false, true) => tfidf,
                    (false, false) => return None,
                };
                Some(SearchHit {
                    question: entry.question.clone(),
                    answer: entry.answer.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_unstable_by(|a, b| {
            b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k);
        debug!(query, corrected, results = hits.len(), "Search complete");
        hits
    }

    /// Autocomplete suggestions: fuzzy match over raw question text, best
    /// [`SUGGESTION_LIMIT`] above [`SUGGESTION_FLOOR`].
    pub fn suggest(&self, query: &str) -> Vec<String> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        let query_mask = char_bitmask(&q);

        let mut scored: Vec<(f64, &str)> = self
            .entries
            .par_iter()
            .filter_map(|entry| {
                if query_mask != 0 && entry.lower_mask != 0 && query_mask & entry.lower_mask == 0 {
                    return None;
                }
                let score = fuzzy_ratio(&q, &entry.question_lower);
                (score > SUGGESTION_FLOOR).then_some((score, entry.question.as_str()))
            })
            .collect();

        scored.sort_unstable_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(SUGGESTION_LIMIT);
        scored.into_iter().map(|(_, q)| q.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::FaqEntry;

    fn fixture_index() -> FaqIndex {
        let corpus = FaqCorpus::from_entries(vec![
            FaqEntry {
                question: "What is your refund policy?".into(),
                answer: "Refunds within <b>30 days</b>.".into(),
            },
            FaqEntry {
                question: "How do I reset my password?".into(),
                answer: "Use the forgot-password link.".into(),
            },
            FaqEntry {
                question: "How do I track my order?".into(),
                answer: "Tracking is emailed at dispatch.".into(),
            },
        ]);
        FaqIndex::build(&corpus)
    }

    #[test]
    fn exact_question_ranks_first() {
        let index = fixture_index();
        let hits = index.search("What is your refund policy?", DEFAULT_TOP_K);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].question, "What is your refund policy?");
        assert!(hits[0].score > 0.99);
    }

    #[test]
    fn typos_are_corrected_before_matching() {
        let index = fixture_index();
        let hits = index.search("refnd polciy", DEFAULT_TOP_K);
        assert!(!hits.is_empty(), "typo query should still match");
        assert_eq!(hits[0].question, "What is your refund policy?");
    }

    #[test]
    fn reordered_tokens_still_match() {
        let index = fixture_index();
        let hits = index.search("password reset", DEFAULT_TOP_K);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].question, "How do I reset my password?");
    }

    #[test]
    fn empty_and_stopword_only_queries_return_nothing() {
        let index = fixture_index();
        assert!(index.search("", DEFAULT_TOP_K).is_empty());
        assert!(index.search("what is the", DEFAULT_TOP_K).is_empty());
    }

    #[test]
    fn results_are_deduplicated_per_question() {
        let index = fixture_index();
        // Matches both the fuzzy and TF-IDF legs; must appear once
        let hits = index.search("refund policy", DEFAULT_TOP_K);
        let count =
            hits.iter().filter(|h| h.question == "What is your refund policy?").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn unrelated_queries_return_nothing() {
        let index = fixture_index();
        assert!(index.search("quantum chromodynamics", DEFAULT_TOP_K).is_empty());
    }

    #[test]
    fn suggestions_match_partial_input() {
        let index = fixture_index();
        let suggestions = index.suggest("refund");
        assert_eq!(suggestions, vec!["What is your refund policy?".to_string()]);
    }

    #[test]
    fn suggestions_empty_for_blank_input() {
        let index = fixture_index();
        assert!(index.suggest("   ").is_empty());
    }

    #[test]
    fn suggestions_capped_at_limit() {
        let entries: Vec<FaqEntry> = (0..10)
            .map(|i| FaqEntry {
                question: format!("How do I reset device number {i}?"),
                answer: "...".into(),
            })
            .collect();
        let index = FaqIndex::build(&FaqCorpus::from_entries(entries));
        let suggestions = index.suggest("reset device");
        assert_eq!(suggestions.len(), SUGGESTION_LIMIT);
    }

    #[test]
    fn non_ascii_questions_match_and_suggest() {
        let corpus = FaqCorpus::from_entries(vec![FaqEntry {
            question: "退款政策".into(),
            answer: "30 天内全额退款。".into(),
        }]);
        let index = FaqIndex::build(&corpus);

        // Non-ASCII text carries an empty character mask; the pre-filter
        // must not reject an exact match
        let hits = index.search("退款政策", DEFAULT_TOP_K);
        assert!(!hits.is_empty(), "exact non-ASCII query should match");
        assert_eq!(hits[0].question, "退款政策");

        let suggestions = index.suggest("退款");
        assert_eq!(suggestions, vec!["退款政策".to_string()]);
    }

    #[test]
    fn fuzzy_ratio_bounds() {
        assert_eq!(fuzzy_ratio("", "anything"), 0.0);
        assert_eq!(fuzzy_ratio("same", "same"), 1.0);
        assert!(fuzzy_ratio("track order", "order track") > 0.99);
        let partial = fuzzy_ratio("refund", "what is your refund policy");
        assert!(partial > 0.99, "partial window should find the embedded token: {partial}");
    }
}
