//! Text normalization pipeline and spell correction.
//!
//! Queries and questions go through the same pipeline before scoring:
//! lowercase, strip punctuation, drop stopwords. Spell correction snaps
//! unknown query tokens to the nearest corpus-vocabulary term by edit
//! distance so typos still match.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// English stopwords dropped during preprocessing.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can",
    "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further",
    "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor", "not",
    "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own",
    "s", "same", "she", "should", "so", "some", "such", "t", "than", "that", "the", "their",
    "theirs", "them", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "you", "your", "yours",
];

fn punct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]+").unwrap())
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

/// Lowercase and strip punctuation, keeping word and whitespace characters.
pub fn normalize(text: &str) -> String {
    punct_re().replace_all(&text.to_lowercase(), "").into_owned()
}

/// Full pipeline: normalize, then drop stopwords.
pub fn preprocess(text: &str) -> String {
    normalize(text)
        .split_whitespace()
        .filter(|w| !is_stopword(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Preprocess and split into tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    preprocess(text).split_whitespace().map(str::to_string).collect()
}

/// Levenshtein edit distance over bytes.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Maximum edit distance a token may be from a vocabulary term to be corrected.
const MAX_CORRECTION_DISTANCE: usize = 2;

/// Spell corrector backed by the corpus vocabulary.
///
/// A token already in the vocabulary is left alone. Otherwise the nearest
/// vocabulary term within [`MAX_CORRECTION_DISTANCE`] wins, with corpus
/// frequency breaking distance ties. Tokens with no near neighbor pass
/// through unchanged.
pub struct SpellCorrector {
    vocab: HashMap<String, usize>,
}

impl SpellCorrector {
    /// Build the vocabulary from normalized corpus texts.
    pub fn from_texts<'a>(texts: impl Iterator<Item = &'a str>) -> Self {
        let mut vocab: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for word in normalize(text).split_whitespace() {
                *vocab.entry(word.to_string()).or_default() += 1;
            }
        }
        Self { vocab }
    }

    fn correct_word<'a>(&'a self, word: &'a str) -> &'a str {
        if word.len() < 3 || self.vocab.contains_key(word) {
            return word;
        }
        let mut best: Option<(&str, usize, usize)> = None;
        for (term, &freq) in &self.vocab {
            // Length difference lower-bounds the edit distance
            if term.len().abs_diff(word.len()) > MAX_CORRECTION_DISTANCE {
                continue;
            }
            let dist = edit_distance(word, term);
            if dist > MAX_CORRECTION_DISTANCE {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, best_dist, best_freq)) => {
                    dist < best_dist || (dist == best_dist && freq > best_freq)
                }
            };
            if better {
                best = Some((term, dist, freq));
            }
        }
        best.map_or(word, |(term, _, _)| term)
    }

    /// Correct each token of a raw query, preserving token order.
    pub fn correct(&self, query: &str) -> String {
        normalize(query)
            .split_whitespace()
            .map(|w| self.correct_word(w).to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopword_list_is_sorted() {
        // binary_search in is_stopword depends on this
        assert!(STOPWORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn preprocess_strips_punctuation_and_stopwords() {
        assert_eq!(preprocess("What is your Refund Policy?!"), "refund policy");
        assert_eq!(preprocess("How do I track my order?"), "track order");
    }

    #[test]
    fn preprocess_of_only_stopwords_is_empty() {
        assert_eq!(preprocess("what is the"), "");
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("refund", "refund"), 0);
        assert_eq!(edit_distance("refnd", "refund"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
    }

    #[test]
    fn corrector_fixes_near_misses() {
        let corrector =
            SpellCorrector::from_texts(["refund policy", "track order", "reset password"].into_iter());
        assert_eq!(corrector.correct("refnd polcy"), "refund policy");
        assert_eq!(corrector.correct("reset passwrd"), "reset password");
    }

    #[test]
    fn corrector_leaves_known_and_far_tokens_alone() {
        let corrector = SpellCorrector::from_texts(["refund policy"].into_iter());
        assert_eq!(corrector.correct("refund"), "refund");
        // "zzzzzzzz" has no neighbor within distance 2
        assert_eq!(corrector.correct("zzzzzzzz"), "zzzzzzzz");
    }

    #[test]
    fn corrector_skips_short_tokens() {
        // 1-2 character tokens are too ambiguous to correct
        let corrector = SpellCorrector::from_texts(["track order"].into_iter());
        assert_eq!(corrector.correct("tr"), "tr");
    }
}
