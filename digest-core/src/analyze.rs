//! Text analysis.
//!
//! Computes the basic metrics reported alongside a summary: word and
//! sentence counts, average sentence length, and a stop-worded word
//! frequency table. Sentence detection uses the same terminal-punctuation
//! heuristic as the chunker.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single entry in the word frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

/// Metrics computed from raw document text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AnalysisResult {
    pub word_count: usize,
    pub char_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f64,
    /// Most frequent words, descending; ties keep first-occurrence order
    pub word_freq: Vec<WordFrequency>,
}

/// Computes [`AnalysisResult`] values using a configured stop-word set
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    top_words: usize,
    stop_words: HashSet<String>,
}

impl TextAnalyzer {
    pub fn new(top_words: usize, stop_words: impl IntoIterator<Item = String>) -> Self {
        Self {
            top_words,
            stop_words: stop_words.into_iter().collect(),
        }
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let word_count = text
            .split_whitespace()
            .filter(|token| token.chars().any(|c| c.is_alphanumeric()))
            .count();
        let char_count = text.chars().count();
        let sentence_count = count_sentences(text);

        let avg_words_per_sentence = if sentence_count == 0 {
            0.0
        } else {
            round2(word_count as f64 / sentence_count as f64)
        };

        AnalysisResult {
            word_count,
            char_count,
            sentence_count,
            avg_words_per_sentence,
            word_freq: self.word_frequencies(text),
        }
    }

    /// Case-insensitive frequency of alphabetic words of three letters or
    /// more, excluding stop words, capped at the configured top-N
    fn word_frequencies(&self, text: &str) -> Vec<WordFrequency> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();

        for raw in text.split(|c: char| !c.is_alphabetic()) {
            if raw.chars().count() < 3 {
                continue;
            }
            let word = raw.to_lowercase();
            if self.stop_words.contains(&word) {
                continue;
            }
            match counts.get_mut(&word) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(word.clone(), 1);
                    first_seen.push(word);
                }
            }
        }

        // Stable sort over first-occurrence order makes ties deterministic
        let mut entries: Vec<WordFrequency> = first_seen
            .into_iter()
            .map(|word| {
                let count = counts[&word];
                WordFrequency { word, count }
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(self.top_words);
        entries
    }
}

/// Count sentences as runs of terminal punctuation, with a floor of one for
/// any non-empty text
fn count_sentences(text: &str) -> usize {
    if text.trim().is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut in_run = false;
    for c in text.chars() {
        if matches!(c, '.' | '!' | '?') {
            if !in_run {
                count += 1;
                in_run = true;
            }
        } else {
            in_run = false;
        }
    }

    count.max(1)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
