//! Text chunking.
//!
//! Splits extracted document text into bounded-size chunks for the
//! summarization model. Paragraph boundaries are preferred, then sentence
//! boundaries, then a hard character split as a last resort. Chunk order is
//! the sole ordering key used downstream; concatenating all chunks
//! reproduces the input modulo boundary whitespace.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// A bounded-size contiguous piece of a document's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Sequence index, 0-based; ordering key for reassembly
    pub index: usize,
    /// Chunk text
    pub text: String,
    /// Set when the chunk was produced by a hard split inside a sentence
    /// that exceeded the budget on its own
    pub truncated: bool,
}

/// Splits text into chunks no longer than a configured character budget
#[derive(Debug, Clone)]
pub struct Chunker {
    max_chunk_chars: usize,
}

fn sentence_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Terminal punctuation run followed by whitespace. Deliberately the same
    // simple heuristic the analyzer uses, not an NLP sentence splitter.
    RE.get_or_init(|| Regex::new(r"([.!?]+)\s+").unwrap())
}

impl Chunker {
    pub fn new(max_chunk_chars: usize) -> Self {
        assert!(max_chunk_chars > 0, "chunk budget must be positive");
        Self { max_chunk_chars }
    }

    /// Split `text` into ordered chunks.
    ///
    /// Empty or whitespace-only input yields no chunks; any other input
    /// yields at least one. Each chunk's character count stays within the
    /// budget; fragments cut mid-sentence are flagged `truncated`.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut pieces: Vec<(String, bool)> = Vec::new();
        let mut current = String::new();

        for paragraph in text.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }

            if char_len(paragraph) > self.max_chunk_chars {
                // Oversize paragraph: flush what we have, then go down a tier
                if !current.is_empty() {
                    pieces.push((std::mem::take(&mut current), false));
                }
                self.pack_sentences(paragraph, &mut pieces);
                continue;
            }

            if current.is_empty() {
                current.push_str(paragraph);
            } else if char_len(&current) + 2 + char_len(paragraph) <= self.max_chunk_chars {
                current.push_str("\n\n");
                current.push_str(paragraph);
            } else {
                pieces.push((std::mem::take(&mut current), false));
                current.push_str(paragraph);
            }
        }

        if !current.is_empty() {
            pieces.push((current, false));
        }

        debug!(
            "Chunked {} chars into {} chunks (budget {})",
            text.len(),
            pieces.len(),
            self.max_chunk_chars
        );

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, (text, truncated))| Chunk {
                index,
                text,
                truncated,
            })
            .collect()
    }

    /// Greedily pack the sentences of an oversize paragraph
    fn pack_sentences(&self, paragraph: &str, pieces: &mut Vec<(String, bool)>) {
        let mut current = String::new();

        for sentence in split_sentences(paragraph) {
            if char_len(&sentence) > self.max_chunk_chars {
                if !current.is_empty() {
                    pieces.push((std::mem::take(&mut current), false));
                }
                self.hard_split(&sentence, pieces);
                continue;
            }

            if current.is_empty() {
                current.push_str(&sentence);
            } else if char_len(&current) + 1 + char_len(&sentence) <= self.max_chunk_chars {
                current.push(' ');
                current.push_str(&sentence);
            } else {
                pieces.push((std::mem::take(&mut current), false));
                current.push_str(&sentence);
            }
        }

        if !current.is_empty() {
            pieces.push((current, false));
        }
    }

    /// Last resort: cut an atomic oversize sentence at the character budget.
    /// Every fragment is kept so no content is dropped; each is flagged.
    fn hard_split(&self, sentence: &str, pieces: &mut Vec<(String, bool)>) {
        warn!(
            "Sentence of {} chars exceeds chunk budget {}; hard-splitting",
            char_len(sentence),
            self.max_chunk_chars
        );

        let chars: Vec<char> = sentence.chars().collect();
        for fragment in chars.chunks(self.max_chunk_chars) {
            pieces.push((fragment.iter().collect(), true));
        }
    }
}

/// Split a paragraph into sentences at terminal punctuation, keeping the
/// punctuation with the preceding sentence
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut last = 0;

    for caps in sentence_boundary().captures_iter(text) {
        let punct = caps.get(1).unwrap();
        let sentence = text[last..punct.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        last = caps.get(0).unwrap().end();
    }

    let tail = text[last..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Strip all whitespace so reconstruction can be compared regardless of
    /// the separators inserted or dropped at chunk boundaries
    fn squash(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let chunker = Chunker::new(100);
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   \n\n  ").is_empty());
    }

    #[test]
    fn test_short_input_yields_single_chunk() {
        let chunker = Chunker::new(1000);
        let chunks = chunker.chunk("A short document. Nothing to split.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert!(!chunks[0].truncated);
    }

    #[test]
    fn test_paragraphs_pack_greedily() {
        // Two 998-char paragraphs fit one 2000-char chunk with the separator
        let para = "x".repeat(998);
        let text = vec![para; 10].join("\n\n");
        let chunks = Chunker::new(2000).chunk(&text);
        assert_eq!(chunks.len(), 5);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 2000);
        }
    }

    #[test]
    fn test_chunk_count_scales_inversely_with_budget() {
        let para = "word ".repeat(40); // ~200 chars
        let text = vec![para; 50].join("\n\n");
        let small = Chunker::new(500).chunk(&text).len();
        let large = Chunker::new(2000).chunk(&text).len();
        assert!(small > large);
    }

    #[test]
    fn test_reconstruction_preserves_content() {
        let text = "First sentence here. Second sentence follows! A third?\n\n\
                    Another paragraph with more words in it. And one more sentence.";
        let chunks = Chunker::new(40).chunk(text);
        assert!(chunks.len() > 1);

        let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(squash(&rebuilt), squash(text));

        // Indexes are dense and ordered
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_oversize_paragraph_splits_at_sentences() {
        let text = "One short sentence. Another short sentence. A third short one.";
        let chunks = Chunker::new(25).chunk(text);
        assert!(chunks.len() >= 3);
        // Sentence splitting keeps chunks within budget without truncation
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 25);
            assert!(!chunk.truncated);
        }
    }

    #[test]
    fn test_atomic_oversize_sentence_is_hard_split_and_flagged() {
        let sentence = "a".repeat(95); // no terminal punctuation until the end
        let text = format!("{}.", sentence);
        let chunks = Chunker::new(30).chunk(&text);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.truncated));
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 30));

        let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(squash(&rebuilt), squash(&text));
    }

    #[test]
    fn test_split_sentences_keeps_punctuation() {
        let sentences = split_sentences("Hello world. How are you? Fine!");
        assert_eq!(
            sentences,
            vec!["Hello world.", "How are you?", "Fine!"]
        );
    }

    #[test]
    fn test_split_sentences_without_trailing_punctuation() {
        let sentences = split_sentences("Complete sentence. Trailing fragment");
        assert_eq!(sentences, vec!["Complete sentence.", "Trailing fragment"]);
    }
}
