//! Summarization pipeline.
//!
//! The per-request flow: chunk the text, summarize each chunk through the
//! adapter, merge the partial summaries per the style policy, and compute
//! text statistics. An adapter failure on one chunk becomes a visible
//! placeholder partial; the remaining chunks still get summarized.

use crate::analyze::{AnalysisResult, TextAnalyzer};
use crate::chunk::Chunker;
use crate::combine::combine;
use crate::model::Summarizer;
use crate::style::SummaryStyle;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

/// Errors that fail a whole pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No text to summarize")]
    EmptyDocument,
}

/// Summary produced for exactly one chunk, tagged with the chunk's index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PartialSummary {
    pub index: usize,
    pub text: String,
    /// Set when the adapter failed for this chunk and `text` is a
    /// placeholder rather than a model summary
    #[serde(default)]
    pub failed: bool,
}

/// Options controlling one pipeline run
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    pub style: SummaryStyle,
    pub max_chunk_chars: usize,
}

impl SummaryOptions {
    pub fn new(max_chunk_chars: usize) -> Self {
        Self {
            style: SummaryStyle::default(),
            max_chunk_chars,
        }
    }

    pub fn with_style(mut self, style: SummaryStyle) -> Self {
        self.style = style;
        self
    }
}

/// Everything a summarization request produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutcome {
    pub summary_parts: Vec<PartialSummary>,
    pub combined_summary: String,
    pub analysis: AnalysisResult,
    pub chunk_count: usize,
}

/// Run the full pipeline over raw document text.
///
/// Chunks are summarized sequentially in index order, so no reordering can
/// be observed downstream regardless of adapter latency.
pub async fn summarize_document(
    summarizer: &dyn Summarizer,
    analyzer: &TextAnalyzer,
    text: &str,
    options: &SummaryOptions,
) -> Result<SummaryOutcome, PipelineError> {
    if text.trim().is_empty() {
        return Err(PipelineError::EmptyDocument);
    }

    let chunks = Chunker::new(options.max_chunk_chars).chunk(text);
    info!("Summarizing {} chunks (style: {})", chunks.len(), options.style);

    let mut summary_parts = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        info!("Summarizing chunk {}/{}", chunk.index + 1, chunks.len());

        match summarizer.summarize(&chunk.text, options.style).await {
            Ok(summary) => summary_parts.push(PartialSummary {
                index: chunk.index,
                text: summary,
                failed: false,
            }),
            Err(e) => {
                error!("Summary generation failed for chunk {}: {}", chunk.index + 1, e);
                summary_parts.push(PartialSummary {
                    index: chunk.index,
                    text: format!("[Summary generation failed for this section: {}]", e),
                    failed: true,
                });
            }
        }
    }

    let part_texts: Vec<String> = summary_parts.iter().map(|p| p.text.clone()).collect();
    let combined_summary = combine(&part_texts, options.style);
    let analysis = analyzer.analyze(text);

    Ok(SummaryOutcome {
        chunk_count: chunks.len(),
        summary_parts,
        combined_summary,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes a marker derived from the chunk's first word
    struct EchoSummarizer;

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(
            &self,
            chunk_text: &str,
            _style: SummaryStyle,
        ) -> Result<String, ModelError> {
            let first = chunk_text.split_whitespace().next().unwrap_or("");
            Ok(format!("summary({})", first))
        }
    }

    /// Fails on the nth call, succeeds otherwise
    struct FlakySummarizer {
        fail_on: usize,
        calls: AtomicUsize,
    }

    impl FlakySummarizer {
        fn failing_on(n: usize) -> Self {
            Self {
                fail_on: n,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Summarizer for FlakySummarizer {
        async fn summarize(
            &self,
            chunk_text: &str,
            _style: SummaryStyle,
        ) -> Result<String, ModelError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == self.fail_on {
                Err(ModelError::GenerationTimeout(1))
            } else {
                Ok(format!("ok: {}", chunk_text.split_whitespace().next().unwrap()))
            }
        }
    }

    fn analyzer() -> TextAnalyzer {
        TextAnalyzer::new(15, std::iter::empty())
    }

    fn three_paragraph_text() -> String {
        // Each paragraph fits a chunk on its own but not together
        "alpha one two three four five six seven.\n\n\
         bravo one two three four five six seven.\n\n\
         charlie one two three four five six seven."
            .to_string()
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let options = SummaryOptions::new(100);
        let result = summarize_document(&EchoSummarizer, &analyzer(), "  \n ", &options).await;
        assert!(matches!(result, Err(PipelineError::EmptyDocument)));
    }

    #[tokio::test]
    async fn test_parts_are_indexed_in_chunk_order() {
        let text = three_paragraph_text();
        let options = SummaryOptions::new(50);
        let outcome = summarize_document(&EchoSummarizer, &analyzer(), &text, &options)
            .await
            .unwrap();

        assert_eq!(outcome.chunk_count, 3);
        let indexes: Vec<usize> = outcome.summary_parts.iter().map(|p| p.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);

        let texts: Vec<&str> = outcome
            .summary_parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec!["summary(alpha)", "summary(bravo)", "summary(charlie)"]
        );
    }

    #[tokio::test]
    async fn test_combined_summary_preserves_order() {
        let text = three_paragraph_text();
        let options = SummaryOptions::new(50).with_style(SummaryStyle::Concise);
        let outcome = summarize_document(&EchoSummarizer, &analyzer(), &text, &options)
            .await
            .unwrap();

        assert_eq!(
            outcome.combined_summary,
            "summary(alpha)\n\nsummary(bravo)\n\nsummary(charlie)"
        );
    }

    #[tokio::test]
    async fn test_single_chunk_combined_is_verbatim() {
        let options = SummaryOptions::new(1000);
        let outcome = summarize_document(&EchoSummarizer, &analyzer(), "alpha text.", &options)
            .await
            .unwrap();

        assert_eq!(outcome.chunk_count, 1);
        assert_eq!(outcome.combined_summary, "summary(alpha)");
    }

    #[tokio::test]
    async fn test_one_failed_chunk_does_not_abort_the_run() {
        let text = three_paragraph_text();
        let options = SummaryOptions::new(50);
        let flaky = FlakySummarizer::failing_on(1);
        let outcome = summarize_document(&flaky, &analyzer(), &text, &options)
            .await
            .unwrap();

        assert_eq!(outcome.summary_parts.len(), 3);
        assert!(!outcome.summary_parts[0].failed);
        assert!(outcome.summary_parts[1].failed);
        assert!(!outcome.summary_parts[2].failed);

        // The surviving chunks' content is present plus one visible marker
        assert!(outcome.combined_summary.contains("ok: alpha"));
        assert!(outcome.combined_summary.contains("ok: charlie"));
        assert!(outcome
            .combined_summary
            .contains("Summary generation failed for this section"));
    }

    #[tokio::test]
    async fn test_analysis_is_computed_from_source_text() {
        let options = SummaryOptions::new(1000);
        let outcome = summarize_document(
            &EchoSummarizer,
            &analyzer(),
            "Hello world. Bye now.",
            &options,
        )
        .await
        .unwrap();

        assert_eq!(outcome.analysis.word_count, 4);
        assert_eq!(outcome.analysis.sentence_count, 2);
    }
}
