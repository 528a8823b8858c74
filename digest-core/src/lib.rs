//! Core library for Digest, a PDF document summarization service.
//!
//! Digest extracts text from PDFs, splits it into model-sized chunks,
//! summarizes each chunk through an external model CLI, merges the partial
//! summaries according to the chosen style, analyzes the source text, and
//! exports the result as plain text, markdown, or JSON.

pub mod analyze;
pub mod api;
pub mod chunk;
pub mod combine;
pub mod config;
pub mod export;
pub mod model;
pub mod pdf;
pub mod pipeline;
pub mod server;
pub mod style;

pub use analyze::{AnalysisResult, TextAnalyzer, WordFrequency};
pub use chunk::{Chunk, Chunker};
pub use config::Config;
pub use export::{ExportFile, ExportFormat, ExportPayload};
pub use model::{ModelClient, ModelError, Summarizer};
pub use pdf::{PdfDocument, PdfError, TocEntry};
pub use pipeline::{summarize_document, PartialSummary, SummaryOptions, SummaryOutcome};
pub use style::SummaryStyle;
