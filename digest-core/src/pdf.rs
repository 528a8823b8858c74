//! PDF extraction.
//!
//! Reads a PDF into a simple page/text model for the summarization
//! pipeline. Byte-level parsing is delegated to `lopdf`; this module only
//! assembles page texts and document metadata.

use lopdf::Document;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during PDF processing
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF file: {0}")]
    OpenError(String),

    #[error("Failed to read PDF: {0}")]
    ReadError(#[from] lopdf::Error),

    #[error("PDF has no pages")]
    EmptyDocument,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A single page from a PDF document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfPage {
    /// Page index (0-based)
    pub index: u32,
    /// Extracted text
    pub text: String,
}

impl PdfPage {
    /// Check if this page has no extractable content
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// PDF metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub page_count: u32,
}

/// A PDF document with extracted text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfDocument {
    /// Path to the PDF file
    pub path: PathBuf,
    /// Pages in the document
    pub pages: Vec<PdfPage>,
    /// Document metadata
    pub metadata: PdfMetadata,
}

impl PdfDocument {
    /// Load a PDF document from a file path
    pub fn load(path: &Path) -> Result<Self, PdfError> {
        debug!("Loading PDF from: {}", path.display());

        let doc = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;

        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(PdfError::EmptyDocument);
        }

        debug!("PDF has {} pages", page_count);

        let metadata = Self::extract_metadata(&doc, page_count);

        let mut pages = Vec::new();
        for (page_num, _page_id) in doc.get_pages() {
            let text = doc
                .extract_text(&[page_num])
                .unwrap_or_else(|_| String::new());
            pages.push(PdfPage {
                index: page_num - 1,
                text,
            });
        }

        pages.sort_by_key(|p| p.index);

        Ok(PdfDocument {
            path: path.to_path_buf(),
            pages,
            metadata,
        })
    }

    /// Extract metadata from the document info dictionary
    fn extract_metadata(doc: &Document, page_count: u32) -> PdfMetadata {
        let mut metadata = PdfMetadata {
            page_count,
            ..Default::default()
        };

        if let Ok(info) = doc.trailer.get(b"Info") {
            if let Ok(info_ref) = info.as_reference() {
                if let Ok(info_dict) = doc.get_dictionary(info_ref) {
                    if let Ok(title) = info_dict.get(b"Title") {
                        if let Ok(s) = title.as_string() {
                            metadata.title = Some(s.to_string());
                        }
                    }
                    if let Ok(author) = info_dict.get(b"Author") {
                        if let Ok(s) = author.as_string() {
                            metadata.author = Some(s.to_string());
                        }
                    }
                }
            }
        }

        metadata
    }

    /// Get all text from the document as a single string
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Get the number of pages
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Whether the document has any extractable text at all
    pub fn has_text(&self) -> bool {
        self.pages.iter().any(|p| !p.is_empty())
    }

    /// Detect a table of contents from heading-looking lines.
    ///
    /// Text extraction loses font information, so this is a heuristic over
    /// line shape: chapter/section/part markers, decimal numbering, and
    /// short all-caps lines. Documents without such structure yield an
    /// empty list.
    pub fn toc(&self) -> Vec<TocEntry> {
        let mut entries = Vec::new();

        for page in &self.pages {
            for line in page.text.lines() {
                let line = line.trim();
                if let Some((level, title)) = classify_heading(line) {
                    entries.push(TocEntry {
                        level,
                        title,
                        page: page.index + 1,
                    });
                }
            }
        }

        debug!("Detected {} TOC entries", entries.len());
        entries
    }
}

/// One detected heading: nesting level, title, 1-based page number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TocEntry {
    pub level: u32,
    pub title: String,
    pub page: u32,
}

fn chapter_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(chapter|part)\s+(\d+|[ivxlc]+)\b").unwrap())
}

fn section_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^section\s+\d+\b").unwrap())
}

fn numbered_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)*)[.)]?\s+[A-Z]").unwrap())
}

/// Decide whether a line looks like a heading and at which nesting level
fn classify_heading(line: &str) -> Option<(u32, String)> {
    // Headings are short; anything paragraph-sized is body text
    if line.len() < 3 || line.len() > 150 {
        return None;
    }

    if chapter_pattern().is_match(line) {
        return Some((1, line.to_string()));
    }

    if section_pattern().is_match(line) {
        return Some((2, line.to_string()));
    }

    if let Some(caps) = numbered_pattern().captures(line) {
        let level = caps[1].split('.').count() as u32;
        return Some((level, line.to_string()));
    }

    // Short all-caps lines are usually headings in extracted text
    let alpha: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    if !alpha.is_empty() && line.len() < 100 && alpha.iter().all(|c| c.is_uppercase()) {
        return Some((1, line.to_string()));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_pages(texts: &[&str]) -> PdfDocument {
        PdfDocument {
            path: PathBuf::from("test.pdf"),
            pages: texts
                .iter()
                .enumerate()
                .map(|(i, t)| PdfPage {
                    index: i as u32,
                    text: t.to_string(),
                })
                .collect(),
            metadata: PdfMetadata {
                page_count: texts.len() as u32,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_full_text_joins_pages() {
        let doc = doc_with_pages(&["First page.", "Second page."]);
        let text = doc.full_text();
        assert!(text.contains("First page."));
        assert!(text.contains("Second page."));
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_has_text_detects_blank_documents() {
        let blank = doc_with_pages(&["", "   \n"]);
        assert!(!blank.has_text());

        let mixed = doc_with_pages(&["", "content"]);
        assert!(mixed.has_text());
    }

    #[test]
    fn test_load_missing_file_is_open_error() {
        let err = PdfDocument::load(Path::new("/nonexistent/missing.pdf")).unwrap_err();
        assert!(matches!(err, PdfError::OpenError(_)));
    }

    #[test]
    fn test_toc_detects_headings_with_pages() {
        let doc = doc_with_pages(&[
            "Chapter 1 Getting Started\nBody text follows here.",
            "Plain prose without any heading shape on this page.",
            "Section 2 Advanced Topics\nMore body text.",
        ]);

        let toc = doc.toc();
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0], TocEntry {
            level: 1,
            title: "Chapter 1 Getting Started".to_string(),
            page: 1,
        });
        assert_eq!(toc[1].level, 2);
        assert_eq!(toc[1].page, 3);
    }

    #[test]
    fn test_toc_nesting_follows_decimal_numbering() {
        let doc = doc_with_pages(&["1. Introduction\nText.\n1.2 Background\nText.\n1.2.1 History"]);
        let levels: Vec<u32> = doc.toc().iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
    }

    #[test]
    fn test_toc_empty_for_unstructured_text() {
        let doc = doc_with_pages(&["Just an ordinary paragraph. Nothing resembling a heading."]);
        assert!(doc.toc().is_empty());
    }

    #[test]
    fn test_classify_heading_accepts_caps_and_rejects_body() {
        assert_eq!(classify_heading("EXECUTIVE SUMMARY"), Some((1, "EXECUTIVE SUMMARY".to_string())));
        assert!(classify_heading("In this chapter we discuss").is_none());
        assert!(classify_heading("ok").is_none());
        let long = "A".repeat(200);
        assert!(classify_heading(&long).is_none());
    }
}
