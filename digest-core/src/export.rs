//! Summary export.
//!
//! Serializes a finished summary into a downloadable file: plain text with
//! a metadata footer, markdown with headings and a stats list, or a JSON
//! envelope carrying the payload verbatim.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: '{0}'. Supported formats: text, markdown, json")]
    UnsupportedFormat(String),

    #[error("Failed to serialize export payload: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Supported export formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl ExportFormat {
    /// Parse a format identifier from the wire
    pub fn parse(s: &str) -> Result<Self, ExportError> {
        match s {
            "text" => Ok(ExportFormat::Text),
            "markdown" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }

    fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain; charset=utf-8",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Metadata echoed into export headers and footers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExportMeta {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub word_count: Option<usize>,
    #[serde(default)]
    pub sentence_count: Option<usize>,
    #[serde(default)]
    pub avg_words_per_sentence: Option<f64>,
}

/// Everything needed to render one export; constructed fresh per request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExportPayload {
    pub filename: String,
    /// The format this payload was requested in
    #[serde(default)]
    pub format: ExportFormat,
    pub combined_summary: String,
    #[serde(default)]
    pub summary_parts: Vec<String>,
    #[serde(default)]
    pub meta: ExportMeta,
}

/// A rendered export file, content base64-encoded for the JSON response
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
    pub content_type: String,
}

/// Render `payload` in the requested format
pub fn export(payload: &ExportPayload, format: ExportFormat) -> Result<ExportFile, ExportError> {
    let bytes = match format {
        ExportFormat::Text => render_text(payload).into_bytes(),
        ExportFormat::Markdown => render_markdown(payload).into_bytes(),
        // The JSON envelope is the payload verbatim, so it round-trips
        ExportFormat::Json => serde_json::to_vec_pretty(payload)?,
    };

    Ok(ExportFile {
        filename: format!("{}_summary.{}", file_stem(&payload.filename), format.extension()),
        content: BASE64.encode(bytes),
        content_type: format.content_type().to_string(),
    })
}

fn render_text(payload: &ExportPayload) -> String {
    let mut content = format!("SUMMARY OF: {}\n", payload.filename);
    content.push_str(&format!("Generated on: {}\n", date_or_now(&payload.meta)));
    content.push_str(&format!(
        "Document stats: {} pages, {} words\n\n",
        display_opt(payload.meta.page_count),
        display_opt(payload.meta.word_count),
    ));
    content.push_str("SUMMARY:\n\n");

    if !payload.combined_summary.is_empty() {
        content.push_str(&payload.combined_summary);
    } else {
        for (i, part) in payload.summary_parts.iter().enumerate() {
            content.push_str(&format!("--- Part {} ---\n{}\n\n", i + 1, part));
        }
    }

    content
}

fn render_markdown(payload: &ExportPayload) -> String {
    let mut content = format!("# Summary of {}\n\n", payload.filename);
    content.push_str(&format!("*Generated on: {}*\n\n", date_or_now(&payload.meta)));
    content.push_str("**Document statistics:**\n");
    content.push_str(&format!("- Pages: {}\n", display_opt(payload.meta.page_count)));
    content.push_str(&format!("- Words: {}\n", display_opt(payload.meta.word_count)));
    content.push_str(&format!(
        "- Sentences: {}\n\n",
        display_opt(payload.meta.sentence_count)
    ));
    content.push_str("## Summary Content\n\n");

    if !payload.combined_summary.is_empty() {
        content.push_str(&payload.combined_summary);
    } else {
        for (i, part) in payload.summary_parts.iter().enumerate() {
            content.push_str(&format!("### Part {}\n\n{}\n\n", i + 1, part));
        }
    }

    content
}

fn date_or_now(meta: &ExportMeta) -> String {
    meta.date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
}

fn display_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn file_stem(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(format: ExportFormat) -> ExportPayload {
        ExportPayload {
            filename: "report.pdf".to_string(),
            format,
            combined_summary: "The combined summary.".to_string(),
            summary_parts: vec!["Part one.".to_string(), "Part two.".to_string()],
            meta: ExportMeta {
                date: Some("2026-08-25 12:00:00".to_string()),
                page_count: Some(7),
                word_count: Some(1234),
                sentence_count: Some(80),
                avg_words_per_sentence: Some(15.43),
            },
        }
    }

    fn decode(file: &ExportFile) -> String {
        String::from_utf8(BASE64.decode(&file.content).unwrap()).unwrap()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(ExportFormat::parse("text").unwrap(), ExportFormat::Text);
        assert_eq!(
            ExportFormat::parse("markdown").unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!(ExportFormat::parse("json").unwrap(), ExportFormat::Json);
        assert!(matches!(
            ExportFormat::parse("docx"),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_text_export_has_footer_and_summary() {
        let file = export(&payload(ExportFormat::Text), ExportFormat::Text).unwrap();
        assert_eq!(file.filename, "report_summary.txt");
        assert_eq!(file.content_type, "text/plain; charset=utf-8");

        let content = decode(&file);
        assert!(content.contains("SUMMARY OF: report.pdf"));
        assert!(content.contains("Generated on: 2026-08-25 12:00:00"));
        assert!(content.contains("7 pages, 1234 words"));
        assert!(content.contains("The combined summary."));
    }

    #[test]
    fn test_text_export_falls_back_to_parts() {
        let mut p = payload(ExportFormat::Text);
        p.combined_summary = String::new();
        let content = decode(&export(&p, ExportFormat::Text).unwrap());
        assert!(content.contains("--- Part 1 ---\nPart one."));
        assert!(content.contains("--- Part 2 ---\nPart two."));
    }

    #[test]
    fn test_markdown_export_structure() {
        let file = export(&payload(ExportFormat::Markdown), ExportFormat::Markdown).unwrap();
        assert_eq!(file.filename, "report_summary.md");

        let content = decode(&file);
        assert!(content.starts_with("# Summary of report.pdf"));
        assert!(content.contains("- Pages: 7"));
        assert!(content.contains("- Sentences: 80"));
        assert!(content.contains("## Summary Content"));
    }

    #[test]
    fn test_json_export_round_trips() {
        let original = payload(ExportFormat::Json);
        let file = export(&original, ExportFormat::Json).unwrap();
        assert_eq!(file.filename, "report_summary.json");
        assert_eq!(file.content_type, "application/json");

        // Every field comes back, the requested format included
        let raw: serde_json::Value = serde_json::from_str(&decode(&file)).unwrap();
        assert_eq!(raw.get("format").and_then(|v| v.as_str()), Some("json"));

        let parsed: ExportPayload = serde_json::from_str(&decode(&file)).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_missing_meta_renders_placeholders() {
        let p = ExportPayload {
            filename: "doc.pdf".to_string(),
            combined_summary: "Summary.".to_string(),
            ..Default::default()
        };
        let content = decode(&export(&p, ExportFormat::Text).unwrap());
        assert!(content.contains("N/A pages, N/A words"));
    }

    #[test]
    fn test_file_stem_handles_odd_names() {
        assert_eq!(file_stem("report.pdf"), "report");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(file_stem("noextension"), "noextension");
        assert_eq!(file_stem(".hidden"), ".hidden");
    }
}
