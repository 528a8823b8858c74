//! `digest summarize` command - One-shot PDF summarization

use anyhow::{bail, Context, Result};
use digest_core::analyze::TextAnalyzer;
use digest_core::pipeline::{summarize_document, SummaryOptions};
use digest_core::style::SummaryStyle;
use digest_core::{Config, ModelClient, PdfDocument};
use std::path::PathBuf;
use tracing::info;

pub async fn run(config: Config, file: PathBuf, style: SummaryStyle, format: &str) -> Result<()> {
    if !matches!(format, "text" | "markdown") {
        bail!("Unsupported output format: '{}'. Use text or markdown.", format);
    }

    let doc = PdfDocument::load(&file)
        .with_context(|| format!("Failed to read PDF: {}", file.display()))?;

    if !doc.has_text() {
        bail!("No text could be extracted from: {}", file.display());
    }

    let text = doc.full_text();
    info!(
        "Extracted {} pages ({} chars) from {}",
        doc.page_count(),
        text.chars().count(),
        file.display()
    );

    let model = ModelClient::new(&config.model.binary, &config.model.default_model)
        .with_timeout(config.model.timeout_secs);
    let analyzer = TextAnalyzer::new(
        config.analysis.top_words,
        config.analysis.stop_words.iter().cloned(),
    );
    let options = SummaryOptions::new(config.chunking.max_chunk_chars).with_style(style);

    let outcome = summarize_document(&model, &analyzer, &text, &options).await?;

    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string());

    match format {
        "markdown" => {
            println!("# Summary of {}\n", filename);
            println!("**Document statistics:**");
            println!("- Pages: {}", doc.page_count());
            println!("- Words: {}", outcome.analysis.word_count);
            println!("- Sentences: {}", outcome.analysis.sentence_count);
            println!("\n## Summary Content\n");
            println!("{}", outcome.combined_summary);
        }
        _ => {
            println!("{}", outcome.combined_summary);
        }
    }

    let failed = outcome.summary_parts.iter().filter(|p| p.failed).count();
    if failed > 0 {
        eprintln!(
            "⚠️  {} of {} sections failed to summarize; placeholders were inserted.",
            failed, outcome.chunk_count
        );
    }

    Ok(())
}
