//! `digest analyze` command - Text statistics without summarization

use anyhow::{bail, Context, Result};
use digest_core::analyze::TextAnalyzer;
use digest_core::{Config, PdfDocument};
use std::path::PathBuf;

pub async fn run(config: Config, file: PathBuf, json: bool) -> Result<()> {
    let doc = PdfDocument::load(&file)
        .with_context(|| format!("Failed to read PDF: {}", file.display()))?;

    if !doc.has_text() {
        bail!("No text could be extracted from: {}", file.display());
    }

    let analyzer = TextAnalyzer::new(
        config.analysis.top_words,
        config.analysis.stop_words.iter().cloned(),
    );
    let analysis = analyzer.analyze(&doc.full_text());

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("📄 {}", file.display());
    println!("   Pages:              {}", doc.page_count());
    println!("   Words:              {}", analysis.word_count);
    println!("   Characters:         {}", analysis.char_count);
    println!("   Sentences:          {}", analysis.sentence_count);
    println!("   Avg words/sentence: {}", analysis.avg_words_per_sentence);

    if !analysis.word_freq.is_empty() {
        println!("\n🔤 Most frequent words:");
        for entry in &analysis.word_freq {
            println!("   {:<20} {}", entry.word, entry.count);
        }
    }

    Ok(())
}
