//! `digest styles` command - List available summary styles

use anyhow::Result;
use digest_core::style::SummaryStyle;

pub fn run() -> Result<()> {
    println!("Available summary styles:\n");
    for style in SummaryStyle::ALL {
        println!("  {:<14} {} - {}", style.id(), style.name(), style.description());
    }
    Ok(())
}
