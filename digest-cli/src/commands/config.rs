//! `digest config` commands - View and manage configuration

use anyhow::Result;
use digest_core::Config;

/// Show current configuration
pub fn show(config: Config) -> Result<()> {
    println!("╭─────────────────────────────────────────╮");
    println!("│         Digest Configuration            │");
    println!("├─────────────────────────────────────────┤");
    println!("│ Model                                   │");
    println!("│   Binary:       {:<23} │", config.model.binary);
    println!("│   Model:        {:<23} │", config.model.default_model);
    println!("│   Timeout (s):  {:<23} │", config.model.timeout_secs);
    println!("├─────────────────────────────────────────┤");
    println!("│ Server                                  │");
    println!("│   Host:         {:<23} │", config.server.host);
    println!("│   Port:         {:<23} │", config.server.port);
    println!("│   URL:          {:<23} │", config.server_url());
    println!("├─────────────────────────────────────────┤");
    println!("│ Chunking                                │");
    println!("│   Max chars:    {:<23} │", config.chunking.max_chunk_chars);
    println!("├─────────────────────────────────────────┤");
    println!("│ Analysis                                │");
    println!("│   Top words:    {:<23} │", config.analysis.top_words);
    println!("│   Stop words:   {:<23} │", config.analysis.stop_words.len());
    println!("├─────────────────────────────────────────┤");
    println!("│ Logging                                 │");
    println!("│   Level:        {:<23} │", config.logging.level);
    println!("╰─────────────────────────────────────────╯");

    println!("\n📁 Paths:");
    if let Some(path) = Config::default_config_path() {
        let exists = path.exists();
        println!(
            "   Config: {} {}",
            path.display(),
            if exists { "✓" } else { "(not created)" }
        );
    }

    Ok(())
}

/// Initialize default configuration
pub fn init(force: bool) -> Result<()> {
    let path = Config::default_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

    if path.exists() && !force {
        println!(
            "⚠️  Configuration file already exists at: {}",
            path.display()
        );
        println!("   Use --force to overwrite.");
        return Ok(());
    }

    Config::ensure_dirs()?;

    let config = Config::default();
    config.save_to_file(&path)?;

    println!("✅ Created configuration file at: {}", path.display());
    println!("\n📝 Default configuration:");
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
