//! `klee init` — write the default configuration.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use klee_core::config::{get_config_path, save_config, Config};
use klee_core::utils::get_history_path;

/// Run the init command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "🤖 Klee — Setup".cyan().bold());
    println!();

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    if path.exists() {
        println!("  {} config already exists at {}", "✓".green(), path.display());
    } else {
        // Defaults only: keys from the environment stay out of the file
        save_config(&Config::default(), Some(&path))?;
        println!("  {} created config at {}", "✓".green(), path.display());
    }

    if let Some(history_dir) = get_history_path().parent() {
        std::fs::create_dir_all(history_dir)?;
    }

    println!();
    println!(
        "{}",
        "  Set SILICONFLOW_API_KEY (or edit the config), then run `klee check`.".green()
    );
    println!();

    Ok(())
}
