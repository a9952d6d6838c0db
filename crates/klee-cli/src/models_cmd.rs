//! `klee models` — show registered models and provider key status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use klee_core::config::{get_config_path, load_config};
use klee_llm::ModelRegistry;
use klee_providers::specs::{find_by_name, resolve_api_key};

/// Run the models command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    println!();
    println!("{}", "🤖 Klee Models".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        if path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".red().to_string()
        }
    );

    let default = config.effective_default_model().unwrap_or("(none)");
    println!("  {:<18} {}", "Default:".bold(), default);

    println!();
    println!("  {}", "Models:".bold());
    for (i, model) in config.models.iter().enumerate() {
        let marker = if model.name == default { "*" } else { " " };
        let status = match find_by_name(&model.provider) {
            None => format!("{}", format!("unknown provider '{}'", model.provider).red()),
            Some(spec) => {
                let key = resolve_api_key(config.provider(spec.name), spec);
                if key.is_some() {
                    format!("{} {}", spec.display_name, "✓ key set".green())
                } else if spec.is_local {
                    format!("{} {}", spec.display_name, "· local".dimmed())
                } else {
                    format!("{} {}", spec.display_name, "· no key".dimmed())
                }
            }
        };
        println!(
            "  {marker} {:>2}. {:<32} {:<40} {}",
            i + 1,
            model.name,
            model.model.dimmed(),
            status
        );
    }

    println!();
    match ModelRegistry::from_config(&config) {
        Ok(registry) => println!(
            "  {} registry valid ({} models)",
            "✓".green(),
            registry.len()
        ),
        Err(e) => println!("  {} {}", "✗".red(), e),
    }
    println!();

    Ok(())
}
