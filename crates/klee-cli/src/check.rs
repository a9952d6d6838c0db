//! `klee check` — smoke-test the configured models end to end.
//!
//! Lists every registered model, asks the default model to introduce itself,
//! then asks the named model (when registered) for a small coding task.

use anyhow::{bail, Result};
use colored::Colorize;
use tracing::{error, info};

use klee_core::types::Message;
use klee_llm::LlmService;

const INTRO_PROMPT: &str = "Hello! In one sentence, introduce yourself and say which model you are.";
const CODE_PROMPT: &str = "Write a quicksort function in Python.";

/// Run the smoke test. Fails if any attempted call fails.
pub async fn run(service: &LlmService, named_model: &str) -> Result<()> {
    let names = service.model_names();
    info!(models = ?names, count = names.len(), "available models");

    println!();
    println!("{}", "Available models:".bold());
    for (i, name) in names.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    println!();

    let mut failures = 0;

    let default = service.registry().default_name().to_string();
    println!("🚀 Testing default model ({default})...");
    if !report(service, None, INTRO_PROMPT).await {
        failures += 1;
    }

    if service.registry().contains(named_model) {
        println!("🚀 Testing model by name ({named_model})...");
        if !report(service, Some(named_model), CODE_PROMPT).await {
            failures += 1;
        }
    } else {
        println!(
            "{}",
            format!("· {named_model} is not registered, skipping named-model test").dimmed()
        );
    }

    println!();
    if failures > 0 {
        bail!("{failures} model check(s) failed");
    }
    println!("{}", "✅ All checks passed".green());
    Ok(())
}

/// Make one call and print its outcome. Returns whether it succeeded.
async fn report(service: &LlmService, model: Option<&str>, prompt: &str) -> bool {
    match service.call(&[Message::human(prompt)], model).await {
        Ok(response) => {
            println!("{} {}", "✅".green(), response.model_used.bold());
            println!("{}\n", response.content);
            info!(
                model = %response.model_used,
                response_length = response.content.len(),
                "model check succeeded"
            );
            true
        }
        Err(e) => {
            println!("{} {e}\n", "❌".red());
            error!(model = e.model().unwrap_or("<unresolved>"), error = %e, "model check failed");
            false
        }
    }
}
