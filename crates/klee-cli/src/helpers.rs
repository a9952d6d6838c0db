//! Shared CLI helpers — response printing, banner, Ctrl-C wiring.

use colored::Colorize;
use klee_llm::CancellationToken;
use tokio::task::JoinHandle;

/// Print a model reply to stdout.
pub fn print_response(model: &str, response: &str) {
    println!();
    println!("{}", format!("🤖 {model}").cyan().bold());
    println!("{response}");
    println!();
}

/// Print the banner shown at REPL start.
pub fn print_banner(default_model: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🤖 Klee".cyan().bold(), version.dimmed());
    println!("{} {}", "Model:".dimmed(), default_model);
    println!(
        "{}",
        "Type a message, /model NAME to switch, /reset to clear, or \"exit\" to quit.".dimmed()
    );
    println!();
}

/// Print a "thinking" placeholder.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

/// Cancel `token` on Ctrl-C. Abort the returned handle once the call is done.
pub fn cancel_on_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    })
}
