//! Interactive REPL — `rustyline` editing with persistent history.
//!
//! The conversation history lives here; every turn is a fresh, independent
//! call to the dispatch service with the whole history attached.

use anyhow::Result;
use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use klee_core::types::Message;
use klee_core::utils::get_history_path;
use klee_llm::{CancellationToken, LlmService};

use crate::chat::ChatOptions;
use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// A line of input, classified.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Exit,
    Reset,
    ListModels,
    SwitchModel(&'a str),
    Chat(&'a str),
}

fn parse_input(line: &str) -> Option<Input<'_>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if EXIT_COMMANDS.contains(&trimmed.to_lowercase().as_str()) {
        return Some(Input::Exit);
    }
    match trimmed {
        "/reset" => Some(Input::Reset),
        "/models" => Some(Input::ListModels),
        _ => match trimmed.strip_prefix("/model ") {
            Some(name) if !name.trim().is_empty() => Some(Input::SwitchModel(name.trim())),
            _ => Some(Input::Chat(trimmed)),
        },
    }
}

/// Run the interactive REPL loop.
pub async fn run(service: LlmService, mut opts: ChatOptions) -> Result<()> {
    let current = opts
        .model
        .clone()
        .unwrap_or_else(|| service.registry().default_name().to_string());
    helpers::print_banner(&current);

    let mut editor = create_editor()?;
    let mut history = opts.preamble();

    loop {
        let line = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let Some(input) = parse_input(&line) else {
            continue;
        };
        let _ = editor.add_history_entry(line.as_str());

        match input {
            Input::Exit => {
                println!("\nGoodbye! 👋");
                break;
            }
            Input::Reset => {
                history = opts.preamble();
                println!("{}", "(conversation cleared)".dimmed());
            }
            Input::ListModels => {
                for name in service.model_names() {
                    println!("  {name}");
                }
            }
            Input::SwitchModel(name) => {
                if service.registry().contains(name) {
                    opts.model = Some(name.to_string());
                    println!("{} {}", "Model:".dimmed(), name);
                } else {
                    eprintln!("❌ Unknown model '{name}'. Try /models.");
                }
            }
            Input::Chat(text) => {
                history.push(Message::human(text));
                debug!(turns = history.len(), "sending conversation");

                let token = CancellationToken::new();
                let ctrl_c = helpers::cancel_on_ctrl_c(token.clone());
                helpers::print_thinking();
                let result = service
                    .call_with(&history, opts.model.as_deref(), &opts.call_options(token))
                    .await;
                ctrl_c.abort();
                helpers::clear_thinking();

                match result {
                    Ok(response) => {
                        helpers::print_response(&response.model_used, &response.content);
                        history.push(Message::assistant(response.content));
                    }
                    Err(e) => {
                        // Drop the unanswered turn so the next one starts clean
                        history.pop();
                        eprintln!("\n❌ Error: {e}\n");
                    }
                }
            }
        }
    }

    save_history(&mut editor);
    Ok(())
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let path = get_history_path();
    if path.exists() {
        let _ = editor.load_history(&path);
        debug!("loaded REPL history from {}", path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = get_history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_commands() {
        assert_eq!(parse_input("exit"), Some(Input::Exit));
        assert_eq!(parse_input("EXIT"), Some(Input::Exit));
        assert_eq!(parse_input("/quit"), Some(Input::Exit));
        assert_eq!(parse_input(":q"), Some(Input::Exit));
    }

    #[test]
    fn blank_input_ignored() {
        assert_eq!(parse_input(""), None);
        assert_eq!(parse_input("   "), None);
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_input("/reset"), Some(Input::Reset));
        assert_eq!(parse_input("/models"), Some(Input::ListModels));
        assert_eq!(
            parse_input("/model alt-model "),
            Some(Input::SwitchModel("alt-model"))
        );
    }

    #[test]
    fn model_command_without_name_is_chat() {
        assert_eq!(parse_input("/model "), Some(Input::Chat("/model")));
    }

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(parse_input("  hello there "), Some(Input::Chat("hello there")));
    }
}
