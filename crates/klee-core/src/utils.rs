//! Path helpers for the Klee data directory.

use std::path::PathBuf;

/// Get the Klee data directory (e.g. `~/.klee/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".klee")
}

/// Get the REPL history file (e.g. `~/.klee/history/chat_history`).
pub fn get_history_path() -> PathBuf {
    get_data_path().join("history").join("chat_history")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_path_ends_with_klee() {
        assert!(get_data_path().ends_with(".klee"));
    }

    #[test]
    fn test_history_path_under_data_dir() {
        let path = get_history_path();
        assert!(path.ends_with("chat_history"));
        assert!(path.parent().unwrap().parent().unwrap().ends_with(".klee"));
    }
}
