//! Core types, configuration and path helpers shared by all Klee crates.

pub mod config;
pub mod types;
pub mod utils;
