//! `.iim` Macro Execution Engine
//!
//! A modern, async re-implementation of the legacy browser-automation macro
//! language: parsing, a pluggable command handler registry, a `{{name}}`
//! variable namespace, bridge traits for the page/dialog/download/flow/print
//! collaborators a real browser integration supplies, a download-timeout
//! manager, a stable error-code taxonomy, and legacy Rijndael-256/SHA-256
//! encryption utilities. See `executor::Engine` for the top-level entry
//! point.

pub mod bridges;
pub mod config;
pub mod crypto;
pub mod error;
pub mod executor;
pub mod extract;
pub mod handlers;
pub mod parser;
pub mod timeout;
pub mod vars;

pub use error::EngineError;
pub use executor::{Engine, ExecutionResult, ExecutorState};
