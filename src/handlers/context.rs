//! Command Context
//!
//! The per-command view a `Handler` executes against: parameter access with
//! `{{name}}` expansion, the run log, variable read/write, extract-buffer
//! growth, and the bridges/timeout-manager handles a handler needs to
//! trigger side effects. Built fresh by the executor for every command and
//! dropped at the end of that command's dispatch.

use serde::{Deserialize, Serialize};

use crate::bridges::Bridges;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::extract::ExtractBuffer;
use crate::parser::Command;
use crate::timeout::DownloadTimeoutManager;
use crate::vars::{VariableStore, VariableValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One entry of the macro's user-visible run log — materialised on the
/// `ExecutionResult`, distinct from internal `tracing` diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub line_number: usize,
}

pub struct CommandContext<'a> {
    pub command: &'a Command,
    pub vars: &'a mut VariableStore,
    pub extract: &'a mut ExtractBuffer,
    pub bridges: &'a Bridges,
    pub config: &'a EngineConfig,
    pub download_timeout: &'a DownloadTimeoutManager,
    run_log: &'a mut Vec<LogEntry>,
}

impl<'a> CommandContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        command: &'a Command,
        vars: &'a mut VariableStore,
        extract: &'a mut ExtractBuffer,
        bridges: &'a Bridges,
        config: &'a EngineConfig,
        download_timeout: &'a DownloadTimeoutManager,
        run_log: &'a mut Vec<LogEntry>,
    ) -> Self {
        Self { command, vars, extract, bridges, config, download_timeout, run_log }
    }

    /// Case-insensitive, first-occurrence parameter lookup (no expansion).
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.command.get_param(key)
    }

    /// Like `get_param`, but `MISSING_PARAMETER` when absent.
    pub fn get_required_param(&self, key: &str) -> Result<&str, EngineError> {
        self.get_param(key).ok_or_else(|| EngineError::MissingParameter(key.to_string()))
    }

    /// Single-pass `{{name}}` expansion against the current variable store,
    /// with `{{!EXTRACT}}` materialising the extract buffer's joined view.
    pub fn expand(&self, text: &str) -> String {
        self.vars.expand(text, Some(&*self.extract))
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.run_log.push(LogEntry { level, message: message.into(), line_number: self.command.line_number });
    }

    pub fn get_variable(&self, name: &str) -> Option<VariableValue> {
        self.vars.get(name, Some(&*self.extract))
    }

    pub fn set_variable(&mut self, name: &str, raw_value: &str) -> Result<(), EngineError> {
        self.vars.set(name, raw_value)
    }

    pub fn add_extract(&mut self, value: impl Into<String>) {
        self.extract.push(value);
    }

    /// `!ERRORIGNORE == "YES"`, used by handlers that must decide locally
    /// whether a missing-element condition is fatal (e.g. `TAG`).
    pub fn error_ignore(&self) -> bool {
        matches!(self.vars.get("!ERRORIGNORE", None), Some(VariableValue::Bool(true)))
    }
}
