//! Macro Executor
//!
//! Top-level state machine tying the parser, variable store, handler
//! registry, and bridges together: `load_macro` parses and resets per-run
//! state; `execute` dispatches commands one at a time, honouring
//! `!ERRORIGNORE`, the pending-error slot, and pause/stop signals. Mirrors
//! the reference crate's `Bash { fs, limits, state }` wrapper (`bash.rs`)
//! and its parse-then-dispatch `exec` method, generalized from bash's
//! `InterpreterError`-variant branching to the taxonomy in `error.rs`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::bridges::Bridges;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::extract::ExtractBuffer;
use crate::handlers::{CommandContext, HandlerRegistry, LogEntry, LogLevel};
use crate::parser::{self, Command};
use crate::timeout::DownloadTimeoutManager;
use crate::vars::{VariableStore, VariableValue};

/// `Idle → Loading → Ready → Running → (Paused ↔ Running) → Done/Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    Idle,
    Loading,
    Ready,
    Running,
    Paused,
    Done,
    Error,
}

/// The terminal report of one `execute()` run, serializable for the
/// `--json` CLI path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub error_code: i32,
    pub error_message: Option<String>,
    pub variables: indexmap::IndexMap<String, String>,
    pub run_log: Vec<LogEntry>,
    pub extract: Vec<String>,
}

/// Cooperative single-macro executor. Owns the variable store, extract
/// buffer, and handler registry for the duration of one loaded macro; never
/// shared across concurrently running macros.
pub struct Engine {
    registry: HandlerRegistry,
    vars: VariableStore,
    extract: ExtractBuffer,
    bridges: Bridges,
    config: EngineConfig,
    download_timeout: DownloadTimeoutManager,
    pending_error: Arc<Mutex<Option<EngineError>>>,
    commands: Vec<Command>,
    state: ExecutorState,
    pause_flag: Arc<AtomicBool>,
    stop_flag: Arc<AtomicBool>,
    run_log: Vec<LogEntry>,
}

impl Engine {
    /// Builds an idle engine with the given bridges and config, applying
    /// `config.initial_variables` up front. A bad initial variable (e.g. a
    /// readonly or unknown `!name`) is logged via `tracing::warn!` and
    /// skipped rather than failing construction, since it comes from a
    /// deployment-level file, not a macro author.
    pub fn new(bridges: Bridges, config: EngineConfig) -> Self {
        let pending_error = Arc::new(Mutex::new(None));
        let download_timeout = DownloadTimeoutManager::new(Arc::clone(&pending_error), config.download_timeout_floor_secs);
        let mut vars = VariableStore::new();
        for (name, value) in &config.initial_variables {
            if let Err(err) = vars.set(name, value) {
                tracing::warn!(variable = %name, error = %err, "skipping invalid initial_variables entry");
            }
        }
        Self {
            registry: HandlerRegistry::default(),
            vars,
            extract: ExtractBuffer::new(),
            bridges,
            config,
            download_timeout,
            pending_error,
            commands: Vec::new(),
            state: ExecutorState::Idle,
            pause_flag: Arc::new(AtomicBool::new(false)),
            stop_flag: Arc::new(AtomicBool::new(false)),
            run_log: Vec::new(),
        }
    }

    /// Installs or replaces a handler, the only sanctioned registry
    /// extension point.
    pub fn register_handler(&mut self, handler: Box<dyn crate::handlers::Handler>) {
        self.registry.register(handler);
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    /// Parses `source`, resets user variables and the extract buffer, and
    /// preserves the handler registry. Registered handlers and bridges
    /// survive across `load_macro` calls on the same `Engine`, but variables
    /// and run log do not.
    pub fn load_macro(&mut self, source: &str) -> Result<(), EngineError> {
        self.state = ExecutorState::Loading;
        let commands = parser::parse(source).map_err(|e| {
            self.state = ExecutorState::Error;
            EngineError::Parse(e)
        })?;
        self.commands = commands;
        self.vars.reset_user_vars();
        self.extract.clear();
        self.run_log.clear();
        self.stop_flag.store(false, Ordering::SeqCst);
        self.pause_flag.store(false, Ordering::SeqCst);
        self.state = ExecutorState::Ready;
        tracing::info!(commands = self.commands.len(), "macro loaded");
        Ok(())
    }

    pub fn pause(&self) {
        self.pause_flag.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.pause_flag.store(false, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Runs every loaded command in order, returning the terminal
    /// `ExecutionResult`. Between commands: checks `stop()`, waits out
    /// `pause()`, and adopts any pending error written asynchronously (the
    /// Download Timeout Manager's only channel into this loop).
    pub async fn execute(&mut self) -> ExecutionResult {
        self.state = ExecutorState::Running;
        tracing::info!("execution started");

        let commands = self.commands.clone();
        let mut outcome: Result<(), EngineError> = Ok(());

        'commands: for command in &commands {
            loop {
                if self.stop_flag.load(Ordering::SeqCst) {
                    outcome = Err(EngineError::UserAbort);
                    break 'commands;
                }
                if !self.pause_flag.load(Ordering::SeqCst) {
                    break;
                }
                self.state = ExecutorState::Paused;
                tokio::task::yield_now().await;
            }
            self.state = ExecutorState::Running;

            if let Some(pending) = self.pending_error.lock().await.take() {
                outcome = Err(pending);
                break 'commands;
            }

            let Some(handler) = self.registry.get(&command.kind) else {
                if self.config.fail_on_unknown_command {
                    outcome = Err(EngineError::InvalidParameter(format!("unknown command {}", command.kind)));
                    break 'commands;
                }
                self.run_log.push(LogEntry {
                    level: LogLevel::Warn,
                    message: format!("skipping unknown command {}", command.kind),
                    line_number: command.line_number,
                });
                continue;
            };

            tracing::debug!(kind = %command.kind, line = command.line_number, "dispatching command");

            let result = {
                let mut ctx = CommandContext::new(
                    command,
                    &mut self.vars,
                    &mut self.extract,
                    &self.bridges,
                    &self.config,
                    &self.download_timeout,
                    &mut self.run_log,
                );
                handler.execute(&mut ctx).await
            };

            if let Err(err) = result {
                let ignorable = !err.is_always_terminal()
                    && matches!(self.vars.get("!ERRORIGNORE", None), Some(VariableValue::Bool(true)));
                tracing::warn!(kind = %command.kind, line = command.line_number, error = %err, ignored = ignorable, "command failed");
                self.run_log.push(LogEntry {
                    level: LogLevel::Error,
                    message: err.to_string(),
                    line_number: command.line_number,
                });
                if !ignorable {
                    outcome = Err(err);
                    break 'commands;
                }
            }

            tokio::task::yield_now().await;
        }

        self.download_timeout.cancel().await;
        self.state = if outcome.is_ok() { ExecutorState::Done } else { ExecutorState::Error };
        tracing::info!(success = outcome.is_ok(), "execution finished");

        match outcome {
            Ok(()) => ExecutionResult {
                success: true,
                error_code: crate::error::OK_CODE,
                error_message: None,
                variables: self.vars.snapshot(),
                run_log: self.run_log.clone(),
                extract: self.extract.entries().to_vec(),
            },
            Err(err) => ExecutionResult {
                success: false,
                error_code: err.code(),
                error_message: Some(err.to_string()),
                variables: self.vars.snapshot(),
                run_log: self.run_log.clone(),
                extract: self.extract.entries().to_vec(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::bridges::{Bridges, FlowControlUi, PauseOutcome, PromptOutcome};

    use super::*;

    #[tokio::test]
    async fn runs_a_simple_macro_to_success() {
        let mut engine = Engine::new(Bridges::default(), EngineConfig::default());
        engine.load_macro("SET !VAR1 hello\nSET !VAR2 world").unwrap();
        let result = engine.execute().await;
        assert!(result.success);
        assert_eq!(result.error_code, 1);
        assert_eq!(result.variables.get("!VAR1"), Some(&"hello".to_string()));
        assert_eq!(result.variables.get("!VAR2"), Some(&"world".to_string()));
    }

    #[tokio::test]
    async fn unknown_command_is_skipped_by_default() {
        let mut engine = Engine::new(Bridges::default(), EngineConfig::default());
        engine.load_macro("FROBNICATE X=1\nSET !VAR1 ok").unwrap();
        let result = engine.execute().await;
        assert!(result.success);
        assert!(result.run_log.iter().any(|e| e.message.contains("FROBNICATE")));
    }

    #[tokio::test]
    async fn unknown_command_fails_when_configured() {
        let config = EngineConfig { fail_on_unknown_command: true, ..EngineConfig::default() };
        let mut engine = Engine::new(Bridges::default(), config);
        engine.load_macro("FROBNICATE X=1").unwrap();
        let result = engine.execute().await;
        assert!(!result.success);
        assert_eq!(result.error_code, -802);
    }

    #[tokio::test]
    async fn errorignore_continues_past_a_failure_to_success() {
        let mut engine = Engine::new(Bridges::default(), EngineConfig::default());
        engine.load_macro("SET !ERRORIGNORE YES\nWAIT SECONDS=-1\nSET !VAR1 reached").unwrap();
        let result = engine.execute().await;
        assert!(result.success);
        assert_eq!(result.variables.get("!VAR1"), Some(&"reached".to_string()));
        assert!(result.run_log.iter().any(|e| e.level == LogLevel::Error));
    }

    #[tokio::test]
    async fn a_terminal_failure_stops_the_macro_and_reports_its_code() {
        let mut engine = Engine::new(Bridges::default(), EngineConfig::default());
        engine.load_macro("WAIT SECONDS=-1\nSET !VAR1 unreached").unwrap();
        let result = engine.execute().await;
        assert!(!result.success);
        assert_eq!(result.error_code, -802);
        assert_eq!(result.variables.get("!VAR1"), Some(&String::new()));
    }

    struct CancellingFlow;

    #[async_trait]
    impl FlowControlUi for CancellingFlow {
        async fn show_pause(&self, _message: &str) -> Result<PauseOutcome, EngineError> {
            Ok(PauseOutcome::Cancelled)
        }
        async fn show_prompt(&self, _message: &str, _default: Option<&str>) -> Result<PromptOutcome, EngineError> {
            Ok(PromptOutcome::Cancelled)
        }
        async fn show_alert(&self, _message: &str) -> Result<(), EngineError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn user_abort_is_terminal_even_under_errorignore() {
        let mut bridges = Bridges::default();
        bridges.flow = Arc::new(CancellingFlow);
        let mut engine = Engine::new(bridges, EngineConfig::default());
        engine.load_macro("SET !ERRORIGNORE YES\nPAUSE MESSAGE=stop\nSET !VAR1 unreached").unwrap();
        let result = engine.execute().await;
        assert!(!result.success);
        assert_eq!(result.error_code, -933);
        assert_eq!(result.variables.get("!VAR1"), Some(&String::new()));
    }

    #[tokio::test]
    async fn stop_aborts_before_the_next_command() {
        let mut engine = Engine::new(Bridges::default(), EngineConfig::default());
        engine.load_macro("SET !VAR1 first\nSET !VAR2 second").unwrap();
        engine.stop();
        let result = engine.execute().await;
        assert!(!result.success);
        assert_eq!(result.error_code, -933);
    }

    #[tokio::test]
    async fn load_macro_resets_user_variables_but_keeps_handlers() {
        let mut engine = Engine::new(Bridges::default(), EngineConfig::default());
        engine.load_macro("SET !VAR1 first").unwrap();
        engine.execute().await;
        engine.load_macro("SET !VAR2 second").unwrap();
        let result = engine.execute().await;
        assert!(result.success);
        assert!(!result.variables.contains_key("!VAR1") || result.variables.get("!VAR1").map(String::as_str) == Some(""));
        assert_eq!(result.variables.get("!VAR2"), Some(&"second".to_string()));
    }

    #[test]
    fn a_malformed_macro_fails_to_load_with_a_parse_error() {
        let mut engine = Engine::new(Bridges::default(), EngineConfig::default());
        let err = engine.load_macro("SET X \"unterminated").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
        assert_eq!(engine.state(), ExecutorState::Error);
    }
}
