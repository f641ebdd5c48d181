//! Flow Control UI Bridge
//!
//! `showPause`/`showPrompt`/`showAlert`. Rejection (cancellation) is an
//! in-band control signal, not an error — it is modelled as an `Outcome`
//! variant rather than an `Err`, so handlers can tell "the bridge itself
//! failed" (`Err`) apart from "the operator cancelled" (`Ok(Cancelled)`).

use async_trait::async_trait;

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub enum PauseOutcome {
    Resolved,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutcome {
    Resolved(String),
    Cancelled,
}

#[async_trait]
pub trait FlowControlUi: Send + Sync {
    async fn show_pause(&self, message: &str) -> Result<PauseOutcome, EngineError>;
    async fn show_prompt(&self, message: &str, default: Option<&str>) -> Result<PromptOutcome, EngineError>;
    async fn show_alert(&self, message: &str) -> Result<(), EngineError>;
}

/// Default stand-in: every prompt resolves immediately (pause resolves,
/// prompt returns the default or empty string), matching how a headless
/// run with no attached UI should behave rather than hanging forever.
pub struct NullFlowControlUi;

#[async_trait]
impl FlowControlUi for NullFlowControlUi {
    async fn show_pause(&self, _message: &str) -> Result<PauseOutcome, EngineError> {
        Ok(PauseOutcome::Resolved)
    }

    async fn show_prompt(&self, _message: &str, default: Option<&str>) -> Result<PromptOutcome, EngineError> {
        Ok(PromptOutcome::Resolved(default.unwrap_or("").to_string()))
    }

    async fn show_alert(&self, _message: &str) -> Result<(), EngineError> {
        Ok(())
    }
}
