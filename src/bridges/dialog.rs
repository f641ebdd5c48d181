//! Dialog Bridge
//!
//! Forwards a dialog-queue configuration message to the page-side
//! interceptor and returns an acknowledgement. The interceptor protocol
//! itself (custom DOM events, queue consumption) runs inside the page and
//! is out of scope; this trait models only the engine's side of the
//! message send.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// `{OK, CANCEL, YES, NO}`; an unrecognised source value coerces to
/// `Cancel` at the handler layer before a config ever reaches the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DialogButton {
    Ok,
    Cancel,
    Yes,
    No,
}

impl DialogButton {
    pub fn parse(s: &str) -> DialogButton {
        match s.to_ascii_uppercase().as_str() {
            "OK" => DialogButton::Ok,
            "YES" => DialogButton::Yes,
            "NO" => DialogButton::No,
            _ => DialogButton::Cancel,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfigEntry {
    pub pos: u32,
    pub button: DialogButton,
    pub content: Option<String>,
    pub timeout: Option<u64>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DialogMessage {
    #[serde(rename = "DIALOG_CONFIG")]
    Config { dialog_types: Vec<String>, append: bool, config: DialogConfigEntry },
    #[serde(rename = "DIALOG_RESET")]
    Reset,
}

pub const DIALOG_TYPES: [&str; 4] = ["alert", "confirm", "prompt", "beforeunload"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogAck {
    pub success: bool,
    pub error: Option<String>,
}

#[async_trait]
pub trait DialogBridge: Send + Sync {
    async fn send_message(&self, message: DialogMessage) -> Result<DialogAck, EngineError>;
}

/// Default stand-in used when no real bridge is registered: acknowledges
/// every message with no side effect, per the "no bridge bound -> success"
/// test-mode contract.
pub struct NullDialogBridge;

#[async_trait]
impl DialogBridge for NullDialogBridge {
    async fn send_message(&self, _message: DialogMessage) -> Result<DialogAck, EngineError> {
        Ok(DialogAck { success: true, error: None })
    }
}

/// What kind of page-level dialog fired, per the interceptor protocol's
/// `__imacros_dialog_event` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    Alert,
    Confirm,
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogResponse {
    pub button: DialogButton,
    pub value: Option<String>,
}

/// Mirrors `__imacros_dialog_event`'s payload shape so tests can construct
/// protocol-accurate fixtures even though the interceptor itself runs
/// inside the page, out of scope for this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogEvent {
    pub kind: DialogKind,
    pub message: String,
    pub default_value: Option<String>,
    pub response: DialogResponse,
    pub unhandled: bool,
}

/// Re-implements the in-page interceptor's queue-consumption rule for test
/// doubles: `RecordingDialogBridge` feeds `DIALOG_CONFIG` messages in, and
/// tests fire simulated dialogs to exercise the FIFO-by-position contract
/// end to end without a real page.
#[derive(Debug, Default)]
pub struct DialogQueueSimulator {
    queue: Vec<DialogConfigEntry>,
}

impl DialogQueueSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `append = false` replaces the queue wholesale before inserting;
    /// `append = true` inserts in position order alongside existing slots.
    pub fn configure(&mut self, append: bool, entry: DialogConfigEntry) {
        if !append {
            self.queue.clear();
        }
        let idx = self.queue.iter().position(|e| e.pos > entry.pos).unwrap_or(self.queue.len());
        self.queue.insert(idx, entry);
    }

    /// Consumes the front (lowest `pos`) entry: `OK`/`YES` accept (confirm
    /// true, prompt content-or-default), anything else cancels (confirm
    /// false, prompt no value). An empty queue returns the cancel form with
    /// `unhandled: true`.
    pub fn fire(&mut self, kind: DialogKind, message: impl Into<String>, default_value: Option<String>) -> DialogEvent {
        let message = message.into();
        match self.queue.first().cloned() {
            None => DialogEvent {
                kind,
                message,
                default_value,
                response: DialogResponse { button: DialogButton::Cancel, value: None },
                unhandled: true,
            },
            Some(entry) => {
                self.queue.remove(0);
                let accept = matches!(entry.button, DialogButton::Ok | DialogButton::Yes);
                let value = match (kind, accept) {
                    (DialogKind::Prompt, true) => Some(entry.content.clone().or_else(|| default_value.clone()).unwrap_or_default()),
                    _ => None,
                };
                DialogEvent {
                    kind,
                    message,
                    default_value,
                    response: DialogResponse { button: entry.button, value },
                    unhandled: false,
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Test double that records every message sent by handlers and feeds
/// `DIALOG_CONFIG` messages into a `DialogQueueSimulator`, so integration
/// tests can assert both the wire payload and the resulting consumption
/// order in one fixture.
pub struct RecordingDialogBridge {
    pub sent: tokio::sync::Mutex<Vec<DialogMessage>>,
    pub queue: tokio::sync::Mutex<DialogQueueSimulator>,
}

impl RecordingDialogBridge {
    pub fn new() -> Self {
        Self { sent: tokio::sync::Mutex::new(Vec::new()), queue: tokio::sync::Mutex::new(DialogQueueSimulator::new()) }
    }

    pub async fn fire(&self, kind: DialogKind, message: &str, default_value: Option<String>) -> DialogEvent {
        self.queue.lock().await.fire(kind, message, default_value)
    }
}

impl Default for RecordingDialogBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DialogBridge for RecordingDialogBridge {
    async fn send_message(&self, message: DialogMessage) -> Result<DialogAck, EngineError> {
        if let DialogMessage::Config { append, ref config, .. } = message {
            self.queue.lock().await.configure(append, config.clone());
        }
        self.sent.lock().await.push(message);
        Ok(DialogAck { success: true, error: None })
    }
}
