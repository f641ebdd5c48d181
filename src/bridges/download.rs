//! Download Bridge
//!
//! Forwards download option configuration and `saveAs` requests to the
//! external download subsystem. `folder = "*"` and `file = "+"`/`"*"` are
//! resolved to `None` by the ONDOWNLOAD handler before a message is built,
//! per the legacy "transmitted as absent" rule.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadOptions {
    pub folder: Option<String>,
    pub file: Option<String>,
    pub wait: bool,
    pub checksum: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAsOptions {
    pub file_type: String,
    pub file: String,
    pub folder: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadMessage {
    #[serde(rename = "setDownloadOptions")]
    SetOptions(DownloadOptions),
    #[serde(rename = "saveAs")]
    SaveAs(SaveAsOptions),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadAck {
    pub success: bool,
    pub error: Option<String>,
}

#[async_trait]
pub trait DownloadBridge: Send + Sync {
    async fn send_message(&self, message: DownloadMessage) -> Result<DownloadAck, EngineError>;

    /// Signals that the browser began a download; cancels the Download
    /// Timeout Manager. Implementations that never observe real downloads
    /// (the null bridge) never call this, which is what makes the timeout
    /// path exercisable in tests.
    async fn notify_download_started(&self) {}
}

pub struct NullDownloadBridge;

#[async_trait]
impl DownloadBridge for NullDownloadBridge {
    async fn send_message(&self, _message: DownloadMessage) -> Result<DownloadAck, EngineError> {
        Ok(DownloadAck { success: true, error: None })
    }
}
