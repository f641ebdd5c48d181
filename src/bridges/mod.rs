//! Bridges
//!
//! Each bridge abstracts one side-effecting external collaborator behind a
//! single `#[async_trait]` interface, mirroring how a virtual filesystem
//! trait stands in for the real filesystem elsewhere in this codebase's
//! lineage: production code depends on the trait, tests depend on a
//! `Null*` stand-in.

pub mod dialog;
pub mod download;
pub mod flow;
pub mod page;
pub mod print;
pub mod winclick;

pub use dialog::{
    DialogAck, DialogBridge, DialogButton, DialogConfigEntry, DialogEvent, DialogKind, DialogMessage,
    DialogQueueSimulator, DialogResponse, NullDialogBridge, RecordingDialogBridge, DIALOG_TYPES,
};
pub use download::{DownloadAck, DownloadBridge, DownloadMessage, DownloadOptions, NullDownloadBridge, SaveAsOptions};
pub use flow::{FlowControlUi, NullFlowControlUi, PauseOutcome, PromptOutcome};
pub use page::{ElementQuery, ExtractMode, NullPageDriver, PageDriver};
pub use print::{NullPrintService, PrintOptions, PrintService};
pub use winclick::{ClickButton, NullWinClickService, WinClickService};

use std::sync::Arc;

/// The full set of bridges an `Engine` is constructed with. Each field
/// defaults to its `Null*` stand-in so an engine built with
/// `Bridges::default()` runs in test mode: every bridge call succeeds with
/// no side effect.
pub struct Bridges {
    pub dialog: Arc<dyn DialogBridge>,
    pub download: Arc<dyn DownloadBridge>,
    pub flow: Arc<dyn FlowControlUi>,
    pub page: Arc<dyn PageDriver>,
    pub print: Arc<dyn PrintService>,
    pub winclick: Arc<dyn WinClickService>,
}

impl Default for Bridges {
    fn default() -> Self {
        Self {
            dialog: Arc::new(NullDialogBridge),
            download: Arc::new(NullDownloadBridge),
            flow: Arc::new(NullFlowControlUi),
            page: Arc::new(NullPageDriver),
            print: Arc::new(NullPrintService),
            winclick: Arc::new(NullWinClickService),
        }
    }
}
