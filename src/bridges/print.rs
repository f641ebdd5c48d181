//! Print Service Bridge
//!
//! One-call external collaborator used by `SAVEAS TYPE=PDF`, kept distinct
//! from the Download Bridge's `saveAs` message because rendering a page to
//! PDF is a print-pipeline operation, not a file-save of existing content.

use async_trait::async_trait;

use crate::error::EngineError;

#[derive(Debug, Clone)]
pub struct PrintOptions {
    pub file: String,
    pub folder: Option<String>,
}

#[async_trait]
pub trait PrintService: Send + Sync {
    async fn print_to_pdf(&self, options: &PrintOptions) -> Result<(), EngineError>;
}

pub struct NullPrintService;

#[async_trait]
impl PrintService for NullPrintService {
    async fn print_to_pdf(&self, _options: &PrintOptions) -> Result<(), EngineError> {
        Ok(())
    }
}
