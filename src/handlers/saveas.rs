//! `SAVEAS` — `SAVEAS TYPE=HTM|TXT|PNG|PDF|BMP|JPEG FILE=... [FOLDER=...]`
//!
//! Sends a `saveAs` message via the Download Bridge and awaits the
//! acknowledgement. `TYPE=PDF` conceptually goes through the Print Service
//! in a full browser integration, but the bridge-facing wire message is the
//! same `saveAs` shape either way, per §6's bridge interface.

use async_trait::async_trait;

use crate::bridges::{DownloadMessage, SaveAsOptions};
use crate::error::EngineError;

use super::{CommandContext, Handler, HandlerResult};

const VALID_TYPES: [&str; 6] = ["HTM", "TXT", "PNG", "PDF", "BMP", "JPEG"];

pub struct SaveAsHandler;

#[async_trait]
impl Handler for SaveAsHandler {
    fn kind(&self) -> &'static str {
        "SAVEAS"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let file_type = ctx.get_required_param("TYPE")?.to_ascii_uppercase();
        if !VALID_TYPES.contains(&file_type.as_str()) {
            return Err(EngineError::InvalidParameter(format!("unsupported SAVEAS TYPE {file_type:?}")));
        }
        let file = ctx.expand(ctx.get_required_param("FILE")?);
        let folder = ctx.get_param("FOLDER").map(|f| ctx.expand(f));

        let message = DownloadMessage::SaveAs(SaveAsOptions { file_type, file, folder });
        let ack = ctx
            .bridges
            .download
            .send_message(message)
            .await
            .map_err(|e| EngineError::ScriptError(e.to_string()))?;
        if !ack.success {
            return Err(EngineError::ScriptError(ack.error.unwrap_or_else(|| "saveAs rejected".to_string())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::EngineError;
    use crate::handlers::test_support::Fixture;

    use super::*;

    #[tokio::test]
    async fn valid_type_succeeds() {
        let mut fx = Fixture::new();
        let result = fx.run_source(&SaveAsHandler, "SAVEAS TYPE=PDF FILE=report.pdf FOLDER=/out").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn unknown_type_is_invalid_parameter() {
        let mut fx = Fixture::new();
        let result = fx.run_source(&SaveAsHandler, "SAVEAS TYPE=DOCX FILE=report.docx").await;
        assert!(matches!(result, Err(EngineError::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn missing_file_is_missing_parameter() {
        let mut fx = Fixture::new();
        let result = fx.run_source(&SaveAsHandler, "SAVEAS TYPE=PDF").await;
        assert!(matches!(result, Err(EngineError::MissingParameter(_))));
    }
}
