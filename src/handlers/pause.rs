//! `PAUSE` — `PAUSE [MESSAGE=...]`
//!
//! Calls `FlowControlUI.showPause`. A resolve is success; a cancel is
//! `USER_ABORT`, which the executor treats as always-terminal regardless of
//! `!ERRORIGNORE`. Distinct from the executor's internal pause flag (§5):
//! this is an explicit macro command, not the cooperative pause/resume
//! mechanism polled between commands.

use async_trait::async_trait;

use crate::bridges::PauseOutcome;
use crate::error::EngineError;

use super::{CommandContext, Handler, HandlerResult};

pub struct PauseHandler;

#[async_trait]
impl Handler for PauseHandler {
    fn kind(&self) -> &'static str {
        "PAUSE"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let message = ctx.get_param("MESSAGE").map(|m| ctx.expand(m)).unwrap_or_default();
        match ctx.bridges.flow.show_pause(&message).await? {
            PauseOutcome::Resolved => Ok(()),
            PauseOutcome::Cancelled => Err(EngineError::UserAbort),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::bridges::{Bridges, FlowControlUi, PromptOutcome};
    use crate::handlers::test_support::Fixture;

    use super::*;

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
    async fn resolved_pause_succeeds() {
        let mut fx = Fixture::new();
        let result = fx.run_source(&PauseHandler, "PAUSE MESSAGE=\"hold on\"").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn cancelled_pause_is_user_abort() {
        let mut bridges = Bridges::default();
        bridges.flow = std::sync::Arc::new(CancellingFlow);
        let mut fx = Fixture::with_bridges(bridges);
        let result = fx.run_source(&PauseHandler, "PAUSE").await;
        assert!(matches!(result, Err(EngineError::UserAbort)));
    }
}
