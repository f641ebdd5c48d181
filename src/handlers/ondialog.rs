//! `ONDIALOG` — `ONDIALOG POS=n BUTTON=... [CONTENT=...] [TIMEOUT=...]`
//!
//! `POS` must be a positive integer; `BUTTON` coerces unknown values to
//! `CANCEL`. Builds a `DIALOG_CONFIG` message listing the full
//! `dialogTypes` set and sends it via the Dialog Bridge — the page-side
//! interceptor inserts the entry at `pos - 1` and enables interception,
//! out of scope here. No bridge bound (the `Null*` stand-in) is success
//! with no side effect, per the test-mode contract.

use async_trait::async_trait;

use crate::bridges::{DialogButton, DialogConfigEntry, DialogMessage, DIALOG_TYPES};
use crate::error::EngineError;

use super::{CommandContext, Handler, HandlerResult};

pub struct OnDialogHandler;

#[async_trait]
impl Handler for OnDialogHandler {
    fn kind(&self) -> &'static str {
        "ONDIALOG"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let pos_raw = ctx.get_required_param("POS")?;
        let pos: u32 = pos_raw
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| EngineError::InvalidParameter(format!("POS must be a positive integer, got {pos_raw:?}")))?;

        let button_raw = ctx.get_required_param("BUTTON")?;
        let button = DialogButton::parse(button_raw);

        let content = ctx.get_param("CONTENT").map(|c| ctx.expand(c));
        let timeout = ctx.get_param("TIMEOUT").and_then(|t| t.parse::<u64>().ok());

        let message = DialogMessage::Config {
            dialog_types: DIALOG_TYPES.iter().map(|s| s.to_string()).collect(),
            append: true,
            config: DialogConfigEntry { pos, button, content, timeout, active: true },
        };

        let ack = ctx
            .bridges
            .dialog
            .send_message(message)
            .await
            .map_err(|e| EngineError::ScriptError(e.to_string()))?;
        if !ack.success {
            return Err(EngineError::ScriptError(ack.error.unwrap_or_else(|| "dialog bridge rejected config".to_string())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::bridges::{Bridges, DialogKind};
    use crate::handlers::test_support::Fixture;

    use super::*;

    #[tokio::test]
    async fn sends_the_documented_config_payload() {
        let recorder = Arc::new(crate::bridges::RecordingDialogBridge::new());
        let mut bridges = Bridges::default();
        bridges.dialog = recorder.clone();
        let mut fx = Fixture::with_bridges(bridges);
        let result = fx.run_source(&OnDialogHandler, "ONDIALOG POS=1 BUTTON=OK").await;
        assert!(result.is_ok());

        let sent = recorder.sent.lock().await;
        match &sent[0] {
            DialogMessage::Config { dialog_types, append, config } => {
                assert_eq!(dialog_types, &["alert", "confirm", "prompt", "beforeunload"]);
                assert!(*append);
                assert_eq!(config.pos, 1);
                assert_eq!(config.button, DialogButton::Ok);
                assert!(config.active);
            }
            DialogMessage::Reset => panic!("expected a config message"),
        }
    }

    #[tokio::test]
    async fn unknown_button_coerces_to_cancel() {
        let recorder = Arc::new(crate::bridges::RecordingDialogBridge::new());
        let mut bridges = Bridges::default();
        bridges.dialog = recorder.clone();
        let mut fx = Fixture::with_bridges(bridges);
        fx.run_source(&OnDialogHandler, "ONDIALOG POS=1 BUTTON=MAYBE").await.unwrap();
        match &recorder.sent.lock().await[0] {
            DialogMessage::Config { config, .. } => assert_eq!(config.button, DialogButton::Cancel),
            _ => panic!(),
        };
    }

    #[tokio::test]
    async fn zero_or_negative_pos_is_invalid_parameter() {
        let mut fx = Fixture::new();
        assert!(matches!(
            fx.run_source(&OnDialogHandler, "ONDIALOG POS=0 BUTTON=OK").await,
            Err(EngineError::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn no_bridge_bound_succeeds_with_no_side_effect() {
        let mut fx = Fixture::new();
        let result = fx.run_source(&OnDialogHandler, "ONDIALOG POS=1 BUTTON=OK").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn dialog_queue_order_matches_insertion_position() {
        let recorder = Arc::new(crate::bridges::RecordingDialogBridge::new());
        let mut bridges = Bridges::default();
        bridges.dialog = recorder.clone();
        let mut fx = Fixture::with_bridges(bridges);
        fx.run_source(&OnDialogHandler, "ONDIALOG POS=2 BUTTON=NO").await.unwrap();
        fx.run_source(&OnDialogHandler, "ONDIALOG POS=1 BUTTON=OK").await.unwrap();

        let first = recorder.fire(DialogKind::Confirm, "one", None).await;
        let second = recorder.fire(DialogKind::Confirm, "two", None).await;
        assert_eq!(first.response.button, DialogButton::Ok);
        assert_eq!(second.response.button, DialogButton::No);
        assert!(recorder.queue.lock().await.is_empty());
    }
}
