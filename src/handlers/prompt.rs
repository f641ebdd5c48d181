//! `PROMPT` — `PROMPT MESSAGE [VAR=!Name] [DEFAULT=...]`
//!
//! Positional form `PROMPT msg varname default` is also accepted. With no
//! `VAR`, shows an alert and always succeeds. With `VAR`, shows a prompt;
//! a resolve stores the typed string in the named variable, a cancel
//! succeeds without writing (cancellation is in-band, not an error, per
//! the Flow Control UI contract).

use async_trait::async_trait;

use crate::bridges::PromptOutcome;
use crate::error::EngineError;

use super::{CommandContext, Handler, HandlerResult};

fn named_or_positional<'a>(ctx: &'a CommandContext<'_>, key: &str, index: usize) -> Option<&'a str> {
    ctx.get_param(key).or_else(|| ctx.command.positional_params().nth(index))
}

pub struct PromptHandler;

#[async_trait]
impl Handler for PromptHandler {
    fn kind(&self) -> &'static str {
        "PROMPT"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let message = named_or_positional(ctx, "MESSAGE", 0)
            .ok_or_else(|| EngineError::MissingParameter("MESSAGE".to_string()))?
            .to_string();
        let message = ctx.expand(&message);

        let var = named_or_positional(ctx, "VAR", 1).map(|s| s.to_string());
        let default = named_or_positional(ctx, "DEFAULT", 2).map(|s| s.to_string());

        match var {
            None => {
                ctx.bridges.flow.show_alert(&message).await?;
                Ok(())
            }
            Some(var_name) => {
                match ctx.bridges.flow.show_prompt(&message, default.as_deref()).await? {
                    PromptOutcome::Resolved(value) => ctx.set_variable(&var_name, &value),
                    PromptOutcome::Cancelled => Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;

    use crate::bridges::{Bridges, FlowControlUi, PauseOutcome};
    use crate::handlers::test_support::Fixture;
    use crate::vars::VariableValue;

    use super::*;

    struct RecordingFlow {
        calls: StdMutex<Vec<(String, Option<String>)>>,
        response: PromptOutcome,
    }

    #[async_trait]
    impl FlowControlUi for RecordingFlow {
        async fn show_pause(&self, _message: &str) -> Result<PauseOutcome, EngineError> {
            Ok(PauseOutcome::Resolved)
        }
        async fn show_prompt(&self, message: &str, default: Option<&str>) -> Result<PromptOutcome, EngineError> {
            self.calls.lock().unwrap().push((message.to_string(), default.map(|s| s.to_string())));
            Ok(self.response.clone())
        }
        async fn show_alert(&self, _message: &str) -> Result<(), EngineError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn resolved_prompt_stores_the_typed_value() {
        let flow = Arc::new(RecordingFlow { calls: StdMutex::new(Vec::new()), response: PromptOutcome::Resolved("typed".to_string()) });
        let mut bridges = Bridges::default();
        bridges.flow = flow.clone();
        let mut fx = Fixture::with_bridges(bridges);
        let result = fx.run_source(&PromptHandler, r#"PROMPT "Say" !VAR2 world"#).await;
        assert!(result.is_ok());
        assert_eq!(fx.vars.get("!VAR2", None), Some(VariableValue::Str("typed".to_string())));
        assert_eq!(flow.calls.lock().unwrap()[0], ("Say".to_string(), Some("world".to_string())));
    }

    #[tokio::test]
    async fn cancelled_prompt_succeeds_without_writing() {
        let flow = Arc::new(RecordingFlow { calls: StdMutex::new(Vec::new()), response: PromptOutcome::Cancelled });
        let mut bridges = Bridges::default();
        bridges.flow = flow;
        let mut fx = Fixture::with_bridges(bridges);
        let result = fx.run_source(&PromptHandler, "PROMPT Say !VAR2").await;
        assert!(result.is_ok());
        assert!(!fx.vars.exists("VAR2") && !fx.vars.exists("!VAR2"));
    }

    #[tokio::test]
    async fn no_var_shows_an_alert_and_succeeds() {
        let mut fx = Fixture::new();
        let result = fx.run_source(&PromptHandler, r#"PROMPT MESSAGE="just an alert""#).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn missing_message_is_missing_parameter() {
        let mut fx = Fixture::new();
        let result = fx.run_source(&PromptHandler, "PROMPT").await;
        assert!(matches!(result, Err(EngineError::MissingParameter(_))));
    }
}
