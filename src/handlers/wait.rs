//! `WAIT` — `WAIT SECONDS=n`
//!
//! `n` is decimal, non-negative. The actual delay is
//! `min(n * 1000 ms, !TIMEOUT_STEP * 1000 ms)`, floored at 10 ms so
//! `SECONDS=0` still yields an observable suspension point. Negative or
//! non-numeric `SECONDS` is `INVALID_PARAMETER` with no delay observed.

use async_trait::async_trait;

use crate::error::EngineError;
use crate::vars::VariableValue;

use super::{CommandContext, Handler, HandlerResult};

const MIN_DELAY_MS: f64 = 10.0;

fn timeout_step_ms(ctx: &CommandContext<'_>) -> f64 {
    match ctx.get_variable("!TIMEOUT_STEP") {
        Some(VariableValue::Number(n)) => n * 1000.0,
        _ => 6000.0,
    }
}

pub struct WaitHandler;

#[async_trait]
impl Handler for WaitHandler {
    fn kind(&self) -> &'static str {
        "WAIT"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let raw = ctx.get_required_param("SECONDS")?;
        let seconds: f64 = raw
            .parse()
            .map_err(|_| EngineError::InvalidParameter(format!("SECONDS must be numeric, got {raw:?}")))?;
        if seconds < 0.0 {
            return Err(EngineError::InvalidParameter("SECONDS must be non-negative".to_string()));
        }
        let delay_ms = (seconds * 1000.0).min(timeout_step_ms(ctx)).max(MIN_DELAY_MS);
        tokio::time::sleep(std::time::Duration::from_secs_f64(delay_ms / 1000.0)).await;
        Ok(())
    }
}
