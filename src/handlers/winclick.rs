//! `WINCLICK` — `WINCLICK X=n Y=n [BUTTON=LEFT|RIGHT|MIDDLE|CENTER]`
//!
//! Validates non-negative integer coordinates; `CENTER` is an alias for
//! `MIDDLE`. Unrecognised `BUTTON` is `INVALID_PARAMETER`; a WinClick
//! service failure maps to `SCRIPT_ERROR`.

use async_trait::async_trait;

use crate::bridges::ClickButton;
use crate::error::EngineError;

use super::{CommandContext, Handler, HandlerResult};

fn parse_coord(raw: &str, axis: &str) -> Result<u32, EngineError> {
    raw.parse::<u32>().map_err(|_| EngineError::InvalidParameter(format!("{axis} must be a non-negative integer, got {raw:?}")))
}

pub struct WinClickHandler;

#[async_trait]
impl Handler for WinClickHandler {
    fn kind(&self) -> &'static str {
        "WINCLICK"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let x = parse_coord(ctx.get_required_param("X")?, "X")?;
        let y = parse_coord(ctx.get_required_param("Y")?, "Y")?;
        let button = match ctx.get_param("BUTTON") {
            None => ClickButton::Left,
            Some(raw) => ClickButton::parse(raw)
                .ok_or_else(|| EngineError::InvalidParameter(format!("unrecognised BUTTON {raw:?}")))?,
        };
        ctx.bridges
            .winclick
            .click(x, y, button)
            .await
            .map_err(|e| EngineError::ScriptError(e.to_string()))
    }
}
