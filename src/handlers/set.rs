//! `SET` — `SET NAME VALUE...`
//!
//! The first positional parameter is the variable name; every remaining
//! positional parameter is joined with single spaces to form the value.
//! Expansion runs on the value before the store sees it, so `SET !VAR2
//! {{!VAR1}}` captures `!VAR1`'s value at assignment time, not at read time.

use async_trait::async_trait;

use crate::error::EngineError;

use super::{CommandContext, Handler, HandlerResult};

pub struct SetHandler;

#[async_trait]
impl Handler for SetHandler {
    fn kind(&self) -> &'static str {
        "SET"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let mut positionals = ctx.command.positional_params();
        let name = positionals
            .next()
            .ok_or_else(|| EngineError::MissingParameter("NAME".to_string()))?
            .to_string();
        let raw_value = positionals.collect::<Vec<_>>().join(" ");
        let value = ctx.expand(&raw_value);
        ctx.set_variable(&name, &value)
    }
}
