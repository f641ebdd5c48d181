//! `TAG` / `CLICK` — element selection, clicking, and extraction
//!
//! `TAG` with an `EXTRACT=TXT|HTM|HREF|TBL|TITLE|URL` parameter delegates
//! extraction to the Page Driver and appends the result to the extract
//! buffer; without `EXTRACT`, `TAG` clicks the matched element, the same as
//! the standalone `CLICK` command. A missing element honours
//! `!ERRORIGNORE`; otherwise it is `ELEMENT_NOT_FOUND`.

use async_trait::async_trait;

use crate::bridges::{ElementQuery, ExtractMode};
use crate::error::EngineError;

use super::{CommandContext, Handler, HandlerResult};

fn build_query(ctx: &CommandContext<'_>) -> ElementQuery {
    ElementQuery {
        pos: ctx.get_param("POS").and_then(|p| p.parse().ok()),
        element_type: ctx.get_param("TYPE").map(|t| t.to_string()),
        attr: ctx.get_param("ATTR").map(|a| ctx.expand(a)),
        form: ctx.get_param("FORM").map(|f| f.to_string()),
    }
}

async fn click_element(ctx: &mut CommandContext<'_>) -> HandlerResult {
    let query = build_query(ctx);
    let matched = ctx.bridges.page.click(&query).await?;
    if matched {
        Ok(())
    } else if ctx.error_ignore() {
        Ok(())
    } else {
        Err(EngineError::ElementNotFound(format!("{query:?}")))
    }
}

async fn extract_element(ctx: &mut CommandContext<'_>, mode: ExtractMode) -> HandlerResult {
    let query = build_query(ctx);
    match ctx.bridges.page.extract(&query, mode).await? {
        Some(value) => {
            ctx.add_extract(value);
            Ok(())
        }
        None if ctx.error_ignore() => Ok(()),
        None => Err(EngineError::ElementNotFound(format!("{query:?}"))),
    }
}

pub struct TagHandler;

#[async_trait]
impl Handler for TagHandler {
    fn kind(&self) -> &'static str {
        "TAG"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        match ctx.get_param("EXTRACT") {
            Some(mode_raw) => {
                let mode = ExtractMode::parse(mode_raw)
                    .ok_or_else(|| EngineError::InvalidParameter(format!("unknown EXTRACT mode {mode_raw:?}")))?;
                extract_element(ctx, mode).await
            }
            None => click_element(ctx).await,
        }
    }
}

pub struct ClickHandler;

#[async_trait]
impl Handler for ClickHandler {
    fn kind(&self) -> &'static str {
        "CLICK"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        click_element(ctx).await
    }
}
