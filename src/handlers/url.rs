//! `URL` — `URL GOTO=...`
//!
//! Issues navigation through the Page Driver, then awaits readiness bounded
//! by `!TIMEOUT_PAGE` seconds.

use async_trait::async_trait;

use crate::vars::VariableValue;

use super::{CommandContext, Handler, HandlerResult};

pub struct UrlHandler;

#[async_trait]
impl Handler for UrlHandler {
    fn kind(&self) -> &'static str {
        "URL"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let goto = ctx.expand(ctx.get_required_param("GOTO")?);
        ctx.bridges.page.navigate(&goto).await?;
        let timeout_page = match ctx.get_variable("!TIMEOUT_PAGE") {
            Some(VariableValue::Number(n)) => n,
            _ => 60.0,
        };
        ctx.bridges.page.wait_ready(timeout_page).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex as StdMutex};

    use crate::bridges::{Bridges, ElementQuery, ExtractMode, PageDriver};
    use crate::error::EngineError;
    use crate::handlers::test_support::Fixture;

    use super::*;

    struct RecordingPageDriver {
        navigated: StdMutex<Vec<String>>,
    }

    #[async_trait]
    impl PageDriver for RecordingPageDriver {
        async fn navigate(&self, url: &str) -> Result<(), EngineError> {
            self.navigated.lock().unwrap().push(url.to_string());
            Ok(())
        }
        async fn wait_ready(&self, _timeout_secs: f64) -> Result<(), EngineError> {
            Ok(())
        }
        async fn click(&self, _query: &ElementQuery) -> Result<bool, EngineError> {
            Ok(false)
        }
        async fn extract(&self, _query: &ElementQuery, _mode: ExtractMode) -> Result<Option<String>, EngineError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn navigates_to_the_expanded_url() {
        let page = Arc::new(RecordingPageDriver { navigated: StdMutex::new(Vec::new()) });
        let mut bridges = Bridges::default();
        bridges.page = page.clone();
        let mut fx = Fixture::with_bridges(bridges);
        fx.vars.set("SITE", "example.com").unwrap();
        let result = fx.run_source(&UrlHandler, "URL GOTO=https://{{SITE}}/").await;
        assert!(result.is_ok());
        assert_eq!(page.navigated.lock().unwrap()[0], "https://example.com/");
    }

    #[tokio::test]
    async fn missing_goto_is_missing_parameter() {
        let mut fx = Fixture::new();
        let result = fx.run_source(&UrlHandler, "URL").await;
        assert!(matches!(result, Err(EngineError::MissingParameter(_))));
    }
}
