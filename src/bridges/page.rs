//! Page Driver Bridge
//!
//! Abstracts DOM queries, click synthesis, and navigation — the browser
//! driver itself is out of scope; the engine only depends on this
//! interface's contract.

use async_trait::async_trait;

use crate::error::EngineError;

/// What `TAG ... EXTRACT=...` collects from a matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    Txt,
    Htm,
    Href,
    Tbl,
    Title,
    Url,
}

impl ExtractMode {
    pub fn parse(s: &str) -> Option<ExtractMode> {
        match s.to_ascii_uppercase().as_str() {
            "TXT" => Some(ExtractMode::Txt),
            "HTM" => Some(ExtractMode::Htm),
            "HREF" => Some(ExtractMode::Href),
            "TBL" => Some(ExtractMode::Tbl),
            "TITLE" => Some(ExtractMode::Title),
            "URL" => Some(ExtractMode::Url),
            _ => None,
        }
    }
}

/// A selector as parsed from `TAG`/`CLICK` parameters (`POS`, `TYPE`,
/// `ATTR`, `FORM`); left as opaque key/value pairs since the real matching
/// semantics live in the Page Driver implementation, not the engine.
#[derive(Debug, Clone, Default)]
pub struct ElementQuery {
    pub pos: Option<u32>,
    pub element_type: Option<String>,
    pub attr: Option<String>,
    pub form: Option<String>,
}

#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), EngineError>;

    /// Blocks (cooperatively) until the page reports ready, bounded by
    /// `timeout_secs` (`!TIMEOUT_PAGE`).
    async fn wait_ready(&self, timeout_secs: f64) -> Result<(), EngineError>;

    /// Synthesises a click on the matched element; `Ok(false)` means no
    /// element matched (the handler maps this to `ELEMENT_NOT_FOUND`).
    async fn click(&self, query: &ElementQuery) -> Result<bool, EngineError>;

    /// Extracts `mode` from the matched element; `Ok(None)` means no match.
    async fn extract(&self, query: &ElementQuery, mode: ExtractMode) -> Result<Option<String>, EngineError>;
}

pub struct NullPageDriver;

#[async_trait]
impl PageDriver for NullPageDriver {
    async fn navigate(&self, _url: &str) -> Result<(), EngineError> {
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
