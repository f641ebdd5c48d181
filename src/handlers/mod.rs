//! Handler Registry & Command Context
//!
//! A mapping from canonical command kind to a `Handler`, mirroring the
//! reference crate's `CommandRegistry` (`commands/registry.rs`) method for
//! method. `register` is the only sanctioned extension point — tests
//! override a builtin by registering a replacement under the same kind.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::EngineError;

pub mod context;
pub mod decrypt;
pub mod encrypt;
pub mod ondialog;
pub mod ondownload;
pub mod pause;
pub mod prompt;
pub mod saveas;
pub mod set;
pub mod tag;
pub mod url;
pub mod version;
pub mod wait;
pub mod winclick;

pub use context::{CommandContext, LogEntry, LogLevel};

pub type HandlerResult = Result<(), EngineError>;

#[async_trait]
pub trait Handler: Send + Sync {
    fn kind(&self) -> &'static str;
    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult;
}

pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self { handlers: HashMap::new() }
    }

    /// Installs or replaces the handler for its own `kind()`.
    pub fn register(&mut self, handler: Box<dyn Handler>) {
        self.handlers.insert(handler.kind().to_string(), handler);
    }

    pub fn get(&self, kind: &str) -> Option<&dyn Handler> {
        self.handlers.get(kind).map(|h| h.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }
}

/// Installs the built-in handler set at construction time, per the Handler
/// Registry contract ("the engine registers a built-in set at construction").
pub fn register_builtins(registry: &mut HandlerRegistry) {
    registry.register(Box::new(set::SetHandler));
    registry.register(Box::new(wait::WaitHandler));
    registry.register(Box::new(pause::PauseHandler));
    registry.register(Box::new(prompt::PromptHandler));
    registry.register(Box::new(ondialog::OnDialogHandler));
    registry.register(Box::new(ondownload::OnDownloadHandler));
    registry.register(Box::new(saveas::SaveAsHandler));
    registry.register(Box::new(tag::TagHandler));
    registry.register(Box::new(tag::ClickHandler));
    registry.register(Box::new(url::UrlHandler));
    registry.register(Box::new(winclick::WinClickHandler));
    registry.register(Box::new(version::VersionHandler));
    registry.register(Box::new(encrypt::EncryptHandler));
    registry.register(Box::new(decrypt::DecryptHandler));
}
