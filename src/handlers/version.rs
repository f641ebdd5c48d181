//! `VERSION` — reports engine version info into variables; never fails.
//!
//! Populates `VERSION` (crate semver) and `VERSION_BUILD` (the integer
//! `CARGO_PKG_VERSION_MAJOR*10000 + MINOR*100 + PATCH`, mirroring the legacy
//! engine's single-integer build-number convention). Plain user variables,
//! not `!`-prefixed system ones — the system table is a fixed, documented
//! set and `VariableStore::set` rejects unknown `!` names.

use async_trait::async_trait;

use super::{CommandContext, Handler, HandlerResult};

pub struct VersionHandler;

#[async_trait]
impl Handler for VersionHandler {
    fn kind(&self) -> &'static str {
        "VERSION"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let major: u32 = env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0);
        let minor: u32 = env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0);
        let patch: u32 = env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0);
        let build = major * 10_000 + minor * 100 + patch;

        ctx.set_variable("VERSION", env!("CARGO_PKG_VERSION"))?;
        ctx.set_variable("VERSION_BUILD", &build.to_string())?;
        Ok(())
    }
}
