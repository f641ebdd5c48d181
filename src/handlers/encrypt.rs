//! `ENCRYPT` — `ENCRYPT TEXT=... PASSWORD=... [LEGACY=YES|NO] [RESULT=varname]`
//!
//! Delegates to the legacy Rijndael-256 utilities in `crypto::format`.
//! `LEGACY=YES` produces the uppercase-hex/ECB form; the default produces
//! the modern Base64/CBC form. With `RESULT`, stores the ciphertext in that
//! variable; otherwise logs it.

use async_trait::async_trait;

use crate::crypto::{encrypt_legacy, encrypt_modern};

use super::context::LogLevel;
use super::{CommandContext, Handler, HandlerResult};

pub struct EncryptHandler;

#[async_trait]
impl Handler for EncryptHandler {
    fn kind(&self) -> &'static str {
        "ENCRYPT"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let text = ctx.expand(ctx.get_required_param("TEXT")?);
        let password = ctx.expand(ctx.get_required_param("PASSWORD")?);
        let legacy = matches!(ctx.get_param("LEGACY"), Some(v) if v.eq_ignore_ascii_case("YES"));

        let ciphertext = if legacy { encrypt_legacy(&text, &password)? } else { encrypt_modern(&text, &password)? };

        match ctx.get_param("RESULT") {
            Some(name) => {
                let name = name.to_string();
                ctx.set_variable(&name, &ciphertext)?;
            }
            None => ctx.log(LogLevel::Info, ciphertext),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::crypto::{decrypt, is_encrypted};
    use crate::error::EngineError;
    use crate::handlers::test_support::Fixture;

    use super::*;

    #[tokio::test]
    async fn modern_result_is_stored_in_the_named_variable() {
        let mut fx = Fixture::new();
        fx.run_source(&EncryptHandler, "ENCRYPT TEXT=hello PASSWORD=s3cret RESULT=OUT").await.unwrap();
        let stored = fx.vars.get("OUT", None).unwrap().stringify();
        assert!(is_encrypted(&stored));
        assert_eq!(decrypt(&stored, "s3cret").unwrap(), "hello");
    }

    #[tokio::test]
    async fn legacy_result_is_uppercase_hex() {
        let mut fx = Fixture::new();
        fx.run_source(&EncryptHandler, "ENCRYPT TEXT=hello PASSWORD=s3cret LEGACY=YES RESULT=OUT").await.unwrap();
        let stored = fx.vars.get("OUT", None).unwrap().stringify();
        assert!(stored.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[tokio::test]
    async fn without_result_logs_the_ciphertext() {
        let mut fx = Fixture::new();
        fx.run_source(&EncryptHandler, "ENCRYPT TEXT=hello PASSWORD=s3cret").await.unwrap();
        assert_eq!(fx.run_log.len(), 1);
        assert!(!fx.vars.exists("RESULT"));
    }

    #[tokio::test]
    async fn empty_password_is_missing_parameter() {
        let mut fx = Fixture::new();
        let result = fx.run_source(&EncryptHandler, "ENCRYPT TEXT=hello PASSWORD=").await;
        assert!(matches!(result, Err(EngineError::MissingParameter(_))));
    }
}
