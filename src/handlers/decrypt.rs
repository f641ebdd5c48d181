//! `DECRYPT` — `DECRYPT TEXT=... PASSWORD=... [RESULT=varname]`
//!
//! Delegates to `crypto::decrypt`, which auto-detects the legacy hex/ECB or
//! modern Base64/CBC format. A wrong password or malformed ciphertext
//! surfaces as `EngineError::EncryptionError` (code 942).

use async_trait::async_trait;

use crate::crypto::decrypt;

use super::context::LogLevel;
use super::{CommandContext, Handler, HandlerResult};

pub struct DecryptHandler;

#[async_trait]
impl Handler for DecryptHandler {
    fn kind(&self) -> &'static str {
        "DECRYPT"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let text = ctx.expand(ctx.get_required_param("TEXT")?);
        let password = ctx.expand(ctx.get_required_param("PASSWORD")?);
        let plaintext = decrypt(&text, &password)?;

        match ctx.get_param("RESULT") {
            Some(name) => {
                let name = name.to_string();
                ctx.set_variable(&name, &plaintext)?;
            }
            None => ctx.log(LogLevel::Info, plaintext),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::crypto::{encrypt_legacy, encrypt_modern};
    use crate::error::EngineError;
    use crate::handlers::test_support::Fixture;

    use super::*;

    #[tokio::test]
    async fn modern_ciphertext_round_trips_into_result() {
        let ciphertext = encrypt_modern("hello, world", "s3cret").unwrap();
        let mut fx = Fixture::new();
        fx.run_source(&DecryptHandler, &format!("DECRYPT TEXT={ciphertext} PASSWORD=s3cret RESULT=OUT")).await.unwrap();
        assert_eq!(fx.vars.get("OUT", None).unwrap().stringify(), "hello, world");
    }

    #[tokio::test]
    async fn legacy_ciphertext_round_trips_into_result() {
        let ciphertext = encrypt_legacy("hello", "s3cret").unwrap();
        let mut fx = Fixture::new();
        fx.run_source(&DecryptHandler, &format!("DECRYPT TEXT={ciphertext} PASSWORD=s3cret RESULT=OUT")).await.unwrap();
        assert_eq!(fx.vars.get("OUT", None).unwrap().stringify(), "hello");
    }

    #[tokio::test]
    async fn wrong_password_is_an_encryption_error() {
        let ciphertext = encrypt_modern("hello", "right").unwrap();
        let mut fx = Fixture::new();
        let result = fx.run_source(&DecryptHandler, &format!("DECRYPT TEXT={ciphertext} PASSWORD=wrong")).await;
        match result {
            Err(EngineError::EncryptionError(_)) => {}
            other => panic!("expected EncryptionError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn without_result_logs_the_plaintext() {
        let ciphertext = encrypt_modern("hello", "s3cret").unwrap();
        let mut fx = Fixture::new();
        fx.run_source(&DecryptHandler, &format!("DECRYPT TEXT={ciphertext} PASSWORD=s3cret")).await.unwrap();
        assert_eq!(fx.run_log.len(), 1);
    }
}
