//! `ONDOWNLOAD` — `ONDOWNLOAD [FOLDER=...] [FILE=...] [WAIT=YES|NO] [CHECKSUM=ALGO:HEX]`
//!
//! At least one of `FOLDER`/`FILE` is required (Open Question resolved in
//! DESIGN.md: a lone `FOLDER` succeeds with a server-suggested filename,
//! matching the "succeed with no `FILE`" test file rather than requiring
//! both). `FOLDER="*"` and `FILE="+"`/`FILE="*"` transmit as absent.
//! `FILE` is checked against `< > | ? *`; `FOLDER` against NUL bytes.
//! `WAIT` defaults to `YES`; `CHECKSUM` requires `WAIT=YES`. After a
//! successful send, (re)starts the Download Timeout Manager at the current
//! `!TIMEOUT_TAG`.

use async_trait::async_trait;

use crate::bridges::{DownloadMessage, DownloadOptions};
use crate::error::EngineError;
use crate::vars::VariableValue;

use super::{CommandContext, Handler, HandlerResult};

const ILLEGAL_FILE_CHARS: [char; 5] = ['<', '>', '|', '?', '*'];

fn resolve_folder(raw: Option<&str>) -> Result<Option<String>, EngineError> {
    match raw {
        None | Some("*") => Ok(None),
        Some(f) => {
            if f.contains('\0') {
                return Err(EngineError::DownloadFolderAccess(format!("NUL byte in FOLDER: {f:?}")));
            }
            Ok(Some(f.to_string()))
        }
    }
}

fn resolve_file(raw: Option<&str>) -> Result<Option<String>, EngineError> {
    match raw {
        None | Some("*") | Some("+") => Ok(None),
        Some(f) => {
            if f.chars().any(|c| ILLEGAL_FILE_CHARS.contains(&c)) {
                return Err(EngineError::DownloadInvalidFilename(format!("illegal character in FILE: {f:?}")));
            }
            Ok(Some(f.to_string()))
        }
    }
}

fn parse_wait(raw: Option<&str>) -> bool {
    match raw {
        None => true,
        Some(v) => matches!(v.to_ascii_uppercase().as_str(), "YES" | "TRUE"),
    }
}

fn validate_checksum(raw: &str) -> Result<String, EngineError> {
    let (algo, hex) = raw
        .split_once(':')
        .ok_or_else(|| EngineError::InvalidParameter(format!("CHECKSUM must be ALGO:HEX, got {raw:?}")))?;
    let algo_upper = algo.to_ascii_uppercase();
    let expected_len = match algo_upper.as_str() {
        "MD5" => 32,
        "SHA1" => 40,
        other => return Err(EngineError::InvalidParameter(format!("unsupported checksum algorithm {other:?}"))),
    };
    if hex.len() != expected_len || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EngineError::InvalidParameter(format!("CHECKSUM hex must be {expected_len} hex characters")));
    }
    Ok(format!("{algo_upper}:{}", hex.to_ascii_lowercase()))
}

pub struct OnDownloadHandler;

#[async_trait]
impl Handler for OnDownloadHandler {
    fn kind(&self) -> &'static str {
        "ONDOWNLOAD"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> HandlerResult {
        let folder_raw = ctx.get_param("FOLDER").map(|s| s.to_string());
        let file_raw = ctx.get_param("FILE").map(|s| s.to_string());
        if folder_raw.is_none() && file_raw.is_none() {
            return Err(EngineError::MissingParameter("FOLDER or FILE".to_string()));
        }

        let folder = resolve_folder(folder_raw.as_deref())?;
        let file = resolve_file(file_raw.as_deref())?;
        let wait = parse_wait(ctx.get_param("WAIT"));

        let checksum = match ctx.get_param("CHECKSUM") {
            None => None,
            Some(raw) => {
                if !wait {
                    return Err(EngineError::InvalidParameter("CHECKSUM requires WAIT=YES".to_string()));
                }
                Some(validate_checksum(raw)?)
            }
        };

        let message = DownloadMessage::SetOptions(DownloadOptions { folder, file, wait, checksum });
        let ack = ctx
            .bridges
            .download
            .send_message(message)
            .await
            .map_err(|e| EngineError::DownloadError(e.to_string()))?;
        if !ack.success {
            return Err(EngineError::DownloadError(ack.error.unwrap_or_else(|| "download bridge rejected options".to_string())));
        }

        let timeout_tag = match ctx.get_variable("!TIMEOUT_TAG") {
            Some(VariableValue::Number(n)) => n,
            _ => 10.0,
        };
        ctx.download_timeout.start(timeout_tag).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::bridges::{Bridges, DownloadAck, DownloadBridge};
    use crate::handlers::test_support::Fixture;

    use super::*;

    struct RecordingDownloadBridge {
        sent: Mutex<Vec<DownloadMessage>>,
    }

    #[async_trait]
    impl DownloadBridge for RecordingDownloadBridge {
        async fn send_message(&self, message: DownloadMessage) -> Result<DownloadAck, EngineError> {
            self.sent.lock().await.push(message);
            Ok(DownloadAck { success: true, error: None })
        }
    }

    #[tokio::test]
    async fn illegal_filename_character_fails_before_sending() {
        let recorder = Arc::new(RecordingDownloadBridge { sent: Mutex::new(Vec::new()) });
        let mut bridges = Bridges::default();
        bridges.download = recorder.clone();
        let mut fx = Fixture::with_bridges(bridges);
        let result = fx.run_source(&OnDownloadHandler, "ONDOWNLOAD FOLDER=/out FILE=x<y.pdf").await;
        assert!(matches!(result, Err(EngineError::DownloadInvalidFilename(_))));
        assert!(recorder.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn checksum_with_wait_no_is_rejected() {
        let mut fx = Fixture::new();
        let result = fx
            .run_source(
                &OnDownloadHandler,
                "ONDOWNLOAD FOLDER=/out FILE=a.pdf WAIT=NO CHECKSUM=MD5:d41d8cd98f00b204e9800998ecf8427e",
            )
            .await;
        match result {
            Err(EngineError::InvalidParameter(msg)) => assert!(msg.contains("CHECKSUM requires WAIT=YES")),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn star_folder_and_plus_file_transmit_as_absent() {
        let recorder = Arc::new(RecordingDownloadBridge { sent: Mutex::new(Vec::new()) });
        let mut bridges = Bridges::default();
        bridges.download = recorder.clone();
        let mut fx = Fixture::with_bridges(bridges);
        fx.run_source(&OnDownloadHandler, "ONDOWNLOAD FOLDER=* FILE=+").await.unwrap();
        match &recorder.sent.lock().await[0] {
            DownloadMessage::SetOptions(opts) => {
                assert_eq!(opts.folder, None);
                assert_eq!(opts.file, None);
            }
            _ => panic!(),
        };
    }

    #[tokio::test]
    async fn folder_only_succeeds_with_server_suggested_filename() {
        let mut fx = Fixture::new();
        let result = fx.run_source(&OnDownloadHandler, "ONDOWNLOAD FOLDER=/out").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn neither_folder_nor_file_is_missing_parameter() {
        let mut fx = Fixture::new();
        let result = fx.run_source(&OnDownloadHandler, "ONDOWNLOAD WAIT=YES").await;
        assert!(matches!(result, Err(EngineError::MissingParameter(_))));
    }

    #[tokio::test]
    async fn valid_checksum_is_lowercased_and_uppercase_algo() {
        let recorder = Arc::new(RecordingDownloadBridge { sent: Mutex::new(Vec::new()) });
        let mut bridges = Bridges::default();
        bridges.download = recorder.clone();
        let mut fx = Fixture::with_bridges(bridges);
        fx.run_source(&OnDownloadHandler, "ONDOWNLOAD FILE=a.pdf CHECKSUM=md5:D41D8CD98F00B204E9800998ECF8427E")
            .await
            .unwrap();
        match &recorder.sent.lock().await[0] {
            DownloadMessage::SetOptions(opts) => {
                assert_eq!(opts.checksum.as_deref(), Some("MD5:d41d8cd98f00b204e9800998ecf8427e"));
            }
            _ => panic!(),
        };
    }

    #[tokio::test(start_paused = true)]
    async fn starts_the_download_timeout_manager_after_sending() {
        let mut fx = Fixture::new();
        fx.vars.set("!TIMEOUT_TAG", "1").unwrap();
        fx.run_source(&OnDownloadHandler, "ONDOWNLOAD FILE=a.pdf").await.unwrap();
        tokio::time::advance(std::time::Duration::from_secs(5)).await;
        tokio::task::yield_now().await;
        // max(4, 4*1) = 4s elapsed by t=5s.
        assert!(fx.pending_error().await.is_some());
    }
}
