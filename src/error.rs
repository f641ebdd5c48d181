//! Error Taxonomy
//!
//! Fixed mapping of symbolic error kinds to legacy-stable integer codes.
//! Handlers never panic; every failure is surfaced as an `EngineError`
//! and converted to a code via `EngineError::code`.

use thiserror::Error;

use crate::parser::ParseException;

/// One entry of the legacy error taxonomy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("script error: {0}")]
    ScriptError(String),

    #[error("user aborted execution")]
    UserAbort,

    #[error("download failed: {0}")]
    DownloadError(String),

    #[error("download timed out")]
    DownloadTimeout,

    #[error("illegal character in download filename: {0}")]
    DownloadInvalidFilename(String),

    #[error("download folder not accessible: {0}")]
    DownloadFolderAccess(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("dialog appeared with no queued configuration")]
    UnhandledDialog,

    #[error("encryption error: {0}")]
    EncryptionError(String),

    #[error("{0}")]
    Parse(#[from] ParseException),
}

impl EngineError {
    /// The legacy-stable integer code for this error kind.
    pub fn code(&self) -> i32 {
        match self {
            EngineError::MissingParameter(_) => -801,
            EngineError::InvalidParameter(_) => -802,
            EngineError::ScriptError(_) => -910,
            EngineError::UserAbort => -933,
            EngineError::DownloadError(_) => -950,
            EngineError::DownloadTimeout => -952,
            EngineError::DownloadInvalidFilename(_) => -954,
            EngineError::DownloadFolderAccess(_) => -955,
            EngineError::ElementNotFound(_) => -921,
            EngineError::UnhandledDialog => -1450,
            // Distinct legacy namespace: encryption errors are not part of
            // the command-result taxonomy, but the CLI still needs a stable
            // code to report for ENCRYPT/DECRYPT failures.
            EngineError::EncryptionError(_) => 942,
            EngineError::Parse(_) => -802,
        }
    }

    /// True if this error kind always terminates the macro regardless of
    /// `!ERRORIGNORE`.
    pub fn is_always_terminal(&self) -> bool {
        matches!(self, EngineError::UserAbort | EngineError::DownloadTimeout)
    }
}

/// The successful-completion code. Not part of `EngineError` since success
/// carries no error value, but handler/executor code maps it explicitly.
pub const OK_CODE: i32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_taxonomy() {
        assert_eq!(EngineError::MissingParameter("X".into()).code(), -801);
        assert_eq!(EngineError::InvalidParameter("X".into()).code(), -802);
        assert_eq!(EngineError::ScriptError("X".into()).code(), -910);
        assert_eq!(EngineError::UserAbort.code(), -933);
        assert_eq!(EngineError::DownloadError("X".into()).code(), -950);
        assert_eq!(EngineError::DownloadTimeout.code(), -952);
        assert_eq!(EngineError::DownloadInvalidFilename("X".into()).code(), -954);
        assert_eq!(EngineError::DownloadFolderAccess("X".into()).code(), -955);
        assert_eq!(EngineError::ElementNotFound("X".into()).code(), -921);
        assert_eq!(EngineError::UnhandledDialog.code(), -1450);
        assert_eq!(EngineError::EncryptionError("X".into()).code(), 942);
    }

    #[test]
    fn user_abort_and_download_timeout_are_always_terminal() {
        assert!(EngineError::UserAbort.is_always_terminal());
        assert!(EngineError::DownloadTimeout.is_always_terminal());
        assert!(!EngineError::ScriptError("x".into()).is_always_terminal());
    }
}
