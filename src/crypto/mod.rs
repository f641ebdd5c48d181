//! Encryption Module
//!
//! Legacy ECB hex and modern CBC-Base64 formats over Rijndael-256/256, with
//! SHA-256 key derivation. Pure-functional: no shared state beyond per-call
//! password-derived keys.

pub mod format;
pub mod rijndael;
pub mod sha256;

pub use format::{decrypt, encrypt_legacy, encrypt_modern, is_encrypted};
