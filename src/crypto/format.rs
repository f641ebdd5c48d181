//! Legacy ECB hex and modern CBC-Base64 encryption formats.
//!
//! Modern: Base64 of `IV(32 bytes) || Rijndael-256-CBC(PKCS-pad(plaintext))`,
//! key = SHA-256(password). Legacy: uppercase hex of Rijndael-256-ECB
//! blocks, same key derivation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;

use crate::error::EngineError;

use super::rijndael::{self, BLOCK_SIZE, KEY_SIZE};
use super::sha256::sha256;

fn derive_key(password: &str) -> [u8; KEY_SIZE] {
    sha256(password.as_bytes())
}

fn parse_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

fn to_hex_upper(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Heuristic detection used before decrypting: an all-hex string whose
/// length is a multiple of two block-hex-lengths is treated as legacy;
/// otherwise a Base64 attempt is made. This mirrors the legacy engine's
/// `isEncrypted` length/charset check rather than a format tag.
pub fn is_encrypted(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    if is_legacy_format(s) {
        return true;
    }
    let base64_charset = s.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=');
    base64_charset && s.len() % 4 == 0 && s.len() >= 4 * ((BLOCK_SIZE + BLOCK_SIZE) / 3 + 1)
}

fn is_legacy_format(s: &str) -> bool {
    !s.is_empty() && s.len() % (BLOCK_SIZE * 2) == 0 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Encrypts `plaintext` with `password` in the modern Base64/CBC format.
pub fn encrypt_modern(plaintext: &str, password: &str) -> Result<String, EngineError> {
    if password.is_empty() {
        return Err(EngineError::MissingParameter("PASSWORD".to_string()));
    }
    let key = derive_key(password);
    let mut iv = [0u8; BLOCK_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);
    let ciphertext = rijndael::encrypt_cbc(plaintext.as_bytes(), &key, &iv);
    let mut combined = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
    combined.extend_from_slice(&iv);
    combined.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(combined))
}

/// Encrypts `plaintext` with `password` in the legacy uppercase-hex/ECB
/// format.
pub fn encrypt_legacy(plaintext: &str, password: &str) -> Result<String, EngineError> {
    if password.is_empty() {
        return Err(EngineError::MissingParameter("PASSWORD".to_string()));
    }
    let key = derive_key(password);
    let ciphertext = rijndael::encrypt_ecb(plaintext.as_bytes(), &key);
    Ok(to_hex_upper(&ciphertext))
}

fn decrypt_legacy(ciphertext_hex: &str, password: &str) -> Result<String, EngineError> {
    let key = derive_key(password);
    let bytes = parse_hex(ciphertext_hex)
        .ok_or_else(|| EngineError::EncryptionError("malformed legacy ciphertext".to_string()))?;
    let plaintext = rijndael::decrypt_ecb(&bytes, &key)
        .ok_or_else(|| EngineError::EncryptionError("decryption failed (wrong password?)".to_string()))?;
    String::from_utf8(plaintext).map_err(|_| EngineError::EncryptionError("decrypted text is not valid UTF-8".to_string()))
}

fn decrypt_modern(ciphertext_b64: &str, password: &str) -> Result<String, EngineError> {
    let key = derive_key(password);
    let combined = BASE64
        .decode(ciphertext_b64.trim())
        .map_err(|_| EngineError::EncryptionError("malformed base64 ciphertext".to_string()))?;
    if combined.len() <= BLOCK_SIZE {
        return Err(EngineError::EncryptionError("ciphertext too short".to_string()));
    }
    let (iv, body) = combined.split_at(BLOCK_SIZE);
    let iv: [u8; BLOCK_SIZE] = iv.try_into().unwrap();
    let plaintext = rijndael::decrypt_cbc(body, &key, &iv)
        .ok_or_else(|| EngineError::EncryptionError("decryption failed (wrong password?)".to_string()))?;
    String::from_utf8(plaintext).map_err(|_| EngineError::EncryptionError("decrypted text is not valid UTF-8".to_string()))
}

/// Decrypts `ciphertext`, auto-detecting legacy vs modern format.
pub fn decrypt(ciphertext: &str, password: &str) -> Result<String, EngineError> {
    if password.is_empty() {
        return Err(EngineError::MissingParameter("PASSWORD".to_string()));
    }
    let trimmed = ciphertext.trim();
    if is_legacy_format(trimmed) {
        decrypt_legacy(trimmed, password)
    } else {
        decrypt_modern(trimmed, password)
    }
}
