//! AES-256-GCM encryption for stored token payloads.
//!
//! Each payload is sealed with a fresh nonce. The master key is provided
//! base64-encoded from configuration and held in memory only.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Size of the encryption key in bytes (256 bits)
const KEY_SIZE: usize = 32;

/// Size of the nonce in bytes (96 bits, standard for GCM)
const NONCE_SIZE: usize = 12;

/// Cipher for token payloads at rest.
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    /// Builds a cipher from a base64-encoded 32-byte master key.
    pub fn new(key_base64: &str) -> Result<Self> {
        let key_bytes = BASE64
            .decode(key_base64)
            .context("Failed to decode base64 encryption key")?;

        if key_bytes.len() != KEY_SIZE {
            return Err(anyhow!(
                "Encryption key must be {} bytes (256 bits), got {} bytes",
                KEY_SIZE,
                key_bytes.len()
            ));
        }

        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| anyhow!("Failed to create cipher: {}", e))?;

        Ok(Self { cipher })
    }

    /// Encrypts a payload with a random nonce.
    ///
    /// Returns `(ciphertext, nonce)`, both base64-encoded for storage.
    pub fn seal(&self, plaintext: &str) -> Result<(String, String)> {
        let nonce_bytes = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext_bytes = self
            .cipher
            .encrypt(&nonce_bytes, plaintext.as_bytes())
            .map_err(|e| anyhow!("Encryption failed: {}", e))?;

        Ok((BASE64.encode(&ciphertext_bytes), BASE64.encode(nonce_bytes)))
    }

    /// Decrypts a sealed payload.
    ///
    /// Fails if the ciphertext was tampered with or sealed under a
    /// different key.
    pub fn open(&self, ciphertext_base64: &str, nonce_base64: &str) -> Result<String> {
        let ciphertext = BASE64
            .decode(ciphertext_base64)
            .context("Failed to decode base64 ciphertext")?;
        let nonce_bytes = BASE64
            .decode(nonce_base64)
            .context("Failed to decode base64 nonce")?;

        if nonce_bytes.len() != NONCE_SIZE {
            return Err(anyhow!(
                "Nonce must be {} bytes, got {} bytes",
                NONCE_SIZE,
                nonce_bytes.len()
            ));
        }

        let nonce = Nonce::from_slice(&nonce_bytes);
        let plaintext_bytes = self
            .cipher
            .decrypt(nonce, ciphertext.as_ref())
            .map_err(|e| anyhow!("Decryption failed (wrong key or tampered data): {}", e))?;

        String::from_utf8(plaintext_bytes).context("Decrypted payload is not valid UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> TokenCipher {
        TokenCipher::new(&BASE64.encode([7u8; 32])).unwrap()
    }

    #[test]
    fn test_seal_open_round_trip() {
        let cipher = test_cipher();
        let (sealed, nonce) = cipher.seal(r#"{"access_token":"abc"}"#).unwrap();
        let opened = cipher.open(&sealed, &nonce).unwrap();
        assert_eq!(opened, r#"{"access_token":"abc"}"#);
    }

    #[test]
    fn test_unique_nonces() {
        let cipher = test_cipher();
        let (sealed1, nonce1) = cipher.seal("same input").unwrap();
        let (sealed2, nonce2) = cipher.seal("same input").unwrap();
        assert_ne!(nonce1, nonce2);
        assert_ne!(sealed1, sealed2);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = test_cipher();
        let (sealed, nonce) = cipher.seal("secret").unwrap();

        let mut bytes = BASE64.decode(&sealed).unwrap();
        bytes[0] ^= 0xFF;
        let tampered = BASE64.encode(&bytes);

        assert!(cipher.open(&tampered, &nonce).is_err());
    }

    #[test]
    fn test_wrong_key_fails() {
        let cipher = test_cipher();
        let (sealed, nonce) = cipher.seal("secret").unwrap();

        let other = TokenCipher::new(&BASE64.encode([8u8; 32])).unwrap();
        assert!(other.open(&sealed, &nonce).is_err());
    }

    #[test]
    fn test_invalid_key() {
        // Too short
        assert!(TokenCipher::new(&BASE64.encode([0u8; 16])).is_err());
        // Invalid base64
        assert!(TokenCipher::new("not-valid-base64!@#$").is_err());
    }
}
