//! AES-256-GCM authenticated encryption of whole config files.

use crate::config::{key_params, FORMAT_MAGIC, FORMAT_VERSION};
use crate::crypto::AesKey;
use crate::error::{Error, Result};
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use rand::RngCore;

/// Nonce size for AES-GCM (96 bits).
const NONCE_SIZE: usize = 12;

/// Authentication tag size (128 bits).
const TAG_SIZE: usize = 16;

/// Header size: magic (4) || version (1) || key id (4).
const HEADER_SIZE: usize = FORMAT_MAGIC.len() + 1 + key_params::KEY_ID_LENGTH;

/// AES-256-GCM cipher bound to one key.
pub struct Cipher {
    cipher: Aes256Gcm,
    key_id: [u8; key_params::KEY_ID_LENGTH],
}

impl Cipher {
    /// Create a new cipher from a key.
    pub fn new(key: &AesKey) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self {
            cipher,
            key_id: key.key_id(),
        }
    }

    fn header(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[..4].copy_from_slice(&FORMAT_MAGIC);
        header[4] = FORMAT_VERSION;
        header[5..].copy_from_slice(&self.key_id);
        header
    }

    /// Encrypt data with a random nonce.
    ///
    /// Returns: header (9 bytes) || nonce (12 bytes) || ciphertext || tag (16 bytes).
    /// The header is authenticated along with the ciphertext.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let header = self.header();

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(
                nonce,
                Payload {
                    msg: plaintext,
                    aad: &header,
                },
            )
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let mut result = Vec::with_capacity(HEADER_SIZE + NONCE_SIZE + ciphertext.len());
        result.extend_from_slice(&header);
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&ciphertext);

        Ok(result)
    }

    /// Decrypt data that was encrypted with `encrypt`.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() < HEADER_SIZE + NONCE_SIZE + TAG_SIZE {
            return Err(Error::InvalidFormat(format!(
                "{} bytes is shorter than the minimum of {}",
                data.len(),
                HEADER_SIZE + NONCE_SIZE + TAG_SIZE
            )));
        }

        let (header, rest) = data.split_at(HEADER_SIZE);
        if header[..4] != FORMAT_MAGIC {
            return Err(Error::InvalidMagic);
        }
        if header[4] != FORMAT_VERSION {
            return Err(Error::VersionMismatch {
                expected: FORMAT_VERSION,
                found: header[4],
            });
        }
        if header[5..] != self.key_id {
            return Err(Error::KeyMismatch);
        }

        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.cipher
            .decrypt(
                nonce,
                Payload {
                    msg: ciphertext,
                    aad: header,
                },
            )
            .map_err(|_| Error::Decryption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let plaintext = b"db_password=hunter2\napi_token=abc123\n";
        let cipher = Cipher::new(&AesKey::generate());

        let encrypted = cipher.encrypt(plaintext).unwrap();
        let decrypted = cipher.decrypt(&encrypted).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let encrypted = Cipher::new(&AesKey::generate())
            .encrypt(b"Secret data")
            .unwrap();

        let result = Cipher::new(&AesKey::generate()).decrypt(&encrypted);
        assert!(matches!(result, Err(Error::KeyMismatch)));
    }

    #[test]
    fn test_different_encryptions_different_ciphertext() {
        let cipher = Cipher::new(&AesKey::generate());

        let encrypted1 = cipher.encrypt(b"Same message").unwrap();
        let encrypted2 = cipher.encrypt(b"Same message").unwrap();

        // Different nonces should produce different ciphertext
        assert_ne!(encrypted1, encrypted2);
    }

    #[test]
    fn test_empty_plaintext() {
        let cipher = Cipher::new(&AesKey::generate());

        let encrypted = cipher.encrypt(b"").unwrap();
        let decrypted = cipher.decrypt(&encrypted).unwrap();

        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = Cipher::new(&AesKey::generate());

        let mut encrypted = cipher.encrypt(b"Secret data").unwrap();
        if let Some(byte) = encrypted.last_mut() {
            *byte ^= 0xFF;
        }

        let result = cipher.decrypt(&encrypted);
        assert!(matches!(result, Err(Error::Decryption)));
    }

    #[test]
    fn test_truncated_ciphertext_rejected() {
        let cipher = Cipher::new(&AesKey::generate());
        let result = cipher.decrypt(&[0u8; 10]);
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let cipher = Cipher::new(&AesKey::generate());
        let mut encrypted = cipher.encrypt(b"data").unwrap();
        encrypted[0] = b'X';

        assert!(matches!(cipher.decrypt(&encrypted), Err(Error::InvalidMagic)));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let cipher = Cipher::new(&AesKey::generate());
        let mut encrypted = cipher.encrypt(b"data").unwrap();
        encrypted[4] = 9;

        assert!(matches!(
            cipher.decrypt(&encrypted),
            Err(Error::VersionMismatch {
                expected: 1,
                found: 9
            })
        ));
    }
}
