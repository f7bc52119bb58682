//! AES-256 key generation and keyfile serialization.

use crate::config::key_params;
use crate::error::{Error, Result};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use zeroize::Zeroizing;

/// On-disk representation of a key.
#[derive(Serialize, Deserialize)]
struct KeyFile {
    #[serde(rename = "type")]
    algorithm: String,
    size: u32,
    key: String,
}

/// A symmetric AES-256 key.
///
/// Key bytes are wiped when the key is dropped.
#[derive(Clone)]
pub struct AesKey {
    bytes: Zeroizing<[u8; key_params::KEY_LENGTH]>,
}

impl AesKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; key_params::KEY_LENGTH]);
        rand::thread_rng().fill_bytes(&mut bytes[..]);
        Self { bytes }
    }

    /// Build a key from raw bytes.
    pub fn from_bytes(bytes: [u8; key_params::KEY_LENGTH]) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    /// Parse a key from its text form.
    ///
    /// Fails with [`Error::InvalidKey`] when the text is not a keyfile, names
    /// another algorithm, or carries a key of the wrong length.
    pub fn from_text(text: &str) -> Result<Self> {
        let file: KeyFile =
            serde_json::from_str(text).map_err(|e| Error::InvalidKey(e.to_string()))?;

        if file.algorithm != key_params::ALGORITHM {
            return Err(Error::InvalidKey(format!(
                "unsupported key type '{}', expected '{}'",
                file.algorithm,
                key_params::ALGORITHM
            )));
        }
        if file.size != key_params::KEY_BITS {
            return Err(Error::InvalidKey(format!(
                "unsupported key size {}, expected {}",
                file.size,
                key_params::KEY_BITS
            )));
        }

        let raw = Zeroizing::new(
            hex::decode(file.key.trim()).map_err(|e| Error::InvalidKey(e.to_string()))?,
        );
        if raw.len() != key_params::KEY_LENGTH {
            return Err(Error::InvalidKey(format!(
                "expected {} key bytes, got {}",
                key_params::KEY_LENGTH,
                raw.len()
            )));
        }

        let mut bytes = Zeroizing::new([0u8; key_params::KEY_LENGTH]);
        bytes.copy_from_slice(&raw);
        Ok(Self { bytes })
    }

    /// Serialize the key to its text form.
    pub fn to_text(&self) -> Result<String> {
        let file = KeyFile {
            algorithm: key_params::ALGORITHM.to_string(),
            size: key_params::KEY_BITS,
            key: hex::encode(&self.bytes[..]),
        };
        let mut text = serde_json::to_string_pretty(&file)?;
        text.push('\n');
        Ok(text)
    }

    /// Read a key from a keyfile.
    ///
    /// Contents that are not UTF-8 are reported as [`Error::InvalidKey`].
    pub fn read(path: &Path) -> Result<Self> {
        let raw = Zeroizing::new(fs::read(path)?);
        let text = std::str::from_utf8(&raw).map_err(|e| Error::InvalidKey(e.to_string()))?;
        Self::from_text(text)
    }

    /// Write the key to a keyfile, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let text = Zeroizing::new(self.to_text()?);

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; key_params::KEY_LENGTH] {
        &self.bytes
    }

    /// Short fingerprint identifying this key in ciphertext headers.
    pub fn key_id(&self) -> [u8; key_params::KEY_ID_LENGTH] {
        let digest = Sha256::digest(&self.bytes[..]);
        let mut id = [0u8; key_params::KEY_ID_LENGTH];
        id.copy_from_slice(&digest[..key_params::KEY_ID_LENGTH]);
        id
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesKey")
            .field("id", &hex::encode(self.key_id()))
            .finish_non_exhaustive()
    }
}

impl PartialEq for AesKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes[..] == other.bytes[..]
    }
}

impl Eq for AesKey {}
