//! Error types for sesame.

use thiserror::Error;

/// Result type alias for sesame operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encrypting or decrypting a config.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid arguments or a required file is missing.
    #[error("{0}")]
    Config(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Keyfile contents could not be read as an AES key.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Ciphertext was produced with a different key.
    #[error("Key mismatch: ciphertext was encrypted with a different key")]
    KeyMismatch,

    /// Encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Decryption error (wrong key or corrupted data).
    #[error("Decryption failed: wrong key or corrupted data")]
    Decryption,

    /// Ciphertext is structurally invalid.
    #[error("Invalid ciphertext: {0}")]
    InvalidFormat(String),

    /// Invalid ciphertext magic number.
    #[error("Invalid ciphertext format: expected magic 'SSME'")]
    InvalidMagic,

    /// Version mismatch.
    #[error("Ciphertext version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u8, found: u8 },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Returns true for the argument/missing-file errors raised before any I/O.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
