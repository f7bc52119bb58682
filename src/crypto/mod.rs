//! Cryptographic operations for sesame.
//!
//! This module provides:
//! - AES-256 key generation and keyfile (de)serialization
//! - AES-256-GCM authenticated encryption with a versioned header

mod cipher;
mod key;

pub use cipher::Cipher;
pub use key::AesKey;
