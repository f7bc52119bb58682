//! Sesame
//!
//! Keeps application secrets in version control by encrypting a config file
//! with a symmetric key that lives in a separate keyfile.
//!
//! # Layout
//!
//! ```text
//! app.conf            plaintext config (not committed)
//! app.conf.encrypted  AES-256-GCM ciphertext (committed)
//! key.pem             keyfile (kept out of version control)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use sesame::{CodecConfig, ConfigCodec, Outcome};
//! use sesame::prompt::AssumeYes;
//! use std::path::Path;
//!
//! let mut codec = ConfigCodec::new(CodecConfig::default(), AssumeYes);
//!
//! // Creates key.pem on first use
//! codec.encrypt("app.conf", None).unwrap();
//!
//! // Restores app.conf from app.conf.encrypted
//! let outcome = codec
//!     .decrypt("app.conf.encrypted", Some(Path::new("key.pem")))
//!     .unwrap();
//! assert_eq!(outcome, Outcome::Completed("app.conf".into()));
//! ```

pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod prompt;

pub use codec::{decrypt_config, encrypt_config, ConfigCodec, Outcome};
pub use config::CodecConfig;
pub use error::{Error, Result};
