//! Encrypting and decrypting config files.

use crate::config::{encrypted_path, logical_path, CodecConfig};
use crate::crypto::{AesKey, Cipher};
use crate::error::{Error, Result};
use crate::prompt::{Confirm, TerminalConfirm};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

const PROMPT_REUSE_KEY: &str = "Encryption key appears to exist in";
const PROMPT_CREATE_KEY: &str = "Encryption key not provided. Create?";
const PROMPT_OVERWRITE: &str = "Application config already exists. Overwrite?";

/// Result of a codec operation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran; holds the logical config path.
    Completed(PathBuf),
    /// The user declined a prompt and no file was written.
    Aborted,
}

impl Outcome {
    /// The config path, if the operation completed.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Outcome::Completed(path) => Some(path),
            Outcome::Aborted => None,
        }
    }

    /// True if a prompt was declined.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted)
    }
}

/// Encrypts a config file to `<config>.encrypted` and back.
pub struct ConfigCodec<C> {
    config: CodecConfig,
    confirm: C,
}

impl<C: Confirm> ConfigCodec<C> {
    /// Create a codec that asks `confirm` before using, creating, or
    /// overwriting anything.
    pub fn new(config: CodecConfig, confirm: C) -> Self {
        Self { config, confirm }
    }

    /// The codec's configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The confirmation source.
    pub fn confirmer(&self) -> &C {
        &self.confirm
    }

    /// Encrypt `config_path` into `<config_path>.encrypted`.
    ///
    /// A `keyfile` that exists is used as-is. Otherwise the default keyfile is
    /// offered for reuse, and failing that a new key is generated and written
    /// to the default keyfile. Returns [`Outcome::Aborted`] if key generation
    /// is declined.
    pub fn encrypt(
        &mut self,
        config_path: impl AsRef<Path>,
        keyfile: Option<&Path>,
    ) -> Result<Outcome> {
        let config_path = config_path.as_ref();
        if is_unset(config_path) {
            return Err(Error::Config(
                "You must supply the path to your config file.".to_string(),
            ));
        }
        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Application config doesn't exist at {}",
                config_path.display()
            )));
        }

        let key = match self.resolve_key(keyfile)? {
            Some(key) => key,
            None => {
                info!("Key generation declined, nothing encrypted");
                return Ok(Outcome::Aborted);
            }
        };

        let plaintext = Zeroizing::new(fs::read(config_path)?);
        let ciphertext = Cipher::new(&key).encrypt(&plaintext)?;

        let destination = encrypted_path(config_path);
        fs::write(&destination, &ciphertext)?;
        info!(
            config = %config_path.display(),
            encrypted = %destination.display(),
            bytes = plaintext.len(),
            "Encrypted config"
        );

        Ok(Outcome::Completed(config_path.to_path_buf()))
    }

    /// Decrypt `<config_path>.encrypted` into `config_path`.
    ///
    /// `config_path` may name either the plaintext or the `.encrypted` file.
    /// Returns [`Outcome::Aborted`] if the plaintext already exists and
    /// overwriting it is declined.
    pub fn decrypt(
        &mut self,
        config_path: impl AsRef<Path>,
        keyfile: Option<&Path>,
    ) -> Result<Outcome> {
        let config_path = config_path.as_ref();
        if is_unset(config_path) {
            return Err(Error::Config(
                "You must supply the path to your encrypted config file.".to_string(),
            ));
        }

        let config_path = logical_path(config_path);
        let source = encrypted_path(&config_path);
        if !source.exists() {
            return Err(Error::Config(format!(
                "Encrypted config doesn't exist at {}",
                source.display()
            )));
        }

        let keyfile = match keyfile {
            Some(path) if !is_unset(path) => path,
            _ => {
                return Err(Error::Config(
                    "Encryption keys are required for decryption!".to_string(),
                ))
            }
        };
        if !keyfile.exists() {
            return Err(Error::Config(format!(
                "Encryption key doesn't exist at {}",
                keyfile.display()
            )));
        }

        if config_path.exists() && !self.confirm.confirm(PROMPT_OVERWRITE, false)? {
            info!(config = %config_path.display(), "Overwrite declined, nothing decrypted");
            return Ok(Outcome::Aborted);
        }

        let key = AesKey::read(keyfile)?;
        debug!(keyfile = %keyfile.display(), key = ?key, "Loaded key");

        let ciphertext = fs::read(&source)?;
        let plaintext = Zeroizing::new(Cipher::new(&key).decrypt(&ciphertext)?);

        fs::write(&config_path, plaintext.as_slice())?;
        info!(
            config = %config_path.display(),
            bytes = plaintext.len(),
            "Decrypted config"
        );

        Ok(Outcome::Completed(config_path))
    }

    /// Pick the key for an encryption, or `None` if the user declined to
    /// create one.
    fn resolve_key(&mut self, keyfile: Option<&Path>) -> Result<Option<AesKey>> {
        if let Some(path) = keyfile.filter(|p| !is_unset(p)) {
            if path.exists() {
                debug!(keyfile = %path.display(), "Using supplied keyfile");
                return AesKey::read(path).map(Some);
            }
            warn!(
                keyfile = %path.display(),
                "Supplied keyfile does not exist, falling back to default keyfile"
            );
        }

        let default_keyfile = self.config.default_keyfile.clone();
        if default_keyfile.exists() {
            match AesKey::read(&default_keyfile) {
                Ok(key) => {
                    let question = format!(
                        "{} {}. Use this?",
                        PROMPT_REUSE_KEY,
                        default_keyfile.display()
                    );
                    if self.confirm.confirm(&question, true)? {
                        debug!(keyfile = %default_keyfile.display(), key = ?key, "Reusing default keyfile");
                        return Ok(Some(key));
                    }
                    debug!("Default keyfile declined");
                }
                Err(e @ Error::InvalidKey(_)) => {
                    warn!(
                        keyfile = %default_keyfile.display(),
                        error = %e,
                        "Ignoring unreadable default keyfile"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        if !self.confirm.confirm(PROMPT_CREATE_KEY, true)? {
            return Ok(None);
        }

        let key = AesKey::generate();
        key.write(&default_keyfile)?;
        info!(keyfile = %default_keyfile.display(), key = ?key, "Generated new encryption key");

        Ok(Some(key))
    }
}

impl ConfigCodec<TerminalConfirm<std::io::StdinLock<'static>, std::io::Stderr>> {
    /// Codec with the default configuration that prompts on the terminal.
    pub fn interactive() -> Self {
        Self::new(CodecConfig::default(), TerminalConfirm::stdio())
    }
}

/// Encrypt a config file, prompting on the terminal.
///
/// ```rust,no_run
/// use sesame::{encrypt_config, Outcome};
///
/// match encrypt_config("app.conf", None) {
///     Ok(Outcome::Completed(path)) => println!("Application config encrypted at {}", path.display()),
///     Ok(Outcome::Aborted) => println!("Aborted"),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn encrypt_config(config_path: impl AsRef<Path>, keyfile: Option<&Path>) -> Result<Outcome> {
    ConfigCodec::interactive().encrypt(config_path, keyfile)
}

/// Decrypt a config file, prompting on the terminal.
pub fn decrypt_config(config_path: impl AsRef<Path>, keyfile: Option<&Path>) -> Result<Outcome> {
    ConfigCodec::interactive().decrypt(config_path, keyfile)
}

fn is_unset(path: &Path) -> bool {
    path.as_os_str().is_empty()
}
