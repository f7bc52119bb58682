//! Configuration constants and types for sesame.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Default keyfile, relative to the working directory.
pub const DEFAULT_KEYFILE: &str = "key.pem";

/// Suffix appended to a config path to name its ciphertext.
pub const ENCRYPTED_SUFFIX: &str = ".encrypted";

/// Ciphertext magic number: "SSME" in bytes.
pub const FORMAT_MAGIC: [u8; 4] = [0x53, 0x53, 0x4D, 0x45];

/// Current ciphertext format version.
pub const FORMAT_VERSION: u8 = 1;

/// AES key parameters.
pub mod key_params {
    /// Algorithm name stored in keyfiles.
    pub const ALGORITHM: &str = "AES-256-GCM";

    /// Key size in bits.
    pub const KEY_BITS: u32 = 256;

    /// Key length in bytes.
    pub const KEY_LENGTH: usize = 32;

    /// Length of the key id carried in ciphertext headers.
    pub const KEY_ID_LENGTH: usize = 4;
}

/// Configuration for a [`ConfigCodec`](crate::codec::ConfigCodec).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Keyfile probed when no usable keyfile is supplied, and where new keys
    /// are written.
    pub default_keyfile: PathBuf,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            default_keyfile: PathBuf::from(DEFAULT_KEYFILE),
        }
    }
}

impl CodecConfig {
    /// Create a configuration with a custom default keyfile.
    pub fn new(default_keyfile: impl Into<PathBuf>) -> Self {
        Self {
            default_keyfile: default_keyfile.into(),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_keyfile.as_os_str().is_empty() {
            return Err("Default keyfile path must not be empty".to_string());
        }
        if self.default_keyfile.is_dir() {
            return Err(format!(
                "Default keyfile path {} is a directory",
                self.default_keyfile.display()
            ));
        }
        Ok(())
    }
}

/// Path of the ciphertext that belongs to `config`.
pub fn encrypted_path(config: &Path) -> PathBuf {
    let mut name = config.as_os_str().to_owned();
    name.push(ENCRYPTED_SUFFIX);
    PathBuf::from(name)
}

/// Strip a trailing `.encrypted` suffix, recovering the logical config path.
pub fn logical_path(path: &Path) -> PathBuf {
    let raw = path.as_os_str().as_encoded_bytes();
    match raw.strip_suffix(ENCRYPTED_SUFFIX.as_bytes()) {
        Some(stem) if !stem.is_empty() => {
            // SAFETY: `stem` ends right before an ASCII suffix of an encoded
            // OsStr, which is a valid split point.
            let stem = unsafe { OsStr::from_encoded_bytes_unchecked(stem) };
            PathBuf::from(stem)
        }
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keyfile() {
        assert_eq!(CodecConfig::default().default_keyfile, Path::new("key.pem"));
        assert!(CodecConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_keyfile_invalid() {
        assert!(CodecConfig::new("").validate().is_err());
    }

    #[test]
    fn test_encrypted_path_appends_suffix() {
        assert_eq!(
            encrypted_path(Path::new("conf/app.conf")),
            Path::new("conf/app.conf.encrypted")
        );
    }

    #[test]
    fn test_logical_path_strips_suffix() {
        assert_eq!(
            logical_path(Path::new("app.conf.encrypted")),
            Path::new("app.conf")
        );
        assert_eq!(logical_path(Path::new("app.conf")), Path::new("app.conf"));
        assert_eq!(
            logical_path(Path::new(".encrypted")),
            Path::new(".encrypted")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_logical_path_keeps_non_utf8_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let encrypted = Path::new(OsStr::from_bytes(b"caf\xff.conf.encrypted"));
        let logical = logical_path(encrypted);

        assert_eq!(logical.as_os_str().as_bytes(), b"caf\xff.conf");
        assert_eq!(encrypted_path(&logical), encrypted);
    }
}
