//! Shell-style credentials file (`.env`).
//!
//! ```text
//! # exit signing mnemonic
//! export MNEMONIC="abandon abandon ... about"
//! ```
//!
//! Every variable in the file becomes part of the exit command's environment.
//! Only `MNEMONIC` and values of at least [`MIN_SECRET_LEN`] characters are
//! masked in diagnostics.

use std::io::Read;
use std::path::Path;

use tracing::info;

use super::LoadError;
use crate::domain::Secret;

/// Variable holding the signing mnemonic.
pub const MNEMONIC_VAR: &str = "MNEMONIC";

/// Shortest value of another variable that is masked in diagnostics.
pub const MIN_SECRET_LEN: usize = 8;

/// Variables loaded from the credentials file.
#[derive(Debug, Clone)]
pub struct Credentials {
    env: Vec<(String, Secret)>,
}

impl Credentials {
    /// Load and validate the credentials file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            kind: "env",
            path: path.to_path_buf(),
            source,
        })?;
        let credentials = Self::from_reader(path, file)?;
        info!(
            "[loader] Loaded {} variable(s) from {}",
            credentials.env.len(),
            path.display()
        );
        Ok(credentials)
    }

    /// Parse credentials from `reader`; `path` is only used in errors.
    pub fn from_reader<R: Read>(path: &Path, reader: R) -> Result<Self, LoadError> {
        let mut env: Vec<(String, Secret)> = Vec::new();
        for item in dotenvy::from_read_iter(reader) {
            let (key, value) = item.map_err(|source| LoadError::Credentials {
                path: path.to_path_buf(),
                source,
            })?;
            // Later assignments win, as when the file is sourced.
            match env.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, slot)) => *slot = Secret::new(value),
                None => env.push((key, Secret::new(value))),
            }
        }

        let has_mnemonic = env
            .iter()
            .any(|(key, value)| key == MNEMONIC_VAR && !value.is_empty());
        if !has_mnemonic {
            return Err(LoadError::MissingSecret {
                path: path.to_path_buf(),
                var: MNEMONIC_VAR,
            });
        }

        Ok(Self { env })
    }

    /// All variables, for the child process environment.
    pub fn env(&self) -> &[(String, Secret)] {
        &self.env
    }

    /// Values to mask in diagnostics: the mnemonic, plus any other value
    /// long enough to be key material or a passphrase.
    pub fn secrets(&self) -> impl Iterator<Item = &Secret> {
        self.env
            .iter()
            .filter(|(key, value)| {
                key == MNEMONIC_VAR || value.expose().len() >= MIN_SECRET_LEN
            })
            .map(|(_, value)| value)
    }
}
