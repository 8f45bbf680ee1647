//! # Input Loaders
//!
//! Everything read from disk at startup:
//!
//! | File | Loader | Mode |
//! |------|--------|------|
//! | operators YAML | [`operators`] | mnemonic |
//! | private-key dump | [`private_keys`] | private key |
//! | offline-preparation JSON | [`index_map`] | mnemonic (optional) |
//! | `.env` credentials | [`credentials`] | mnemonic |
//!
//! Files are read once and never touched again. Any read or parse failure is
//! a [`LoadError`] and aborts the run before a key is processed. Content that
//! parses but has an unexpected shape degrades to fewer keys instead.

pub mod credentials;
pub mod index_map;
pub mod operators;
pub mod private_keys;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::config::KeySourceConfig;

pub use credentials::{Credentials, MNEMONIC_VAR};
pub use index_map::IndexMap;

/// Errors raised while loading input files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File does not exist
    #[error("File {} not found.", path.display())]
    NotFound { path: PathBuf },

    /// File exists but could not be read
    #[error("Error reading {kind} file {}: {source}", path.display())]
    Io {
        kind: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    /// Operators file is not valid YAML
    #[error("Error reading YAML file {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Index file is not valid JSON
    #[error("Error reading JSON file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Credentials file could not be parsed
    #[error("Error reading env file {}: {source}", path.display())]
    Credentials {
        path: PathBuf,
        source: dotenvy::Error,
    },

    /// Credentials file lacks the secret variable
    #[error("Env file {} does not define {var}", path.display())]
    MissingSecret { path: PathBuf, var: &'static str },
}

/// Load the raw key strings for the configured source, in file order.
pub fn load_keys(source: &KeySourceConfig) -> Result<Vec<String>, LoadError> {
    match source {
        KeySourceConfig::Operators { path, operator } => {
            info!("[loader] Loading keys from {}", path.display());
            let content = read_file("YAML", path)?;
            if let Some(name) = operator {
                info!("[loader] Filtering for operator: {}", name);
            }
            operators::parse_operator_keys(&content, operator.as_deref()).map_err(|source| {
                LoadError::Yaml {
                    path: path.clone(),
                    source,
                }
            })
        }
        KeySourceConfig::PrivateKeys { path } => {
            info!("[loader] Loading private keys from {}", path.display());
            let content = read_file("Private Key", path)?;
            Ok(private_keys::parse_private_keys(&content))
        }
    }
}

/// Read a whole text file, distinguishing a missing file from a bad one.
pub(crate) fn read_file(kind: &'static str, path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        kind,
        path: path.to_path_buf(),
        source,
    })
}
