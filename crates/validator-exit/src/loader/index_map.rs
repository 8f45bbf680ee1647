//! Public key → validator index lookup (offline-preparation JSON).
//!
//! ```json
//! { "validators": [ { "pubkey": "0x8f3a...", "index": 12345 } ] }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use super::{read_file, LoadError};

/// Read-only mapping from lower-cased public key to validator index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMap {
    indices: HashMap<String, u64>,
}

impl IndexMap {
    /// Load the lookup file. A missing file or invalid JSON is fatal.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        info!("[loader] Loading validator indices from {}", path.display());
        let content = read_file("JSON", path)?;
        let map = Self::parse(&content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        info!("[loader] Loaded {} validator indices.", map.len());
        Ok(map)
    }

    /// Parse the lookup document.
    ///
    /// Entries without a non-empty `pubkey` or a usable `index` are skipped.
    /// `index` may be a JSON number or a decimal string.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let document: Value = serde_json::from_str(content)?;
        let entries = document
            .get("validators")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut indices = HashMap::with_capacity(entries.len());
        for entry in entries {
            let pubkey = entry.get("pubkey").and_then(Value::as_str);
            let index = entry.get("index").and_then(parse_index);
            match (pubkey, index) {
                (Some(pubkey), Some(index)) if !pubkey.is_empty() => {
                    indices.insert(pubkey.to_lowercase(), index);
                }
                _ => debug!("[loader] Skipping index entry {}", entry),
            }
        }
        Ok(Self { indices })
    }

    /// Index for `pubkey`, compared case-insensitively. Index 0 is valid.
    pub fn resolve(&self, pubkey: &str) -> Option<u64> {
        self.indices.get(&pubkey.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl<K: AsRef<str>> FromIterator<(K, u64)> for IndexMap {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self {
            indices: iter
                .into_iter()
                .map(|(pubkey, index)| (pubkey.as_ref().to_lowercase(), index))
                .collect(),
        }
    }
}

fn parse_index(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
