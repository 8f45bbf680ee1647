//! Operators YAML key source.
//!
//! ```yaml
//! operators:
//!   - name: alpha
//!     keys:
//!       - "0x8f3a..."
//!       - "0x91bc..."
//! ```

use serde_yaml::Value;
use tracing::warn;

/// Collect keys from an operators document, optionally for one operator only.
///
/// Keys keep file order and duplicates. A document without an `operators`
/// list, an operator without a usable `keys` list, and an unknown operator
/// name all yield fewer keys rather than an error. Only YAML syntax errors
/// fail.
pub fn parse_operator_keys(
    content: &str,
    operator: Option<&str>,
) -> Result<Vec<String>, serde_yaml::Error> {
    let document: Value = serde_yaml::from_str(content)?;

    let Some(operators) = document.get("operators").and_then(Value::as_sequence) else {
        warn!("[loader] Invalid YAML format: 'operators' key missing.");
        return Ok(Vec::new());
    };

    let mut keys = Vec::new();
    let mut found_operator = false;

    for entry in operators {
        let name = entry.get("name").and_then(Value::as_str);
        if let Some(wanted) = operator {
            if name != Some(wanted) {
                continue;
            }
            found_operator = true;
        }

        let Some(op_keys) = entry.get("keys").and_then(Value::as_sequence) else {
            continue;
        };

        for key in op_keys {
            match key.as_str() {
                Some(key) => keys.push(key.to_string()),
                None => warn!(
                    "[loader] Skipping non-string key {:?} of operator {}",
                    key,
                    name.unwrap_or("<unnamed>")
                ),
            }
        }
    }

    if let Some(wanted) = operator {
        if !found_operator {
            warn!("[loader] Operator '{}' not found in YAML file.", wanted);
        }
    }

    Ok(keys)
}
