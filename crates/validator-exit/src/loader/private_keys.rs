//! Private-key dump key source.
//!
//! The dump is free text; only `privateKey: <value>` lines matter. Everything
//! else (pubkeys, comments, bare hex) is ignored.

const PREFIX: &str = "privateKey:";

/// Extract private keys from a dump, in file order.
pub fn parse_private_keys(content: &str) -> Vec<String> {
    content.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<String> {
    let value = line.trim().strip_prefix(PREFIX)?;
    let value = value.trim().trim_matches('"').trim_matches('\'');
    (!value.is_empty()).then(|| value.to_string())
}
