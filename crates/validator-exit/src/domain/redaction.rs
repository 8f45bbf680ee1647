//! Masking of secret values in diagnostic text.

use super::reference::{Secret, REDACTED};

/// Replaces every registered secret with [`REDACTED`].
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    secrets: Vec<Secret>,
}

impl Redactor {
    pub fn new<'a>(secrets: impl IntoIterator<Item = &'a Secret>) -> Self {
        let mut redactor = Self::default();
        for secret in secrets {
            redactor.add(secret);
        }
        redactor
    }

    /// Register another secret. Empty values are ignored.
    pub fn add(&mut self, secret: &Secret) {
        if !secret.is_empty() && !self.secrets.contains(secret) {
            self.secrets.push(secret.clone());
            // Longest first so a secret containing another is masked whole.
            self.secrets
                .sort_by_key(|secret| std::cmp::Reverse(secret.expose().len()));
        }
    }

    pub fn with(mut self, secret: &Secret) -> Self {
        self.add(secret);
        self
    }

    pub fn redact(&self, text: &str) -> String {
        self.secrets
            .iter()
            .fold(text.to_string(), |text, secret| {
                text.replace(secret.expose(), REDACTED)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_every_occurrence() {
        let redactor = Redactor::default().with(&Secret::new("s3cret"));
        assert_eq!(
            redactor.redact("a s3cret and s3cret again"),
            "a ****** and ****** again"
        );
    }

    #[test]
    fn test_longest_secret_first() {
        let redactor = Redactor::new([&Secret::new("abc"), &Secret::new("abcdef")]);
        assert_eq!(redactor.redact("xabcdefx"), "x******x");
    }

    #[test]
    fn test_empty_secret_ignored() {
        let redactor = Redactor::default().with(&Secret::new(""));
        assert_eq!(redactor.redact("unchanged"), "unchanged");
    }
}
