//! Validator references and secret material.

use std::fmt;

use zeroize::Zeroizing;

/// Marker printed in place of any secret value.
pub const REDACTED: &str = "******";

/// How exits are authorised for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Mnemonic from the credentials file plus a pubkey or index reference.
    Mnemonic,
    /// Raw private key per validator.
    PrivateKey,
}

impl RunMode {
    pub fn is_private_key(&self) -> bool {
        matches!(self, RunMode::PrivateKey)
    }
}

/// A secret string, wiped on drop and never printed.
#[derive(Clone)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// The real value. Only for handing to the external command.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Secret {}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({REDACTED})")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Identifies one validator towards `ethdo` and the beacon API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorReference {
    /// BLS public key as it appeared in the key source.
    PublicKey(String),
    /// Validator index resolved from the lookup file.
    Index(u64),
    /// Raw private key (private-key mode).
    PrivateKey(Secret),
}

impl ValidatorReference {
    /// Value handed to the external command.
    pub fn argument(&self) -> String {
        match self {
            ValidatorReference::PublicKey(pubkey) => pubkey.clone(),
            ValidatorReference::Index(index) => index.to_string(),
            ValidatorReference::PrivateKey(secret) => secret.expose().to_string(),
        }
    }

    /// Identifier usable with the beacon API. Private keys have none.
    pub fn status_id(&self) -> Option<String> {
        match self {
            ValidatorReference::PublicKey(pubkey) => Some(pubkey.clone()),
            ValidatorReference::Index(index) => Some(index.to_string()),
            ValidatorReference::PrivateKey(_) => None,
        }
    }

    /// Sensitive value that must be redacted from diagnostics, if any.
    pub fn secret(&self) -> Option<&Secret> {
        match self {
            ValidatorReference::PrivateKey(secret) => Some(secret),
            _ => None,
        }
    }
}

impl fmt::Display for ValidatorReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorReference::PublicKey(pubkey) => f.write_str(pubkey),
            ValidatorReference::Index(index) => write!(f, "{index}"),
            ValidatorReference::PrivateKey(_) => f.write_str(REDACTED),
        }
    }
}
