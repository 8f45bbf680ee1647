//! BLS12-381 public key derivation (Ethereum `min_pk` variant).
//!
//! Used only to show which validator a private key belongs to. Builds
//! without the `bls` feature fall back to [`UnavailableKeyDeriver`].

use crate::domain::Secret;
use crate::ports::{Derivation, KeyDeriver};

/// Deriver used by the binary.
#[cfg(feature = "bls")]
pub type DefaultKeyDeriver = BlsKeyDeriver;

/// Deriver used by the binary.
#[cfg(not(feature = "bls"))]
pub type DefaultKeyDeriver = UnavailableKeyDeriver;

/// Deriver for builds without BLS support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableKeyDeriver;

impl KeyDeriver for UnavailableKeyDeriver {
    fn derive_pubkey(&self, _private_key: &Secret) -> Derivation {
        Derivation::Unavailable
    }
}

#[cfg(feature = "bls")]
pub use self::derive::{derive_public_key, BlsKeyDeriver, DeriveError};

#[cfg(feature = "bls")]
mod derive {
    use blst::min_pk::SecretKey;
    use thiserror::Error;
    use zeroize::Zeroizing;

    use crate::domain::Secret;
    use crate::ports::{Derivation, KeyDeriver};

    /// Key derivation errors. Never include key material.
    #[derive(Debug, Error, PartialEq)]
    pub enum DeriveError {
        /// Wrong number of hex digits
        #[error("Invalid private key length: {0} hex digits")]
        InvalidLength(usize),

        /// Not hexadecimal
        #[error("Invalid private key encoding: {0}")]
        InvalidHex(#[from] hex::FromHexError),

        /// Zero or not below the curve order
        #[error("Private key is not a valid BLS scalar")]
        InvalidScalar,
    }

    /// Derives compressed G1 public keys with `blst`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct BlsKeyDeriver;

    impl KeyDeriver for BlsKeyDeriver {
        fn derive_pubkey(&self, private_key: &Secret) -> Derivation {
            match derive_public_key(private_key.expose()) {
                Ok(pubkey) => Derivation::Derived(pubkey),
                Err(e) => Derivation::Failed(e.to_string()),
            }
        }
    }

    /// Derive the `0x`-prefixed 48-byte public key for a hex private key.
    ///
    /// The key may carry a `0x` prefix and may be shorter than 32 bytes; it
    /// is left-padded as a big-endian scalar.
    pub fn derive_public_key(private_key_hex: &str) -> Result<String, DeriveError> {
        let bytes = secret_key_bytes(private_key_hex)?;
        let secret = SecretKey::from_bytes(&bytes[..]).map_err(|_| DeriveError::InvalidScalar)?;
        Ok(format!("0x{}", hex::encode(secret.sk_to_pk().to_bytes())))
    }

    fn secret_key_bytes(private_key_hex: &str) -> Result<Zeroizing<[u8; 32]>, DeriveError> {
        let digits = private_key_hex.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        if digits.is_empty() || digits.len() > 64 {
            return Err(DeriveError::InvalidLength(digits.len()));
        }

        let padded = Zeroizing::new(format!("{digits:0>64}"));
        let mut bytes = Zeroizing::new([0u8; 32]);
        hex::decode_to_slice(padded.as_str(), &mut bytes[..])?;
        Ok(bytes)
    }
}
