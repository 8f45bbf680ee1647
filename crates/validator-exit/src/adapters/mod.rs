//! # Adapters Layer (Hexagonal Architecture)
//!
//! Production implementations of the outbound ports:
//!
//! - [`TokioCommandRunner`]: spawns processes with `tokio::process`
//! - [`HttpBeaconClient`]: beacon REST API over `reqwest`
//! - [`BlsKeyDeriver`] / [`UnavailableKeyDeriver`]: BLS12-381 key derivation,
//!   depending on the `bls` feature

mod beacon;
mod bls;
mod process;

pub use beacon::HttpBeaconClient;
#[cfg(feature = "bls")]
pub use bls::{derive_public_key, BlsKeyDeriver, DeriveError};
pub use bls::{DefaultKeyDeriver, UnavailableKeyDeriver};
pub use process::TokioCommandRunner;
