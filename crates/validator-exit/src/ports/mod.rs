//! Ports for the exit batch.
//!
//! The driver only talks to the outside world through these traits, so the
//! whole state machine can run against fakes in tests.

pub mod outbound;

pub use outbound::{
    BeaconStatusApi, CommandError, CommandOutput, CommandRunner, Derivation, Invocation,
    KeyDeriver, StatusQueryError,
};
