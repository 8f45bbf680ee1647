//! # validator-exit
//!
//! Batch voluntary exits for beacon chain validators.
//!
//! ## Overview
//!
//! Keys come from one of two sources:
//! - **Operators file** (YAML): keys grouped by operator, optionally filtered
//!   to a single operator. Exits are signed with the mnemonic from a
//!   credentials file.
//! - **Private-key dump** (text): every `privateKey: <value>` line is one key.
//!   Exits are signed with the private key itself.
//!
//! Each key is driven through `ethdo validator exit`, then (unless disabled)
//! the beacon node is polled until the validator reaches a terminal status.
//!
//! ## Architecture
//!
//! ```text
//!  loader ──keys──→ BatchDriver ──Invocation──→ CommandRunner (ethdo)
//!  IndexMap ──────→     │
//!                       └──reference──→ BeaconStatusApi (GET .../validators/{id})
//! ```
//!
//! ## Per-key state machine
//!
//! ```text
//! Selected ──(resume gate)──→ Skipped
//!    │
//!    └──→ Submitted ──→ Classified ──→ Polled | PollSkipped ──→ Next
//!                           │
//!                           └──Failure──→ Halt (exit 1)
//! ```
//!
//! The driver is strictly sequential. A Ctrl+C stops it at the next
//! checkpoint and reports the command-line fragment needed to resume.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod poller;
pub mod ports;
pub mod service;
pub mod shutdown;
pub mod submitter;

pub use config::{ExitConfig, KeySourceConfig, PollConfig, RunConfig};
pub use domain::{
    ExitOutcome, ResumeHint, RunMode, RunState, Secret, ValidatorReference, ValidatorStatus,
};
pub use error::{ExitError, ExitResult};
pub use service::{BatchDriver, BatchReport, BatchSummary};
pub use shutdown::Shutdown;
