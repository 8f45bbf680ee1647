//! # Validator Exit Test Suite
//!
//! End-to-end runs of the batch driver with the real adapters: a scripted
//! stand-in for `ethdo` on disk and a mocked beacon node.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     └── batch_flow.rs   # pre-flight checks, both run modes, halt policy
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p exit-tests
//! ```

pub mod integration;
