//! Cross-module flows through `validator_exit::service::run`.

pub mod batch_flow;
