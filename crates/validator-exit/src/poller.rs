//! Bounded status polling after an exit submission.

use tracing::{info, warn};

use crate::config::PollConfig;
use crate::domain::ValidatorStatus;
use crate::ports::BeaconStatusApi;
use crate::shutdown::Shutdown;

/// How a polling round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    /// A terminal status was observed.
    Terminal(ValidatorStatus),
    /// Attempts ran out; carries the last status seen, if any.
    Exhausted(Option<ValidatorStatus>),
    /// Interrupted between attempts.
    Interrupted,
}

pub struct StatusPoller<B> {
    api: B,
    config: PollConfig,
}

impl<B: BeaconStatusApi> StatusPoller<B> {
    pub fn new(api: B, config: PollConfig) -> Self {
        Self { api, config }
    }

    /// One status query. Errors are logged and reported as `None`.
    pub async fn poll(&self, validator_id: &str) -> Option<ValidatorStatus> {
        match self.api.validator_status(validator_id).await {
            Ok(status) => {
                info!("[poll] Current status of {}: {}", validator_id, status);
                Some(status)
            }
            Err(e) => {
                warn!("[poll] Status query for {} failed: {}", validator_id, e);
                None
            }
        }
    }

    /// Poll until a terminal status, the attempt cap, or an interrupt.
    pub async fn wait_for_terminal(&self, validator_id: &str, shutdown: &Shutdown) -> PollResult {
        let mut last = None;
        for attempt in 1..=self.config.max_attempts {
            if shutdown.is_triggered() {
                return PollResult::Interrupted;
            }
            if let Some(status) = self.poll(validator_id).await {
                if status.is_terminal() {
                    return PollResult::Terminal(status);
                }
                last = Some(status);
            }
            if attempt < self.config.max_attempts && shutdown.sleep(self.config.retry_delay).await
            {
                return PollResult::Interrupted;
            }
        }
        PollResult::Exhausted(last)
    }
}
