//! # Batch Driver
//!
//! Wires the loaders, the exit submitter and the status poller together and
//! drives the selected keys through them one at a time.
//!
//! ## Selection
//!
//! 1. `--start-index` slices the loaded keys (out of bounds is fatal)
//! 2. `--limit` caps the slice
//! 3. `--resume-from` skips keys until the exact match (mnemonic mode only)
//!
//! ## Halt policy
//!
//! Only [`ExitOutcome::Failure`] stops the batch. Keys already submitted are
//! not rolled back.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::adapters::{
    DefaultKeyDeriver, HttpBeaconClient, TokioCommandRunner, UnavailableKeyDeriver,
};
use crate::config::{ExitConfig, RunConfig};
use crate::domain::{ExitOutcome, ResumeHint, RunMode, RunState, Secret, ValidatorReference};
use crate::error::{ExitError, ExitResult};
use crate::loader::{self, Credentials, IndexMap};
use crate::poller::{PollResult, StatusPoller};
use crate::ports::{BeaconStatusApi, CommandRunner, Derivation, KeyDeriver};
use crate::shutdown::Shutdown;
use crate::submitter::ExitSubmitter;

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Keys left after start index and limit.
    pub selected: usize,
    /// Keys submitted, whatever the outcome.
    pub processed: usize,
    /// Keys passed over by the resume gate.
    pub skipped: usize,
    counts: HashMap<ExitOutcome, usize>,
}

impl BatchSummary {
    pub fn new(selected: usize) -> Self {
        Self {
            selected,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: ExitOutcome) {
        self.processed += 1;
        *self.counts.entry(outcome).or_default() += 1;
    }

    pub fn count(&self, outcome: ExitOutcome) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} selected key(s) processed, {} skipped",
            self.processed, self.selected, self.skipped
        )?;
        for outcome in ExitOutcome::ALL {
            let count = self.count(outcome);
            if count > 0 {
                write!(f, ", {outcome}: {count}")?;
            }
        }
        Ok(())
    }
}

/// How a batch run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchReport {
    /// Every selected key was handled.
    Completed(BatchSummary),
    /// Stopped by Ctrl+C.
    Interrupted {
        hint: ResumeHint,
        summary: BatchSummary,
    },
    /// Stopped by a failed exit command.
    Halted {
        index: usize,
        label: String,
        detail: String,
        summary: BatchSummary,
    },
}

impl BatchReport {
    pub fn summary(&self) -> &BatchSummary {
        match self {
            BatchReport::Completed(summary)
            | BatchReport::Interrupted { summary, .. }
            | BatchReport::Halted { summary, .. } => summary,
        }
    }

    /// Process exit code: only a halt is an error.
    pub fn exit_code(&self) -> u8 {
        match self {
            BatchReport::Halted { .. } => 1,
            BatchReport::Completed(_) | BatchReport::Interrupted { .. } => 0,
        }
    }
}

/// Apply start index and limit to the loaded keys.
pub fn plan<'a>(keys: &'a [String], state: &RunState) -> ExitResult<&'a [String]> {
    let total = keys.len();
    let start = state.start_index();
    if start > 0 && start >= total {
        return Err(ExitError::StartIndexOutOfBounds {
            start_index: start,
            total,
        });
    }

    let sliced = &keys[start.min(total)..];
    let end = state
        .limit()
        .map_or(sliced.len(), |limit| limit.min(sliced.len()));
    Ok(&sliced[..end])
}

/// Sequential exit driver.
pub struct BatchDriver<R, B> {
    submitter: ExitSubmitter<R>,
    poller: StatusPoller<B>,
    state: RunState,
    shutdown: Shutdown,
    index_map: IndexMap,
    deriver: Box<dyn KeyDeriver>,
    key_delay: Duration,
    wait_for_status: bool,
}

impl<R: CommandRunner, B: BeaconStatusApi> BatchDriver<R, B> {
    pub fn new(
        submitter: ExitSubmitter<R>,
        poller: StatusPoller<B>,
        state: RunState,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            submitter,
            poller,
            state,
            shutdown,
            index_map: IndexMap::default(),
            deriver: Box::new(UnavailableKeyDeriver),
            key_delay: Duration::ZERO,
            wait_for_status: true,
        }
    }

    /// Resolve public keys to indices before submission.
    pub fn with_index_map(mut self, index_map: IndexMap) -> Self {
        self.index_map = index_map;
        self
    }

    /// Derive display public keys for private keys.
    pub fn with_key_deriver(mut self, deriver: Box<dyn KeyDeriver>) -> Self {
        self.deriver = deriver;
        self
    }

    /// Pause after every processed key.
    pub fn with_key_delay(mut self, delay: Duration) -> Self {
        self.key_delay = delay;
        self
    }

    /// Do not poll the beacon node after submitting.
    pub fn without_status_checks(mut self) -> Self {
        self.wait_for_status = false;
        self
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Drive the selected part of `keys` to completion, a halt or an interrupt.
    pub async fn run(&mut self, keys: &[String]) -> ExitResult<BatchReport> {
        let selected = plan(keys, &self.state)?;
        let start = self.state.start_index();
        let total = selected.len();
        let mut summary = BatchSummary::new(total);
        let mut resume_gate = self.state.resume_from().map(str::to_string);

        info!(
            "[batch] Processing {} key(s) starting at index {}",
            total, start
        );

        for (position, key) in selected.iter().enumerate() {
            if self.shutdown.is_triggered() {
                return Ok(self.interrupted(summary));
            }
            let index = start + position;
            self.state.select(index);

            if let Some(target) = resume_gate.as_deref() {
                if key != target {
                    debug!("[batch] Skipping {} before resume point", key);
                    summary.skipped += 1;
                    continue;
                }
                info!("[batch] Resuming from key: {}", key);
                resume_gate = None;
            }

            self.state.begin(key);
            let (reference, label) = self.reference(index, key);
            info!(
                "[batch] [{}/{}] Processing validator: {}",
                position + 1,
                total,
                label
            );

            let submission = self.submitter.submit(&reference).await;
            if self.shutdown.is_triggered() {
                return Ok(self.interrupted(summary));
            }
            summary.record(submission.outcome);

            match submission.outcome {
                ExitOutcome::Success => {
                    info!("[submit] Exit command executed for {}", label);
                    let output = submission.stdout.trim();
                    if !output.is_empty() {
                        info!("[submit] Output: {}", output);
                    }
                }
                ExitOutcome::AlreadyExiting => {
                    info!("[submit] Validator is already in active_exiting state, skipping")
                }
                ExitOutcome::AlreadyExited => {
                    info!("[submit] Validator is already in exited_unslashed state, skipping")
                }
                ExitOutcome::UnknownValidator => {
                    warn!("[submit] Unknown validator (may not exist or already exited), skipping")
                }
                ExitOutcome::Failure => {
                    error!(
                        "[submit] Exit command failed for {}: {}",
                        label,
                        submission.detail()
                    )
                }
            }
            if submission.outcome.halts_batch() {
                return Ok(BatchReport::Halted {
                    index,
                    label,
                    detail: submission.detail(),
                    summary,
                });
            }

            if self.wait_for_status {
                if let PollResult::Interrupted = self.check_status(&reference).await {
                    return Ok(self.interrupted(summary));
                }
            } else {
                debug!("[poll] Skipping status check");
            }

            if self.shutdown.sleep(self.key_delay).await {
                return Ok(self.interrupted(summary));
            }
        }

        if let Some(target) = resume_gate {
            warn!(
                "[batch] Resume key {} not found in the selected keys; nothing was processed",
                target
            );
        }
        info!("[batch] All keys processed.");
        Ok(BatchReport::Completed(summary))
    }

    async fn check_status(&self, reference: &ValidatorReference) -> PollResult {
        let Some(validator_id) = reference.status_id() else {
            info!("[poll] Skipping status check in private-key mode (no public key to query)");
            return PollResult::Exhausted(None);
        };

        info!("[poll] Checking status of {}", validator_id);
        let result = self
            .poller
            .wait_for_terminal(&validator_id, &self.shutdown)
            .await;
        match &result {
            PollResult::Terminal(status) => {
                info!("[poll] Validator {} reached {}", validator_id, status)
            }
            PollResult::Exhausted(Some(status)) => warn!(
                "[poll] Validator {} still {} after polling",
                validator_id, status
            ),
            PollResult::Exhausted(None) => {
                warn!("[poll] No status available for {}", validator_id)
            }
            PollResult::Interrupted => {}
        }
        result
    }

    /// Reference handed to the submitter plus a printable label.
    fn reference(&self, index: usize, key: &str) -> (ValidatorReference, String) {
        if self.state.mode() == RunMode::PrivateKey {
            let secret = Secret::new(key);
            let mut label = format!("private key #{index}");
            match self.deriver.derive_pubkey(&secret) {
                Derivation::Derived(pubkey) => label.push_str(&format!(" (pubkey: {pubkey})")),
                Derivation::Unavailable => {}
                Derivation::Failed(reason) => warn!(
                    "[batch] Could not derive public key for private key #{}: {}",
                    index, reason
                ),
            }
            return (ValidatorReference::PrivateKey(secret), label);
        }

        match self.index_map.resolve(key) {
            Some(validator_index) => (
                ValidatorReference::Index(validator_index),
                format!("{key} (index: {validator_index})"),
            ),
            None => {
                if !self.index_map.is_empty() {
                    warn!("[batch] Could not find index for {}, using public key", key);
                }
                (ValidatorReference::PublicKey(key.to_string()), key.to_string())
            }
        }
    }

    fn interrupted(&self, summary: BatchSummary) -> BatchReport {
        let hint = self.state.resume_hint();
        warn!("[batch] Interrupted by user. {}", hint);
        BatchReport::Interrupted { hint, summary }
    }
}

/// Pre-flight checks, then a full batch run with the real adapters.
pub async fn run(
    exit_config: ExitConfig,
    run_config: RunConfig,
    shutdown: Shutdown,
) -> ExitResult<BatchReport> {
    let limit = run_config.limit()?;
    exit_config.validate()?;
    let mode = run_config.mode();

    if !mode.is_private_key() && !run_config.credentials_file.exists() {
        return Err(ExitError::CredentialsNotFound {
            path: run_config.credentials_file.clone(),
        });
    }

    let keys = loader::load_keys(&run_config.source)?;
    info!("[loader] Found {} keys.", keys.len());

    let index_map = match (&run_config.index_file, mode) {
        (Some(path), RunMode::Mnemonic) => IndexMap::load(path)?,
        (Some(path), RunMode::PrivateKey) => {
            warn!(
                "[loader] Ignoring index file {} in private-key mode",
                path.display()
            );
            IndexMap::default()
        }
        (None, _) => IndexMap::default(),
    };

    if mode.is_private_key() && run_config.resume_from.is_some() {
        warn!("[batch] --resume-from is ignored in private-key mode, use --start-index instead");
    }

    let credentials = match mode {
        RunMode::Mnemonic => Some(Credentials::load(&run_config.credentials_file)?),
        RunMode::PrivateKey => None,
    };

    let beacon = HttpBeaconClient::new(
        exit_config.connection.as_str(),
        exit_config.poll.request_timeout,
    )?;
    let submitter = ExitSubmitter::new(TokioCommandRunner::new(), &exit_config, credentials);
    let poller = StatusPoller::new(beacon, exit_config.poll.clone());
    let state = RunState::new(
        mode,
        run_config.start_index,
        limit,
        run_config.resume_from.clone(),
    );

    let mut driver = BatchDriver::new(submitter, poller, state, shutdown)
        .with_index_map(index_map)
        .with_key_deriver(Box::new(DefaultKeyDeriver::default()))
        .with_key_delay(exit_config.key_delay);
    if !exit_config.wait_for_status {
        driver = driver.without_status_checks();
    }

    driver.run(&keys).await
}
