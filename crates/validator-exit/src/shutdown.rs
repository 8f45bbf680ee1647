//! Cooperative interrupt signal.
//!
//! The Ctrl+C listener only flips a watch channel to `true`; the driver checks
//! it between steps and does all reporting itself.

use std::time::Duration;

use tokio::sync::watch;

/// Receiving side of the interrupt flag.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx }
    }

    /// A connected sender/receiver pair, initially not triggered.
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self::new(rx))
    }

    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, shutdown) = Self::channel();
        shutdown
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Sleep for `duration`, waking early on interrupt.
    ///
    /// Returns `true` if the run was interrupted before or during the sleep.
    pub async fn sleep(&self, duration: Duration) -> bool {
        if self.is_triggered() {
            return true;
        }
        if duration.is_zero() {
            return false;
        }

        let mut rx = self.rx.clone();
        let triggered = async move {
            match rx.wait_for(|stop| *stop).await {
                Ok(_) => true,
                // Sender gone: nobody can interrupt any more.
                Err(_) => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(duration) => false,
            interrupted = triggered => interrupted,
        }
    }
}
