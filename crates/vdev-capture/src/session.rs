//! Recording session management
//!
//! One session exists per invocation. It owns the cancellation signal and
//! arms its two producers: a timer (only when a duration was requested) and
//! an OS interrupt listener. Whichever fires first cancels the signal; the
//! later fire is a no-op. The capture call is the sole consumer.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use vdev_core::prelude::*;

use crate::capturer::Capture;

/// Single-assignment cancellation flag with first-writer-wins semantics
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    fired: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Only the first caller actually cancels; later calls
    /// are no-ops. Returns whether this call was the one that fired it.
    pub fn cancel(&self) -> bool {
        if self
            .fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.notify.notify_waiters();
            true
        } else {
            false
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Wait until the signal fires; returns immediately if it already has
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }

        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        // Re-check after registering: a cancel between the first check and
        // enable() would otherwise be missed
        if self.is_cancelled() {
            return;
        }

        notified.await;
    }
}

/// Lifecycle of a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
    Cancelling,
    Completed,
    Failed,
}

/// A single cancellable screen recording
///
/// Owns the cancellation signal; consuming `run` makes a second concurrent
/// session in the same invocation unrepresentable.
pub struct RecordingSession {
    cancel: CancelSignal,
    duration: Option<Duration>,
    phase: SessionState,
}

impl RecordingSession {
    /// Create a session; `duration_secs == 0` means record until interrupted
    pub fn new(duration_secs: u64) -> Self {
        Self {
            cancel: CancelSignal::new(),
            duration: (duration_secs > 0).then(|| Duration::from_secs(duration_secs)),
            phase: SessionState::Idle,
        }
    }

    /// A handle onto the session's cancellation signal
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    pub fn state(&self) -> SessionState {
        if self.phase == SessionState::Recording && self.cancel.is_cancelled() {
            SessionState::Cancelling
        } else {
            self.phase
        }
    }

    /// Record through `capturer` until the timer or an OS interrupt fires
    pub async fn run<C: Capture>(mut self, capturer: &C, output: &Path) -> Result<PathBuf> {
        self.phase = SessionState::Recording;
        let producers = self.arm_producers();

        let result = capturer.record(&self.cancel, output).await;

        for producer in producers {
            producer.abort();
        }

        match &result {
            Ok(path) => {
                self.phase = SessionState::Completed;
                info!("recording completed: {}", path.display());
            }
            Err(err) => {
                self.phase = SessionState::Failed;
                warn!("recording failed: {}", err);
            }
        }

        result
    }

    fn arm_producers(&self) -> Vec<JoinHandle<()>> {
        let mut producers = Vec::with_capacity(2);

        if let Some(duration) = self.duration {
            let cancel = self.cancel.clone();
            producers.push(tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                if cancel.cancel() {
                    info!("recording duration elapsed");
                }
            }));
        }

        let cancel = self.cancel.clone();
        producers.push(tokio::spawn(async move {
            match wait_for_interrupt().await {
                Ok(()) => {
                    if cancel.cancel() {
                        info!("interrupt received, stopping recording");
                    }
                }
                Err(err) => error!("interrupt listener error: {}", err),
            }
        }));

        producers
    }
}

/// Wait for a termination request from the environment
async fn wait_for_interrupt() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => debug!("received SIGINT"),
            _ = sigterm.recv() => debug!("received SIGTERM"),
        }

        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        debug!("received Ctrl+C");
        Ok(())
    }
}
