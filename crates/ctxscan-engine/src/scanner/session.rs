//! One in-flight scan: lifecycle state, cancellation, deadline and progress.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

use ctxscan_core::traits::{Cancellable, CancellationToken};
use ctxscan_core::types::ScanMode;

use super::progress::ProgressTracker;

/// Lifecycle of a scan. `Scanning` is the only non-terminal state a session
/// can hold; `Idle` describes an engine with no session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ScanState {
    Idle = 0,
    Scanning = 1,
    Completed = 2,
    Cancelled = 3,
    TimedOut = 4,
    Failed = 5,
}

impl ScanState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ScanState::Idle,
            1 => ScanState::Scanning,
            2 => ScanState::Completed,
            3 => ScanState::Cancelled,
            4 => ScanState::TimedOut,
            _ => ScanState::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ScanState::Idle | ScanState::Scanning)
    }
}

/// Mutable state of one scan, shared between the engine, the walker and
/// `cancel_scan`.
#[derive(Debug)]
pub struct ScanSession {
    root: String,
    mode: ScanMode,
    state: AtomicU8,
    token: CancellationToken,
    started_at: Instant,
    /// `None` when the timeout is too large to represent as an instant.
    deadline: Option<Instant>,
    timeout: Duration,
    progress: ProgressTracker,
}

impl ScanSession {
    /// A session in the `Scanning` state with its deadline armed.
    pub fn start(root: String, mode: ScanMode, timeout: Duration) -> Self {
        let started_at = Instant::now();
        Self {
            root,
            mode,
            state: AtomicU8::new(ScanState::Scanning as u8),
            token: CancellationToken::new(),
            started_at,
            deadline: started_at.checked_add(timeout),
            timeout,
            progress: ProgressTracker::default(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn state(&self) -> ScanState {
        ScanState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether work may continue. Observes the deadline: the first check
    /// past it moves the session to `TimedOut`.
    pub fn is_active(&self) -> bool {
        if self.state() != ScanState::Scanning || self.token.is_cancelled() {
            return false;
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            if self.transition(ScanState::TimedOut) {
                self.token.cancel();
                tracing::warn!(root = %self.root, timeout_secs = self.timeout.as_secs(), "scan deadline reached");
            }
            return false;
        }
        true
    }

    /// User cancellation. No effect once the session is terminal.
    pub fn cancel(&self) -> bool {
        let changed = self.transition(ScanState::Cancelled);
        if changed {
            self.token.cancel();
        }
        changed
    }

    /// Mark the walk finished and return the state the session ends in.
    pub fn complete(&self) -> ScanState {
        self.transition(ScanState::Completed);
        self.state()
    }

    pub fn fail(&self) -> ScanState {
        self.transition(ScanState::Failed);
        self.state()
    }

    fn transition(&self, to: ScanState) -> bool {
        self.state
            .compare_exchange(
                ScanState::Scanning as u8,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}
