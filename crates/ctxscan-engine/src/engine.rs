//! `ScanEngine`: the host-facing facade.
//!
//! Owns every cache and at most one active [`ScanSession`]. Hosts either
//! call [`ScanEngine::scan`] on a thread of their choosing with their own
//! [`ScanEventHandler`], or [`ScanEngine::start_scan`] to get a
//! [`ScanStatus`] receiver fed from a background thread.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Receiver;
use ctxscan_core::config::CtxscanConfig;
use ctxscan_core::errors::{CtxscanErrorCode, IgnoreError, ScanError};
use ctxscan_core::events::types::*;
use ctxscan_core::events::{EventDispatcher, ScanEventHandler};
use ctxscan_core::types::{FileRecord, ScanMode, ScanStats, ScanStatus};

use crate::channel::ChannelEventHandler;
use crate::classify::FileClassifier;
use crate::ignore::{IgnoreRuleResolver, PatternProvenance, ResolverStats};
use crate::path::PathNormalizer;
use crate::scanner::{
    DirectoryScanner, FileMetadataCache, ScanSession, ScanState, WalkOptions, WalkOutcome,
};

/// Result of a scan that got past its setup.
///
/// `state` is `Completed`, `Cancelled` or `TimedOut`. The latter two carry
/// the records merged before the scan stopped.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub state: ScanState,
    pub file_records: Vec<FileRecord>,
    pub stats: ScanStats,
    timeout: Duration,
}

impl ScanReport {
    pub fn is_complete(&self) -> bool {
        self.state == ScanState::Completed
    }

    /// Records and stats of a completed scan; cancellation and timeout
    /// become errors.
    pub fn into_complete(self) -> Result<(Vec<FileRecord>, ScanStats), ScanError> {
        match self.state {
            ScanState::Cancelled => Err(ScanError::Cancelled),
            ScanState::TimedOut => Err(ScanError::TimedOut {
                secs: self.timeout.as_secs(),
            }),
            _ => Ok((self.file_records, self.stats)),
        }
    }
}

#[derive(Debug)]
struct SessionSlot {
    active: Option<Arc<ScanSession>>,
    last: ScanState,
}

pub struct ScanEngine {
    config: CtxscanConfig,
    normalizer: PathNormalizer,
    classifier: FileClassifier,
    resolver: IgnoreRuleResolver,
    metadata: FileMetadataCache,
    options: WalkOptions,
    timeout: Duration,
    slot: Mutex<SessionSlot>,
    clear_lock: Mutex<()>,
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::new(CtxscanConfig::default())
    }
}

impl ScanEngine {
    pub fn new(config: CtxscanConfig) -> Self {
        let normalizer = PathNormalizer::native();
        Self {
            normalizer,
            classifier: FileClassifier::new(&config),
            resolver: IgnoreRuleResolver::new(&config, normalizer),
            metadata: FileMetadataCache::new(config.cache.effective_file_metadata_max_bytes()),
            options: WalkOptions::from_config(&config.scan),
            timeout: config.scan.effective_timeout(),
            slot: Mutex::new(SessionSlot {
                active: None,
                last: ScanState::Idle,
            }),
            clear_lock: Mutex::new(()),
            config,
        }
    }

    /// Override the scan deadline with sub-second precision.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn config(&self) -> &CtxscanConfig {
        &self.config
    }

    /// State of the active session, or the terminal state of the last one.
    pub fn state(&self) -> ScanState {
        let slot = self.lock_slot();
        match &slot.active {
            Some(session) => session.state(),
            None => slot.last,
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.lock_slot().active.is_some()
    }

    pub fn resolver_stats(&self) -> ResolverStats {
        self.resolver.stats()
    }

    /// Run a scan on the calling thread.
    ///
    /// Rejected with [`ScanError::Busy`] while another scan is active.
    /// Exactly one terminal callback fires on `events`, after the engine has
    /// become free to accept the next scan.
    pub fn scan(
        &self,
        root: &Path,
        mode: ScanMode,
        custom_patterns: &[String],
        events: &dyn ScanEventHandler,
    ) -> Result<ScanReport, ScanError> {
        let session = self.claim(root, mode, events)?;
        self.run(&session, root, custom_patterns, events)
    }

    /// Start a scan on a background thread and return its status stream.
    ///
    /// A request made while another scan is active yields a stream holding
    /// only [`ScanStatus::Busy`].
    pub fn start_scan(
        self: &Arc<Self>,
        root: impl Into<PathBuf>,
        mode: ScanMode,
        custom_patterns: Vec<String>,
    ) -> Receiver<ScanStatus> {
        self.start_scan_observed(root, mode, custom_patterns, Vec::new())
    }

    /// [`start_scan`](Self::start_scan), with every event also delivered to
    /// `observers`. An observer that panics is logged and skipped; the
    /// status stream is unaffected.
    pub fn start_scan_observed(
        self: &Arc<Self>,
        root: impl Into<PathBuf>,
        mode: ScanMode,
        custom_patterns: Vec<String>,
        observers: Vec<Arc<dyn ScanEventHandler>>,
    ) -> Receiver<ScanStatus> {
        let root = root.into();
        let (handler, rx) = ChannelEventHandler::unbounded();
        let mut events = EventDispatcher::new();
        events.register(Arc::new(handler));
        for observer in observers {
            events.register(observer);
        }
        let Ok(session) = self.claim(&root, mode, &events) else {
            return rx;
        };

        let engine = Arc::clone(self);
        let worker_session = Arc::clone(&session);
        let worker_events = events.clone();
        let spawned = thread::Builder::new()
            .name("ctxscan-scan".to_string())
            .spawn(move || {
                let _ = engine.run(&worker_session, &root, &custom_patterns, &worker_events);
            });
        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to spawn scan thread");
            let state = session.fail();
            self.release(&session, state);
            events.on_scan_error(&ScanErrorEvent {
                message: format!("failed to start scan: {e}"),
            });
        }
        rx
    }

    /// Cancel the active scan, if any. Returns whether a scan was cancelled.
    pub fn cancel_scan(&self) -> bool {
        let slot = self.lock_slot();
        match &slot.active {
            Some(session) if session.cancel() => {
                tracing::info!(root = session.root(), "scan cancellation requested");
                true
            }
            _ => false,
        }
    }

    /// Empty the ignore-filter, file-type, token-count and file-metadata
    /// caches.
    pub fn clear_caches(&self) {
        let _guard = self.clear_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.resolver.clear_cache();
        self.classifier.clear_caches();
        self.metadata.clear();
        tracing::info!("caches cleared");
    }

    /// Resolve (and cache) the ignore filter for the inputs and return where
    /// its patterns came from. Does not walk the tree beyond pattern
    /// discovery.
    pub fn get_ignore_patterns(
        &self,
        root: &Path,
        mode: ScanMode,
        custom_patterns: &[String],
    ) -> Result<PatternProvenance, IgnoreError> {
        let root = std::path::absolute(root).map_err(|e| IgnoreError::RootUnreadable {
            path: root.display().to_string(),
            message: e.to_string(),
        })?;
        let resolved = self.resolver.resolve(&root, mode, custom_patterns)?;
        Ok(resolved.provenance.clone())
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, SessionSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim(
        &self,
        root: &Path,
        mode: ScanMode,
        events: &dyn ScanEventHandler,
    ) -> Result<Arc<ScanSession>, ScanError> {
        let label = self.normalizer.normalize(
            &std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf()),
        );
        let mut slot = self.lock_slot();
        if let Some(active) = &slot.active {
            tracing::warn!(requested = %label, active = active.root(), "scan rejected, engine busy");
            drop(slot);
            events.on_scan_busy(&ScanBusyEvent {
                requested_root: label,
            });
            return Err(ScanError::Busy);
        }
        let session = Arc::new(ScanSession::start(label, mode, self.timeout));
        slot.active = Some(Arc::clone(&session));
        Ok(session)
    }

    fn release(&self, session: &Arc<ScanSession>, state: ScanState) {
        let mut slot = self.lock_slot();
        if slot
            .active
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, session))
        {
            slot.active = None;
        }
        slot.last = state;
    }

    fn run(
        &self,
        session: &Arc<ScanSession>,
        root: &Path,
        custom_patterns: &[String],
        events: &dyn ScanEventHandler,
    ) -> Result<ScanReport, ScanError> {
        tracing::info!(root = session.root(), mode = %session.mode(), "scan started");
        events.on_scan_started(&ScanStartedEvent {
            root: session.root().to_string(),
            mode: session.mode(),
        });

        let result = self.execute(session, root, custom_patterns, events);
        let state = match &result {
            Ok(_) => session.complete(),
            Err(_) => session.fail(),
        };
        self.release(session, state);

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(root = session.root(), error = %e, code = e.error_code(), "scan failed");
                events.on_scan_error(&ScanErrorEvent {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let files_processed = outcome.records.len();
        tracing::info!(
            root = session.root(),
            state = ?state,
            files = files_processed,
            directories = outcome.stats.directories_processed,
            duration_ms = outcome.stats.duration_ms,
            "scan finished"
        );
        let (file_records, stats) = match state {
            ScanState::Cancelled => {
                events.on_scan_cancelled(&ScanCancelledEvent { files_processed });
                (outcome.records, outcome.stats)
            }
            ScanState::TimedOut => {
                events.on_scan_timed_out(&ScanTimedOutEvent {
                    files_processed,
                    timeout_secs: session.timeout().as_secs(),
                });
                (outcome.records, outcome.stats)
            }
            _ => {
                let event = ScanCompleteEvent {
                    file_records: outcome.records,
                    stats: outcome.stats,
                };
                events.on_scan_complete(&event);
                (event.file_records, event.stats)
            }
        };
        Ok(ScanReport {
            state,
            file_records,
            stats,
            timeout: session.timeout(),
        })
    }

    fn execute(
        &self,
        session: &ScanSession,
        root: &Path,
        custom_patterns: &[String],
        events: &dyn ScanEventHandler,
    ) -> Result<WalkOutcome, ScanError> {
        let root = std::path::absolute(root).map_err(|source| ScanError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;
        let meta = fs::metadata(&root).map_err(|source| ScanError::RootUnreadable {
            path: root.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(ScanError::RootNotDirectory { path: root });
        }

        let resolved = self.resolver.resolve(&root, session.mode(), custom_patterns)?;
        let scanner =
            DirectoryScanner::new(&self.normalizer, &self.classifier, &self.metadata, self.options);
        scanner
            .walk(&root, &resolved.filter, session, events)
            .map_err(|source| ScanError::RootUnreadable { path: root, source })
    }
}
