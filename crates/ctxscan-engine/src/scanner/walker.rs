//! Bounded-concurrency directory walk.
//!
//! Directories are processed in batches of `batch_width` on the rayon pool;
//! within a directory, files are processed in chunks of `chunk_size`. Every
//! entry is checked against the ignore filter before any `stat` or read is
//! issued for it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use ctxscan_core::config::ScanConfig;
use ctxscan_core::events::ScanEventHandler;
use ctxscan_core::types::collections::FxHashSet;
use ctxscan_core::types::{FileRecord, ScanStats, SkipReason};
use rayon::prelude::*;

use super::metadata::FileMetadataCache;
use super::session::ScanSession;
use crate::classify::{FileClassifier, SizeClass};
use crate::ignore::IgnoreFilter;
use crate::path::{PathNormalizer, RelPath, RelativePath};

/// Walk tuning, resolved from [`ScanConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    pub batch_width: usize,
    pub chunk_size: usize,
    pub max_depth: usize,
    pub follow_symlinks: bool,
}

impl WalkOptions {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            batch_width: config.effective_directory_batch_width(),
            chunk_size: config.effective_file_chunk_size(),
            max_depth: config.effective_max_depth(),
            follow_symlinks: config.effective_follow_symlinks(),
        }
    }
}

/// Records accumulated up to the last merged chunk, plus statistics.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub records: Vec<FileRecord>,
    pub stats: ScanStats,
}

/// Walks one root with a fixed filter. Holds no per-scan state itself.
pub struct DirectoryScanner<'a> {
    normalizer: &'a PathNormalizer,
    classifier: &'a FileClassifier,
    metadata: &'a FileMetadataCache,
    options: WalkOptions,
}

impl<'a> DirectoryScanner<'a> {
    pub fn new(
        normalizer: &'a PathNormalizer,
        classifier: &'a FileClassifier,
        metadata: &'a FileMetadataCache,
        options: WalkOptions,
    ) -> Self {
        Self {
            normalizer,
            classifier,
            metadata,
            options,
        }
    }

    /// Walk `root` until the tree is exhausted or `session` stops being active.
    ///
    /// Only a failure to list `root` itself is returned as an error; every
    /// other filesystem failure is logged and the affected subtree or file
    /// is skipped.
    pub fn walk(
        &self,
        root: &Path,
        filter: &IgnoreFilter,
        session: &ScanSession,
        events: &dyn ScanEventHandler,
    ) -> io::Result<WalkOutcome> {
        let canonical_root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        let mut visited = FxHashSet::default();
        visited.insert(canonical_root.clone());

        let walk = Walk {
            scanner: self,
            root,
            canonical_root,
            filter,
            session,
            events,
            counters: WalkCounters::default(),
            visited: Mutex::new(visited),
        };

        let mut records = Vec::new();
        let mut pending = vec![PendingDir {
            path: root.to_path_buf(),
            depth: 0,
        }];

        while !pending.is_empty() && session.is_active() {
            let take = pending.len().min(self.options.batch_width);
            let batch = pending.split_off(pending.len() - take);
            let outcomes: Vec<io::Result<DirOutcome>> =
                batch.par_iter().map(|dir| walk.directory(dir)).collect();
            for outcome in outcomes {
                let outcome = outcome?;
                records.extend(outcome.records);
                pending.extend(outcome.subdirs);
            }
        }

        let stats = walk.counters.into_stats(&records, session);
        Ok(WalkOutcome { records, stats })
    }
}

struct PendingDir {
    path: PathBuf,
    depth: usize,
}

struct FileEntry {
    name: String,
    path: PathBuf,
    rel: RelPath,
}

#[derive(Default)]
struct DirOutcome {
    records: Vec<FileRecord>,
    subdirs: Vec<PendingDir>,
}

enum Visit {
    Dir(PendingDir),
    File(FileEntry),
}

#[derive(Default)]
struct WalkCounters {
    files_skipped_ignored: AtomicUsize,
    dirs_skipped_ignored: AtomicUsize,
    entries_skipped_invalid: AtomicUsize,
    metadata_cache_hits: AtomicUsize,
    metadata_reads: AtomicUsize,
    content_reads: AtomicUsize,
}

impl WalkCounters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn into_stats(self, records: &[FileRecord], session: &ScanSession) -> ScanStats {
        let skipped_large = records
            .iter()
            .filter(|r| r.skip_reason == Some(SkipReason::TooLarge))
            .count();
        let skipped_total = records.iter().filter(|r| r.is_skipped).count();
        ScanStats {
            directories_processed: session.progress().snapshot().directories_processed,
            files_processed: records.len(),
            files_skipped_ignored: self.files_skipped_ignored.into_inner(),
            dirs_skipped_ignored: self.dirs_skipped_ignored.into_inner(),
            files_skipped_large: skipped_large,
            files_skipped_unreadable: skipped_total - skipped_large,
            entries_skipped_invalid: self.entries_skipped_invalid.into_inner(),
            binary_files: records.iter().filter(|r| r.is_binary).count(),
            total_size_bytes: records.iter().map(|r| r.size).sum(),
            metadata_cache_hits: self.metadata_cache_hits.into_inner(),
            metadata_reads: self.metadata_reads.into_inner(),
            content_reads: self.content_reads.into_inner(),
            duration_ms: session.elapsed().as_millis() as u64,
        }
    }
}

/// Per-scan context shared by the worker threads.
struct Walk<'s, 'a> {
    scanner: &'s DirectoryScanner<'a>,
    root: &'s Path,
    canonical_root: PathBuf,
    filter: &'s IgnoreFilter,
    session: &'s ScanSession,
    events: &'s dyn ScanEventHandler,
    counters: WalkCounters,
    visited: Mutex<FxHashSet<PathBuf>>,
}

impl Walk<'_, '_> {
    fn directory(&self, dir: &PendingDir) -> io::Result<DirOutcome> {
        let entries = match fs::read_dir(&dir.path) {
            Ok(entries) => entries,
            Err(e) if dir.depth == 0 => return Err(e),
            Err(e) => {
                tracing::warn!(dir = %dir.path.display(), error = %e, "cannot list directory, treating as empty");
                self.session.progress().directory_done(self.events);
                return Ok(DirOutcome::default());
            }
        };

        let mut outcome = DirOutcome::default();
        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(dir = %dir.path.display(), error = %e, "unreadable directory entry");
                    WalkCounters::bump(&self.counters.entries_skipped_invalid);
                    continue;
                }
            };
            match self.visit(&entry, dir.depth) {
                Some(Visit::Dir(sub)) => outcome.subdirs.push(sub),
                Some(Visit::File(file)) => files.push(file),
                None => {}
            }
        }
        tracing::debug!(
            dir = %dir.path.display(),
            files = files.len(),
            subdirs = outcome.subdirs.len(),
            "listed directory"
        );
        self.session.progress().directory_done(self.events);

        for chunk in files.chunks(self.scanner.options.chunk_size) {
            if !self.session.is_active() {
                break;
            }
            let built: Vec<FileRecord> = chunk.par_iter().map(|file| self.file(file)).collect();
            // Results of a chunk that straddles cancellation are discarded.
            if !self.session.is_active() {
                break;
            }
            self.session.progress().files_done(built.len(), self.events);
            outcome.records.extend(built);
        }
        Ok(outcome)
    }

    /// Decide what to do with one entry. Ignored entries return before any
    /// filesystem call is made for them.
    fn visit(&self, entry: &fs::DirEntry, depth: usize) -> Option<Visit> {
        let path = entry.path();
        let rel = match self.scanner.normalizer.relative_to(self.root, &path) {
            RelativePath::Inside(rel) => rel,
            other => {
                tracing::debug!(path = %path.display(), relation = ?other, "entry outside scan root");
                WalkCounters::bump(&self.counters.entries_skipped_invalid);
                return None;
            }
        };
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cannot determine entry type");
                WalkCounters::bump(&self.counters.entries_skipped_invalid);
                return None;
            }
        };

        let (is_dir, is_file) = if file_type.is_symlink() {
            if !self.scanner.options.follow_symlinks {
                tracing::debug!(path = %path.display(), "symlink not followed");
                return None;
            }
            // The target type is unknown until resolved, so a link excluded
            // as either a file or a directory is pruned without touching it.
            if self.filter.is_ignored(&rel, false) {
                WalkCounters::bump(&self.counters.files_skipped_ignored);
                return None;
            }
            if self.filter.is_ignored(&rel, true) {
                WalkCounters::bump(&self.counters.dirs_skipped_ignored);
                return None;
            }
            let target = self.follow(&path)?;
            (target.is_dir(), target.is_file())
        } else {
            (file_type.is_dir(), file_type.is_file())
        };

        if is_dir {
            if self.filter.is_ignored(&rel, true) {
                WalkCounters::bump(&self.counters.dirs_skipped_ignored);
                return None;
            }
            if depth + 1 > self.scanner.options.max_depth {
                tracing::debug!(dir = %path.display(), depth = depth + 1, "depth cap reached");
                return None;
            }
            Some(Visit::Dir(PendingDir {
                path,
                depth: depth + 1,
            }))
        } else if is_file {
            if self.filter.is_ignored(&rel, false) {
                WalkCounters::bump(&self.counters.files_skipped_ignored);
                return None;
            }
            Some(Visit::File(FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                rel,
            }))
        } else {
            None
        }
    }

    /// Resolve a symlink, refusing targets outside the root and directories
    /// already entered.
    fn follow(&self, link: &Path) -> Option<fs::Metadata> {
        let target = match fs::canonicalize(link) {
            Ok(target) => target,
            Err(e) => {
                tracing::debug!(link = %link.display(), error = %e, "dangling symlink");
                WalkCounters::bump(&self.counters.entries_skipped_invalid);
                return None;
            }
        };
        match self.scanner.normalizer.relative_to(&self.canonical_root, &target) {
            RelativePath::Inside(_) | RelativePath::Root => {}
            RelativePath::Outside | RelativePath::OtherVolume => {
                tracing::debug!(link = %link.display(), target = %target.display(), "symlink escapes scan root");
                WalkCounters::bump(&self.counters.entries_skipped_invalid);
                return None;
            }
        }

        WalkCounters::bump(&self.counters.metadata_reads);
        let meta = fs::metadata(&target).ok()?;
        if meta.is_dir() {
            let first_visit = self
                .visited
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(target);
            if !first_visit {
                tracing::debug!(link = %link.display(), "symlink cycle");
                return None;
            }
        }
        Some(meta)
    }

    fn file(&self, entry: &FileEntry) -> FileRecord {
        let scanner = self.scanner;
        let path = scanner.normalizer.normalize(&entry.path);
        if let Some(hit) = scanner.metadata.get(&path, entry.rel.as_str()) {
            WalkCounters::bump(&self.counters.metadata_cache_hits);
            return hit;
        }

        let name = entry.name.clone();
        let rel = entry.rel.as_str().to_string();
        let is_binary = scanner.classifier.is_binary(&entry.path);

        WalkCounters::bump(&self.counters.metadata_reads);
        let size = match fs::metadata(&entry.path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::warn!(file = %entry.path.display(), error = %e, "cannot stat file");
                return FileRecord::skipped(name, path, rel, 0, is_binary, SkipReason::from_io(&e));
            }
        };

        let record = if is_binary {
            FileRecord::binary(name, path, rel, size)
        } else if scanner.classifier.size_class(size) == SizeClass::Oversized {
            FileRecord::skipped(name, path, rel, size, false, SkipReason::TooLarge)
        } else {
            WalkCounters::bump(&self.counters.content_reads);
            match fs::read(&entry.path) {
                Ok(bytes) => {
                    let content = String::from_utf8_lossy(&bytes).into_owned();
                    let tokens = scanner.classifier.estimate_tokens(&content);
                    FileRecord::text(name, path, rel, size, content, tokens)
                }
                Err(e) => {
                    tracing::warn!(file = %entry.path.display(), error = %e, "cannot read file");
                    FileRecord::skipped(name, path, rel, size, false, SkipReason::from_io(&e))
                }
            }
        };
        scanner.metadata.insert(&record);
        record
    }
}
