//! Core functionality for finding and remediating duplicate photos.
//!
//! This library provides the foundational components for photo deduplication:
//! - File discovery and per-file signature extraction
//! - Multi-signal similarity scoring with size-bucketed comparison
//! - Bounded scan orchestration with cooperative cancellation
//! - Safe remediation of duplicate groups

// -- External Dependencies --

use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

// -- Internal Modules --
mod error;
mod remediation;

// -- Public Re-exports --
pub use config::Config;
pub use error::{Error, Result};
pub use report::ScanReport;
pub use session::{CancelToken, ScanSession};
pub use types::*;

// -- Public Modules --
pub mod config;
pub mod dedup;
pub mod discovery;
pub mod logging;
pub mod processing;
pub mod report;
pub mod session;
pub mod similarity;
pub mod types;

use processing::ExtractOptions;

/// Main entry point for the deduplication process.
///
/// The engine holds only validated, immutable configuration; all per-scan
/// state lives in the `ScanSession` passed to each call, so independent
/// scans can run concurrently on separate engines.
pub struct PhotoDeduper {
    config: Config,
}

impl PhotoDeduper {
    /// Create a new engine with the provided configuration.
    ///
    /// Fails with `Error::Configuration` before any work begins when the
    /// configuration is out of range.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scan files and directories for duplicate groups.
    ///
    /// Always returns a (possibly empty or partial) group list with accurate
    /// statistics; per-file failures are logged and skipped, never raised.
    pub fn scan(&self, roots: &[PathBuf], session: &ScanSession) -> Result<ScanResults> {
        let start = Instant::now();

        let files = discovery::collect_image_files(roots, self.config.max_depth)?;
        if files.is_empty() {
            info!("No image files found for deduplication");
            session.report(0, 0, "No image files found");
            return Ok(ScanResults {
                groups: Vec::new(),
                stats: self.stats_snapshot(session, start, ScanOutcome::Completed),
            });
        }

        info!("Analyzing {} images for duplicates", files.len());
        session.set_files_analyzed(files.len());
        session.report(0, files.len(), "Analyzing images");

        let options = ExtractOptions {
            want_hash: true,
            want_capture_metadata: self.config.check_metadata,
            want_visual: self.config.check_visual,
        };

        let mut signatures = Vec::with_capacity(files.len());
        let mut cancelled = false;
        for (index, path) in files.iter().enumerate() {
            if session.is_cancelled() {
                cancelled = true;
                break;
            }
            session.report_throttled(
                index,
                files.len(),
                &format!(
                    "Analyzing {}",
                    path.file_name().unwrap_or_default().to_string_lossy()
                ),
            );

            match processing::extract(
                path,
                options,
                self.config.decode_timeout(),
                self.config.extraction_timeout(),
            ) {
                Ok(signature) => signatures.push(signature),
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        let (groups, outcome) = if cancelled {
            (Vec::new(), ScanOutcome::Cancelled)
        } else {
            let buckets = dedup::bucket_by_size(signatures);
            info!(
                "Bucketing: {} size buckets with potential duplicates",
                buckets.len()
            );
            dedup::build_groups(&buckets, &self.config, session)
        };

        let stats = self.stats_snapshot(session, start, outcome);

        let summary = format!(
            "{} duplicate groups, {} duplicates, {} bytes recoverable, {} comparisons in {:.1}s",
            groups.len(),
            stats.duplicate_files,
            stats.recoverable_bytes,
            stats.comparisons,
            stats.elapsed_secs
        );
        let status = match outcome {
            ScanOutcome::Completed => "Scan completed",
            ScanOutcome::Cancelled => "Scan cancelled",
            ScanOutcome::ComparisonLimit => "Comparison limit reached, results are partial",
            ScanOutcome::TimeLimit => "Time limit reached, results are partial",
        };
        info!("{}: {}", status, summary);
        session.report(
            stats.files_analyzed,
            stats.files_analyzed,
            &format!("{}: {}", status, summary),
        );

        Ok(ScanResults { groups, stats })
    }

    /// Apply a remediation policy to previously found duplicate groups.
    ///
    /// Validation errors (empty group list, missing destination) are raised
    /// before any file is touched; per-file failures are counted in the
    /// returned stats and never abort the batch.
    pub fn remediate(
        &self,
        groups: &[DuplicateGroup],
        action: Action,
        destination: Option<&Path>,
        session: &ScanSession,
    ) -> Result<RemediationStats> {
        remediation::remediate(groups, action, destination, session)
    }

    /// Build a serializable report for scan results
    pub fn report(&self, results: &ScanResults) -> ScanReport {
        ScanReport::new(results)
    }

    fn stats_snapshot(
        &self,
        session: &ScanSession,
        start: Instant,
        outcome: ScanOutcome,
    ) -> ScanStats {
        ScanStats {
            files_analyzed: session.files_analyzed(),
            comparisons: session.comparisons(),
            duplicate_files: session.duplicate_files(),
            recoverable_bytes: session.recoverable_bytes(),
            elapsed_secs: start.elapsed().as_secs_f64(),
            outcome,
        }
    }
}
