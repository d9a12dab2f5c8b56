//! Bucketed pairwise comparison and duplicate group construction.
//!
//! Buckets are walked in deterministic order under three ceilings: a total
//! comparison budget, a whole-scan deadline and a per-bucket deadline.
//! Cancellation is polled between buckets and between inner comparisons; a
//! group interrupted by cancellation is discarded rather than emitted
//! half-built.

pub mod bucket;
pub mod scorer;

pub use bucket::bucket_by_size;
pub use scorer::{score_pair, MatchReason, PairScore};

use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::session::ScanSession;
use crate::types::{DuplicateGroup, DuplicateType, FileSignature, RecommendedAction, ScanOutcome};

/// Why the comparison loops unwound early
enum Stop {
    /// The current bucket hit its deadline; move on to the next bucket
    Bucket,
    /// The whole scan must end with the given outcome
    Scan(ScanOutcome),
}

/// Compare all bucketed signatures pairwise and accumulate duplicate groups.
///
/// Returns the groups finalized so far together with how the pass ended.
pub(crate) fn build_groups(
    buckets: &BTreeMap<u64, Vec<FileSignature>>,
    config: &Config,
    session: &ScanSession,
) -> (Vec<DuplicateGroup>, ScanOutcome) {
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut processed: HashSet<PathBuf> = HashSet::new();
    let mut outcome = ScanOutcome::Completed;

    let scan_start = Instant::now();
    let total_buckets = buckets.len();

    'buckets: for (bucket_index, (size, members)) in buckets.iter().enumerate() {
        if session.is_cancelled() {
            outcome = ScanOutcome::Cancelled;
            break;
        }
        if scan_start.elapsed() >= config.scan_deadline() {
            warn!(
                "Scan deadline of {}s reached, stopping with {} groups",
                config.max_scan_secs,
                groups.len()
            );
            outcome = ScanOutcome::TimeLimit;
            break;
        }

        // Oversized buckets are skipped whole, never partially processed
        if members.len() > config.max_bucket_files {
            warn!(
                "Skipping size bucket of {} bytes: {} files exceeds the {}-file cap",
                size,
                members.len(),
                config.max_bucket_files
            );
            continue;
        }

        session.report_throttled(
            bucket_index,
            total_buckets,
            &format!(
                "Comparing bucket {}/{} ({} bytes, {} files)",
                bucket_index + 1,
                total_buckets,
                size,
                members.len()
            ),
        );
        debug!(
            "Comparing bucket of {} bytes with {} files",
            size,
            members.len()
        );

        let bucket_start = Instant::now();

        for (i, seed) in members.iter().enumerate() {
            if session.is_cancelled() {
                outcome = ScanOutcome::Cancelled;
                break 'buckets;
            }
            if processed.contains(&seed.path) {
                continue;
            }

            let mut matched: Vec<&FileSignature> = vec![seed];
            let mut reasons: Vec<MatchReason> = Vec::new();
            let mut max_similarity: f64 = 0.0;
            let mut stop: Option<Stop> = None;

            for candidate in &members[i + 1..] {
                if session.is_cancelled() {
                    // A cancelled group never completed its round; discard it
                    outcome = ScanOutcome::Cancelled;
                    break 'buckets;
                }
                if processed.contains(&candidate.path) {
                    continue;
                }
                if session.comparisons() >= config.max_comparisons {
                    stop = Some(Stop::Scan(ScanOutcome::ComparisonLimit));
                    break;
                }
                if scan_start.elapsed() >= config.scan_deadline() {
                    stop = Some(Stop::Scan(ScanOutcome::TimeLimit));
                    break;
                }
                if bucket_start.elapsed() >= config.bucket_deadline() {
                    warn!(
                        "Bucket of {} bytes exceeded its {}s deadline, moving to next bucket",
                        size, config.max_bucket_secs
                    );
                    stop = Some(Stop::Bucket);
                    break;
                }

                session.add_comparison();
                let pair = score_pair(seed, candidate, config);

                session.report_throttled(
                    session.comparisons(),
                    config.max_comparisons,
                    &format!("Compared {} pairs", session.comparisons()),
                );

                if pair.score >= config.similarity_threshold {
                    matched.push(candidate);
                    reasons.extend(pair.reasons);
                    max_similarity = max_similarity.max(pair.score);
                }
            }

            if matched.len() >= 2 {
                for signature in &matched {
                    processed.insert(signature.path.clone());
                }
                groups.push(finalize_group(&matched, &reasons, max_similarity, session));
            }

            match stop {
                Some(Stop::Scan(limit)) => {
                    warn!(
                        "Comparison ceiling reached ({} comparisons), stopping",
                        session.comparisons()
                    );
                    outcome = limit;
                    break 'buckets;
                }
                Some(Stop::Bucket) => break,
                None => {}
            }
        }
    }

    // Strongest evidence first; sort is stable so ties keep discovery order
    groups.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    (groups, outcome)
}

fn finalize_group(
    matched: &[&FileSignature],
    reasons: &[MatchReason],
    max_similarity: f64,
    session: &ScanSession,
) -> DuplicateGroup {
    let (duplicate_type, recommended_action) = classify(reasons);

    let total: u64 = matched.iter().map(|s| s.size_bytes).sum();
    let largest = matched.iter().map(|s| s.size_bytes).max().unwrap_or(0);
    let size_savings_bytes = total - largest;

    session.add_duplicates(matched.len() - 1, size_savings_bytes);
    info!(
        "Found duplicate group: {} files, max similarity {:.3}, type {}",
        matched.len(),
        max_similarity,
        duplicate_type.as_str()
    );

    DuplicateGroup {
        similarity_score: max_similarity,
        duplicate_type,
        members: matched.iter().map(|s| s.path.clone()).collect(),
        recommended_action,
        size_savings_bytes,
    }
}

/// Map accumulated match reasons to a type and suggested handling, strongest
/// evidence first
fn classify(reasons: &[MatchReason]) -> (DuplicateType, RecommendedAction) {
    if reasons.contains(&MatchReason::IdenticalContent) {
        (DuplicateType::Exact, RecommendedAction::KeepLargest)
    } else if reasons.contains(&MatchReason::SameSizeDimensions) {
        (DuplicateType::LikelyExact, RecommendedAction::KeepFirst)
    } else if reasons.contains(&MatchReason::VisualSimilarity) {
        (DuplicateType::VisuallySimilar, RecommendedAction::ManualReview)
    } else {
        (DuplicateType::Similar, RecommendedAction::ManualReview)
    }
}

// -- Tests --
