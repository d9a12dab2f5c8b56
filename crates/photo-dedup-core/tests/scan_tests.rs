//! End-to-end scan behaviour over real files.

mod common;

use common::{payload, write_bytes};
use photo_dedup_core::{
    Config, DuplicateType, PhotoDeduper, RecommendedAction, ScanOutcome, ScanSession,
};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

fn engine() -> PhotoDeduper {
    PhotoDeduper::new(Config::default()).unwrap()
}

#[test]
fn identical_files_form_one_exact_group() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_bytes(dir.path(), "IMG_001.jpg", &payload(1, 1000));
    let b = write_bytes(dir.path(), "vacation.jpg", &payload(1, 1000));
    let c = write_bytes(dir.path(), "unrelated.jpg", &payload(9, 500));

    let session = ScanSession::new();
    let results = engine()
        .scan(&[dir.path().to_path_buf()], &session)
        .unwrap();

    assert_eq!(results.stats.outcome, ScanOutcome::Completed);
    assert_eq!(results.stats.files_analyzed, 3);
    assert_eq!(results.groups.len(), 1);

    let group = &results.groups[0];
    assert_eq!(group.duplicate_type, DuplicateType::Exact);
    assert_eq!(group.recommended_action, RecommendedAction::KeepLargest);
    assert_eq!(group.similarity_score, 1.0);
    assert_eq!(group.size_savings_bytes, 1000);
    assert!(group.members.contains(&a));
    assert!(group.members.contains(&b));
    assert!(!group.members.contains(&c));

    assert_eq!(results.stats.duplicate_files, 1);
    assert_eq!(results.stats.recoverable_bytes, 1000);
}

#[test]
fn repeated_scans_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    write_bytes(dir.path(), "a.jpg", &payload(1, 600));
    write_bytes(dir.path(), "b.jpg", &payload(1, 600));
    write_bytes(dir.path(), "c.jpg", &payload(2, 600));
    write_bytes(dir.path(), "d.jpg", &payload(3, 400));
    write_bytes(dir.path(), "e.jpg", &payload(3, 400));

    let first = engine()
        .scan(&[dir.path().to_path_buf()], &ScanSession::new())
        .unwrap();
    let second = engine()
        .scan(&[dir.path().to_path_buf()], &ScanSession::new())
        .unwrap();

    assert_eq!(first.groups.len(), second.groups.len());
    for (x, y) in first.groups.iter().zip(second.groups.iter()) {
        assert_eq!(x.members, y.members);
        assert_eq!(x.similarity_score, y.similarity_score);
        assert_eq!(x.duplicate_type, y.duplicate_type);
    }
}

#[test]
fn no_file_appears_in_two_groups() {
    let dir = tempfile::tempdir().unwrap();
    // Two duplicate pairs in different size buckets plus same-size strangers
    write_bytes(dir.path(), "a1.jpg", &payload(1, 700));
    write_bytes(dir.path(), "a2.jpg", &payload(1, 700));
    write_bytes(dir.path(), "b1.jpg", &payload(2, 800));
    write_bytes(dir.path(), "b2.jpg", &payload(2, 800));
    write_bytes(dir.path(), "b3.jpg", &payload(3, 800));

    let results = engine()
        .scan(&[dir.path().to_path_buf()], &ScanSession::new())
        .unwrap();

    let mut seen: HashSet<PathBuf> = HashSet::new();
    for group in &results.groups {
        assert!(group.members.len() >= 2);
        for member in &group.members {
            assert!(seen.insert(member.clone()), "{:?} in two groups", member);
        }
    }
}

#[test]
fn different_sizes_are_never_compared() {
    let dir = tempfile::tempdir().unwrap();
    write_bytes(dir.path(), "a.jpg", &payload(1, 100));
    write_bytes(dir.path(), "b.jpg", &payload(1, 200));
    write_bytes(dir.path(), "c.jpg", &payload(1, 300));

    let session = ScanSession::new();
    let results = engine()
        .scan(&[dir.path().to_path_buf()], &session)
        .unwrap();

    assert!(results.groups.is_empty());
    assert_eq!(results.stats.comparisons, 0);
}

#[test]
fn comparison_budget_is_never_exceeded() {
    let dir = tempfile::tempdir().unwrap();
    // Five same-size files put ten candidate pairs in one bucket
    for seed in 0..5u8 {
        write_bytes(dir.path(), &format!("f{}.jpg", seed), &payload(seed, 640));
    }

    let config = Config {
        max_comparisons: 3,
        ..Config::default()
    };
    let session = ScanSession::new();
    let results = PhotoDeduper::new(config)
        .unwrap()
        .scan(&[dir.path().to_path_buf()], &session)
        .unwrap();

    assert!(results.stats.comparisons <= 3);
    assert_eq!(results.stats.outcome, ScanOutcome::ComparisonLimit);
    assert!(results.stats.outcome.is_partial());
}

#[test]
fn cancelled_scan_returns_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    write_bytes(dir.path(), "a.jpg", &payload(1, 500));
    write_bytes(dir.path(), "b.jpg", &payload(1, 500));

    let session = ScanSession::new();
    session.cancel_token().cancel();

    let results = engine()
        .scan(&[dir.path().to_path_buf()], &session)
        .unwrap();

    assert_eq!(results.stats.outcome, ScanOutcome::Cancelled);
    assert!(results.groups.is_empty());
}

#[test]
fn progress_fires_at_start_and_completion() {
    let dir = tempfile::tempdir().unwrap();
    write_bytes(dir.path(), "a.jpg", &payload(1, 500));
    write_bytes(dir.path(), "b.jpg", &payload(1, 500));

    let events: Arc<Mutex<Vec<(usize, usize, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let session = ScanSession::new().with_progress(move |current, total, message| {
        sink.lock().unwrap().push((current, total, message.to_string()));
    });

    engine().scan(&[dir.path().to_path_buf()], &session).unwrap();

    let events = events.lock().unwrap();
    assert!(events.len() >= 2);
    assert_eq!(events.first().unwrap().0, 0);
    let last = events.last().unwrap();
    assert_eq!(last.0, last.1);
    assert!(last.2.contains("Scan completed"));
}

#[test]
fn scan_of_empty_directory_returns_empty_results() {
    let dir = tempfile::tempdir().unwrap();
    let results = engine()
        .scan(&[dir.path().to_path_buf()], &ScanSession::new())
        .unwrap();

    assert!(results.groups.is_empty());
    assert_eq!(results.stats.files_analyzed, 0);
    assert_eq!(results.stats.outcome, ScanOutcome::Completed);
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    let config = Config {
        similarity_threshold: 2.0,
        ..Config::default()
    };
    assert!(PhotoDeduper::new(config).is_err());
}

#[test]
fn report_reflects_scan_results() {
    let dir = tempfile::tempdir().unwrap();
    write_bytes(dir.path(), "a.jpg", &payload(1, 900));
    write_bytes(dir.path(), "b.jpg", &payload(1, 900));

    let deduper = engine();
    let results = deduper
        .scan(&[dir.path().to_path_buf()], &ScanSession::new())
        .unwrap();
    let report = deduper.report(&results);

    assert_eq!(report.duplicate_groups_found, 1);
    assert_eq!(report.total_files_analyzed, 2);
    assert_eq!(report.potential_savings_bytes, 900);

    let out = dir.path().join("report.json");
    report.write_json(&out).unwrap();
    assert!(out.exists());
}
