//! Size-based candidate bucketing.
//!
//! Files that differ in byte size are never compared: exact duplicates share
//! size by definition, and "same size" is itself the baseline scored signal.
//! Partitioning by size turns the all-pairs comparison into a sum of small
//! per-bucket passes.

use std::collections::BTreeMap;

use crate::types::FileSignature;

/// Partition signatures by exact byte size, keeping only buckets that can
/// possibly contain a duplicate pair.
///
/// A `BTreeMap` keeps bucket iteration order deterministic across runs;
/// within a bucket, signatures stay in append (discovery) order.
pub fn bucket_by_size(signatures: Vec<FileSignature>) -> BTreeMap<u64, Vec<FileSignature>> {
    let mut buckets: BTreeMap<u64, Vec<FileSignature>> = BTreeMap::new();
    for signature in signatures {
        buckets
            .entry(signature.size_bytes)
            .or_default()
            .push(signature);
    }

    buckets.retain(|_, members| members.len() >= 2);
    buckets
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn sig(name: &str, size: u64) -> FileSignature {
        FileSignature {
            path: PathBuf::from(name),
            size_bytes: size,
            dimensions: None,
            capture_time: None,
            modified_time: SystemTime::UNIX_EPOCH,
            camera: None,
            content_hash: None,
            perceptual_fingerprint: None,
        }
    }

    #[test]
    fn groups_by_exact_size() {
        let buckets = bucket_by_size(vec![
            sig("a.jpg", 100),
            sig("b.jpg", 100),
            sig("c.jpg", 200),
            sig("d.jpg", 200),
        ]);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&100].len(), 2);
        assert_eq!(buckets[&200].len(), 2);
    }

    #[test]
    fn singleton_buckets_are_dropped() {
        let buckets = bucket_by_size(vec![sig("a.jpg", 100), sig("b.jpg", 101)]);
        assert!(buckets.is_empty());
    }

    #[test]
    fn different_sizes_never_share_a_bucket() {
        let buckets = bucket_by_size(vec![
            sig("a.jpg", 100),
            sig("b.jpg", 100),
            sig("c.jpg", 101),
        ]);
        assert_eq!(buckets.len(), 1);
        assert!(buckets[&100].iter().all(|s| s.size_bytes == 100));
    }

    #[test]
    fn bucket_preserves_append_order() {
        let buckets = bucket_by_size(vec![
            sig("first.jpg", 64),
            sig("second.jpg", 64),
            sig("third.jpg", 64),
        ]);
        let names: Vec<String> = buckets[&64].iter().map(|s| s.file_name()).collect();
        assert_eq!(names, ["first.jpg", "second.jpg", "third.jpg"]);
    }
}
