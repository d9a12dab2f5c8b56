//! Shared helpers for integration tests.

use std::path::{Path, PathBuf};

/// Write a file with the given payload and return its path
pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// A payload of `len` bytes that differs per seed but not per call
pub fn payload(seed: u8, len: usize) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}
