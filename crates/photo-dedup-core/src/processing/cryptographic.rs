//! Content hashing for exact duplicate detection.

use blake3::Hash as Blake3Hash;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Hash files in fixed-size chunks so large files never sit in memory whole
const CHUNK_SIZE: usize = 8192;

/// Compute the blake3 digest of a file by streaming its bytes
pub fn content_hash<P: AsRef<Path>>(path: P) -> Result<Blake3Hash> {
    let mut file = File::open(&path)?;
    let mut hasher = blake3::Hasher::new();

    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}

// -- Tests --
