use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Configuration for the duplicate detection process.
///
/// Thresholds and ceilings are validated once, before any work begins; an
/// engine constructed from an invalid configuration is rejected at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum composite score for a pair to be accepted as duplicates
    pub similarity_threshold: f64,

    /// Minimum filename similarity before the filename signal contributes
    pub filename_similarity_threshold: f64,

    /// Enable the filename comparison signal
    pub check_filenames: bool,

    /// Enable perceptual fingerprint extraction and comparison
    pub check_visual: bool,

    /// Enable capture metadata extraction
    pub check_metadata: bool,

    /// Hard ceiling on total pairwise scoring calls per scan
    pub max_comparisons: usize,

    /// Wall-clock ceiling for the whole comparison phase, in seconds
    pub max_scan_secs: u64,

    /// Wall-clock ceiling for a single size bucket, in seconds
    pub max_bucket_secs: u64,

    /// Buckets larger than this are skipped entirely, never partially
    /// processed
    pub max_bucket_files: usize,

    /// Deadline for the image decode-and-hash phase of one extraction
    pub decode_timeout_secs: u64,

    /// Deadline for one whole extraction; must not be shorter than the
    /// decode deadline
    pub extraction_timeout_secs: u64,

    /// Maximum directory depth when walking scan roots
    pub max_depth: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
            filename_similarity_threshold: 0.7,
            check_filenames: true,
            check_visual: true,
            check_metadata: true,
            max_comparisons: 100_000,
            max_scan_secs: 60,
            max_bucket_secs: 30,
            max_bucket_files: 30,
            decode_timeout_secs: 10,
            extraction_timeout_secs: 15,
            max_depth: None,
        }
    }
}

impl Config {
    /// Validate threshold ranges and ceiling consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::Configuration(format!(
                "similarity_threshold must be between 0.0 and 1.0, got {}",
                self.similarity_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.filename_similarity_threshold) {
            return Err(Error::Configuration(format!(
                "filename_similarity_threshold must be between 0.0 and 1.0, got {}",
                self.filename_similarity_threshold
            )));
        }
        if self.max_comparisons == 0 {
            return Err(Error::Configuration(
                "max_comparisons must be at least 1".into(),
            ));
        }
        if self.max_bucket_files < 2 {
            return Err(Error::Configuration(
                "max_bucket_files must be at least 2".into(),
            ));
        }
        if self.extraction_timeout_secs < self.decode_timeout_secs {
            return Err(Error::Configuration(
                "extraction_timeout_secs must not be shorter than decode_timeout_secs".into(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| Error::Configuration(format!("invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn scan_deadline(&self) -> Duration {
        Duration::from_secs(self.max_scan_secs)
    }

    pub fn bucket_deadline(&self) -> Duration {
        Duration::from_secs(self.max_bucket_secs)
    }

    pub fn decode_timeout(&self) -> Duration {
        Duration::from_secs(self.decode_timeout_secs)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }
}

// -- Tests --
