//! Structured scan reporting.

use chrono::Local;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{DuplicateType, RecommendedAction, ScanResults};

/// One duplicate group as it appears in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupReport {
    pub similarity_score: f64,
    pub duplicate_type: DuplicateType,
    pub recommended_action: RecommendedAction,
    pub size_savings_bytes: u64,
    pub files: Vec<String>,
}

/// Serializable summary of one scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub analysis_timestamp: String,
    pub total_files_analyzed: usize,
    pub duplicate_groups_found: usize,
    pub total_duplicates: usize,
    pub potential_savings_bytes: u64,
    pub groups: Vec<GroupReport>,
}

impl ScanReport {
    pub fn new(results: &ScanResults) -> Self {
        let groups = results
            .groups
            .iter()
            .map(|group| GroupReport {
                similarity_score: group.similarity_score,
                duplicate_type: group.duplicate_type,
                recommended_action: group.recommended_action,
                size_savings_bytes: group.size_savings_bytes,
                files: group
                    .members
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect(),
            })
            .collect();

        Self {
            analysis_timestamp: Local::now().to_rfc3339(),
            total_files_analyzed: results.stats.files_analyzed,
            duplicate_groups_found: results.groups.len(),
            total_duplicates: results.stats.duplicate_files,
            potential_savings_bytes: results.stats.recoverable_bytes,
            groups,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("failed to serialize report: {}", e)))
    }

    /// Write the report to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        info!("Scan report written to {}", path.display());
        Ok(())
    }
}

// -- Tests --
