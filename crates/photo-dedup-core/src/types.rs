use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// Camera attributes read from embedded capture metadata.
///
/// Every field is individually optional; a tag that fails to parse is simply
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraFields {
    pub make: Option<String>,
    pub model: Option<String>,
    pub focal_length: Option<String>,
    pub iso: Option<String>,
    pub exposure_time: Option<String>,
    pub f_number: Option<String>,
    pub flash: Option<String>,
    pub orientation: Option<String>,
}

impl CameraFields {
    /// True when no tag was read at all
    pub fn is_empty(&self) -> bool {
        self.make.is_none()
            && self.model.is_none()
            && self.focal_length.is_none()
            && self.iso.is_none()
            && self.exposure_time.is_none()
            && self.f_number.is_none()
            && self.flash.is_none()
            && self.orientation.is_none()
    }
}

/// The extracted, comparable fact-set for one file.
///
/// `size_bytes` and `modified_time` come straight from the filesystem and are
/// always present; every other field is optional. A partial extraction keeps
/// the record and drops only the field that failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSignature {
    /// Full path to the file; unique identity within one scan
    pub path: PathBuf,

    /// File size in bytes
    pub size_bytes: u64,

    /// Image dimensions (width, height), absent if the file could not be
    /// decoded or visual extraction was skipped
    pub dimensions: Option<(u32, u32)>,

    /// Capture timestamp parsed from embedded metadata
    pub capture_time: Option<NaiveDateTime>,

    /// Filesystem modification timestamp
    pub modified_time: SystemTime,

    /// Camera attributes, absent when no capture metadata was found
    pub camera: Option<CameraFields>,

    /// Lower-hex blake3 digest over the full file bytes
    pub content_hash: Option<String>,

    /// Composite of three perceptual hash values, colon-separated lower-hex
    pub perceptual_fingerprint: Option<String>,
}

impl FileSignature {
    /// The file name component, lossy-decoded
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Classification of a duplicate group, strongest evidence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateType {
    /// Members share an identical content hash
    Exact,
    /// Members share byte size and pixel dimensions
    LikelyExact,
    /// Members matched on perceptual fingerprints
    VisuallySimilar,
    /// Members matched on weaker signals only
    Similar,
}

impl DuplicateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::LikelyExact => "likely_exact",
            Self::VisuallySimilar => "visually_similar",
            Self::Similar => "similar",
        }
    }
}

/// Suggested handling for a duplicate group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    KeepLargest,
    KeepFirst,
    ManualReview,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeepLargest => "keep_largest",
            Self::KeepFirst => "keep_first",
            Self::ManualReview => "manual_review",
        }
    }
}

/// A transitively-linked cluster of files judged duplicates of one another.
///
/// Member order is discovery order; the first member is the seed unless a
/// remediation policy recomputes ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Maximum pairwise score observed within the group, in [0.0, 1.0]
    pub similarity_score: f64,

    /// Classification derived from the strongest match reason
    pub duplicate_type: DuplicateType,

    /// File identities in discovery order, always length >= 2
    pub members: Vec<PathBuf>,

    /// Suggested handling
    pub recommended_action: RecommendedAction,

    /// Sum of member sizes minus the single largest member
    pub size_savings_bytes: u64,
}

/// Remediation policy applied to duplicate groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Apply each group's recommended action; manual-review groups are left
    /// untouched
    Auto,
    /// Delete all but the first-discovered member of each group
    KeepFirst,
    /// Delete all but the largest member of each group
    KeepLargest,
    /// Move the largest member to `original/` and the rest to `duplicated/`
    /// under the destination folder
    MoveOrganize,
    /// Move all non-kept members to a flat destination folder
    MoveToFolder,
}

impl Action {
    /// Whether this action writes into a destination folder
    pub fn needs_destination(&self) -> bool {
        matches!(self, Self::MoveOrganize | Self::MoveToFolder)
    }
}

/// Outcome statistics of one remediation call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationStats {
    pub files_removed: usize,
    pub files_moved: usize,
    pub space_saved_bytes: u64,
    pub errors: usize,
}

/// How a scan terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// All buckets were fully compared
    Completed,
    /// The cancellation flag was observed
    Cancelled,
    /// The pairwise comparison ceiling was hit
    ComparisonLimit,
    /// The whole-scan wall clock ceiling was hit
    TimeLimit,
}

impl ScanOutcome {
    /// True unless the scan ran to completion
    pub fn is_partial(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

/// Counters accumulated over one scan
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScanStats {
    /// Number of files considered for extraction
    pub files_analyzed: usize,
    /// Pairwise scoring calls performed
    pub comparisons: usize,
    /// Files assigned to a group, not counting each group's kept member
    pub duplicate_files: usize,
    /// Bytes recoverable if every group kept only its largest member
    pub recoverable_bytes: u64,
    /// Wall-clock seconds spent in the scan
    pub elapsed_secs: f64,
    /// How the scan terminated
    pub outcome: ScanOutcome,
}

/// Groups plus statistics returned by a scan
#[derive(Debug, Clone)]
pub struct ScanResults {
    pub groups: Vec<DuplicateGroup>,
    pub stats: ScanStats,
}
