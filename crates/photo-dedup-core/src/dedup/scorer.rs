//! Composite pairwise duplicate scoring.
//!
//! Signals are applied in a fixed precedence order and each rule can only
//! raise the running score, with one exception: an exact content-hash match
//! forces the score to 1.0 and replaces all weaker reasons.

use crate::config::Config;
use crate::similarity::{filename_similarity, visual_similarity};
use crate::types::FileSignature;

/// Why a pair was judged similar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    SameSize,
    SameSizeDimensions,
    IdenticalContent,
    FilenameSimilarity,
    FilenameSizeMatch,
    VisualSimilarity,
}

impl MatchReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SameSize => "same_size",
            Self::SameSizeDimensions => "same_size_dimensions",
            Self::IdenticalContent => "identical_content",
            Self::FilenameSimilarity => "filename_similarity",
            Self::FilenameSizeMatch => "filename_size_match",
            Self::VisualSimilarity => "visual_similarity",
        }
    }
}

/// Result of scoring one candidate pair
#[derive(Debug, Clone)]
pub struct PairScore {
    pub score: f64,
    pub reasons: Vec<MatchReason>,
}

impl PairScore {
    pub fn has_reason(&self, reason: MatchReason) -> bool {
        self.reasons.contains(&reason)
    }
}

/// Score two signatures from the same size bucket.
///
/// Precedence: same-size baseline, equal dimensions, identical content
/// (overriding), filename similarity, visual similarity. The filename and
/// visual rules only run while no stronger rule has effectively decided the
/// pair.
pub fn score_pair(a: &FileSignature, b: &FileSignature, config: &Config) -> PairScore {
    // Callers compare within one size bucket, which is itself the baseline
    // signal
    let mut score: f64 = 0.95;
    let mut reasons = vec![MatchReason::SameSize];

    if let (Some(dim_a), Some(dim_b)) = (a.dimensions, b.dimensions) {
        if dim_a == dim_b {
            score = score.max(0.98);
            reasons.push(MatchReason::SameSizeDimensions);
        }
    }

    if let (Some(hash_a), Some(hash_b)) = (&a.content_hash, &b.content_hash) {
        if hash_a == hash_b {
            // Exact byte match overrides all weaker evidence
            return PairScore {
                score: 1.0,
                reasons: vec![MatchReason::IdenticalContent],
            };
        }
    }

    if score < 0.99 && config.check_filenames {
        let name_similarity = filename_similarity(&a.file_name(), &b.file_name());
        if name_similarity >= config.filename_similarity_threshold {
            score = score.max(name_similarity * 0.85);
            reasons.push(MatchReason::FilenameSimilarity);

            if a.size_bytes == b.size_bytes && a.size_bytes > 0 {
                score = score.max(name_similarity * 0.95);
                reasons.push(MatchReason::FilenameSizeMatch);
            }
        }
    }

    if score < 0.8 && config.check_visual {
        if let (Some(fp_a), Some(fp_b)) = (&a.perceptual_fingerprint, &b.perceptual_fingerprint) {
            let visual = visual_similarity(fp_a, fp_b);
            if visual >= 0.6 {
                score = score.max(visual);
                reasons.push(MatchReason::VisualSimilarity);
            }
        }
    }

    PairScore { score, reasons }
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
    fn same_size_baseline_is_095() {
        let config = Config {
            check_filenames: false,
            check_visual: false,
            ..Config::default()
        };
        let result = score_pair(&sig("a.jpg", 100), &sig("b.jpg", 100), &config);
        assert_eq!(result.score, 0.95);
        assert!(result.has_reason(MatchReason::SameSize));
    }

    #[test]
    fn equal_dimensions_upgrade_to_098() {
        let mut a = sig("a.jpg", 100);
        let mut b = sig("b.jpg", 100);
        a.dimensions = Some((640, 480));
        b.dimensions = Some((640, 480));

        let result = score_pair(&a, &b, &Config::default());
        assert_eq!(result.score, 0.98);
        assert!(result.has_reason(MatchReason::SameSizeDimensions));
    }

    #[test]
    fn differing_dimensions_do_not_upgrade() {
        let mut a = sig("a.jpg", 100);
        let mut b = sig("b.jpg", 100);
        a.dimensions = Some((640, 480));
        b.dimensions = Some((480, 640));

        let result = score_pair(&a, &b, &Config::default());
        assert!(!result.has_reason(MatchReason::SameSizeDimensions));
    }

    #[test]
    fn identical_content_overrides_everything() {
        let mut a = sig("morning.jpg", 100);
        let mut b = sig("evening.jpg", 100);
        a.dimensions = Some((640, 480));
        b.dimensions = Some((640, 480));
        a.content_hash = Some("abc123".into());
        b.content_hash = Some("abc123".into());

        let result = score_pair(&a, &b, &Config::default());
        assert_eq!(result.score, 1.0);
        assert_eq!(result.reasons, vec![MatchReason::IdenticalContent]);
    }

    #[test]
    fn differing_hashes_fall_through_to_weaker_rules() {
        let mut a = sig("IMG_001.jpg", 100);
        let mut b = sig("IMG_001_copy.jpg", 100);
        a.content_hash = Some("abc".into());
        b.content_hash = Some("def".into());

        let result = score_pair(&a, &b, &Config::default());
        assert!(result.score < 1.0);
        assert!(result.has_reason(MatchReason::FilenameSimilarity));
        assert!(result.has_reason(MatchReason::FilenameSizeMatch));
    }

    #[test]
    fn filename_rules_never_lower_the_score() {
        // Baseline 0.95 stays even though the filename contribution would be
        // lower on its own
        let a = sig("IMG_001.jpg", 100);
        let b = sig("IMG_001_copy.jpg", 100);
        let result = score_pair(&a, &b, &Config::default());
        assert!(result.score >= 0.95);
    }

    #[test]
    fn visual_rule_is_skipped_at_high_scores() {
        // Baseline 0.95 >= 0.8 means the visual signal never runs
        let mut a = sig("a.jpg", 100);
        let mut b = sig("b.jpg", 100);
        a.perceptual_fingerprint = Some("0:0:0".into());
        b.perceptual_fingerprint = Some("0:0:0".into());

        let result = score_pair(&a, &b, &Config::default());
        assert!(!result.has_reason(MatchReason::VisualSimilarity));
    }

    #[test]
    fn disabled_filename_check_skips_the_rule() {
        let config = Config {
            check_filenames: false,
            ..Config::default()
        };
        let a = sig("IMG_001.jpg", 100);
        let b = sig("IMG_001_copy.jpg", 100);
        let result = score_pair(&a, &b, &config);
        assert!(!result.has_reason(MatchReason::FilenameSimilarity));
    }
}
