//! Pure similarity scoring over filenames and perceptual fingerprints.
//!
//! Both functions here are deterministic and side-effect free; the composite
//! duplicate score in `dedup::scorer` is built on top of them.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Number of hash components a well-formed fingerprint carries
pub const FINGERPRINT_PARTS: usize = 3;

/// Maximum meaningful bit distance for this perceptual-hash family
const MAX_HASH_DISTANCE: f64 = 64.0;

/// Trailing tokens that mark a file as a copy: `_1`, `_copy`, `-backup`,
/// ` (2)` and similar
static COPY_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[_\-\s]*(?:copy|backup|\(\d+\)|\d+)[_\-\s]*$").unwrap());

/// Score two filenames for a likely "copy" relationship, in [0.0, 1.0].
///
/// Extensions are stripped and stems lower-cased before comparison. Exact
/// stem matches score 1.0; otherwise a normalized edit-distance ratio is
/// used. When both stems reduce to the same base after repeatedly stripping
/// copy suffixes, the ratio is raised to at least 0.95, which is what catches
/// `IMG_001.jpg` against `IMG_001_copy.jpg`.
pub fn filename_similarity(name_a: &str, name_b: &str) -> f64 {
    let stem_a = file_stem_lower(name_a);
    let stem_b = file_stem_lower(name_b);

    if stem_a == stem_b {
        return 1.0;
    }

    let mut ratio = edit_similarity(&stem_a, &stem_b);

    let base_a = strip_copy_suffixes(&stem_a);
    let base_b = strip_copy_suffixes(&stem_b);
    if base_a == base_b && base_a.chars().count() > 2 {
        ratio = ratio.max(0.95);
    }

    ratio
}

/// Score two perceptual fingerprints by averaged Hamming distance, in
/// [0.0, 1.0].
///
/// A fingerprint that does not split into exactly three parseable hash
/// components is treated as non-comparable and scores 0.0.
pub fn visual_similarity(fingerprint_a: &str, fingerprint_b: &str) -> f64 {
    let hashes_a = match parse_fingerprint(fingerprint_a) {
        Some(h) => h,
        None => return 0.0,
    };
    let hashes_b = match parse_fingerprint(fingerprint_b) {
        Some(h) => h,
        None => return 0.0,
    };

    let total_distance: u32 = hashes_a
        .iter()
        .zip(hashes_b.iter())
        .map(|(a, b)| (a ^ b).count_ones())
        .sum();
    let avg_distance = f64::from(total_distance) / FINGERPRINT_PARTS as f64;

    (1.0 - avg_distance / MAX_HASH_DISTANCE).max(0.0)
}

/// Split a composite fingerprint into its three 64-bit hash values
pub fn parse_fingerprint(fingerprint: &str) -> Option<[u64; FINGERPRINT_PARTS]> {
    let parts: Vec<&str> = fingerprint.split(':').collect();
    if parts.len() != FINGERPRINT_PARTS {
        return None;
    }

    let mut hashes = [0u64; FINGERPRINT_PARTS];
    for (slot, part) in hashes.iter_mut().zip(parts.iter()) {
        *slot = u64::from_str_radix(part, 16).ok()?;
    }
    Some(hashes)
}

fn file_stem_lower(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Strip copy-pattern suffixes until the stem stops changing, so that both
/// `img_0012` and `img_0012_copy` reduce to `img`
fn strip_copy_suffixes(stem: &str) -> String {
    let mut current = stem.to_string();
    loop {
        let stripped = COPY_SUFFIX.replace(&current, "").into_owned();
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

/// Normalized edit similarity: 1.0 minus the Levenshtein distance over the
/// longer length
fn edit_similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let longest = a_chars.len().max(b_chars.len());
    if longest == 0 {
        return 1.0;
    }

    let distance = levenshtein(&a_chars, &b_chars);
    1.0 - distance as f64 / longest as f64
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

// -- Tests --
