//! Per-file signature extraction.
//!
//! Extraction always begins with a filesystem stat; if that fails there is
//! no signature at all. Every later signal (content hash, capture metadata,
//! perceptual fingerprint) degrades independently: a failure or sub-timeout
//! drops the field, never the record. Only the whole-extraction deadline
//! fails the file outright.

use image::GenericImageView;
use log::{debug, warn};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::processing::capture::{self, CaptureData};
use crate::processing::cryptographic::content_hash;
use crate::processing::perceptual;
use crate::processing::timeout::run_with_deadline;
use crate::types::FileSignature;

/// Which signals to extract for one file
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub want_hash: bool,
    pub want_capture_metadata: bool,
    pub want_visual: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            want_hash: true,
            want_capture_metadata: true,
            want_visual: true,
        }
    }
}

/// Fields that require opening the file as an image
#[derive(Debug, Default)]
struct DecodedFields {
    dimensions: Option<(u32, u32)>,
    capture: Option<CaptureData>,
    fingerprint: Option<String>,
}

/// Extract a `FileSignature`, bounded by a decode sub-deadline and a
/// whole-extraction deadline.
///
/// On sub-timeout the stat-derived fields already gathered are returned; on
/// the outer deadline the extraction fails entirely.
pub fn extract(
    path: &Path,
    options: ExtractOptions,
    decode_timeout: Duration,
    extraction_timeout: Duration,
) -> Result<FileSignature> {
    let task_path = path.to_path_buf();
    let outcome = run_with_deadline(path, "extraction", extraction_timeout, move || {
        extract_inner(&task_path, options, decode_timeout)
    });

    match outcome {
        Ok(result) => result,
        Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
            Err(Error::ExtractionTimeout(path.to_path_buf()))
        }
        Err(e) => Err(Error::Io(e)),
    }
}

fn extract_inner(
    path: &Path,
    options: ExtractOptions,
    decode_timeout: Duration,
) -> Result<FileSignature> {
    // Stat failure means no signature
    let metadata = fs::metadata(path)?;

    let mut signature = FileSignature {
        path: path.to_path_buf(),
        size_bytes: metadata.len(),
        dimensions: None,
        capture_time: None,
        modified_time: metadata.modified()?,
        camera: None,
        content_hash: None,
        perceptual_fingerprint: None,
    };

    if options.want_hash {
        match content_hash(path) {
            Ok(hash) => signature.content_hash = Some(hash.to_hex().to_string()),
            Err(e) => warn!("Could not hash {}: {}", path.display(), e),
        }
    }

    if options.want_capture_metadata || options.want_visual {
        let decode_path = path.to_path_buf();
        match run_with_deadline(path, "image-decode", decode_timeout, move || {
            decode_fields(&decode_path, options)
        }) {
            Ok(fields) => {
                signature.dimensions = fields.dimensions;
                signature.perceptual_fingerprint = fields.fingerprint;
                if let Some(capture) = fields.capture {
                    signature.capture_time = capture.capture_time;
                    if !capture.camera.is_empty() {
                        signature.camera = Some(capture.camera);
                    }
                }
            }
            // Sub-timeout: keep whatever was populated from the stat
            Err(_) => {}
        }
    }

    Ok(signature)
}

fn decode_fields(path: &Path, options: ExtractOptions) -> DecodedFields {
    let mut fields = DecodedFields::default();

    match image::open(path) {
        Ok(img) => {
            fields.dimensions = Some(img.dimensions());
            if options.want_visual {
                fields.fingerprint = Some(perceptual::fingerprint(&img));
            }
        }
        Err(e) => debug!("Could not decode {} as an image: {}", path.display(), e),
    }

    if options.want_capture_metadata {
        fields.capture = capture::read_capture_data(path);
    }

    fields
}

// -- Tests --
