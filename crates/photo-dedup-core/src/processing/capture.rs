//! Capture metadata extraction from embedded EXIF tags.
//!
//! Per-field parse failures are swallowed individually: a tag that cannot be
//! read leaves its field absent without failing the extraction.

use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::types::CameraFields;

/// EXIF datetime layout, e.g. `2021:07:04 18:22:05`
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Capture-time facts read from one file
#[derive(Debug, Clone, Default)]
pub struct CaptureData {
    pub capture_time: Option<NaiveDateTime>,
    pub camera: CameraFields,
}

/// Read capture metadata from a file, returning `None` when the file carries
/// no parseable EXIF container at all
pub fn read_capture_data(path: &Path) -> Option<CaptureData> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = Reader::new().read_from_container(&mut reader).ok()?;

    let mut data = CaptureData::default();

    // DateTimeOriginal is the shutter moment; DateTime is a fallback that
    // some editors rewrite
    data.capture_time = ascii_field(&exif, Tag::DateTimeOriginal)
        .or_else(|| ascii_field(&exif, Tag::DateTime))
        .and_then(|raw| NaiveDateTime::parse_from_str(&raw, EXIF_DATETIME_FORMAT).ok());

    data.camera.make = ascii_field(&exif, Tag::Make);
    data.camera.model = ascii_field(&exif, Tag::Model);
    data.camera.focal_length = display_field(&exif, Tag::FocalLength);
    data.camera.iso = display_field(&exif, Tag::PhotographicSensitivity);
    data.camera.exposure_time = display_field(&exif, Tag::ExposureTime);
    data.camera.f_number = display_field(&exif, Tag::FNumber);
    data.camera.flash = display_field(&exif, Tag::Flash);
    data.camera.orientation = display_field(&exif, Tag::Orientation);

    Some(data)
}

/// Read an ASCII tag as a trimmed string
fn ascii_field(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(chunks) => chunks.first().map(|bytes| {
            String::from_utf8_lossy(bytes).trim().to_string()
        }),
        _ => None,
    }
    .filter(|s| !s.is_empty())
}

/// Render any tag through its display form
fn display_field(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let rendered = field.display_value().to_string();
    if rendered.is_empty() {
        None
    } else {
        Some(rendered)
    }
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_image_files_yield_no_capture_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-photo.jpg");
        std::fs::write(&path, b"plain text pretending to be a photo").unwrap();

        assert!(read_capture_data(&path).is_none());
    }

    #[test]
    fn missing_file_yields_no_capture_data() {
        assert!(read_capture_data(Path::new("/no/such/photo.jpg")).is_none());
    }

    #[test]
    fn exif_datetime_format_parses() {
        let parsed = NaiveDateTime::parse_from_str("2021:07:04 18:22:05", EXIF_DATETIME_FORMAT);
        assert!(parsed.is_ok());
    }
}
