//! EXIF backend built on the kamadak-exif reader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{Exif, In, Reader, Tag, Value};
use tracing::debug;

use super::{DateTag, MetadataBackend, MetadataView, TagType, TagValue};
use crate::error::DecodeError;

/// Reads the EXIF directory of JPEG, TIFF, PNG and the other containers
/// kamadak-exif understands. GIF and BMP have no EXIF container and fail
/// to decode.
///
/// Fields that fail to parse are dropped one by one instead of failing the
/// whole directory, so a broken MakerNote does not hide a valid date.
pub struct ExifBackend {
    reader: Reader,
}

impl ExifBackend {
    pub fn new() -> Self {
        let mut reader = Reader::new();
        reader.continue_on_error(true);
        Self { reader }
    }
}

impl Default for ExifBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoded EXIF of one file. `None` when the container is valid but
/// carries no EXIF block.
pub struct ExifView {
    exif: Option<Exif>,
}

impl MetadataBackend for ExifBackend {
    type View = ExifView;

    fn decode(&self, path: &Path) -> Result<ExifView, DecodeError> {
        let file = File::open(path).map_err(|source| DecodeError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        match self.reader.read_from_container(&mut reader) {
            Ok(exif) => Ok(ExifView { exif: Some(exif) }),
            Err(exif::Error::NotFound(_)) => Ok(ExifView { exif: None }),
            Err(exif::Error::PartialResult(partial)) => {
                let (exif, errors) = partial.into_inner();
                for error in &errors {
                    debug!(path = %path.display(), %error, "ignored malformed exif field");
                }
                Ok(ExifView { exif: Some(exif) })
            }
            Err(e) => Err(DecodeError::Metadata {
                path: path.to_path_buf(),
                source: Box::new(e),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "exif"
    }
}

impl MetadataView for ExifView {
    fn get_tag(&self, tag: DateTag) -> Option<TagValue> {
        let exif = self.exif.as_ref()?;
        let field = exif.get_field(exif_tag(tag), In::PRIMARY)?;
        Some(tag_value(&field.value))
    }
}

fn exif_tag(tag: DateTag) -> Tag {
    match tag {
        DateTag::DateTimeOriginal => Tag::DateTimeOriginal,
        DateTag::DateTimeDigitized => Tag::DateTimeDigitized,
    }
}

/// Flatten a parsed value back into its declared type and little-endian bytes.
fn tag_value(value: &Value) -> TagValue {
    fn le<T, const N: usize>(items: &[T], f: impl Fn(&T) -> [u8; N]) -> Vec<u8> {
        items.iter().flat_map(f).collect()
    }

    let (ty, bytes) = match value {
        Value::Byte(v) => (TagType::Byte, v.clone()),
        Value::Ascii(strings) => {
            let mut bytes = Vec::new();
            for s in strings {
                bytes.extend_from_slice(s);
                bytes.push(0);
            }
            (TagType::Ascii, bytes)
        }
        Value::Short(v) => (TagType::Short, le(v, |x| x.to_le_bytes())),
        Value::Long(v) => (TagType::Long, le(v, |x| x.to_le_bytes())),
        Value::Rational(v) => (
            TagType::Rational,
            v.iter()
                .flat_map(|r| [r.num.to_le_bytes(), r.denom.to_le_bytes()])
                .flatten()
                .collect(),
        ),
        Value::SByte(v) => (TagType::SByte, le(v, |x| x.to_le_bytes())),
        Value::Undefined(v, _) => (TagType::Undefined, v.clone()),
        Value::SShort(v) => (TagType::SShort, le(v, |x| x.to_le_bytes())),
        Value::SLong(v) => (TagType::SLong, le(v, |x| x.to_le_bytes())),
        Value::SRational(v) => (
            TagType::SRational,
            v.iter()
                .flat_map(|r| [r.num.to_le_bytes(), r.denom.to_le_bytes()])
                .flatten()
                .collect(),
        ),
        Value::Float(v) => (TagType::Float, le(v, |x| x.to_le_bytes())),
        Value::Double(v) => (TagType::Double, le(v, |x| x.to_le_bytes())),
        Value::Unknown(code, _, _) => (TagType::Unknown(*code), Vec::new()),
    };

    TagValue { ty, bytes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::{DateTagInspector, Inspection};
    use crate::test_utils::TestTree;
    use crate::test_utils::fixtures::{self, ExifEntry};

    const DATE: &[u8] = b"2019:07:14 09:30:00\0";

    #[test]
    fn test_tiff_with_original_date() {
        let tree = TestTree::new();
        let path = tree.add_file(
            "a.tif",
            &fixtures::tiff(&[ExifEntry::ascii(0x9003, DATE)]),
        );

        let view = ExifBackend::new().decode(&path).unwrap();
        let value = view.get_tag(DateTag::DateTimeOriginal).unwrap();
        assert_eq!(value.ty, TagType::Ascii);
        assert_eq!(value.bytes, DATE);
        assert!(view.get_tag(DateTag::DateTimeDigitized).is_none());
    }

    #[test]
    fn test_jpeg_with_digitized_date() {
        let tree = TestTree::new();
        let path = tree.add_file(
            "a.jpg",
            &fixtures::jpeg(&[ExifEntry::ascii(0x9004, DATE)]),
        );

        let inspector = DateTagInspector::with_exif();
        assert!(matches!(
            inspector.inspect(&path),
            Inspection::Dated(DateTag::DateTimeDigitized)
        ));
    }

    #[test]
    fn test_wrong_type_reported_as_declared() {
        let tree = TestTree::new();
        let path = tree.add_file(
            "a.jpg",
            &fixtures::jpeg(&[ExifEntry::undefined(0x9003, &DATE[..19])]),
        );

        let view = ExifBackend::new().decode(&path).unwrap();
        let value = view.get_tag(DateTag::DateTimeOriginal).unwrap();
        assert_eq!(value.ty, TagType::Undefined);

        let inspector = DateTagInspector::with_exif();
        assert!(!inspector.has_date_taken(&path).unwrap());
    }

    #[test]
    fn test_truncated_maker_note_keeps_date() {
        let tree = TestTree::new();
        let maker_note = ExifEntry::undefined(0x927c, &[0u8; 8]).with_count(4000);
        let path = tree.add_file(
            "a.jpg",
            &fixtures::jpeg(&[ExifEntry::ascii(0x9003, DATE), maker_note]),
        );

        let inspector = DateTagInspector::with_exif();
        assert!(matches!(
            inspector.inspect(&path),
            Inspection::Dated(DateTag::DateTimeOriginal)
        ));
    }

    #[test]
    fn test_png_with_exif_chunk() {
        let tree = TestTree::new();
        let dated = tree.add_file("dated.png", &fixtures::png(&[ExifEntry::ascii(0x9003, DATE)]));
        let plain = tree.add_file("plain.png", &fixtures::png_without_exif());

        let inspector = DateTagInspector::with_exif();
        assert!(matches!(
            inspector.inspect(&dated),
            Inspection::Dated(DateTag::DateTimeOriginal)
        ));
        assert!(matches!(inspector.inspect(&plain), Inspection::Undated));
    }

    #[test]
    fn test_malformed_date_text_still_counts() {
        let tree = TestTree::new();
        let path = tree.add_file(
            "a.jpg",
            &fixtures::jpeg(&[ExifEntry::ascii(0x9003, b"not a date at all\0")]),
        );

        assert!(DateTagInspector::with_exif().has_date_taken(&path).unwrap());
    }

    #[test]
    fn test_exif_without_date_tags() {
        let tree = TestTree::new();
        // ExposureTime only
        let path = tree.add_file(
            "a.jpg",
            &fixtures::jpeg(&[ExifEntry::rational(0x829a, 1, 125)]),
        );

        assert!(!DateTagInspector::with_exif().has_date_taken(&path).unwrap());
    }

    #[test]
    fn test_undecodable_files() {
        let tree = TestTree::new();
        let gif = tree.add_file("broken.gif", b"GIF89a\x00\x00garbage");
        let missing = tree.path().join("missing.jpg");

        let inspector = DateTagInspector::with_exif();
        assert!(inspector.has_date_taken(&gif).is_err());
        assert!(matches!(
            inspector.has_date_taken(&missing),
            Err(DecodeError::Open { .. })
        ));
    }

    #[test]
    fn test_jpeg_without_exif_has_no_date() {
        let tree = TestTree::new();
        let path = tree.add_file("plain.jpg", &fixtures::jpeg_without_exif());

        assert!(!DateTagInspector::with_exif().inspect(&path).has_date());
    }

    #[test]
    fn test_tag_value_flattening() {
        let v = tag_value(&Value::Short(vec![1, 0x0203]));
        assert_eq!(v.ty, TagType::Short);
        assert_eq!(v.bytes, vec![1, 0, 3, 2]);

        let v = tag_value(&Value::Ascii(vec![b"ab".to_vec(), b"c".to_vec()]));
        assert_eq!(v.ty, TagType::Ascii);
        assert_eq!(v.bytes, b"ab\0c\0".to_vec());
    }
}
