//! Date-taken inspection
//!
//! An image counts as dated when its metadata holds `DateTimeOriginal` or
//! `DateTimeDigitized` stored as ASCII text. The text itself is never parsed.
//!
//! # Architecture
//!
//! - **MetadataBackend**: decodes a file into a `MetadataView`. The backend is
//!   created once per scan and shared by every inspection.
//! - **MetadataView**: owned, per-file tag table. Dropped when the inspection ends.
//! - **DateTagInspector**: applies the date rules on top of any backend.

mod exif_backend;

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::DecodeError;

pub use exif_backend::ExifBackend;

/// The two tags that can carry a date taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DateTag {
    DateTimeOriginal,
    DateTimeDigitized,
}

impl DateTag {
    /// Checked in this order.
    pub const ALL: [DateTag; 2] = [DateTag::DateTimeOriginal, DateTag::DateTimeDigitized];

    /// Numeric tag ID within the Exif IFD.
    pub fn number(self) -> u16 {
        match self {
            DateTag::DateTimeOriginal => 0x9003,
            DateTag::DateTimeDigitized => 0x9004,
        }
    }

    /// The only storage type that counts as a valid date.
    pub fn expected_type(self) -> TagType {
        TagType::Ascii
    }

    pub fn name(self) -> &'static str {
        match self {
            DateTag::DateTimeOriginal => "DateTimeOriginal",
            DateTag::DateTimeDigitized => "DateTimeDigitized",
        }
    }
}

impl fmt::Display for DateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared storage type of a metadata value, as numbered by TIFF/EXIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    SByte,
    Undefined,
    SShort,
    SLong,
    SRational,
    Float,
    Double,
    Unknown(u16),
}

impl TagType {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => TagType::Byte,
            2 => TagType::Ascii,
            3 => TagType::Short,
            4 => TagType::Long,
            5 => TagType::Rational,
            6 => TagType::SByte,
            7 => TagType::Undefined,
            8 => TagType::SShort,
            9 => TagType::SLong,
            10 => TagType::SRational,
            11 => TagType::Float,
            12 => TagType::Double,
            other => TagType::Unknown(other),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            TagType::Byte => 1,
            TagType::Ascii => 2,
            TagType::Short => 3,
            TagType::Long => 4,
            TagType::Rational => 5,
            TagType::SByte => 6,
            TagType::Undefined => 7,
            TagType::SShort => 8,
            TagType::SLong => 9,
            TagType::SRational => 10,
            TagType::Float => 11,
            TagType::Double => 12,
            TagType::Unknown(code) => code,
        }
    }
}

/// A raw tag value: its declared type and its payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    pub ty: TagType,
    pub bytes: Vec<u8>,
}

/// Read access to one decoded metadata directory.
pub trait MetadataView {
    /// Look up a date tag in the primary image. `None` when absent.
    fn get_tag(&self, tag: DateTag) -> Option<TagValue>;
}

/// Decodes image files into metadata views.
///
/// Implementors hold whatever long-lived state decoding needs and must be
/// shareable across inspection threads.
pub trait MetadataBackend: Send + Sync {
    type View: MetadataView;

    /// Open `path` and read its metadata directory.
    fn decode(&self, path: &Path) -> Result<Self::View, DecodeError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// How a single date tag looked in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagStatus {
    Present,
    Absent,
    /// Right tag ID, wrong declared type. Treated as absent.
    TypeMismatch(TagType),
}

impl TagStatus {
    pub fn of(value: Option<&TagValue>, tag: DateTag) -> Self {
        match value {
            None => TagStatus::Absent,
            Some(v) if v.ty == tag.expected_type() => TagStatus::Present,
            Some(v) => TagStatus::TypeMismatch(v.ty),
        }
    }
}

/// Outcome of inspecting one candidate file.
#[derive(Debug)]
pub enum Inspection {
    /// The first tag found present with the right type
    Dated(DateTag),
    Undated,
    Undecodable(DecodeError),
}

impl Inspection {
    pub fn has_date(&self) -> bool {
        matches!(self, Inspection::Dated(_))
    }
}

/// Checks candidate images for a date-taken tag.
pub struct DateTagInspector<B = ExifBackend> {
    backend: B,
}

impl<B: MetadataBackend> DateTagInspector<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Inspect a file and report which tag, if any, dates it.
    pub fn inspect(&self, path: &Path) -> Inspection {
        let view = match self.backend.decode(path) {
            Ok(view) => view,
            Err(e) => {
                debug!(backend = self.backend.name(), "{}", e);
                return Inspection::Undecodable(e);
            }
        };

        for tag in DateTag::ALL {
            match TagStatus::of(view.get_tag(tag).as_ref(), tag) {
                TagStatus::Present => return Inspection::Dated(tag),
                TagStatus::TypeMismatch(ty) => {
                    debug!(
                        path = %path.display(),
                        tag = tag.name(),
                        type_code = ty.code(),
                        "date tag has wrong type, ignoring"
                    );
                }
                TagStatus::Absent => {}
            }
        }

        Inspection::Undated
    }

    /// `Ok(true)` when either date tag is present as ASCII text.
    pub fn has_date_taken(&self, path: &Path) -> Result<bool, DecodeError> {
        match self.inspect(path) {
            Inspection::Dated(_) => Ok(true),
            Inspection::Undated => Ok(false),
            Inspection::Undecodable(e) => Err(e),
        }
    }
}

impl DateTagInspector<ExifBackend> {
    /// Inspector backed by a fresh [`ExifBackend`].
    pub fn with_exif() -> Self {
        Self::new(ExifBackend::new())
    }
}

impl Default for DateTagInspector<ExifBackend> {
    fn default() -> Self {
        Self::with_exif()
    }
}
