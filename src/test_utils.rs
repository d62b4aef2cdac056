//! Test utilities for building photo trees on disk.
//!
//! This module is only compiled for tests, benchmarks, and the `test-utils` feature.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// The tree is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &[u8]) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create an empty directory (and its parents).
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// JPEG whose Exif IFD holds an ASCII `DateTimeOriginal`.
    pub fn add_dated_jpeg(&self, path: &str) -> PathBuf {
        self.add_file(
            path,
            &fixtures::jpeg(&[fixtures::ExifEntry::ascii(
                fixtures::DATE_TIME_ORIGINAL,
                fixtures::SAMPLE_DATE,
            )]),
        )
    }

    /// JPEG with an Exif IFD but no date tags.
    pub fn add_undated_jpeg(&self, path: &str) -> PathBuf {
        self.add_file(
            path,
            &fixtures::jpeg(&[fixtures::ExifEntry::rational(0x829a, 1, 60)]),
        )
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte-level builders for little-endian TIFF and JPEG files carrying
/// chosen Exif IFD entries.
pub mod fixtures {
    pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
    pub const DATE_TIME_DIGITIZED: u16 = 0x9004;
    pub const SAMPLE_DATE: &[u8] = b"2020:05:17 14:02:33\0";

    const EXIF_IFD_POINTER: u16 = 0x8769;
    const TYPE_ASCII: u16 = 2;
    const TYPE_LONG: u16 = 4;
    const TYPE_RATIONAL: u16 = 5;
    const TYPE_UNDEFINED: u16 = 7;

    /// One entry of the Exif IFD.
    #[derive(Debug, Clone)]
    pub struct ExifEntry {
        pub tag: u16,
        pub ty: u16,
        pub count: u32,
        pub data: Vec<u8>,
    }

    impl ExifEntry {
        /// ASCII value; `text` should include its trailing NUL.
        pub fn ascii(tag: u16, text: &[u8]) -> Self {
            Self {
                tag,
                ty: TYPE_ASCII,
                count: text.len() as u32,
                data: text.to_vec(),
            }
        }

        pub fn undefined(tag: u16, bytes: &[u8]) -> Self {
            Self {
                tag,
                ty: TYPE_UNDEFINED,
                count: bytes.len() as u32,
                data: bytes.to_vec(),
            }
        }

        pub fn long(tag: u16, value: u32) -> Self {
            Self {
                tag,
                ty: TYPE_LONG,
                count: 1,
                data: value.to_le_bytes().to_vec(),
            }
        }

        /// Declare a different count than the data holds, e.g. to point a
        /// value past the end of the file.
        pub fn with_count(mut self, count: u32) -> Self {
            self.count = count;
            self
        }

        pub fn rational(tag: u16, num: u32, denom: u32) -> Self {
            let mut data = num.to_le_bytes().to_vec();
            data.extend_from_slice(&denom.to_le_bytes());
            Self {
                tag,
                ty: TYPE_RATIONAL,
                count: 1,
                data,
            }
        }
    }

    fn push_u16(buf: &mut Vec<u8>, v: u16) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn push_u32(buf: &mut Vec<u8>, v: u32) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Little-endian TIFF: IFD0 holds only the Exif IFD pointer, the Exif IFD
    /// holds `entries`, values longer than four bytes follow both IFDs.
    pub fn tiff(entries: &[ExifEntry]) -> Vec<u8> {
        let exif_ifd: u32 = 8 + 2 + 12 + 4;
        let data_start = exif_ifd + 2 + 12 * entries.len() as u32 + 4;

        let mut buf = Vec::new();
        buf.extend_from_slice(b"II");
        push_u16(&mut buf, 42);
        push_u32(&mut buf, 8);

        // IFD0
        push_u16(&mut buf, 1);
        push_u16(&mut buf, EXIF_IFD_POINTER);
        push_u16(&mut buf, TYPE_LONG);
        push_u32(&mut buf, 1);
        push_u32(&mut buf, exif_ifd);
        push_u32(&mut buf, 0);

        // Exif IFD
        let mut data_area = Vec::new();
        push_u16(&mut buf, entries.len() as u16);
        for entry in entries {
            push_u16(&mut buf, entry.tag);
            push_u16(&mut buf, entry.ty);
            push_u32(&mut buf, entry.count);
            if entry.data.len() <= 4 {
                let mut inline = entry.data.clone();
                inline.resize(4, 0);
                buf.extend_from_slice(&inline);
            } else {
                push_u32(&mut buf, data_start + data_area.len() as u32);
                data_area.extend_from_slice(&entry.data);
                if data_area.len() % 2 == 1 {
                    data_area.push(0);
                }
            }
        }
        push_u32(&mut buf, 0);

        buf.extend_from_slice(&data_area);
        buf
    }

    /// Minimal JPEG: SOI, an APP1 Exif segment wrapping [`tiff`], EOI.
    pub fn jpeg(entries: &[ExifEntry]) -> Vec<u8> {
        let tiff = tiff(entries);
        let mut buf = vec![0xFF, 0xD8, 0xFF, 0xE1];
        let len = (2 + 6 + tiff.len()) as u16;
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(b"Exif\0\0");
        buf.extend_from_slice(&tiff);
        buf.extend_from_slice(&[0xFF, 0xD9]);
        buf
    }

    /// Minimal JPEG with a JFIF APP0 segment and no Exif segment.
    pub fn jpeg_without_exif() -> Vec<u8> {
        let mut buf = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        buf.extend_from_slice(b"JFIF\0");
        buf.extend_from_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
        buf.extend_from_slice(&[0xFF, 0xD9]);
        buf
    }

    /// Minimal 1x1 RGB PNG whose `eXIf` chunk wraps [`tiff`].
    pub fn png(entries: &[ExifEntry]) -> Vec<u8> {
        png_with_chunks(Some(&tiff(entries)))
    }

    /// Minimal 1x1 RGB PNG with no `eXIf` chunk.
    pub fn png_without_exif() -> Vec<u8> {
        png_with_chunks(None)
    }

    fn png_with_chunks(exif: Option<&[u8]>) -> Vec<u8> {
        let mut buf = b"\x89PNG\r\n\x1a\n".to_vec();

        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&1u32.to_be_bytes());
        ihdr.extend_from_slice(&1u32.to_be_bytes());
        // bit depth 8, truecolour, deflate, adaptive filter, no interlace
        ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);
        push_chunk(&mut buf, b"IHDR", &ihdr);

        if let Some(tiff) = exif {
            push_chunk(&mut buf, b"eXIf", tiff);
        }
        push_chunk(&mut buf, b"IEND", &[]);
        buf
    }

    fn push_chunk(buf: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
        buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
        let start = buf.len();
        buf.extend_from_slice(kind);
        buf.extend_from_slice(data);
        let crc = crc32(&buf[start..]);
        buf.extend_from_slice(&crc.to_be_bytes());
    }

    /// CRC-32 as used by PNG chunks (reflected, polynomial 0xEDB88320).
    fn crc32(bytes: &[u8]) -> u32 {
        let mut crc = !0u32;
        for &b in bytes {
            crc ^= b as u32;
            for _ in 0..8 {
                crc = if crc & 1 == 1 {
                    (crc >> 1) ^ 0xEDB8_8320
                } else {
                    crc >> 1
                };
            }
        }
        !crc
    }

    /// Bytes that no image decoder accepts.
    pub fn corrupt(magic: &[u8]) -> Vec<u8> {
        let mut buf = magic.to_vec();
        buf.extend_from_slice(b"\x00\x01truncated-and-corrupt");
        buf
    }

}
