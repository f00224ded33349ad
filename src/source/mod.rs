//! File-reading collaborator.
//!
//! The pipeline never reads the filesystem directly; it goes through
//! [`FileReader`] so hosts can substitute their own content source and tests
//! can run against an in-memory map. The bundled [`FsReader`] handles BOMs and
//! non-UTF-8 files by detecting the encoding and decoding with replacement.

use std::collections::HashMap;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::domain::{LineRange, StashError};

pub trait FileReader {
    /// Read `path`, optionally sliced to an inclusive zero-indexed line range.
    /// An inaccessible path is a per-item recoverable failure for callers, not
    /// a pipeline-level fault.
    fn read(&self, path: &str, range: Option<LineRange>) -> Result<String, StashError>;
}

/// Filesystem-backed reader with encoding detection.
#[derive(Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, path: &str, range: Option<LineRange>) -> Result<String, StashError> {
        let bytes = std::fs::read(Path::new(path))
            .map_err(|source| StashError::Read { path: path.to_string(), source })?;
        let content = decode_bytes(&bytes);
        Ok(apply_range(&content, range))
    }
}

/// Decode file bytes to text.
///
/// UTF-8 strict first (the common case), then BOM markers, then a chardetng
/// guess; invalid sequences decode to replacement characters rather than
/// failing the read.
fn decode_bytes(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        // Strip a UTF-8 BOM if present.
        return text.strip_prefix('\u{feff}').unwrap_or(text).to_string();
    }

    let encoding = detect_encoding(bytes);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if bytes.starts_with(&[0xff, 0xfe]) {
        return encoding_rs::UTF_16LE;
    }
    if bytes.starts_with(&[0xfe, 0xff]) {
        return encoding_rs::UTF_16BE;
    }

    let mut detector = EncodingDetector::new();
    let sample = &bytes[..bytes.len().min(8192)];
    detector.feed(sample, true);
    detector.guess(None, true)
}

/// Slice `content` to an inclusive zero-indexed line range. Bounds past the
/// end of the file clamp rather than fail.
fn apply_range(content: &str, range: Option<LineRange>) -> String {
    let Some(range) = range else {
        return content.to_string();
    };

    let selected: Vec<&str> = content
        .lines()
        .skip(range.start)
        .take(range.end - range.start + 1)
        .collect();
    let mut output = selected.join("\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

/// In-memory reader for tests and host embedding.
#[derive(Default)]
pub struct MemoryReader {
    files: HashMap<String, String>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl FileReader for MemoryReader {
    fn read(&self, path: &str, range: Option<LineRange>) -> Result<String, StashError> {
        match self.files.get(path) {
            Some(content) => Ok(apply_range(content, range)),
            None => Err(StashError::Read {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn range(start: usize, end: usize) -> LineRange {
        LineRange::new(start, end).expect("valid range")
    }

    #[test]
    fn reads_whole_file() {
        let mut file = NamedTempFile::new().expect("tmp file");
        file.write_all(b"alpha\nbeta\ngamma\n").expect("write");
        let path = file.path().to_str().expect("utf8 path");
        let content = FsReader.read(path, None).expect("read");
        assert_eq!(content, "alpha\nbeta\ngamma\n");
    }

    #[test]
    fn range_is_zero_indexed_inclusive() {
        let mut file = NamedTempFile::new().expect("tmp file");
        file.write_all(b"l0\nl1\nl2\nl3\n").expect("write");
        let path = file.path().to_str().expect("utf8 path");
        let content = FsReader.read(path, Some(range(1, 2))).expect("read");
        assert_eq!(content, "l1\nl2\n");
    }

    #[test]
    fn range_past_eof_clamps() {
        let mut file = NamedTempFile::new().expect("tmp file");
        file.write_all(b"only\n").expect("write");
        let path = file.path().to_str().expect("utf8 path");
        let content = FsReader.read(path, Some(range(0, 99))).expect("read");
        assert_eq!(content, "only\n");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = FsReader.read("/definitely/not/here.txt", None).unwrap_err();
        assert!(matches!(err, StashError::Read { .. }));
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut file = NamedTempFile::new().expect("tmp file");
        file.write_all(&[0xef, 0xbb, 0xbf]).expect("write bom");
        file.write_all(b"hello").expect("write");
        let path = file.path().to_str().expect("utf8 path");
        let content = FsReader.read(path, None).expect("read");
        assert_eq!(content, "hello");
    }

    #[test]
    fn latin1_bytes_decode_with_detection() {
        let mut file = NamedTempFile::new().expect("tmp file");
        // "café" in Latin-1: the 0xe9 byte is invalid UTF-8.
        file.write_all(&[0x63, 0x61, 0x66, 0xe9]).expect("write");
        let path = file.path().to_str().expect("utf8 path");
        let content = FsReader.read(path, None).expect("read");
        assert!(content.starts_with("caf"));
        assert_eq!(content.chars().count(), 4);
    }

    #[test]
    fn memory_reader_serves_ranges() {
        let mut reader = MemoryReader::new();
        reader.insert("/virtual/a.txt", "x\ny\nz\n");
        assert_eq!(reader.read("/virtual/a.txt", Some(range(2, 2))).expect("read"), "z\n");
        assert!(reader.read("/virtual/missing", None).is_err());
    }
}
