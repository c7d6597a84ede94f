use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::DEFAULT_MAX_TEXT_CHARS;
use crate::error::{DocseekError, Result};

mod formats;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedDocument {
    pub title: String,
    pub extracted_text: String,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Turns a file on disk into plain text. PDF and image decoding (OCR) are
/// expected to live in an external implementation of this trait.
pub trait DocumentImporter: Send + Sync {
    fn import(&self, path: &Path) -> Result<ImportedDocument>;
}

/// Plain text needs at most four UTF-8 bytes per kept character; markup
/// formats get more room for tags and control words.
const PLAIN_BYTES_PER_CHAR: u64 = 4;
const MARKUP_BYTES_PER_CHAR: u64 = 16;

/// Importer for the formats that need no external decoder. Reads stop at a
/// byte bound derived from the text cap, so huge files are never loaded
/// whole.
#[derive(Debug, Clone, Copy)]
pub struct LocalFileImporter {
    max_text_chars: u64,
}

impl LocalFileImporter {
    #[must_use]
    pub fn new(max_text_chars: usize) -> Self {
        Self {
            max_text_chars: u64::try_from(max_text_chars).unwrap_or(u64::MAX),
        }
    }

    fn read_limit(&self, bytes_per_char: u64) -> u64 {
        self.max_text_chars.saturating_mul(bytes_per_char)
    }
}

impl Default for LocalFileImporter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEXT_CHARS)
    }
}

impl DocumentImporter for LocalFileImporter {
    fn import(&self, path: &Path) -> Result<ImportedDocument> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let plain_limit = self.read_limit(PLAIN_BYTES_PER_CHAR);
        let markup_limit = self.read_limit(MARKUP_BYTES_PER_CHAR);

        let extracted_text = match ext.as_str() {
            "txt" | "text" => formats::plain_text(&read_bounded(path, plain_limit)?),
            "md" | "markdown" => {
                formats::markdown_text(&formats::plain_text(&read_bounded(path, markup_limit)?))
            }
            "rtf" => formats::rtf_text(&formats::plain_text(&read_bounded(path, markup_limit)?)),
            "docx" => formats::docx_text(path, markup_limit)?,
            _ => {
                return Err(DocseekError::Unsupported(format!(
                    "no local decoder for .{ext}: {}",
                    path.display()
                )));
            }
        };

        Ok(ImportedDocument {
            title: title_from_path(path),
            extracted_text,
            last_modified: file_modified_at(path),
        })
    }
}

fn read_bounded(path: &Path, limit: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    File::open(path)?.take(limit).read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[must_use]
pub fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Source mtime truncated to whole milliseconds, the precision stored with
/// each record.
#[must_use]
pub fn file_modified_at(path: &Path) -> Option<DateTime<Utc>> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let ts = DateTime::<Utc>::from(modified);
    DateTime::<Utc>::from_timestamp_millis(ts.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn plain_text_is_read_lossily() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("notes.txt");
        std::fs::write(&path, b"budget \xff draft").expect("write");

        let doc = LocalFileImporter::default().import(&path).expect("import");
        assert_eq!(doc.title, "notes");
        assert_eq!(doc.extracted_text, "budget \u{FFFD} draft");
        assert!(doc.last_modified.is_some());
    }

    #[test]
    fn markdown_is_flattened_to_text() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("Q1 Report.md");
        std::fs::write(
            &path,
            "# Q1 Report\n\nRevenue grew **10%**.\n\n- costs fell\n- [details](http://x)\n",
        )
        .expect("write");

        let doc = LocalFileImporter::default().import(&path).expect("import");
        assert_eq!(doc.title, "Q1 Report");
        assert!(doc.extracted_text.contains("Q1 Report"));
        assert!(doc.extracted_text.contains("Revenue grew 10%."));
        assert!(doc.extracted_text.contains("details"));
        assert!(!doc.extracted_text.contains("**"));
        assert!(!doc.extracted_text.contains("http://x"));
    }

    #[test]
    fn pdf_and_images_are_unsupported() {
        let temp = tempdir().expect("tempdir");
        for name in ["scan.pdf", "photo.JPG", "shot.heic"] {
            let path = temp.path().join(name);
            std::fs::write(&path, b"binary").expect("write");
            let err = LocalFileImporter::default().import(&path).expect_err("unsupported");
            assert!(matches!(err, DocseekError::Unsupported(_)), "{name}");
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let temp = tempdir().expect("tempdir");
        let err = LocalFileImporter::default()
            .import(&temp.path().join("gone.txt"))
            .expect_err("missing");
        assert_eq!(err.code(), "IO_ERROR");
    }

    #[test]
    fn modified_time_has_millisecond_precision() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("a.txt");
        std::fs::write(&path, "x").expect("write");
        let ts = file_modified_at(&path).expect("mtime");
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000_000, 0);
        assert!(file_modified_at(&temp.path().join("nope.txt")).is_none());
    }

    #[test]
    fn reads_stop_at_the_byte_bound() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("huge.txt");
        std::fs::write(&path, "a".repeat(10_000)).expect("write");

        let doc = LocalFileImporter::new(5).import(&path).expect("import");
        assert_eq!(doc.extracted_text.len(), 20);
    }

    #[test]
    fn multibyte_text_keeps_every_char_under_the_cap() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("emoji.txt");
        std::fs::write(&path, "\u{1F600}".repeat(50)).expect("write");

        let doc = LocalFileImporter::new(3).import(&path).expect("import");
        assert_eq!(doc.extracted_text, "\u{1F600}".repeat(3));
    }
}
