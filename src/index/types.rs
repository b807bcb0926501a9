use serde::Serialize;
use std::path::{Path, PathBuf};

/// Identifies one indexing epoch. Bumped by every invalidate and every new build.
pub type IndexGeneration = u64;

/// One successfully indexed text file.
///
/// Built once by the loader and never mutated afterwards. `lines` holds the
/// original-case text (each line capped in length) for display, while
/// `lower_buffer` holds the whole case-folded content used as the haystack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFile {
    path: PathBuf,
    display_name: String,
    lines: Vec<String>,
    lower_buffer: Vec<u8>,
    line_offsets: Vec<usize>,
}

impl IndexedFile {
    /// Build an entry from decoded file content.
    pub fn from_content(path: PathBuf, content: &str, max_line_chars: usize) -> Self {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let lower_buffer = content.to_lowercase().into_bytes();
        let line_offsets = build_line_map(&lower_buffer);
        let lines = split_lines(content, max_line_chars);
        debug_assert_eq!(lines.len(), line_offsets.len());

        Self {
            path,
            display_name,
            lines,
            lower_buffer,
            line_offsets,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn lower_buffer(&self) -> &[u8] {
        &self.lower_buffer
    }

    pub fn line_offsets(&self) -> &[usize] {
        &self.line_offsets
    }

    /// Line index containing byte `offset` of the lowercased buffer
    /// (largest `i` with `line_offsets[i] <= offset`).
    #[inline]
    pub fn line_index_for_offset(&self, offset: usize) -> usize {
        // line_offsets[0] == 0, so the partition point is always >= 1
        self.line_offsets.partition_point(|&start| start <= offset) - 1
    }

    /// Start offset of the line after `line`, if any.
    #[inline]
    pub fn next_line_start(&self, line: usize) -> Option<usize> {
        self.line_offsets.get(line + 1).copied()
    }
}

/// Build line offset map from lowercased content.
///
/// A trailing newline does not open a new line, so the map has exactly one
/// entry per line produced by [`split_lines`].
fn build_line_map(content: &[u8]) -> Vec<usize> {
    let mut offsets = vec![0];
    offsets.extend(
        memchr::memchr_iter(b'\n', content)
            .map(|i| i + 1)
            .filter(|&start| start < content.len()),
    );
    offsets
}

/// Split content into display lines, each capped at `max_chars` characters.
fn split_lines(content: &str, max_chars: usize) -> Vec<String> {
    let body = content.strip_suffix('\n').unwrap_or(content);
    body.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            match line.char_indices().nth(max_chars) {
                Some((cut, _)) => line[..cut].to_string(),
                None => line.to_string(),
            }
        })
        .collect()
}

/// A single line-level hit returned by the query engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub file_path: PathBuf,
    pub file_display_name: String,
    /// 1-based line number
    pub line_number: usize,
    /// Original-case line text, possibly truncated
    pub line_text: String,
    /// Byte offset of the match within the case-folded line
    pub match_byte_offset: usize,
    /// The match lies past the stored line text, so `line_text` does not show it
    pub truncated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content: &str) -> IndexedFile {
        IndexedFile::from_content(PathBuf::from("/tmp/x.txt"), content, 300)
    }

    #[test]
    fn test_line_offsets_basic() {
        let f = file("abc\ndef\nghi");
        assert_eq!(f.line_offsets(), &[0, 4, 8]);
        assert_eq!(f.lines(), &["abc", "def", "ghi"]);
        assert_eq!(f.line_index_for_offset(5), 1);
        assert_eq!(f.lines()[f.line_index_for_offset(5)], "def");
    }

    #[test]
    fn test_line_index_boundaries() {
        let f = file("abc\ndef\nghi");
        assert_eq!(f.line_index_for_offset(0), 0);
        assert_eq!(f.line_index_for_offset(3), 0); // the newline belongs to line 0
        assert_eq!(f.line_index_for_offset(4), 1);
        assert_eq!(f.line_index_for_offset(10), 2);
        assert_eq!(f.next_line_start(0), Some(4));
        assert_eq!(f.next_line_start(2), None);
    }

    #[test]
    fn test_trailing_newline_and_empty() {
        let f = file("abc\n");
        assert_eq!(f.lines(), &["abc"]);
        assert_eq!(f.line_offsets(), &[0]);

        let empty = file("");
        assert_eq!(empty.lines(), &[""]);
        assert_eq!(empty.line_offsets(), &[0]);

        let blank = file("a\n\nb\n");
        assert_eq!(blank.lines(), &["a", "", "b"]);
        assert_eq!(blank.line_offsets(), &[0, 2, 3]);
    }

    #[test]
    fn test_crlf_lines() {
        let f = file("one\r\ntwo\r\n");
        assert_eq!(f.lines(), &["one", "two"]);
        assert_eq!(f.line_offsets(), &[0, 5]);
    }

    #[test]
    fn test_lowercase_buffer_covers_full_content() {
        let long = "X".repeat(400);
        let f = file(&format!("Hello\n{}", long));
        assert_eq!(&f.lower_buffer()[..5], b"hello");
        assert_eq!(f.lower_buffer().len(), 6 + 400);
        assert_eq!(f.lines()[1].chars().count(), 300);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let line = "é".repeat(310);
        let f = file(&line);
        assert_eq!(f.lines()[0].chars().count(), 300);
        assert_eq!(f.lines()[0].len(), 600);
    }

    #[test]
    fn test_display_name() {
        let f = IndexedFile::from_content(PathBuf::from("/project/src/main.rs"), "fn main() {}", 300);
        assert_eq!(f.display_name(), "main.rs");
        assert_eq!(f.path(), Path::new("/project/src/main.rs"));
    }
}
