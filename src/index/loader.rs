use crate::config::IndexConfig;
use crate::index::types::IndexedFile;
use log::trace;
use std::fs;
use std::path::Path;

/// Reads files into [`IndexedFile`] entries.
///
/// Oversized, unreadable and non-UTF-8 files are all answered with `None`:
/// their absence from the index is the expected outcome, not a fault.
#[derive(Debug, Clone, Copy)]
pub struct FileLoader {
    max_file_size: u64,
    max_line_chars: usize,
}

impl FileLoader {
    pub fn new(max_file_size: u64, max_line_chars: usize) -> Self {
        Self {
            max_file_size,
            max_line_chars,
        }
    }

    pub fn from_config(config: &IndexConfig) -> Self {
        Self::new(config.max_file_size, config.max_line_chars)
    }

    /// Load one file from disk.
    pub fn load(&self, path: &Path) -> Option<IndexedFile> {
        // Check size before reading so a huge file never gets pulled into memory
        let size = fs::metadata(path).ok()?.len();
        if size > self.max_file_size {
            trace!("skipping {} ({} bytes)", path.display(), size);
            return None;
        }

        let content = match fs::read(path) {
            Ok(c) => c,
            Err(e) => {
                trace!("skipping {}: {}", path.display(), e);
                return None;
            }
        };

        self.load_bytes(path, content)
    }

    /// Build an entry from bytes already in memory.
    pub fn load_bytes(&self, path: &Path, content: Vec<u8>) -> Option<IndexedFile> {
        // The file may have grown between stat and read
        if content.len() as u64 > self.max_file_size {
            return None;
        }

        let text = match String::from_utf8(content) {
            Ok(t) => t,
            Err(_) => {
                trace!("skipping {}: not UTF-8", path.display());
                return None;
            }
        };

        Some(IndexedFile::from_content(
            path.to_path_buf(),
            &text,
            self.max_line_chars,
        ))
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::from_config(&IndexConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_load_bytes_text() {
        let loader = FileLoader::default();
        let file = loader
            .load_bytes(Path::new("/p/a.txt"), b"Hello World\nhello again".to_vec())
            .unwrap();
        assert_eq!(file.lines(), &["Hello World", "hello again"]);
        assert_eq!(file.lower_buffer(), b"hello world\nhello again");
        assert_eq!(file.line_offsets(), &[0, 12]);
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        let loader = FileLoader::default();
        assert!(loader
            .load_bytes(Path::new("/p/blob.bin"), vec![0xff, 0xfe, 0x00, 0x41])
            .is_none());
    }

    #[test]
    fn test_size_cap() {
        let loader = FileLoader::new(10, 300);
        assert!(loader.load_bytes(Path::new("/p/ok"), b"0123456789".to_vec()).is_some());
        assert!(loader.load_bytes(Path::new("/p/big"), b"0123456789a".to_vec()).is_none());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let small = dir.path().join("small.txt");
        let large = dir.path().join("large.txt");
        fs::write(&small, "x".repeat(400_000)).unwrap();
        fs::write(&large, "x".repeat(600_000)).unwrap();

        let loader = FileLoader::default();
        assert!(loader.load(&small).is_some());
        assert!(loader.load(&large).is_none());
    }

    #[test]
    fn test_missing_file() {
        let loader = FileLoader::default();
        assert!(loader.load(&PathBuf::from("/definitely/not/here.txt")).is_none());
    }

    #[test]
    fn test_line_cap_from_config() {
        let config = IndexConfig {
            max_line_chars: 5,
            ..IndexConfig::default()
        };
        let loader = FileLoader::from_config(&config);
        let file = loader
            .load_bytes(Path::new("/p/a.txt"), b"abcdefgh\nxy".to_vec())
            .unwrap();
        assert_eq!(file.lines(), &["abcde", "xy"]);
        assert_eq!(file.lower_buffer().len(), 11);
    }
}
