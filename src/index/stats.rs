use crate::index::ignore::extension_of;
use crate::index::store::{IndexStore, Snapshot};
use crate::index::types::IndexGeneration;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Summary of what is currently searchable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub generation: IndexGeneration,
    pub building: bool,
    pub files: usize,
    pub lines: usize,
    pub indexed_bytes: u64,
    /// File counts per extension, most common first
    pub extensions: Vec<(String, usize)>,
}

impl IndexStats {
    pub fn collect(store: &IndexStore) -> Self {
        // Read the flag first: a build finishing in between only makes the
        // counts newer than the flag suggests
        let building = store.is_indexing();
        Self::from_snapshot(&store.snapshot(), building)
    }

    pub fn from_snapshot(snapshot: &Snapshot, building: bool) -> Self {
        let mut ext_counts: HashMap<String, usize> = HashMap::new();
        let mut lines = 0;
        let mut indexed_bytes = 0u64;

        for file in snapshot.iter() {
            lines += file.lines().len();
            indexed_bytes += file.lower_buffer().len() as u64;
            let ext = extension_of(file.display_name());
            let key = if ext.is_empty() {
                "(none)".to_string()
            } else {
                ext.to_lowercase()
            };
            *ext_counts.entry(key).or_insert(0) += 1;
        }

        let mut extensions: Vec<_> = ext_counts.into_iter().collect();
        extensions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            generation: snapshot.generation(),
            building,
            files: snapshot.len(),
            lines,
            indexed_bytes,
            extensions,
        }
    }
}

/// Display index statistics
pub fn show_stats(root: &Path, stats: &IndexStats) {
    println!("Index Statistics");
    println!("================");
    println!();
    println!("Root path:        {}", root.display());
    println!("Generation:       {}", stats.generation);
    println!(
        "Status:           {}",
        if stats.building { "indexing" } else { "complete" }
    );
    println!("Files:            {}", stats.files);
    println!("Lines:            {}", stats.lines);
    println!("Indexed size:     {}", format_size(stats.indexed_bytes));

    if stats.extensions.is_empty() {
        return;
    }

    println!();
    println!("Files by extension:");
    for (ext, count) in stats.extensions.iter().take(15) {
        println!("  {:15} {}", ext, count);
    }

    if stats.extensions.len() > 15 {
        println!("  ... and {} more", stats.extensions.len() - 15);
    }
}

/// Format byte size to human readable
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::IndexedFile;
    use std::path::PathBuf;

    fn file(name: &str, content: &str) -> IndexedFile {
        IndexedFile::from_content(PathBuf::from(format!("/p/{}", name)), content, 300)
    }

    #[test]
    fn test_collect_counts() {
        let store = IndexStore::new();
        let generation = store.begin_build();
        store.publish_batch(
            generation,
            vec![
                file("a.rs", "one\ntwo"),
                file("b.rs", "three"),
                file("README", "docs\n"),
            ],
        );

        let stats = IndexStats::collect(&store);
        assert_eq!(stats.generation, generation);
        assert!(stats.building);
        assert_eq!(stats.files, 3);
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.indexed_bytes, 7 + 5 + 5);
        assert_eq!(
            stats.extensions,
            vec![("rs".to_string(), 2), ("(none)".to_string(), 1)]
        );
    }

    #[test]
    fn test_empty_store() {
        let stats = IndexStats::collect(&IndexStore::new());
        assert_eq!(stats, IndexStats::default());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
