use crate::config::{DEFAULT_MAX_RESULTS, DEFAULT_PER_FILE_CAP};
use crate::index::types::{IndexedFile, SearchResult};
use crate::query::parser::parse_query;
use memchr::memmem::Finder;
use std::sync::Arc;

/// Bounds applied to one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Scanning stops entirely once this many results are collected
    pub max_results: usize,
    /// A single file stops contributing after this many results
    pub per_file_cap: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            per_file_cap: DEFAULT_PER_FILE_CAP,
        }
    }
}

/// Search `files` for `query` with the default per-file cap.
pub fn search(query: &str, files: &[Arc<IndexedFile>], max_results: usize) -> Vec<SearchResult> {
    let options = SearchOptions {
        max_results,
        ..SearchOptions::default()
    };
    search_with(query, files, &options)
}

/// Case-insensitive substring search over a snapshot.
///
/// Results come back in file order, then line order, with at most one result
/// per line. No I/O is performed.
pub fn search_with(
    query: &str,
    files: &[Arc<IndexedFile>],
    options: &SearchOptions,
) -> Vec<SearchResult> {
    let Some(query) = parse_query(query) else {
        return Vec::new();
    };
    if options.max_results == 0 {
        return Vec::new();
    }

    let finder = Finder::new(query.as_bytes());
    let mut results = Vec::new();

    for file in files {
        if results.len() >= options.max_results {
            break;
        }
        scan_file(file, &finder, options, &mut results);
    }

    results
}

/// Collect the first match on each line of one file
fn scan_file(
    file: &IndexedFile,
    finder: &Finder<'_>,
    options: &SearchOptions,
    results: &mut Vec<SearchResult>,
) {
    let haystack = file.lower_buffer();
    let needle_len = finder.needle().len();
    let mut cursor = 0;
    let mut file_matches = 0;

    while cursor < haystack.len()
        && results.len() < options.max_results
        && file_matches < options.per_file_cap
    {
        let Some(found) = finder.find(&haystack[cursor..]) else {
            break;
        };
        let offset = cursor + found;
        let line = file.line_index_for_offset(offset);

        if let Some(text) = file.lines().get(line) {
            let column = offset - file.line_offsets()[line];
            results.push(SearchResult {
                file_path: file.path().to_path_buf(),
                file_display_name: file.display_name().to_string(),
                line_number: line + 1,
                line_text: text.clone(),
                match_byte_offset: column,
                truncated: column + needle_len > text.to_lowercase().len(),
            });
            file_matches += 1;
        }

        // Skip the rest of this line
        match file.next_line_start(line) {
            Some(next) => cursor = next,
            None => break,
        }
    }
}
