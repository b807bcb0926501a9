#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;
use std::sync::Arc;
use wsindex::index::FileLoader;
use wsindex::query::search;

fuzz_target!(|input: (&str, &[u8])| {
    // Arbitrary content and queries must never panic the loader or the
    // line mapping, and never yield two results for one line
    let (query, content) = input;
    let loader = FileLoader::default();
    if let Some(file) = loader.load_bytes(Path::new("/fuzz/input.txt"), content.to_vec()) {
        let files = vec![Arc::new(file)];
        let results = search(query, &files, 1000);
        for pair in results.windows(2) {
            assert!(pair[0].line_number < pair[1].line_number);
        }
    }
});
