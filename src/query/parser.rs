/// A normalized query: trimmed, lowercased and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// The needle as bytes, folded the same way as indexed content.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalize raw input. Returns `None` for blank input.
pub fn parse_query(input: &str) -> Option<SearchQuery> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(SearchQuery(trimmed.to_lowercase()))
}
