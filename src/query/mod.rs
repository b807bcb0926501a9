pub mod executor;
pub mod parser;

pub use executor::{search, search_with, SearchOptions};
pub use parser::{parse_query, SearchQuery};
