// Library interface for five-words
// The binary is a thin wrapper over `cli::run`; integration tests use the
// modules directly.

pub mod cli;
pub mod dedup;
pub mod dictionary;
pub mod error;
pub mod logging;
pub mod report;
pub mod solver;
pub mod word;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use dedup::{Deduplicator, canonical_key};
pub use dictionary::{DedupKey, Dictionary, LetterIndex};
pub use error::{Error, Result};
pub use report::{Reporter, WordOrder, format_combination};
pub use solver::{Combination, Search, SearchConfig, SearchStats, Strategy, search};
pub use word::{DuplicateLetters, LetterMask, Word, WordError};
pub use wordbank::{load_words_from_file, load_words_from_reader, load_words_from_str};
