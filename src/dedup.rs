use crate::word::Word;
use itertools::Itertools;
use std::collections::HashSet;

/// The word texts sorted and concatenated. Words have a fixed width, so no
/// separator is needed.
#[must_use]
pub fn canonical_key<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a Word>,
{
    words.into_iter().map(Word::text).sorted().collect()
}

/// Remembers which combinations have been reported during one run.
#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the combination; returns `false` if an equal set of words was
    /// recorded before.
    pub fn insert<'a, I>(&mut self, words: I) -> bool
    where
        I: IntoIterator<Item = &'a Word>,
    {
        self.seen.insert(canonical_key(words))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
