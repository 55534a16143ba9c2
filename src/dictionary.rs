//! Deduplicated word storage and the per-letter index the search consults.
//!
//! Words are stored once, sorted by text, and referred to everywhere else by
//! their position ([`WordId`]). Because ids follow text order, any list of ids
//! built in ascending id order is already sorted by text.

use crate::word::{ALPHABET_SIZE, Word, letter_char};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

pub type WordId = usize;

/// How words are collapsed when the dictionary is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DedupKey {
    /// Anagrams collapse to one representative (the last one seen).
    #[default]
    Signature,
    /// Only repeated spellings collapse; keyed by [`fingerprint`].
    Fingerprint,
}

/// djb2 over the word's bytes.
#[must_use]
pub fn fingerprint(text: &str) -> u32 {
    text.bytes().fold(5381u32, |hash, b| {
        (hash << 5).wrapping_add(hash).wrapping_add(u32::from(b))
    })
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: Vec<Word>,
    by_signature: HashMap<String, Vec<WordId>>,
    input_count: usize,
}

impl Dictionary {
    /// Builds a dictionary keyed by signature.
    pub fn build<I: IntoIterator<Item = Word>>(words: I) -> Self {
        Self::build_with(words, DedupKey::Signature)
    }

    /// Builds a dictionary. On a key collision the later word replaces the
    /// earlier one.
    pub fn build_with<I: IntoIterator<Item = Word>>(words: I, key: DedupKey) -> Self {
        let mut input_count = 0;
        let mut retained: Vec<Word> = match key {
            DedupKey::Signature => {
                let mut map: HashMap<String, Word> = HashMap::new();
                for word in words {
                    input_count += 1;
                    if let Some(previous) = map.insert(word.signature().to_string(), word) {
                        debug!("{:?} replaced by a later anagram", previous.text());
                    }
                }
                map.into_values().collect()
            }
            DedupKey::Fingerprint => {
                let mut map: HashMap<u32, Word> = HashMap::new();
                for word in words {
                    input_count += 1;
                    match map.entry(fingerprint(word.text())) {
                        Entry::Occupied(mut slot) => {
                            if slot.get().text() != word.text() {
                                warn!(
                                    "{:x} fingerprint collision: {:?} replaced by {:?}",
                                    slot.key(),
                                    slot.get().text(),
                                    word.text()
                                );
                            }
                            slot.insert(word);
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(word);
                        }
                    }
                }
                map.into_values().collect()
            }
        };
        retained.sort_by(|a, b| a.text().cmp(b.text()));

        let mut by_signature: HashMap<String, Vec<WordId>> = HashMap::new();
        for (id, word) in retained.iter().enumerate() {
            by_signature
                .entry(word.signature().to_string())
                .or_default()
                .push(id);
        }

        Dictionary {
            words: retained,
            by_signature,
            input_count,
        }
    }

    /// Retained words, sorted by text.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn word(&self, id: WordId) -> &Word {
        &self.words[id]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of words offered to the builder before deduplication.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Ids of every retained word with this signature, in text order.
    #[must_use]
    pub fn with_signature(&self, signature: &str) -> &[WordId] {
        self.by_signature.get(signature).map_or(&[], Vec::as_slice)
    }

    pub fn log_contents(&self) {
        for word in &self.words {
            debug!(
                "key {:?}: word {:?}, letters {}",
                word.signature(),
                word.text(),
                word.mask()
            );
        }
    }
}

/// For each letter, the ids of the words containing it, sorted by text.
#[derive(Debug, Clone)]
pub struct LetterIndex {
    by_letter: [Vec<WordId>; ALPHABET_SIZE],
}

impl LetterIndex {
    #[must_use]
    pub fn build(dictionary: &Dictionary) -> Self {
        let mut by_letter: [Vec<WordId>; ALPHABET_SIZE] = std::array::from_fn(|_| Vec::new());
        for (id, word) in dictionary.words().iter().enumerate() {
            for letter in word.mask().letters() {
                by_letter[letter as usize].push(id);
            }
        }
        debug_assert!(by_letter.iter().all(|ids| ids.is_sorted()));
        LetterIndex { by_letter }
    }

    #[must_use]
    pub fn words_with(&self, letter: u8) -> &[WordId] {
        &self.by_letter[letter as usize]
    }

    /// Number of indexed words per letter.
    #[must_use]
    pub fn distribution(&self) -> [usize; ALPHABET_SIZE] {
        std::array::from_fn(|letter| self.by_letter[letter].len())
    }

    pub fn log_distribution(&self) {
        for (letter, count) in self.distribution().iter().enumerate() {
            info!("{}\t{}", letter_char(letter as u8), count);
        }
    }
}
