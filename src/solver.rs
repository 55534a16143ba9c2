//! Backtracking search for sets of words with no letter in common.
//!
//! Every dictionary word is used in turn as the start word. From there the
//! search always branches on the lowest letter that is neither covered nor
//! skipped: it tries each word containing that letter which overlaps nothing
//! chosen so far, and, while the skip allowance lasts, the choice of leaving
//! that letter uncovered for the rest of the branch. The allowance is
//! `26 - min_distinct_letters`, so any set reaching the threshold is reachable
//! from each of its words. A set found from several start words is reported
//! once, through the [`Deduplicator`].

use crate::dedup::{Deduplicator, canonical_key};
use crate::dictionary::{Dictionary, LetterIndex, WordId};
use crate::error::{Error, Result};
use crate::word::{ALPHABET_SIZE, LetterMask, WORD_LENGTH, Word, letter_char};
use crate::{debug_log, trace_log};
use itertools::Itertools;
use log::debug;
use std::collections::VecDeque;
use std::fmt;

pub const DEFAULT_MAX_WORDS: usize = 5;
pub const DEFAULT_MIN_DISTINCT_LETTERS: usize = 23;

/// How the next word is looked up at each level of the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Branch on the lowest free letter through the [`LetterIndex`].
    #[default]
    Indexed,
    /// Enumerate every ascending five-letter set of free letters and look it
    /// up by signature. Slow; only finds words without repeated letters.
    Exhaustive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_words: usize,
    pub min_distinct_letters: usize,
    pub strategy: Strategy,
    /// Exclude each start word from later branches once its own turn is over.
    pub retire_start_words: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_words: DEFAULT_MAX_WORDS,
            min_distinct_letters: DEFAULT_MIN_DISTINCT_LETTERS,
            strategy: Strategy::default(),
            retire_start_words: false,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_words == 0 {
            return Err(Error::InvalidConfig(
                "a combination needs at least one word".to_string(),
            ));
        }
        if self.min_distinct_letters > ALPHABET_SIZE {
            return Err(Error::InvalidConfig(format!(
                "cannot use {} distinct letters out of {ALPHABET_SIZE}",
                self.min_distinct_letters
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.min_distinct_letters <= self.max_words * WORD_LENGTH
    }

    /// How many letters a branch may leave uncovered.
    #[must_use]
    pub fn skip_allowance(&self) -> usize {
        ALPHABET_SIZE.saturating_sub(self.min_distinct_letters)
    }
}

/// The words chosen so far and the letters they occupy.
///
/// Words are pushed and popped strictly in stack order; `occupied` always
/// equals the union of the pushed words' masks, and `counts[l]` the number of
/// pushed words containing letter `l`.
#[derive(Debug, Clone)]
pub struct SearchState<'d> {
    slots: Vec<&'d Word>,
    counts: [u8; ALPHABET_SIZE],
    occupied: LetterMask,
    skipped: LetterMask,
}

impl<'d> SearchState<'d> {
    #[must_use]
    pub fn new(max_words: usize) -> Self {
        SearchState {
            slots: Vec::with_capacity(max_words),
            counts: [0; ALPHABET_SIZE],
            occupied: LetterMask::EMPTY,
            skipped: LetterMask::EMPTY,
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn slots(&self) -> &[&'d Word] {
        &self.slots
    }

    #[must_use]
    pub fn occupied(&self) -> LetterMask {
        self.occupied
    }

    #[must_use]
    pub fn count(&self, letter: u8) -> u8 {
        self.counts[letter as usize]
    }

    /// Letters a new word must avoid: occupied or deliberately left uncovered.
    #[must_use]
    pub fn blocked(&self) -> LetterMask {
        self.occupied | self.skipped
    }

    pub fn push(&mut self, word: &'d Word) {
        for letter in word.mask().letters() {
            self.counts[letter as usize] += 1;
        }
        self.occupied |= word.mask();
        self.slots.push(word);
    }

    pub fn pop(&mut self) -> Option<&'d Word> {
        let word = self.slots.pop()?;
        let mut occupied = LetterMask::EMPTY;
        for letter in word.mask().letters() {
            self.counts[letter as usize] -= 1;
        }
        for (letter, &count) in self.counts.iter().enumerate() {
            if count > 0 {
                occupied |= LetterMask::from_letter(letter as u8);
            }
        }
        self.occupied = occupied;
        debug_assert_eq!(
            self.occupied,
            self.slots
                .iter()
                .fold(LetterMask::EMPTY, |acc, w| acc | w.mask())
        );
        Some(word)
    }

    fn skip(&mut self, letter: u8) {
        debug_assert!(!self.blocked().contains(letter));
        self.skipped |= LetterMask::from_letter(letter);
    }

    fn unskip(&mut self, letter: u8) {
        self.skipped = self.skipped.without(LetterMask::from_letter(letter));
    }
}

/// A reported set of words, in the order the search chose them.
#[derive(Clone, PartialEq, Eq)]
pub struct Combination<'d> {
    words: Vec<&'d Word>,
    letters: LetterMask,
}

impl<'d> Combination<'d> {
    #[must_use]
    pub fn new(words: Vec<&'d Word>) -> Self {
        let letters = words
            .iter()
            .fold(LetterMask::EMPTY, |acc, w| acc | w.mask());
        Combination { words, letters }
    }

    #[must_use]
    pub fn words(&self) -> &[&'d Word] {
        &self.words
    }

    /// Union of the words' letters.
    #[must_use]
    pub fn letters(&self) -> LetterMask {
        self.letters
    }

    #[must_use]
    pub fn key(&self) -> String {
        canonical_key(self.words.iter().copied())
    }
}

impl fmt::Debug for Combination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.letters, self.words.iter().join(" "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub start_words: usize,
    pub states: usize,
    /// Slot sequences that reached full depth, whether reported or not.
    pub complete: usize,
    pub duplicates: usize,
    pub reported: usize,
}

/// Lazily runs the search one start word at a time, yielding each newly
/// found combination.
pub struct Search<'d> {
    dictionary: &'d Dictionary,
    index: &'d LetterIndex,
    config: SearchConfig,
    dedup: Deduplicator,
    state: SearchState<'d>,
    retired: Vec<bool>,
    /// Fewest distinct letters any dictionary word has.
    min_word_letters: usize,
    next_start: WordId,
    pending: VecDeque<Combination<'d>>,
    stats: SearchStats,
}

/// Starts a search with a fresh [`Deduplicator`].
pub fn search<'d>(
    dictionary: &'d Dictionary,
    index: &'d LetterIndex,
    config: SearchConfig,
) -> Result<Search<'d>> {
    Search::new(dictionary, index, config, Deduplicator::new())
}

impl<'d> Search<'d> {
    /// Combinations already recorded in `dedup` are not reported again.
    pub fn new(
        dictionary: &'d Dictionary,
        index: &'d LetterIndex,
        config: SearchConfig,
        dedup: Deduplicator,
    ) -> Result<Self> {
        config.validate()?;
        if !config.is_reachable() {
            log::warn!(
                "{} words cover at most {} letters; nothing can reach {}",
                config.max_words,
                config.max_words * WORD_LENGTH,
                config.min_distinct_letters
            );
        }
        let min_word_letters = dictionary
            .words()
            .iter()
            .map(|w| w.mask().len())
            .min()
            .unwrap_or(WORD_LENGTH);
        Ok(Search {
            dictionary,
            index,
            config,
            dedup,
            state: SearchState::new(config.max_words),
            retired: vec![false; dictionary.len()],
            min_word_letters,
            next_start: 0,
            pending: VecDeque::new(),
            stats: SearchStats::default(),
        })
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Hands back the deduplicator so a later run can continue from it.
    #[must_use]
    pub fn into_deduplicator(self) -> Deduplicator {
        self.dedup
    }

    fn run_start_word(&mut self, start: WordId) {
        let dictionary = self.dictionary;
        let word = dictionary.word(start);
        debug!("word: {}", word.text());
        self.stats.start_words += 1;

        self.state.push(word);
        match self.config.strategy {
            Strategy::Indexed => self.extend_indexed(self.config.skip_allowance()),
            Strategy::Exhaustive => self.extend_exhaustive(),
        }
        self.state.pop();
        debug_assert_eq!(self.state.depth(), 0);

        if self.config.retire_start_words {
            self.retired[start] = true;
        }
    }

    fn remaining_words(&self) -> usize {
        self.config.max_words - self.state.depth()
    }

    /// Whether the remaining words fit in the unblocked letters, leaving out
    /// `extra_blocked` more of them.
    fn has_room(&self, extra_blocked: usize) -> bool {
        let free = self.state.blocked().complement().len();
        free >= extra_blocked + self.remaining_words() * self.min_word_letters
    }

    fn can_still_qualify(&self) -> bool {
        let reachable = self.state.occupied().len() + self.remaining_words() * WORD_LENGTH;
        reachable >= self.config.min_distinct_letters && self.has_room(0)
    }

    fn extend_indexed(&mut self, skips_left: usize) {
        self.stats.states += 1;
        if self.state.depth() == self.config.max_words {
            self.complete();
            return;
        }
        if !self.can_still_qualify() {
            return;
        }

        let blocked = self.state.blocked();
        let Some(letter) = blocked.lowest_absent() else {
            return;
        };
        trace_log!(
            "depth {}, letters {}, branching on {}",
            self.state.depth(),
            self.state.occupied(),
            letter_char(letter)
        );

        let dictionary = self.dictionary;
        let index = self.index;
        for &id in index.words_with(letter) {
            if self.retired[id] {
                continue;
            }
            let candidate = dictionary.word(id);
            if candidate.mask().intersects(blocked) {
                continue;
            }
            self.state.push(candidate);
            self.extend_indexed(skips_left);
            self.state.pop();
        }

        if skips_left > 0 && self.has_room(1) {
            self.state.skip(letter);
            self.extend_indexed(skips_left - 1);
            self.state.unskip(letter);
        }
    }

    fn extend_exhaustive(&mut self) {
        self.stats.states += 1;
        if self.state.depth() == self.config.max_words {
            self.complete();
            return;
        }
        if !self.can_still_qualify() {
            return;
        }

        let dictionary = self.dictionary;
        let free = self.state.occupied().complement();
        for letters in free.letters().combinations(WORD_LENGTH) {
            let signature: String = letters.into_iter().map(letter_char).collect();
            for &id in dictionary.with_signature(&signature) {
                if self.retired[id] {
                    continue;
                }
                trace_log!("key {}, word {} works", signature, dictionary.word(id));
                self.state.push(dictionary.word(id));
                self.extend_exhaustive();
                self.state.pop();
            }
        }
    }

    fn complete(&mut self) {
        self.stats.complete += 1;
        let letters = self.state.occupied();
        if letters.len() < self.config.min_distinct_letters {
            return;
        }
        if !self.dedup.insert(self.state.slots().iter().copied()) {
            self.stats.duplicates += 1;
            return;
        }
        self.stats.reported += 1;
        debug_log!("found one: {}", letters);
        self.pending
            .push_back(Combination::new(self.state.slots().to_vec()));
    }
}

impl<'d> Iterator for Search<'d> {
    type Item = Combination<'d>;

    fn next(&mut self) -> Option<Combination<'d>> {
        loop {
            if let Some(combination) = self.pending.pop_front() {
                return Some(combination);
            }
            if self.next_start >= self.dictionary.len() {
                return None;
            }
            let start = self.next_start;
            self.next_start += 1;
            self.run_start_word(start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::DuplicateLetters;
    use std::collections::BTreeSet;

    const FAMOUS: [&str; 5] = ["fjord", "gucks", "nymph", "vibex", "waltz"];

    fn dictionary(list: &[&str], duplicates: DuplicateLetters) -> Dictionary {
        Dictionary::build(
            list.iter()
                .map(|w| Word::normalize(w, duplicates).unwrap()),
        )
    }

    fn keys(dictionary: &Dictionary, config: SearchConfig) -> BTreeSet<String> {
        let index = LetterIndex::build(dictionary);
        search(dictionary, &index, config)
            .unwrap()
            .map(|c| c.key())
            .collect()
    }

    fn config(max_words: usize, min_distinct_letters: usize) -> SearchConfig {
        SearchConfig {
            max_words,
            min_distinct_letters,
            ..SearchConfig::default()
        }
    }

    fn assert_pairwise_disjoint(combination: &Combination<'_>) {
        for (a, b) in combination.words().iter().tuple_combinations() {
            assert!(
                !a.mask().intersects(b.mask()),
                "{a} and {b} share a letter in {combination:?}"
            );
        }
    }

    #[test]
    fn test_finds_famous_set_once() {
        let dict = dictionary(
            &["waltz", "crane", "vibex", "nymph", "slate", "gucks", "fjord", "cloud"],
            DuplicateLetters::Reject,
        );
        let index = LetterIndex::build(&dict);
        let mut search = search(&dict, &index, SearchConfig::default()).unwrap();
        let found: Vec<Combination<'_>> = search.by_ref().collect();

        assert_eq!(found.len(), 1);
        let combination = &found[0];
        assert_eq!(combination.letters().to_string(), "abcdefghijklmnoprstuvwxyz");
        assert_eq!(combination.key(), "fjordgucksnymphvibexwaltz");
        assert_eq!(
            combination.words().iter().map(|w| w.text()).collect::<Vec<_>>(),
            vec!["fjord", "waltz", "vibex", "gucks", "nymph"]
        );

        let stats = search.stats();
        assert_eq!(stats.start_words, 8);
        assert_eq!(stats.reported, 1);
        assert_eq!(stats.duplicates, 4);
    }

    #[test]
    fn test_overlapping_words_find_nothing() {
        let dict = dictionary(
            &["crane", "slate", "trace", "react", "caste", "stare"],
            DuplicateLetters::Reject,
        );
        assert!(keys(&dict, SearchConfig::default()).is_empty());
        assert!(keys(&dict, config(2, 6)).is_empty());
    }

    #[test]
    fn test_empty_dictionary() {
        let dict = Dictionary::build(Vec::new());
        assert!(keys(&dict, SearchConfig::default()).is_empty());
    }

    #[test]
    fn test_uncovered_letter_before_covered_ones() {
        // The only set leaves 'a' uncovered.
        let dict = dictionary(
            &["bcdef", "ghijk", "lmnop", "qrstu", "vwxyz", "abcgh"],
            DuplicateLetters::Reject,
        );
        let found = keys(&dict, config(5, 25));
        assert_eq!(
            found,
            BTreeSet::from(["bcdefghijklmnopqrstuvwxyz".to_string()])
        );
    }

    #[test]
    fn test_pairs_with_small_word_count() {
        // crane overlaps each of the others
        let dict = dictionary(&["fjord", "gucks", "nymph", "crane"], DuplicateLetters::Reject);
        let found = keys(&dict, config(2, 10));
        let expected: BTreeSet<String> = ["fjordgucks", "fjordnymph", "gucksnymph"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_overlapping_pair_never_reported_together() {
        let dict = dictionary(
            &["solar", "claps", "fjord", "gucks", "nymph", "vibex", "waltz", "chimp"],
            DuplicateLetters::Reject,
        );
        let index = LetterIndex::build(&dict);
        for max_words in 2..=5 {
            let min = (max_words * WORD_LENGTH).min(23);
            for combination in search(&dict, &index, config(max_words, min)).unwrap() {
                let texts: Vec<&str> = combination.words().iter().map(|w| w.text()).collect();
                assert!(!(texts.contains(&"solar") && texts.contains(&"claps")));
                assert_pairwise_disjoint(&combination);
                assert!(combination.letters().len() >= min);
            }
        }
    }

    #[test]
    fn test_repeated_letter_words_in_relaxed_search() {
        let dict = dictionary(&["poppy", "crane", "fight"], DuplicateLetters::Allow);
        let index = LetterIndex::build(&dict);
        let found: Vec<_> = search(&dict, &index, config(2, 8)).unwrap().collect();
        let found_keys: BTreeSet<String> = found.iter().map(Combination::key).collect();
        assert_eq!(
            found_keys,
            BTreeSet::from([
                "cranefight".to_string(),
                "cranepoppy".to_string(),
                "fightpoppy".to_string(),
            ])
        );
        for combination in &found {
            assert_pairwise_disjoint(combination);
        }
    }

    #[test]
    fn test_retiring_start_words_keeps_results() {
        let list = [
            "waltz", "vibex", "nymph", "gucks", "fjord", "bemix", "clunk", "grypt", "vozhd",
            "waqfs", "jumpy", "chowk",
        ];
        let dict = dictionary(&list, DuplicateLetters::Reject);
        let plain = keys(&dict, config(5, 24));
        let retired = keys(
            &dict,
            SearchConfig {
                retire_start_words: true,
                ..config(5, 24)
            },
        );
        assert!(!plain.is_empty());
        assert_eq!(plain, retired);
    }

    #[test]
    fn test_lower_threshold_costs_nothing_without_repeated_letters() {
        // Five distinct-letter words always cover exactly 25 letters, so
        // allowing more uncovered letters must not widen the search.
        let list = [
            "waltz", "vibex", "nymph", "gucks", "fjord", "bemix", "clunk", "grypt", "vozhd",
            "waqfs", "jumpy", "chowk", "crane", "slate", "pudgy",
        ];
        let dict = dictionary(&list, DuplicateLetters::Reject);
        let index = LetterIndex::build(&dict);
        let run = |min| {
            let mut search = search(&dict, &index, config(5, min)).unwrap();
            let keys: BTreeSet<String> = search.by_ref().map(|c| c.key()).collect();
            (keys, search.stats().clone())
        };
        let (strict_keys, strict) = run(25);
        let (relaxed_keys, relaxed) = run(23);
        assert_eq!(strict_keys.len(), 2);
        assert_eq!(strict_keys, relaxed_keys);
        assert_eq!(strict.states, relaxed.states);
        assert_eq!(strict.complete, relaxed.complete);
    }

    #[test]
    fn test_exhaustive_strategy_agrees_with_indexed() {
        let list = [
            "waltz", "vibex", "nymph", "gucks", "fjord", "bemix", "clunk", "grypt", "vozhd",
            "waqfs", "crane", "slate",
        ];
        let dict = dictionary(&list, DuplicateLetters::Reject);
        for (max_words, min) in [(2, 10), (3, 15), (5, 25)] {
            let indexed = keys(&dict, config(max_words, min));
            let exhaustive = keys(
                &dict,
                SearchConfig {
                    strategy: Strategy::Exhaustive,
                    ..config(max_words, min)
                },
            );
            assert_eq!(indexed, exhaustive, "max_words {max_words}");
        }
    }

    #[test]
    fn test_results_independent_of_input_order() {
        let list = ["waltz", "vibex", "nymph", "gucks", "fjord", "bemix", "clunk", "grypt", "vozhd"];
        let mut reversed = list;
        reversed.reverse();
        let a = keys(&dictionary(&list, DuplicateLetters::Reject), config(5, 24));
        let b = keys(&dictionary(&reversed, DuplicateLetters::Reject), config(5, 24));
        assert_eq!(a, b);
        assert_eq!(a, keys(&dictionary(&list, DuplicateLetters::Reject), config(5, 24)));
    }

    #[test]
    fn test_shared_deduplicator_suppresses_repeat_run() {
        let dict = dictionary(&FAMOUS, DuplicateLetters::Reject);
        let index = LetterIndex::build(&dict);
        let mut first = search(&dict, &index, SearchConfig::default()).unwrap();
        assert_eq!(first.by_ref().count(), 1);
        let dedup = first.into_deduplicator();
        assert_eq!(dedup.len(), 1);

        let second = Search::new(&dict, &index, SearchConfig::default(), dedup).unwrap();
        assert_eq!(second.count(), 0);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let dict = dictionary(&FAMOUS, DuplicateLetters::Reject);
        let index = LetterIndex::build(&dict);
        assert!(matches!(
            search(&dict, &index, config(0, 5)),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            search(&dict, &index, config(5, 27)),
            Err(Error::InvalidConfig(_))
        ));
        assert_eq!(config(5, 25).skip_allowance(), 1);
        assert_eq!(config(5, 23).skip_allowance(), 3);
    }

    #[test]
    fn test_state_push_pop_restores_letters() {
        let dict = dictionary(&["fjord", "gucks", "poppy"], DuplicateLetters::Allow);
        let mut state = SearchState::new(5);
        state.push(dict.word(0));
        let after_first = state.occupied();
        state.push(dict.word(1));
        assert_eq!(state.depth(), 2);
        assert_eq!(state.occupied().len(), 10);
        assert_eq!(state.count(b'c' - b'a'), 1);

        assert_eq!(state.pop().map(Word::text), Some("gucks"));
        assert_eq!(state.occupied(), after_first);
        assert_eq!(state.count(b'c' - b'a'), 0);

        state.push(dict.word(2));
        assert_eq!(state.count(b'o' - b'a'), 2);
        state.pop();
        assert_eq!(state.count(b'o' - b'a'), 1);
        assert!(state.occupied().contains(b'o' - b'a'));
        state.pop();
        assert_eq!(state.pop(), None);
        assert!(state.occupied().is_empty());
    }

    #[test]
    fn test_skipped_letters_are_blocked() {
        let mut state = SearchState::new(5);
        state.skip(0);
        assert!(state.blocked().contains(0));
        assert!(!state.occupied().contains(0));
        state.unskip(0);
        assert!(state.blocked().is_empty());
    }
}
