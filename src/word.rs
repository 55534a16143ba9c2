use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use thiserror::Error;

pub const WORD_LENGTH: usize = 5;
pub const ALPHABET_SIZE: usize = 26;

/// A set of letters `a`..=`z`, one bit per letter (bit 0 is `a`).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LetterMask(u32);

impl LetterMask {
    pub const EMPTY: LetterMask = LetterMask(0);
    pub const FULL: LetterMask = LetterMask((1 << ALPHABET_SIZE) - 1);

    #[must_use]
    pub fn from_letter(letter: u8) -> Self {
        debug_assert!((letter as usize) < ALPHABET_SIZE);
        LetterMask(1 << letter)
    }

    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn contains(self, letter: u8) -> bool {
        self.0 & (1 << letter) != 0
    }

    #[must_use]
    pub fn intersects(self, other: LetterMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Number of letters in the set.
    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The lowest-numbered letter that is *not* in the set, if any.
    #[must_use]
    pub fn lowest_absent(self) -> Option<u8> {
        let free = self.complement();
        (!free.is_empty()).then(|| free.0.trailing_zeros() as u8)
    }

    #[must_use]
    pub fn without(self, other: LetterMask) -> LetterMask {
        LetterMask(self.0 & !other.0)
    }

    /// Every letter not in the set.
    #[must_use]
    pub fn complement(self) -> LetterMask {
        LetterMask(!self.0 & Self::FULL.0)
    }

    /// Letters in ascending order, as indices 0..26.
    pub fn letters(self) -> impl Iterator<Item = u8> {
        (0..ALPHABET_SIZE as u8).filter(move |&l| self.contains(l))
    }
}

impl BitOr for LetterMask {
    type Output = LetterMask;

    fn bitor(self, rhs: LetterMask) -> LetterMask {
        LetterMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for LetterMask {
    fn bitor_assign(&mut self, rhs: LetterMask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for LetterMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.letters() {
            write!(f, "{}", letter_char(letter))?;
        }
        Ok(())
    }
}

impl fmt::Debug for LetterMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LetterMask({self})")
    }
}

#[must_use]
pub fn letter_char(letter: u8) -> char {
    (b'a' + letter) as char
}

/// Whether words that use some letter more than once are admitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicateLetters {
    #[default]
    Reject,
    Allow,
}

/// Why a raw line did not become a [`Word`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("not length 5 (found {len})")]
    WrongLength { len: usize },

    #[error("invalid character {ch:?}")]
    InvalidCharacter { ch: char },

    #[error("letter {letter:?} appears more than once")]
    RepeatedLetter { letter: char },
}

/// A normalized five-letter word.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Word {
    text: String,
    signature: String,
    mask: LetterMask,
}

impl Word {
    /// Normalizes one raw dictionary line. Surrounding whitespace is ignored
    /// and letters are folded to lowercase.
    pub fn normalize(raw: &str, duplicates: DuplicateLetters) -> Result<Word, WordError> {
        let text = raw.trim().to_ascii_lowercase();

        let len = text.chars().count();
        if len != WORD_LENGTH {
            return Err(WordError::WrongLength { len });
        }
        if let Some(ch) = text.chars().find(|c| !c.is_ascii_lowercase()) {
            return Err(WordError::InvalidCharacter { ch });
        }

        let mut mask = LetterMask::EMPTY;
        let mut repeated = None;
        for b in text.bytes() {
            let letter = LetterMask::from_letter(b - b'a');
            if repeated.is_none() && mask.intersects(letter) {
                repeated = Some(b as char);
            }
            mask |= letter;
        }
        if let (DuplicateLetters::Reject, Some(letter)) = (duplicates, repeated) {
            return Err(WordError::RepeatedLetter { letter });
        }

        let mut sorted: Vec<char> = text.chars().collect();
        sorted.sort_unstable();
        let signature = sorted.into_iter().collect();

        Ok(Word {
            text,
            signature,
            mask,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The word's letters sorted ascending; anagrams share a signature.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    #[must_use]
    pub fn mask(&self) -> LetterMask {
        self.mask
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self.text, self.signature)
    }
}
