use crate::error::{Error, Result};
use crate::word::{DuplicateLetters, Word, WordError};
use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Words accepted from a dictionary source, plus counts of what was skipped.
#[derive(Debug, Default, Clone)]
pub struct LoadReport {
    pub words: Vec<Word>,
    pub lines: usize,
    pub wrong_length: usize,
    pub invalid_characters: usize,
    pub repeated_letters: usize,
}

impl LoadReport {
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.wrong_length + self.invalid_characters + self.repeated_letters
    }

    fn accept_line(&mut self, line: &str, duplicates: DuplicateLetters) {
        self.lines += 1;
        match Word::normalize(line, duplicates) {
            Ok(word) => self.words.push(word),
            Err(err @ WordError::RepeatedLetter { .. }) => {
                debug!("line {}, {line:?} {err}", self.lines);
                self.repeated_letters += 1;
            }
            Err(err @ WordError::WrongLength { .. }) => {
                warn!("line {}, {line:?} {err}", self.lines);
                self.wrong_length += 1;
            }
            Err(err @ WordError::InvalidCharacter { .. }) => {
                warn!("line {}, {line:?} {err}", self.lines);
                self.invalid_characters += 1;
            }
        }
    }
}

pub fn load_words_from_str(data: &str, duplicates: DuplicateLetters) -> LoadReport {
    let mut report = LoadReport::default();
    for line in data.lines() {
        report.accept_line(line, duplicates);
    }
    report
}

pub fn load_words_from_reader<R: BufRead>(
    reader: R,
    duplicates: DuplicateLetters,
) -> Result<LoadReport> {
    let mut report = LoadReport::default();
    for line in reader.lines() {
        let line = line.map_err(|source| Error::Read {
            line: report.lines + 1,
            source,
        })?;
        report.accept_line(&line, duplicates);
    }
    Ok(report)
}

pub fn load_words_from_file<P: AsRef<Path>>(
    path: P,
    duplicates: DuplicateLetters,
) -> Result<LoadReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_words_from_reader(BufReader::new(file), duplicates)
}

pub fn load_words_from_stdin(duplicates: DuplicateLetters) -> Result<LoadReport> {
    load_words_from_reader(io::stdin().lock(), duplicates)
}
