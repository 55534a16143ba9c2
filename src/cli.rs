use crate::dictionary::{DedupKey, Dictionary, LetterIndex};
use crate::error::{Error, Result};
use crate::report::{Reporter, WordOrder};
use crate::solver::{
    DEFAULT_MAX_WORDS, DEFAULT_MIN_DISTINCT_LETTERS, SearchConfig, SearchStats, Strategy, search,
};
use crate::word::{DuplicateLetters, Word};
use crate::wordbank::{LoadReport, load_words_from_file, load_words_from_stdin};
use clap::Parser;
use log::info;
use std::io::Write;
use std::path::PathBuf;

/// Find sets of five-letter words that share no letters
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Newline-delimited dictionary file (reads standard input when absent)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Debug diagnostics on stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Accept words that use a letter more than once
    #[arg(short = 'a', long = "allow-repeated")]
    pub allow_repeated: bool,

    /// Minimum number of distinct letters a combination must use
    #[arg(short = 'm', long = "min-letters", default_value_t = DEFAULT_MIN_DISTINCT_LETTERS)]
    pub min_letters: usize,

    /// Number of words per combination
    #[arg(short = 'w', long = "words", default_value_t = DEFAULT_MAX_WORDS)]
    pub words: usize,

    /// How candidate words are looked up
    #[arg(long, value_enum, default_value_t = Strategy::Indexed)]
    pub strategy: Strategy,

    /// Keep anagrams as separate words; only identical spellings collapse
    #[arg(long)]
    pub keep_anagrams: bool,

    /// Drop each start word from later branches once its turn is over
    #[arg(long)]
    pub retire_start_words: bool,

    /// Print each combination's words in alphabetical order
    #[arg(long)]
    pub sort_words: bool,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

impl Cli {
    #[must_use]
    pub fn duplicate_letters(&self) -> DuplicateLetters {
        if self.allow_repeated {
            DuplicateLetters::Allow
        } else {
            DuplicateLetters::Reject
        }
    }

    #[must_use]
    pub fn dedup_key(&self) -> DedupKey {
        if self.keep_anagrams {
            DedupKey::Fingerprint
        } else {
            DedupKey::Signature
        }
    }

    #[must_use]
    pub fn word_order(&self) -> WordOrder {
        if self.sort_words {
            WordOrder::Canonical
        } else {
            WordOrder::Discovery
        }
    }

    #[must_use]
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_words: self.words,
            min_distinct_letters: self.min_letters,
            strategy: self.strategy,
            retire_start_words: self.retire_start_words,
        }
    }
}

pub fn load_words(cli: &Cli) -> Result<LoadReport> {
    let report = match &cli.input {
        Some(path) => load_words_from_file(path, cli.duplicate_letters())?,
        None => load_words_from_stdin(cli.duplicate_letters())?,
    };
    info!("Found {} 5-letter words", report.words.len());
    if report.rejected() > 0 {
        info!(
            "Skipped {} of {} lines ({} wrong length, {} invalid characters, {} repeated letters)",
            report.rejected(),
            report.lines,
            report.wrong_length,
            report.invalid_characters,
            report.repeated_letters
        );
    }
    Ok(report)
}

/// Builds the dictionary from `words`, searches it and writes every
/// combination to `out`.
pub fn solve<W: Write>(words: Vec<Word>, cli: &Cli, out: W) -> Result<SearchStats> {
    let config = cli.search_config();
    let dictionary = Dictionary::build_with(words, cli.dedup_key());
    info!("Made {} unique-key words", dictionary.len());
    dictionary.log_contents();

    let index = LetterIndex::build(&dictionary);
    index.log_distribution();

    let mut reporter = Reporter::new(out, cli.word_order());
    let mut search = search(&dictionary, &index, config)?;
    for combination in search.by_ref() {
        reporter.report(&combination).map_err(Error::Write)?;
    }
    reporter.finish().map_err(Error::Write)?;

    let stats = search.stats().clone();
    info!(
        "{} combinations from {} start words ({} states, {} duplicates suppressed)",
        stats.reported, stats.start_words, stats.states, stats.duplicates
    );
    Ok(stats)
}

pub fn run<W: Write>(cli: &Cli, out: W) -> Result<SearchStats> {
    cli.search_config().validate()?;
    let report = load_words(cli)?;
    solve(report.words, cli, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordbank::load_words_from_str;
    use std::io;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("five-words").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_cli_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.input, None);
        assert!(!cli.verbose);
        assert_eq!(cli.duplicate_letters(), DuplicateLetters::Reject);
        assert_eq!(cli.dedup_key(), DedupKey::Signature);
        assert_eq!(cli.word_order(), WordOrder::Discovery);
        assert_eq!(cli.search_config(), SearchConfig::default());
    }

    #[test]
    fn test_parse_cli_with_flags() {
        let cli = parse(&[
            "-i",
            "words.txt",
            "-v",
            "-a",
            "-m",
            "25",
            "-w",
            "4",
            "--strategy",
            "exhaustive",
            "--keep-anagrams",
            "--retire-start-words",
            "--sort-words",
        ]);
        assert_eq!(cli.input, Some(PathBuf::from("words.txt")));
        assert!(cli.verbose);
        assert_eq!(cli.duplicate_letters(), DuplicateLetters::Allow);
        assert_eq!(cli.dedup_key(), DedupKey::Fingerprint);
        assert_eq!(cli.word_order(), WordOrder::Canonical);
        assert_eq!(
            cli.search_config(),
            SearchConfig {
                max_words: 4,
                min_distinct_letters: 25,
                strategy: Strategy::Exhaustive,
                retire_start_words: true,
            }
        );
    }

    #[test]
    fn test_parse_cli_rejects_bad_values() {
        let args = ["five-words", "--strategy", "greedy"];
        assert!(Cli::try_parse_from(args).is_err());
        let args = ["five-words", "-m", "many"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_solve_writes_results() {
        let cli = parse(&["--sort-words"]);
        let words = load_words_from_str(
            "vibex\nwaltz\ncrane\nnymph\nfjord\ngucks\n",
            DuplicateLetters::Reject,
        )
        .words;
        let mut out = Vec::new();
        let stats = solve(words, &cli, &mut out).unwrap();
        assert_eq!(stats.reported, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "abcdefghijklmnoprstuvwxyz fjord gucks nymph vibex waltz\n"
        );
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("stdout closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_solve_write_failure_is_fatal() {
        let words = load_words_from_str(
            "vibex\nwaltz\nnymph\nfjord\ngucks\n",
            DuplicateLetters::Reject,
        )
        .words;
        let result = solve(words, &parse(&[]), FailingWriter);
        assert!(matches!(result, Err(Error::Write(_))));
    }

    #[test]
    fn test_solve_unreachable_threshold_reports_nothing() {
        let words = load_words_from_str("vibex\nwaltz\n", DuplicateLetters::Reject).words;
        let mut out = Vec::new();
        let stats = solve(words, &parse(&["-w", "1", "-m", "10"]), &mut out).unwrap();
        assert_eq!(stats.reported, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_missing_file_fails() {
        let cli = parse(&["-i", "/nonexistent/dictionary.txt"]);
        let result = run(&cli, Vec::new());
        assert!(matches!(result, Err(Error::Open { .. })));
    }

    #[test]
    fn test_run_rejects_invalid_config_before_reading() {
        let cli = parse(&["-i", "/nonexistent/dictionary.txt", "-w", "0"]);
        let result = run(&cli, Vec::new());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
