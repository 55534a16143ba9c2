use crate::solver::Combination;
use itertools::Itertools;
use std::io::{self, Write};

/// Order of the words on a reported line. Only presentation; the set is the
/// same either way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WordOrder {
    #[default]
    Discovery,
    Canonical,
}

/// `<letters> <word> <word> ...`
#[must_use]
pub fn format_combination(combination: &Combination<'_>, order: WordOrder) -> String {
    let mut words = combination.words().iter().map(|w| w.text());
    let words = match order {
        WordOrder::Discovery => words.join(" "),
        WordOrder::Canonical => words.sorted().join(" "),
    };
    format!("{} {}", combination.letters(), words)
}

/// Writes one line per combination.
pub struct Reporter<W: Write> {
    out: W,
    order: WordOrder,
    lines: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, order: WordOrder) -> Self {
        Self {
            out,
            order,
            lines: 0,
        }
    }

    pub fn report(&mut self, combination: &Combination<'_>) -> io::Result<()> {
        writeln!(self.out, "{}", format_combination(combination, self.order))?;
        self.lines += 1;
        Ok(())
    }

    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
