//! Execution engine bits.

use crate::api::{Engine, Match};
use crate::cursor::Cursor;
use crate::indexing::InputIndexer;

/// A struct which enables iteration over non-overlapping matches.
///
/// Each match is the leftmost one at or after the end of the previous match.
/// After an empty match the search resumes one unit later, so the iterator
/// always makes progress.
#[derive(Debug)]
pub struct Matches<'r, Input: InputIndexer> {
    engine: &'r Engine,
    input: Input,
    offset: Option<usize>,
}

impl<'r, Input: InputIndexer> Matches<'r, Input> {
    pub(crate) fn new(engine: &'r Engine, input: Input, start: usize) -> Self {
        Matches {
            engine,
            input,
            offset: Some(start),
        }
    }

    /// \return the position one unit past \p pos, or None at the end.
    fn step(&self, pos: usize) -> Option<usize> {
        let mut next = pos;
        self.input.next_right(&mut next).map(|_| next)
    }

    fn next_match(&mut self, mut pos: usize) -> Option<Match> {
        loop {
            pos = self.engine.start_predicate().find_start(&self.input, pos)?;
            let mut cursor = Cursor::starting_at(self.input, pos).ok()?;
            if let Some(m) = self.engine.exec_cursor(&mut cursor) {
                self.offset = if m.range.is_empty() {
                    self.step(m.range.end)
                } else {
                    Some(m.range.end)
                };
                return Some(m);
            }
            pos = self.step(pos)?;
        }
    }
}

impl<Input: InputIndexer> Iterator for Matches<'_, Input> {
    type Item = Match;
    fn next(&mut self) -> Option<Self::Item> {
        let start = self.offset.take()?;
        self.next_match(start)
    }
}
