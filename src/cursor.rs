//! A restorable position tracker over an input buffer.

use crate::error::Error;
use crate::indexing::{CharsInput, InputIndexer, Utf8Input};
use core::ops::Range;
use core::sync::atomic::{AtomicUsize, Ordering};

static NEXT_CURSOR_ID: AtomicUsize = AtomicUsize::new(0);

/// A snapshot of a cursor's position, produced by [`Cursor::checkpoint`].
/// A mark remembers which cursor produced it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Mark {
    cursor: usize,
    pos: usize,
}

impl Mark {
    /// The position this mark was taken at.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// A cursor walks an input one unit at a time and can be backtracked to any
/// mark it has produced.
///
/// The position is always within `[0, len]` and always on a unit boundary.
#[derive(Debug)]
pub struct Cursor<Input: InputIndexer> {
    input: Input,
    pos: usize,
    id: usize,
}

impl<Input: InputIndexer> Cursor<Input> {
    /// Construct a cursor at the start of \p input.
    pub fn new(input: Input) -> Self {
        Self {
            input,
            pos: 0,
            id: NEXT_CURSOR_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Construct a cursor at \p start, which must be a valid boundary.
    pub fn starting_at(input: Input, start: usize) -> Result<Self, Error> {
        if start > input.len() {
            return Err(Error::StartOutOfBounds {
                start,
                len: input.len(),
            });
        }
        if !input.is_boundary(start) {
            return Err(Error::NotCharBoundary { start });
        }
        let mut cursor = Self::new(input);
        cursor.pos = start;
        Ok(cursor)
    }

    /// \return the input this cursor walks.
    #[inline]
    pub fn input(&self) -> Input {
        self.input
    }

    /// \return the current position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// \return the next unit without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.input.peek_right(self.pos)
    }

    /// \return the next unit, consuming it.
    #[inline]
    pub fn next_unit(&mut self) -> Option<char> {
        self.input.next_right(&mut self.pos)
    }

    /// Advance by \p n units, stopping at the end.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.next_unit().is_none() {
                break;
            }
        }
    }

    /// \return the number of units left.
    pub fn remaining(&self) -> usize {
        self.input.units_between(self.pos, self.input.len())
    }

    /// \return whether no units are left.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Snapshot the position.
    #[inline]
    pub fn checkpoint(&self) -> Mark {
        Mark {
            cursor: self.id,
            pos: self.pos,
        }
    }

    /// Move back (or forward) to \p mark.
    /// Fails with `InvalidMark` if the mark came from another cursor.
    pub fn restore(&mut self, mark: Mark) -> Result<(), Error> {
        if mark.cursor != self.id {
            return Err(Error::InvalidMark);
        }
        self.pos = mark.pos;
        Ok(())
    }

    /// Restore a mark known to come from this cursor.
    #[inline(always)]
    pub(crate) fn rewind(&mut self, mark: Mark) {
        debug_assert_eq!(mark.cursor, self.id, "Mark from a foreign cursor");
        self.pos = mark.pos;
    }

    /// \return whether we match some literal text.
    /// If so, advance past it. If not, the position is unchanged.
    #[inline(always)]
    pub(crate) fn try_match_lit(&mut self, lit: &str, icase: bool) -> bool {
        self.input.match_str(&mut self.pos, lit, icase)
    }

    /// \return whether the text in \p range appears again here.
    /// If so, advance past it. If not, the position is unchanged.
    #[inline(always)]
    pub(crate) fn try_match_subrange(&mut self, range: Range<usize>, icase: bool) -> bool {
        self.input.match_subrange(&mut self.pos, range, icase)
    }

    /// Skip forward to the next byte in \p needles, if the input supports it.
    #[inline(always)]
    pub(crate) fn skip_to_any_byte(&mut self, needles: &[u8]) {
        if let Some(pos) = self.input.skip_to_any_byte(self.pos, needles) {
            debug_assert!(self.input.is_boundary(pos), "Skipped into a unit");
            self.pos = pos;
        }
    }
}

impl<'a> From<&'a str> for Cursor<Utf8Input<'a>> {
    fn from(text: &'a str) -> Self {
        Cursor::new(Utf8Input::new(text))
    }
}

impl<'a> From<&'a [char]> for Cursor<CharsInput<'a>> {
    fn from(chars: &'a [char]) -> Self {
        Cursor::new(CharsInput::new(chars))
    }
}
