//! Input abstraction: the text buffers a cursor can walk.
//!
//! Positions are plain indexes. For UTF-8 input they are byte offsets which
//! always fall on character boundaries; for char-buffer input they are
//! element indexes. Either way one step of the cursor is one unit (`char`).

use crate::matchers;
use core::ops::Range;

// A helper type that holds a buffer and allows indexing into it.
pub trait InputIndexer: core::fmt::Debug + Copy + Clone {
    /// \return the length of the input, in positions.
    fn len(&self) -> usize;

    /// \return whether the input is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// \return whether \p pos is a position a cursor may stand at.
    fn is_boundary(&self, pos: usize) -> bool;

    /// \return the unit to the right of (starting at) \p pos, or None if we
    /// are at the end. Does not move.
    fn peek_right(&self, pos: usize) -> Option<char>;

    /// \return the unit to the right of \p pos, or None if we are at the end.
    /// Advance the position past it.
    fn next_right(&self, pos: &mut usize) -> Option<char> {
        let c = self.peek_right(*pos)?;
        *pos += self.unit_width(c);
        Some(c)
    }

    /// \return how many positions the unit \p c occupies.
    fn unit_width(&self, c: char) -> usize;

    /// \return the number of units between two positions.
    fn units_between(&self, start: usize, end: usize) -> usize;

    /// \return the raw UTF-8 contents, if positions index them.
    fn contents(&self) -> Option<&[u8]> {
        None
    }

    /// \return whether the units of \p lit appear at \p pos.
    /// If so, advance the position past them. If not, the position is unchanged.
    fn match_str(&self, pos: &mut usize, lit: &str, icase: bool) -> bool {
        self.match_units(pos, lit.chars(), icase)
    }

    /// \return whether the units in \p range of this same input appear again
    /// at \p pos. If so, advance the position past them.
    fn match_subrange(&self, pos: &mut usize, range: Range<usize>, icase: bool) -> bool {
        let mut src = range.start;
        let mut cursor = *pos;
        while src < range.end {
            let expected = match self.next_right(&mut src) {
                Some(c) => c,
                None => return false,
            };
            match self.next_right(&mut cursor) {
                Some(c) if matchers::unit_eq(c, expected, icase) => {}
                _ => return false,
            }
        }
        *pos = cursor;
        true
    }

    /// Compare the next units against \p units, all or nothing.
    fn match_units<I: Iterator<Item = char>>(&self, pos: &mut usize, units: I, icase: bool) -> bool {
        let mut cursor = *pos;
        for expected in units {
            match self.next_right(&mut cursor) {
                Some(c) if matchers::unit_eq(c, expected, icase) => {}
                _ => return false,
            }
        }
        *pos = cursor;
        true
    }

    /// \return the first position at or after \p pos whose byte is one of
    /// \p needles, or None if this input cannot search by byte.
    /// If no byte matches, the end of the input is returned.
    fn skip_to_any_byte(&self, _pos: usize, _needles: &[u8]) -> Option<usize> {
        None
    }
}

/// UTF-8 text, indexed by byte offset.
#[derive(Debug, Copy, Clone)]
pub struct Utf8Input<'a> {
    input: &'a str,
}

impl<'a> Utf8Input<'a> {
    #[inline(always)]
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// \return the underlying text.
    pub fn text(&self) -> &'a str {
        self.input
    }
}

impl InputIndexer for Utf8Input<'_> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.input.len()
    }

    #[inline(always)]
    fn is_boundary(&self, pos: usize) -> bool {
        self.input.is_char_boundary(pos)
    }

    #[inline(always)]
    fn peek_right(&self, pos: usize) -> Option<char> {
        self.input.get(pos..)?.chars().next()
    }

    #[inline(always)]
    fn unit_width(&self, c: char) -> usize {
        c.len_utf8()
    }

    fn units_between(&self, start: usize, end: usize) -> usize {
        self.input.get(start..end).map_or(0, |s| s.chars().count())
    }

    #[inline(always)]
    fn contents(&self) -> Option<&[u8]> {
        Some(self.input.as_bytes())
    }

    #[inline(always)]
    fn match_str(&self, pos: &mut usize, lit: &str, icase: bool) -> bool {
        if icase {
            return self.match_units(pos, lit.chars(), icase);
        }
        // Ordinal comparison can work directly on bytes.
        let matched = self
            .input
            .as_bytes()
            .get(*pos..)
            .map_or(false, |rest| rest.starts_with(lit.as_bytes()));
        if matched {
            *pos += lit.len();
        }
        matched
    }

    fn match_subrange(&self, pos: &mut usize, range: Range<usize>, icase: bool) -> bool {
        match self.input.get(range) {
            Some(captured) => self.match_str(pos, captured, icase),
            None => false,
        }
    }

    fn skip_to_any_byte(&self, pos: usize, needles: &[u8]) -> Option<usize> {
        let haystack = self.input.as_bytes().get(pos..)?;
        let found = match *needles {
            [a] => memchr::memchr(a, haystack),
            [a, b] => memchr::memchr2(a, b, haystack),
            [a, b, c] => memchr::memchr3(a, b, c, haystack),
            _ => return None,
        };
        Some(found.map_or(self.input.len(), |idx| pos + idx))
    }
}

/// A buffer of chars, indexed by element.
#[derive(Debug, Copy, Clone)]
pub struct CharsInput<'a> {
    input: &'a [char],
}

impl<'a> CharsInput<'a> {
    #[inline(always)]
    pub fn new(input: &'a [char]) -> Self {
        Self { input }
    }

    /// \return the underlying buffer.
    pub fn chars(&self) -> &'a [char] {
        self.input
    }
}

impl InputIndexer for CharsInput<'_> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.input.len()
    }

    #[inline(always)]
    fn is_boundary(&self, pos: usize) -> bool {
        pos <= self.input.len()
    }

    #[inline(always)]
    fn peek_right(&self, pos: usize) -> Option<char> {
        self.input.get(pos).copied()
    }

    #[inline(always)]
    fn unit_width(&self, _c: char) -> usize {
        1
    }

    fn units_between(&self, start: usize, end: usize) -> usize {
        end.saturating_sub(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_positions_are_bytes() {
        let input = Utf8Input::new("a\u{00E9}b");
        let mut pos = 0;
        assert_eq!(input.next_right(&mut pos), Some('a'));
        assert_eq!(input.next_right(&mut pos), Some('\u{00E9}'));
        assert_eq!(pos, 3);
        assert_eq!(input.units_between(0, input.len()), 3);
        assert!(!input.is_boundary(2));
    }

    #[test]
    fn match_str_is_all_or_nothing() {
        let input = Utf8Input::new("Hello");
        let mut pos = 0;
        assert!(!input.match_str(&mut pos, "Help", false));
        assert_eq!(pos, 0);
        assert!(input.match_str(&mut pos, "hel", true));
        assert_eq!(pos, 3);

        let chars: Vec<char> = "Hello".chars().collect();
        let input = CharsInput::new(&chars);
        let mut pos = 1;
        assert!(input.match_str(&mut pos, "ell", false));
        assert_eq!(pos, 4);
        assert!(!input.match_str(&mut pos, "oo", false));
        assert_eq!(pos, 4);
    }

    #[test]
    fn subrange_replays_earlier_text() {
        let chars: Vec<char> = "abab".chars().collect();
        let input = CharsInput::new(&chars);
        let mut pos = 2;
        assert!(input.match_subrange(&mut pos, 0..2, false));
        assert_eq!(pos, 4);

        let input = Utf8Input::new("xyXY");
        let mut pos = 2;
        assert!(!input.match_subrange(&mut pos, 0..2, false));
        assert!(input.match_subrange(&mut pos, 0..2, true));
    }

    #[test]
    fn skip_to_any_byte() {
        let input = Utf8Input::new("abc*/def");
        assert_eq!(input.skip_to_any_byte(0, b"*"), Some(3));
        assert_eq!(input.skip_to_any_byte(4, b"*"), Some(8));
        assert_eq!(input.skip_to_any_byte(0, b"fd"), Some(5));
        let chars: Vec<char> = "abc".chars().collect();
        assert_eq!(CharsInput::new(&chars).skip_to_any_byte(0, b"c"), None);
    }
}
