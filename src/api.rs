use crate::classicalbacktrack::MatchAttempter;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::exec::Matches;
use crate::indexing::{CharsInput, InputIndexer, Utf8Input};
use crate::ir::Node;
use crate::pattern::Pattern;
use crate::startpredicate::StartPredicate;
use crate::types::{CaptureHandle, Range, MAX_CAPTURE_SLOTS};

use core::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Flags used to control matching.
/// The default flags are case-sensitive and prefiltering.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    /// If set, literals, range delimiters and back-references compare
    /// ASCII letters case-insensitively. Other units still compare ordinally.
    pub icase: bool,

    /// If set, searches try every position instead of skipping ahead to
    /// occurrences of the pattern's leading literal.
    pub no_prefilter: bool,
}

impl Flags {
    /// Construct a Flags from flag characters.
    /// 'i' means to ignore case, 'p' means no prefilter.
    /// Other characters are ignored.
    #[inline]
    pub fn new<T: Iterator<Item = char>>(chars: T) -> Self {
        let mut result = Self::default();
        for c in chars {
            match c {
                'i' => {
                    result.icase = true;
                }
                'p' => {
                    result.no_prefilter = true;
                }
                _ => {
                    // Silently skip unsupported flags.
                }
            }
        }
        result
    }
}

impl From<&str> for Flags {
    /// Construct a Flags from a string of flag characters.
    ///
    /// See also: [`Flags::new`].
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s.chars())
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.icase {
            f.write_str("i")?;
        }
        if self.no_prefilter {
            f.write_str("p")?;
        }
        Ok(())
    }
}

/// The result of running a pattern at a position.
///
/// `start` and `length` are positions in the input: byte offsets for `&str`
/// input, element indexes for `&[char]` input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The pattern matched `length` positions starting at `start`.
    Success { start: usize, length: usize },

    /// The pattern did not match.
    Failure,
}

impl Outcome {
    #[inline]
    pub(crate) fn from_range(range: Range) -> Self {
        debug_assert!(range.start <= range.end, "Reversed range");
        Outcome::Success {
            start: range.start,
            length: range.end - range.start,
        }
    }

    /// \return whether this is a success.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// \return whether this is a failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Returns the starting position of the match.
    #[inline]
    pub fn start(&self) -> Option<usize> {
        match *self {
            Outcome::Success { start, .. } => Some(start),
            Outcome::Failure => None,
        }
    }

    /// Returns the number of positions consumed.
    #[inline]
    pub fn length(&self) -> Option<usize> {
        match *self {
            Outcome::Success { length, .. } => Some(length),
            Outcome::Failure => None,
        }
    }

    /// Returns the position just past the match.
    #[inline]
    pub fn end(&self) -> Option<usize> {
        self.range().map(|r| r.end)
    }

    /// Returns the range of positions consumed.
    #[inline]
    pub fn range(&self) -> Option<Range> {
        match *self {
            Outcome::Success { start, length } => Some(start..start + length),
            Outcome::Failure => None,
        }
    }

    /// Extract the matched text from the string this outcome came from.
    #[inline]
    pub fn text<'t>(&self, input: &'t str) -> Option<&'t str> {
        input.get(self.range()?)
    }

    /// Extract the matched units from the buffer this outcome came from.
    #[inline]
    pub fn chars<'t>(&self, input: &'t [char]) -> Option<&'t [char]> {
        input.get(self.range()?)
    }
}

impl From<Outcome> for bool {
    #[inline]
    fn from(outcome: Outcome) -> bool {
        outcome.is_success()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Outcome::Success { start, length } => {
                write!(f, "Success({}..{})", start, start + length)
            }
            Outcome::Failure => f.write_str("Failure"),
        }
    }
}

/// A Match is a successful outcome together with the captures recorded
/// while producing it.
#[derive(Debug, Clone)]
pub struct Match {
    /// The total range of the match. Note this may be empty, if the pattern
    /// matched an empty string.
    pub range: Range,

    /// The captures, one per capture defined in the pattern, in creation
    /// order. A value of None means that capture did not participate (for
    /// example, it was in a not-taken branch of an alternation).
    pub captures: Vec<Option<Range>>,

    handles: Arc<[CaptureHandle]>,
}

impl Match {
    /// Returns the range over the starting and ending positions of the match.
    ///
    /// This is a convenience function to work around
    /// the fact that Range does not support Copy.
    #[inline]
    pub fn range(&self) -> Range {
        self.range.clone()
    }

    /// Returns the starting position of the match.
    #[inline]
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// Returns the position just past the match.
    #[inline]
    pub fn end(&self) -> usize {
        self.range.end
    }

    /// Returns the match as an Outcome.
    #[inline]
    pub fn outcome(&self) -> Outcome {
        Outcome::from_range(self.range())
    }

    /// Access a capture by its handle.
    /// Returns None if the capture did not participate in the match, or is
    /// not part of this pattern.
    #[inline]
    pub fn capture(&self, handle: &CaptureHandle) -> Option<Range> {
        let idx = self
            .handles
            .binary_search_by_key(&handle.id(), CaptureHandle::id)
            .ok()?;
        self.captures[idx].clone()
    }

    /// Access a capture by name. If several captures share the name, the
    /// first one created wins.
    #[inline]
    pub fn named_capture(&self, name: &str) -> Option<Range> {
        let idx = self.handles.iter().position(|h| h.name() == name)?;
        self.captures[idx].clone()
    }

    /// Return an iterator over the captures of a Match, with their names.
    #[inline]
    pub fn named_captures(&self) -> NamedCaptures<'_> {
        NamedCaptures { mat: self, idx: 0 }
    }
}

/// An iterator over the named captures of a [`Match`]
///
/// This struct is created by the [`named_captures`] method on [`Match`].
///
/// [`named_captures`]: Match::named_captures
#[derive(Clone)]
pub struct NamedCaptures<'m> {
    mat: &'m Match,
    idx: usize,
}

impl<'m> Iterator for NamedCaptures<'m> {
    type Item = (&'m str, Option<Range>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.mat.handles.get(self.idx)?;
        let range = self.mat.captures[self.idx].clone();
        self.idx += 1;
        Some((handle.name(), range))
    }
}

/// An Engine is the validated, reusable form of a [`Pattern`].
///
/// Compiling checks the whole tree (every capture reference must have a
/// definition in the same tree) and assigns capture slots. An Engine is
/// immutable: it may be shared between threads and matched concurrently,
/// since every call owns its own cursor and capture table.
#[derive(Debug, Clone)]
pub struct Engine {
    root: Arc<Node>,
    flags: Flags,
    handles: Arc<[CaptureHandle]>,
    start: StartPredicate,
}

impl Engine {
    /// Compile \p pattern using the default flags.
    #[inline]
    pub fn new(pattern: &Pattern) -> Result<Engine, Error> {
        Self::with_flags(pattern, Flags::default())
    }

    /// Compile \p pattern with \p flags.
    pub fn with_flags<F>(pattern: &Pattern, flags: F) -> Result<Engine, Error>
    where
        F: Into<Flags>,
    {
        let flags = flags.into();
        let root = pattern.root().clone();
        let (defs, refs) = root.capture_usage();
        if defs.len() > MAX_CAPTURE_SLOTS {
            debug!(captures = defs.len(), "rejected pattern: too many captures");
            return Err(Error::TooManyCaptures);
        }
        for capture in refs.iter() {
            if defs.binary_search_by_key(&capture.id(), CaptureHandle::id).is_err() {
                debug!(capture = capture.name(), "rejected pattern: undefined capture");
                return Err(Error::UndefinedCapture {
                    name: capture.name().to_string(),
                });
            }
        }
        let start = if flags.icase || flags.no_prefilter {
            StartPredicate::Arbitrary
        } else {
            StartPredicate::for_node(&root)
        };
        debug!(
            nodes = root.node_count(),
            captures = defs.len(),
            flags = %flags,
            prefilter = !matches!(start, StartPredicate::Arbitrary),
            "compiled pattern"
        );
        Ok(Engine {
            root,
            flags,
            handles: defs.into(),
            start,
        })
    }

    /// The flags this engine was compiled with.
    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The pattern this engine was compiled from.
    #[inline]
    pub fn pattern(&self) -> Pattern {
        Pattern::from_root(self.root.clone())
    }

    /// The captures defined by this engine's pattern, in creation order.
    #[inline]
    pub fn captures(&self) -> &[CaptureHandle] {
        &self.handles
    }

    #[inline]
    pub(crate) fn start_predicate(&self) -> &StartPredicate {
        &self.start
    }

    /// Match at the start of `text`. Trailing input is not required to be
    /// consumed.
    #[inline]
    pub fn consume(&self, text: &str) -> Outcome {
        self.consume_cursor(&mut Cursor::from(text))
    }

    /// Match at the start of the char buffer `chars`.
    #[inline]
    pub fn consume_chars(&self, chars: &[char]) -> Outcome {
        self.consume_cursor(&mut Cursor::from(chars))
    }

    /// Match at byte offset `start` of `text`.
    pub fn consume_from(&self, text: &str, start: usize) -> Result<Outcome, Error> {
        let mut cursor = Cursor::starting_at(Utf8Input::new(text), start)?;
        Ok(self.consume_cursor(&mut cursor))
    }

    /// Match at the cursor's position. On success, the cursor is left past
    /// the consumed text; on failure it does not move.
    pub fn consume_cursor<Input: InputIndexer>(&self, cursor: &mut Cursor<Input>) -> Outcome {
        let mut attempter = MatchAttempter::new(&self.handles, self.flags);
        let outcome = attempter.try_match(&self.root, cursor);
        trace!(position = cursor.position(), outcome = %outcome, "consume");
        outcome
    }

    /// Match one unit at the start of `text`, iff the pattern does not match
    /// there.
    #[inline]
    pub fn neglect(&self, text: &str) -> Outcome {
        self.neglect_cursor(&mut Cursor::from(text))
    }

    /// Like neglect(), over a char buffer.
    #[inline]
    pub fn neglect_chars(&self, chars: &[char]) -> Outcome {
        self.neglect_cursor(&mut Cursor::from(chars))
    }

    /// Consume one unit at the cursor, iff the pattern does not match there.
    pub fn neglect_cursor<Input: InputIndexer>(&self, cursor: &mut Cursor<Input>) -> Outcome {
        let mut attempter = MatchAttempter::new(&self.handles, self.flags);
        let outcome = attempter.try_not_match(&self.root, cursor);
        trace!(position = cursor.position(), outcome = %outcome, "neglect");
        outcome
    }

    /// Like consume(), but also report the captures.
    #[inline]
    pub fn exec(&self, text: &str) -> Option<Match> {
        self.exec_cursor(&mut Cursor::from(text))
    }

    /// Like exec(), over a char buffer.
    #[inline]
    pub fn exec_chars(&self, chars: &[char]) -> Option<Match> {
        self.exec_cursor(&mut Cursor::from(chars))
    }

    /// Match at the cursor's position, reporting the captures.
    pub fn exec_cursor<Input: InputIndexer>(&self, cursor: &mut Cursor<Input>) -> Option<Match> {
        let mut attempter = MatchAttempter::new(&self.handles, self.flags);
        let range = attempter.try_match(&self.root, cursor).range()?;
        Some(Match {
            range,
            captures: attempter.into_captures(),
            handles: self.handles.clone(),
        })
    }

    /// Searches `text` to find the first match.
    #[inline]
    pub fn find(&self, text: &str) -> Option<Match> {
        self.find_iter(text).next()
    }

    /// Searches `text`, returning an iterator over non-overlapping matches.
    /// Note that the resulting Iterator borrows both the engine `'r` and the
    /// input string as `'t`.
    #[inline]
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, Utf8Input<'t>> {
        Matches::new(self, Utf8Input::new(text), 0)
    }

    /// Returns an iterator for matches found in `text` starting at byte index
    /// `start`.
    pub fn find_from<'r, 't>(
        &'r self,
        text: &'t str,
        start: usize,
    ) -> Result<Matches<'r, Utf8Input<'t>>, Error> {
        let cursor = Cursor::starting_at(Utf8Input::new(text), start)?;
        Ok(Matches::new(self, cursor.input(), start))
    }

    /// Searches the char buffer `chars`, returning an iterator over
    /// non-overlapping matches.
    #[inline]
    pub fn find_iter_chars<'r, 't>(&'r self, chars: &'t [char]) -> Matches<'r, CharsInput<'t>> {
        Matches::new(self, CharsInput::new(chars), 0)
    }
}

impl TryFrom<&Pattern> for Engine {
    type Error = Error;

    #[inline]
    fn try_from(pattern: &Pattern) -> Result<Self, Error> {
        Engine::new(pattern)
    }
}

impl TryFrom<Pattern> for Engine {
    type Error = Error;

    #[inline]
    fn try_from(pattern: Pattern) -> Result<Self, Error> {
        Engine::new(&pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_round_trip_through_display() {
        let flags = Flags::from("ipx");
        assert!(flags.icase);
        assert!(flags.no_prefilter);
        assert_eq!(flags.to_string(), "ip");
        assert_eq!(Flags::default().to_string(), "");
    }

    #[test]
    fn outcome_accessors() {
        let ok = Outcome::Success {
            start: 2,
            length: 3,
        };
        assert!(ok.is_success());
        assert!(bool::from(ok));
        assert_eq!(ok.range(), Some(2..5));
        assert_eq!(ok.text("xxHeyxx"), Some("Hey"));
        assert_eq!(ok.to_string(), "Success(2..5)");

        let chars: Vec<char> = "xxHeyxx".chars().collect();
        assert_eq!(ok.chars(&chars), Some(&['H', 'e', 'y'][..]));

        assert!(!bool::from(Outcome::Failure));
        assert_eq!(Outcome::Failure.text("abc"), None);
        assert_eq!(Outcome::Failure.to_string(), "Failure");
    }

    #[test]
    fn outcome_is_representation_stable() {
        let a = Outcome::from_range(1..4);
        let b = Outcome::Success {
            start: 1,
            length: 3,
        };
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        assert_send_sync::<Pattern>();
    }
}
