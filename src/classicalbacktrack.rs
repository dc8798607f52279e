//! Classical backtracking execution engine

use crate::api::{Flags, Outcome};
use crate::cursor::{Cursor, Mark};
use crate::indexing::InputIndexer;
use crate::ir::Node;
use crate::types::{CaptureHandle, Range, SlotIndex};

/// An entry on the undo trail: the previous contents of a capture slot.
#[derive(Debug, Clone)]
struct SetCaptureSlot {
    slot: SlotIndex,
    data: Option<Range>,
}

/// Everything needed to backtrack: the cursor position and the height of the
/// undo trail.
#[derive(Debug, Copy, Clone)]
struct Checkpoint {
    mark: Mark,
    trail: usize,
}

/// Drives a node tree against a cursor.
///
/// Failure of any node restores both the cursor and every capture slot the
/// node wrote, so no partial state leaks out of a failed attempt.
#[derive(Debug)]
pub(crate) struct MatchAttempter<'a> {
    /// The captures defined by the tree, sorted by id. A capture's slot is its
    /// index here.
    handles: &'a [CaptureHandle],
    flags: Flags,
    captures: Vec<Option<Range>>,
    trail: Vec<SetCaptureSlot>,
}

impl<'a> MatchAttempter<'a> {
    pub(crate) fn new(handles: &'a [CaptureHandle], flags: Flags) -> Self {
        Self {
            handles,
            flags,
            captures: vec![None; handles.len()],
            trail: Vec::new(),
        }
    }

    /// Consume the attempter, producing the final capture table.
    pub(crate) fn into_captures(self) -> Vec<Option<Range>> {
        self.captures
    }

    #[inline(always)]
    fn save<Input: InputIndexer>(&self, cursor: &Cursor<Input>) -> Checkpoint {
        Checkpoint {
            mark: cursor.checkpoint(),
            trail: self.trail.len(),
        }
    }

    fn backtrack<Input: InputIndexer>(&mut self, cursor: &mut Cursor<Input>, cp: Checkpoint) {
        cursor.rewind(cp.mark);
        while self.trail.len() > cp.trail {
            if let Some(SetCaptureSlot { slot, data }) = self.trail.pop() {
                self.captures[slot] = data;
            }
        }
    }

    fn slot_of(&self, capture: &CaptureHandle) -> Option<SlotIndex> {
        self.handles
            .binary_search_by_key(&capture.id(), CaptureHandle::id)
            .ok()
    }

    fn set_capture(&mut self, slot: SlotIndex, range: Range) {
        let data = self.captures[slot].replace(range);
        self.trail.push(SetCaptureSlot { slot, data });
    }

    /// Attempt to match \p node at the cursor.
    /// On success the cursor is left past the consumed text. On failure the
    /// cursor and captures are as they were on entry.
    pub(crate) fn try_match<Input: InputIndexer>(
        &mut self,
        node: &Node,
        cursor: &mut Cursor<Input>,
    ) -> Outcome {
        let entry = self.save(cursor);
        if self.run(node, cursor) {
            Outcome::from_range(entry.mark.position()..cursor.position())
        } else {
            self.backtrack(cursor, entry);
            Outcome::Failure
        }
    }

    /// Succeed, consuming one unit, iff \p node would not match at the cursor.
    /// Fails without consuming if \p node matches or there is nothing left.
    pub(crate) fn try_not_match<Input: InputIndexer>(
        &mut self,
        node: &Node,
        cursor: &mut Cursor<Input>,
    ) -> Outcome {
        let entry = self.save(cursor);
        let matched = self.try_match(node, cursor).is_success();
        self.backtrack(cursor, entry);
        if matched || cursor.next_unit().is_none() {
            return Outcome::Failure;
        }
        Outcome::from_range(entry.mark.position()..cursor.position())
    }

    /// Match \p node. On a false return, the cursor and captures are
    /// unspecified; try_match() puts them back.
    fn run<Input: InputIndexer>(&mut self, node: &Node, cursor: &mut Cursor<Input>) -> bool {
        let icase = self.flags.icase;
        match node {
            Node::Literal(text) => cursor.try_match_lit(text, icase),

            Node::Checker { predicate, .. } => match cursor.next_unit() {
                Some(c) => predicate(c),
                None => false,
            },

            // All or nothing: if a later item fails, try_match() rewinds to
            // before the first.
            Node::Concat(items) => items
                .iter()
                .all(|item| self.try_match(item, cursor).is_success()),

            // Ordered choice. A failed branch has already restored the cursor.
            Node::Alternate(items) => items
                .iter()
                .any(|item| self.try_match(item, cursor).is_success()),

            Node::Negate(body) => self.try_not_match(body, cursor).is_success(),

            Node::Optional(body) => {
                self.try_match(body, cursor);
                true
            }

            Node::Repeat { body, count } => {
                for _ in 0..*count {
                    if !self.try_match(body, cursor).is_success() {
                        return false;
                    }
                }
                true
            }

            Node::Span(body) => self.run_span(body, cursor),

            Node::Range {
                from,
                to,
                escape,
                nested,
            } => self.run_range(cursor, from, to, escape.as_deref(), *nested),

            Node::CaptureDef { body, capture } => {
                let start = cursor.position();
                if !self.try_match(body, cursor).is_success() {
                    return false;
                }
                if let Some(slot) = self.slot_of(capture) {
                    self.set_capture(slot, start..cursor.position());
                }
                true
            }

            // An unset capture cannot be replayed, so the reference fails.
            Node::CaptureRef(capture) => {
                match self.slot_of(capture).and_then(|slot| self.captures[slot].clone()) {
                    Some(range) => cursor.try_match_subrange(range, icase),
                    None => false,
                }
            }

            Node::End => cursor.at_end(),
        }
    }

    // Greedily repeat \p body, at least once. A zero-length iteration ends the
    // loop, so a body which stops consuming cannot spin.
    fn run_span<Input: InputIndexer>(&mut self, body: &Node, cursor: &mut Cursor<Input>) -> bool {
        let mut iters = 0usize;
        loop {
            match self.try_match(body, cursor) {
                Outcome::Success { length, .. } if length > 0 => iters += 1,
                _ => break,
            }
        }
        iters > 0
    }

    // Match a delimited range. After `from`, scan forward one unit at a time:
    // skip escapes, track depth if nested, and stop at a `to` at depth zero.
    fn run_range<Input: InputIndexer>(
        &mut self,
        cursor: &mut Cursor<Input>,
        from: &str,
        to: &str,
        escape: Option<&str>,
        nested: bool,
    ) -> bool {
        let icase = self.flags.icase;
        if !cursor.try_match_lit(from, icase) {
            return false;
        }

        // Interesting bytes: the first byte of each delimiter we look for.
        // Case folding could change those bytes, so skip the search then.
        let mut needles: Vec<u8> = Vec::with_capacity(3);
        if !icase {
            let delims = [Some(to), escape, if nested { Some(from) } else { None }];
            for delim in delims.iter().flatten() {
                if let Some(&b) = delim.as_bytes().first() {
                    if !needles.contains(&b) {
                        needles.push(b);
                    }
                }
            }
        }
        // An escape which already ends with the closing delimiter is skipped
        // on its own. Any other escape only counts when a closing delimiter
        // follows it, and then both are skipped.
        let escape_includes_to = escape.map_or(false, |esc| esc.ends_with(to));

        let mut depth = 0usize;
        loop {
            if !needles.is_empty() {
                cursor.skip_to_any_byte(&needles);
            }
            if cursor.at_end() {
                return false;
            }
            if let Some(esc) = escape {
                let before = cursor.checkpoint();
                if cursor.try_match_lit(esc, icase) {
                    if escape_includes_to || cursor.try_match_lit(to, icase) {
                        continue;
                    }
                    // Not an escaped delimiter: the escape's units are
                    // ordinary content and may still start a `to`.
                    cursor.rewind(before);
                }
            }
            if nested && cursor.try_match_lit(from, icase) {
                depth += 1;
                continue;
            }
            if cursor.try_match_lit(to, icase) {
                if depth == 0 {
                    return true;
                }
                depth -= 1;
                continue;
            }
            cursor.advance(1);
        }
    }
}
