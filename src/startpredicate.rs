//! Support for quickly finding potential match locations.
use crate::indexing::InputIndexer;
use crate::ir::Node;
use memchr::memmem;

/// A predicate which can skip ahead to the next position a match might start.
#[derive(Debug, Clone)]
pub enum StartPredicate {
    /// No predicate: every position is a candidate.
    Arbitrary,

    /// Every match begins with this non-empty byte sequence.
    ByteSeq(Box<memmem::Finder<'static>>),
}

impl StartPredicate {
    /// Compute a start predicate for \p node.
    pub fn for_node(node: &Node) -> Self {
        match node.leading_literal() {
            Some(lit) if !lit.is_empty() => StartPredicate::ByteSeq(Box::new(
                memmem::Finder::new(lit.as_bytes()).into_owned(),
            )),
            _ => StartPredicate::Arbitrary,
        }
    }

    /// \return the first position at or after \p pos where a match may start,
    /// or None if no match is possible.
    /// Inputs that are not byte-indexed are never filtered.
    pub fn find_start<Input: InputIndexer>(&self, input: &Input, pos: usize) -> Option<usize> {
        match self {
            StartPredicate::Arbitrary => Some(pos),
            StartPredicate::ByteSeq(finder) => match input.contents() {
                Some(bytes) => {
                    let rest = bytes.get(pos..)?;
                    finder.find(rest).map(|idx| pos + idx)
                }
                None => Some(pos),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::{CharsInput, Utf8Input};
    use std::sync::Arc;

    #[test]
    fn byte_seq_skips_ahead() {
        let node = Node::concat(
            Arc::new(Node::Literal("ab".into())),
            Arc::new(Node::End),
        );
        let sp = StartPredicate::for_node(&node);
        let input = Utf8Input::new("xxabyyab");
        assert_eq!(sp.find_start(&input, 0), Some(2));
        assert_eq!(sp.find_start(&input, 3), Some(6));
        assert_eq!(sp.find_start(&input, 7), None);

        let chars: Vec<char> = "xxab".chars().collect();
        assert_eq!(sp.find_start(&CharsInput::new(&chars), 1), Some(1));
    }

    #[test]
    fn arbitrary_without_literal() {
        let node = Node::End;
        let sp = StartPredicate::for_node(&node);
        assert!(matches!(sp, StartPredicate::Arbitrary));
        assert_eq!(sp.find_start(&Utf8Input::new("abc"), 2), Some(2));
    }
}
