//! Node tree for a pattern

use crate::types::CaptureHandle;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A predicate over a single unit.
pub type Predicate = Arc<dyn Fn(char) -> bool + Send + Sync>;

/// The node types of a pattern tree.
/// Children are held by `Arc`, so subtrees may be shared between patterns.
#[derive(Clone)]
pub enum Node {
    /// Match a literal, non-empty sequence of units.
    Literal(Box<str>),

    /// Match exactly one unit satisfying `predicate`.
    /// The name is only used for display.
    Checker {
        name: Cow<'static, str>,
        predicate: Predicate,
    },

    /// Match each node in turn.
    Concat(Vec<Arc<Node>>),

    /// Match the first node which matches, trying them in order.
    Alternate(Vec<Arc<Node>>),

    /// Match one unit, if the inner node would not match here.
    Negate(Arc<Node>),

    /// Match the inner node zero or one times.
    Optional(Arc<Node>),

    /// Match the inner node exactly `count` times.
    Repeat { body: Arc<Node>, count: usize },

    /// Match the inner node one or more times, greedily.
    Span(Arc<Node>),

    /// Match from a `from` delimiter through the matching `to` delimiter.
    Range {
        from: Box<str>,
        to: Box<str>,
        escape: Option<Box<str>>,
        nested: bool,
    },

    /// Match the inner node, recording its extent in a capture slot.
    CaptureDef {
        body: Arc<Node>,
        capture: CaptureHandle,
    },

    /// Match the text most recently recorded by a capture.
    CaptureRef(CaptureHandle),

    /// Match the end of the input.
    End,
}

/// Append \p node to \p items. If \p node is a sequence of the kind being
/// built, its children are spliced in instead, so chains of `+` or `|` stay
/// one level deep. A uniquely owned sequence is moved, not copied.
fn splice(items: &mut Vec<Arc<Node>>, node: Arc<Node>, concat: bool) {
    let same_kind = match &*node {
        Node::Concat(..) => concat,
        Node::Alternate(..) => !concat,
        _ => false,
    };
    if !same_kind {
        items.push(node);
        return;
    }
    match Arc::try_unwrap(node) {
        Ok(Node::Concat(children) | Node::Alternate(children)) => {
            if items.is_empty() {
                *items = children;
            } else {
                items.extend(children);
            }
        }
        Ok(other) => items.push(Arc::new(other)),
        Err(shared) => {
            if let Node::Concat(children) | Node::Alternate(children) = &*shared {
                items.extend(children.iter().cloned());
            }
        }
    }
}

impl Node {
    /// Build the concatenation of \p left and \p right.
    pub fn concat(left: Arc<Node>, right: Arc<Node>) -> Node {
        let mut items = Vec::new();
        splice(&mut items, left, true);
        splice(&mut items, right, true);
        Node::Concat(items)
    }

    /// Build the ordered alternation of \p left and \p right.
    pub fn alternate(left: Arc<Node>, right: Arc<Node>) -> Node {
        let mut items = Vec::new();
        splice(&mut items, left, false);
        splice(&mut items, right, false);
        Node::Alternate(items)
    }

    /// \return whether this node may succeed while consuming nothing.
    /// This is conservative: a true return may be spurious, a false return
    /// is always reliable.
    pub fn matches_empty(&self) -> bool {
        match self {
            Node::Literal(..) | Node::Checker { .. } | Node::Negate(..) | Node::Range { .. } => {
                false
            }
            Node::Concat(items) => items.iter().all(|n| n.matches_empty()),
            Node::Alternate(items) => items.iter().any(|n| n.matches_empty()),
            Node::Optional(..) | Node::End => true,
            Node::Repeat { body, .. } | Node::Span(body) => body.matches_empty(),
            Node::CaptureDef { body, .. } => body.matches_empty(),
            // The captured text may itself be empty.
            Node::CaptureRef(..) => true,
        }
    }

    /// \return a literal that every match of this node must begin with, if
    /// one is known.
    pub fn leading_literal(&self) -> Option<Cow<'_, str>> {
        match self {
            Node::Literal(text) => Some(Cow::Borrowed(&**text)),
            Node::Range { from, .. } => Some(Cow::Borrowed(&**from)),
            // If the first item may be empty, a later one could lead instead.
            Node::Concat(items) => match items.first() {
                Some(first) if !first.matches_empty() => first.leading_literal(),
                _ => None,
            },
            Node::Alternate(items) => {
                let (first, rest) = items.split_first()?;
                let mut shared = first.leading_literal()?;
                for item in rest {
                    let len = shared_prefix(&shared, &item.leading_literal()?).len();
                    if len == 0 {
                        return None;
                    }
                    shared = match shared {
                        Cow::Borrowed(s) => Cow::Borrowed(&s[..len]),
                        Cow::Owned(mut s) => {
                            s.truncate(len);
                            Cow::Owned(s)
                        }
                    };
                }
                Some(shared)
            }
            Node::Repeat { body, .. } | Node::Span(body) => body.leading_literal(),
            Node::CaptureDef { body, .. } => body.leading_literal(),
            Node::Checker { .. }
            | Node::Negate(..)
            | Node::Optional(..)
            | Node::CaptureRef(..)
            | Node::End => None,
        }
    }

    /// Visit this node and all of its descendants, preorder.
    pub fn walk<F: FnMut(&Node)>(&self, func: &mut F) {
        func(self);
        match self {
            Node::Literal(..)
            | Node::Checker { .. }
            | Node::Range { .. }
            | Node::CaptureRef(..)
            | Node::End => {}
            Node::Concat(items) | Node::Alternate(items) => {
                for item in items {
                    item.walk(func);
                }
            }
            Node::Negate(body)
            | Node::Optional(body)
            | Node::Span(body)
            | Node::Repeat { body, .. }
            | Node::CaptureDef { body, .. } => body.walk(func),
        }
    }

    /// \return the number of nodes in this tree, counting shared subtrees
    /// once per use.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// \return the captures defined in this tree (sorted by id, without
    /// duplicates) and every capture reference, in tree order.
    pub fn capture_usage(&self) -> (Vec<CaptureHandle>, Vec<CaptureHandle>) {
        let mut defs: Vec<CaptureHandle> = Vec::new();
        let mut refs: Vec<CaptureHandle> = Vec::new();
        self.walk(&mut |n| match n {
            Node::CaptureDef { capture, .. } => defs.push(capture.clone()),
            Node::CaptureRef(capture) => refs.push(capture.clone()),
            _ => {}
        });
        defs.sort_by_key(CaptureHandle::id);
        defs.dedup_by_key(|h| h.id());
        (defs, refs)
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            f.write_str("..")?;
        }
        match self {
            Node::Literal(text) => writeln!(f, "Literal {:?}", text)?,
            Node::Checker { name, .. } => writeln!(f, "Checker {}", name)?,
            Node::Concat(..) => writeln!(f, "Concat")?,
            Node::Alternate(..) => writeln!(f, "Alternate")?,
            Node::Negate(..) => writeln!(f, "Negate")?,
            Node::Optional(..) => writeln!(f, "Optional")?,
            Node::Repeat { count, .. } => writeln!(f, "Repeat x{}", count)?,
            Node::Span(..) => writeln!(f, "Span")?,
            Node::Range {
                from,
                to,
                escape,
                nested,
            } => {
                write!(f, "Range {:?}..{:?}", from, to)?;
                if let Some(escape) = escape {
                    write!(f, " escape {:?}", escape)?;
                }
                if *nested {
                    f.write_str(" nested")?;
                }
                writeln!(f)?;
            }
            Node::CaptureDef { capture, .. } => writeln!(f, "CaptureDef {}", capture)?,
            Node::CaptureRef(capture) => writeln!(f, "CaptureRef {}", capture)?,
            Node::End => writeln!(f, "End")?,
        }
        match self {
            Node::Concat(items) | Node::Alternate(items) => {
                for item in items {
                    item.fmt_indented(f, depth + 1)?;
                }
                Ok(())
            }
            Node::Negate(body)
            | Node::Optional(body)
            | Node::Span(body)
            | Node::Repeat { body, .. }
            | Node::CaptureDef { body, .. } => body.fmt_indented(f, depth + 1),
            _ => Ok(()),
        }
    }
}

/// \return the longest common prefix of two strings, on a char boundary.
fn shared_prefix<'s>(s1: &'s str, s2: &str) -> &'s str {
    let len = s1
        .char_indices()
        .zip(s2.chars())
        .take_while(|((_, c1), c2)| c1 == c2)
        .last()
        .map_or(0, |((idx, c1), _)| idx + c1.len_utf8());
    &s1[..len]
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Node::Checker { name, .. } => f.debug_struct("Checker").field("name", name).finish(),
            Node::Concat(items) => f.debug_tuple("Concat").field(items).finish(),
            Node::Alternate(items) => f.debug_tuple("Alternate").field(items).finish(),
            Node::Negate(body) => f.debug_tuple("Negate").field(body).finish(),
            Node::Optional(body) => f.debug_tuple("Optional").field(body).finish(),
            Node::Repeat { body, count } => f
                .debug_struct("Repeat")
                .field("body", body)
                .field("count", count)
                .finish(),
            Node::Span(body) => f.debug_tuple("Span").field(body).finish(),
            Node::Range {
                from,
                to,
                escape,
                nested,
            } => f
                .debug_struct("Range")
                .field("from", from)
                .field("to", to)
                .field("escape", escape)
                .field("nested", nested)
                .finish(),
            Node::CaptureDef { body, capture } => f
                .debug_struct("CaptureDef")
                .field("body", body)
                .field("capture", &capture.name())
                .finish(),
            Node::CaptureRef(capture) => f.debug_tuple("CaptureRef").field(&capture.name()).finish(),
            Node::End => f.write_str("End"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Arc<Node> {
        Arc::new(Node::Literal(s.into()))
    }

    #[test]
    fn empty_analysis() {
        assert!(!lit("a").matches_empty());
        assert!(Node::Optional(lit("a")).matches_empty());
        assert!(!Node::concat(Arc::new(Node::Optional(lit("a"))), lit("b")).matches_empty());
        assert!(Node::alternate(lit("a"), Arc::new(Node::End)).matches_empty());
        assert!(!Node::Negate(Arc::new(Node::End)).matches_empty());
    }

    #[test]
    fn leading_literals() {
        let cat = Node::concat(lit("Hello"), lit("World"));
        assert_eq!(cat.leading_literal().as_deref(), Some("Hello"));

        let alt = Node::alternate(lit("Hello"), lit("Help"));
        assert_eq!(alt.leading_literal().as_deref(), Some("Hel"));

        let alt = Node::alternate(Arc::new(alt), lit("Hex"));
        assert_eq!(alt.leading_literal().as_deref(), Some("He"));

        let alt = Node::alternate(lit("\u{00E9}a"), lit("\u{00E9}b"));
        assert_eq!(alt.leading_literal().as_deref(), Some("\u{00E9}"));

        let alt = Node::alternate(lit("Hello"), lit("Goodbye"));
        assert_eq!(alt.leading_literal(), None);

        let opt = Node::concat(Arc::new(Node::Optional(lit("a"))), lit("b"));
        assert_eq!(opt.leading_literal(), None);
    }

    #[test]
    fn capture_usage_dedups_definitions() {
        let h = CaptureHandle::new(Some("x"));
        let def = Arc::new(Node::CaptureDef {
            body: lit("a"),
            capture: h.clone(),
        });
        let tree = Node::concat(
            Arc::new(Node::concat(def.clone(), def)),
            Arc::new(Node::CaptureRef(h.clone())),
        );
        let (defs, refs) = tree.capture_usage();
        assert_eq!(defs, vec![h.clone()]);
        assert_eq!(refs, vec![h]);
        assert_eq!(tree.node_count(), 6);
    }

    #[test]
    fn display_dumps_tree() {
        let tree = Node::Span(Arc::new(Node::alternate(lit("a"), lit("b"))));
        assert_eq!(
            tree.to_string(),
            "Span\n..Alternate\n....Literal \"a\"\n....Literal \"b\"\n"
        );
    }

    #[test]
    fn sequences_stay_flat() {
        let mut chain = lit("a");
        for _ in 0..10 {
            chain = Arc::new(Node::concat(chain, lit("b")));
        }
        match &*chain {
            Node::Concat(items) => assert_eq!(items.len(), 11),
            _ => panic!("Expected a concatenation"),
        }

        // Shared operands are copied, never modified.
        let shared = Arc::new(Node::alternate(lit("a"), lit("b")));
        let longer = Node::alternate(shared.clone(), lit("c"));
        let prefixed = Node::alternate(lit("z"), shared.clone());
        match (&*shared, &longer, &prefixed) {
            (Node::Alternate(s), Node::Alternate(l), Node::Alternate(p)) => {
                assert_eq!((s.len(), l.len(), p.len()), (2, 3, 3));
                assert!(Arc::ptr_eq(&s[0], &l[0]));
                assert!(Arc::ptr_eq(&s[1], &p[2]));
            }
            _ => panic!("Expected alternations"),
        }

        // Different kinds do not merge.
        let mixed = Node::concat(shared, lit("c"));
        match mixed {
            Node::Concat(items) => assert_eq!(items.len(), 2),
            _ => panic!("Expected a concatenation"),
        }
    }
}
