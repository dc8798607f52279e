//! Building patterns.
//!
//! A [`Pattern`] is an immutable tree of nodes. Every operation returns a new
//! pattern wrapping its operands; operands are shared, never modified, so a
//! pattern may be reused in any number of larger patterns.

use crate::api::{Engine, Flags};
use crate::error::Error;
use crate::ir::{Node, Predicate};
use crate::matchers;
use crate::types::CaptureHandle;
use core::ops;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// An immutable, reusable tree of matching nodes.
///
/// # Example
///
/// ```rust
/// use combex::Pattern;
/// let greeting = Pattern::literal("Hello").unwrap() | Pattern::literal("Goodbye").unwrap();
/// let engine = greeting.compile().unwrap();
/// assert!(engine.consume("Goodbye, world").is_success());
/// ```
#[derive(Clone)]
pub struct Pattern {
    root: Arc<Node>,
}

fn reject(err: Error) -> Error {
    debug!(%err, "rejected pattern construction");
    err
}

fn non_empty(text: &str, param: &'static str) -> Result<Box<str>, Error> {
    if text.is_empty() {
        return Err(reject(Error::EmptyArgument { param }));
    }
    Ok(text.into())
}

impl Pattern {
    #[inline]
    fn from_node(node: Node) -> Self {
        Pattern {
            root: Arc::new(node),
        }
    }

    #[inline]
    pub(crate) fn from_root(root: Arc<Node>) -> Self {
        Pattern { root }
    }

    #[inline]
    pub(crate) fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// Match `text` exactly, by ordinal comparison.
    /// Fails with `EmptyArgument` if `text` is empty.
    pub fn literal(text: &str) -> Result<Pattern, Error> {
        Ok(Self::from_node(Node::Literal(non_empty(text, "literal")?)))
    }

    /// Match the single unit `c`.
    pub fn char(c: char) -> Pattern {
        let mut buf = [0; 4];
        Self::from_node(Node::Literal(c.encode_utf8(&mut buf).into()))
    }

    /// Match one unit for which `predicate` holds. `name` only appears in
    /// diagnostics.
    pub fn checker<F>(name: &str, predicate: F) -> Pattern
    where
        F: Fn(char) -> bool + Send + Sync + 'static,
    {
        Self::builtin(Cow::Owned(name.to_string()), Arc::new(predicate))
    }

    fn builtin(name: Cow<'static, str>, predicate: Predicate) -> Pattern {
        Self::from_node(Node::Checker { name, predicate })
    }

    /// Match any single unit.
    pub fn any() -> Pattern {
        Self::builtin(Cow::Borrowed("any"), Arc::new(matchers::is_any))
    }

    /// Match one alphabetic unit.
    pub fn letter() -> Pattern {
        Self::builtin(Cow::Borrowed("letter"), Arc::new(matchers::is_letter))
    }

    /// Match one ASCII digit.
    pub fn digit() -> Pattern {
        Self::builtin(Cow::Borrowed("digit"), Arc::new(matchers::is_digit))
    }

    /// Match one whitespace unit.
    pub fn whitespace() -> Pattern {
        Self::builtin(Cow::Borrowed("whitespace"), Arc::new(matchers::is_whitespace))
    }

    /// Match one alphabetic or numeric unit.
    pub fn alphanumeric() -> Pattern {
        Self::builtin(Cow::Borrowed("alphanumeric"), Arc::new(matchers::is_alphanumeric))
    }

    /// Match one ASCII word unit: letter, digit or underscore.
    pub fn word() -> Pattern {
        Self::builtin(Cow::Borrowed("word"), Arc::new(matchers::is_word_char))
    }

    pub fn uppercase() -> Pattern {
        Self::builtin(Cow::Borrowed("uppercase"), Arc::new(matchers::is_uppercase))
    }

    pub fn lowercase() -> Pattern {
        Self::builtin(Cow::Borrowed("lowercase"), Arc::new(matchers::is_lowercase))
    }

    pub fn punctuation() -> Pattern {
        Self::builtin(Cow::Borrowed("punctuation"), Arc::new(matchers::is_punctuation))
    }

    /// Match one line terminator.
    pub fn line_terminator() -> Pattern {
        Self::builtin(
            Cow::Borrowed("line_terminator"),
            Arc::new(matchers::is_line_terminator),
        )
    }

    /// Match one unit from `chars`.
    pub fn one_of(chars: &str) -> Result<Pattern, Error> {
        let set: Box<[char]> = non_empty(chars, "chars")?.chars().collect();
        let name = format!("one_of({:?})", chars);
        Ok(Self::checker(&name, move |c| set.contains(&c)))
    }

    /// Match one unit in the inclusive range `first..=last`.
    pub fn char_range(first: char, last: char) -> Result<Pattern, Error> {
        if first > last {
            return Err(reject(Error::ReversedCharRange { first, last }));
        }
        let name = format!("{:?}..={:?}", first, last);
        Ok(Self::checker(&name, move |c| first <= c && c <= last))
    }

    /// Match only at the end of the input, consuming nothing.
    pub fn end() -> Pattern {
        Self::from_node(Node::End)
    }

    /// Match everything from `from` through the next `to`.
    pub fn range(from: &str, to: &str) -> Result<Pattern, Error> {
        Self::range_with(from, to, None, false)
    }

    /// Like range(), but an `escape` sequence inside the range never ends it.
    pub fn range_escaped(from: &str, to: &str, escape: &str) -> Result<Pattern, Error> {
        Self::range_with(from, to, Some(escape), false)
    }

    /// Like range(), but inner `from`..`to` pairs nest, so the range ends at
    /// the `to` that balances the opening `from`.
    pub fn range_nested(from: &str, to: &str) -> Result<Pattern, Error> {
        Self::range_with(from, to, None, true)
    }

    /// The general range constructor.
    ///
    /// An escape which ends with `to` is skipped wherever it occurs. Any
    /// other escape (a lone backslash, say) only protects a `to` directly
    /// after it; elsewhere its units are ordinary content.
    pub fn range_with(
        from: &str,
        to: &str,
        escape: Option<&str>,
        nested: bool,
    ) -> Result<Pattern, Error> {
        let from = non_empty(from, "from")?;
        let to = non_empty(to, "to")?;
        let escape = escape.map(|esc| non_empty(esc, "escape")).transpose()?;
        if nested && from == to {
            return Err(reject(Error::AmbiguousNesting {
                delimiter: from.into(),
            }));
        }
        Ok(Self::from_node(Node::Range {
            from,
            to,
            escape,
            nested,
        }))
    }

    /// Match a back-reference: the text most recently recorded by `capture`.
    /// Reaching the reference before the capture has matched is a match
    /// failure.
    pub fn backref(capture: &CaptureHandle) -> Pattern {
        Self::from_node(Node::CaptureRef(capture.clone()))
    }

    /// Match self, then `next`.
    pub fn then<P: IntoPattern>(&self, next: P) -> Result<Pattern, Error> {
        concatenate(self, next)
    }

    /// Match self, or failing that, `other`.
    pub fn or<P: IntoPattern>(&self, other: P) -> Result<Pattern, Error> {
        alternate(self, other)
    }

    /// Match one unit where self does not match.
    pub fn negate(&self) -> Pattern {
        Self::from_node(Node::Negate(self.root.clone()))
    }

    /// Match self zero or one times.
    pub fn optional(&self) -> Pattern {
        Self::from_node(Node::Optional(self.root.clone()))
    }

    /// Match self exactly `count` times.
    pub fn repeat(&self, count: usize) -> Result<Pattern, Error> {
        if count == 0 {
            return Err(reject(Error::NonPositiveCount { count }));
        }
        Ok(Self::from_node(Node::Repeat {
            body: self.root.clone(),
            count,
        }))
    }

    /// Match self one or more times, greedily.
    /// Fails with `ZeroWidthSpan` if self can match the empty string, since
    /// such a span could never make progress.
    pub fn span(&self) -> Result<Pattern, Error> {
        if self.root.matches_empty() {
            return Err(reject(Error::ZeroWidthSpan));
        }
        Ok(Self::from_node(Node::Span(self.root.clone())))
    }

    /// Wrap self so that its matches are recorded, returning the wrapped
    /// pattern and the handle to read the capture through.
    pub fn capture(&self) -> (Pattern, CaptureHandle) {
        self.capture_as(CaptureHandle::new(None))
    }

    /// Like capture(), giving the capture a name.
    pub fn capture_named(&self, name: &str) -> (Pattern, CaptureHandle) {
        self.capture_as(CaptureHandle::new(Some(name)))
    }

    fn capture_as(&self, capture: CaptureHandle) -> (Pattern, CaptureHandle) {
        let pattern = Self::from_node(Node::CaptureDef {
            body: self.root.clone(),
            capture: capture.clone(),
        });
        (pattern, capture)
    }

    /// \return whether this pattern might match the empty string.
    pub fn matches_empty(&self) -> bool {
        self.root.matches_empty()
    }

    /// Validate this pattern and compile it with default flags.
    pub fn compile(&self) -> Result<Engine, Error> {
        Engine::new(self)
    }

    /// Validate this pattern and compile it with `flags`.
    pub fn compile_with_flags<F: Into<Flags>>(&self, flags: F) -> Result<Engine, Error> {
        Engine::with_flags(self, flags)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.root, f)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

impl From<char> for Pattern {
    fn from(c: char) -> Self {
        Pattern::char(c)
    }
}

/// Things that can stand in for a pattern: patterns themselves, and chars
/// and strings, which are promoted to literals.
pub trait IntoPattern {
    /// Promote self to a pattern. `param` names the argument in errors.
    fn into_pattern(self, param: &'static str) -> Result<Pattern, Error>;
}

impl IntoPattern for Pattern {
    #[inline]
    fn into_pattern(self, _param: &'static str) -> Result<Pattern, Error> {
        Ok(self)
    }
}

impl IntoPattern for &Pattern {
    #[inline]
    fn into_pattern(self, _param: &'static str) -> Result<Pattern, Error> {
        Ok(self.clone())
    }
}

impl IntoPattern for char {
    #[inline]
    fn into_pattern(self, _param: &'static str) -> Result<Pattern, Error> {
        Ok(Pattern::char(self))
    }
}

impl IntoPattern for &str {
    fn into_pattern(self, param: &'static str) -> Result<Pattern, Error> {
        Ok(Pattern::from_node(Node::Literal(non_empty(self, param)?)))
    }
}

impl IntoPattern for &String {
    fn into_pattern(self, param: &'static str) -> Result<Pattern, Error> {
        self.as_str().into_pattern(param)
    }
}

impl IntoPattern for String {
    fn into_pattern(self, param: &'static str) -> Result<Pattern, Error> {
        self.as_str().into_pattern(param)
    }
}

/// Match `text` exactly. Strings must be non-empty.
pub fn literal<P: IntoPattern>(text: P) -> Result<Pattern, Error> {
    text.into_pattern("literal")
}

/// Match `left`, then `right`. If `right` fails, nothing is consumed.
pub fn concatenate<L: IntoPattern, R: IntoPattern>(left: L, right: R) -> Result<Pattern, Error> {
    let left = left.into_pattern("left")?;
    let right = right.into_pattern("right")?;
    Ok(Pattern::from_node(Node::concat(left.root, right.root)))
}

/// Match `left`, or failing that, `right`.
pub fn alternate<L: IntoPattern, R: IntoPattern>(left: L, right: R) -> Result<Pattern, Error> {
    let left = left.into_pattern("left")?;
    let right = right.into_pattern("right")?;
    Ok(Pattern::from_node(Node::alternate(left.root, right.root)))
}

/// Match one unit where `pattern` does not match.
pub fn negate<P: IntoPattern>(pattern: P) -> Result<Pattern, Error> {
    Ok(pattern.into_pattern("pattern")?.negate())
}

/// Match `pattern` zero or one times.
pub fn optional<P: IntoPattern>(pattern: P) -> Result<Pattern, Error> {
    Ok(pattern.into_pattern("pattern")?.optional())
}

/// Match `pattern` exactly `count` times.
pub fn repeat<P: IntoPattern>(pattern: P, count: usize) -> Result<Pattern, Error> {
    pattern.into_pattern("pattern")?.repeat(count)
}

/// Match `pattern` one or more times.
pub fn span<P: IntoPattern>(pattern: P) -> Result<Pattern, Error> {
    pattern.into_pattern("pattern")?.span()
}

/// Record the matches of `pattern`, returning the handle to read them by.
pub fn capture<P: IntoPattern>(pattern: P) -> Result<(Pattern, CaptureHandle), Error> {
    Ok(pattern.into_pattern("pattern")?.capture())
}

/// Match everything from `from` through the next `to`.
pub fn range(from: &str, to: &str) -> Result<Pattern, Error> {
    Pattern::range(from, to)
}

/// Match a range in which `escape` never ends the range.
pub fn range_escaped(from: &str, to: &str, escape: &str) -> Result<Pattern, Error> {
    Pattern::range_escaped(from, to, escape)
}

/// Match a range whose inner `from`..`to` pairs must balance.
pub fn range_nested(from: &str, to: &str) -> Result<Pattern, Error> {
    Pattern::range_nested(from, to)
}

// Operators. These cannot fail: both sides are already valid patterns, or
// chars, which are never empty.
macro_rules! binary_operator {
    ($trait:ident, $method:ident, $ctor:ident) => {
        impl ops::$trait<Pattern> for Pattern {
            type Output = Pattern;
            fn $method(self, rhs: Pattern) -> Pattern {
                Pattern::from_node(Node::$ctor(self.root, rhs.root))
            }
        }

        impl ops::$trait<&Pattern> for &Pattern {
            type Output = Pattern;
            fn $method(self, rhs: &Pattern) -> Pattern {
                Pattern::from_node(Node::$ctor(self.root.clone(), rhs.root.clone()))
            }
        }

        impl ops::$trait<char> for Pattern {
            type Output = Pattern;
            fn $method(self, rhs: char) -> Pattern {
                Pattern::from_node(Node::$ctor(self.root, Pattern::char(rhs).root))
            }
        }

        impl ops::$trait<Pattern> for char {
            type Output = Pattern;
            fn $method(self, rhs: Pattern) -> Pattern {
                Pattern::from_node(Node::$ctor(Pattern::char(self).root, rhs.root))
            }
        }
    };
}

binary_operator!(Add, add, concat);
binary_operator!(BitOr, bitor, alternate);

impl ops::Not for Pattern {
    type Output = Pattern;
    fn not(self) -> Pattern {
        Pattern::from_node(Node::Negate(self.root))
    }
}

impl ops::Not for &Pattern {
    type Output = Pattern;
    fn not(self) -> Pattern {
        self.negate()
    }
}
