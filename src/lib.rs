/*!

# combex - COMBinator EXpressions

This crate provides a pattern-matching engine built from small composable pieces, as a structural alternative to regular expressions.
There is no pattern syntax: a pattern is a tree of values built in Rust, which can be shared, combined and reused freely.

# Example: match at the start of a string

```rust
use combex::Pattern;
let greeting = Pattern::literal("Hello").unwrap() | Pattern::literal("Goodbye").unwrap();
let engine = greeting.compile().unwrap();
let outcome = engine.consume("Goodbye, world");
assert_eq!(outcome.text("Goodbye, world"), Some("Goodbye"));
```

Matching always starts at the beginning of the input and does not need to consume all of it.
Use [`Pattern::end`] to require that it does.

# Example: delimited ranges

Ranges match everything between two delimiters. They may honor an escape sequence, or nest:

```rust
use combex::Pattern;
let quoted = Pattern::range_escaped("\"", "\"", "\\\"").unwrap().compile().unwrap();
assert!(quoted.consume(r#""Hello\"World""#).length() == Some(14));

let comment = Pattern::range_nested("/*", "*/").unwrap().compile().unwrap();
let text = "/* a /* b */ c */ d";
assert_eq!(comment.consume(text).text(text), Some("/* a /* b */ c */"));
```

# Example: captures and back-references

A capture records what a sub-pattern matched. The handle can be used to replay that text later in the same pattern,
and to read the capture from a [`Match`]:

```rust
use combex::Pattern;
let (open, quote) = (Pattern::char('\'') | '"').capture();
let text_char = !Pattern::backref(&quote);
let string = open.then(text_char.span().unwrap()).unwrap().then(Pattern::backref(&quote)).unwrap();
let engine = string.compile().unwrap();
let text = "'say \"hi\"' rest";
let m = engine.exec(text).unwrap();
assert_eq!(&text[m.range()], "'say \"hi\"'");
assert_eq!(&text[m.capture(&quote).unwrap()], "'");
```

# Searching

[`Engine::find`] and [`Engine::find_iter`] look for matches anywhere in the input, trying each position in turn.
If every match must begin with a known literal, memchr is used to skip straight to its occurrences.

# Inputs

Matching works on `&str`, where positions are byte offsets, and on `&[char]` buffers, where positions are element indexes.
In both cases the cursor steps one `char` at a time.

# Comparison to regular expressions

Backtracking is local: an alternation commits to the first branch that matches, and is not revisited if something later fails.
This is ordered choice, as in parsing expression grammars, rather than the exhaustive search of a regex engine.
Comparison is ordinal. With the `i` flag ASCII letters fold case; no other folding or normalization is performed.

*/

#![warn(clippy::all)]
#![allow(clippy::match_like_matches_macro)]
// Clippy's manual_range_contains suggestion produces worse codegen.
#![allow(clippy::manual_range_contains)]

pub use crate::api::*;
pub use crate::cursor::{Cursor, Mark};
pub use crate::error::Error;
pub use crate::exec::Matches;
pub use crate::indexing::{CharsInput, InputIndexer, Utf8Input};
pub use crate::pattern::{
    alternate, capture, concatenate, literal, negate, optional, range, range_escaped,
    range_nested, repeat, span, IntoPattern, Pattern,
};
pub use crate::types::{CaptureHandle, CaptureId, Range};

mod api;
mod classicalbacktrack;
mod cursor;
mod error;
mod exec;
mod indexing;
mod ir;
mod matchers;
mod pattern;
mod startpredicate;
mod types;
