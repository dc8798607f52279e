#![allow(clippy::uninlined_format_args)]

use combex::{CaptureHandle, Engine, Flags, Match, Outcome, Pattern};

/// Shorthand for a literal pattern, for tests.
#[track_caller]
pub fn lit(text: &str) -> Pattern {
    Pattern::literal(text).expect("Literal should be valid")
}

pub trait StringTestHelpers {
    /// "Fluent" style helper for testing that a String is equal to a str.
    fn test_eq(&self, s: &str);
}

impl StringTestHelpers for String {
    #[track_caller]
    fn test_eq(&self, rhs: &str) {
        assert_eq!(self.as_str(), rhs)
    }
}

pub trait VecTestHelpers {
    /// "Fluent" style helper for testing that a Vec<String> is equal to a
    /// Vec<&str>.
    fn test_eq(&self, rhs: Vec<&str>);
}

impl VecTestHelpers for Vec<String> {
    #[track_caller]
    fn test_eq(&self, rhs: Vec<&str>) {
        assert_eq!(*self, rhs)
    }
}

/// Our encoding types.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Encoding {
    Utf8,
    Chars,
}

/// Description of how to test a pattern.
#[derive(Debug, Copy, Clone)]
pub struct TestConfig {
    // Which input representation to match against.
    encoding: Encoding,

    // Whether to use the search prefilter.
    prefilter: bool,
}

/// A compiled pattern which remembers a TestConfig.
#[derive(Debug, Clone)]
pub struct TestEngine {
    engine: Engine,
    tc: TestConfig,
}

/// Convert an outcome over a char buffer into the matched String.
fn chars_text(outcome: Outcome, chars: &[char]) -> Option<String> {
    outcome.chars(chars).map(|cs| cs.iter().collect())
}

/// Convert a char-index range into the matched String.
fn chars_range_text(range: combex::Range, chars: &[char]) -> String {
    chars[range].iter().collect()
}

impl TestEngine {
    /// Access the underlying engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Consume at the start of \p input, returning the matched text.
    pub fn consume_text(&self, input: &str) -> Option<String> {
        match self.tc.encoding {
            Encoding::Utf8 => self.engine.consume(input).text(input).map(str::to_string),
            Encoding::Chars => {
                let chars: Vec<char> = input.chars().collect();
                chars_text(self.engine.consume_chars(&chars), &chars)
            }
        }
    }

    /// Neglect at the start of \p input, returning the matched text.
    pub fn neglect_text(&self, input: &str) -> Option<String> {
        match self.tc.encoding {
            Encoding::Utf8 => self.engine.neglect(input).text(input).map(str::to_string),
            Encoding::Chars => {
                let chars: Vec<char> = input.chars().collect();
                chars_text(self.engine.neglect_chars(&chars), &chars)
            }
        }
    }

    /// Consume against a string, returning the matched text.
    #[track_caller]
    pub fn match1(&self, input: &str) -> String {
        match self.consume_text(input) {
            Some(s) => s,
            None => panic!("Failed to match {}", input),
        }
    }

    /// Consume against a string, returning the text of the given capture.
    #[track_caller]
    pub fn match1_capture(&self, input: &str, capture: &CaptureHandle) -> Option<String> {
        match self.tc.encoding {
            Encoding::Utf8 => {
                let m: Match = self.engine.exec(input).expect("Failed to match");
                m.capture(capture).map(|r| input[r].to_string())
            }
            Encoding::Chars => {
                let chars: Vec<char> = input.chars().collect();
                let m: Match = self.engine.exec_chars(&chars).expect("Failed to match");
                m.capture(capture).map(|r| chars_range_text(r, &chars))
            }
        }
    }

    /// Test that consuming \p input fails.
    #[track_caller]
    pub fn test_fails(&self, input: &str) {
        assert!(
            self.consume_text(input).is_none(),
            "Should not have matched {}",
            input
        )
    }

    /// Test that consuming \p input succeeds.
    #[track_caller]
    pub fn test_succeeds(&self, input: &str) {
        assert!(
            self.consume_text(input).is_some(),
            "Should have matched {}",
            input
        )
    }

    /// Return a list of all non-overlapping matches.
    pub fn match_all(&self, input: &str) -> Vec<String> {
        match self.tc.encoding {
            Encoding::Utf8 => self
                .engine
                .find_iter(input)
                .map(|m| input[m.range()].to_string())
                .collect(),
            Encoding::Chars => {
                let chars: Vec<char> = input.chars().collect();
                self.engine
                    .find_iter_chars(&chars)
                    .map(|m| chars_range_text(m.range(), &chars))
                    .collect()
            }
        }
    }
}

impl TestConfig {
    /// Compile a pattern with default flags.
    #[track_caller]
    pub fn compile(&self, pattern: &Pattern) -> TestEngine {
        self.compilef(pattern, "")
    }

    /// Compile a pattern with given flags.
    #[track_caller]
    pub fn compilef(&self, pattern: &Pattern, flags_str: &str) -> TestEngine {
        let mut flags = Flags::from(flags_str);
        flags.no_prefilter |= !self.prefilter;

        let engine = pattern.compile_with_flags(flags);
        assert!(
            engine.is_ok(),
            "Failed to compile! flags: {} pattern: {}, error: {}",
            flags_str,
            pattern,
            engine.unwrap_err()
        );
        TestEngine {
            engine: engine.unwrap(),
            tc: *self,
        }
    }
}

/// Invoke \p F with each test config, in turn.
pub fn test_with_configs<F>(func: F)
where
    F: Fn(TestConfig),
{
    // Note we wish to be able to determine the TestConfig from the line number.
    func(TestConfig {
        encoding: Encoding::Utf8,
        prefilter: true,
    });
    func(TestConfig {
        encoding: Encoding::Utf8,
        prefilter: false,
    });
    func(TestConfig {
        encoding: Encoding::Chars,
        prefilter: true,
    });
}
