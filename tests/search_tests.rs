// Work around dead code warnings: rust-lang issue #46379
pub mod common;

// Work around dead code warnings: rust-lang issue #46379
use common::*;

use combex::{range, Pattern};

fn find_literal_tc(tc: TestConfig) {
    let cr = tc.compile(&lit("ab"));
    cr.match_all("xxabyyab").test_eq(vec!["ab", "ab"]);
    cr.match_all("xxyy").test_eq(vec![]);
    cr.match_all("").test_eq(vec![]);

    // Matches do not overlap.
    let cr = tc.compile(&lit("aa"));
    cr.match_all("aaaa").test_eq(vec!["aa", "aa"]);
    cr.match_all("aaa").test_eq(vec!["aa"]);

    let cr = tc.compile(&lit("\u{00E9}"));
    cr.match_all("caf\u{00E9} \u{00E9}t\u{00E9}")
        .test_eq(vec!["\u{00E9}", "\u{00E9}", "\u{00E9}"]);
}

#[test]
fn find_literal() {
    test_with_configs(find_literal_tc)
}

fn find_structured_tc(tc: TestConfig) {
    // Shared prefix of an alternation.
    let cr = tc.compile(&(lit("foo") | lit("fob")));
    cr.match_all("fob, foo, fox").test_eq(vec!["fob", "foo"]);

    // A leading optional means any position may start a match.
    let number = Pattern::char('-').optional() + Pattern::digit().span().unwrap();
    tc.compile(&number)
        .match_all("a-1 2 -x 34")
        .test_eq(vec!["-1", "2", "34"]);

    let cr = tc.compile(&range("<", ">").unwrap());
    cr.match_all("x <a> y <b> <c").test_eq(vec!["<a>", "<b>"]);

    let word = Pattern::letter().span().unwrap();
    tc.compile(&word)
        .match_all("one, two; three")
        .test_eq(vec!["one", "two", "three"]);
}

#[test]
fn find_structured() {
    test_with_configs(find_structured_tc)
}

fn empty_matches_tc(tc: TestConfig) {
    let cr = tc.compile(&lit("a").optional());
    cr.match_all("ba").test_eq(vec!["", "a", ""]);

    let cr = tc.compile(&Pattern::end());
    cr.match_all("ab").test_eq(vec![""]);
    cr.match_all("").test_eq(vec![""]);
}

#[test]
fn empty_matches() {
    test_with_configs(empty_matches_tc)
}

#[test]
fn empty_match_ranges() {
    let engine = lit("\u{00E9}").optional().compile().unwrap();
    let ranges: Vec<_> = engine.find_iter("x\u{00E9}").map(|m| m.range()).collect();
    assert_eq!(ranges, vec![0..0, 1..3, 3..3]);
}

#[test]
fn find_first() {
    let engine = (lit("World") | lit("there")).compile().unwrap();
    let m = engine.find("Hello there, World").unwrap();
    assert_eq!(m.range(), 6..11);
    assert_eq!(m.outcome().text("Hello there, World"), Some("there"));
    assert!(engine.find("Hello").is_none());
}

#[test]
fn find_from_offset() {
    let engine = lit("ab").compile().unwrap();
    let starts: Vec<usize> = engine
        .find_from("abxab", 1)
        .unwrap()
        .map(|m| m.start())
        .collect();
    assert_eq!(starts, vec![3]);
    assert_eq!(engine.find_from("abxab", 5).unwrap().count(), 0);
    assert!(engine.find_from("abxab", 6).is_err());
}

#[test]
fn find_in_chars() {
    let engine = lit("ab").compile().unwrap();
    let chars: Vec<char> = "\u{00E9}-ab-ab".chars().collect();
    let ranges: Vec<_> = engine.find_iter_chars(&chars).map(|m| m.range()).collect();
    assert_eq!(ranges, vec![2..4, 5..7]);
}

#[test]
fn find_reports_captures() {
    let (key, k) = Pattern::letter().span().unwrap().capture();
    let (value, v) = Pattern::digit().span().unwrap().capture();
    let engine = (key + '=' + value).compile().unwrap();
    let text = "a=1, bc=23; =4";
    let pairs: Vec<(&str, &str)> = engine
        .find_iter(text)
        .map(|m| (&text[m.capture(&k).unwrap()], &text[m.capture(&v).unwrap()]))
        .collect();
    assert_eq!(pairs, vec![("a", "1"), ("bc", "23")]);
}

#[test]
fn prefilter_agrees_with_full_scan() {
    let patterns = [
        lit("needle"),
        lit("ne") + Pattern::letter().span().unwrap(),
        lit("needle") | lit("nest"),
        range("n", "e").unwrap(),
    ];
    let haystack = "a needle in a nest of needles, nee";
    for p in patterns.iter() {
        let fast: Vec<_> = p
            .compile()
            .unwrap()
            .find_iter(haystack)
            .map(|m| m.range())
            .collect();
        let slow: Vec<_> = p
            .compile_with_flags("p")
            .unwrap()
            .find_iter(haystack)
            .map(|m| m.range())
            .collect();
        assert_eq!(fast, slow, "Prefilter changed the matches of {}", p);
        assert!(!fast.is_empty());
    }
}
