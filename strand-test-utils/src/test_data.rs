// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fixtures shared by the operator tests.

use std::cmp::Ordering;

/// Source values of the reference marble scenario, in emission order.
pub const REFERENCE_MARBLES: [&str; 12] = [
    "  foo",
    " FoO ",
    "baR  ",
    "foO ",
    " Baz   ",
    "  qux ",
    "   bar",
    " BAR  ",
    "FOO ",
    "baz  ",
    " bAZ ",
    "    fOo    ",
];

/// Groups produced by the reference scenario: key of each run, then its elements.
pub fn expected_reference_groups() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("foo", vec!["  foo", " FoO "]),
        ("baR", vec!["baR  "]),
        ("foO", vec!["foO "]),
        ("Baz", vec![" Baz   "]),
        ("qux", vec!["  qux "]),
        ("bar", vec!["   bar", " BAR  "]),
        ("FOO", vec!["FOO "]),
        ("baz", vec!["baz  ", " bAZ "]),
        ("fOo", vec!["    fOo    "]),
    ]
}

pub fn reference_source() -> Vec<String> {
    REFERENCE_MARBLES.iter().map(|s| (*s).to_string()).collect()
}

/// Key selector of the reference scenario: surrounding ASCII whitespace removed.
pub fn trim_key(value: &str) -> String {
    value.trim_matches(|c: char| c.is_ascii_whitespace()).to_string()
}

/// Strict "less than" of the reference scenario: lexicographic, ignoring ASCII case.
pub fn case_insensitive_less(lhs: &str, rhs: &str) -> bool {
    lhs.bytes()
        .map(|b| b.to_ascii_lowercase())
        .cmp(rhs.bytes().map(|b| b.to_ascii_lowercase()))
        == Ordering::Less
}

/// A sensor reading, grouped by sensor in the struct-key tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub sensor: &'static str,
    pub celsius: i32,
}

impl Reading {
    pub fn new(sensor: &'static str, celsius: i32) -> Self {
        Self { sensor, celsius }
    }
}

pub fn readings() -> Vec<Reading> {
    vec![
        Reading::new("kitchen", 21),
        Reading::new("kitchen", 22),
        Reading::new("garage", 9),
        Reading::new("kitchen", 23),
        Reading::new("kitchen", 23),
    ]
}
