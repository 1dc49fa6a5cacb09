//! Short identifier allocation.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::{String, ToString},
};

use smc_ast::keywords::is_reserved_word;
use tracing::trace;

/// Alphabet for the first character of a name.
const FIRST: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Alphabet for every following character.
const REST: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Allocates short names for original symbols.
///
/// Names are drawn from an increasing index (see [`NameGenerator::short_name`]).
/// Reserved words and names marked used are skipped. Cloning gives an
/// independent generator that continues from the same index.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    next_index: usize,
    used: BTreeSet<String>,
    shortened: BTreeMap<String, String>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator whose first candidate is `short_name(index)`.
    pub fn with_start_index(index: usize) -> Self {
        Self {
            next_index: index,
            ..Self::default()
        }
    }

    /// Name for `index`: the first character from `a-zA-Z`, the rest from
    /// `a-zA-Z0-9`, least significant first.
    pub fn short_name(index: usize) -> String {
        let mut name = String::new();
        name.push(FIRST[index % FIRST.len()] as char);
        let mut rest = index / FIRST.len();
        while rest > 0 {
            rest -= 1;
            name.push(REST[rest % REST.len()] as char);
            rest /= REST.len();
        }
        name
    }

    /// Declaration-site variant of [`NameGenerator::short_name`].
    pub fn definition_name(index: usize) -> String {
        let mut name = String::from("_");
        name.push_str(&Self::short_name(index));
        name
    }

    /// Index of the next candidate name.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Never allocate `name`.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.used.insert(name.into());
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Map `original` to a name chosen elsewhere.
    pub fn assign(&mut self, original: &str, short: &str) {
        self.used.insert(short.to_string());
        self.shortened
            .insert(original.to_string(), short.to_string());
    }

    /// Short name for `original`, allocating one on first use.
    pub fn shorten_symbol(&mut self, original: &str) -> String {
        self.shorten(original, Self::short_name)
    }

    /// Like [`NameGenerator::shorten_symbol`] but allocates a definition
    /// name.
    pub fn shorten_definition(&mut self, original: &str) -> String {
        self.shorten(original, Self::definition_name)
    }

    /// Short name for `original` if one was allocated, else `original`.
    pub fn get_short_symbol<'a>(&'a self, original: &'a str) -> &'a str {
        self.shortened
            .get(original)
            .map(String::as_str)
            .unwrap_or(original)
    }

    pub fn is_shortened(&self, original: &str) -> bool {
        self.shortened.contains_key(original)
    }

    /// All mappings made by this generator, by original name.
    pub fn mappings(&self) -> &BTreeMap<String, String> {
        &self.shortened
    }

    fn shorten(&mut self, original: &str, name_for: fn(usize) -> String) -> String {
        if let Some(short) = self.shortened.get(original) {
            return short.clone();
        }
        let short = loop {
            let candidate = name_for(self.next_index);
            self.next_index += 1;
            if !is_reserved_word(&candidate) && !self.used.contains(&candidate) {
                break candidate;
            }
        };
        trace!("Shortened {} -> {}", original, short);
        self.assign(original, &short);
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letters() {
        assert_eq!(NameGenerator::short_name(0), "a");
        assert_eq!(NameGenerator::short_name(25), "z");
        assert_eq!(NameGenerator::short_name(26), "A");
        assert_eq!(NameGenerator::short_name(51), "Z");
    }

    #[test]
    fn test_two_letters() {
        assert_eq!(NameGenerator::short_name(52), "aa");
        assert_eq!(NameGenerator::short_name(53), "ba");
        assert_eq!(NameGenerator::short_name(52 + 52), "ab");
        assert_eq!(NameGenerator::short_name(52 * 62 + 51), "Z9");
        assert_eq!(NameGenerator::short_name(52 * 63), "aaa");
    }

    #[test]
    fn test_definition_name() {
        assert_eq!(NameGenerator::definition_name(0), "_a");
        assert_eq!(NameGenerator::definition_name(53), "_ba");
    }

    #[test]
    fn test_shorten_is_idempotent() {
        let mut names = NameGenerator::new();
        assert_eq!(names.shorten_symbol("position"), "a");
        assert_eq!(names.shorten_symbol("normal"), "b");
        assert_eq!(names.shorten_symbol("position"), "a");
        assert_eq!(names.next_index(), 2);
    }

    #[test]
    fn test_get_short_symbol_does_not_allocate() {
        let mut names = NameGenerator::new();
        assert_eq!(names.get_short_symbol("color"), "color");
        names.shorten_symbol("color");
        assert_eq!(names.get_short_symbol("color"), "a");
        assert_eq!(names.next_index(), 1);
    }

    #[test]
    fn test_skips_reserved_and_used_names() {
        let mut names = NameGenerator::with_start_index(two_letter_index("do"));
        assert_eq!(names.shorten_symbol("x"), "eo");

        let mut names = NameGenerator::new();
        names.reserve("a");
        names.assign("kept", "b");
        assert_eq!(names.shorten_symbol("x"), "c");
        assert_eq!(names.get_short_symbol("kept"), "b");
    }

    #[test]
    fn test_clones_advance_independently() {
        let mut vertex = NameGenerator::new();
        vertex.shorten_symbol("a0");
        let mut fragment = vertex.clone();
        assert_eq!(fragment.shorten_symbol("f0"), "b");
        assert_eq!(fragment.shorten_symbol("f1"), "c");
        assert_eq!(vertex.shorten_symbol("v1"), "b");
        assert_eq!(vertex.get_short_symbol("f0"), "f0");
    }

    /// Inverse of `short_name` for two-character names.
    fn two_letter_index(name: &str) -> usize {
        let bytes = name.as_bytes();
        let first = FIRST.iter().position(|&c| c == bytes[0]).unwrap();
        let second = REST.iter().position(|&c| c == bytes[1]).unwrap();
        first + FIRST.len() * (second + 1)
    }
}
