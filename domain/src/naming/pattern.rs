//! Candidate naming pattern
//!
//! A candidate is a fixed one-character prefix (the family name) followed by
//! a short run of letters. Identity is the exact string; no case or locale
//! folding is ever applied.
//!
//! Free-text scanning takes at most two letters after the prefix. Ballot
//! tokens are judged more loosely (two to four letters in total) and then
//! filtered against the candidates already mentioned, so a ballot can never
//! introduce a name the scanner would not have produced.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default family-name prefix used by the naming discussion.
pub const DEFAULT_PREFIX: char = '唐';

/// Maximum number of letters the scanner takes after the prefix.
pub const MAX_SUFFIX_LETTERS: usize = 2;

/// Accepted letter count (prefix included) for a ballot token.
pub const BALLOT_LETTERS: std::ops::RangeInclusive<usize> = 2..=4;

/// Suffix of the example name shown in ballot instructions (`唐XX`).
pub const PLACEHOLDER_SUFFIX: &str = "XX";

/// Punctuation trimmed from both ends of a ballot token before validation.
const EDGE_PUNCTUATION: &[char] = &[
    '\u{3002}', '\u{FF0C}', ',', '\u{3001}', '\u{FF01}', '!', '?', '\u{FF1F}', ';', '\u{FF1B}',
];

/// The lexical shape every candidate must have.
///
/// # Example
///
/// ```
/// use roundtable_domain::naming::NamePattern;
///
/// let pattern = NamePattern::default();
/// assert!(pattern.is_candidate("唐若岚"));
/// assert!(!pattern.is_candidate("唐"));
/// assert!(!pattern.is_candidate("李若岚"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePattern {
    prefix: char,
}

impl Default for NamePattern {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX,
        }
    }
}

impl NamePattern {
    /// Create a pattern for the given prefix character.
    ///
    /// The prefix itself must be a letter, otherwise no candidate could ever
    /// satisfy the letter-count rule.
    pub fn new(prefix: char) -> Result<Self, DomainError> {
        if !prefix.is_alphabetic() {
            return Err(DomainError::InvalidNamePrefix(prefix.to_string()));
        }
        Ok(Self { prefix })
    }

    /// Parse a prefix from a configuration string (exactly one character).
    pub fn from_prefix_str(prefix: &str) -> Result<Self, DomainError> {
        let mut chars = prefix.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => Err(DomainError::InvalidNamePrefix(prefix.to_string())),
        }
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// The example name used in ballot instructions. Never a candidate.
    pub fn placeholder(&self) -> String {
        format!("{}{PLACEHOLDER_SUFFIX}", self.prefix)
    }

    /// Whether a character may continue a candidate after the prefix.
    pub fn is_name_char(c: char) -> bool {
        !c.is_whitespace() && c.is_alphabetic()
    }

    /// Check whether a raw string is exactly one candidate the scanner could
    /// have produced.
    pub fn is_candidate(&self, token: &str) -> bool {
        let mut chars = token.chars();
        if chars.next() != Some(self.prefix) {
            return false;
        }
        let rest: Vec<char> = chars.collect();
        !rest.is_empty()
            && token != self.placeholder()
            && rest.len() <= MAX_SUFFIX_LETTERS
            && rest.iter().all(|c| Self::is_name_char(*c))
    }

    /// Trim a ballot token and accept it if it looks like a candidate.
    ///
    /// Accepts when the trimmed token starts with the prefix and holds
    /// between two and four letters in total. Returns the trimmed token.
    pub fn normalize_ballot_token<'a>(&self, token: &'a str) -> Option<&'a str> {
        let trimmed = token.trim().trim_matches(EDGE_PUNCTUATION);
        if trimmed.is_empty() || !trimmed.starts_with(self.prefix) {
            return None;
        }
        let letters = trimmed.chars().filter(|c| c.is_alphabetic()).count();
        BALLOT_LETTERS.contains(&letters).then_some(trimmed)
    }
}
