//! Ballot parsing
//!
//! Ballots are free text carrying a bracketed marker such as `【投票】`,
//! followed by a delimited list of candidates on the same line. Parsing is a
//! pure function: it never fails, it only returns fewer items.

use super::pattern::NamePattern;

/// Marker word for a vote line.
pub const VOTE_MARKER: &str = "投票";

const OPEN_BRACKET: char = '【';
const CLOSE_BRACKET: char = '】';

/// Delimiters between ballot entries (in addition to any whitespace).
const DELIMITERS: &[char] = &['\u{3001}', ',', '\u{FF0C}', '|', '/'];

/// Wrap a marker word in full-width brackets, e.g. `投票` -> `【投票】`.
pub fn bracketed(marker: &str) -> String {
    format!("{OPEN_BRACKET}{marker}{CLOSE_BRACKET}")
}

/// Whether the text contains the bracketed marker at all.
pub fn contains_marker(text: &str, marker: &str) -> bool {
    text.contains(&bracketed(marker))
}

/// Extract candidate-shaped tokens from every marked segment of `text`.
///
/// A segment starts right after the bracketed marker and ends at the next
/// opening bracket or newline, whichever comes first (or at end of text).
/// Tokens are returned in parse order, duplicates included.
///
/// # Example
///
/// ```
/// use roundtable_domain::naming::{NamePattern, parse_marked_segments};
///
/// let names = parse_marked_segments("好的\n【投票】唐若岚, 唐峻|唐明\n谢谢", "投票", &NamePattern::default());
/// assert_eq!(names, vec!["唐若岚", "唐峻", "唐明"]);
/// ```
pub fn parse_marked_segments(text: &str, marker: &str, pattern: &NamePattern) -> Vec<String> {
    let flag = bracketed(marker);
    let mut results = Vec::new();
    let mut search_from = 0;

    while let Some(found) = text[search_from..].find(&flag) {
        let start = search_from + found + flag.len();
        let end = segment_end(text, start);

        results.extend(
            split_segment(&text[start..end])
                .filter_map(|token| pattern.normalize_ballot_token(token))
                .map(str::to_string),
        );

        search_from = end;
    }

    results
}

/// Remove every marked segment, marker included, keeping the rest of the text.
///
/// ```
/// use roundtable_domain::naming::strip_marked_segments;
///
/// let text = strip_marked_segments("我选\n【投票】唐XX, 唐XX\n谢谢", "投票");
/// assert_eq!(text, "我选\n\n谢谢");
/// ```
pub fn strip_marked_segments(text: &str, marker: &str) -> String {
    let flag = bracketed(marker);
    let mut kept = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(&flag) {
        let marker_at = cursor + found;
        kept.push_str(&text[cursor..marker_at]);
        cursor = segment_end(text, marker_at + flag.len());
    }
    kept.push_str(&text[cursor..]);
    kept
}

/// Byte offset where a segment starting at `start` ends.
fn segment_end(text: &str, start: usize) -> usize {
    let rest = &text[start..];
    start
        + rest
            .find(|c: char| c == OPEN_BRACKET || c == '\n')
            .unwrap_or(rest.len())
}

fn split_segment(segment: &str) -> impl Iterator<Item = &str> {
    segment
        .split(|c: char| c.is_whitespace() || DELIMITERS.contains(&c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Render a vote line for the given choices.
pub fn ballot_line<S: AsRef<str>>(choices: &[S]) -> String {
    let names: Vec<&str> = choices.iter().map(AsRef::as_ref).collect();
    format!("{}{}", bracketed(VOTE_MARKER), names.join(", "))
}
