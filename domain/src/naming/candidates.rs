//! Candidate book: mentioned set, first-seen timeline and frequency table.

use super::pattern::{MAX_SUFFIX_LETTERS, NamePattern, PLACEHOLDER_SUFFIX};
use std::collections::HashMap;

/// Every candidate ever observed in the discussion.
///
/// Keys are compared by exact string equality. The timeline is append-only
/// and a candidate's timeline index never changes once assigned, which makes
/// it the tie-break key for every ranking in the discussion.
#[derive(Debug, Clone, Default)]
pub struct CandidateBook {
    pattern: NamePattern,
    /// candidate -> timeline index
    index: HashMap<String, usize>,
    timeline: Vec<String>,
    /// Occurrence counts, aligned with `timeline`.
    frequency: Vec<usize>,
}

impl CandidateBook {
    pub fn new(pattern: NamePattern) -> Self {
        Self {
            pattern,
            ..Default::default()
        }
    }

    pub fn pattern(&self) -> &NamePattern {
        &self.pattern
    }

    /// Scan free text and record every candidate occurrence.
    ///
    /// Each prefix character starts its own candidate from the run of letters
    /// that follows it (up to two), so scanning resumes right after the
    /// prefix rather than after the consumed run. The instruction placeholder
    /// (`唐XX`) is skipped. Returns the number of occurrences recorded.
    pub fn extract(&mut self, text: &str) -> usize {
        let chars: Vec<char> = text.chars().collect();
        let prefix = self.pattern.prefix();
        let mut recorded = 0;

        for (i, &c) in chars.iter().enumerate() {
            if c != prefix {
                continue;
            }

            let suffix: String = chars[i + 1..]
                .iter()
                .take_while(|c| NamePattern::is_name_char(**c))
                .take(MAX_SUFFIX_LETTERS)
                .collect();
            if suffix.is_empty() || suffix == PLACEHOLDER_SUFFIX {
                continue;
            }

            let mut name = String::with_capacity(prefix.len_utf8() + suffix.len());
            name.push(prefix);
            name.push_str(&suffix);
            self.observe(name);
            recorded += 1;
        }

        recorded
    }

    fn observe(&mut self, name: String) {
        match self.index.get(&name) {
            Some(&idx) => self.frequency[idx] += 1,
            None => {
                self.index.insert(name.clone(), self.timeline.len());
                self.timeline.push(name);
                self.frequency.push(1);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of distinct candidates seen so far.
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Candidates in first-seen order.
    pub fn timeline(&self) -> &[String] {
        &self.timeline
    }

    /// First-seen index of a candidate; unknown candidates sort last.
    pub fn timeline_index(&self, name: &str) -> usize {
        self.index.get(name).copied().unwrap_or(usize::MAX)
    }

    pub fn frequency(&self, name: &str) -> usize {
        self.index.get(name).map_or(0, |&idx| self.frequency[idx])
    }

    /// The most recent `n` first-seen candidates, oldest first.
    pub fn latest(&self, n: usize) -> &[String] {
        let start = self.timeline.len().saturating_sub(n);
        &self.timeline[start..]
    }

    /// The first `n` candidates ever mentioned.
    pub fn earliest(&self, n: usize) -> &[String] {
        &self.timeline[..n.min(self.timeline.len())]
    }

    /// Most frequently mentioned candidates, earlier mention first on ties.
    pub fn top_candidates(&self, n: usize) -> Vec<&str> {
        let mut order: Vec<usize> = (0..self.timeline.len()).collect();
        order.sort_by(|&a, &b| self.frequency[b].cmp(&self.frequency[a]).then(a.cmp(&b)));
        order
            .into_iter()
            .take(n)
            .map(|idx| self.timeline[idx].as_str())
            .collect()
    }
}
