//! Vote ledger: voter registry, one ballot per voter, and the tally.

use super::vote::{Ballot, BallotRejection, DEFAULT_BALLOT_SIZE, TallyEntry};
use crate::naming::CandidateBook;
use std::collections::{HashMap, HashSet};

/// Records the convergence vote.
///
/// Invariants:
/// - the registry, once populated, only changes through [`VoteLedger::reset_registry`],
///   which refuses once any ballot is in;
/// - a voter appears in the voted set at most once and is never removed;
/// - only candidates present in the [`CandidateBook`] receive votes.
#[derive(Debug, Clone)]
pub struct VoteLedger {
    ballot_size: usize,
    registry: Vec<String>,
    registered: HashSet<String>,
    voted: HashSet<String>,
    ballots: Vec<Ballot>,
    tally: HashMap<String, usize>,
}

impl Default for VoteLedger {
    fn default() -> Self {
        Self::new(DEFAULT_BALLOT_SIZE)
    }
}

impl VoteLedger {
    pub fn new(ballot_size: usize) -> Self {
        Self {
            ballot_size,
            registry: Vec::new(),
            registered: HashSet::new(),
            voted: HashSet::new(),
            ballots: Vec::new(),
            tally: HashMap::new(),
        }
    }

    pub fn ballot_size(&self) -> usize {
        self.ballot_size
    }

    /// Register eligible voters unless a registry already exists.
    ///
    /// Returns `true` when this call populated the registry.
    pub fn ensure_registered<I, S>(&mut self, voters: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.registry.is_empty() {
            return false;
        }
        for voter in voters {
            let voter = voter.into();
            if self.registered.insert(voter.clone()) {
                self.registry.push(voter);
            }
        }
        !self.registry.is_empty()
    }

    /// Replace the registry. Only possible before any ballot was accepted.
    pub fn reset_registry<I, S>(&mut self, voters: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.ballots.is_empty() {
            return false;
        }
        self.registry.clear();
        self.registered.clear();
        self.ensure_registered(voters)
    }

    /// Registered voters in registration order.
    pub fn registry(&self) -> &[String] {
        &self.registry
    }

    pub fn is_registered(&self, voter: &str) -> bool {
        self.registered.contains(voter)
    }

    pub fn has_voted(&self, voter: &str) -> bool {
        self.voted.contains(voter)
    }

    pub fn eligible_count(&self) -> usize {
        self.registry.len()
    }

    pub fn voted_count(&self) -> usize {
        self.voted.len()
    }

    /// All registered voters have voted (and there is at least one).
    pub fn is_complete(&self) -> bool {
        !self.registry.is_empty() && self.registry.iter().all(|v| self.voted.contains(v))
    }

    /// Accepted ballots in the order they were cast.
    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    /// Filter parsed tokens down to the choices a ballot would count.
    ///
    /// Drops unknown candidates, collapses duplicates and keeps the first
    /// `ballot_size` survivors in parse order.
    pub fn validate_choices(&self, parsed: &[String], book: &CandidateBook) -> Vec<String> {
        let mut choices: Vec<String> = Vec::with_capacity(self.ballot_size);
        for token in parsed {
            if choices.len() == self.ballot_size {
                break;
            }
            if book.contains(token) && !choices.contains(token) {
                choices.push(token.clone());
            }
        }
        choices
    }

    /// Cast a ballot for `voter` from already parsed tokens.
    pub fn cast(
        &mut self,
        voter: &str,
        parsed: &[String],
        book: &CandidateBook,
    ) -> Result<&Ballot, BallotRejection> {
        if !self.is_registered(voter) {
            return Err(BallotRejection::NotRegistered);
        }
        if self.has_voted(voter) {
            return Err(BallotRejection::AlreadyVoted);
        }

        let choices = self.validate_choices(parsed, book);
        if choices.is_empty() {
            return Err(BallotRejection::NoValidChoices);
        }

        for choice in &choices {
            *self.tally.entry(choice.clone()).or_insert(0) += 1;
        }
        self.voted.insert(voter.to_string());
        self.ballots.push(Ballot::new(voter, choices));

        Ok(&self.ballots[self.ballots.len() - 1])
    }

    pub fn votes_for(&self, candidate: &str) -> usize {
        self.tally.get(candidate).copied().unwrap_or(0)
    }

    /// Full tally: votes descending, earlier first mention first on ties.
    pub fn results(&self, book: &CandidateBook) -> Vec<TallyEntry> {
        let mut entries: Vec<TallyEntry> = self
            .tally
            .iter()
            .map(|(candidate, &votes)| TallyEntry::new(candidate.clone(), votes))
            .collect();
        entries.sort_by(|a, b| {
            b.votes
                .cmp(&a.votes)
                .then_with(|| book.timeline_index(&a.candidate).cmp(&book.timeline_index(&b.candidate)))
        });
        entries
    }

    /// The top `n` candidates by the same ranking as [`VoteLedger::results`].
    pub fn leaders(&self, n: usize, book: &CandidateBook) -> Vec<String> {
        self.results(book)
            .into_iter()
            .take(n)
            .map(|entry| entry.candidate)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::NamePattern;

    fn book(text: &str) -> CandidateBook {
        let mut book = CandidateBook::new(NamePattern::default());
        book.extract(text);
        book
    }

    fn tokens(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_registry_is_populated_once() {
        let mut ledger = VoteLedger::default();
        assert!(ledger.ensure_registered(["A", "B"]));
        assert!(!ledger.ensure_registered(["C"]));
        assert_eq!(ledger.registry(), &["A".to_string(), "B".to_string()]);
        assert!(!ledger.is_registered("C"));
    }

    #[test]
    fn test_reset_registry_refused_after_first_ballot() {
        let book = book("唐峻。");
        let mut ledger = VoteLedger::default();
        ledger.ensure_registered(["A"]);
        assert!(ledger.reset_registry(["A", "B"]));
        ledger.cast("A", &tokens(&["唐峻"]), &book).unwrap();
        assert!(!ledger.reset_registry(["C"]));
        assert_eq!(ledger.eligible_count(), 2);
    }

    #[test]
    fn test_second_ballot_ignored() {
        let book = book("唐峻，唐明。");
        let mut ledger = VoteLedger::default();
        ledger.ensure_registered(["A"]);

        assert!(ledger.cast("A", &tokens(&["唐峻"]), &book).is_ok());
        assert_eq!(
            ledger.cast("A", &tokens(&["唐明"]), &book).unwrap_err(),
            BallotRejection::AlreadyVoted
        );
        assert_eq!(ledger.votes_for("唐峻"), 1);
        assert_eq!(ledger.votes_for("唐明"), 0);
        assert_eq!(ledger.voted_count(), 1);
    }

    #[test]
    fn test_unregistered_voter_rejected() {
        let book = book("唐峻。");
        let mut ledger = VoteLedger::default();
        ledger.ensure_registered(["A"]);
        assert_eq!(
            ledger.cast("Z", &tokens(&["唐峻"]), &book).unwrap_err(),
            BallotRejection::NotRegistered
        );
        assert!(!ledger.has_voted("Z"));
    }

    #[test]
    fn test_all_invalid_ballot_leaves_voter_unvoted() {
        let book = book("唐峻。");
        let mut ledger = VoteLedger::default();
        ledger.ensure_registered(["A"]);

        assert_eq!(
            ledger.cast("A", &tokens(&["唐未知"]), &book).unwrap_err(),
            BallotRejection::NoValidChoices
        );
        assert!(!ledger.has_voted("A"));
        assert!(ledger.cast("A", &tokens(&["唐峻"]), &book).is_ok());
    }

    #[test]
    fn test_ballot_truncated_to_first_five() {
        let book = book("唐一，唐二，唐三，唐四，唐五，唐六，唐七。");
        let mut ledger = VoteLedger::default();
        ledger.ensure_registered(["A"]);

        let ballot = ledger
            .cast(
                "A",
                &tokens(&["唐一", "唐二", "唐三", "唐四", "唐五", "唐六", "唐七"]),
                &book,
            )
            .unwrap();
        assert_eq!(ballot.choices, tokens(&["唐一", "唐二", "唐三", "唐四", "唐五"]));
        assert_eq!(ledger.votes_for("唐六"), 0);
    }

    #[test]
    fn test_duplicates_collapsed() {
        let book = book("唐甲，唐乙。");
        let mut ledger = VoteLedger::default();
        ledger.ensure_registered(["A"]);

        ledger
            .cast("A", &tokens(&["唐甲", "唐甲", "唐乙"]), &book)
            .unwrap();
        assert_eq!(ledger.votes_for("唐甲"), 1);
        assert_eq!(ledger.votes_for("唐乙"), 1);
    }

    #[test]
    fn test_leaders_tie_broken_by_first_seen() {
        let book = book("唐乙，唐甲。");
        let mut ledger = VoteLedger::default();
        ledger.ensure_registered(["A", "B"]);

        ledger.cast("A", &tokens(&["唐甲", "唐乙"]), &book).unwrap();
        ledger.cast("B", &tokens(&["唐甲", "唐乙"]), &book).unwrap();

        assert_eq!(ledger.leaders(2, &book), tokens(&["唐乙", "唐甲"]));
    }

    #[test]
    fn test_results_sorted_by_votes() {
        let book = book("唐乙，唐甲，唐丙。");
        let mut ledger = VoteLedger::default();
        ledger.ensure_registered(["A", "B"]);

        ledger.cast("A", &tokens(&["唐丙", "唐甲"]), &book).unwrap();
        ledger.cast("B", &tokens(&["唐丙"]), &book).unwrap();

        let results = ledger.results(&book);
        assert_eq!(
            results,
            vec![TallyEntry::new("唐丙", 2), TallyEntry::new("唐甲", 1)]
        );
        assert!(ledger.is_complete());
    }

    #[test]
    fn test_completion_requires_registry() {
        let ledger = VoteLedger::default();
        assert!(!ledger.is_complete());
    }
}
