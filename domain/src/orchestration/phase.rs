//! Discussion phase state machine
//!
//! The phase is never stored independently: it is a pure function of the
//! number of recorded speeches and two monotone flags.

use serde::{Deserialize, Serialize};

/// Stage of a naming discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionPhase {
    /// The host opens and explains the background
    #[default]
    Opening,
    /// Experts collide on brand, language and technology
    EarlyCrossTalk,
    /// Psychology and culture deepen the debate
    Deepening,
    /// Data and international perspective wrap up
    LateStage,
    /// Every registered voter casts one ballot
    Voting,
    /// All ballots are in
    ResultsPublished,
}

impl DiscussionPhase {
    /// Derive the phase, checking conditions top to bottom.
    ///
    /// ```
    /// use roundtable_domain::DiscussionPhase;
    ///
    /// assert_eq!(DiscussionPhase::derive(0, false, false), DiscussionPhase::Opening);
    /// assert_eq!(DiscussionPhase::derive(6, false, false), DiscussionPhase::Deepening);
    /// assert_eq!(DiscussionPhase::derive(3, true, false), DiscussionPhase::Voting);
    /// assert_eq!(DiscussionPhase::derive(3, true, true), DiscussionPhase::ResultsPublished);
    /// ```
    pub fn derive(total_speeches: usize, converged: bool, voting_completed: bool) -> Self {
        if voting_completed {
            DiscussionPhase::ResultsPublished
        } else if converged {
            DiscussionPhase::Voting
        } else if total_speeches <= 1 {
            DiscussionPhase::Opening
        } else if total_speeches <= 5 {
            DiscussionPhase::EarlyCrossTalk
        } else if total_speeches <= 8 {
            DiscussionPhase::Deepening
        } else {
            DiscussionPhase::LateStage
        }
    }

    /// 1-based stage number, as shown in reports.
    pub fn number(&self) -> u8 {
        match self {
            DiscussionPhase::Opening => 1,
            DiscussionPhase::EarlyCrossTalk => 2,
            DiscussionPhase::Deepening => 3,
            DiscussionPhase::LateStage => 4,
            DiscussionPhase::Voting => 5,
            DiscussionPhase::ResultsPublished => 6,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DiscussionPhase::Opening => "opening",
            DiscussionPhase::EarlyCrossTalk => "early_cross_talk",
            DiscussionPhase::Deepening => "deepening",
            DiscussionPhase::LateStage => "late_stage",
            DiscussionPhase::Voting => "voting",
            DiscussionPhase::ResultsPublished => "results_published",
        }
    }

    /// Description handed to the moderator in progress hints.
    pub fn description(&self) -> &str {
        match self {
            DiscussionPhase::Opening => "开场阶段（需要发起人先介绍背景）",
            DiscussionPhase::EarlyCrossTalk => "品牌/语言/科技碰撞阶段",
            DiscussionPhase::Deepening => "心理与文化深化阶段",
            DiscussionPhase::LateStage => "数据与国际收官阶段",
            DiscussionPhase::Voting => "投票阶段：每人选择5个心仪名字",
            DiscussionPhase::ResultsPublished => "结果公布阶段",
        }
    }

    /// Phases in which participants debate rather than vote.
    pub fn is_debate(&self) -> bool {
        matches!(
            self,
            DiscussionPhase::Opening
                | DiscussionPhase::EarlyCrossTalk
                | DiscussionPhase::Deepening
                | DiscussionPhase::LateStage
        )
    }
}

impl std::fmt::Display for DiscussionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
