//! Read-only guidance text built from the tracker state.
//!
//! Everything here is pure: the strings are handed to producers (participants
//! and the moderator) so they know what the discussion looks like right now.

use super::tracker::DiscussionTracker;
use crate::core::string::snippet;
use crate::orchestration::phase::DiscussionPhase;
use std::fmt::Write;

/// Quoted statements are cut to this many characters.
pub const SNIPPET_CHARS: usize = 180;

const RECENT_KEY_POINTS: usize = 3;
const RECENT_NAMES: usize = 5;
const GUIDANCE_NAMES: usize = 6;
const LEADERS_SHOWN: usize = 5;
const STATS_TIMELINE: usize = 20;
const STATS_HOT_LIST: usize = 5;

impl DiscussionTracker {
    /// Digest of recent summaries, newest names and voting progress.
    pub fn context_summary(&self) -> String {
        if self.key_points.is_empty() {
            return "这是讨论的开始。".to_string();
        }

        let start = self.key_points.len().saturating_sub(RECENT_KEY_POINTS);
        let mut out = String::from("## 近期讨论要点\n");
        for (i, point) in self.key_points[start..].iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, point);
        }

        let latest = self.book.latest(RECENT_NAMES);
        if !latest.is_empty() {
            let _ = writeln!(out, "\n最新被提到的名字：{}", latest.join("、"));
        }

        if self.is_voting_phase() {
            self.write_voting_progress(&mut out, "、");
        }
        out
    }

    /// Ballot instructions for the current speaker; empty outside voting.
    pub fn convergence_directive(&self) -> String {
        if !self.is_voting_phase() {
            return String::new();
        }
        let size = self.config.ballot_size;
        let placeholder = self.book.pattern().placeholder();
        let example = vec![placeholder; size].join(", ");

        let mut out = String::from("## 投票阶段指令\n");
        let _ = writeln!(
            out,
            "已累计 {} 个候选，请从中投出你最喜欢的 {} 个名字。",
            self.book.len(),
            size
        );
        out.push_str("请严格按以下格式在回答末尾新增一行：\n");
        let _ = writeln!(out, "【投票】{example}");
        let _ = writeln!(out, "注意：只能投现有候选；超过{size}个仅计前{size}个；重复不计。");
        out
    }

    /// Vote status for the moderator; empty outside voting.
    pub fn convergence_status(&self) -> String {
        if !self.is_voting_phase() {
            return String::new();
        }
        let mut out = String::new();
        let _ = writeln!(
            out,
            "候选总数：{} (阈值 {})",
            self.book.len(),
            self.config.convergence_threshold
        );
        let _ = writeln!(
            out,
            "投票进度：{}/{}",
            self.ledger.voted_count(),
            self.ledger.eligible_count()
        );
        let leaders = self.vote_leaders(LEADERS_SHOWN);
        if leaders.is_empty() {
            out.push_str("尚未产生有效投票。\n");
        } else {
            let _ = writeln!(out, "当前领先：{}", leaders.join(", "));
        }
        out
    }

    /// What the current speaker should push back on.
    ///
    /// Quotes the immediate predecessor when it is someone else, otherwise
    /// the latest statement of any other speaker.
    pub fn debate_directive(&self, current: &str) -> String {
        if self.is_voting_phase() {
            return "已进入投票阶段，请直接根据候选名单进行投票，不再展开分析。".to_string();
        }

        if let Some(last) = self.last_speaker().filter(|s| *s != current) {
            let quoted = snippet(self.latest_statement(last).unwrap_or_default(), SNIPPET_CHARS);
            return format!(
                "上一位【{last}】的观点摘录：{quoted}\n请先针对该观点提出质疑或追问，再给出你的判断。"
            );
        }

        let other = self
            .latest_statements
            .iter()
            .find(|(speaker, _)| speaker != current)
            .or_else(|| self.latest_statements.first());
        match other {
            Some((_, text)) => format!(
                "可参考其他专家观点（示例：{}），请挑选其一提出质疑。",
                snippet(text, SNIPPET_CHARS)
            ),
            None => "请主动提出至少一个质疑点，避免直接给出答案。".to_string(),
        }
    }

    /// Phase directive for a participant prompt.
    ///
    /// The ballot instructions while voting, the debate directive otherwise.
    pub fn phase_directive(&self, current: &str) -> String {
        if self.is_voting_phase() {
            self.convergence_directive()
        } else {
            self.debate_directive(current)
        }
    }

    /// Whether to keep proposing names, with a sample of the newest ones.
    pub fn name_guidance(&self) -> String {
        if self.book.is_empty() {
            return "目前还没有明确候选名字，请务必提出全新的 1-2 个名字。".to_string();
        }
        let latest = self.book.latest(GUIDANCE_NAMES).join(", ");
        if self.is_voting_phase() {
            format!("已进入投票阶段，最近出现的名字包括：{latest}。请等待主持人提供完整候选清单后投票。")
        } else {
            format!("当前候选（部分）：{latest}。可以继续提出 1-2 个全新名字，也可优化已有名字并说明理由。")
        }
    }

    /// Progress hint for the moderator when choosing the next speaker.
    pub fn progress_hint(&self) -> String {
        let mut out = format!(
            "当前阶段：{}\n已发言 {} 次",
            self.phase().description(),
            self.total_speeches()
        );

        let roster = &self.config.roster;
        let silent: Vec<&str> = roster
            .iter()
            .filter(|name| self.speech_count(name) == 0)
            .map(String::as_str)
            .collect();
        if !silent.is_empty() && silent.len() < roster.len() {
            let _ = write!(out, "\n尚未发言：{}", silent.join("、"));
        }

        if !self.book.is_empty() {
            let _ = write!(out, "\n已提到的候选名字数：{}", self.book.len());
        }

        if self.is_voting_phase() {
            out.push('\n');
            self.write_voting_progress(&mut out, "、");
            out.truncate(out.trim_end().len());
        }

        if self.manual_control_enabled {
            out.push_str("\n（提示：输入 stop 可结束，输入名字可指定下一位。）");
        }
        out
    }

    /// End-of-run statistics.
    pub fn final_stats(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "总发言轮数：{}", self.total_speeches());
        let _ = writeln!(out, "讨论阶段：{}", self.phase());

        out.push_str("\n各参与者发言次数：\n");
        let mut counts: Vec<(&str, usize)> = self
            .speakers
            .iter()
            .map(|s| (s.as_str(), self.speech_count(s)))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        for (speaker, count) in counts {
            let _ = writeln!(out, "  - {speaker}: {count} 次");
        }

        if !self.book.is_empty() {
            let _ = writeln!(out, "\n提到的候选名字 ({} 个)：", self.book.len());
            let _ = writeln!(out, "  {}", self.book.latest(STATS_TIMELINE).join(", "));
            if self.book.len() > STATS_TIMELINE {
                out.push_str("  ...\n");
            }
            let hot = self.top_candidates(STATS_HOT_LIST);
            if !hot.is_empty() {
                let _ = writeln!(out, "  热度前列：{}", hot.join(", "));
            }
        }

        let results = self.vote_results();
        if !results.is_empty() {
            out.push_str("\n投票统计（当前）：\n");
            for entry in results {
                let _ = writeln!(out, "  - {entry}");
            }
        }
        out
    }

    fn write_voting_progress(&self, out: &mut String, separator: &str) {
        let _ = writeln!(
            out,
            "投票进度：{}/{}",
            self.ledger.voted_count(),
            self.ledger.eligible_count()
        );
        let leaders = self.vote_leaders(LEADERS_SHOWN);
        if !leaders.is_empty() {
            let _ = writeln!(out, "当前领先：{}", leaders.join(separator));
        }
    }
}
