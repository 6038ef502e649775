//! Prompt templates for the naming discussion

use crate::naming::{PLACEHOLDER_SUFFIX, VOTE_MARKER, bracketed};
use crate::quorum::TallyEntry;

/// Default discussion topic.
pub const DEFAULT_TOPIC: &str = "给一个即将出生的男孩起名字";

/// Signal the moderator emits to suggest ending the discussion.
pub const END_SIGNAL: &str = "[结束]";

/// Appended to a ballot the system had to complete on a speaker's behalf.
pub const SYNTHETIC_BALLOT_NOTE: &str = "(系统自动补全投票)";

/// Does the selector output suggest ending the discussion?
pub fn is_end_signal(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.contains(END_SIGNAL) || trimmed == "结束"
}

/// Settings every template shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub topic: String,
    pub convergence_threshold: usize,
    pub ballot_size: usize,
    pub name_prefix: char,
}

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// `【投票】唐XX, 唐XX, ...` with one placeholder per ballot slot.
    pub fn ballot_example(ctx: &PromptContext) -> String {
        let placeholder = format!("{}{PLACEHOLDER_SUFFIX}", ctx.name_prefix);
        format!(
            "{}{}",
            bracketed(VOTE_MARKER),
            vec![placeholder; ctx.ballot_size].join(", ")
        )
    }

    /// System message shared by every participant.
    pub fn group_rules(ctx: &PromptContext, names: &[String]) -> String {
        format!(
            r#"# 起名讨论小组

## 讨论主题
{topic}

## 参与者
{members}

## 讨论规则
1. 每位参与者发言时请阅读之前的所有讨论内容
2. 可以互相质疑、补充、回应其他人的观点
3. 提出具体的名字建议时请说明理由
4. 当候选名累计达到 {threshold} 个后，进入投票阶段：主持人展示候选清单，依次邀请每位参与者投 {size} 票（末尾以 {example} 格式提交）。"#,
            topic = ctx.topic,
            members = names.join("、"),
            threshold = ctx.convergence_threshold,
            size = ctx.ballot_size,
            example = Self::ballot_example(ctx),
        )
    }

    /// Moderator's opening line.
    pub fn opening_message(ctx: &PromptContext) -> String {
        format!(
            "大家好！我们今天来讨论{}。初期可自由提出候选；累计到{}个后将转入‘投票阶段’，每人投{}票，最后公布票型。",
            ctx.topic, ctx.convergence_threshold, ctx.ballot_size
        )
    }

    /// System prompt of the moderator's own session.
    pub fn moderator_system(ctx: &PromptContext, names: &[String], extra: &str) -> String {
        let first = names.first().map(String::as_str).unwrap_or_default();
        let mut prompt = format!(
            r#"你是讨论的主持人，负责任务：
1. 当被要求“决定下一个发言者”时，只输出参与者列表中的名字，或输出“{end}”。
2. 当被要求“总结”时，用1-3句话回顾刚才的发言，点出要点和下一步关注点，切勿邀请下一位。

参与者列表：{members}

讨论流程建议：
1. 请“{first}”开场并在中后段再次确认需求；
2. 让不同背景的专家连续碰撞，互相回应质疑；
3. 观察是否形成共识或仍有分歧，必要时重新邀请相关专家回应质疑；
4. 只有当所有角色至少发言一次且讨论出现清晰方案时，才输出 {end}。
5. 当候选名字累计达到 {threshold} 个时，请宣布进入“投票阶段”：停止分析环节，向所有参与者展示候选清单，依次邀请每位参与者投票（每人{size}票）。
6. 收集完全部投票后，按照票数从高到低公布票型，给出后续建议，然后宣布 {end}。"#,
            end = END_SIGNAL,
            members = names.join("、"),
            threshold = ctx.convergence_threshold,
            size = ctx.ballot_size,
        );
        if !extra.trim().is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(extra.trim());
        }
        prompt
    }

    /// Ask the moderator who speaks next.
    pub fn selection_prompt(progress_hint: &str, convergence_status: &str) -> String {
        let mut prompt = format!("{progress_hint}\n\n");
        if !convergence_status.trim().is_empty() {
            prompt.push_str(convergence_status.trim_end());
            prompt.push_str("\n\n");
        }
        prompt.push_str(&format!(
            "根据当前讨论进度，请决定下一个应该发言的人是谁？\n未收到用户 stop 指令前不要输出 {END_SIGNAL}。\n只输出一个名字，或输出 {END_SIGNAL}。"
        ));
        prompt
    }

    /// Debate-phase prompt for a participant.
    pub fn participant_prompt(
        speaker: &str,
        context_summary: &str,
        debate_directive: &str,
        name_guidance: &str,
        convergence_directive: &str,
        ctx: &PromptContext,
    ) -> String {
        format!(
            r#"{context_summary}

{debate_directive}
{name_guidance}
{convergence_directive}

---
请以"{speaker}"的身份发言，并遵循以下步骤：
1. 若处于常规阶段：可以对已经提出的名字先提出一个质疑点，再补充论据，没有提出过名字则不需要质疑；
2. 若处于常规阶段：可提出 1-3 个新名字或优化已有名字；
3. 若处于投票阶段：请直接在末尾追加一行{marker}并列出{size}个最喜欢的候选；
4. 最后一行务必保持票据格式正确，以便统计。"#,
            marker = bracketed(VOTE_MARKER),
            size = ctx.ballot_size,
        )
    }

    /// Minimal voting-phase prompt: the candidate list and the ballot format.
    pub fn voting_prompt(candidates: &[String], ctx: &PromptContext) -> String {
        format!(
            "已进入投票阶段。请不要进行分析或提出新名字。\n候选清单（{}）：{}\n请仅在回复末尾追加一行投票，不要添加其他内容：\n{}",
            candidates.len(),
            candidates.join(", "),
            Self::ballot_example(ctx)
        )
    }

    /// System note that keeps voters from seeing other ballots.
    pub fn voting_isolation(ctx: &PromptContext) -> String {
        format!(
            "投票阶段说明：请独立完成投票，不参考他人已投票内容或主持人总结中的票型信息。只基于候选清单做出你的{}票选择，并在末尾添加{}行。",
            ctx.ballot_size,
            bracketed(VOTE_MARKER)
        )
    }

    /// Corrective instruction after a reply without a ballot line.
    pub fn ballot_reminder(ctx: &PromptContext) -> String {
        format!("请在回复末尾添加：{}", Self::ballot_example(ctx))
    }

    /// Ask the moderator to summarise the turn that just ended.
    pub fn summary_prompt(speaker: &str, hint: &str) -> String {
        let mut prompt = format!(
            "刚才【{speaker}】发言完毕。\n\n请用1-3句话总结要点，并复述上一位建议的名字，同时点明关键结论和下一步关注点。\n只做总结，不要邀请下一位。"
        );
        if !hint.trim().is_empty() {
            prompt.push('\n');
            prompt.push_str(hint.trim_end());
        }
        prompt
    }

    /// Summary hint once every ballot is in.
    pub fn votes_complete_hint() -> &'static str {
        "投票已完成，请准备公布票型。"
    }

    /// Ask the moderator to announce the vote.
    pub fn announcement_prompt(total: usize, hot_list: &[&str], ctx: &PromptContext) -> String {
        let hot = if hot_list.is_empty() {
            "（暂无热度前列的统计）".to_string()
        } else {
            hot_list.join(", ")
        };
        let size = ctx.ballot_size;
        format!(
            r#"候选名数量已达到阈值，进入投票阶段。
请以主持人身份用1-3句话做投票前概览：
- 总候选数与本轮目标（每人投{size}票，最终公布票型）
- 提及热度较高的若干候选（参考清单）
- 宣布正式进入投票阶段，将依次邀请所有参与者投票

候选总数：{total}
候选名称：{hot}
投票规则：只能投现有候选；每人最多{size}票；重复不计；超过{size}个仅计前{size}个。
注意：此处只做概览与宣布，不要点名邀请具体人。"#
        )
    }

    /// Ask the moderator to publish the results and close the meeting.
    pub fn closing_prompt(results: &[TallyEntry]) -> String {
        let tally = results
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        format!(
            r#"全部投票已完成。
请以主持人身份公布票型（从高到低）、指出得票前列的名字，并给出后续建议（如试写、亲友反馈、小范围A/B测试）。
可按如下票型数据组织口径：
{tally}
然后正式宣布会议结束并送上祝福。"#
        )
    }

    /// Transcript entry for a participant's turn.
    pub fn speech_entry(speaker: &str, round: usize, text: &str) -> String {
        format!("【{speaker}发言】(第 {round} 轮)\n{text}")
    }

    pub fn opening_entry(message: &str) -> String {
        format!("【主持人开场】\n{message}")
    }

    pub fn summary_entry(summary: &str) -> String {
        format!("【主持人总结】{summary}")
    }

    pub fn announcement_entry(announcement: &str) -> String {
        format!("【主持人宣布】{announcement}")
    }

    pub fn closing_entry(closing: &str) -> String {
        format!("【主持人终结】{closing}")
    }

    /// Append a synthesized ballot line to a reply that never carried one.
    pub fn with_synthetic_ballot(reply: &str, ballot: &str) -> String {
        if reply.is_empty() {
            return format!("{ballot}\n{SYNTHETIC_BALLOT_NOTE}");
        }
        format!("{reply}\n{ballot}\n{SYNTHETIC_BALLOT_NOTE}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PromptContext {
        PromptContext {
            topic: DEFAULT_TOPIC.to_string(),
            convergence_threshold: 30,
            ballot_size: 5,
            name_prefix: '唐',
        }
    }

    #[test]
    fn test_end_signal() {
        assert!(is_end_signal("[结束]"));
        assert!(is_end_signal("我认为可以 [结束] 了"));
        assert!(is_end_signal(" 结束 "));
        assert!(!is_end_signal("语言学家"));
        assert!(!is_end_signal("结束吧语言学家"));
    }

    #[test]
    fn test_ballot_reminder_format() {
        assert_eq!(
            PromptTemplate::ballot_reminder(&ctx()),
            "请在回复末尾添加：【投票】唐XX, 唐XX, 唐XX, 唐XX, 唐XX"
        );
    }

    #[test]
    fn test_group_rules_mentions_members_and_threshold() {
        let names = vec!["爸爸".to_string(), "语言学家".to_string()];
        let rules = PromptTemplate::group_rules(&ctx(), &names);
        assert!(rules.contains("爸爸、语言学家"));
        assert!(rules.contains("达到 30 个后"));
        assert!(rules.contains(DEFAULT_TOPIC));
    }

    #[test]
    fn test_selection_prompt_with_and_without_status() {
        let plain = PromptTemplate::selection_prompt("当前阶段：开场", "");
        assert!(plain.starts_with("当前阶段：开场\n\n根据当前讨论进度"));

        let voting = PromptTemplate::selection_prompt("当前阶段：投票", "投票进度：1/8\n");
        assert!(voting.contains("投票进度：1/8\n\n根据当前讨论进度"));
    }

    #[test]
    fn test_voting_prompt_lists_candidates() {
        let names = vec!["唐若岚".to_string(), "唐峻".to_string()];
        let prompt = PromptTemplate::voting_prompt(&names, &ctx());
        assert!(prompt.contains("候选清单（2）：唐若岚, 唐峻"));
        assert!(prompt.ends_with("【投票】唐XX, 唐XX, 唐XX, 唐XX, 唐XX"));
    }

    #[test]
    fn test_closing_prompt_tally() {
        let results = vec![TallyEntry::new("唐峻", 3), TallyEntry::new("唐若岚", 2)];
        let prompt = PromptTemplate::closing_prompt(&results);
        assert!(prompt.contains("唐峻: 3票; 唐若岚: 2票"));
    }

    #[test]
    fn test_moderator_system_appends_extra() {
        let names = vec!["爸爸".to_string()];
        let prompt = PromptTemplate::moderator_system(&ctx(), &names, "语气轻松");
        assert!(prompt.contains("请“爸爸”开场"));
        assert!(prompt.ends_with("语气轻松"));
    }

    #[test]
    fn test_synthetic_ballot_entry() {
        let text = PromptTemplate::with_synthetic_ballot("好的", "【投票】唐峻");
        assert_eq!(text, "好的\n【投票】唐峻\n(系统自动补全投票)");
        let bare = PromptTemplate::with_synthetic_ballot("", "【投票】唐峻");
        assert_eq!(bare, "【投票】唐峻\n(系统自动补全投票)");
    }
}
