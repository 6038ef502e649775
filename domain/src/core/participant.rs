//! Participants and the discussion panel.

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A named participant backed by a text-producing model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Canonical identifier, compared by exact equality
    pub name: String,
    /// Model profile handed to the gateway
    pub model: String,
    /// Persona instructions (system prompt)
    pub instructions: String,
}

impl Participant {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            instructions: instructions.into(),
        }
    }

    /// The built-in moderator: default model, no extra persona instructions.
    pub fn default_moderator() -> Self {
        Self::new(DEFAULT_MODERATOR, DEFAULT_MODEL, "")
    }
}

/// The fixed, ordered set of participants.
///
/// Order matters: it is the round-robin fallback order, the voting order and
/// the order in which free-form selector output is matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    participants: Vec<Participant>,
}

impl Panel {
    pub fn new(participants: Vec<Participant>) -> Result<Self, DomainError> {
        if participants.is_empty() {
            return Err(DomainError::NoParticipants);
        }
        for (i, p) in participants.iter().enumerate() {
            if p.name.trim().is_empty() {
                return Err(DomainError::EmptyParticipantName);
            }
            if participants[..i].iter().any(|q| q.name == p.name) {
                return Err(DomainError::DuplicateParticipant(p.name.clone()));
            }
        }
        Ok(Self { participants })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    /// Resolve free-form selector output to a participant.
    ///
    /// Matching rule: the first participant, in panel order, whose name
    /// appears as a substring of `raw`. Exact equality is just the special
    /// case where the output is the bare name.
    pub fn resolve(&self, raw: &str) -> Option<&Participant> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        self.participants.iter().find(|p| raw.contains(p.name.as_str()))
    }

    /// Deterministic fallback speaker for a given round.
    pub fn round_robin(&self, round: usize) -> &Participant {
        &self.participants[round % self.participants.len()]
    }

    /// The built-in naming panel: the father plus seven experts.
    pub fn default_panel() -> Self {
        Self {
            participants: default_participants(),
        }
    }
}

/// Model profile used by the built-in panel.
pub const DEFAULT_MODEL: &str = "default";

/// Name of the built-in moderator.
pub const DEFAULT_MODERATOR: &str = "主持人";

fn default_participants() -> Vec<Participant> {
    vec![
        Participant::new(
            "爸爸",
            DEFAULT_MODEL,
            "你是一位即将给儿子起名字的父亲，姓唐，名大力。\n\
             - 分享家庭的价值观、对孩子的期望，以及当前讨论中你认可或质疑的观点。\n\
             - 每次发言要点名至少一位专家，请他们进一步解释或修正观点。\n\
             - 清晰表达需求：名字需阳光、兼具文化底蕴、易读易写、利于全球交流。\n\
             - 如果某位专家的建议打动你，要说明原因并推动他们进一步优化具体名字。",
        ),
        Participant::new(
            "品牌策略师",
            DEFAULT_MODEL,
            "你是品牌策略顾问，擅长从定位、故事和传播角度打造名字。\n\
             - 每次回应时，先点评上一位专家观点中可用于品牌叙事的部分，指出不足。\n\
             - 给出 3-5 个名字，并描述在不同生活/职场场景、社交媒体昵称中的呈现。\n\
             - 引导其他专家思考：如何让名字既易懂又具有识别度。",
        ),
        Participant::new(
            "语言学家",
            DEFAULT_MODEL,
            "你是语言与语音学家，关注发音、节奏、语义联想及跨语言兼容性。\n\
             - 针对上一位的名字，分析声母韵母搭配、节奏感、谐音风险。\n\
             - 建议如何优化音节、用字组合，使名字朗朗上口且避免歧义。",
        ),
        Participant::new(
            "科技创业导师",
            DEFAULT_MODEL,
            "你在科技创业与投融资圈深耕，关注名字在商业、技术团队中的感受。\n\
             - 分析名字在简历、开源社区、黑客松等场景的专业感与辨识度。\n\
             - 需对品牌策略师或语言学家的观点进行挑战，强调可扩展性与国际会议场景。",
        ),
        Participant::new(
            "教育心理顾问",
            DEFAULT_MODEL,
            "你关注儿童发展、心理暗示与校园社交影响。\n\
             - 判断名字可能带来的性格投射、集体印象与潜在标签。\n\
             - 要求其他专家说明他们的建议如何避免刻板印象。",
        ),
        Participant::new(
            "文化史策展人",
            DEFAULT_MODEL,
            "你兼具文博策展与古籍研究背景，擅长挖掘传统典故的现代解读。\n\
             - 将专家提出的名字与诗词、历史人物或自然意象建立联系。\n\
             - 指出可能的文化敏感点、历史寓意及可讲述的故事。",
        ),
        Participant::new(
            "数据洞察分析师",
            DEFAULT_MODEL,
            "你掌握全国户籍、社交媒体热度和同名率数据。\n\
             - 为每个名字提供同名人数区间、搜索结果量等洞察。\n\
             - 质疑没有数据支撑的观点，并提供可参考的统计假设。",
        ),
        Participant::new(
            "国际传播顾问",
            DEFAULT_MODEL,
            "你专注全球媒体、公关和多语种社交平台策略。\n\
             - 评估名字在英文缩写、播客、海外社交媒体上的可读性与记忆点。\n\
             - 提出 2-3 个跨文化兼容性高的名字，并给出发音指南。",
        ),
    ]
}
