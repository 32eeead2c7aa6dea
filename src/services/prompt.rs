//! Prompt 构建 - 业务能力层
//!
//! 只负责把 (主题, 子主题, 批次大小) 组装成发给生成模型的指令文本，
//! 不关心调用和解析

use crate::models::OPTION_COUNT;

/// 构建一个批次的选择题生成 prompt
///
/// 要求模型严格按照示例结构输出恰好 `batch_size` 道题目，
/// 并且只输出 JSON 数组本身。注意这只是对模型的"最大努力"约束，
/// 下游提取器不假设模型会遵守
pub fn build_mcq_prompt(topic: &str, sub_topic: &str, batch_size: usize) -> String {
    format!(
        r#"Generate {batch_size} multiple choice questions about {sub_topic} in {topic}.
Format each question exactly like this example, maintaining the exact structure:
[
    {{
        "question": "What is the capital of France?",
        "options": ["London", "Paris", "Berlin", "Madrid"],
        "correctAnswer": "Paris"
    }}
]
Rules:
- Each question must have exactly {option_count} distinct options.
- correctAnswer must match one of the options verbatim.
- Generate exactly {batch_size} questions in this exact format.
- Respond with the JSON array only, no other text."#,
        batch_size = batch_size,
        sub_topic = sub_topic,
        topic = topic,
        option_count = OPTION_COUNT,
    )
}
