//! 题目数据模型
//!
//! 定义整个生成流程中流转的核心数据结构：
//! - `Question` - 校验通过后的单道选择题（不可变）
//! - `GenerationRequest` - 调用方的生成请求，提供缓存指纹
//! - `Batch` - 批次规划单元，只在一次编排内存活

use serde::{Deserialize, Serialize};

use crate::error::{AppResult, RequestError};

/// 每道选择题的选项数量
pub const OPTION_COUNT: usize = 4;

/// 一道校验通过的选择题
///
/// 由校验器从原始 JSON 构造，此后不可变。
/// 不变量：
/// - `options` 恰好 4 个，两两不同
/// - `correct_answer` 等于 `options` 中的某一项
/// - 所有字符串均已去除首尾空白
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
}

/// 生成请求
///
/// 两个指纹相同的请求在缓存意义上视为同一个请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    #[serde(rename = "subTopic")]
    pub sub_topic: String,
    pub count: usize,
}

impl GenerationRequest {
    pub fn new(
        topic: impl Into<String>,
        sub_topic: impl Into<String>,
        count: usize,
    ) -> Self {
        Self {
            topic: topic.into(),
            sub_topic: sub_topic.into(),
            count,
        }
    }

    /// 校验请求参数
    pub fn validate(&self) -> AppResult<()> {
        if self.topic.trim().is_empty() {
            return Err(RequestError::EmptyTopic.into());
        }
        if self.sub_topic.trim().is_empty() {
            return Err(RequestError::EmptySubTopic.into());
        }
        if self.count == 0 {
            return Err(RequestError::InvalidCount { count: 0 }.into());
        }
        Ok(())
    }

    /// 计算缓存指纹
    ///
    /// 主题和子主题去空白、转小写后拼接，保证确定性；
    /// 数量不同的请求视为不同请求
    pub fn fingerprint(&self) -> String {
        format!(
            "{}|{}|{}",
            self.topic.trim().to_lowercase(),
            self.sub_topic.trim().to_lowercase(),
            self.count
        )
    }
}

/// 一个批次：一次有界大小的子请求
///
/// 只在一次编排运行内存活，不跨请求复用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    /// 批次序号（0-based）
    pub index: usize,
    /// 本批次请求的题目数量（≥ 1 且 ≤ max_batch_size）
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = GenerationRequest::new("Mathematics", "Algebra", 7);
        let b = GenerationRequest::new("Mathematics", "Algebra", 7);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_normalizes_case_and_whitespace() {
        let a = GenerationRequest::new("  Mathematics ", "ALGEBRA", 7);
        let b = GenerationRequest::new("mathematics", " algebra ", 7);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_distinguishes_count() {
        let a = GenerationRequest::new("Mathematics", "Algebra", 7);
        let b = GenerationRequest::new("Mathematics", "Algebra", 8);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(GenerationRequest::new("", "Algebra", 7).validate().is_err());
        assert!(GenerationRequest::new("Mathematics", "  ", 7)
            .validate()
            .is_err());
        assert!(GenerationRequest::new("Mathematics", "Algebra", 0)
            .validate()
            .is_err());
        assert!(GenerationRequest::new("Mathematics", "Algebra", 1)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_question_serializes_with_camel_case_answer() {
        let q = Question {
            question: "1+1等于几?".to_string(),
            options: vec!["1".into(), "2".into(), "3".into(), "4".into()],
            correct_answer: "2".to_string(),
        };
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"correctAnswer\":\"2\""));
    }
}
