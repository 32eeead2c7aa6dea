//! 题目校验 - 业务能力层
//!
//! 提取器负责"宽松地找到数组"，本模块负责"严格地检查结构"：
//! 逐项检查字段、做空白归一化、强制 4 选项和答案归属不变量。
//! 数量不足不算错误——欠生成由编排层按数量处理（部分批次可恢复）

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ValidateError;
use crate::models::{Question, OPTION_COUNT};

/// 解析并校验一个 JSON 数组文本，返回结构合法的题目列表
///
/// 失败情形：
/// - `ParseError`: 不是合法 JSON，或顶层不是数组
/// - `SchemaError`: 某一项缺字段 / 字段类型错误 / 选项数量不是 4 /
///   选项重复 / correctAnswer 不在选项中（错误里带项下标和原因）
///
/// 数量与 `expected_count` 不一致只记日志，不报错
pub fn validate_questions(
    json_array_text: &str,
    expected_count: usize,
) -> Result<Vec<Question>, ValidateError> {
    let value: Value =
        serde_json::from_str(json_array_text).map_err(|e| ValidateError::ParseError {
            detail: e.to_string(),
        })?;

    let items = value.as_array().ok_or_else(|| ValidateError::ParseError {
        detail: "顶层不是JSON数组".to_string(),
    })?;

    let mut questions = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        questions.push(validate_item(item, index)?);
    }

    if questions.len() != expected_count {
        warn!(
            "⚠️ 批次题目数量不符: 期望 {} 实际 {} (由编排层按数量聚合)",
            expected_count,
            questions.len()
        );
    } else {
        debug!("批次校验通过: {} 道题目", questions.len());
    }

    Ok(questions)
}

/// 校验单道题目
fn validate_item(item: &Value, index: usize) -> Result<Question, ValidateError> {
    let schema_err = |detail: &str| ValidateError::SchemaError {
        index,
        detail: detail.to_string(),
    };

    let question = item
        .get("question")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| schema_err("缺少非空的 question 字段"))?
        .to_string();

    let raw_options = item
        .get("options")
        .and_then(|v| v.as_array())
        .ok_or_else(|| schema_err("缺少 options 数组"))?;

    if raw_options.len() != OPTION_COUNT {
        return Err(schema_err(&format!(
            "options 数量必须是 {}，实际 {}",
            OPTION_COUNT,
            raw_options.len()
        )));
    }

    let mut options = Vec::with_capacity(OPTION_COUNT);
    for opt in raw_options {
        // 防御模型返回数字选项：非字符串值允许被强转成字符串
        let text = match opt {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return Err(schema_err("option 无法转换为字符串")),
        };
        options.push(text);
    }

    // 选项必须两两不同（空白/大小写归一化后比较）
    for i in 0..options.len() {
        for j in (i + 1)..options.len() {
            if normalize(&options[i]) == normalize(&options[j]) {
                return Err(schema_err("options 中存在重复选项"));
            }
        }
    }

    let correct_answer = item
        .get("correctAnswer")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| schema_err("缺少非空的 correctAnswer 字段"))?;

    // 答案必须是选项之一；命中后取选项的存储形式，保证逐字相等
    let canonical = options
        .iter()
        .find(|opt| normalize(opt) == normalize(correct_answer))
        .cloned()
        .ok_or_else(|| schema_err("correctAnswer 不在 options 中"))?;

    Ok(Question {
        question,
        options,
        correct_answer: canonical,
    })
}

/// 空白 + 大小写归一化，用于选项比较
fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_item_json() -> String {
        r#"[{
            "question": "  What is 2 + 2?  ",
            "options": [" 3 ", "4", "5", "6"],
            "correctAnswer": " 4 "
        }]"#
            .to_string()
    }

    #[test]
    fn test_validate_trims_all_strings() {
        let questions = validate_questions(&valid_item_json(), 1).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "What is 2 + 2?");
        assert_eq!(questions[0].options, vec!["3", "4", "5", "6"]);
        assert_eq!(questions[0].correct_answer, "4");
    }

    #[test]
    fn test_validate_rejects_non_array() {
        let err = validate_questions(r#"{"question": "Q"}"#, 1).unwrap_err();
        assert!(matches!(err, ValidateError::ParseError { .. }));
    }

    #[test]
    fn test_validate_rejects_invalid_json() {
        let err = validate_questions("not json at all", 1).unwrap_err();
        assert!(matches!(err, ValidateError::ParseError { .. }));
    }

    #[test]
    fn test_validate_rejects_missing_correct_answer() {
        let json = r#"[{"question": "Q", "options": ["A", "B", "C", "D"]}]"#;
        match validate_questions(json, 1).unwrap_err() {
            ValidateError::SchemaError { index, detail } => {
                assert_eq!(index, 0);
                assert!(detail.contains("correctAnswer"));
            }
            other => panic!("期望 SchemaError，实际 {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_three_options() {
        let json = r#"[{"question": "Q", "options": ["A", "B", "C"], "correctAnswer": "A"}]"#;
        match validate_questions(json, 1).unwrap_err() {
            ValidateError::SchemaError { detail, .. } => assert!(detail.contains("options")),
            other => panic!("期望 SchemaError，实际 {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_five_options() {
        let json =
            r#"[{"question": "Q", "options": ["A", "B", "C", "D", "E"], "correctAnswer": "A"}]"#;
        assert!(matches!(
            validate_questions(json, 1).unwrap_err(),
            ValidateError::SchemaError { .. }
        ));
    }

    #[test]
    fn test_validate_rejects_answer_not_in_options() {
        let json = r#"[{"question": "Q", "options": ["A", "B", "C", "D"], "correctAnswer": "E"}]"#;
        match validate_questions(json, 1).unwrap_err() {
            ValidateError::SchemaError { detail, .. } => {
                assert!(detail.contains("不在 options 中"))
            }
            other => panic!("期望 SchemaError，实际 {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_duplicate_options() {
        let json = r#"[{"question": "Q", "options": ["A", "a ", "C", "D"], "correctAnswer": "C"}]"#;
        assert!(matches!(
            validate_questions(json, 1).unwrap_err(),
            ValidateError::SchemaError { .. }
        ));
    }

    #[test]
    fn test_validate_canonicalizes_answer_case() {
        let json =
            r#"[{"question": "Q", "options": ["Paris", "London", "Berlin", "Madrid"], "correctAnswer": "paris"}]"#;
        let questions = validate_questions(json, 1).unwrap();
        assert_eq!(questions[0].correct_answer, "Paris", "答案应取选项的存储形式");
    }

    #[test]
    fn test_validate_coerces_numeric_options() {
        let json = r#"[{"question": "Q", "options": [1, 2, 3, 4], "correctAnswer": "2"}]"#;
        let questions = validate_questions(json, 1).unwrap();
        assert_eq!(questions[0].options, vec!["1", "2", "3", "4"]);
        assert_eq!(questions[0].correct_answer, "2");
    }

    #[test]
    fn test_validate_under_count_is_not_an_error() {
        // 欠生成交给编排层处理，校验器不报错
        let questions = validate_questions(&valid_item_json(), 5).unwrap();
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn test_validate_reports_offending_index() {
        let json = r#"[
            {"question": "Q1", "options": ["A", "B", "C", "D"], "correctAnswer": "A"},
            {"question": "", "options": ["A", "B", "C", "D"], "correctAnswer": "A"}
        ]"#;
        match validate_questions(json, 2).unwrap_err() {
            ValidateError::SchemaError { index, .. } => assert_eq!(index, 1),
            other => panic!("期望 SchemaError，实际 {:?}", other),
        }
    }
}
