//! 响应提取 - 业务能力层
//!
//! 生成模型经常在 JSON 数组外面包一层解释性文字或代码围栏，
//! 本模块负责从自由文本中把数组子串"宽松地"切出来；
//! 严格的结构校验交给 validator

use regex::Regex;

use crate::error::ExtractError;

/// 从模型的自由文本响应中提取 JSON 数组子串
///
/// 算法：
/// 1. 去除首尾空白
/// 2. 如果存在代码围栏（可选 `json` 标记），先取围栏内部文本
/// 3. 取第一个 `[` 到最后一个 `]` 之间的子串（含两端）
///
/// 贪心取最外层括号是刻意的：数组总是文本中最大的括号区域，
/// 外围的解释性文字会被自然丢弃
pub fn extract_json_array(raw_text: &str) -> Result<String, ExtractError> {
    let mut text = raw_text.trim();

    // 代码围栏优先：```json ... ``` 或 ``` ... ```
    // 正则编译失败只可能是模式本身写错，属于不可达分支，此时直接跳过围栏处理
    if let Ok(re) = Regex::new(r"(?s)```(?:json)?\s*(.*?)```") {
        if let Some(caps) = re.captures(text) {
            if let Some(inner) = caps.get(1) {
                text = inner.as_str().trim();
            }
        }
    }

    let start = text.find('[').ok_or(ExtractError::NoJsonFound)?;
    let end = text.rfind(']').ok_or(ExtractError::NoJsonFound)?;
    if end < start {
        return Err(ExtractError::NoJsonFound);
    }

    Ok(text[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARRAY: &str = r#"[{"question": "Q1", "options": ["A", "B", "C", "D"], "correctAnswer": "A"}]"#;

    #[test]
    fn test_extract_bare_array() {
        assert_eq!(extract_json_array(ARRAY).unwrap(), ARRAY);
    }

    #[test]
    fn test_extract_array_wrapped_in_prose() {
        let raw = format!(
            "Sure! Here are your questions:\n\n{}\n\nLet me know if you need more.",
            ARRAY
        );
        assert_eq!(extract_json_array(&raw).unwrap(), ARRAY);
    }

    #[test]
    fn test_extract_from_json_fence() {
        let raw = format!("Here you go:\n```json\n{}\n```", ARRAY);
        assert_eq!(extract_json_array(&raw).unwrap(), ARRAY);
    }

    #[test]
    fn test_extract_from_untagged_fence() {
        let raw = format!("```\n{}\n```", ARRAY);
        assert_eq!(extract_json_array(&raw).unwrap(), ARRAY);
    }

    #[test]
    fn test_extract_fence_with_surrounding_prose_inside() {
        // 围栏里仍可能混入文字，括号截取要能兜底
        let raw = format!("```json\nquestions below\n{}\n```", ARRAY);
        assert_eq!(extract_json_array(&raw).unwrap(), ARRAY);
    }

    #[test]
    fn test_extract_outermost_brackets() {
        // 数组元素内部的 `[` `]`（options）不能截断提取
        let raw = r#"prefix [ [1, 2], [3, 4] ] suffix"#;
        assert_eq!(extract_json_array(raw).unwrap(), "[ [1, 2], [3, 4] ]");
    }

    #[test]
    fn test_extract_no_array_fails() {
        let err = extract_json_array("I'm sorry, I can't help with that.").unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonFound));
    }

    #[test]
    fn test_extract_mismatched_brackets_fail() {
        assert!(extract_json_array("] oops [").is_err());
        assert!(extract_json_array("only open [").is_err());
    }
}
