use serde_json::{Map, Value};

use crate::error::GenerationError;

// 错误信息中保留的原始响应长度
const EXCERPT_CHARS: usize = 200;

/// 解析模型返回的JSON文本（去除首尾空白）
pub fn parse_json_response(text: &str) -> Result<Value, GenerationError> {
    let trimmed = text.trim();
    serde_json::from_str(trimmed).map_err(|source| GenerationError::MalformedResponse {
        excerpt: excerpt(trimmed),
        source,
    })
}

/// 要求响应为JSON对象
pub fn expect_object(value: Value) -> Result<Map<String, Value>, GenerationError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(GenerationError::UnexpectedShape(format!(
            "expected a JSON object, got {}",
            excerpt(&other.to_string())
        ))),
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_trims_whitespace() {
        let value = parse_json_response("\n  {\"Idea\": \"desc\"}  \n").unwrap();
        assert_eq!(value, json!({"Idea": "desc"}));
    }

    #[test]
    fn test_prose_is_malformed() {
        let err = parse_json_response("Sure! Here are your ideas:").unwrap_err();
        match err {
            GenerationError::MalformedResponse { excerpt, .. } => {
                assert_eq!(excerpt, "Sure! Here are your ideas:")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let long = "x".repeat(1000);
        let GenerationError::MalformedResponse { excerpt, .. } =
            parse_json_response(&long).unwrap_err()
        else {
            panic!("expected malformed response");
        };
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
    }

    #[test]
    fn test_expect_object() {
        assert!(expect_object(json!({"a": 1})).is_ok());
        let err = expect_object(json!(["a"])).unwrap_err();
        assert!(err.is_malformed());
    }
}
