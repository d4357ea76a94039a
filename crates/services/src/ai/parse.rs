use serde::de::DeserializeOwned;

use crate::error::LlmError;

/// Remove a Markdown code fence the model wrapped its answer in.
///
/// Handles both ```` ```json ```` and bare ```` ``` ```` openers; text without
/// a leading fence is returned trimmed.
#[must_use]
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let body = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse model output as JSON after stripping any code fence.
///
/// # Errors
///
/// Returns `LlmError::Malformed` if the content is not valid JSON for `T`.
pub fn parse_structured<T: DeserializeOwned>(content: &str) -> Result<T, LlmError> {
    Ok(serde_json::from_str(strip_code_fence(content))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fence("  ```\n{\"a\": 1}\n```  "), "{\"a\": 1}");
    }

    #[test]
    fn leaves_plain_output_alone() {
        assert_eq!(strip_code_fence(" [] \n"), "[]");
    }

    #[test]
    fn tolerates_missing_closing_fence() {
        assert_eq!(strip_code_fence("```json\n[3]"), "[3]");
    }

    #[test]
    fn malformed_output_is_an_error() {
        let err = parse_structured::<Vec<u32>>("```json\nnot json\n```").unwrap_err();
        assert!(matches!(err, LlmError::Malformed(_)));
    }
}
