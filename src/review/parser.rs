//! Parse per-file review responses into typed comments.
//!
//! The response is deserialized into a strict schema once. If that fails,
//! common wrapping (a fenced code block, or prose around the JSON object) is
//! stripped and parsing is retried a single time.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::review::MAX_COMMENTS_PER_FILE;
use crate::models::{Category, ReviewComment};

use super::ReviewError;

/// Maximum length of response text quoted in parse errors.
const PARSE_ERROR_PREVIEW_LEN: usize = 500;

/// Regex for extracting content inside a markdown code fence.
///
/// The closing ``` must start a line so backticks inside JSON string
/// values do not end the match early.
static FENCE_RE: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
    regex::Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n(.*?)\r?\n[ \t]*```").unwrap()
});

/// Expected response shape, also used as the output schema sent to providers.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReviewPayload {
    pub comments: Vec<RawComment>,
}

/// One comment as the model returns it, before normalization.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RawComment {
    #[serde(rename = "fileName", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// New-file line number; 0 or absent for file-level comments.
    #[serde(rename = "lineNo", default, deserialize_with = "lenient_line_no")]
    #[schemars(with = "Option<i64>")]
    pub line_no: Option<i64>,
    #[serde(rename = "type", alias = "category", default)]
    pub category: Category,
    #[serde(default)]
    pub message: String,
}

/// Accepted top-level shapes: `{"comments": [...]}` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Object(ReviewPayload),
    List(Vec<RawComment>),
}

impl Envelope {
    fn into_comments(self) -> Vec<RawComment> {
        match self {
            Envelope::Object(payload) => payload.comments,
            Envelope::List(comments) => comments,
        }
    }
}

/// Accept integers, integral floats, numeric strings, and null.
fn lenient_line_no<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LineRef {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<LineRef>::deserialize(deserializer)? {
        Some(LineRef::Int(n)) => Some(n),
        Some(LineRef::Float(f)) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        Some(LineRef::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Parse `response` into at most [`MAX_COMMENTS_PER_FILE`] comments for `file_name`.
///
/// Comments are attributed to `file_name` regardless of what the model wrote,
/// non-positive line numbers become file-level, and empty messages are
/// dropped. Unknown categories have already been folded by [`Category`]'s
/// deserializer.
pub fn parse_review_response(
    file_name: &str,
    response: &str,
) -> Result<Vec<ReviewComment>, ReviewError> {
    let trimmed = response.trim();

    let raw = match serde_json::from_str::<Envelope>(trimmed) {
        Ok(envelope) => envelope.into_comments(),
        Err(first) => {
            let unwrapped = strip_wrapping(trimmed).ok_or_else(|| parse_error(file_name, &first, trimmed))?;
            tracing::debug!(file = file_name, "retrying review parse after stripping wrapper");
            serde_json::from_str::<Envelope>(unwrapped)
                .map_err(|e| parse_error(file_name, &e, trimmed))?
                .into_comments()
        }
    };

    Ok(raw
        .into_iter()
        .filter_map(|c| {
            let message = c.message.trim();
            if message.is_empty() {
                return None;
            }
            Some(ReviewComment {
                file_name: file_name.to_string(),
                line_no: c
                    .line_no
                    .filter(|&n| n > 0)
                    .and_then(|n| u32::try_from(n).ok()),
                category: c.category,
                message: message.to_string(),
            })
        })
        .take(MAX_COMMENTS_PER_FILE)
        .collect())
}

/// Remove one layer of wrapping around a JSON payload.
///
/// Prefers the body of the first fenced code block; otherwise takes the
/// span from the first `{` to the last `}`. Returns `None` when neither
/// yields something different from the input.
fn strip_wrapping(text: &str) -> Option<&str> {
    if let Some(inner) = FENCE_RE.captures(text).and_then(|cap| cap.get(1)) {
        let inner = inner.as_str().trim();
        if !inner.is_empty() {
            return Some(inner);
        }
    }

    // Unterminated fence: drop the opening line.
    if let Some(rest) = text.strip_prefix("```") {
        let body = rest.split_once('\n').map_or("", |(_, body)| body);
        let body = body.trim().trim_end_matches("```").trim();
        if !body.is_empty() {
            return Some(body);
        }
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end && (start > 0 || end + 1 < text.len()) => {
            Some(&text[start..=end])
        }
        _ => None,
    }
}

fn parse_error(file_name: &str, err: &serde_json::Error, response: &str) -> ReviewError {
    let preview: String = response.chars().take(PARSE_ERROR_PREVIEW_LEN).collect();
    ReviewError::Parse {
        file: file_name.to_string(),
        reason: format!("{err}. Response: {preview}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn comment(line_no: Option<u32>, category: Category, message: &str) -> ReviewComment {
        ReviewComment {
            file_name: "a.go".into(),
            line_no,
            category,
            message: message.into(),
        }
    }

    #[test]
    fn parses_strict_object() {
        let response =
            r#"{"comments":[{"fileName":"a.go","lineNo":10,"type":"must","message":"fix X"}]}"#;
        let comments = parse_review_response("a.go", response).unwrap();
        assert_eq!(comments, vec![comment(Some(10), Category::Must, "fix X")]);
    }

    #[test]
    fn parses_empty_comment_list() {
        assert!(parse_review_response("a.go", r#"{"comments": []}"#).unwrap().is_empty());
        assert!(parse_review_response("a.go", "  []  ").unwrap().is_empty());
    }

    #[test]
    fn strips_json_fence() {
        let response = "```json\n{\"comments\":[{\"lineNo\":3,\"type\":\"nits\",\"message\":\"rename\"}]}\n```";
        let comments = parse_review_response("a.go", response).unwrap();
        assert_eq!(comments, vec![comment(Some(3), Category::Nits, "rename")]);
    }

    #[test]
    fn strips_bare_fence_and_prose() {
        let response = "Here is my review:\n```\n{\"comments\":[]}\n```\nThanks!";
        assert!(parse_review_response("a.go", response).unwrap().is_empty());

        let response = "Sure! {\"comments\":[{\"type\":\"fyi\",\"message\":\"note\"}]} Hope this helps.";
        let comments = parse_review_response("a.go", response).unwrap();
        assert_eq!(comments, vec![comment(None, Category::Fyi, "note")]);
    }

    #[test]
    fn unterminated_fence_is_stripped() {
        let response = "```json\n{\"comments\":[]}";
        assert!(parse_review_response("a.go", response).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = parse_review_response("a.go", "I could not review this file.").unwrap_err();
        match err {
            ReviewError::Parse { file, reason } => {
                assert_eq!(file, "a.go");
                assert!(reason.contains("I could not review"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn only_one_retry_is_attempted() {
        // The stripped body is itself wrapped; a second unwrap is not attempted.
        let response = "```\n```json\n{\"comments\":[]}\n```\n```";
        assert!(parse_review_response("a.go", response).is_err());
    }

    #[test]
    fn categories_are_normalized() {
        let response = r#"{"comments":[
            {"lineNo":1,"type":"MUST","message":"a"},
            {"lineNo":2,"type":"blocker","message":"b"},
            {"lineNo":3,"type":"something-else","message":"c"},
            {"lineNo":4,"category":"imo","message":"d"},
            {"lineNo":5,"message":"e"}
        ]}"#;
        let categories: Vec<Category> = parse_review_response("a.go", response)
            .unwrap()
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(
            categories,
            vec![
                Category::Must,
                Category::Must,
                Category::Fyi,
                Category::Imo,
                Category::Fyi
            ]
        );
    }

    #[test]
    fn line_numbers_are_normalized() {
        let response = r#"{"comments":[
            {"lineNo":0,"type":"fyi","message":"file level"},
            {"lineNo":-4,"type":"fyi","message":"negative"},
            {"lineNo":"12","type":"fyi","message":"string"},
            {"lineNo":7.0,"type":"fyi","message":"float"},
            {"lineNo":"n/a","type":"fyi","message":"text"}
        ]}"#;
        let lines: Vec<Option<u32>> = parse_review_response("a.go", response)
            .unwrap()
            .into_iter()
            .map(|c| c.line_no)
            .collect();
        assert_eq!(lines, vec![None, None, Some(12), Some(7), None]);
    }

    #[test]
    fn file_name_is_forced_and_blank_messages_dropped() {
        let response = r#"{"comments":[
            {"fileName":"other.go","lineNo":1,"type":"want","message":"  keep  "},
            {"fileName":"a.go","lineNo":2,"type":"want","message":"   "}
        ]}"#;
        let comments = parse_review_response("a.go", response).unwrap();
        assert_eq!(comments, vec![comment(Some(1), Category::Want, "keep")]);
    }

    #[test]
    fn comments_are_capped() {
        let items: Vec<String> = (1..=8)
            .map(|n| format!(r#"{{"lineNo":{n},"type":"nits","message":"m{n}"}}"#))
            .collect();
        let response = format!(r#"{{"comments":[{}]}}"#, items.join(","));
        let comments = parse_review_response("a.go", &response).unwrap();
        assert_eq!(comments.len(), MAX_COMMENTS_PER_FILE);
        assert_eq!(comments[0].message, "m1");
        assert_eq!(comments[4].message, "m5");
    }

    #[test]
    fn object_without_comments_field_is_rejected() {
        assert!(parse_review_response("a.go", r#"{"findings":[]}"#).is_err());
    }
}
