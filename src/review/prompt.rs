//! Prompt construction for per-file reviews, the summary, and the
//! free-form streaming review.

use strum::IntoEnumIterator;

use crate::models::review::MAX_COMMENTS_PER_FILE;
use crate::models::{Category, CategoryCounts, FileDiffSegment};
use crate::providers::{CompletionRequest, ResponseFormat};

/// Temperature for per-file review calls.
pub const REVIEW_TEMPERATURE: f64 = 0.1;

/// Temperature for the summary call.
pub const SUMMARY_TEMPERATURE: f64 = 0.3;

const REVIEWER_PREAMBLE: &str = "You are an experienced code reviewer. \
    You read git diffs and point out concrete, actionable problems.";

/// Request for the structured review of one file.
pub fn file_review_request(model: &str, segment: &FileDiffSegment, language: &str) -> CompletionRequest {
    let file_name = &segment.file_name;
    let mut categories = String::new();
    for category in Category::iter() {
        categories.push_str(&format!(
            "- \"{}\": {}\n",
            category.as_str(),
            category.description()
        ));
    }

    let prompt = format!(
        "Analyze the following git diff for file \"{file_name}\" and write code review \
         comments in {language}.\n\n\
         ## Response format\n\n\
         Respond with ONLY a JSON object, no markdown and no extra text, using exactly \
         this structure:\n\n\
         {{\n  \"comments\": [\n    {{\n      \"fileName\": \"{file_name}\",\n      \
         \"lineNo\": 42,\n      \"type\": \"must\",\n      \
         \"message\": \"Fix potential null pointer dereference\"\n    }}\n  ]\n}}\n\n\
         ## Comment types\n\n\
         {categories}\n\
         ## Guidelines\n\n\
         - Focus on the most important issues only\n\
         - Be specific and actionable\n\
         - \"lineNo\" is the line number in the new version of the file, taken from the \
         hunk headers; use 0 for comments about the file as a whole\n\
         - Maximum {MAX_COMMENTS_PER_FILE} comments per file\n\
         - If no issues, return: {{\"comments\": []}}\n\n\
         ## File diff\n\n\
         ```diff\n{diff}\n```\n",
        diff = segment.diff_text.trim_end(),
    );

    CompletionRequest {
        model: model.to_string(),
        preamble: REVIEWER_PREAMBLE.to_string(),
        prompt,
        temperature: REVIEW_TEMPERATURE,
        format: ResponseFormat::ReviewComments,
    }
}

/// Request for the one- or two-sentence overall summary.
pub fn summary_request(model: &str, counts: &CategoryCounts, language: &str) -> CompletionRequest {
    let mut findings = String::new();
    for (category, count) in counts.iter() {
        findings.push_str(&format!(
            "- {} ({}): {count}\n",
            category.description(),
            category.as_str()
        ));
    }

    let prompt = format!(
        "Based on the following code review findings, write a brief summary \
         (1-2 sentences) in {language}.\n\n\
         FINDINGS:\n{findings}- Total comments: {total}\n\n\
         Describe the overall code quality and the main areas of concern. \
         Respond with only the summary.",
        total = counts.total(),
    );

    CompletionRequest {
        model: model.to_string(),
        preamble: REVIEWER_PREAMBLE.to_string(),
        prompt,
        temperature: SUMMARY_TEMPERATURE,
        format: ResponseFormat::Text,
    }
}

/// Request for a free-form Markdown review of the whole diff.
pub fn streaming_review_request(model: &str, diff: &str, language: &str) -> CompletionRequest {
    let prompt = format!(
        "Review the following git diff and write your review in {language} as Markdown.\n\n\
         Group comments by file. Prefix each comment with one of \
         [MUST], [WANT], [NITS], [FYI] or [IMO] and mention the line number when it \
         applies. Finish with a one-paragraph overall assessment.\n\n\
         ```diff\n{diff}\n```\n",
        diff = diff.trim_end(),
    );

    CompletionRequest {
        model: model.to_string(),
        preamble: REVIEWER_PREAMBLE.to_string(),
        prompt,
        temperature: SUMMARY_TEMPERATURE,
        format: ResponseFormat::Text,
    }
}
