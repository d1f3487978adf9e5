use anyhow::{Context, anyhow};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

pub fn parse_openai_chat_completion(body: &[u8]) -> anyhow::Result<String> {
    let resp: OpenAiChatResponse = serde_json::from_slice(body).context("decode chat JSON")?;
    let content = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| anyhow!("no content in chat completion response"))?;
    Ok(content)
}

/// Pulls a JSON object out of model text.
///
/// Accepts bare JSON, JSON wrapped in a ```json fence, or JSON surrounded by
/// prose (first `{` to last `}`). Anything that is not an object is an error.
pub fn extract_json_object(text: &str) -> anyhow::Result<serde_json::Value> {
    let trimmed = strip_code_fence(text.trim());

    let start = trimmed
        .find('{')
        .ok_or_else(|| anyhow!("no JSON object in model output"))?;
    let end = trimmed
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| anyhow!("unterminated JSON object in model output"))?;

    let value: serde_json::Value =
        serde_json::from_str(&trimmed[start..=end]).context("decode structured output")?;
    if !value.is_object() {
        return Err(anyhow!("structured output is not a JSON object"));
    }
    Ok(value)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (`json`, `JSON`, ...) on the opening line.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
