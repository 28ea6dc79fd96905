use serde_json::Value;

/// Reply text used when the worker answers with an unexpected shape.
pub const NO_RESPONSE: &str = "No response from API.";

/// Pull the assistant reply out of a chat-completions style body.
///
/// Prefers `choices[0].message.content`, then `choices[0].text`. Anything else
/// yields `None` so the caller can fall back to [`NO_RESPONSE`].
pub fn extract_reply(body: &Value) -> Option<String> {
    let choice = body.get("choices")?.get(0)?;

    choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .or_else(|| choice.get("text").and_then(Value::as_str))
        .map(str::to_string)
}

/// Like [`extract_reply`] but always produces display text.
pub fn reply_or_fallback(body: &Value) -> String {
    match extract_reply(body) {
        Some(text) => text,
        None => {
            tracing::warn!("worker response had no reply text, using fallback");
            NO_RESPONSE.to_string()
        }
    }
}
