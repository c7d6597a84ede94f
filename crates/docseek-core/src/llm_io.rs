use reqwest::Url;
use serde_json::Value;

pub fn parse_local_loopback_endpoint(raw: &str, label: &str) -> std::result::Result<Url, String> {
    let url = Url::parse(raw).map_err(|err| format!("invalid {label}: {err}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported {label} scheme: {other}")),
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(format!("{label} must not include credentials"));
    }
    let host = url
        .host_str()
        .ok_or_else(|| format!("{label} host is missing"))?;
    if !matches!(host, "127.0.0.1" | "localhost" | "::1" | "[::1]") {
        return Err(format!("{label} must be a loopback host, got: {host}"));
    }
    Ok(url)
}

/// Chat text from an Ollama `/api/chat`, OpenAI-style, or `/api/generate`
/// response body.
pub fn extract_llm_content(value: &Value) -> Option<String> {
    if let Some(content) = value
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
    {
        return Some(content.to_string());
    }
    if let Some(content) = value
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
    {
        return Some(content.to_string());
    }
    value
        .get("response")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Vector from `{"embedding": [...]}` or `{"embeddings": [[...]]}`.
pub fn extract_embedding(value: &Value) -> Option<Vec<f32>> {
    let raw = value.get("embedding").and_then(Value::as_array).or_else(|| {
        value
            .get("embeddings")
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
            .and_then(Value::as_array)
    })?;

    let mut out = Vec::with_capacity(raw.len());
    for item in raw {
        let number = item.as_f64()?;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "embedding components are stored as f32"
        )]
        let value = number as f32;
        if !value.is_finite() {
            return None;
        }
        out.push(value);
    }
    Some(out)
}

/// Slice from the first `{`/`[` to the last `}`/`]`, for model output that
/// wraps JSON in prose or code fences.
pub fn extract_json_fragment(text: &str) -> Option<String> {
    let start = text
        .char_indices()
        .find(|(_, c)| *c == '{' || *c == '[')
        .map(|(idx, _)| idx)?;
    let sliced = &text[start..];
    let end = sliced
        .char_indices()
        .rev()
        .find(|(_, c)| *c == '}' || *c == ']')
        .map(|(idx, c)| idx + c.len_utf8())?;
    Some(sliced[..end].to_string())
}
