//! Pulling JSON arrays out of free-form model replies.

/// The outermost `[...]` in `raw`, after stripping Markdown code fences.
pub fn extract_json_array(raw: &str) -> Option<&str> {
    let body = strip_code_fence(raw);
    let start = body.find('[')?;
    let end = body.rfind(']')?;
    (end > start).then(|| &body[start..=end])
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line (```json).
    let rest = rest.split_once('\n').map(|(_, r)| r).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Ids from a JSON array of strings, numbers, or objects with an `id` or
/// `event_id` field.
pub fn parse_id_list(raw: &str) -> Option<Vec<String>> {
    let array = extract_json_array(raw)?;
    let values: Vec<serde_json::Value> = serde_json::from_str(array).ok()?;
    Some(
        values
            .iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                serde_json::Value::Object(o) => o
                    .get("id")
                    .or_else(|| o.get("event_id"))
                    .and_then(|id| match id {
                        serde_json::Value::String(s) => Some(s.trim().to_string()),
                        serde_json::Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    }),
                _ => None,
            })
            .collect(),
    )
}
