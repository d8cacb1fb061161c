use serde_json::Value;

/// What a task's raw output looks like when read as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonShape {
    /// A JSON object; top-level keys in sorted order.
    Object(Vec<String>),
    /// Valid JSON, but not an object.
    NotObject,
    Invalid,
}

impl JsonShape {
    pub fn describe(&self) -> String {
        match self {
            JsonShape::Object(keys) => format!("JSON object, keys: [{}]", keys.join(", ")),
            JsonShape::NotObject => "valid JSON, but not an object".to_string(),
            JsonShape::Invalid => "not parseable as JSON".to_string(),
        }
    }
}

/// Classifies `raw`, tolerating a single surrounding markdown code fence.
pub fn inspect_json(raw: &str) -> JsonShape {
    match serde_json::from_str::<Value>(strip_fence(raw)) {
        Ok(Value::Object(map)) => JsonShape::Object(map.keys().cloned().collect()),
        Ok(_) => JsonShape::NotObject,
        Err(_) => JsonShape::Invalid,
    }
}

fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}
