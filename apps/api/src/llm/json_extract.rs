//! Pulling a JSON object out of free-form model output.
//!
//! Local models often wrap their answer in prose or chain-of-thought text,
//! so parsing falls through a ladder: the raw text, the text with code
//! fences stripped, the widest `{..}` slice, and finally the last flat
//! `{..}` object anywhere in the text.

use serde_json::Value;

/// Attempts to extract a JSON object from model output. Returns `None`
/// when nothing in the text parses as a JSON object.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let trimmed = text.trim();

    if let Some(value) = parse_object(trimmed) {
        return Some(value);
    }

    let unfenced = strip_fences(trimmed);
    if let Some(value) = parse_object(unfenced) {
        return Some(value);
    }

    if let (Some(start), Some(end)) = (unfenced.find('{'), unfenced.rfind('}')) {
        if start < end {
            if let Some(value) = parse_object(&unfenced[start..=end]) {
                return Some(value);
            }
        }
    }

    last_flat_object(unfenced).and_then(parse_object)
}

fn parse_object(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) if value.is_object() => Some(value),
        _ => None,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences.
fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let stripped = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match stripped {
        Some(inner) => inner
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or_else(|| inner.trim_start()),
        None => text,
    }
}

/// Finds the last `{...}` span that contains no nested braces. This rescues
/// answers where the model emits scratch objects before the real one.
fn last_flat_object(text: &str) -> Option<&str> {
    let mut found = None;
    let mut open = None;
    for (i, ch) in text.char_indices() {
        match ch {
            '{' => open = Some(i),
            '}' => {
                if let Some(start) = open.take() {
                    found = Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    found
}
