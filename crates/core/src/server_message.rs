//! Human-readable messages from CRM error bodies.

use serde_json::Value;

/// Extracts the most useful message from an error response body.
///
/// Checks `detail`, then `non_field_errors[0]`, then the first field error
/// (rendered as `field: message`). Other JSON is returned compactly and
/// non-JSON text is returned trimmed. Returns `None` for an empty body.
#[must_use]
pub fn extract_server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_owned());
    };

    match &value {
        Value::Object(map) => {
            if let Some(detail) = map.get("detail").and_then(first_text) {
                return Some(detail);
            }

            if let Some(message) = map.get("non_field_errors").and_then(first_text) {
                return Some(message);
            }

            for (field, errors) in map {
                if let Some(message) = first_text(errors) {
                    return Some(format!("{field}: {message}"));
                }
            }

            (!map.is_empty()).then(|| value.to_string())
        }
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        Value::Array(items) => items.iter().find_map(first_text),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_owned())
        }
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::extract_server_message;

    #[test]
    fn detail_takes_precedence() {
        let message = extract_server_message(r#"{"detail":"boom","name":["taken"]}"#);
        assert_eq!(message.as_deref(), Some("boom"));
    }

    #[test]
    fn non_field_errors_use_first_entry() {
        let message =
            extract_server_message(r#"{"non_field_errors":["invalid credentials","other"]}"#);
        assert_eq!(message.as_deref(), Some("invalid credentials"));
    }

    #[test]
    fn field_errors_are_prefixed_with_field_name() {
        let message = extract_server_message(r#"{"email":["staff with this email exists."]}"#);
        assert_eq!(
            message.as_deref(),
            Some("email: staff with this email exists.")
        );
    }

    #[test]
    fn unrecognised_json_is_stringified() {
        let message = extract_server_message(r#"{"code":42}"#);
        assert_eq!(message.as_deref(), Some(r#"{"code":42}"#));
    }

    #[test]
    fn plain_text_body_is_returned_trimmed() {
        let message = extract_server_message("  Bad Gateway \n");
        assert_eq!(message.as_deref(), Some("Bad Gateway"));
    }

    #[test]
    fn empty_body_has_no_message() {
        assert!(extract_server_message("   ").is_none());
        assert!(extract_server_message("{}").is_none());
    }
}
